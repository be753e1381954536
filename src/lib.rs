pub mod bot;
pub mod config;
pub mod handlers;
pub mod language_catalog;
pub mod liveness;
pub mod messages;
pub mod pending_store;
pub mod subscription;
pub mod translator;
pub mod utils;
