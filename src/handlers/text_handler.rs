use log::info;

use crate::bot::BotContext;
use crate::handlers::{InteractionState, Reply, Transition, UserInfo};
use crate::messages;

pub struct TextHandler;

impl TextHandler {
    /// remembers the text as the user's pending text and offers the language menu.
    ///
    /// `None` for unrecognised `/commands`: they are dropped, not stored.
    pub async fn handle_text(ctx: &BotContext, user: &UserInfo, text: &str) -> Option<Transition> {
        if text.starts_with('/') {
            info!("Ignoring unknown command from user {}: {}", user.id.0, text);
            return None;
        }

        info!(
            "Received {} chars of text from user {}",
            text.chars().count(),
            user.id.0
        );
        ctx.store.put(user.id, text).await;

        let reply =
            Reply::send(messages::CHOOSE_LANGUAGE).with_markup(ctx.catalog.create_language_keyboard());
        Some(Transition::to(InteractionState::AwaitingLanguageChoice, reply))
    }
}
