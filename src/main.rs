use clap::Parser;
use log::info;

use tg_translator::bot::TelegramBot;
use tg_translator::config::BotConfig;
use tg_translator::liveness;

#[derive(Parser)]
#[command(name = "tg-translator")]
#[command(about = "A Telegram bot that translates text for channel subscribers")]
struct Args {}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // load .env file if it exists
    if let Err(e) = dotenvy::dotenv() {
        match e {
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {}
            _ => {
                eprintln!("warning: failed to load .env file: {}", e);
            }
        }
    }

    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let _args = Args::parse();

    let config = BotConfig::from_env()?;
    info!("Loaded configuration: {:?}", config);

    let _liveness = liveness::spawn(config.liveness_port);

    info!("Starting bot...");

    let bot = TelegramBot::new(&config)?;
    bot.run().await;

    Ok(())
}
