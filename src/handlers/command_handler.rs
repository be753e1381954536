use log::info;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::bot::{BotContext, Command};
use crate::handlers::callback_handler::CHECK_SUBSCRIPTION_CALLBACK;
use crate::handlers::{InteractionState, Reply, Transition, UserInfo};
use crate::messages;
use crate::utils::MessageFormatter;

pub struct CommandHandler;

impl CommandHandler {
    pub async fn handle_command(ctx: &BotContext, user: &UserInfo, cmd: Command) -> Transition {
        match cmd {
            Command::Start => Self::handle_start_command(ctx, user).await,
            Command::Help => Transition::stay(Reply::send(messages::HELP)),
            Command::Languages => Transition::stay(Reply::send(messages::supported_languages(
                &ctx.catalog.names(),
            ))),
        }
    }

    async fn handle_start_command(ctx: &BotContext, user: &UserInfo) -> Transition {
        let mention = MessageFormatter::mention_html(user.id.0, &user.full_name);

        if !ctx.gate.is_subscribed(user.id).await {
            info!("User {} started the bot without a subscription", user.id.0);
            let reply = Reply::send(messages::welcome_subscribe_first(
                &mention,
                ctx.gate.channel_username(),
            ))
            .html()
            .with_markup(Self::create_subscribe_keyboard(ctx));
            return Transition::to(InteractionState::Unauthenticated, reply);
        }

        info!("User {} started the bot", user.id.0);
        let reply = Reply::send(messages::welcome_subscribed(&mention))
            .html()
            .with_markup(ctx.catalog.create_language_keyboard());
        Transition::to(InteractionState::AwaitingText, reply)
    }

    pub fn create_subscribe_keyboard(ctx: &BotContext) -> InlineKeyboardMarkup {
        let check_button =
            InlineKeyboardButton::callback(messages::CHECK_SUBSCRIPTION_BUTTON, CHECK_SUBSCRIPTION_CALLBACK);

        let rows = match ctx.channel_link().parse::<url::Url>() {
            Ok(link) => vec![
                vec![InlineKeyboardButton::url(messages::SUBSCRIBE_BUTTON, link)],
                vec![check_button],
            ],
            // unreachable with a username that passed config validation
            Err(_) => vec![vec![check_button]],
        };

        InlineKeyboardMarkup::new(rows)
    }
}
