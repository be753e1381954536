use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, ChatId, MaybeInaccessibleMessage, MessageId};
use teloxide::utils::command::BotCommands;
use teloxide::{ApiError, RequestError};

use crate::config::BotConfig;
use crate::handlers::{CallbackHandler, CommandHandler, Delivery, Reply, TextHandler, UserInfo};
use crate::language_catalog::LanguageCatalog;
use crate::pending_store::PendingStore;
use crate::subscription::{SubscriptionGate, TelegramMembership};
use crate::translator::{GoogleTranslator, Translator};

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    #[command(description = "start the bot")]
    Start,
    #[command(description = "list supported languages")]
    Languages,
    #[command(description = "how to use the bot")]
    Help,
}

/// everything the handlers need; cheap to clone, shared by all updates
#[derive(Clone)]
pub struct BotContext {
    pub gate: SubscriptionGate,
    pub store: PendingStore,
    pub translator: Arc<dyn Translator>,
    pub catalog: LanguageCatalog,
    pub translate_timeout: Duration,
}

impl BotContext {
    pub fn new(
        gate: SubscriptionGate,
        store: PendingStore,
        translator: Arc<dyn Translator>,
        translate_timeout: Duration,
    ) -> Self {
        Self {
            gate,
            store,
            translator,
            catalog: LanguageCatalog::default(),
            translate_timeout,
        }
    }

    pub fn channel_link(&self) -> String {
        format!("https://t.me/{}", self.gate.channel_username())
    }
}

pub struct TelegramBot {
    bot: Bot,
    ctx: BotContext,
}

impl TelegramBot {
    pub fn new(config: &BotConfig) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let bot = Bot::new(&config.bot_token);

        let membership = Arc::new(TelegramMembership::new(Arc::new(bot.clone())));
        let gate = SubscriptionGate::new(membership, config.channel_username.clone())
            .with_timeout(config.gate_timeout);
        let translator: Arc<dyn Translator> =
            Arc::new(GoogleTranslator::new(config.translate_timeout)?);

        let ctx = BotContext::new(
            gate,
            PendingStore::new(),
            translator,
            config.translate_timeout,
        );

        Ok(Self { bot, ctx })
    }

    pub async fn run(&self) {
        info!(
            "Starting Telegram bot (channel: @{})...",
            self.ctx.gate.channel_username()
        );

        if let Err(e) = self.bot.set_my_commands(Command::bot_commands()).await {
            warn!("Failed to register bot commands: {}", e);
        }

        let ctx = self.ctx.clone();

        let handler = dptree::entry()
            .branch(Update::filter_callback_query().endpoint({
                let ctx = ctx.clone();
                move |bot: Bot, query: CallbackQuery| {
                    let ctx = ctx.clone();
                    async move { Self::handle_callback_query(&ctx, &bot, query).await }
                }
            }))
            .branch(
                Update::filter_message()
                    .branch(dptree::entry().filter_command::<Command>().endpoint({
                        let ctx = ctx.clone();
                        move |bot: Bot, msg: Message, cmd: Command| {
                            let ctx = ctx.clone();
                            async move { Self::handle_command(&ctx, &bot, msg, cmd).await }
                        }
                    }))
                    .branch(dptree::endpoint({
                        let ctx = ctx.clone();
                        move |bot: Bot, msg: Message| {
                            let ctx = ctx.clone();
                            async move { Self::handle_message(&ctx, &bot, msg).await }
                        }
                    })),
            );

        Dispatcher::builder(self.bot.clone(), handler)
            .error_handler(
                teloxide::error_handlers::LoggingErrorHandler::with_custom_text(
                    "An error from the update listener",
                ),
            )
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }

    fn user_info(user: &teloxide::types::User) -> UserInfo {
        UserInfo {
            id: user.id,
            full_name: user.full_name(),
        }
    }

    async fn handle_command(
        ctx: &BotContext,
        bot: &Bot,
        msg: Message,
        cmd: Command,
    ) -> ResponseResult<()> {
        let Some(user) = msg.from.as_ref().map(Self::user_info) else {
            return Ok(());
        };
        info!("User {} sent command {:?}", user.id.0, cmd);

        let transition = CommandHandler::handle_command(ctx, &user, cmd).await;
        Self::deliver(bot, msg.chat.id, None, transition.reply).await
    }

    async fn handle_message(ctx: &BotContext, bot: &Bot, msg: Message) -> ResponseResult<()> {
        let (Some(user), Some(text)) = (msg.from.as_ref().map(Self::user_info), msg.text()) else {
            return Ok(());
        };

        let Some(transition) = TextHandler::handle_text(ctx, &user, text).await else {
            return Ok(());
        };
        Self::deliver(bot, msg.chat.id, None, transition.reply).await
    }

    async fn handle_callback_query(
        ctx: &BotContext,
        bot: &Bot,
        query: CallbackQuery,
    ) -> ResponseResult<()> {
        bot.answer_callback_query(query.id.clone()).await?;

        let Some(data) = query.data.as_deref() else {
            return Ok(());
        };
        let user = Self::user_info(&query.from);

        let Some(transition) = CallbackHandler::handle_callback_query(ctx, &user, data).await
        else {
            return Ok(());
        };

        let (chat_id, message_id) = match &query.message {
            Some(MaybeInaccessibleMessage::Regular(msg)) => (msg.chat.id, Some(msg.id)),
            Some(MaybeInaccessibleMessage::Inaccessible(msg)) => (msg.chat.id, Some(msg.message_id)),
            None => (ChatId(user.id.0 as i64), None),
        };

        Self::deliver(bot, chat_id, message_id, transition.reply).await
    }

    /// an edit needs the pressed message; without one the reply is sent fresh
    fn edit_target(delivery: Delivery, pressed: Option<MessageId>) -> Option<MessageId> {
        match delivery {
            Delivery::Edit => pressed,
            Delivery::Send => None,
        }
    }

    fn settle_delivery(chat_id: ChatId, result: ResponseResult<()>) -> ResponseResult<()> {
        match result {
            // pressing the same button twice edits to identical text
            Err(RequestError::Api(ApiError::MessageNotModified)) => {
                info!("Message in chat {} already up to date", chat_id);
                Ok(())
            }
            Err(e) => {
                error!("Failed to deliver reply to chat {}: {}", chat_id, e);
                Err(e)
            }
            Ok(()) => Ok(()),
        }
    }

    /// sends or edits exactly one message for a handled event
    async fn deliver(
        bot: &Bot,
        chat_id: ChatId,
        pressed: Option<MessageId>,
        reply: Reply,
    ) -> ResponseResult<()> {
        let result = match Self::edit_target(reply.delivery, pressed) {
            Some(message_id) => {
                let mut request = bot.edit_message_text(chat_id, message_id, reply.text);
                if let Some(mode) = reply.parse_mode {
                    request = request.parse_mode(mode);
                }
                if let Some(markup) = reply.markup {
                    request = request.reply_markup(markup);
                }
                request.await.map(|_| ())
            }
            None => {
                let mut request = bot.send_message(chat_id, reply.text);
                if let Some(mode) = reply.parse_mode {
                    request = request.parse_mode(mode);
                }
                if let Some(markup) = reply.markup {
                    request = request.reply_markup(markup);
                }
                request.await.map(|_| ())
            }
        };

        Self::settle_delivery(chat_id, result)
    }
}
