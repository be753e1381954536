use log::{error, info, warn};

use crate::bot::BotContext;
use crate::handlers::{InteractionState, Reply, Transition, UserInfo};
use crate::language_catalog::LanguageCatalog;
use crate::messages;
use crate::translator::{translate_with_timeout, SourceLanguage, TranslationError};
use crate::utils::message_formatter::{MessageFormatter, MAX_MESSAGE_LENGTH};

pub const CHECK_SUBSCRIPTION_CALLBACK: &str = "check_subscription";

pub struct CallbackHandler;

impl CallbackHandler {
    /// `None` for callback data this bot never produces; the press is only acknowledged
    pub async fn handle_callback_query(
        ctx: &BotContext,
        user: &UserInfo,
        data: &str,
    ) -> Option<Transition> {
        match data {
            CHECK_SUBSCRIPTION_CALLBACK => Some(Self::handle_check_subscription(ctx, user).await),
            callback_data => match LanguageCatalog::parse_callback(callback_data) {
                Some(language) => Some(Self::handle_language_callback(ctx, user, language).await),
                None => {
                    warn!(
                        "Ignoring unknown callback data from user {}: {}",
                        user.id.0, callback_data
                    );
                    None
                }
            },
        }
    }

    async fn handle_check_subscription(ctx: &BotContext, user: &UserInfo) -> Transition {
        if ctx.gate.is_subscribed(user.id).await {
            info!("User {} confirmed the subscription", user.id.0);
            Transition::to(
                InteractionState::AwaitingText,
                Reply::edit(messages::SUBSCRIPTION_CONFIRMED),
            )
        } else {
            Transition::to(
                InteractionState::Unauthenticated,
                Reply::edit(messages::STILL_NOT_SUBSCRIBED),
            )
        }
    }

    async fn handle_language_callback(
        ctx: &BotContext,
        user: &UserInfo,
        language: &str,
    ) -> Transition {
        let original = match ctx.store.take_entry(user.id).await {
            Ok(pending) => {
                info!(
                    "User {} picked {} for text submitted {}s ago",
                    user.id.0,
                    language,
                    pending.age().num_seconds()
                );
                pending.text
            }
            Err(_) => {
                info!("User {} picked {} before sending text", user.id.0, language);
                return Transition::stay(Reply::edit(messages::SEND_TEXT_FIRST));
            }
        };

        let entry = match ctx.catalog.entry_for(language) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Rejected language selection from user {}: {}", user.id.0, e);
                return Transition::stay(Reply::edit(messages::UNKNOWN_LANGUAGE));
            }
        };

        let reply = match translate_with_timeout(
            ctx.translator.as_ref(),
            ctx.translate_timeout,
            &original,
            &SourceLanguage::Auto,
            entry.code,
        )
        .await
        {
            Ok(translated) => {
                info!("Translated text for user {} into {}", user.id.0, entry.code);
                let text = messages::translation_result(&original, &entry.label(), &translated);
                Reply::edit(MessageFormatter::truncate_to_limit(&text, MAX_MESSAGE_LENGTH))
            }
            Err(TranslationError::InvalidLength(len)) => {
                info!(
                    "Text of user {} has untranslatable length {}",
                    user.id.0, len
                );
                Reply::edit(messages::TEXT_TOO_LONG_OR_EMPTY)
            }
            Err(e) => {
                error!(
                    "Translation into {} failed for user {} ({}): {}",
                    entry.code,
                    user.id.0,
                    ctx.translator.provider_name(),
                    e
                );
                Reply::edit(messages::TRANSLATION_FAILED)
            }
        };

        Transition::to(InteractionState::AwaitingText, reply)
    }
}
