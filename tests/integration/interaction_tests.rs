use teloxide::types::{InlineKeyboardButtonKind, InlineKeyboardMarkup, ParseMode, UserId};
use tg_translator::bot::Command;
use tg_translator::handlers::{
    CallbackHandler, CommandHandler, Delivery, InteractionState, TextHandler, UserInfo,
};
use tg_translator::messages;
use tg_translator::subscription::{MemberStatus, MembershipError};
use tg_translator::translator::{SourceLanguage, TranslationError};

use super::mock_platform::{MockTranslator, TestBot, TEST_CHANNEL};

fn user(id: u64) -> UserInfo {
    UserInfo {
        id: UserId(id),
        full_name: "Ada Lovelace".to_string(),
    }
}

fn callback_data(markup: &InlineKeyboardMarkup) -> Vec<String> {
    markup
        .inline_keyboard
        .iter()
        .flatten()
        .filter_map(|button| match &button.kind {
            InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
            _ => None,
        })
        .collect()
}

fn is_language_menu(markup: &InlineKeyboardMarkup) -> bool {
    let data = callback_data(markup);
    !data.is_empty() && data.iter().all(|d| d.starts_with("lang_"))
}

#[tokio::test]
async fn test_start_without_subscription_shows_subscribe_prompt() {
    let bot = TestBot::new(MockTranslator::new());
    let ada = user(100);

    let transition = CommandHandler::handle_command(&bot.ctx, &ada, Command::Start).await;

    assert_eq!(transition.state, Some(InteractionState::Unauthenticated));
    let reply = transition.reply;
    assert_eq!(reply.delivery, Delivery::Send);
    assert_eq!(reply.parse_mode, Some(ParseMode::Html));
    assert!(reply.text.contains(&format!("@{}", TEST_CHANNEL)));
    assert!(reply.text.contains("tg://user?id=100"));

    let markup = reply.markup.expect("subscribe prompt has buttons");
    let buttons: Vec<_> = markup.inline_keyboard.iter().flatten().collect();
    assert_eq!(buttons.len(), 2);
    match &buttons[0].kind {
        InlineKeyboardButtonKind::Url(url) => {
            assert_eq!(url.as_str(), "https://t.me/Traveler_01")
        }
        other => panic!("expected url button, got {:?}", other),
    }
    assert_eq!(buttons[1].text, messages::CHECK_SUBSCRIPTION_BUTTON);
    assert!(!is_language_menu(&markup));

    assert_eq!(bot.membership.call_count(), 1);
    let calls = bot.membership.calls.lock().unwrap().clone();
    assert_eq!(calls[0], (TEST_CHANNEL.to_string(), 100));
}

#[tokio::test]
async fn test_start_with_subscription_shows_language_menu() {
    let bot = TestBot::new(MockTranslator::new());
    bot.membership.set_status(101, MemberStatus::Member);

    let transition = CommandHandler::handle_command(&bot.ctx, &user(101), Command::Start).await;

    assert_eq!(transition.state, Some(InteractionState::AwaitingText));
    let markup = transition.reply.markup.expect("language menu");
    assert!(is_language_menu(&markup));
    assert_eq!(markup.inline_keyboard[0].len(), 2);
}

#[tokio::test]
async fn test_gate_error_degrades_to_subscribe_prompt() {
    let bot = TestBot::new(MockTranslator::new());
    bot.membership.set_error(
        102,
        MembershipError::Permission("member list is inaccessible".to_string()),
    );

    let transition = CommandHandler::handle_command(&bot.ctx, &user(102), Command::Start).await;

    assert_eq!(transition.state, Some(InteractionState::Unauthenticated));
    assert!(transition.reply.text.contains("please subscribe"));
}

#[tokio::test]
async fn test_check_subscription_after_subscribing() {
    let bot = TestBot::new(MockTranslator::new());
    let ada = user(103);

    let denied = CallbackHandler::handle_callback_query(&bot.ctx, &ada, "check_subscription")
        .await
        .expect("check is handled");
    assert_eq!(denied.state, Some(InteractionState::Unauthenticated));
    assert_eq!(denied.reply.delivery, Delivery::Edit);
    assert_eq!(denied.reply.text, messages::STILL_NOT_SUBSCRIBED);

    bot.membership.set_status(103, MemberStatus::Administrator);
    let granted = CallbackHandler::handle_callback_query(&bot.ctx, &ada, "check_subscription")
        .await
        .expect("check is handled");
    assert_eq!(granted.state, Some(InteractionState::AwaitingText));
    assert_eq!(granted.reply.text, messages::SUBSCRIPTION_CONFIRMED);

    // nothing is cached: each check asks the platform again
    assert_eq!(bot.membership.call_count(), 2);

    let after = TextHandler::handle_text(&bot.ctx, &ada, "Good morning")
        .await
        .expect("text is handled");
    assert_eq!(after.state, Some(InteractionState::AwaitingLanguageChoice));
    assert_eq!(after.reply.text, messages::CHOOSE_LANGUAGE);
    assert!(is_language_menu(&after.reply.markup.expect("language menu")));
}

#[tokio::test]
async fn test_text_then_language_translates() {
    let translator = MockTranslator::new().with_translation("Hello", "fr", "Bonjour");
    let bot = TestBot::new(translator);
    bot.membership.set_status(104, MemberStatus::Creator);
    let ada = user(104);

    TextHandler::handle_text(&bot.ctx, &ada, "Hello").await;
    let transition = CallbackHandler::handle_callback_query(&bot.ctx, &ada, "lang_french")
        .await
        .expect("language press is handled");

    assert_eq!(transition.state, Some(InteractionState::AwaitingText));
    assert_eq!(transition.reply.delivery, Delivery::Edit);
    assert_eq!(
        transition.reply.text,
        "📝 Original: Hello\n🌍 French: Bonjour"
    );

    let calls = bot.translator.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].text, "Hello");
    assert_eq!(calls[0].source, SourceLanguage::Auto);
    assert_eq!(calls[0].target, "fr");

    // the pending text survives the translation
    assert_eq!(bot.store.take(UserId(104)).await, Ok("Hello".to_string()));
}

#[tokio::test]
async fn test_language_without_text_asks_for_text() {
    let bot = TestBot::new(MockTranslator::new());
    bot.membership.set_status(105, MemberStatus::Member);

    let transition = CallbackHandler::handle_callback_query(&bot.ctx, &user(105), "lang_german")
        .await
        .expect("language press is handled");

    assert_eq!(transition.state, None);
    assert_eq!(transition.reply.text, messages::SEND_TEXT_FIRST);
    assert!(bot.translator.calls().is_empty());
}

#[tokio::test]
async fn test_new_text_replaces_pending_text() {
    let bot = TestBot::new(MockTranslator::new());
    let ada = user(106);

    TextHandler::handle_text(&bot.ctx, &ada, "first").await;
    TextHandler::handle_text(&bot.ctx, &ada, "second").await;
    CallbackHandler::handle_callback_query(&bot.ctx, &ada, "lang_spanish").await;

    let calls = bot.translator.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].text, "second");
    assert_eq!(calls[0].target, "es");
}

#[tokio::test]
async fn test_translation_failure_is_reported_to_user() {
    let bot = TestBot::new(MockTranslator::new());
    bot.translator
        .fail_with(TranslationError::Network("connection refused".to_string()));
    let ada = user(107);

    TextHandler::handle_text(&bot.ctx, &ada, "Hello").await;
    let transition = CallbackHandler::handle_callback_query(&bot.ctx, &ada, "lang_italian")
        .await
        .expect("language press is handled");

    assert_eq!(transition.reply.text, messages::TRANSLATION_FAILED);
    assert_eq!(transition.state, Some(InteractionState::AwaitingText));
}

#[tokio::test]
async fn test_untranslatable_length_gets_its_own_message() {
    let bot = TestBot::new(MockTranslator::new());
    bot.translator.fail_with(TranslationError::InvalidLength(6000));
    let ada = user(108);

    TextHandler::handle_text(&bot.ctx, &ada, "x").await;
    let transition = CallbackHandler::handle_callback_query(&bot.ctx, &ada, "lang_thai")
        .await
        .expect("language press is handled");

    assert_eq!(transition.reply.text, messages::TEXT_TOO_LONG_OR_EMPTY);
}

#[tokio::test]
async fn test_unknown_language_is_rejected() {
    let bot = TestBot::new(MockTranslator::new());
    let ada = user(109);

    TextHandler::handle_text(&bot.ctx, &ada, "Hello").await;
    let transition = CallbackHandler::handle_callback_query(&bot.ctx, &ada, "lang_klingon")
        .await
        .expect("language press is handled");

    assert_eq!(transition.reply.text, messages::UNKNOWN_LANGUAGE);
    assert_eq!(transition.state, None);
    assert!(bot.translator.calls().is_empty());
}

#[tokio::test]
async fn test_unknown_command_is_not_stored_as_text() {
    let bot = TestBot::new(MockTranslator::new());
    let ada = user(114);

    assert!(TextHandler::handle_text(&bot.ctx, &ada, "/settings").await.is_none());
    assert!(bot.store.is_empty().await);

    // an earlier text stays pending
    TextHandler::handle_text(&bot.ctx, &ada, "Hello").await;
    assert!(TextHandler::handle_text(&bot.ctx, &ada, "/unknown now").await.is_none());
    assert_eq!(bot.store.take(UserId(114)).await, Ok("Hello".to_string()));
}

#[tokio::test]
async fn test_unknown_callback_data_is_ignored() {
    let bot = TestBot::new(MockTranslator::new());
    let result = CallbackHandler::handle_callback_query(&bot.ctx, &user(110), "buy_single").await;
    assert!(result.is_none());
}

#[tokio::test]
async fn test_help_and_languages_commands() {
    let bot = TestBot::new(MockTranslator::new());
    let ada = user(111);

    let help = CommandHandler::handle_command(&bot.ctx, &ada, Command::Help).await;
    assert_eq!(help.state, None);
    assert_eq!(help.reply.text, messages::HELP);

    let languages = CommandHandler::handle_command(&bot.ctx, &ada, Command::Languages).await;
    assert_eq!(languages.state, None);
    assert!(languages.reply.text.starts_with("🌐 Supported Languages:\nafrikaans, arabic"));
    assert!(languages.reply.text.ends_with("urdu, vietnamese"));

    // neither command touches the gate
    assert_eq!(bot.membership.call_count(), 0);
}

#[tokio::test]
async fn test_users_do_not_see_each_others_text() {
    let bot = TestBot::new(MockTranslator::new());
    let ada = user(112);
    let bob = user(113);

    TextHandler::handle_text(&bot.ctx, &ada, "from ada").await;

    let bob_press = CallbackHandler::handle_callback_query(&bot.ctx, &bob, "lang_french")
        .await
        .expect("language press is handled");
    assert_eq!(bob_press.reply.text, messages::SEND_TEXT_FIRST);

    let ada_press = CallbackHandler::handle_callback_query(&bot.ctx, &ada, "lang_french")
        .await
        .expect("language press is handled");
    assert!(ada_press.reply.text.contains("from ada"));
}

#[tokio::test]
async fn test_concurrent_users_get_their_own_translations() {
    let bot = TestBot::new(MockTranslator::new());

    let mut tasks = Vec::new();
    for id in 200..220u64 {
        let ctx = bot.ctx.clone();
        tasks.push(tokio::spawn(async move {
            let who = user(id);
            let text = format!("message {}", id);
            TextHandler::handle_text(&ctx, &who, &text).await;
            CallbackHandler::handle_callback_query(&ctx, &who, "lang_dutch")
                .await
                .map(|transition| transition.reply.text)
        }));
    }

    for (offset, task) in tasks.into_iter().enumerate() {
        let id = 200 + offset as u64;
        let text = task.await.unwrap().expect("language press is handled");
        assert_eq!(
            text,
            format!("📝 Original: message {}\n🌍 Dutch: message {}_nl", id, id)
        );
    }
}
