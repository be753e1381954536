//! User-facing texts. Welcome texts are HTML, everything else is plain.

use crate::utils::MessageFormatter;

pub fn welcome_subscribe_first(mention_html: &str, channel_username: &str) -> String {
    format!(
        "Welcome {}! 🌍\n\n\
        To use this translation bot, please subscribe to our channel first:\n\
        @{}\n\n\
        After subscribing, click 'Check Subscription' below.",
        mention_html,
        MessageFormatter::escape_html(channel_username)
    )
}

pub fn welcome_subscribed(mention_html: &str) -> String {
    format!(
        "Welcome {}! 🌍\n\n\
        📝 Send a text\n\
        🌐 Choose a language\n\
        ✨ Get translation!",
        mention_html
    )
}

pub const SUBSCRIBE_BUTTON: &str = "Subscribe to Channel";
pub const CHECK_SUBSCRIPTION_BUTTON: &str = "Check Subscription";

pub const SUBSCRIPTION_CONFIRMED: &str = "✅ Subscription confirmed! Send a message to translate.";
pub const STILL_NOT_SUBSCRIBED: &str = "❌ You're still not subscribed.";

pub const CHOOSE_LANGUAGE: &str = "Choose a target language:";
pub const SEND_TEXT_FIRST: &str = "❗ Send a text first.";
pub const TRANSLATION_FAILED: &str = "⚠️ Translation failed, please try again.";
pub const TEXT_TOO_LONG_OR_EMPTY: &str =
    "⚠️ This text can't be translated. Send between 1 and 5000 characters.";
pub const UNKNOWN_LANGUAGE: &str = "❓ This language is not supported. Please pick one from the menu.";

pub const HELP: &str = "Send any text. Then click a language to translate it.";

pub fn supported_languages(names: &[&str]) -> String {
    format!("🌐 Supported Languages:\n{}", names.join(", "))
}

pub fn translation_result(original: &str, language_label: &str, translated: &str) -> String {
    format!(
        "📝 Original: {}\n🌍 {}: {}",
        original, language_label, translated
    )
}
