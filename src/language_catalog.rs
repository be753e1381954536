use std::error::Error;
use std::fmt;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::utils::MessageFormatter;

/// callback data prefix for language buttons
pub const LANGUAGE_CALLBACK_PREFIX: &str = "lang_";

/// buttons per menu row
const BUTTONS_PER_ROW: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageEntry {
    pub display_name: &'static str,
    pub code: &'static str,
}

impl LanguageEntry {
    const fn new(display_name: &'static str, code: &'static str) -> Self {
        Self { display_name, code }
    }

    /// label shown on the menu button, e.g. "French"
    pub fn label(&self) -> String {
        MessageFormatter::capitalize(self.display_name)
    }

    pub fn callback_data(&self) -> String {
        format!("{}{}", LANGUAGE_CALLBACK_PREFIX, self.display_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLanguage(pub String);

impl fmt::Display for UnknownLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown language: {}", self.0)
    }
}

impl Error for UnknownLanguage {}

// menu order is the order of this list
static LANGUAGES: &[LanguageEntry] = &[
    LanguageEntry::new("afrikaans", "af"),
    LanguageEntry::new("arabic", "ar"),
    LanguageEntry::new("azerbaijani", "az"),
    LanguageEntry::new("bulgarian", "bg"),
    LanguageEntry::new("chinese", "zh-CN"),
    LanguageEntry::new("czech", "cs"),
    LanguageEntry::new("danish", "da"),
    LanguageEntry::new("dutch", "nl"),
    LanguageEntry::new("english", "en"),
    LanguageEntry::new("finnish", "fi"),
    LanguageEntry::new("french", "fr"),
    LanguageEntry::new("georgian", "ka"),
    LanguageEntry::new("german", "de"),
    LanguageEntry::new("greek", "el"),
    LanguageEntry::new("gujarati", "gu"),
    LanguageEntry::new("hebrew", "he"),
    LanguageEntry::new("hindi", "hi"),
    LanguageEntry::new("hungarian", "hu"),
    LanguageEntry::new("indonesian", "id"),
    LanguageEntry::new("italian", "it"),
    LanguageEntry::new("japanese", "ja"),
    LanguageEntry::new("korean", "ko"),
    LanguageEntry::new("malay", "ms"),
    LanguageEntry::new("nepali", "ne"),
    LanguageEntry::new("norwegian", "no"),
    LanguageEntry::new("persian", "fa"),
    LanguageEntry::new("polish", "pl"),
    LanguageEntry::new("portuguese", "pt"),
    LanguageEntry::new("punjabi", "pa"),
    LanguageEntry::new("romanian", "ro"),
    LanguageEntry::new("russian", "ru"),
    LanguageEntry::new("slovak", "sk"),
    LanguageEntry::new("slovenian", "sl"),
    LanguageEntry::new("spanish", "es"),
    LanguageEntry::new("swahili", "sw"),
    LanguageEntry::new("swedish", "sv"),
    LanguageEntry::new("tamil", "ta"),
    LanguageEntry::new("telugu", "te"),
    LanguageEntry::new("thai", "th"),
    LanguageEntry::new("turkish", "tr"),
    LanguageEntry::new("ukrainian", "uk"),
    LanguageEntry::new("urdu", "ur"),
    LanguageEntry::new("vietnamese", "vi"),
];

/// static, ordered list of supported target languages
#[derive(Debug, Clone, Copy)]
pub struct LanguageCatalog {
    entries: &'static [LanguageEntry],
}

impl Default for LanguageCatalog {
    fn default() -> Self {
        Self { entries: LANGUAGES }
    }
}

impl LanguageCatalog {
    pub fn new(entries: &'static [LanguageEntry]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'static [LanguageEntry] {
        self.entries
    }

    pub fn entry_for(&self, display_name: &str) -> Result<&'static LanguageEntry, UnknownLanguage> {
        self.entries
            .iter()
            .find(|entry| entry.display_name == display_name)
            .ok_or_else(|| UnknownLanguage(display_name.to_string()))
    }

    pub fn code_for(&self, display_name: &str) -> Result<&'static str, UnknownLanguage> {
        self.entry_for(display_name).map(|entry| entry.code)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.display_name).collect()
    }

    /// extracts the language name from `lang_<name>` callback data
    pub fn parse_callback(data: &str) -> Option<&str> {
        data.strip_prefix(LANGUAGE_CALLBACK_PREFIX)
    }

    /// language menu: catalog order, two buttons per row
    pub fn create_language_keyboard(&self) -> InlineKeyboardMarkup {
        let rows: Vec<Vec<InlineKeyboardButton>> = self
            .entries
            .chunks(BUTTONS_PER_ROW)
            .map(|pair| {
                pair.iter()
                    .map(|entry| InlineKeyboardButton::callback(entry.label(), entry.callback_data()))
                    .collect()
            })
            .collect();

        InlineKeyboardMarkup::new(rows)
    }
}
