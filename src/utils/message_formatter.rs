/// telegram's hard limit for a single message, in UTF-16 code units
pub const MAX_MESSAGE_LENGTH: usize = 4096;

pub struct MessageFormatter;

impl MessageFormatter {
    pub fn escape_html(text: &str) -> String {
        html_escape::encode_text(text).to_string()
    }

    /// html mention link for a user, safe for ParseMode::Html
    pub fn mention_html(user_id: u64, full_name: &str) -> String {
        format!(
            "<a href=\"tg://user?id={}\">{}</a>",
            user_id,
            Self::escape_html(full_name)
        )
    }

    /// upper-cases the first character only: "french" -> "French"
    pub fn capitalize(text: &str) -> String {
        let mut chars = text.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// counts UTF-16 code units as Telegram does for message length limits
    pub fn count_utf16_code_units(text: &str) -> usize {
        text.encode_utf16().count()
    }

    /// cuts text down to `max_length` UTF-16 code units, ending with an ellipsis if cut
    pub fn truncate_to_limit(text: &str, max_length: usize) -> String {
        if Self::count_utf16_code_units(text) <= max_length {
            return text.to_string();
        }

        // reserve one unit for the ellipsis
        let budget = max_length.saturating_sub(1);
        let mut used = 0;
        let mut result = String::new();
        for ch in text.chars() {
            let width = ch.len_utf16();
            if used + width > budget {
                break;
            }
            used += width;
            result.push(ch);
        }
        result.push('…');
        result
    }
}
