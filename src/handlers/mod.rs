pub mod callback_handler;
pub mod command_handler;
pub mod text_handler;

pub use callback_handler::CallbackHandler;
pub use command_handler::CommandHandler;
pub use text_handler::TextHandler;

use teloxide::types::{InlineKeyboardMarkup, ParseMode, UserId};

/// where a user is in the conversation.
///
/// Never stored: it follows from the pending store contents and a fresh gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Unauthenticated,
    AwaitingText,
    AwaitingLanguageChoice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// new message in the user's chat
    Send,
    /// replace the text of the message whose button was pressed
    Edit,
}

/// the one outgoing message an event produces
#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub parse_mode: Option<ParseMode>,
    pub markup: Option<InlineKeyboardMarkup>,
    pub delivery: Delivery,
}

impl Reply {
    pub fn send(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: None,
            markup: None,
            delivery: Delivery::Send,
        }
    }

    pub fn edit(text: impl Into<String>) -> Self {
        Self {
            delivery: Delivery::Edit,
            ..Self::send(text)
        }
    }

    pub fn html(mut self) -> Self {
        self.parse_mode = Some(ParseMode::Html);
        self
    }

    pub fn with_markup(mut self, markup: InlineKeyboardMarkup) -> Self {
        self.markup = Some(markup);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Transition {
    /// `None` leaves the user's state as it was
    pub state: Option<InteractionState>,
    pub reply: Reply,
}

impl Transition {
    pub fn to(state: InteractionState, reply: Reply) -> Self {
        Self {
            state: Some(state),
            reply,
        }
    }

    pub fn stay(reply: Reply) -> Self {
        Self { state: None, reply }
    }
}

/// the sender of an event, as much as the handlers need
#[derive(Debug, Clone)]
pub struct UserInfo {
    pub id: UserId,
    pub full_name: String,
}
