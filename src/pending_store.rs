use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use teloxide::types::UserId;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
pub struct PendingText {
    pub text: String,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

impl PendingText {
    /// time since submission, zero if the clock went backwards
    pub fn age(&self) -> chrono::Duration {
        (chrono::Utc::now() - self.submitted_at).max(chrono::Duration::zero())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingNotFound(pub UserId);

impl fmt::Display for PendingNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No pending text for user {}", self.0 .0)
    }
}

impl Error for PendingNotFound {}

/// last submitted text per user, waiting for a language choice.
///
/// Cloning shares the same map. Entries are never removed; a new submission
/// replaces the previous one.
#[derive(Clone, Default)]
pub struct PendingStore {
    texts: Arc<Mutex<HashMap<UserId, PendingText>>>,
}

impl PendingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, user_id: UserId, text: impl Into<String>) {
        let mut texts = self.texts.lock().await;
        texts.insert(
            user_id,
            PendingText {
                text: text.into(),
                submitted_at: chrono::Utc::now(),
            },
        );
    }

    /// returns the pending text without removing it
    pub async fn take(&self, user_id: UserId) -> Result<String, PendingNotFound> {
        self.take_entry(user_id).await.map(|pending| pending.text)
    }

    /// like `take`, with the submission time
    pub async fn take_entry(&self, user_id: UserId) -> Result<PendingText, PendingNotFound> {
        let texts = self.texts.lock().await;
        texts.get(&user_id).cloned().ok_or(PendingNotFound(user_id))
    }

    pub async fn len(&self) -> usize {
        self.texts.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.texts.lock().await.is_empty()
    }
}
