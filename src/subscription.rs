use async_trait::async_trait;
use log::{info, warn};
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::types::{ChatMemberStatus, Recipient, UserId};
use teloxide::{ApiError, RequestError};
use tokio::time::timeout;

pub const DEFAULT_GATE_TIMEOUT_SECS: u64 = 10;

/// channel membership as reported by the messaging platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStatus {
    Creator,
    Administrator,
    Member,
    Restricted,
    Left,
    Banned,
}

impl MemberStatus {
    pub fn grants_access(&self) -> bool {
        matches!(
            self,
            MemberStatus::Creator | MemberStatus::Administrator | MemberStatus::Member
        )
    }
}

impl From<ChatMemberStatus> for MemberStatus {
    fn from(status: ChatMemberStatus) -> Self {
        match status {
            ChatMemberStatus::Owner => MemberStatus::Creator,
            ChatMemberStatus::Administrator => MemberStatus::Administrator,
            ChatMemberStatus::Member => MemberStatus::Member,
            ChatMemberStatus::Restricted => MemberStatus::Restricted,
            ChatMemberStatus::Left => MemberStatus::Left,
            ChatMemberStatus::Banned => MemberStatus::Banned,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionStatus {
    Subscribed,
    NotSubscribed,
    /// the membership query failed; treated as not subscribed
    Unknown,
}

impl SubscriptionStatus {
    pub fn is_subscribed(&self) -> bool {
        matches!(self, SubscriptionStatus::Subscribed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipError {
    Network(String),
    /// bot lacks the rights to read the member list
    Permission(String),
    UnknownChannel(String),
    UnknownUser(u64),
    RateLimited(String),
    Timeout(Duration),
    Other(String),
}

impl fmt::Display for MembershipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MembershipError::Network(e) => write!(f, "Network error: {}", e),
            MembershipError::Permission(e) => write!(f, "Permission denied: {}", e),
            MembershipError::UnknownChannel(channel) => write!(f, "Unknown channel: {}", channel),
            MembershipError::UnknownUser(user_id) => write!(f, "Unknown user: {}", user_id),
            MembershipError::RateLimited(e) => write!(f, "Rate limited: {}", e),
            MembershipError::Timeout(after) => {
                write!(f, "Membership check timed out after {:?}", after)
            }
            MembershipError::Other(e) => write!(f, "Membership check failed: {}", e),
        }
    }
}

impl Error for MembershipError {}

impl MembershipError {
    pub fn from_request_error(err: RequestError, channel: &str, user_id: UserId) -> Self {
        match err {
            RequestError::Network(e) => MembershipError::Network(e.to_string()),
            RequestError::RetryAfter(after) => MembershipError::RateLimited(format!("{:?}", after)),
            RequestError::Api(ApiError::ChatNotFound) => {
                MembershipError::UnknownChannel(channel.to_string())
            }
            RequestError::Api(ApiError::UserNotFound) => MembershipError::UnknownUser(user_id.0),
            RequestError::Api(api_error) => {
                let description = api_error.to_string();
                let lowered = description.to_lowercase();
                if lowered.contains("forbidden")
                    || lowered.contains("inaccessible")
                    || lowered.contains("not enough rights")
                {
                    MembershipError::Permission(description)
                } else {
                    MembershipError::Other(description)
                }
            }
            other => MembershipError::Other(other.to_string()),
        }
    }
}

/// the platform side of the gate: who is in which channel
#[async_trait]
pub trait MembershipSource: Send + Sync {
    async fn member_status(
        &self,
        channel_username: &str,
        user_id: UserId,
    ) -> Result<MemberStatus, MembershipError>;
}

/// membership lookups through the Bot API `getChatMember` method
pub struct TelegramMembership {
    bot: Arc<Bot>,
}

impl TelegramMembership {
    pub fn new(bot: Arc<Bot>) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl MembershipSource for TelegramMembership {
    async fn member_status(
        &self,
        channel_username: &str,
        user_id: UserId,
    ) -> Result<MemberStatus, MembershipError> {
        let recipient = Recipient::ChannelUsername(format!("@{}", channel_username));
        let member = self
            .bot
            .get_chat_member(recipient, user_id)
            .await
            .map_err(|e| MembershipError::from_request_error(e, channel_username, user_id))?;
        Ok(MemberStatus::from(member.kind.status()))
    }
}

/// checks that a user is subscribed to the configured channel.
///
/// Fails closed: any error from the platform means "not subscribed".
/// Nothing is cached, every call asks the platform again.
#[derive(Clone)]
pub struct SubscriptionGate {
    source: Arc<dyn MembershipSource>,
    channel_username: String,
    timeout: Duration,
}

impl SubscriptionGate {
    pub fn new(source: Arc<dyn MembershipSource>, channel_username: impl Into<String>) -> Self {
        Self {
            source,
            channel_username: channel_username.into(),
            timeout: Duration::from_secs(DEFAULT_GATE_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn channel_username(&self) -> &str {
        &self.channel_username
    }

    pub async fn check(&self, user_id: UserId) -> SubscriptionStatus {
        let lookup = timeout(
            self.timeout,
            self.source.member_status(&self.channel_username, user_id),
        )
        .await
        .unwrap_or(Err(MembershipError::Timeout(self.timeout)));

        match lookup {
            Ok(status) if status.grants_access() => SubscriptionStatus::Subscribed,
            Ok(status) => {
                info!(
                    "User {} is not subscribed to @{} (status: {:?})",
                    user_id.0, self.channel_username, status
                );
                SubscriptionStatus::NotSubscribed
            }
            Err(e) => {
                match &e {
                    MembershipError::Permission(_) | MembershipError::UnknownChannel(_) => warn!(
                        "Subscription check misconfigured for @{} (user {}): {}",
                        self.channel_username, user_id.0, e
                    ),
                    _ => warn!(
                        "Subscription check failed for user {} in @{}: {}",
                        user_id.0, self.channel_username, e
                    ),
                }
                SubscriptionStatus::Unknown
            }
        }
    }

    pub async fn is_subscribed(&self, user_id: UserId) -> bool {
        self.check(user_id).await.is_subscribed()
    }
}
