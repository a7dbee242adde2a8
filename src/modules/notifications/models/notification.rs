use crate::core::{AppError, ParamSet, Result};
use crate::modules::gateways::models::SUCCESS;
use crate::modules::gateways::services::wire;

/// Reply body used when even the reply itself cannot be encoded
pub const FALLBACK_FAIL_REPLY: &str = "<xml><return_code><![CDATA[FAIL]]></return_code>\
    <return_msg><![CDATA[internal error]]></return_msg></xml>";

/// Steps a notification goes through.
///
/// `SignatureChecked` records that the check ran; whether it passed shows in
/// the state that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyState {
    Received,
    SignatureChecked,
    Rejected,
    OrderVerified,
    Replied,
}

/// Body returned to the gateway for a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyReply {
    pub return_code: String,
    pub return_msg: String,
}

impl NotifyReply {
    pub fn success() -> Self {
        Self {
            return_code: SUCCESS.to_string(),
            return_msg: "OK".to_string(),
        }
    }

    pub fn fail(msg: impl Into<String>) -> Self {
        Self {
            return_code: "FAIL".to_string(),
            return_msg: msg.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.return_code == SUCCESS
    }

    pub fn to_params(&self) -> ParamSet {
        [
            ("return_code", self.return_code.as_str()),
            ("return_msg", self.return_msg.as_str()),
        ]
        .into_iter()
        .collect()
    }

    /// Wire body; falls back to a fixed failure payload if encoding fails
    pub fn to_xml(&self) -> String {
        wire::to_xml(&self.to_params()).unwrap_or_else(|_| FALLBACK_FAIL_REPLY.to_string())
    }
}

/// Result of handling one notification
#[derive(Debug)]
pub struct NotifyOutcome<T> {
    /// States visited, ending with `Replied`
    pub states: Vec<NotifyState>,
    pub reply: NotifyReply,
    /// Consumer's return value, or the reason the notification was rejected
    pub result: Result<T>,
}

impl<T> NotifyOutcome<T> {
    pub fn rejected(mut states: Vec<NotifyState>, reason: AppError) -> Self {
        states.push(NotifyState::Rejected);
        states.push(NotifyState::Replied);
        Self {
            states,
            reply: NotifyReply::fail(reason.to_string()),
            result: Err(reason),
        }
    }

    /// The notification passed both the signature and order checks
    pub fn was_verified(&self) -> bool {
        self.states.contains(&NotifyState::OrderVerified)
    }

    pub fn final_state(&self) -> Option<NotifyState> {
        self.states.last().copied()
    }
}
