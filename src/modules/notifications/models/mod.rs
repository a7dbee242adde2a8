pub mod notification;

pub use notification::{NotifyOutcome, NotifyReply, NotifyState, FALLBACK_FAIL_REPLY};
