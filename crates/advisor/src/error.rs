//! Top-level advisor errors.

use thiserror::Error;

use crate::gateway::GatewayError;
use crate::registry::RegistryError;

/// Errors surfaced by the advisory service.
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl AdvisorError {
    /// Fixed Bangla message safe to show the shop owner. Internal detail
    /// stays in the logs.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        "মুন্সিজি সেবা বর্তমানে অনুপলব্ধ। পরে আবার চেষ্টা করুন।"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_is_stable() {
        let err = AdvisorError::Gateway(GatewayError::EmptyResponse);
        assert_eq!(err.user_message(), "মুন্সিজি সেবা বর্তমানে অনুপলব্ধ। পরে আবার চেষ্টা করুন।");
    }
}
