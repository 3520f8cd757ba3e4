//! Registry configuration.

use crate::crypto::CommitmentScheme;
use crate::error::RegistryError;
use serde::{Deserialize, Serialize};

/// Entry fee used when none is configured
pub const DEFAULT_ENTRY_FEE: u64 = 1000;

/// 48 hours
pub const DEFAULT_REFUND_TIMEOUT_SECS: u64 = 48 * 60 * 60;

/// Parameters fixed when a registry is constructed
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Stake each player must put in, exactly
    pub entry_fee: u64,
    /// Seconds after join before an unrevealed game can be refunded
    pub refund_timeout_secs: u64,
    pub commitment_scheme: CommitmentScheme,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            entry_fee: DEFAULT_ENTRY_FEE,
            refund_timeout_secs: DEFAULT_REFUND_TIMEOUT_SECS,
            commitment_scheme: CommitmentScheme::default(),
        }
    }
}

impl RegistryConfig {
    pub fn with_entry_fee(mut self, entry_fee: u64) -> Self {
        self.entry_fee = entry_fee;
        self
    }

    pub fn with_refund_timeout(mut self, secs: u64) -> Self {
        self.refund_timeout_secs = secs;
        self
    }

    pub fn with_commitment_scheme(mut self, scheme: CommitmentScheme) -> Self {
        self.commitment_scheme = scheme;
        self
    }

    /// Reject configurations a registry cannot run with
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.entry_fee == 0 {
            return Err(RegistryError::InvalidConfig(
                "entry fee must be positive".to_string(),
            ));
        }
        // A full pot must be representable
        if self.entry_fee.checked_mul(2).is_none() {
            return Err(RegistryError::InvalidConfig(format!(
                "entry fee {} overflows the pot",
                self.entry_fee
            )));
        }
        if self.refund_timeout_secs == 0 {
            return Err(RegistryError::InvalidConfig(
                "refund timeout must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();
        assert_eq!(config.entry_fee, 1000);
        assert_eq!(config.refund_timeout_secs, 172_800);
        assert_eq!(config.commitment_scheme, CommitmentScheme::BoundToPlayer);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_configs() {
        assert!(RegistryConfig::default().with_entry_fee(0).validate().is_err());
        assert!(RegistryConfig::default()
            .with_entry_fee(u64::MAX)
            .validate()
            .is_err());
        assert!(RegistryConfig::default()
            .with_refund_timeout(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RegistryConfig = serde_json::from_str(r#"{"entry_fee": 250}"#).unwrap();
        assert_eq!(config.entry_fee, 250);
        assert_eq!(config.refund_timeout_secs, DEFAULT_REFUND_TIMEOUT_SECS);
    }
}
