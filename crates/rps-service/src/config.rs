//! Service configuration from the environment.

use rps_core::{CommitmentScheme, RegistryConfig};

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub port: u16,
    pub registry: RegistryConfig,
    /// Drive the registry from a manual clock advanced by `/api/system/tick`
    pub simulated_clock: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            registry: RegistryConfig::default(),
            simulated_clock: true,
        }
    }
}

impl ServiceConfig {
    /// Read `PORT`, `RPS_ENTRY_FEE`, `RPS_REFUND_TIMEOUT_SECS`,
    /// `RPS_COMMITMENT_SCHEME` and `RPS_SIMULATED_CLOCK`, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = lookup("PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);
        let entry_fee = lookup("RPS_ENTRY_FEE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.registry.entry_fee);
        let refund_timeout = lookup("RPS_REFUND_TIMEOUT_SECS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.registry.refund_timeout_secs);
        let scheme = match lookup("RPS_COMMITMENT_SCHEME") {
            Some(s) => s.parse::<CommitmentScheme>().unwrap_or_else(|e| {
                tracing::warn!("{}, using default", e);
                defaults.registry.commitment_scheme
            }),
            None => defaults.registry.commitment_scheme,
        };
        let simulated_clock = lookup("RPS_SIMULATED_CLOCK")
            .map(|s| matches!(s.as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.simulated_clock);

        Self {
            port,
            registry: RegistryConfig::default()
                .with_entry_fee(entry_fee)
                .with_refund_timeout(refund_timeout)
                .with_commitment_scheme(scheme),
            simulated_clock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(vars: &[(&str, &str)]) -> ServiceConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServiceConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = from_map(&[]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.registry, RegistryConfig::default());
        assert!(config.simulated_clock);
    }

    #[test]
    fn test_reads_overrides() {
        let config = from_map(&[
            ("PORT", "8080"),
            ("RPS_ENTRY_FEE", "250"),
            ("RPS_REFUND_TIMEOUT_SECS", "60"),
            ("RPS_COMMITMENT_SCHEME", "move_and_salt"),
            ("RPS_SIMULATED_CLOCK", "false"),
        ]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.registry.entry_fee, 250);
        assert_eq!(config.registry.refund_timeout_secs, 60);
        assert_eq!(
            config.registry.commitment_scheme,
            CommitmentScheme::MoveAndSalt
        );
        assert!(!config.simulated_clock);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = from_map(&[("RPS_ENTRY_FEE", "lots"), ("RPS_COMMITMENT_SCHEME", "md5")]);
        assert_eq!(config.registry.entry_fee, 1000);
        assert_eq!(
            config.registry.commitment_scheme,
            CommitmentScheme::BoundToPlayer
        );
    }
}
