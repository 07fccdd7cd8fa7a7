//! Loading policies from JSON / environment and swapping them at runtime.

use std::path::Path;
use std::sync::{Arc, RwLock};

use anyhow::Context;
use thiserror::Error;
use tracing::{debug, info, warn};

use replenish_core::DomainError;

use crate::config::PolicyConfig;

pub const ENV_MIN_ORDER_VALUE: &str = "REPLENISH_MIN_ORDER_VALUE";
pub const ENV_DEFAULT_COVERAGE_DAYS: &str = "REPLENISH_DEFAULT_COVERAGE_DAYS";
pub const ENV_ORDER_FREQUENCY_DEFAULT_DAYS: &str = "REPLENISH_ORDER_FREQUENCY_DEFAULT_DAYS";
pub const ENV_POLICY_VERSION: &str = "REPLENISH_POLICY_VERSION";

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("policy document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("policy rejected: {0}")]
    Invalid(#[from] DomainError),

    #[error("override {key}={value:?} is not a valid value")]
    Override { key: &'static str, value: String },
}

impl PolicyConfig {
    /// Parse a (possibly partial) JSON document; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, PolicyError> {
        let policy: PolicyConfig = serde_json::from_str(json)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Apply `REPLENISH_*` overrides from `lookup` (usually `std::env::var`).
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, PolicyError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_MIN_ORDER_VALUE) {
            self.min_order_value_default = parse_override(ENV_MIN_ORDER_VALUE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_DEFAULT_COVERAGE_DAYS) {
            self.coverage_days.default = parse_override(ENV_DEFAULT_COVERAGE_DAYS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_ORDER_FREQUENCY_DEFAULT_DAYS) {
            self.order_frequency.default_days = parse_override(ENV_ORDER_FREQUENCY_DEFAULT_DAYS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_POLICY_VERSION) {
            self.version = parse_override(ENV_POLICY_VERSION, &raw)?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, PolicyError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }
}

fn parse_override<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, PolicyError> {
    raw.trim().parse::<T>().map_err(|_| PolicyError::Override {
        key,
        value: raw.to_string(),
    })
}

/// Load a policy file, then apply environment overrides.
pub fn load_from_path(path: impl AsRef<Path>) -> anyhow::Result<PolicyConfig> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read policy file {}", path.display()))?;
    let policy = PolicyConfig::from_json_str(&raw)
        .and_then(PolicyConfig::with_env_overrides)
        .with_context(|| format!("failed to load policy from {}", path.display()))?;
    info!(path = %path.display(), version = policy.version, "policy loaded");
    Ok(policy)
}

/// Hot-reloadable policy handle.
///
/// Readers take an `Arc` snapshot with `current()` and keep using it for the
/// whole computation; `replace()` only affects later snapshots.
#[derive(Debug)]
pub struct SharedPolicy {
    inner: RwLock<Arc<PolicyConfig>>,
}

impl SharedPolicy {
    pub fn new(policy: PolicyConfig) -> Result<Self, PolicyError> {
        policy.validate()?;
        Ok(Self {
            inner: RwLock::new(Arc::new(policy)),
        })
    }

    pub fn current(&self) -> Arc<PolicyConfig> {
        match self.inner.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Swap in a new policy. Invalid policies are rejected and the old one stays.
    pub fn replace(&self, policy: PolicyConfig) -> Result<Arc<PolicyConfig>, PolicyError> {
        if let Err(e) = policy.validate() {
            warn!(version = policy.version, error = %e, "rejected policy reload");
            return Err(e.into());
        }
        let next = Arc::new(policy);
        let mut guard = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let previous = std::mem::replace(&mut *guard, Arc::clone(&next));
        debug!(from = previous.version, to = next.version, "policy replaced");
        Ok(previous)
    }
}

impl Default for SharedPolicy {
    fn default() -> Self {
        Self {
            inner: RwLock::new(Arc::new(PolicyConfig::default())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn partial_json_keeps_defaults() {
        let policy = PolicyConfig::from_json_str(
            r#"{
                "version": 7,
                "min_order_value_by_supplier": { "Fresh Farms": 1500.0 },
                "coverage_days": { "critical": 4 }
            }"#,
        )
        .unwrap();

        assert_eq!(policy.version, 7);
        assert_eq!(policy.coverage_days.critical, 4);
        assert_eq!(policy.coverage_days.high, 7);
        assert_eq!(policy.min_order_value("Fresh Farms"), 1500.0);
        assert_eq!(policy.min_order_value("Other"), 500.0);
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = PolicyConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, PolicyError::Parse(_)));
    }

    #[test]
    fn inconsistent_document_is_rejected() {
        let err = PolicyConfig::from_json_str(
            r#"{ "order_frequency": { "min_days": 40, "max_days": 20 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, PolicyError::Invalid(_)));
    }

    #[test]
    fn overrides_are_applied_from_lookup() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_MIN_ORDER_VALUE, "750.5"),
            (ENV_DEFAULT_COVERAGE_DAYS, " 9 "),
            (ENV_POLICY_VERSION, "3"),
        ]);
        let policy = PolicyConfig::default()
            .with_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(policy.min_order_value_default, 750.5);
        assert_eq!(policy.coverage_days.default, 9);
        assert_eq!(policy.version, 3);
        assert_eq!(policy.order_frequency.default_days, 30);
    }

    #[test]
    fn malformed_override_is_reported_with_its_key() {
        let err = PolicyConfig::default()
            .with_overrides(|key| (key == ENV_DEFAULT_COVERAGE_DAYS).then(|| "soon".to_string()))
            .unwrap_err();
        match err {
            PolicyError::Override { key, value } => {
                assert_eq!(key, ENV_DEFAULT_COVERAGE_DAYS);
                assert_eq!(value, "soon");
            }
            other => panic!("expected override error, got {other:?}"),
        }
    }

    #[test]
    fn load_from_missing_path_carries_context() {
        let err = load_from_path("/definitely/not/here/policy.json").unwrap_err();
        assert!(format!("{err:#}").contains("failed to read policy file"));
    }

    #[test]
    fn shared_policy_swaps_snapshots() {
        let shared = SharedPolicy::default();
        let before = shared.current();

        let previous = shared.replace(PolicyConfig::default().with_version(2)).unwrap();
        assert_eq!(previous.version, 1);

        // Snapshots taken earlier are unaffected.
        assert_eq!(before.version, 1);
        assert_eq!(shared.current().version, 2);
    }

    #[test]
    fn shared_policy_keeps_old_rules_on_invalid_reload() {
        let shared = SharedPolicy::default();
        let mut bad = PolicyConfig::default().with_version(9);
        bad.coverage_days.low = 0;

        assert!(shared.replace(bad).is_err());
        assert_eq!(shared.current().version, 1);
    }
}
