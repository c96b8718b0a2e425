use std::time::Duration;

use tracing::warn;

/// Tunables for the SMS monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MonitorConfig {
    /// Pause between two polling ticks.
    pub(crate) poll_interval: Duration,
    /// How many of the newest inbox messages each tick looks at.
    pub(crate) batch_size: usize,
    /// How many of the newest inbox messages a manual check looks at.
    pub(crate) force_check_batch_size: usize,
    /// Upper bound on remembered message identities.
    pub(crate) ledger_capacity: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            batch_size: 20,
            force_check_batch_size: 10,
            ledger_capacity: 1000,
        }
    }
}

impl MonitorConfig {
    /// Defaults, overridden by `SPENDBOOK_*` environment variables.
    pub(crate) fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            poll_interval: Duration::from_secs(positive(
                &lookup,
                "SPENDBOOK_POLL_INTERVAL_SECS",
                defaults.poll_interval.as_secs(),
            )),
            batch_size: positive(&lookup, "SPENDBOOK_BATCH_SIZE", defaults.batch_size),
            force_check_batch_size: positive(
                &lookup,
                "SPENDBOOK_FORCE_CHECK_BATCH_SIZE",
                defaults.force_check_batch_size,
            ),
            ledger_capacity: positive(
                &lookup,
                "SPENDBOOK_LEDGER_CAPACITY",
                defaults.ledger_capacity,
            ),
        }
    }
}

fn positive<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T
where
    T: std::str::FromStr + PartialOrd + Default + Copy + std::fmt::Display,
{
    let Some(raw) = lookup(name) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(v) if v > T::default() => v,
        _ => {
            warn!(var = name, value = %raw, "ignoring invalid setting, using {default}");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = MonitorConfig::default();
        assert_eq!(cfg.poll_interval, Duration::from_secs(30));
        assert_eq!(cfg.batch_size, 20);
        assert_eq!(cfg.force_check_batch_size, 10);
        assert_eq!(cfg.ledger_capacity, 1000);
    }

    #[test]
    fn test_env_overrides() {
        let cfg = MonitorConfig::from_lookup(lookup_from(&[
            ("SPENDBOOK_POLL_INTERVAL_SECS", "5"),
            ("SPENDBOOK_BATCH_SIZE", "50"),
            ("SPENDBOOK_LEDGER_CAPACITY", "200"),
        ]));
        assert_eq!(cfg.poll_interval, Duration::from_secs(5));
        assert_eq!(cfg.batch_size, 50);
        assert_eq!(cfg.force_check_batch_size, 10);
        assert_eq!(cfg.ledger_capacity, 200);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let cfg = MonitorConfig::from_lookup(lookup_from(&[
            ("SPENDBOOK_POLL_INTERVAL_SECS", "0"),
            ("SPENDBOOK_BATCH_SIZE", "lots"),
            ("SPENDBOOK_LEDGER_CAPACITY", "-3"),
        ]));
        assert_eq!(cfg, MonitorConfig::default());
    }
}
