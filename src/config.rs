use std::fmt;
use std::str::FromStr;

use chrono::FixedOffset;

use crate::engine::Policy;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Findings rendered as sentences.
    #[default]
    Messages,
    /// Findings as tagged JSON objects.
    Structured,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Invalid { var: &'static str, value: String },
    Inconsistent(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { var, value } => write!(f, "invalid value for {var}: {value:?}"),
            ConfigError::Inconsistent(msg) => write!(f, "inconsistent policy: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub policy: Policy,
    pub metrics_port: Option<u16>,
    pub output: OutputMode,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; unset variables take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Policy::default();

        let offset_minutes: i32 = parse(&lookup, "SLOTCHECK_UTC_OFFSET_MINUTES")?.unwrap_or(0);
        let utc_offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| ConfigError::Invalid {
                var: "SLOTCHECK_UTC_OFFSET_MINUTES",
                value: offset_minutes.to_string(),
            })?;

        let policy = Policy {
            min_slot_minutes: parse(&lookup, "SLOTCHECK_MIN_SLOT_MINUTES")?
                .unwrap_or(defaults.min_slot_minutes),
            max_slot_minutes: parse(&lookup, "SLOTCHECK_MAX_SLOT_MINUTES")?
                .unwrap_or(defaults.max_slot_minutes),
            long_slot_minutes: parse(&lookup, "SLOTCHECK_LONG_SLOT_MINUTES")?
                .unwrap_or(defaults.long_slot_minutes),
            default_lead_time_hours: parse(&lookup, "SLOTCHECK_LEAD_TIME_HOURS")?
                .unwrap_or(defaults.default_lead_time_hours),
            max_range_months: parse(&lookup, "SLOTCHECK_MAX_RANGE_MONTHS")?
                .unwrap_or(defaults.max_range_months),
            utc_offset,
        };
        if policy.min_slot_minutes > policy.max_slot_minutes {
            return Err(ConfigError::Inconsistent(
                "minimum slot duration exceeds maximum",
            ));
        }

        let output = match lookup("SLOTCHECK_OUTPUT").as_deref() {
            None | Some("messages") => OutputMode::Messages,
            Some("structured") => OutputMode::Structured,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "SLOTCHECK_OUTPUT",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            policy,
            metrics_port: parse(&lookup, "SLOTCHECK_METRICS_PORT")?,
            output,
        })
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => {
            let parsed = value.trim().parse().ok();
            match parsed {
                Some(v) => Ok(Some(v)),
                None => Err(ConfigError::Invalid { var, value }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let c = config(&[]).unwrap();
        assert_eq!(c.policy, Policy::default());
        assert_eq!(c.metrics_port, None);
        assert_eq!(c.output, OutputMode::Messages);
    }

    #[test]
    fn overrides() {
        let c = config(&[
            ("SLOTCHECK_MIN_SLOT_MINUTES", "30"),
            ("SLOTCHECK_LEAD_TIME_HOURS", "48"),
            ("SLOTCHECK_UTC_OFFSET_MINUTES", "-300"),
            ("SLOTCHECK_METRICS_PORT", "9100"),
            ("SLOTCHECK_OUTPUT", "structured"),
        ])
        .unwrap();
        assert_eq!(c.policy.min_slot_minutes, 30);
        assert_eq!(c.policy.default_lead_time_hours, 48);
        assert_eq!(c.policy.utc_offset.local_minus_utc(), -300 * 60);
        assert_eq!(c.metrics_port, Some(9100));
        assert_eq!(c.output, OutputMode::Structured);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            config(&[("SLOTCHECK_MAX_SLOT_MINUTES", "lots")]),
            Err(ConfigError::Invalid {
                var: "SLOTCHECK_MAX_SLOT_MINUTES",
                value: "lots".into()
            })
        );
        assert!(config(&[("SLOTCHECK_OUTPUT", "xml")]).is_err());
        assert!(config(&[("SLOTCHECK_UTC_OFFSET_MINUTES", "100000")]).is_err());
    }

    #[test]
    fn rejects_inverted_duration_bounds() {
        let err = config(&[("SLOTCHECK_MIN_SLOT_MINUTES", "800")]).unwrap_err();
        assert_eq!(err, ConfigError::Inconsistent("minimum slot duration exceeds maximum"));
    }
}
