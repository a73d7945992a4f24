//! CLI command implementations.

pub mod check;
pub mod config;
pub mod rules;
pub mod schedule;

use std::path::Path;

use shiftguard::{Shiftguard, ShiftguardConfig};
use tracing::info;

/// Result of a command that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing blocks the schedule.
    Clean,
    /// Violations were found and the caller asked to fail on them.
    Violations,
}

impl Outcome {
    /// Process exit status for this outcome.
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Clean => 0,
            Outcome::Violations => 2,
        }
    }

    fn from_violations(has_violations: bool, fail_on_violation: bool) -> Self {
        if has_violations && fail_on_violation {
            Outcome::Violations
        } else {
            Outcome::Clean
        }
    }
}

/// Load the rule set, falling back to the built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<ShiftguardConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let config = ShiftguardConfig::from_json_file(path)?;
            info!(path = %path.display(), "loaded rule set");
            Ok(config)
        }
        None => Ok(ShiftguardConfig::default()),
    }
}

/// Build the engine for one invocation.
pub fn engine(config: Option<&Path>, strict: bool) -> Result<Shiftguard, Box<dyn std::error::Error>> {
    let config = load_config(config)?;
    Ok(Shiftguard::with_config(config)?.strict(strict))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_outcome_exit_codes() {
        assert_eq!(Outcome::from_violations(true, false), Outcome::Clean);
        assert_eq!(Outcome::from_violations(false, true), Outcome::Clean);
        assert_eq!(Outcome::from_violations(true, true).exit_code(), 2);
        assert_eq!(Outcome::Clean.exit_code(), 0);
    }

    #[test]
    fn test_load_config_default_without_path() {
        let config = load_config(None).unwrap();
        assert_eq!(config, ShiftguardConfig::default());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"policy": {{"max_consecutive_workdays": 5}}}}"#).unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.policy.max_consecutive_workdays, 5);
    }

    #[test]
    fn test_engine_rejects_missing_config() {
        assert!(engine(Some(Path::new("/nonexistent/rules.json")), false).is_err());
    }
}
