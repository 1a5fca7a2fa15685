// src/config/validate.rs

use crate::config::model::{RawSettings, Settings};
use crate::errors::{PoulError, Result};

impl TryFrom<RawSettings> for Settings {
    type Error = PoulError;

    fn try_from(raw: RawSettings) -> std::result::Result<Self, Self::Error> {
        validate_raw_settings(&raw)?;
        Ok(Settings::new_unchecked(raw.shell, raw.watch))
    }
}

fn validate_raw_settings(raw: &RawSettings) -> Result<()> {
    validate_shell(raw)?;
    validate_watch(raw)?;
    Ok(())
}

fn validate_shell(raw: &RawSettings) -> Result<()> {
    if raw.shell.program.trim().is_empty() {
        return Err(PoulError::ConfigError(
            "[shell].program must not be empty".to_string(),
        ));
    }
    if raw.shell.flags.iter().any(|f| f == "-c") {
        return Err(PoulError::ConfigError(
            "[shell].flags must not contain -c (it is added before the step body)".to_string(),
        ));
    }
    Ok(())
}

fn validate_watch(raw: &RawSettings) -> Result<()> {
    if raw.watch.tick_ms == 0 {
        return Err(PoulError::ConfigError(
            "[watch].tick_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    if raw.watch.settle_ms == 0 {
        return Err(PoulError::ConfigError(
            "[watch].settle_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Settings::try_from(RawSettings::default()).is_ok());
    }

    #[test]
    fn dash_c_in_flags_is_rejected() {
        let mut raw = RawSettings::default();
        raw.shell.flags.push("-c".to_string());

        let err = Settings::try_from(raw).unwrap_err();
        assert!(err.to_string().contains("-c"));
    }

    #[test]
    fn zero_settle_is_rejected() {
        let mut raw = RawSettings::default();
        raw.watch.settle_ms = 0;
        assert!(Settings::try_from(raw).is_err());
    }
}
