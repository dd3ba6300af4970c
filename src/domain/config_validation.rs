//! Configuration validation.
//!
//! Checks the `[run]` and `[study]` sections before anything is built from
//! them, so a bad file fails with the section and key at fault.

use crate::domain::error::StudyError;
use crate::ports::config_port::ConfigPort;

pub const RUN_SECTION: &str = "run";
pub const STUDY_SECTION: &str = "study";
pub const INDICATOR_KEY_PREFIX: &str = "indicator.";

pub fn validate_run_config(config: &dyn ConfigPort) -> Result<(), StudyError> {
    validate_cores(config, RUN_SECTION)?;
    validate_overrides(config)?;
    validate_exclude(config)?;
    Ok(())
}

pub fn validate_study_config(config: &dyn ConfigPort) -> Result<(), StudyError> {
    validate_name(config)?;
    validate_cores(config, STUDY_SECTION)?;
    let indicators = indicator_keys(config)?;
    let category = config
        .get_string(STUDY_SECTION, "category")
        .filter(|c| !c.trim().is_empty());

    match (category, indicators.is_empty()) {
        (Some(_), false) => Err(StudyError::ConfigInvalid {
            section: STUDY_SECTION.to_string(),
            key: "category".to_string(),
            reason: "category and indicator keys cannot be combined".to_string(),
        }),
        (None, true) => Err(StudyError::ConfigMissing {
            section: STUDY_SECTION.to_string(),
            key: "indicator.1".to_string(),
        }),
        _ => Ok(()),
    }
}

/// `indicator.N` keys of the study section as (N, key), sorted by N.
pub fn indicator_keys(config: &dyn ConfigPort) -> Result<Vec<(u32, String)>, StudyError> {
    let mut keys = Vec::new();
    for key in config.keys(STUDY_SECTION) {
        let Some(number) = key.strip_prefix(INDICATOR_KEY_PREFIX) else {
            continue;
        };
        let n = number
            .trim()
            .parse::<u32>()
            .map_err(|_| StudyError::ConfigInvalid {
                section: STUDY_SECTION.to_string(),
                key: key.clone(),
                reason: format!("'{}' is not an indicator number", number),
            })?;
        keys.push((n, key));
    }
    keys.sort();
    Ok(keys)
}

fn validate_name(config: &dyn ConfigPort) -> Result<(), StudyError> {
    match config.get_string(STUDY_SECTION, "name") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(StudyError::ConfigMissing {
            section: STUDY_SECTION.to_string(),
            key: "name".to_string(),
        }),
    }
}

fn validate_cores(config: &dyn ConfigPort, section: &str) -> Result<(), StudyError> {
    let Some(raw) = config.get_string(section, "cores") else {
        return Ok(());
    };
    match raw.trim().parse::<i64>() {
        Ok(n) if n >= 0 => Ok(()),
        Ok(_) => Err(StudyError::ConfigInvalid {
            section: section.to_string(),
            key: "cores".to_string(),
            reason: "cores must be non-negative".to_string(),
        }),
        Err(_) => Err(StudyError::ConfigInvalid {
            section: section.to_string(),
            key: "cores".to_string(),
            reason: format!("'{}' is not an integer", raw.trim()),
        }),
    }
}

fn validate_overrides(config: &dyn ConfigPort) -> Result<(), StudyError> {
    for item in config.get_list(RUN_SECTION, "overrides") {
        match item.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() && !value.trim().is_empty() => {}
            _ => {
                return Err(StudyError::ConfigInvalid {
                    section: RUN_SECTION.to_string(),
                    key: "overrides".to_string(),
                    reason: format!("expected key=value, found '{}'", item),
                });
            }
        }
    }
    Ok(())
}

fn validate_exclude(config: &dyn ConfigPort) -> Result<(), StudyError> {
    for kind in config.get_list(RUN_SECTION, "exclude") {
        if kind.contains(char::is_whitespace) {
            return Err(StudyError::ConfigInvalid {
                section: RUN_SECTION.to_string(),
                key: "exclude".to_string(),
                reason: format!("'{}' is not an indicator kind", kind),
            });
        }
    }
    Ok(())
}
