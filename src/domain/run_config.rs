//! Builds run options and study selectors from configuration.
//!
//! Both builders validate their section first; see
//! [`config_validation`](crate::domain::config_validation).

use crate::domain::config_validation::{
    RUN_SECTION, STUDY_SECTION, indicator_keys, validate_run_config, validate_study_config,
};
use crate::domain::descriptor_parser;
use crate::domain::dispatcher::Selector;
use crate::domain::error::StudyError;
use crate::domain::options::StudyOptions;
use crate::domain::study::Study;
use crate::domain::value::ParamValue;
use crate::ports::config_port::ConfigPort;
use tracing::warn;

/// `[run]` section as [`StudyOptions`]. Missing keys keep their defaults.
pub fn build_options(config: &dyn ConfigPort) -> Result<StudyOptions, StudyError> {
    validate_run_config(config)?;
    let defaults = StudyOptions::default();

    let cores = match config.get_string(RUN_SECTION, "cores") {
        Some(_) => config.get_int(RUN_SECTION, "cores", 0).max(0) as usize,
        None => defaults.cores,
    };

    let mut options = defaults
        .with_cores(cores)
        .ordered(config.get_bool(RUN_SECTION, "ordered", false))
        .verbose(config.get_bool(RUN_SECTION, "verbose", false))
        .timed(config.get_bool(RUN_SECTION, "timed", false))
        .strict_columns(config.get_bool(RUN_SECTION, "strict_columns", false))
        .force_parallel(config.get_bool(RUN_SECTION, "force_parallel", false))
        .exclude(config.get_list(RUN_SECTION, "exclude"));

    for item in config.get_list(RUN_SECTION, "overrides") {
        if let Some((key, value)) = item.split_once('=') {
            options = options.with_override(key.trim(), ParamValue::parse(value.trim()));
        }
    }
    Ok(options)
}

/// `[study]` section as a [`Selector`]: a category when `category` is set,
/// otherwise a study built from the `indicator.N` keys in ascending `N`.
pub fn build_selector(config: &dyn ConfigPort) -> Result<Selector, StudyError> {
    validate_study_config(config)?;

    if let Some(category) = config
        .get_string(STUDY_SECTION, "category")
        .filter(|c| !c.trim().is_empty())
    {
        return Ok(Selector::Category(category.trim().to_string()));
    }

    let name = config
        .get_string(STUDY_SECTION, "name")
        .unwrap_or_default();
    let description = config
        .get_string(STUDY_SECTION, "description")
        .unwrap_or_default();

    let mut ta = Vec::new();
    for (_, key) in indicator_keys(config)? {
        let text = config.get_string(STUDY_SECTION, &key).unwrap_or_default();
        let descriptor = descriptor_parser::parse_one(&text).map_err(|e| {
            warn!(key = %key, "{}", e.display_with_context(&text));
            e
        })?;
        ta.push(descriptor);
    }

    let mut study = Study::new(name.trim(), ta)?.with_description(description);
    if config.get_string(STUDY_SECTION, "cores").is_some() {
        study = study.with_cores(config.get_int(STUDY_SECTION, "cores", 0).max(0) as usize);
    }
    Ok(Selector::Study(study))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;
    use crate::domain::descriptor::IndicatorDescriptor;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn options_from_run_section() {
        let config = make_config(
            r#"
[run]
cores = 3
ordered = true
timed = yes
strict_columns = 1
exclude = OBV, ha
overrides = length=10, std=1.5
"#,
        );
        let options = build_options(&config).unwrap();
        assert_eq!(options.cores, 3);
        assert!(options.ordered);
        assert!(options.timed);
        assert!(options.strict_columns);
        assert!(!options.verbose);
        assert!(!options.force_parallel);
        assert!(options.is_excluded("obv"));
        assert!(options.is_excluded("ha"));
        assert_eq!(options.overrides.get("length"), Some(&ParamValue::Int(10)));
        assert_eq!(options.overrides.get("std"), Some(&ParamValue::Float(1.5)));
    }

    #[test]
    fn missing_run_section_uses_defaults() {
        let config = make_config("[study]\nname = x\ncategory = trend\n");
        assert_eq!(build_options(&config).unwrap(), StudyOptions::default());
    }

    #[test]
    fn invalid_run_section_is_rejected() {
        let config = make_config("[run]\ncores = -1\n");
        assert!(matches!(
            build_options(&config),
            Err(StudyError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn selector_from_category() {
        let config = make_config("[study]\nname = Momentum\ncategory = Momentum\n");
        assert_eq!(
            build_selector(&config).unwrap(),
            Selector::Category("Momentum".into())
        );
    }

    #[test]
    fn selector_from_indicator_keys() {
        let config = make_config(
            r#"
[study]
name = Chained
description = cumulative log return smoothed
cores = 0
indicator.2 = ema close=CUMLOGRET_1 length=5
indicator.1 = log_return cumulative=true
"#,
        );
        let Selector::Study(study) = build_selector(&config).unwrap() else {
            panic!("expected a study selector");
        };
        assert_eq!(study.name, "Chained");
        assert_eq!(study.description, "cumulative log return smoothed");
        assert_eq!(study.cores, Some(0));
        assert_eq!(
            study.descriptors(),
            &[
                IndicatorDescriptor::new("log_return").arg("cumulative", true),
                IndicatorDescriptor::new("ema")
                    .arg("close", "CUMLOGRET_1")
                    .arg("length", 5i64),
            ]
        );
    }

    #[test]
    fn bad_descriptor_text_is_a_parse_error() {
        let config = make_config("[study]\nname = Bad\nindicator.1 = sma length 50\n");
        assert!(matches!(
            build_selector(&config),
            Err(StudyError::DescriptorParse(_))
        ));
    }
}
