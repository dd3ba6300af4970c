//! End-to-end study runs through the public engine API.

mod common;

use common::*;
use tastudy::adapters::speed_table::SpeedTable;
use tastudy::domain::category::Category;
use tastudy::domain::error::{IndicatorError, StudyError};
use tastudy::domain::value::ParamValue;
use tastudy::{
    ExecutionMode, Frame, IndicatorDescriptor, Selector, Study, StudyEngine, StudyOptions,
    StudyReport,
};

fn engine() -> StudyEngine {
    StudyEngine::builtin().unwrap()
}

fn parallel() -> StudyOptions {
    StudyOptions::default().with_cores(2)
}

/// Drop what a run added, the way a test fixture resets shared data.
fn reset(frame: &mut Frame, report: &StudyReport) {
    frame.drop(report.columns.as_slice());
    assert_eq!(frame.shape().1, BASE_COLUMNS);
}

mod custom_studies {
    use super::*;

    #[test]
    fn rsi_macd_sma_adds_five_columns() {
        let study = Study::new(
            "Momo and Volatility",
            [
                IndicatorDescriptor::new("rsi"),
                IndicatorDescriptor::new("macd"),
                IndicatorDescriptor::new("sma").arg("length", 50i64),
            ],
        )
        .unwrap()
        .with_description("MACD and RSI Momo with SMA 50");

        let runs = [
            (StudyOptions::sequential(), ExecutionMode::Sequential, 0),
            (parallel(), ExecutionMode::Parallel, 2),
        ];
        let mut frames = Vec::new();
        for (options, mode, cores) in runs {
            let mut frame = sample_frame(200);
            let report = engine().study(&mut frame, study.clone(), &options).unwrap();

            assert_eq!(report.mode, mode);
            assert_eq!(report.cores, cores);
            assert_eq!(report.added, 5);
            assert_eq!(frame.shape(), (200, 10));
            assert_eq!(
                report.columns,
                vec!["RSI_14", "MACD_12_26_9", "MACDh_12_26_9", "MACDs_12_26_9", "SMA_50"]
            );
            assert!(report.failures().is_empty());
            frames.push(frame);
        }
        assert_frames_match(&frames[0], &frames[1]);
    }

    #[test]
    fn chained_study_runs_sequentially() {
        let mut frame = sample_frame(120);
        let study = Study::new(
            "Cumulative Log Returns",
            [
                IndicatorDescriptor::new("log_return").arg("cumulative", true),
                IndicatorDescriptor::new("ema")
                    .arg("close", "CUMLOGRET_1")
                    .arg("length", 5i64)
                    .arg("suffix", "CLR"),
            ],
        )
        .unwrap();

        let report = engine().study(&mut frame, study, &parallel()).unwrap();

        assert_eq!(report.mode, ExecutionMode::Sequential);
        assert_eq!(report.cores, 0);
        assert_eq!(report.columns, vec!["CUMLOGRET_1", "EMA_5_CLR"]);
        let ema = frame.get("EMA_5_CLR").unwrap();
        assert!(ema[0].is_nan());
        assert!(!ema[10].is_nan());
    }

    #[test]
    fn forced_parallel_chain_fails_second_descriptor() {
        let mut frame = sample_frame(120);
        let study = Study::new(
            "Chained",
            [
                IndicatorDescriptor::new("log_return").arg("cumulative", true),
                IndicatorDescriptor::new("ema")
                    .arg("close", "CUMLOGRET_1")
                    .arg("length", 5i64),
            ],
        )
        .unwrap();
        let options = parallel().force_parallel(true);

        let report = engine().study(&mut frame, study, &options).unwrap();

        assert_eq!(report.mode, ExecutionMode::Parallel);
        assert_eq!(report.columns, vec!["CUMLOGRET_1"]);
        let failures = report.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, "ema");
        assert_eq!(
            failures[0].error(),
            Some(&IndicatorError::MissingColumn("CUMLOGRET_1".into()))
        );
    }

    #[test]
    fn one_bad_descriptor_does_not_stop_the_rest() {
        let mut frame = sample_frame(100);
        let study = Study::new(
            "Partial",
            [
                IndicatorDescriptor::new("rsi"),
                IndicatorDescriptor::new("talib_only"),
                IndicatorDescriptor::new("sma"),
            ],
        )
        .unwrap();

        for options in [StudyOptions::sequential(), parallel()] {
            let report = engine().study(&mut frame, study.clone(), &options).unwrap();
            assert_eq!(report.added, 2);
            assert_eq!(report.failures().len(), 1);
            assert_eq!(
                report.failures()[0].error(),
                Some(&IndicatorError::UnknownKind("talib_only".into()))
            );
            reset(&mut frame, &report);
        }
    }

    #[test]
    fn col_numbers_keep_only_the_histogram() {
        let mut frame = sample_frame(100);
        let study = Study::new(
            "Histogram",
            [IndicatorDescriptor::new("macd").col_numbers([1])],
        )
        .unwrap();

        let report = engine().study(&mut frame, study, &parallel()).unwrap();
        assert_eq!(report.columns, vec!["MACDh_12_26_9"]);
    }

    #[test]
    fn bbands_custom_names() {
        let mut frame = sample_frame(100);
        let study = Study::new(
            "Bands",
            [IndicatorDescriptor::new("bbands")
                .arg("length", 20i64)
                .col_names(["LB", "MB", "UB", "BW", "BP"])],
        )
        .unwrap();

        let report = engine().study(&mut frame, study, &parallel()).unwrap();
        assert_eq!(report.columns, vec!["LB", "MB", "UB", "BW", "BP"]);
    }

    #[test]
    fn fisher_positional_params() {
        let mut frame = sample_frame(100);
        let study = Study::new(
            "Fisher",
            [IndicatorDescriptor::new("fisher").params([13i64, 7])],
        )
        .unwrap();

        let report = engine().study(&mut frame, study, &parallel()).unwrap();
        assert_eq!(report.columns, vec!["FISHERT_13_7", "FISHERTs_13_7"]);
    }

    #[test]
    fn rerun_after_drop_is_identical() {
        let engine = engine();
        let study = Study::new(
            "Repeat",
            [
                IndicatorDescriptor::new("atr"),
                IndicatorDescriptor::new("obv"),
                IndicatorDescriptor::new("stdev").arg("length", 10i64),
            ],
        )
        .unwrap();

        let mut frame = sample_frame(150);
        let first = engine.study(&mut frame, study.clone(), &parallel()).unwrap();
        let snapshot = frame.clone();
        reset(&mut frame, &first);

        let second = engine.study(&mut frame, study, &parallel()).unwrap();
        assert_eq!(first.columns, second.columns);
        assert_frames_match(&snapshot, &frame);
    }
}

mod predefined_studies {
    use super::*;

    #[test]
    fn all_study_adds_every_builtin_column() {
        let mut frame = sample_frame(250);
        let report = engine()
            .study(&mut frame, Selector::All, &parallel())
            .unwrap();
        assert_eq!(report.name, "All");
        assert_eq!(report.added, 28);
        assert!(report.failures().is_empty());
        assert_eq!(&report.columns[..4], &["HA_open", "HA_high", "HA_low", "HA_close"]);
        assert_eq!(report.columns.last().map(String::as_str), Some("OBV"));
    }

    #[test]
    fn all_study_sequential_matches_parallel() {
        let engine = engine();
        let mut seq = sample_frame(250);
        let mut par = sample_frame(250);
        engine
            .study(&mut seq, Selector::All, &StudyOptions::sequential())
            .unwrap();
        engine.study(&mut par, Selector::All, &parallel()).unwrap();
        assert_frames_match(&seq, &par);
    }

    #[test]
    fn each_category_runs() {
        let engine = engine();
        let mut frame = sample_frame(250);
        let expected = [
            (Category::Candles, 4),
            (Category::Cycles, 1),
            (Category::Momentum, 8),
            (Category::Overlap, 3),
            (Category::Performance, 2),
            (Category::Statistics, 1),
            (Category::Trend, 2),
            (Category::Volatility, 6),
            (Category::Volume, 1),
        ];
        let mut table = SpeedTable::new().with_cumulative();
        for (category, columns) in expected {
            let report = engine.study(&mut frame, category, &parallel()).unwrap();
            assert_eq!(report.name, category.as_str());
            assert_eq!(report.added, columns, "{category}");
            report.report_to(&mut table);
            reset(&mut frame, &report);
        }
        assert_eq!(table.rows().len(), Category::ALL.len());
        assert_eq!(table.total_columns(), 28);
    }

    #[test]
    fn cycles_category_adds_even_better_sinewave() {
        let mut frame = sample_frame(250);
        let report = engine()
            .study(&mut frame, "Cycles", &parallel())
            .unwrap();
        assert_eq!(report.name, "cycles");
        assert_eq!(report.columns, vec!["EBSW_40_10"]);
        let ebsw = frame.get("EBSW_40_10").unwrap();
        assert!(ebsw[38].is_nan());
        assert!(ebsw[40..].iter().all(|v| v.abs() <= 1.0 + 1e-12));
    }

    #[test]
    fn category_names_are_case_insensitive() {
        let mut frame = sample_frame(100);
        let report = engine()
            .study(&mut frame, "MoMeNtUm", &parallel())
            .unwrap();
        assert_eq!(report.added, 8);
    }

    #[test]
    fn unknown_category_is_fatal() {
        let mut frame = sample_frame(100);
        let err = engine()
            .study(&mut frame, "astrology", &parallel())
            .unwrap_err();
        assert!(matches!(err, StudyError::UnknownCategory { .. }));
        assert!(err.to_string().contains("momentum"));
        assert_eq!(frame.shape().1, BASE_COLUMNS);
    }

    #[test]
    fn common_study_includes_volume_sma() {
        let mut frame = sample_frame(250);
        let report = engine()
            .study(&mut frame, Study::common(), &parallel())
            .unwrap();
        assert_eq!(
            report.columns,
            vec!["SMA_10", "SMA_20", "SMA_50", "SMA_200", "VOL_SMA_20"]
        );
        let vol = frame.get("VOL_SMA_20").unwrap();
        assert!(!vol[19].is_nan());
    }

    #[test]
    fn excluded_kinds_are_skipped() {
        let mut frame = sample_frame(100);
        let options = parallel().exclude(["ha", "BBANDS"]);
        let report = engine().study(&mut frame, Selector::All, &options).unwrap();
        assert_eq!(report.added, 28 - 4 - 5);
        assert!(!frame.contains("HA_open"));
        assert!(!frame.contains("BBL_5_2.0"));
    }

    #[test]
    fn excluding_everything_is_fatal() {
        let mut frame = sample_frame(100);
        let options = parallel().exclude(["increasing", "decreasing"]);
        assert!(matches!(
            engine().study(&mut frame, "trend", &options),
            Err(StudyError::EmptyStudy { .. })
        ));
    }
}

mod overrides {
    use super::*;

    #[test]
    fn multiple_runs_accumulate_distinct_columns() {
        let engine = engine();
        let mut frame = sample_frame(200);

        let ten = parallel().exclude(["macd"]).with_override("length", 10i64);
        let fifty = parallel().exclude(["macd"]).with_override("length", 50i64);
        let fast = parallel()
            .with_override("fast", 5i64)
            .with_override("slow", 10i64);

        let a = engine.study(&mut frame, Category::Momentum, &ten).unwrap();
        let b = engine.study(&mut frame, Category::Momentum, &fifty).unwrap();
        let macd = Study::new("MACD", [IndicatorDescriptor::new("macd")]).unwrap();
        let c = engine.study(&mut frame, macd, &fast).unwrap();

        assert_eq!(
            a.columns,
            vec!["RSI_10", "ROC_10", "MOM_10", "FISHERT_10_1", "FISHERTs_10_1"]
        );
        assert_eq!(
            b.columns,
            vec!["RSI_50", "ROC_50", "MOM_50", "FISHERT_50_1", "FISHERTs_50_1"]
        );
        assert_eq!(c.columns, vec!["MACD_5_10_9", "MACDh_5_10_9", "MACDs_5_10_9"]);
        assert_eq!(frame.shape().1, BASE_COLUMNS + 13);
        assert!(a.duplicates().is_empty() && b.duplicates().is_empty());
    }

    #[test]
    fn explicit_params_win_over_overrides() {
        let mut frame = sample_frame(100);
        let study = Study::new(
            "Explicit",
            [
                IndicatorDescriptor::new("sma").arg("length", 20i64),
                IndicatorDescriptor::new("ema").params([ParamValue::Int(7)]),
                IndicatorDescriptor::new("obv"),
            ],
        )
        .unwrap();
        let options = parallel().with_override("length", 30i64);
        let report = engine().study(&mut frame, study, &options).unwrap();
        assert_eq!(report.columns, vec!["SMA_20", "EMA_7", "OBV"]);
    }

    #[test]
    fn prefix_override_decorates_every_column() {
        let mut frame = sample_frame(100);
        let options = parallel().with_override("prefix", "X");
        let report = engine().study(&mut frame, "trend", &options).unwrap();
        assert_eq!(report.columns, vec!["X_INC_1", "X_DEC_1"]);
    }
}

mod collisions {
    use super::*;

    #[test]
    fn permissive_rerun_appends_duplicates() {
        let engine = engine();
        let mut frame = sample_frame(100);
        engine.study(&mut frame, "volume", &parallel()).unwrap();
        let report = engine.study(&mut frame, "volume", &parallel()).unwrap();
        assert_eq!(report.added, 1);
        assert_eq!(report.duplicates(), vec!["OBV"]);
        assert_eq!(frame.shape().1, BASE_COLUMNS + 2);
    }

    #[test]
    fn strict_rerun_fails_per_indicator() {
        let engine = engine();
        let mut frame = sample_frame(100);
        let options = parallel().strict_columns(true);
        engine.study(&mut frame, "volume", &options).unwrap();
        let report = engine.study(&mut frame, "volume", &options).unwrap();
        assert_eq!(report.added, 0);
        assert_eq!(
            report.failures()[0].error(),
            Some(&IndicatorError::DuplicateColumn("OBV".into()))
        );
        assert_eq!(frame.shape().1, BASE_COLUMNS + 1);
    }
}

mod reporting {
    use super::*;

    #[test]
    fn timed_summary_includes_elapsed() {
        let mut frame = sample_frame(100);
        let report = engine()
            .study(&mut frame, "trend", &parallel().timed(true))
            .unwrap();
        let summary = report.summary();
        assert!(summary.starts_with("trend: 2 columns added in "));
        assert!(summary.ends_with(" ms"));
    }

    #[test]
    fn untimed_summary_has_no_elapsed() {
        let mut frame = sample_frame(100);
        let report = engine()
            .study(&mut frame, "trend", &StudyOptions::sequential())
            .unwrap();
        assert_eq!(report.summary(), "trend: 2 columns added");
    }

    #[test]
    fn verbose_lines_cover_failures() {
        init_tracing();
        let mut frame = sample_frame(100);
        let study = Study::new(
            "Lines",
            [IndicatorDescriptor::new("obv"), IndicatorDescriptor::new("nope")],
        )
        .unwrap();
        let report = engine()
            .study(&mut frame, study, &parallel().verbose(true))
            .unwrap();
        let lines = report.verbose_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(": OBV"));
        assert!(lines[1].contains("failed"));
    }

    #[test]
    #[allow(deprecated)]
    fn strategy_alias_behaves_like_study() {
        init_tracing();
        let engine = engine();
        let mut a = sample_frame(100);
        let mut b = sample_frame(100);
        let via_study = engine.study(&mut a, "volatility", &parallel()).unwrap();
        let via_alias = engine.strategy(&mut b, "volatility", &parallel()).unwrap();
        assert_eq!(via_study.columns, via_alias.columns);
        assert_frames_match(&a, &b);
    }
}

mod data_sources {
    use super::*;
    use tastudy::ports::data_port::DataPort;

    #[test]
    fn study_over_loaded_dataset() {
        let port = MockDataPort::new()
            .with_frame("SPY", sample_frame(120))
            .with_frame("QQQ", sample_frame(60));
        assert_eq!(port.list_datasets().unwrap(), vec!["QQQ", "SPY"]);

        let engine = engine();
        for name in port.list_datasets().unwrap() {
            let mut frame = port.load_frame(&name).unwrap();
            let report = engine.study(&mut frame, Study::common(), &parallel()).unwrap();
            assert_eq!(report.added, 5);
        }
        assert!(port.load_frame("DIA").is_err());
    }
}
