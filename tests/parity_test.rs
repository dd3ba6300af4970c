//! Property tests: sequential and parallel execution agree, and column
//! selection keeps exactly what was asked for.

mod common;

use common::*;
use proptest::prelude::*;
use proptest::sample::subsequence;
use tastudy::{ExecutionMode, Frame, IndicatorDescriptor, Study, StudyEngine, StudyOptions};

fn descriptor_pool() -> Vec<IndicatorDescriptor> {
    vec![
        IndicatorDescriptor::new("sma").arg("length", 5i64),
        IndicatorDescriptor::new("ema"),
        IndicatorDescriptor::new("wma").arg("length", 7i64),
        IndicatorDescriptor::new("rsi"),
        IndicatorDescriptor::new("macd").arg("fast", 5i64).arg("slow", 13i64),
        IndicatorDescriptor::new("roc"),
        IndicatorDescriptor::new("mom").arg("prefix", "P"),
        IndicatorDescriptor::new("fisher").params([5i64, 2]),
        IndicatorDescriptor::new("bbands").col_numbers([4, 0]),
        IndicatorDescriptor::new("atr").arg("length", 5i64),
        IndicatorDescriptor::new("obv"),
        IndicatorDescriptor::new("ha"),
        IndicatorDescriptor::new("ebsw").arg("length", 20i64),
        IndicatorDescriptor::new("stdev").arg("length", 8i64),
        IndicatorDescriptor::new("increasing").arg("length", 3i64),
        IndicatorDescriptor::new("log_return").arg("cumulative", true),
        IndicatorDescriptor::new("percent_return"),
        IndicatorDescriptor::new("not_registered"),
    ]
}

fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(10.0f64..200.0, 30..120)
}

fn arb_study() -> impl Strategy<Value = Study> {
    let pool = descriptor_pool();
    let len = pool.len();
    subsequence(pool, 1..=len).prop_map(|ta| Study::new("Random", ta).unwrap())
}

fn run(frame: &mut Frame, study: &Study, options: &StudyOptions) -> (Vec<String>, usize) {
    let engine = StudyEngine::builtin().unwrap();
    let report = engine.study(frame, study.clone(), options).unwrap();
    let failures = report.failures().len();
    (report.columns, failures)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Parallel output matches sequential output column for column.
    #[test]
    fn prop_parallel_matches_sequential(
        closes in arb_closes(),
        study in arb_study(),
        cores in 2usize..=4,
    ) {
        let mut seq = Frame::from_bars(&bars_from_closes(&closes));
        let mut par = seq.clone();

        let (seq_cols, seq_failed) = run(&mut seq, &study, &StudyOptions::sequential());
        let parallel = StudyOptions::default().with_cores(cores);
        let (par_cols, par_failed) = run(&mut par, &study, &parallel);

        prop_assert_eq!(&seq_cols, &par_cols);
        prop_assert_eq!(seq_failed, par_failed);
        for name in &seq_cols {
            prop_assert!(
                same_values(seq.get(name).unwrap(), par.get(name).unwrap()),
                "column {} differs",
                name
            );
        }
    }

    /// Columns reported as added are exactly the new tail of the frame.
    #[test]
    fn prop_report_matches_frame(closes in arb_closes(), study in arb_study()) {
        let mut frame = Frame::from_bars(&bars_from_closes(&closes));
        let before = frame.shape().1;
        let engine = StudyEngine::builtin().unwrap();
        let report = engine
            .study(&mut frame, study, &StudyOptions::default().with_cores(2))
            .unwrap();
        prop_assert_eq!(report.mode, ExecutionMode::Parallel);
        prop_assert_eq!(frame.shape().1, before + report.added);
        prop_assert_eq!(frame.columns_from(before), report.columns);
    }

    /// `col_numbers` keeps the selected outputs in selection order.
    #[test]
    fn prop_col_numbers_select_in_order(
        picks in subsequence(vec![0usize, 1, 2, 3, 4], 1..=5).prop_shuffle(),
    ) {
        let natural = ["BBL_5_2.0", "BBM_5_2.0", "BBU_5_2.0", "BBB_5_2.0", "BBP_5_2.0"];
        let expected: Vec<&str> = picks.iter().map(|&i| natural[i]).collect();

        let mut frame = sample_frame(40);
        let study = Study::new(
            "Pick",
            [IndicatorDescriptor::new("bbands").col_numbers(picks.clone())],
        )
        .unwrap();
        let (columns, failed) = run(&mut frame, &study, &StudyOptions::sequential());
        prop_assert_eq!(failed, 0);
        prop_assert_eq!(columns, expected);
    }
}
