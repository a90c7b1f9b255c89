//! Property tests for deduplication and inference.

use std::collections::HashSet;

use cdp_normalization::{Keep, NormalizationReport, drop_duplicates, infer_and_coerce};
use polars::prelude::*;
use proptest::prelude::*;

fn cell() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        "[ab]".prop_map(Some),
        "[0-9]{1,3}".prop_map(Some),
        "[0-9]{1,2}\\.[0-9]".prop_map(Some),
    ]
}

fn frame(rows: &[(Option<String>, Option<String>)]) -> DataFrame {
    let a: Vec<Option<String>> = rows.iter().map(|r| r.0.clone()).collect();
    let b: Vec<Option<String>> = rows.iter().map(|r| r.1.clone()).collect();
    DataFrame::new(vec![
        Series::new("a".into(), a).into_column(),
        Series::new("b".into(), b).into_column(),
    ])
    .unwrap()
}

fn rows_of(df: &DataFrame) -> Vec<Vec<String>> {
    (0..df.height())
        .map(|idx| {
            df.get_columns()
                .iter()
                .map(|c| format!("{:?}", c.get(idx).unwrap()))
                .collect()
        })
        .collect()
}

proptest! {
    #[test]
    fn dedupe_never_grows_and_leaves_no_repeats(
        rows in proptest::collection::vec((cell(), cell()), 0..30)
    ) {
        let df = frame(&rows);
        let mut report = NormalizationReport::new();
        let out = drop_duplicates(df.clone(), None, Keep::First, &mut report);

        prop_assert!(out.height() <= df.height());
        prop_assert_eq!(out.height() + report.duplicates_removed, df.height());
        let mut seen = HashSet::new();
        for row in rows_of(&out) {
            prop_assert!(seen.insert(row));
        }
    }

    #[test]
    fn keep_last_retains_as_many_rows_as_keep_first(
        rows in proptest::collection::vec((cell(), cell()), 0..30)
    ) {
        let df = frame(&rows);
        let first = drop_duplicates(df.clone(), None, Keep::First, &mut NormalizationReport::new());
        let last = drop_duplicates(df, None, Keep::Last, &mut NormalizationReport::new());
        prop_assert_eq!(first.height(), last.height());
    }

    #[test]
    fn inference_is_idempotent(
        rows in proptest::collection::vec((cell(), cell()), 0..30)
    ) {
        let df = frame(&rows);
        let once = infer_and_coerce(df, &mut NormalizationReport::new());
        let twice = infer_and_coerce(once.clone(), &mut NormalizationReport::new());
        prop_assert!(once.equals_missing(&twice));
    }
}
