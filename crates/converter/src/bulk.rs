//! Batch conversion with failure bisection
//!
//! A failing batch is narrowed down by halves until one example is left.
//! The narrowing only locates a reproduction; results always come from the
//! full batch.

use crate::pulumi::{write_batch_inputs, EXAMPLES_FILE};
use crate::{templates, BatchConverter, ConvertError, Examples, Result, TranslatedExample};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tfgen_common::ProviderInfo;
use tracing::{debug, info, warn};

/// Convert `examples` in one call.
///
/// On failure the batch is bisected to a single example, which is written
/// to a repro directory named in the returned
/// [`ConvertError::MinimalRepro`].
pub fn bulk_convert(
    converter: &dyn BatchConverter,
    examples: &Examples,
    mappings: &[ProviderInfo],
) -> Result<BTreeMap<String, TranslatedExample>> {
    if examples.is_empty() {
        return Ok(BTreeMap::new());
    }

    let err = match converter.convert_batch(examples, mappings) {
        Ok(translated) => {
            info!(examples = examples.len(), "converted examples");
            return Ok(translated);
        }
        Err(err) => err,
    };

    warn!(examples = examples.len(), "bulk conversion failed, bisecting");
    let minimal = bisect(converter, examples.clone(), mappings);
    if !minimal.confirmed {
        warn!(
            examples = ?minimal.examples.keys().collect::<Vec<_>>(),
            "repro example was never seen failing on its own; the failure may need other examples in the batch"
        );
    }

    match prepare_repro_dir(&minimal.examples, mappings) {
        Ok(dir) => Err(ConvertError::MinimalRepro {
            dir,
            source: Box::new(err),
        }),
        Err(repro_err) => {
            warn!(error = %repro_err, "failed to prepare repro directory");
            Err(err)
        }
    }
}

/// Outcome of narrowing a failing batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bisection {
    pub examples: Examples,
    /// The converter was seen failing on exactly `examples`. False when the
    /// last step blamed the second half because the first one converted.
    pub confirmed: bool,
}

/// Narrow a failing batch to fewer than two examples.
///
/// The first half is retried; if it succeeds the failure is attributed to
/// the second half without another call.
pub fn bisect(
    converter: &dyn BatchConverter,
    mut examples: Examples,
    mappings: &[ProviderInfo],
) -> Bisection {
    let mut confirmed = true;
    while examples.len() >= 2 {
        let (first, second) = split_in_half(examples);
        (examples, confirmed) = match converter.convert_batch(&first, mappings) {
            Err(_) => (first, true),
            Ok(_) => (second, false),
        };
        debug!(remaining = examples.len(), confirmed, "bisected failing batch");
    }
    Bisection {
        examples,
        confirmed,
    }
}

/// Split by sorted key; the first half holds `len / 2` examples
pub fn split_in_half(mut examples: Examples) -> (Examples, Examples) {
    let Some(middle) = examples.keys().nth(examples.len() / 2).cloned() else {
        return (examples, Examples::new());
    };
    let second = examples.split_off(&middle);
    (examples, second)
}

/// Write `examples` and a `repro.sh` invoking the converter on them into a
/// new directory under the system temp dir, and keep it
pub fn prepare_repro_dir(examples: &Examples, mappings: &[ProviderInfo]) -> Result<PathBuf> {
    let dir = tempfile::Builder::new()
        .prefix("convert-examples-repro")
        .tempdir()?
        .keep();

    let args = write_batch_inputs(&dir, &dir.join(EXAMPLES_FILE), examples, mappings)?;
    for (id, hcl) in examples {
        fs::write(dir.join(format!("{id}.tf")), hcl)?;
    }
    fs::write(dir.join("repro.sh"), templates::render_repro_script(&args)?)?;

    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockBatchConverter;

    fn examples(n: usize) -> Examples {
        (0..n)
            .map(|i| (format!("e{i:02}"), format!("resource \"r\" \"n{i}\" {{}}")))
            .collect()
    }

    fn fail() -> ConvertError {
        ConvertError::Output("boom".to_string())
    }

    #[test]
    fn test_split_in_half() {
        let (first, second) = split_in_half(examples(5));
        assert_eq!(first.keys().collect::<Vec<_>>(), vec!["e00", "e01"]);
        assert_eq!(second.keys().collect::<Vec<_>>(), vec!["e02", "e03", "e04"]);

        let (first, second) = split_in_half(examples(1));
        assert!(first.is_empty());
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_success_needs_one_call() {
        let mut converter = MockBatchConverter::new();
        converter
            .expect_convert_batch()
            .times(1)
            .returning(|batch, _| {
                Ok(batch
                    .keys()
                    .map(|k| (k.clone(), TranslatedExample::default()))
                    .collect())
            });

        let result = bulk_convert(&converter, &examples(4), &[]).unwrap();
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_empty_batch_is_not_converted() {
        let mut converter = MockBatchConverter::new();
        converter.expect_convert_batch().never();
        assert!(bulk_convert(&converter, &Examples::new(), &[])
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_bisect_finds_culprit_within_bound() {
        for n in [2usize, 3, 5, 8, 13, 32] {
            for culprit in 0..n {
                let key = format!("e{culprit:02}");
                let bound = (n as f64).log2().ceil() as usize;

                let mut converter = MockBatchConverter::new();
                let culprit_key = key.clone();
                converter
                    .expect_convert_batch()
                    .times(1..=bound)
                    .returning(move |batch, _| {
                        if batch.contains_key(&culprit_key) {
                            Err(fail())
                        } else {
                            Ok(BTreeMap::new())
                        }
                    });

                let minimal = bisect(&converter, examples(n), &[]);
                assert_eq!(
                    minimal.examples.keys().collect::<Vec<_>>(),
                    vec![&key],
                    "n={n}"
                );
            }
        }
    }

    #[test]
    fn test_bisect_marks_inferred_culprit() {
        // the first example fails alone
        let mut converter = MockBatchConverter::new();
        converter.expect_convert_batch().returning(|batch, _| {
            if batch.contains_key("e00") {
                Err(fail())
            } else {
                Ok(BTreeMap::new())
            }
        });
        let minimal = bisect(&converter, examples(4), &[]);
        assert_eq!(minimal.examples.keys().collect::<Vec<_>>(), vec!["e00"]);
        assert!(minimal.confirmed);

        // only the full batch fails, so every half converts
        let mut converter = MockBatchConverter::new();
        converter.expect_convert_batch().returning(|batch, _| {
            if batch.len() == 4 {
                Err(fail())
            } else {
                Ok(BTreeMap::new())
            }
        });
        let minimal = bisect(&converter, examples(4), &[]);
        assert_eq!(minimal.examples.keys().collect::<Vec<_>>(), vec!["e03"]);
        assert!(!minimal.confirmed);
    }

    #[test]
    fn test_single_failing_example_is_confirmed() {
        let mut converter = MockBatchConverter::new();
        converter.expect_convert_batch().never();
        let minimal = bisect(&converter, examples(1), &[]);
        assert!(minimal.confirmed);
        assert_eq!(minimal.examples.len(), 1);
    }

    #[test]
    fn test_bulk_convert_writes_repro() {
        let mut converter = MockBatchConverter::new();
        converter.expect_convert_batch().returning(|batch, _| {
            if batch.contains_key("e02") {
                Err(fail())
            } else {
                Ok(BTreeMap::new())
            }
        });
        let mappings = [ProviderInfo {
            name: "aws".to_string(),
            ..Default::default()
        }];

        let err = bulk_convert(&converter, &examples(4), &mappings).unwrap_err();
        let ConvertError::MinimalRepro { dir, source } = err else {
            panic!("expected a minimal repro");
        };
        assert!(matches!(*source, ConvertError::Output(_)));

        let script = fs::read_to_string(dir.join("repro.sh")).unwrap();
        assert!(script.starts_with("#!/usr/bin/env bash\nset -euo pipefail\n\npulumi convert"));
        assert!(script.contains("--convert-examples examples.json"));
        assert!(dir.join("e02.tf").exists());
        assert!(!dir.join("e01.tf").exists());
        assert!(dir.join("mappings").join("aws.json").exists());
        let batch: Examples =
            serde_json::from_str(&fs::read_to_string(dir.join("examples.json")).unwrap()).unwrap();
        assert_eq!(batch.len(), 1);

        fs::remove_dir_all(dir).unwrap();
    }
}
