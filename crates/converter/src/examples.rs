//! Per-language conversion of HCL examples and assembly of the results

use crate::bulk::bulk_convert;
use crate::{
    error_summary, BatchConverter, ConvertError, Examples, ProgramConverter, Result,
    TranslatedExample,
};
use std::collections::{BTreeMap, BTreeSet};
use tfgen_common::{ProviderInfo, Stats, TargetLanguage};
use tracing::{debug, warn};

/// Shown in place of a program the converter produced no text for
pub const EXAMPLE_UNAVAILABLE: &str = "Example currently unavailable in this language\n";

/// Converts HCL examples once to PCL in bulk, then to each target language
pub struct ExampleTranslator<'a> {
    programs: &'a dyn ProgramConverter,
    /// PCL translations keyed by the HCL they came from
    pcls: BTreeMap<String, TranslatedExample>,
}

impl<'a> ExampleTranslator<'a> {
    /// Convert every snippet in `hcls` to PCL with one bulk call
    pub fn prepare<'h>(
        batch: &dyn BatchConverter,
        programs: &'a dyn ProgramConverter,
        hcls: impl IntoIterator<Item = &'h str>,
        mappings: &[ProviderInfo],
    ) -> Result<Self> {
        let unique: BTreeSet<&str> = hcls.into_iter().collect();
        let by_id: BTreeMap<String, &str> = unique
            .into_iter()
            .enumerate()
            .map(|(n, hcl)| (format!("e{n}"), hcl))
            .collect();
        let examples: Examples = by_id
            .iter()
            .map(|(id, hcl)| (id.clone(), hcl.to_string()))
            .collect();

        let mut translated = bulk_convert(batch, &examples, mappings)?;
        let pcls = by_id
            .into_iter()
            .map(|(id, hcl)| {
                let example = translated.remove(&id).unwrap_or_default();
                (hcl.to_string(), example)
            })
            .collect();

        Ok(Self { programs, pcls })
    }

    /// Convert one snippet to `language`
    pub fn convert(&self, hcl: &str, language: TargetLanguage) -> Result<String> {
        let example = self
            .pcls
            .get(hcl)
            .ok_or_else(|| ConvertError::UnexpectedSnippet(hcl.to_string()))?;
        if let Some(errors) = error_summary(&example.diagnostics) {
            return Err(ConvertError::Diagnostics(errors));
        }

        let program = self.programs.convert_program(&example.pcl, language)?;
        if let Some(errors) = error_summary(&program.diagnostics) {
            return Err(ConvertError::Diagnostics(errors));
        }
        if program.files.len() != 1 {
            return Err(ConvertError::Output(format!(
                "expected 1 file to be generated, got {}",
                program.files.len()
            )));
        }
        Ok(program
            .files
            .into_values()
            .next()
            .filter(|source| !source.trim().is_empty())
            .unwrap_or_else(|| EXAMPLE_UNAVAILABLE.to_string()))
    }

    /// Convert `hcl` to every language in `languages` and render the
    /// results as fenced code blocks.
    ///
    /// Returns `None` when no language converted; the example is then
    /// dropped. Partial failures keep the languages that did convert.
    pub fn convert_hcl(
        &self,
        hcl: &str,
        path: &str,
        title: Option<&str>,
        languages: &[TargetLanguage],
        stats: &mut Stats,
    ) -> Option<String> {
        debug!(path, "converting HCL example");
        let mut conversions = Vec::with_capacity(languages.len());
        let mut failed = Vec::new();

        for &language in languages {
            match self.convert(hcl, language) {
                Ok(code) => conversions.push((language, code)),
                Err(err) => {
                    debug!(path, %language, error = %err, "example conversion failed");
                    failed.push(language);
                }
            }
        }

        let example = title.map_or_else(String::new, |t| format!(" '{t}'"));
        if !languages.is_empty() && failed.len() == languages.len() {
            stats.hcl_all_langs_conversion_failures += 1;
            stats.warnings += 1;
            warn!(
                "unable to convert HCL example{} for entity '{}'; the example will be dropped",
                example, path
            );
            return None;
        }

        if !failed.is_empty() {
            for language in &failed {
                stats.partial_conversion_failure(language.as_str());
            }
            stats.warnings += 1;
            let names: Vec<&str> = failed.iter().map(TargetLanguage::as_str).collect();
            warn!(
                "unable to convert HCL example{} for entity '{}' in: {}; those languages will be dropped",
                example,
                path,
                names.join(", ")
            );
        }

        Some(hcl_conversions_to_string(&conversions))
    }
}

/// Render conversions as fenced code blocks in docs order, skipping empty
/// conversions
///
/// ```
/// use tfgen_common::TargetLanguage;
/// use tfgen_converter::hcl_conversions_to_string;
///
/// let rendered = hcl_conversions_to_string(&[
///     (TargetLanguage::Python, "bucket = s3.Bucket(\"b\")\n".to_string()),
///     (TargetLanguage::TypeScript, "const bucket = new s3.Bucket(\"b\");".to_string()),
/// ]);
/// assert_eq!(
///     rendered,
///     "```typescript\nconst bucket = new s3.Bucket(\"b\");\n```\n```python\nbucket = s3.Bucket(\"b\")\n```"
/// );
/// ```
pub fn hcl_conversions_to_string(conversions: &[(TargetLanguage, String)]) -> String {
    let mut sorted: Vec<&(TargetLanguage, String)> = conversions.iter().collect();
    sorted.sort_by(|a, b| a.0.docs_order(&b.0));

    sorted
        .into_iter()
        .filter_map(|(language, code)| {
            let code = code.trim();
            (!code.is_empty()).then(|| format!("```{}\n{}\n```", language, code))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Diagnostic, GeneratedProgram, MockBatchConverter, MockProgramConverter};

    const HCL: &str = "resource \"aws_s3_bucket\" \"b\" {}";

    fn batch_ok(diagnostics: Vec<Diagnostic>) -> MockBatchConverter {
        let mut batch = MockBatchConverter::new();
        batch.expect_convert_batch().returning(move |examples, _| {
            Ok(examples
                .keys()
                .map(|id| {
                    (
                        id.clone(),
                        TranslatedExample {
                            pcl: "resource b \"aws:s3:Bucket\" {}".to_string(),
                            diagnostics: diagnostics.clone(),
                        },
                    )
                })
                .collect())
        });
        batch
    }

    fn programs(failing: &'static [TargetLanguage]) -> MockProgramConverter {
        let mut programs = MockProgramConverter::new();
        programs.expect_convert_program().returning(move |_, language| {
            if failing.contains(&language) {
                return Err(ConvertError::Output(format!("no {language}")));
            }
            Ok(GeneratedProgram {
                files: BTreeMap::from([("main".to_string(), format!("// {language}\n"))]),
                diagnostics: vec![],
            })
        });
        programs
    }

    #[test]
    fn test_prepare_converts_unique_snippets_once() {
        let mut batch = MockBatchConverter::new();
        batch
            .expect_convert_batch()
            .times(1)
            .withf(|examples, _| examples.len() == 2 && examples["e0"] < examples["e1"])
            .returning(|_, _| Ok(BTreeMap::new()));
        let programs = programs(&[]);

        let translator =
            ExampleTranslator::prepare(&batch, &programs, ["b", "a", "b"], &[]).unwrap();
        assert_eq!(translator.pcls.len(), 2);
    }

    #[test]
    fn test_convert_unknown_snippet() {
        let batch = batch_ok(vec![]);
        let programs = programs(&[]);
        let translator = ExampleTranslator::prepare(&batch, &programs, [HCL], &[]).unwrap();
        assert!(matches!(
            translator.convert("other", TargetLanguage::Go),
            Err(ConvertError::UnexpectedSnippet(_))
        ));
    }

    #[test]
    fn test_convert_hcl_all_languages() {
        let batch = batch_ok(vec![]);
        let programs = programs(&[]);
        let translator = ExampleTranslator::prepare(&batch, &programs, [HCL], &[]).unwrap();
        let mut stats = Stats::new();

        let rendered = translator
            .convert_hcl(
                HCL,
                "aws:s3/bucket:Bucket",
                None,
                &[TargetLanguage::Go, TargetLanguage::TypeScript],
                &mut stats,
            )
            .unwrap();
        assert_eq!(
            rendered,
            "```typescript\n// typescript\n```\n```go\n// go\n```"
        );
        assert_eq!(stats, Stats::new());
    }

    #[test]
    fn test_convert_hcl_partial_failure() {
        let batch = batch_ok(vec![]);
        let programs = programs(&[TargetLanguage::Python]);
        let translator = ExampleTranslator::prepare(&batch, &programs, [HCL], &[]).unwrap();
        let mut stats = Stats::new();

        let rendered = translator
            .convert_hcl(
                HCL,
                "aws:s3/bucket:Bucket",
                Some("Basic"),
                &[TargetLanguage::Python, TargetLanguage::Go],
                &mut stats,
            )
            .unwrap();
        assert_eq!(rendered, "```go\n// go\n```");
        assert_eq!(stats.hcl_partial_conversion_failures["python"], 1);
        assert_eq!(stats.hcl_all_langs_conversion_failures, 0);
    }

    #[test]
    fn test_convert_hcl_error_diagnostics_drop_example() {
        let batch = batch_ok(vec![Diagnostic {
            severity: crate::SEVERITY_ERROR,
            summary: "unsupported block".to_string(),
            detail: "dynamic".to_string(),
        }]);
        let mut programs = MockProgramConverter::new();
        programs.expect_convert_program().never();
        let translator = ExampleTranslator::prepare(&batch, &programs, [HCL], &[]).unwrap();
        let mut stats = Stats::new();

        let rendered = translator.convert_hcl(
            HCL,
            "aws:s3/bucket:Bucket",
            None,
            &[TargetLanguage::TypeScript, TargetLanguage::Python],
            &mut stats,
        );
        assert_eq!(rendered, None);
        assert_eq!(stats.hcl_all_langs_conversion_failures, 1);
        assert!(stats.hcl_partial_conversion_failures.is_empty());
    }

    #[test]
    fn test_empty_program_is_unavailable() {
        let batch = batch_ok(vec![]);
        let mut programs = MockProgramConverter::new();
        programs.expect_convert_program().returning(|_, _| {
            Ok(GeneratedProgram {
                files: BTreeMap::from([("index.ts".to_string(), "  \n".to_string())]),
                diagnostics: vec![],
            })
        });
        let translator = ExampleTranslator::prepare(&batch, &programs, [HCL], &[]).unwrap();
        assert_eq!(
            translator.convert(HCL, TargetLanguage::TypeScript).unwrap(),
            EXAMPLE_UNAVAILABLE
        );
    }

    #[test]
    fn test_conversions_order_and_skip_empty() {
        let rendered = hcl_conversions_to_string(&[
            (TargetLanguage::Yaml, "resources: {}".to_string()),
            (TargetLanguage::Java, "  ".to_string()),
            (TargetLanguage::Go, "package main".to_string()),
            (TargetLanguage::CSharp, "using Pulumi;".to_string()),
        ]);
        assert_eq!(
            rendered,
            "```csharp\nusing Pulumi;\n```\n```go\npackage main\n```\n```yaml\nresources: {}\n```"
        );
    }
}
