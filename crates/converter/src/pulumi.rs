//! `pulumi convert` invocations

use crate::{
    BatchConverter, ConvertError, Diagnostic, Examples, GeneratedProgram, ProgramConverter, Result,
    TranslatedExample,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tfgen_common::{ProviderInfo, TargetLanguage};
use tracing::debug;

/// File name of the batch input inside the working directory
pub const EXAMPLES_FILE: &str = "examples.json";

/// How `pulumi convert` produces one target language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageBackend {
    /// `--language` argument
    pub cli_name: &'static str,
    /// Generated file holding the program, relative to the output directory
    pub main_file: &'static str,
}

impl LanguageBackend {
    /// Backend for `language`; PCL needs no backend
    pub fn for_language(language: TargetLanguage) -> Option<Self> {
        let (cli_name, main_file) = match language {
            TargetLanguage::TypeScript => ("typescript", "index.ts"),
            TargetLanguage::Python => ("python", "__main__.py"),
            TargetLanguage::CSharp => ("csharp", "Program.cs"),
            TargetLanguage::Go => ("go", "main.go"),
            TargetLanguage::Yaml => ("yaml", "Pulumi.yaml"),
            TargetLanguage::Java => ("java", "src/main/java/generated_program/App.java"),
            TargetLanguage::Pcl => return None,
        };
        Some(Self {
            cli_name,
            main_file,
        })
    }
}

/// Arguments converting the batch in `examples_file` into `out_dir`
pub fn convert_examples_args(
    out_dir: &Path,
    mapping_files: &[PathBuf],
    examples_file: &str,
) -> Vec<String> {
    let mut args: Vec<String> = [
        "convert",
        "--from",
        "terraform",
        "--language",
        "pcl",
        "--out",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    args.push(out_dir.display().to_string());
    args.push("--generate-only".to_string());
    for file in mapping_files {
        args.push("--mappings".to_string());
        args.push(file.display().to_string());
    }
    args.extend(["--", "--convert-examples", examples_file].map(String::from));
    args
}

/// Mapping file the converter expects for `info`, named after the
/// Terraform resource prefix (`azurerm.json` for the azure provider)
pub fn mappings_file(mappings_dir: &Path, info: &ProviderInfo) -> PathBuf {
    mappings_dir.join(format!("{}.json", info.resource_prefix()))
}

/// Write the batch input and mapping files, returning the command
/// arguments that convert them.
///
/// `examples_path` is passed to the tool by file name, so the command must
/// run from its directory.
pub fn write_batch_inputs(
    out_dir: &Path,
    examples_path: &Path,
    examples: &Examples,
    mappings: &[ProviderInfo],
) -> Result<Vec<String>> {
    fs::write(examples_path, serde_json::to_vec(examples)?)?;

    let mappings_dir = out_dir.join("mappings");
    if !mappings.is_empty() {
        fs::create_dir_all(&mappings_dir)?;
    }
    let mut mapping_files = Vec::with_capacity(mappings.len());
    for info in mappings {
        let file = mappings_file(&mappings_dir, info);
        fs::write(&file, serde_json::to_vec(info)?)?;
        mapping_files.push(file);
    }

    let file_name = examples_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(EXAMPLES_FILE);
    Ok(convert_examples_args(out_dir, &mapping_files, file_name))
}

/// Runs the `pulumi` executable
#[derive(Debug, Clone)]
pub struct PulumiCli {
    program: PathBuf,
}

impl Default for PulumiCli {
    fn default() -> Self {
        Self::new()
    }
}

impl PulumiCli {
    /// Use `pulumi` from `PATH`
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("pulumi"),
        }
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, args: &[String], cwd: &Path) -> Result<()> {
        debug!(program = %self.program.display(), args = ?args, "running pulumi");
        let output = Command::new(&self.program)
            .args(args)
            .current_dir(cwd)
            .output()?;

        if !output.status.success() {
            return Err(ConvertError::Tool {
                command: args.first().cloned().unwrap_or_default(),
                status: output.status.to_string(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(())
    }
}

impl BatchConverter for PulumiCli {
    fn convert_batch(
        &self,
        examples: &Examples,
        mappings: &[ProviderInfo],
    ) -> Result<BTreeMap<String, TranslatedExample>> {
        let work_dir = tempfile::Builder::new()
            .prefix("bridge-examples")
            .tempdir()?;
        let out_dir = work_dir.path().join("out");
        fs::create_dir_all(&out_dir)?;
        let examples_path = work_dir.path().join(EXAMPLES_FILE);

        let args = write_batch_inputs(&out_dir, &examples_path, examples, mappings)?;
        self.run(&args, work_dir.path())?;

        let output = fs::read_to_string(out_dir.join(EXAMPLES_FILE)).map_err(|e| {
            ConvertError::Output(format!(
                "failed to read {}: {}; the pulumi CLI may be too old to convert examples in bulk",
                EXAMPLES_FILE, e
            ))
        })?;
        let translated: BTreeMap<String, TranslatedExample> = serde_json::from_str(&output)
            .map_err(|e| ConvertError::Output(format!("failed to parse {}: {}", EXAMPLES_FILE, e)))?;

        Ok(translated
            .into_iter()
            .map(|(id, mut example)| {
                example.diagnostics = example
                    .diagnostics
                    .into_iter()
                    .map(Diagnostic::normalize)
                    .collect();
                (id, example)
            })
            .collect())
    }
}

impl ProgramConverter for PulumiCli {
    fn convert_program(&self, pcl: &str, language: TargetLanguage) -> Result<GeneratedProgram> {
        let Some(backend) = LanguageBackend::for_language(language) else {
            return Ok(GeneratedProgram {
                files: BTreeMap::from([("main.pp".to_string(), pcl.to_string())]),
                diagnostics: vec![],
            });
        };

        let work_dir = tempfile::Builder::new().prefix("pcl-program").tempdir()?;
        let source_dir = work_dir.path().join("src");
        let out_dir = work_dir.path().join("out");
        fs::create_dir_all(&source_dir)?;
        fs::write(source_dir.join("main.pp"), pcl)?;

        let args: Vec<String> = vec![
            "convert".to_string(),
            "--from".to_string(),
            "pcl".to_string(),
            "--language".to_string(),
            backend.cli_name.to_string(),
            "--out".to_string(),
            out_dir.display().to_string(),
            "--generate-only".to_string(),
        ];
        self.run(&args, &source_dir)?;

        let main = out_dir.join(backend.main_file);
        let program = fs::read_to_string(&main).map_err(|e| {
            ConvertError::Output(format!(
                "expected {} to be generated for {}: {}",
                backend.main_file, language, e
            ))
        })?;
        Ok(GeneratedProgram {
            files: BTreeMap::from([(backend.main_file.to_string(), program)]),
            diagnostics: vec![],
        })
    }
}
