//! tfgen CLI
//!
//! Command-line interface for translating Terraform provider docs, schemas
//! and examples.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};
use tfgen_common::{DocKind, EntitySchema, GeneratorLanguage, ProviderInfo, Stats, TargetLanguage};
use tfgen_converter::{ExampleTranslator, PulumiCli};
use tfgen_generator::{NestedTypeGenerator, SchemaNestedTypes};
use tfgen_parser::{parse_tf_markdown, DocSource, ParsedDoc};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "tfgen")]
#[command(version, about = "Translate Terraform provider docs, schemas and examples", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse the markdown docs of one resource or data source
    #[command(after_help = "EXAMPLES:\n  \
        # Parse a single markdown file\n  \
        tfgen docs --provider aws --name aws_s3_bucket --file s3_bucket.html.markdown\n\n  \
        # Look the docs up in a provider checkout, applying a mapping\n  \
        tfgen docs --config aws.yaml --name aws_ami --kind data-source \\\n    \
        --repo ./terraform-provider-aws")]
    Docs {
        /// Terraform name of the entity
        #[arg(short, long)]
        name: String,

        /// Markdown file to parse
        #[arg(short, long, conflicts_with = "repo")]
        file: Option<PathBuf>,

        /// Provider checkout to find the docs in
        #[arg(short, long, conflicts_with = "file")]
        repo: Option<PathBuf>,

        /// Provider mapping (YAML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Provider name, when no mapping is given
        #[arg(short, long)]
        provider: Option<String>,

        #[arg(short, long, default_value = "resource")]
        kind: EntityKind,

        /// Language the docs are generated for
        #[arg(short, long, default_value = "schema")]
        language: Language,

        /// Fail instead of warning when no docs are found
        #[arg(long)]
        missing_docs_error: bool,

        /// Write the parsed doc as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resolve the names of nested object types in provider schemas
    #[command(after_help = "EXAMPLES:\n  \
        tfgen types --schemas schemas.json --provider aws --output ./out\n\n  \
        # Apply field overrides from a mapping and print the report\n  \
        tfgen types --schemas schemas.json --config aws.yaml")]
    Types {
        /// JSON array of entity schemas
        #[arg(short, long)]
        schemas: PathBuf,

        /// Provider mapping (YAML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Provider name, when no mapping is given
        #[arg(short, long)]
        provider: Option<String>,

        /// Directory for nested_types.json and nested_types.md
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert HCL examples to other languages with `pulumi convert`
    #[command(after_help = "EXAMPLES:\n  \
        tfgen convert --config aws.yaml --languages typescript,python example.tf")]
    Convert {
        /// HCL files, one example each
        #[arg(required = true)]
        hcl: Vec<PathBuf>,

        /// Provider mappings passed to the converter
        #[arg(short, long, value_delimiter = ',')]
        config: Vec<PathBuf>,

        /// Comma-separated target languages
        #[arg(short, long, value_delimiter = ',', default_value = "typescript,python,csharp,go")]
        languages: Vec<String>,

        /// Path of the pulumi executable
        #[arg(long, default_value = "pulumi")]
        pulumi: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EntityKind {
    Resource,
    DataSource,
}

impl From<EntityKind> for DocKind {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Resource => DocKind::Resources,
            EntityKind::DataSource => DocKind::DataSources,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Language {
    Nodejs,
    Python,
    Csharp,
    Go,
    Pcl,
    Schema,
}

impl From<Language> for GeneratorLanguage {
    fn from(language: Language) -> Self {
        match language {
            Language::Nodejs => GeneratorLanguage::NodeJS,
            Language::Python => GeneratorLanguage::Python,
            Language::Csharp => GeneratorLanguage::CSharp,
            Language::Go => GeneratorLanguage::Golang,
            Language::Pcl => GeneratorLanguage::Pcl,
            Language::Schema => GeneratorLanguage::Schema,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Docs {
            name,
            file,
            repo,
            config,
            provider,
            kind,
            language,
            missing_docs_error,
            output,
        } => {
            let provider = load_provider(config.as_deref(), provider.as_deref())?;
            docs_command(DocsConfig {
                provider: &provider,
                name: &name,
                file: file.as_deref(),
                repo: repo.as_deref(),
                kind: kind.into(),
                language: language.into(),
                missing_docs_error,
                output: output.as_deref(),
                verbose: cli.verbose,
            })?;
        }

        Commands::Types {
            schemas,
            config,
            provider,
            output,
        } => {
            let provider = load_provider(config.as_deref(), provider.as_deref())?;
            types_command(&provider, &schemas, output.as_deref())?;
        }

        Commands::Convert {
            hcl,
            config,
            languages,
            pulumi,
        } => {
            convert_command(&hcl, &config, &languages, pulumi)?;
        }
    }

    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG`
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .with_file(false)
                .with_line_number(false),
        )
        .init();
}

fn load_provider(config: Option<&Path>, name: Option<&str>) -> Result<ProviderInfo> {
    let mut provider = match config {
        Some(path) => ProviderInfo::load(path)
            .with_context(|| format!("Failed to load provider mapping {}", path.display()))?,
        None => ProviderInfo::default(),
    };
    if let Some(name) = name {
        provider.name = name.to_string();
    }
    if provider.name.is_empty() {
        bail!("A provider name is required: pass --provider or a mapping with a name");
    }
    Ok(provider)
}

/// Options for the docs command
struct DocsConfig<'a> {
    provider: &'a ProviderInfo,
    name: &'a str,
    file: Option<&'a Path>,
    repo: Option<&'a Path>,
    kind: DocKind,
    language: GeneratorLanguage,
    missing_docs_error: bool,
    output: Option<&'a Path>,
    verbose: bool,
}

fn docs_command(config: DocsConfig) -> Result<()> {
    println!(
        "{} Parsing docs for {} {}",
        "→".cyan(),
        config.kind,
        config.name.yellow()
    );

    let parsed: ParsedDoc = match (config.file, config.repo) {
        (Some(file), _) => {
            let markdown = fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            parse_tf_markdown(
                config.provider,
                config.language,
                config.kind,
                config.name,
                &markdown,
            )
        }
        (None, Some(repo)) => {
            if config.verbose {
                println!("  Repository: {}", repo.display());
            }
            let mut source = DocSource::new(repo, config.provider, config.language).with_env();
            if config.missing_docs_error {
                source = source.missing_docs_error(true);
            }
            source
                .docs_for(config.kind, config.name)
                .with_context(|| format!("Failed to load docs for {}", config.name))?
        }
        (None, None) => bail!("Either --file or --repo is required"),
    };

    println!(
        "{} Parsed {} arguments and {} attributes",
        "✓".green(),
        parsed.doc.arguments.len(),
        parsed.doc.attributes.len()
    );
    if parsed.elided {
        println!("{} Some text was removed during cleanup", "⚠".yellow());
    }

    let json =
        serde_json::to_string_pretty(&parsed.rendered_doc()).context("Failed to serialize doc")?;
    match config.output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("{} Wrote {}", "✓".green(), path.display());
        }
        None => println!("\n{}", json),
    }

    print_summary(&parsed.stats, None)
}

fn types_command(provider: &ProviderInfo, schemas_path: &Path, output: Option<&Path>) -> Result<()> {
    println!(
        "{} Reading schemas from: {}",
        "→".cyan(),
        schemas_path.display()
    );
    let content = fs::read_to_string(schemas_path)
        .with_context(|| format!("Failed to read {}", schemas_path.display()))?;
    let schemas: Vec<EntitySchema> =
        serde_json::from_str(&content).context("Failed to parse entity schemas")?;

    println!("{} Resolving nested types...", "→".cyan());
    let generator = NestedTypeGenerator::new().context("Failed to create generator")?;
    let types = generator
        .gather(provider, &schemas)
        .context("Failed to resolve nested types")?;
    println!(
        "{} Resolved {} nested types from {} entities",
        "✓".green(),
        types.len(),
        schemas.len()
    );

    match output {
        Some(dir) => {
            generator
                .write_to_directory(&provider.name, &types, dir)
                .context("Failed to write nested types")?;
            println!("\n{}", "✓ Generation complete!".green().bold());
            println!("\n{}", "Generated files:".bold());
            println!("  📄 {}/nested_types.json", dir.display());
            println!("  📄 {}/nested_types.md", dir.display());
        }
        None => {
            let report = generator
                .render_report(&provider.name, &types)
                .context("Failed to render report")?;
            println!("\n{}", report);
        }
    }

    print_summary(&Stats::new(), Some(&types))
}

fn convert_command(
    hcl_paths: &[PathBuf],
    configs: &[PathBuf],
    languages: &[String],
    pulumi: PathBuf,
) -> Result<()> {
    let languages = languages
        .iter()
        .map(|l| l.parse::<TargetLanguage>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("Invalid --languages")?;

    let mut mappings = Vec::with_capacity(configs.len());
    for path in configs {
        mappings.push(
            ProviderInfo::load(path)
                .with_context(|| format!("Failed to load provider mapping {}", path.display()))?,
        );
    }

    let mut examples = Vec::with_capacity(hcl_paths.len());
    for path in hcl_paths {
        let hcl = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        examples.push((path.display().to_string(), hcl));
    }

    println!(
        "{} Converting {} examples with {}",
        "→".cyan(),
        examples.len(),
        pulumi.display()
    );
    let cli = PulumiCli::with_program(pulumi);
    let translator = ExampleTranslator::prepare(
        &cli,
        &cli,
        examples.iter().map(|(_, hcl)| hcl.as_str()),
        &mappings,
    )
    .context("Failed to convert examples")?;

    let mut stats = Stats::new();
    for (path, hcl) in &examples {
        match translator.convert_hcl(hcl, path, None, &languages, &mut stats) {
            Some(rendered) => {
                println!("\n{}", path.bold());
                println!("{}", rendered);
            }
            None => eprintln!("{} Skipping {}: no language converted", "⚠".yellow(), path),
        }
    }

    print_summary(&stats, None)
}

fn print_summary(stats: &Stats, types: Option<&SchemaNestedTypes>) -> Result<()> {
    let generator = NestedTypeGenerator::new().context("Failed to create generator")?;
    let summary = generator
        .render_summary(stats, types)
        .context("Failed to render summary")?;
    if !summary.trim().is_empty() {
        println!("\n{}", "Summary:".bold());
        print!("{}", summary);
    }
    Ok(())
}
