//! Documentation parsing for Terraform providers
//!
//! This crate turns the markdown docs that ship with a Terraform provider
//! into structured [`EntityDoc`](tfgen_common::EntityDoc) records: the
//! entity description, per-argument and per-attribute text, nested
//! argument blocks and the import section.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let source = DocSource::new("terraform-provider-aws", &provider, GeneratorLanguage::Schema);
//! let parsed = source.docs_for(DocKind::Resources, "aws_s3_bucket")?;
//! println!("{}", parsed.doc.arguments["bucket"].description);
//! ```

pub mod cleanup;
pub mod markdown;
pub mod source;

pub use cleanup::CleanupContext;
pub use markdown::{parse_tf_markdown, MarkdownParser, ParsedDoc};
pub use source::DocSource;
