//! End-to-end tests for parsing provider markdown

use std::fs;
use tfgen_common::{DocInfo, DocKind, GeneratorLanguage, ProviderInfo, ResourceInfo};
use tfgen_parser::{parse_tf_markdown, DocSource};

const S3_BUCKET: &str = r#"---
subcategory: "S3"
layout: "aws"
page_title: "AWS: aws_s3_bucket"
---

# Resource: aws_s3_bucket

Provides a S3 bucket resource.

## Example Usage

### Private Bucket

```hcl
resource "aws_s3_bucket" "b" {
  bucket = "my-tf-test-bucket"
}
```

## Example Usage - Static Website

```hcl
resource "aws_s3_bucket" "site" {
  bucket = "site"
}
```

## Argument Reference

The following arguments are supported:

* `bucket` - (Optional, Forces new resource) The name of the bucket.
* `website` - (Optional) A website object (documented below).
~> **NOTE:** The website object is deprecated.

The `website` object supports the following:

* `index_document` - (Required, unless using `redirect_all_requests_to`) Amazon S3 returns this index document.
* `routing_rules` - (Optional) A json array containing routing rules
describing redirect behavior and when redirects are applied.

## Attributes Reference

In addition to all arguments above, the following attributes are exported:

* `id` - The name of the bucket.
* `arn` - The ARN of the bucket.

## Timeouts

* `create` - (Default `20m`)

## Import

S3 bucket can be imported using the `bucket`, e.g.

```
$ terraform import aws_s3_bucket.bucket bucket-name
```
"#;

fn aws() -> ProviderInfo {
    let mut info = ProviderInfo {
        name: "aws".to_string(),
        ..Default::default()
    };
    info.resources.insert(
        "aws_s3_bucket".to_string(),
        ResourceInfo {
            tok: "aws:s3/bucket:Bucket".to_string(),
            ..Default::default()
        },
    );
    info
}

#[test]
fn test_parse_full_document() {
    let provider = aws();
    let parsed = parse_tf_markdown(
        &provider,
        GeneratorLanguage::Python,
        DocKind::Resources,
        "aws_s3_bucket",
        S3_BUCKET,
    );
    let doc = &parsed.doc;

    assert!(doc.description.starts_with("Provides a S3 bucket resource.\n## Example Usage"));
    assert!(doc.description.contains("### Private Bucket"));
    assert!(doc.description.contains("### Static Website"));
    assert_eq!(doc.description.matches("## Example Usage").count(), 1);

    assert_eq!(doc.arguments["bucket"].description, "The name of the bucket.");
    assert_eq!(
        doc.arguments["website"].description,
        "A website object (documented below).\n> **NOTE:** The website object is deprecated."
    );
    let website = &doc.arguments["website"];
    assert_eq!(
        website.nested_arguments["routing_rules"],
        "A json array containing routing rules\ndescribing redirect behavior and when redirects are applied."
    );
    assert!(doc.arguments["index_document"].is_nested);
    assert!(!doc.arguments.contains_key("create"));

    assert_eq!(doc.attributes["id"], "The name of the bucket.");
    assert_eq!(doc.attributes["arn"], "The ARN of the bucket.");

    assert!(doc.import.starts_with("## Import\n\n"));
    assert!(doc
        .import
        .contains("$ pulumi import aws:s3/bucket:Bucket bucket bucket-name"));

    let rendered = parsed.rendered_doc();
    assert!(!rendered.import.contains("<break>"));
    assert!(rendered
        .import
        .contains("```sh\n$ pulumi import aws:s3/bucket:Bucket bucket bucket-name\n```"));
    assert_eq!(rendered.arguments, doc.arguments);

    assert_eq!(parsed.stats.ignored_doc_headers["Timeouts"], 1);
    assert_eq!(parsed.stats.total_arguments_from_docs, 2);
    assert_eq!(parsed.stats.unexpected_snippets, 0);
}

#[test]
fn test_single_example_section_round_trip() {
    let provider = aws();
    let markdown = "---\n---\n# T\n\nIntro.\n\n## Example Usage\n\n\n```hcl\nresource \"x\" \"y\" {}\n```\n";
    let parsed = parse_tf_markdown(
        &provider,
        GeneratorLanguage::Schema,
        DocKind::Resources,
        "aws_s3_bucket",
        markdown,
    );
    assert_eq!(
        parsed.doc.description,
        "Intro.\n## Example Usage\n\n```hcl\nresource \"x\" \"y\" {}\n```"
    );
}

fn write_repo(layout: &[&str], file: &str, contents: &str) -> tempfile::TempDir {
    let repo = tempfile::tempdir().unwrap();
    let dir = layout.iter().fold(repo.path().to_path_buf(), |p, seg| p.join(seg));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), contents).unwrap();
    repo
}

#[test]
fn test_doc_source_current_layout() {
    let provider = aws();
    let repo = write_repo(&["docs", "resources"], "s3_bucket.md", S3_BUCKET);
    let source = DocSource::new(repo.path(), &provider, GeneratorLanguage::Schema);

    let parsed = source.docs_for(DocKind::Resources, "aws_s3_bucket").unwrap();
    assert!(parsed.doc.arguments.contains_key("bucket"));
    assert_eq!(parsed.stats.entities_missing_docs, 0);
}

#[test]
fn test_doc_source_legacy_layout_with_prefix() {
    let provider = aws();
    let repo = write_repo(
        &["website", "docs", "d"],
        "aws_region.html.markdown",
        "---\n---\n# aws_region\n\nGets a region.\n\n## Attributes Reference\n\n* `name` - The region name.\n",
    );
    let source = DocSource::new(repo.path(), &provider, GeneratorLanguage::Schema);

    let parsed = source.docs_for(DocKind::DataSources, "aws_region").unwrap();
    assert_eq!(parsed.doc.description, "Gets a region.");
    assert_eq!(parsed.doc.attributes["name"], "The region name.");
}

#[test]
fn test_missing_docs() {
    let provider = aws();
    let repo = tempfile::tempdir().unwrap();

    let source = DocSource::new(repo.path(), &provider, GeneratorLanguage::Schema);
    let parsed = source.docs_for(DocKind::Resources, "aws_vpc").unwrap();
    assert!(parsed.doc.is_empty());
    assert_eq!(parsed.stats.entities_missing_docs, 1);

    let strict = source.missing_docs_error(true);
    assert!(strict.docs_for(DocKind::Resources, "aws_vpc").is_err());
}

#[test]
fn test_doc_overlays() {
    let mut provider = aws();
    provider.resources.insert(
        "aws_s3_bucket_v2".to_string(),
        ResourceInfo {
            tok: "aws:s3/bucketV2:BucketV2".to_string(),
            docs: Some(DocInfo {
                markdown: Some("---\n---\n# V2\n\nBucket v2.\n".to_string()),
                include_attributes_from: Some("aws_s3_bucket".to_string()),
                include_arguments_from: Some("aws_s3_bucket".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        },
    );
    let repo = write_repo(&["docs", "resources"], "s3_bucket.html.markdown", S3_BUCKET);
    let source = DocSource::new(repo.path(), &provider, GeneratorLanguage::Schema);

    let parsed = source.docs_for(DocKind::Resources, "aws_s3_bucket_v2").unwrap();
    assert_eq!(parsed.doc.description, "Bucket v2.");
    assert_eq!(parsed.doc.attributes["arn"], "The ARN of the bucket.");
    assert_eq!(
        parsed.doc.arguments["bucket"].description,
        "The name of the bucket."
    );
    assert!(parsed.doc.arguments["website"]
        .nested_arguments
        .contains_key("index_document"));
}
