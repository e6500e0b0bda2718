//! Name case conversions shared by the parser and the generator

use regex::Regex;
use std::sync::LazyLock;

/// Upper-case the first character of `s`, leaving the rest untouched
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Title-case every whitespace-separated word without lower-casing the rest
///
/// ```
/// use tfgen_common::naming::title_case;
///
/// assert_eq!(title_case("with IAM role"), "With IAM Role");
/// ```
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            out.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert a Terraform-style name to PascalCase
///
/// ```
/// use tfgen_common::naming::pascal_case;
///
/// assert_eq!(pascal_case("analysis_defaults"), "AnalysisDefaults");
/// assert_eq!(pascal_case("analysisDefaults"), "AnalysisDefaults");
/// ```
pub fn pascal_case(name: &str) -> String {
    name.split('_')
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect()
}

/// Convert a snake_case name to camelCase, the way property names surface in
/// NodeJS and Go SDKs
///
/// ```
/// use tfgen_common::naming::camel_case;
///
/// assert_eq!(camel_case("create_before_destroy"), "createBeforeDestroy");
/// ```
pub fn camel_case(name: &str) -> String {
    let pascal = pascal_case(name);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Convert a camelCase or PascalCase name to snake_case
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out
}

/// Singular rules tried in order; the first match wins
static SINGULAR_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)(news|series|species|data|info|equipment)$", "$1"),
        (r"(?i)(alias|status|bus|campus|virus|corpus)(es)?$", "$1"),
        (r"(?i)(analy|diagno|parenthe|progno|synop|hypothe)ses$", "${1}sis"),
        (r"(?i)(p)eople$", "${1}erson"),
        (r"(?i)(c)hildren$", "${1}hild"),
        (r"(?i)(matr)ices$", "${1}ix"),
        (r"(?i)(vert|ind)ices$", "${1}ex"),
        (r"(?i)(quiz)zes$", "$1"),
        (r"(?i)(movie|cookie|calorie|rookie|selfie|zombie)s$", "$1"),
        (r"(?i)([^aeiouy]|qu)ies$", "${1}y"),
        (r"(?i)(cache|niche|ache|avalanche|mustache)s$", "$1"),
        (r"(?i)(x|ch|ss|sh|zz)es$", "$1"),
        (r"(?i)(shel|hal|wol|lea|loa|thie|cal|sel)ves$", "${1}f"),
        (r"(?i)(li|wi|kni)ves$", "${1}fe"),
        (r"(?i)(her|potat|tomat|ech|vet)oes$", "${1}o"),
        (r"(?i)(ss|us|is)$", "$1"),
        (r"(?i)s$", ""),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("singular rule pattern is valid"),
            replacement,
        )
    })
    .collect()
});

/// English singular of a collection property name
///
/// ```
/// use tfgen_common::naming::singularize;
///
/// assert_eq!(singularize("rules"), "rule");
/// assert_eq!(singularize("policies"), "policy");
/// assert_eq!(singularize("addresses"), "address");
/// assert_eq!(singularize("access"), "access");
/// assert_eq!(singularize("ipAliases"), "ipAlias");
/// ```
pub fn singularize(name: &str) -> String {
    SINGULAR_RULES
        .iter()
        .find(|(rule, _)| rule.is_match(name))
        .map_or_else(
            || name.to_string(),
            |(rule, replacement)| rule.replace(name, *replacement).into_owned(),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pascal_case_keeps_interior_case() {
        assert_eq!(pascal_case("definition"), "Definition");
        assert_eq!(
            pascal_case("defaultNewSheetConfiguration"),
            "DefaultNewSheetConfiguration"
        );
        assert_eq!(pascal_case("ec2_tag_filter"), "Ec2TagFilter");
        assert_eq!(pascal_case(""), "");
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("source_arn"), "sourceArn");
        assert_eq!(camel_case("tags"), "tags");
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("getAmi"), "get_ami");
        assert_eq!(snake_case("ec2.getAmi"), "ec2.get_ami");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("basic example"), "Basic Example");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_singularize() {
        assert_eq!(singularize("tags"), "tag");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("status"), "status");
        assert_eq!(singularize("ingress"), "ingress");
    }

    #[test]
    fn test_singularize_es_plurals() {
        assert_eq!(singularize("aliases"), "alias");
        assert_eq!(singularize("statuses"), "status");
        assert_eq!(singularize("caches"), "cache");
        assert_eq!(singularize("movies"), "movie");
        assert_eq!(singularize("branches"), "branch");
        assert_eq!(singularize("hashes"), "hash");
        assert_eq!(singularize("indices"), "index");
        assert_eq!(singularize("responses"), "response");
        assert_eq!(singularize("analyses"), "analysis");
    }

    #[test]
    fn test_singularize_keeps_camel_case_stem() {
        assert_eq!(singularize("ipAddresses"), "ipAddress");
        assert_eq!(singularize("cacheBehaviors"), "cacheBehavior");
        assert_eq!(singularize("orderedCacheBehaviors"), "orderedCacheBehavior");
        assert_eq!(singularize("targetGroupStatuses"), "targetGroupStatus");
        assert_eq!(singularize("metadata"), "metadata");
    }
}
