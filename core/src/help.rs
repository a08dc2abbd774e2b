//! Help text rendering and the serializable registry summary.
//!
//! Help output is deliberately plain: program banner, then one
//! description/usage block per registered option, in registration order.
//! [`ParserSummary`] is the same information as data, suitable for JSON
//! output or embedding in tooling.

use serde::Serialize;

use crate::option::OptionSpec;
use crate::parser::{HELP_TOKENS, Parser};

/// Serializable description of one registered option.
#[derive(Debug, Clone, Serialize)]
pub struct OptionSummary {
    /// Option name (empty for the default option).
    pub name: String,
    /// Human description.
    pub description: String,
    /// Usage line built from the parameter usage labels.
    pub usage: String,
    /// Whether every run must include this option.
    pub required: bool,
    /// Whether this option refuses all co-occurrence.
    pub exclusive: bool,
    /// Options that must co-occur with this one.
    pub requires: Vec<String>,
    /// Options that must not co-occur with this one.
    pub conflicts: Vec<String>,
}

impl OptionSummary {
    /// Builds the summary for one descriptor.
    pub fn from_spec(spec: &OptionSpec) -> Self {
        Self {
            name: spec.name().to_string(),
            description: spec.description().to_string(),
            usage: spec.usage(),
            required: spec.is_required(),
            exclusive: spec.is_exclusive(),
            requires: spec.requires().iter().cloned().collect(),
            conflicts: spec.conflicts().iter().cloned().collect(),
        }
    }
}

/// Serializable description of a whole registry.
///
/// # Examples
///
/// ```
/// use optline_core::{OptionSpec, ParamType, Parser};
///
/// let mut parser = Parser::new("demo", "1.2.0", "demo program");
/// parser
///     .add_option(OptionSpec::new("port").with_params(&[ParamType::U16]), |_| {})
///     .unwrap();
///
/// let summary = parser.summary();
/// assert_eq!(summary.program, "demo");
/// assert_eq!(summary.options[0].usage, "port <u16>");
///
/// let json = serde_json::to_string(&summary).unwrap();
/// assert!(json.contains("\"port <u16>\""));
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ParserSummary {
    /// Program name.
    pub program: String,
    /// Program version.
    pub version: String,
    /// Program description.
    pub description: String,
    /// Registered options in registration order.
    pub options: Vec<OptionSummary>,
}

impl ParserSummary {
    /// Builds the summary for a parser's current registry.
    pub fn from_parser(parser: &Parser) -> Self {
        Self {
            program: parser.name().to_string(),
            version: parser.version().to_string(),
            description: parser.description().to_string(),
            options: parser.options().map(OptionSummary::from_spec).collect(),
        }
    }
}

/// Renders the plain-text help for a parser.
pub fn render_help(parser: &Parser) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} {}\n", parser.name(), parser.version()));
    if !parser.description().is_empty() {
        out.push_str(&format!("{}\n", parser.description()));
    }
    out.push_str("\nOptions:\n");
    for spec in parser.options() {
        let display = if spec.is_default() {
            "(default)"
        } else {
            spec.name()
        };
        out.push_str(&format!("  {display}"));
        if !spec.description().is_empty() {
            out.push_str(&format!("  {}", spec.description()));
        }
        out.push('\n');
        out.push_str(&format!("      usage: {}\n", spec.usage()));
    }
    out.push_str(&format!(
        "  {}\n      Show this help text\n",
        HELP_TOKENS.join(", ")
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::ParamType;

    fn sample_parser() -> Parser {
        let mut parser = Parser::new("sample", "0.3.1", "sample tool");
        parser
            .add_option(
                OptionSpec::new("greet")
                    .with_description("Greet someone")
                    .with_params(&[ParamType::Str]),
                |_| {},
            )
            .unwrap();
        parser
            .add_option(OptionSpec::new("quiet"), |_| {})
            .unwrap();
        parser.add_conflict("quiet", &["greet"]).unwrap();
        parser
    }

    #[test]
    fn test_render_help_lists_banner_and_usage_lines() {
        let help = sample_parser().render_help();
        assert!(help.starts_with("sample 0.3.1\n"));
        assert!(help.contains("sample tool"));
        assert!(help.contains("greet  Greet someone"));
        assert!(help.contains("usage: greet <string>"));
        assert!(help.contains("?, help"));
    }

    #[test]
    fn test_summary_captures_dependency_sets() {
        let summary = sample_parser().summary();
        assert_eq!(summary.options.len(), 2);
        let quiet = &summary.options[1];
        assert_eq!(quiet.name, "quiet");
        assert_eq!(quiet.conflicts, ["greet"]);
        assert!(quiet.requires.is_empty());
    }

    #[test]
    fn test_summary_serializes_to_json() {
        let summary = sample_parser().summary();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["program"], "sample");
        assert_eq!(json["options"][0]["usage"], "greet <string>");
    }
}
