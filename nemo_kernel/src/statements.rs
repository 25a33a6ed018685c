//! Rule text helpers: comments, directive statements and their extraction.

use crate::KernelError;
use fancy_regex::Regex;
use once_cell::sync::Lazy;

/// `@output pred.`, unless the directive sits in a comment or continues an
/// indented line.
static OUTPUT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?<![\s%])\s*@output\s+(\S+)\s*\.").expect("valid output pattern"));
/// `@export pred :- ...`
static EXPORT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@export\s+(\w+)\s*:- ").expect("valid export pattern"));
/// `@plot pred.`, with the same exclusions as `@output`.
static PLOT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?<![\s%])\s*@plot\s+(\S+)\s*\.").expect("valid plot pattern"));

/// Statements that only steer the notebook and are never stored as rules.
const DIRECTIVE_STATEMENTS: &[&str] = &[
    "@output", "@export", "@plot", "@bar", "@scatter", "@graph", "@shape", "@line", "@assert",
];

/// Removes `%` comments and joins the remaining trimmed lines.
pub fn strip_comments(code: &str) -> String {
    code.lines()
        .filter(|line| !line.trim().starts_with('%'))
        .map(|line| match line.split_once('%') {
            Some((before, _)) => before.trim(),
            None => line.trim(),
        })
        .collect()
}

/// Drops statements from `rules`, splitting on `.`.
///
/// With `to_save` every directive statement is dropped, leaving only the
/// rules worth keeping across cells. Otherwise only `@assert` statements
/// are dropped.
pub fn filter_statements(rules: &str, to_save: bool) -> String {
    rules
        .split('.')
        .filter(|statement| {
            if to_save {
                !DIRECTIVE_STATEMENTS.iter().any(|d| statement.contains(d))
            } else {
                !statement.contains("@assert")
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Prepares rules for the reasoning engine: assertions are removed and
/// plotted predicates are output like any other.
pub fn engine_rules(rules: &str) -> String {
    filter_statements(rules, false).replace("@plot", "@output")
}

/// Predicates named by the directives of one cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    pub outputs: Vec<String>,
    pub exports: Vec<String>,
    pub plots: Vec<String>,
    pub has_assert: bool,
}

impl Directives {
    /// Extracts the directives of a cell's code.
    pub fn extract(code: &str) -> Result<Self, KernelError> {
        Ok(Self {
            outputs: captures(&OUTPUT_REGEX, code)?,
            exports: captures(&EXPORT_REGEX, code)?,
            plots: captures(&PLOT_REGEX, code)?,
            has_assert: code.contains("@assert"),
        })
    }

    /// Returns true if the code contains any directive.
    pub fn any(&self) -> bool {
        !self.outputs.is_empty() || !self.exports.is_empty() || !self.plots.is_empty() || self.has_assert
    }
}

/// Collects the first capture group of every match.
fn captures(regex: &Regex, text: &str) -> Result<Vec<String>, KernelError> {
    let mut found = Vec::new();
    for caps in regex.captures_iter(text) {
        if let Some(m) = caps?.get(1) {
            found.push(m.as_str().to_string());
        }
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comments() {
        let code = "% header\np(1). % trailing\n  q(2).\n";
        assert_eq!(strip_comments(code), "p(1).q(2).");
    }

    #[test]
    fn test_filter_statements_to_save() {
        let rules = "p(1). q(X) :- p(X). @output q. @bar q.";
        assert_eq!(filter_statements(rules, true), "p(1). q(X) :- p(X).");
    }

    #[test]
    fn test_filter_statements_keeps_outputs_for_engine() {
        let rules = "p(1). @assert q [[1]]. @output q.";
        assert_eq!(filter_statements(rules, false), "p(1). @output q.");
    }

    #[test]
    fn test_engine_rules() {
        assert_eq!(engine_rules("p(1). @plot p."), "p(1). @output p.");
    }

    #[test]
    fn test_extract_directives() {
        let code = "a(1).\n@output a.\n@plot b.\n@export c :- csv{}.";
        let directives = Directives::extract(code).unwrap();
        assert_eq!(directives.outputs, vec!["a"]);
        assert_eq!(directives.plots, vec!["b"]);
        assert_eq!(directives.exports, vec!["c"]);
        assert!(!directives.has_assert);
        assert!(directives.any());
    }

    #[test]
    fn test_consecutive_outputs() {
        let directives = Directives::extract("@output a.\n@output b.").unwrap();
        assert_eq!(directives.outputs, vec!["a", "b"]);
    }

    #[test]
    fn test_commented_output_is_ignored() {
        let directives = Directives::extract("a(1).\n% @output a.").unwrap();
        assert!(directives.outputs.is_empty());
        assert!(!directives.any());
    }
}
