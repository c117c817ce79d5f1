//! Documentation blocks
//!
//! A schema can be split into documented fragments: a new block starts at
//! every entry that carries a docstring. Each block pairs that docstring with
//! the TOML its entries render to, which is what documentation generators
//! need to show a commented example next to prose.

use crate::schema::Entry;
use std::fmt;

/// One documented slice of a schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocBlock {
    /// Dedented docstring of the first entry (empty if it has none)
    pub docstring: String,
    /// TOML fragment holding the block's entries
    pub toml: String,
}

impl fmt::Display for DocBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.docstring.is_empty() {
            writeln!(f, "{}", self.docstring)?;
            writeln!(f)?;
        }
        let toml = self.toml.trim();
        if !toml.is_empty() {
            writeln!(f, "```toml")?;
            writeln!(f, "{}", toml)?;
            writeln!(f, "```")?;
        }
        Ok(())
    }
}

/// Render blocks as Markdown prose followed by TOML code blocks
pub fn render_markdown(blocks: &[DocBlock]) -> String {
    blocks
        .iter()
        .map(ToString::to_string)
        .filter(|block| !block.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split entries before every entry with a non-empty docstring
///
/// The first group always starts at the first entry.
pub fn slice_groups(entries: &[Entry]) -> Vec<&[Entry]> {
    let mut groups = Vec::new();
    let mut start = 0;
    for (i, entry) in entries.iter().enumerate().skip(1) {
        if entry.docstring().is_some_and(|doc| !doc.is_empty()) {
            groups.push(&entries[start..i]);
            start = i;
        }
    }
    if start < entries.len() {
        groups.push(&entries[start..]);
    }
    groups
}

/// Remove common leading whitespace and surrounding blank lines
pub fn dedent(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let dedented: Vec<&str> = lines
        .iter()
        .map(|line| {
            if line.trim().is_empty() {
                ""
            } else {
                line.get(indent..).unwrap_or(line.trim_start()).trim_end()
            }
        })
        .collect();

    let first = dedented.iter().position(|line| !line.is_empty());
    let last = dedented.iter().rposition(|line| !line.is_empty());
    match (first, last) {
        (Some(first), Some(last)) => dedented[first..=last].join("\n"),
        _ => String::new(),
    }
}
