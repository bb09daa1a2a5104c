//! Keyword-based category suggestions
//!
//! A small rule table maps each category to a set of keywords. Matching is a
//! pure function over that table: case-insensitive, on word boundaries, and
//! the first rule (in table order) with a matching keyword wins.

use regex::Regex;

use crate::config::CategoryRuleConfig;
use crate::error::Result;

/// A compiled rule: one category and a regex over its keywords
#[derive(Debug, Clone)]
struct CompiledRule {
    category: String,
    pattern: Regex,
}

/// Ordered, compiled category keyword table
#[derive(Debug, Clone, Default)]
pub struct CategoryRules {
    rules: Vec<CompiledRule>,
}

impl CategoryRules {
    /// Compile a keyword table. Rules without usable keywords are skipped.
    pub fn new(table: &[CategoryRuleConfig]) -> Result<Self> {
        let mut rules = Vec::with_capacity(table.len());

        for entry in table {
            let alternatives: Vec<String> = entry
                .keywords
                .iter()
                .map(|k| k.trim())
                .filter(|k| !k.is_empty())
                .map(keyword_pattern)
                .collect();

            if alternatives.is_empty() {
                continue;
            }

            let pattern = Regex::new(&format!("(?i)(?:{})", alternatives.join("|")))?;
            rules.push(CompiledRule {
                category: entry.name.trim().to_string(),
                pattern,
            });
        }

        Ok(Self { rules })
    }

    /// Suggest a category for free text (description, note, merchant)
    pub fn suggest(&self, text: &str) -> Option<&str> {
        if text.trim().is_empty() {
            return None;
        }
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(text))
            .map(|rule| rule.category.as_str())
    }

    /// Categories in priority order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.category.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
}

/// Escape a keyword, anchoring word-character edges to word boundaries
fn keyword_pattern(keyword: &str) -> String {
    let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
    let start = if is_word(keyword.chars().next()) { r"\b" } else { "" };
    let end = if is_word(keyword.chars().last()) { r"\b" } else { "" };
    format!("{}{}{}", start, regex::escape(keyword), end)
}
