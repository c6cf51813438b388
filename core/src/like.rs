//! LIKE pattern helpers.
//!
//! Patterns use `%` for any run of characters, `_` for a single character and
//! `\` to take the next character literally.

use crate::{CoreError, CoreResult};
use regex_lite::Regex;

/// Escape the wildcard and escape characters of a literal text.
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Reject patterns ending in an unterminated escape.
pub fn check_like_pattern(pattern: &str) -> CoreResult<()> {
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c == '\\' && chars.next().is_none() {
            return Err(CoreError::invalid_pattern(
                pattern,
                "pattern ends with a dangling escape",
            ));
        }
    }
    Ok(())
}

/// A compiled LIKE pattern.
#[derive(Debug, Clone)]
pub struct LikePattern {
    regex: Regex,
}

impl LikePattern {
    pub fn compile(pattern: &str, case_insensitive: bool) -> CoreResult<Self> {
        check_like_pattern(pattern)?;
        let mut source = String::from(if case_insensitive { "(?is)^" } else { "(?s)^" });
        let mut chars = pattern.chars();
        while let Some(c) = chars.next() {
            match c {
                '%' => source.push_str(".*"),
                '_' => source.push('.'),
                '\\' => {
                    if let Some(literal) = chars.next() {
                        source.push_str(&regex_lite::escape(literal.encode_utf8(&mut [0; 4])));
                    }
                }
                other => source.push_str(&regex_lite::escape(other.encode_utf8(&mut [0; 4]))),
            }
        }
        source.push('$');
        let regex =
            Regex::new(&source).map_err(|e| CoreError::invalid_pattern(pattern, e.to_string()))?;
        Ok(Self { regex })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}
