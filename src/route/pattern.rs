//! Route pattern compiler and matcher.
//!
//! A pattern such as `/%module%/%controller%(/%action%)(/*)` is tokenized once
//! into literals, placeholders and optional groups. The token tree drives both
//! directions: it is compiled into an anchored regex for matching, and walked
//! directly for URL generation (see `generate.rs`), so the two can never
//! disagree about what a pattern means.

use regex::Regex;
use tracing::debug;

use super::RouteError;
use crate::http::Params;

/// Trailing suffix that lets a pattern swallow any remaining sub-path.
pub const CATCH_ALL_SUFFIX: &str = "(/*)";

/// Prefix of the regex capture group names used for placeholders.
const CAPTURE_PREFIX: &str = "p";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Literal(String),
    Placeholder(String),
    Optional(Vec<Token>),
}

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    source: String,
    pub(crate) tokens: Vec<Token>,
    placeholders: Vec<String>,
    captures: Vec<String>,
    regex: Regex,
}

impl RoutePattern {
    /// Compile `pattern`.
    ///
    /// # Errors
    ///
    /// [`RouteError::InvalidPattern`] when the optional-group parentheses are
    /// unbalanced.
    pub fn compile(pattern: &str) -> Result<Self, RouteError> {
        let (body, catch_all) = match pattern.strip_suffix(CATCH_ALL_SUFFIX) {
            Some(body) => (body, true),
            None => (pattern, false),
        };

        let tokens = tokenize(body).map_err(|reason| RouteError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        })?;

        let mut captures = Vec::new();
        let mut expr = String::with_capacity(body.len() * 2 + 16);
        expr.push('^');
        push_regex(&tokens, &mut expr, &mut captures);
        if catch_all {
            expr.push_str("(?:/.*)?");
        }
        expr.push('$');

        let regex = Regex::new(&expr).map_err(|e| RouteError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        let mut placeholders: Vec<String> = Vec::with_capacity(captures.len());
        for name in &captures {
            if !placeholders.contains(name) {
                placeholders.push(name.clone());
            }
        }

        debug!(
            pattern = %pattern,
            regex = %regex.as_str(),
            placeholders = ?placeholders,
            catch_all = catch_all,
            "Route pattern compiled"
        );

        Ok(Self {
            source: pattern.to_string(),
            tokens,
            placeholders,
            captures,
            regex,
        })
    }

    /// The pattern as written.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Placeholder names in order of first appearance.
    #[inline]
    #[must_use]
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Match `path` and extract placeholder values.
    ///
    /// Returns `None` when the path does not match. Captured values have
    /// trailing `/` trimmed; values that end up empty are left out, so an
    /// unmatched optional segment means "absent", not "empty string".
    #[must_use]
    pub fn captures(&self, path: &str) -> Option<Params> {
        let caps = self.regex.captures(path)?;
        let mut params = Params::new();
        for (idx, name) in self.captures.iter().enumerate() {
            let Some(m) = caps.name(&capture_name(idx)) else {
                continue;
            };
            let value = m.as_str().trim_end_matches('/');
            if !value.is_empty() {
                params.insert(name.clone(), value.to_string());
            }
        }
        Some(params)
    }
}

fn capture_name(idx: usize) -> String {
    format!("{CAPTURE_PREFIX}{idx}")
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | ':' | '.' | '-')
}

/// Split a pattern into literal, placeholder and optional-group tokens.
///
/// `%name%` is a placeholder when `name` is one or more of `[\w:.\-]`; any
/// other `%` is literal text. Parentheses are always structural.
fn tokenize(pattern: &str) -> Result<Vec<Token>, String> {
    let mut stack: Vec<Vec<Token>> = vec![Vec::new()];
    let mut literal = String::new();
    let chars: Vec<(usize, char)> = pattern.char_indices().collect();
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];
        match c {
            '(' => {
                flush_literal(&mut literal, &mut stack);
                stack.push(Vec::new());
            }
            ')' => {
                flush_literal(&mut literal, &mut stack);
                if stack.len() < 2 {
                    return Err(format!("unexpected ')' at offset {pos}"));
                }
                let group = stack.pop().unwrap_or_default();
                if let Some(parent) = stack.last_mut() {
                    parent.push(Token::Optional(group));
                }
            }
            '%' => {
                let mut end = i + 1;
                while end < chars.len() && is_name_char(chars[end].1) {
                    end += 1;
                }
                if end > i + 1 && end < chars.len() && chars[end].1 == '%' {
                    flush_literal(&mut literal, &mut stack);
                    let name: String = chars[i + 1..end].iter().map(|(_, c)| *c).collect();
                    if let Some(current) = stack.last_mut() {
                        current.push(Token::Placeholder(name));
                    }
                    i = end + 1;
                    continue;
                }
                literal.push('%');
            }
            _ => literal.push(c),
        }
        i += 1;
    }

    flush_literal(&mut literal, &mut stack);
    if stack.len() != 1 {
        return Err(format!("{} unclosed '('", stack.len() - 1));
    }
    Ok(stack.pop().unwrap_or_default())
}

fn flush_literal(literal: &mut String, stack: &mut [Vec<Token>]) {
    if literal.is_empty() {
        return;
    }
    if let Some(current) = stack.last_mut() {
        current.push(Token::Literal(std::mem::take(literal)));
    }
}

fn push_regex(tokens: &[Token], expr: &mut String, captures: &mut Vec<String>) {
    for token in tokens {
        match token {
            Token::Literal(text) => expr.push_str(&regex::escape(text)),
            Token::Placeholder(name) => {
                expr.push_str("(?P<");
                expr.push_str(&capture_name(captures.len()));
                expr.push_str(">.+?)");
                captures.push(name.clone());
            }
            Token::Optional(children) => {
                expr.push_str("(?:");
                push_regex(children, expr, captures);
                expr.push_str(")?");
            }
        }
    }
}
