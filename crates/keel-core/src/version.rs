//! Version ordering and recognized-version expressions
//!
//! Platform and core versions are Maven-style (`2.7.1.Final`, `3.2`,
//! `1.0-SNAPSHOT`), not semver, so they get their own comparator.

use crate::error::{Error, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Number(u64),
    Text(&'a str),
}

fn segments(version: &str) -> impl Iterator<Item = Segment<'_>> {
    version
        .split(['.', '-'])
        .filter(|s| !s.is_empty())
        .map(|s| match s.parse::<u64>() {
            Ok(n) => Segment::Number(n),
            Err(_) => Segment::Text(s),
        })
}

/// Compare two dotted versions segment by segment
///
/// Numeric segments compare numerically and rank above textual ones
/// (`2.7.1` > `2.7.Final`); textual segments compare case-insensitively.
/// A missing trailing segment ranks below a numeric one and above a
/// textual qualifier, so `2.7` < `2.7.1` and `2.7-SNAPSHOT` < `2.7`.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = segments(a);
    let mut right = segments(b);
    loop {
        let ord = match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (Some(Segment::Number(_)), None) => Ordering::Greater,
            (Some(Segment::Text(_)), None) => Ordering::Less,
            (None, Some(Segment::Number(_))) => Ordering::Less,
            (None, Some(Segment::Text(_))) => Ordering::Greater,
            (Some(Segment::Number(x)), Some(Segment::Number(y))) => x.cmp(&y),
            (Some(Segment::Number(_)), Some(Segment::Text(_))) => Ordering::Greater,
            (Some(Segment::Text(_)), Some(Segment::Number(_))) => Ordering::Less,
            (Some(Segment::Text(x)), Some(Segment::Text(y))) => {
                x.to_ascii_lowercase().cmp(&y.to_ascii_lowercase())
            }
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
}

/// Glob expression over versions, e.g. `2.*`, `2.7.?.Final`, `{1.13,2}.*`
#[derive(Clone)]
pub struct VersionExpression {
    expression: String,
    pattern: Regex,
}

impl VersionExpression {
    pub fn parse(expression: &str) -> Result<Self> {
        let expression = expression.trim();
        if expression.is_empty() {
            return Err(Error::invalid_version_expression(expression, "empty"));
        }
        let regex = glob_to_regex(expression)?;
        let pattern = Regex::new(&regex)
            .map_err(|e| Error::invalid_version_expression(expression, e.to_string()))?;
        Ok(Self {
            expression: expression.to_string(),
            pattern,
        })
    }

    pub fn matches(&self, version: &str) -> bool {
        self.pattern.is_match(version)
    }

    pub fn as_str(&self) -> &str {
        &self.expression
    }
}

impl fmt::Debug for VersionExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VersionExpression")
            .field(&self.expression)
            .finish()
    }
}

/// Translate a glob into an anchored regex
///
/// `*` matches any run of characters, `?` exactly one, `{a,b}` either
/// alternative. Everything else is literal.
pub fn glob_to_regex(glob: &str) -> Result<String> {
    let mut out = String::from("^");
    let mut depth = 0usize;
    for c in glob.chars() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '{' => {
                depth += 1;
                out.push_str("(?:");
            }
            '}' if depth > 0 => {
                depth -= 1;
                out.push(')');
            }
            ',' if depth > 0 => out.push('|'),
            _ => out.push_str(&regex::escape(&c.to_string())),
        }
    }
    if depth != 0 {
        return Err(Error::invalid_version_expression(glob, "unbalanced '{'"));
    }
    out.push('$');
    Ok(out)
}
