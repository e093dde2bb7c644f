//! Extension selection by user-supplied pattern

use crate::error::Result;
use keel_core::types::{ArtifactKey, Extension};
use keel_core::version::glob_to_regex;
use regex::RegexBuilder;

/// Outcome of matching a pattern against a catalog's extensions
#[derive(Debug)]
pub enum Selection<'a> {
    Selected(&'a Extension),
    NotFound,
    Ambiguous(Vec<&'a Extension>),
}

impl<'a> Selection<'a> {
    fn from_matches(mut matches: Vec<&'a Extension>) -> Self {
        match matches.len() {
            0 => Selection::NotFound,
            1 => Selection::Selected(matches.remove(0)),
            _ => Selection::Ambiguous(matches),
        }
    }
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?'])
}

/// Select a single extension
///
/// Tried in order, the first rule with any match decides:
/// 1. `groupId:artifactId` key
/// 2. exact artifactId
/// 3. exact name (case-insensitive)
/// 4. glob over artifactId, when the pattern holds `*` or `?`
pub fn select<'a>(pattern: &str, extensions: &'a [Extension]) -> Result<Selection<'a>> {
    let pattern = pattern.trim();

    if pattern.contains(':') && !is_glob(pattern) {
        let key: ArtifactKey = pattern.parse()?;
        let matches: Vec<_> = extensions.iter().filter(|e| e.key() == key).collect();
        return Ok(Selection::from_matches(matches));
    }

    let by_artifact: Vec<_> = extensions
        .iter()
        .filter(|e| e.artifact.artifact_id == pattern)
        .collect();
    if !by_artifact.is_empty() {
        return Ok(Selection::from_matches(by_artifact));
    }

    let by_name: Vec<_> = extensions
        .iter()
        .filter(|e| e.name.eq_ignore_ascii_case(pattern))
        .collect();
    if !by_name.is_empty() || !is_glob(pattern) {
        return Ok(Selection::from_matches(by_name));
    }

    let regex = RegexBuilder::new(&glob_to_regex(pattern)?)
        .case_insensitive(true)
        .build()
        .map_err(|e| keel_core::Error::invalid_config(format!("Invalid pattern '{}': {}", pattern, e)))?;
    let matches = extensions
        .iter()
        .filter(|e| {
            regex.is_match(&e.artifact.artifact_id) || regex.is_match(&e.key().to_string())
        })
        .collect();
    Ok(Selection::from_matches(matches))
}

/// Extensions whose artifactId, name, keywords or categories contain `query`
///
/// An empty query lists every extension except unlisted ones.
pub fn search<'a>(query: &str, extensions: &'a [Extension]) -> Vec<&'a Extension> {
    let query = query.trim().to_lowercase();
    extensions
        .iter()
        .filter(|e| {
            if query.is_empty() {
                return !e.metadata.unlisted;
            }
            e.artifact.artifact_id.to_lowercase().contains(&query)
                || e.name.to_lowercase().contains(&query)
                || e.metadata
                    .keywords
                    .iter()
                    .chain(&e.metadata.categories)
                    .any(|k| k.to_lowercase().contains(&query))
        })
        .collect()
}
