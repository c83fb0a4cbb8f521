// Term list store — the profanity vocabulary.
//
// Built once at startup from a newline-delimited file: each line is trimmed
// and lower-cased, blank lines are dropped. Each term gets a precompiled
// whole-word pattern so the per-request matcher never touches the regex
// compiler. Load order is preserved — match results report terms in the
// order the file lists them.

use std::fs;

use anyhow::{Context, Result};
use regex_lite::Regex;
use tracing::info;

pub struct TermList {
    entries: Vec<TermEntry>,
}

struct TermEntry {
    term: String,
    pattern: Regex,
}

impl TermList {
    /// Read the vocabulary file and build the list.
    pub fn load(path: &str) -> Result<Self> {
        let raw = fs::read_to_string(path).with_context(|| {
            format!(
                "Failed to read profanity list from {path}.\n\
                 Set PUMICE_TERMS_PATH or place a profanity.txt in the working directory."
            )
        })?;

        let list = Self::from_lines(raw.lines())?;
        info!("Loaded {} profanity terms", list.len());
        Ok(list)
    }

    /// Build a list from raw lines. Exposed separately so tests and tools
    /// can construct a list without a file on disk.
    pub fn from_lines<'a, I>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut entries = Vec::new();

        for line in lines {
            let term = line.trim().to_lowercase();
            if term.is_empty() {
                continue;
            }

            // Escape regex metacharacters so terms always match literally
            let pattern = Regex::new(&format!(r"\b{}\b", regex_lite::escape(&term)))
                .with_context(|| format!("Unusable term in profanity list: {term:?}"))?;

            entries.push(TermEntry { term, pattern });
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Terms with their patterns, in load order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &Regex)> {
        self.entries.iter().map(|e| (e.term.as_str(), &e.pattern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_lowercases_and_drops_blank_lines() {
        let list = TermList::from_lines(["  Damn  ", "", "   ", "HELL", "crap"]).unwrap();

        assert_eq!(list.len(), 3);
        let terms: Vec<&str> = list.iter().map(|(t, _)| t).collect();
        assert_eq!(terms, vec!["damn", "hell", "crap"]);
    }

    #[test]
    fn preserves_load_order_including_duplicates() {
        let list = TermList::from_lines(["zoo", "apple", "zoo"]).unwrap();

        let terms: Vec<&str> = list.iter().map(|(t, _)| t).collect();
        assert_eq!(terms, vec!["zoo", "apple", "zoo"]);
    }

    #[test]
    fn loads_from_disk() {
        let path = std::env::temp_dir().join("pumice_store_test_terms.txt");
        fs::write(&path, "Damn\n\nhell\n").unwrap();

        let list = TermList::load(path.to_str().unwrap()).unwrap();
        assert_eq!(list.len(), 2);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = TermList::load("/nonexistent/profanity.txt");
        assert!(result.is_err());
    }

    #[test]
    fn metacharacter_terms_compile() {
        // A term like "a$$" must be escaped, not treated as regex syntax
        let list = TermList::from_lines(["a$$", "f(x)"]).unwrap();
        assert_eq!(list.len(), 2);
    }
}
