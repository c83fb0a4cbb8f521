// Profanity matcher — whole-word scan of extracted text.
//
// Matching is case-insensitive (the text is lower-cased once, the terms are
// stored lower-cased) and whole-word: a term hits only when bounded by
// non-word characters or the string edges on both sides, so "ass" does not
// flag "class assignment". O(terms x text length) worst case — fine for a
// small vocabulary loaded once.

use serde::{Deserialize, Serialize};

use super::store::TermList;

/// The profanity half of the moderation verdict.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfanityCheck {
    pub flagged: bool,
    /// Every term that hit, in term-list order. Not deduplicated — a list
    /// containing a term twice reports it twice.
    pub matches: Vec<String>,
}

/// Scan `text` against the loaded term list.
///
/// Absent or empty text short-circuits to a clean result without scanning.
pub fn check(terms: &TermList, text: Option<&str>) -> ProfanityCheck {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return ProfanityCheck::default();
    };

    let lower = text.to_lowercase();
    let mut matches = Vec::new();

    for (term, pattern) in terms.iter() {
        if pattern.is_match(&lower) {
            matches.push(term.to_string());
        }
    }

    ProfanityCheck {
        flagged: !matches.is_empty(),
        matches,
    }
}
