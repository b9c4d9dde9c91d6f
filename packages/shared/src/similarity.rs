//! Duplicate-doubt hint scoring.
//!
//! Scores are Sørensen–Dice coefficients over character bigrams of the
//! normalized texts (lowercased, whitespace removed). The score is advisory:
//! it is shown to someone composing a doubt and never blocks a submission.

use std::collections::HashMap;

use serde::Serialize;

/// Percentage above which a draft is flagged as a likely duplicate
pub const HIGH_SIMILARITY_PERCENT: f64 = 70.0;

/// Percentage above which a draft is flagged as related
pub const MODERATE_SIMILARITY_PERCENT: f64 = 40.0;

/// Best scoring corpus entry for a candidate text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestMatch {
    /// Similarity in `[0, 1]`
    pub score: f64,
    /// Index of the matching entry in the corpus
    pub index: usize,
}

impl BestMatch {
    /// Score as a percentage in `[0, 100]`
    pub fn percent(&self) -> f64 {
        self.score * 100.0
    }

    /// Classification of the score for display
    pub fn level(&self) -> SimilarityLevel {
        SimilarityLevel::from_score(self.score)
    }
}

/// Coarse classification of a similarity score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityLevel {
    Low,
    Moderate,
    High,
}

impl SimilarityLevel {
    /// Classify a score in `[0, 1]`
    pub fn from_score(score: f64) -> Self {
        let percent = score * 100.0;
        if percent > HIGH_SIMILARITY_PERCENT {
            Self::High
        } else if percent > MODERATE_SIMILARITY_PERCENT {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}

fn normalize(text: &str) -> Vec<char> {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Compare two texts, returning a similarity in `[0, 1]`.
///
/// Texts that are equal after normalization score `1.0`. Otherwise texts
/// with fewer than two characters have no bigrams and score `0.0`.
pub fn compare(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);

    if a == b {
        return 1.0;
    }
    if a.len() < 2 || b.len() < 2 {
        return 0.0;
    }

    let mut bigrams: HashMap<(char, char), usize> = HashMap::new();
    for pair in a.windows(2) {
        *bigrams.entry((pair[0], pair[1])).or_insert(0) += 1;
    }

    let mut intersection = 0usize;
    for pair in b.windows(2) {
        if let Some(count) = bigrams.get_mut(&(pair[0], pair[1]))
            && *count > 0
        {
            *count -= 1;
            intersection += 1;
        }
    }

    (2 * intersection) as f64 / (a.len() + b.len() - 2) as f64
}

/// Find the corpus entry most similar to `candidate`.
///
/// Returns `None` for an empty corpus. Ties keep the earliest entry.
pub fn best_match<S: AsRef<str>>(candidate: &str, corpus: &[S]) -> Option<BestMatch> {
    corpus
        .iter()
        .enumerate()
        .map(|(index, text)| BestMatch {
            score: compare(candidate, text.as_ref()),
            index,
        })
        .fold(None, |best: Option<BestMatch>, current| match best {
            Some(best) if best.score >= current.score => Some(best),
            _ => Some(current),
        })
}

/// Best score of `candidate` against `corpus`, `0.0` when the corpus is empty
pub fn best_match_score<S: AsRef<str>>(candidate: &str, corpus: &[S]) -> f64 {
    best_match(candidate, corpus).map_or(0.0, |m| m.score)
}
