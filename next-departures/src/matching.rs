//! Weighted fuzzy matching for free-text entity lookup.
//!
//! Terms typed by a human ("port authority transit", "haddonfeld") are
//! ranked against candidate lists fetched from the API. Each entity type
//! declares which named fields participate and how heavily each counts;
//! scoring uses Jaro-Winkler similarity, which favours shared prefixes and
//! tolerates the misspellings that show up in hand-typed stop names.

use strsim::jaro_winkler;

/// How a term is matched against one entity type.
#[derive(Debug, Clone, Copy)]
pub struct MatchProfile {
    /// Candidates whose distance (1 - similarity) exceeds this are excluded.
    pub max_distance: f64,
    /// Split term and field on word boundaries and match token-wise.
    /// Helps multi-word stop names against partial or misspelled queries.
    pub tokenize: bool,
}

/// An entity that can be fuzzy-matched on named fields.
pub trait Matchable {
    /// Matching profile for this entity type.
    fn profile() -> MatchProfile;

    /// Participating fields with their relative weights.
    ///
    /// `None` fields are skipped and weights are normalised over the
    /// present ones, so a record missing its short name still ranks on the
    /// remaining fields rather than being penalised for the gap.
    fn fields(&self) -> Vec<(Option<&str>, f64)>;
}

/// Rank `candidates` against `term`, best match first.
///
/// Candidates past the profile's distance threshold are dropped. The sort
/// is stable and scores depend only on the term and the candidate, so a
/// given term and candidate list always rank the same way.
pub fn rank<T: Matchable>(term: &str, candidates: Vec<T>) -> Vec<T> {
    let profile = T::profile();
    let term = term.trim().to_lowercase();
    let mut scored: Vec<(f64, T)> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let score = score_fields(&term, &candidate.fields(), profile.tokenize);
            (1.0 - score <= profile.max_distance).then_some((score, candidate))
        })
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().map(|(_, candidate)| candidate).collect()
}

fn score_fields(term: &str, fields: &[(Option<&str>, f64)], tokenize: bool) -> f64 {
    let mut weight_sum = 0.0;
    let mut total = 0.0;
    for (value, weight) in fields {
        let Some(value) = value else { continue };
        let value = value.to_lowercase();
        let similarity = if tokenize {
            token_similarity(term, &value)
        } else {
            jaro_winkler(term, &value)
        };
        total += weight * similarity;
        weight_sum += weight;
    }
    if weight_sum == 0.0 {
        0.0
    } else {
        total / weight_sum
    }
}

/// Mean over the term's tokens of the best-matching field token.
fn token_similarity(term: &str, value: &str) -> f64 {
    let value_tokens: Vec<&str> = tokens(value).collect();
    if value_tokens.is_empty() {
        return 0.0;
    }
    let term_tokens: Vec<&str> = tokens(term).collect();
    if term_tokens.is_empty() {
        return 0.0;
    }
    let sum: f64 = term_tokens
        .iter()
        .map(|t| {
            value_tokens
                .iter()
                .map(|v| jaro_winkler(t, v))
                .fold(0.0, f64::max)
        })
        .sum();
    sum / term_tokens.len() as f64
}

fn tokens(s: &str) -> impl Iterator<Item = &str> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
}
