use itertools::Itertools;
use serde::Serialize;
use strum::Display;

use super::predicate::{Field, Predicate};

/// Where an autocomplete suggestion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SuggestionSource {
    Pin,
    #[serde(rename = "area")]
    #[strum(to_string = "area")]
    CommunityArea,
    Address,
    Business,
}

impl SuggestionSource {
    /// Sources in the order their suggestions are listed.
    pub const PRECEDENCE: [SuggestionSource; 4] = [
        SuggestionSource::Pin,
        SuggestionSource::CommunityArea,
        SuggestionSource::Address,
        SuggestionSource::Business,
    ];

    pub fn field(self) -> Field {
        match self {
            SuggestionSource::Pin => Field::Pin,
            SuggestionSource::CommunityArea => Field::CommunityArea,
            SuggestionSource::Address => Field::Address,
            SuggestionSource::Business => Field::Business,
        }
    }

    /// Share of `limit` this source may contribute, at least one.
    pub fn cap(self, limit: usize) -> usize {
        let share = match self {
            SuggestionSource::Pin => limit / 2,
            _ => limit / 4,
        };
        share.max(1)
    }

    /// PINs match on prefix, everything else on substring.
    pub fn predicate(self, prefix: &str) -> Predicate {
        let field = self.field();
        let matcher = match self {
            SuggestionSource::Pin => Predicate::starts_with(field, prefix),
            _ => Predicate::contains(field, prefix),
        };
        matcher.and(Predicate::present(field))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub value: String,
    #[serde(rename = "type")]
    pub source_type: SuggestionSource,
}

/// Concatenate per-source values in precedence order and cut to `limit`.
///
/// Blank and repeated values within a source are dropped. The same value may
/// still appear once per source.
pub fn merge_suggestions(
    batches: impl IntoIterator<Item = (SuggestionSource, Vec<String>)>,
    limit: usize,
) -> Vec<Suggestion> {
    batches
        .into_iter()
        .flat_map(|(source_type, values)| {
            values
                .into_iter()
                .filter(|value| !value.trim().is_empty())
                .unique()
                .map(move |value| Suggestion { value, source_type })
        })
        .take(limit)
        .collect()
}
