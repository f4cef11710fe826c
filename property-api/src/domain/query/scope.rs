use serde::Deserialize;
use strum::{Display, EnumString};

use super::predicate::{Field, Predicate};

/// Which attributes a free-text search looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SearchScope {
    #[default]
    All,
    Pin,
    #[strum(to_string = "zip", serialize = "zip_code")]
    ZipCode,
    #[strum(to_string = "area", serialize = "community_area")]
    CommunityArea,
    Address,
    Business,
}

/// How identifier fields (`pin`, `pin10`) are matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierMatch {
    #[default]
    Prefix,
    Substring,
}

impl IdentifierMatch {
    fn predicate(self, field: Field, term: &str) -> Predicate {
        match self {
            IdentifierMatch::Prefix => Predicate::starts_with(field, term),
            IdentifierMatch::Substring => Predicate::contains(field, term),
        }
    }
}

/// Descriptive fields searched under [`SearchScope::All`].
const DESCRIPTIVE_FIELDS: [Field; 5] = [
    Field::ZipCode,
    Field::CommunityArea,
    Field::Township,
    Field::Address,
    Field::Business,
];

impl SearchScope {
    /// Build the match predicate for `term` within this scope.
    ///
    /// Multi-field scopes are a single disjunction, so a record matching on
    /// several fields is still selected once.
    pub fn predicate(self, term: &str, identifiers: IdentifierMatch) -> Predicate {
        let pin = || {
            [Field::Pin, Field::Pin10]
                .into_iter()
                .map(|field| identifiers.predicate(field, term))
        };

        match self {
            SearchScope::All => Predicate::any_of(
                pin().chain(
                    DESCRIPTIVE_FIELDS
                        .into_iter()
                        .map(|field| Predicate::contains(field, term)),
                ),
            ),
            SearchScope::Pin => Predicate::any_of(pin()),
            SearchScope::ZipCode => Predicate::contains(Field::ZipCode, term),
            SearchScope::CommunityArea => Predicate::contains(Field::CommunityArea, term),
            SearchScope::Address => Predicate::contains(Field::Address, term),
            SearchScope::Business => Predicate::contains(Field::Business, term),
        }
    }
}
