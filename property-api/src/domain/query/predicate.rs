//! Storage-independent predicate trees over property fields.
//!
//! A [`Predicate`] is built once by the query engine and evaluated by every
//! store: in memory through [`Predicate::matches`], in SQL by translation.
//! Both evaluations must select the same records.

use std::borrow::Cow;

use strum::Display;

use crate::domain::models::Property;

/// Property attributes that queries can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    Pin,
    Pin10,
    ZipCode,
    CommunityArea,
    Township,
    Address,
    Business,
    ClassCode,
    Ward,
    Triad,
    Latitude,
    Longitude,
}

impl Field {
    /// Whether the field holds a number rather than text.
    pub fn is_numeric(self) -> bool {
        matches!(self, Field::Ward | Field::Latitude | Field::Longitude)
    }

    /// Textual value of the field, if present.
    pub fn text(self, property: &Property) -> Option<Cow<'_, str>> {
        match self {
            Field::Pin => Some(Cow::Borrowed(property.pin.as_str())),
            Field::Pin10 => Some(Cow::Borrowed(property.pin10.as_str())),
            Field::ZipCode => borrowed(&property.zip_code),
            Field::CommunityArea => borrowed(&property.community_area_name),
            Field::Township => borrowed(&property.township_name),
            Field::Address => borrowed(&property.address),
            Field::Business => borrowed(&property.business),
            Field::ClassCode => borrowed(&property.class_code),
            Field::Triad => borrowed(&property.triad_name),
            Field::Ward => property.ward_num.map(|ward| Cow::Owned(ward.to_string())),
            Field::Latitude => property.latitude.map(|lat| Cow::Owned(lat.to_string())),
            Field::Longitude => property.longitude.map(|lon| Cow::Owned(lon.to_string())),
        }
    }

    /// Numeric value of the field, if it is numeric and present.
    pub fn number(self, property: &Property) -> Option<f64> {
        match self {
            Field::Ward => property.ward_num.map(f64::from),
            Field::Latitude => property.latitude,
            Field::Longitude => property.longitude,
            _ => None,
        }
    }
}

fn borrowed(value: &Option<String>) -> Option<Cow<'_, str>> {
    value.as_deref().map(Cow::Borrowed)
}

/// A single test applied to one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Case-insensitive substring.
    Contains(String),
    /// Case-insensitive prefix.
    StartsWith(String),
    /// Exact, case-sensitive equality on the textual value.
    Equals(String),
    /// Inclusive numeric range.
    Between(f64, f64),
    /// Non-null and not blank.
    Present,
}

impl Condition {
    fn matches(&self, field: Field, property: &Property) -> bool {
        match self {
            Condition::Contains(needle) => field
                .text(property)
                .is_some_and(|value| value.to_lowercase().contains(&needle.to_lowercase())),
            Condition::StartsWith(prefix) => field
                .text(property)
                .is_some_and(|value| value.to_lowercase().starts_with(&prefix.to_lowercase())),
            Condition::Equals(expected) => field
                .text(property)
                .is_some_and(|value| value == expected.as_str()),
            Condition::Between(low, high) => field
                .number(property)
                .is_some_and(|value| *low <= value && value <= *high),
            Condition::Present => field
                .text(property)
                .is_some_and(|value| !value.trim().is_empty()),
        }
    }
}

/// Boolean expression over field conditions.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Predicate {
    /// Matches every record.
    #[default]
    All,
    Test(Field, Condition),
    /// All parts must match; an empty list matches everything.
    And(Vec<Predicate>),
    /// Any part must match; an empty list matches nothing.
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn contains(field: Field, needle: impl Into<String>) -> Self {
        Self::Test(field, Condition::Contains(needle.into()))
    }

    pub fn starts_with(field: Field, prefix: impl Into<String>) -> Self {
        Self::Test(field, Condition::StartsWith(prefix.into()))
    }

    pub fn equals(field: Field, value: impl Into<String>) -> Self {
        Self::Test(field, Condition::Equals(value.into()))
    }

    pub fn between(field: Field, low: f64, high: f64) -> Self {
        Self::Test(field, Condition::Between(low, high))
    }

    pub fn present(field: Field) -> Self {
        Self::Test(field, Condition::Present)
    }

    /// Conjunction that flattens nested `And`s and drops `All`.
    pub fn and(self, other: Predicate) -> Self {
        let mut parts = Vec::new();
        for predicate in [self, other] {
            match predicate {
                Predicate::All => {}
                Predicate::And(inner) => parts.extend(inner),
                other => parts.push(other),
            }
        }

        match parts.len() {
            0 => Predicate::All,
            1 => parts.remove(0),
            _ => Predicate::And(parts),
        }
    }

    /// Disjunction of every predicate in `predicates`.
    pub fn any_of(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        let mut parts: Vec<Predicate> = predicates.into_iter().collect();
        if parts.len() == 1 {
            parts.remove(0)
        } else {
            Predicate::Or(parts)
        }
    }

    pub fn negate(self) -> Self {
        Predicate::Not(Box::new(self))
    }

    /// Evaluate against a single record.
    pub fn matches(&self, property: &Property) -> bool {
        match self {
            Predicate::All => true,
            Predicate::Test(field, condition) => condition.matches(*field, property),
            Predicate::And(parts) => parts.iter().all(|part| part.matches(property)),
            Predicate::Or(parts) => parts.iter().any(|part| part.matches(property)),
            Predicate::Not(inner) => !inner.matches(property),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property() -> Property {
        let mut property = Property::new("17-10-100-100-0000");
        property.community_area_name = Some("NEAR NORTH SIDE".to_string());
        property.zip_code = Some("60611".to_string());
        property.ward_num = Some(42);
        property.latitude = Some(41.89);
        property.longitude = Some(-87.62);
        property
    }

    #[test]
    fn contains_is_case_insensitive() {
        let property = property();
        assert!(Predicate::contains(Field::CommunityArea, "north").matches(&property));
        assert!(!Predicate::contains(Field::CommunityArea, "south").matches(&property));
    }

    #[test]
    fn starts_with_matches_prefix_only() {
        let property = property();
        assert!(Predicate::starts_with(Field::Pin, "17-10").matches(&property));
        assert!(!Predicate::starts_with(Field::Pin, "10-100").matches(&property));
        assert!(Predicate::starts_with(Field::Pin10, "171010").matches(&property));
    }

    #[test]
    fn equals_compares_textual_value() {
        let property = property();
        assert!(Predicate::equals(Field::Ward, "42").matches(&property));
        assert!(!Predicate::equals(Field::ZipCode, "6061").matches(&property));
    }

    #[test]
    fn missing_values_never_match() {
        let property = Property::new("20001");
        assert!(!Predicate::contains(Field::ZipCode, "").matches(&property));
        assert!(!Predicate::between(Field::Latitude, -90.0, 90.0).matches(&property));
        assert!(!Predicate::present(Field::Address).matches(&property));
    }

    #[test]
    fn present_rejects_blank_text() {
        let mut property = Property::new("20001");
        property.address = Some("   ".to_string());
        assert!(!Predicate::present(Field::Address).matches(&property));
    }

    #[test]
    fn between_is_inclusive() {
        let property = property();
        assert!(Predicate::between(Field::Latitude, 41.89, 41.89).matches(&property));
        assert!(!Predicate::between(Field::Longitude, -87.61, -87.0).matches(&property));
    }

    #[test]
    fn and_flattens_and_drops_all() {
        let predicate = Predicate::All
            .and(Predicate::present(Field::Pin))
            .and(Predicate::present(Field::ZipCode).and(Predicate::present(Field::Ward)));
        match predicate {
            Predicate::And(parts) => assert_eq!(parts.len(), 3),
            other => panic!("expected And, got {:?}", other),
        }

        assert_eq!(Predicate::All.and(Predicate::All), Predicate::All);
    }

    #[test]
    fn empty_or_matches_nothing() {
        assert!(!Predicate::any_of(Vec::new()).matches(&property()));
        assert!(Predicate::And(Vec::new()).matches(&property()));
    }

    #[test]
    fn negate_inverts() {
        let predicate = Predicate::equals(Field::Pin, "17-10-100-100-0000").negate();
        assert!(!predicate.matches(&property()));
    }
}
