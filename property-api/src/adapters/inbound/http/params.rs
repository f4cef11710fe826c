//! Query-string value parsing.
//!
//! Handlers take raw `Option<String>` parameters so that a malformed value
//! becomes a domain `InvalidArgument` (and a JSON 400) instead of an
//! extractor rejection. Empty values count as missing.

use std::{fmt::Display, str::FromStr};

use crate::domain::{
    query::{BoundingBox, Ordering, SearchScope},
    QueryError,
};

pub fn parse_optional<T>(name: &str, value: Option<&str>) -> Result<Option<T>, QueryError>
where
    T: FromStr,
    T::Err: Display,
{
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| QueryError::invalid(format!("invalid {} '{}': {}", name, raw, e))),
    }
}

pub fn parse_required<T>(name: &str, value: Option<&str>) -> Result<T, QueryError>
where
    T: FromStr,
    T::Err: Display,
{
    parse_optional(name, value)?
        .ok_or_else(|| QueryError::invalid(format!("{} is required", name)))
}

/// `type` parameter of a search; unknown names are rejected.
pub fn parse_scope(value: Option<&str>) -> Result<SearchScope, QueryError> {
    Ok(parse_optional("search type", value)?.unwrap_or_default())
}

/// `ordering` parameter of a listing, e.g. `-zip_code`.
pub fn parse_ordering(value: Option<&str>) -> Result<Ordering, QueryError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(Ordering::default()),
        Some(raw) => raw.parse(),
    }
}

/// Map bounds from `north`, `south`, `east` and `west`.
///
/// The box applies only when all four edges are present and numeric;
/// anything less is ignored rather than rejected.
pub fn parse_bbox(
    north: Option<&str>,
    south: Option<&str>,
    east: Option<&str>,
    west: Option<&str>,
) -> Option<BoundingBox> {
    let edge = |value: Option<&str>| value.and_then(|v| v.trim().parse::<f64>().ok());
    Some(BoundingBox::from_edges(
        edge(north)?,
        edge(south)?,
        edge(east)?,
        edge(west)?,
    ))
}
