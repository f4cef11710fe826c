use std::cmp::Ordering as CmpOrdering;
use std::str::FromStr;

use strum::{Display, EnumString};

use crate::domain::{models::Property, QueryError};

/// Columns a listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum SortField {
    #[default]
    Pin,
    #[strum(to_string = "zip_code", serialize = "zip")]
    ZipCode,
    #[strum(to_string = "ward", serialize = "ward_num")]
    Ward,
}

/// Sort order for a scan. Missing values sort last in both directions and
/// ties are broken by ascending `pin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ordering {
    pub field: SortField,
    pub descending: bool,
}

impl Ordering {
    pub fn compare(&self, a: &Property, b: &Property) -> CmpOrdering {
        let directed = |ordering: CmpOrdering| {
            if self.descending {
                ordering.reverse()
            } else {
                ordering
            }
        };

        let primary = match self.field {
            SortField::Pin => return directed(a.pin.cmp(&b.pin)),
            SortField::ZipCode => nulls_last(a.zip_code.as_ref(), b.zip_code.as_ref(), directed),
            SortField::Ward => nulls_last(a.ward_num.as_ref(), b.ward_num.as_ref(), directed),
        };

        primary.then_with(|| a.pin.cmp(&b.pin))
    }

    pub fn is_natural(&self) -> bool {
        *self == Ordering::default()
    }
}

fn nulls_last<T: Ord>(
    a: Option<&T>,
    b: Option<&T>,
    directed: impl Fn(CmpOrdering) -> CmpOrdering,
) -> CmpOrdering {
    match (a, b) {
        (Some(a), Some(b)) => directed(a.cmp(b)),
        (Some(_), None) => CmpOrdering::Less,
        (None, Some(_)) => CmpOrdering::Greater,
        (None, None) => CmpOrdering::Equal,
    }
}

impl FromStr for Ordering {
    type Err = QueryError;

    /// Parses `field` or `-field` for descending order.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (descending, name) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let field = SortField::from_str(name)
            .map_err(|_| QueryError::invalid(format!("cannot order by '{}'", name)))?;

        Ok(Self { field, descending })
    }
}

/// Window and order of a store scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanRequest {
    pub ordering: Ordering,
    pub offset: usize,
    pub limit: usize,
}

impl ScanRequest {
    /// The first `limit` records in natural (`pin`) order.
    pub fn first(limit: usize) -> Self {
        Self {
            ordering: Ordering::default(),
            offset: 0,
            limit,
        }
    }
}
