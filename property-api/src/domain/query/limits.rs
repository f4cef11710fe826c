use serde::Deserialize;

/// Default and ceiling for a result-count parameter.
///
/// Requests are clamped rather than rejected: a missing or non-positive
/// limit becomes the default, and anything above the ceiling is cut down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LimitPolicy {
    pub default: usize,
    pub max: usize,
}

impl LimitPolicy {
    pub const fn new(default: usize, max: usize) -> Self {
        Self { default, max }
    }

    pub fn resolve(&self, requested: Option<i64>) -> usize {
        match requested {
            Some(n) if n > 0 => usize::try_from(n).unwrap_or(usize::MAX).min(self.max),
            _ => self.default.min(self.max),
        }
    }
}
