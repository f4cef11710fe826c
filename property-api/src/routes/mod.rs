pub(crate) mod error;
pub(crate) mod properties;

pub(crate) use error::ApiError;
