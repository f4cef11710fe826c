mod property_query;

pub use property_query::*;
