mod error;

pub mod models;
pub mod ports;
pub mod query;
pub mod services;

pub use error::*;
