//! Query building blocks shared by the engine and the stores.

mod filters;
mod geo;
mod limits;
mod outcome;
mod predicate;
mod scan;
mod scope;
mod suggestion;

pub use filters::*;
pub use geo::*;
pub use limits::*;
pub use outcome::*;
pub use predicate::*;
pub use scan::*;
pub use scope::*;
pub use suggestion::*;
