mod params;
mod responses;

pub use params::*;
pub use responses::*;
