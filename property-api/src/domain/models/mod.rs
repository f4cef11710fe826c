mod geojson;
mod pin;
mod property;

pub use geojson::*;
pub use property::*;
