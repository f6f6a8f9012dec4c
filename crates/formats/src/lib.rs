pub mod error;
pub mod geojson;
pub mod matches_csv;
pub mod tournaments;
pub mod venues;

pub use error::*;
pub use geojson::*;
pub use matches_csv::*;
pub use tournaments::*;
pub use venues::*;
