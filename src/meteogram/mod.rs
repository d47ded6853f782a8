pub mod merge;
pub mod meteoam;
pub mod mock;
pub mod params;
pub mod types;
