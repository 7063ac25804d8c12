//! Domain types: athletes, event results, point scales and the dataset snapshot.

pub mod athlete;
pub mod dataset;
pub mod point_scale;

pub use athlete::{Athlete, EventResult};
pub use dataset::{Dataset, DatasetError};
pub use point_scale::{parse_place_key, PointScale};
