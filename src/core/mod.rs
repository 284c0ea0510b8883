pub mod export;
pub mod request;
pub mod samples;
pub mod service;
pub mod session;

pub use crate::domain::model::{LocationNode, LocationType, Sample, SampleRequest};
pub use crate::domain::plate::{CellCode, PlateCoordinate, PlateGeometry};
pub use crate::domain::ports::{ConfigProvider, SampleRepository};
pub use crate::utils::error::Result;
