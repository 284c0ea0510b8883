// Domain layer: sample and location models, plate addressing and ports.

pub mod model;
pub mod plate;
pub mod ports;
