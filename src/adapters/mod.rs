// Adapters layer: concrete implementations of the domain ports.

pub mod memory;
pub mod rest;

pub use memory::InMemorySampleRepository;
pub use rest::RestSampleRepository;
