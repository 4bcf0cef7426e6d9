mod simulated_source;

pub use simulated_source::{SimulatedSource, SimulatedSourceConfig};
