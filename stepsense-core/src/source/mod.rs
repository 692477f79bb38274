//! Motion source adapters
//!
//! Platform adapters live with the application; this module carries the
//! adapters the engine itself ships:
//! - `memory` - Replay of recorded or synthetic samples (testing, simulation)

pub mod memory;

pub use memory::MemorySource;
