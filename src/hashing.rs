pub mod chaining;
pub mod functions;
pub mod open_addressing;
pub mod resize;


// Re-export the table types and their configuration
pub use chaining::{ChainingStats, ChainingTable, ChainingTableBuilder};
pub use functions::{djb2_hash, polynomial_hash, simple_hash, HashFunction, HashKey};
pub use open_addressing::{
    OpenAddressingTable, OpenAddressingTableBuilder, ProbeSequence, ProbingMethod, ProbingStats,
};
pub use resize::{load_factor, ResizePolicy, DEFAULT_LOAD_FACTOR_THRESHOLD, DEFAULT_SIZE};
