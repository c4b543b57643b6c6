// All core functionality is in outliner-core
// This CLI acts as a thin wrapper around the core library

// CLI-specific modules
pub mod batch;

// Re-export core types for convenience
pub use outliner_core::*;

// Re-export CLI utilities
pub use batch::{process_batch, BatchOptions, BatchReport, DocumentResult};
