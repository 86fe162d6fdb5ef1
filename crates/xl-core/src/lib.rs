#[macro_use]
pub mod macros;

pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod pretty;
pub mod span;
pub mod types;
pub mod utils;

// Re-export commonly used items for convenience
pub use eyre;
pub use tracing;

// Alias for error types
pub type Error = crate::error::Error;
pub type Result<T> = crate::error::Result<T>;
