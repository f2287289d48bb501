pub mod access;
pub mod cache;
pub mod directory;
pub mod engine;
pub mod error;
pub mod schedule;
pub mod summary;
pub mod types;

pub use engine::LoanEngine;
pub use error::LoanEngineError;
pub use types::*;

/// Standard result type for all loan-engine operations
pub type LoanEngineResult<T> = Result<T, LoanEngineError>;
