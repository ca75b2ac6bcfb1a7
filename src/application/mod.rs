// Application layer - use cases and orchestration.
// Validation and cross-entity checks live here; the store only persists.

pub mod converter;
pub mod error;
pub mod service;

pub use converter::*;
pub use error::*;
pub use service::*;
