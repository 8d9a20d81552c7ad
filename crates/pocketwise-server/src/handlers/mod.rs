//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod advice;
pub mod health;
pub mod summary;
pub mod transactions;

// Re-export all handlers for use in router
pub use advice::*;
pub use health::*;
pub use summary::*;
pub use transactions::*;
