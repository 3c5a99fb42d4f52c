//! Shared types for the commission engine
//!
//! Domain models and utility types used by the server and by client crates.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
