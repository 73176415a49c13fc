//! Speakerbox Server Library
//!
//! HTTP service for a shared sound library: accounts, uploads, favorites and
//! playback of library files through the host's speakers.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod router;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use router::create_router;
pub use services::{auth::AuthService, file_storage::FileStorage};
pub use state::AppState;
