//! WW3 Core - configuration and NAMELIST synchronization for the WW3 tool.
//!
//! This crate contains all business logic with zero UI dependencies.
//! The GUI talks to it through `ww3_bridge`; anything else (tests, scripts)
//! can drive it directly.
//!
//! Layering, leaves first:
//! - [`config`]: the persisted JSON user configuration
//! - [`locale`]: canonical tokens vs. localized display strings
//! - [`namelist`]: comment-preserving NAMELIST reader/rewriter
//! - [`schemes`]: named output-variable schemes
//! - [`sync`]: typed change events mirrored into every known NAMELIST copy
//! - [`paths`]: "empty means default" path resolution

pub mod atomic;
pub mod config;
pub mod error;
pub mod locale;
pub mod logging;
pub mod namelist;
pub mod paths;
pub mod schemes;
pub mod st_versions;
pub mod sync;

pub use error::{CoreError, CoreResult};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
