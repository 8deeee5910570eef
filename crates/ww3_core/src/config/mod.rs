//! Configuration management for the WW3 tool.
//!
//! This module provides:
//! - A single JSON document at a fixed user-scoped path
//! - Atomic file writes (write to temp, then rename)
//! - Schema-level defaulting and migration of legacy values on load
//!
//! # Example
//!
//! ```no_run
//! use ww3_core::config::{keys, ConfigStore};
//!
//! let store = ConfigStore::new("/home/me/.config/ww3tool/config.json");
//! let mut doc = store.load().unwrap();
//!
//! doc.set(keys::DX, "0.1");
//! store.save(&doc).unwrap();
//! ```

mod document;
pub mod keys;
pub mod schema;
mod store;

pub use document::ConfigDocument;
pub use store::ConfigStore;
