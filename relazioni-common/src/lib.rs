//! # Relazioni Common Library
//!
//! Shared code for the relazioni client tools including:
//! - Error type and result alias
//! - Bootstrap configuration loading (TOML + environment)
//! - Wire types and paths for the extraction service endpoints

pub mod api;
pub mod config;
pub mod error;

pub use error::{Error, Result};
