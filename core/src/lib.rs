//! Core types and shared primitives for AIBOM field extraction and scoring.
//!
//! This crate defines the foundational pieces every other crate in the
//! workspace builds on:
//!
//! - [`Tier`], [`Confidence`], [`DataSource`], [`Strategy`]: the
//!   classification vocabulary for fields and their provenance.
//! - [`ExtractionResult`]: per-field provenance record produced by one
//!   extraction run.
//! - [`PathExpr`] / [`resolve`]: the compact path-query language used to
//!   locate a field inside an assembled document.
//! - [`is_informative`]: the single "is this value worth keeping"
//!   predicate shared by every extraction strategy.
//! - [`license`]: SPDX identifier normalization and license header
//!   detection.
//!
//! # Example
//!
//! ```
//! use aibom_core::*;
//! use serde_json::json;
//!
//! let doc = json!({
//!     "metadata": {
//!         "properties": [
//!             { "name": "primaryPurpose", "value": "text-generation" }
//!         ]
//!     }
//! });
//!
//! let value = resolve(&doc, "$.metadata.properties[?(@.name=='primaryPurpose')].value");
//! assert_eq!(value, Some(&json!("text-generation")));
//!
//! assert!(!is_informative(&json!("Other")));
//! assert!(is_informative(&json!("apache-2.0")));
//! ```

pub mod license;
mod path;
mod types;
mod value;

pub use path::{PathError, PathExpr, Segment, Selector, resolve};
pub use types::*;
pub use value::{is_informative, is_meaningful, is_noise_token, is_truthy, value_text};
