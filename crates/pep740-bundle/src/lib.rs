//! Bundle construction and validation
//!
//! This crate assembles v0.3 Sigstore bundles and checks bundles of any
//! supported version (0.1, 0.2, and 0.3) against their structural rules.

pub mod builder;
pub mod error;
pub mod validation;

pub use builder::BundleV03;
pub use error::{Error, Result};
pub use validation::{validate_bundle, validate_bundle_with_options, ValidationOptions};
