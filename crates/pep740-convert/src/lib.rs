//! Conversion between PEP 740 attestations and Sigstore bundles
//!
//! This crate reads and writes both formats and moves the certificate, the
//! signed statement and the transparency log entries between them without
//! changing a byte. Nothing is verified cryptographically; bundles are only
//! checked structurally.
//!
//! # Example
//!
//! ```no_run
//! use pep740_convert::{decode_attestation, encode_bundle, to_bundle};
//!
//! # fn main() -> Result<(), pep740_convert::Error> {
//! let data = std::fs::read("package.whl.publish.attestation").expect("readable file");
//! let attestation = decode_attestation(&data)?;
//! let bundle = to_bundle(&attestation)?;
//! std::fs::write("package.sigstore.json", encode_bundle(&bundle)?).expect("writable file");
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod convert;
pub mod error;
pub mod options;
pub mod tlog;

pub use codec::{
    decode_attestation, decode_attestation_with_options, decode_bundle,
    decode_bundle_with_options, encode_attestation, encode_bundle,
};
pub use convert::{from_bundle, to_bundle, to_bundle_with_options};
pub use error::{Error, Result};
pub use options::ConvertOptions;
pub use tlog::{transparency_entry_from_value, transparency_entry_to_value, TlogError};

pub use pep740_bundle::ValidationOptions;
pub use pep740_types::{Attestation, Bundle};
