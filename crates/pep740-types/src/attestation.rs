//! PEP 740 attestation model
//!
//! An attestation binds one signed statement to the signing certificate and
//! the transparency log entries that record it. Transparency entries stay
//! schema-agnostic JSON objects here; only the converter gives them a type.
//!
//! The JSON form uses snake_case keys and plain base64 strings, and is handled
//! by the codec in `pep740-convert` rather than by derived serde impls.

use crate::encoding::{DerCertificate, PayloadBytes, SignatureBytes};

/// The attestation format version understood by the converter
pub const ATTESTATION_VERSION: u32 = 1;

/// A schema-agnostic JSON object
pub type StructuredValue = serde_json::Map<String, serde_json::Value>;

/// A PEP 740 attestation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attestation {
    /// Format version
    pub version: u32,
    /// Certificate and transparency log entries
    pub verification_material: VerificationMaterial,
    /// The signed statement
    pub envelope: Envelope,
}

/// Material needed to verify an attestation's signature
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerificationMaterial {
    /// Signing certificate
    pub certificate: DerCertificate,
    /// Transparency log entries, one JSON object each
    pub transparency_entries: Vec<StructuredValue>,
}

/// A statement and its single signature
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Envelope {
    pub statement: PayloadBytes,
    pub signature: SignatureBytes,
}

impl Attestation {
    /// Create a current-version attestation from its parts
    pub fn new(
        certificate: DerCertificate,
        transparency_entries: Vec<StructuredValue>,
        statement: PayloadBytes,
        signature: SignatureBytes,
    ) -> Self {
        Self {
            version: ATTESTATION_VERSION,
            verification_material: VerificationMaterial {
                certificate,
                transparency_entries,
            },
            envelope: Envelope {
                statement,
                signature,
            },
        }
    }

    /// Whether the converter understands this attestation's version
    pub fn is_supported_version(&self) -> bool {
        self.version == ATTESTATION_VERSION
    }

    /// Number of transparency log entries
    pub fn transparency_entry_count(&self) -> usize {
        self.verification_material.transparency_entries.len()
    }
}
