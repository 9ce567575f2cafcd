//! Error types for the converter

use crate::tlog::TlogError;
use thiserror::Error;

/// Conversion and codec errors
#[derive(Debug, Error)]
pub enum Error {
    /// The bundle has no verification material block.
    #[error("bundle missing verification material")]
    MissingVerificationMaterial,

    /// Input or output JSON could not be processed.
    #[error("failed to {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A byte field is not valid base64.
    #[error("failed to decode {field}: {source}")]
    Base64 {
        field: &'static str,
        #[source]
        source: base64::DecodeError,
    },

    /// A field is present but has the wrong shape.
    #[error("invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("unsupported attestation version: {0}")]
    UnsupportedVersion(u32),

    /// The signing certificate is not DER X.509.
    #[error("failed to parse certificate: {0}")]
    Certificate(#[source] x509_cert::der::Error),

    #[error("no transparency entries found")]
    NoTransparencyEntries,

    #[error("no certificates in chain")]
    EmptyCertificateChain,

    /// Public key hints (or missing content) cannot become an attestation.
    #[error("unsupported certificate type: {0}")]
    UnsupportedCertificateType(&'static str),

    #[error("bundle does not contain a DSSE envelope")]
    NotDsseEnvelope,

    #[error("expected exactly one signature, got {0}")]
    SignatureCount(usize),

    /// A transparency entry could not be converted.
    #[error("failed to convert transparency entry {index}: {source}")]
    TransparencyEntry {
        index: usize,
        #[source]
        source: TlogError,
    },

    /// The bundle failed structural validation.
    #[error(transparent)]
    Bundle(#[from] pep740_bundle::Error),
}

impl Error {
    pub(crate) fn json(context: &'static str) -> impl FnOnce(serde_json::Error) -> Self {
        move |source| Self::Json { context, source }
    }

    pub(crate) fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for conversions
pub type Result<T> = std::result::Result<T, Error>;
