//! Core data models for PEP 740 attestations and Sigstore bundles
//!
//! This crate provides the two document formats the converter moves between:
//! the PEP 740 attestation published by Python package indexes, and the
//! Sigstore bundle (versions 0.1, 0.2, and 0.3) with its transparency log
//! entries.
//!
//! Bundle types are plain serde models following the protobuf JSON mapping.

pub mod attestation;
pub mod bundle;
pub mod encoding;
pub mod error;
pub mod rekor;

pub use attestation::{
    Attestation, Envelope, StructuredValue, VerificationMaterial as AttestationMaterial,
    ATTESTATION_VERSION,
};
pub use bundle::{
    Bundle, BundleContent, DsseEnvelope, DsseSignature, HashOutput, MediaType, MessageSignature,
    PublicKeyIdentifier, Rfc3161SignedTimestamp, TimestampVerificationData, VerificationMaterial,
    VerificationMaterialContent, X509Certificate, X509CertificateChain, IN_TOTO_PAYLOAD_TYPE,
};
pub use encoding::{
    base64_bytes, base64_bytes_vec, decode_base64, encode_base64, int64_string, null_as_default,
    DerCertificate, PayloadBytes, SignatureBytes,
};
pub use error::{Error, Result};
pub use rekor::{
    Checkpoint, InclusionPromise, InclusionProof, KindVersion, LogId, TransparencyLogEntry,
};
