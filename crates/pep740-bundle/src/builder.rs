//! Bundle builder for creating v0.3 Sigstore bundles

use pep740_types::{
    Bundle, BundleContent, DerCertificate, DsseEnvelope, MediaType, TransparencyLogEntry,
    VerificationMaterial, VerificationMaterialContent, X509Certificate,
};

/// A Sigstore bundle in v0.3 format.
///
/// The v0.3 format requires a single certificate (not a chain). Bundles built
/// here always carry a DSSE envelope, which is how attestations are signed.
///
/// # Example
///
/// ```
/// use pep740_bundle::BundleV03;
/// use pep740_types::{DerCertificate, DsseEnvelope, PayloadBytes, SignatureBytes};
///
/// let envelope = DsseEnvelope::in_toto(
///     PayloadBytes::from_bytes(b"{}"),
///     SignatureBytes::from_bytes(b"sig"),
/// );
/// let bundle = BundleV03::with_certificate_and_dsse(DerCertificate::from_bytes(b"cert"), envelope)
///     .into_bundle();
/// assert_eq!(bundle.media_type, "application/vnd.dev.sigstore.bundle.v0.3+json");
/// ```
#[derive(Debug, Clone)]
pub struct BundleV03 {
    /// The leaf signing certificate
    pub certificate: DerCertificate,
    /// The signed in-toto statement
    pub envelope: DsseEnvelope,
    /// Transparency log entries
    pub tlog_entries: Vec<TransparencyLogEntry>,
}

impl BundleV03 {
    /// Create a new v0.3 bundle with a certificate and DSSE envelope.
    pub fn with_certificate_and_dsse(certificate: DerCertificate, envelope: DsseEnvelope) -> Self {
        Self {
            certificate,
            envelope,
            tlog_entries: Vec::new(),
        }
    }

    /// Add a transparency log entry.
    pub fn with_tlog_entry(mut self, entry: TransparencyLogEntry) -> Self {
        self.tlog_entries.push(entry);
        self
    }

    /// Convert to a Bundle.
    pub fn into_bundle(self) -> Bundle {
        Bundle {
            media_type: MediaType::Bundle0_3.as_str().to_string(),
            verification_material: Some(VerificationMaterial {
                content: Some(VerificationMaterialContent::Certificate(X509Certificate {
                    raw_bytes: self.certificate,
                })),
                tlog_entries: self.tlog_entries,
                timestamp_verification_data: None,
            }),
            content: Some(BundleContent::DsseEnvelope(self.envelope)),
        }
    }
}
