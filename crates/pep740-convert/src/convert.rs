//! Conversion between attestations and bundles

use crate::error::{Error, Result};
use crate::options::ConvertOptions;
use crate::tlog::{transparency_entry_from_value, transparency_entry_to_value};
use pep740_bundle::{validate_bundle_with_options, BundleV03};
use pep740_types::{
    Attestation, Bundle, BundleContent, DsseEnvelope, StructuredValue,
    VerificationMaterialContent,
};
use tracing::{debug, warn};
use x509_cert::der::Decode;
use x509_cert::Certificate;

/// Convert a PEP 740 attestation into a v0.3 Sigstore bundle
pub fn to_bundle(attestation: &Attestation) -> Result<Bundle> {
    to_bundle_with_options(attestation, &ConvertOptions::default())
}

/// Convert a PEP 740 attestation into a v0.3 Sigstore bundle
///
/// Only the first transparency entry is carried over. The assembled bundle is
/// checked against `options.validation` before it is returned.
pub fn to_bundle_with_options(
    attestation: &Attestation,
    options: &ConvertOptions,
) -> Result<Bundle> {
    if !attestation.is_supported_version() {
        return Err(Error::UnsupportedVersion(attestation.version));
    }

    let material = &attestation.verification_material;
    Certificate::from_der(material.certificate.as_bytes()).map_err(Error::Certificate)?;

    let (first, rest) = material
        .transparency_entries
        .split_first()
        .ok_or(Error::NoTransparencyEntries)?;
    if !rest.is_empty() {
        warn!(
            dropped = rest.len(),
            "bundle holds a single transparency entry, dropping the rest"
        );
    }
    let entry = transparency_entry_from_value(first)
        .map_err(|source| Error::TransparencyEntry { index: 0, source })?;

    let envelope = DsseEnvelope::in_toto(
        attestation.envelope.statement.clone(),
        attestation.envelope.signature.clone(),
    );
    let bundle = BundleV03::with_certificate_and_dsse(material.certificate.clone(), envelope)
        .with_tlog_entry(entry)
        .into_bundle();

    validate_bundle_with_options(&bundle, &options.validation)?;
    debug!(media_type = %bundle.media_type, "converted attestation to bundle");
    Ok(bundle)
}

/// Convert a Sigstore bundle into a PEP 740 attestation
///
/// The bundle must carry a DSSE envelope with exactly one signature. For a
/// certificate chain the leaf (first) certificate is used. Every transparency
/// log entry is carried over.
pub fn from_bundle(bundle: &Bundle) -> Result<Attestation> {
    let material = bundle
        .verification_material
        .as_ref()
        .ok_or(Error::MissingVerificationMaterial)?;

    let certificate = match &material.content {
        Some(VerificationMaterialContent::Certificate(cert)) => cert.raw_bytes.clone(),
        Some(VerificationMaterialContent::X509CertificateChain(chain)) => chain
            .certificates
            .first()
            .ok_or(Error::EmptyCertificateChain)?
            .raw_bytes
            .clone(),
        Some(VerificationMaterialContent::PublicKey(_)) => {
            return Err(Error::UnsupportedCertificateType("public key"))
        }
        None => return Err(Error::UnsupportedCertificateType("none")),
    };

    let envelope = match &bundle.content {
        Some(BundleContent::DsseEnvelope(envelope)) => envelope,
        Some(BundleContent::MessageSignature(_)) | None => return Err(Error::NotDsseEnvelope),
    };

    let signature = match envelope.signatures.as_slice() {
        [signature] => signature.sig.clone(),
        signatures => return Err(Error::SignatureCount(signatures.len())),
    };

    let entries = material
        .tlog_entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            transparency_entry_to_value(entry)
                .map_err(|source| Error::TransparencyEntry { index, source })
        })
        .collect::<Result<Vec<StructuredValue>>>()?;

    debug!(entries = entries.len(), "converted bundle to attestation");
    Ok(Attestation::new(
        certificate,
        entries,
        envelope.payload.clone(),
        signature,
    ))
}
