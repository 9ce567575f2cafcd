//! Bundle validation
//!
//! Validates Sigstore bundles according to version-specific rules. Only the
//! structure is checked; signatures and inclusion proofs are not verified.

use crate::error::{Error, Result};
use pep740_types::{Bundle, MediaType, VerificationMaterial, VerificationMaterialContent};

/// Validation options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Require an inclusion proof (not just promise) on every entry for v0.2 and later
    pub require_inclusion_proof: bool,
    /// Require at least one transparency log entry
    pub require_tlog_entry: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            require_inclusion_proof: true,
            require_tlog_entry: true,
        }
    }
}

/// Validate a Sigstore bundle
pub fn validate_bundle(bundle: &Bundle) -> Result<()> {
    validate_bundle_with_options(bundle, &ValidationOptions::default())
}

/// Validate a Sigstore bundle with custom options
pub fn validate_bundle_with_options(bundle: &Bundle, options: &ValidationOptions) -> Result<()> {
    // Check media type is valid
    let version = bundle
        .version()
        .map_err(|e| Error::Validation(e.to_string()))?;

    tracing::debug!(media_type = %version, "validating bundle");

    let vm = validate_common(bundle, options)?;

    // Version-specific validation
    match version {
        MediaType::Bundle0_1 => validate_v0_1(bundle),
        MediaType::Bundle0_2 => validate_v0_2(bundle, options),
        MediaType::Bundle0_3 => validate_v0_3(bundle, vm, options),
    }
}

/// Validate a v0.1 bundle
fn validate_v0_1(bundle: &Bundle) -> Result<()> {
    // v0.1 requires an inclusion promise (SET) on every entry
    if !bundle.tlog_entries().is_empty() && !bundle.has_inclusion_promise() {
        return Err(Error::Validation(
            "v0.1 bundle must have inclusion promise".to_string(),
        ));
    }
    Ok(())
}

/// Validate a v0.2 bundle
fn validate_v0_2(bundle: &Bundle, options: &ValidationOptions) -> Result<()> {
    if requires_missing_proof(bundle, options) {
        return Err(Error::Validation(
            "v0.2 bundle must have inclusion proof".to_string(),
        ));
    }
    Ok(())
}

/// Validate a v0.3 bundle
fn validate_v0_3(
    bundle: &Bundle,
    vm: &VerificationMaterial,
    options: &ValidationOptions,
) -> Result<()> {
    // v0.3 must have single certificate (not chain) or public key
    if let Some(VerificationMaterialContent::X509CertificateChain(_)) = vm.content {
        return Err(Error::Validation(
            "v0.3 bundle must use single certificate, not chain".to_string(),
        ));
    }

    if requires_missing_proof(bundle, options) {
        return Err(Error::Validation(
            "v0.3 bundle must have inclusion proof".to_string(),
        ));
    }
    Ok(())
}

fn requires_missing_proof(bundle: &Bundle, options: &ValidationOptions) -> bool {
    options.require_inclusion_proof
        && !bundle.tlog_entries().is_empty()
        && !bundle.has_inclusion_proof()
}

/// Common validation for all bundle versions
fn validate_common<'a>(
    bundle: &'a Bundle,
    options: &ValidationOptions,
) -> Result<&'a VerificationMaterial> {
    let vm = bundle
        .verification_material
        .as_ref()
        .ok_or_else(|| Error::Validation("bundle missing verification material".to_string()))?;

    if vm.content.is_none() {
        return Err(Error::Validation(
            "bundle missing verification material content".to_string(),
        ));
    }

    if bundle.content.is_none() {
        return Err(Error::Validation("bundle missing content".to_string()));
    }

    // Must have at least one tlog entry
    if options.require_tlog_entry && vm.tlog_entries.is_empty() {
        return Err(Error::Validation(
            "bundle must have at least one tlog entry".to_string(),
        ));
    }

    Ok(vm)
}
