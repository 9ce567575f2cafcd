//! JSON codecs for attestations and bundles
//!
//! Attestations are read through a generic JSON tree so that transparency
//! entries stay schema-agnostic and unexpected shapes can be reported per
//! field. Their byte fields are padded standard base64. Line breaks and
//! non-zero trailing bits are tolerated on input, padding is not optional.
//!
//! Bundles use the typed serde models and are validated after decoding.

use crate::error::{Error, Result};
use crate::options::ConvertOptions;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::Engine;
use pep740_bundle::validate_bundle_with_options;
use pep740_types::{
    Attestation, AttestationMaterial, Bundle, DerCertificate, Envelope, PayloadBytes,
    SignatureBytes, StructuredValue,
};
use serde_json::{json, Map, Number, Value};
use tracing::{debug, warn};

const ATTESTATION_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Decode PEP 740 attestation JSON with default options
pub fn decode_attestation(data: &[u8]) -> Result<Attestation> {
    decode_attestation_with_options(data, &ConvertOptions::default())
}

/// Decode PEP 740 attestation JSON
///
/// A missing or non-numeric `version` decodes as 0, which conversion later
/// rejects. Non-object transparency entries are skipped unless
/// [`ConvertOptions::strict_transparency_entries`] is set.
pub fn decode_attestation_with_options(
    data: &[u8],
    options: &ConvertOptions,
) -> Result<Attestation> {
    let raw: Value = serde_json::from_slice(data).map_err(Error::json("parse attestation JSON"))?;
    let raw = match raw {
        Value::Object(map) => map,
        _ => return Err(Error::invalid_field("attestation", "expected a JSON object")),
    };

    let version = match raw.get("version") {
        Some(Value::Number(number)) => parse_version(number)?,
        _ => 0,
    };

    let mut verification_material = AttestationMaterial::default();
    if let Some(vm) = object_field(&raw, "verification_material")? {
        verification_material.certificate =
            DerCertificate::new(bytes_field(vm, "certificate")?);
        verification_material.transparency_entries = transparency_entries(vm, options)?;
    }

    let mut envelope = Envelope::default();
    if let Some(env) = object_field(&raw, "envelope")? {
        envelope.statement = PayloadBytes::new(bytes_field(env, "statement")?);
        envelope.signature = SignatureBytes::new(bytes_field(env, "signature")?);
    }

    let attestation = Attestation {
        version,
        verification_material,
        envelope,
    };
    debug!(
        version,
        entries = attestation.transparency_entry_count(),
        "decoded attestation"
    );
    Ok(attestation)
}

/// Encode an attestation as pretty-printed PEP 740 JSON with sorted keys
pub fn encode_attestation(attestation: &Attestation) -> Result<Vec<u8>> {
    let material = &attestation.verification_material;
    let entries: Vec<Value> = material
        .transparency_entries
        .iter()
        .cloned()
        .map(Value::Object)
        .collect();

    let document = json!({
        "version": attestation.version,
        "verification_material": {
            "certificate": STANDARD.encode(material.certificate.as_bytes()),
            "transparency_entries": entries,
        },
        "envelope": {
            "statement": STANDARD.encode(attestation.envelope.statement.as_bytes()),
            "signature": STANDARD.encode(attestation.envelope.signature.as_bytes()),
        },
    });

    serde_json::to_vec_pretty(&document).map_err(Error::json("serialize attestation JSON"))
}

/// Decode and validate Sigstore bundle JSON with default options
pub fn decode_bundle(data: &[u8]) -> Result<Bundle> {
    decode_bundle_with_options(data, &ConvertOptions::default())
}

/// Decode Sigstore bundle JSON and validate it with the given rules
pub fn decode_bundle_with_options(data: &[u8], options: &ConvertOptions) -> Result<Bundle> {
    let bundle: Bundle =
        serde_json::from_slice(data).map_err(Error::json("parse bundle JSON"))?;
    validate_bundle_with_options(&bundle, &options.validation)?;

    debug!(
        media_type = %bundle.media_type,
        tlog_entries = bundle.tlog_entries().len(),
        "decoded bundle"
    );
    Ok(bundle)
}

/// Encode a bundle as pretty-printed protobuf-style JSON
pub fn encode_bundle(bundle: &Bundle) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(bundle).map_err(Error::json("serialize bundle JSON"))
}

fn parse_version(number: &Number) -> Result<u32> {
    if let Some(value) = number.as_u64() {
        return u32::try_from(value)
            .map_err(|_| Error::invalid_field("version", format!("{value} is out of range")));
    }
    match number.as_f64() {
        Some(value) if value.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&value) => {
            Ok(value as u32)
        }
        _ => Err(Error::invalid_field(
            "version",
            format!("{number} is not an unsigned integer"),
        )),
    }
}

fn object_field<'a>(
    parent: &'a Map<String, Value>,
    key: &'static str,
) -> Result<Option<&'a Map<String, Value>>> {
    match parent.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(Error::invalid_field(key, "expected a JSON object")),
    }
}

fn bytes_field(parent: &Map<String, Value>, key: &'static str) -> Result<Vec<u8>> {
    match parent.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(text)) => decode_base64_field(text)
            .map_err(|source| Error::Base64 { field: key, source }),
        Some(_) => Err(Error::invalid_field(key, "expected a base64 string")),
    }
}

fn decode_base64_field(text: &str) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    ATTESTATION_BASE64.decode(text.replace(['\r', '\n'], ""))
}

fn transparency_entries(
    vm: &Map<String, Value>,
    options: &ConvertOptions,
) -> Result<Vec<StructuredValue>> {
    let items = match vm.get("transparency_entries") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(Error::invalid_field(
                "transparency_entries",
                "expected an array",
            ))
        }
    };

    let mut entries = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match item {
            Value::Object(map) => entries.push(map.clone()),
            _ if options.strict_transparency_entries => {
                return Err(Error::invalid_field(
                    format!("transparency_entries[{index}]"),
                    "expected a JSON object",
                ));
            }
            _ => warn!(index, "skipping transparency entry that is not a JSON object"),
        }
    }
    Ok(entries)
}
