//! Sigstore bundle format types
//!
//! The bundle holds a signature (here, almost always a DSSE envelope), the
//! verification material (certificate or chain) and transparency log entries.
//!
//! The protobuf `oneof` fields become Rust enums. On the wire a oneof is just
//! one of several optional keys, so each oneof-carrying message goes through a
//! private wire struct that rejects inputs setting more than one of them.

use crate::encoding::{base64_bytes, null_as_default, DerCertificate, PayloadBytes, SignatureBytes};
use crate::error::{Error, Result};
use crate::rekor::TransparencyLogEntry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Payload type of an in-toto statement carried in a DSSE envelope
pub const IN_TOTO_PAYLOAD_TYPE: &str = "application/vnd.in-toto+json";

/// Sigstore bundle media types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    /// Bundle format version 0.1
    Bundle0_1,
    /// Bundle format version 0.2
    Bundle0_2,
    /// Bundle format version 0.3
    Bundle0_3,
}

impl MediaType {
    /// Get the media type string
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Bundle0_1 => "application/vnd.dev.sigstore.bundle+json;version=0.1",
            MediaType::Bundle0_2 => "application/vnd.dev.sigstore.bundle+json;version=0.2",
            MediaType::Bundle0_3 => "application/vnd.dev.sigstore.bundle.v0.3+json",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "application/vnd.dev.sigstore.bundle+json;version=0.1" => Ok(MediaType::Bundle0_1),
            "application/vnd.dev.sigstore.bundle+json;version=0.2" => Ok(MediaType::Bundle0_2),
            "application/vnd.dev.sigstore.bundle.v0.3+json" => Ok(MediaType::Bundle0_3),
            // Also accept alternative v0.3 format
            "application/vnd.dev.sigstore.bundle+json;version=0.3" => Ok(MediaType::Bundle0_3),
            _ => Err(Error::InvalidMediaType(s.to_string())),
        }
    }
}

/// A Sigstore bundle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BundleWire", into = "BundleWire")]
pub struct Bundle {
    /// Media type identifying the bundle format version
    pub media_type: String,
    /// Certificate and transparency log entries
    pub verification_material: Option<VerificationMaterial>,
    /// The signature itself
    pub content: Option<BundleContent>,
}

/// The signature carried by a bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleContent {
    MessageSignature(MessageSignature),
    DsseEnvelope(DsseEnvelope),
}

/// Verification material of a bundle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "VerificationMaterialWire", into = "VerificationMaterialWire")]
pub struct VerificationMaterial {
    /// Signing certificate, chain or key hint
    pub content: Option<VerificationMaterialContent>,
    /// Transparency log entries
    pub tlog_entries: Vec<TransparencyLogEntry>,
    /// RFC 3161 timestamps, carried through untouched
    pub timestamp_verification_data: Option<TimestampVerificationData>,
}

/// How the signer's key is identified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationMaterialContent {
    Certificate(X509Certificate),
    X509CertificateChain(X509CertificateChain),
    PublicKey(PublicKeyIdentifier),
}

/// A single DER certificate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct X509Certificate {
    #[serde(default, alias = "raw_bytes", skip_serializing_if = "DerCertificate::is_empty")]
    pub raw_bytes: DerCertificate,
}

/// A certificate chain, leaf first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct X509CertificateChain {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub certificates: Vec<X509Certificate>,
}

/// Hint identifying a pre-distributed public key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyIdentifier {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub hint: String,
}

/// Timestamp data attached to the verification material
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampVerificationData {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        alias = "rfc3161_timestamps",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub rfc3161_timestamps: Vec<Rfc3161SignedTimestamp>,
}

/// A DER-encoded RFC 3161 timestamp response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rfc3161SignedTimestamp {
    #[serde(
        default,
        alias = "signed_timestamp",
        with = "base64_bytes",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub signed_timestamp: Vec<u8>,
}

/// A plain signature over an artifact digest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSignature {
    #[serde(
        default,
        alias = "message_digest",
        skip_serializing_if = "Option::is_none"
    )]
    pub message_digest: Option<HashOutput>,
    #[serde(default, skip_serializing_if = "SignatureBytes::is_empty")]
    pub signature: SignatureBytes,
}

/// A digest and the algorithm that produced it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashOutput {
    /// Protobuf enum name, e.g. `SHA2_256`
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub algorithm: String,
    #[serde(default, with = "base64_bytes", skip_serializing_if = "Vec::is_empty")]
    pub digest: Vec<u8>,
}

/// A DSSE envelope containing a signed payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DsseEnvelope {
    /// Payload bytes
    #[serde(default, skip_serializing_if = "PayloadBytes::is_empty")]
    pub payload: PayloadBytes,
    /// Type URI of the payload
    #[serde(
        default,
        deserialize_with = "null_as_default",
        alias = "payload_type",
        skip_serializing_if = "String::is_empty"
    )]
    pub payload_type: String,
    /// Signatures over the pre-authentication encoding of the payload
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub signatures: Vec<DsseSignature>,
}

/// A signature in a DSSE envelope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DsseSignature {
    /// Signature bytes
    #[serde(default, skip_serializing_if = "SignatureBytes::is_empty")]
    pub sig: SignatureBytes,
    /// Key ID (optional hint for key lookup)
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub keyid: String,
}

impl DsseEnvelope {
    /// Create a new DSSE envelope
    pub fn new(
        payload_type: impl Into<String>,
        payload: PayloadBytes,
        signatures: Vec<DsseSignature>,
    ) -> Self {
        Self {
            payload,
            payload_type: payload_type.into(),
            signatures,
        }
    }

    /// Wrap an in-toto statement and its one signature, without a key id
    pub fn in_toto(statement: PayloadBytes, signature: SignatureBytes) -> Self {
        Self::new(
            IN_TOTO_PAYLOAD_TYPE,
            statement,
            vec![DsseSignature {
                sig: signature,
                keyid: String::new(),
            }],
        )
    }
}

impl Bundle {
    /// Get the bundle version from the media type
    pub fn version(&self) -> Result<MediaType> {
        MediaType::from_str(&self.media_type)
    }

    /// Get the transparency log entries
    pub fn tlog_entries(&self) -> &[TransparencyLogEntry] {
        self.verification_material
            .as_ref()
            .map(|vm| vm.tlog_entries.as_slice())
            .unwrap_or(&[])
    }

    /// Check that there are log entries and every one has an inclusion proof
    pub fn has_inclusion_proof(&self) -> bool {
        let entries = self.tlog_entries();
        !entries.is_empty() && entries.iter().all(|e| e.has_inclusion_proof())
    }

    /// Check that there are log entries and every one has an inclusion promise (SET)
    pub fn has_inclusion_promise(&self) -> bool {
        let entries = self.tlog_entries();
        !entries.is_empty() && entries.iter().all(|e| e.has_inclusion_promise())
    }

    /// Get the DSSE envelope if present
    pub fn dsse_envelope(&self) -> Option<&DsseEnvelope> {
        match &self.content {
            Some(BundleContent::DsseEnvelope(env)) => Some(env),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BundleWire {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        alias = "media_type",
        skip_serializing_if = "String::is_empty"
    )]
    media_type: String,
    #[serde(
        default,
        alias = "verification_material",
        skip_serializing_if = "Option::is_none"
    )]
    verification_material: Option<VerificationMaterial>,
    #[serde(default, alias = "dsse_envelope", skip_serializing_if = "Option::is_none")]
    dsse_envelope: Option<DsseEnvelope>,
    #[serde(
        default,
        alias = "message_signature",
        skip_serializing_if = "Option::is_none"
    )]
    message_signature: Option<MessageSignature>,
}

impl TryFrom<BundleWire> for Bundle {
    type Error = Error;

    fn try_from(wire: BundleWire) -> Result<Self> {
        let content = match (wire.dsse_envelope, wire.message_signature) {
            (Some(_), Some(_)) => return Err(Error::ConflictingVariants("bundle content")),
            (Some(envelope), None) => Some(BundleContent::DsseEnvelope(envelope)),
            (None, Some(signature)) => Some(BundleContent::MessageSignature(signature)),
            (None, None) => None,
        };
        Ok(Bundle {
            media_type: wire.media_type,
            verification_material: wire.verification_material,
            content,
        })
    }
}

impl From<Bundle> for BundleWire {
    fn from(bundle: Bundle) -> Self {
        let (dsse_envelope, message_signature) = match bundle.content {
            Some(BundleContent::DsseEnvelope(envelope)) => (Some(envelope), None),
            Some(BundleContent::MessageSignature(signature)) => (None, Some(signature)),
            None => (None, None),
        };
        BundleWire {
            media_type: bundle.media_type,
            verification_material: bundle.verification_material,
            dsse_envelope,
            message_signature,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerificationMaterialWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    certificate: Option<X509Certificate>,
    #[serde(
        default,
        alias = "x509_certificate_chain",
        skip_serializing_if = "Option::is_none"
    )]
    x509_certificate_chain: Option<X509CertificateChain>,
    #[serde(default, alias = "public_key", skip_serializing_if = "Option::is_none")]
    public_key: Option<PublicKeyIdentifier>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        alias = "tlog_entries",
        skip_serializing_if = "Vec::is_empty"
    )]
    tlog_entries: Vec<TransparencyLogEntry>,
    #[serde(
        default,
        alias = "timestamp_verification_data",
        skip_serializing_if = "Option::is_none"
    )]
    timestamp_verification_data: Option<TimestampVerificationData>,
}

impl TryFrom<VerificationMaterialWire> for VerificationMaterial {
    type Error = Error;

    fn try_from(wire: VerificationMaterialWire) -> Result<Self> {
        let content = match (wire.certificate, wire.x509_certificate_chain, wire.public_key) {
            (Some(cert), None, None) => Some(VerificationMaterialContent::Certificate(cert)),
            (None, Some(chain), None) => {
                Some(VerificationMaterialContent::X509CertificateChain(chain))
            }
            (None, None, Some(key)) => Some(VerificationMaterialContent::PublicKey(key)),
            (None, None, None) => None,
            _ => return Err(Error::ConflictingVariants("verification material content")),
        };
        Ok(VerificationMaterial {
            content,
            tlog_entries: wire.tlog_entries,
            timestamp_verification_data: wire.timestamp_verification_data,
        })
    }
}

impl From<VerificationMaterial> for VerificationMaterialWire {
    fn from(material: VerificationMaterial) -> Self {
        let mut wire = VerificationMaterialWire {
            certificate: None,
            x509_certificate_chain: None,
            public_key: None,
            tlog_entries: material.tlog_entries,
            timestamp_verification_data: material.timestamp_verification_data,
        };
        match material.content {
            Some(VerificationMaterialContent::Certificate(cert)) => wire.certificate = Some(cert),
            Some(VerificationMaterialContent::X509CertificateChain(chain)) => {
                wire.x509_certificate_chain = Some(chain)
            }
            Some(VerificationMaterialContent::PublicKey(key)) => wire.public_key = Some(key),
            None => {}
        }
        wire
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAIN_BUNDLE: &str = r#"{
        "mediaType": "application/vnd.dev.sigstore.bundle+json;version=0.1",
        "verificationMaterial": {
            "x509CertificateChain": {"certificates": [{"rawBytes": "AQID"}, {"rawBytes": "BAUG"}]},
            "tlogEntries": [{
                "logIndex": "6800908",
                "kindVersion": {"kind": "intoto", "version": "0.0.2"},
                "integratedTime": "1668034836",
                "inclusionPromise": {"signedEntryTimestamp": "c2V0"}
            }],
            "timestampVerificationData": {"rfc3161Timestamps": []}
        },
        "dsseEnvelope": {
            "payload": "eyJ0ZXN0IjogInBheWxvYWQifQ==",
            "payloadType": "application/vnd.in-toto+json",
            "signatures": [{"sig": "c2ln", "keyid": ""}]
        }
    }"#;

    #[test]
    fn test_media_type_parsing() {
        assert_eq!(
            MediaType::from_str("application/vnd.dev.sigstore.bundle+json;version=0.1").unwrap(),
            MediaType::Bundle0_1
        );
        assert_eq!(
            MediaType::from_str("application/vnd.dev.sigstore.bundle+json;version=0.2").unwrap(),
            MediaType::Bundle0_2
        );
        assert_eq!(
            MediaType::from_str("application/vnd.dev.sigstore.bundle.v0.3+json").unwrap(),
            MediaType::Bundle0_3
        );
        assert_eq!(
            MediaType::from_str("application/vnd.dev.sigstore.bundle+json;version=0.3").unwrap(),
            MediaType::Bundle0_3
        );
    }

    #[test]
    fn test_media_type_invalid() {
        assert!(matches!(
            MediaType::from_str("invalid"),
            Err(Error::InvalidMediaType(_))
        ));
    }

    #[test]
    fn test_parse_chain_bundle() {
        let bundle = serde_json::from_str::<Bundle>(CHAIN_BUNDLE).unwrap();
        assert_eq!(bundle.version().unwrap(), MediaType::Bundle0_1);
        assert!(bundle.has_inclusion_promise());
        assert!(!bundle.has_inclusion_proof());
        assert_eq!(bundle.tlog_entries().len(), 1);

        let vm = bundle.verification_material.as_ref().unwrap();
        match &vm.content {
            Some(VerificationMaterialContent::X509CertificateChain(chain)) => {
                assert_eq!(chain.certificates.len(), 2);
                assert_eq!(chain.certificates[0].raw_bytes.as_bytes(), &[1, 2, 3]);
            }
            other => panic!("expected certificate chain, got {other:?}"),
        }

        let envelope = bundle.dsse_envelope().unwrap();
        assert_eq!(envelope.payload_type, IN_TOTO_PAYLOAD_TYPE);
        assert_eq!(envelope.payload.as_bytes(), br#"{"test": "payload"}"#);
        assert_eq!(envelope.signatures[0].sig.as_bytes(), b"sig");
    }

    #[test]
    fn test_serialize_uses_oneof_keys() {
        let bundle = Bundle {
            media_type: MediaType::Bundle0_3.as_str().to_string(),
            verification_material: Some(VerificationMaterial {
                content: Some(VerificationMaterialContent::Certificate(X509Certificate {
                    raw_bytes: DerCertificate::from_bytes(&[1, 2, 3]),
                })),
                ..Default::default()
            }),
            content: Some(BundleContent::DsseEnvelope(DsseEnvelope::in_toto(
                PayloadBytes::from_bytes(b"{}"),
                SignatureBytes::from_bytes(b"sig"),
            ))),
        };

        let value = serde_json::to_value(&bundle).unwrap();
        assert_eq!(value["mediaType"], MediaType::Bundle0_3.as_str());
        assert_eq!(value["verificationMaterial"]["certificate"]["rawBytes"], "AQID");
        assert!(value["verificationMaterial"].get("tlogEntries").is_none());
        assert_eq!(value["dsseEnvelope"]["payload"], "e30=");
        assert_eq!(value["dsseEnvelope"]["signatures"][0]["sig"], "c2ln");
        assert!(value["dsseEnvelope"]["signatures"][0].get("keyid").is_none());
        assert!(value.get("messageSignature").is_none());

        let parsed: Bundle =
            serde_json::from_str(&serde_json::to_string_pretty(&bundle).unwrap()).unwrap();
        assert_eq!(parsed, bundle);
    }

    #[test]
    fn test_message_signature_content() {
        let bundle = serde_json::from_str::<Bundle>(
            r#"{"mediaType": "application/vnd.dev.sigstore.bundle.v0.3+json",
                "messageSignature": {"messageDigest": {"algorithm": "SHA2_256", "digest": "AQID"}, "signature": "c2ln"}}"#,
        )
        .unwrap();
        assert!(bundle.dsse_envelope().is_none());
        match bundle.content {
            Some(BundleContent::MessageSignature(sig)) => {
                assert_eq!(sig.message_digest.unwrap().algorithm, "SHA2_256");
                assert_eq!(sig.signature.as_bytes(), b"sig");
            }
            other => panic!("expected message signature, got {other:?}"),
        }
    }

    #[test]
    fn test_conflicting_oneof_rejected() {
        let both_contents = r#"{
            "mediaType": "application/vnd.dev.sigstore.bundle.v0.3+json",
            "dsseEnvelope": {"payload": "e30="},
            "messageSignature": {"signature": "c2ln"}
        }"#;
        assert!(serde_json::from_str::<Bundle>(both_contents).is_err());

        let both_certs = r#"{
            "verificationMaterial": {
                "certificate": {"rawBytes": "AQID"},
                "publicKey": {"hint": "key"}
            }
        }"#;
        assert!(serde_json::from_str::<Bundle>(both_certs).is_err());
    }

    #[test]
    fn test_null_fields_read_as_defaults() {
        let bundle: Bundle = serde_json::from_str(
            r#"{"mediaType": "application/vnd.dev.sigstore.bundle.v0.3+json",
                "verificationMaterial": {"certificate": {"rawBytes": null}, "tlogEntries": null},
                "dsseEnvelope": {"payload": "e30=", "payloadType": null,
                    "signatures": [{"sig": "c2ln", "keyid": null}]},
                "messageSignature": null}"#,
        )
        .unwrap();
        assert!(bundle.tlog_entries().is_empty());
        let envelope = bundle.dsse_envelope().unwrap();
        assert!(envelope.payload_type.is_empty());
        assert!(envelope.signatures[0].keyid.is_empty());
        match bundle.verification_material.unwrap().content {
            Some(VerificationMaterialContent::Certificate(cert)) => {
                assert!(cert.raw_bytes.is_empty());
            }
            other => panic!("expected certificate, got {other:?}"),
        }

        let bundle: Bundle = serde_json::from_str(r#"{"mediaType": null}"#).unwrap();
        assert!(bundle.media_type.is_empty());
    }

    #[test]
    fn test_empty_bundle() {
        let bundle = serde_json::from_str::<Bundle>("{}").unwrap();
        assert!(bundle.media_type.is_empty());
        assert!(bundle.verification_material.is_none());
        assert!(bundle.content.is_none());
        assert!(bundle.tlog_entries().is_empty());
        assert!(bundle.version().is_err());
    }
}
