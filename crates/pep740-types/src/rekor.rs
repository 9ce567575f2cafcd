//! Rekor transparency log entry types
//!
//! The typed form of a Rekor v1 log entry as it appears in a bundle's
//! `tlogEntries`. JSON follows the protobuf mapping: camelCase names (snake_case
//! accepted on input), int64 as strings, bytes as base64, defaults omitted.
//! Unknown fields are ignored.

use crate::encoding::{base64_bytes, base64_bytes_vec, int64_string, is_zero, null_as_default};
use serde::{Deserialize, Serialize};

/// A transparency log entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransparencyLogEntry {
    /// Global index of the entry in the log
    #[serde(
        default,
        alias = "log_index",
        with = "int64_string",
        skip_serializing_if = "is_zero"
    )]
    pub log_index: i64,
    /// Identifier of the log instance
    #[serde(default, alias = "log_id", skip_serializing_if = "Option::is_none")]
    pub log_id: Option<LogId>,
    /// Entry type and schema version
    #[serde(
        default,
        alias = "kind_version",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind_version: Option<KindVersion>,
    /// Unix time at which the entry was integrated
    #[serde(
        default,
        alias = "integrated_time",
        with = "int64_string",
        skip_serializing_if = "is_zero"
    )]
    pub integrated_time: i64,
    /// Signed entry timestamp
    #[serde(
        default,
        alias = "inclusion_promise",
        skip_serializing_if = "Option::is_none"
    )]
    pub inclusion_promise: Option<InclusionPromise>,
    /// Merkle inclusion proof
    #[serde(
        default,
        alias = "inclusion_proof",
        skip_serializing_if = "Option::is_none"
    )]
    pub inclusion_proof: Option<InclusionProof>,
    /// The entry body as stored by the log
    #[serde(
        default,
        alias = "canonicalized_body",
        with = "base64_bytes",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub canonicalized_body: Vec<u8>,
}

impl TransparencyLogEntry {
    pub fn has_inclusion_proof(&self) -> bool {
        self.inclusion_proof.is_some()
    }

    pub fn has_inclusion_promise(&self) -> bool {
        self.inclusion_promise.is_some()
    }
}

/// Log identifier (hash of the log's public key)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogId {
    #[serde(
        default,
        alias = "key_id",
        with = "base64_bytes",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub key_id: Vec<u8>,
}

/// Entry kind, e.g. `dsse` / `0.0.1`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindVersion {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub kind: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub version: String,
}

/// Signed entry timestamp issued by the log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InclusionPromise {
    #[serde(
        default,
        alias = "signed_entry_timestamp",
        with = "base64_bytes",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub signed_entry_timestamp: Vec<u8>,
}

/// Merkle tree inclusion proof
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InclusionProof {
    #[serde(
        default,
        alias = "log_index",
        with = "int64_string",
        skip_serializing_if = "is_zero"
    )]
    pub log_index: i64,
    #[serde(
        default,
        alias = "root_hash",
        with = "base64_bytes",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub root_hash: Vec<u8>,
    #[serde(
        default,
        alias = "tree_size",
        with = "int64_string",
        skip_serializing_if = "is_zero"
    )]
    pub tree_size: i64,
    #[serde(
        default,
        with = "base64_bytes_vec",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub hashes: Vec<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint: Option<Checkpoint>,
}

/// Signed tree head in note format
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub envelope: String,
}
