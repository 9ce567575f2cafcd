//! Encoding helpers for byte and integer fields
//!
//! Both formats carry raw bytes as base64 text inside JSON. Bundle fields follow
//! the protobuf JSON mapping: standard or URL-safe alphabet, padding optional on
//! input, padded standard base64 on output, and 64-bit integers as strings.
//! A JSON `null` reads as the field's default value, as protobuf JSON allows.
//!
//! The newtypes keep certificate, payload and signature bytes apart while
//! serializing exactly like a plain base64 `bytes` field.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const LENIENT: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_decode_padding_mode(DecodePaddingMode::Indifferent)
    .with_decode_allow_trailing_bits(true);

const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Encode bytes as padded standard base64
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode base64 the way the protobuf JSON mapping accepts it
///
/// Standard and URL-safe alphabets are both accepted, with or without padding.
/// On failure the error from the standard alphabet is reported.
pub fn decode_base64(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD_LENIENT
        .decode(text)
        .or_else(|err| URL_SAFE_LENIENT.decode(text).map_err(|_| err))
}

pub(crate) fn is_zero(value: &i64) -> bool {
    *value == 0
}

/// Deserialize `null` as the default value of the field type
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Serde adapter for `Vec<u8>` fields carried as base64 strings
pub mod base64_bytes {
    use super::*;

    pub fn serialize<T, S>(bytes: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: AsRef<[u8]>,
        S: Serializer,
    {
        serializer.serialize_str(&encode_base64(bytes.as_ref()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => decode_base64(&text).map_err(serde::de::Error::custom),
            None => Ok(Vec::new()),
        }
    }
}

/// Serde adapter for repeated `bytes` fields
pub mod base64_bytes_vec {
    use super::*;

    pub fn serialize<T, S>(items: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: AsRef<[Vec<u8>]>,
        S: Serializer,
    {
        serializer.collect_seq(items.as_ref().iter().map(|item| encode_base64(item)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        null_as_default::<_, Vec<String>>(deserializer)?
            .iter()
            .map(|text| decode_base64(text).map_err(serde::de::Error::custom))
            .collect()
    }
}

/// Serde adapter for `int64` fields
///
/// Written as a decimal string. Read from a string or a JSON number, where
/// exponent and fraction forms are accepted when the value is integral.
pub mod int64_string {
    use super::*;

    // 2^63, the first value past i64::MAX
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    fn integral(value: f64) -> Option<i64> {
        (value.fract() == 0.0 && (-LIMIT..LIMIT).contains(&value)).then_some(value as i64)
    }

    fn parse(text: &str) -> Option<i64> {
        let text = text.trim();
        text.parse()
            .ok()
            .or_else(|| text.parse().ok().and_then(integral))
    }

    pub fn serialize<S>(value: &i64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Repr>::deserialize(deserializer)? {
            None => Ok(0),
            Some(Repr::Integer(value)) => Ok(value),
            Some(Repr::Text(text)) => parse(&text).ok_or_else(|| {
                serde::de::Error::custom(format!("invalid int64 value: {text:?}"))
            }),
            Some(Repr::Float(value)) => integral(value).ok_or_else(|| {
                serde::de::Error::custom(format!("int64 value is not an integer: {value}"))
            }),
        }
    }
}

macro_rules! byte_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
        pub struct $name(Vec<u8>);

        impl $name {
            pub fn new(bytes: Vec<u8>) -> Self {
                Self(bytes)
            }

            pub fn from_bytes(bytes: &[u8]) -> Self {
                Self(bytes.to_vec())
            }

            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                base64_bytes::serialize(&self.0, serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                base64_bytes::deserialize(deserializer).map(Self)
            }
        }
    };
}

byte_newtype!(
    /// DER-encoded X.509 certificate
    DerCertificate
);

byte_newtype!(
    /// Signed payload bytes (an in-toto statement for attestations)
    PayloadBytes
);

byte_newtype!(
    /// Raw signature bytes
    SignatureBytes
);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        #[serde(with = "base64_bytes")]
        body: Vec<u8>,
        #[serde(with = "base64_bytes_vec")]
        hashes: Vec<Vec<u8>>,
        #[serde(with = "int64_string")]
        index: i64,
    }

    #[test]
    fn test_decode_base64_accepts_protobuf_variants() {
        assert_eq!(decode_base64("aGk/Pz8=").unwrap(), b"hi???");
        assert_eq!(decode_base64("aGk/Pz8").unwrap(), b"hi???");
        assert_eq!(decode_base64("aGk_Pz8").unwrap(), b"hi???");
        assert!(decode_base64("not base64!").is_err());
    }

    #[test]
    fn test_encode_base64_is_padded_standard() {
        assert_eq!(encode_base64(b"hi???"), "aGk/Pz8=");
    }

    #[test]
    fn test_sample_serde() {
        let json = r#"{"body":"aGVsbG8=","hashes":["AQI=","AwQ="],"index":"42"}"#;
        let sample: Sample = serde_json::from_str(json).unwrap();
        assert_eq!(sample.body, b"hello");
        assert_eq!(sample.hashes, vec![vec![1, 2], vec![3, 4]]);
        assert_eq!(sample.index, 42);
        assert_eq!(serde_json::to_string(&sample).unwrap(), json);
    }

    #[test]
    fn test_int64_accepts_number() {
        let sample: Sample =
            serde_json::from_str(r#"{"body":"","hashes":[],"index":-7}"#).unwrap();
        assert_eq!(sample.index, -7);
    }

    #[test]
    fn test_int64_accepts_integral_floats() {
        for (input, expected) in [("1.0e3", 1000), ("-2.0", -2), ("\"1e2\"", 100)] {
            let json = format!(r#"{{"body":"","hashes":[],"index":{input}}}"#);
            let sample: Sample = serde_json::from_str(&json).unwrap();
            assert_eq!(sample.index, expected, "{input}");
        }
    }

    #[test]
    fn test_int64_rejects_garbage() {
        for input in [r#""seven""#, "1.5", r#""2.5""#, "1e19", r#""NaN""#] {
            let json = format!(r#"{{"body":"","hashes":[],"index":{input}}}"#);
            let result: Result<Sample, _> = serde_json::from_str(&json);
            assert!(result.is_err(), "{input}");
        }
    }

    #[test]
    fn test_null_reads_as_default() {
        let sample: Sample =
            serde_json::from_str(r#"{"body":null,"hashes":null,"index":null}"#).unwrap();
        assert!(sample.body.is_empty());
        assert!(sample.hashes.is_empty());
        assert_eq!(sample.index, 0);

        let sig: SignatureBytes = serde_json::from_str("null").unwrap();
        assert!(sig.is_empty());
    }

    #[test]
    fn test_newtype_serde() {
        let sig = SignatureBytes::from_bytes(b"\x30\x44\x02\x20");
        let json = serde_json::to_string(&sig).unwrap();
        assert_eq!(json, r#""MEQCIA==""#);
        let parsed: SignatureBytes = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sig);
        assert_eq!(parsed.len(), 4);
    }
}
