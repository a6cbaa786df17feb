use crate::core::{Result, StoreError};
use serde::{Serialize, de::DeserializeOwned};
use std::fmt;
use std::str::FromStr;

/// Turns a whole sequence into bytes and back.
///
/// Implementations never see zero-length input on decode; an empty buffer is
/// the "nothing stored" marker and is handled before the codec is asked.
pub trait Codec {
    fn encode<T: Serialize>(&self, items: &[T]) -> Result<Vec<u8>>;

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<Vec<T>>;
}

/// Built-in snapshot formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Json,
    JsonPretty,
    MessagePack,
}

impl Format {
    pub fn name(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::JsonPretty => "json-pretty",
            Format::MessagePack => "msgpack",
        }
    }
}

impl Codec for Format {
    fn encode<T: Serialize>(&self, items: &[T]) -> Result<Vec<u8>> {
        let encoded = match self {
            Format::Json => serde_json::to_vec(items).map_err(|e| e.to_string()),
            Format::JsonPretty => serde_json::to_vec_pretty(items).map_err(|e| e.to_string()),
            Format::MessagePack => rmp_serde::to_vec(items).map_err(|e| e.to_string()),
        };
        encoded.map_err(|e| {
            StoreError::Encode(format!("Failed to encode {} snapshot: {}", self.name(), e))
        })
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<Vec<T>> {
        let decoded = match self {
            Format::Json | Format::JsonPretty => {
                serde_json::from_slice(bytes).map_err(|e| e.to_string())
            }
            Format::MessagePack => rmp_serde::from_slice(bytes).map_err(|e| e.to_string()),
        };
        decoded.map_err(|e| {
            StoreError::Decode(format!("Failed to decode {} snapshot: {}", self.name(), e))
        })
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "json-pretty" | "pretty" => Ok(Format::JsonPretty),
            "msgpack" | "messagepack" | "rmp" => Ok(Format::MessagePack),
            other => Err(StoreError::Config(format!(
                "Unknown snapshot format '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_snapshot_is_plain_array() {
        let bytes = Format::Json.encode(&[1, 2, 3]).unwrap();
        assert_eq!(bytes, b"[1,2,3]");

        let decoded: Vec<i32> = Format::Json.decode(&bytes).unwrap();
        assert_eq!(decoded, vec![1, 2, 3]);
    }

    #[test]
    fn test_msgpack_preserves_nested_values() {
        let items = vec![
            ("a".to_string(), Some(1u8)),
            ("b".to_string(), None),
        ];
        let bytes = Format::MessagePack.encode(&items).unwrap();
        let decoded: Vec<(String, Option<u8>)> = Format::MessagePack.decode(&bytes).unwrap();
        assert_eq!(decoded, items);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = Format::Json.decode::<i32>(b"{not json").unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("msgpack".parse::<Format>().unwrap(), Format::MessagePack);
        assert!("yaml".parse::<Format>().is_err());
    }
}
