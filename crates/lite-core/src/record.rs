use serde::{Deserialize, Deserializer, Serialize};

use crate::codec::{Codec, CodecError, Encoding};
use crate::error::{Error, Result};

/// The JSON document stored as the container's reserved entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataRecord {
    pub encoded_payload: String,
    pub original_file_name: String,
    /// Anything other than a JSON string is read as absent.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub file_extension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<Encoding>,
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

impl MetadataRecord {
    pub fn encode(
        codec: &Codec,
        raw: &[u8],
        original_file_name: impl Into<String>,
        file_extension: Option<String>,
    ) -> Result<Self> {
        let encoded_payload = codec.encode(raw).map_err(|e| Error::Encode { source: e })?;
        Ok(Self {
            encoded_payload,
            original_file_name: original_file_name.into(),
            file_extension,
            encoding: Some(codec.encoding()),
        })
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Error::MetadataCorrupt {
            reason: format!("record is not valid JSON for the schema: {e}"),
        })
    }

    pub fn to_vec(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| Error::Serialize { source: e })
    }

    /// Decode the payload with `codec`, refusing records tagged with another encoding.
    pub fn decode_payload(&self, codec: &Codec) -> Result<Vec<u8>> {
        if let Some(tagged) = self.encoding {
            if tagged != codec.encoding() {
                return Err(Error::MetadataCorrupt {
                    reason: format!(
                        "payload is tagged '{tagged}' but this deployment decodes '{}'",
                        codec.encoding()
                    ),
                });
            }
        }

        codec
            .decode(&self.encoded_payload)
            .map_err(|e| match e {
                CodecError::TooLarge { limit } => Error::PayloadTooLarge { limit },
                e => Error::MetadataCorrupt {
                    reason: format!("payload does not decode: {e}"),
                },
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case_fields() {
        let record = MetadataRecord::encode(
            &Codec::new(Encoding::Base64),
            b"hi",
            "a.txt",
            Some(".txt".into()),
        )
        .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&record.to_vec().unwrap()).unwrap();
        assert_eq!(json["encodedPayload"], "aGk=");
        assert_eq!(json["originalFileName"], "a.txt");
        assert_eq!(json["fileExtension"], ".txt");
        assert_eq!(json["encoding"], "base64");
    }

    #[test]
    fn missing_extension_is_omitted() {
        let record =
            MetadataRecord::encode(&Codec::new(Encoding::Hex), b"", "Makefile", None).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&record.to_vec().unwrap()).unwrap();
        assert!(json.get("fileExtension").is_none());
    }

    #[test]
    fn non_string_extension_reads_as_absent() {
        let record = MetadataRecord::from_slice(
            br#"{"encodedPayload":"","originalFileName":"x","fileExtension":42}"#,
        )
        .unwrap();
        assert_eq!(record.file_extension, None);
        assert_eq!(record.encoding, None);
    }

    #[test]
    fn missing_payload_is_corrupt() {
        let err =
            MetadataRecord::from_slice(br#"{"originalFileName":"x","fileExtension":".txt"}"#)
                .unwrap_err();
        assert!(matches!(err, Error::MetadataCorrupt { .. }));
    }

    #[test]
    fn unknown_encoding_tag_is_corrupt() {
        let err = MetadataRecord::from_slice(
            br#"{"encodedPayload":"","originalFileName":"x","encoding":"rot13"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::MetadataCorrupt { .. }));
    }

    #[test]
    fn mismatched_tag_is_refused() {
        let record =
            MetadataRecord::encode(&Codec::new(Encoding::Hex), b"abc", "a", None).unwrap();
        let err = record
            .decode_payload(&Codec::new(Encoding::Base64))
            .unwrap_err();
        assert!(matches!(err, Error::MetadataCorrupt { .. }));
    }

    #[test]
    fn untagged_record_uses_configured_codec() {
        let record = MetadataRecord::from_slice(
            br#"{"encodedPayload":"aGk=","originalFileName":"a"}"#,
        )
        .unwrap();
        assert_eq!(record.decode_payload(&Codec::new(Encoding::Base64)).unwrap(), b"hi");
    }

    #[test]
    fn payload_over_the_ceiling_is_refused() {
        let codec = Codec::new(Encoding::ZlibHex);
        let record = MetadataRecord::encode(&codec, &[7u8; 10_000], "big.bin", None).unwrap();

        let err = record.decode_payload(&codec.max_decoded(9_999)).unwrap_err();
        assert!(matches!(err, Error::PayloadTooLarge { limit: 9_999 }));
        assert_eq!(record.decode_payload(&codec.max_decoded(10_000)).unwrap().len(), 10_000);
    }
}
