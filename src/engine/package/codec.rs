// Binary encoding and decoding of character packages

use super::FormatError;
use byteorder::{ByteOrder, LittleEndian};
use log::debug;
use std::path::Path;

/// Leading literal identifying a character package
pub const PACKAGE_MAGIC: &str = "UNBEATABLE-CHARACTER-FILE";

/// The only package version this loader accepts
pub const PACKAGE_VERSION: &str = "V1.0.0";

/// Longest length a prefix may declare (matches the signed 32-bit length of the format)
const MAX_FIELD_LEN: usize = i32::MAX as usize;

/// Length prefixes use at most five 7-bit groups
const MAX_PREFIX_BYTES: usize = 5;

/// Raw fields of a decoded package, before the info JSON is parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPackage {
    pub info_json: String,
    pub prefab_resource_name: String,
    pub animator_resource_name: String,
    pub blob: Vec<u8>,
}

/// Encode a package into its container bytes
pub fn encode(
    info_json: &str,
    prefab_resource_name: &str,
    animator_resource_name: &str,
    blob: &[u8],
) -> Result<Vec<u8>, FormatError> {
    let blob_len = i32::try_from(blob.len()).map_err(|_| FormatError::BlobTooLarge { len: blob.len() })?;

    let mut buf = Vec::with_capacity(
        PACKAGE_MAGIC.len()
            + PACKAGE_VERSION.len()
            + info_json.len()
            + prefab_resource_name.len()
            + animator_resource_name.len()
            + blob.len()
            + 5 * MAX_PREFIX_BYTES
            + 4,
    );

    write_string(&mut buf, "magic", PACKAGE_MAGIC)?;
    write_string(&mut buf, "version", PACKAGE_VERSION)?;
    write_string(&mut buf, "character info", info_json)?;
    write_string(&mut buf, "prefab name", prefab_resource_name)?;
    write_string(&mut buf, "animator name", animator_resource_name)?;

    let mut len_bytes = [0u8; 4];
    LittleEndian::write_i32(&mut len_bytes, blob_len);
    buf.extend_from_slice(&len_bytes);
    buf.extend_from_slice(blob);

    Ok(buf)
}

/// Decode container bytes into raw package fields
pub fn decode(bytes: &[u8]) -> Result<DecodedPackage, FormatError> {
    let mut reader = FieldReader::new(bytes);

    // Anything unreadable in the leading field means this is not a package at all
    match reader.read_raw_string("magic") {
        Ok(magic) if magic == PACKAGE_MAGIC.as_bytes() => {}
        _ => return Err(FormatError::MagicMismatch),
    }

    let version = reader.read_raw_string("version")?;
    if version != PACKAGE_VERSION.as_bytes() {
        return Err(FormatError::UnsupportedVersion {
            found: String::from_utf8_lossy(version).into_owned(),
        });
    }

    let info_json = reader.read_string("character info")?;
    let prefab_resource_name = reader.read_string("prefab name")?;
    let animator_resource_name = reader.read_string("animator name")?;

    let blob_len = reader.read_i32("blob length")?;
    let blob_len = usize::try_from(blob_len).map_err(|_| FormatError::MalformedLength {
        field: "blob length",
    })?;
    let blob = reader.take("blob", blob_len)?.to_vec();

    if reader.remaining() > 0 {
        debug!("Ignoring {} trailing bytes after package blob", reader.remaining());
    }

    Ok(DecodedPackage {
        info_json,
        prefab_resource_name,
        animator_resource_name,
        blob,
    })
}

/// Encode a package and write it to disk, replacing any existing file
pub async fn write_package<P: AsRef<Path>>(
    path: P,
    info_json: &str,
    prefab_resource_name: &str,
    animator_resource_name: &str,
    blob: &[u8],
) -> std::io::Result<()> {
    let bytes = encode(info_json, prefab_resource_name, animator_resource_name, blob)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    tokio::fs::write(path, bytes).await
}

fn write_string(buf: &mut Vec<u8>, field: &'static str, value: &str) -> Result<(), FormatError> {
    if value.len() > MAX_FIELD_LEN {
        return Err(FormatError::MalformedLength { field });
    }

    let mut len = value.len();
    while len >= 0x80 {
        buf.push((len as u8 & 0x7f) | 0x80);
        len >>= 7;
    }
    buf.push(len as u8);
    buf.extend_from_slice(value.as_bytes());
    Ok(())
}

/// Cursor over package bytes that reports which field ran short
struct FieldReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, field: &'static str, len: usize) -> Result<&'a [u8], FormatError> {
        if len > self.remaining() {
            return Err(FormatError::Truncated {
                field,
                needed: len,
                available: self.remaining(),
            });
        }

        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn read_length_prefix(&mut self, field: &'static str) -> Result<usize, FormatError> {
        let mut value = 0usize;

        for group in 0..MAX_PREFIX_BYTES {
            let byte = self.take(field, 1)?[0];
            value |= ((byte & 0x7f) as usize) << (7 * group);

            if byte & 0x80 == 0 {
                if value > MAX_FIELD_LEN {
                    return Err(FormatError::MalformedLength { field });
                }
                return Ok(value);
            }
        }

        Err(FormatError::MalformedLength { field })
    }

    fn read_raw_string(&mut self, field: &'static str) -> Result<&'a [u8], FormatError> {
        let len = self.read_length_prefix(field)?;
        self.take(field, len)
    }

    fn read_string(&mut self, field: &'static str) -> Result<String, FormatError> {
        let raw = self.read_raw_string(field)?;
        std::str::from_utf8(raw)
            .map(str::to_string)
            .map_err(|_| FormatError::InvalidText { field })
    }

    fn read_i32(&mut self, field: &'static str) -> Result<i32, FormatError> {
        Ok(LittleEndian::read_i32(self.take(field, 4)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<u8> {
        encode(r#"{"Name":"Robo"}"#, "RoboPrefab", "RoboAnim", &[1, 2, 3, 4, 5]).unwrap()
    }

    /// Build bytes with arbitrary header strings
    fn with_header(magic: &str, version: &str) -> Vec<u8> {
        let mut buf = Vec::new();
        write_string(&mut buf, "magic", magic).unwrap();
        write_string(&mut buf, "version", version).unwrap();
        write_string(&mut buf, "character info", "{}").unwrap();
        write_string(&mut buf, "prefab name", "p").unwrap();
        write_string(&mut buf, "animator name", "a").unwrap();
        buf.extend_from_slice(&0i32.to_le_bytes());
        buf
    }

    #[test]
    fn test_roundtrip() {
        let decoded = decode(&sample()).unwrap();
        assert_eq!(decoded.info_json, r#"{"Name":"Robo"}"#);
        assert_eq!(decoded.prefab_resource_name, "RoboPrefab");
        assert_eq!(decoded.animator_resource_name, "RoboAnim");
        assert_eq!(decoded.blob, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_roundtrip_empty_fields_and_unicode() {
        let bytes = encode("", "プレハブ", "", &[]).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.info_json, "");
        assert_eq!(decoded.prefab_resource_name, "プレハブ");
        assert!(decoded.blob.is_empty());
    }

    #[test]
    fn test_header_layout() {
        let bytes = sample();
        // 25-byte magic with a single-byte prefix, then the 6-byte version
        assert_eq!(bytes[0], 25);
        assert_eq!(&bytes[1..26], PACKAGE_MAGIC.as_bytes());
        assert_eq!(bytes[26], 6);
        assert_eq!(&bytes[27..33], PACKAGE_VERSION.as_bytes());
    }

    #[test]
    fn test_long_string_uses_multibyte_prefix() {
        let long = "x".repeat(200);
        let mut buf = Vec::new();
        write_string(&mut buf, "test", &long).unwrap();
        assert_eq!(&buf[..2], &[0xC8, 0x01]);
        assert_eq!(buf.len(), 202);

        let bytes = encode(&long, "p", "a", &[9]).unwrap();
        assert_eq!(decode(&bytes).unwrap().info_json, long);
    }

    #[test]
    fn test_magic_mismatch() {
        assert_eq!(
            decode(&with_header("NOT-A-CHARACTER", PACKAGE_VERSION)),
            Err(FormatError::MagicMismatch)
        );
        assert_eq!(decode(&[]), Err(FormatError::MagicMismatch));
        assert_eq!(decode(&[0xFF, 0xFF]), Err(FormatError::MagicMismatch));
        assert_eq!(decode(b"hello world"), Err(FormatError::MagicMismatch));
    }

    #[test]
    fn test_magic_is_case_sensitive() {
        let lower = PACKAGE_MAGIC.to_lowercase();
        assert_eq!(
            decode(&with_header(&lower, PACKAGE_VERSION)),
            Err(FormatError::MagicMismatch)
        );
    }

    #[test]
    fn test_unsupported_version() {
        for version in ["V1.0.1", "V0.9.0", "v1.0.0", ""] {
            assert_eq!(
                decode(&with_header(PACKAGE_MAGIC, version)),
                Err(FormatError::UnsupportedVersion {
                    found: version.to_string()
                })
            );
        }
    }

    #[test]
    fn test_truncated_blob() {
        let mut bytes = sample();
        bytes.truncate(bytes.len() - 2);

        match decode(&bytes) {
            Err(FormatError::Truncated {
                field,
                needed,
                available,
            }) => {
                assert_eq!(field, "blob");
                assert_eq!(needed, 5);
                assert_eq!(available, 3);
            }
            other => panic!("expected truncation, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_string_field() {
        let bytes = sample();
        // Cut inside the info JSON
        let cut = &bytes[..40];
        assert!(matches!(
            decode(cut),
            Err(FormatError::Truncated {
                field: "character info",
                ..
            })
        ));
    }

    #[test]
    fn test_negative_blob_length() {
        let mut bytes = with_header(PACKAGE_MAGIC, PACKAGE_VERSION);
        let len = bytes.len();
        bytes[len - 4..].copy_from_slice(&(-1i32).to_le_bytes());
        assert_eq!(
            decode(&bytes),
            Err(FormatError::MalformedLength {
                field: "blob length"
            })
        );
    }

    #[test]
    fn test_invalid_utf8_field() {
        let mut bytes = Vec::new();
        write_string(&mut bytes, "magic", PACKAGE_MAGIC).unwrap();
        write_string(&mut bytes, "version", PACKAGE_VERSION).unwrap();
        bytes.extend_from_slice(&[2, 0xC3, 0x28]);
        assert_eq!(
            decode(&bytes),
            Err(FormatError::InvalidText {
                field: "character info"
            })
        );
    }

    #[test]
    fn test_overlong_length_prefix() {
        let mut bytes = Vec::new();
        write_string(&mut bytes, "magic", PACKAGE_MAGIC).unwrap();
        write_string(&mut bytes, "version", PACKAGE_VERSION).unwrap();
        bytes.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]);
        assert_eq!(
            decode(&bytes),
            Err(FormatError::MalformedLength {
                field: "character info"
            })
        );
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut bytes = sample();
        bytes.extend_from_slice(&[0xAA, 0xBB]);
        assert_eq!(decode(&bytes).unwrap().blob, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_write_package() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("robo.ubcharacter");

        write_package(&path, "{}", "RoboPrefab", "RoboAnim", b"blob")
            .await
            .unwrap();

        let bytes = tokio::fs::read(&path).await.unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.animator_resource_name, "RoboAnim");
        assert_eq!(decoded.blob, b"blob".to_vec());
    }
}
