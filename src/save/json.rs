//! Encoding helper for server-shipped JSON payloads.

use std::fs;
use std::path::Path;

use super::codec::SaveCodec;
use super::error::SaveError;

/// Loads the specified JSON file and encodes it for decoding by the client.
///
/// The file must be UTF-16LE encoded; a leading byte-order mark is stripped.
/// The contents are fed to the codec as raw bytes, no JSON parse happens.
pub fn load_and_encode(path: &Path, codec: &SaveCodec) -> Result<String, SaveError> {
    let mut contents = fs::read(path)?;
    if contents.starts_with(&[0xFF, 0xFE]) {
        contents.drain(..2);
    }
    codec.encode(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::codec::utf16le_bytes;

    #[test]
    fn test_load_and_encode_strips_bom() {
        let codec = SaveCodec::new([9; 32]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.json");

        let body = utf16le_bytes(r#"{"news":[]}"#);
        let mut with_bom = vec![0xFF, 0xFE];
        with_bom.extend_from_slice(&body);
        fs::write(&path, &with_bom).unwrap();

        let wire = load_and_encode(&path, &codec).unwrap();
        assert_eq!(codec.decode(&wire).unwrap(), body);
    }

    #[test]
    fn test_load_and_encode_without_bom() {
        let codec = SaveCodec::new([9; 32]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.json");

        let body = utf16le_bytes("{}");
        fs::write(&path, &body).unwrap();

        let wire = load_and_encode(&path, &codec).unwrap();
        assert_eq!(codec.decode(&wire).unwrap(), body);
    }
}
