//! Bidirectional transform between plaintext saves and the wire string the
//! client exchanges them as.
//!
//! The wire layout, outermost first: ASCII marker, base64, AES-256-ECB with
//! zero padding to a 32-byte boundary, a byte-wise decrement, an 8-byte inner
//! tag, base64 again, a 4-byte little-endian plaintext length, and a
//! zlib-format deflate stream. Every layer must reproduce the client's
//! output byte for byte.

use std::io::{Read, Write};

use aes::Aes256;
use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use serde::{Deserialize, Serialize};

use super::error::SaveError;

/// Leading ASCII marker of every encoded save blob.
pub const SAVE_HEADER: &str = "DbdDAgAC";

/// Tag sitting between the cipher layer and the inner base64 layer.
const INNER_TAG: [u8; 8] = [0x44, 0x62, 0x64, 0x44, 0x41, 0x51, 0x45, 0x42]; // "DbdDAQEB"

/// The cipher pads to this boundary, not to the AES block size.
const PAD_BOUNDARY: usize = 32;

const AES_BLOCK_SIZE: usize = 16;

/// The 256-bit save key. Supplied by the deployment; never generated here.
pub type SaveKey = [u8; 32];

/// A player's persisted game state.
///
/// Only `characterData` is interpreted by the server; every other field
/// rides through the flattened map untouched.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct SaveData {
    #[serde(rename = "characterData", default)]
    pub character_data: Vec<CharacterEntry>,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

/// Per-character state inside a save.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct CharacterEntry {
    pub key: i64,
    pub data: CharacterData,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct CharacterData {
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

/// One inventory entry; `i` holds a `"<perk>,<level>"` pair.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct InventoryItem {
    pub i: String,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

/// Stateless save codec holding only the expanded AES key.
///
/// Calls are pure and blocking; a codec can be shared freely across threads.
#[derive(Clone)]
pub struct SaveCodec {
    cipher: Aes256,
}

impl SaveCodec {
    /// Create a codec from the deployment's 256-bit save key.
    pub fn new(key: SaveKey) -> Self {
        SaveCodec {
            cipher: Aes256::new(&GenericArray::from(key)),
        }
    }

    /// Encodes a plaintext buffer (UTF-16LE for real saves) into the wire string.
    pub fn encode(&self, plain: &[u8]) -> Result<String, SaveError> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(plain)?;
        let compressed = encoder.finish()?;

        let mut inner = Vec::with_capacity(4 + compressed.len());
        inner.extend_from_slice(&(plain.len() as u32).to_le_bytes());
        inner.extend_from_slice(&compressed);

        let mut tagged = Vec::with_capacity(INNER_TAG.len() + inner.len());
        tagged.extend_from_slice(&INNER_TAG);
        tagged.extend_from_slice(BASE64.encode(&inner).as_bytes());
        for byte in &mut tagged {
            *byte = byte.wrapping_sub(1);
        }

        let ciphertext = self.encrypt(&tagged);
        Ok(format!("{SAVE_HEADER}{}", BASE64.encode(ciphertext)))
    }

    /// Decodes a wire string back into the plaintext buffer.
    ///
    /// Exact inverse of [`encode`](Self::encode); malformed input at any
    /// layer surfaces as a [`SaveError`], never as partial output.
    pub fn decode(&self, wire: &str) -> Result<Vec<u8>, SaveError> {
        let payload = wire.strip_prefix(SAVE_HEADER).ok_or(SaveError::BadHeader)?;
        let ciphertext = BASE64.decode(payload)?;
        let mut tagged = self.decrypt(&ciphertext)?;
        for byte in &mut tagged {
            *byte = byte.wrapping_add(1);
        }
        if tagged.len() < INNER_TAG.len() || tagged[..INNER_TAG.len()] != INNER_TAG {
            return Err(SaveError::BadInnerTag);
        }
        let inner = BASE64.decode(&tagged[INNER_TAG.len()..])?;
        if inner.len() < 4 {
            return Err(SaveError::Truncated);
        }
        // 4-byte plaintext length prefix; the deflate stream is
        // self-terminating and does not need it.
        let mut plain = Vec::new();
        ZlibDecoder::new(&inner[4..])
            .read_to_end(&mut plain)
            .map_err(SaveError::Decompression)?;
        Ok(plain)
    }

    /// Decodes a wire string into a [`SaveData`] document.
    pub fn decode_document(&self, wire: &str) -> Result<SaveData, SaveError> {
        let plain = self.decode(wire)?;
        let text = string_from_utf16le(&plain)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Serializes a [`SaveData`] document and encodes it into the wire string.
    pub fn encode_document(&self, save: &SaveData) -> Result<String, SaveError> {
        let text = serde_json::to_string(save)?;
        self.encode(&utf16le_bytes(&text))
    }

    /// AES-256-ECB with manual zero padding to the next 32-byte boundary.
    /// A full 32 bytes of padding is added when already aligned.
    fn encrypt(&self, data: &[u8]) -> Vec<u8> {
        let pad = PAD_BOUNDARY - data.len() % PAD_BOUNDARY;
        let mut buf = Vec::with_capacity(data.len() + pad);
        buf.extend_from_slice(data);
        buf.resize(data.len() + pad, 0);
        for block in buf.chunks_exact_mut(AES_BLOCK_SIZE) {
            self.cipher.encrypt_block(GenericArray::from_mut_slice(block));
        }
        buf
    }

    /// AES-256-ECB decryption followed by padding removal.
    ///
    /// Two padding conventions exist across save versions: all-zero padding,
    /// and a trailing pad-count byte. A zero last byte means the former,
    /// anything else is read as a count.
    fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, SaveError> {
        if data.len() % AES_BLOCK_SIZE != 0 {
            return Err(SaveError::BlockAlignment { len: data.len() });
        }
        let mut buf = data.to_vec();
        for block in buf.chunks_exact_mut(AES_BLOCK_SIZE) {
            self.cipher.decrypt_block(GenericArray::from_mut_slice(block));
        }
        match buf.last().copied() {
            Some(0) => {
                while buf.last() == Some(&0) {
                    buf.pop();
                }
            }
            Some(count) => {
                let count = count as usize;
                if count > buf.len() {
                    return Err(SaveError::BadPadding);
                }
                buf.truncate(buf.len() - count);
            }
            None => {}
        }
        Ok(buf)
    }
}

/// Encodes a string as UTF-16LE bytes, the encoding the client stores saves in.
pub fn utf16le_bytes(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for unit in text.encode_utf16() {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    out
}

/// Decodes UTF-16LE bytes back into a string.
pub fn string_from_utf16le(bytes: &[u8]) -> Result<String, SaveError> {
    if bytes.len() % 2 != 0 {
        return Err(SaveError::OddTextLength);
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    Ok(String::from_utf16(&units)?)
}
