//! Flat-file storage for encoded player saves.
//!
//! Each user owns a single blob at `<root>/save_<userId>` holding the wire
//! string as-is. There is no database; the store is the whole persistence
//! layer.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::codec::{SaveCodec, SaveData};
use super::error::SaveError;
use crate::config::save::SAVE_FILE_PREFIX;

pub struct SaveStore {
    root: PathBuf,
    codec: SaveCodec,
    /// Encoded default save, cached at load time. `None` when the
    /// deployment ships no default-save file.
    default_save: Option<String>,
}

impl SaveStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// first write.
    pub fn new(root: impl Into<PathBuf>, codec: SaveCodec) -> Self {
        SaveStore {
            root: root.into(),
            codec,
            default_save: None,
        }
    }

    /// Loads the plaintext default save (UTF-8 JSON), injects the configured
    /// starting bonus bloodpoints, and caches the encoded result.
    ///
    /// A missing file is not an error; the store simply has no default save.
    pub fn load_default_save(&mut self, path: &Path, bonus_bloodpoints: u64) -> Result<(), SaveError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("[Save] No default save at {}", path.display());
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };
        let mut save: SaveData = serde_json::from_str(&contents)?;
        save.other
            .insert("bonusExperience".to_string(), bonus_bloodpoints.into());
        self.default_save = Some(self.codec.encode_document(&save)?);
        info!("[Save] Default save loaded from {}", path.display());
        Ok(())
    }

    /// The encoded default save, if one was loaded.
    pub fn default_save(&self) -> Option<&str> {
        self.default_save.as_deref()
    }

    /// Path of the given user's save blob.
    pub fn save_path(&self, user_id: &str) -> PathBuf {
        self.root.join(format!("{SAVE_FILE_PREFIX}{user_id}"))
    }

    /// Whether the given user has a stored save.
    pub fn exists(&self, user_id: &str) -> bool {
        self.save_path(user_id).is_file()
    }

    /// Reads a user's stored wire string. `None` when no save exists.
    pub fn read(&self, user_id: &str) -> Result<Option<String>, SaveError> {
        match fs::read_to_string(self.save_path(user_id)) {
            Ok(wire) => Ok(Some(wire)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Writes a user's wire string, replacing any previous save.
    pub fn write(&self, user_id: &str, wire: &str) -> Result<(), SaveError> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.save_path(user_id), wire)?;
        debug!("[Save] Wrote save for user {user_id}");
        Ok(())
    }

    /// Rewrites the level of one perk in a user's save.
    ///
    /// Inventory items carry `"<perk>,<level>"` pairs; the first matching
    /// item on the given character is updated. Returns whether the perk was
    /// found; the save file is only rewritten when it was.
    pub fn set_perk_level(
        &self,
        user_id: &str,
        character_id: i64,
        perk_id: &str,
        level: u32,
    ) -> Result<bool, SaveError> {
        if !(1..=4).contains(&level) {
            return Err(SaveError::InvalidPerkLevel { level });
        }
        let Some(wire) = self.read(user_id)? else {
            return Ok(false);
        };
        let mut save = self.codec.decode_document(&wire)?;

        let mut found = false;
        for character in &mut save.character_data {
            if character.key != character_id {
                continue;
            }
            for item in &mut character.data.inventory {
                let perk_name = item.i.split_once(',').map(|(name, _)| name).unwrap_or(&item.i);
                if perk_name == perk_id {
                    item.i = format!("{perk_id},{level}");
                    found = true;
                    break;
                }
            }
            break;
        }

        if found {
            self.write(user_id, &self.codec.encode_document(&save)?)?;
            debug!("[Save] Set perk {perk_id} to level {level} for user {user_id}");
        }
        Ok(found)
    }
}
