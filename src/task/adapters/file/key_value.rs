//! Key-value store keeping one file per key inside a directory.

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::sync::Arc;

use crate::task::ports::{KeyValueStore, StorageError, StorageResult};

const VALUE_EXTENSION: &str = "json";
const TEMP_SUFFIX: &str = ".tmp";

/// Directory-backed key-value store.
///
/// Each key maps to `<escaped-key>.json` in the directory. Writes go to a
/// sibling temporary file first and are renamed into place, so a reader
/// never observes a half-written value.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: Arc<Dir>,
}

impl FileKeyValueStore {
    /// Opens (creating if needed) the storage directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] when the directory cannot be created or
    /// opened.
    pub fn open(path: &str) -> StorageResult<Self> {
        Dir::create_ambient_dir_all(path, ambient_authority()).map_err(StorageError::io)?;
        let dir = Dir::open_ambient_dir(path, ambient_authority()).map_err(StorageError::io)?;
        Ok(Self { dir: Arc::new(dir) })
    }
}

/// Maps a storage key to a portable file name.
///
/// `[A-Za-z0-9._-]` pass through; every other UTF-8 byte becomes `%XX`
/// (upper-case hex), so distinct keys never share a file.
fn file_name_for(key: &str) -> StorageResult<String> {
    if key.trim().is_empty() {
        return Err(StorageError::InvalidKey(key.to_owned()));
    }
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'-') {
            stem.push(char::from(byte));
        } else {
            stem.push('%');
            stem.push(hex_digit(byte >> 4));
            stem.push(hex_digit(byte & 0x0F));
        }
    }
    Ok(format!("{stem}.{VALUE_EXTENSION}"))
}

fn hex_digit(nibble: u8) -> char {
    char::from_digit(u32::from(nibble), 16)
        .map_or('0', |digit| digit.to_ascii_uppercase())
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let file_name = file_name_for(key)?;
        let dir = Arc::clone(&self.dir);
        tokio::task::spawn_blocking(move || match dir.read_to_string(&file_name) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::io(err)),
        })
        .await
        .map_err(StorageError::io)?
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let file_name = file_name_for(key)?;
        let temp_name = format!("{file_name}{TEMP_SUFFIX}");
        let contents = value.to_owned();
        let dir = Arc::clone(&self.dir);
        tokio::task::spawn_blocking(move || {
            dir.write(&temp_name, contents.as_bytes())
                .map_err(StorageError::io)?;
            dir.rename(&temp_name, &dir, &file_name)
                .map_err(StorageError::io)
        })
        .await
        .map_err(StorageError::io)?
    }
}
