//! Filesystem layout and housekeeping for persisted collections.
//!
//! Layout: `<root>/<name>/collection.json`, guarded during creation by
//! `<root>/.locks/<name>.lock`. Collection names never start with `.`, so no
//! collection can collide with the lock directory. The collection file is
//! published with a temp-file-then-rename step, so it is either complete or
//! absent.
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use walkdir::WalkDir;

use vizrag_core::error::{Error, Result};

use crate::collection::Collection;
use crate::schema::{is_valid_collection_name, PersistedCollection, COLLECTION_FILE_NAME};

pub fn collection_dir(root: &Path, name: &str) -> PathBuf {
    root.join(name)
}

pub fn collection_file(root: &Path, name: &str) -> PathBuf {
    collection_dir(root, name).join(COLLECTION_FILE_NAME)
}

const LOCK_DIR_NAME: &str = ".locks";

pub fn creation_lock_path(root: &Path, name: &str) -> PathBuf {
    root.join(LOCK_DIR_NAME).join(format!("{name}.lock"))
}

/// Read a persisted collection. `Ok(None)` means "does not exist": the file is
/// absent, unparseable, or does not describe a complete collection `name`.
pub fn read_collection(root: &Path, name: &str) -> Result<Option<Collection>> {
    let path = collection_file(root, name);
    let file = match File::open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::storage(&path, e)),
    };
    match serde_json::from_reader::<_, PersistedCollection>(BufReader::new(file)) {
        Ok(persisted) if persisted.is_valid_for(name) => {
            let collection = Collection::from_persisted(persisted, path.clone());
            if collection.is_none() {
                tracing::warn!(path = %path.display(), "collection file holds malformed vectors; treating as absent");
            }
            Ok(collection)
        }
        Ok(_) => {
            tracing::warn!(path = %path.display(), "collection file is incomplete or from another schema; treating as absent");
            Ok(None)
        }
        Err(e) if e.is_io() => Err(Error::storage(&path, e.into())),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "collection file is unreadable; treating as absent");
            Ok(None)
        }
    }
}

pub fn write_collection(root: &Path, persisted: &PersistedCollection) -> Result<PathBuf> {
    let dir = collection_dir(root, &persisted.name);
    fs::create_dir_all(&dir).map_err(|e| Error::storage(&dir, e))?;
    let path = dir.join(COLLECTION_FILE_NAME);

    let tmp = NamedTempFile::new_in(&dir).map_err(|e| Error::storage(&dir, e))?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer(&mut writer, persisted)?;
        writer.flush().map_err(|e| Error::storage(tmp.path(), e))?;
    }
    tmp.as_file().sync_all().map_err(|e| Error::storage(tmp.path(), e))?;
    tmp.persist(&path).map_err(|e| Error::storage(&path, e.error))?;
    Ok(path)
}

/// Names of directories under `root` that hold a valid collection, sorted.
pub fn list_collections(root: &Path) -> Result<Vec<String>> {
    if !root.exists() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            Error::storage(path, e.into_io_error().unwrap_or_else(|| ErrorKind::Other.into()))
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else { continue };
        if is_valid_collection_name(name) && read_collection(root, name)?.is_some() {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

pub fn remove_collection(root: &Path, name: &str) -> Result<bool> {
    let dir = collection_dir(root, name);
    match fs::remove_dir_all(&dir) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::storage(&dir, e)),
    }
}
