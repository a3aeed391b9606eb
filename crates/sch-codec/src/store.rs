use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde_json::Value;

use crate::blueprint::Blueprint;
use crate::error::{CodecError, CodecResult};
use crate::record::{self, Record};

/// An artifact that can be stored under its id.
pub trait Identified {
    /// Human-readable artifact name used in logs and errors.
    const ARTIFACT: &'static str;

    /// The storage id, if the artifact has one.
    fn id(&self) -> Option<&str>;
}

/// Check that `id` can be used as a file stem.
pub fn validate_id(id: &str) -> CodecResult<()> {
    let usable = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if usable {
        Ok(())
    } else {
        Err(CodecError::InvalidIdentifier(id.to_string()))
    }
}

/// Configuration for a [`Store`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// File extension of stored artifacts, without the dot.
    pub extension: String,
    /// Replace existing files when saving.
    pub overwrite: bool,
    /// Write indented JSON.
    pub pretty: bool,
    /// Create the directory when loading from a path that does not exist.
    pub create_missing: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            extension: "json".into(),
            overwrite: true,
            pretty: true,
            create_missing: true,
        }
    }
}

impl StoreConfig {
    /// Set the file extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Set whether saving replaces existing files.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Set whether JSON is indented.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Set whether a missing directory is created on load.
    pub fn with_create_missing(mut self, create_missing: bool) -> Self {
        self.create_missing = create_missing;
        self
    }
}

/// A file that was not loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    /// Path of the file.
    pub path: PathBuf,
    /// Why it was skipped.
    pub reason: String,
}

/// Result of [`Store::load`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Number of artifacts loaded.
    pub loaded: usize,
    /// Files that could not be read as artifacts.
    pub skipped: Vec<SkippedFile>,
}

impl LoadReport {
    /// Whether every file was loaded.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Result of saving one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The file was written.
    Written(PathBuf),
    /// A file already existed and overwriting is disabled.
    Kept(PathBuf),
}

/// Result of [`Store::save_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    /// Files written.
    pub written: Vec<PathBuf>,
    /// Existing files left untouched.
    pub kept: Vec<PathBuf>,
    /// Artifacts that could not be saved, with the reason.
    pub failed: Vec<String>,
}

impl SaveReport {
    /// Whether every artifact was written.
    pub fn is_complete(&self) -> bool {
        self.kept.is_empty() && self.failed.is_empty()
    }
}

/// A directory holding one JSON file per artifact, named `<id>.<extension>`.
///
/// Loaded artifacts are cached in memory; files are only touched by
/// [`Store::load`], [`Store::save`] and [`Store::save_all`].
#[derive(Debug)]
pub struct Store<T> {
    dir: PathBuf,
    blueprint: Blueprint<T>,
    config: StoreConfig,
    items: Vec<T>,
}

impl<T: Identified + 'static> Store<T> {
    /// Create an empty store over `dir` with the default configuration.
    pub fn new(dir: impl Into<PathBuf>, blueprint: Blueprint<T>) -> Self {
        Self {
            dir: dir.into(),
            blueprint,
            config: StoreConfig::default(),
            items: Vec::new(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// The directory backing the store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The active configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The blueprint used to read and write artifacts.
    pub fn blueprint(&self) -> &Blueprint<T> {
        &self.blueprint
    }

    /// Where the artifact with `id` is stored.
    pub fn path_for(&self, id: &str) -> CodecResult<PathBuf> {
        validate_id(id)?;
        Ok(self.dir.join(format!("{id}.{}", self.config.extension)))
    }

    /// Read every matching file in the directory into the cache.
    ///
    /// Files that cannot be parsed or deserialized are skipped with a
    /// warning. Only environment failures abort the load.
    pub fn load(&mut self) -> CodecResult<LoadReport> {
        let mut report = LoadReport::default();
        if !self.dir.exists() {
            if self.config.create_missing {
                fs::create_dir_all(&self.dir).map_err(|source| CodecError::Io {
                    path: self.dir.clone(),
                    source,
                })?;
                debug!("created {} directory {}", T::ARTIFACT, self.dir.display());
            }
            return Ok(report);
        }
        if !self.dir.is_dir() {
            return Err(CodecError::NotADirectory(self.dir.clone()));
        }

        for path in self.candidate_files()? {
            match self.read_file(&path) {
                Ok(item) => {
                    self.insert(item);
                    report.loaded += 1;
                }
                Err(e) => {
                    warn!("skipping {} file {}: {e}", T::ARTIFACT, path.display());
                    report.skipped.push(SkippedFile {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }
        info!(
            "loaded {} {}(s) from {} ({} skipped)",
            report.loaded,
            T::ARTIFACT,
            self.dir.display(),
            report.skipped.len()
        );
        Ok(report)
    }

    fn candidate_files(&self) -> CodecResult<Vec<PathBuf>> {
        let io = |source| CodecError::Io {
            path: self.dir.clone(),
            source,
        };
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(io)? {
            let path = entry.map_err(io)?.path();
            let matches = path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext == self.config.extension.as_str());
            if matches {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Parse and deserialize a single file without caching it.
    pub fn read_file(&self, path: &Path) -> CodecResult<T> {
        let text = fs::read_to_string(path).map_err(|source| CodecError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let record = record::into_record(serde_json::from_str(&text)?)?;
        self.blueprint.deserialize(&record)
    }

    /// Cached artifacts in load/insert order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of cached artifacts.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The cached artifact with `id`.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == Some(id))
    }

    /// Add an artifact to the cache, replacing one with the same id.
    pub fn insert(&mut self, item: T) -> Option<T> {
        let existing = item
            .id()
            .and_then(|id| self.items.iter().position(|i| i.id() == Some(id)));
        match existing {
            Some(index) => Some(std::mem::replace(&mut self.items[index], item)),
            None => {
                self.items.push(item);
                None
            }
        }
    }

    /// Remove the cached artifact with `id`. The file is left in place.
    pub fn remove(&mut self, id: &str) -> Option<T> {
        let index = self.items.iter().position(|i| i.id() == Some(id))?;
        Some(self.items.remove(index))
    }

    /// Serialize `item` into a record.
    pub fn to_record(&self, item: &T) -> CodecResult<Record> {
        self.blueprint.serialize(item)
    }

    /// Write `item` to `<id>.<extension>`.
    pub fn save(&self, item: &T) -> CodecResult<SaveOutcome> {
        let id = item.id().ok_or_else(|| CodecError::MissingIdentifier {
            artifact: T::ARTIFACT.to_string(),
        })?;
        let path = self.path_for(id)?;
        let record = self.blueprint.serialize(item)?;

        if path.exists() && !self.config.overwrite {
            debug!("keeping existing {}", path.display());
            return Ok(SaveOutcome::Kept(path));
        }
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|source| CodecError::Io {
                path: self.dir.clone(),
                source,
            })?;
        }

        let value = Value::Object(record);
        let mut text = if self.config.pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        text.push('\n');
        fs::write(&path, text).map_err(|source| CodecError::Io {
            path: path.clone(),
            source,
        })?;
        debug!("saved {} {id} to {}", T::ARTIFACT, path.display());
        Ok(SaveOutcome::Written(path))
    }

    /// Save every cached artifact.
    ///
    /// Artifacts that cannot be saved are reported and skipped; filesystem
    /// failures abort.
    pub fn save_all(&self) -> CodecResult<SaveReport> {
        let mut report = SaveReport::default();
        for item in &self.items {
            match self.save(item) {
                Ok(SaveOutcome::Written(path)) => report.written.push(path),
                Ok(SaveOutcome::Kept(path)) => report.kept.push(path),
                Err(e @ CodecError::Io { .. }) => return Err(e),
                Err(e) => {
                    warn!("not saving {}: {e}", T::ARTIFACT);
                    report.failed.push(e.to_string());
                }
            }
        }
        info!(
            "saved {} {}(s) to {} ({} kept, {} failed)",
            report.written.len(),
            T::ARTIFACT,
            self.dir.display(),
            report.kept.len(),
            report.failed.len()
        );
        Ok(report)
    }
}
