//! Task data model.

use super::media::{MediaKind, TypeOverrides};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A request to organize one input path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskRequest {
    /// File or directory to organize.
    pub path: String,
    /// Caller overrides for anime/movie classification.
    #[serde(default)]
    pub overrides: TypeOverrides,
}

impl TaskRequest {
    pub fn new(path: impl Into<String>, overrides: TypeOverrides) -> Self {
        Self {
            path: path.into(),
            overrides,
        }
    }
}

/// Persisted result of one task.
///
/// Created with minimal fields when the task starts and filled in as
/// classification completes. Serialized in camelCase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub uuid: Uuid,
    pub path: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_anime: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_movie: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb_type: Option<MediaKind>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub use_ai: bool,
}

impl TaskRecord {
    /// Fresh record for a task that is just starting.
    pub fn started(uuid: Uuid, path: &str, use_ai: bool) -> Self {
        Self {
            uuid,
            path: path.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            use_ai,
            ..Default::default()
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// One planned source -> destination transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferEntry {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Ordered source -> destination mapping.
///
/// Sources are unique: inserting an existing source replaces its
/// destination in place. Serializes as a JSON object in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferMapping {
    entries: Vec<TransferEntry>,
    index: HashMap<PathBuf, usize>,
}

impl TransferMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the destination for `source`.
    pub fn insert(&mut self, source: PathBuf, destination: PathBuf) {
        match self.index.get(&source) {
            Some(&idx) => self.entries[idx].destination = destination,
            None => {
                self.index.insert(source.clone(), self.entries.len());
                self.entries.push(TransferEntry {
                    source,
                    destination,
                });
            }
        }
    }

    pub fn get(&self, source: &Path) -> Option<&Path> {
        self.index
            .get(source)
            .map(|&idx| self.entries[idx].destination.as_path())
    }

    pub fn contains_destination(&self, destination: &Path) -> bool {
        self.entries.iter().any(|e| e.destination == destination)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransferEntry> {
        self.entries.iter()
    }
}

impl Serialize for TransferMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.source, &entry.destination)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TransferMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // serde_json without preserve_order sorts object keys; order is
        // only guaranteed for mappings built in-process.
        let raw: Vec<(PathBuf, PathBuf)> = serde_json::Map::deserialize(deserializer)?
            .into_iter()
            .filter_map(|(k, v)| v.as_str().map(|v| (PathBuf::from(k), PathBuf::from(v))))
            .collect();
        let mut mapping = TransferMapping::new();
        for (source, destination) in raw {
            mapping.insert(source, destination);
        }
        Ok(mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_keeps_insertion_order() {
        let mut mapping = TransferMapping::new();
        mapping.insert(PathBuf::from("/in/b.mkv"), PathBuf::from("/out/1.mkv"));
        mapping.insert(PathBuf::from("/in/a.mkv"), PathBuf::from("/out/2.mkv"));

        let json = serde_json::to_string(&mapping).unwrap();
        assert_eq!(json, r#"{"/in/b.mkv":"/out/1.mkv","/in/a.mkv":"/out/2.mkv"}"#);
    }

    #[test]
    fn test_mapping_replaces_existing_source() {
        let mut mapping = TransferMapping::new();
        mapping.insert(PathBuf::from("/in/a.mkv"), PathBuf::from("/out/1.mkv"));
        mapping.insert(PathBuf::from("/in/a.mkv"), PathBuf::from("/out/2.mkv"));

        assert_eq!(mapping.len(), 1);
        assert_eq!(
            mapping.get(Path::new("/in/a.mkv")),
            Some(Path::new("/out/2.mkv"))
        );
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let mut record = TaskRecord::started(Uuid::nil(), "/downloads/show", true);
        record.season_id = Some(2);
        record.tmdb_type = Some(MediaKind::Tv);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["seasonId"], 2);
        assert_eq!(json["tmdbType"], "tv");
        assert_eq!(json["useAi"], true);
        assert!(json["error"].is_null());
        assert!(json.get("tmdbId").is_none());
    }
}
