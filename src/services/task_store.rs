//! Task log and record persistence.
//!
//! Layout under the data directory:
//! - `tasks/<uuid>.json`: the task record
//! - `records/<uuid>.json`: the source -> destination mapping snapshot
//! - `logs/<uuid>.log`: append-only progress lines

use crate::models::task::{TaskRecord, TransferMapping};
use crate::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use uuid::Uuid;

/// Where a task's log lines, final record and mapping snapshot go.
pub trait TaskSink: Send + Sync {
    /// Append one line to the task's log.
    fn append_log(&self, uuid: Uuid, line: &str) -> Result<()>;

    /// Persist the task's record, replacing any earlier write.
    fn write_record(&self, record: &TaskRecord) -> Result<()>;

    /// Persist the executed mapping.
    fn write_mapping_snapshot(&self, uuid: Uuid, mapping: &TransferMapping) -> Result<()>;
}

/// File-backed task store.
#[derive(Debug, Clone)]
pub struct FileTaskStore {
    root: PathBuf,
}

impl FileTaskStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn tasks_dir(&self) -> PathBuf {
        self.root.join("tasks")
    }

    fn records_dir(&self) -> PathBuf {
        self.root.join("records")
    }

    fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    fn record_path(&self, uuid: Uuid) -> PathBuf {
        self.tasks_dir().join(format!("{}.json", uuid))
    }

    fn mapping_path(&self, uuid: Uuid) -> PathBuf {
        self.records_dir().join(format!("{}.json", uuid))
    }

    fn log_path(&self, uuid: Uuid) -> PathBuf {
        self.logs_dir().join(format!("{}.log", uuid))
    }

    /// Load a stored task record.
    pub fn read_record(&self, uuid: Uuid) -> Result<TaskRecord> {
        let path = self.record_path(uuid);
        if !path.exists() {
            return Err(Error::TaskNotFound(uuid.to_string()));
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load a stored mapping snapshot, `None` if the task never wrote one.
    pub fn read_mapping(&self, uuid: Uuid) -> Result<Option<TransferMapping>> {
        let path = self.mapping_path(uuid);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Log lines of a task, empty if nothing was logged.
    pub fn read_log(&self, uuid: Uuid) -> Result<Vec<String>> {
        let path = self.log_path(uuid);
        if !path.exists() {
            return Ok(Vec::new());
        }
        Ok(fs::read_to_string(&path)?
            .lines()
            .map(str::to_string)
            .collect())
    }
}

impl TaskSink for FileTaskStore {
    fn append_log(&self, uuid: Uuid, line: &str) -> Result<()> {
        fs::create_dir_all(self.logs_dir())?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.log_path(uuid))?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    fn write_record(&self, record: &TaskRecord) -> Result<()> {
        fs::create_dir_all(self.tasks_dir())?;
        let json = serde_json::to_string_pretty(record)?;
        fs::write(self.record_path(record.uuid), json)?;
        Ok(())
    }

    fn write_mapping_snapshot(&self, uuid: Uuid, mapping: &TransferMapping) -> Result<()> {
        fs::create_dir_all(self.records_dir())?;
        let json = serde_json::to_string_pretty(mapping)?;
        fs::write(self.mapping_path(uuid), json)?;
        Ok(())
    }
}

/// In-process task store.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    logs: Mutex<HashMap<Uuid, Vec<String>>>,
    records: Mutex<HashMap<Uuid, TaskRecord>>,
    mappings: Mutex<HashMap<Uuid, TransferMapping>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logs(&self, uuid: Uuid) -> Vec<String> {
        lock(&self.logs).get(&uuid).cloned().unwrap_or_default()
    }

    pub fn record(&self, uuid: Uuid) -> Option<TaskRecord> {
        lock(&self.records).get(&uuid).cloned()
    }

    pub fn mapping(&self, uuid: Uuid) -> Option<TransferMapping> {
        lock(&self.mappings).get(&uuid).cloned()
    }

    pub fn record_count(&self) -> usize {
        lock(&self.records).len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl TaskSink for MemoryTaskStore {
    fn append_log(&self, uuid: Uuid, line: &str) -> Result<()> {
        lock(&self.logs)
            .entry(uuid)
            .or_default()
            .push(line.to_string());
        Ok(())
    }

    fn write_record(&self, record: &TaskRecord) -> Result<()> {
        lock(&self.records).insert(record.uuid, record.clone());
        Ok(())
    }

    fn write_mapping_snapshot(&self, uuid: Uuid, mapping: &TransferMapping) -> Result<()> {
        lock(&self.mappings).insert(uuid, mapping.clone());
        Ok(())
    }
}
