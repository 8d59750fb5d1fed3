//! Task lifecycle recorder.
//!
//! Tracks which stage a task is in, writes one log line per transition and
//! produces the final record. `succeed` and `fail` consume the recorder, so a
//! task reaches a terminal state exactly once.

use crate::models::task::{TaskRecord, TransferMapping};
use crate::services::TaskSink;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Pipeline stages in the order they are entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TaskStage {
    Started,
    AiTitle,
    Search,
    AiMapping,
    Planning,
    Transferring,
    Succeeded,
    Failed,
}

impl TaskStage {
    /// Tag that prefixes log lines written in this stage.
    pub fn tag(&self) -> &'static str {
        match self {
            TaskStage::Started => "start",
            TaskStage::AiTitle => "ai-title",
            TaskStage::Search => "search",
            TaskStage::AiMapping => "ai-map",
            TaskStage::Planning => "plan",
            TaskStage::Transferring => "transfer",
            TaskStage::Succeeded => "done",
            TaskStage::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStage::Succeeded | TaskStage::Failed)
    }
}

impl fmt::Display for TaskStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Per-task record and log writer.
pub struct TaskRecorder {
    sink: Arc<dyn TaskSink>,
    record: TaskRecord,
    stage: TaskStage,
}

impl TaskRecorder {
    /// Create the record and log the `start` line.
    pub fn start(sink: Arc<dyn TaskSink>, uuid: Uuid, path: &str, use_ai: bool) -> Self {
        let recorder = Self {
            sink,
            record: TaskRecord::started(uuid, path, use_ai),
            stage: TaskStage::Started,
        };
        recorder.log(path);
        recorder
    }

    pub fn stage(&self) -> TaskStage {
        self.stage
    }

    pub fn record_mut(&mut self) -> &mut TaskRecord {
        &mut self.record
    }

    /// Move to `stage` and log `detail` under it.
    pub fn enter(&mut self, stage: TaskStage, detail: impl fmt::Display) {
        debug_assert!(!stage.is_terminal(), "use succeed() or fail()");
        debug_assert!(stage >= self.stage, "{} after {}", stage, self.stage);
        self.stage = stage;
        self.log(detail);
    }

    /// Log a line under the current stage.
    pub fn log(&self, detail: impl fmt::Display) {
        self.append(self.stage, &detail.to_string());
    }

    fn append(&self, stage: TaskStage, detail: &str) {
        let line = format!("[{}] {}", stage.tag(), detail);
        tracing::info!("{} {}", self.record.uuid, line);
        if let Err(e) = self.sink.append_log(self.record.uuid, &line) {
            tracing::warn!("Failed to append task log for {}: {}", self.record.uuid, e);
        }
    }

    /// Persist the record and mapping snapshot and log the `done` line.
    pub fn succeed(mut self, mapping: &TransferMapping, detail: impl fmt::Display) -> TaskRecord {
        self.stage = TaskStage::Succeeded;
        self.record.error = None;
        if let Err(e) = self.sink.write_record(&self.record) {
            tracing::warn!("Failed to write task record {}: {}", self.record.uuid, e);
        }
        if let Err(e) = self.sink.write_mapping_snapshot(self.record.uuid, mapping) {
            tracing::warn!("Failed to write mapping snapshot {}: {}", self.record.uuid, e);
        }
        self.append(TaskStage::Succeeded, &detail.to_string());
        self.record
    }

    /// Persist the record with `error` set and log the `failed` line.
    pub fn fail(mut self, error: impl fmt::Display) -> TaskRecord {
        let message = error.to_string();
        tracing::warn!(
            "Task {} failed during {}: {}",
            self.record.uuid,
            self.stage,
            message
        );
        self.stage = TaskStage::Failed;
        self.record.error = Some(message.clone());
        if let Err(e) = self.sink.write_record(&self.record) {
            tracing::warn!("Failed to write task record {}: {}", self.record.uuid, e);
        }
        self.append(TaskStage::Failed, &message);
        self.record
    }
}
