//! Classification-and-transfer pipeline.
//!
//! One `run` takes an input path from a raw name to executed transfers:
//! title derivation, optional AI title pass, TV/movie decision, optional AI
//! episode mapping, planning and execution. Every outcome ends up in the
//! returned `TaskRecord`; `run` itself never fails.

use crate::core::ai_mapping::AiMapper;
use crate::core::decider::decide_type;
use crate::core::executor::{ExecutionSummary, Executor};
use crate::core::extractor::extract_year;
use crate::core::normalizer::{normalize_name, search_title};
use crate::core::planner::{plan_scanned, PlanTarget};
use crate::core::recorder::{TaskRecorder, TaskStage};
use crate::core::scanner::{direct_entry_count, scan_path};
use crate::models::config::AppConfig;
use crate::models::media::MediaKind;
use crate::models::task::{TaskRecord, TaskRequest, TransferMapping};
use crate::services::{AiService, MetadataSearch, TaskSink};
use crate::utils::fs::{is_video_file, sanitize_filename, FileOps, LocalFs};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// Result of a task that got as far as executing its mapping.
struct Completed {
    kind: MediaKind,
    mapping: TransferMapping,
    summary: ExecutionSummary,
}

/// Search title, year and listing derived from the input path.
struct InputInfo {
    path: PathBuf,
    input_name: String,
    raw_base: String,
    base_name: String,
    year: Option<u16>,
    is_file: bool,
    file_count: usize,
}

/// The pipeline and its collaborators.
pub struct Pipeline {
    config: Arc<AppConfig>,
    metadata: Arc<dyn MetadataSearch>,
    ai: Option<Arc<dyn AiService>>,
    sink: Arc<dyn TaskSink>,
    fs: Arc<dyn FileOps>,
}

impl Pipeline {
    pub fn new(
        config: Arc<AppConfig>,
        metadata: Arc<dyn MetadataSearch>,
        sink: Arc<dyn TaskSink>,
    ) -> Self {
        Self {
            config,
            metadata,
            ai: None,
            sink,
            fs: Arc::new(LocalFs),
        }
    }

    /// Attach an AI service; it is only used when `[ai]` is usable.
    pub fn with_ai(mut self, ai: Arc<dyn AiService>) -> Self {
        self.ai = Some(ai);
        self
    }

    /// Use custom filesystem primitives for transfers.
    pub fn with_fs(mut self, fs: Arc<dyn FileOps>) -> Self {
        self.fs = fs;
        self
    }

    fn usable_ai(&self) -> Option<&dyn AiService> {
        if self.config.ai.is_usable() {
            self.ai.as_deref()
        } else {
            None
        }
    }

    /// Run one task to completion or failure.
    pub async fn run(&self, uuid: Uuid, request: TaskRequest) -> TaskRecord {
        let use_ai = self.usable_ai().is_some();
        let mut recorder = TaskRecorder::start(self.sink.clone(), uuid, request.path.trim(), use_ai);

        match self.process(&mut recorder, &request).await {
            Ok(done) => {
                let detail = format!(
                    "{} processed, {} entries ({})",
                    done.kind,
                    done.mapping.len(),
                    done.summary
                );
                recorder.succeed(&done.mapping, detail)
            }
            Err(e) => recorder.fail(e),
        }
    }

    fn inspect_input(&self, raw_path: &str) -> Result<InputInfo> {
        let trimmed = raw_path.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyPath);
        }
        let path = Path::new(trimmed);
        if !path.exists() {
            return Err(Error::PathNotFound(trimmed.to_string()));
        }
        let path = std::path::absolute(path)?;
        let is_file = !path.is_dir();

        let input_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let raw_name = if is_file && is_video_file(&path) {
            path.file_stem()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| input_name.clone())
        } else {
            input_name.clone()
        };

        let raw_base = normalize_name(&raw_name);
        let base_name = search_title(&raw_name);
        let year = extract_year(&raw_base).or_else(|| extract_year(&base_name));

        Ok(InputInfo {
            file_count: direct_entry_count(&path),
            path,
            input_name,
            raw_base,
            base_name,
            year,
            is_file,
        })
    }

    async fn process(&self, recorder: &mut TaskRecorder, request: &TaskRequest) -> Result<Completed> {
        if self.config.tmdb.api_key.trim().is_empty() {
            return Err(Error::TmdbApiKeyMissing);
        }

        let mut input = self.inspect_input(&request.path)?;
        recorder.record_mut().path = input.path.display().to_string();

        let scanned = scan_path(&input.path, &self.config.scan)?;
        let files = scanned.video_entries();
        let folders = scanned.folder_names();

        if let Some(ai) = self.usable_ai() {
            recorder.enter(TaskStage::AiTitle, "requesting title");
            let refined = AiMapper::new(ai)
                .refine_title(recorder, &input.input_name, &files, &folders)
                .await;
            if let Some(title) = refined {
                input.year = extract_year(&input.raw_base).or_else(|| extract_year(&title));
                input.base_name = title;
            }
        }

        recorder.enter(TaskStage::Search, format!("keyword: {}", input.base_name));
        let decision = decide_type(
            self.metadata.as_ref(),
            &input.base_name,
            input.year,
            request.overrides,
            input.is_file,
            input.file_count,
        )
        .await?;
        recorder.log(format!(
            "decided {} (score {:.1}, tv hit: {}, movie hit: {})",
            decision.kind,
            decision.score,
            decision.tv_candidate.is_some(),
            decision.movie_candidate.is_some()
        ));

        let ai_map = match self.usable_ai() {
            Some(ai) => {
                recorder.enter(TaskStage::AiMapping, "requesting episode mapping");
                AiMapper::new(ai)
                    .propose_mapping(recorder, &input.base_name, &files, &folders)
                    .await
            }
            None => None,
        };

        let kind = decision.kind;
        let candidate = decision.chosen().ok_or(Error::NoMetadataMatch(kind))?;
        let is_movie = kind == MediaKind::Movie;
        let is_anime = request
            .overrides
            .is_anime
            .unwrap_or_else(|| candidate.is_animation());

        let name = if candidate.display_name.trim().is_empty() {
            input.base_name.clone()
        } else {
            candidate.display_name.trim().to_string()
        };
        let year_label = candidate
            .year()
            .map(|y| y.to_string())
            .or_else(|| input.year.map(|y| y.to_string()))
            .unwrap_or_else(|| "0000".to_string());
        let root = self
            .config
            .library
            .root_for(is_movie, is_anime)
            .ok_or(Error::LibraryPathMissing(library_label(is_movie, is_anime)))?;
        let target_root = root.join(sanitize_filename(&format!("{} ({})", name, year_label)));
        let season_id = if is_movie {
            0
        } else {
            decision.season_from_name.unwrap_or(1)
        };

        recorder.enter(
            TaskStage::Planning,
            format!("{} #{} -> {}", kind, candidate.id, target_root.display()),
        );
        let display_name = sanitize_filename(&name);
        let outcome = plan_scanned(
            &scanned,
            PlanTarget {
                target_root: &target_root,
                display_name: &display_name,
                default_season: season_id,
                is_movie,
            },
            ai_map.as_ref(),
        );
        for skipped in &outcome.skipped {
            recorder.log(format!("skipped {}: {}", skipped.path.display(), skipped.reason));
        }
        if outcome.mapping.is_empty() {
            return Err(Error::NoProcessableVideos);
        }

        recorder.enter(
            TaskStage::Transferring,
            format!("{} entries ({})", outcome.mapping.len(), self.config.mode),
        );
        let executor = Executor::with_fs(self.fs.clone());
        let mode = self.config.mode;
        let mapping = outcome.mapping;
        let (mapping, summary) = tokio::task::spawn_blocking(move || {
            let summary = executor.execute(&mapping, mode);
            (mapping, summary)
        })
        .await
        .map_err(|e| Error::other(format!("transfer worker failed: {}", e)))?;
        let summary = summary?;

        let record = recorder.record_mut();
        record.name = Some(name);
        record.season_id = Some(season_id);
        record.is_anime = Some(is_anime);
        record.is_movie = Some(is_movie);
        record.tmdb_id = Some(candidate.id);
        record.tmdb_type = Some(kind);

        Ok(Completed {
            kind,
            mapping,
            summary,
        })
    }
}

fn library_label(is_movie: bool, is_anime: bool) -> &'static str {
    match (is_movie, is_anime) {
        (true, true) => "anime movies",
        (true, false) => "movies",
        (false, true) => "anime",
        (false, false) => "tv",
    }
}
