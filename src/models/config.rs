//! Configuration model.
//!
//! Loaded once from TOML and handed to each pipeline run as an
//! `Arc<AppConfig>`; nothing reads configuration from process-wide state.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Library roots.
    pub library: LibraryConfig,
    /// How planned transfers are applied.
    pub mode: TransferMode,
    /// Directory holding task records, mapping snapshots and logs.
    pub data_dir: PathBuf,
    /// Maximum concurrently running tasks in the background dispatcher.
    pub workers: usize,
    /// TMDB configuration.
    pub tmdb: TmdbConfig,
    /// AI provider configuration.
    pub ai: AiConfig,
    /// Scan filters.
    pub scan: ScanConfig,
}

/// Library root paths, one per destination category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub tv_path: PathBuf,
    pub anime_path: PathBuf,
    pub movie_path: PathBuf,
    pub anime_movie_path: PathBuf,
}

impl LibraryConfig {
    /// Root directory for the given kind, `None` when not configured.
    pub fn root_for(&self, is_movie: bool, is_anime: bool) -> Option<&Path> {
        let path = match (is_movie, is_anime) {
            (true, true) => &self.anime_movie_path,
            (true, false) => &self.movie_path,
            (false, true) => &self.anime_path,
            (false, false) => &self.tv_path,
        };
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path.as_path())
        }
    }
}

/// Transfer mode applied uniformly to a planned mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferMode {
    /// Hard link, falling back to a symbolic link.
    #[default]
    Link,
    /// Byte copy, overwriting the destination.
    Copy,
    /// Rename (move) on the same volume.
    Cut,
}

impl std::fmt::Display for TransferMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferMode::Link => write!(f, "link"),
            TransferMode::Copy => write!(f, "copy"),
            TransferMode::Cut => write!(f, "cut"),
        }
    }
}

/// TMDB configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
    /// API key (v3) or bearer token (v4).
    pub api_key: String,
    /// Languages tried in order when searching.
    pub languages: Vec<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// Supported AI providers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    OpenAi,
    DeepSeek,
    Gemini,
    Ollama,
}

impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiProvider::OpenAi => write!(f, "openai"),
            AiProvider::DeepSeek => write!(f, "deepseek"),
            AiProvider::Gemini => write!(f, "gemini"),
            AiProvider::Ollama => write!(f, "ollama"),
        }
    }
}

/// AI provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub enabled: bool,
    pub provider: AiProvider,
    pub api_key: String,
    /// Empty means the provider's public endpoint.
    pub base_url: String,
    /// Empty means the provider's default model.
    pub model: String,
    pub temperature: f32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl AiConfig {
    /// AI passes run only when enabled and the provider can authenticate.
    /// Ollama runs locally and needs no key.
    pub fn is_usable(&self) -> bool {
        self.enabled
            && (self.provider == AiProvider::Ollama || !self.api_key.trim().is_empty())
    }

    /// Base URL with the provider default applied and no trailing slash.
    pub fn effective_base_url(&self) -> String {
        let url = if self.base_url.trim().is_empty() {
            match self.provider {
                AiProvider::OpenAi => "https://api.openai.com/v1",
                AiProvider::DeepSeek => "https://api.deepseek.com/v1",
                AiProvider::Gemini => "https://generativelanguage.googleapis.com",
                AiProvider::Ollama => "http://localhost:11434",
            }
        } else {
            self.base_url.trim()
        };
        url.trim_end_matches('/').to_string()
    }

    /// Model name with the provider default applied.
    pub fn effective_model(&self) -> String {
        if !self.model.trim().is_empty() {
            return self.model.trim().to_string();
        }
        match self.provider {
            AiProvider::OpenAi => "gpt-4o-mini",
            AiProvider::DeepSeek => "deepseek-chat",
            AiProvider::Gemini => "gemini-2.5-flash",
            AiProvider::Ollama => "qwen2.5:7b",
        }
        .to_string()
    }
}

/// Noise filters applied while walking an input path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Directory names skipped when they contain any of these (case-insensitive).
    pub ignore_dirs: Vec<String>,
    /// File extensions (without dot) skipped entirely.
    pub ignore_extensions: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            library: LibraryConfig::default(),
            mode: TransferMode::default(),
            data_dir: default_data_dir(),
            workers: 2,
            tmdb: TmdbConfig::default(),
            ai: AiConfig::default(),
            scan: ScanConfig::default(),
        }
    }
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            languages: vec!["zh-CN".to_string(), "ja-JP".to_string(), "en-US".to_string()],
            timeout_secs: 15,
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: AiProvider::default(),
            api_key: String::new(),
            base_url: String::new(),
            model: String::new(),
            temperature: 0.1,
            timeout_secs: 120,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ignore_dirs: vec!["cd".to_string(), "scan".to_string()],
            ignore_extensions: ["rar", "zip", "7z", "webp", "jpg", "png"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Get the configuration directory path.
fn dirs_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("media_renamer")
}

/// Default task store location.
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("media_renamer")
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs_config_path().join("config.toml")
}

/// Load configuration from `path`, or from the default location.
///
/// A missing file yields defaults; a file that fails to parse is an error.
/// Empty secrets are filled from `TMDB_API_KEY` and `MEDIA_RENAMER_AI_API_KEY`.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path);

    let mut config = if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        parse_config(&content)?
    } else {
        if path.is_some() {
            return Err(crate::Error::PathNotFound(config_path.display().to_string()));
        }
        AppConfig::default()
    };

    apply_env_overrides(&mut config);
    tracing::debug!("Loaded configuration from {:?}", config_path);
    Ok(config)
}

/// Parse configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(content)?;
    if config.workers == 0 {
        return Err(crate::Error::Config("workers must be at least 1".to_string()));
    }
    Ok(config)
}

fn apply_env_overrides(config: &mut AppConfig) {
    if config.tmdb.api_key.trim().is_empty() {
        if let Ok(key) = std::env::var("TMDB_API_KEY") {
            config.tmdb.api_key = key;
        }
    }
    if config.ai.api_key.trim().is_empty() {
        if let Ok(key) = std::env::var("MEDIA_RENAMER_AI_API_KEY") {
            config.ai.api_key = key;
        }
    }
}
