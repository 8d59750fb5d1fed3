//! AI-assisted title refinement and per-file episode mapping.
//!
//! Both passes are soft: any request or parsing failure is written to the
//! task log and the caller falls back to rule-based extraction.

use crate::core::recorder::TaskRecorder;
use crate::models::media::AiEpisodeItem;
use crate::services::AiService;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Maximum files (and folders) listed in the title prompt.
pub const TITLE_SAMPLE_LIMIT: usize = 60;

static JSON_FENCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)```json\s*(.*?)```").expect("Invalid fence pattern"));

static ANY_FENCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[A-Za-z]*\s*(.*?)```").expect("Invalid fence pattern"));

/// Raw provider response and the JSON text found in it.
#[derive(Debug, Clone, PartialEq)]
pub struct AiResponse {
    pub raw: String,
    pub extracted: Option<String>,
}

impl AiResponse {
    pub fn from_raw(raw: String) -> Self {
        let extracted = extract_json(&raw);
        Self { raw, extracted }
    }
}

fn push_listing(lines: &mut Vec<String>, heading: &str, names: &[String], limit: Option<usize>) {
    lines.push(heading.to_string());
    let shown = limit.map_or(names.len(), |l| l.min(names.len()));
    lines.extend(names[..shown].iter().map(|n| format!("- {}", n)));
    if names.len() > shown {
        lines.push(format!("...{} more", names.len() - shown));
    }
}

/// Prompt asking for the bare work title.
pub fn build_title_prompt(raw_name: &str, files: &[String], folders: &[String]) -> String {
    let mut lines = vec![
        "You are a media title parser.".to_string(),
        format!("Raw name: {}", raw_name),
    ];
    push_listing(&mut lines, "Folders:", folders, Some(TITLE_SAMPLE_LIMIT));
    push_listing(&mut lines, "Files:", files, Some(TITLE_SAMPLE_LIMIT));
    lines.extend(
        [
            "Reply with JSON only, in this shape:",
            r#"{"title": "Work title"}"#,
            "Keep only the name of the work. Drop resolution, codec, release group, season/episode, year, container and bonus markers.",
        ]
        .map(String::from),
    );
    lines.join("\n")
}

/// Prompt asking for a season/episode/extra entry per file.
pub fn build_mapping_prompt(title: &str, files: &[String], folders: &[String]) -> String {
    let mut lines = vec![
        "You are a media file organizer.".to_string(),
        format!("Title: {}", title),
    ];
    push_listing(&mut lines, "Folders:", folders, None);
    push_listing(&mut lines, "Files:", files, None);
    lines.extend(
        [
            "Reply with JSON only, in this shape:",
            r#"{"items": [{"file": "dir/name.mkv", "season": 1, "episode": 1, "extra": false}]}"#,
            "`file` must match an entry of the file list exactly. `season` and `episode` are numbers. `extra` marks bonus content.",
        ]
        .map(String::from),
    );
    lines.join("\n")
}

/// Find the JSON payload in a raw AI response.
///
/// Provider envelopes (OpenAI-style `choices`, Gemini `candidates`, Ollama
/// `response`) are unwrapped first; the generated text, or the raw body when
/// no envelope matches, is then searched for a ```json fence, any fence,
/// and finally the first balanced `{...}` span.
pub fn extract_json(raw: &str) -> Option<String> {
    if let Some(inner) = unwrap_envelope(raw) {
        if let Some(found) = extract_json_block(&inner) {
            return Some(found);
        }
    }
    extract_json_block(raw)
}

fn unwrap_envelope(raw: &str) -> Option<String> {
    let payload: Value = serde_json::from_str(raw).ok()?;
    let text = payload
        .pointer("/choices/0/message/content")
        .or_else(|| payload.pointer("/candidates/0/content/parts/0/text"))
        .or_else(|| payload.get("response"))?
        .as_str()?;
    (!text.trim().is_empty()).then(|| text.to_string())
}

fn extract_json_block(text: &str) -> Option<String> {
    for pattern in [&*JSON_FENCE_PATTERN, &*ANY_FENCE_PATTERN] {
        if let Some(body) = pattern.captures(text).and_then(|c| c.get(1)) {
            let body = body.as_str().trim();
            if !body.is_empty() {
                return Some(body.to_string());
            }
        }
    }
    first_balanced_object(text).map(str::to_string)
}

/// First `{...}` span whose braces balance, ignoring braces inside strings.
fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Title from `{"title": "..."}` or a bare JSON string.
pub fn parse_ai_title(json: &str) -> Option<String> {
    let value: Value = serde_json::from_str(json).ok()?;
    let title = match &value {
        Value::String(s) => s.as_str(),
        Value::Object(map) => map.get("title")?.as_str()?,
        _ => return None,
    };
    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// Items from `{"items": [...]}` or a bare array.
///
/// `None` when the text is not JSON or has no item list. Items without a
/// string `file` or without a non-negative integral season and episode are
/// dropped.
pub fn parse_ai_items(json: &str) -> Option<Vec<AiEpisodeItem>> {
    let value: Value = serde_json::from_str(json).ok()?;
    let items = match &value {
        Value::Array(items) => items,
        Value::Object(map) => map.get("items")?.as_array()?,
        _ => return None,
    };

    Some(
        items
            .iter()
            .filter_map(|item| {
                let file = item.get("file")?.as_str()?.replace('\\', "/");
                Some(AiEpisodeItem {
                    file,
                    season: whole_number(item.get("season")?)?,
                    episode: whole_number(item.get("episode")?)?,
                    extra: truthy(item.get("extra")),
                })
            })
            .collect(),
    )
}

fn whole_number(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64).then_some(n as u32)
}

fn truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Runs the two AI passes for one task and logs everything it receives.
pub struct AiMapper<'a> {
    ai: &'a dyn AiService,
}

impl<'a> AiMapper<'a> {
    pub fn new(ai: &'a dyn AiService) -> Self {
        Self { ai }
    }

    async fn ask(&self, recorder: &TaskRecorder, prompt: &str) -> Option<AiResponse> {
        match self.ai.complete(prompt).await {
            Ok(raw) => {
                let response = AiResponse::from_raw(raw);
                recorder.log(format!("raw response: {}", response.raw));
                match &response.extracted {
                    Some(json) => recorder.log(format!("extracted JSON: {}", json)),
                    None => recorder.log("no JSON found in response"),
                }
                Some(response)
            }
            Err(e) => {
                recorder.log(format!("request failed: {}", e));
                None
            }
        }
    }

    /// Ask for a cleaner search title; `None` keeps the rule-based one.
    pub async fn refine_title(
        &self,
        recorder: &TaskRecorder,
        raw_name: &str,
        files: &[String],
        folders: &[String],
    ) -> Option<String> {
        let prompt = build_title_prompt(raw_name, files, folders);
        let response = self.ask(recorder, &prompt).await?;
        let title = response.extracted.as_deref().and_then(parse_ai_title);
        match &title {
            Some(title) => recorder.log(format!("using title: {}", title)),
            None => recorder.log("no usable title, keeping rule-based title"),
        }
        title
    }

    /// Ask for per-file classifications keyed by relative path.
    ///
    /// `None` (logged) means the planner uses rule-based extraction only.
    pub async fn propose_mapping(
        &self,
        recorder: &TaskRecorder,
        title: &str,
        files: &[String],
        folders: &[String],
    ) -> Option<HashMap<String, AiEpisodeItem>> {
        let prompt = build_mapping_prompt(title, files, folders);
        let items = self
            .ask(recorder, &prompt)
            .await
            .and_then(|r| r.extracted)
            .and_then(|json| parse_ai_items(&json))
            .filter(|items| !items.is_empty());

        match items {
            Some(items) => {
                let map: HashMap<String, AiEpisodeItem> = items
                    .into_iter()
                    .map(|item| (item.file.clone(), item))
                    .collect();
                recorder.log(format!("applying AI mapping for {} files", map.len()));
                Some(map)
            }
            None => {
                recorder.log("no usable mapping, using rule-based extraction");
                None
            }
        }
    }
}
