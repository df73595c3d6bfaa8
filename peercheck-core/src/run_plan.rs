use chrono::NaiveDateTime;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_PLAN_NAME: &str = "output";
const PLAN_FILE_PREFIX: &str = "service-location";
const PLAN_FILE_EXT: &str = "geojson";

/// Where a run writes its workbook and log, both named after `base_name`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunPlan {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub base_name: String,
}

impl RunPlan {
    pub fn new(data_dir: &Path, output_dir: &Path, now: NaiveDateTime) -> Self {
        let plan = detect_plan_name(data_dir);
        Self {
            data_dir: data_dir.to_path_buf(),
            output_dir: resolve_output_dir(output_dir),
            base_name: run_base_name(&plan, now),
        }
    }

    pub fn workbook_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.xlsx", self.base_name))
    }

    pub fn log_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.log", self.base_name))
    }
}

/// A directory is used as-is; a file path resolves to its parent.
pub fn resolve_output_dir(requested: &Path) -> PathBuf {
    if requested.is_dir() {
        return requested.to_path_buf();
    }
    match requested.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Reads `v_plan` from the first `service-location*.geojson` in `data_dir`.
pub fn detect_plan_name(data_dir: &Path) -> String {
    let Some(file) = first_plan_file(data_dir) else {
        return DEFAULT_PLAN_NAME.to_string();
    };
    let doc: Option<Value> = fs::read_to_string(&file)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok());
    let Some(doc) = doc else {
        debug!(file = %file.display(), "plan file unreadable");
        return DEFAULT_PLAN_NAME.to_string();
    };

    let top = doc.get("v_plan").and_then(non_empty_str);
    let first_feature = doc
        .pointer("/features/0/properties/v_plan")
        .and_then(non_empty_str);
    top.or(first_feature)
        .unwrap_or(DEFAULT_PLAN_NAME)
        .to_string()
}

fn non_empty_str(v: &Value) -> Option<&str> {
    v.as_str().filter(|s| !s.is_empty())
}

fn first_plan_file(data_dir: &Path) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = fs::read_dir(data_dir)
        .ok()?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            let name = p.file_name().and_then(|n| n.to_str()).unwrap_or("");
            name.starts_with(PLAN_FILE_PREFIX)
                && p.extension().and_then(|x| x.to_str()) == Some(PLAN_FILE_EXT)
        })
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

pub fn run_base_name(plan: &str, now: NaiveDateTime) -> String {
    let ts = now.format("%Y-%m-%d_%H-%M-%S");
    sanitize_filename(&format!("{plan} Peer Check - {ts}"))
}

pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            other => other,
        })
        .collect()
}
