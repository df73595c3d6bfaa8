//! Durable read/merge/write of a single JSON object on disk.
//!
//! Writes go to a temporary file in the target's own directory and are then
//! renamed over the target, so readers see either the old document or the
//! new one. The temporary file is removed on every failure path.

use peercheck_core::CoreError;
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::Builder;
use tracing::{debug, warn};

pub type Document = Map<String, Value>;

/// Missing, unreadable, or non-object files all read as an empty document.
pub fn load(path: &Path) -> Document {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no document");
            return Document::new();
        }
    };
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(doc)) => doc,
        Ok(_) => {
            warn!(path = %path.display(), "document is not a JSON object; treating as empty");
            Document::new()
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "document is not valid JSON; treating as empty"
            );
            Document::new()
        }
    }
}

pub fn save(path: &Path, doc: &Document) -> Result<(), CoreError> {
    let json = serde_json::to_vec_pretty(doc)?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| CoreError::storage(parent, e))?;

    let prefix = format!(
        ".{}.",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("doc")
    );
    let mut tmp = Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| CoreError::storage(parent, e))?;
    let written = tmp
        .write_all(&json)
        .and_then(|_| tmp.flush())
        .and_then(|_| tmp.as_file().sync_all());
    if let Err(e) = written {
        return Err(CoreError::storage(tmp.path(), e));
    }
    // a failed persist hands the temp file back; dropping it deletes it
    tmp.persist(path)
        .map_err(|e| CoreError::storage(path, e.error))?;

    debug!(path = %path.display(), bytes = json.len(), "document saved");
    Ok(())
}

/// Load, let `f` change the document, save. Keys `f` does not touch survive.
pub fn update<F>(path: &Path, f: F) -> Result<Document, CoreError>
where
    F: FnOnce(&mut Document),
{
    let mut doc = load(path);
    f(&mut doc);
    save(path, &doc)?;
    Ok(doc)
}
