use anyhow::{Context, Result};
use chrono::Utc;
use glob::glob;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet,
    fs,
    fs::File,
    path::Path,
};
use tracing::warn;

/// One marker per fully converted input. Markers are scanned on startup so a
/// repeat run skips work already done.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessedMarker {
    pub file_name: String,
    pub rows: u64,
    pub bytes: u64,
    /// UTC completion time, microseconds since the epoch.
    pub completed_at: i64,
}

/// Record that `file_name` was fully converted by writing
/// `<file_name>_processed_<ts>.json` under `history_dir`.
pub fn record_processed(history_dir: &Path, file_name: &str, rows: u64, bytes: u64) -> Result<()> {
    fs::create_dir_all(history_dir)
        .with_context(|| format!("creating history directory {}", history_dir.display()))?;

    let marker = ProcessedMarker {
        file_name: file_name.to_string(),
        rows,
        bytes,
        completed_at: Utc::now().timestamp_micros(),
    };

    let final_path =
        history_dir.join(format!("{}_processed_{}.json", file_name, marker.completed_at));
    let tmp_path =
        history_dir.join(format!("{}_processed_{}.json.tmp", file_name, marker.completed_at));

    let file = File::create(&tmp_path)
        .with_context(|| format!("creating {}", tmp_path.display()))?;
    serde_json::to_writer(file, &marker).context("writing history marker")?;
    fs::rename(&tmp_path, &final_path).with_context(|| {
        format!("renaming {} to {}", tmp_path.display(), final_path.display())
    })?;

    Ok(())
}

/// Names of all inputs with a completed marker in `history_dir`. Unreadable
/// or foreign files are skipped with a warning, never fatal.
pub fn load_processed(history_dir: &Path) -> Result<HashSet<String>> {
    let mut set = HashSet::new();
    let pattern = format!("{}/*_processed_*.json", history_dir.display());

    for entry in glob(&pattern).context("invalid history glob pattern")? {
        let path = match entry {
            Ok(p) => p,
            Err(e) => {
                warn!("cannot read history entry: {:?}", e);
                continue;
            }
        };
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) => {
                warn!("cannot open marker {}: {}", path.display(), e);
                continue;
            }
        };
        match serde_json::from_reader::<_, ProcessedMarker>(file) {
            Ok(marker) => {
                set.insert(marker.file_name);
            }
            Err(e) => warn!("skipping unreadable marker {}: {}", path.display(), e),
        }
    }

    Ok(set)
}
