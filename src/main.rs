use anyhow::Result;
use fredloader::{
    fetch,
    history::{load_processed, record_processed},
    process,
};
use reqwest::Client;
use std::{env, fs, path::PathBuf};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env_filter).init();
    info!("startup");

    // ─── 2) configure dirs ───────────────────────────────────────────
    let zips_dir = PathBuf::from("zips");
    let csv_dir = PathBuf::from("csv");
    let json_dir = PathBuf::from("json");
    let history_dir = PathBuf::from("history");

    for d in [&zips_dir, &csv_dir, &json_dir, &history_dir] {
        fs::create_dir_all(d)?;
    }

    // matches the upstream feed layout: first line is a header row
    let has_header = env::var("CONTAINS_HEADERS").map(|v| v != "false").unwrap_or(true);

    // ─── 3) fetch the release if a source is configured ──────────────
    if let Ok(url) = env::var("SOURCE_URL") {
        let client = Client::new();
        let zip_path = fetch::zips::download_release(&client, &url, &zips_dir).await?;
        let extracted = tokio::task::spawn_blocking({
            let csv_dir = csv_dir.clone();
            move || fetch::zips::extract_csvs(&zip_path, &csv_dir)
        })
        .await??;
        info!("extracted {} CSV files", extracted.len());
    } else {
        info!("SOURCE_URL not set; converting existing files in {}", csv_dir.display());
    }

    // ─── 4) load history to skip converted files ─────────────────────
    let processed = load_processed(&history_dir)?;
    info!("{} files already done", processed.len());

    // ─── 5) discover new CSV inputs ──────────────────────────────────
    let pattern = format!("{}/*.csv", csv_dir.display());
    let to_convert: Vec<(PathBuf, String)> = glob::glob(&pattern)?
        .filter_map(|entry| entry.ok())
        .filter_map(|path| {
            let name = path.file_name()?.to_string_lossy().to_string();
            if processed.contains(&name) {
                None
            } else {
                Some((path, name))
            }
        })
        .collect();

    if to_convert.is_empty() {
        info!("no new files; exit");
        return Ok(());
    }
    info!("{} files to convert", to_convert.len());

    // ─── 6) convert each file to JSON lines ──────────────────────────
    for (path, name) in to_convert {
        info!("converting {}", name);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| name.clone());
        let out_path = json_dir.join(format!("{stem}.jsonl"));

        // offload the file walk to the blocking pool
        let result = tokio::task::spawn_blocking({
            let path = path.clone();
            let out_path = out_path.clone();
            move || process::convert_file(&path, &out_path, has_header)
        })
        .await?;

        match result {
            Ok(stats) => {
                record_processed(&history_dir, &name, stats.rows, stats.bytes)?;
                info!("wrote history for {}", name);
            }
            Err(e) => {
                error!("convert {} failed: {}", name, e);
            }
        }
    }

    info!("all done");
    Ok(())
}
