use anyhow::{Context, Result};
use reqwest::Client;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;
use url::Url;
use zip::ZipArchive;

/// Download the release archive at `url_str` and save it under `dest_dir`
/// using the final URL path segment as the filename.
/// Returns the full path of the saved file.
pub async fn download_release(
    client: &Client,
    url_str: &str,
    dest_dir: impl AsRef<Path>,
) -> Result<PathBuf> {
    let dest_dir = dest_dir.as_ref();
    let url = Url::parse(url_str).with_context(|| format!("parsing URL {url_str}"))?;
    let filename = url
        .path_segments()
        .and_then(|segments| segments.last())
        .filter(|name| !name.is_empty())
        .unwrap_or("download.zip");
    let dest_path = dest_dir.join(filename);

    tokio::fs::create_dir_all(dest_dir).await?;

    let resp = client
        .get(url.as_str())
        .send()
        .await
        .with_context(|| format!("requesting {url_str}"))?
        .error_for_status()?;
    let bytes = resp.bytes().await?;
    tokio::fs::write(&dest_path, &bytes).await?;
    info!(url = url_str, bytes = bytes.len(), "downloaded release");

    Ok(dest_path)
}

/// Extract every `.csv` entry of `zip_path` into `dest_dir`, flattening any
/// directory prefix down to the base filename. Non-CSV entries are ignored.
/// Returns the extracted paths in archive order.
pub fn extract_csvs(zip_path: &Path, dest_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dest_dir)
        .with_context(|| format!("creating directory {}", dest_dir.display()))?;

    let file = File::open(zip_path).with_context(|| format!("opening {}", zip_path.display()))?;
    let mut archive = ZipArchive::new(file)
        .with_context(|| format!("reading archive {}", zip_path.display()))?;

    let mut extracted = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let name = entry.name().to_string();
        if !entry.is_file() || !name.to_lowercase().ends_with(".csv") {
            continue;
        }
        let base = match Path::new(&name).file_name() {
            Some(b) => b.to_owned(),
            None => continue,
        };
        let dest_path = dest_dir.join(base);

        let mut buf = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut buf)
            .with_context(|| format!("reading {name} from archive"))?;
        fs::write(&dest_path, &buf)
            .with_context(|| format!("writing {}", dest_path.display()))?;
        info!(entry = %name, dest = %dest_path.display(), "extracted");
        extracted.push(dest_path);
    }

    Ok(extracted)
}
