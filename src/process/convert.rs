use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

use crate::transform::line_to_json;

/// Totals for one converted input.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConvertStats {
    /// Data rows emitted.
    pub rows: u64,
    /// JSON bytes written, record delimiters included.
    pub bytes: u64,
}

/// Stream CSV lines from `reader` and write one JSON object per line to
/// `writer`. With `has_header` the first line is dropped before any
/// transformation. Lines are never rejected: the transform maps every line,
/// however malformed, to a JSON object.
pub fn convert_reader<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    has_header: bool,
) -> Result<ConvertStats> {
    if has_header {
        let mut header = String::new();
        reader.read_line(&mut header).context("reading header line")?;
    }

    let mut stats = ConvertStats::default();
    let mut line = String::new();
    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).context("reading CSV line")?;
        if bytes_read == 0 {
            break; // EOF
        }

        let json = line_to_json(line.trim_end_matches(['\r', '\n']));
        writer
            .write_all(json.as_bytes())
            .context("writing JSON record")?;
        writer.write_all(b"\n").context("writing record delimiter")?;
        stats.rows += 1;
        stats.bytes += json.len() as u64 + 1;
    }
    writer.flush().context("flushing JSON output")?;

    Ok(stats)
}

/// Convert a CSV file into a JSON Lines file. Output goes to `<output>.tmp`
/// first and is renamed into place, so an interrupted run never leaves a
/// truncated file behind.
pub fn convert_file(input: &Path, output: &Path, has_header: bool) -> Result<ConvertStats> {
    let start = Instant::now();

    let in_file = File::open(input).with_context(|| format!("opening {}", input.display()))?;
    let reader = BufReader::new(in_file);

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    let mut tmp_name = OsString::from(output.as_os_str());
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let out_file =
        File::create(&tmp_path).with_context(|| format!("creating {}", tmp_path.display()))?;
    let stats = convert_reader(reader, BufWriter::new(out_file), has_header)?;

    fs::rename(&tmp_path, output).with_context(|| {
        format!("renaming {} to {}", tmp_path.display(), output.display())
    })?;
    info!(
        input = %input.display(),
        rows = stats.rows,
        bytes = stats.bytes,
        elapsed = ?start.elapsed(),
        "converted"
    );

    Ok(stats)
}
