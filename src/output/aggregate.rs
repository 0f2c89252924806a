//! Combining per-page files into the final dataset
//!
//! Runs once, after every crawl task has finished. Files are visited
//! recursively in lexical name order per directory; the combined record order
//! follows that walk, not the order pages were crawled in.

use crate::output::error::{AggregationError, AggregationResult};
use crate::output::writer::encode_records;
use crate::output::{OutputFormat, PageRecord};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// What the aggregator produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateSummary {
    /// Path of the combined dataset file
    pub path: PathBuf,

    /// Number of per-page files merged
    pub files: usize,

    /// Total number of records written
    pub records: usize,
}

/// Path of the combined dataset: `<out_dir>/<dataset_name>.<ext>`
pub fn combined_output_path(out_dir: &Path, dataset_name: &str, format: OutputFormat) -> PathBuf {
    out_dir.join(format!("{}.{}", dataset_name, format.extension()))
}

/// Merges every per-page file under `source_dir` into `output_path`
///
/// # Arguments
///
/// * `source_dir` - Directory holding the per-page files
/// * `output_path` - Destination of the combined dataset
/// * `format` - Format of both the inputs and the output
/// * `include_title` - Whether output records carry their page title
///
/// # Returns
///
/// * `Ok(AggregateSummary)` - The dataset was written
/// * `Err(AggregationError)` - Any read, decode or write failure
pub fn aggregate(
    source_dir: &Path,
    output_path: &Path,
    format: OutputFormat,
    include_title: bool,
) -> AggregationResult<AggregateSummary> {
    let files = collect_page_files(source_dir, format)?;

    let mut combined = Vec::new();
    for path in &files {
        combined.extend(read_page_file(path, format)?);
    }

    let file = File::create(output_path).map_err(|source| AggregationError::Write {
        path: output_path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    encode_records(&mut writer, &combined, format, include_title, true)
        .and_then(|()| writer.flush().map_err(serde_json::Error::io))
        .map_err(|e| {
            if e.is_io() {
                AggregationError::Write {
                    path: output_path.to_path_buf(),
                    source: e.into(),
                }
            } else {
                AggregationError::Encode {
                    path: output_path.to_path_buf(),
                    source: e,
                }
            }
        })?;

    tracing::info!(
        "Combined {} records from {} files into {}",
        combined.len(),
        files.len(),
        output_path.display()
    );

    Ok(AggregateSummary {
        path: output_path.to_path_buf(),
        files: files.len(),
        records: combined.len(),
    })
}

/// Lists per-page files with the format's extension, recursing into subdirectories
pub fn collect_page_files(dir: &Path, format: OutputFormat) -> AggregationResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk(dir, format, &mut files)?;
    Ok(files)
}

fn walk(dir: &Path, format: OutputFormat, files: &mut Vec<PathBuf>) -> AggregationResult<()> {
    let read_error = |source| AggregationError::Read {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = std::fs::read_dir(dir)
        .map_err(read_error)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_error)?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            walk(&path, format, files)?;
        } else if format.matches_path(&path) {
            files.push(path);
        }
    }
    Ok(())
}

/// Decodes one per-page file
pub fn read_page_file(path: &Path, format: OutputFormat) -> AggregationResult<Vec<PageRecord>> {
    let content = std::fs::read_to_string(path).map_err(|source| AggregationError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    match format {
        OutputFormat::Json => {
            serde_json::from_str(&content).map_err(|source| AggregationError::Decode {
                path: path.to_path_buf(),
                line: 0,
                source,
            })
        }
        OutputFormat::JsonLines => content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str(line).map_err(|source| AggregationError::Decode {
                    path: path.to_path_buf(),
                    line: index + 1,
                    source,
                })
            })
            .collect(),
    }
}
