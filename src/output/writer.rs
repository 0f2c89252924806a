//! Per-page dataset files
//!
//! Every crawled page gets one file in the temporary directory, named from its
//! sanitized title. A file is written at most once: if it already exists the
//! write is a silent no-op, which lets a resumed run skip finished pages.

use crate::output::error::{WriteError, WriteResult};
use crate::output::{OutputFormat, PageRecord};
use std::fs::OpenOptions;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Result of writing one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// A new file was created holding `records` records
    Created { path: PathBuf, records: usize },

    /// A file for this title already existed and was left untouched
    AlreadyPresent { path: PathBuf },
}

/// Writes per-page record files into a directory
#[derive(Debug, Clone)]
pub struct PageWriter {
    dir: PathBuf,
    format: OutputFormat,
    include_title: bool,
}

impl PageWriter {
    pub fn new(dir: impl Into<PathBuf>, format: OutputFormat, include_title: bool) -> Self {
        Self {
            dir: dir.into(),
            format,
            include_title,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding the page titled `title`
    pub fn path_for(&self, title: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", sanitize_title(title), self.format.extension()))
    }

    /// Writes `records` for the page titled `title` unless its file exists
    pub fn write(&self, title: &str, records: &[PageRecord]) -> WriteResult<WriteOutcome> {
        let path = self.path_for(title);
        if path.exists() {
            return Ok(WriteOutcome::AlreadyPresent { path });
        }

        // create_new closes the race between two pages sharing a title
        let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Ok(WriteOutcome::AlreadyPresent { path });
            }
            Err(source) => return Err(WriteError::Io { path, source }),
        };

        let mut writer = BufWriter::new(file);
        let encoded = encode_records(&mut writer, records, self.format, self.include_title, false)
            .and_then(|()| writer.flush().map_err(serde_json::Error::io));
        drop(writer);
        if let Err(e) = encoded {
            return Err(discard_partial_file(path, e));
        }

        Ok(WriteOutcome::Created {
            path,
            records: records.len(),
        })
    }
}

/// Turns a page title into a file name stem
///
/// Slashes become underscores, surrounding whitespace is trimmed, the result is
/// lowercased and inner spaces become underscores.
///
/// # Examples
///
/// ```
/// use wiki_harvest::output::sanitize_title;
///
/// assert_eq!(sanitize_title(" Dragon Age/Origins "), "dragon_age_origins");
/// ```
pub fn sanitize_title(title: &str) -> String {
    title
        .replace('/', "_")
        .trim()
        .to_lowercase()
        .replace(' ', "_")
}

/// Serializes records in the given format
///
/// JSON arrays are compact for per-page files and indented for the combined
/// dataset. I/O failures surface as `serde_json::Error::io`.
pub(crate) fn encode_records<W: Write>(
    writer: &mut W,
    records: &[PageRecord],
    format: OutputFormat,
    include_title: bool,
    pretty: bool,
) -> Result<(), serde_json::Error> {
    match format {
        OutputFormat::Json => {
            let views: Vec<_> = records.iter().map(|r| r.view(include_title)).collect();
            if pretty {
                serde_json::to_writer_pretty(&mut *writer, &views)?;
            } else {
                serde_json::to_writer(&mut *writer, &views)?;
            }
            writer.write_all(b"\n").map_err(serde_json::Error::io)?;
        }
        OutputFormat::JsonLines => {
            for record in records {
                serde_json::to_writer(&mut *writer, &record.view(include_title))?;
                writer.write_all(b"\n").map_err(serde_json::Error::io)?;
            }
        }
    }
    Ok(())
}

/// Removes a file whose write failed part-way
///
/// A truncated file left behind would be taken as already written on resume.
fn discard_partial_file(path: PathBuf, error: serde_json::Error) -> WriteError {
    if let Err(e) = std::fs::remove_file(&path) {
        tracing::warn!("Couldn't remove partial file {}: {}", path.display(), e);
    }
    classify_write_error(path, error)
}

fn classify_write_error(path: PathBuf, error: serde_json::Error) -> WriteError {
    if error.is_io() {
        WriteError::Io {
            path,
            source: error.into(),
        }
    } else {
        WriteError::Encode {
            path,
            source: error,
        }
    }
}
