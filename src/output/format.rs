use crate::ConfigError;
use serde::Deserialize;
use std::fmt;

/// On-disk layout of per-page files and of the combined dataset
///
/// Selected by number: `0` is a single JSON array, `1` is newline-delimited
/// JSON with one record per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "u8")]
pub enum OutputFormat {
    #[default]
    Json,
    JsonLines,
}

impl OutputFormat {
    /// File extension without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::JsonLines => "jsonl",
        }
    }

    /// Returns true if `path` carries this format's extension
    pub fn matches_path(&self, path: &std::path::Path) -> bool {
        path.extension().and_then(|ext| ext.to_str()) == Some(self.extension())
    }
}

impl TryFrom<u8> for OutputFormat {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Json),
            1 => Ok(Self::JsonLines),
            other => Err(ConfigError::UnknownFormat(other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "JSON array (.json)"),
            Self::JsonLines => write!(f, "newline-delimited JSON (.jsonl)"),
        }
    }
}
