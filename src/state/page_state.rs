/// Page outcome definitions for tracking crawl progress
///
/// Every crawl task ends either with a `PageOutcome` or with a `TaskError`.
use crate::TaskError;
use std::fmt;

/// How a successfully crawled page was persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageOutcome {
    /// A new page file was written with this many records
    Written { records: usize },

    /// A file for the page's title already existed; nothing was written
    AlreadyPresent,

    /// The page had no title, so nothing was written; its links were followed
    Untitled,
}

impl PageOutcome {
    /// Returns the number of records this page contributed to disk
    pub fn records_written(&self) -> usize {
        match self {
            Self::Written { records } => *records,
            Self::AlreadyPresent | Self::Untitled => 0,
        }
    }
}

/// Category of a task failure, used to count failures without matching messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FailureKind {
    /// Connection, transport, or body read failure
    Fetch,

    /// Per-page file could not be written
    Write,

    /// The task never obtained a permit
    Permit,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Write => "write",
            Self::Permit => "permit",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&TaskError> for FailureKind {
    fn from(error: &TaskError) -> Self {
        match error {
            TaskError::Fetch(_) => Self::Fetch,
            TaskError::Write(_) => Self::Write,
            TaskError::PoolClosed => Self::Permit,
        }
    }
}
