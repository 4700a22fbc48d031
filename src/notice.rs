//! User-visible, non-fatal notifications.
//!
//! Nothing in the engine aborts on a collaborator failure or a stale
//! reference; it records a notice instead and carries on.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// The field list could not be fetched; the catalog is treated as empty.
    CatalogFetchFailed,
    /// Filter conditions pointed at fields that no longer exist.
    StaleConditionsCleared,
    /// Projection entries pointed at fields that no longer exist.
    StaleFieldsDropped,
    /// An operator became illegal after a field changed type.
    OperatorsReset,
    /// The preview request failed.
    PreviewFailed,
    /// A persisted definition contained entries that could not be read.
    DefinitionRepaired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            kind,
            message: message.into(),
        }
    }

    pub fn warning(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            kind,
            message: message.into(),
        }
    }

    pub fn error(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        write!(f, "{}: {}", level, self.message)
    }
}
