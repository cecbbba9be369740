//! Ошибки кодека metrics-записи.
//!
//! Тексты сообщений - внешний контракт: их сопоставляет downstream-инструментарий,
//! поэтому формулировки менять нельзя.

use std::io;

use thiserror::Error;

use crate::xml::ParseError;

/// Грубая категория ошибки (для ветвления без разбора текста).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordErrorKind {
    Io,
    Format,
    MissingField,
    Type,
    Range,
    VersionMismatch,
}

#[derive(Debug, Error)]
pub enum RecordError {
    /// Файл отсутствует / не читается / не пишется. Причина передаётся как есть.
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Пустой или структурно некорректный документ.
    #[error("unable to parse {path}: {source}")]
    Format {
        path: String,
        #[source]
        source: ParseError,
    },

    #[error("odrefresh_metrics element not found in {path}")]
    ContainerNotFound { path: String },

    #[error("Expected Odrefresh metric {field} not found")]
    MissingField { field: String },

    /// `type_name` already carries its article ("an int32", "a uint64").
    #[error("Odrefresh metric {field} is not {type_name}")]
    NotAnInteger {
        field: String,
        type_name: &'static str,
    },

    /// Атрибут dex2oat-результата отсутствует или не является int32.
    #[error("Expected Odrefresh metric {field}.{attribute} is not an int32")]
    InvalidAttribute { field: String, attribute: String },

    #[error("Odrefresh metric {field} has a value ({value}) outside of the expected range ([{min}, {max}])")]
    OutOfRange {
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("odrefresh_metrics_version {found} is different than expected ({expected})")]
    VersionMismatch { found: i32, expected: i32 },
}

impl RecordError {
    pub(crate) fn io(path: &std::path::Path, source: io::Error) -> Self {
        RecordError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub fn kind(&self) -> RecordErrorKind {
        match self {
            RecordError::Io { .. } => RecordErrorKind::Io,
            RecordError::Format { .. } | RecordError::ContainerNotFound { .. } => {
                RecordErrorKind::Format
            }
            RecordError::MissingField { .. } => RecordErrorKind::MissingField,
            RecordError::NotAnInteger { .. } | RecordError::InvalidAttribute { .. } => {
                RecordErrorKind::Type
            }
            RecordError::OutOfRange { .. } => RecordErrorKind::Range,
            RecordError::VersionMismatch { .. } => RecordErrorKind::VersionMismatch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_stable() {
        let e = RecordError::ContainerNotFound {
            path: "/tmp/m.xml".into(),
        };
        assert_eq!(e.to_string(), "odrefresh_metrics element not found in /tmp/m.xml");
        assert_eq!(e.kind(), RecordErrorKind::Format);

        let e = RecordError::MissingField {
            field: "odrefresh_metrics_version".into(),
        };
        assert_eq!(
            e.to_string(),
            "Expected Odrefresh metric odrefresh_metrics_version not found"
        );

        let e = RecordError::NotAnInteger {
            field: "status".into(),
            type_name: "an int32",
        };
        assert_eq!(e.to_string(), "Odrefresh metric status is not an int32");
        assert_eq!(e.kind(), RecordErrorKind::Type);

        let e = RecordError::InvalidAttribute {
            field: "primary_bcp_dex2oat_result".into(),
            attribute: "status".into(),
        };
        assert_eq!(
            e.to_string(),
            "Expected Odrefresh metric primary_bcp_dex2oat_result.status is not an int32"
        );

        let e = RecordError::OutOfRange {
            field: "secondary_bcp_dex2oat_result.exit-code".into(),
            value: 258,
            min: -1,
            max: 255,
        };
        assert_eq!(
            e.to_string(),
            "Odrefresh metric secondary_bcp_dex2oat_result.exit-code has a value (258) \
             outside of the expected range ([-1, 255])"
        );

        let e = RecordError::VersionMismatch {
            found: 0,
            expected: 4,
        };
        assert_eq!(
            e.to_string(),
            "odrefresh_metrics_version 0 is different than expected (4)"
        );
        assert_eq!(e.kind(), RecordErrorKind::VersionMismatch);
    }

    #[test]
    fn io_error_keeps_source() {
        use std::error::Error as _;
        let e = RecordError::io(
            std::path::Path::new("/nope/m.xml"),
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        assert_eq!(e.kind(), RecordErrorKind::Io);
        assert!(e.to_string().starts_with("/nope/m.xml: "));
        let src = e.source().unwrap().downcast_ref::<io::Error>().unwrap();
        assert_eq!(src.kind(), io::ErrorKind::NotFound);
    }
}
