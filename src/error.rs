use thiserror::Error;

use crate::assets::classify::Kind;

/// Failures that abort a whole pipeline run.
#[derive(Error, Debug)]
pub enum ErrorKind {
    #[error("Error serializing or deserializing json: {err}")]
    SerdeJson {
        #[from]
        err: serde_json::Error,
    },
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    #[error("Data file not found: path={path}")]
    DatafileNotFound { path: String },
    #[error("Expected {path} to contain a JSON object at {location}")]
    InvalidSourceData { path: String, location: String },
    #[error("No English localization tokens were found")]
    MissingBaseLocalization,
    /// Only produced when a build is run with `fail_fast` enabled.
    #[error("Record rejected: {0}")]
    Record(#[from] RecordError),
}

/// A problem with a single raw record. The record is excluded from the output
/// and the rest of the batch carries on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Unknown class name: {class_name}")]
    ClassificationMiss { class_name: String },
    #[error("Could not decode {class_name}: field={field}, {detail}")]
    Decode {
        class_name: String,
        field: String,
        detail: String,
    },
    #[error("Dangling reference in {class_name}: field={field}, reference={reference}")]
    DanglingReference {
        class_name: String,
        field: String,
        reference: String,
    },
    #[error("Duplicate {kind} id {id} on {class_name}, already used by {existing}")]
    DuplicateId {
        kind: Kind,
        id: u64,
        class_name: String,
        existing: String,
    },
}

impl RecordError {
    /// The class name of the record this error was raised for.
    pub fn class_name(&self) -> &str {
        match self {
            RecordError::ClassificationMiss { class_name }
            | RecordError::Decode { class_name, .. }
            | RecordError::DanglingReference { class_name, .. }
            | RecordError::DuplicateId { class_name, .. } => class_name,
        }
    }

    pub(crate) fn decode(
        class_name: &str,
        field: &str,
        detail: impl std::fmt::Display,
    ) -> RecordError {
        RecordError::Decode {
            class_name: class_name.to_string(),
            field: field.to_string(),
            detail: detail.to_string(),
        }
    }
}

/// Returned by the query API when the requested entity is not part of the built set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} not found: {key}")]
pub struct LookupMiss {
    pub kind: &'static str,
    pub key: String,
}

impl LookupMiss {
    pub fn hero(key: impl ToString) -> Self {
        LookupMiss {
            kind: "Hero",
            key: key.to_string(),
        }
    }

    pub fn item(key: impl ToString) -> Self {
        LookupMiss {
            kind: "Item",
            key: key.to_string(),
        }
    }
}

pub type IResult<T> = Result<T, ErrorKind>;
