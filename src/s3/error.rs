// MinIO s3verify: conformance tester for Amazon S3 Compatible Cloud Storage
// Copyright 2025 MinIO, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error definitions for request construction, transport, verification and fixtures

use crate::s3::error_response::S3ErrorCode;
use std::fmt;
use thiserror::Error;

/// A request could not be built. Always a scheduling or configuration problem,
/// never something the server did.
#[derive(Error, Debug)]
pub enum ValidationErr {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] http::uri::InvalidUri),

    #[error("{0}")]
    UrlBuildError(String),

    #[error("invalid bucket name: {0}")]
    InvalidBucketName(String),

    #[error("invalid object name: {0}")]
    InvalidObjectName(String),

    #[error("fixture {fixture} has no {field}; the test that populates it has not run")]
    MissingFixtureField {
        fixture: String,
        field: &'static str,
    },

    #[error("prerequisite '{0}' is not satisfied by any passed test")]
    MissingPrerequisite(String),

    #[error("invalid range {start}-{end} for object of size {size}")]
    InvalidRange { start: u64, end: u64, size: u64 },

    #[error("invalid value for header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A response did not match what the S3 API mandates.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VerifyErr {
    #[error("status code mismatch; expected: {expected}, got: {actual}{detail}")]
    StatusMismatch {
        expected: u16,
        actual: u16,
        detail: String,
    },

    #[error("missing header {0}")]
    MissingHeader(String),

    #[error("header {name} mismatch; expected: {expected}, got: {actual}")]
    HeaderMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("malformed header {name}: {value:?}")]
    MalformedHeader { name: String, value: String },

    #[error("body mismatch; expected: {expected}, got: {actual}")]
    BodyMismatch { expected: String, actual: String },

    #[error("error code mismatch; expected: {expected}, got: {actual}")]
    ErrorCodeMismatch {
        expected: S3ErrorCode,
        actual: S3ErrorCode,
    },

    #[error("error message mismatch; expected: {expected:?}, got: {actual:?}")]
    ErrorMessageMismatch {
        expected: String,
        actual: Option<String>,
    },

    #[error("malformed response body: {0}")]
    MalformedBody(String),

    #[error("{0}")]
    Mismatch(String),
}

impl From<xmltree::ParseError> for VerifyErr {
    fn from(err: xmltree::ParseError) -> Self {
        VerifyErr::MalformedBody(err.to_string())
    }
}

impl From<chrono::ParseError> for VerifyErr {
    fn from(err: chrono::ParseError) -> Self {
        VerifyErr::MalformedBody(format!("invalid timestamp: {err}"))
    }
}

impl From<std::num::ParseIntError> for VerifyErr {
    fn from(err: std::num::ParseIntError) -> Self {
        VerifyErr::MalformedBody(format!("invalid integer: {err}"))
    }
}

/// Setup or teardown of buckets and objects failed.
#[derive(Error, Debug)]
pub enum FixtureErr {
    #[error("no bucket fixture named {0}")]
    NoSuchBucket(String),

    #[error("no object fixture {bucket}/{key}")]
    NoSuchObject { bucket: String, key: String },

    #[error("no multipart upload fixture for {bucket}/{key}")]
    NoSuchUpload { bucket: String, key: String },

    #[error("cleanup of bucket {bucket} failed: {reason}")]
    Cleanup { bucket: String, reason: String },

    #[error("cleanup of bucket {0} timed out")]
    CleanupTimeout(String),

    #[error("fan-out worker panicked: {0}")]
    WorkerPanicked(String),
}

/// The single error type the orchestrator sees.
#[derive(Error, Debug)]
pub enum Error {
    #[error("construction error: {0}")]
    Construction(#[from] ValidationErr),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("verification error: {0}")]
    Verification(#[from] VerifyErr),

    #[error("fixture error: {0}")]
    Fixture(#[from] FixtureErr),

    #[error("run cancelled")]
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Construction,
    Transport,
    Verification,
    Fixture,
    Cancelled,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Construction(_) => ErrorKind::Construction,
            Error::Transport(_) => ErrorKind::Transport,
            Error::Verification(_) => ErrorKind::Verification,
            Error::Fixture(_) => ErrorKind::Fixture,
            Error::Cancelled => ErrorKind::Cancelled,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Construction => "construction",
            ErrorKind::Transport => "transport",
            ErrorKind::Verification => "verification",
            ErrorKind::Fixture => "fixture",
            ErrorKind::Cancelled => "cancelled",
        })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_follows_variant() {
        let e: Error = ValidationErr::MissingPrerequisite("objects".into()).into();
        assert_eq!(e.kind(), ErrorKind::Construction);

        let e: Error = VerifyErr::MissingHeader("ETag".into()).into();
        assert_eq!(e.kind(), ErrorKind::Verification);

        let e: Error = FixtureErr::NoSuchBucket("b".into()).into();
        assert_eq!(e.kind(), ErrorKind::Fixture);
    }

    #[test]
    fn test_status_mismatch_message_carries_both_sides() {
        let e = VerifyErr::StatusMismatch {
            expected: 412,
            actual: 200,
            detail: String::new(),
        };
        assert_eq!(
            e.to_string(),
            "status code mismatch; expected: 412, got: 200"
        );
    }
}
