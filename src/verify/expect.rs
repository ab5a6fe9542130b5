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

//! Expected outcomes and the verifier that compares a response against one

use crate::s3::error::VerifyErr;
use crate::s3::error_response::{S3ErrorCode, S3ErrorResponse};
use crate::s3::header_constants::{CONTENT_LENGTH, DATE, ETAG, SERVER};
use crate::s3::response::FromResponseBody;
use crate::s3::types::S3Response;
use crate::s3::utils::{from_http_header_value, trim_etag};
use bytes::Bytes;
use http::StatusCode;
use std::fmt;
use std::sync::Arc;

/// A predicate over a single response header
#[derive(Clone, Debug, PartialEq)]
pub enum HeaderCheck {
    Present(&'static str),
    Equals(&'static str, String),
    /// Compared with surrounding quotes removed on both sides
    ETag(String),
    ContentLength(u64),
    /// Must parse as an RFC 7231 date
    HttpDate(&'static str),
}

impl HeaderCheck {
    pub fn check(&self, resp: &S3Response) -> Result<(), VerifyErr> {
        match self {
            HeaderCheck::Present(name) => required(resp, name).map(|_| ()),
            HeaderCheck::Equals(name, expected) => {
                let actual = required(resp, name)?;
                if actual != expected {
                    return Err(VerifyErr::HeaderMismatch {
                        name: name.to_string(),
                        expected: expected.clone(),
                        actual: actual.to_string(),
                    });
                }
                Ok(())
            }
            HeaderCheck::ETag(expected) => {
                let actual = required(resp, ETAG)?;
                if trim_etag(actual) != trim_etag(expected) {
                    return Err(VerifyErr::HeaderMismatch {
                        name: ETAG.into(),
                        expected: expected.clone(),
                        actual: actual.to_string(),
                    });
                }
                Ok(())
            }
            HeaderCheck::ContentLength(expected) => {
                let actual = required(resp, CONTENT_LENGTH)?;
                let n: u64 = actual
                    .trim()
                    .parse()
                    .map_err(|_| malformed(CONTENT_LENGTH, actual))?;
                if n != *expected {
                    return Err(VerifyErr::HeaderMismatch {
                        name: CONTENT_LENGTH.into(),
                        expected: expected.to_string(),
                        actual: actual.to_string(),
                    });
                }
                Ok(())
            }
            HeaderCheck::HttpDate(name) => {
                let actual = required(resp, name)?;
                from_http_header_value(actual).map_err(|_| malformed(name, actual))?;
                Ok(())
            }
        }
    }
}

fn required<'a>(resp: &'a S3Response, name: &str) -> Result<&'a str, VerifyErr> {
    resp.header(name)
        .ok_or_else(|| VerifyErr::MissingHeader(name.to_string()))
}

fn malformed(name: &str, value: &str) -> VerifyErr {
    VerifyErr::MalformedHeader {
        name: name.to_string(),
        value: value.to_string(),
    }
}

/// Headers every success-shaped response must carry
fn check_standard_headers(resp: &S3Response) -> Result<(), VerifyErr> {
    HeaderCheck::HttpDate(DATE).check(resp)?;
    HeaderCheck::Present(SERVER).check(resp)?;
    if let Some(v) = resp.header(CONTENT_LENGTH) {
        v.trim()
            .parse::<u64>()
            .map_err(|_| malformed(CONTENT_LENGTH, v))?;
    }
    Ok(())
}

pub type BodyCheck = Arc<dyn Fn(&Bytes) -> Result<(), VerifyErr> + Send + Sync>;

#[derive(Clone)]
pub enum BodyExpectation {
    Empty,
    Exact(Bytes),
    Any,
    Parsed(BodyCheck),
}

impl BodyExpectation {
    /// Parses the body as `T` and applies `pred` to the result
    pub fn parsed<T, F>(pred: F) -> Self
    where
        T: FromResponseBody,
        F: Fn(&T) -> Result<(), VerifyErr> + Send + Sync + 'static,
    {
        BodyExpectation::Parsed(Arc::new(move |body| pred(&T::from_body(body)?)))
    }

    pub fn check(&self, body: &Bytes) -> Result<(), VerifyErr> {
        match self {
            BodyExpectation::Empty if body.is_empty() => Ok(()),
            BodyExpectation::Empty => Err(VerifyErr::BodyMismatch {
                expected: "empty body".into(),
                actual: format!("{} bytes", body.len()),
            }),
            BodyExpectation::Exact(expected) if expected == body => Ok(()),
            BodyExpectation::Exact(expected) => Err(VerifyErr::BodyMismatch {
                expected: describe_bytes(expected),
                actual: describe_bytes(body),
            }),
            BodyExpectation::Any => Ok(()),
            BodyExpectation::Parsed(check) => check(body),
        }
    }
}

fn describe_bytes(b: &Bytes) -> String {
    match b.iter().position(|c| !c.is_ascii()) {
        None if b.len() <= 64 => format!("{:?}", String::from_utf8_lossy(b)),
        _ => format!("{} bytes (md5 {:x})", b.len(), md5::compute(b)),
    }
}

impl fmt::Debug for BodyExpectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyExpectation::Empty => f.write_str("Empty"),
            BodyExpectation::Exact(b) => write!(f, "Exact({} bytes)", b.len()),
            BodyExpectation::Any => f.write_str("Any"),
            BodyExpectation::Parsed(_) => f.write_str("Parsed(..)"),
        }
    }
}

/// What the S3 API mandates for one request
#[derive(Clone, Debug)]
pub enum ExpectedOutcome {
    Success {
        status: StatusCode,
        headers: Vec<HeaderCheck>,
        body: BodyExpectation,
    },
    /// 304 with an empty body; never decoded
    NotModified { headers: Vec<HeaderCheck> },
    Failure {
        status: StatusCode,
        code: Option<S3ErrorCode>,
        message: Option<String>,
    },
}

impl ExpectedOutcome {
    pub fn success(status: StatusCode) -> Self {
        ExpectedOutcome::Success {
            status,
            headers: Vec::new(),
            body: BodyExpectation::Any,
        }
    }

    pub fn not_modified() -> Self {
        ExpectedOutcome::NotModified {
            headers: Vec::new(),
        }
    }

    /// A failure judged on status alone, as for HEAD responses
    pub fn status_only(status: StatusCode) -> Self {
        ExpectedOutcome::Failure {
            status,
            code: None,
            message: None,
        }
    }

    pub fn failure(status: StatusCode, code: S3ErrorCode) -> Self {
        ExpectedOutcome::Failure {
            status,
            code: Some(code),
            message: None,
        }
    }

    pub fn header(mut self, check: HeaderCheck) -> Self {
        match &mut self {
            ExpectedOutcome::Success { headers, .. } | ExpectedOutcome::NotModified { headers } => {
                headers.push(check)
            }
            ExpectedOutcome::Failure { .. } => {}
        }
        self
    }

    pub fn body(mut self, expected: BodyExpectation) -> Self {
        if let ExpectedOutcome::Success { body, .. } = &mut self {
            *body = expected;
        }
        self
    }

    pub fn message(mut self, expected: &str) -> Self {
        if let ExpectedOutcome::Failure { message, .. } = &mut self {
            *message = Some(expected.to_string());
        }
        self
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ExpectedOutcome::Success { status, .. } | ExpectedOutcome::Failure { status, .. } => {
                *status
            }
            ExpectedOutcome::NotModified { .. } => StatusCode::NOT_MODIFIED,
        }
    }

    pub fn evaluate(&self, resp: &S3Response) -> VerificationResult {
        verify(resp, self).into()
    }
}

/// Compares `resp` against `expected`: status first, then headers, then body.
pub fn verify(resp: &S3Response, expected: &ExpectedOutcome) -> Result<(), VerifyErr> {
    if resp.status != expected.status() {
        return Err(VerifyErr::StatusMismatch {
            expected: expected.status().as_u16(),
            actual: resp.status.as_u16(),
            detail: status_detail(resp),
        });
    }

    match expected {
        ExpectedOutcome::Success { headers, body, .. } => {
            check_standard_headers(resp)?;
            for h in headers {
                h.check(resp)?;
            }
            body.check(&resp.body)
        }
        ExpectedOutcome::NotModified { headers } => {
            check_standard_headers(resp)?;
            for h in headers {
                h.check(resp)?;
            }
            BodyExpectation::Empty.check(&resp.body)
        }
        ExpectedOutcome::Failure { code, message, .. } => {
            if resp.body.is_empty() {
                return Ok(());
            }
            let err = S3ErrorResponse::new_from_body(&resp.body)?;
            if let Some(code) = code
                && err.code() != code
            {
                return Err(VerifyErr::ErrorCodeMismatch {
                    expected: code.clone(),
                    actual: err.code().clone(),
                });
            }
            if let Some(message) = message
                && err.message() != Some(message.as_str())
            {
                return Err(VerifyErr::ErrorMessageMismatch {
                    expected: message.clone(),
                    actual: err.message().map(str::to_string),
                });
            }
            Ok(())
        }
    }
}

fn status_detail(resp: &S3Response) -> String {
    match resp.error_response() {
        Ok(e) => match e.message() {
            Some(m) => format!(" ({}: {m})", e.code()),
            None => format!(" ({})", e.code()),
        },
        Err(_) => String::new(),
    }
}

/// Reportable form of a verification
#[derive(Clone, Debug, PartialEq)]
pub struct VerificationResult {
    pub passed: bool,
    pub failure_detail: Option<VerifyErr>,
}

impl From<Result<(), VerifyErr>> for VerificationResult {
    fn from(r: Result<(), VerifyErr>) -> Self {
        match r {
            Ok(()) => VerificationResult {
                passed: true,
                failure_detail: None,
            },
            Err(e) => VerificationResult {
                passed: false,
                failure_detail: Some(e),
            },
        }
    }
}
