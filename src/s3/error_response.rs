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

//! The S3 error envelope (`<Error><Code>..</Code><Message>..</Message></Error>`)

use crate::s3::error::VerifyErr;
use crate::s3::utils::{get_text_default, get_text_option};
use bytes::{Buf, Bytes};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use xmltree::Element;

/// Error codes as returned by the server in the `<Code>` element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum S3ErrorCode {
    #[default]
    NoError,
    AccessDenied,
    BucketAlreadyExists,
    BucketAlreadyOwnedByYou,
    BucketNotEmpty,
    InvalidBucketName,
    InvalidPart,
    InvalidRange,
    NoSuchBucket,
    NoSuchKey,
    NoSuchUpload,
    PreconditionFailed,
    SignatureDoesNotMatch,

    /// Any code not listed above, kept verbatim
    Other(String),
}

const KNOWN_CODES: &[S3ErrorCode] = &[
    S3ErrorCode::NoError,
    S3ErrorCode::AccessDenied,
    S3ErrorCode::BucketAlreadyExists,
    S3ErrorCode::BucketAlreadyOwnedByYou,
    S3ErrorCode::BucketNotEmpty,
    S3ErrorCode::InvalidBucketName,
    S3ErrorCode::InvalidPart,
    S3ErrorCode::InvalidRange,
    S3ErrorCode::NoSuchBucket,
    S3ErrorCode::NoSuchKey,
    S3ErrorCode::NoSuchUpload,
    S3ErrorCode::PreconditionFailed,
    S3ErrorCode::SignatureDoesNotMatch,
];

impl FromStr for S3ErrorCode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Infallible> {
        Ok(KNOWN_CODES
            .iter()
            .find(|c| c.to_string().eq_ignore_ascii_case(s))
            .cloned()
            .unwrap_or_else(|| S3ErrorCode::Other(s.to_owned())))
    }
}

impl fmt::Display for S3ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            S3ErrorCode::NoError => "NoError",
            S3ErrorCode::AccessDenied => "AccessDenied",
            S3ErrorCode::BucketAlreadyExists => "BucketAlreadyExists",
            S3ErrorCode::BucketAlreadyOwnedByYou => "BucketAlreadyOwnedByYou",
            S3ErrorCode::BucketNotEmpty => "BucketNotEmpty",
            S3ErrorCode::InvalidBucketName => "InvalidBucketName",
            S3ErrorCode::InvalidPart => "InvalidPart",
            S3ErrorCode::InvalidRange => "InvalidRange",
            S3ErrorCode::NoSuchBucket => "NoSuchBucket",
            S3ErrorCode::NoSuchKey => "NoSuchKey",
            S3ErrorCode::NoSuchUpload => "NoSuchUpload",
            S3ErrorCode::PreconditionFailed => "PreconditionFailed",
            S3ErrorCode::SignatureDoesNotMatch => "SignatureDoesNotMatch",
            S3ErrorCode::Other(code) => code,
        };
        f.write_str(s)
    }
}

/// Parsed S3 error envelope.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct S3ErrorResponse {
    code: S3ErrorCode,
    message: Option<String>,
    resource: String,
    request_id: String,
    host_id: String,
    bucket_name: Option<String>,
    object_name: Option<String>,
}

impl S3ErrorResponse {
    pub fn new_from_body(body: &Bytes) -> Result<Self, VerifyErr> {
        let root = Element::parse(body.clone().reader())?;
        if root.name != "Error" {
            return Err(VerifyErr::MalformedBody(format!(
                "expected <Error> envelope, got <{}>",
                root.name
            )));
        }
        let code = get_text_default(&root, "Code");
        Ok(Self {
            code: code.parse().unwrap_or_default(),
            message: get_text_option(&root, "Message"),
            resource: get_text_default(&root, "Resource"),
            request_id: get_text_default(&root, "RequestId"),
            host_id: get_text_default(&root, "HostId"),
            bucket_name: get_text_option(&root, "BucketName"),
            object_name: get_text_option(&root, "Key"),
        })
    }

    pub fn code(&self) -> &S3ErrorCode {
        &self.code
    }
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
    pub fn resource(&self) -> &str {
        &self.resource
    }
    pub fn request_id(&self) -> &str {
        &self.request_id
    }
    pub fn host_id(&self) -> &str {
        &self.host_id
    }
    pub fn bucket_name(&self) -> Option<&str> {
        self.bucket_name.as_deref()
    }
    pub fn object_name(&self) -> Option<&str> {
        self.object_name.as_deref()
    }
}

impl fmt::Display for S3ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)?;
        if let Some(m) = &self.message {
            write!(f, ": {m}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_roundtrip_through_display() {
        for code in KNOWN_CODES {
            let parsed: S3ErrorCode = code.to_string().parse().unwrap();
            assert_eq!(&parsed, code);
        }
    }

    #[test]
    fn test_unknown_code_is_kept_verbatim() {
        let code: S3ErrorCode = "XAmzContentSHA256Mismatch".parse().unwrap();
        assert_eq!(
            code,
            S3ErrorCode::Other("XAmzContentSHA256Mismatch".to_string())
        );
        assert_eq!(code.to_string(), "XAmzContentSHA256Mismatch");
    }

    #[test]
    fn test_parse_envelope() {
        let body = Bytes::from_static(
            br#"<?xml version="1.0" encoding="UTF-8"?>
<Error><Code>NoSuchBucket</Code><Message>The specified bucket does not exist</Message><BucketName>s3verify-test</BucketName><Resource>/s3verify-test</Resource><RequestId>17A</RequestId><HostId>dd9</HostId></Error>"#,
        );
        let resp = S3ErrorResponse::new_from_body(&body).unwrap();
        assert_eq!(resp.code(), &S3ErrorCode::NoSuchBucket);
        assert_eq!(resp.message(), Some("The specified bucket does not exist"));
        assert_eq!(resp.bucket_name(), Some("s3verify-test"));
        assert_eq!(resp.object_name(), None);
        assert_eq!(resp.resource(), "/s3verify-test");
        assert_eq!(resp.request_id(), "17A");
    }

    #[test]
    fn test_non_error_document_is_rejected() {
        let body = Bytes::from_static(b"<ListAllMyBucketsResult/>");
        assert!(matches!(
            S3ErrorResponse::new_from_body(&body),
            Err(VerifyErr::MalformedBody(_))
        ));
    }
}
