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

//! Request descriptors, signed requests and buffered responses

use crate::s3::creds::Credentials;
use crate::s3::error::{ValidationErr, VerifyErr};
use crate::s3::error_response::S3ErrorResponse;
use crate::s3::header_constants::*;
use crate::s3::http::{BaseUrl, Url};
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::signer::{SigningInput, sign_v4_s3};
use crate::s3::utils::{
    UtcTime, from_http_header_value, sha256_hash, to_amz_date, to_http_header_value, trim_etag,
};
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use typed_builder::TypedBuilder;

/// The user agent every request carries
pub const USER_AGENT_VALUE: &str = concat!("s3verify/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug, TypedBuilder)]
/// Immutable description of one S3 request, fully determined before signing
pub struct RequestSpec {
    method: Method,

    #[builder(default, setter(into))]
    bucket: Option<String>,

    #[builder(default, setter(into))]
    object: Option<String>,

    #[builder(default)]
    query_params: Multimap,

    #[builder(default)]
    headers: Multimap,

    #[builder(default, setter(into))]
    body: Bytes,
}

impl RequestSpec {
    pub fn method(&self) -> &Method {
        &self.method
    }
    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }
    pub fn object(&self) -> Option<&str> {
        self.object.as_deref()
    }
    pub fn query_params(&self) -> &Multimap {
        &self.query_params
    }
    pub fn headers(&self) -> &Multimap {
        &self.headers
    }
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Produces the transport-ready request: resolves the URL, adds the
    /// payload hash of the exact body bytes and, unless the credentials are
    /// anonymous, the SigV4 `Authorization` header.
    pub fn sign(
        &self,
        base_url: &BaseUrl,
        region: &str,
        creds: &Credentials,
        date: UtcTime,
    ) -> Result<SignedRequest, ValidationErr> {
        let url = base_url.build_url(
            &self.method,
            &self.query_params,
            self.bucket.as_deref(),
            self.object.as_deref(),
        )?;

        let mut headers = self.headers.clone();
        headers.add(HOST, url.host_header_value());
        headers.add(USER_AGENT, USER_AGENT_VALUE);

        if self.method == Method::PUT || self.method == Method::POST {
            headers.add(CONTENT_LENGTH, self.body.len().to_string());
            if !self.body.is_empty() && !headers.contains_key_ignore_case(CONTENT_TYPE) {
                headers.add(CONTENT_TYPE, "application/octet-stream");
            }
        }

        let content_sha256 = if self.body.is_empty() {
            EMPTY_SHA256.to_string()
        } else {
            sha256_hash(&self.body)
        };
        headers.add(X_AMZ_CONTENT_SHA256, content_sha256.clone());
        headers.add(X_AMZ_DATE, to_amz_date(date));

        if let Some(token) = &creds.session_token {
            headers.add(X_AMZ_SECURITY_TOKEN, token.clone());
        }
        if !creds.is_anonymous() {
            let input = SigningInput {
                method: &self.method,
                path: &url.path,
                region,
                query_params: &self.query_params,
                content_sha256: &content_sha256,
                date,
            };
            sign_v4_s3(&input, &mut headers, creds);
        }

        Ok(SignedRequest {
            method: self.method.clone(),
            url,
            headers,
            body: self.body.clone(),
        })
    }
}

/// Converts an operation's parameters into a [`RequestSpec`].
///
/// Implementations are pure: they read only their own fields and fail with a
/// construction error instead of guessing when something is missing.
pub trait ToRequestSpec: Sized {
    fn to_request_spec(self) -> Result<RequestSpec, ValidationErr>;
}

#[derive(Clone, Debug)]
/// A request ready for the wire
pub struct SignedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Multimap,
    pub body: Bytes,
}

/// One conditional variant of a read. A request carries at most one.
#[derive(Clone, Debug, PartialEq)]
pub enum Conditional {
    IfMatch(String),
    IfNoneMatch(String),
    IfModifiedSince(UtcTime),
    IfUnmodifiedSince(UtcTime),
    /// Inclusive byte range `bytes=start-end`
    Range { start: u64, end: u64 },
}

impl Conditional {
    pub fn header(&self) -> (&'static str, String) {
        match self {
            Conditional::IfMatch(etag) => (IF_MATCH, quote_etag(etag)),
            Conditional::IfNoneMatch(etag) => (IF_NONE_MATCH, quote_etag(etag)),
            Conditional::IfModifiedSince(t) => (IF_MODIFIED_SINCE, to_http_header_value(*t)),
            Conditional::IfUnmodifiedSince(t) => (IF_UNMODIFIED_SINCE, to_http_header_value(*t)),
            Conditional::Range { start, end } => (RANGE, format!("bytes={start}-{end}")),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErr> {
        match self {
            Conditional::IfMatch(etag) | Conditional::IfNoneMatch(etag) if etag.is_empty() => {
                Err(ValidationErr::InvalidHeader {
                    name: self.header().0.to_string(),
                    reason: "empty ETag".into(),
                })
            }
            Conditional::Range { start, end } if start > end => Err(ValidationErr::InvalidHeader {
                name: RANGE.to_string(),
                reason: format!("start {start} is after end {end}"),
            }),
            _ => Ok(()),
        }
    }
}

/// Conditions on the source of a copy, sent as `x-amz-copy-source-if-*`
#[derive(Clone, Debug, PartialEq)]
pub enum CopyConditional {
    IfMatch(String),
    IfNoneMatch(String),
    IfModifiedSince(UtcTime),
    IfUnmodifiedSince(UtcTime),
}

impl CopyConditional {
    pub fn header(&self) -> (&'static str, String) {
        match self {
            CopyConditional::IfMatch(etag) => (X_AMZ_COPY_SOURCE_IF_MATCH, quote_etag(etag)),
            CopyConditional::IfNoneMatch(etag) => {
                (X_AMZ_COPY_SOURCE_IF_NONE_MATCH, quote_etag(etag))
            }
            CopyConditional::IfModifiedSince(t) => {
                (X_AMZ_COPY_SOURCE_IF_MODIFIED_SINCE, to_http_header_value(*t))
            }
            CopyConditional::IfUnmodifiedSince(t) => {
                (X_AMZ_COPY_SOURCE_IF_UNMODIFIED_SINCE, to_http_header_value(*t))
            }
        }
    }
}

fn quote_etag(etag: &str) -> String {
    format!("\"{}\"", trim_etag(etag))
}

#[derive(Clone, Debug)]
/// A response whose body has been read to the end
pub struct S3Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl S3Response {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// ETag with the surrounding quotes removed
    pub fn etag(&self) -> Option<String> {
        self.header(ETAG).map(trim_etag)
    }

    pub fn content_length(&self) -> Option<u64> {
        self.header(CONTENT_LENGTH).and_then(|v| v.trim().parse().ok())
    }

    pub fn last_modified(&self) -> Result<UtcTime, VerifyErr> {
        let value = self
            .header(LAST_MODIFIED)
            .ok_or_else(|| VerifyErr::MissingHeader(LAST_MODIFIED.into()))?;
        from_http_header_value(value).map_err(|_| VerifyErr::MalformedHeader {
            name: LAST_MODIFIED.into(),
            value: value.into(),
        })
    }

    pub fn error_response(&self) -> Result<S3ErrorResponse, VerifyErr> {
        S3ErrorResponse::new_from_body(&self.body)
    }
}
