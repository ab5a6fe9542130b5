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

//! The checks behind every catalog entry, grouped by operation

pub mod bucket;
pub mod cleanup;
pub mod multipart;
pub mod object_copy;
pub mod object_get;
pub mod object_head;
pub mod object_list;
pub mod object_put;
pub mod object_remove;

use crate::s3::builders::{GetObject, HeadObject};
use crate::s3::error::{Error, ValidationErr};
use crate::s3::error_response::S3ErrorCode;
use crate::s3::header_constants::LAST_MODIFIED;
use crate::s3::types::{Conditional, S3Response};
use crate::s3::utils::{UtcTime, rand_object_name};
use crate::verify::expect::{BodyExpectation, ExpectedOutcome, HeaderCheck, verify};
use crate::verify::fixture::ObjectFixture;
use crate::verify::test_case::RunContext;
use bytes::Bytes;
use chrono::Duration;
use http::StatusCode;

/// ETag no real object carries
pub const BOGUS_ETAG: &str = "1234567890";

/// Message S3 sends with every failed copy precondition
pub const PRECONDITION_MESSAGE: &str =
    "At least one of the pre-conditions you specified did not hold";

/// How an object is read
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Read {
    Head,
    Get,
}

impl Read {
    pub async fn send(
        self,
        ctx: &RunContext,
        object: &ObjectFixture,
        conditional: Option<Conditional>,
    ) -> Result<S3Response, Error> {
        match self {
            Read::Head => {
                ctx.send(HeadObject::new(&object.bucket, &object.key).conditional(conditional))
                    .await
            }
            Read::Get => {
                ctx.send(GetObject::new(&object.bucket, &object.key).conditional(conditional))
                    .await
            }
        }
    }

    /// Full 200 response for `object`: metadata headers and, for GET, the body
    pub fn full(self, object: &ObjectFixture) -> Result<ExpectedOutcome, ValidationErr> {
        let expected = ExpectedOutcome::success(StatusCode::OK)
            .header(HeaderCheck::ETag(object.etag()?.to_string()))
            .header(HeaderCheck::ContentLength(object.size()?))
            .header(HeaderCheck::HttpDate(LAST_MODIFIED));
        Ok(match self {
            Read::Head => expected.body(BodyExpectation::Empty),
            Read::Get => expected.body(BodyExpectation::Exact(object.body.clone())),
        })
    }

    pub fn not_found(self) -> ExpectedOutcome {
        match self {
            Read::Head => ExpectedOutcome::status_only(StatusCode::NOT_FOUND),
            Read::Get => ExpectedOutcome::failure(StatusCode::NOT_FOUND, S3ErrorCode::NoSuchKey),
        }
    }

    pub fn precondition_failed(self) -> ExpectedOutcome {
        match self {
            Read::Head => ExpectedOutcome::status_only(StatusCode::PRECONDITION_FAILED),
            Read::Get => ExpectedOutcome::failure(
                StatusCode::PRECONDITION_FAILED,
                S3ErrorCode::PreconditionFailed,
            ),
        }
    }
}

/// The outcome a conditional request should produce
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expect {
    Full,
    NotModified,
    PreconditionFailed,
}

/// The four conditional header families
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    IfMatch,
    IfNoneMatch,
    IfModifiedSince,
    IfUnmodifiedSince,
}

impl Variant {
    /// One matching and one non-matching request for `object`
    pub fn cases(self, object: &ObjectFixture) -> Result<Vec<(Conditional, Expect)>, ValidationErr> {
        Ok(match self {
            Variant::IfMatch => vec![
                (Conditional::IfMatch(object.etag()?.to_string()), Expect::Full),
                (
                    Conditional::IfMatch(BOGUS_ETAG.into()),
                    Expect::PreconditionFailed,
                ),
            ],
            Variant::IfNoneMatch => vec![
                (
                    Conditional::IfNoneMatch(object.etag()?.to_string()),
                    Expect::NotModified,
                ),
                (Conditional::IfNoneMatch(BOGUS_ETAG.into()), Expect::Full),
            ],
            Variant::IfModifiedSince => {
                let (before, after) = around(object)?;
                vec![
                    (Conditional::IfModifiedSince(after), Expect::NotModified),
                    (Conditional::IfModifiedSince(before), Expect::Full),
                ]
            }
            Variant::IfUnmodifiedSince => {
                let (before, after) = around(object)?;
                vec![
                    (
                        Conditional::IfUnmodifiedSince(before),
                        Expect::PreconditionFailed,
                    ),
                    (Conditional::IfUnmodifiedSince(after), Expect::Full),
                ]
            }
        })
    }
}

/// A day before and two hours after the object's Last-Modified
fn around(object: &ObjectFixture) -> Result<(UtcTime, UtcTime), ValidationErr> {
    let lm = object.last_modified()?;
    Ok((lm - Duration::days(1), lm + Duration::hours(2)))
}

/// Sends every case of `variant` for every object with `read`
pub async fn conditional_read(ctx: RunContext, read: Read, variant: Variant) -> Result<(), Error> {
    let objects = ctx.objects()?;
    ctx.fan_out(objects, move |ctx, object| async move {
        for (conditional, expect) in variant.cases(&object)? {
            let expected = match expect {
                Expect::Full => read.full(&object)?,
                Expect::NotModified => ExpectedOutcome::not_modified()
                    .header(HeaderCheck::ETag(object.etag()?.to_string())),
                Expect::PreconditionFailed => read.precondition_failed(),
            };
            let resp = read.send(&ctx, &object, Some(conditional)).await?;
            verify(&resp, &expected)?;
        }
        Ok(())
    })
    .await
}

/// Reads a key that was never written
pub async fn missing_read(ctx: RunContext, read: Read) -> Result<(), Error> {
    let bucket = ctx.bucket()?;
    let object = ObjectFixture::new(
        &bucket.name,
        &rand_object_name("missing"),
        Bytes::new(),
    );
    let resp = read.send(&ctx, &object, None).await?;
    verify(&resp, &read.not_found())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::fixture::ObjectMeta;
    use chrono::{TimeZone, Utc};

    fn object() -> ObjectFixture {
        ObjectFixture::new("b", "k", Bytes::from_static(b"hello")).with_meta(ObjectMeta {
            etag: Some("abc".into()),
            size: Some(5),
            last_modified: Some(Utc.with_ymd_and_hms(2020, 1, 1, 12, 0, 0).unwrap()),
        })
    }

    #[test]
    fn test_cases_use_one_header_each() {
        for v in [
            Variant::IfMatch,
            Variant::IfNoneMatch,
            Variant::IfModifiedSince,
            Variant::IfUnmodifiedSince,
        ] {
            let cases = v.cases(&object()).unwrap();
            assert_eq!(cases.len(), 2);
            assert!(cases.iter().any(|(_, e)| *e == Expect::Full));
        }
    }

    #[test]
    fn test_if_modified_since_uses_future_date_for_not_modified() {
        let cases = Variant::IfModifiedSince.cases(&object()).unwrap();
        assert_eq!(
            cases[0],
            (
                Conditional::IfModifiedSince(Utc.with_ymd_and_hms(2020, 1, 1, 14, 0, 0).unwrap()),
                Expect::NotModified
            )
        );
    }

    #[test]
    fn test_cases_need_metadata() {
        let bare = ObjectFixture::new("b", "k", Bytes::new());
        assert!(matches!(
            Variant::IfMatch.cases(&bare),
            Err(ValidationErr::MissingFixtureField { field: "ETag", .. })
        ));
        assert!(Variant::IfUnmodifiedSince.cases(&bare).is_err());
        assert!(Read::Get.full(&bare).is_err());
    }
}
