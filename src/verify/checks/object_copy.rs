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

use crate::s3::builders::CopyObject;
use crate::s3::error::{Error, VerifyErr};
use crate::s3::error_response::S3ErrorCode;
use crate::s3::response::{CopyObjectResult, FromResponseBody};
use crate::s3::types::CopyConditional;
use crate::s3::utils::rand_object_name;
use crate::verify::checks::{BOGUS_ETAG, PRECONDITION_MESSAGE, Variant};
use crate::verify::expect::{BodyExpectation, ExpectedOutcome, verify};
use crate::verify::fixture::{ObjectFixture, ObjectMeta};
use crate::verify::test_case::RunContext;
use chrono::Duration;
use http::StatusCode;

/// Copies `source` to a fresh key and, on success, registers the copy
async fn copy_to_new_key(
    ctx: &RunContext,
    source: &ObjectFixture,
    conditional: Option<CopyConditional>,
    expect_success: bool,
) -> Result<(), Error> {
    let key = rand_object_name("copy");
    let resp = ctx
        .send(
            CopyObject::new(&source.bucket, &key, &source.bucket, &source.key)
                .conditional(conditional),
        )
        .await?;

    let expected = if expect_success {
        let source_etag = source.etag()?.to_string();
        ExpectedOutcome::success(StatusCode::OK).body(BodyExpectation::parsed(
            move |r: &CopyObjectResult| {
                if r.etag == source_etag {
                    Ok(())
                } else {
                    Err(VerifyErr::Mismatch(format!(
                        "copy ETag {} differs from source ETag {source_etag}",
                        r.etag
                    )))
                }
            },
        ))
    } else {
        ExpectedOutcome::failure(StatusCode::PRECONDITION_FAILED, S3ErrorCode::PreconditionFailed)
            .message(PRECONDITION_MESSAGE)
    };

    if resp.status == StatusCode::OK
        && let Ok(result) = CopyObjectResult::from_body(&resp.body)
    {
        ctx.fixtures.put_object(
            ObjectFixture::new(&source.bucket, &key, source.body.clone()).with_meta(ObjectMeta {
                etag: Some(result.etag),
                size: Some(source.body.len() as u64),
                last_modified: Some(result.last_modified),
            }),
        );
    }
    verify(&resp, &expected)?;
    Ok(())
}

/// Plain server-side copy of every uploaded object
pub async fn copy_object(ctx: RunContext) -> Result<(), Error> {
    let sources = ctx.objects_of_kind("put")?;
    ctx.fan_out(sources, |ctx, source| async move {
        copy_to_new_key(&ctx, &source, None, true).await
    })
    .await
}

fn copy_cases(
    variant: Variant,
    source: &ObjectFixture,
) -> Result<Vec<(CopyConditional, bool)>, Error> {
    Ok(match variant {
        Variant::IfMatch => vec![
            (CopyConditional::IfMatch(source.etag()?.to_string()), true),
            (CopyConditional::IfMatch(BOGUS_ETAG.into()), false),
        ],
        Variant::IfNoneMatch => vec![
            (CopyConditional::IfNoneMatch(source.etag()?.to_string()), false),
            (CopyConditional::IfNoneMatch(BOGUS_ETAG.into()), true),
        ],
        Variant::IfModifiedSince => {
            let lm = source.last_modified()?;
            vec![
                (
                    CopyConditional::IfModifiedSince(lm + Duration::hours(2)),
                    false,
                ),
                (CopyConditional::IfModifiedSince(lm - Duration::days(1)), true),
            ]
        }
        Variant::IfUnmodifiedSince => {
            let lm = source.last_modified()?;
            vec![
                (
                    CopyConditional::IfUnmodifiedSince(lm - Duration::days(1)),
                    false,
                ),
                (
                    CopyConditional::IfUnmodifiedSince(lm + Duration::hours(2)),
                    true,
                ),
            ]
        }
    })
}

/// Copy with one `x-amz-copy-source-if-*` header; a failed condition must
/// be a 412 with the standard message
pub async fn copy_object_conditional(ctx: RunContext, variant: Variant) -> Result<(), Error> {
    let sources = ctx.objects_of_kind("put")?;
    ctx.fan_out(sources, move |ctx, source| async move {
        for (conditional, expect_success) in copy_cases(variant, &source)? {
            copy_to_new_key(&ctx, &source, Some(conditional), expect_success).await?;
        }
        Ok(())
    })
    .await
}
