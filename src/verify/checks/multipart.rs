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

//! Multipart upload checks: initiate, upload, list, complete and abort

use crate::s3::builders::{
    AbortMultipartUpload, CompleteMultipartUpload, CompletedPart, CreateMultipartUpload,
    ListMultipartUploads, ListParts, UploadPart,
};
use crate::s3::error::{Error, FixtureErr, VerifyErr};
use crate::s3::error_response::S3ErrorCode;
use crate::s3::header_constants::ETAG;
use crate::s3::response::{
    CompleteMultipartUploadResult, FromResponseBody, InitiateMultipartUploadResult,
    ListMultipartUploadsResult, ListPartsResult,
};
use crate::s3::utils::{TEST_PREFIX, rand_data, rand_object_name};
use crate::verify::checks::Read;
use crate::verify::expect::{BodyExpectation, ExpectedOutcome, HeaderCheck, verify};
use crate::verify::fixture::{ObjectFixture, ObjectMeta, UploadFixture, UploadedPart};
use crate::verify::test_case::RunContext;
use bytes::Bytes;
use http::StatusCode;
use rand::Rng;

/// One upload is completed, the other aborted
const UPLOAD_COUNT: usize = 2;

fn mismatch(what: &str, expected: &str, actual: &str) -> VerifyErr {
    VerifyErr::Mismatch(format!("{what} mismatch; expected: {expected}, got: {actual}"))
}

pub async fn create_multipart_upload(ctx: RunContext) -> Result<(), Error> {
    let bucket = ctx.bucket()?;
    let keys: Vec<String> = (0..UPLOAD_COUNT)
        .map(|_| rand_object_name("multipart"))
        .collect();
    ctx.fan_out(keys, move |ctx, key| {
        let bucket = bucket.name.clone();
        async move {
            let resp = ctx.send(CreateMultipartUpload::new(&bucket, &key)).await?;
            let (b, k) = (bucket.clone(), key.clone());
            verify(
                &resp,
                &ExpectedOutcome::success(StatusCode::OK).body(BodyExpectation::parsed(
                    move |r: &InitiateMultipartUploadResult| {
                        if r.bucket != b {
                            return Err(mismatch("bucket", &b, &r.bucket));
                        }
                        if r.key != k {
                            return Err(mismatch("key", &k, &r.key));
                        }
                        Ok(())
                    },
                )),
            )?;
            let result = InitiateMultipartUploadResult::from_body(&resp.body)?;
            ctx.fixtures.put_upload(UploadFixture {
                bucket,
                key,
                upload_id: result.upload_id,
                parts: Vec::new(),
            });
            Ok(())
        }
    })
    .await
}

pub async fn upload_part(ctx: RunContext) -> Result<(), Error> {
    let bucket = ctx.bucket()?;
    let max = ctx.config.max_object_size;
    let uploads = ctx.fixtures.uploads(&bucket.name);
    ctx.fan_out(uploads, move |ctx, upload| {
        let size = rand::rng().random_range(1..=max);
        async move {
            let body = Bytes::from(rand_data(size));
            let resp = ctx
                .send(UploadPart::new(
                    &upload.bucket,
                    &upload.key,
                    &upload.upload_id,
                    1,
                    body.clone(),
                ))
                .await?;
            verify(
                &resp,
                &ExpectedOutcome::success(StatusCode::OK)
                    .header(HeaderCheck::Present(ETAG))
                    .body(BodyExpectation::Empty),
            )?;
            let etag = resp
                .etag()
                .ok_or_else(|| VerifyErr::MissingHeader(ETAG.into()))?;
            ctx.fixtures.record_part(
                &upload.bucket,
                &upload.key,
                UploadedPart {
                    number: 1,
                    etag,
                    body,
                },
            );
            Ok(())
        }
    })
    .await
}

pub async fn list_parts(ctx: RunContext) -> Result<(), Error> {
    let bucket = ctx.bucket()?;
    let uploads = ctx.fixtures.uploads(&bucket.name);
    ctx.fan_out(uploads, |ctx, upload| async move {
        let resp = ctx
            .send(ListParts::new(&upload.bucket, &upload.key, &upload.upload_id))
            .await?;
        let expected = upload.clone();
        verify(
            &resp,
            &ExpectedOutcome::success(StatusCode::OK).body(BodyExpectation::parsed(
                move |r: &ListPartsResult| {
                    if r.upload_id != expected.upload_id {
                        return Err(mismatch("upload ID", &expected.upload_id, &r.upload_id));
                    }
                    if r.parts.len() != expected.parts.len() {
                        return Err(mismatch(
                            "part count",
                            &expected.parts.len().to_string(),
                            &r.parts.len().to_string(),
                        ));
                    }
                    for part in &expected.parts {
                        let listed = r
                            .parts
                            .iter()
                            .find(|p| p.part_number == part.number)
                            .ok_or_else(|| {
                                VerifyErr::Mismatch(format!("part {} is not listed", part.number))
                            })?;
                        if listed.etag != part.etag {
                            return Err(mismatch("part ETag", &part.etag, &listed.etag));
                        }
                        if listed.size != part.body.len() as u64 {
                            return Err(mismatch(
                                "part size",
                                &part.body.len().to_string(),
                                &listed.size.to_string(),
                            ));
                        }
                    }
                    Ok(())
                },
            )),
        )?;
        Ok(())
    })
    .await
}

pub async fn list_multipart_uploads(ctx: RunContext) -> Result<(), Error> {
    let bucket = ctx.bucket()?;
    let uploads = ctx.fixtures.uploads(&bucket.name);
    let resp = ctx
        .send(ListMultipartUploads::new(&bucket.name).prefix(Some(format!("{TEST_PREFIX}/"))))
        .await?;
    verify(
        &resp,
        &ExpectedOutcome::success(StatusCode::OK).body(BodyExpectation::parsed(
            move |r: &ListMultipartUploadsResult| {
                match uploads.iter().find(|u| !r.contains(&u.key, &u.upload_id)) {
                    Some(u) => Err(VerifyErr::Mismatch(format!(
                        "upload {} of {} is not listed",
                        u.upload_id, u.key
                    ))),
                    None => Ok(()),
                }
            },
        )),
    )?;
    Ok(())
}

/// Completes the first open upload and reads the assembled object back
pub async fn complete_multipart_upload(ctx: RunContext) -> Result<(), Error> {
    let bucket = ctx.bucket()?;
    let upload = ctx
        .fixtures
        .uploads(&bucket.name)
        .into_iter()
        .next()
        .ok_or_else(|| FixtureErr::NoSuchUpload {
            bucket: bucket.name.clone(),
            key: format!("{TEST_PREFIX}/multipart/"),
        })?;
    let parts = upload
        .parts
        .iter()
        .map(|p| CompletedPart {
            number: p.number,
            etag: p.etag.clone(),
        })
        .collect();

    let resp = ctx
        .send(CompleteMultipartUpload::new(
            &upload.bucket,
            &upload.key,
            &upload.upload_id,
            parts,
        ))
        .await?;
    let (b, k) = (upload.bucket.clone(), upload.key.clone());
    verify(
        &resp,
        &ExpectedOutcome::success(StatusCode::OK).body(BodyExpectation::parsed(
            move |r: &CompleteMultipartUploadResult| {
                if r.bucket != b {
                    return Err(mismatch("bucket", &b, &r.bucket));
                }
                if r.key != k {
                    return Err(mismatch("key", &k, &r.key));
                }
                if r.etag.is_empty() {
                    return Err(VerifyErr::Mismatch("completed upload has no ETag".into()));
                }
                Ok(())
            },
        )),
    )?;
    let result = CompleteMultipartUploadResult::from_body(&resp.body)?;
    ctx.fixtures.remove_upload(&upload.bucket, &upload.key);

    let body = upload.assembled_body();
    let object = ObjectFixture::new(&upload.bucket, &upload.key, body.clone()).with_meta(
        ObjectMeta {
            etag: Some(result.etag),
            size: Some(body.len() as u64),
            last_modified: None,
        },
    );
    ctx.fixtures.put_object(object.clone());

    let resp = Read::Get.send(&ctx, &object, None).await?;
    verify(
        &resp,
        &ExpectedOutcome::success(StatusCode::OK)
            .header(HeaderCheck::ETag(object.etag()?.to_string()))
            .body(BodyExpectation::Exact(body)),
    )?;
    if let Ok(lm) = resp.last_modified() {
        ctx.fixtures.record_metadata(
            &object.bucket,
            &object.key,
            ObjectMeta {
                last_modified: Some(lm),
                ..Default::default()
            },
        );
    }
    Ok(())
}

/// Aborts every remaining upload; its parts must then be gone
pub async fn abort_multipart_upload(ctx: RunContext) -> Result<(), Error> {
    let bucket = ctx.bucket()?;
    let uploads = ctx.fixtures.uploads(&bucket.name);
    if uploads.is_empty() {
        return Err(FixtureErr::NoSuchUpload {
            bucket: bucket.name,
            key: format!("{TEST_PREFIX}/multipart/"),
        }
        .into());
    }
    ctx.fan_out(uploads, |ctx, upload| async move {
        let resp = ctx
            .send(AbortMultipartUpload::new(
                &upload.bucket,
                &upload.key,
                &upload.upload_id,
            ))
            .await?;
        verify(
            &resp,
            &ExpectedOutcome::success(StatusCode::NO_CONTENT).body(BodyExpectation::Empty),
        )?;
        ctx.fixtures.remove_upload(&upload.bucket, &upload.key);

        let resp = ctx
            .send(ListParts::new(&upload.bucket, &upload.key, &upload.upload_id))
            .await?;
        verify(
            &resp,
            &ExpectedOutcome::failure(StatusCode::NOT_FOUND, S3ErrorCode::NoSuchUpload),
        )?;
        Ok(())
    })
    .await
}
