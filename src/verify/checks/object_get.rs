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

use crate::s3::error::{Error, ValidationErr};
use crate::s3::header_constants::{CONTENT_RANGE, ETAG};
use crate::s3::types::Conditional;
use crate::verify::checks::Read;
use crate::verify::expect::{BodyExpectation, ExpectedOutcome, HeaderCheck, verify};
use crate::verify::test_case::RunContext;
use bytes::Bytes;
use http::StatusCode;
use rand::Rng;

/// GETs every object and compares the body byte for byte
pub async fn get_object(ctx: RunContext) -> Result<(), Error> {
    let objects = ctx.objects()?;
    ctx.fan_out(objects, |ctx, object| async move {
        let resp = Read::Get.send(&ctx, &object, None).await?;
        verify(&resp, &Read::Get.full(&object)?)?;
        Ok(())
    })
    .await
}

/// `body[start..=end]`, the bytes an inclusive HTTP range selects
pub fn range_slice(body: &Bytes, start: u64, end: u64) -> Result<Bytes, ValidationErr> {
    let size = body.len() as u64;
    if start > end || end >= size {
        return Err(ValidationErr::InvalidRange { start, end, size });
    }
    Ok(body.slice(start as usize..=end as usize))
}

/// Picks `0 <= start <= end < size`
fn random_range(size: u64) -> Result<(u64, u64), ValidationErr> {
    if size == 0 {
        return Err(ValidationErr::InvalidRange {
            start: 0,
            end: 0,
            size,
        });
    }
    let mut rng = rand::rng();
    let start = rng.random_range(0..size);
    let end = rng.random_range(start..size);
    Ok((start, end))
}

pub async fn get_object_range(ctx: RunContext) -> Result<(), Error> {
    let objects = ctx.objects()?;
    ctx.fan_out(objects, |ctx, object| async move {
        let size = object.size()?;
        let (start, end) = random_range(size)?;
        let expected = ExpectedOutcome::success(StatusCode::PARTIAL_CONTENT)
            .header(HeaderCheck::ContentLength(end - start + 1))
            .header(HeaderCheck::Equals(
                CONTENT_RANGE,
                format!("bytes {start}-{end}/{size}"),
            ))
            .header(HeaderCheck::Present(ETAG))
            .body(BodyExpectation::Exact(range_slice(&object.body, start, end)?));
        let resp = Read::Get
            .send(&ctx, &object, Some(Conditional::Range { start, end }))
            .await?;
        verify(&resp, &expected)?;
        Ok(())
    })
    .await
}
