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

use crate::s3::builders::PutObject;
use crate::s3::error::{Error, VerifyErr};
use crate::s3::header_constants::ETAG;
use crate::s3::utils::{rand_data, rand_object_name};
use crate::verify::expect::{BodyExpectation, ExpectedOutcome, HeaderCheck, verify};
use crate::verify::fixture::{ObjectFixture, ObjectMeta};
use crate::verify::test_case::RunContext;
use http::StatusCode;
use rand::Rng;

/// Uploads `object_count` objects of random size and records their ETags
pub async fn put_object(ctx: RunContext) -> Result<(), Error> {
    let bucket = ctx.bucket()?;
    let max = ctx.config.max_object_size;
    let objects: Vec<ObjectFixture> = {
        let mut rng = rand::rng();
        (0..ctx.config.object_count)
            .map(|_| {
                let size = rng.random_range(1..=max);
                ObjectFixture::new(&bucket.name, &rand_object_name("put"), rand_data(size))
            })
            .collect()
    };

    ctx.fan_out(objects, |ctx, object| async move {
        let resp = ctx
            .send(PutObject::new(&object.bucket, &object.key, object.body.clone()))
            .await?;
        verify(
            &resp,
            &ExpectedOutcome::success(StatusCode::OK)
                .header(HeaderCheck::Present(ETAG))
                .body(BodyExpectation::Empty),
        )?;
        let etag = resp
            .etag()
            .filter(|e| !e.is_empty())
            .ok_or_else(|| VerifyErr::MissingHeader(ETAG.into()))?;
        let size = object.body.len() as u64;
        ctx.fixtures.put_object(object.with_meta(ObjectMeta {
            etag: Some(etag),
            size: Some(size),
            last_modified: None,
        }));
        Ok(())
    })
    .await
}
