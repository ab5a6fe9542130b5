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

use crate::s3::builders::RemoveObject;
use crate::s3::error::Error;
use crate::verify::checks::Read;
use crate::verify::expect::{BodyExpectation, ExpectedOutcome, verify};
use crate::verify::test_case::RunContext;
use http::StatusCode;

pub async fn remove_object(ctx: RunContext) -> Result<(), Error> {
    let objects = ctx.objects()?;
    ctx.fan_out(objects, |ctx, object| async move {
        let resp = ctx.send(RemoveObject::new(&object.bucket, &object.key)).await?;
        verify(
            &resp,
            &ExpectedOutcome::success(StatusCode::NO_CONTENT).body(BodyExpectation::Empty),
        )?;
        ctx.fixtures.remove_object(&object.bucket, &object.key);
        Ok(())
    })
    .await
}

/// Removed objects must be gone: GET answers 404 `NoSuchKey`
pub async fn get_removed_object(ctx: RunContext) -> Result<(), Error> {
    let bucket = ctx.bucket()?;
    let removed = ctx.fixtures.removed_objects_in(&bucket.name);
    ctx.fan_out(removed, |ctx, object| async move {
        let resp = Read::Get.send(&ctx, &object, None).await?;
        verify(&resp, &Read::Get.not_found())?;
        Ok(())
    })
    .await
}
