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

use crate::s3::error::{Error, VerifyErr};
use crate::verify::checks::Read;
use crate::verify::expect::verify;
use crate::verify::fixture::ObjectMeta;
use crate::verify::test_case::RunContext;

/// HEADs every object and records the Last-Modified the server reports
pub async fn head_object(ctx: RunContext) -> Result<(), Error> {
    let objects = ctx.objects()?;
    ctx.fan_out(objects, |ctx, object| async move {
        let resp = Read::Head.send(&ctx, &object, None).await?;
        verify(&resp, &Read::Head.full(&object)?)?;
        ctx.fixtures.record_metadata(
            &object.bucket,
            &object.key,
            ObjectMeta {
                etag: resp.etag(),
                size: resp.content_length(),
                last_modified: Some(resp.last_modified()?),
            },
        );
        Ok(())
    })
    .await
}

/// Two HEADs of an unchanged object must report identical metadata
pub async fn head_object_idempotent(ctx: RunContext) -> Result<(), Error> {
    let objects = ctx.objects()?;
    ctx.fan_out(objects, |ctx, object| async move {
        let mut seen = Vec::with_capacity(2);
        for _ in 0..2 {
            let resp = Read::Head.send(&ctx, &object, None).await?;
            verify(&resp, &Read::Head.full(&object)?)?;
            seen.push((resp.etag(), resp.content_length(), resp.last_modified()?));
        }
        if seen[0] != seen[1] {
            return Err(VerifyErr::Mismatch(format!(
                "metadata of {object} changed between HEADs: {:?} then {:?}",
                seen[0], seen[1]
            ))
            .into());
        }
        if seen[0].2 != object.last_modified()? {
            return Err(VerifyErr::Mismatch(format!(
                "Last-Modified of {object} changed since it was recorded"
            ))
            .into());
        }
        Ok(())
    })
    .await
}
