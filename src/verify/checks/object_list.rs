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

use crate::s3::builders::ListObjects;
use crate::s3::error::{Error, VerifyErr};
use crate::s3::response::{FromResponseBody, ListObjectsResult, ObjectEntry};
use crate::s3::utils::TEST_PREFIX;
use crate::verify::expect::{BodyExpectation, ExpectedOutcome, verify};
use crate::verify::test_case::RunContext;
use http::StatusCode;

/// Safety valve against a server that never stops reporting truncation
const MAX_PAGES: usize = 1000;

async fn list_all(
    ctx: &RunContext,
    bucket: &str,
    use_api_v1: bool,
) -> Result<Vec<ObjectEntry>, Error> {
    let mut entries = Vec::new();
    let mut token: Option<String> = None;
    for _ in 0..MAX_PAGES {
        let resp = ctx
            .send(
                ListObjects::new(bucket)
                    .prefix(Some(format!("{TEST_PREFIX}/")))
                    .continuation(token.clone())
                    .use_api_v1(use_api_v1),
            )
            .await?;
        let name = bucket.to_string();
        verify(
            &resp,
            &ExpectedOutcome::success(StatusCode::OK).body(BodyExpectation::parsed(
                move |r: &ListObjectsResult| {
                    if r.name == name {
                        Ok(())
                    } else {
                        Err(VerifyErr::Mismatch(format!(
                            "listing names bucket {}, expected {name}",
                            r.name
                        )))
                    }
                },
            )),
        )?;
        let page = ListObjectsResult::from_body(&resp.body)?;
        let last_key = page.contents.last().map(|e| e.key.clone());
        entries.extend(page.contents);
        if !page.is_truncated {
            return Ok(entries);
        }
        // V1 without a delimiter omits NextMarker; the last key is the marker
        token = match (page.next_token, use_api_v1) {
            (Some(t), _) => Some(t),
            (None, true) => last_key,
            (None, false) => None,
        };
        if token.is_none() {
            return Err(VerifyErr::MalformedBody(
                "truncated listing carries no continuation".into(),
            )
            .into());
        }
    }
    Err(VerifyErr::Mismatch(format!("listing did not finish after {MAX_PAGES} pages")).into())
}

/// Every object fixture must be listed with its size and ETag
pub async fn list_objects(ctx: RunContext, use_api_v1: bool) -> Result<(), Error> {
    let bucket = ctx.bucket()?;
    let entries = list_all(&ctx, &bucket.name, use_api_v1).await?;
    for object in ctx.objects()? {
        let entry = entries
            .iter()
            .find(|e| e.key == object.key)
            .ok_or_else(|| VerifyErr::Mismatch(format!("{object} is not listed")))?;
        if entry.size != object.size()? {
            return Err(VerifyErr::Mismatch(format!(
                "{object} listed with size {}, expected {}",
                entry.size,
                object.size()?
            ))
            .into());
        }
        if entry.etag != object.etag()? {
            return Err(VerifyErr::Mismatch(format!(
                "{object} listed with ETag {}, expected {}",
                entry.etag,
                object.etag()?
            ))
            .into());
        }
    }
    Ok(())
}
