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

//! Best-effort removal of everything a run created

use crate::s3::S3Executor;
use crate::s3::builders::{
    AbortMultipartUpload, ListMultipartUploads, ListObjects, RemoveBucket, RemoveObject,
};
use crate::s3::error::{Error, FixtureErr};
use crate::s3::response::{FromResponseBody, ListMultipartUploadsResult, ListObjectsResult};
use crate::s3::types::{S3Response, ToRequestSpec};
use crate::s3::utils::TEST_PREFIX;
use http::StatusCode;
use std::time::Duration;

pub const CLEANUP_TIMEOUT: Duration = Duration::from_secs(60);

const MAX_ROUNDS: usize = 1000;

fn cleanup_err(bucket: &str, reason: impl ToString) -> Error {
    FixtureErr::Cleanup {
        bucket: bucket.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

async fn send_ok<B: ToRequestSpec>(
    executor: &S3Executor,
    bucket: &str,
    builder: B,
    accepted: &[StatusCode],
) -> Result<S3Response, Error> {
    let spec = builder.to_request_spec()?;
    let resp = executor.send(&spec).await?;
    if !accepted.contains(&resp.status) {
        let reason = match resp.error_response() {
            Ok(e) => format!("{} {} {}", spec.method(), resp.status, e.code()),
            Err(_) => format!("{} {}", spec.method(), resp.status),
        };
        return Err(cleanup_err(bucket, reason));
    }
    Ok(resp)
}

/// Aborts uploads and deletes objects under the test prefix, then deletes
/// the bucket. A bucket that is already gone counts as cleaned.
pub async fn purge_bucket(executor: &S3Executor, bucket: &str) -> Result<(), Error> {
    let prefix = format!("{TEST_PREFIX}/");

    for _ in 0..MAX_ROUNDS {
        let resp = send_ok(
            executor,
            bucket,
            ListMultipartUploads::new(bucket).prefix(Some(prefix.clone())),
            &[StatusCode::OK, StatusCode::NOT_FOUND],
        )
        .await?;
        if resp.status == StatusCode::NOT_FOUND {
            return Ok(());
        }
        let listing = ListMultipartUploadsResult::from_body(&resp.body)
            .map_err(|e| cleanup_err(bucket, e))?;
        for u in &listing.uploads {
            send_ok(
                executor,
                bucket,
                AbortMultipartUpload::new(bucket, &u.key, &u.upload_id),
                &[StatusCode::NO_CONTENT, StatusCode::NOT_FOUND],
            )
            .await?;
        }
        if !listing.is_truncated || listing.uploads.is_empty() {
            break;
        }
    }

    for _ in 0..MAX_ROUNDS {
        let resp = send_ok(
            executor,
            bucket,
            ListObjects::new(bucket).prefix(Some(prefix.clone())),
            &[StatusCode::OK],
        )
        .await?;
        let listing =
            ListObjectsResult::from_body(&resp.body).map_err(|e| cleanup_err(bucket, e))?;
        for o in &listing.contents {
            send_ok(
                executor,
                bucket,
                RemoveObject::new(bucket, &o.key),
                &[StatusCode::NO_CONTENT, StatusCode::OK, StatusCode::NOT_FOUND],
            )
            .await?;
        }
        // each round deletes the first page, so the next listing starts over
        if !listing.is_truncated || listing.contents.is_empty() {
            break;
        }
    }

    send_ok(
        executor,
        bucket,
        RemoveBucket::new(bucket),
        &[StatusCode::NO_CONTENT, StatusCode::NOT_FOUND],
    )
    .await?;
    Ok(())
}

/// [`purge_bucket`] bounded by [`CLEANUP_TIMEOUT`]
pub async fn cleanup(executor: &S3Executor, bucket: &str) -> Result<(), Error> {
    tokio::select! {
        _ = tokio::time::sleep(CLEANUP_TIMEOUT) => {
            Err(FixtureErr::CleanupTimeout(bucket.to_string()).into())
        }
        outcome = purge_bucket(executor, bucket) => outcome,
    }
}
