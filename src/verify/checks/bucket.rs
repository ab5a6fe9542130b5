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

//! Bucket lifecycle checks

use crate::s3::builders::{GetBucketLocation, HeadBucket, ListBuckets, MakeBucket, RemoveBucket};
use crate::s3::error::{Error, FixtureErr, VerifyErr};
use crate::s3::error_response::S3ErrorCode;
use crate::s3::header_constants::LOCATION;
use crate::s3::response::{ListBucketsResult, LocationConstraint};
use crate::s3::types::RequestSpec;
use crate::s3::utils::{rand_bucket_name, utc_now};
use crate::verify::expect::{BodyExpectation, ExpectedOutcome, HeaderCheck, verify};
use crate::verify::fixture::BucketFixture;
use crate::verify::test_case::RunContext;
use http::{Method, StatusCode};

/// Upper-case name S3 must refuse
pub const INVALID_BUCKET_NAME: &str = "S3verify";
pub const INVALID_BUCKET_MESSAGE: &str = "The specified bucket is not valid.";

/// `Location` is `/<bucket>` for path-style endpoints, or a URL whose host
/// starts with the bucket name for virtual-host endpoints.
pub fn location_matches(location: &str, bucket: &str) -> bool {
    if location.trim_end_matches('/') == format!("/{bucket}") {
        return true;
    }
    location
        .split_once("://")
        .map(|(_, rest)| {
            rest.starts_with(&format!("{bucket}."))
                || rest.trim_end_matches('/').ends_with(&format!("/{bucket}"))
        })
        .unwrap_or(false)
}

pub async fn make_bucket(ctx: RunContext) -> Result<(), Error> {
    let name = rand_bucket_name();
    let region = ctx.config.region.clone();
    let resp = ctx
        .send(MakeBucket::new(&name).region(Some(region.clone())))
        .await?;
    // any 2xx means the bucket now exists
    if resp.status.is_success() {
        ctx.fixtures.put_bucket(BucketFixture {
            name: name.clone(),
            region,
            created_at: utc_now(),
        });
        log::info!("created bucket {name}");
    }
    verify(
        &resp,
        &ExpectedOutcome::success(StatusCode::OK)
            .header(HeaderCheck::Present(LOCATION))
            .body(BodyExpectation::Empty),
    )?;

    let location = resp.header(LOCATION).unwrap_or_default();
    if !location_matches(location, &name) {
        return Err(VerifyErr::HeaderMismatch {
            name: LOCATION.into(),
            expected: format!("/{name}"),
            actual: location.to_string(),
        }
        .into());
    }
    Ok(())
}

pub async fn make_bucket_invalid_name(ctx: RunContext) -> Result<(), Error> {
    let resp = ctx
        .send(
            MakeBucket::new(INVALID_BUCKET_NAME)
                .region(Some(ctx.config.region.clone()))
                .skip_name_check(true),
        )
        .await?;
    if resp.status.is_success() {
        log::warn!("server accepted bucket name {INVALID_BUCKET_NAME}; removing it");
        let spec = RequestSpec::builder()
            .method(Method::DELETE)
            .bucket(INVALID_BUCKET_NAME.to_string())
            .build();
        if let Err(e) = ctx.executor.send(&spec).await {
            log::warn!("could not remove bucket {INVALID_BUCKET_NAME}: {e}");
        }
    }
    verify(
        &resp,
        &ExpectedOutcome::failure(StatusCode::BAD_REQUEST, S3ErrorCode::InvalidBucketName)
            .message(INVALID_BUCKET_MESSAGE),
    )?;
    Ok(())
}

pub async fn head_bucket(ctx: RunContext) -> Result<(), Error> {
    let bucket = ctx.bucket()?;
    let resp = ctx.send(HeadBucket::new(&bucket.name)).await?;
    verify(
        &resp,
        &ExpectedOutcome::success(StatusCode::OK).body(BodyExpectation::Empty),
    )?;
    Ok(())
}

pub async fn head_bucket_missing(ctx: RunContext) -> Result<(), Error> {
    let resp = ctx.send(HeadBucket::new(&rand_bucket_name())).await?;
    verify(&resp, &ExpectedOutcome::status_only(StatusCode::NOT_FOUND))?;
    Ok(())
}

pub async fn get_bucket_location(ctx: RunContext) -> Result<(), Error> {
    let bucket = ctx.bucket()?;
    let region = bucket.region.clone();
    let resp = ctx.send(GetBucketLocation::new(&bucket.name)).await?;
    verify(
        &resp,
        &ExpectedOutcome::success(StatusCode::OK).body(BodyExpectation::parsed(
            move |c: &LocationConstraint| {
                if c.region() == region {
                    Ok(())
                } else {
                    Err(VerifyErr::Mismatch(format!(
                        "location constraint {:?} does not match region {region}",
                        c.region()
                    )))
                }
            },
        )),
    )?;
    Ok(())
}

pub async fn list_buckets(ctx: RunContext) -> Result<(), Error> {
    let names: Vec<String> = ctx.fixtures.buckets().into_iter().map(|b| b.name).collect();
    let resp = ctx.send(ListBuckets).await?;
    verify(
        &resp,
        &ExpectedOutcome::success(StatusCode::OK).body(BodyExpectation::parsed(
            move |r: &ListBucketsResult| match names.iter().find(|n| !r.contains(n)) {
                Some(n) => Err(VerifyErr::Mismatch(format!("bucket {n} is not listed"))),
                None => Ok(()),
            },
        )),
    )?;
    Ok(())
}

pub async fn remove_bucket(ctx: RunContext) -> Result<(), Error> {
    let bucket = ctx.bucket()?;
    let resp = ctx.send(RemoveBucket::new(&bucket.name)).await?;
    verify(
        &resp,
        &ExpectedOutcome::success(StatusCode::NO_CONTENT).body(BodyExpectation::Empty),
    )?;
    ctx.fixtures.remove_bucket(&bucket.name);
    log::info!("removed bucket {}", bucket.name);
    Ok(())
}

pub async fn remove_bucket_again(ctx: RunContext) -> Result<(), Error> {
    let bucket = ctx
        .fixtures
        .removed_buckets()
        .into_iter()
        .next()
        .ok_or_else(|| FixtureErr::NoSuchBucket("<none removed>".into()))?;
    let resp = ctx.send(RemoveBucket::new(&bucket.name)).await?;
    verify(
        &resp,
        &ExpectedOutcome::failure(StatusCode::NOT_FOUND, S3ErrorCode::NoSuchBucket),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_matches() {
        assert!(location_matches("/s3verify-test", "s3verify-test"));
        assert!(location_matches("/s3verify-test/", "s3verify-test"));
        assert!(location_matches(
            "http://s3verify-test.s3.amazonaws.com/",
            "s3verify-test"
        ));
        assert!(location_matches(
            "http://localhost:9000/s3verify-test",
            "s3verify-test"
        ));
        assert!(!location_matches("/other", "s3verify-test"));
        assert!(!location_matches("", "s3verify-test"));
    }
}
