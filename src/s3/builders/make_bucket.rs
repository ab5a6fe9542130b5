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

use crate::s3::client::DEFAULT_REGION;
use crate::s3::error::ValidationErr;
use crate::s3::types::{RequestSpec, ToRequestSpec};
use crate::s3::utils::check_bucket_name;
use bytes::Bytes;
use http::Method;

/// Argument builder for the [CreateBucket](https://docs.aws.amazon.com/AmazonS3/latest/API/API_CreateBucket.html) S3 API operation.
#[derive(Clone, Debug, Default)]
pub struct MakeBucket {
    bucket: String,
    region: Option<String>,
    skip_name_check: bool,
}

impl MakeBucket {
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_owned(),
            ..Default::default()
        }
    }

    pub fn region(mut self, region: Option<String>) -> Self {
        self.region = region;
        self
    }

    /// Sends the name as-is; used to probe the server's own name validation
    pub fn skip_name_check(mut self, skip: bool) -> Self {
        self.skip_name_check = skip;
        self
    }
}

impl ToRequestSpec for MakeBucket {
    fn to_request_spec(self) -> Result<RequestSpec, ValidationErr> {
        if !self.skip_name_check {
            check_bucket_name(&self.bucket)?;
        }

        let body = match self.region.as_deref() {
            Some(r) if !r.is_empty() && r != DEFAULT_REGION => Bytes::from(format!(
                "<CreateBucketConfiguration><LocationConstraint>{r}</LocationConstraint></CreateBucketConfiguration>"
            )),
            _ => Bytes::new(),
        };

        Ok(RequestSpec::builder()
            .method(Method::PUT)
            .bucket(self.bucket)
            .body(body)
            .build())
    }
}
