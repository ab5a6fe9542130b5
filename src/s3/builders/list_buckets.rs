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

use crate::s3::error::ValidationErr;
use crate::s3::types::{RequestSpec, ToRequestSpec};
use http::Method;

/// Argument builder for the [ListBuckets](https://docs.aws.amazon.com/AmazonS3/latest/API/API_ListBuckets.html) S3 API operation.
#[derive(Clone, Debug, Default)]
pub struct ListBuckets;

impl ToRequestSpec for ListBuckets {
    fn to_request_spec(self) -> Result<RequestSpec, ValidationErr> {
        Ok(RequestSpec::builder().method(Method::GET).build())
    }
}
