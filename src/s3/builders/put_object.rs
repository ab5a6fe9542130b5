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

use crate::s3::builders::check_object_name;
use crate::s3::error::ValidationErr;
use crate::s3::header_constants::{CONTENT_MD5, CONTENT_TYPE};
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::types::{RequestSpec, ToRequestSpec};
use crate::s3::utils::{check_bucket_name, md5sum_hash};
use bytes::Bytes;
use http::Method;

/// Argument builder for the [PutObject](https://docs.aws.amazon.com/AmazonS3/latest/API/API_PutObject.html) S3 API operation.
///
/// The body is sent in a single request with its `Content-MD5`.
#[derive(Clone, Debug, Default)]
pub struct PutObject {
    bucket: String,
    object: String,
    data: Bytes,
    content_type: Option<String>,
}

impl PutObject {
    pub fn new(bucket: &str, object: &str, data: impl Into<Bytes>) -> Self {
        Self {
            bucket: bucket.to_owned(),
            object: object.to_owned(),
            data: data.into(),
            ..Default::default()
        }
    }

    pub fn content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }
}

impl ToRequestSpec for PutObject {
    fn to_request_spec(self) -> Result<RequestSpec, ValidationErr> {
        check_bucket_name(&self.bucket)?;
        check_object_name(&self.object)?;

        let mut headers = Multimap::new();
        headers.add(CONTENT_MD5, md5sum_hash(&self.data));
        if let Some(v) = self.content_type {
            headers.add(CONTENT_TYPE, v);
        }

        Ok(RequestSpec::builder()
            .method(Method::PUT)
            .bucket(self.bucket)
            .object(self.object)
            .headers(headers)
            .body(self.data)
            .build())
    }
}
