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
use crate::s3::header_constants::X_AMZ_COPY_SOURCE;
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::types::{CopyConditional, RequestSpec, ToRequestSpec};
use crate::s3::utils::{check_bucket_name, urlencode_object_key};
use http::Method;

/// Argument builder for the [CopyObject](https://docs.aws.amazon.com/AmazonS3/latest/API/API_CopyObject.html) S3 API operation.
#[derive(Clone, Debug, Default)]
pub struct CopyObject {
    bucket: String,
    object: String,
    source_bucket: String,
    source_object: String,
    conditional: Option<CopyConditional>,
}

impl CopyObject {
    pub fn new(bucket: &str, object: &str, source_bucket: &str, source_object: &str) -> Self {
        Self {
            bucket: bucket.to_owned(),
            object: object.to_owned(),
            source_bucket: source_bucket.to_owned(),
            source_object: source_object.to_owned(),
            ..Default::default()
        }
    }

    pub fn conditional(mut self, conditional: Option<CopyConditional>) -> Self {
        self.conditional = conditional;
        self
    }
}

impl ToRequestSpec for CopyObject {
    fn to_request_spec(self) -> Result<RequestSpec, ValidationErr> {
        check_bucket_name(&self.bucket)?;
        check_object_name(&self.object)?;
        check_bucket_name(&self.source_bucket)?;
        check_object_name(&self.source_object)?;

        let mut headers = Multimap::new();
        headers.add(
            X_AMZ_COPY_SOURCE,
            format!(
                "/{}/{}",
                self.source_bucket,
                urlencode_object_key(&self.source_object)
            ),
        );
        if let Some(c) = &self.conditional {
            let (name, value) = c.header();
            headers.add(name, value);
        }

        Ok(RequestSpec::builder()
            .method(Method::PUT)
            .bucket(self.bucket)
            .object(self.object)
            .headers(headers)
            .build())
    }
}
