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
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::types::{Conditional, RequestSpec, ToRequestSpec};
use crate::s3::utils::check_bucket_name;
use http::Method;

/// Argument builder for the [HeadObject](https://docs.aws.amazon.com/AmazonS3/latest/API/API_HeadObject.html) S3 API operation.
#[derive(Clone, Debug, Default)]
pub struct HeadObject {
    bucket: String,
    object: String,
    conditional: Option<Conditional>,
}

impl HeadObject {
    pub fn new(bucket: &str, object: &str) -> Self {
        Self {
            bucket: bucket.to_owned(),
            object: object.to_owned(),
            ..Default::default()
        }
    }

    pub fn conditional(mut self, conditional: Option<Conditional>) -> Self {
        self.conditional = conditional;
        self
    }
}

impl ToRequestSpec for HeadObject {
    fn to_request_spec(self) -> Result<RequestSpec, ValidationErr> {
        check_bucket_name(&self.bucket)?;
        check_object_name(&self.object)?;

        Ok(RequestSpec::builder()
            .method(Method::HEAD)
            .bucket(self.bucket)
            .object(self.object)
            .headers(conditional_headers(self.conditional.as_ref())?)
            .build())
    }
}

pub(crate) fn conditional_headers(
    conditional: Option<&Conditional>,
) -> Result<Multimap, ValidationErr> {
    let mut headers = Multimap::new();
    if let Some(c) = conditional {
        c.validate()?;
        let (name, value) = c.header();
        headers.add(name, value);
    }
    Ok(headers)
}
