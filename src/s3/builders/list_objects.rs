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
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::types::{RequestSpec, ToRequestSpec};
use crate::s3::utils::check_bucket_name;
use http::Method;

/// Argument builder for the [ListObjects](https://docs.aws.amazon.com/AmazonS3/latest/API/API_ListObjects.html)
/// and [ListObjectsV2](https://docs.aws.amazon.com/AmazonS3/latest/API/API_ListObjectsV2.html) S3 API operations.
#[derive(Clone, Debug, Default)]
pub struct ListObjects {
    bucket: String,
    prefix: Option<String>,
    delimiter: Option<String>,
    max_keys: Option<u16>,
    continuation: Option<String>,
    use_api_v1: bool,
}

impl ListObjects {
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_owned(),
            ..Default::default()
        }
    }

    pub fn prefix(mut self, prefix: Option<String>) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn delimiter(mut self, delimiter: Option<String>) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn max_keys(mut self, max_keys: Option<u16>) -> Self {
        self.max_keys = max_keys;
        self
    }

    /// Marker for V1, continuation token for V2
    pub fn continuation(mut self, token: Option<String>) -> Self {
        self.continuation = token;
        self
    }

    pub fn use_api_v1(mut self, v1: bool) -> Self {
        self.use_api_v1 = v1;
        self
    }
}

impl ToRequestSpec for ListObjects {
    fn to_request_spec(self) -> Result<RequestSpec, ValidationErr> {
        check_bucket_name(&self.bucket)?;

        let mut query_params = Multimap::new();
        if !self.use_api_v1 {
            query_params.add("list-type", "2");
        }
        if let Some(v) = self.prefix {
            query_params.add("prefix", v);
        }
        if let Some(v) = self.delimiter {
            query_params.add("delimiter", v);
        }
        if let Some(v) = self.max_keys {
            query_params.add("max-keys", v.to_string());
        }
        if let Some(v) = self.continuation {
            let key = if self.use_api_v1 {
                "marker"
            } else {
                "continuation-token"
            };
            query_params.add(key, v);
        }

        Ok(RequestSpec::builder()
            .method(Method::GET)
            .bucket(self.bucket)
            .query_params(query_params)
            .build())
    }
}
