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
use crate::s3::error::VerifyErr;
use crate::s3::response::{FromResponseBody, parse_root};
use bytes::Bytes;

/// Body of a GetBucketLocation response. An empty constraint means `us-east-1`.
#[derive(Clone, Debug, PartialEq)]
pub struct LocationConstraint(pub String);

impl LocationConstraint {
    pub fn region(&self) -> &str {
        if self.0.is_empty() {
            DEFAULT_REGION
        } else {
            &self.0
        }
    }
}

impl FromResponseBody for LocationConstraint {
    fn from_body(body: &Bytes) -> Result<Self, VerifyErr> {
        let root = parse_root(body, "LocationConstraint")?;
        Ok(LocationConstraint(
            root.get_text().map(|t| t.to_string()).unwrap_or_default(),
        ))
    }
}
