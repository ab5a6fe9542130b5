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

use crate::s3::error::VerifyErr;
use crate::s3::response::{FromResponseBody, parse_root};
use crate::s3::utils::{UtcTime, from_iso8601utc, get_text, trim_etag};
use bytes::Bytes;

/// Body of a successful CopyObject response
#[derive(Clone, Debug, PartialEq)]
pub struct CopyObjectResult {
    pub etag: String,
    pub last_modified: UtcTime,
}

impl FromResponseBody for CopyObjectResult {
    fn from_body(body: &Bytes) -> Result<Self, VerifyErr> {
        let root = parse_root(body, "CopyObjectResult")?;
        Ok(CopyObjectResult {
            etag: trim_etag(&get_text(&root, "ETag")?),
            last_modified: from_iso8601utc(&get_text(&root, "LastModified")?)?,
        })
    }
}
