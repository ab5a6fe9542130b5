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
use crate::s3::response::{FromResponseBody, children, parse_root};
use crate::s3::utils::{UtcTime, from_iso8601utc, get_text, get_text_option, trim_etag};
use bytes::Bytes;

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectEntry {
    pub key: String,
    pub last_modified: UtcTime,
    pub etag: String,
    pub size: u64,
}

/// Body of a ListObjects (V1) or ListObjectsV2 response
#[derive(Clone, Debug, PartialEq)]
pub struct ListObjectsResult {
    pub name: String,
    pub prefix: String,
    pub is_truncated: bool,
    /// `NextMarker` for V1, `NextContinuationToken` for V2
    pub next_token: Option<String>,
    /// Only sent by V2
    pub key_count: Option<u64>,
    pub contents: Vec<ObjectEntry>,
}

impl ListObjectsResult {
    pub fn entry(&self, key: &str) -> Option<&ObjectEntry> {
        self.contents.iter().find(|e| e.key == key)
    }
}

impl FromResponseBody for ListObjectsResult {
    fn from_body(body: &Bytes) -> Result<Self, VerifyErr> {
        let root = parse_root(body, "ListBucketResult")?;

        let contents = children(&root, "Contents")
            .map(|c| {
                Ok(ObjectEntry {
                    key: get_text(c, "Key")?,
                    last_modified: from_iso8601utc(&get_text(c, "LastModified")?)?,
                    etag: trim_etag(&get_text(c, "ETag")?),
                    size: get_text(c, "Size")?.parse()?,
                })
            })
            .collect::<Result<Vec<_>, VerifyErr>>()?;

        let is_truncated = get_text_option(&root, "IsTruncated")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let next_token = get_text_option(&root, "NextContinuationToken")
            .or_else(|| get_text_option(&root, "NextMarker"));
        let key_count = get_text_option(&root, "KeyCount")
            .map(|v| v.parse())
            .transpose()?;

        Ok(ListObjectsResult {
            name: get_text(&root, "Name")?,
            prefix: get_text_option(&root, "Prefix").unwrap_or_default(),
            is_truncated,
            next_token,
            key_count,
            contents,
        })
    }
}
