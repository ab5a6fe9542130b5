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
use crate::s3::utils::{UtcTime, from_iso8601utc, get_text, get_text_option};
use bytes::Bytes;

#[derive(Clone, Debug, PartialEq)]
pub struct BucketInfo {
    pub name: String,
    pub creation_date: UtcTime,
}

/// Body of a ListBuckets response
#[derive(Clone, Debug, PartialEq)]
pub struct ListBucketsResult {
    pub owner_id: Option<String>,
    pub buckets: Vec<BucketInfo>,
}

impl ListBucketsResult {
    pub fn contains(&self, name: &str) -> bool {
        self.buckets.iter().any(|b| b.name == name)
    }
}

impl FromResponseBody for ListBucketsResult {
    fn from_body(body: &Bytes) -> Result<Self, VerifyErr> {
        let root = parse_root(body, "ListAllMyBucketsResult")?;
        let owner_id = root
            .get_child("Owner")
            .and_then(|o| get_text_option(o, "ID"));
        let buckets = root
            .get_child("Buckets")
            .ok_or_else(|| VerifyErr::MalformedBody("<Buckets> tag not found".into()))?;

        let buckets = children(buckets, "Bucket")
            .map(|b| {
                Ok(BucketInfo {
                    name: get_text(b, "Name")?,
                    creation_date: from_iso8601utc(&get_text(b, "CreationDate")?)?,
                })
            })
            .collect::<Result<Vec<_>, VerifyErr>>()?;

        Ok(ListBucketsResult { owner_id, buckets })
    }
}
