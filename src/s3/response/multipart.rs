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

/// Body of a CreateMultipartUpload response
#[derive(Clone, Debug, PartialEq)]
pub struct InitiateMultipartUploadResult {
    pub bucket: String,
    pub key: String,
    pub upload_id: String,
}

impl FromResponseBody for InitiateMultipartUploadResult {
    fn from_body(body: &Bytes) -> Result<Self, VerifyErr> {
        let root = parse_root(body, "InitiateMultipartUploadResult")?;
        let upload_id = get_text(&root, "UploadId")?;
        if upload_id.is_empty() {
            return Err(VerifyErr::MalformedBody("empty <UploadId>".into()));
        }
        Ok(Self {
            bucket: get_text(&root, "Bucket")?,
            key: get_text(&root, "Key")?,
            upload_id,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PartInfo {
    pub part_number: u16,
    pub etag: String,
    pub size: u64,
    pub last_modified: Option<UtcTime>,
}

/// Body of a ListParts response
#[derive(Clone, Debug, PartialEq)]
pub struct ListPartsResult {
    pub bucket: String,
    pub key: String,
    pub upload_id: String,
    pub is_truncated: bool,
    pub parts: Vec<PartInfo>,
}

impl FromResponseBody for ListPartsResult {
    fn from_body(body: &Bytes) -> Result<Self, VerifyErr> {
        let root = parse_root(body, "ListPartsResult")?;
        let parts = children(&root, "Part")
            .map(|p| {
                Ok(PartInfo {
                    part_number: get_text(p, "PartNumber")?.parse()?,
                    etag: trim_etag(&get_text(p, "ETag")?),
                    size: get_text(p, "Size")?.parse()?,
                    last_modified: get_text_option(p, "LastModified")
                        .map(|v| from_iso8601utc(&v))
                        .transpose()?,
                })
            })
            .collect::<Result<Vec<_>, VerifyErr>>()?;

        Ok(Self {
            bucket: get_text(&root, "Bucket")?,
            key: get_text(&root, "Key")?,
            upload_id: get_text(&root, "UploadId")?,
            is_truncated: get_text_option(&root, "IsTruncated")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            parts,
        })
    }
}

/// Body of a CompleteMultipartUpload response
#[derive(Clone, Debug, PartialEq)]
pub struct CompleteMultipartUploadResult {
    pub location: Option<String>,
    pub bucket: String,
    pub key: String,
    pub etag: String,
}

impl FromResponseBody for CompleteMultipartUploadResult {
    fn from_body(body: &Bytes) -> Result<Self, VerifyErr> {
        let root = parse_root(body, "CompleteMultipartUploadResult")?;
        Ok(Self {
            location: get_text_option(&root, "Location"),
            bucket: get_text(&root, "Bucket")?,
            key: get_text(&root, "Key")?,
            etag: trim_etag(&get_text(&root, "ETag")?),
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UploadEntry {
    pub key: String,
    pub upload_id: String,
    pub initiated: Option<UtcTime>,
}

/// Body of a ListMultipartUploads response
#[derive(Clone, Debug, PartialEq)]
pub struct ListMultipartUploadsResult {
    pub bucket: String,
    pub is_truncated: bool,
    pub uploads: Vec<UploadEntry>,
}

impl ListMultipartUploadsResult {
    pub fn contains(&self, key: &str, upload_id: &str) -> bool {
        self.uploads
            .iter()
            .any(|u| u.key == key && u.upload_id == upload_id)
    }
}

impl FromResponseBody for ListMultipartUploadsResult {
    fn from_body(body: &Bytes) -> Result<Self, VerifyErr> {
        let root = parse_root(body, "ListMultipartUploadsResult")?;
        let uploads = children(&root, "Upload")
            .map(|u| {
                Ok(UploadEntry {
                    key: get_text(u, "Key")?,
                    upload_id: get_text(u, "UploadId")?,
                    initiated: get_text_option(u, "Initiated")
                        .map(|v| from_iso8601utc(&v))
                        .transpose()?,
                })
            })
            .collect::<Result<Vec<_>, VerifyErr>>()?;
        Ok(Self {
            bucket: get_text(&root, "Bucket")?,
            is_truncated: get_text_option(&root, "IsTruncated")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            uploads,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_initiate() {
        let body = Bytes::from_static(
            br#"<InitiateMultipartUploadResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/"><Bucket>b</Bucket><Key>s3verify/multipart/k</Key><UploadId>VXBsb2FkIElE</UploadId></InitiateMultipartUploadResult>"#,
        );
        let result = InitiateMultipartUploadResult::from_body(&body).unwrap();
        assert_eq!(result.upload_id, "VXBsb2FkIElE");
        assert_eq!(result.key, "s3verify/multipart/k");
    }

    #[test]
    fn test_parse_list_parts() {
        let body = Bytes::from_static(
            br#"<ListPartsResult><Bucket>b</Bucket><Key>k</Key><UploadId>u</UploadId><IsTruncated>false</IsTruncated><Part><PartNumber>1</PartNumber><LastModified>2016-09-07T22:03:11.000Z</LastModified><ETag>"7778aef83f66abc1fa1e8477f296d394"</ETag><Size>5242880</Size></Part><Part><PartNumber>2</PartNumber><ETag>"aaaa"</ETag><Size>10</Size></Part></ListPartsResult>"#,
        );
        let result = ListPartsResult::from_body(&body).unwrap();
        assert_eq!(result.parts.len(), 2);
        assert_eq!(result.parts[0].etag, "7778aef83f66abc1fa1e8477f296d394");
        assert_eq!(result.parts[1].part_number, 2);
        assert!(result.parts[1].last_modified.is_none());
    }

    #[test]
    fn test_parse_list_uploads() {
        let body = Bytes::from_static(
            br#"<ListMultipartUploadsResult><Bucket>b</Bucket><IsTruncated>false</IsTruncated><Upload><Key>k</Key><UploadId>u1</UploadId><Initiated>2016-09-07T22:03:11.000Z</Initiated></Upload></ListMultipartUploadsResult>"#,
        );
        let result = ListMultipartUploadsResult::from_body(&body).unwrap();
        assert!(result.contains("k", "u1"));
        assert!(!result.contains("k", "u2"));
    }

    #[test]
    fn test_parse_complete() {
        let body = Bytes::from_static(
            br#"<CompleteMultipartUploadResult><Location>http://localhost:9000/b/k</Location><Bucket>b</Bucket><Key>k</Key><ETag>"3858f62230ac3c915f300c664312c11f-2"</ETag></CompleteMultipartUploadResult>"#,
        );
        let result = CompleteMultipartUploadResult::from_body(&body).unwrap();
        assert_eq!(result.etag, "3858f62230ac3c915f300c664312c11f-2");
    }
}
