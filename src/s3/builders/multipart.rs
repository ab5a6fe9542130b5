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

//! Builders for the multipart upload family of operations

use crate::s3::builders::check_object_name;
use crate::s3::error::ValidationErr;
use crate::s3::header_constants::{CONTENT_MD5, CONTENT_TYPE};
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::types::{RequestSpec, ToRequestSpec};
use crate::s3::utils::{check_bucket_name, md5sum_hash};
use bytes::Bytes;
use http::Method;
use std::fmt::Write;

/// Largest part number S3 accepts
pub const MAX_MULTIPART_COUNT: u16 = 10_000;

fn check_upload_id(upload_id: &str) -> Result<(), ValidationErr> {
    if upload_id.is_empty() {
        return Err(ValidationErr::InvalidConfig("upload ID cannot be empty".into()));
    }
    Ok(())
}

fn check_part_number(part_number: u16) -> Result<(), ValidationErr> {
    if !(1..=MAX_MULTIPART_COUNT).contains(&part_number) {
        return Err(ValidationErr::InvalidConfig(format!(
            "part number must be between 1 and {MAX_MULTIPART_COUNT}, got {part_number}"
        )));
    }
    Ok(())
}

fn upload_id_query(upload_id: String) -> Multimap {
    let mut query_params = Multimap::new();
    query_params.add("uploadId", upload_id);
    query_params
}

/// Argument builder for the [CreateMultipartUpload](https://docs.aws.amazon.com/AmazonS3/latest/API/API_CreateMultipartUpload.html) S3 API operation.
#[derive(Clone, Debug, Default)]
pub struct CreateMultipartUpload {
    bucket: String,
    object: String,
    content_type: Option<String>,
}

impl CreateMultipartUpload {
    pub fn new(bucket: &str, object: &str) -> Self {
        Self {
            bucket: bucket.to_owned(),
            object: object.to_owned(),
            ..Default::default()
        }
    }

    pub fn content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }
}

impl ToRequestSpec for CreateMultipartUpload {
    fn to_request_spec(self) -> Result<RequestSpec, ValidationErr> {
        check_bucket_name(&self.bucket)?;
        check_object_name(&self.object)?;

        let mut query_params = Multimap::new();
        query_params.add("uploads", "");
        let mut headers = Multimap::new();
        if let Some(v) = self.content_type {
            headers.add(CONTENT_TYPE, v);
        }

        Ok(RequestSpec::builder()
            .method(Method::POST)
            .bucket(self.bucket)
            .object(self.object)
            .query_params(query_params)
            .headers(headers)
            .build())
    }
}

/// Argument builder for the [UploadPart](https://docs.aws.amazon.com/AmazonS3/latest/API/API_UploadPart.html) S3 API operation.
#[derive(Clone, Debug, Default)]
pub struct UploadPart {
    bucket: String,
    object: String,
    upload_id: String,
    part_number: u16,
    data: Bytes,
}

impl UploadPart {
    pub fn new(
        bucket: &str,
        object: &str,
        upload_id: &str,
        part_number: u16,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            bucket: bucket.to_owned(),
            object: object.to_owned(),
            upload_id: upload_id.to_owned(),
            part_number,
            data: data.into(),
        }
    }
}

impl ToRequestSpec for UploadPart {
    fn to_request_spec(self) -> Result<RequestSpec, ValidationErr> {
        check_bucket_name(&self.bucket)?;
        check_object_name(&self.object)?;
        check_upload_id(&self.upload_id)?;
        check_part_number(self.part_number)?;

        let mut query_params = upload_id_query(self.upload_id);
        query_params.add("partNumber", self.part_number.to_string());
        let mut headers = Multimap::new();
        headers.add(CONTENT_MD5, md5sum_hash(&self.data));

        Ok(RequestSpec::builder()
            .method(Method::PUT)
            .bucket(self.bucket)
            .object(self.object)
            .query_params(query_params)
            .headers(headers)
            .body(self.data)
            .build())
    }
}

/// Argument builder for the [ListParts](https://docs.aws.amazon.com/AmazonS3/latest/API/API_ListParts.html) S3 API operation.
#[derive(Clone, Debug, Default)]
pub struct ListParts {
    bucket: String,
    object: String,
    upload_id: String,
    max_parts: Option<u16>,
}

impl ListParts {
    pub fn new(bucket: &str, object: &str, upload_id: &str) -> Self {
        Self {
            bucket: bucket.to_owned(),
            object: object.to_owned(),
            upload_id: upload_id.to_owned(),
            ..Default::default()
        }
    }

    pub fn max_parts(mut self, max_parts: Option<u16>) -> Self {
        self.max_parts = max_parts;
        self
    }
}

impl ToRequestSpec for ListParts {
    fn to_request_spec(self) -> Result<RequestSpec, ValidationErr> {
        check_bucket_name(&self.bucket)?;
        check_object_name(&self.object)?;
        check_upload_id(&self.upload_id)?;

        let mut query_params = upload_id_query(self.upload_id);
        if let Some(v) = self.max_parts {
            query_params.add("max-parts", v.to_string());
        }

        Ok(RequestSpec::builder()
            .method(Method::GET)
            .bucket(self.bucket)
            .object(self.object)
            .query_params(query_params)
            .build())
    }
}

/// A part as named in a CompleteMultipartUpload request
#[derive(Clone, Debug, PartialEq)]
pub struct CompletedPart {
    pub number: u16,
    pub etag: String,
}

/// Argument builder for the [CompleteMultipartUpload](https://docs.aws.amazon.com/AmazonS3/latest/API/API_CompleteMultipartUpload.html) S3 API operation.
#[derive(Clone, Debug, Default)]
pub struct CompleteMultipartUpload {
    bucket: String,
    object: String,
    upload_id: String,
    parts: Vec<CompletedPart>,
}

impl CompleteMultipartUpload {
    pub fn new(bucket: &str, object: &str, upload_id: &str, parts: Vec<CompletedPart>) -> Self {
        Self {
            bucket: bucket.to_owned(),
            object: object.to_owned(),
            upload_id: upload_id.to_owned(),
            parts,
        }
    }
}

impl ToRequestSpec for CompleteMultipartUpload {
    fn to_request_spec(self) -> Result<RequestSpec, ValidationErr> {
        check_bucket_name(&self.bucket)?;
        check_object_name(&self.object)?;
        check_upload_id(&self.upload_id)?;
        if self.parts.is_empty() {
            return Err(ValidationErr::InvalidConfig(
                "complete multipart upload needs at least one part".into(),
            ));
        }

        // parts must be listed in ascending order
        let mut parts = self.parts;
        parts.sort_by_key(|p| p.number);

        let mut data = String::from("<CompleteMultipartUpload>");
        for part in &parts {
            check_part_number(part.number)?;
            let _ = write!(
                data,
                "<Part><PartNumber>{}</PartNumber><ETag>\"{}\"</ETag></Part>",
                part.number,
                part.etag.trim_matches('"')
            );
        }
        data.push_str("</CompleteMultipartUpload>");
        let body = Bytes::from(data);

        let mut headers = Multimap::new();
        headers.add(CONTENT_TYPE, "application/xml");
        headers.add(CONTENT_MD5, md5sum_hash(&body));

        Ok(RequestSpec::builder()
            .method(Method::POST)
            .bucket(self.bucket)
            .object(self.object)
            .query_params(upload_id_query(self.upload_id))
            .headers(headers)
            .body(body)
            .build())
    }
}

/// Argument builder for the [AbortMultipartUpload](https://docs.aws.amazon.com/AmazonS3/latest/API/API_AbortMultipartUpload.html) S3 API operation.
#[derive(Clone, Debug, Default)]
pub struct AbortMultipartUpload {
    bucket: String,
    object: String,
    upload_id: String,
}

impl AbortMultipartUpload {
    pub fn new(bucket: &str, object: &str, upload_id: &str) -> Self {
        Self {
            bucket: bucket.to_owned(),
            object: object.to_owned(),
            upload_id: upload_id.to_owned(),
        }
    }
}

impl ToRequestSpec for AbortMultipartUpload {
    fn to_request_spec(self) -> Result<RequestSpec, ValidationErr> {
        check_bucket_name(&self.bucket)?;
        check_object_name(&self.object)?;
        check_upload_id(&self.upload_id)?;

        Ok(RequestSpec::builder()
            .method(Method::DELETE)
            .bucket(self.bucket)
            .object(self.object)
            .query_params(upload_id_query(self.upload_id))
            .build())
    }
}

/// Argument builder for the [ListMultipartUploads](https://docs.aws.amazon.com/AmazonS3/latest/API/API_ListMultipartUploads.html) S3 API operation.
#[derive(Clone, Debug, Default)]
pub struct ListMultipartUploads {
    bucket: String,
    prefix: Option<String>,
}

impl ListMultipartUploads {
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
}

impl ToRequestSpec for ListMultipartUploads {
    fn to_request_spec(self) -> Result<RequestSpec, ValidationErr> {
        check_bucket_name(&self.bucket)?;

        let mut query_params = Multimap::new();
        query_params.add("uploads", "");
        if let Some(v) = self.prefix {
            query_params.add("prefix", v);
        }

        Ok(RequestSpec::builder()
            .method(Method::GET)
            .bucket(self.bucket)
            .query_params(query_params)
            .build())
    }
}
