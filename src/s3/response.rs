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

//! Parsers for S3 response bodies

use crate::s3::error::VerifyErr;
use bytes::{Buf, Bytes};
use xmltree::Element;

mod bucket_location;
mod copy_object;
mod list_buckets;
mod list_objects;
mod multipart;

pub use bucket_location::LocationConstraint;
pub use copy_object::CopyObjectResult;
pub use list_buckets::{BucketInfo, ListBucketsResult};
pub use list_objects::{ListObjectsResult, ObjectEntry};
pub use multipart::{
    CompleteMultipartUploadResult, InitiateMultipartUploadResult, ListMultipartUploadsResult,
    ListPartsResult, PartInfo, UploadEntry,
};

/// Parses a typed result out of a response body
pub trait FromResponseBody: Sized {
    fn from_body(body: &Bytes) -> Result<Self, VerifyErr>;
}

/// Parses `body` as XML and checks the root element name
pub(crate) fn parse_root(body: &Bytes, expected: &str) -> Result<Element, VerifyErr> {
    let root = Element::parse(body.clone().reader())?;
    if root.name != expected {
        return Err(VerifyErr::MalformedBody(format!(
            "expected <{expected}> document, got <{}>",
            root.name
        )));
    }
    Ok(root)
}

/// Iterates over the child elements of `parent` named `tag`
pub(crate) fn children<'a>(parent: &'a Element, tag: &'a str) -> impl Iterator<Item = &'a Element> {
    parent
        .children
        .iter()
        .filter_map(|n| n.as_element())
        .filter(move |e| e.name == tag)
}
