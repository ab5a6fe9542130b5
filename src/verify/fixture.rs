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

//! Ground truth for a run: the buckets, objects and uploads the tests created

use crate::s3::error::ValidationErr;
use crate::s3::utils::UtcTime;
use bytes::Bytes;
use dashmap::DashMap;
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub struct BucketFixture {
    pub name: String,
    pub region: String,
    pub created_at: UtcTime,
}

/// Server-reported metadata. Fields left `None` keep their previous value
/// when recorded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectMeta {
    pub etag: Option<String>,
    pub size: Option<u64>,
    pub last_modified: Option<UtcTime>,
}

#[derive(Clone, Debug)]
pub struct ObjectFixture {
    /// Name of the bucket holding the object; a reference, not ownership
    pub bucket: String,
    pub key: String,
    pub body: Bytes,
    pub content_type: Option<String>,
    meta: ObjectMeta,
}

impl ObjectFixture {
    pub fn new(bucket: &str, key: &str, body: impl Into<Bytes>) -> Self {
        Self {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            body: body.into(),
            content_type: None,
            meta: ObjectMeta::default(),
        }
    }

    pub fn with_meta(mut self, meta: ObjectMeta) -> Self {
        self.merge(meta);
        self
    }

    fn merge(&mut self, meta: ObjectMeta) {
        if meta.etag.is_some() {
            self.meta.etag = meta.etag;
        }
        if meta.size.is_some() {
            self.meta.size = meta.size;
        }
        if meta.last_modified.is_some() {
            self.meta.last_modified = meta.last_modified;
        }
    }

    fn missing(&self, field: &'static str) -> ValidationErr {
        ValidationErr::MissingFixtureField {
            fixture: self.to_string(),
            field,
        }
    }

    pub fn meta(&self) -> &ObjectMeta {
        &self.meta
    }

    pub fn etag(&self) -> Result<&str, ValidationErr> {
        self.meta.etag.as_deref().ok_or_else(|| self.missing("ETag"))
    }

    pub fn size(&self) -> Result<u64, ValidationErr> {
        self.meta.size.ok_or_else(|| self.missing("size"))
    }

    pub fn last_modified(&self) -> Result<UtcTime, ValidationErr> {
        self.meta
            .last_modified
            .ok_or_else(|| self.missing("Last-Modified"))
    }
}

impl fmt::Display for ObjectFixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UploadedPart {
    pub number: u16,
    pub etag: String,
    pub body: Bytes,
}

#[derive(Clone, Debug)]
pub struct UploadFixture {
    pub bucket: String,
    pub key: String,
    pub upload_id: String,
    pub parts: Vec<UploadedPart>,
}

impl UploadFixture {
    /// Concatenation of the uploaded parts in part-number order
    pub fn assembled_body(&self) -> Bytes {
        let mut parts: Vec<&UploadedPart> = self.parts.iter().collect();
        parts.sort_by_key(|p| p.number);
        let mut buf = Vec::with_capacity(parts.iter().map(|p| p.body.len()).sum());
        for p in parts {
            buf.extend_from_slice(&p.body);
        }
        Bytes::from(buf)
    }
}

type ObjectKey = (String, String);

fn object_key(bucket: &str, key: &str) -> ObjectKey {
    (bucket.to_owned(), key.to_owned())
}

/// Registry of fixtures, safe to share between concurrent sub-checks.
///
/// Entries only disappear through the `remove_*` operations, which move them
/// to a retired set so later tests can check the server forgot them too.
#[derive(Debug, Default)]
pub struct FixtureStore {
    buckets: DashMap<String, BucketFixture>,
    objects: DashMap<ObjectKey, ObjectFixture>,
    uploads: DashMap<ObjectKey, UploadFixture>,
    removed_buckets: DashMap<String, BucketFixture>,
    removed_objects: DashMap<ObjectKey, ObjectFixture>,
}

impl FixtureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_bucket(&self, bucket: BucketFixture) {
        self.buckets.insert(bucket.name.clone(), bucket);
    }

    pub fn bucket(&self, name: &str) -> Option<BucketFixture> {
        self.buckets.get(name).map(|b| b.clone())
    }

    /// Live buckets, sorted by name
    pub fn buckets(&self) -> Vec<BucketFixture> {
        let mut v: Vec<BucketFixture> = self.buckets.iter().map(|e| e.value().clone()).collect();
        v.sort_by(|a, b| a.name.cmp(&b.name));
        v
    }

    pub fn remove_bucket(&self, name: &str) -> Option<BucketFixture> {
        let (_, bucket) = self.buckets.remove(name)?;
        self.removed_buckets.insert(bucket.name.clone(), bucket.clone());
        Some(bucket)
    }

    pub fn removed_buckets(&self) -> Vec<BucketFixture> {
        let mut v: Vec<BucketFixture> = self
            .removed_buckets
            .iter()
            .map(|e| e.value().clone())
            .collect();
        v.sort_by(|a, b| a.name.cmp(&b.name));
        v
    }

    pub fn put_object(&self, object: ObjectFixture) {
        self.objects
            .insert(object_key(&object.bucket, &object.key), object);
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<ObjectFixture> {
        self.objects.get(&object_key(bucket, key)).map(|o| o.clone())
    }

    /// Live objects of `bucket`, sorted by key
    pub fn objects_in(&self, bucket: &str) -> Vec<ObjectFixture> {
        let mut v: Vec<ObjectFixture> = self
            .objects
            .iter()
            .filter(|e| e.key().0 == bucket)
            .map(|e| e.value().clone())
            .collect();
        v.sort_by(|a, b| a.key.cmp(&b.key));
        v
    }

    pub fn remove_object(&self, bucket: &str, key: &str) -> Option<ObjectFixture> {
        let (k, object) = self.objects.remove(&object_key(bucket, key))?;
        self.removed_objects.insert(k, object.clone());
        Some(object)
    }

    pub fn removed_objects_in(&self, bucket: &str) -> Vec<ObjectFixture> {
        let mut v: Vec<ObjectFixture> = self
            .removed_objects
            .iter()
            .filter(|e| e.key().0 == bucket)
            .map(|e| e.value().clone())
            .collect();
        v.sort_by(|a, b| a.key.cmp(&b.key));
        v
    }

    /// Merges server-reported metadata into an object fixture. Returns false
    /// when no such object is registered.
    pub fn record_metadata(&self, bucket: &str, key: &str, meta: ObjectMeta) -> bool {
        match self.objects.get_mut(&object_key(bucket, key)) {
            Some(mut o) => {
                o.merge(meta);
                true
            }
            None => false,
        }
    }

    pub fn put_upload(&self, upload: UploadFixture) {
        self.uploads
            .insert(object_key(&upload.bucket, &upload.key), upload);
    }

    pub fn upload(&self, bucket: &str, key: &str) -> Option<UploadFixture> {
        self.uploads.get(&object_key(bucket, key)).map(|u| u.clone())
    }

    /// Open uploads of `bucket`, sorted by key
    pub fn uploads(&self, bucket: &str) -> Vec<UploadFixture> {
        let mut v: Vec<UploadFixture> = self
            .uploads
            .iter()
            .filter(|e| e.key().0 == bucket)
            .map(|e| e.value().clone())
            .collect();
        v.sort_by(|a, b| a.key.cmp(&b.key));
        v
    }

    /// Adds or replaces a part of an open upload. Returns false when no such
    /// upload is registered.
    pub fn record_part(&self, bucket: &str, key: &str, part: UploadedPart) -> bool {
        match self.uploads.get_mut(&object_key(bucket, key)) {
            Some(mut u) => {
                u.parts.retain(|p| p.number != part.number);
                u.parts.push(part);
                true
            }
            None => false,
        }
    }

    pub fn remove_upload(&self, bucket: &str, key: &str) -> Option<UploadFixture> {
        self.uploads
            .remove(&object_key(bucket, key))
            .map(|(_, u)| u)
    }
}
