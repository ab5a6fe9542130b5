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

//! The ordered catalog of tests and its per-command subsets

use crate::verify::checks::{
    Read, Variant, bucket, conditional_read, missing_read, multipart, object_copy, object_get,
    object_head, object_list, object_put, object_remove,
};
use crate::verify::test_case::{Prerequisite, RunContext, TestCase};
use std::collections::HashSet;

use Prerequisite::*;

/// Commands whose tests always run last to remove what the others created
pub const TEARDOWN_COMMANDS: &[&str] = &["remove-object", "remove-bucket"];

/// Tests kept by `--prepare`
const PREPARE_TESTS: &[&str] = &["MakeBucket", "PutObject"];

/// Every test in execution order
pub fn full_catalog() -> Vec<TestCase> {
    vec![
        TestCase::new("MakeBucket", "make-bucket", bucket::make_bucket)
            .critical()
            .provides(&[Bucket]),
        TestCase::new(
            "MakeBucket (invalid name)",
            "make-bucket",
            bucket::make_bucket_invalid_name,
        ),
        TestCase::new("HeadBucket", "head-bucket", bucket::head_bucket).requires(&[Bucket]),
        TestCase::new(
            "HeadBucket (missing bucket)",
            "head-bucket",
            bucket::head_bucket_missing,
        ),
        TestCase::new(
            "GetBucketLocation",
            "get-bucket-location",
            bucket::get_bucket_location,
        )
        .requires(&[Bucket]),
        TestCase::new("ListBuckets", "list-buckets", bucket::list_buckets).requires(&[Bucket]),
        TestCase::new("PutObject", "put-object", object_put::put_object)
            .critical()
            .requires(&[Bucket])
            .provides(&[Objects]),
        TestCase::new("HeadObject", "head-object", object_head::head_object)
            .critical()
            .requires(&[Objects])
            .provides(&[ObjectMetadata]),
        TestCase::new(
            "HeadObject (idempotence)",
            "head-object",
            object_head::head_object_idempotent,
        )
        .requires(&[ObjectMetadata]),
        TestCase::new("HeadObject (If-Match)", "head-object", |ctx: RunContext| {
            conditional_read(ctx, Read::Head, Variant::IfMatch)
        })
        .requires(&[ObjectMetadata]),
        TestCase::new("HeadObject (If-None-Match)", "head-object", |ctx: RunContext| {
            conditional_read(ctx, Read::Head, Variant::IfNoneMatch)
        })
        .requires(&[ObjectMetadata]),
        TestCase::new("HeadObject (If-Modified-Since)", "head-object", |ctx: RunContext| {
            conditional_read(ctx, Read::Head, Variant::IfModifiedSince)
        })
        .requires(&[ObjectMetadata]),
        TestCase::new("HeadObject (If-Unmodified-Since)", "head-object", |ctx: RunContext| {
            conditional_read(ctx, Read::Head, Variant::IfUnmodifiedSince)
        })
        .requires(&[ObjectMetadata]),
        TestCase::new("HeadObject (missing key)", "head-object", |ctx: RunContext| {
            missing_read(ctx, Read::Head)
        })
        .requires(&[Bucket]),
        TestCase::new("GetObject", "get-object", object_get::get_object).requires(&[Objects]),
        TestCase::new("GetObject (If-Match)", "get-object", |ctx: RunContext| {
            conditional_read(ctx, Read::Get, Variant::IfMatch)
        })
        .requires(&[ObjectMetadata]),
        TestCase::new("GetObject (If-None-Match)", "get-object", |ctx: RunContext| {
            conditional_read(ctx, Read::Get, Variant::IfNoneMatch)
        })
        .requires(&[ObjectMetadata]),
        TestCase::new("GetObject (If-Modified-Since)", "get-object", |ctx: RunContext| {
            conditional_read(ctx, Read::Get, Variant::IfModifiedSince)
        })
        .requires(&[ObjectMetadata]),
        TestCase::new("GetObject (If-Unmodified-Since)", "get-object", |ctx: RunContext| {
            conditional_read(ctx, Read::Get, Variant::IfUnmodifiedSince)
        })
        .requires(&[ObjectMetadata]),
        TestCase::new("GetObject (Range)", "get-object", object_get::get_object_range)
            .requires(&[Objects]),
        TestCase::new("GetObject (missing key)", "get-object", |ctx: RunContext| {
            missing_read(ctx, Read::Get)
        })
        .requires(&[Bucket]),
        TestCase::new("CopyObject", "copy-object", object_copy::copy_object)
            .requires(&[Objects])
            .provides(&[CopiedObjects]),
        TestCase::new("CopyObject (If-Match)", "copy-object", |ctx: RunContext| {
            object_copy::copy_object_conditional(ctx, Variant::IfMatch)
        })
        .requires(&[Objects]),
        TestCase::new("CopyObject (If-None-Match)", "copy-object", |ctx: RunContext| {
            object_copy::copy_object_conditional(ctx, Variant::IfNoneMatch)
        })
        .requires(&[Objects]),
        TestCase::new("CopyObject (If-Modified-Since)", "copy-object", |ctx: RunContext| {
            object_copy::copy_object_conditional(ctx, Variant::IfModifiedSince)
        })
        .requires(&[ObjectMetadata]),
        TestCase::new("CopyObject (If-Unmodified-Since)", "copy-object", |ctx: RunContext| {
            object_copy::copy_object_conditional(ctx, Variant::IfUnmodifiedSince)
        })
        .requires(&[ObjectMetadata]),
        TestCase::new("ListObjects", "list-objects", |ctx: RunContext| {
            object_list::list_objects(ctx, true)
        })
        .requires(&[Objects]),
        TestCase::new("ListObjectsV2", "list-objects", |ctx: RunContext| {
            object_list::list_objects(ctx, false)
        })
        .requires(&[Objects]),
        TestCase::new(
            "CreateMultipartUpload",
            "multipart",
            multipart::create_multipart_upload,
        )
        .extended()
        .requires(&[Bucket])
        .provides(&[MultipartUpload]),
        TestCase::new("UploadPart", "multipart", multipart::upload_part)
            .extended()
            .requires(&[MultipartUpload])
            .provides(&[UploadedParts]),
        TestCase::new("ListParts", "multipart", multipart::list_parts)
            .extended()
            .requires(&[UploadedParts]),
        TestCase::new(
            "ListMultipartUploads",
            "multipart",
            multipart::list_multipart_uploads,
        )
        .extended()
        .requires(&[MultipartUpload]),
        TestCase::new(
            "CompleteMultipartUpload",
            "multipart",
            multipart::complete_multipart_upload,
        )
        .extended()
        .requires(&[UploadedParts]),
        TestCase::new(
            "AbortMultipartUpload",
            "multipart",
            multipart::abort_multipart_upload,
        )
        .extended()
        .requires(&[MultipartUpload]),
        TestCase::new("RemoveObject", "remove-object", object_remove::remove_object)
            .requires(&[Objects])
            .provides(&[RemovedObjects]),
        TestCase::new(
            "GetObject (removed)",
            "remove-object",
            object_remove::get_removed_object,
        )
        .requires(&[RemovedObjects]),
        TestCase::new("RemoveBucket", "remove-bucket", bucket::remove_bucket)
            .requires(&[Bucket])
            .provides(&[RemovedBucket]),
        TestCase::new(
            "RemoveBucket (again)",
            "remove-bucket",
            bucket::remove_bucket_again,
        )
        .requires(&[RemovedBucket]),
    ]
}

/// Distinct command names in catalog order
pub fn commands() -> Vec<&'static str> {
    let mut seen = HashSet::new();
    full_catalog()
        .into_iter()
        .map(|t| t.command)
        .filter(|c| seen.insert(*c))
        .collect()
}

/// True when every test of `command` is extended, so naming it on the
/// command line implies `--extended`.
pub fn extended_only(command: &str) -> bool {
    let mut tests = full_catalog()
        .into_iter()
        .filter(|t| t.command == command)
        .peekable();
    tests.peek().is_some() && tests.all(|t| t.extended)
}

/// The tests of `command`, the tests providing their prerequisites
/// (transitively) and the teardown tests, in catalog order. `None` for an
/// unknown command.
pub fn sub_catalog(command: &str) -> Option<Vec<TestCase>> {
    let catalog = full_catalog();
    if !catalog.iter().any(|t| t.command == command) {
        return None;
    }

    let mut selected: Vec<bool> = catalog
        .iter()
        .map(|t| t.command == command || TEARDOWN_COMMANDS.contains(&t.command))
        .collect();
    loop {
        let needed: HashSet<Prerequisite> = catalog
            .iter()
            .zip(&selected)
            .filter(|(_, s)| **s)
            .flat_map(|(t, _)| t.requires.iter().copied())
            .collect();
        let mut changed = false;
        for (t, s) in catalog.iter().zip(selected.iter_mut()) {
            if !*s && t.provides.iter().any(|p| needed.contains(p)) {
                *s = true;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    Some(
        catalog
            .into_iter()
            .zip(selected)
            .filter_map(|(t, s)| s.then_some(t))
            .collect(),
    )
}

/// Setup only: create the bucket and upload the objects
pub fn prepare_catalog() -> Vec<TestCase> {
    full_catalog()
        .into_iter()
        .filter(|t| PREPARE_TESTS.contains(&t.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tests: &[TestCase]) -> Vec<&'static str> {
        tests.iter().map(|t| t.name).collect()
    }

    #[test]
    fn test_every_prerequisite_is_provided_earlier() {
        let mut provided = HashSet::new();
        for t in full_catalog() {
            for p in &t.requires {
                assert!(provided.contains(p), "{} requires {p} before it is provided", t.name);
            }
            provided.extend(t.provides.iter().copied());
        }
    }

    #[test]
    fn test_each_prerequisite_has_one_provider() {
        let mut seen = HashSet::new();
        for t in full_catalog() {
            for p in &t.provides {
                assert!(seen.insert(*p), "{p} provided twice");
            }
        }
    }

    #[test]
    fn test_extended_only_commands() {
        assert!(extended_only("multipart"));
        assert!(!extended_only("get-object"));
        assert!(!extended_only("no-such-command"));
    }

    #[test]
    fn test_only_setup_is_critical() {
        let critical: Vec<&str> = full_catalog()
            .into_iter()
            .filter(|t| t.critical)
            .map(|t| t.name)
            .collect();
        assert_eq!(critical, vec!["MakeBucket", "PutObject", "HeadObject"]);
    }

    #[test]
    fn test_commands_in_order() {
        assert_eq!(
            commands(),
            vec![
                "make-bucket",
                "head-bucket",
                "get-bucket-location",
                "list-buckets",
                "put-object",
                "head-object",
                "get-object",
                "copy-object",
                "list-objects",
                "multipart",
                "remove-object",
                "remove-bucket",
            ]
        );
    }

    #[test]
    fn test_sub_catalog_pulls_in_providers_and_teardown() {
        let tests = sub_catalog("get-object").unwrap();
        let n = names(&tests);
        assert_eq!(n[0], "MakeBucket");
        assert!(n.contains(&"PutObject"));
        assert!(n.contains(&"HeadObject"));
        assert!(n.contains(&"GetObject (Range)"));
        assert!(n.contains(&"RemoveBucket (again)"));
        assert!(!n.contains(&"CopyObject"));
        assert!(!n.contains(&"HeadObject (idempotence)"));
        assert!(!n.contains(&"MakeBucket (invalid name)"));
    }

    #[test]
    fn test_sub_catalog_unknown_command() {
        assert!(sub_catalog("get-objekt").is_none());
    }

    #[test]
    fn test_prepare_catalog() {
        assert_eq!(names(&prepare_catalog()), vec!["MakeBucket", "PutObject"]);
    }
}
