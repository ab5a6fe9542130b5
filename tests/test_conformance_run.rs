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

mod common;

use crate::common::{Faults, TestContext};
use s3verify::verify::catalog::{full_catalog, prepare_catalog, sub_catalog};
use s3verify::verify::config::Config;
use s3verify::verify::orchestrator::{Orchestrator, TestState};

const MULTIPART_TESTS: usize = 6;

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn full_run_passes_against_conforming_server() {
    let ctx = TestContext::start(Faults::default()).await;
    let orchestrator = Orchestrator::new(ctx.config()).unwrap();
    orchestrator.probe().await.unwrap();

    let summary = orchestrator.run(full_catalog()).await;
    for r in &summary.reports {
        assert_ne!(r.state, TestState::Failed, "{} failed: {:?}", r.name, r.error);
    }
    assert_eq!(summary.skipped(), MULTIPART_TESTS);
    assert_eq!(summary.passed(), full_catalog().len() - MULTIPART_TESTS);
    assert!(!summary.aborted);
    assert!(!summary.cancelled);
    assert_eq!(summary.exit_code(), 0);
    assert_eq!(
        summary.report("CreateMultipartUpload").unwrap().state,
        TestState::Skipped
    );

    // RemoveBucket ran, so nothing is left behind
    assert!(ctx.s3.bucket_names().is_empty());
    assert!(orchestrator.context().fixtures.buckets().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn extended_run_covers_multipart() {
    let ctx = TestContext::start(Faults::default()).await;
    let config = Config {
        extended: true,
        ..ctx.config()
    };
    let orchestrator = Orchestrator::new(config).unwrap();

    let summary = orchestrator.run(full_catalog()).await;
    for r in &summary.reports {
        assert_eq!(r.state, TestState::Passed, "{}: {:?}", r.name, r.error);
    }
    assert_eq!(summary.passed(), full_catalog().len());
    assert_eq!(summary.skipped(), 0);
    assert_eq!(ctx.s3.upload_count(), 0);
    assert!(ctx.s3.bucket_names().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn listings_follow_pagination() {
    let ctx = TestContext::start(Faults {
        page_size: Some(2),
        ..Faults::default()
    })
    .await;
    let orchestrator = Orchestrator::new(ctx.config()).unwrap();

    let summary = orchestrator.run(sub_catalog("list-objects").unwrap()).await;
    assert_eq!(summary.report("ListObjects").unwrap().state, TestState::Passed);
    assert_eq!(summary.report("ListObjectsV2").unwrap().state, TestState::Passed);
    assert_eq!(summary.failed(), 0);
    assert!(ctx.s3.bucket_names().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn sub_catalog_runs_only_the_command_and_its_setup() {
    let ctx = TestContext::start(Faults::default()).await;
    let orchestrator = Orchestrator::new(ctx.config()).unwrap();

    let summary = orchestrator.run(sub_catalog("copy-object").unwrap()).await;
    assert_eq!(summary.failed(), 0);
    assert!(summary.report("CopyObject (If-Unmodified-Since)").is_some());
    assert!(summary.report("GetObject").is_none());
    assert!(summary.report("ListBuckets").is_none());
    assert_eq!(summary.report("RemoveBucket").unwrap().state, TestState::Passed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn prepare_keeps_bucket_until_cleanup() {
    let ctx = TestContext::start(Faults::default()).await;
    let config = Config {
        prepare: true,
        ..ctx.config()
    };
    let object_count = config.object_count;
    let orchestrator = Orchestrator::new(config).unwrap();

    let summary = orchestrator.run(prepare_catalog()).await;
    assert_eq!(summary.passed(), 2);

    let buckets = ctx.s3.bucket_names();
    assert_eq!(buckets.len(), 1);
    assert_eq!(ctx.s3.object_keys(&buckets[0]).len(), object_count);
    assert!(
        ctx.s3.object_keys(&buckets[0])
            .iter()
            .all(|k| k.starts_with("s3verify/put/"))
    );

    orchestrator.cleanup().await;
    assert!(ctx.s3.bucket_names().is_empty());
}
