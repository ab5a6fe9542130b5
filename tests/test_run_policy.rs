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
use s3verify::s3::error::{Error, ErrorKind, ValidationErr, VerifyErr};
use s3verify::verify::catalog::full_catalog;
use s3verify::verify::checks::bucket::INVALID_BUCKET_NAME;
use s3verify::verify::config::Config;
use s3verify::verify::orchestrator::{Orchestrator, TestState};
use s3verify::verify::test_case::{Prerequisite, RunContext, TestCase};
use std::time::{Duration, Instant};

fn passing(name: &'static str) -> TestCase {
    TestCase::new(name, "policy", |_ctx: RunContext| async { Ok::<(), Error>(()) })
}

fn failing(name: &'static str) -> TestCase {
    TestCase::new(name, "policy", |_ctx: RunContext| async {
        Err::<(), Error>(VerifyErr::Mismatch("boom".into()).into())
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn critical_failure_stops_the_run() {
    let ctx = TestContext::start(Faults::default()).await;
    let orchestrator = Orchestrator::new(ctx.config()).unwrap();

    let summary = orchestrator
        .run(vec![passing("first"), failing("setup").critical(), passing("after")])
        .await;
    assert!(summary.aborted);
    assert_eq!(summary.exit_code(), 1);
    assert_eq!(summary.reports.len(), 2);
    assert_eq!(summary.report("setup").unwrap().state, TestState::Failed);
    assert!(summary.report("after").is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn non_critical_failure_continues() {
    let ctx = TestContext::start(Faults::default()).await;
    let orchestrator = Orchestrator::new(ctx.config()).unwrap();

    let summary = orchestrator
        .run(vec![failing("flaky"), passing("after")])
        .await;
    assert!(!summary.aborted);
    assert_eq!(summary.exit_code(), 0);
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.passed(), 1);
    let report = summary.report("flaky").unwrap();
    assert_eq!(
        report.error.as_ref().map(Error::kind),
        Some(ErrorKind::Verification)
    );
    assert_eq!(summary.to_string(), "1 passed, 1 failed, 0 skipped");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn extended_tests_are_skipped_by_default() {
    let ctx = TestContext::start(Faults::default()).await;
    let orchestrator = Orchestrator::new(ctx.config()).unwrap();

    let summary = orchestrator
        .run(vec![failing("slow").extended().critical(), passing("after")])
        .await;
    assert_eq!(summary.report("slow").unwrap().state, TestState::Skipped);
    assert_eq!(summary.report("after").unwrap().state, TestState::Passed);
    assert_eq!(summary.exit_code(), 0);

    let config = Config {
        extended: true,
        ..ctx.config()
    };
    let orchestrator = Orchestrator::new(config).unwrap();
    let summary = orchestrator
        .run(vec![failing("slow").extended(), passing("after")])
        .await;
    assert_eq!(summary.report("slow").unwrap().state, TestState::Failed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn unmet_prerequisite_fails_without_running() {
    let ctx = TestContext::start(Faults::default()).await;
    let orchestrator = Orchestrator::new(ctx.config()).unwrap();

    let summary = orchestrator
        .run(vec![
            failing("provider").provides(&[Prerequisite::Objects]),
            failing("consumer").requires(&[Prerequisite::Objects]),
            passing("independent"),
        ])
        .await;
    let consumer = summary.report("consumer").unwrap();
    assert_eq!(consumer.state, TestState::Failed);
    assert!(matches!(
        consumer.error,
        Some(Error::Construction(ValidationErr::MissingPrerequisite(_)))
    ));
    assert_eq!(
        summary.report("independent").unwrap().state,
        TestState::Passed
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn failing_put_aborts_and_cleans_up() {
    let ctx = TestContext::start(Faults {
        fail_put: true,
        ..Faults::default()
    })
    .await;
    let orchestrator = Orchestrator::new(ctx.config()).unwrap();

    let summary = orchestrator.run(full_catalog()).await;
    assert!(summary.aborted);
    assert_eq!(summary.exit_code(), 1);
    let put = summary.reports.last().unwrap();
    assert_eq!(put.name, "PutObject");
    assert!(matches!(
        put.error,
        Some(Error::Verification(VerifyErr::StatusMismatch {
            expected: 200,
            actual: 500,
            ..
        }))
    ));
    assert!(summary.report("HeadObject").is_none());
    assert!(ctx.s3.bucket_names().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn ignored_if_match_fails_only_those_tests() {
    let ctx = TestContext::start(Faults {
        ignore_if_match: true,
        ..Faults::default()
    })
    .await;
    let orchestrator = Orchestrator::new(ctx.config()).unwrap();

    let summary = orchestrator.run(full_catalog()).await;
    let failed: Vec<&str> = summary
        .reports
        .iter()
        .filter(|r| r.state == TestState::Failed)
        .map(|r| r.name)
        .collect();
    assert_eq!(failed, vec!["HeadObject (If-Match)", "GetObject (If-Match)"]);
    assert!(!summary.aborted);
    assert_eq!(summary.exit_code(), 0);
    assert_eq!(summary.report("RemoveBucket").unwrap().state, TestState::Passed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn accepted_invalid_bucket_name_is_reported_and_removed() {
    let ctx = TestContext::start(Faults {
        accept_invalid_bucket_name: true,
        ..Faults::default()
    })
    .await;
    let orchestrator = Orchestrator::new(ctx.config()).unwrap();

    let summary = orchestrator.run(full_catalog()).await;
    let report = summary.report("MakeBucket (invalid name)").unwrap();
    assert_eq!(report.state, TestState::Failed);
    assert!(matches!(
        report.error,
        Some(Error::Verification(VerifyErr::StatusMismatch { expected: 400, .. }))
    ));
    assert!(!ctx.s3.bucket_names().iter().any(|b| b == INVALID_BUCKET_NAME));
    assert!(ctx.s3.bucket_names().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn copy_precondition_message_is_checked() {
    let ctx = TestContext::start(Faults {
        wrong_copy_message: true,
        ..Faults::default()
    })
    .await;
    let orchestrator = Orchestrator::new(ctx.config()).unwrap();

    let summary = orchestrator.run(full_catalog()).await;
    for name in [
        "CopyObject (If-Match)",
        "CopyObject (If-None-Match)",
        "CopyObject (If-Modified-Since)",
        "CopyObject (If-Unmodified-Since)",
    ] {
        let report = summary.report(name).unwrap();
        assert!(
            matches!(
                report.error,
                Some(Error::Verification(VerifyErr::ErrorMessageMismatch { .. }))
            ),
            "{name}: {:?}",
            report.error
        );
    }
    assert_eq!(summary.report("CopyObject").unwrap().state, TestState::Passed);
    assert!(ctx.s3.bucket_names().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn cancellation_stops_the_run_and_cleans_up() {
    let ctx = TestContext::start(Faults {
        slow_get: Some(Duration::from_secs(30)),
        ..Faults::default()
    })
    .await;
    let orchestrator = Orchestrator::new(ctx.config()).unwrap();
    let cancel = orchestrator.cancel_token();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        cancel.cancel();
    });

    let start = Instant::now();
    let summary = orchestrator.run(full_catalog()).await;
    assert!(start.elapsed() < Duration::from_secs(20));
    assert!(summary.cancelled);
    assert!(!summary.aborted);
    assert_eq!(summary.exit_code(), 1);
    assert!(summary.report("RemoveBucket").is_none());
    assert!(ctx.s3.bucket_names().is_empty());
}
