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

//! Runs a catalog in order and enforces the critical/extended policy

use crate::s3::builders::ListBuckets;
use crate::s3::error::{Error, ValidationErr};
use crate::verify::checks::cleanup::cleanup;
use crate::verify::config::Config;
use crate::verify::fanout::CancelToken;
use crate::verify::test_case::{Prerequisite, RunContext, TestCase};
use std::collections::HashSet;
use std::fmt;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TestState {
    Pending,
    Running,
    Passed,
    Failed,
    /// Extended test in a run without `--extended`
    Skipped,
}

impl fmt::Display for TestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TestState::Pending => "PENDING",
            TestState::Running => "RUNNING",
            TestState::Passed => "PASSED",
            TestState::Failed => "FAILED",
            TestState::Skipped => "SKIPPED",
        })
    }
}

#[derive(Debug)]
pub struct TestReport {
    pub name: &'static str,
    pub command: &'static str,
    pub critical: bool,
    pub state: TestState,
    pub error: Option<Error>,
    pub elapsed: Duration,
}

impl TestReport {
    fn pending(test: &TestCase) -> Self {
        Self {
            name: test.name,
            command: test.command,
            critical: test.critical,
            state: TestState::Pending,
            error: None,
            elapsed: Duration::ZERO,
        }
    }
}

/// Outcome of a whole run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<TestReport>,
    /// A critical test failed
    pub aborted: bool,
    pub cancelled: bool,
}

impl RunSummary {
    fn count(&self, state: TestState) -> usize {
        self.reports.iter().filter(|r| r.state == state).count()
    }

    pub fn passed(&self) -> usize {
        self.count(TestState::Passed)
    }

    pub fn failed(&self) -> usize {
        self.count(TestState::Failed)
    }

    pub fn skipped(&self) -> usize {
        self.count(TestState::Skipped)
    }

    pub fn report(&self, name: &str) -> Option<&TestReport> {
        self.reports.iter().find(|r| r.name == name)
    }

    /// Non-zero only when a critical test failed or the run was cancelled
    pub fn exit_code(&self) -> i32 {
        if self.aborted || self.cancelled { 1 } else { 0 }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} passed, {} failed, {} skipped",
            self.passed(),
            self.failed(),
            self.skipped()
        )?;
        if self.aborted {
            f.write_str(" (aborted after a critical failure)")?;
        } else if self.cancelled {
            f.write_str(" (cancelled)")?;
        }
        Ok(())
    }
}

fn print_report(index: usize, total: usize, report: &TestReport) {
    println!(
        "({index:>2}/{total}) {:<44} {}",
        report.name, report.state
    );
    if let Some(e) = &report.error {
        println!("        {e}");
    }
}

pub struct Orchestrator {
    ctx: RunContext,
}

impl Orchestrator {
    pub fn new(config: Config) -> Result<Self, Error> {
        let executor = config.executor()?;
        Ok(Self {
            ctx: RunContext::new(config, executor),
        })
    }

    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    /// Cancelling the token stops the run at the next request
    pub fn cancel_token(&self) -> CancelToken {
        self.ctx.cancel.clone()
    }

    /// Checks the endpoint answers at all. Only a transport failure counts;
    /// an S3 error such as AccessDenied still proves reachability.
    pub async fn probe(&self) -> Result<(), Error> {
        let resp = self.ctx.send(ListBuckets).await?;
        if !resp.status.is_success() {
            log::warn!(
                "endpoint {} answered ListBuckets with {}",
                self.ctx.executor.base_url(),
                resp.status
            );
        }
        Ok(())
    }

    pub async fn run(&self, catalog: Vec<TestCase>) -> RunSummary {
        let total = catalog.len();
        let mut summary = RunSummary::default();
        let mut satisfied: HashSet<Prerequisite> = HashSet::new();

        for (i, test) in catalog.iter().enumerate() {
            if self.ctx.cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            let mut report = TestReport::pending(test);
            if test.extended && !self.ctx.config.extended {
                report.state = TestState::Skipped;
                log::debug!("{}: {}", test.name, report.state);
            } else {
                report.state = TestState::Running;
                log::debug!("{}: {}", test.name, report.state);
                let start = Instant::now();
                let outcome = match test.requires.iter().find(|p| !satisfied.contains(p)) {
                    Some(p) => Err(ValidationErr::MissingPrerequisite(p.to_string()).into()),
                    None => test.run(self.ctx.clone()).await,
                };
                report.elapsed = start.elapsed();

                match outcome {
                    Ok(()) => {
                        report.state = TestState::Passed;
                        satisfied.extend(test.provides.iter().copied());
                    }
                    Err(e) => {
                        report.state = TestState::Failed;
                        if matches!(e, Error::Cancelled) {
                            summary.cancelled = true;
                        } else if test.critical {
                            summary.aborted = true;
                        }
                        log::debug!("{}: {} error: {e}", test.name, e.kind());
                        report.error = Some(e);
                    }
                }
                log::info!("{}: {} in {:?}", test.name, report.state, report.elapsed);
            }

            print_report(i + 1, total, &report);
            summary.reports.push(report);
            if summary.aborted || summary.cancelled {
                break;
            }
        }

        if summary.aborted {
            log::error!("critical test failed; remaining tests not run");
        }
        if !self.ctx.config.prepare {
            self.cleanup().await;
        }
        summary
    }

    /// Removes every bucket fixture still alive, each bounded by a timeout
    pub async fn cleanup(&self) {
        for bucket in self.ctx.fixtures.buckets() {
            match cleanup(&self.ctx.executor, &bucket.name).await {
                Ok(()) => {
                    self.ctx.fixtures.remove_bucket(&bucket.name);
                    log::info!("cleaned up bucket {}", bucket.name);
                }
                Err(e) => log::warn!("cleanup of bucket {} failed: {e}", bucket.name),
            }
        }
    }
}
