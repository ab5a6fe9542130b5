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

//! Test cases, their prerequisites and the context every check runs in

use crate::s3::S3Executor;
use crate::s3::error::{Error, FixtureErr};
use crate::s3::types::{S3Response, ToRequestSpec};
use crate::verify::config::Config;
use crate::verify::fanout::{CancelToken, fan_out};
use crate::verify::fixture::{BucketFixture, FixtureStore, ObjectFixture};
use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// A piece of ground truth a test relies on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Prerequisite {
    Bucket,
    Objects,
    ObjectMetadata,
    CopiedObjects,
    MultipartUpload,
    UploadedParts,
    RemovedObjects,
    RemovedBucket,
}

impl fmt::Display for Prerequisite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Prerequisite::Bucket => "bucket",
            Prerequisite::Objects => "objects",
            Prerequisite::ObjectMetadata => "object metadata",
            Prerequisite::CopiedObjects => "copied objects",
            Prerequisite::MultipartUpload => "multipart upload",
            Prerequisite::UploadedParts => "uploaded parts",
            Prerequisite::RemovedObjects => "removed objects",
            Prerequisite::RemovedBucket => "removed bucket",
        })
    }
}

/// Everything a check may touch. Cheap to clone; clones share the fixture
/// store, the connection pool and the cancellation signal.
#[derive(Clone, Debug)]
pub struct RunContext {
    pub config: Arc<Config>,
    pub executor: S3Executor,
    pub fixtures: Arc<FixtureStore>,
    pub cancel: CancelToken,
}

impl RunContext {
    pub fn new(config: Config, executor: S3Executor) -> Self {
        Self {
            config: Arc::new(config),
            executor,
            fixtures: Arc::new(FixtureStore::new()),
            cancel: CancelToken::new(),
        }
    }

    /// Builds, signs and sends one request, giving up on cancellation
    pub async fn send<B: ToRequestSpec>(&self, builder: B) -> Result<S3Response, Error> {
        let spec = builder.to_request_spec()?;
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Error::Cancelled),
            resp = self.executor.send(&spec) => resp,
        }
    }

    /// The bucket the run created
    pub fn bucket(&self) -> Result<BucketFixture, Error> {
        self.fixtures
            .buckets()
            .into_iter()
            .next()
            .ok_or_else(|| FixtureErr::NoSuchBucket("<none created>".into()).into())
    }

    pub fn objects(&self) -> Result<Vec<ObjectFixture>, Error> {
        Ok(self.fixtures.objects_in(&self.bucket()?.name))
    }

    /// Objects whose key was generated for `kind` (see `rand_object_name`)
    pub fn objects_of_kind(&self, kind: &str) -> Result<Vec<ObjectFixture>, Error> {
        let prefix = format!("{}/{kind}/", crate::s3::utils::TEST_PREFIX);
        Ok(self
            .objects()?
            .into_iter()
            .filter(|o| o.key.starts_with(&prefix))
            .collect())
    }

    /// Runs `f` over `items` concurrently, bounded by the configured limit
    pub async fn fan_out<T, F, Fut>(&self, items: Vec<T>, f: F) -> Result<(), Error>
    where
        T: Send + 'static,
        F: Fn(RunContext, T) -> Fut,
        Fut: Future<Output = Result<(), Error>> + Send + 'static,
    {
        fan_out(items, self.config.concurrency, &self.cancel, |item| {
            f(self.clone(), item)
        })
        .await
    }
}

/// The body of a test
#[async_trait]
pub trait Check: Send + Sync {
    async fn run(&self, ctx: RunContext) -> Result<(), Error>;
}

#[async_trait]
impl<F, Fut> Check for F
where
    F: Fn(RunContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), Error>> + Send + 'static,
{
    async fn run(&self, ctx: RunContext) -> Result<(), Error> {
        (self)(ctx).await
    }
}

/// A named check plus its scheduling metadata
#[derive(Clone)]
pub struct TestCase {
    pub name: &'static str,
    /// CLI command this test belongs to
    pub command: &'static str,
    pub critical: bool,
    pub extended: bool,
    pub requires: Vec<Prerequisite>,
    pub provides: Vec<Prerequisite>,
    pub check: Arc<dyn Check>,
}

impl TestCase {
    pub fn new<C: Check + 'static>(name: &'static str, command: &'static str, check: C) -> Self {
        Self {
            name,
            command,
            critical: false,
            extended: false,
            requires: Vec::new(),
            provides: Vec::new(),
            check: Arc::new(check),
        }
    }

    pub fn critical(mut self) -> Self {
        self.critical = true;
        self
    }

    pub fn extended(mut self) -> Self {
        self.extended = true;
        self
    }

    pub fn requires(mut self, prerequisites: &[Prerequisite]) -> Self {
        self.requires.extend_from_slice(prerequisites);
        self
    }

    pub fn provides(mut self, prerequisites: &[Prerequisite]) -> Self {
        self.provides.extend_from_slice(prerequisites);
        self
    }

    pub async fn run(&self, ctx: RunContext) -> Result<(), Error> {
        self.check.run(ctx).await
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("command", &self.command)
            .field("critical", &self.critical)
            .field("extended", &self.extended)
            .field("requires", &self.requires)
            .field("provides", &self.provides)
            .finish()
    }
}
