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

//! Run configuration

use crate::s3::S3Executor;
use crate::s3::client::DEFAULT_REGION;
use crate::s3::creds::Credentials;
use crate::s3::error::{Error, ValidationErr};
use crate::s3::http::BaseUrl;
use std::time::Duration;
use typed_builder::TypedBuilder;

pub const DEFAULT_CONCURRENCY: usize = 8;
pub const DEFAULT_OBJECT_COUNT: usize = 5;
pub const DEFAULT_MAX_OBJECT_SIZE: usize = 64 * 1024;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Everything a run needs to know about the endpoint under test and how hard
/// to exercise it. Built once from the command line and shared read-only.
#[derive(Clone, Debug, TypedBuilder)]
pub struct Config {
    pub endpoint: BaseUrl,

    #[builder(default, setter(into))]
    pub access_key: String,

    #[builder(default, setter(into))]
    pub secret_key: String,

    #[builder(default = DEFAULT_REGION.to_string(), setter(into))]
    pub region: String,

    /// Also run tests marked extended
    #[builder(default)]
    pub extended: bool,

    /// Only create the bucket and objects, and keep them
    #[builder(default)]
    pub prepare: bool,

    #[builder(default)]
    pub debug: bool,

    /// Upper bound on in-flight requests within one test
    #[builder(default = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    #[builder(default = Some(DEFAULT_REQUEST_TIMEOUT))]
    pub request_timeout: Option<Duration>,

    /// Number of objects uploaded by the put-object test
    #[builder(default = DEFAULT_OBJECT_COUNT)]
    pub object_count: usize,

    #[builder(default = DEFAULT_MAX_OBJECT_SIZE)]
    pub max_object_size: usize,

    /// Accept invalid TLS certificates
    #[builder(default)]
    pub insecure: bool,
}

impl Config {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.access_key, &self.secret_key)
    }

    pub fn validate(&self) -> Result<(), ValidationErr> {
        if self.concurrency == 0 {
            return Err(ValidationErr::InvalidConfig(
                "concurrency must be at least 1".into(),
            ));
        }
        if self.object_count == 0 {
            return Err(ValidationErr::InvalidConfig(
                "at least one object is needed".into(),
            ));
        }
        if self.max_object_size == 0 {
            return Err(ValidationErr::InvalidConfig(
                "maximum object size must be at least 1 byte".into(),
            ));
        }
        if self.access_key.is_empty() != self.secret_key.is_empty() {
            return Err(ValidationErr::InvalidConfig(
                "access key and secret key must be given together".into(),
            ));
        }
        Ok(())
    }

    /// Validates the configuration and builds the executor it describes
    pub fn executor(&self) -> Result<S3Executor, Error> {
        self.validate()?;
        S3Executor::new(
            self.endpoint.clone(),
            &self.region,
            self.credentials(),
            self.request_timeout,
            self.insecure,
        )
    }
}
