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

use crate::cli::router::{CommandRouter, Route};
use crate::s3::client::DEFAULT_REGION;
use crate::s3::error::ValidationErr;
use crate::s3::http::BaseUrl;
use crate::verify::catalog;
use crate::verify::config::{
    Config, DEFAULT_CONCURRENCY, DEFAULT_MAX_OBJECT_SIZE, DEFAULT_OBJECT_COUNT,
};
use clap::Parser;
use std::time::Duration;

/// Conformance tester for Amazon S3 compatible object storage servers.
///
/// Without COMMAND the whole catalog runs; with one, only that command's
/// tests plus the setup they need and the teardown.
#[derive(Parser, Debug)]
#[command(name = "s3verify", version, about, long_about = None)]
pub struct Cli {
    /// Run only this command's tests, e.g. get-object
    pub command: Option<String>,

    /// Access key of the account under test
    #[arg(short = 'a', long = "access", env = "S3_ACCESS", default_value = "")]
    pub access: String,

    /// Secret key of the account under test
    #[arg(
        short = 's',
        long = "secret",
        env = "S3_SECRET",
        default_value = "",
        hide_env_values = true
    )]
    pub secret: String,

    /// Endpoint under test, e.g. http://localhost:9000
    #[arg(short = 'u', long = "url", env = "S3_URL")]
    pub url: String,

    #[arg(short = 'r', long = "region", env = "S3_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// Log every request and response
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Also run the extended tests
    #[arg(long)]
    pub extended: bool,

    /// Create a bucket with test objects and keep it
    #[arg(long, conflicts_with_all = ["clean", "command"])]
    pub prepare: bool,

    /// Remove the test objects of BUCKET and then BUCKET itself
    #[arg(long, value_name = "BUCKET", conflicts_with = "command")]
    pub clean: Option<String>,

    /// Maximum concurrent requests within one test
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Per-request timeout in seconds, 0 for none
    #[arg(long, value_name = "SECONDS", default_value_t = 60)]
    pub timeout: u64,

    /// Number of objects to upload
    #[arg(long, default_value_t = DEFAULT_OBJECT_COUNT)]
    pub objects: usize,

    /// Largest random object size in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_OBJECT_SIZE)]
    pub max_object_size: usize,

    /// Skip TLS certificate verification
    #[arg(long)]
    pub insecure: bool,
}

impl Cli {
    /// Naming a command whose tests are all extended opts into them.
    fn wants_extended(&self) -> bool {
        let Some(name) = &self.command else {
            return self.extended;
        };
        let router = CommandRouter::new(&catalog::commands());
        self.extended
            || matches!(router.route(name), Route::Found(cmd) if catalog::extended_only(cmd))
    }

    pub fn to_config(&self) -> Result<Config, ValidationErr> {
        let config = Config::builder()
            .endpoint(self.url.parse::<BaseUrl>()?)
            .access_key(self.access.clone())
            .secret_key(self.secret.clone())
            .region(self.region.clone())
            .extended(self.wants_extended())
            .prepare(self.prepare)
            .debug(self.debug)
            .concurrency(self.concurrency)
            .request_timeout((self.timeout > 0).then(|| Duration::from_secs(self.timeout)))
            .object_count(self.objects)
            .max_object_size(self.max_object_size)
            .insecure(self.insecure)
            .build();
        config.validate()?;
        Ok(config)
    }
}
