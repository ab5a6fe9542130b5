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

//! The executor: signs request descriptors and performs one HTTP round trip each

use crate::s3::creds::Credentials;
use crate::s3::error::{Error, ValidationErr};
use crate::s3::header_constants::AUTHORIZATION;
use crate::s3::http::BaseUrl;
use crate::s3::types::{RequestSpec, S3Response, SignedRequest};
use crate::s3::utils::utc_now;
use std::time::Duration;

pub const DEFAULT_REGION: &str = "us-east-1";

#[derive(Clone, Debug)]
/// Sends requests to the endpoint under test.
///
/// Cloning is cheap; all clones share one connection pool.
pub struct S3Executor {
    http: reqwest::Client,
    base_url: BaseUrl,
    region: String,
    credentials: Credentials,
}

impl S3Executor {
    pub fn new(
        base_url: BaseUrl,
        region: &str,
        credentials: Credentials,
        timeout: Option<Duration>,
        insecure: bool,
    ) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder()
            .no_gzip()
            .redirect(reqwest::redirect::Policy::none());
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        if insecure {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let region = if region.is_empty() {
            DEFAULT_REGION.to_string()
        } else {
            region.to_string()
        };
        Ok(Self {
            http: builder.build()?,
            base_url,
            region,
            credentials,
        })
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Signs `spec` with the configured credentials at the current time
    pub fn sign(&self, spec: &RequestSpec) -> Result<SignedRequest, ValidationErr> {
        spec.sign(&self.base_url, &self.region, &self.credentials, utc_now())
    }

    /// Performs one round trip. The response body is read to the end before
    /// this returns, so the connection goes back to the pool on every path,
    /// whatever the caller later does with the response.
    pub async fn execute(&self, req: SignedRequest) -> Result<S3Response, Error> {
        log::debug!("request: {} {}", req.method, req.url);
        let mut builder = self.http.request(req.method.clone(), req.url.to_string());
        for (key, values) in req.headers.iter_all() {
            for value in values {
                if key.eq_ignore_ascii_case(AUTHORIZATION) {
                    log::debug!("  {key}: *****");
                } else {
                    log::debug!("  {key}: {value}");
                }
                builder = builder.header(key, value);
            }
        }
        if !req.body.is_empty() || req.method == http::Method::PUT || req.method == http::Method::POST
        {
            builder = builder.body(req.body);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await?;

        log::debug!("response: {} ({} body bytes)", status, body.len());
        for (key, value) in headers.iter() {
            log::debug!("  {key}: {}", value.to_str().unwrap_or("<binary>"));
        }

        Ok(S3Response {
            status,
            headers,
            body,
        })
    }

    /// Signs and executes `spec`
    pub async fn send(&self, spec: &RequestSpec) -> Result<S3Response, Error> {
        let signed = self.sign(spec)?;
        self.execute(signed).await
    }
}
