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

//! # s3verify
//!
//! A conformance tester for Amazon S3 compatible object storage servers.
//!
//! Every check sends a real, signed request to the server under test and
//! compares the response against what the S3 API mandates: status code,
//! headers and body. Checks are grouped into an ordered catalog of tests
//! that share bucket and object fixtures.
//!
//! ## Design
//! - Each S3 operation has a request builder (e.g. [`s3::builders::GetObject`])
//!   implementing [`s3::types::ToRequestSpec`]; the resulting
//!   [`s3::types::RequestSpec`] is immutable and signed by
//!   [`s3::S3Executor`]
//! - Expected responses are described by [`verify::expect::ExpectedOutcome`]
//!   and compared by a single verifier
//! - [`verify::orchestrator::Orchestrator`] runs the catalog in order,
//!   aborting on critical failures and cleaning up what it created
//!
//! ```no_run
//! use s3verify::verify::{catalog, config::Config, orchestrator::Orchestrator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::builder()
//!         .endpoint("http://localhost:9000".parse().unwrap())
//!         .access_key("minioadmin".to_string())
//!         .secret_key("minioadmin".to_string())
//!         .build();
//!     let orchestrator = Orchestrator::new(config).unwrap();
//!     let summary = orchestrator.run(catalog::full_catalog()).await;
//!     std::process::exit(summary.exit_code());
//! }
//! ```

#![allow(clippy::result_large_err)]
#![allow(clippy::too_many_arguments)]

pub mod cli;
pub mod s3;
pub mod verify;
