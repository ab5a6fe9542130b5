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

use clap::Parser;
use s3verify::cli::{Cli, CommandRouter, Route};
use s3verify::verify::catalog;
use s3verify::verify::checks::cleanup::cleanup;
use s3verify::verify::orchestrator::Orchestrator;
use s3verify::verify::test_case::TestCase;
use std::process::ExitCode;

fn init_logging(debug: bool) {
    // RUST_LOG, when set, overrides --debug
    let default = if debug { "s3verify=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn select_catalog(cli: &Cli) -> Result<Vec<TestCase>, String> {
    if cli.prepare {
        return Ok(catalog::prepare_catalog());
    }
    let Some(name) = &cli.command else {
        return Ok(catalog::full_catalog());
    };
    let router = CommandRouter::new(&catalog::commands());
    let route = router.route(name);
    match &route {
        Route::Found(cmd) => catalog::sub_catalog(cmd)
            .ok_or_else(|| format!("'{cmd}' is not a s3verify command.")),
        Route::Unknown { .. } => Err(route.unknown_message().unwrap_or_default()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let config = match cli.to_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("s3verify: {e}");
            return ExitCode::FAILURE;
        }
    };
    let tests = match select_catalog(&cli) {
        Ok(t) => t,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };
    let orchestrator = match Orchestrator::new(config) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("s3verify: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(bucket) = &cli.clean {
        return match cleanup(&orchestrator.context().executor, bucket).await {
            Ok(()) => {
                println!("Removed bucket {bucket}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("s3verify: {e}");
                ExitCode::FAILURE
            }
        };
    }

    if let Err(e) = orchestrator.probe().await {
        eprintln!("s3verify: {} is not reachable: {e}", cli.url);
        return ExitCode::FAILURE;
    }

    let cancel = orchestrator.cancel_token();
    let run = orchestrator.run(tests);
    tokio::pin!(run);
    let summary = tokio::select! {
        summary = &mut run => summary,
        Ok(()) = tokio::signal::ctrl_c() => {
            eprintln!("Interrupted, cleaning up");
            cancel.cancel();
            run.await
        }
    };

    println!();
    println!("{summary}");
    if cli.prepare && !summary.aborted {
        for b in orchestrator.context().fixtures.buckets() {
            println!("Prepared bucket {}", b.name);
        }
    }
    ExitCode::from(summary.exit_code() as u8)
}
