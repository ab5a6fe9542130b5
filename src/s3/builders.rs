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

//! Request builders, one per S3 operation the catalog exercises
//!
//! Each builder collects the parameters of one request and implements
//! [`ToRequestSpec`](crate::s3::types::ToRequestSpec). Builders are plain
//! values; nothing is shared or mutated between calls.

mod copy_object;
mod get_bucket_location;
mod get_object;
mod head_bucket;
mod head_object;
mod list_buckets;
mod list_objects;
mod make_bucket;
mod multipart;
mod put_object;
mod remove_bucket;
mod remove_object;

pub use copy_object::*;
pub use get_bucket_location::*;
pub use get_object::*;
pub use head_bucket::*;
pub use head_object::*;
pub use list_buckets::*;
pub use list_objects::*;
pub use make_bucket::*;
pub use multipart::*;
pub use put_object::*;
pub use remove_bucket::*;
pub use remove_object::*;

use crate::s3::error::ValidationErr;

pub(crate) fn check_object_name(object: &str) -> Result<(), ValidationErr> {
    if object.is_empty() {
        return Err(ValidationErr::InvalidObjectName(
            "object name cannot be empty".into(),
        ));
    }
    if object.len() > 1024 {
        return Err(ValidationErr::InvalidObjectName(format!(
            "object name is {} bytes; maximum allowed 1024",
            object.len()
        )));
    }
    Ok(())
}
