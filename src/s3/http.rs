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

//! Endpoint model and path-style / virtual-host-style URL construction

use crate::s3::error::ValidationErr;
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::utils::urlencode_object_key;
use http::Method;
use http::Uri;
use std::fmt;
use std::str::FromStr;

/// Host suffixes that are addressed virtual-host style
const VIRTUAL_HOST_SUFFIXES: &[&str] = &[
    "amazonaws.com",
    "amazonaws.com.cn",
    "googleapis.com",
    "aliyuncs.com",
];

#[derive(Clone, Debug)]
/// Represents HTTP URL
pub struct Url {
    pub https: bool,
    pub host: String,
    pub port: u16,
    pub path: String,
    pub query: Multimap,
}

impl Url {
    pub fn host_header_value(&self) -> String {
        if self.port > 0 {
            return format!("{}:{}", self.host, self.port);
        }
        self.host.clone()
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.host.is_empty() {
            return Err(fmt::Error);
        }
        let scheme = if self.https { "https" } else { "http" };
        write!(f, "{scheme}://{}", self.host_header_value())?;
        if !self.path.starts_with('/') {
            f.write_str("/")?;
        }
        f.write_str(&self.path)?;
        if !self.query.is_empty() {
            write!(f, "?{}", self.query.to_query_string())?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
/// Represents Base URL of the S3 endpoint under test
pub struct BaseUrl {
    pub https: bool,
    host: String,
    port: u16,
    pub virtual_style: bool,
}

impl Default for BaseUrl {
    fn default() -> Self {
        Self {
            https: false,
            host: "127.0.0.1".to_string(),
            port: 9000,
            virtual_style: false,
        }
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let scheme = if self.https { "https" } else { "http" };
        write!(f, "{scheme}://{}", self.host)?;
        if self.port > 0 {
            write!(f, ":{}", self.port)?;
        }
        Ok(())
    }
}

/// Returns true for hosts that expect the bucket in the host name
pub fn is_virtual_host_endpoint(host: &str) -> bool {
    let host = host.to_lowercase();
    VIRTUAL_HOST_SUFFIXES
        .iter()
        .any(|suffix| host == *suffix || host.ends_with(&format!(".{suffix}")))
}

impl FromStr for BaseUrl {
    type Err = ValidationErr;

    /// Parses `http(s)://host[:port]`; a missing scheme means https.
    ///
    /// # Examples
    ///
    /// ```
    /// use s3verify::s3::http::BaseUrl;
    ///
    /// let base_url: BaseUrl = "http://localhost:9000".parse().unwrap();
    /// assert!(!base_url.virtual_style);
    /// let base_url: BaseUrl = "https://s3.amazonaws.com".parse().unwrap();
    /// assert!(base_url.virtual_style);
    /// ```
    fn from_str(s: &str) -> Result<Self, ValidationErr> {
        let url = s.parse::<Uri>()?;

        let https = match url.scheme_str() {
            None | Some("https") => true,
            Some("http") => false,
            Some(_) => {
                return Err(ValidationErr::InvalidBaseUrl(
                    "scheme must be http or https".into(),
                ));
            }
        };

        let host = match url.host() {
            Some(h) if !h.is_empty() => h,
            _ => {
                return Err(ValidationErr::InvalidBaseUrl(
                    "valid host must be provided".into(),
                ));
            }
        };
        let host = if host.parse::<std::net::Ipv6Addr>().is_ok() {
            format!("[{host}]")
        } else {
            host.to_string()
        };

        let mut port = url.port_u16().unwrap_or(0);
        if (https && port == 443) || (!https && port == 80) {
            port = 0;
        }

        if url.path() != "/" && !url.path().is_empty() {
            return Err(ValidationErr::InvalidBaseUrl(
                "path must be empty for base URL".into(),
            ));
        }
        if url.query().is_some() {
            return Err(ValidationErr::InvalidBaseUrl(
                "query must be none for base URL".into(),
            ));
        }

        let virtual_style = is_virtual_host_endpoint(&host);
        Ok(BaseUrl {
            https,
            host,
            port,
            virtual_style,
        })
    }
}

impl BaseUrl {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Builds URL from base URL for given parameters for S3 operation
    pub fn build_url(
        &self,
        method: &Method,
        query: &Multimap,
        bucket_name: Option<&str>,
        object_name: Option<&str>,
    ) -> Result<Url, ValidationErr> {
        let mut url = Url {
            https: self.https,
            host: self.host.clone(),
            port: self.port,
            path: String::from("/"),
            query: query.clone(),
        };

        let bucket = match bucket_name {
            None => return Ok(url),
            Some(v) if v.is_empty() => {
                return Err(ValidationErr::UrlBuildError(
                    "bucket name cannot be empty".into(),
                ));
            }
            Some(v) => v,
        };

        let enforce_path_style =
            // CreateBucket requires path style
            (method == Method::PUT && object_name.is_none() && query.is_empty())
            // GetBucketLocation requires path style
            || query.contains_key("location")
            // dotted bucket names break the TLS certificate match
            || (bucket.contains('.') && self.https);

        let mut path = String::new();
        if enforce_path_style || !self.virtual_style {
            path.push('/');
            path.push_str(bucket);
        } else {
            url.host = format!("{}.{}", bucket, self.host);
        }

        if let Some(v) = object_name {
            if v.is_empty() {
                return Err(ValidationErr::InvalidObjectName(
                    "object name cannot be empty".into(),
                ));
            }
            if !v.starts_with('/') {
                path.push('/');
            }
            path.push_str(&urlencode_object_key(v));
        }
        if path.is_empty() {
            path.push('/');
        }
        url.path = path;

        Ok(url)
    }
}
