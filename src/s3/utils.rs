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

//! Various utility and helper functions

use crate::s3::error::{ValidationErr, VerifyErr};
use base64::engine::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, NaiveDateTime, ParseError, Utc};
use lazy_static::lazy_static;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::RngCore;
use rand::distr::{Alphanumeric, SampleString};
use regex::Regex;
use sha2::{Digest, Sha256};
use xmltree::Element;

/// Date and time with UTC timezone
pub type UtcTime = DateTime<Utc>;

/// Prefix of every bucket and object this tool creates
pub const TEST_PREFIX: &str = "s3verify";

/// Gets hex encoded SHA256 hash of given data
pub fn sha256_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Gets base64 encoded MD5 hash of given data
pub fn md5sum_hash(data: &[u8]) -> String {
    BASE64.encode(md5::compute(data).as_slice())
}

/// Gets hex encoded MD5 hash of given data, the ETag of a single-part upload
pub fn md5_hex(data: &[u8]) -> String {
    format!("{:x}", md5::compute(data))
}

pub fn utc_now() -> UtcTime {
    Utc::now()
}

/// Gets signer date value of given time
pub fn to_signer_date(time: UtcTime) -> String {
    time.format("%Y%m%d").to_string()
}

/// Gets AMZ date value of given time
pub fn to_amz_date(time: UtcTime) -> String {
    time.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Gets HTTP header value of given time
pub fn to_http_header_value(time: UtcTime) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parses HTTP header value to time
pub fn from_http_header_value(s: &str) -> Result<UtcTime, ParseError> {
    Ok(NaiveDateTime::parse_from_str(s.trim(), "%a, %d %b %Y %H:%M:%S GMT")?.and_utc())
}

/// Parses ISO8601 UTC formatted value to time
pub fn from_iso8601utc(s: &str) -> Result<UtcTime, ParseError> {
    let naive = match NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.fZ") {
        Ok(d) => d,
        _ => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%SZ")?,
    };
    Ok(naive.and_utc())
}

/// Strips the surrounding double quotes servers put on ETag values
pub fn trim_etag(etag: &str) -> String {
    etag.trim().trim_matches('"').to_string()
}

const OBJECT_KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

pub fn urlencode_object_key(key: &str) -> String {
    utf8_percent_encode(key, OBJECT_KEY_ENCODE_SET).collect()
}

const QUERY_ENCODE_SET: &AsciiSet = &OBJECT_KEY_ENCODE_SET.add(b'/');

/// Percent-encodes a query key or value the way SigV4 canonicalizes it
pub fn url_encode(s: &str) -> String {
    utf8_percent_encode(s, QUERY_ENCODE_SET).collect()
}

/// Validates given bucket name against the S3 naming rules
///
/// Names must be 3 to 63 characters of lowercase letters, digits, `.` and `-`,
/// start and end with a letter or digit, contain no adjacent periods and not
/// look like an IPv4 address.
pub fn check_bucket_name(bucket_name: &str) -> Result<(), ValidationErr> {
    lazy_static! {
        static ref IPV4_REGEX: Regex = Regex::new(
            r"^((25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9][0-9]|[0-9])\.){3}(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9][0-9]|[0-9])$"
        )
        .unwrap();
        static ref VALID_BUCKET_NAME_REGEX: Regex =
            Regex::new(r"^[a-z0-9][a-z0-9\.\-]{1,61}[a-z0-9]$").unwrap();
    }

    if bucket_name.trim().is_empty() {
        return Err(ValidationErr::InvalidBucketName(
            "bucket name cannot be empty".into(),
        ));
    }
    if bucket_name.len() < 3 {
        return Err(ValidationErr::InvalidBucketName(format!(
            "{bucket_name}: cannot be less than 3 characters"
        )));
    }
    if bucket_name.len() > 63 {
        return Err(ValidationErr::InvalidBucketName(format!(
            "{bucket_name}: cannot be greater than 63 characters"
        )));
    }
    if IPV4_REGEX.is_match(bucket_name) {
        return Err(ValidationErr::InvalidBucketName(format!(
            "{bucket_name}: cannot be an IP address"
        )));
    }
    if bucket_name.contains("..") || bucket_name.contains(".-") || bucket_name.contains("-.") {
        return Err(ValidationErr::InvalidBucketName(format!(
            "{bucket_name}: contains invalid successive characters '..', '.-' or '-.'"
        )));
    }
    if !VALID_BUCKET_NAME_REGEX.is_match(bucket_name) {
        return Err(ValidationErr::InvalidBucketName(format!(
            "{bucket_name}: does not follow S3 standards"
        )));
    }
    Ok(())
}

/// Returns a fresh bucket name, `s3verify-` followed by 12 random characters
pub fn rand_bucket_name() -> String {
    format!(
        "{TEST_PREFIX}-{}",
        Alphanumeric
            .sample_string(&mut rand::rng(), 12)
            .to_lowercase()
    )
}

/// Returns a fresh object key under the test prefix
pub fn rand_object_name(kind: &str) -> String {
    format!(
        "{TEST_PREFIX}/{kind}/{}",
        Alphanumeric.sample_string(&mut rand::rng(), 10)
    )
}

/// Returns `size` random bytes
pub fn rand_data(size: usize) -> Vec<u8> {
    let mut buf = vec![0u8; size];
    rand::rng().fill_bytes(&mut buf);
    buf
}

/// Gets text value of given XML element for given tag.
pub fn get_text(element: &Element, tag: &str) -> Result<String, VerifyErr> {
    Ok(element
        .get_child(tag)
        .ok_or_else(|| VerifyErr::MalformedBody(format!("<{tag}> tag not found")))?
        .get_text()
        .map(|v| v.to_string())
        .unwrap_or_default())
}

/// Gets optional text value of given XML element for given tag.
pub fn get_text_option(element: &Element, tag: &str) -> Option<String> {
    element
        .get_child(tag)
        .and_then(|v| v.get_text().map(|s| s.to_string()))
}

/// Gets text value of given XML element for given tag, or empty string.
pub fn get_text_default(element: &Element, tag: &str) -> String {
    get_text_option(element, tag).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use quickcheck::quickcheck;

    #[test]
    fn test_http_date_roundtrip() {
        let t = Utc.with_ymd_and_hms(2016, 9, 7, 22, 3, 11).unwrap();
        let s = to_http_header_value(t);
        assert_eq!(s, "Wed, 07 Sep 2016 22:03:11 GMT");
        assert_eq!(from_http_header_value(&s).unwrap(), t);
    }

    #[test]
    fn test_iso8601_with_and_without_millis() {
        let t = Utc.with_ymd_and_hms(2016, 9, 7, 22, 3, 11).unwrap();
        assert_eq!(from_iso8601utc("2016-09-07T22:03:11.000Z").unwrap(), t);
        assert_eq!(from_iso8601utc("2016-09-07T22:03:11Z").unwrap(), t);
    }

    #[test]
    fn test_trim_etag() {
        assert_eq!(trim_etag("\"abc\""), "abc");
        assert_eq!(trim_etag("abc"), "abc");
    }

    #[test]
    fn test_empty_sha256() {
        assert_eq!(
            sha256_hash(b""),
            crate::s3::header_constants::EMPTY_SHA256
        );
    }

    #[test]
    fn test_bucket_names() {
        assert!(check_bucket_name("s3verify-test").is_ok());
        assert!(check_bucket_name("a.b-c").is_ok());
        assert!(check_bucket_name("S3verify").is_err());
        assert!(check_bucket_name("ab").is_err());
        assert!(check_bucket_name(&"a".repeat(64)).is_err());
        assert!(check_bucket_name("a..b").is_err());
        assert!(check_bucket_name(".abc").is_err());
        assert!(check_bucket_name("abc.").is_err());
        assert!(check_bucket_name("192.168.5.4").is_err());
    }

    #[test]
    fn test_rand_bucket_name_is_valid() {
        for _ in 0..32 {
            let name = rand_bucket_name();
            assert!(check_bucket_name(&name).is_ok(), "{name}");
            assert!(name.starts_with("s3verify-"));
        }
    }

    #[test]
    fn test_object_key_encoding_keeps_slashes() {
        assert_eq!(urlencode_object_key("s3verify/put/a b"), "s3verify/put/a%20b");
        assert_eq!(url_encode("a/b=c"), "a%2Fb%3Dc");
    }

    quickcheck! {
        fn prop_uppercase_names_are_rejected(suffix: String) -> bool {
            let name = format!("S3{}", suffix.chars().filter(|c| c.is_ascii_lowercase()).take(10).collect::<String>());
            check_bucket_name(&name).is_err()
        }
    }
}
