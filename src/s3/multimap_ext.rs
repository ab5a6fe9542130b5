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

use crate::s3::utils::url_encode;
use std::collections::BTreeMap;

/// Multimap for string key and string value
pub type Multimap = multimap::MultiMap<String, String>;

pub trait MultimapExt {
    /// Adds a key-value pair to the multimap
    fn add<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V);

    /// Returns the first value stored under `key`, ignoring ASCII case
    fn get_ignore_case(&self, key: &str) -> Option<&str>;

    /// Returns true when `key` is present, ignoring ASCII case
    fn contains_key_ignore_case(&self, key: &str) -> bool {
        self.get_ignore_case(key).is_some()
    }

    /// Converts multimap to HTTP query string
    fn to_query_string(&self) -> String;

    /// Converts multimap to canonical query string
    fn get_canonical_query_string(&self) -> String;

    /// Converts multimap to signed headers and canonical headers
    fn get_canonical_headers(&self) -> (String, String);
}

fn join_pairs<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", url_encode(k), url_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

impl MultimapExt for Multimap {
    fn add<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.insert(key.into(), value.into());
    }

    fn get_ignore_case(&self, key: &str) -> Option<&str> {
        self.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    fn to_query_string(&self) -> String {
        join_pairs(
            self.iter_all()
                .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str()))),
        )
    }

    fn get_canonical_query_string(&self) -> String {
        let mut pairs: Vec<(&str, &str)> = self
            .iter_all()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str())))
            .collect();
        pairs.sort();
        join_pairs(pairs)
    }

    fn get_canonical_headers(&self) -> (String, String) {
        let mut sorted: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (k, values) in self.iter_all() {
            let key = k.to_lowercase();
            if key == "authorization" || key == "user-agent" {
                continue;
            }
            sorted
                .entry(key)
                .or_default()
                .extend(values.iter().map(|v| collapse_spaces(v)));
        }

        let signed_headers = sorted.keys().cloned().collect::<Vec<_>>().join(";");
        let canonical_headers = sorted
            .iter_mut()
            .map(|(k, vs)| {
                vs.sort();
                format!("{}:{}", k, vs.join(","))
            })
            .collect::<Vec<_>>()
            .join("\n");

        (signed_headers, canonical_headers)
    }
}

/// Trims and collapses runs of spaces into one, as SigV4 canonical headers require
fn collapse_spaces(s: &str) -> String {
    s.split(' ')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
