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

//! Command lookup with typo suggestions

use std::collections::BTreeMap;

/// Maximum edit distance for a command to be suggested
pub const SUGGESTION_DISTANCE: usize = 2;

#[derive(Debug)]
struct TrieNode<V> {
    children: BTreeMap<char, TrieNode<V>>,
    value: Option<V>,
}

impl<V> Default for TrieNode<V> {
    fn default() -> Self {
        Self {
            children: BTreeMap::new(),
            value: None,
        }
    }
}

impl<V> TrieNode<V> {
    fn collect(&self, prefix: &mut String, out: &mut Vec<String>) {
        if self.value.is_some() {
            out.push(prefix.clone());
        }
        for (c, child) in &self.children {
            prefix.push(*c);
            child.collect(prefix, out);
            prefix.pop();
        }
    }
}

/// Prefix tree keyed by strings
#[derive(Debug)]
pub struct Trie<V> {
    root: TrieNode<V>,
    len: usize,
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self {
            root: TrieNode::default(),
            len: 0,
        }
    }
}

impl<V> Trie<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `key`, returning the value it replaces
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        let mut node = &mut self.root;
        for c in key.chars() {
            node = node.children.entry(c).or_default();
        }
        let old = node.value.replace(value);
        if old.is_none() {
            self.len += 1;
        }
        old
    }

    /// Exact lookup
    pub fn get(&self, key: &str) -> Option<&V> {
        self.find(key)?.value.as_ref()
    }

    fn find(&self, key: &str) -> Option<&TrieNode<V>> {
        let mut node = &self.root;
        for c in key.chars() {
            node = node.children.get(&c)?;
        }
        Some(node)
    }

    /// Every key starting with `prefix`, in lexicographic order
    pub fn prefix_match(&self, prefix: &str) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(node) = self.find(prefix) {
            let mut buf = prefix.to_string();
            node.collect(&mut buf, &mut out);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Levenshtein distance over chars
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0; b.len() + 1];
    for i in 1..=a.len() {
        cur[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            cur[j] = (prev[j] + 1).min(cur[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Found(&'static str),
    Unknown {
        name: String,
        suggestions: Vec<String>,
    },
}

impl Route {
    /// Message for an unknown command, `None` when the command exists
    pub fn unknown_message(&self) -> Option<String> {
        match self {
            Route::Found(_) => None,
            Route::Unknown { name, suggestions } => {
                let mut msg = format!("'{name}' is not a s3verify command.");
                if !suggestions.is_empty() {
                    msg.push_str("\n\nDid you mean one of these?");
                    for s in suggestions {
                        msg.push_str("\n\t");
                        msg.push_str(s);
                    }
                }
                Some(msg)
            }
        }
    }
}

/// Maps command names typed on the command line to catalog commands
#[derive(Debug)]
pub struct CommandRouter {
    commands: Trie<&'static str>,
}

impl CommandRouter {
    pub fn new(commands: &[&'static str]) -> Self {
        let mut trie = Trie::new();
        for c in commands {
            trie.insert(c, *c);
        }
        Self { commands: trie }
    }

    pub fn route(&self, name: &str) -> Route {
        match self.commands.get(name) {
            Some(cmd) => Route::Found(*cmd),
            None => Route::Unknown {
                name: name.to_string(),
                suggestions: self.suggestions(name),
            },
        }
    }

    /// Commands extending `name`, plus commands within
    /// [`SUGGESTION_DISTANCE`] edits of it; sorted, without duplicates
    pub fn suggestions(&self, name: &str) -> Vec<String> {
        let mut out = if name.is_empty() {
            Vec::new()
        } else {
            self.commands.prefix_match(name)
        };
        out.extend(
            self.commands
                .prefix_match("")
                .into_iter()
                .filter(|c| edit_distance(c, name) <= SUGGESTION_DISTANCE),
        );
        out.sort();
        out.dedup();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    const COMMANDS: &[&str] = &[
        "make-bucket",
        "head-bucket",
        "put-object",
        "head-object",
        "get-object",
        "copy-object",
    ];

    #[test]
    fn test_trie() {
        let mut t = Trie::new();
        assert!(t.is_empty());
        assert_eq!(t.insert("get-object", 1), None);
        assert_eq!(t.insert("get-bucket-location", 2), None);
        assert_eq!(t.insert("get-object", 3), Some(1));
        assert_eq!(t.len(), 2);
        assert_eq!(t.get("get-object"), Some(&3));
        assert_eq!(t.get("get"), None);
        assert_eq!(
            t.prefix_match("get-"),
            vec!["get-bucket-location", "get-object"]
        );
        assert!(t.prefix_match("put").is_empty());
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("get-object", "get-objetc"), 2);
    }

    #[test]
    fn test_route_exact() {
        let router = CommandRouter::new(COMMANDS);
        assert_eq!(router.route("get-object"), Route::Found("get-object"));
    }

    #[test]
    fn test_route_typo() {
        let router = CommandRouter::new(COMMANDS);
        let route = router.route("get-objet");
        assert_eq!(
            route,
            Route::Unknown {
                name: "get-objet".into(),
                suggestions: vec!["get-object".into()],
            }
        );
        let msg = route.unknown_message().unwrap();
        assert!(msg.starts_with("'get-objet' is not a s3verify command."));
        assert!(msg.contains("\tget-object"));
    }

    #[test]
    fn test_route_prefix() {
        let router = CommandRouter::new(COMMANDS);
        match router.route("head") {
            Route::Unknown { suggestions, .. } => {
                assert_eq!(suggestions, vec!["head-bucket", "head-object"])
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_route_nothing_close() {
        let router = CommandRouter::new(COMMANDS);
        let route = router.route("frobnicate");
        assert_eq!(
            route.unknown_message().unwrap(),
            "'frobnicate' is not a s3verify command."
        );
    }

    quickcheck! {
        fn prop_distance_to_self_is_zero(a: String) -> bool {
            edit_distance(&a, &a) == 0
        }

        fn prop_distance_is_symmetric(a: String, b: String) -> bool {
            edit_distance(&a, &b) == edit_distance(&b, &a)
        }

        fn prop_distance_bounded_by_longer(a: String, b: String) -> bool {
            let d = edit_distance(&a, &b);
            d <= a.chars().count().max(b.chars().count())
                && d >= a.chars().count().abs_diff(b.chars().count())
        }

        fn prop_triangle_inequality(a: String, b: String, c: String) -> bool {
            edit_distance(&a, &c) <= edit_distance(&a, &b) + edit_distance(&b, &c)
        }

        fn prop_inserted_keys_are_found(keys: Vec<String>) -> bool {
            let mut t = Trie::new();
            for k in &keys {
                t.insert(k, k.clone());
            }
            keys.iter().all(|k| t.get(k) == Some(k))
                && keys.iter().all(|k| t.prefix_match("").contains(k))
        }
    }
}
