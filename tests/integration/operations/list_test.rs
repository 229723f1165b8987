// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 U.S. Federal Government (in countries where recognized)
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

//! Integration tests for listing certificate names

use crate::integration::{
    E_INVALIDARG, ERROR_ACCESS_DENIED, MockNativeStore, MockStoreHandle, adapter, issued_by,
    self_signed,
};
use win32_certstore::native::NAME_BUFFER_CHARS;
use win32_certstore::{NativeError, Operation};

#[test]
fn test_list_empty_store() {
    let store = MockNativeStore::new();
    let adapter = adapter(&store);

    assert_eq!(adapter.list(&store.handle()).unwrap(), "[]");

    let counters = store.counters();
    assert_eq!(counters.enum_calls, 1);
    assert_eq!(counters.releases, counters.enum_calls);
    assert_eq!(store.live_contexts(), 0);
}

#[test]
fn test_list_returns_issuer_display_names_in_order() {
    let store = MockNativeStore::new();
    let adapter = adapter(&store);
    store.insert(&self_signed("Alpha Root CA"));
    store.insert(&self_signed("Bravo Root CA"));
    let (ca, leaf) = issued_by("Charlie Issuing CA", "host.example.com");
    store.insert(&ca);
    store.insert(&leaf);

    let json = adapter.list(&store.handle()).unwrap();
    let names: Vec<String> = serde_json::from_str(&json).unwrap();

    assert_eq!(
        names,
        vec![
            "Alpha Root CA",
            "Bravo Root CA",
            "Charlie Issuing CA",
            "Charlie Issuing CA",
        ]
    );
}

#[test]
fn test_list_releases_every_context() {
    let store = MockNativeStore::new();
    let adapter = adapter(&store);
    for i in 0..5 {
        store.insert(&self_signed(&format!("Release CA {}", i)));
    }

    let names = adapter.list_names(&store.handle()).unwrap();
    assert_eq!(names.len(), 5);

    let counters = store.counters();
    assert_eq!(counters.enum_calls, 6);
    assert_eq!(counters.name_calls, 5);
    assert_eq!(counters.releases, counters.enum_calls);
    assert_eq!(store.live_contexts(), 0);
}

#[test]
fn test_list_reuses_one_name_buffer() {
    let store = MockNativeStore::new();
    let adapter = adapter(&store);
    for i in 0..3 {
        store.insert(&self_signed(&format!("Buffer CA {}", i)));
    }

    adapter.list_names(&store.handle()).unwrap();

    assert_eq!(store.distinct_name_buffers(), 1);
    assert_eq!(store.last_name_buffer_len(), Some(NAME_BUFFER_CHARS));
}

#[test]
fn test_list_truncates_long_names() {
    let store = MockNativeStore::new();
    let adapter = adapter(&store);
    let long_name = "L".repeat(NAME_BUFFER_CHARS + 20);
    store.insert(&self_signed(&long_name));

    let names = adapter.list_names(&store.handle()).unwrap();

    assert_eq!(names, vec!["L".repeat(NAME_BUFFER_CHARS - 1)]);
}

#[test]
fn test_list_failure_midway_discards_names() {
    let store = MockNativeStore::new();
    let adapter = adapter(&store);
    for i in 0..4 {
        store.insert(&self_signed(&format!("Partial CA {}", i)));
    }
    store.fail_enum_after(2, NativeError::new(ERROR_ACCESS_DENIED, "Access is denied."));

    let err = adapter.list(&store.handle()).unwrap_err();

    assert_eq!(err.operation(), Some(Operation::List));
    assert_eq!(err.native_code(), Some(ERROR_ACCESS_DENIED));

    let counters = store.counters();
    assert_eq!(counters.enum_calls, 3);
    assert_eq!(counters.releases, counters.enum_calls);
    assert_eq!(store.live_contexts(), 0);
}

#[test]
fn test_list_invalid_handle() {
    let store = MockNativeStore::new();
    store.insert(&self_signed("Unreachable CA"));
    let adapter = adapter(&store);

    let err = adapter.list(&MockStoreHandle(0)).unwrap_err();

    assert_eq!(err.operation(), Some(Operation::List));
    assert_eq!(err.native_code(), Some(E_INVALIDARG));
    assert_eq!(store.live_contexts(), 0);
}
