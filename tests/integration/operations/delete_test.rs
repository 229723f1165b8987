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

//! Integration tests for deleting certificates

use crate::integration::{
    ERROR_ACCESS_DENIED, MockNativeStore, adapter, issued_by, self_signed,
};
use md5::{Digest, Md5};
use win32_certstore::{
    DeleteOutcome, NativeError, Operation, Thumbprint, ThumbprintKind, certificate,
};

#[test]
fn test_delete_empty_name_makes_no_native_calls() {
    let store = MockNativeStore::new();
    let adapter = adapter(&store);
    store.insert(&self_signed("Untouched CA"));

    let outcome = adapter.delete(&store.handle(), "").unwrap();

    assert_eq!(
        outcome,
        DeleteOutcome::NotFound {
            name: String::new()
        }
    );
    assert_eq!(store.counters(), Default::default());
    assert_eq!(store.len(), 1);
}

#[test]
fn test_delete_whitespace_name_makes_no_native_calls() {
    let store = MockNativeStore::new();
    let adapter = adapter(&store);
    store.insert(&self_signed("Spaced Out CA"));

    let outcome = adapter.delete(&store.handle(), " \t ").unwrap();

    assert!(!outcome.is_deleted());
    assert_eq!(outcome.name(), " \t ");
    assert_eq!(store.counters(), Default::default());
    assert_eq!(store.len(), 1);
}

#[test]
fn test_delete_by_issuer_name() {
    let store = MockNativeStore::new();
    let adapter = adapter(&store);
    let doomed = self_signed("Doomed Root CA");
    let kept = self_signed("Kept Root CA");
    store.insert(&doomed);
    store.insert(&kept);

    let outcome = adapter.delete(&store.handle(), "Doomed Root CA").unwrap();

    assert!(outcome.is_deleted());
    assert_eq!(
        outcome.to_string(),
        "Deleted certificate Doomed Root CA successfully"
    );

    let names: Vec<String> =
        serde_json::from_str(&adapter.list(&store.handle()).unwrap()).unwrap();
    assert_eq!(names, vec!["Kept Root CA"]);

    let thumbprint = certificate::sha1_thumbprint(&doomed).unwrap();
    assert!(
        adapter
            .get(&store.handle(), thumbprint.as_str())
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_delete_matches_issuer_substring_case_insensitive() {
    let store = MockNativeStore::new();
    let adapter = adapter(&store);
    store.insert(&self_signed("Example Issuing CA 2"));

    let outcome = adapter.delete(&store.handle(), "example issuing").unwrap();

    assert!(outcome.is_deleted());
    assert_eq!(outcome.name(), "example issuing");
    assert_eq!(store.len(), 0);
}

#[test]
fn test_delete_releases_contexts() {
    let store = MockNativeStore::new();
    let adapter = adapter(&store);
    store.insert(&self_signed("Context CA"));

    adapter.delete(&store.handle(), "Context CA").unwrap();

    let counters = store.counters();
    assert_eq!(counters.find_calls, 1);
    assert_eq!(counters.duplicate_calls, 1);
    assert_eq!(counters.delete_calls, 1);
    assert_eq!(counters.free_calls, 1);
    assert_eq!(store.live_contexts(), 0);
}

#[test]
fn test_delete_by_thumbprint() {
    let store = MockNativeStore::new();
    let adapter = adapter(&store);
    let (ca, leaf) = issued_by("Shared Issuing CA", "leaf.example.com");
    store.insert(&ca);
    store.insert(&leaf);

    // Both certificates share an issuer; the hash picks the leaf
    let thumbprint = certificate::sha1_thumbprint(&leaf).unwrap();
    let outcome = adapter
        .delete(&store.handle(), &thumbprint.to_colon_hex())
        .unwrap();

    assert!(outcome.is_deleted());
    assert_eq!(store.len(), 1);
    assert!(store.contains_der(&certificate::encode_der(&ca).unwrap()));
    assert_eq!(store.live_contexts(), 0);
}

#[test]
fn test_delete_by_md5_thumbprint() {
    let store = MockNativeStore::new();
    let adapter = adapter(&store);
    let (ca, leaf) = issued_by("Digest Issuing CA", "md5.example.com");
    store.insert(&ca);
    store.insert(&leaf);

    let der = certificate::encode_der(&leaf).unwrap();
    let thumbprint = Thumbprint::from_bytes(&Md5::digest(&der)).unwrap();
    assert_eq!(thumbprint.kind(), Some(ThumbprintKind::Md5));

    let outcome = adapter
        .delete(&store.handle(), &thumbprint.as_str().to_lowercase())
        .unwrap();

    assert!(outcome.is_deleted());
    assert!(!store.contains_der(&der));
    assert!(store.contains_der(&certificate::encode_der(&ca).unwrap()));
    assert_eq!(store.counters().find_calls, 1);
    assert_eq!(store.live_contexts(), 0);
}

#[test]
fn test_delete_not_found() {
    let store = MockNativeStore::new();
    let adapter = adapter(&store);
    store.insert(&self_signed("Present CA"));

    let outcome = adapter.delete(&store.handle(), "Absent CA").unwrap();

    assert!(!outcome.is_deleted());
    assert_eq!(
        outcome.to_string(),
        "Cannot find certificate with name as `Absent CA`. \
         Please re-verify certificate Issuer name or Friendly name"
    );
    assert_eq!(store.len(), 1);
    assert_eq!(store.counters().delete_calls, 0);
    assert_eq!(store.live_contexts(), 0);
}

#[test]
fn test_delete_find_failure() {
    let store = MockNativeStore::new();
    let adapter = adapter(&store);
    store.insert(&self_signed("Locked CA"));
    store.fail_find(NativeError::new(ERROR_ACCESS_DENIED, "Access is denied."));

    let err = adapter.delete(&store.handle(), "Locked CA").unwrap_err();

    assert_eq!(err.operation(), Some(Operation::Delete));
    assert_eq!(err.native_code(), Some(ERROR_ACCESS_DENIED));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_delete_native_failure_still_releases() {
    let store = MockNativeStore::new();
    let adapter = adapter(&store);
    store.insert(&self_signed("Stubborn CA"));
    store.fail_delete(NativeError::new(ERROR_ACCESS_DENIED, "Access is denied."));

    let err = adapter.delete(&store.handle(), "Stubborn CA").unwrap_err();

    assert_eq!(err.operation(), Some(Operation::Delete));
    assert_eq!(err.native_code(), Some(ERROR_ACCESS_DENIED));
    assert_eq!(store.len(), 1);
    assert_eq!(store.live_contexts(), 0);
}
