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

//! Owning guards for native certificate contexts.
//!
//! Raw contexts never escape these types. Dropping a guard releases the
//! context it owns, so every early return and `?` in the adapter frees what
//! it acquired.

use std::mem::ManuallyDrop;

use super::{CertStoreApi, FindPara, wide};

/// An owned certificate context, released on drop.
pub(crate) struct CertContext<'a, A: CertStoreApi> {
    api: &'a A,
    /// INVARIANT: a live context owned by this guard.
    raw: A::Context,
}

impl<'a, A: CertStoreApi> CertContext<'a, A> {
    /// Find the first certificate matching `para`.
    pub(crate) fn find(
        api: &'a A,
        store: &A::Store,
        encoding: u32,
        find_type: u32,
        para: FindPara<'_>,
    ) -> Option<Self> {
        api.find_certificate(store, encoding, 0, find_type, para)
            .map(|raw| Self { api, raw })
    }

    /// Duplicate the context. Both guards must be released independently.
    pub(crate) fn duplicate(&self) -> Option<Self> {
        // SAFETY: `self.raw` is live per invariant.
        unsafe { self.api.duplicate_context(self.raw) }.map(|raw| Self { api: self.api, raw })
    }

    /// Delete the certificate from its store.
    ///
    /// Deletion consumes the context whatever the outcome, so the guard is
    /// not dropped afterwards.
    pub(crate) fn delete(self) -> bool {
        let this = ManuallyDrop::new(self);
        // SAFETY: `this.raw` is live per invariant and ownership passes to the
        // native call, which releases it even on failure.
        unsafe { this.api.delete_certificate(this.raw) }
    }
}

impl<A: CertStoreApi> Drop for CertContext<'_, A> {
    fn drop(&mut self) {
        // SAFETY: `self.raw` is live and owned per invariant; it is not used again.
        let freed = unsafe { self.api.free_context(Some(self.raw)) };

        if !freed {
            let error = self.api.last_error();
            tracing::warn!(%error, "failed to free certificate context");
        }
    }
}

/// Cursor over `CertEnumCertificatesInStore`.
///
/// Each advance hands the previous context back to the native API, which
/// releases it. Dropping the cursor releases whatever it still holds; once
/// enumeration is exhausted that is the terminal null context.
pub(crate) struct Enumeration<'a, A: CertStoreApi> {
    api: &'a A,
    store: &'a A::Store,
    /// INVARIANT: `None` or a live context owned by this cursor.
    current: Option<A::Context>,
}

impl<'a, A: CertStoreApi> Enumeration<'a, A> {
    /// Start before the first certificate.
    pub(crate) fn new(api: &'a A, store: &'a A::Store) -> Self {
        Self {
            api,
            store,
            current: None,
        }
    }

    /// Move to the next certificate. Returns false at the end of the store
    /// or on failure; check the last error to tell them apart.
    pub(crate) fn advance(&mut self) -> bool {
        let prev = self.current.take();
        // SAFETY: `prev` is `None` or live and owned per invariant; the native
        // call takes ownership of it.
        self.current = unsafe { self.api.enum_certificates(self.store, prev) };
        self.current.is_some()
    }

    /// Read a name string of the current certificate into `buffer`.
    ///
    /// Returns `None` if the cursor is not positioned on a certificate.
    pub(crate) fn name_string(
        &self,
        name_type: u32,
        flags: u32,
        buffer: &mut [u16],
    ) -> Option<String> {
        let context = self.current?;
        // SAFETY: `context` is live per invariant.
        let written = unsafe { self.api.get_name_string(context, name_type, flags, buffer) };
        let written = (written as usize).min(buffer.len());
        Some(wide::from_wide_nul(&buffer[..written]))
    }
}

impl<A: CertStoreApi> Drop for Enumeration<'_, A> {
    fn drop(&mut self) {
        // SAFETY: `current` is `None` or live and owned per invariant.
        let freed = unsafe { self.api.free_context(self.current.take()) };

        if !freed {
            let error = self.api.last_error();
            tracing::warn!(%error, "failed to free enumeration context");
        }
    }
}
