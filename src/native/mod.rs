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

//! Native certificate store API seam.
//!
//! [`CertStoreApi`] mirrors the handful of CryptoAPI primitives the adapter
//! needs, keeping their argument order and constants. On Windows the
//! [`Win32CertStore`] implementation forwards straight to `crypt32.dll`;
//! tests provide an in-memory implementation.
//!
//! # Context ownership
//!
//! Contexts returned by [`CertStoreApi::enum_certificates`],
//! [`CertStoreApi::find_certificate`] and
//! [`CertStoreApi::duplicate_context`] are owned by the caller until they are
//! handed back through `enum_certificates` (as the previous context),
//! [`CertStoreApi::delete_certificate`] or [`CertStoreApi::free_context`].
//! The crate never touches raw contexts outside its owning context guards.

pub(crate) mod context;
pub mod wide;

#[cfg(windows)]
pub mod win32;

#[cfg(windows)]
pub use win32::Win32CertStore;

use std::fmt;

/// Certificate encoding type: ASN.1 X.509.
pub const X509_ASN_ENCODING: u32 = 0x0000_0001;

/// Add disposition: replace any existing certificate with the same content.
pub const CERT_STORE_ADD_REPLACE_EXISTING: u32 = 3;

/// Name type: friendly display name, falling back to the common name.
pub const CERT_NAME_FRIENDLY_DISPLAY_TYPE: u32 = 5;

/// Name flag: read the issuer name instead of the subject name.
pub const CERT_NAME_ISSUER_FLAG: u32 = 0x1;

/// Find type: case-insensitive substring match on the issuer name (wide string).
pub const CERT_FIND_ISSUER_STR: u32 = 0x0008_0004;

/// Find type: SHA-1 hash of the encoded certificate.
pub const CERT_FIND_SHA1_HASH: u32 = 0x0001_0000;

/// Find type: MD5 hash of the encoded certificate.
pub const CERT_FIND_MD5_HASH: u32 = 0x0004_0000;

/// Last error after a search or enumeration that found nothing more.
pub const CRYPT_E_NOT_FOUND: u32 = 0x8009_2004;

/// Last error after enumeration ran off the end of the store.
pub const ERROR_NO_MORE_FILES: u32 = 18;

/// Capacity, in wide characters, of the name buffer used while listing.
pub const NAME_BUFFER_CHARS: usize = 128;

/// Error code and message returned by the native last-error lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeError {
    /// Native error code (`GetLastError` on Windows).
    pub code: u32,
    /// System message for `code`.
    pub message: String,
}

impl NativeError {
    /// Create a new native error.
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Returns true if the code means "no (more) matching certificates".
    pub fn is_not_found(&self) -> bool {
        self.code == CRYPT_E_NOT_FOUND || self.code == ERROR_NO_MORE_FILES
    }
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}: {}", self.code, self.message)
    }
}

/// Search parameter for [`CertStoreApi::find_certificate`].
#[derive(Debug, Clone, Copy)]
pub enum FindPara<'a> {
    /// NUL-terminated wide string, used with [`CERT_FIND_ISSUER_STR`].
    WideString(&'a [u16]),
    /// Hash blob, used with [`CERT_FIND_SHA1_HASH`] and [`CERT_FIND_MD5_HASH`].
    Hash(&'a [u8]),
}

/// The native certificate store primitives used by the adapter.
///
/// # Safety contract
///
/// The `unsafe` methods take a context that must have been produced by the
/// same implementation and not yet released. Passing a released context is
/// a use-after-free on Windows.
pub trait CertStoreApi {
    /// Handle to an opened store. Borrowed for each call, never opened or
    /// closed through this trait.
    type Store;

    /// Opaque reference to a certificate record within a store.
    type Context: Copy;

    /// `CertAddEncodedCertificateToStore` with no output context.
    ///
    /// Returns `false` on failure; the reason is available from
    /// [`CertStoreApi::last_error`].
    fn add_encoded_certificate(
        &self,
        store: &Self::Store,
        encoding: u32,
        encoded: &[u8],
        disposition: u32,
    ) -> bool;

    /// `CertEnumCertificatesInStore`.
    ///
    /// A `prev` context is always released by this call, even on error.
    ///
    /// # Safety
    ///
    /// `prev` must be a live context from this implementation.
    unsafe fn enum_certificates(
        &self,
        store: &Self::Store,
        prev: Option<Self::Context>,
    ) -> Option<Self::Context>;

    /// `CertGetNameStringW`.
    ///
    /// `name` receives a NUL-terminated wide string; its length is passed as
    /// a character count. Returns the number of characters written including
    /// the terminator.
    ///
    /// # Safety
    ///
    /// `context` must be a live context from this implementation.
    unsafe fn get_name_string(
        &self,
        context: Self::Context,
        name_type: u32,
        flags: u32,
        name: &mut [u16],
    ) -> u32;

    /// `CertFindCertificateInStore`, returning the first match.
    fn find_certificate(
        &self,
        store: &Self::Store,
        encoding: u32,
        find_flags: u32,
        find_type: u32,
        para: FindPara<'_>,
    ) -> Option<Self::Context>;

    /// `CertDuplicateCertificateContext`.
    ///
    /// # Safety
    ///
    /// `context` must be a live context from this implementation.
    unsafe fn duplicate_context(&self, context: Self::Context) -> Option<Self::Context>;

    /// `CertDeleteCertificateFromStore`.
    ///
    /// The context is released by this call whether or not it succeeds.
    ///
    /// # Safety
    ///
    /// `context` must be a live context from this implementation.
    unsafe fn delete_certificate(&self, context: Self::Context) -> bool;

    /// `CertFreeCertificateContext`. Releasing `None` is a no-op that succeeds.
    ///
    /// # Safety
    ///
    /// `context`, if any, must be a live context from this implementation.
    unsafe fn free_context(&self, context: Option<Self::Context>) -> bool;

    /// `GetLastError` plus the system message for it.
    fn last_error(&self) -> NativeError;
}

impl<T: CertStoreApi + ?Sized> CertStoreApi for &T {
    type Store = T::Store;
    type Context = T::Context;

    fn add_encoded_certificate(
        &self,
        store: &Self::Store,
        encoding: u32,
        encoded: &[u8],
        disposition: u32,
    ) -> bool {
        (**self).add_encoded_certificate(store, encoding, encoded, disposition)
    }

    unsafe fn enum_certificates(
        &self,
        store: &Self::Store,
        prev: Option<Self::Context>,
    ) -> Option<Self::Context> {
        // SAFETY: forwarded with the caller's guarantees.
        unsafe { (**self).enum_certificates(store, prev) }
    }

    unsafe fn get_name_string(
        &self,
        context: Self::Context,
        name_type: u32,
        flags: u32,
        name: &mut [u16],
    ) -> u32 {
        // SAFETY: forwarded with the caller's guarantees.
        unsafe { (**self).get_name_string(context, name_type, flags, name) }
    }

    fn find_certificate(
        &self,
        store: &Self::Store,
        encoding: u32,
        find_flags: u32,
        find_type: u32,
        para: FindPara<'_>,
    ) -> Option<Self::Context> {
        (**self).find_certificate(store, encoding, find_flags, find_type, para)
    }

    unsafe fn duplicate_context(&self, context: Self::Context) -> Option<Self::Context> {
        // SAFETY: forwarded with the caller's guarantees.
        unsafe { (**self).duplicate_context(context) }
    }

    unsafe fn delete_certificate(&self, context: Self::Context) -> bool {
        // SAFETY: forwarded with the caller's guarantees.
        unsafe { (**self).delete_certificate(context) }
    }

    unsafe fn free_context(&self, context: Option<Self::Context>) -> bool {
        // SAFETY: forwarded with the caller's guarantees.
        unsafe { (**self).free_context(context) }
    }

    fn last_error(&self) -> NativeError {
        (**self).last_error()
    }
}
