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

//! CryptoAPI (`crypt32.dll`) implementation of [`CertStoreApi`].
//!
//! The store handle is an `HCERTSTORE` opened by the caller, e.g. with
//! `CertOpenStore(CERT_STORE_PROV_SYSTEM_W, ..)`. It must stay open for as
//! long as any call using it is in progress.

use windows::Win32::Foundation::GetLastError;
use windows::Win32::Security::Cryptography::{
    CERT_CONTEXT, CERT_FIND_FLAGS, CERT_QUERY_ENCODING_TYPE, CRYPT_INTEGER_BLOB,
    CertAddEncodedCertificateToStore, CertDeleteCertificateFromStore,
    CertDuplicateCertificateContext, CertEnumCertificatesInStore, CertFindCertificateInStore,
    CertFreeCertificateContext, CertGetNameStringW, HCERTSTORE,
};
use windows::core::HRESULT;

use super::{CertStoreApi, FindPara, NativeError};

/// The system certificate store API.
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32CertStore;

impl Win32CertStore {
    /// Create a handle to the system API.
    pub fn new() -> Self {
        Self
    }
}

fn non_null(context: *mut CERT_CONTEXT) -> Option<*const CERT_CONTEXT> {
    if context.is_null() {
        None
    } else {
        Some(context as *const CERT_CONTEXT)
    }
}

impl CertStoreApi for Win32CertStore {
    type Store = HCERTSTORE;
    type Context = *const CERT_CONTEXT;

    fn add_encoded_certificate(
        &self,
        store: &HCERTSTORE,
        encoding: u32,
        encoded: &[u8],
        disposition: u32,
    ) -> bool {
        // SAFETY: `encoded` outlives the call and no output context is requested.
        let result = unsafe {
            CertAddEncodedCertificateToStore(
                *store,
                CERT_QUERY_ENCODING_TYPE(encoding),
                encoded,
                disposition,
                None,
            )
        };
        result.is_ok()
    }

    unsafe fn enum_certificates(
        &self,
        store: &HCERTSTORE,
        prev: Option<*const CERT_CONTEXT>,
    ) -> Option<*const CERT_CONTEXT> {
        // SAFETY: `prev` is live per the trait contract and is released by this call.
        non_null(unsafe { CertEnumCertificatesInStore(*store, prev) })
    }

    unsafe fn get_name_string(
        &self,
        context: *const CERT_CONTEXT,
        name_type: u32,
        flags: u32,
        name: &mut [u16],
    ) -> u32 {
        // SAFETY: `context` is live per the trait contract; the slice length is
        // passed as the character count.
        unsafe { CertGetNameStringW(context, name_type, flags, None, Some(name)) }
    }

    fn find_certificate(
        &self,
        store: &HCERTSTORE,
        encoding: u32,
        find_flags: u32,
        find_type: u32,
        para: FindPara<'_>,
    ) -> Option<*const CERT_CONTEXT> {
        let blob;
        let para_ptr: *const std::ffi::c_void = match para {
            FindPara::WideString(name) => name.as_ptr().cast(),
            FindPara::Hash(hash) => {
                blob = CRYPT_INTEGER_BLOB {
                    cbData: hash.len() as u32,
                    pbData: hash.as_ptr() as *mut u8,
                };
                (&blob as *const CRYPT_INTEGER_BLOB).cast()
            }
        };

        // SAFETY: `para_ptr` points at a NUL-terminated wide string or a blob
        // over `hash`, both of which outlive the call.
        let context = unsafe {
            CertFindCertificateInStore(
                *store,
                CERT_QUERY_ENCODING_TYPE(encoding),
                find_flags,
                CERT_FIND_FLAGS(find_type),
                Some(para_ptr),
                None,
            )
        };
        non_null(context)
    }

    unsafe fn duplicate_context(
        &self,
        context: *const CERT_CONTEXT,
    ) -> Option<*const CERT_CONTEXT> {
        // SAFETY: `context` is live per the trait contract.
        non_null(unsafe { CertDuplicateCertificateContext(Some(context)) })
    }

    unsafe fn delete_certificate(&self, context: *const CERT_CONTEXT) -> bool {
        // SAFETY: `context` is live per the trait contract and is released by this call.
        unsafe { CertDeleteCertificateFromStore(context) }.is_ok()
    }

    unsafe fn free_context(&self, context: Option<*const CERT_CONTEXT>) -> bool {
        // SAFETY: `context` is `None` or live per the trait contract.
        unsafe { CertFreeCertificateContext(context) }.as_bool()
    }

    fn last_error(&self) -> NativeError {
        // SAFETY: FFI call with no preconditions.
        let code = unsafe { GetLastError() };
        let message = HRESULT::from_win32(code.0).message();
        NativeError::new(code.0, message.trim_end())
    }
}
