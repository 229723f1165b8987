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

//! Certificate store operations.
//!
//! [`CertStoreAdapter`] adds, retrieves, lists and deletes certificates in a
//! store opened elsewhere. The store handle is borrowed for each call; the
//! adapter never opens or closes it.
//!
//! # Example
//!
//! ```no_run,ignore
//! use win32_certstore::{CertStoreAdapter, Win32CertStore, PowerShellQuery};
//!
//! let adapter = CertStoreAdapter::new(Win32CertStore::new(), PowerShellQuery::default());
//!
//! adapter.add(&store, &certificate)?;
//! println!("{}", adapter.list(&store)?);
//!
//! if let Some(cert) = adapter.get(&store, "3b:7e:03:27:a1:bf:3c:9a:5e:8c:1a:1c:6e:5e:f6:7b:11:7c:24:22")? {
//!     println!("Issuer: {}", cert.tbs_certificate.issuer);
//! }
//!
//! println!("{}", adapter.delete(&store, "Example Issuing CA")?);
//! ```
//!
//! # Threading
//!
//! Calls are synchronous. The adapter does no locking; callers sharing a
//! store handle between threads must serialize access themselves.

use std::fmt;

use x509_cert::Certificate;

use crate::certificate;
use crate::config::CertStoreConfig;
use crate::error::{CertStoreError, Operation, Result};
use crate::native::context::{CertContext, Enumeration};
use crate::native::{
    CERT_FIND_ISSUER_STR, CERT_FIND_MD5_HASH, CERT_FIND_SHA1_HASH, CERT_NAME_FRIENDLY_DISPLAY_TYPE,
    CERT_NAME_ISSUER_FLAG, CERT_STORE_ADD_REPLACE_EXISTING, CertStoreApi, FindPara,
    NAME_BUFFER_CHARS, X509_ASN_ENCODING, wide,
};
use crate::query::{CertificateQuery, PowerShellQuery};
use crate::thumbprint::{Thumbprint, ThumbprintKind};

/// Result of [`CertStoreAdapter::delete`].
///
/// Not finding a certificate is an expected outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The certificate was removed from the store.
    Deleted {
        /// The identifier the caller passed.
        name: String,
    },
    /// No certificate matched.
    NotFound {
        /// The identifier the caller passed.
        name: String,
    },
}

impl DeleteOutcome {
    /// Returns true if a certificate was deleted.
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted { .. })
    }

    /// The identifier the caller passed.
    pub fn name(&self) -> &str {
        match self {
            Self::Deleted { name } | Self::NotFound { name } => name,
        }
    }
}

impl fmt::Display for DeleteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deleted { name } => write!(f, "Deleted certificate {} successfully", name),
            Self::NotFound { name } => write!(
                f,
                "Cannot find certificate with name as `{}`. \
                 Please re-verify certificate Issuer name or Friendly name",
                name
            ),
        }
    }
}

/// Certificate store adapter over a native store API and a certificate query.
#[derive(Debug, Clone)]
pub struct CertStoreAdapter<A, Q> {
    api: A,
    query: Q,
}

#[cfg(windows)]
impl CertStoreAdapter<crate::native::Win32CertStore, PowerShellQuery> {
    /// Adapter over the system store API, configured from `config`.
    pub fn system(config: &CertStoreConfig) -> Self {
        Self::new(
            crate::native::Win32CertStore::new(),
            PowerShellQuery::new(config.query.clone()),
        )
    }
}

impl<A: CertStoreApi> CertStoreAdapter<A, PowerShellQuery> {
    /// Adapter over `api` with the PowerShell query configured from `config`.
    pub fn with_config(api: A, config: &CertStoreConfig) -> Self {
        Self::new(api, PowerShellQuery::new(config.query.clone()))
    }
}

impl<A: CertStoreApi, Q: CertificateQuery> CertStoreAdapter<A, Q> {
    /// Create an adapter from its collaborators.
    pub fn new(api: A, query: Q) -> Self {
        Self { api, query }
    }

    /// The native store API.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// The certificate query.
    pub fn query(&self) -> &Q {
        &self.query
    }

    /// Add a certificate, replacing an existing copy.
    ///
    /// Returns `Ok(true)` on success.
    ///
    /// # Errors
    ///
    /// - [`CertStoreError::Validation`] if the certificate cannot be encoded
    /// - [`CertStoreError::NativeCall`] (`add`) if the store rejects it
    pub fn add(&self, store: &A::Store, certificate: &Certificate) -> Result<bool> {
        let der = certificate::encode_der(certificate)?;
        tracing::debug!(bytes = der.len(), "adding certificate");

        if self.api.add_encoded_certificate(
            store,
            X509_ASN_ENCODING,
            &der,
            CERT_STORE_ADD_REPLACE_EXISTING,
        ) {
            tracing::info!(subject = %certificate.tbs_certificate.subject, "certificate added");
            Ok(true)
        } else {
            let error = self.api.last_error();
            tracing::warn!(%error, "failed to add certificate");
            Err(CertStoreError::native(Operation::Add, error))
        }
    }

    /// Add a DER-encoded certificate.
    pub fn add_der(&self, store: &A::Store, der: &[u8]) -> Result<bool> {
        let certificate = certificate::parse_der(der)
            .map_err(|e| CertStoreError::validation(e.to_string()))?;
        self.add(store, &certificate)
    }

    /// Add a PEM-encoded certificate.
    pub fn add_pem(&self, store: &A::Store, pem: &str) -> Result<bool> {
        let certificate = certificate::parse_pem(pem)
            .map_err(|e| CertStoreError::validation(e.to_string()))?;
        self.add(store, &certificate)
    }

    /// Get a certificate by SHA-1 or MD5 thumbprint.
    ///
    /// Separators such as colons and spaces are ignored. Returns `Ok(None)`
    /// if no certificate matches. The store handle is accepted for symmetry
    /// with the other operations; retrieval goes through the query.
    ///
    /// # Errors
    ///
    /// - [`CertStoreError::Validation`] for a malformed thumbprint
    /// - [`CertStoreError::Query`] if the query process fails
    /// - [`CertStoreError::Parse`] if the returned PEM is malformed
    pub fn get(&self, _store: &A::Store, thumbprint: &str) -> Result<Option<Certificate>> {
        let thumbprint = Thumbprint::parse(thumbprint)?;
        tracing::debug!(%thumbprint, "getting certificate");

        let pem = self.query.fetch_pem(&thumbprint)?;
        if pem.trim().is_empty() {
            tracing::debug!(%thumbprint, "no certificate found");
            return Ok(None);
        }

        certificate::parse_pem(&pem).map(Some)
    }

    /// List certificate display names as a JSON array of strings.
    ///
    /// Each entry is the issuer's friendly display name, in the order the
    /// store enumerates certificates.
    pub fn list(&self, store: &A::Store) -> Result<String> {
        let names = self.list_names(store)?;
        Ok(serde_json::to_string(&names)?)
    }

    /// List certificate display names.
    ///
    /// # Errors
    ///
    /// [`CertStoreError::NativeCall`] (`list`) if enumeration fails; names
    /// collected before the failure are discarded.
    pub fn list_names(&self, store: &A::Store) -> Result<Vec<String>> {
        let mut buffer = [0u16; NAME_BUFFER_CHARS];
        let mut names = Vec::new();
        let mut cursor = Enumeration::new(&self.api, store);

        while cursor.advance() {
            if let Some(name) = cursor.name_string(
                CERT_NAME_FRIENDLY_DISPLAY_TYPE,
                CERT_NAME_ISSUER_FLAG,
                &mut buffer,
            ) {
                names.push(name);
            }
        }

        let error = self.api.last_error();
        if !error.is_not_found() {
            tracing::warn!(%error, listed = names.len(), "certificate enumeration failed");
            return Err(CertStoreError::native(Operation::List, error));
        }

        tracing::debug!(count = names.len(), "listed certificates");
        Ok(names)
    }

    /// Delete a certificate by issuer name or thumbprint.
    ///
    /// An identifier that parses as a thumbprint is first looked up by hash;
    /// otherwise, or if that finds nothing, the first certificate whose
    /// issuer contains `name` (case-insensitive) is deleted. An empty or
    /// whitespace-only name finds nothing and makes no native call.
    ///
    /// # Errors
    ///
    /// [`CertStoreError::NativeCall`] (`delete`) if the search, duplication
    /// or deletion fails.
    pub fn delete(&self, store: &A::Store, name: &str) -> Result<DeleteOutcome> {
        let not_found = || DeleteOutcome::NotFound {
            name: name.to_string(),
        };

        if name.trim().is_empty() {
            return Ok(not_found());
        }

        let Some(found) = self.find_for_delete(store, name)? else {
            tracing::debug!(name, "no certificate to delete");
            return Ok(not_found());
        };

        let duplicate = found
            .duplicate()
            .ok_or_else(|| CertStoreError::native(Operation::Delete, self.api.last_error()))?;

        if !duplicate.delete() {
            let error = self.api.last_error();
            tracing::warn!(name, %error, "failed to delete certificate");
            return Err(CertStoreError::native(Operation::Delete, error));
        }

        tracing::info!(name, "certificate deleted");
        Ok(DeleteOutcome::Deleted {
            name: name.to_string(),
        })
    }

    fn find_for_delete(
        &self,
        store: &A::Store,
        name: &str,
    ) -> Result<Option<CertContext<'_, A>>> {
        if let Ok(thumbprint) = Thumbprint::parse(name) {
            let find_type = match thumbprint.kind() {
                Some(ThumbprintKind::Md5) => CERT_FIND_MD5_HASH,
                _ => CERT_FIND_SHA1_HASH,
            };
            let hash = thumbprint.to_bytes();

            if let Some(found) = CertContext::find(
                &self.api,
                store,
                X509_ASN_ENCODING,
                find_type,
                FindPara::Hash(&hash),
            ) {
                return Ok(Some(found));
            }
            self.check_not_found()?;
        }

        let wide_name = wide::to_wide_nul(name);
        let found = CertContext::find(
            &self.api,
            store,
            X509_ASN_ENCODING,
            CERT_FIND_ISSUER_STR,
            FindPara::WideString(&wide_name),
        );
        if found.is_none() {
            self.check_not_found()?;
        }
        Ok(found)
    }

    /// After a search returned nothing, fail unless the reason was "not found".
    fn check_not_found(&self) -> Result<()> {
        let error = self.api.last_error();
        if error.is_not_found() {
            Ok(())
        } else {
            Err(CertStoreError::native(Operation::Delete, error))
        }
    }
}
