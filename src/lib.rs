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

//! # win32-certstore
//!
//! Add, retrieve, list and delete X.509 certificates in the Windows
//! certificate store.
//!
//! The crate is the marshalling layer between [`x509_cert::Certificate`] and
//! the handle-based CryptoAPI: it encodes certificates for the native add
//! call, decodes wide-character names, maps native error codes, and releases
//! every certificate context it acquires on every exit path.
//!
//! ## Features
//!
//! - **add**: store a certificate, replacing an existing copy
//! - **get**: fetch a certificate by SHA-1 or MD5 thumbprint
//! - **list**: issuer display names of every certificate, as JSON
//! - **delete**: remove a certificate by issuer name or thumbprint
//!
//! Opening and closing stores is left to the caller.
//!
//! ## Quick Start
//!
//! ```no_run,ignore
//! use win32_certstore::{CertStoreAdapter, CertStoreConfig};
//!
//! let adapter = CertStoreAdapter::system(&CertStoreConfig::default());
//!
//! // `store` is an HCERTSTORE from CertOpenStore
//! let names = adapter.list(&store)?;
//! println!("{}", names);
//! ```
//!
//! ## Collaborators
//!
//! [`CertStoreAdapter`] is generic over the native API ([`CertStoreApi`])
//! and the thumbprint query ([`CertificateQuery`]). On Windows these are
//! [`Win32CertStore`] and [`PowerShellQuery`]; tests substitute in-memory
//! implementations.
//!
//! ## Cargo Features
//!
//! - `logging` (default): [`logging::init`] installs a `tracing-subscriber` logger

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod certificate;
pub mod config;
pub mod error;
pub mod logging;
pub mod native;
pub mod query;
pub mod store;
pub mod thumbprint;

// Re-export main types at crate root for convenience
pub use config::{CertStoreConfig, QueryConfig};
pub use error::{CertStoreError, Operation, Result};
pub use native::{CertStoreApi, FindPara, NativeError};
#[cfg(windows)]
pub use native::Win32CertStore;
pub use query::{CertificateQuery, PowerShellQuery};
pub use store::{CertStoreAdapter, DeleteOutcome};
pub use thumbprint::{Thumbprint, ThumbprintKind};

// Re-export x509_cert::Certificate for convenience
pub use x509_cert::Certificate;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
