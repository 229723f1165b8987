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

//! Certificate retrieval through an external query process.
//!
//! Fetching a certificate by thumbprint is delegated to PowerShell's `Cert:`
//! drive, which prints the certificate as PEM. The call blocks until the
//! process exits; no timeout is applied.

use std::process::Command;

use crate::config::QueryConfig;
use crate::error::{CertStoreError, Result};
use crate::thumbprint::{Thumbprint, ThumbprintKind};

/// Fetches a certificate's PEM text by thumbprint.
pub trait CertificateQuery {
    /// Return the PEM text of the certificate with `thumbprint`, or an empty
    /// string if no certificate matches.
    fn fetch_pem(&self, thumbprint: &Thumbprint) -> Result<String>;
}

impl<T: CertificateQuery + ?Sized> CertificateQuery for &T {
    fn fetch_pem(&self, thumbprint: &Thumbprint) -> Result<String> {
        (**self).fetch_pem(thumbprint)
    }
}

/// Runs a PowerShell script against the `Cert:` drive.
#[derive(Debug, Clone, Default)]
pub struct PowerShellQuery {
    config: QueryConfig,
}

impl PowerShellQuery {
    /// Create a query runner with the given configuration.
    pub fn new(config: QueryConfig) -> Self {
        Self { config }
    }

    /// The query configuration.
    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Build the script that prints the certificate with `thumbprint` as PEM.
    ///
    /// The thumbprint is validated hex, so it is safe to embed in the script.
    /// `Thumbprint` on the `Cert:` drive is always SHA-1, so MD5 thumbprints
    /// are compared against an MD5 of the raw certificate data.
    pub fn script(&self, thumbprint: &Thumbprint) -> String {
        let recurse = if self.config.recurse { " -Recurse" } else { "" };
        let hash = match thumbprint.kind() {
            Some(ThumbprintKind::Md5) => {
                "([System.BitConverter]::ToString(\
                 [System.Security.Cryptography.MD5]::Create().ComputeHash($_.RawData)) \
                 -replace '-', '')"
            }
            _ => "$_.Thumbprint",
        };
        format!(
            "$cert = Get-ChildItem -Path '{path}'{recurse} | \
             Where-Object {{ -not $_.PSIsContainer -and {hash} -eq '{thumbprint}' }} | \
             Select-Object -First 1\n\
             if ($null -ne $cert) {{\n\
             '-----BEGIN CERTIFICATE-----'\n\
             [System.Convert]::ToBase64String($cert.RawData, 'InsertLineBreaks')\n\
             '-----END CERTIFICATE-----'\n\
             }}",
            path = self.config.store_path.replace('\'', "''"),
            recurse = recurse,
            hash = hash,
            thumbprint = thumbprint.as_str(),
        )
    }

    /// Build the command for `thumbprint` without running it.
    pub fn command(&self, thumbprint: &Thumbprint) -> Command {
        let mut command = Command::new(&self.config.program);
        command
            .args(&self.config.args)
            .arg("-Command")
            .arg(self.script(thumbprint));
        command
    }
}

impl CertificateQuery for PowerShellQuery {
    fn fetch_pem(&self, thumbprint: &Thumbprint) -> Result<String> {
        tracing::debug!(
            program = %self.config.program,
            store_path = %self.config.store_path,
            %thumbprint,
            "querying certificate"
        );

        let output = self.command(thumbprint).output().map_err(|e| {
            CertStoreError::query(format!("Failed to run {}: {}", self.config.program, e))
        })?;

        if !output.status.success() {
            return Err(CertStoreError::query(format!(
                "{} exited with {}: {}",
                self.config.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| CertStoreError::parse(format!("Query output is not UTF-8: {}", e)))
    }
}
