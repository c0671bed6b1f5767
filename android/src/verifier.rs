// Copyright (c) 2023 The MobileCoin Foundation

//! Verification and classification of attestation certificate chains.
//!
//! Verification never stops at the first problem. Every certificate of the
//! chain is checked and the findings are reported per certificate, leaving
//! the decision on what to accept to the caller.

extern crate alloc;

use crate::attestation::PROVISIONING_INFO_OID;
use crate::revocation::RevocationList;
use crate::roots::{RootIdentity, TrustedRoots};
use crate::x509::{self, Certificate};
use alloc::vec::Vec;
use core::time::Duration;

/// Source of the current time
pub trait Clock {
    /// The time since the Unix epoch
    fn now(&self) -> Duration;
}

/// A fixed point in time since the Unix epoch
impl Clock for Duration {
    fn now(&self) -> Duration {
        *self
    }
}

/// The system's wall clock
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now(&self) -> Duration {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
    }
}

/// The most severe finding for a certificate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CertStatus {
    /// No findings
    Valid,
    /// Outside of the validity window
    Expired,
    /// The serial number is on the revocation list
    Revoked,
    /// Not signed by the next certificate of the chain
    SignatureInvalid,
}

impl CertStatus {
    fn from_findings(findings: &[x509::Error]) -> Self {
        if findings.contains(&x509::Error::CertificateRevoked) {
            CertStatus::Revoked
        } else if findings.iter().any(is_validity_finding) {
            CertStatus::Expired
        } else if findings.iter().any(is_signature_finding) {
            CertStatus::SignatureInvalid
        } else {
            CertStatus::Valid
        }
    }
}

/// The result of checking one certificate of a chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateInfo {
    /// The certificate
    pub certificate: Certificate,
    /// The most severe finding
    pub status: CertStatus,
    /// The registry identity of the key that signed the certificate
    pub issuer: RootIdentity,
    /// Every finding, in the order they were checked
    pub failure_detail: Vec<x509::Error>,
}

/// The result of verifying a chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustResult {
    /// One entry per certificate, the leaf first
    pub per_certificate: Vec<CertificateInfo>,
    /// What the chain terminates in
    pub overall: RootIdentity,
    /// Whether the chain terminates in a Google root and nothing was revoked
    /// or mis-signed
    pub trusted: bool,
}

impl TrustResult {
    /// Whether any certificate is outside its validity window.
    ///
    /// Expiry doesn't affect [`TrustResult::trusted`], this is a warning.
    pub fn has_expired(&self) -> bool {
        self.per_certificate
            .iter()
            .any(|info| info.failure_detail.iter().any(is_validity_finding))
    }

    /// The result for the leaf certificate
    pub fn leaf(&self) -> Option<&CertificateInfo> {
        self.per_certificate.first()
    }
}

/// Verify `chain`, ordered from the leaf to the root.
///
/// Each certificate's signature is checked against the key of the certificate
/// after it. The root's own signature is not checked, the root is identified
/// by the fingerprint of its key in `trusted_roots`.
pub fn verify(
    chain: &[Certificate],
    trusted_roots: &TrustedRoots,
    revocations: Option<&RevocationList>,
    clock: &impl Clock,
) -> TrustResult {
    let Some(root) = chain.last() else {
        log::debug!("Empty certificate chain");
        return TrustResult {
            per_certificate: Vec::new(),
            overall: RootIdentity::Unknown,
            trusted: false,
        };
    };

    let now = clock.now();
    let mut per_certificate = Vec::with_capacity(chain.len());
    for (index, certificate) in chain.iter().enumerate() {
        let signer = chain.get(index + 1);
        let mut failure_detail = Vec::new();

        if let Some(signer) = signer {
            if let Err(e) = signer
                .public_key()
                .and_then(|key| certificate.verify_signature(&key))
            {
                log::warn!("Certificate {index} of the chain has a bad signature: {e}");
                failure_detail.push(e);
            }
        }

        if let Err(e) = certificate.check_validity(now) {
            log::debug!("Certificate {index} of the chain: {e}");
            failure_detail.push(e);
        }

        let revoked = revocations
            .and_then(|list| list.lookup(certificate.serial_number()))
            .is_some();
        if revoked {
            log::debug!(
                "Certificate {index} of the chain has revoked serial {}",
                certificate.serial_hex()
            );
            failure_detail.push(x509::Error::CertificateRevoked);
        }

        per_certificate.push(CertificateInfo {
            certificate: certificate.clone(),
            status: CertStatus::from_findings(&failure_detail),
            issuer: identity(signer.unwrap_or(certificate), trusted_roots),
            failure_detail,
        });
    }

    let findings = || per_certificate.iter().flat_map(|info| &info.failure_detail);
    let chain_broken = findings().any(is_signature_finding);
    let revoked = findings().any(|e| e == &x509::Error::CertificateRevoked);

    let overall = match identity(root, trusted_roots) {
        _ if chain_broken => RootIdentity::ChainBroken,
        RootIdentity::GoogleHardware if remotely_provisioned(chain) => RootIdentity::GoogleRkp,
        identity => identity,
    };
    let trusted = !revoked
        && matches!(
            overall,
            RootIdentity::GoogleHardware | RootIdentity::GoogleRkp
        );

    TrustResult {
        per_certificate,
        overall,
        trusted,
    }
}

fn identity(certificate: &Certificate, trusted_roots: &TrustedRoots) -> RootIdentity {
    match certificate.fingerprint() {
        Ok(fingerprint) => trusted_roots.lookup(&fingerprint),
        Err(_) => RootIdentity::Unknown,
    }
}

/// Whether a certificate below the root carries the remote key provisioning
/// info extension
fn remotely_provisioned(chain: &[Certificate]) -> bool {
    let below_root = &chain[..chain.len().saturating_sub(1)];
    below_root
        .iter()
        .any(|certificate| certificate.extension(&PROVISIONING_INFO_OID).is_some())
}

fn is_validity_finding(error: &x509::Error) -> bool {
    matches!(
        error,
        x509::Error::CertificateExpired | x509::Error::CertificateNotYetValid
    )
}

fn is_signature_finding(error: &x509::Error) -> bool {
    matches!(
        error,
        x509::Error::SignatureVerification
            | x509::Error::SignatureDecoding
            | x509::Error::KeyDecoding
    )
}
