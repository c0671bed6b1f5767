// Copyright (c) 2023 The MobileCoin Foundation

#![doc = include_str!("../README.md")]
#![deny(missing_docs, missing_debug_implementations, unsafe_code)]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod application_id;
mod attestation;
mod authorization_list;
mod error;
mod knox;
pub mod labels;
pub mod revocation;
mod root_of_trust;
mod roots;
#[cfg(test)]
mod test_der;
pub mod tlv;
mod verifier;
pub mod x509;

pub use application_id::{ApplicationIdentity, PackageInfoEntry};
pub use attestation::{
    AttestationRecord, SecurityLevel, EAT_OID, KEY_DESCRIPTION_OID, PROVISIONING_INFO_OID,
};
pub use authorization_list::{AuthorizationList, PURPOSE_ATTEST_KEY};
pub use error::{Error, Result};
pub use knox::{AuthResult, IntegrityStatus, KnoxExtension, KNOX_OID};
pub use revocation::RevocationList;
pub use root_of_trust::{RootOfTrust, VerifiedBootState};
pub use roots::{RootIdentity, TrustedRoots};
#[cfg(feature = "std")]
pub use verifier::SystemClock;
pub use verifier::{verify, CertStatus, CertificateInfo, Clock, TrustResult};
