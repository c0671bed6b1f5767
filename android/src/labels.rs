// Copyright (c) 2023 The MobileCoin Foundation

//! Display names for the numeric values of an attestation.
//!
//! Every lookup returns `None` for values it doesn't know rather than
//! rejecting them, new Android releases regularly add values.

extern crate alloc;

use crate::attestation::SecurityLevel;
use crate::root_of_trust::VerifiedBootState;
use alloc::vec::Vec;

/// The attestation schema version
pub fn attestation_version(version: i64) -> Option<&'static str> {
    match version {
        1 => Some("Keymaster 2.0"),
        2 => Some("Keymaster 3.0"),
        3 => Some("Keymaster 4.0"),
        4 => Some("Keymaster 4.1"),
        100 => Some("KeyMint 1.0"),
        200 => Some("KeyMint 2.0"),
        300 => Some("KeyMint 3.0"),
        400 => Some("KeyMint 4.0"),
        _ => None,
    }
}

/// The Keymaster or KeyMint implementation version
pub fn keymaster_version(version: i64) -> Option<&'static str> {
    match version {
        0 => Some("Keymaster 0.2 or 0.3"),
        1 => Some("Keymaster 1.0"),
        2 => Some("Keymaster 2.0"),
        3 => Some("Keymaster 3.0"),
        4 => Some("Keymaster 4.0"),
        41 => Some("Keymaster 4.1"),
        100 => Some("KeyMint 1.0"),
        200 => Some("KeyMint 2.0"),
        300 => Some("KeyMint 3.0"),
        400 => Some("KeyMint 4.0"),
        _ => None,
    }
}

#[allow(missing_docs)]
pub fn security_level(level: SecurityLevel) -> Option<&'static str> {
    match level {
        SecurityLevel::Software => Some("Software"),
        SecurityLevel::TrustedEnvironment => Some("TEE"),
        SecurityLevel::StrongBox => Some("StrongBox"),
        SecurityLevel::Unrecognized(_) => None,
    }
}

#[allow(missing_docs)]
pub fn verified_boot_state(state: VerifiedBootState) -> Option<&'static str> {
    match state {
        VerifiedBootState::Verified => Some("Verified"),
        VerifiedBootState::SelfSigned => Some("Self-signed"),
        VerifiedBootState::Unverified => Some("Unverified"),
        VerifiedBootState::Failed => Some("Failed"),
        VerifiedBootState::Unrecognized(_) => None,
    }
}

/// Key algorithm, tag `[2]`
pub fn algorithm(algorithm: i32) -> Option<&'static str> {
    match algorithm {
        1 => Some("RSA"),
        3 => Some("EC"),
        32 => Some("AES"),
        33 => Some("3DES"),
        128 => Some("HMAC"),
        _ => None,
    }
}

/// Digest, tags `[5]` and `[203]`
pub fn digest(digest: i32) -> Option<&'static str> {
    match digest {
        0 => Some("NONE"),
        1 => Some("MD5"),
        2 => Some("SHA1"),
        3 => Some("SHA-2 224"),
        4 => Some("SHA-2 256"),
        5 => Some("SHA-2 384"),
        6 => Some("SHA-2 512"),
        _ => None,
    }
}

/// Padding mode, tag `[6]`
pub fn padding(padding: i32) -> Option<&'static str> {
    match padding {
        1 => Some("NONE"),
        2 => Some("OAEP"),
        3 => Some("PSS"),
        4 => Some("PKCS1 ENCRYPT"),
        5 => Some("PKCS1 SIGN"),
        64 => Some("PKCS7"),
        _ => None,
    }
}

/// Key purpose, tag `[1]`
pub fn purpose(purpose: i32) -> Option<&'static str> {
    match purpose {
        0 => Some("ENCRYPT"),
        1 => Some("DECRYPT"),
        2 => Some("SIGN"),
        3 => Some("VERIFY"),
        5 => Some("WRAP KEY"),
        6 => Some("AGREE KEY"),
        7 => Some("ATTEST KEY"),
        _ => None,
    }
}

/// Key origin, tag `[702]`
pub fn origin(origin: i32) -> Option<&'static str> {
    match origin {
        0 => Some("Generated"),
        1 => Some("Derived"),
        2 => Some("Imported"),
        3 => Some("Unknown"),
        4 => Some("Securely Imported"),
        _ => None,
    }
}

/// Elliptic curve, tag `[10]`
pub fn ec_curve(curve: i32) -> Option<&'static str> {
    match curve {
        0 => Some("P-224"),
        1 => Some("P-256"),
        2 => Some("P-384"),
        3 => Some("P-521"),
        4 => Some("Curve25519"),
        _ => None,
    }
}

const USER_AUTH_TYPES: [(u32, &str); 2] = [(1, "Password"), (2, "Biometric")];

/// The authenticators set in the `[504]` bitmask.
///
/// Unknown bits are not reported.
pub fn user_auth_types(mask: u32) -> Vec<&'static str> {
    USER_AUTH_TYPES
        .iter()
        .filter(|(bit, _)| mask & bit != 0)
        .map(|(_, name)| *name)
        .collect()
}

/// Knox integrity status value
pub fn knox_status(status: i64) -> Option<&'static str> {
    match status {
        0 => Some("Normal"),
        1 => Some("Abnormal"),
        2 => Some("Not support"),
        _ => None,
    }
}
