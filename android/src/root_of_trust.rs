// Copyright (c) 2023 The MobileCoin Foundation

//! The verified boot state reported by the device

extern crate alloc;

use crate::tlv::TlvNode;
use crate::{Error, Result};
use alloc::vec::Vec;

/// The outcome of verified boot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerifiedBootState {
    /// The full boot chain was verified against the OEM key
    Verified,
    /// The boot chain was verified against a user installed key
    SelfSigned,
    /// The bootloader is unlocked, nothing was verified
    Unverified,
    /// Verification failed
    Failed,
    /// A value this crate does not know about
    Unrecognized(i64),
}

impl From<i64> for VerifiedBootState {
    fn from(value: i64) -> Self {
        match value {
            0 => VerifiedBootState::Verified,
            1 => VerifiedBootState::SelfSigned,
            2 => VerifiedBootState::Unverified,
            3 => VerifiedBootState::Failed,
            other => VerifiedBootState::Unrecognized(other),
        }
    }
}

impl From<VerifiedBootState> for i64 {
    fn from(state: VerifiedBootState) -> Self {
        match state {
            VerifiedBootState::Verified => 0,
            VerifiedBootState::SelfSigned => 1,
            VerifiedBootState::Unverified => 2,
            VerifiedBootState::Failed => 3,
            VerifiedBootState::Unrecognized(other) => other,
        }
    }
}

/// Root of trust, tag `[704]` of the hardware enforced authorization list.
///
/// ```text
/// RootOfTrust ::= SEQUENCE {
///     verifiedBootKey            OCTET_STRING,
///     deviceLocked               BOOLEAN,
///     verifiedBootState          VerifiedBootState,
///     verifiedBootHash           OCTET_STRING, -- attestation version 3+
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootOfTrust {
    /// Hash of the key that verified the boot image
    pub verified_boot_key: Vec<u8>,
    /// Whether the bootloader is locked
    pub device_locked: bool,
    /// The verified boot outcome
    pub verified_boot_state: VerifiedBootState,
    /// Digest of all the verified boot data, absent before attestation
    /// version 3
    pub verified_boot_hash: Option<Vec<u8>>,
}

impl RootOfTrust {
    /// Decode a root of trust from its SEQUENCE node
    pub fn decode(node: &TlvNode<'_>) -> Result<Self> {
        let elements = node.sequence().ok_or(Error::MalformedRootOfTrust)?;
        let (key, locked, state) = match elements {
            [key, locked, state, ..] => (key, locked, state),
            _ => return Err(Error::MalformedRootOfTrust),
        };

        let verified_boot_key = key.octets().ok_or(Error::MalformedRootOfTrust)?.to_vec();
        let device_locked = locked.boolean().ok_or(Error::MalformedRootOfTrust)?;
        let verified_boot_state = state.integer().ok_or(Error::MalformedRootOfTrust)?.into();
        let verified_boot_hash = match elements.get(3) {
            Some(hash) => Some(hash.octets().ok_or(Error::MalformedRootOfTrust)?.to_vec()),
            None => None,
        };

        Ok(Self {
            verified_boot_key,
            device_locked,
            verified_boot_state,
            verified_boot_hash,
        })
    }
}
