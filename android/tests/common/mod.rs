// Copyright (c) 2023 The MobileCoin Foundation

#![allow(dead_code)]

use mc_attestation_android::x509::Certificate;
use mc_attestation_android::{RootIdentity, TrustedRoots};
use std::time::Duration;

pub const LEAF: &[u8] = include_bytes!("../../data/tests/leaf.der");
pub const EXPIRED_LEAF: &[u8] = include_bytes!("../../data/tests/expired_leaf.der");
pub const KNOX_LEAF: &[u8] = include_bytes!("../../data/tests/knox_leaf.der");
pub const PLAIN_LEAF: &[u8] = include_bytes!("../../data/tests/plain_leaf.der");
pub const ATTEST_KEY: &[u8] = include_bytes!("../../data/tests/attest_key.der");
pub const ATTESTED_BY_KEY: &[u8] = include_bytes!("../../data/tests/attested_by_key.der");
pub const INTERMEDIATE: &[u8] = include_bytes!("../../data/tests/intermediate.der");
pub const RKP_INTERMEDIATE: &[u8] = include_bytes!("../../data/tests/rkp_intermediate.der");
pub const ROOT: &[u8] = include_bytes!("../../data/tests/root.der");
pub const P384_LEAF: &[u8] = include_bytes!("../../data/tests/p384_leaf.der");
pub const P384_ROOT: &[u8] = include_bytes!("../../data/tests/p384_root.der");
pub const P521_LEAF: &[u8] = include_bytes!("../../data/tests/p521_leaf.der");
pub const P521_ROOT: &[u8] = include_bytes!("../../data/tests/p521_root.der");
pub const CHAIN_PEM: &[u8] = include_bytes!("../../data/tests/chain.pem");
pub const CHAIN_PKCS7: &[u8] = include_bytes!("../../data/tests/chain.p7b");
pub const STATUS_JSON: &str = include_str!("../../data/tests/status.json");

/// 2023-11-14T22:13:20Z, inside the validity of all the current fixtures
pub const NOW: Duration = Duration::from_secs(1_700_000_000);

/// Decode DER certificates ordered leaf first.
pub fn certificates(der_certificates: &[&[u8]]) -> Vec<Certificate> {
    der_certificates
        .iter()
        .map(|der| Certificate::try_from(*der).expect("Failed decoding DER"))
        .collect()
}

/// The Android roots with the test root certificate `root` registered as
/// `identity`.
pub fn roots_with(root: &[u8], identity: RootIdentity) -> TrustedRoots {
    let root = Certificate::try_from(root).expect("Failed decoding DER");
    let fingerprint = root.fingerprint().expect("Failed computing fingerprint");
    let mut roots = TrustedRoots::android();
    roots.insert(fingerprint, identity);
    roots
}
