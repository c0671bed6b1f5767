// Copyright (c) 2023 The MobileCoin Foundation

//! Registry of the root keys attestation chains may terminate in

extern crate alloc;

use crate::x509::{self, Fingerprint};
use alloc::string::String;
use alloc::vec::Vec;
use der::Decode;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use x509_cert::spki::SubjectPublicKeyInfoOwned;

const GOOGLE_HARDWARE_ROOT: &[u8] = include_bytes!("../data/roots/google_root.der");
const AOSP_EC_ROOT: &[u8] = include_bytes!("../data/roots/aosp_ec_root.der");
const AOSP_RSA_ROOT: &[u8] = include_bytes!("../data/roots/aosp_rsa_root.der");
const KNOX_SAKV1_ROOT: &[u8] = include_bytes!("../data/roots/knox_sakv1_root.der");
const KNOX_SAKV2_ROOT: &[u8] = include_bytes!("../data/roots/knox_sakv2_root.der");
const KNOX_SAKMV1_ROOT: &[u8] = include_bytes!("../data/roots/knox_sakmv1_root.der");

const SAMSUNG_KNOX: &str = "Samsung Knox";

/// The authority a chain terminates in
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RootIdentity {
    /// Google's hardware attestation root
    GoogleHardware,
    /// Google's hardware attestation root via remotely provisioned keys
    GoogleRkp,
    /// The publicly known AOSP software attestation keys
    AospTest,
    /// A known vendor root
    VendorKnown(String),
    /// A key not in the registry
    Unknown,
    /// The chain doesn't link up to its root
    ChainBroken,
}

/// Known root keys by the fingerprint of their `SubjectPublicKeyInfo`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustedRoots {
    roots: Vec<(Fingerprint, RootIdentity)>,
}

impl TrustedRoots {
    /// An empty registry, every key is [`RootIdentity::Unknown`]
    pub fn new() -> Self {
        Self::default()
    }

    /// The publicly documented Android attestation roots
    pub fn android() -> Self {
        let mut roots = Self::new();
        for (key, identity) in [
            (GOOGLE_HARDWARE_ROOT, RootIdentity::GoogleHardware),
            (AOSP_EC_ROOT, RootIdentity::AospTest),
            (AOSP_RSA_ROOT, RootIdentity::AospTest),
            (KNOX_SAKV1_ROOT, RootIdentity::VendorKnown(SAMSUNG_KNOX.into())),
            (KNOX_SAKV2_ROOT, RootIdentity::VendorKnown(SAMSUNG_KNOX.into())),
            (KNOX_SAKMV1_ROOT, RootIdentity::VendorKnown(SAMSUNG_KNOX.into())),
        ] {
            roots.insert(Sha256::digest(key).into(), identity);
        }
        roots
    }

    /// Register `identity` for the key with `fingerprint`.
    ///
    /// A later registration of the same fingerprint takes precedence.
    pub fn insert(&mut self, fingerprint: Fingerprint, identity: RootIdentity) -> &mut Self {
        self.roots.retain(|(known, _)| known != &fingerprint);
        self.roots.push((fingerprint, identity));
        self
    }

    /// Register `identity` for a DER encoded `SubjectPublicKeyInfo`
    pub fn insert_public_key(
        &mut self,
        subject_public_key_info: &[u8],
        identity: RootIdentity,
    ) -> x509::Result<&mut Self> {
        SubjectPublicKeyInfoOwned::from_der(subject_public_key_info)?;
        Ok(self.insert(Sha256::digest(subject_public_key_info).into(), identity))
    }

    /// The identity of the key with `fingerprint`
    pub fn lookup(&self, fingerprint: &Fingerprint) -> RootIdentity {
        // No early exit, every entry is compared
        let mut found = None;
        for (known, identity) in &self.roots {
            if bool::from(known[..].ct_eq(&fingerprint[..])) {
                found = Some(identity);
            }
        }
        found.cloned().unwrap_or(RootIdentity::Unknown)
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
