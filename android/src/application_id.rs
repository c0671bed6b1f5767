// Copyright (c) 2023 The MobileCoin Foundation

//! The identity of the application that requested the attestation

extern crate alloc;

use crate::tlv::{self, TlvNode};
use crate::{Error, Result};
use alloc::string::String;
use alloc::vec::Vec;

/// One package sharing the attesting UID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfoEntry {
    /// The package name, invalid UTF-8 is replaced
    pub package_name: String,
    /// The package version code
    pub version: i64,
}

/// Attestation application ID, tag `[709]` of the software enforced
/// authorization list.
///
/// ```text
/// AttestationApplicationId ::= SEQUENCE {
///     package_infos  SET OF AttestationPackageInfo,
///     signature_digests  SET OF OCTET_STRING,
/// }
///
/// AttestationPackageInfo ::= SEQUENCE {
///     package_name  OCTET_STRING,
///     version  INTEGER,
/// }
/// ```
///
/// Both sets keep the order of the encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationIdentity {
    /// The packages of the calling UID
    pub packages: Vec<PackageInfoEntry>,
    /// Digests of the signing certificates of the packages
    pub signature_digests: Vec<Vec<u8>>,
}

impl ApplicationIdentity {
    /// Decode from the DER carried inside the `[709]` OCTET STRING
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let node = tlv::parse(bytes).map_err(|_| Error::MalformedApplicationIdentity)?;
        Self::decode(&node)
    }

    /// Decode from an already parsed SEQUENCE node
    pub fn decode(node: &TlvNode<'_>) -> Result<Self> {
        let (packages, digests) = match node.sequence() {
            Some([packages, digests, ..]) => (packages, digests),
            _ => return Err(Error::MalformedApplicationIdentity),
        };

        let packages = packages
            .set()
            .ok_or(Error::MalformedApplicationIdentity)?
            .iter()
            .map(package_info)
            .collect::<Result<Vec<_>>>()?;

        let signature_digests = digests
            .set()
            .ok_or(Error::MalformedApplicationIdentity)?
            .iter()
            .map(|digest| {
                digest
                    .octets()
                    .map(<[u8]>::to_vec)
                    .ok_or(Error::MalformedApplicationIdentity)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            packages,
            signature_digests,
        })
    }
}

fn package_info(node: &TlvNode<'_>) -> Result<PackageInfoEntry> {
    let (name, version) = match node.sequence() {
        Some([name, version, ..]) => (name, version),
        _ => return Err(Error::MalformedApplicationIdentity),
    };
    let name = name.octets().ok_or(Error::MalformedApplicationIdentity)?;
    let version = version.integer().ok_or(Error::MalformedApplicationIdentity)?;
    Ok(PackageInfoEntry {
        package_name: String::from_utf8_lossy(name).into_owned(),
        version,
    })
}
