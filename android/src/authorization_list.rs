// Copyright (c) 2023 The MobileCoin Foundation

//! Decoding of the `AuthorizationList` of a key description.
//!
//! Every entry of the list is an explicit context specific tag wrapping one
//! value, the tag number identifies the attribute. All attributes are
//! optional. Tag numbers this crate doesn't know are skipped so newer
//! attestation versions can still be decoded.

extern crate alloc;

use crate::application_id::ApplicationIdentity;
use crate::root_of_trust::RootOfTrust;
use crate::tlv::{TagClass, TlvNode};
use crate::{Error, Result};
use alloc::string::String;
use alloc::vec::Vec;

const PURPOSE: u32 = 1;
const ALGORITHM: u32 = 2;
const KEY_SIZE: u32 = 3;
const DIGEST: u32 = 5;
const PADDING: u32 = 6;
const EC_CURVE: u32 = 10;
const RSA_PUBLIC_EXPONENT: u32 = 200;
const MGF_DIGEST: u32 = 203;
const ROLLBACK_RESISTANCE: u32 = 303;
const EARLY_BOOT_ONLY: u32 = 305;
const ACTIVE_DATE_TIME: u32 = 400;
const ORIGINATION_EXPIRE_DATE_TIME: u32 = 401;
const USAGE_EXPIRE_DATE_TIME: u32 = 402;
const USAGE_COUNT_LIMIT: u32 = 405;
const USER_SECURE_ID: u32 = 502;
const NO_AUTH_REQUIRED: u32 = 503;
const USER_AUTH_TYPE: u32 = 504;
const AUTH_TIMEOUT: u32 = 505;
const ALLOW_WHILE_ON_BODY: u32 = 506;
const TRUSTED_USER_PRESENCE_REQUIRED: u32 = 507;
const TRUSTED_CONFIRMATION_REQUIRED: u32 = 508;
const UNLOCKED_DEVICE_REQUIRED: u32 = 509;
const ALL_APPLICATIONS: u32 = 600;
const APPLICATION_ID: u32 = 601;
const CREATION_DATE_TIME: u32 = 701;
const ORIGIN: u32 = 702;
const ROLLBACK_RESISTANT: u32 = 703;
const ROOT_OF_TRUST: u32 = 704;
const OS_VERSION: u32 = 705;
const OS_PATCH_LEVEL: u32 = 706;
const ATTESTATION_APPLICATION_ID: u32 = 709;
const ATTESTATION_ID_BRAND: u32 = 710;
const ATTESTATION_ID_DEVICE: u32 = 711;
const ATTESTATION_ID_PRODUCT: u32 = 712;
const ATTESTATION_ID_SERIAL: u32 = 713;
const ATTESTATION_ID_IMEI: u32 = 714;
const ATTESTATION_ID_MEID: u32 = 715;
const ATTESTATION_ID_MANUFACTURER: u32 = 716;
const ATTESTATION_ID_MODEL: u32 = 717;
const VENDOR_PATCH_LEVEL: u32 = 718;
const BOOT_PATCH_LEVEL: u32 = 719;
const DEVICE_UNIQUE_ATTESTATION: u32 = 720;
const IDENTITY_CREDENTIAL_KEY: u32 = 721;
const ATTESTATION_ID_SECOND_IMEI: u32 = 723;
const MODULE_HASH: u32 = 724;

/// The key purpose allowing a key to sign other attestation certificates
pub const PURPOSE_ATTEST_KEY: i32 = 7;

/// The key properties enforced by one security level.
///
/// Date times are milliseconds since the unix epoch. Patch levels are
/// `YYYYMM` or `YYYYMMDD` as reported by the device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationList {
    /// Allowed key purposes, `[1]`
    pub purposes: Option<Vec<i32>>,
    /// Key algorithm, `[2]`
    pub algorithm: Option<i32>,
    /// Key size in bits, `[3]`
    pub key_size: Option<u32>,
    /// Allowed digests, `[5]`
    pub digests: Option<Vec<i32>>,
    /// Allowed padding modes, `[6]`
    pub padding_modes: Option<Vec<i32>>,
    /// Elliptic curve, `[10]`
    pub ec_curve: Option<i32>,
    /// RSA public exponent, `[200]`
    pub rsa_public_exponent: Option<i64>,
    /// Digests allowed for RSA OAEP mask generation, `[203]`
    pub mgf_digests: Option<Vec<i32>>,
    /// `[303]`
    pub rollback_resistance: bool,
    /// `[305]`
    pub early_boot_only: bool,
    /// `[400]`
    pub active_date_time: Option<i64>,
    /// `[401]`
    pub origination_expire_date_time: Option<i64>,
    /// `[402]`
    pub usage_expire_date_time: Option<i64>,
    /// `[405]`
    pub usage_count_limit: Option<u32>,
    /// `[502]`
    pub user_secure_ids: Option<Vec<i64>>,
    /// `[503]`
    pub no_auth_required: bool,
    /// Bitmask of the allowed authenticators, `[504]`
    pub user_auth_type: Option<u32>,
    /// Seconds a user authentication stays valid, `[505]`
    pub auth_timeout: Option<u32>,
    /// `[506]`
    pub allow_while_on_body: bool,
    /// `[507]`
    pub trusted_user_presence_required: bool,
    /// `[508]`
    pub trusted_confirmation_required: bool,
    /// `[509]`
    pub unlocked_device_required: bool,
    /// `[600]`
    pub all_applications: bool,
    /// `[601]`
    pub application_id: Option<Vec<u8>>,
    /// `[701]`
    pub creation_date_time: Option<i64>,
    /// Where the key came from, `[702]`
    pub origin: Option<i32>,
    /// `[703]`
    pub rollback_resistant: bool,
    /// `[704]`
    pub root_of_trust: Option<RootOfTrust>,
    /// `[705]`
    pub os_version: Option<u32>,
    /// `[706]`
    pub os_patch_level: Option<u32>,
    /// `[709]`
    pub attestation_application_id: Option<ApplicationIdentity>,
    /// `[710]`
    pub attestation_id_brand: Option<String>,
    /// `[711]`
    pub attestation_id_device: Option<String>,
    /// `[712]`
    pub attestation_id_product: Option<String>,
    /// `[713]`
    pub attestation_id_serial: Option<String>,
    /// `[714]`
    pub attestation_id_imei: Option<String>,
    /// `[715]`
    pub attestation_id_meid: Option<String>,
    /// `[716]`
    pub attestation_id_manufacturer: Option<String>,
    /// `[717]`
    pub attestation_id_model: Option<String>,
    /// `[718]`
    pub vendor_patch_level: Option<u32>,
    /// `[719]`
    pub boot_patch_level: Option<u32>,
    /// `[720]`
    pub device_unique_attestation: bool,
    /// `[721]`
    pub identity_credential_key: bool,
    /// `[723]`
    pub attestation_id_second_imei: Option<String>,
    /// `[724]`
    pub module_hash: Option<Vec<u8>>,
}

impl AuthorizationList {
    /// Decode the entries of an authorization list.
    ///
    /// The first entry of a known tag with the wrong shape fails the whole
    /// list with [`Error::FieldTypeMismatch`].
    pub fn decode(entries: &[TlvNode<'_>]) -> Result<Self> {
        let mut list = Self::default();
        for entry in entries {
            let tag = entry.tag();
            if tag.class != TagClass::ContextSpecific {
                log::warn!(
                    "Authorization list entry is not context specific, class {:?} tag {}",
                    tag.class,
                    tag.number
                );
                return Err(Error::FieldTypeMismatch { tag: tag.number });
            }
            list.set_field(Field {
                tag: tag.number,
                entry,
            })?;
        }
        Ok(list)
    }

    /// Whether the purposes include [`PURPOSE_ATTEST_KEY`]
    pub fn allows_attest_key(&self) -> bool {
        self.purposes
            .as_ref()
            .map_or(false, |purposes| purposes.contains(&PURPOSE_ATTEST_KEY))
    }

    fn set_field(&mut self, field: Field<'_, '_>) -> Result<()> {
        match field.tag {
            PURPOSE => self.purposes = Some(field.integer_set()?),
            ALGORITHM => self.algorithm = Some(field.integer()?),
            KEY_SIZE => self.key_size = Some(field.integer()?),
            DIGEST => self.digests = Some(field.integer_set()?),
            PADDING => self.padding_modes = Some(field.integer_set()?),
            EC_CURVE => self.ec_curve = Some(field.integer()?),
            RSA_PUBLIC_EXPONENT => self.rsa_public_exponent = Some(field.integer()?),
            MGF_DIGEST => self.mgf_digests = Some(field.integer_set()?),
            ROLLBACK_RESISTANCE => self.rollback_resistance = field.presence()?,
            EARLY_BOOT_ONLY => self.early_boot_only = field.presence()?,
            ACTIVE_DATE_TIME => self.active_date_time = Some(field.integer()?),
            ORIGINATION_EXPIRE_DATE_TIME => {
                self.origination_expire_date_time = Some(field.integer()?)
            }
            USAGE_EXPIRE_DATE_TIME => self.usage_expire_date_time = Some(field.integer()?),
            USAGE_COUNT_LIMIT => self.usage_count_limit = Some(field.integer()?),
            USER_SECURE_ID => self.user_secure_ids = Some(field.integer_set()?),
            NO_AUTH_REQUIRED => self.no_auth_required = field.presence()?,
            USER_AUTH_TYPE => self.user_auth_type = Some(field.bitmask()?),
            AUTH_TIMEOUT => self.auth_timeout = Some(field.integer()?),
            ALLOW_WHILE_ON_BODY => self.allow_while_on_body = field.presence()?,
            TRUSTED_USER_PRESENCE_REQUIRED => {
                self.trusted_user_presence_required = field.presence()?
            }
            TRUSTED_CONFIRMATION_REQUIRED => {
                self.trusted_confirmation_required = field.presence()?
            }
            UNLOCKED_DEVICE_REQUIRED => self.unlocked_device_required = field.presence()?,
            ALL_APPLICATIONS => self.all_applications = field.presence()?,
            APPLICATION_ID => self.application_id = Some(field.octets()?),
            CREATION_DATE_TIME => self.creation_date_time = Some(field.integer()?),
            ORIGIN => self.origin = Some(field.integer()?),
            ROLLBACK_RESISTANT => self.rollback_resistant = field.presence()?,
            ROOT_OF_TRUST => self.root_of_trust = Some(RootOfTrust::decode(field.sequence()?)?),
            OS_VERSION => self.os_version = Some(field.integer()?),
            OS_PATCH_LEVEL => self.os_patch_level = Some(field.integer()?),
            ATTESTATION_APPLICATION_ID => {
                let der = field.octets()?;
                self.attestation_application_id = Some(ApplicationIdentity::from_der(&der)?);
            }
            ATTESTATION_ID_BRAND => self.attestation_id_brand = Some(field.string()?),
            ATTESTATION_ID_DEVICE => self.attestation_id_device = Some(field.string()?),
            ATTESTATION_ID_PRODUCT => self.attestation_id_product = Some(field.string()?),
            ATTESTATION_ID_SERIAL => self.attestation_id_serial = Some(field.string()?),
            ATTESTATION_ID_IMEI => self.attestation_id_imei = Some(field.string()?),
            ATTESTATION_ID_MEID => self.attestation_id_meid = Some(field.string()?),
            ATTESTATION_ID_MANUFACTURER => {
                self.attestation_id_manufacturer = Some(field.string()?)
            }
            ATTESTATION_ID_MODEL => self.attestation_id_model = Some(field.string()?),
            VENDOR_PATCH_LEVEL => self.vendor_patch_level = Some(field.integer()?),
            BOOT_PATCH_LEVEL => self.boot_patch_level = Some(field.integer()?),
            DEVICE_UNIQUE_ATTESTATION => self.device_unique_attestation = field.presence()?,
            IDENTITY_CREDENTIAL_KEY => self.identity_credential_key = field.presence()?,
            ATTESTATION_ID_SECOND_IMEI => {
                self.attestation_id_second_imei = Some(field.string()?)
            }
            MODULE_HASH => self.module_hash = Some(field.octets()?),
            unknown => log::debug!("Skipping unknown authorization list tag {unknown}"),
        }
        Ok(())
    }
}

/// Decode from a SEQUENCE (or SET) of tagged entries
impl TryFrom<&TlvNode<'_>> for AuthorizationList {
    type Error = Error;

    fn try_from(node: &TlvNode<'_>) -> Result<Self> {
        let entries = node
            .sequence()
            .or_else(|| node.set())
            .ok_or(Error::MalformedAttestationRecord)?;
        Self::decode(entries)
    }
}

/// A known entry of an authorization list
struct Field<'a, 'b> {
    tag: u32,
    entry: &'b TlvNode<'a>,
}

impl<'a, 'b> Field<'a, 'b> {
    fn mismatch(&self) -> Error {
        log::warn!(
            "Authorization list tag {} does not have the expected type",
            self.tag
        );
        Error::FieldTypeMismatch { tag: self.tag }
    }

    fn value(&self) -> Result<&'b TlvNode<'a>> {
        self.entry.explicit().ok_or_else(|| self.mismatch())
    }

    /// The value when it is a SEQUENCE, its contents are left to the caller
    fn sequence(&self) -> Result<&'b TlvNode<'a>> {
        let value = self.value()?;
        match value.sequence() {
            Some(_) => Ok(value),
            None => Err(self.mismatch()),
        }
    }

    fn to_integer<T: TryFrom<i64>>(&self, node: &TlvNode<'_>) -> Result<T> {
        node.integer()
            .and_then(|value| T::try_from(value).ok())
            .ok_or_else(|| self.mismatch())
    }

    fn integer<T: TryFrom<i64>>(&self) -> Result<T> {
        self.to_integer(self.value()?)
    }

    fn integer_set<T: TryFrom<i64>>(&self) -> Result<Vec<T>> {
        self.value()?
            .set()
            .ok_or_else(|| self.mismatch())?
            .iter()
            .map(|node| self.to_integer(node))
            .collect()
    }

    /// A single INTEGER or a SET OF INTEGER combined with bitwise or
    fn bitmask(&self) -> Result<u32> {
        let value = self.value()?;
        match value.set() {
            Some(members) => members
                .iter()
                .try_fold(0, |mask, node| {
                    Ok::<_, Error>(mask | self.to_integer::<u32>(node)?)
                }),
            None => self.to_integer(value),
        }
    }

    fn octets(&self) -> Result<Vec<u8>> {
        self.value()?
            .octets()
            .map(<[u8]>::to_vec)
            .ok_or_else(|| self.mismatch())
    }

    fn string(&self) -> Result<String> {
        let bytes = self.value()?.octets().ok_or_else(|| self.mismatch())?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Presence only tags are normally NULL, any primitive value is accepted
    fn presence(&self) -> Result<bool> {
        self.value()?
            .primitive()
            .map(|_| true)
            .ok_or_else(|| self.mismatch())
    }
}
