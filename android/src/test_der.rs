// Copyright (c) 2023 The MobileCoin Foundation

//! DER encoders for building test inputs

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

fn length(len: usize) -> Vec<u8> {
    if len < 0x80 {
        return vec![len as u8];
    }
    let bytes = len.to_be_bytes();
    let skip = bytes.iter().take_while(|b| **b == 0).count();
    let mut encoded = vec![0x80 | (bytes.len() - skip) as u8];
    encoded.extend_from_slice(&bytes[skip..]);
    encoded
}

pub(crate) fn tlv(identifier: &[u8], content: &[u8]) -> Vec<u8> {
    let mut encoded = identifier.to_vec();
    encoded.extend(length(content.len()));
    encoded.extend_from_slice(content);
    encoded
}

fn twos_complement(value: i64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let mut start = 0;
    while start < bytes.len() - 1 {
        let redundant = (bytes[start] == 0x00 && bytes[start + 1] & 0x80 == 0)
            || (bytes[start] == 0xff && bytes[start + 1] & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }
    bytes[start..].to_vec()
}

pub(crate) fn integer(value: i64) -> Vec<u8> {
    tlv(&[0x02], &twos_complement(value))
}

pub(crate) fn enumerated(value: i64) -> Vec<u8> {
    tlv(&[0x0a], &twos_complement(value))
}

pub(crate) fn boolean(value: bool) -> Vec<u8> {
    tlv(&[0x01], &[if value { 0xff } else { 0x00 }])
}

pub(crate) fn null() -> Vec<u8> {
    tlv(&[0x05], &[])
}

pub(crate) fn octets(bytes: &[u8]) -> Vec<u8> {
    tlv(&[0x04], bytes)
}

pub(crate) fn utf8(text: &str) -> Vec<u8> {
    tlv(&[0x0c], text.as_bytes())
}

pub(crate) fn sequence(items: &[Vec<u8>]) -> Vec<u8> {
    tlv(&[0x30], &items.concat())
}

pub(crate) fn set(items: &[Vec<u8>]) -> Vec<u8> {
    tlv(&[0x31], &items.concat())
}

/// `[number] EXPLICIT` around `inner`
pub(crate) fn explicit(number: u32, inner: Vec<u8>) -> Vec<u8> {
    let identifier = if number < 0x1f {
        vec![0xa0 | number as u8]
    } else {
        let mut septets = vec![(number & 0x7f) as u8];
        let mut rest = number >> 7;
        while rest != 0 {
            septets.push(0x80 | (rest & 0x7f) as u8);
            rest >>= 7;
        }
        septets.push(0xbf);
        septets.reverse();
        septets
    };
    tlv(&identifier, &inner)
}
