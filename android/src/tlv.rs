// Copyright (c) 2023 The MobileCoin Foundation

//! A minimal DER tag-length-value reader.
//!
//! The attestation extension uses context specific tags well above 30 (for
//! instance `[704]` for the root of trust), which need the multi-octet tag
//! form. This reader decodes any tag number that fits in a `u32` and produces
//! a tree of [`TlvNode`]s borrowing from the input buffer. It knows nothing
//! about attestation semantics.

extern crate alloc;

use crate::{Error, Result};
use alloc::vec::Vec;
use const_oid::ObjectIdentifier;

/// Nesting deeper than this is rejected as malformed.
const MAX_DEPTH: usize = 32;

/// Universal tag number for BOOLEAN
pub const BOOLEAN: u32 = 1;
/// Universal tag number for INTEGER
pub const INTEGER: u32 = 2;
/// Universal tag number for BIT STRING
pub const BIT_STRING: u32 = 3;
/// Universal tag number for OCTET STRING
pub const OCTET_STRING: u32 = 4;
/// Universal tag number for NULL
pub const NULL: u32 = 5;
/// Universal tag number for OBJECT IDENTIFIER
pub const OBJECT_IDENTIFIER: u32 = 6;
/// Universal tag number for ENUMERATED
pub const ENUMERATED: u32 = 10;
/// Universal tag number for UTF8String
pub const UTF8_STRING: u32 = 12;
/// Universal tag number for SEQUENCE and SEQUENCE OF
pub const SEQUENCE: u32 = 16;
/// Universal tag number for SET and SET OF
pub const SET: u32 = 17;
/// Universal tag number for PrintableString
pub const PRINTABLE_STRING: u32 = 19;
/// Universal tag number for IA5String
pub const IA5_STRING: u32 = 22;

/// The class bits of an identifier octet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagClass {
    /// Types defined by X.680
    Universal,
    /// Application wide types
    Application,
    /// `[n]` style tags, meaningful only inside their enclosing type
    ContextSpecific,
    /// Privately defined types
    Private,
}

/// A decoded identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    /// The class of the tag
    pub class: TagClass,
    /// The tag number, may exceed 30
    pub number: u32,
    /// Whether the value is made of nested TLVs
    pub constructed: bool,
}

impl Tag {
    /// A universal tag
    pub const fn universal(number: u32, constructed: bool) -> Self {
        Self {
            class: TagClass::Universal,
            number,
            constructed,
        }
    }

    /// A constructed context specific tag, the shape of `[n] EXPLICIT`
    pub const fn context(number: u32) -> Self {
        Self {
            class: TagClass::ContextSpecific,
            number,
            constructed: true,
        }
    }

    /// Whether this is the universal tag `number`, regardless of form
    pub fn is_universal(&self, number: u32) -> bool {
        self.class == TagClass::Universal && self.number == number
    }
}

/// The value portion of a [`TlvNode`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content<'a> {
    /// The raw content octets of a primitive value
    Primitive(&'a [u8]),
    /// The decoded children of a constructed value, in encoding order
    Constructed(Vec<TlvNode<'a>>),
}

/// One decoded tag-length-value element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlvNode<'a> {
    tag: Tag,
    offset: usize,
    encoded: &'a [u8],
    content: Content<'a>,
}

/// Parse exactly one TLV element spanning all of `bytes`.
///
/// Trailing bytes after the element are an error.
pub fn parse(bytes: &[u8]) -> Result<TlvNode<'_>> {
    let mut reader = Reader::new(bytes, 0);
    let node = reader.read_node(0)?;
    if !reader.is_empty() {
        return Err(Error::MalformedEncoding {
            offset: reader.position,
        });
    }
    Ok(node)
}

/// Parse zero or more sibling TLV elements spanning all of `bytes`.
pub fn parse_sequence(bytes: &[u8]) -> Result<Vec<TlvNode<'_>>> {
    Reader::new(bytes, 0).read_all(0)
}

impl<'a> TlvNode<'a> {
    /// The identifier of this element
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Offset of the first identifier octet from the start of the outermost
    /// buffer
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The complete encoding of this element, header included
    pub fn encoded(&self) -> &'a [u8] {
        self.encoded
    }

    /// The value of this element
    pub fn content(&self) -> &Content<'a> {
        &self.content
    }

    /// The content octets when this is a primitive element
    pub fn primitive(&self) -> Option<&'a [u8]> {
        match self.content {
            Content::Primitive(bytes) => Some(bytes),
            Content::Constructed(_) => None,
        }
    }

    /// The children when this is a constructed element
    pub fn children(&self) -> Option<&[TlvNode<'a>]> {
        match &self.content {
            Content::Primitive(_) => None,
            Content::Constructed(children) => Some(children),
        }
    }

    /// The children of a universal SEQUENCE
    pub fn sequence(&self) -> Option<&[TlvNode<'a>]> {
        self.universal_children(SEQUENCE)
    }

    /// The children of a universal SET
    pub fn set(&self) -> Option<&[TlvNode<'a>]> {
        self.universal_children(SET)
    }

    /// The single value wrapped by a context specific explicit tag
    pub fn explicit(&self) -> Option<&TlvNode<'a>> {
        if self.tag.class != TagClass::ContextSpecific {
            return None;
        }
        match self.children()? {
            [inner] => Some(inner),
            _ => None,
        }
    }

    /// The value of an INTEGER or ENUMERATED of at most 8 content octets
    pub fn integer(&self) -> Option<i64> {
        if !(self.tag.is_universal(INTEGER) || self.tag.is_universal(ENUMERATED)) {
            return None;
        }
        let bytes = self.primitive()?;
        let (first, _) = bytes.split_first()?;
        if bytes.len() > 8 {
            return None;
        }
        // Sign extend from the most significant content octet
        let init = if first & 0x80 == 0 { 0 } else { -1 };
        Some(
            bytes
                .iter()
                .fold(init, |value: i64, byte| (value << 8) | i64::from(*byte)),
        )
    }

    /// The value of a BOOLEAN, any non zero octet is `true`
    pub fn boolean(&self) -> Option<bool> {
        if !self.tag.is_universal(BOOLEAN) {
            return None;
        }
        match self.primitive()? {
            [value] => Some(*value != 0),
            _ => None,
        }
    }

    /// The content of a primitive OCTET STRING
    pub fn octets(&self) -> Option<&'a [u8]> {
        if !self.tag.is_universal(OCTET_STRING) {
            return None;
        }
        self.primitive()
    }

    /// The content of a textual value.
    ///
    /// OCTET STRING, UTF8String, PrintableString and IA5String are accepted,
    /// the content must be valid UTF-8.
    pub fn text(&self) -> Option<&'a str> {
        let textual = [OCTET_STRING, UTF8_STRING, PRINTABLE_STRING, IA5_STRING]
            .iter()
            .any(|number| self.tag.is_universal(*number));
        if !textual {
            return None;
        }
        core::str::from_utf8(self.primitive()?).ok()
    }

    /// Whether this is an empty NULL
    pub fn is_null(&self) -> bool {
        self.tag.is_universal(NULL) && self.primitive().map_or(false, <[u8]>::is_empty)
    }

    /// Whether this is the OBJECT IDENTIFIER `oid`
    pub fn is_oid(&self, oid: &ObjectIdentifier) -> bool {
        self.tag.is_universal(OBJECT_IDENTIFIER) && self.primitive() == Some(oid.as_bytes())
    }

    fn universal_children(&self, number: u32) -> Option<&[TlvNode<'a>]> {
        if self.tag.is_universal(number) {
            self.children()
        } else {
            None
        }
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    position: usize,
    // Absolute offset of `bytes[0]` in the outermost buffer
    base: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8], base: usize) -> Self {
        Self {
            bytes,
            position: 0,
            base,
        }
    }

    fn is_empty(&self) -> bool {
        self.position >= self.bytes.len()
    }

    fn read_all(&mut self, depth: usize) -> Result<Vec<TlvNode<'a>>> {
        let mut nodes = Vec::new();
        while !self.is_empty() {
            nodes.push(self.read_node(depth)?);
        }
        Ok(nodes)
    }

    fn read_node(&mut self, depth: usize) -> Result<TlvNode<'a>> {
        let start = self.position;
        let malformed = Error::MalformedEncoding {
            offset: self.base + start,
        };

        let tag = self.read_tag().ok_or_else(|| malformed.clone())?;
        let length = self.read_length().ok_or_else(|| malformed.clone())?;

        let content_start = self.position;
        let end = content_start
            .checked_add(length)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| malformed.clone())?;
        let content_bytes = &self.bytes[content_start..end];
        self.position = end;

        let content = if tag.constructed {
            if depth >= MAX_DEPTH {
                return Err(malformed);
            }
            let mut inner = Reader::new(content_bytes, self.base + content_start);
            Content::Constructed(inner.read_all(depth + 1)?)
        } else {
            Content::Primitive(content_bytes)
        };

        Ok(TlvNode {
            tag,
            offset: self.base + start,
            encoded: &self.bytes[start..end],
            content,
        })
    }

    fn read_byte(&mut self) -> Option<u8> {
        let byte = *self.bytes.get(self.position)?;
        self.position += 1;
        Some(byte)
    }

    fn read_tag(&mut self) -> Option<Tag> {
        let identifier = self.read_byte()?;
        let class = match identifier >> 6 {
            0 => TagClass::Universal,
            1 => TagClass::Application,
            2 => TagClass::ContextSpecific,
            _ => TagClass::Private,
        };
        let constructed = identifier & 0x20 != 0;

        let mut number = u32::from(identifier & 0x1f);
        if number == 0x1f {
            // High tag number form, base 128 with the top bit as continuation
            number = 0;
            loop {
                let byte = self.read_byte()?;
                if number == 0 && byte == 0x80 {
                    // Leading zero septets are not DER
                    return None;
                }
                number = number.checked_mul(128)? | u32::from(byte & 0x7f);
                if byte & 0x80 == 0 {
                    break;
                }
            }
        }

        Some(Tag {
            class,
            number,
            constructed,
        })
    }

    fn read_length(&mut self) -> Option<usize> {
        let first = self.read_byte()?;
        if first & 0x80 == 0 {
            return Some(usize::from(first));
        }
        // Indefinite length (0x80) is BER only
        let count = usize::from(first & 0x7f);
        if count == 0 || count > 4 {
            return None;
        }
        let mut length = 0usize;
        for _ in 0..count {
            length = (length << 8) | usize::from(self.read_byte()?);
        }
        Some(length)
    }
}
