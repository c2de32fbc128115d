//! Compact binary wire format for element trees.
//!
//! The transport encoding used between cooperating processes on the command
//! and configuration channel. It is a private contract: the only
//! compatibility requirement is symmetry between this encoder and decoder.
//!
//! Each encoded unit is a kind marker followed by its payload; all
//! multi-byte integers are big-endian:
//!
//! | kind    | marker | payload                                             |
//! |---------|--------|-----------------------------------------------------|
//! | integer | `0x01` | `i64`, 8 bytes                                      |
//! | real    | `0x02` | `f64` bit pattern, 8 bytes                          |
//! | boolean | `0x03` | 1 byte, `0x00` or `0x01`                            |
//! | string  | `0x04` | `u32` byte length + UTF-8 bytes                     |
//! | list    | `0x05` | `u32` child count + children                        |
//! | map     | `0x06` | `u32` entry count + (`u32` key length + key + value)|
//!
//! Nested elements always carry their counts. The count of a *top-level*
//! composite is omitted by default — the byte span itself delimits the
//! element — matching how the channel frames a whole message. Callers
//! embedding an element inside an enclosing stream use the counted
//! ("embedded") form, which is self-delimiting.
//!
//! Reals travel as raw bit patterns, so every `f64` — including NaN payloads
//! and negative zero — round-trips bit-exactly.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::element::{Element, Payload};

pub mod errors;

pub use errors::DecodeError;

const MARKER_INT: u8 = 0x01;
const MARKER_REAL: u8 = 0x02;
const MARKER_BOOL: u8 = 0x03;
const MARKER_STR: u8 = 0x04;
const MARKER_LIST: u8 = 0x05;
const MARKER_MAP: u8 = 0x06;

/// Composites nested deeper than this are rejected rather than risking the
/// decoder's stack.
const MAX_DEPTH: usize = 128;

impl Element {
    /// Encodes this element and all of its children, top-level count
    /// omitted. The inverse is [`Element::from_wire`].
    ///
    /// ```
    /// use confdata::Element;
    ///
    /// let cfg = Element::from_text(r#"{"timeout": 30}"#)?;
    /// let bytes = cfg.to_wire();
    /// assert_eq!(Element::from_wire(&bytes)?, cfg);
    /// # Ok::<(), confdata::Error>(())
    /// ```
    pub fn to_wire(&self) -> Vec<u8> {
        encode(self)
    }

    /// Encodes this element in the self-delimiting form, for embedding in an
    /// enclosing stream. The inverse is [`Element::from_wire_embedded`].
    pub fn to_wire_embedded(&self) -> Vec<u8> {
        encode_embedded(self)
    }

    /// Decodes an element from a complete wire-format span. See [`decode`].
    pub fn from_wire(data: &[u8]) -> Result<Element, DecodeError> {
        decode(data)
    }

    /// Decodes one self-delimiting element from the front of `data`. See
    /// [`decode_embedded`].
    pub fn from_wire_embedded(data: &[u8]) -> Result<(Element, usize), DecodeError> {
        decode_embedded(data)
    }
}

/// Encodes `element` with the top-level count omitted.
pub fn encode(element: &Element) -> Vec<u8> {
    let mut out = Vec::new();
    write_element(&mut out, element, true);
    out
}

/// Encodes `element` in the counted, self-delimiting form.
pub fn encode_embedded(element: &Element) -> Vec<u8> {
    let mut out = Vec::new();
    write_element(&mut out, element, false);
    out
}

/// Decodes an element from `data`, which must span exactly one element in
/// the default (top-level count omitted) form.
pub fn decode(data: &[u8]) -> Result<Element, DecodeError> {
    trace!(len = data.len(), "decoding wire-format element");
    decode_span(data).inspect_err(|err| debug!(error = %err, "wire decode failed"))
}

/// Decodes one element in the counted form from the front of `data` and
/// returns it together with the number of bytes consumed. Bytes after the
/// element are left for the caller.
pub fn decode_embedded(data: &[u8]) -> Result<(Element, usize), DecodeError> {
    trace!(len = data.len(), "decoding embedded wire-format element");
    let mut reader = Reader::new(data);
    let element = read_element(&mut reader, 0)
        .inspect_err(|err| debug!(error = %err, "wire decode failed"))?;
    Ok((element, reader.offset()))
}

fn write_element(out: &mut Vec<u8>, element: &Element, omit_count: bool) {
    match &*element.inner.borrow() {
        Payload::Int(v) => {
            out.push(MARKER_INT);
            out.extend_from_slice(&v.to_be_bytes());
        }
        Payload::Real(v) => {
            out.push(MARKER_REAL);
            out.extend_from_slice(&v.to_bits().to_be_bytes());
        }
        Payload::Bool(v) => {
            out.push(MARKER_BOOL);
            out.push(*v as u8);
        }
        Payload::Str(s) => {
            out.push(MARKER_STR);
            write_bytes(out, s.as_bytes());
        }
        Payload::List(items) => {
            out.push(MARKER_LIST);
            if !omit_count {
                write_count(out, items.len());
            }
            for item in items {
                write_element(out, item, false);
            }
        }
        Payload::Map(entries) => {
            out.push(MARKER_MAP);
            if !omit_count {
                write_count(out, entries.len());
            }
            for (key, value) in entries {
                write_bytes(out, key.as_bytes());
                write_element(out, value, false);
            }
        }
    }
}

fn write_count(out: &mut Vec<u8>, count: usize) {
    out.extend_from_slice(&(count as u32).to_be_bytes());
}

fn write_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    write_count(out, bytes.len());
    out.extend_from_slice(bytes);
}

fn decode_span(data: &[u8]) -> Result<Element, DecodeError> {
    let mut reader = Reader::new(data);
    let marker = reader.read_u8()?;
    let element = match marker {
        // top-level composites have no count; the span delimits them
        MARKER_LIST => {
            let mut items = Vec::new();
            while !reader.is_at_end() {
                items.push(read_element(&mut reader, 1)?);
            }
            Element::from(items)
        }
        MARKER_MAP => {
            let mut entries = BTreeMap::new();
            while !reader.is_at_end() {
                let key = reader.read_string()?;
                let value = read_element(&mut reader, 1)?;
                entries.insert(key, value);
            }
            Element::from(entries)
        }
        other => read_scalar(&mut reader, other)?,
    };
    if !reader.is_at_end() {
        return Err(DecodeError::TrailingBytes {
            offset: reader.offset(),
        });
    }
    Ok(element)
}

fn read_element(reader: &mut Reader<'_>, depth: usize) -> Result<Element, DecodeError> {
    if depth > MAX_DEPTH {
        return Err(DecodeError::TooDeep {
            limit: MAX_DEPTH,
            offset: reader.offset(),
        });
    }
    let marker = reader.read_u8()?;
    match marker {
        MARKER_LIST => {
            let count = reader.read_count()?;
            let mut items = Vec::with_capacity(count);
            for _ in 0..count {
                items.push(read_element(reader, depth + 1)?);
            }
            Ok(Element::from(items))
        }
        MARKER_MAP => {
            let count = reader.read_count()?;
            let mut entries = BTreeMap::new();
            for _ in 0..count {
                let key = reader.read_string()?;
                let value = read_element(reader, depth + 1)?;
                entries.insert(key, value);
            }
            Ok(Element::from(entries))
        }
        other => read_scalar(reader, other),
    }
}

fn read_scalar(reader: &mut Reader<'_>, marker: u8) -> Result<Element, DecodeError> {
    match marker {
        MARKER_INT => Ok(Element::from(i64::from_be_bytes(reader.read_array()?))),
        MARKER_REAL => Ok(Element::from(f64::from_bits(u64::from_be_bytes(
            reader.read_array()?,
        )))),
        MARKER_BOOL => {
            let offset = reader.offset();
            match reader.read_u8()? {
                0 => Ok(Element::from(false)),
                1 => Ok(Element::from(true)),
                value => Err(DecodeError::InvalidBool { value, offset }),
            }
        }
        MARKER_STR => Ok(Element::from(reader.read_string()?)),
        marker => Err(DecodeError::UnknownMarker {
            marker,
            // the marker byte itself, already consumed
            offset: reader.offset() - 1,
        }),
    }
}

/// Cursor over a wire-format byte span.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn offset(&self) -> usize {
        self.pos
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or(DecodeError::UnexpectedEnd { offset: self.pos })?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_slice(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < len {
            return Err(DecodeError::UnexpectedEnd {
                offset: self.data.len(),
            });
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let slice = self.read_slice(N)?;
        let mut array = [0u8; N];
        array.copy_from_slice(slice);
        Ok(array)
    }

    /// Reads a `u32` count and checks it against the remaining bytes, so a
    /// corrupt count fails here instead of allocating.
    fn read_count(&mut self) -> Result<usize, DecodeError> {
        let offset = self.pos;
        let count = u32::from_be_bytes(self.read_array()?);
        if count as usize > self.remaining() {
            return Err(DecodeError::InvalidCount { count, offset });
        }
        Ok(count as usize)
    }

    fn read_string(&mut self) -> Result<String, DecodeError> {
        let len = self.read_count()?;
        let offset = self.pos;
        let bytes = self.read_slice(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| DecodeError::InvalidUtf8 { offset })
    }
}
