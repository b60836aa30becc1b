//! # Value Codec
//!
//! Runtime representation and wire codec for field values. `Value<'a>`
//! borrows byte and string content from the decoded record via `Cow`, so
//! reads are zero-copy until the caller materializes with
//! [`Value::into_owned`].
//!
//! ## Encodings
//!
//! | Type | Encoding |
//! |---------|----------|
//! | null | nothing |
//! | bool | one byte, 0 or 1 |
//! | int32/int64 | little-endian two's complement |
//! | float32/float64 | little-endian IEEE-754 |
//! | bytes/string | varint length, then content |
//! | array | varint count; if count > 0: element type byte, then elements |
//! | map | varint count; if count > 0: key type byte, value type byte, then alternating key/value |
//! | row | a complete nested record |
//!
//! Type bytes for empty arrays and maps are omitted. Map keys are restricted
//! to int32, int64, bytes, and string.
//!
//! ## Structural sizing
//!
//! [`value_size`] computes how many bytes a value occupies without decoding
//! it: fixed widths for scalars, a varint peek for bytes/string, a count and
//! type walk for containers (fixed-width elements are multiplied, not
//! walked), and the header-declared sizes for nested rows. This is what lets
//! readers slice out exact value ranges while leaving the bodies opaque.
//!
//! Container recursion during decode and sizing is capped at [`MAX_DEPTH`]
//! to keep adversarial inputs from exhausting the stack.

use std::borrow::Cow;

use crate::encoding::varint;
use crate::error::{Error, Result};
use crate::records::types::TypeCode;
use crate::records::view::RecordView;

/// Maximum container/row nesting depth accepted by the decoder and sizer.
pub const MAX_DEPTH: usize = 64;

/// A decoded field value. Borrows from the source record where possible.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Bytes(Cow<'a, [u8]>),
    String(Cow<'a, str>),
    Array(Vec<Value<'a>>),
    Map(Vec<(MapKey<'a>, Value<'a>)>),
    /// A complete nested record, held as its exact encoded byte range.
    Row(Cow<'a, [u8]>),
}

/// A map key. The key type set is closed: int32, int64, bytes, string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapKey<'a> {
    Int32(i32),
    Int64(i64),
    Bytes(Cow<'a, [u8]>),
    String(Cow<'a, str>),
}

impl Value<'_> {
    pub fn type_code(&self) -> TypeCode {
        match self {
            Value::Null => TypeCode::Null,
            Value::Bool(_) => TypeCode::Bool,
            Value::Int32(_) => TypeCode::Int32,
            Value::Int64(_) => TypeCode::Int64,
            Value::Float32(_) => TypeCode::Float32,
            Value::Float64(_) => TypeCode::Float64,
            Value::Bytes(_) => TypeCode::Bytes,
            Value::String(_) => TypeCode::String,
            Value::Array(_) => TypeCode::Array,
            Value::Map(_) => TypeCode::Map,
            Value::Row(_) => TypeCode::Row,
        }
    }

    /// Opens a row value as a record view over its encoded bytes.
    pub fn as_record(&self) -> Option<Result<RecordView<'_>>> {
        match self {
            Value::Row(bytes) => Some(RecordView::new(bytes)),
            _ => None,
        }
    }

    /// Detaches the value from the buffer it was decoded from.
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::Null => Value::Null,
            Value::Bool(v) => Value::Bool(v),
            Value::Int32(v) => Value::Int32(v),
            Value::Int64(v) => Value::Int64(v),
            Value::Float32(v) => Value::Float32(v),
            Value::Float64(v) => Value::Float64(v),
            Value::Bytes(v) => Value::Bytes(Cow::Owned(v.into_owned())),
            Value::String(v) => Value::String(Cow::Owned(v.into_owned())),
            Value::Array(v) => Value::Array(v.into_iter().map(Value::into_owned).collect()),
            Value::Map(v) => Value::Map(
                v.into_iter()
                    .map(|(k, val)| (k.into_owned(), val.into_owned()))
                    .collect(),
            ),
            Value::Row(v) => Value::Row(Cow::Owned(v.into_owned())),
        }
    }
}

impl MapKey<'_> {
    pub fn type_code(&self) -> TypeCode {
        match self {
            MapKey::Int32(_) => TypeCode::Int32,
            MapKey::Int64(_) => TypeCode::Int64,
            MapKey::Bytes(_) => TypeCode::Bytes,
            MapKey::String(_) => TypeCode::String,
        }
    }

    pub fn into_owned(self) -> MapKey<'static> {
        match self {
            MapKey::Int32(v) => MapKey::Int32(v),
            MapKey::Int64(v) => MapKey::Int64(v),
            MapKey::Bytes(v) => MapKey::Bytes(Cow::Owned(v.into_owned())),
            MapKey::String(v) => MapKey::String(Cow::Owned(v.into_owned())),
        }
    }
}

impl From<bool> for Value<'_> {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value<'_> {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value<'_> {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f32> for Value<'_> {
    fn from(v: f32) -> Self {
        Value::Float32(v)
    }
}

impl From<f64> for Value<'_> {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(v: &'a str) -> Self {
        Value::String(Cow::Borrowed(v))
    }
}

impl From<String> for Value<'_> {
    fn from(v: String) -> Self {
        Value::String(Cow::Owned(v))
    }
}

impl<'a> From<&'a [u8]> for Value<'a> {
    fn from(v: &'a [u8]) -> Self {
        Value::Bytes(Cow::Borrowed(v))
    }
}

impl From<Vec<u8>> for Value<'_> {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(Cow::Owned(v))
    }
}

impl From<i32> for MapKey<'_> {
    fn from(v: i32) -> Self {
        MapKey::Int32(v)
    }
}

impl From<i64> for MapKey<'_> {
    fn from(v: i64) -> Self {
        MapKey::Int64(v)
    }
}

impl<'a> From<&'a str> for MapKey<'a> {
    fn from(v: &'a str) -> Self {
        MapKey::String(Cow::Borrowed(v))
    }
}

impl From<String> for MapKey<'_> {
    fn from(v: String) -> Self {
        MapKey::String(Cow::Owned(v))
    }
}

/// Appends the wire encoding of `value` to `buf`.
///
/// Arrays and maps must be homogeneous; mixed element or key types are
/// rejected with `MixedContainerTypes`. Row values must hold a well-formed
/// record and are written as their exact byte range.
pub fn write_value(value: &Value<'_>, buf: &mut Vec<u8>) -> Result<()> {
    match value {
        Value::Null => {}
        Value::Bool(v) => buf.push(*v as u8),
        Value::Int32(v) => buf.extend_from_slice(&v.to_le_bytes()),
        Value::Int64(v) => buf.extend_from_slice(&v.to_le_bytes()),
        Value::Float32(v) => buf.extend_from_slice(&v.to_le_bytes()),
        Value::Float64(v) => buf.extend_from_slice(&v.to_le_bytes()),
        Value::Bytes(v) => {
            varint::encode_u32(v.len() as u32, buf);
            buf.extend_from_slice(v);
        }
        Value::String(v) => {
            varint::encode_u32(v.len() as u32, buf);
            buf.extend_from_slice(v.as_bytes());
        }
        Value::Array(elements) => {
            varint::encode_u32(elements.len() as u32, buf);
            if let Some(first) = elements.first() {
                let element_type = first.type_code();
                buf.push(element_type as u8);
                for element in elements {
                    if element.type_code() != element_type {
                        return Err(Error::MixedContainerTypes {
                            expected: element_type as u8,
                            found: element.type_code() as u8,
                        });
                    }
                    write_value(element, buf)?;
                }
            }
        }
        Value::Map(entries) => {
            varint::encode_u32(entries.len() as u32, buf);
            if let Some((first_key, first_value)) = entries.first() {
                let key_type = first_key.type_code();
                let value_type = first_value.type_code();
                buf.push(key_type as u8);
                buf.push(value_type as u8);
                for (key, val) in entries {
                    if key.type_code() != key_type {
                        return Err(Error::MixedContainerTypes {
                            expected: key_type as u8,
                            found: key.type_code() as u8,
                        });
                    }
                    if val.type_code() != value_type {
                        return Err(Error::MixedContainerTypes {
                            expected: value_type as u8,
                            found: val.type_code() as u8,
                        });
                    }
                    write_map_key(key, buf);
                    write_value(val, buf)?;
                }
            }
        }
        Value::Row(bytes) => {
            // A row value must be a well-formed record; trim any trailing
            // bytes so the embedded range stays self-delimiting.
            let view = RecordView::new(bytes)?;
            buf.extend_from_slice(view.bytes());
        }
    }
    Ok(())
}

fn write_map_key(key: &MapKey<'_>, buf: &mut Vec<u8>) {
    match key {
        MapKey::Int32(v) => buf.extend_from_slice(&v.to_le_bytes()),
        MapKey::Int64(v) => buf.extend_from_slice(&v.to_le_bytes()),
        MapKey::Bytes(v) => {
            varint::encode_u32(v.len() as u32, buf);
            buf.extend_from_slice(v);
        }
        MapKey::String(v) => {
            varint::encode_u32(v.len() as u32, buf);
            buf.extend_from_slice(v.as_bytes());
        }
    }
}

/// Decodes a value of the given type from the front of `buf`, returning the
/// value and the number of bytes consumed. Offsets in errors are relative to
/// `buf`.
pub fn read_value<'a>(type_code: TypeCode, buf: &'a [u8]) -> Result<(Value<'a>, usize)> {
    read_value_at_depth(type_code, buf, 0)
}

fn read_value_at_depth<'a>(
    type_code: TypeCode,
    buf: &'a [u8],
    depth: usize,
) -> Result<(Value<'a>, usize)> {
    let value = match type_code {
        TypeCode::Null => (Value::Null, 0),
        TypeCode::Bool => {
            let byte = *buf.first().ok_or(Error::Truncated {
                offset: 0,
                needed: 1,
                available: 0,
            })?;
            (Value::Bool(byte != 0), 1)
        }
        TypeCode::Int32 => (Value::Int32(i32::from_le_bytes(take_fixed(buf)?)), 4),
        TypeCode::Int64 => (Value::Int64(i64::from_le_bytes(take_fixed(buf)?)), 8),
        TypeCode::Float32 => (Value::Float32(f32::from_le_bytes(take_fixed(buf)?)), 4),
        TypeCode::Float64 => (Value::Float64(f64::from_le_bytes(take_fixed(buf)?)), 8),
        TypeCode::Bytes => {
            let (content, read) = take_prefixed(buf)?;
            (Value::Bytes(Cow::Borrowed(content)), read)
        }
        TypeCode::String => {
            let (content, read) = take_prefixed(buf)?;
            let text = std::str::from_utf8(content).map_err(|_| Error::InvalidUtf8 {
                offset: read - content.len(),
            })?;
            (Value::String(Cow::Borrowed(text)), read)
        }
        TypeCode::Array => {
            check_depth(depth)?;
            let (count, count_len) = varint::decode_u32(buf)?;
            if count == 0 {
                (Value::Array(Vec::new()), count_len)
            } else {
                let mut cursor = count_len;
                let element_type = read_type_byte(buf, &mut cursor)?;
                // Cap the reservation by the bytes actually present so a
                // forged count cannot force a huge allocation up front.
                let mut elements = Vec::with_capacity((count as usize).min(buf.len()));
                for _ in 0..count {
                    let (element, read) =
                        read_value_at_depth(element_type, &buf[cursor..], depth + 1)
                            .map_err(|err| err.rebase(cursor))?;
                    cursor += read;
                    elements.push(element);
                }
                (Value::Array(elements), cursor)
            }
        }
        TypeCode::Map => {
            check_depth(depth)?;
            let (count, count_len) = varint::decode_u32(buf)?;
            if count == 0 {
                (Value::Map(Vec::new()), count_len)
            } else {
                let mut cursor = count_len;
                let key_type = read_type_byte(buf, &mut cursor)?;
                if !key_type.is_map_key() {
                    return Err(Error::InvalidMapKeyType {
                        code: key_type as u8,
                    });
                }
                let value_type = read_type_byte(buf, &mut cursor)?;
                let mut entries = Vec::with_capacity((count as usize).min(buf.len()));
                for _ in 0..count {
                    let (key, key_read) = read_map_key(key_type, &buf[cursor..])
                        .map_err(|err| err.rebase(cursor))?;
                    cursor += key_read;
                    let (val, val_read) =
                        read_value_at_depth(value_type, &buf[cursor..], depth + 1)
                            .map_err(|err| err.rebase(cursor))?;
                    cursor += val_read;
                    entries.push((key, val));
                }
                (Value::Map(entries), cursor)
            }
        }
        TypeCode::Row => {
            check_depth(depth)?;
            let view = RecordView::new(buf)?;
            let record = view.bytes();
            (Value::Row(Cow::Borrowed(record)), record.len())
        }
    };
    Ok(value)
}

fn read_map_key<'a>(key_type: TypeCode, buf: &'a [u8]) -> Result<(MapKey<'a>, usize)> {
    match key_type {
        TypeCode::Int32 => Ok((MapKey::Int32(i32::from_le_bytes(take_fixed(buf)?)), 4)),
        TypeCode::Int64 => Ok((MapKey::Int64(i64::from_le_bytes(take_fixed(buf)?)), 8)),
        TypeCode::Bytes => {
            let (content, read) = take_prefixed(buf)?;
            Ok((MapKey::Bytes(Cow::Borrowed(content)), read))
        }
        TypeCode::String => {
            let (content, read) = take_prefixed(buf)?;
            let text = std::str::from_utf8(content).map_err(|_| Error::InvalidUtf8 {
                offset: read - content.len(),
            })?;
            Ok((MapKey::String(Cow::Borrowed(text)), read))
        }
        other => Err(Error::InvalidMapKeyType { code: other as u8 }),
    }
}

/// Computes the encoded size of the value at the front of `buf` without
/// decoding its body. Only structural bytes are read: counts, type bytes,
/// length prefixes, and nested record headers.
pub fn value_size(type_byte: u8, buf: &[u8]) -> Result<usize> {
    value_size_at_depth(type_byte, buf, 0)
}

fn value_size_at_depth(type_byte: u8, buf: &[u8], depth: usize) -> Result<usize> {
    let type_code = TypeCode::from_byte(type_byte).ok_or(Error::UnknownType {
        offset: 0,
        code: type_byte,
    })?;

    if let Some(width) = type_code.fixed_width() {
        return check_available(buf, 0, width).map(|_| width);
    }

    match type_code {
        TypeCode::Bytes | TypeCode::String => {
            let (len, prefix) = varint::decode_u32(buf)?;
            let total = prefix + len as usize;
            check_available(buf, prefix, len as usize)?;
            Ok(total)
        }
        TypeCode::Array => {
            check_depth(depth)?;
            let (count, count_len) = varint::decode_u32(buf)?;
            if count == 0 {
                return Ok(count_len);
            }
            let mut cursor = count_len;
            let element_byte = take_byte(buf, &mut cursor)?;
            if let Some(width) = fixed_width_of(element_byte, cursor)? {
                let total = cursor + count as usize * width;
                check_available(buf, cursor, count as usize * width)?;
                return Ok(total);
            }
            for _ in 0..count {
                let size = value_size_at_depth(element_byte, &buf[cursor..], depth + 1)
                    .map_err(|err| err.rebase(cursor))?;
                cursor += size;
            }
            Ok(cursor)
        }
        TypeCode::Map => {
            check_depth(depth)?;
            let (count, count_len) = varint::decode_u32(buf)?;
            if count == 0 {
                return Ok(count_len);
            }
            let mut cursor = count_len;
            let key_byte = take_byte(buf, &mut cursor)?;
            let key_code = TypeCode::from_byte(key_byte).ok_or(Error::UnknownType {
                offset: cursor - 1,
                code: key_byte,
            })?;
            if !key_code.is_map_key() {
                return Err(Error::InvalidMapKeyType { code: key_byte });
            }
            let value_byte = take_byte(buf, &mut cursor)?;
            for _ in 0..count {
                let key_size = value_size_at_depth(key_byte, &buf[cursor..], depth + 1)
                    .map_err(|err| err.rebase(cursor))?;
                cursor += key_size;
                let val_size = value_size_at_depth(value_byte, &buf[cursor..], depth + 1)
                    .map_err(|err| err.rebase(cursor))?;
                cursor += val_size;
            }
            Ok(cursor)
        }
        TypeCode::Row => {
            check_depth(depth)?;
            let view = RecordView::new(buf)?;
            Ok(view.bytes().len())
        }
        // Fixed-width codes were handled above.
        _ => unreachable!(),
    }
}

fn fixed_width_of(type_byte: u8, offset: usize) -> Result<Option<usize>> {
    let type_code = TypeCode::from_byte(type_byte).ok_or(Error::UnknownType {
        offset: offset.saturating_sub(1),
        code: type_byte,
    })?;
    Ok(type_code.fixed_width())
}

fn check_depth(depth: usize) -> Result<()> {
    if depth >= MAX_DEPTH {
        return Err(Error::DepthLimitExceeded { limit: MAX_DEPTH });
    }
    Ok(())
}

fn check_available(buf: &[u8], offset: usize, needed: usize) -> Result<()> {
    let available = buf.len().saturating_sub(offset);
    if available < needed {
        return Err(Error::Truncated {
            offset,
            needed,
            available,
        });
    }
    Ok(())
}

fn take_byte(buf: &[u8], cursor: &mut usize) -> Result<u8> {
    let byte = *buf.get(*cursor).ok_or(Error::Truncated {
        offset: *cursor,
        needed: 1,
        available: 0,
    })?;
    *cursor += 1;
    Ok(byte)
}

fn read_type_byte(buf: &[u8], cursor: &mut usize) -> Result<TypeCode> {
    let position = *cursor;
    let byte = take_byte(buf, cursor)?;
    TypeCode::from_byte(byte).ok_or(Error::UnknownType {
        offset: position,
        code: byte,
    })
}

fn take_fixed<const N: usize>(buf: &[u8]) -> Result<[u8; N]> {
    buf.get(..N)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or(Error::Truncated {
            offset: 0,
            needed: N,
            available: buf.len(),
        })
}

fn take_prefixed(buf: &[u8]) -> Result<(&[u8], usize)> {
    let (len, prefix) = varint::decode_u32(buf)?;
    let len = len as usize;
    check_available(buf, prefix, len)?;
    Ok((&buf[prefix..prefix + len], prefix + len))
}
