/* src/varint.rs */

use crate::error::Error;

/// Largest value representable in the two-byte varint form.
pub const MAX_TWO_BYTE: u64 = (1 << 14) - 1;

/// Largest value representable as a QUIC varint.
pub const MAX_VARINT: u64 = (1 << 62) - 1;

/// Decode a QUIC variable-length integer from the start of `buf`.
///
/// Returns the decoded value and the number of bytes consumed (1, 2, 4, or 8).
/// The encoding is defined in RFC 9000 Section 16.
///
/// # Errors
///
/// Returns [`Error::InvalidVarint`] when `buf` is empty or too short for the
/// indicated encoding length.
#[must_use = "returns the decoded value without modifying the buffer"]
pub fn read_varint(buf: &[u8]) -> Result<(u64, usize), Error> {
	let &first = buf.first().ok_or(Error::InvalidVarint)?;
	let prefix = first >> 6;
	let len = 1usize << prefix;

	if buf.len() < len {
		return Err(Error::InvalidVarint);
	}

	let mut val = u64::from(first & 0x3f);
	for &b in &buf[1..len] {
		val = (val << 8) | u64::from(b);
	}
	Ok((val, len))
}

/// Append `value` to `buf` using the shortest QUIC varint encoding.
///
/// # Errors
///
/// Returns [`Error::InvalidVarint`] when `value` exceeds 2^62 - 1.
pub fn write_varint(buf: &mut Vec<u8>, value: u64) -> Result<(), Error> {
	match value {
		0..=0x3f => buf.push(value as u8),
		0x40..=MAX_TWO_BYTE => buf.extend_from_slice(&(0x4000 | value as u16).to_be_bytes()),
		0x4000..=0x3fff_ffff => {
			buf.extend_from_slice(&(0x8000_0000 | value as u32).to_be_bytes());
		}
		0x4000_0000..=MAX_VARINT => {
			buf.extend_from_slice(&(0xc000_0000_0000_0000 | value).to_be_bytes());
		}
		_ => return Err(Error::InvalidVarint),
	}
	Ok(())
}

/// Append `value` in the two-byte varint form (`01` prefix), regardless of
/// whether a shorter form would do.
///
/// The Initial length field is written this way so the header size does not
/// change between the zero-length and final encodings.
///
/// # Errors
///
/// Returns [`Error::LengthOverflow`] when `value` exceeds 16383.
pub fn write_varint_2(buf: &mut Vec<u8>, value: u64) -> Result<(), Error> {
	if value > MAX_TWO_BYTE {
		return Err(Error::LengthOverflow(value));
	}
	buf.extend_from_slice(&(0x4000 | value as u16).to_be_bytes());
	Ok(())
}
