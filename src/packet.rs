/* src/packet.rs */

//! Long header layout for client Initial packets.

use std::fmt;

use rand::Rng;

use crate::error::Error;
use crate::varint::{write_varint, write_varint_2};

/// Maximum connection ID length in QUIC v1.
pub const MAX_CID_LEN: usize = 20;

/// Header form bit: set for long headers.
pub const LONG_HEADER: u8 = 0x80;
/// Fixed bit, always set in QUIC v1.
pub const FIXED_BIT: u8 = 0x40;
/// Long packet type bits for Initial in QUIC v1.
pub const INITIAL_TYPE: u8 = 0x00;

/// An opaque connection ID of 0 to 20 bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId {
	bytes: [u8; MAX_CID_LEN],
	len: u8,
}

impl ConnectionId {
	/// Copy `bytes` into a connection ID.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidCidLength`] when `bytes` is longer than 20.
	pub fn new(bytes: &[u8]) -> Result<Self, Error> {
		if bytes.len() > MAX_CID_LEN {
			return Err(Error::InvalidCidLength(bytes.len()));
		}
		let mut cid = Self {
			bytes: [0; MAX_CID_LEN],
			len: bytes.len() as u8,
		};
		cid.bytes[..bytes.len()].copy_from_slice(bytes);
		Ok(cid)
	}

	/// A random connection ID of `len` bytes from the thread-local RNG.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidCidLength`] when `len` is larger than 20.
	pub fn random(len: usize) -> Result<Self, Error> {
		let mut bytes = [0u8; MAX_CID_LEN];
		let buf = bytes
			.get_mut(..len)
			.ok_or(Error::InvalidCidLength(len))?;
		rand::thread_rng().fill(buf);
		Self::new(&bytes[..len])
	}

	/// An empty connection ID.
	#[must_use]
	pub const fn empty() -> Self {
		Self {
			bytes: [0; MAX_CID_LEN],
			len: 0,
		}
	}

	/// The connection ID bytes.
	#[must_use]
	pub fn as_bytes(&self) -> &[u8] {
		&self.bytes[..usize::from(self.len)]
	}

	/// Length in bytes.
	#[must_use]
	pub fn len(&self) -> usize {
		usize::from(self.len)
	}

	/// Whether the connection ID is zero-length.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}
}

impl AsRef<[u8]> for ConnectionId {
	fn as_ref(&self) -> &[u8] {
		self.as_bytes()
	}
}

impl fmt::Display for ConnectionId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&hex::encode(self.as_bytes()))
	}
}

impl fmt::Debug for ConnectionId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ConnectionId({self})")
	}
}

/// A packet number, always encoded as a 4-byte big-endian field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PacketNumber(u32);

impl PacketNumber {
	/// Encoded length of the packet number field.
	pub const LEN: usize = 4;

	/// Wrap a raw packet number.
	#[must_use]
	pub const fn new(value: u32) -> Self {
		Self(value)
	}

	/// The raw value.
	#[must_use]
	pub const fn value(self) -> u32 {
		self.0
	}

	/// Big-endian wire encoding.
	#[must_use]
	pub const fn to_bytes(self) -> [u8; Self::LEN] {
		self.0.to_be_bytes()
	}
}

impl fmt::Display for PacketNumber {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

/// The fields of a client Initial long header.
#[derive(Debug, Clone, Copy)]
pub struct InitialFields<'a> {
	/// QUIC version written into the header.
	pub version: u32,
	/// Destination connection ID.
	pub dcid: &'a ConnectionId,
	/// Source connection ID.
	pub scid: &'a ConnectionId,
	/// Address validation token; empty for a fresh connection.
	pub token: &'a [u8],
	/// Packet number of this packet.
	pub packet_number: PacketNumber,
}

impl InitialFields<'_> {
	/// Unprotected first byte: long header, fixed bit, Initial type and the
	/// packet number length minus one in the low two bits.
	#[must_use]
	pub const fn first_byte(&self) -> u8 {
		LONG_HEADER | FIXED_BIT | INITIAL_TYPE | (PacketNumber::LEN as u8 - 1)
	}

	/// Encode the unprotected header with `length` in the length field.
	///
	/// `length` counts the packet number and the protected payload. It is
	/// always written in the two-byte varint form, so the header size does not
	/// depend on it.
	///
	/// # Errors
	///
	/// Returns [`Error::LengthOverflow`] when `length` needs more than two
	/// varint bytes.
	pub fn encode(&self, length: u64) -> Result<Vec<u8>, Error> {
		let mut out = Vec::with_capacity(self.encoded_len());
		out.push(self.first_byte());
		out.extend_from_slice(&self.version.to_be_bytes());
		out.push(self.dcid.len() as u8);
		out.extend_from_slice(self.dcid.as_bytes());
		out.push(self.scid.len() as u8);
		out.extend_from_slice(self.scid.as_bytes());
		write_varint(&mut out, self.token.len() as u64)?;
		out.extend_from_slice(self.token);
		write_varint_2(&mut out, length)?;
		out.extend_from_slice(&self.packet_number.to_bytes());
		Ok(out)
	}

	/// The header with a zero-filled length field, used to size the sealed
	/// payload before the real length is known.
	///
	/// The two length bytes are literal `00 00` rather than the two-byte
	/// varint form of zero (`40 00`). Only the field width matters here.
	///
	/// # Errors
	///
	/// See [`InitialFields::encode`].
	pub fn encode_dummy(&self) -> Result<Vec<u8>, Error> {
		let mut out = self.encode(0)?;
		let length_at = out.len() - PacketNumber::LEN - 2;
		out[length_at..length_at + 2].fill(0);
		Ok(out)
	}

	/// Size of the encoded header in bytes.
	#[must_use]
	pub fn encoded_len(&self) -> usize {
		let token_len_len = match self.token.len() {
			0..=0x3f => 1,
			0x40..=0x3fff => 2,
			0x4000..=0x3fff_ffff => 4,
			_ => 8,
		};
		1 + 4 + 1 + self.dcid.len() + 1 + self.scid.len() + token_len_len + self.token.len()
			+ 2 + PacketNumber::LEN
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cid_rejects_21_bytes() {
		assert!(matches!(
			ConnectionId::new(&[0u8; 21]),
			Err(Error::InvalidCidLength(21))
		));
		assert!(matches!(
			ConnectionId::random(21),
			Err(Error::InvalidCidLength(21))
		));
	}

	#[test]
	fn random_cid_has_requested_length() {
		let cid = ConnectionId::random(8).unwrap();
		assert_eq!(cid.len(), 8);
		assert_ne!(cid, ConnectionId::random(8).unwrap());
	}

	#[test]
	fn cid_display_is_hex() {
		let cid = ConnectionId::new(&[0xde, 0xad, 0xbe, 0xef]).unwrap();
		assert_eq!(cid.to_string(), "deadbeef");
	}

	#[test]
	fn header_layout() {
		let dcid = ConnectionId::new(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
		let scid = ConnectionId::empty();
		let fields = InitialFields {
			version: 1,
			dcid: &dcid,
			scid: &scid,
			token: &[],
			packet_number: PacketNumber::new(1),
		};
		let header = fields.encode(0x4c4).unwrap();
		assert_eq!(
			header,
			hex::decode("c300000001080102030405060708000044c400000001").unwrap()
		);
		assert_eq!(header.len(), fields.encoded_len());
		let dummy = fields.encode_dummy().unwrap();
		assert_eq!(dummy.len(), header.len());
		assert_eq!(
			dummy,
			hex::decode("c3000000010801020304050607080000000000000001").unwrap()
		);
	}

	#[test]
	fn header_rejects_large_length() {
		let dcid = ConnectionId::new(&[1; 8]).unwrap();
		let scid = ConnectionId::empty();
		let fields = InitialFields {
			version: 1,
			dcid: &dcid,
			scid: &scid,
			token: &[],
			packet_number: PacketNumber::new(0),
		};
		assert!(matches!(
			fields.encode(16384),
			Err(Error::LengthOverflow(16384))
		));
	}
}
