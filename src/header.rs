/* src/header.rs */

use crate::error::Error;
use crate::keys::QUIC_V1;
use crate::packet::{ConnectionId, FIXED_BIT, INITIAL_TYPE, LONG_HEADER, MAX_CID_LEN};
use crate::varint::read_varint;

/// The version-independent prefix of a long header packet: version and both
/// connection IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongHeader<'a> {
	/// First byte, possibly still under header protection.
	pub first_byte: u8,
	/// Version field.
	pub version: u32,
	/// Destination Connection ID bytes.
	pub dcid: &'a [u8],
	/// Source Connection ID bytes.
	pub scid: &'a [u8],
	/// Offset of the first byte after the source connection ID.
	pub end: usize,
}

/// Parsed QUIC Initial packet header with zero-copy references into the
/// original packet buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialHeader<'a> {
	/// QUIC version field.
	pub version: u32,
	/// Destination Connection ID bytes.
	pub dcid: &'a [u8],
	/// Source Connection ID bytes.
	pub scid: &'a [u8],
	/// Token bytes. An empty slice indicates no token was present.
	pub token: &'a [u8],
	/// Encrypted payload including the protected packet number.
	pub payload: &'a [u8],
	/// Raw header bytes from the first byte up to (but not including) the
	/// packet number. Required when rebuilding the AEAD associated data.
	pub header_bytes: &'a [u8],
	/// The first byte of the packet, still under header protection.
	pub first_byte: u8,
}

/// Parse the first byte, version and connection IDs of a long header packet.
///
/// Works for any long packet type, including Version Negotiation, since only
/// the invariant fields (RFC 8999) are read.
///
/// # Errors
///
/// Returns an error when the packet is too short, is not a long header, or
/// has a connection ID length over 20.
pub fn parse_long_header(packet: &[u8]) -> Result<LongHeader<'_>, Error> {
	if packet.len() < 7 {
		return Err(Error::BufferTooShort {
			need: 7,
			have: packet.len(),
		});
	}

	let first_byte = packet[0];
	if (first_byte & LONG_HEADER) == 0 {
		return Err(Error::NotLongHeader);
	}

	let version = u32::from_be_bytes([packet[1], packet[2], packet[3], packet[4]]);
	let (dcid, cursor) = read_cid(packet, 5)?;
	let (scid, end) = read_cid(packet, cursor)?;

	Ok(LongHeader {
		first_byte,
		version,
		dcid,
		scid,
		end,
	})
}

/// Parse a QUIC v1 long header Initial packet from a raw datagram.
///
/// Only the header fields are extracted; no decryption is performed. The
/// returned [`InitialHeader`] borrows directly from `packet`.
///
/// # Errors
///
/// Returns an error when the packet is too short, is not a long-header
/// Initial packet, or contains a connection ID length exceeding 20 bytes.
pub fn parse_initial(packet: &[u8]) -> Result<InitialHeader<'_>, Error> {
	let long = parse_long_header(packet)?;

	if (long.first_byte & FIXED_BIT) == 0 {
		return Err(Error::InvalidFixedBit);
	}

	let packet_type = long.first_byte & 0x30;
	if packet_type != INITIAL_TYPE {
		return Err(Error::NotInitialPacket(packet_type >> 4));
	}

	let cursor = long.end;
	let (token_len, varint_len) = read_varint(packet.get(cursor..).ok_or(Error::BufferTooShort {
		need: cursor + 1,
		have: packet.len(),
	})?)?;
	let cursor = cursor + varint_len;
	let token_end = to_usize(token_len, packet.len())?
		.checked_add(cursor)
		.ok_or(Error::BufferTooShort {
			need: usize::MAX,
			have: packet.len(),
		})?;
	if token_end > packet.len() {
		return Err(Error::BufferTooShort {
			need: token_end,
			have: packet.len(),
		});
	}
	let token = &packet[cursor..token_end];
	let cursor = token_end;

	let (remaining_len, varint_len) =
		read_varint(packet.get(cursor..).ok_or(Error::BufferTooShort {
			need: cursor + 1,
			have: packet.len(),
		})?)?;
	let cursor = cursor + varint_len;
	let payload_end = to_usize(remaining_len, packet.len())?
		.checked_add(cursor)
		.ok_or(Error::BufferTooShort {
			need: usize::MAX,
			have: packet.len(),
		})?;
	if payload_end > packet.len() {
		return Err(Error::BufferTooShort {
			need: payload_end,
			have: packet.len(),
		});
	}

	Ok(InitialHeader {
		version: long.version,
		dcid: long.dcid,
		scid: long.scid,
		token,
		payload: &packet[cursor..payload_end],
		header_bytes: &packet[..cursor],
		first_byte: long.first_byte,
	})
}

/// Extract the connection ID a server chose for itself from its first long
/// header reply: the reply's Source Connection ID.
///
/// The client addresses its next packets to this ID.
///
/// Only QUIC v1 long headers with the fixed bit set are accepted.
///
/// # Errors
///
/// Returns the [`parse_long_header`] errors, [`Error::VersionNegotiation`]
/// for a version 0 reply, [`Error::UnsupportedVersion`] for any other
/// version, [`Error::InvalidFixedBit`] when the fixed bit is clear, or
/// [`Error::MissingServerCid`] when the reply's source connection ID is empty.
pub fn server_chosen_cid(reply: &[u8]) -> Result<ConnectionId, Error> {
	let long = parse_long_header(reply)?;
	match long.version {
		0 => return Err(Error::VersionNegotiation),
		QUIC_V1 => {}
		other => return Err(Error::UnsupportedVersion(other)),
	}
	if (long.first_byte & FIXED_BIT) == 0 {
		return Err(Error::InvalidFixedBit);
	}
	if long.scid.is_empty() {
		return Err(Error::MissingServerCid);
	}
	ConnectionId::new(long.scid)
}

fn read_cid(packet: &[u8], offset: usize) -> Result<(&[u8], usize), Error> {
	let &cid_len_byte = packet.get(offset).ok_or(Error::BufferTooShort {
		need: offset + 1,
		have: packet.len(),
	})?;
	let cid_len = usize::from(cid_len_byte);
	if cid_len > MAX_CID_LEN {
		return Err(Error::InvalidCidLength(cid_len));
	}
	let start = offset + 1;
	let end = start + cid_len;
	if end > packet.len() {
		return Err(Error::BufferTooShort {
			need: end,
			have: packet.len(),
		});
	}
	Ok((&packet[start..end], end))
}

fn to_usize(value: u64, have: usize) -> Result<usize, Error> {
	usize::try_from(value).map_err(|_| Error::BufferTooShort {
		need: usize::MAX,
		have,
	})
}
