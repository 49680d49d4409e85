/* src/frame.rs */

//! Literal frame payloads carried by the probe, and padding.
//!
//! Frames are opaque byte blobs here: they are concatenated and zero-padded,
//! never parsed.

use crate::error::Error;

/// Minimum size of a datagram carrying a client Initial packet
/// (RFC 9000 Section 14.1). Payloads are padded to this size.
pub const MIN_INITIAL_SIZE: usize = 1200;

/// CRYPTO frame at offset 0 carrying a TLS 1.3 ClientHello (287 bytes).
///
/// The ClientHello repeats the `quic_transport_parameters` extension (0x39)
/// and ends with `psk_key_exchange_modes`.
pub const CLIENT_HELLO_CRYPTO: [u8; 291] = [
	0x06, 0x00, 0x41, 0x1f, 0x01, 0x00, 0x01, 0x1b, 0x03, 0x03, 0xb1, 0x80, 0x48, 0x26, 0x24, 0x7d,
	0x5e, 0x39, 0x2f, 0xd6, 0x9e, 0xdf, 0xa8, 0xb9, 0xf8, 0x76, 0x29, 0xf1, 0x29, 0x37, 0x93, 0x4e,
	0x61, 0xb4, 0x4e, 0xc5, 0xa8, 0x76, 0x93, 0xf1, 0x62, 0x56, 0x00, 0x00, 0x06, 0x13, 0x02, 0x13,
	0x01, 0x13, 0x03, 0x01, 0x00, 0x00, 0xec, 0x00, 0x33, 0x00, 0x47, 0x00, 0x45, 0x00, 0x17, 0x00,
	0x41, 0x04, 0x93, 0x8a, 0x26, 0xbe, 0xa0, 0x57, 0x34, 0x3c, 0x88, 0x40, 0x49, 0x43, 0x72, 0x00,
	0x5e, 0xb5, 0x65, 0x30, 0xd8, 0xcc, 0x2a, 0x25, 0x33, 0xcc, 0xcf, 0xeb, 0xab, 0xfc, 0x43, 0x1b,
	0xd5, 0x7b, 0x2b, 0x88, 0x44, 0xd8, 0x04, 0xe6, 0x7a, 0x77, 0x84, 0xb0, 0xf9, 0xab, 0x5b, 0x41,
	0x74, 0x02, 0x1a, 0x34, 0x8c, 0x04, 0x1e, 0x65, 0x31, 0xf2, 0x71, 0x98, 0x30, 0x67, 0xb9, 0xef,
	0x47, 0x76, 0x00, 0x2b, 0x00, 0x03, 0x02, 0x03, 0x04, 0x00, 0x0d, 0x00, 0x0a, 0x00, 0x08, 0x08,
	0x04, 0x04, 0x03, 0x04, 0x01, 0x02, 0x01, 0x00, 0x0a, 0x00, 0x04, 0x00, 0x02, 0x00, 0x17, 0x00,
	0x39, 0x00, 0x3b, 0x03, 0x02, 0x45, 0xc0, 0x05, 0x04, 0x80, 0x10, 0x00, 0x00, 0x06, 0x04, 0x80,
	0x10, 0x00, 0x00, 0x07, 0x04, 0x80, 0x10, 0x00, 0x00, 0x04, 0x04, 0x81, 0x00, 0x00, 0x00, 0x01,
	0x04, 0x80, 0x00, 0x75, 0x30, 0x0f, 0x00, 0x08, 0x02, 0x40, 0x64, 0x0a, 0x01, 0x0a, 0xc0, 0x00,
	0x00, 0x00, 0xff, 0x03, 0xde, 0x1a, 0x04, 0x80, 0x00, 0x61, 0xa8, 0x0e, 0x01, 0x04, 0xff, 0xa5,
	0x00, 0x3b, 0x03, 0x02, 0x45, 0xc0, 0x05, 0x04, 0x80, 0x10, 0x00, 0x00, 0x06, 0x04, 0x80, 0x10,
	0x00, 0x00, 0x07, 0x04, 0x80, 0x10, 0x00, 0x00, 0x04, 0x04, 0x81, 0x00, 0x00, 0x00, 0x01, 0x04,
	0x80, 0x00, 0x75, 0x30, 0x0f, 0x00, 0x08, 0x02, 0x40, 0x64, 0x0a, 0x01, 0x0a, 0xc0, 0x00, 0x00,
	0x00, 0xff, 0x03, 0xde, 0x1a, 0x04, 0x80, 0x00, 0x61, 0xa8, 0x0e, 0x01, 0x04, 0x00, 0x2d, 0x00,
	0x02, 0x01, 0x01,
];

/// CONNECTION_CLOSE (0x1c) with error code 0, frame type 0 and an empty
/// reason phrase.
pub const CONNECTION_CLOSE: [u8; 4] = [0x1c, 0x00, 0x00, 0x00];

/// ACK (0x02) of packet 0 with an ACK Delay of 184 and no extra ranges. The
/// First ACK Range byte is left to the padding that follows.
pub const ACK: [u8; 5] = [0x02, 0x00, 0x40, 0xb8, 0x00];

/// Concatenate `frames` and append PADDING (zero bytes) up to `size`.
///
/// # Errors
///
/// Returns [`Error::PayloadTooLarge`] when the frames alone exceed `size`.
pub fn padded_payload(frames: &[&[u8]], size: usize) -> Result<Vec<u8>, Error> {
	let len: usize = frames.iter().map(|f| f.len()).sum();
	if len > size {
		return Err(Error::PayloadTooLarge { len, limit: size });
	}
	let mut payload = Vec::with_capacity(size);
	for frame in frames {
		payload.extend_from_slice(frame);
	}
	payload.resize(size, 0x00);
	Ok(payload)
}

/// The two plaintext payloads of a probe run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbePayloads {
	/// Payload of the first Initial packet.
	pub first: Vec<u8>,
	/// Payload of the second Initial packet, sent after the server replied.
	pub second: Vec<u8>,
}

impl ProbePayloads {
	/// CRYPTO(ClientHello) + CONNECTION_CLOSE for the first packet and a bare
	/// ACK for the second, each padded to [`MIN_INITIAL_SIZE`].
	///
	/// # Errors
	///
	/// Never fails for the built-in frames; the signature matches
	/// [`padded_payload`].
	pub fn connection_close_then_ack() -> Result<Self, Error> {
		Ok(Self {
			first: padded_payload(&[&CLIENT_HELLO_CRYPTO, &CONNECTION_CLOSE], MIN_INITIAL_SIZE)?,
			second: padded_payload(&[&ACK], MIN_INITIAL_SIZE)?,
		})
	}
}
