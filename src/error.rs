/* src/error.rs */

use std::net::SocketAddr;
use std::time::Duration;

/// Errors that can occur while building, protecting, sending or parsing
/// QUIC Initial packets.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// The input buffer is shorter than required.
	#[error("buffer too short: need at least {need} bytes, have {have}")]
	BufferTooShort {
		/// Minimum number of bytes required.
		need: usize,
		/// Actual number of bytes available.
		have: usize,
	},

	/// The packet does not have the long header form bit set.
	#[error("not a QUIC long header packet")]
	NotLongHeader,

	/// The long header fixed bit is clear.
	#[error("QUIC fixed bit is not set")]
	InvalidFixedBit,

	/// The packet is a long header but not an Initial packet.
	#[error("not an Initial packet (type bits: {0:#04x})")]
	NotInitialPacket(u8),

	/// The QUIC version has no Initial salt here.
	#[error("unsupported QUIC version: {0:#010x}")]
	UnsupportedVersion(u32),

	/// A connection ID length exceeds the protocol maximum of 20 bytes.
	#[error("connection ID length {0} exceeds maximum of 20")]
	InvalidCidLength(usize),

	/// Initial secrets cannot be derived from an empty connection ID.
	#[error("destination connection ID must not be empty")]
	EmptyCid,

	/// The server answered with a Version Negotiation packet, whose source
	/// connection ID only echoes the client's destination connection ID.
	#[error("server replied with Version Negotiation")]
	VersionNegotiation,

	/// The server reply carried no source connection ID to address.
	#[error("server reply carries an empty source connection ID")]
	MissingServerCid,

	/// The variable-length integer encoding is malformed.
	#[error("invalid varint encoding")]
	InvalidVarint,

	/// A value does not fit the fixed two-byte varint used for the length field.
	#[error("length {0} does not fit a two-byte varint")]
	LengthOverflow(u64),

	/// The frames do not fit in the padded datagram.
	#[error("frames are {len} bytes, larger than the {limit}-byte datagram")]
	PayloadTooLarge {
		/// Length of the supplied frames.
		len: usize,
		/// Size the payload is padded to.
		limit: usize,
	},

	/// HKDF-Expand was asked for more than 255 hash blocks.
	#[error("HKDF output length {0} exceeds 255 * 32 bytes")]
	HkdfLength(usize),

	/// A TLS 1.3 HkdfLabel field overflowed its length prefix.
	#[error("HKDF label overflow: {0}")]
	HkdfLabel(&'static str),

	/// The crypto backend rejected a key, nonce or sealing operation.
	#[error("crypto backend failure: {0}")]
	Crypto(&'static str),

	/// AEAD decryption failed.
	#[error("decryption failed: {0}")]
	DecryptionFailed(String),

	/// The source port could not be bound.
	#[error("failed to bind UDP source port {port}")]
	Bind {
		/// Requested source port.
		port: u16,
		/// Underlying socket error.
		#[source]
		source: std::io::Error,
	},

	/// The socket could not be associated with the peer address.
	#[error("failed to connect UDP socket to {peer}")]
	Connect {
		/// Destination address.
		peer: SocketAddr,
		/// Underlying socket error.
		#[source]
		source: std::io::Error,
	},

	/// A datagram could not be sent.
	#[error("failed to send datagram to {peer}")]
	Send {
		/// Destination address.
		peer: SocketAddr,
		/// Underlying socket error.
		#[source]
		source: std::io::Error,
	},

	/// Receiving the reply failed for a reason other than the timeout.
	#[error("failed to receive reply")]
	Receive(#[source] std::io::Error),

	/// No reply arrived within the timeout.
	#[error("no reply within {0:?}")]
	Timeout(Duration),

	/// The source port range is empty or includes port zero.
	#[error("invalid source port range {min}..={max}")]
	InvalidPortRange {
		/// Lower bound.
		min: u16,
		/// Upper bound.
		max: u16,
	},

	/// The reply timeout must be non-zero.
	#[error("reply timeout must be greater than zero")]
	InvalidTimeout,
}
