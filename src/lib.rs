/* src/lib.rs */

//! Build cryptographically valid QUIC v1 Initial packets and run a
//! two-packet probe against a server.
//!
//! The crate is layered:
//!
//! **Key schedule**: HKDF-SHA256 extract/expand and TLS 1.3
//! `HKDF-Expand-Label` ([`hkdf`]), and the client Initial secrets derived
//! from a destination connection ID ([`derive_initial_secrets`]).
//!
//! **Packet protection**: long header encoding, AES-128-GCM payload
//! protection and AES-128-ECB header protection ([`build_initial_packet`]),
//! plus the inverse ([`open_initial`], [`decrypt_initial`]).
//!
//! **Probe session**: a UDP exchange that sends an Initial carrying a
//! ClientHello and CONNECTION_CLOSE, reads the server's connection ID from
//! its reply, and follows up with an ACK under the original keys
//! ([`ProbeSession`], [`run_probe`]).
//!
//! Exactly one crypto backend feature, `ring` or `aws-lc-rs`, must be enabled.

#[cfg(all(feature = "ring", feature = "aws-lc-rs"))]
compile_error!(
	"features `ring` and `aws-lc-rs` are mutually exclusive; enable only one crypto backend"
);

#[cfg(not(any(feature = "ring", feature = "aws-lc-rs")))]
compile_error!("enable one crypto backend feature: `ring` or `aws-lc-rs`");

mod backend;
mod config;
mod error;
mod frame;
mod header;
pub mod hkdf;
mod keys;
mod observer;
mod packet;
mod protect;
mod session;
mod transport;
mod varint;

pub use config::{
	DEFAULT_DESTINATION, DEFAULT_REPLY_TIMEOUT, DEFAULT_SOURCE_PORTS, PortRange, ProbeConfig,
};
pub use error::Error;
pub use frame::{
	ACK, CLIENT_HELLO_CRYPTO, CONNECTION_CLOSE, MIN_INITIAL_SIZE, ProbePayloads, padded_payload,
};
pub use header::{InitialHeader, LongHeader, parse_initial, parse_long_header, server_chosen_cid};
pub use keys::{
	HP_LEN, INITIAL_SALT_V1, IV_LEN, InitialSecrets, KEY_LEN, QUIC_V1, TrafficKeys,
	derive_initial_secrets,
};
#[cfg(feature = "tracing")]
pub use observer::TracingObserver;
pub use observer::ProbeObserver;
pub use packet::{ConnectionId, InitialFields, MAX_CID_LEN, PacketNumber};
pub use protect::{
	MASK_LEN, OpenedPacket, SAMPLE_LEN, TAG_LEN, apply_header_protection, build_initial_packet,
	decrypt_initial, header_protection_mask, nonce, open_initial, open_payload, protect,
	seal_payload, sealed_len,
};
pub use session::{
	CLIENT_DCID_LEN, FIRST_PACKET_NUMBER, ProbeReport, ProbeSession, ProbeState,
	SECOND_PACKET_NUMBER, run_probe,
};
pub use transport::{Transport, UdpTransport};
pub use varint::{read_varint, write_varint, write_varint_2};
