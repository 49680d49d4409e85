/* src/session.rs */

//! The two-packet probe: an Initial carrying CRYPTO and CONNECTION_CLOSE,
//! then, once the server answers, an Initial carrying an ACK addressed to the
//! server's connection ID under the original keys.

use std::time::Duration;

use crate::config::ProbeConfig;
use crate::error::Error;
use crate::frame::ProbePayloads;
use crate::header::server_chosen_cid;
use crate::keys::{QUIC_V1, TrafficKeys, derive_initial_secrets};
use crate::observer::ProbeObserver;
use crate::packet::{ConnectionId, InitialFields, PacketNumber};
use crate::protect::build_initial_packet;
use crate::transport::{Transport, UdpTransport};

/// Length of the random client-chosen destination connection ID.
pub const CLIENT_DCID_LEN: usize = 8;

/// Packet number of the first Initial packet.
pub const FIRST_PACKET_NUMBER: PacketNumber = PacketNumber::new(0);

/// Packet number of the second Initial packet.
pub const SECOND_PACKET_NUMBER: PacketNumber = PacketNumber::new(1);

/// Where a probe run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeState {
	/// Nothing built yet.
	Init,
	/// Building and sending the first packet.
	SentPacket1,
	/// Blocked on the server's reply.
	AwaitingReply,
	/// Reading the server's connection ID from the reply.
	ReceivedReply,
	/// Building and sending the second packet.
	SentPacket2,
	/// Both packets sent.
	Done,
	/// No reply arrived in time. Terminal.
	TimedOut,
}

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct ProbeReport {
	/// Client-chosen destination connection ID of the first packet.
	pub dcid: ConnectionId,
	/// Connection ID the server chose, used as the second packet's DCID.
	pub server_cid: ConnectionId,
	/// Keys that protected both packets.
	pub keys: TrafficKeys,
	/// Wire image of the first packet.
	pub first_packet: Vec<u8>,
	/// The server's reply datagram.
	pub reply: Vec<u8>,
	/// Wire image of the second packet.
	pub second_packet: Vec<u8>,
}

/// Drives one probe over a [`Transport`]. Consumed by [`ProbeSession::run`],
/// which releases the transport on every exit path.
pub struct ProbeSession<T, O> {
	transport: T,
	observer: O,
	payloads: ProbePayloads,
	reply_timeout: Duration,
	state: ProbeState,
}

impl<T: Transport, O: ProbeObserver> ProbeSession<T, O> {
	/// A session sending the default CONNECTION_CLOSE / ACK payloads.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidTimeout`] for a zero timeout.
	pub fn new(transport: T, observer: O, reply_timeout: Duration) -> Result<Self, Error> {
		if reply_timeout.is_zero() {
			return Err(Error::InvalidTimeout);
		}
		Ok(Self {
			transport,
			observer,
			payloads: ProbePayloads::connection_close_then_ack()?,
			reply_timeout,
			state: ProbeState::Init,
		})
	}

	/// Replace the plaintext payloads of both packets.
	#[must_use]
	pub fn with_payloads(mut self, payloads: ProbePayloads) -> Self {
		self.payloads = payloads;
		self
	}

	/// Current state.
	#[must_use]
	pub fn state(&self) -> ProbeState {
		self.state
	}

	/// Run the exchange with `dcid` as the first packet's destination
	/// connection ID. The second packet is sent without waiting.
	///
	/// # Errors
	///
	/// Any transport error, a timeout, or a reply without a usable long
	/// header ends the run. Nothing is retried, and a packet is only sent once
	/// it is fully built.
	pub fn run(mut self, dcid: ConnectionId) -> Result<ProbeReport, Error> {
		self.transition(ProbeState::SentPacket1);
		let secrets = derive_initial_secrets(dcid.as_bytes())?;
		self.observer.secrets_derived(&dcid, &secrets);
		let keys = secrets.keys;
		let scid = ConnectionId::empty();

		let first_packet = build_initial_packet(
			&InitialFields {
				version: QUIC_V1,
				dcid: &dcid,
				scid: &scid,
				token: &[],
				packet_number: FIRST_PACKET_NUMBER,
			},
			&self.payloads.first,
			&keys,
		)?;
		self.observer.packet_built(FIRST_PACKET_NUMBER, &first_packet);

		self.transition(ProbeState::AwaitingReply);
		let reply = match self
			.transport
			.send_and_await_reply(&first_packet, self.reply_timeout)
		{
			Ok(reply) => reply,
			Err(e @ Error::Timeout(_)) => {
				self.transition(ProbeState::TimedOut);
				return Err(e);
			}
			Err(e) => return Err(e),
		};

		self.transition(ProbeState::ReceivedReply);
		self.observer.reply_received(&reply);
		let server_cid = server_chosen_cid(&reply)?;
		self.observer.server_cid(&server_cid);

		// Keys stay bound to the original DCID; only the header changes.
		self.transition(ProbeState::SentPacket2);
		let second_packet = build_initial_packet(
			&InitialFields {
				version: QUIC_V1,
				dcid: &server_cid,
				scid: &scid,
				token: &[],
				packet_number: SECOND_PACKET_NUMBER,
			},
			&self.payloads.second,
			&keys,
		)?;
		self.observer.packet_built(SECOND_PACKET_NUMBER, &second_packet);
		self.transport.send(&second_packet)?;

		self.transition(ProbeState::Done);
		Ok(ProbeReport {
			dcid,
			server_cid,
			keys,
			first_packet,
			reply,
			second_packet,
		})
	}

	fn transition(&mut self, to: ProbeState) {
		let from = std::mem::replace(&mut self.state, to);
		self.observer.state_changed(from, to);
	}
}

/// Bind a random source port from `config`, pick a random DCID and run one
/// probe against `config.destination`.
///
/// # Errors
///
/// See [`UdpTransport::bind`] and [`ProbeSession::run`].
pub fn run_probe<O: ProbeObserver>(config: &ProbeConfig, observer: O) -> Result<ProbeReport, Error> {
	let source_port = config.source_ports.choose();
	let transport = UdpTransport::bind(source_port, config.destination)?;

	#[cfg(feature = "tracing")]
	tracing::info!(
		source_port,
		destination = %config.destination,
		timeout = ?config.reply_timeout,
		"starting QUIC Initial probe"
	);

	let dcid = ConnectionId::random(CLIENT_DCID_LEN)?;
	ProbeSession::new(transport, observer, config.reply_timeout)?.run(dcid)
}
