/* src/observer.rs */

//! Progress reporting for a probe session.

use crate::keys::InitialSecrets;
use crate::packet::{ConnectionId, PacketNumber};
use crate::session::ProbeState;

/// Receives session events. Every method defaults to doing nothing.
///
/// `()` is the silent observer.
pub trait ProbeObserver {
	/// The session moved from `from` to `to`.
	fn state_changed(&mut self, from: ProbeState, to: ProbeState) {
		let _ = (from, to);
	}

	/// Initial secrets were derived for `dcid`.
	fn secrets_derived(&mut self, dcid: &ConnectionId, secrets: &InitialSecrets) {
		let _ = (dcid, secrets);
	}

	/// A protected packet is ready to send.
	fn packet_built(&mut self, packet_number: PacketNumber, packet: &[u8]) {
		let _ = (packet_number, packet);
	}

	/// The server replied.
	fn reply_received(&mut self, reply: &[u8]) {
		let _ = reply;
	}

	/// The server-chosen connection ID was read from the reply.
	fn server_cid(&mut self, cid: &ConnectionId) {
		let _ = cid;
	}
}

impl ProbeObserver for () {}

impl<O: ProbeObserver + ?Sized> ProbeObserver for &mut O {
	fn state_changed(&mut self, from: ProbeState, to: ProbeState) {
		(**self).state_changed(from, to);
	}

	fn secrets_derived(&mut self, dcid: &ConnectionId, secrets: &InitialSecrets) {
		(**self).secrets_derived(dcid, secrets);
	}

	fn packet_built(&mut self, packet_number: PacketNumber, packet: &[u8]) {
		(**self).packet_built(packet_number, packet);
	}

	fn reply_received(&mut self, reply: &[u8]) {
		(**self).reply_received(reply);
	}

	fn server_cid(&mut self, cid: &ConnectionId) {
		(**self).server_cid(cid);
	}
}

/// Emits session events as `tracing` events. Secrets and packets are logged
/// hex-encoded at `debug`/`trace`.
#[cfg(feature = "tracing")]
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

#[cfg(feature = "tracing")]
impl ProbeObserver for TracingObserver {
	fn state_changed(&mut self, from: ProbeState, to: ProbeState) {
		tracing::debug!(?from, ?to, "probe state changed");
	}

	fn secrets_derived(&mut self, dcid: &ConnectionId, secrets: &InitialSecrets) {
		tracing::info!(%dcid, "derived client Initial secrets");
		tracing::debug!(
			initial_secret = %hex::encode(secrets.initial_secret),
			client_secret = %hex::encode(secrets.client_secret),
			key = %hex::encode(secrets.keys.key),
			iv = %hex::encode(secrets.keys.iv),
			hp = %hex::encode(secrets.keys.hp),
			"client Initial key schedule"
		);
	}

	fn packet_built(&mut self, packet_number: PacketNumber, packet: &[u8]) {
		tracing::info!(%packet_number, len = packet.len(), "built Initial packet");
		tracing::trace!(packet = %hex::encode(packet), "wire image");
	}

	fn reply_received(&mut self, reply: &[u8]) {
		tracing::info!(len = reply.len(), "received server reply");
		tracing::trace!(reply = %hex::encode(reply), "reply bytes");
	}

	fn server_cid(&mut self, cid: &ConnectionId) {
		tracing::info!(%cid, "server chose connection ID");
	}
}
