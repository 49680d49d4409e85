/* src/transport.rs */

//! Datagram transport used by the probe session.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::time::Duration;

use crate::error::Error;

/// Largest datagram accepted as a reply.
const MAX_DATAGRAM: usize = 65_535;

/// Sends datagrams to one fixed peer.
pub trait Transport {
	/// Send `packet` and return without waiting.
	///
	/// # Errors
	///
	/// Returns [`Error::Send`] when the datagram cannot be sent.
	fn send(&mut self, packet: &[u8]) -> Result<(), Error>;

	/// Send `packet` and block for a single reply datagram.
	///
	/// # Errors
	///
	/// Returns [`Error::Timeout`] when nothing arrives within `timeout`, or a
	/// send/receive error.
	fn send_and_await_reply(&mut self, packet: &[u8], timeout: Duration) -> Result<Vec<u8>, Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
	fn send(&mut self, packet: &[u8]) -> Result<(), Error> {
		(**self).send(packet)
	}

	fn send_and_await_reply(&mut self, packet: &[u8], timeout: Duration) -> Result<Vec<u8>, Error> {
		(**self).send_and_await_reply(packet, timeout)
	}
}

/// A blocking UDP socket bound to one source port and connected to one peer.
///
/// Datagrams from any other address are dropped by the kernel, and an ICMP
/// port unreachable from the peer surfaces as [`Error::Receive`]. The socket
/// is closed when the transport is dropped.
#[derive(Debug)]
pub struct UdpTransport {
	socket: UdpSocket,
	peer: SocketAddr,
}

impl UdpTransport {
	/// Bind `source_port` on the unspecified address of `peer`'s family.
	///
	/// Port 0 lets the OS pick an ephemeral port.
	///
	/// # Errors
	///
	/// Returns [`Error::Bind`] when the port is unavailable. There is no
	/// fallback port. Returns [`Error::Connect`] when the socket cannot be
	/// associated with `peer`.
	pub fn bind(source_port: u16, peer: SocketAddr) -> Result<Self, Error> {
		let local: SocketAddr = match peer {
			SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, source_port).into(),
			SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, source_port).into(),
		};
		let socket = UdpSocket::bind(local).map_err(|source| Error::Bind {
			port: source_port,
			source,
		})?;
		socket
			.connect(peer)
			.map_err(|source| Error::Connect { peer, source })?;
		Ok(Self { socket, peer })
	}

	/// The locally bound address.
	///
	/// # Errors
	///
	/// Returns [`Error::Receive`] if the socket cannot report its address.
	pub fn local_addr(&self) -> Result<SocketAddr, Error> {
		self.socket.local_addr().map_err(Error::Receive)
	}

	/// The destination address.
	#[must_use]
	pub fn peer(&self) -> SocketAddr {
		self.peer
	}
}

impl Transport for UdpTransport {
	fn send(&mut self, packet: &[u8]) -> Result<(), Error> {
		self.socket
			.send(packet)
			.map_err(|source| Error::Send {
				peer: self.peer,
				source,
			})?;

		#[cfg(feature = "tracing")]
		tracing::debug!(peer = %self.peer, len = packet.len(), "sent datagram");

		Ok(())
	}

	fn send_and_await_reply(&mut self, packet: &[u8], timeout: Duration) -> Result<Vec<u8>, Error> {
		if timeout.is_zero() {
			return Err(Error::InvalidTimeout);
		}
		self.socket
			.set_read_timeout(Some(timeout))
			.map_err(Error::Receive)?;
		self.send(packet)?;

		let mut buf = vec![0u8; MAX_DATAGRAM];
		match self.socket.recv(&mut buf) {
			Ok(len) => {
				#[cfg(feature = "tracing")]
				tracing::debug!(peer = %self.peer, len, "received reply");

				buf.truncate(len);
				Ok(buf)
			}
			Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
				Err(Error::Timeout(timeout))
			}
			Err(e) => Err(Error::Receive(e)),
		}
	}
}
