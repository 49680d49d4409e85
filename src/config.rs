/* src/config.rs */

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;

use crate::error::Error;

/// Default destination: a QUIC server on localhost.
pub const DEFAULT_DESTINATION: SocketAddr =
	SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 4433);

/// How long to wait for the server's reply to the first packet.
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(5);

/// Default source port range.
pub const DEFAULT_SOURCE_PORTS: RangeInclusive<u16> = 10_000..=60_000;

/// A non-empty inclusive range of source ports, excluding port 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
	min: u16,
	max: u16,
}

impl PortRange {
	/// Validate `min..=max`.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidPortRange`] when `min > max` or `min == 0`.
	pub fn new(min: u16, max: u16) -> Result<Self, Error> {
		if min == 0 || min > max {
			return Err(Error::InvalidPortRange { min, max });
		}
		Ok(Self { min, max })
	}

	/// Lower bound.
	#[must_use]
	pub fn min(&self) -> u16 {
		self.min
	}

	/// Upper bound.
	#[must_use]
	pub fn max(&self) -> u16 {
		self.max
	}

	/// Pick a port uniformly at random.
	#[must_use]
	pub fn choose(&self) -> u16 {
		rand::thread_rng().gen_range(self.min..=self.max)
	}
}

impl Default for PortRange {
	fn default() -> Self {
		Self {
			min: *DEFAULT_SOURCE_PORTS.start(),
			max: *DEFAULT_SOURCE_PORTS.end(),
		}
	}
}

/// Settings for one probe run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
	/// Server address.
	pub destination: SocketAddr,
	/// Range the source port is drawn from.
	pub source_ports: PortRange,
	/// Bound on the wait for the first reply.
	pub reply_timeout: Duration,
}

impl ProbeConfig {
	/// Build a validated configuration.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidTimeout`] for a zero timeout.
	pub fn new(
		destination: SocketAddr,
		source_ports: PortRange,
		reply_timeout: Duration,
	) -> Result<Self, Error> {
		if reply_timeout.is_zero() {
			return Err(Error::InvalidTimeout);
		}
		Ok(Self {
			destination,
			source_ports,
			reply_timeout,
		})
	}
}

impl Default for ProbeConfig {
	fn default() -> Self {
		Self {
			destination: DEFAULT_DESTINATION,
			source_ports: PortRange::default(),
			reply_timeout: DEFAULT_REPLY_TIMEOUT,
		}
	}
}
