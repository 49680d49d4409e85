/* src/keys.rs */

use std::fmt;

use crate::backend::HASH_LEN;
use crate::error::Error;
use crate::hkdf::{expand_label, extract};

/// QUIC version 1.
pub const QUIC_V1: u32 = 0x0000_0001;

/// Initial salt for QUIC v1 (RFC 9001 Section 5.2).
pub const INITIAL_SALT_V1: [u8; 20] = [
	0x38, 0x76, 0x2c, 0xf7, 0xf5, 0x59, 0x34, 0xb3, 0x4d, 0x17, 0x9a, 0xe6, 0xa4, 0xc8, 0x0c, 0xad,
	0xcc, 0xbb, 0x7f, 0x0a,
];

/// AES-128-GCM key length.
pub const KEY_LEN: usize = 16;
/// AEAD nonce / IV length.
pub const IV_LEN: usize = 12;
/// AES-128 header protection key length.
pub const HP_LEN: usize = 16;

/// Packet protection material for one direction.
#[derive(Clone, PartialEq, Eq)]
pub struct TrafficKeys {
	/// AEAD key.
	pub key: [u8; KEY_LEN],
	/// AEAD IV, XORed with the packet number to form the nonce.
	pub iv: [u8; IV_LEN],
	/// Header protection key.
	pub hp: [u8; HP_LEN],
}

impl fmt::Debug for TrafficKeys {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TrafficKeys")
			.field("key", &hex::encode(self.key))
			.field("iv", &hex::encode(self.iv))
			.field("hp", &hex::encode(self.hp))
			.finish()
	}
}

/// The client Initial key schedule for one destination connection ID.
///
/// `initial_secret` and `client_secret` are kept for diagnostics only;
/// packet protection uses `keys`.
#[derive(Clone, PartialEq, Eq)]
pub struct InitialSecrets {
	/// `HKDF-Extract(initial_salt, dcid)`.
	pub initial_secret: [u8; HASH_LEN],
	/// `HKDF-Expand-Label(initial_secret, "client in", "", 32)`.
	pub client_secret: [u8; HASH_LEN],
	/// Keys expanded from `client_secret`.
	pub keys: TrafficKeys,
}

impl fmt::Debug for InitialSecrets {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("InitialSecrets")
			.field("initial_secret", &hex::encode(self.initial_secret))
			.field("client_secret", &hex::encode(self.client_secret))
			.field("keys", &self.keys)
			.finish()
	}
}

/// Derive the client Initial secrets and keys for `dcid` (RFC 9001 Section 5.2).
///
/// # Errors
///
/// Returns [`Error::EmptyCid`] when `dcid` is empty.
pub fn derive_initial_secrets(dcid: &[u8]) -> Result<InitialSecrets, Error> {
	if dcid.is_empty() {
		return Err(Error::EmptyCid);
	}

	let initial_secret = extract(&INITIAL_SALT_V1, dcid);
	let client_secret: [u8; HASH_LEN] =
		fixed(expand_label(&initial_secret, "client in", &[], HASH_LEN)?)?;

	let keys = TrafficKeys {
		key: fixed(expand_label(&client_secret, "quic key", &[], KEY_LEN)?)?,
		iv: fixed(expand_label(&client_secret, "quic iv", &[], IV_LEN)?)?,
		hp: fixed(expand_label(&client_secret, "quic hp", &[], HP_LEN)?)?,
	};

	#[cfg(feature = "tracing")]
	tracing::debug!(dcid = %hex::encode(dcid), "derived client Initial keys");

	Ok(InitialSecrets {
		initial_secret,
		client_secret,
		keys,
	})
}

fn fixed<const N: usize>(bytes: Vec<u8>) -> Result<[u8; N], Error> {
	<[u8; N]>::try_from(bytes).map_err(|_| Error::Crypto("unexpected HKDF output length"))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_dcid_rejected() {
		assert!(matches!(derive_initial_secrets(&[]), Err(Error::EmptyCid)));
	}

	#[test]
	fn debug_output_is_hex() {
		let secrets = derive_initial_secrets(&[0x01; 8]).unwrap();
		let rendered = format!("{:?}", secrets.keys);
		assert!(rendered.contains(&hex::encode(secrets.keys.hp)));
	}
}
