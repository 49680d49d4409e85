/* src/hkdf.rs */

//! HKDF-SHA256 (RFC 5869) and the TLS 1.3 `HKDF-Expand-Label` wrapper
//! (RFC 8446 Section 7.1), built directly on HMAC so the intermediate PRK is
//! available as plain bytes.

use crate::backend::{HASH_LEN, hmac_sha256};
use crate::error::Error;

/// Largest output HKDF-Expand can produce with SHA-256.
pub const MAX_EXPAND_LEN: usize = 255 * HASH_LEN;

const LABEL_PREFIX: &[u8] = b"tls13 ";

/// HKDF-Extract: `HMAC-SHA256(salt, ikm)`.
///
/// An empty salt is replaced with `HashLen` zero bytes.
#[must_use]
pub fn extract(salt: &[u8], ikm: &[u8]) -> [u8; HASH_LEN] {
	if salt.is_empty() {
		hmac_sha256(&[0u8; HASH_LEN], &[ikm])
	} else {
		hmac_sha256(salt, &[ikm])
	}
}

/// HKDF-Expand: `T(i) = HMAC(prk, T(i-1) || info || i)`, concatenated and
/// truncated to `len` bytes.
///
/// # Errors
///
/// Returns [`Error::HkdfLength`] when `len` exceeds [`MAX_EXPAND_LEN`].
pub fn expand(prk: &[u8], info: &[u8], len: usize) -> Result<Vec<u8>, Error> {
	if len > MAX_EXPAND_LEN {
		return Err(Error::HkdfLength(len));
	}

	let mut okm = Vec::with_capacity(len.next_multiple_of(HASH_LEN));
	let mut prev: Option<[u8; HASH_LEN]> = None;
	let mut counter = 1u8;
	while okm.len() < len {
		let block = match &prev {
			Some(t) => hmac_sha256(prk, &[t, info, &[counter]]),
			None => hmac_sha256(prk, &[info, &[counter]]),
		};
		okm.extend_from_slice(&block);
		prev = Some(block);
		counter = counter.wrapping_add(1);
	}
	okm.truncate(len);
	Ok(okm)
}

/// Serialize a TLS 1.3 `HkdfLabel`:
///
/// ```text
/// uint16 length
/// opaque label<7..255>   = "tls13 " + label
/// opaque context<0..255>
/// ```
///
/// # Errors
///
/// Returns [`Error::HkdfLabel`] when `len`, the prefixed label or the context
/// overflows its length field.
pub fn hkdf_label(label: &str, context: &[u8], len: usize) -> Result<Vec<u8>, Error> {
	let full_label_len = LABEL_PREFIX.len() + label.len();
	let len = u16::try_from(len).map_err(|_| Error::HkdfLabel("output length"))?;
	let label_len = u8::try_from(full_label_len).map_err(|_| Error::HkdfLabel("label"))?;
	let context_len = u8::try_from(context.len()).map_err(|_| Error::HkdfLabel("context"))?;

	let mut out = Vec::with_capacity(2 + 1 + full_label_len + 1 + context.len());
	out.extend_from_slice(&len.to_be_bytes());
	out.push(label_len);
	out.extend_from_slice(LABEL_PREFIX);
	out.extend_from_slice(label.as_bytes());
	out.push(context_len);
	out.extend_from_slice(context);
	Ok(out)
}

/// `HKDF-Expand-Label(secret, label, context, len)`.
///
/// # Errors
///
/// See [`hkdf_label`] and [`expand`].
pub fn expand_label(
	secret: &[u8],
	label: &str,
	context: &[u8],
	len: usize,
) -> Result<Vec<u8>, Error> {
	let info = hkdf_label(label, context, len)?;
	expand(secret, &info, len)
}
