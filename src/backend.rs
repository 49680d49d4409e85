/* src/backend.rs */

//! Thin wrappers over the selected crypto backend. `ring` and `aws-lc-rs`
//! expose the same `hmac` and `aead` APIs, so only the import differs.

#[cfg(feature = "aws-lc-rs")]
use aws_lc_rs::{aead, hmac};
#[cfg(feature = "ring")]
use ring::{aead, hmac};

use crate::error::Error;

/// Output size of HMAC-SHA256.
pub(crate) const HASH_LEN: usize = 32;

/// AES-128-GCM authentication tag size.
pub(crate) const TAG_LEN: usize = 16;

/// HMAC-SHA256 over the concatenation of `parts`.
pub(crate) fn hmac_sha256(key: &[u8], parts: &[&[u8]]) -> [u8; HASH_LEN] {
	let key = hmac::Key::new(hmac::HMAC_SHA256, key);
	let mut ctx = hmac::Context::with_key(&key);
	for part in parts {
		ctx.update(part);
	}
	let mut out = [0u8; HASH_LEN];
	out.copy_from_slice(ctx.sign().as_ref());
	out
}

fn aes_128_gcm(key: &[u8; 16]) -> Result<aead::LessSafeKey, Error> {
	let unbound = aead::UnboundKey::new(&aead::AES_128_GCM, key)
		.map_err(|_| Error::Crypto("invalid AES-GCM key"))?;
	Ok(aead::LessSafeKey::new(unbound))
}

/// AES-128-GCM seal. Returns ciphertext with the tag appended.
pub(crate) fn aead_seal(
	key: &[u8; 16],
	nonce: [u8; 12],
	aad: &[u8],
	plaintext: &[u8],
) -> Result<Vec<u8>, Error> {
	let key = aes_128_gcm(key)?;
	let mut buf = Vec::with_capacity(plaintext.len() + TAG_LEN);
	buf.extend_from_slice(plaintext);
	key
		.seal_in_place_append_tag(
			aead::Nonce::assume_unique_for_key(nonce),
			aead::Aad::from(aad),
			&mut buf,
		)
		.map_err(|_| Error::Crypto("AEAD seal failed"))?;
	Ok(buf)
}

/// AES-128-GCM open. `ciphertext` includes the trailing tag.
pub(crate) fn aead_open(
	key: &[u8; 16],
	nonce: [u8; 12],
	aad: &[u8],
	ciphertext: &[u8],
) -> Result<Vec<u8>, Error> {
	let key = aes_128_gcm(key)?;
	let mut buf = ciphertext.to_vec();
	let plaintext_len = key
		.open_in_place(
			aead::Nonce::assume_unique_for_key(nonce),
			aead::Aad::from(aad),
			&mut buf,
		)
		.map_err(|_| Error::DecryptionFailed("AEAD decryption failed".into()))?
		.len();
	buf.truncate(plaintext_len);
	Ok(buf)
}
