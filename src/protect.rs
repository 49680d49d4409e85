/* src/protect.rs */

//! Initial packet protection (RFC 9001 Section 5): AES-128-GCM payload
//! protection and AES-128-ECB header protection, plus the inverse used to
//! open captured or self-built packets.

use aes::Aes128;
use aes::cipher::{BlockEncrypt, KeyInit, generic_array::GenericArray};

use crate::backend;
use crate::error::Error;
use crate::header::InitialHeader;
use crate::keys::{HP_LEN, IV_LEN, QUIC_V1, TrafficKeys, derive_initial_secrets};
use crate::packet::{InitialFields, PacketNumber};

/// AEAD authentication tag length.
pub const TAG_LEN: usize = backend::TAG_LEN;

/// Bytes of ciphertext sampled for the header protection mask.
pub const SAMPLE_LEN: usize = 16;

/// Mask bytes used: one for the first byte, up to four for the packet number.
pub const MASK_LEN: usize = 5;

/// A decrypted Initial packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedPacket {
	/// First byte with header protection removed.
	pub first_byte: u8,
	/// Decoded (truncated) packet number.
	pub packet_number: PacketNumber,
	/// Encoded packet number length in bytes.
	pub packet_number_len: usize,
	/// Decrypted frames.
	pub payload: Vec<u8>,
}

/// AEAD nonce: the IV XORed with the packet number, left-padded to the IV
/// width.
#[must_use]
pub fn nonce(iv: &[u8; IV_LEN], pn: PacketNumber) -> [u8; IV_LEN] {
	let mut nonce = *iv;
	let pn = u64::from(pn.value()).to_be_bytes();
	for (n, p) in nonce[IV_LEN - pn.len()..].iter_mut().zip(pn) {
		*n ^= p;
	}
	nonce
}

/// Seal `plaintext` with `header` as associated data. The returned
/// ciphertext carries the tag at its end.
///
/// # Errors
///
/// Returns [`Error::Crypto`] if the backend rejects the operation.
pub fn seal_payload(
	keys: &TrafficKeys,
	pn: PacketNumber,
	header: &[u8],
	plaintext: &[u8],
) -> Result<Vec<u8>, Error> {
	backend::aead_seal(&keys.key, nonce(&keys.iv, pn), header, plaintext)
}

/// Open a payload sealed by [`seal_payload`].
///
/// # Errors
///
/// Returns [`Error::DecryptionFailed`] when authentication fails.
pub fn open_payload(
	keys: &TrafficKeys,
	pn: PacketNumber,
	header: &[u8],
	ciphertext: &[u8],
) -> Result<Vec<u8>, Error> {
	backend::aead_open(&keys.key, nonce(&keys.iv, pn), header, ciphertext)
}

/// Encrypt the first 16 bytes of `sample` with AES-128-ECB under `hp` and
/// keep the first five bytes.
///
/// # Errors
///
/// Returns [`Error::BufferTooShort`] when `sample` is shorter than 16 bytes.
pub fn header_protection_mask(hp: &[u8; HP_LEN], sample: &[u8]) -> Result<[u8; MASK_LEN], Error> {
	let sample = sample.get(..SAMPLE_LEN).ok_or(Error::BufferTooShort {
		need: SAMPLE_LEN,
		have: sample.len(),
	})?;
	let cipher = Aes128::new(GenericArray::from_slice(hp));
	let mut block = GenericArray::clone_from_slice(sample);
	cipher.encrypt_block(&mut block);

	let mut mask = [0u8; MASK_LEN];
	mask.copy_from_slice(&block[..MASK_LEN]);
	Ok(mask)
}

/// Toggle long header protection on `packet`, whose header (ending with a
/// `pn_len`-byte packet number) is `header_len` bytes long.
///
/// The sample starts four bytes after the start of the packet number field.
/// Only the low four bits of the first byte and the packet number bytes
/// change, so applying this twice restores the input.
///
/// # Errors
///
/// Returns [`Error::BufferTooShort`] when the packet does not reach the end of
/// the sample.
///
/// # Panics
///
/// Panics when `pn_len` is not in `1..=4` or exceeds `header_len`.
pub fn apply_header_protection(
	packet: &mut [u8],
	header_len: usize,
	pn_len: usize,
	hp: &[u8; HP_LEN],
) -> Result<(), Error> {
	assert!(
		(1..=4).contains(&pn_len) && pn_len <= header_len,
		"packet number length {pn_len} invalid for a {header_len}-byte header"
	);
	let pn_offset = header_len - pn_len;
	let sample_offset = pn_offset + 4;
	let sample_end = sample_offset + SAMPLE_LEN;
	let sample = packet
		.get(sample_offset..sample_end)
		.ok_or(Error::BufferTooShort {
			need: sample_end,
			have: packet.len(),
		})?;
	let mask = header_protection_mask(hp, sample)?;

	packet[0] ^= mask[0] & 0x0f;
	for (byte, m) in packet[pn_offset..header_len].iter_mut().zip(&mask[1..]) {
		*byte ^= m;
	}
	Ok(())
}

/// Seal `plaintext` under the finished `header` and apply header protection,
/// producing the wire image.
///
/// # Errors
///
/// See [`seal_payload`] and [`apply_header_protection`].
pub fn protect(
	header: &[u8],
	pn: PacketNumber,
	plaintext: &[u8],
	keys: &TrafficKeys,
) -> Result<Vec<u8>, Error> {
	let ciphertext = seal_payload(keys, pn, header, plaintext)?;
	let mut packet = Vec::with_capacity(header.len() + ciphertext.len());
	packet.extend_from_slice(header);
	packet.extend_from_slice(&ciphertext);
	apply_header_protection(&mut packet, header.len(), PacketNumber::LEN, &keys.hp)?;
	Ok(packet)
}

/// Seal `plaintext` once under the zero-length header and return the
/// ciphertext length, which the real header's length field depends on.
///
/// # Errors
///
/// See [`InitialFields::encode`] and [`seal_payload`].
pub fn sealed_len(
	fields: &InitialFields<'_>,
	plaintext: &[u8],
	keys: &TrafficKeys,
) -> Result<usize, Error> {
	let dummy = fields.encode_dummy()?;
	Ok(seal_payload(keys, fields.packet_number, &dummy, plaintext)?.len())
}

/// Build a protected Initial packet.
///
/// The ciphertext length is learned from a first seal under the zero-length
/// header; the header is then re-encoded with the real length (packet number
/// plus ciphertext) and the payload sealed again under it.
///
/// # Errors
///
/// Returns [`Error::LengthOverflow`] when the payload does not fit the
/// two-byte length field, or any [`protect`] error.
pub fn build_initial_packet(
	fields: &InitialFields<'_>,
	plaintext: &[u8],
	keys: &TrafficKeys,
) -> Result<Vec<u8>, Error> {
	let ciphertext_len = sealed_len(fields, plaintext, keys)?;
	let length = (PacketNumber::LEN + ciphertext_len) as u64;
	let header = fields.encode(length)?;
	let packet = protect(&header, fields.packet_number, plaintext, keys)?;

	#[cfg(feature = "tracing")]
	tracing::debug!(
		packet_number = fields.packet_number.value(),
		dcid = %fields.dcid,
		header_len = header.len(),
		length,
		packet_len = packet.len(),
		"built protected Initial packet"
	);

	Ok(packet)
}

fn remove_header_protection(
	first_byte: u8,
	payload: &[u8],
	hp_key: &[u8; HP_LEN],
) -> Result<(PacketNumber, usize, u8), Error> {
	if payload.len() < 4 + SAMPLE_LEN {
		return Err(Error::BufferTooShort {
			need: 4 + SAMPLE_LEN,
			have: payload.len(),
		});
	}

	let mask = header_protection_mask(hp_key, &payload[4..4 + SAMPLE_LEN])?;
	let unprotected_first = first_byte ^ (mask[0] & 0x0f);
	let pn_len = usize::from((unprotected_first & 0x03) + 1);

	let mut pn = 0u32;
	for i in 0..pn_len {
		pn = (pn << 8) | u32::from(payload[i] ^ mask[1 + i]);
	}

	Ok((PacketNumber::new(pn), pn_len, unprotected_first))
}

/// Remove header protection from a parsed Initial packet and decrypt its
/// payload with `keys`.
///
/// The keys are passed explicitly because a client keeps using the keys of
/// its original destination connection ID after the server picks a new one.
///
/// # Errors
///
/// Returns [`Error::BufferTooShort`] if the payload is too short to sample,
/// or [`Error::DecryptionFailed`] if authentication fails.
pub fn open_initial(header: &InitialHeader<'_>, keys: &TrafficKeys) -> Result<OpenedPacket, Error> {
	let (pn, pn_len, unprotected_first) =
		remove_header_protection(header.first_byte, header.payload, &keys.hp)?;

	let mut aad = Vec::with_capacity(header.header_bytes.len() + pn_len);
	aad.push(unprotected_first);
	aad.extend_from_slice(&header.header_bytes[1..]);
	aad.extend_from_slice(&pn.value().to_be_bytes()[4 - pn_len..]);

	let payload = open_payload(keys, pn, &aad, &header.payload[pn_len..])?;

	#[cfg(feature = "tracing")]
	tracing::debug!(
		packet_number = pn.value(),
		pn_len,
		payload_len = payload.len(),
		"opened QUIC Initial packet"
	);

	Ok(OpenedPacket {
		first_byte: unprotected_first,
		packet_number: pn,
		packet_number_len: pn_len,
		payload,
	})
}

/// Decrypt a QUIC v1 client Initial packet using keys derived from its own
/// destination connection ID.
///
/// # Errors
///
/// Returns [`Error::UnsupportedVersion`] for anything but v1, and otherwise
/// the errors of [`derive_initial_secrets`] and [`open_initial`].
pub fn decrypt_initial(header: &InitialHeader<'_>) -> Result<OpenedPacket, Error> {
	if header.version != QUIC_V1 {
		return Err(Error::UnsupportedVersion(header.version));
	}
	let secrets = derive_initial_secrets(header.dcid)?;
	open_initial(header, &secrets.keys)
}
