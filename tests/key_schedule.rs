/* tests/key_schedule.rs */

#![allow(missing_docs)]

use quic_probe::hkdf::{expand, expand_label, extract, hkdf_label};
use quic_probe::{Error, INITIAL_SALT_V1, derive_initial_secrets};

fn hex_decode(s: &str) -> Vec<u8> {
	hex::decode(s).expect("valid hex")
}

// =====================================================================
// RFC 5869 Appendix A
// =====================================================================

#[test]
fn rfc5869_case1_basic() {
	let ikm = [0x0b; 22];
	let salt: Vec<u8> = (0x00..=0x0c).collect();
	let info: Vec<u8> = (0xf0..=0xf9).collect();

	let prk = extract(&salt, &ikm);
	assert_eq!(
		prk.to_vec(),
		hex_decode("077709362c2e32df0ddc3f0dc47bba6390b6c73bb50f9c3122ec844ad7c2b3e5")
	);

	let okm = expand(&prk, &info, 42).unwrap();
	assert_eq!(
		okm,
		hex_decode(
			"3cb25f25faacd57a90434f64d0362f2a2d2d0a90cf1a5a4c5db02d56ecc4c5bf34007208d5b887185865"
		)
	);
}

#[test]
fn rfc5869_case3_empty_salt_and_info() {
	let ikm = [0x0b; 22];

	let prk = extract(&[], &ikm);
	assert_eq!(
		prk.to_vec(),
		hex_decode("19ef24a32c717b167f33a91d6f648bdf96596776afdb6377ac434c1c293ccb04")
	);

	let okm = expand(&prk, &[], 42).unwrap();
	assert_eq!(
		okm,
		hex_decode(
			"8da4e775a563c18f715f802a063c5a31b8a11f5c5ee1879ec3454e5f3c738d2d9d201395faa4b61a96c8"
		)
	);
}

#[test]
fn expand_prefix_is_stable() {
	let prk = [0x11; 32];
	let long = expand(&prk, b"ctx", 100).unwrap();
	let short = expand(&prk, b"ctx", 33).unwrap();
	assert_eq!(&long[..33], &short[..]);
}

#[test]
fn expand_over_limit_fails() {
	assert!(matches!(
		expand(&[0u8; 32], b"", 255 * 32 + 1),
		Err(Error::HkdfLength(8161))
	));
}

// =====================================================================
// HkdfLabel layout
// =====================================================================

#[test]
fn label_layout_for_various_inputs() {
	for (label, context, len) in [
		("client in", &b""[..], 32usize),
		("quic hp", &b""[..], 16),
		("derived", &[0xe3, 0xb0, 0xc4][..], 48),
		("", &b"ctx"[..], 0),
	] {
		let mut manual = Vec::new();
		manual.extend_from_slice(&(len as u16).to_be_bytes());
		manual.push((label.len() + 6) as u8);
		manual.extend_from_slice(b"tls13 ");
		manual.extend_from_slice(label.as_bytes());
		manual.push(context.len() as u8);
		manual.extend_from_slice(context);

		assert_eq!(hkdf_label(label, context, len).unwrap(), manual, "label {label:?}");
	}
}

#[test]
fn client_in_label_bytes() {
	assert_eq!(
		hkdf_label("client in", &[], 32).unwrap(),
		hex_decode("00200f746c73313320636c69656e7420696e00")
	);
}

#[test]
fn label_too_long_fails() {
	let label = "x".repeat(250);
	assert!(matches!(
		hkdf_label(&label, &[], 32),
		Err(Error::HkdfLabel("label"))
	));
}

#[test]
fn label_output_length_overflow_fails() {
	assert!(matches!(
		expand_label(&[0u8; 32], "quic key", &[], 70_000),
		Err(Error::HkdfLabel("output length"))
	));
}

// =====================================================================
// RFC 9001 Appendix A.1 client Initial keys
// =====================================================================

#[test]
fn salt_is_quic_v1() {
	assert_eq!(
		INITIAL_SALT_V1.to_vec(),
		hex_decode("38762cf7f55934b34d179ae6a4c80cadccbb7f0a")
	);
}

#[test]
fn rfc9001_client_initial_keys() {
	let secrets = derive_initial_secrets(&hex_decode("8394c8f03e515708")).unwrap();

	assert_eq!(
		secrets.initial_secret.to_vec(),
		hex_decode("7db5df06e7a69e432496adedb00851923595221596ae2ae9fb8115c1e9ed0a44")
	);
	assert_eq!(
		secrets.client_secret.to_vec(),
		hex_decode("c00cf151ca5be075ed0ebfb5c80323c42d6b7db67881289af4008f1f6c357aea")
	);
	assert_eq!(secrets.keys.key.to_vec(), hex_decode("1f369613dd76d5467730efcbe3b1a22d"));
	assert_eq!(secrets.keys.iv.to_vec(), hex_decode("fa044b2f42a3fd3b46fb255c"));
	assert_eq!(secrets.keys.hp.to_vec(), hex_decode("9f50449e04a0e810283a1e9933adedd2"));
}

#[test]
fn keys_for_sequential_dcid() {
	let secrets = derive_initial_secrets(&hex_decode("0102030405060708")).unwrap();
	assert_eq!(secrets.keys.key.len(), 16);
	assert_eq!(secrets.keys.iv.len(), 12);
	assert_eq!(secrets.keys.hp.len(), 16);
	assert_eq!(secrets.keys.key.to_vec(), hex_decode("07174df8f39e21e6fd89fbe871b1fe15"));
	assert_eq!(secrets.keys.iv.to_vec(), hex_decode("6cf199ef728ac42d35620272"));
	assert_eq!(secrets.keys.hp.to_vec(), hex_decode("58ea20228badb615deb99c7037bfebcd"));
}

#[test]
fn derivation_is_deterministic() {
	let dcid = [0x5a; 8];
	assert_eq!(
		derive_initial_secrets(&dcid).unwrap(),
		derive_initial_secrets(&dcid).unwrap()
	);
}

#[test]
fn different_dcids_give_different_keys() {
	let a = derive_initial_secrets(&[0x01; 8]).unwrap();
	let b = derive_initial_secrets(&[0x02; 8]).unwrap();
	assert_ne!(a.keys, b.keys);
}

#[test]
fn empty_dcid_fails() {
	assert!(matches!(derive_initial_secrets(&[]), Err(Error::EmptyCid)));
}
