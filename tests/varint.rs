/* tests/varint.rs */

#![allow(missing_docs)]

use quic_probe::{Error, read_varint, write_varint, write_varint_2};

fn encode(value: u64) -> Vec<u8> {
	let mut buf = Vec::new();
	write_varint(&mut buf, value).unwrap();
	buf
}

#[test]
fn rfc9000_examples_decode() {
	// RFC 9000 Appendix A.1
	assert_eq!(read_varint(&[0x25]).unwrap(), (37, 1));
	assert_eq!(read_varint(&[0x7b, 0xbd]).unwrap(), (15293, 2));
	assert_eq!(read_varint(&[0x9d, 0x7f, 0x3e, 0x7d]).unwrap(), (494_878_333, 4));
	assert_eq!(
		read_varint(&[0xc2, 0x19, 0x7c, 0x5e, 0xff, 0x14, 0xe8, 0x8c]).unwrap(),
		(151_288_809_941_952_652, 8)
	);
}

#[test]
fn rfc9000_examples_encode() {
	assert_eq!(encode(37), [0x25]);
	assert_eq!(encode(15293), [0x7b, 0xbd]);
	assert_eq!(encode(494_878_333), [0x9d, 0x7f, 0x3e, 0x7d]);
	assert_eq!(
		encode(151_288_809_941_952_652),
		[0xc2, 0x19, 0x7c, 0x5e, 0xff, 0x14, 0xe8, 0x8c]
	);
}

#[test]
fn encoding_picks_shortest_form_at_boundaries() {
	assert_eq!(encode(63).len(), 1);
	assert_eq!(encode(64).len(), 2);
	assert_eq!(encode(16383).len(), 2);
	assert_eq!(encode(16384).len(), 4);
	assert_eq!(encode(1_073_741_823).len(), 4);
	assert_eq!(encode(1_073_741_824).len(), 8);
	assert_eq!(encode((1 << 62) - 1), [0xff; 8]);
}

#[test]
fn encode_too_large_fails() {
	let mut buf = Vec::new();
	assert!(matches!(
		write_varint(&mut buf, 1 << 62),
		Err(Error::InvalidVarint)
	));
	assert!(buf.is_empty());
}

#[test]
fn two_byte_form_always_two_bytes() {
	let mut buf = Vec::new();
	write_varint_2(&mut buf, 0).unwrap();
	assert_eq!(buf, [0x40, 0x00]);

	buf.clear();
	write_varint_2(&mut buf, 37).unwrap();
	assert_eq!(buf, [0x40, 0x25]);
	assert_eq!(read_varint(&buf).unwrap(), (37, 2));
}

#[test]
fn two_byte_form_for_initial_length() {
	// 1200 bytes of frames + 16 tag + 4 packet number
	let mut buf = Vec::new();
	write_varint_2(&mut buf, 1220).unwrap();
	assert_eq!(buf, [0x44, 0xc4]);
}

#[test]
fn two_byte_form_overflow() {
	let mut buf = Vec::new();
	write_varint_2(&mut buf, 16383).unwrap();
	assert_eq!(buf, [0x7f, 0xff]);
	assert!(matches!(
		write_varint_2(&mut buf, 16384),
		Err(Error::LengthOverflow(16384))
	));
}

#[test]
fn empty_buffer_fails() {
	assert!(matches!(read_varint(&[]), Err(Error::InvalidVarint)));
}

#[test]
fn truncated_encodings_fail() {
	for buf in [&[0x40][..], &[0x80, 0x00, 0x01], &[0xc0, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06]] {
		assert!(matches!(read_varint(buf), Err(Error::InvalidVarint)), "{buf:02x?}");
	}
}

#[test]
fn extra_bytes_ignored() {
	assert_eq!(read_varint(&[0x25, 0xff, 0xff]).unwrap(), (37, 1));
}
