/* demos/build_initial.rs */

// Builds the first probe packet offline for a fixed DCID and prints the key
// schedule and wire image. Nothing is sent.

use quic_probe::{
	CLIENT_HELLO_CRYPTO, CONNECTION_CLOSE, ConnectionId, InitialFields, MIN_INITIAL_SIZE,
	PacketNumber, QUIC_V1, build_initial_packet, derive_initial_secrets, padded_payload,
};

fn main() -> Result<(), quic_probe::Error> {
	let dcid = ConnectionId::new(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08])?;
	let scid = ConnectionId::empty();

	let secrets = derive_initial_secrets(dcid.as_bytes())?;
	println!("dcid:           {dcid}");
	println!("initial secret: {}", hex::encode(secrets.initial_secret));
	println!("client secret:  {}", hex::encode(secrets.client_secret));
	println!("key:            {}", hex::encode(secrets.keys.key));
	println!("iv:             {}", hex::encode(secrets.keys.iv));
	println!("hp:             {}", hex::encode(secrets.keys.hp));

	let fields = InitialFields {
		version: QUIC_V1,
		dcid: &dcid,
		scid: &scid,
		token: &[],
		packet_number: PacketNumber::new(0),
	};
	let plaintext = padded_payload(&[&CLIENT_HELLO_CRYPTO, &CONNECTION_CLOSE], MIN_INITIAL_SIZE)?;
	let packet = build_initial_packet(&fields, &plaintext, &secrets.keys)?;

	let header_len = fields.encoded_len();
	println!("packet:         {} bytes", packet.len());
	println!("header:         {}", hex::encode(&packet[..header_len]));
	println!("{}", hex::encode(&packet));
	Ok(())
}
