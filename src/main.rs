/* src/main.rs */

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use quic_probe::{PortRange, ProbeConfig, TracingObserver, run_probe};
use tracing_subscriber::EnvFilter;

/// Send a protected QUIC Initial packet, wait for the server's reply, then
/// follow up with an ACK addressed to the server's connection ID.
#[derive(Parser, Debug)]
#[command(name = "quic-probe", version, about, long_about = None)]
struct Args {
	/// Destination IP address
	#[arg(long, default_value = "127.0.0.1")]
	ip: IpAddr,

	/// Destination port
	#[arg(long, default_value_t = 4433)]
	dport: u16,

	/// Minimum source port
	#[arg(long, default_value_t = 10_000)]
	sport_min: u16,

	/// Maximum source port
	#[arg(long, default_value_t = 60_000)]
	sport_max: u16,

	/// Seconds to wait for the server's reply
	#[arg(long, default_value_t = 5)]
	timeout: u64,

	/// Log level, overridden by RUST_LOG
	#[arg(long, default_value = "info")]
	log_level: String,
}

fn main() -> Result<()> {
	let args = Args::parse();

	let filter = EnvFilter::try_from_default_env()
		.or_else(|_| EnvFilter::try_new(&args.log_level))
		.context("invalid log level")?;
	tracing_subscriber::fmt().with_env_filter(filter).init();

	let source_ports =
		PortRange::new(args.sport_min, args.sport_max).context("invalid source port range")?;
	let config = ProbeConfig::new(
		SocketAddr::new(args.ip, args.dport),
		source_ports,
		Duration::from_secs(args.timeout),
	)
	.context("invalid probe configuration")?;

	let report = run_probe(&config, TracingObserver)
		.with_context(|| format!("probe against {} failed", config.destination))?;

	tracing::info!(
		dcid = %report.dcid,
		server_cid = %report.server_cid,
		first_len = report.first_packet.len(),
		second_len = report.second_packet.len(),
		"probe complete"
	);
	Ok(())
}
