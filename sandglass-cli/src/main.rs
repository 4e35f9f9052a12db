use clap::Parser;

use crate::util::emit;

mod util;
mod manifest;

mod dis;
mod check;
mod flag;

#[derive(Debug, Clone, Parser)]
#[command(disable_help_subcommand = true)]
struct Cli {
	#[clap(subcommand)]
	command: Command,
}

#[derive(Debug, Clone, clap::Subcommand)]
enum Command {
	/// Write disassembly listings for containers
	#[clap(alias = "d")]
	Dis(dis::Command),
	/// Check that containers survive decoding and encoding unchanged
	Check(check::Command),
	/// Show where flags are stored in memory
	Flag(flag::Command),
}

fn main() -> eyre::Result<()> {
	use tracing_subscriber::prelude::*;
	use tracing_subscriber::{fmt, EnvFilter};

	let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
	let filter_layer = EnvFilter::try_from_default_env()
		.or_else(|_| EnvFilter::try_new("info"))?;

	tracing_subscriber::registry()
		.with(filter_layer)
		.with(fmt_layer)
		.init();

	let cli = Cli::parse();
	let ok = match cli.command {
		Command::Dis(cmd) => emit(dis::run(&cmd)).is_some(),
		Command::Check(cmd) => emit(check::run(&cmd)).is_some(),
		Command::Flag(cmd) => emit(flag::run(&cmd)).is_some(),
	};
	if !ok {
		std::process::exit(1);
	}
	Ok(())
}
