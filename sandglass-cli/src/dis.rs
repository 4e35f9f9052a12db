use std::io::Write;
use std::path::{Path, PathBuf};

use clap::ValueHint;
use rayon::prelude::*;

use hourglass::{FlagBases, Flow, Unseen};
use sandglass::{Context, MessageTable, Messages};

use crate::manifest::{self, Container};
use crate::util::{emit, parse_int};

#[derive(Debug, Clone, clap::Args)]
#[command(arg_required_else_help = true)]
pub struct Command {
	/// Directory to place listings in, or `-` for stdout.
	///
	/// If unspecified, each listing is written next to its manifest, with a .txt extension.
	#[clap(long, short, value_hint = ValueHint::DirPath)]
	output: Option<PathBuf>,
	/// Write the undecoded words as hex instead of instructions
	#[clap(long)]
	raw: bool,
	/// Address of the progress flag array
	#[clap(long, value_parser = parse_int::<u64>, default_value_t = FlagBases::PROGRESS)]
	progress_base: u64,
	/// Address of the temporary flag array; shown as an offset if unspecified
	#[clap(long, value_parser = parse_int::<u64>)]
	temp_base: Option<u64>,
	/// Address of the second temporary flag array; shown as an offset if unspecified
	#[clap(long, value_parser = parse_int::<u64>)]
	temp2_base: Option<u64>,

	/// The container manifest(s) to disassemble.
	#[clap(value_hint = ValueHint::FilePath, required = true)]
	manifest: Vec<PathBuf>,
}

impl Command {
	fn flag_bases(&self) -> FlagBases {
		FlagBases {
			progress: Some(self.progress_base),
			temp: self.temp_base,
			temp2: self.temp2_base,
		}
	}

	fn to_stdout(&self) -> bool {
		self.output.as_deref() == Some(Path::new("-"))
	}
}

pub fn run(cmd: &Command) -> eyre::Result<()> {
	let containers = cmd.manifest.par_iter()
		.map(|path| {
			let _span = tracing::info_span!("load", path=%path.display()).entered();
			emit(manifest::load(path))
		})
		.collect::<Vec<_>>();
	let failed = containers.iter().filter(|c| c.is_none()).count();
	let containers = containers.into_iter().flatten().collect::<Vec<_>>();

	let mut messages = MessageTable::new();
	for c in &containers {
		messages.insert(c.id(), c.manifest.messages.clone());
	}

	let listings = containers.par_iter()
		.map(|c| {
			let _span = tracing::info_span!("dis", path=%c.path.display()).entered();
			emit(disassemble(cmd, c, &messages)).map(|text| (c, text))
		})
		.collect::<Vec<_>>();
	let failed = failed + listings.iter().filter(|l| l.is_none()).count();

	let mut unseen = Unseen::new();
	for (c, (text, u)) in listings.into_iter().flatten() {
		unseen.merge(u);
		let _span = tracing::info_span!("write", path=%c.path.display()).entered();
		emit(write_listing(cmd, c, &text));
	}
	for (v, n) in unseen.iter() {
		tracing::debug!("{v} ({n} times)");
	}

	eyre::ensure!(failed == 0, "{failed} of {} containers failed", cmd.manifest.len());
	Ok(())
}

fn disassemble(cmd: &Command, c: &Container, messages: &MessageTable) -> eyre::Result<(String, Unseen)> {
	let mut unseen = Unseen::new();
	let mut ctx = Context::new(Some(messages as &dyn Messages)).flags(cmd.flag_bases());
	if cmd.raw {
		sandglass::raw(&mut ctx, c.id(), &c.data);
	} else {
		let flow = Flow::read(c.id(), &c.data, c.manifest.labels(), c.manifest.scripts(), &mut unseen)?;
		sandglass::write(&mut ctx, &flow);
	}
	let (text, problems) = ctx.finish();
	for p in &problems {
		tracing::warn!("{p}");
	}
	Ok((text, unseen))
}

fn write_listing(cmd: &Command, c: &Container, text: &str) -> eyre::Result<()> {
	if cmd.to_stdout() {
		let mut out = std::io::stdout().lock();
		out.write_all(text.as_bytes())?;
		out.flush()?;
		return Ok(())
	}
	let outfile = match &cmd.output {
		Some(dir) => {
			std::fs::create_dir_all(dir)?;
			dir.join(format!("{}.txt", c.name()))
		}
		None => c.path.with_extension("txt"),
	};
	std::fs::write(&outfile, text)?;
	tracing::info!("wrote {}", outfile.display());
	Ok(())
}
