use std::collections::HashMap;
use std::path::PathBuf;

use clap::ValueHint;
use rayon::prelude::*;

use hourglass::{Flow, Unseen};

use crate::manifest::{self, Container};
use crate::util::emit;

#[derive(Debug, Clone, clap::Args)]
#[command(arg_required_else_help = true)]
pub struct Command {
	/// Print the unrecognized conditions and actions that were encountered
	#[clap(long)]
	unseen: bool,

	/// The container manifest(s) to check.
	#[clap(value_hint = ValueHint::FilePath, required = true)]
	manifest: Vec<PathBuf>,
}

pub fn run(cmd: &Command) -> eyre::Result<()> {
	let containers = cmd.manifest.par_iter()
		.map(|path| {
			let _span = tracing::info_span!("load", path=%path.display()).entered();
			emit(manifest::load(path))
		})
		.collect::<Vec<_>>();
	let mut failed = containers.iter().filter(|c| c.is_none()).count();
	let containers = containers.into_iter().flatten().collect::<Vec<_>>();

	let counts = containers.iter()
		.map(|c| (c.id() as u16, c.len()))
		.collect::<HashMap<_, _>>();

	let results = containers.par_iter()
		.map(|c| {
			let _span = tracing::info_span!("check", path=%c.path.display()).entered();
			emit(check(c, &counts))
		})
		.collect::<Vec<_>>();

	let mut unseen = Unseen::new();
	for r in results {
		match r {
			Some(u) => unseen.merge(u),
			None => failed += 1,
		}
	}

	if cmd.unseen {
		for (v, n) in unseen.iter() {
			println!("{v} ({n} times)");
		}
	} else {
		for (v, n) in unseen.iter() {
			tracing::debug!("{v} ({n} times)");
		}
	}

	eyre::ensure!(failed == 0, "{failed} of {} containers failed", cmd.manifest.len());
	tracing::info!("{} containers ok", containers.len());
	Ok(())
}

fn check(c: &Container, counts: &HashMap<u16, usize>) -> eyre::Result<Unseen> {
	let mut unseen = Unseen::new();
	let insns = hourglass::flow::check_roundtrip(&c.data, &mut unseen)?;
	let flow = Flow {
		id: c.id(),
		insns,
		labels: c.manifest.labels(),
		scripts: c.manifest.scripts(),
	};
	for (i, e) in flow.validate_labels(|n| counts.get(&n).copied()) {
		tracing::warn!("label {i}: {e}");
	}
	for s in &flow.scripts {
		if s.index as usize >= flow.insns.len() {
			tracing::warn!("script {} starts at {}, past the end", s.script, s.index);
		}
	}
	Ok(unseen)
}
