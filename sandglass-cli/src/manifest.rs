use std::path::{Path, PathBuf};

use eyre::WrapErr;
use hourglass::{Label, ScriptEntry, Word};

/// Describes one container: where its instructions are, and the tables that go with them.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
	pub id: u8,
	/// Path to the raw instruction words, relative to the manifest.
	pub instructions: PathBuf,
	#[serde(default)]
	pub labels: Vec<(i16, i16)>,
	#[serde(default)]
	pub scripts: Vec<(u32, u32)>,
	#[serde(default)]
	pub messages: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Container {
	pub path: PathBuf,
	pub manifest: Manifest,
	pub data: Vec<u8>,
}

impl Manifest {
	pub fn parse(json: &str) -> eyre::Result<Manifest> {
		Ok(serde_json::from_str(json)?)
	}

	pub fn labels(&self) -> Vec<Label> {
		self.labels.iter().map(|&(c, i)| Label::new(c, i)).collect()
	}

	pub fn scripts(&self) -> Vec<ScriptEntry> {
		self.scripts.iter().copied().map(ScriptEntry::from).collect()
	}
}

impl Container {
	pub fn id(&self) -> u8 {
		self.manifest.id
	}

	/// Number of whole instruction words in the data.
	pub fn len(&self) -> usize {
		self.data.len() / Word::SIZE
	}

	pub fn name(&self) -> &str {
		self.path.file_stem().and_then(|s| s.to_str()).unwrap_or("container")
	}
}

pub fn load(path: &Path) -> eyre::Result<Container> {
	let json = std::fs::read_to_string(path)
		.wrap_err_with(|| format!("reading {}", path.display()))?;
	let manifest = Manifest::parse(&json)
		.wrap_err_with(|| format!("parsing {}", path.display()))?;
	let dir = path.parent().unwrap_or(Path::new(""));
	let insn_path = dir.join(&manifest.instructions);
	let data = std::fs::read(&insn_path)
		.wrap_err_with(|| format!("reading {}", insn_path.display()))?;
	Ok(Container { path: path.to_owned(), manifest, data })
}
