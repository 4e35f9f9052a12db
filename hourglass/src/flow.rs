use gospel::read::Reader;
use gospel::write::Writer;

use crate::diag::Observer;
use crate::insn::{DecodeError, Insn};
use crate::label::{Label, LabelError};
use crate::types::{ScriptEntry, ScriptId, Word};

#[derive(Debug, Clone, thiserror::Error)]
pub enum ReadError {
	#[error("instruction data is {len} bytes, which is not a whole number of instructions")]
	Truncated { len: usize },
	#[error("instruction {index}: {source}")]
	Insn { index: usize, #[source] source: DecodeError },
}

/// Re-encoding an instruction gave different bytes than it was decoded from.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("instruction {index} does not roundtrip: [{expected}] became [{got}]")]
pub struct RoundTripMismatch {
	pub index: usize,
	pub expected: Word,
	pub got: Word,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CheckError {
	#[error("{0}")]
	Read(#[from] ReadError),
	#[error("{0}")]
	Mismatch(#[from] RoundTripMismatch),
}

/// The event flow of a single container: its instructions, and the tables that point into them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flow {
	pub id: u8,
	pub insns: Vec<Insn>,
	pub labels: Vec<Label>,
	pub scripts: Vec<ScriptEntry>,
}

/// Decodes an instruction stream.
///
/// Stops at the first instruction that fails to decode, since the rest cannot be trusted.
pub fn read_insns(data: &[u8], diag: &mut impl Observer) -> Result<Vec<Insn>, ReadError> {
	if data.len() % Word::SIZE != 0 {
		return Err(ReadError::Truncated { len: data.len() })
	}
	let mut f = Reader::new(data);
	let mut insns = Vec::with_capacity(data.len() / Word::SIZE);
	while !f.is_empty() {
		let index = insns.len();
		let insn = Insn::read(&mut f, diag)
			.map_err(|source| ReadError::Insn { index, source })?;
		insns.push(insn);
	}
	Ok(insns)
}

pub fn write_insns(insns: &[Insn]) -> Vec<u8> {
	let mut f = Writer::with_capacity(insns.len() * Word::SIZE);
	for insn in insns {
		insn.write(&mut f);
	}
	f.finish()
}

/// Decodes each word, and checks that encoding it again gives back the same word.
///
/// Returns the first mismatch; a mismatch means the codec does not model some part of the
/// format, and is never corrected.
pub fn check_roundtrip(data: &[u8], diag: &mut impl Observer) -> Result<Vec<Insn>, CheckError> {
	let insns = read_insns(data, diag)?;
	for (index, (insn, chunk)) in insns.iter().zip(data.chunks_exact(Word::SIZE)).enumerate() {
		let mut expected = Word::default();
		expected.0.copy_from_slice(chunk);
		let got = insn.encode();
		if got != expected {
			return Err(RoundTripMismatch { index, expected, got }.into())
		}
	}
	Ok(insns)
}

/// Scripts that start at instruction `index`, in table order.
pub fn scripts_at(scripts: &[ScriptEntry], index: usize) -> impl Iterator<Item=ScriptId> + '_ {
	scripts.iter()
		.filter(move |s| s.index as usize == index)
		.map(|s| s.script)
}

impl Flow {
	pub fn read(
		id: u8,
		data: &[u8],
		labels: Vec<Label>,
		scripts: Vec<ScriptEntry>,
		diag: &mut impl Observer,
	) -> Result<Flow, ReadError> {
		Ok(Flow {
			id,
			insns: read_insns(data, diag)?,
			labels,
			scripts,
		})
	}

	pub fn write(&self) -> Vec<u8> {
		write_insns(&self.insns)
	}

	/// Checks every label in the table against the instruction counts of the known containers.
	///
	/// `count` gives the number of instructions in a container; this flow's own count does not
	/// need to be included.
	pub fn validate_labels(&self, count: impl Fn(u16) -> Option<usize>) -> Vec<(usize, LabelError)> {
		let count = |c: u16| {
			if c == self.id as u16 {
				Some(self.insns.len())
			} else {
				count(c)
			}
		};
		self.labels.iter().enumerate()
			.filter_map(|(i, l)| l.validate(count).err().map(|e| (i, e)))
			.collect()
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::diag::{Unseen, UnsupportedSubVariant};
	use crate::insn::{Say, Switch, Condition, Do, Action};

	const DATA: [u8; 32] = [
		0x01, 0x00, 0x05, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
		0x02, 0x02, 0x04, 0x00, 0x11, 0x00, 0x00, 0x00,
		0x03, 0x00, 0x01, 0x00, 0x64, 0x00, 0x00, 0x00,
		0x03, 0x09, 0xFF, 0xFF, 0x78, 0x56, 0x34, 0x12,
	];

	#[test]
	fn read_write() -> Result<(), ReadError> {
		let mut unseen = Unseen::new();
		let flow = Flow::read(
			0,
			&DATA,
			vec![Label::new(0, 1), Label::END, Label::new(0, 3)],
			vec![ScriptEntry::from((0x0001_0002, 1))],
			&mut unseen,
		)?;
		assert_eq!(flow.insns, [
			Insn::Say(Say { container: 0, message: 5, goto_index: -1, goto_container: -1, extra: -1 }),
			Insn::Switch(Switch { count: 2, condition: Condition::ProgressFlag, parameter: 17, first_label: 0 }),
			Insn::Do(Do { action: Action::SetProgressFlag, label: 1, parameter: 100 }),
			Insn::Do(Do { action: Action::Other(9), label: -1, parameter: 0x12345678 }),
		]);
		assert_eq!(flow.write(), DATA);
		assert_eq!(unseen.iter().collect::<Vec<_>>(), [(UnsupportedSubVariant::Action(9), 1)]);
		assert_eq!(scripts_at(&flow.scripts, 1).collect::<Vec<_>>(), [ScriptId::new(1, 2)]);
		assert_eq!(scripts_at(&flow.scripts, 0).count(), 0);
		Ok(())
	}

	#[test]
	fn truncated() {
		assert!(matches!(
			read_insns(&DATA[..30], &mut ()),
			Err(ReadError::Truncated { len: 30 }),
		));
	}

	#[test]
	fn bad_opcode_aborts() {
		let mut data = DATA;
		data[16] = 0x07;
		match read_insns(&data, &mut ()) {
			Err(ReadError::Insn { index: 2, source: DecodeError::UnsupportedOpcode { opcode: 7, .. } }) => {}
			e => panic!("expected unsupported opcode at 2, got {e:?}"),
		}
	}

	#[test]
	fn roundtrip_check() -> Result<(), CheckError> {
		let insns = check_roundtrip(&DATA, &mut ())?;
		assert_eq!(insns.len(), 4);
		assert!(check_roundtrip(&[], &mut ())?.is_empty());
		assert!(matches!(check_roundtrip(&DATA[..12], &mut ()), Err(CheckError::Read(_))));
		Ok(())
	}

	#[test]
	fn label_validation() -> Result<(), ReadError> {
		let flow = Flow::read(
			2,
			&DATA,
			vec![Label::new(2, 3), Label::new(2, 4), Label::END, Label::new(1, 0), Label::new(-1, 0), Label::new(7, 0)],
			Vec::new(),
			&mut (),
		)?;
		let errors = flow.validate_labels(|c| (c == 1).then_some(1));
		assert_eq!(errors, [
			(1, LabelError::TargetOutOfRange { label: Label::new(2, 4), count: 4 }),
			(4, LabelError::Malformed { label: Label::new(-1, 0) }),
			(5, LabelError::UnknownContainer { label: Label::new(7, 0) }),
		]);
		Ok(())
	}
}
