use std::borrow::Cow;
use std::ops::Range;

use gospel::read::{Reader, Le as _};
use gospel::write::{Writer, Le as _};
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::diag::{Observer, UnsupportedSubVariant};
use crate::flag::{FlagKind, FlagOp};
use crate::label::{self, Label, LabelError};
use crate::types::{ScriptId, Word};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Opcode {
	Say = 1,
	Switch = 2,
	Do = 3,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum DecodeError {
	#[error("unsupported opcode {opcode} in [{word}]")]
	UnsupportedOpcode { opcode: u8, word: Word },
	#[error("{source}")]
	Read { #[from] source: gospel::read::Error },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Insn {
	Say(Say),
	Switch(Switch),
	Do(Do),
}

/// Shows a message, then continues at `goto`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Say {
	/// Container holding the message; not necessarily the one the flow is in.
	pub container: u8,
	pub message: u16,
	pub goto_index: i16,
	pub goto_container: i8,
	/// Unknown. Preserved as is.
	pub extra: i8,
}

/// Branches to one of `count` consecutive label table entries, starting at `first_label`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Switch {
	pub count: u8,
	pub condition: Condition,
	pub parameter: u16,
	pub first_label: u16,
}

/// What a [`Switch`] branches on.
///
/// [`Other`](Condition::Other) is only produced for values that have no named variant, which keeps
/// the mapping from raw values one-to-one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
	/// The answer to a question with two choices.
	Response2,
	Response3,
	Response4,
	ProgressFlag,
	TempFlag,
	Temp2Flag,
	/// Which shop the player is in. The parameter is zero, except in one place where it is 3.
	Shop,
	Other(u16),
}

/// Performs an action, then continues at label table entry `label`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Do {
	pub action: Action,
	pub label: i16,
	pub parameter: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
	SetProgressFlag,
	ClearProgressFlag,
	SetTemp2Flag,
	ClearTemp2Flag,
	SetTempFlag,
	ClearTempFlag,
	LaunchScript,
	Other(u8),
}

impl Condition {
	pub fn from_raw(v: u16) -> Condition {
		match v {
			1 => Condition::Response2,
			2 => Condition::Response3,
			3 => Condition::Response4,
			4 => Condition::ProgressFlag,
			6 => Condition::TempFlag,
			8 => Condition::Temp2Flag,
			27 => Condition::Shop,
			v => Condition::Other(v),
		}
	}

	pub fn raw(self) -> u16 {
		match self {
			Condition::Response2 => 1,
			Condition::Response3 => 2,
			Condition::Response4 => 3,
			Condition::ProgressFlag => 4,
			Condition::TempFlag => 6,
			Condition::Temp2Flag => 8,
			Condition::Shop => 27,
			Condition::Other(v) => v,
		}
	}

	pub fn flag(self) -> Option<FlagKind> {
		match self {
			Condition::ProgressFlag => Some(FlagKind::Progress),
			Condition::TempFlag => Some(FlagKind::Temp),
			Condition::Temp2Flag => Some(FlagKind::Temp2),
			_ => None,
		}
	}

	pub fn is_response(self) -> bool {
		matches!(self, Condition::Response2 | Condition::Response3 | Condition::Response4)
	}

	/// Names of the branches, in label table order. Empty if the branches are not known.
	pub fn branch_names(self) -> &'static [&'static str] {
		static RESPONSES: [&str; 4] = [
			"(first response)",
			"(second response)",
			"(third response)",
			"(fourth response)",
		];
		match self {
			Condition::Response2 => &RESPONSES[..2],
			Condition::Response3 => &RESPONSES[..3],
			Condition::Response4 => &RESPONSES[..4],
			Condition::ProgressFlag | Condition::TempFlag | Condition::Temp2Flag => &["true", "false"],
			Condition::Shop => &[
				"Castle Town Shop",
				"Forest's General Store",
				"Anouki General Store",
				"Papuchia Shop",
				"Goron Country Store",
			],
			Condition::Other(_) => &[],
		}
	}
}

impl Action {
	pub fn from_raw(v: u8) -> Action {
		match v {
			0 => Action::SetProgressFlag,
			1 => Action::ClearProgressFlag,
			2 => Action::SetTemp2Flag,
			3 => Action::ClearTemp2Flag,
			4 => Action::SetTempFlag,
			5 => Action::ClearTempFlag,
			7 => Action::LaunchScript,
			v => Action::Other(v),
		}
	}

	pub fn raw(self) -> u8 {
		match self {
			Action::SetProgressFlag => 0,
			Action::ClearProgressFlag => 1,
			Action::SetTemp2Flag => 2,
			Action::ClearTemp2Flag => 3,
			Action::SetTempFlag => 4,
			Action::ClearTempFlag => 5,
			Action::LaunchScript => 7,
			Action::Other(v) => v,
		}
	}

	pub fn flag(self) -> Option<(FlagOp, FlagKind)> {
		match self {
			Action::SetProgressFlag => Some((FlagOp::Set, FlagKind::Progress)),
			Action::ClearProgressFlag => Some((FlagOp::Clear, FlagKind::Progress)),
			Action::SetTemp2Flag => Some((FlagOp::Set, FlagKind::Temp2)),
			Action::ClearTemp2Flag => Some((FlagOp::Clear, FlagKind::Temp2)),
			Action::SetTempFlag => Some((FlagOp::Set, FlagKind::Temp)),
			Action::ClearTempFlag => Some((FlagOp::Clear, FlagKind::Temp)),
			Action::LaunchScript | Action::Other(_) => None,
		}
	}
}

impl Say {
	pub fn goto(&self) -> Label {
		Label::new(self.goto_container as i16, self.goto_index)
	}
}

impl Switch {
	/// The flag number, for flag checks. Same storage as `parameter`.
	pub fn flag(&self) -> Option<u16> {
		self.condition.flag().map(|_| self.parameter)
	}

	pub fn set_flag(&mut self, flag: u16) {
		self.parameter = flag;
	}

	/// Label table slots of the branches.
	pub fn slots(&self) -> Range<usize> {
		let start = self.first_label as usize;
		start..start + self.count as usize
	}

	/// Human-readable name of branch `i`, falling back to the number itself.
	pub fn branch_name(&self, i: usize) -> Cow<'static, str> {
		match self.condition.branch_names().get(i) {
			Some(name) => Cow::Borrowed(name),
			None => Cow::Owned(i.to_string()),
		}
	}

	/// Resolves each branch against the label table, in order.
	pub fn branches<'a>(&self, table: &'a [Label]) -> impl Iterator<Item=Result<Label, LabelError>> + 'a {
		self.slots().map(move |i| label::resolve(table, i))
	}
}

impl Do {
	/// The flag number, for flag actions. Same storage as `parameter`.
	pub fn flag(&self) -> Option<u32> {
		self.action.flag().map(|_| self.parameter)
	}

	pub fn set_flag(&mut self, flag: u32) {
		self.parameter = flag;
	}

	/// The script to launch, for [`Action::LaunchScript`]. Stored with its halves swapped.
	pub fn script(&self) -> Option<ScriptId> {
		(self.action == Action::LaunchScript).then(|| ScriptId::from_swapped(self.parameter))
	}

	pub fn set_script(&mut self, script: ScriptId) {
		self.parameter = script.to_swapped();
	}

	/// Resolves the continuation against the label table.
	///
	/// Returns `None` if the label number is -1, meaning there is no continuation. Other
	/// negative numbers are errors.
	pub fn target(&self, table: &[Label]) -> Option<Result<Label, LabelError>> {
		match usize::try_from(self.label) {
			Ok(index) => Some(label::resolve(table, index)),
			Err(_) if self.label == -1 => None,
			Err(_) => Some(Err(LabelError::NegativeIndex { index: self.label })),
		}
	}
}

impl Insn {
	pub fn opcode(&self) -> Opcode {
		match self {
			Insn::Say(_) => Opcode::Say,
			Insn::Switch(_) => Opcode::Switch,
			Insn::Do(_) => Opcode::Do,
		}
	}

	/// The mnemonic used in disassembly.
	pub fn name(&self) -> &'static str {
		match self {
			Insn::Say(_) => "SAY",
			Insn::Switch(i) => match i.condition {
				Condition::Response2 => "SW_RESP_2",
				Condition::Response3 => "SW_RESP_3",
				Condition::Response4 => "SW_RESP_4",
				Condition::ProgressFlag => "SW_P_FLAG",
				Condition::TempFlag => "SW_T_FLAG",
				Condition::Temp2Flag => "SW_T2_FLAG",
				Condition::Shop => "SW_SHOP",
				Condition::Other(_) => "SW",
			},
			Insn::Do(i) => match i.action {
				Action::SetProgressFlag => "DO_SET_P_FLAG",
				Action::ClearProgressFlag => "DO_CLR_P_FLAG",
				Action::SetTemp2Flag => "DO_SET_T2_FLAG",
				Action::ClearTemp2Flag => "DO_CLR_T2_FLAG",
				Action::SetTempFlag => "DO_SET_T_FLAG",
				Action::ClearTempFlag => "DO_CLR_T_FLAG",
				Action::LaunchScript => "DO_SCRPT",
				Action::Other(_) => "DO",
			},
		}
	}

	pub fn decode(word: Word) -> Result<Insn, DecodeError> {
		Self::decode_with(word, &mut ())
	}

	/// Decodes a word, reporting unrecognized sub-discriminants to `diag`.
	pub fn decode_with(word: Word, diag: &mut impl Observer) -> Result<Insn, DecodeError> {
		let f = &mut Reader::new(&word.0);
		let opcode = f.u8()?;
		let Ok(opcode) = Opcode::try_from(opcode) else {
			return Err(DecodeError::UnsupportedOpcode { opcode, word })
		};
		let insn = match opcode {
			Opcode::Say => Insn::Say(Say {
				container: f.u8()?,
				message: f.u16()?,
				goto_index: f.i16()?,
				goto_container: f.i8()?,
				extra: f.i8()?,
			}),
			Opcode::Switch => {
				let count = f.u8()?;
				let condition = Condition::from_raw(f.u16()?);
				if let Condition::Other(v) = condition {
					diag.unsupported(UnsupportedSubVariant::Condition(v));
				}
				Insn::Switch(Switch {
					count,
					condition,
					parameter: f.u16()?,
					first_label: f.u16()?,
				})
			}
			Opcode::Do => {
				let action = Action::from_raw(f.u8()?);
				if let Action::Other(v) = action {
					diag.unsupported(UnsupportedSubVariant::Action(v));
				}
				Insn::Do(Do {
					action,
					label: f.i16()?,
					parameter: f.u32()?,
				})
			}
		};
		debug_assert!(f.is_empty());
		Ok(insn)
	}

	/// Reads one word from the stream and decodes it.
	pub fn read(f: &mut Reader, diag: &mut impl Observer) -> Result<Insn, DecodeError> {
		Self::decode_with(Word(f.array()?), diag)
	}

	pub fn write(&self, f: &mut Writer) {
		f.u8(self.opcode().into());
		match self {
			Insn::Say(i) => {
				f.u8(i.container);
				f.u16(i.message);
				f.i16(i.goto_index);
				f.i8(i.goto_container);
				f.i8(i.extra);
			}
			Insn::Switch(i) => {
				f.u8(i.count);
				f.u16(i.condition.raw());
				f.u16(i.parameter);
				f.u16(i.first_label);
			}
			Insn::Do(i) => {
				f.u8(i.action.raw());
				f.i16(i.label);
				f.u32(i.parameter);
			}
		}
	}

	pub fn encode(&self) -> Word {
		let mut f = Writer::with_capacity(Word::SIZE);
		self.write(&mut f);
		let mut word = [0; Word::SIZE];
		word.copy_from_slice(&f.finish());
		Word(word)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use test_case::test_case;

	fn word(bytes: [u8; 8]) -> Word {
		Word(bytes)
	}

	fn switch(count: u8, condition: u16, parameter: u16, first_label: u16) -> Word {
		let mut w = [0; 8];
		w[0] = 2;
		w[1] = count;
		w[2..4].copy_from_slice(&condition.to_le_bytes());
		w[4..6].copy_from_slice(&parameter.to_le_bytes());
		w[6..8].copy_from_slice(&first_label.to_le_bytes());
		Word(w)
	}

	fn do_(action: u8, label: i16, parameter: u32) -> Word {
		let mut w = [0; 8];
		w[0] = 3;
		w[1] = action;
		w[2..4].copy_from_slice(&label.to_le_bytes());
		w[4..8].copy_from_slice(&parameter.to_le_bytes());
		Word(w)
	}

	#[test]
	fn say_end() -> Result<(), DecodeError> {
		let w = word([0x01, 0x00, 0x05, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]);
		let Insn::Say(say) = Insn::decode(w)? else { panic!("not a say") };
		assert_eq!(say, Say {
			container: 0,
			message: 5,
			goto_index: -1,
			goto_container: -1,
			extra: -1,
		});
		assert!(say.goto().is_end());
		assert_eq!(Insn::Say(say).encode(), w);
		Ok(())
	}

	#[test]
	fn say_goto() -> Result<(), DecodeError> {
		let w = word([0x01, 0x02, 0x34, 0x12, 0x07, 0x00, 0x03, 0x80]);
		let Insn::Say(say) = Insn::decode(w)? else { panic!("not a say") };
		assert_eq!(say.container, 2);
		assert_eq!(say.message, 0x1234);
		assert_eq!(say.goto(), Label::new(3, 7));
		assert_eq!(say.extra, i8::MIN);
		Ok(())
	}

	#[test]
	fn progress_flag_check() -> Result<(), DecodeError> {
		let insn = Insn::decode(switch(2, 4, 17, 3))?;
		assert_eq!(insn.name(), "SW_P_FLAG");
		let Insn::Switch(sw) = insn else { panic!("not a switch") };
		assert_eq!(sw.condition, Condition::ProgressFlag);
		assert_eq!(sw.flag(), Some(17));
		assert_eq!(sw.parameter, 17);
		assert_eq!(sw.slots(), 3..5);
		assert_eq!(sw.branch_name(0), "true");
		assert_eq!(sw.branch_name(1), "false");
		Ok(())
	}

	#[test_case(1, Condition::Response2, "SW_RESP_2")]
	#[test_case(2, Condition::Response3, "SW_RESP_3")]
	#[test_case(3, Condition::Response4, "SW_RESP_4")]
	#[test_case(4, Condition::ProgressFlag, "SW_P_FLAG")]
	#[test_case(6, Condition::TempFlag, "SW_T_FLAG")]
	#[test_case(8, Condition::Temp2Flag, "SW_T2_FLAG")]
	#[test_case(27, Condition::Shop, "SW_SHOP")]
	#[test_case(5, Condition::Other(5), "SW")]
	#[test_case(99, Condition::Other(99), "SW")]
	fn switch_condition(raw: u16, condition: Condition, name: &str) -> Result<(), DecodeError> {
		let w = switch(2, raw, 0, 0);
		let insn = Insn::decode(w)?;
		let Insn::Switch(sw) = insn else { panic!("not a switch") };
		assert_eq!(sw.condition, condition);
		assert_eq!(insn.name(), name);
		assert_eq!(insn.encode(), w);
		Ok(())
	}

	#[test_case(0, Action::SetProgressFlag, "DO_SET_P_FLAG")]
	#[test_case(1, Action::ClearProgressFlag, "DO_CLR_P_FLAG")]
	#[test_case(2, Action::SetTemp2Flag, "DO_SET_T2_FLAG")]
	#[test_case(3, Action::ClearTemp2Flag, "DO_CLR_T2_FLAG")]
	#[test_case(4, Action::SetTempFlag, "DO_SET_T_FLAG")]
	#[test_case(5, Action::ClearTempFlag, "DO_CLR_T_FLAG")]
	#[test_case(7, Action::LaunchScript, "DO_SCRPT")]
	#[test_case(6, Action::Other(6), "DO")]
	#[test_case(9, Action::Other(9), "DO")]
	fn do_action(raw: u8, action: Action, name: &str) -> Result<(), DecodeError> {
		let w = do_(raw, 0, 0);
		let insn = Insn::decode(w)?;
		let Insn::Do(d) = insn else { panic!("not a do") };
		assert_eq!(d.action, action);
		assert_eq!(insn.name(), name);
		assert_eq!(insn.encode(), w);
		Ok(())
	}

	#[test]
	fn generic_switch_keeps_fields() -> Result<(), DecodeError> {
		let Insn::Switch(sw) = Insn::decode(switch(3, 99, 0xBEEF, 12))? else { panic!("not a switch") };
		assert_eq!(sw.condition, Condition::Other(99));
		assert_eq!(sw.condition.raw(), 99);
		assert_eq!(sw.parameter, 0xBEEF);
		assert_eq!(sw.flag(), None);
		assert_eq!(sw.branch_name(2), "2");
		Ok(())
	}

	#[test]
	fn set_progress_flag() -> Result<(), DecodeError> {
		let Insn::Do(d) = Insn::decode(do_(0, 5, 100))? else { panic!("not a do") };
		assert_eq!(d.action, Action::SetProgressFlag);
		assert_eq!(d.flag(), Some(100));
		assert_eq!(d.script(), None);
		assert_eq!(
			crate::flag::to_address(0x021B553C, d.flag().unwrap()),
			(0x021B553C + 12, 0x10),
		);
		Ok(())
	}

	#[test]
	fn launch_script_swaps_halves() -> Result<(), DecodeError> {
		let w = do_(7, 2, 0x0010_0003);
		let Insn::Do(mut d) = Insn::decode(w)? else { panic!("not a do") };
		assert_eq!(d.script(), Some(ScriptId::new(3, 16)));
		assert_eq!(d.flag(), None);
		assert_eq!(Insn::Do(d).encode(), w);

		d.set_script(ScriptId::new(0x1234, 0x5678));
		assert_eq!(d.parameter, 0x5678_1234);
		assert_eq!(Insn::Do(d).encode(), do_(7, 2, 0x5678_1234));
		Ok(())
	}

	#[test]
	fn flag_alias_shares_storage() -> Result<(), DecodeError> {
		let Insn::Switch(mut sw) = Insn::decode(switch(2, 6, 1, 0))? else { panic!("not a switch") };
		sw.set_flag(300);
		assert_eq!(sw.parameter, 300);
		assert_eq!(Insn::Switch(sw).encode(), switch(2, 6, 300, 0));
		Ok(())
	}

	#[test]
	fn response_keeps_parameter() -> Result<(), DecodeError> {
		let w = switch(2, 1, 5, 0);
		let insn = Insn::decode(w)?;
		let Insn::Switch(sw) = insn else { panic!("not a switch") };
		assert_eq!(sw.parameter, 5);
		assert_eq!(sw.branch_name(1), "(second response)");
		assert_eq!(sw.branch_name(2), "2");
		assert_eq!(insn.encode(), w);
		Ok(())
	}

	#[test]
	fn shop_branch_names() -> Result<(), DecodeError> {
		let Insn::Switch(sw) = Insn::decode(switch(5, 27, 0, 0))? else { panic!("not a switch") };
		let names = (0..6).map(|i| sw.branch_name(i)).collect::<Vec<_>>();
		assert_eq!(names, [
			"Castle Town Shop",
			"Forest's General Store",
			"Anouki General Store",
			"Papuchia Shop",
			"Goron Country Store",
			"5",
		]);
		Ok(())
	}

	#[test_case(0)]
	#[test_case(4)]
	#[test_case(0xFF)]
	fn unsupported_opcode(op: u8) {
		let w = word([op, 1, 2, 3, 4, 5, 6, 7]);
		match Insn::decode(w) {
			Err(DecodeError::UnsupportedOpcode { opcode, word }) => {
				assert_eq!(opcode, op);
				assert_eq!(word, w);
			}
			e => panic!("expected unsupported opcode, got {e:?}"),
		}
	}

	#[test]
	fn observer_sees_generic_variants() -> Result<(), DecodeError> {
		let mut seen = Vec::new();
		Insn::decode_with(switch(2, 4, 0, 0), &mut seen)?;
		Insn::decode_with(switch(2, 99, 0, 0), &mut seen)?;
		Insn::decode_with(do_(9, 0, 0), &mut seen)?;
		Insn::decode_with(do_(7, 0, 0), &mut seen)?;
		assert_eq!(seen, [
			UnsupportedSubVariant::Condition(99),
			UnsupportedSubVariant::Action(9),
		]);
		Ok(())
	}

	#[test]
	fn do_target() {
		let table = [Label::new(0, 4), Label::END];
		let target = |label| Do { action: Action::Other(9), label, parameter: 0 }.target(&table);
		assert_eq!(target(0), Some(Ok(Label::new(0, 4))));
		assert_eq!(target(1), Some(Ok(Label::END)));
		assert_eq!(target(2), Some(Err(LabelError::IndexOutOfRange { index: 2, len: 2 })));
		assert_eq!(target(-1), None);
		assert_eq!(target(-5), Some(Err(LabelError::NegativeIndex { index: -5 })));
		assert_eq!(target(i16::MIN), Some(Err(LabelError::NegativeIndex { index: i16::MIN })));
	}

	#[test]
	fn switch_branches() {
		let table = [Label::new(0, 1), Label::new(0, 2), Label::END];
		let sw = Switch { count: 3, condition: Condition::Response3, parameter: 0, first_label: 1 };
		assert_eq!(sw.branches(&table).collect::<Vec<_>>(), [
			Ok(Label::new(0, 2)),
			Ok(Label::END),
			Err(LabelError::IndexOutOfRange { index: 3, len: 3 }),
		]);
	}

	#[test]
	fn roundtrip_boundaries() -> Result<(), DecodeError> {
		for op in 1..=3 {
			for fill in [0x00, 0x01, 0x7F, 0x80, 0xFE, 0xFF] {
				let mut w = [fill; 8];
				w[0] = op;
				let w = Word(w);
				assert_eq!(Insn::decode(w)?.encode(), w, "{w}");
			}
		}
		Ok(())
	}

	#[test]
	fn roundtrip_sweep() -> Result<(), DecodeError> {
		// Deterministic xorshift, so failures are reproducible.
		let mut state = 0x9E37_79B9_7F4A_7C15u64;
		for _ in 0..20000 {
			state ^= state << 13;
			state ^= state >> 7;
			state ^= state << 17;
			let mut w = state.to_le_bytes();
			w[0] = 1 + w[0] % 3;
			let w = Word(w);
			assert_eq!(Insn::decode(w)?.encode(), w, "{w}");
		}
		Ok(())
	}
}
