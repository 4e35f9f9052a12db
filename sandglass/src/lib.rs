//! Disassembly listings for event flows.
//!
//! Each instruction becomes one line: its address (`B{container}_L{index}:`), mnemonic, operands,
//! and sometimes a comment with the message text or the memory location of a flag.

use hourglass::{Insn, Flow, Label, LabelError, ScriptEntry, ScriptId, Word, FlagKind, FlagOp};
use hourglass::{Say, Switch, Condition, Do};
use hourglass::flag::to_address;
use hourglass::flow::scripts_at;

mod writer;
pub mod lookup;

pub use writer::{Context, Layout};
pub use lookup::{Messages, MessageTable};

/// Something that could not be rendered. The rest of the listing is still written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Problem {
	#[error("B{container}_L{index}: {source}")]
	Label { container: u8, index: usize, #[source] source: LabelError },
	#[error("B{container}_L{index}: no text for message {msg_container}/{message}")]
	Message { container: u8, index: usize, msg_container: u8, message: u16 },
	#[error("B{container}: script {script} starts at L{index}, past the last instruction")]
	Script { container: u8, script: ScriptId, index: u32 },
}

/// Renders a whole flow.
pub fn to_string(flow: &Flow, messages: Option<&dyn Messages>) -> (String, Vec<Problem>) {
	let mut ctx = Context::new(messages);
	write(&mut ctx, flow);
	ctx.finish()
}

pub fn write(f: &mut Context, flow: &Flow) {
	for (index, i) in flow.insns.iter().enumerate() {
		insn(f, flow.id, index, i, &flow.labels, &flow.scripts);
	}
	for s in &flow.scripts {
		if s.index as usize >= flow.insns.len() {
			f.problem(Problem::Script { container: flow.id, script: s.script, index: s.index });
		}
	}
}

/// Renders undecoded words as hex, one per line, for data the codec cannot read.
pub fn raw(f: &mut Context, container: u8, data: &[u8]) {
	for (index, chunk) in data.chunks(Word::SIZE).enumerate() {
		write!(f, "B{container}_L{index}:");
		f.pad_to(f.layout.insn);
		for (i, b) in chunk.iter().enumerate() {
			if i != 0 {
				f.kw(" ");
			}
			write!(f, "{b:02X}");
		}
		f.line();
	}
}

/// Renders a single instruction, preceded by the names of any scripts that start at it.
pub fn insn(
	f: &mut Context,
	container: u8,
	index: usize,
	insn: &Insn,
	labels: &[Label],
	scripts: &[ScriptEntry],
) {
	for script in scripts_at(scripts, index) {
		write!(f, "{script}:");
		f.line();
	}

	let mut line = Line { container, index, operands: Vec::new(), comment: None };
	match insn {
		Insn::Say(i) => say(f, &mut line, i),
		Insn::Switch(i) => switch(f, &mut line, i, labels),
		Insn::Do(i) => do_(f, &mut line, i, labels),
	}

	write!(f, "B{container}_L{index}:");
	f.pad_to(f.layout.insn).kw(insn.name());
	if !line.operands.is_empty() {
		f.pad_to(f.layout.operands).kw(&line.operands.join(", "));
	}
	if let Some(comment) = &line.comment {
		f.pad_to(f.layout.comment);
		write!(f, "# {comment}");
	}
	f.line();
}

struct Line {
	container: u8,
	index: usize,
	operands: Vec<String>,
	comment: Option<String>,
}

#[extend::ext(name = ContextExt)]
impl Context<'_> {
	/// Formats a branch target, noting a problem if it cannot be resolved.
	fn target(&mut self, line: &Line, label: Result<Label, LabelError>) -> String {
		let problem = |source| Problem::Label { container: line.container, index: line.index, source };
		match label {
			Ok(label) => {
				if !label.is_end() && label.target().is_none() {
					self.problem(problem(LabelError::Malformed { label }));
				}
				label.to_string()
			}
			Err(e) => {
				let s = match &e {
					LabelError::IndexOutOfRange { index, .. } => format!("?L{index}"),
					LabelError::NegativeIndex { index } => format!("?L{index}"),
					_ => "?".to_owned(),
				};
				self.problem(problem(e));
				s
			}
		}
	}

	fn flag_comment(&mut self, verb: &str, kind: FlagKind, flag: u32) -> String {
		let name = kind.name();
		match self.flags.get(kind) {
			Some(base) => {
				let (addr, bit) = to_address(base, flag);
				format!("{verb} {name} flag @ {addr:#X}, bit {bit:#04X}")
			}
			None => {
				let (addr, bit) = to_address(0, flag);
				format!("{verb} {name} flag @ +{addr:#X}, bit {bit:#04X}")
			}
		}
	}
}

fn say(f: &mut Context, line: &mut Line, i: &Say) {
	line.operands.push(format!("msg={}/{}", i.container, i.message));
	let goto = f.target(line, Ok(i.goto()));
	line.operands.push(format!("goto={goto}"));

	match f.messages.message(i.container, i.message) {
		Some(text) => line.comment = Some(format!("\"{}\"", text.replace('\n', " "))),
		None => f.problem(Problem::Message {
			container: line.container,
			index: line.index,
			msg_container: i.container,
			message: i.message,
		}),
	}
}

fn switch(f: &mut Context, line: &mut Line, i: &Switch, labels: &[Label]) {
	match i.condition {
		c if c.is_response() => {
			if i.parameter != 0 {
				line.operands.push(format!("param={}", i.parameter));
			}
		}
		Condition::Shop => line.operands.push(format!("param={}", i.parameter)),
		Condition::Other(c) => {
			line.operands.push(format!("cond={c}"));
			line.operands.push(format!("param={}", i.parameter));
		}
		_ => {}
	}

	if let (Some(kind), Some(flag)) = (i.condition.flag(), i.flag()) {
		line.operands.push(format!("flag={flag}"));
		line.comment = Some(f.flag_comment("checks", kind, flag as u32));
	}

	let branches = i.branches(labels).enumerate()
		.map(|(n, l)| format!("{}:{}", i.branch_name(n), f.target(line, l)))
		.collect::<Vec<_>>();
	line.operands.push(format!("goto=[{}]", branches.join(", ")));
}

fn do_(f: &mut Context, line: &mut Line, i: &Do, labels: &[Label]) {
	if let (Some((op, kind)), Some(flag)) = (i.action.flag(), i.flag()) {
		line.operands.push(format!("flag={flag}"));
		let verb = match op {
			FlagOp::Set => "sets",
			FlagOp::Clear => "clears",
		};
		line.comment = Some(f.flag_comment(verb, kind, flag));
	} else if let Some(script) = i.script() {
		line.operands.push(format!("script={script}"));
	} else {
		line.operands.push(format!("action={}", i.action.raw()));
		line.operands.push(format!("param={}", i.parameter));
	}

	let goto = match i.target(labels) {
		Some(l) => f.target(line, l),
		None => Label::END.to_string(),
	};
	line.operands.push(format!("goto={goto}"));
}
