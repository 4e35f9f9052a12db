use hourglass::FlagBases;

use crate::lookup::{Messages, NullMessages};
use crate::Problem;

/// Column positions of a listing line, counted in characters from the start of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
	pub insn: usize,
	pub operands: usize,
	pub comment: usize,
}

impl Default for Layout {
	fn default() -> Self {
		Self {
			insn: 12,
			operands: 28,
			comment: 64,
		}
	}
}

pub struct Context<'a> {
	pub layout: Layout,
	pub flags: FlagBases,
	pub messages: &'a dyn Messages,
	line_start: usize,
	out: String,
	problems: Vec<Problem>,
}

impl<'a> Context<'a> {
	pub fn new(messages: Option<&'a dyn Messages>) -> Self {
		Self {
			layout: Layout::default(),
			flags: FlagBases::default(),
			messages: messages.unwrap_or(&NullMessages),
			line_start: 0,
			out: String::new(),
			problems: Vec::new(),
		}
	}

	pub fn layout(mut self, layout: Layout) -> Self {
		self.layout = layout;
		self
	}

	pub fn flags(mut self, flags: FlagBases) -> Self {
		self.flags = flags;
		self
	}

	/// Returns the listing, and everything that could not be rendered properly.
	pub fn finish(self) -> (String, Vec<Problem>) {
		(self.out, self.problems)
	}
}

impl<'a> Context<'a> {
	fn column(&self) -> usize {
		self.out[self.line_start..].chars().count()
	}

	/// Pads the current line with spaces up to `col`.
	///
	/// If the line is already that long, a single space is inserted instead, unless the line is
	/// empty.
	pub fn pad_to(&mut self, col: usize) -> &mut Self {
		let n = self.column();
		if n < col {
			self.out.extend(std::iter::repeat(' ').take(col - n));
		} else if n != 0 {
			self.out.push(' ');
		}
		self
	}

	pub fn kw(&mut self, arg: &str) -> &mut Self {
		self.out.push_str(arg);
		self
	}

	pub fn line(&mut self) -> &mut Self {
		self.out.push('\n');
		self.line_start = self.out.len();
		self
	}

	pub fn write_fmt(&mut self, args: std::fmt::Arguments<'_>) {
		// Writing to a String never fails.
		let _ = std::fmt::Write::write_fmt(&mut self.out, args);
	}

	pub fn problem(&mut self, problem: Problem) {
		self.problems.push(problem);
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn padding() {
		let mut f = Context::new(None);
		f.kw("ab").pad_to(4).kw("c").pad_to(2).kw("d").line();
		f.pad_to(3).kw("é").pad_to(5).kw("x");
		let (out, problems) = f.finish();
		assert_eq!(out, "ab  c d\n   é x");
		assert!(problems.is_empty());
	}
}
