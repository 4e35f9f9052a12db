/// A branch target: an instruction in some container's flow.
///
/// `(-1, -1)` is the [`END`](Label::END) sentinel, which terminates the script.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label {
	pub container: i16,
	pub index: i16,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelError {
	#[error("label index {index} out of range (table has {len} labels)")]
	IndexOutOfRange { index: usize, len: usize },
	#[error("negative label index {index}")]
	NegativeIndex { index: i16 },
	#[error("malformed label {label}")]
	Malformed { label: Label },
	#[error("label {label} refers to an unknown container")]
	UnknownContainer { label: Label },
	#[error("label {label} is past the end of its container ({count} instructions)")]
	TargetOutOfRange { label: Label, count: usize },
}

impl Label {
	pub const END: Label = Label { container: -1, index: -1 };

	pub fn new(container: i16, index: i16) -> Label {
		Label { container, index }
	}

	pub fn is_end(&self) -> bool {
		*self == Label::END
	}

	/// The `(container, instruction)` pair this label points at.
	///
	/// Returns `None` for the end sentinel, and for labels with any other negative component.
	pub fn target(&self) -> Option<(u16, u16)> {
		if self.container < 0 || self.index < 0 {
			return None
		}
		Some((self.container as u16, self.index as u16))
	}

	/// Checks that the label points at an existing instruction.
	///
	/// `count` gives the number of instructions in each container, or `None` if the container
	/// does not exist. The end sentinel is always valid.
	pub fn validate(&self, count: impl Fn(u16) -> Option<usize>) -> Result<(), LabelError> {
		if self.is_end() {
			return Ok(())
		}
		let Some((container, index)) = self.target() else {
			return Err(LabelError::Malformed { label: *self })
		};
		let Some(count) = count(container) else {
			return Err(LabelError::UnknownContainer { label: *self })
		};
		if index as usize >= count {
			return Err(LabelError::TargetOutOfRange { label: *self, count })
		}
		Ok(())
	}
}

impl From<(i16, i16)> for Label {
	fn from((container, index): (i16, i16)) -> Label {
		Label { container, index }
	}
}

impl std::fmt::Debug for Label {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Label({self})")
	}
}

impl std::fmt::Display for Label {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.is_end() {
			f.write_str("END")
		} else {
			write!(f, "B{}_L{}", self.container, self.index)
		}
	}
}

/// Looks up slot `index` of a label table.
pub fn resolve(table: &[Label], index: usize) -> Result<Label, LabelError> {
	table.get(index).copied()
		.ok_or(LabelError::IndexOutOfRange { index, len: table.len() })
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn sentinel() {
		assert!(Label::new(-1, -1).is_end());
		assert!(!Label::new(0, 0).is_end());
		assert!(!Label::new(-1, 0).is_end());
		assert_eq!(Label::END.target(), None);
		assert_eq!(Label::new(2, 7).target(), Some((2, 7)));
		assert_eq!(Label::END.to_string(), "END");
		assert_eq!(Label::new(2, 7).to_string(), "B2_L7");
	}

	#[test]
	fn half_sentinel_is_malformed() {
		let counts = |_| Some(10);
		assert_eq!(Label::END.validate(counts), Ok(()));
		assert_eq!(
			Label::new(-1, 3).validate(counts),
			Err(LabelError::Malformed { label: Label::new(-1, 3) }),
		);
		assert_eq!(
			Label::new(0, -1).validate(counts),
			Err(LabelError::Malformed { label: Label::new(0, -1) }),
		);
	}

	#[test]
	fn validate_bounds() {
		let counts = |c| match c {
			0 => Some(4),
			1 => Some(0),
			_ => None,
		};
		assert_eq!(Label::new(0, 3).validate(counts), Ok(()));
		assert_eq!(
			Label::new(0, 4).validate(counts),
			Err(LabelError::TargetOutOfRange { label: Label::new(0, 4), count: 4 }),
		);
		assert_eq!(
			Label::new(1, 0).validate(counts),
			Err(LabelError::TargetOutOfRange { label: Label::new(1, 0), count: 0 }),
		);
		assert_eq!(
			Label::new(5, 0).validate(counts),
			Err(LabelError::UnknownContainer { label: Label::new(5, 0) }),
		);
	}

	#[test]
	fn resolve_bounds() {
		let table = [Label::new(0, 1), Label::END];
		assert_eq!(resolve(&table, 0), Ok(Label::new(0, 1)));
		assert_eq!(resolve(&table, 1), Ok(Label::END));
		assert_eq!(resolve(&table, 2), Err(LabelError::IndexOutOfRange { index: 2, len: 2 }));
	}
}
