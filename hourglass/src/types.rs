#[macro_export]
macro_rules! impl_from_into {
	($outer:ident($inner:ty)) => {
		impl From<$inner> for $outer {
			fn from(v: $inner) -> $outer {
				$outer(v)
			}
		}

		impl From<$outer> for $inner {
			fn from($outer(v): $outer) -> $inner {
				v
			}
		}
	}
}

/// A single raw instruction, exactly as stored in the file.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Word(pub [u8; 8]);
impl_from_into!(Word([u8; 8]));

impl Word {
	pub const SIZE: usize = 8;

	pub fn opcode(&self) -> u8 {
		self.0[0]
	}
}

impl std::fmt::Debug for Word {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Word({self})")
	}
}

impl std::fmt::Display for Word {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		for (i, b) in self.0.iter().enumerate() {
			if i != 0 {
				f.write_str(" ")?;
			}
			write!(f, "{b:02X}")?;
		}
		Ok(())
	}
}

/// Identifies a script entry point. Written as `S{high}_{low}`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ScriptId(pub u32);
impl_from_into!(ScriptId(u32));

impl ScriptId {
	pub fn new(high: u16, low: u16) -> ScriptId {
		ScriptId((high as u32) << 16 | low as u32)
	}

	pub fn high(&self) -> u16 {
		(self.0 >> 16) as u16
	}

	pub fn low(&self) -> u16 {
		self.0 as u16
	}

	/// The launch-script action stores its script id with the two halves swapped.
	pub fn from_swapped(parameter: u32) -> ScriptId {
		ScriptId(parameter.rotate_left(16))
	}

	pub fn to_swapped(self) -> u32 {
		self.0.rotate_left(16)
	}
}

impl std::fmt::Debug for ScriptId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "ScriptId({self})")
	}
}

impl std::fmt::Display for ScriptId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "S{}_{}", self.high(), self.low())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScriptEntry {
	pub script: ScriptId,
	pub index: u32,
}

impl From<(u32, u32)> for ScriptEntry {
	fn from((script, index): (u32, u32)) -> ScriptEntry {
		ScriptEntry { script: ScriptId(script), index }
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn script_id_halves() {
		let id = ScriptId(0x0003_0010);
		assert_eq!(id.to_string(), "S3_16");
		assert_eq!(id.to_swapped(), 0x0010_0003);
		assert_eq!(ScriptId::from_swapped(0x0010_0003), id);
		assert_eq!(ScriptId::new(3, 16), id);
	}

	#[test]
	fn word_display() {
		let w = Word([0x01, 0x00, 0x05, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]);
		assert_eq!(w.to_string(), "01 00 05 00 FF FF FF FF");
		assert_eq!(w.opcode(), 1);
	}
}
