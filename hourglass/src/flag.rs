/// Which of the game's flag regions a flag instruction refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagKind {
	Progress,
	Temp,
	Temp2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagOp {
	Set,
	Clear,
}

impl FlagKind {
	pub fn name(&self) -> &'static str {
		match self {
			FlagKind::Progress => "progress",
			FlagKind::Temp => "temp",
			FlagKind::Temp2 => "temp2",
		}
	}
}

/// In-memory base addresses of each flag region.
///
/// Only the progress flags have a known location; the others are shown relative to their region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagBases {
	pub progress: Option<u64>,
	pub temp: Option<u64>,
	pub temp2: Option<u64>,
}

impl FlagBases {
	/// Start of the progress flags in the event node, in *Phantom Hourglass*'s main RAM.
	pub const PROGRESS: u64 = 0x021B553C;

	pub fn get(&self, kind: FlagKind) -> Option<u64> {
		match kind {
			FlagKind::Progress => self.progress,
			FlagKind::Temp => self.temp,
			FlagKind::Temp2 => self.temp2,
		}
	}
}

impl Default for FlagBases {
	fn default() -> Self {
		Self {
			progress: Some(Self::PROGRESS),
			temp: None,
			temp2: None,
		}
	}
}

/// Finds the byte and bit that hold `flag`, in a region starting at `base`.
///
/// Flags are stored as little-endian 32-bit words, so the bit is walked down one byte at a time
/// until it fits in a byte mask.
pub fn to_address(base: u64, flag: u32) -> (u64, u8) {
	let mut addr = base.wrapping_add((flag >> 5) as u64 * 4);
	let mut bit = 1u32 << (flag & 0x1F);
	while bit > 0x80 {
		bit >>= 8;
		addr = addr.wrapping_add(1);
	}
	(addr, bit as u8)
}
