#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("cannot read {len} bytes at {pos:#X}, input is only {size:#X} bytes")]
	Read { pos: usize, len: usize, size: usize },
}

pub type Result<T, E=Error> = std::result::Result<T, E>;

/// Reads fields one after another from a byte slice.
#[derive(Clone)]
pub struct Reader<'a> {
	data: &'a [u8],
	pos: usize,
}

impl std::fmt::Debug for Reader<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Reader({:#X}/{:#X})", self.pos, self.data.len())
	}
}

impl<'a> Reader<'a> {
	pub fn new(data: &'a [u8]) -> Reader<'a> {
		Reader { data, pos: 0 }
	}

	/// Takes the next `len` bytes without copying them.
	///
	/// On failure nothing is consumed.
	pub fn slice(&mut self, len: usize) -> Result<&'a [u8]> {
		let start = self.pos;
		let end = start.checked_add(len)
			.filter(|&end| end <= self.data.len())
			.ok_or(Error::Read { pos: start, len, size: self.data.len() })?;
		self.pos = end;
		Ok(&self.data[start..end])
	}

	pub fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
		let mut out = [0; N];
		out.copy_from_slice(self.slice(N)?);
		Ok(out)
	}

	#[must_use]
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Length of the whole input, including what has already been read.
	#[must_use]
	pub fn len(&self) -> usize {
		self.data.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.pos >= self.data.len()
	}

	#[must_use]
	pub fn remaining(&self) -> &'a [u8] {
		&self.data[self.pos..]
	}
}

mod seal { pub trait Sealed {} }
impl seal::Sealed for Reader<'_> {}

macro_rules! le {
	($($type:ident)*) => { paste::paste! {
		impl Reader<'_> {
			$(pub fn [<$type _le>](&mut self) -> Result<$type> {
				self.array().map($type::from_le_bytes)
			})*
		}

		/// Little-endian reads without the `_le` suffix. Import as `use gospel::read::Le as _;`.
		pub trait Le: seal::Sealed {
			$(fn $type(&mut self) -> Result<$type>;)*
		}

		impl Le for Reader<'_> {
			$(fn $type(&mut self) -> Result<$type> {
				self.[<$type _le>]()
			})*
		}
	} }
}

le!(u8 u16 u32 i8 i16 i32);

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn short_read_keeps_position() {
		let mut f = Reader::new(&[1, 2, 3]);
		assert_eq!(f.u16(), Ok(0x0201));
		assert_eq!(f.u16(), Err(Error::Read { pos: 2, len: 2, size: 3 }));
		assert_eq!(f.pos(), 2);
		assert_eq!(f.i8(), Ok(3));
		assert!(f.is_empty());
		assert_eq!(f.slice(usize::MAX), Err(Error::Read { pos: 3, len: usize::MAX, size: 3 }));
	}
}
