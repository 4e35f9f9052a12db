/// Appends fields one after another to a growing buffer.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct Writer {
	data: Vec<u8>,
}

impl Writer {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_capacity(size: usize) -> Self {
		Writer { data: Vec::with_capacity(size) }
	}

	pub fn finish(self) -> Vec<u8> {
		self.data
	}

	pub fn slice(&mut self, data: &[u8]) {
		self.data.extend_from_slice(data)
	}

	pub fn array<const N: usize>(&mut self, data: [u8; N]) {
		self.slice(&data)
	}

	/// Moves everything written to `other` onto the end of this one.
	pub fn append(&mut self, mut other: Writer) {
		self.data.append(&mut other.data);
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.data.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}
}

mod seal { pub trait Sealed {} }
impl seal::Sealed for Writer {}

macro_rules! le {
	($($type:ident)*) => { paste::paste! {
		impl Writer {
			$(pub fn [<$type _le>](&mut self, val: $type) {
				self.array(val.to_le_bytes())
			})*
		}

		/// Little-endian writes without the `_le` suffix. Import as `use gospel::write::Le as _;`.
		pub trait Le: seal::Sealed {
			$(fn $type(&mut self, val: $type);)*
		}

		impl Le for Writer {
			$(fn $type(&mut self, val: $type) {
				self.[<$type _le>](val)
			})*
		}
	} }
}

le!(u8 u16 u32 i8 i16 i32);
