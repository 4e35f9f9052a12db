use std::collections::BTreeMap;

/// A secondary discriminant with no named variant.
///
/// These are not errors: the instruction decodes to a generic variant that keeps the raw value.
/// They are reported to an [`Observer`] so that unexplored parts of the format can be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, thiserror::Error)]
pub enum UnsupportedSubVariant {
	#[error("unrecognized switch condition {0}")]
	Condition(u16),
	#[error("unrecognized action {0}")]
	Action(u8),
}

/// Receives notes from the decoder. Passed in by the caller of [`Insn::decode_with`](crate::Insn::decode_with).
pub trait Observer {
	fn unsupported(&mut self, v: UnsupportedSubVariant);
}

impl Observer for () {
	fn unsupported(&mut self, _: UnsupportedSubVariant) {}
}

impl Observer for Vec<UnsupportedSubVariant> {
	fn unsupported(&mut self, v: UnsupportedSubVariant) {
		self.push(v);
	}
}

impl<T: Observer + ?Sized> Observer for &mut T {
	fn unsupported(&mut self, v: UnsupportedSubVariant) {
		(**self).unsupported(v)
	}
}

/// Counts how many times each unrecognized discriminant was seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Unseen(pub BTreeMap<UnsupportedSubVariant, usize>);

impl Unseen {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item=(UnsupportedSubVariant, usize)> + '_ {
		self.0.iter().map(|(k, v)| (*k, *v))
	}

	/// Combines the counts of two collectors, such as from separate containers.
	pub fn merge(&mut self, other: Unseen) {
		for (k, v) in other.0 {
			*self.0.entry(k).or_default() += v;
		}
	}
}

impl Observer for Unseen {
	fn unsupported(&mut self, v: UnsupportedSubVariant) {
		*self.0.entry(v).or_default() += 1;
	}
}
