use std::collections::BTreeMap;

/// Source of message text, keyed by container and message number.
pub trait Messages {
	fn message(&self, container: u8, id: u16) -> Option<&str>;
}

#[derive(Debug, Clone, Copy)]
pub struct NullMessages;

impl Messages for NullMessages {
	fn message(&self, _container: u8, _id: u16) -> Option<&str> {
		None
	}
}

/// The messages of every loaded container.
#[derive(Clone, Default)]
pub struct MessageTable {
	containers: BTreeMap<u8, Vec<String>>,
}

impl MessageTable {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, container: u8, messages: Vec<String>) {
		self.containers.insert(container, messages);
	}
}

impl std::fmt::Debug for MessageTable {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		let mut d = f.debug_struct("MessageTable");
		for (n, x) in &self.containers {
			d.field(&format!("B{n}"), &format_args!("{} messages", x.len()));
		}
		d.finish()
	}
}

impl Messages for MessageTable {
	fn message(&self, container: u8, id: u16) -> Option<&str> {
		Some(self.containers.get(&container)?.get(id as usize)?.as_str())
	}
}
