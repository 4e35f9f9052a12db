//! Little-endian byte readers and writers, shared by the binary codecs in this workspace.

pub mod read;
pub mod write;
