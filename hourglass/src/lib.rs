//! Codec for the event-flow bytecode of the *Phantom Hourglass* and *Spirit Tracks* message
//! files, the part of the BMG container that the game calls `FLW1`.
//!
//! Every instruction is a fixed-width 8-byte little-endian word. [`Insn::decode`] and
//! [`Insn::encode`] convert between words and typed instructions without losing any bits, and
//! [`Flow`] does the same for a container's whole instruction stream.

pub mod types;
pub mod insn;
pub mod label;
pub mod flag;
pub mod diag;
pub mod flow;

pub use types::{Word, ScriptId, ScriptEntry};
pub use insn::{Insn, Opcode, Say, Switch, Condition, Do, Action, DecodeError};
pub use label::{Label, LabelError};
pub use flag::{FlagKind, FlagOp, FlagBases};
pub use diag::{Observer, UnsupportedSubVariant, Unseen};
pub use flow::{Flow, ReadError, CheckError, RoundTripMismatch};
