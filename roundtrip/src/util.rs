use std::time::{Instant, Duration};

use hourglass::{Insn, Unseen, Word};
use hourglass::flow::{read_insns, write_insns};

pub use anyhow::Error;

fn print_diff<'a>(diff: similar::TextDiff<'a, 'a, 'a, str>) {
	for (i, hunk) in diff.unified_diff().iter_hunks().enumerate() {
		if i > 0 {
			println!("\x1B[34m…\x1B[39m");
		}
		for change in hunk.iter_changes() {
			match change.tag() {
				similar::ChangeTag::Delete => print!("\x1B[31m-{change}\x1B[39m"),
				similar::ChangeTag::Insert => print!("\x1B[32m+{change}\x1B[39m"),
				similar::ChangeTag::Equal => print!(" {change}"),
			};
		}
	}
}

pub fn check_equal<T: PartialEq + std::fmt::Debug>(a: &T, b: &T) -> Result<(), Error> {
	if a != b {
		let a = format!("{:#?}", a);
		let b = format!("{:#?}", b);
		print_diff(similar::TextDiff::configure().diff_lines(&a, &b));
		return Err(anyhow::anyhow!("{} differs", std::any::type_name::<T>()))
	}
	Ok(())
}

pub fn check_text(expected: &str, got: &str) -> Result<(), Error> {
	if expected != got {
		print_diff(similar::TextDiff::configure().diff_lines(expected, got));
		return Err(anyhow::anyhow!("listing differs"))
	}
	Ok(())
}

fn words(data: &[u8]) -> Vec<Word> {
	data.chunks_exact(Word::SIZE)
		.map(|c| {
			let mut w = Word::default();
			w.0.copy_from_slice(c);
			w
		})
		.collect()
}

/// Decodes and re-encodes a stream, printing the words that changed if the bytes differ.
pub fn check_roundtrip(data: &[u8], unseen: &mut Unseen) -> Result<Vec<Insn>, Error> {
	let val = read_insns(data, unseen)?;
	let data2 = write_insns(&val);
	if data != data2 {
		let val2 = read_insns(&data2, &mut ())?;
		check_equal(&val, &val2)?;

		let (a, b) = (words(data), words(&data2));
		let deadline = Instant::now() + Duration::from_secs(1);
		let diff = similar::capture_diff_slices_deadline(similar::Algorithm::Patience, &a, &b, Some(deadline));
		for op in diff {
			if let similar::DiffOp::Replace { old_index, old_len, new_index, new_len } = op {
				for (i, (x, y)) in a[old_index..old_index+old_len].iter().zip(&b[new_index..new_index+new_len]).enumerate() {
					println!("{:04} [{x}] ≠ [{y}]", old_index + i);
				}
			}
		}
		return Err(anyhow::anyhow!("{} bytes differ", data.len()))
	}
	Ok(val)
}

/// Builds a stream out of words written as hex strings.
pub fn stream(words: &[&str]) -> Vec<u8> {
	let mut out = Vec::with_capacity(words.len() * Word::SIZE);
	for w in words {
		for b in w.split_whitespace() {
			out.push(u8::from_str_radix(b, 16).expect("bad hex in test word"));
		}
	}
	assert_eq!(out.len() % Word::SIZE, 0, "test words must be 8 bytes each");
	out
}
