use hourglass::flag::to_address;

use crate::util::parse_int;

#[derive(Debug, Clone, clap::Args)]
#[command(arg_required_else_help = true)]
pub struct Command {
	/// Address of the flag array, such as 0x021B553C for progress flags
	#[clap(value_parser = parse_int::<u64>)]
	base: u64,
	/// Flag numbers to look up
	#[clap(value_parser = parse_int::<u32>, required = true)]
	flag: Vec<u32>,
}

pub fn run(cmd: &Command) -> eyre::Result<()> {
	for &flag in &cmd.flag {
		println!("{}", describe(cmd.base, flag));
	}
	Ok(())
}

fn describe(base: u64, flag: u32) -> String {
	let (addr, bit) = to_address(base, flag);
	format!("{flag}: {addr:#X}, bit {bit:#04X}")
}

#[cfg(test)]
mod test {
	use super::*;
	use test_case::test_case;

	#[test_case(0,  "0: 0x21B553C, bit 0x01")]
	#[test_case(7,  "7: 0x21B553C, bit 0x80")]
	#[test_case(8,  "8: 0x21B553D, bit 0x01")]
	#[test_case(31, "31: 0x21B553F, bit 0x80")]
	#[test_case(32, "32: 0x21B5540, bit 0x01")]
	#[test_case(100, "100: 0x21B5548, bit 0x10")]
	fn progress(flag: u32, expected: &str) {
		assert_eq!(describe(0x021B553C, flag), expected);
	}
}
