#![cfg(test)]

mod util;

use hourglass::{Flow, Insn, Label, ScriptEntry, Unseen, UnsupportedSubVariant};
use sandglass::MessageTable;
use test_case::test_case;
use util::*;

/// One of every kind of instruction, with a label table covering every branch slot.
const MAP: &[&str] = &[
	"01 00 00 00 FF FF FF FF",
	"01 00 01 00 02 00 00 07",
	"02 02 01 00 00 00 00 00",
	"02 03 02 00 00 00 02 00",
	"02 04 03 00 00 00 05 00",
	"02 02 04 00 11 00 09 00",
	"02 02 06 00 03 00 0B 00",
	"02 02 08 00 28 00 0D 00",
	"02 05 1B 00 00 00 00 00",
	"02 01 63 00 2A 00 0F 00",
	"03 00 01 00 64 00 00 00",
	"03 01 FF FF 64 00 00 00",
	"03 02 02 00 05 00 00 00",
	"03 03 02 00 05 00 00 00",
	"03 04 FF FF 08 00 00 00",
	"03 05 FF FF 08 00 00 00",
	"03 07 FF FF 10 00 03 00",
	"03 09 00 00 2A 00 00 00",
];

fn map_labels() -> Vec<Label> {
	[
		(0, 1), (-1, -1), (0, 3), (1, 0), (0, 0), (-1, -1), (0, 2), (-1, -1),
		(0, 4), (0, 5), (-1, -1), (0, 6), (-1, -1), (0, 7), (-1, -1), (-1, -1),
	].into_iter().map(|(c, i)| Label::new(c, i)).collect()
}

fn map_flow(unseen: &mut Unseen) -> Result<Flow, Error> {
	let scripts = vec![ScriptEntry::from((0x0001_0000, 0)), ScriptEntry::from((0x0001_0001, 10))];
	Ok(Flow::read(0, &stream(MAP), map_labels(), scripts, unseen)?)
}

fn map_messages() -> MessageTable {
	let mut m = MessageTable::new();
	m.insert(0, vec!["Hey!".into(), "Where are\nyou going?".into()]);
	m
}

#[test]
fn every_variant() -> Result<(), Error> {
	let mut unseen = Unseen::new();
	let insns = check_roundtrip(&stream(MAP), &mut unseen)?;
	let names = insns.iter().map(Insn::name).collect::<Vec<_>>();
	assert_eq!(names, [
		"SAY", "SAY",
		"SW_RESP_2", "SW_RESP_3", "SW_RESP_4",
		"SW_P_FLAG", "SW_T_FLAG", "SW_T2_FLAG", "SW_SHOP", "SW",
		"DO_SET_P_FLAG", "DO_CLR_P_FLAG", "DO_SET_T2_FLAG", "DO_CLR_T2_FLAG",
		"DO_SET_T_FLAG", "DO_CLR_T_FLAG", "DO_SCRPT", "DO",
	]);
	assert_eq!(unseen.iter().collect::<Vec<_>>(), [
		(UnsupportedSubVariant::Condition(99), 1),
		(UnsupportedSubVariant::Action(9), 1),
	]);
	Ok(())
}

#[test_case("01 03 FF 7F 00 80 80 7F", "SAY"; "say extremes")]
#[test_case("02 00 00 00 FF FF FF FF", "SW"; "switch zero condition")]
#[test_case("02 FF 1B 00 03 00 FF FF", "SW_SHOP"; "shop with parameter")]
#[test_case("02 02 01 00 07 00 00 00", "SW_RESP_2"; "response with parameter")]
#[test_case("02 02 FF FF 01 00 00 00", "SW"; "switch max condition")]
#[test_case("03 06 00 00 00 00 00 00", "DO"; "action between flags and scripts")]
#[test_case("03 07 00 80 FF FF 00 00", "DO_SCRPT"; "script with half set")]
#[test_case("03 FF 00 00 FF FF FF FF", "DO"; "max action")]
fn single_word(word: &str, name: &str) -> Result<(), Error> {
	let insns = check_roundtrip(&stream(&[word]), &mut Unseen::new())?;
	assert_eq!(insns.len(), 1);
	assert_eq!(insns[0].name(), name);
	Ok(())
}

#[test]
fn rejected_streams() {
	let mut data = stream(MAP);
	assert!(check_roundtrip(&data[..data.len() - 3], &mut Unseen::new()).is_err());
	data[8 * 4] = 0x04;
	let err = check_roundtrip(&data, &mut Unseen::new()).unwrap_err();
	assert!(err.to_string().contains("instruction 4"), "{err}");
}

#[test]
fn listing() -> Result<(), Error> {
	let flow = map_flow(&mut Unseen::new())?;
	let (text, problems) = sandglass::to_string(&flow, Some(&map_messages()));
	let lines = text.lines().map(str::trim_end).collect::<Vec<_>>();
	assert_eq!(lines.len(), flow.insns.len() + flow.scripts.len());
	assert_eq!(lines[0], "S1_0:");
	assert_eq!(lines[1], "B0_L0:      SAY             msg=0/0, goto=END                   # \"Hey!\"");
	assert_eq!(lines[2], "B0_L1:      SAY             msg=0/1, goto=B0_L2                 # \"Where are you going?\"");

	let find = |prefix: &str| lines.iter().find(|l| l.starts_with(prefix)).copied().unwrap_or("");
	assert!(find("B0_L4:").contains("goto=[(first response):END, (second response):B0_L2, (third response):END, (fourth response):B0_L4]"));
	assert!(find("B0_L7:").ends_with("# checks temp2 flag @ +0x5, bit 0x01"));
	assert!(find("B0_L8:").contains("param=0, goto=[Castle Town Shop:B0_L1, Forest's General Store:END, Anouki General Store:B0_L3, Papuchia Shop:B1_L0, Goron Country Store:B0_L0]"));
	assert!(find("B0_L9:").contains("cond=99, param=42, goto=[0:END]"));
	assert!(find("B0_L10:").ends_with("# sets progress flag @ 0x21B5548, bit 0x10"));
	assert_eq!(lines[11], "S1_1:");
	assert!(find("B0_L16:").contains("script=S16_3, goto=END"));
	assert!(find("B0_L17:").contains("action=9, param=42, goto=B0_L1"));
	assert!(problems.is_empty(), "{problems:?}");
	Ok(())
}

#[test]
fn listing_survives_reencoding() -> Result<(), Error> {
	let flow = map_flow(&mut Unseen::new())?;
	let flow2 = Flow::read(flow.id, &flow.write(), flow.labels.clone(), flow.scripts.clone(), &mut ())?;
	check_equal(&flow, &flow2)?;
	let messages = map_messages();
	let (a, _) = sandglass::to_string(&flow, Some(&messages));
	let (b, _) = sandglass::to_string(&flow2, Some(&messages));
	check_text(&a, &b)?;
	Ok(())
}

#[test]
fn cross_container_labels() -> Result<(), Error> {
	let flow = map_flow(&mut Unseen::new())?;
	assert!(flow.validate_labels(|c| (c == 1).then_some(1)).is_empty());
	let errors = flow.validate_labels(|_| None);
	assert_eq!(errors.len(), 1);
	assert_eq!(errors[0].0, 3);
	Ok(())
}

#[test]
fn mismatches_are_reported() {
	assert!(check_text("a\nb\n", "a\nb\n").is_ok());
	assert!(check_text("a\nb\nc\n", "a\nx\nc\n").is_err());
	assert!(check_equal(&Label::END, &Label::new(0, 1)).is_err());
}
