use crate::parse::{context_window, parse, AddOp, Difficulty, MulOp, Node, Roll, RollMod};

#[test]
fn single_die_defaults_count() {
	let tree = parse("d20").unwrap();
	assert_eq!(tree.entries.len(), 1);
	assert_eq!(
		tree.entries[0].node,
		Node::Roll(Roll {
			count: None,
			sides: "20",
			modifier: None,
		})
	);
}

#[test]
fn dice_with_modifiers() {
	for (input, modifier) in [
		("2d10 explode 10", (RollMod::Explode, "10")),
		("4d6 highest 3", (RollMod::Highest, "3")),
		("4d6 lowest 1", (RollMod::Lowest, "1")),
		("4D6 reroll 2", (RollMod::Reroll, "2")),
	] {
		let tree = parse(input).unwrap();
		match &tree.entries[0].node {
			Node::Roll(roll) => assert_eq!(roll.modifier, Some(modifier)),
			node => panic!("unexpected node for {input}: {node:?}"),
		}
	}
}

#[test]
fn whitespace_inside_rolls() {
	for (input, count) in [("4 d6", Some("4")), ("d 6", None), ("4 D 6", Some("4")), ("  4d  6  ", Some("4"))] {
		let tree = parse(input).unwrap();
		assert_eq!(
			tree.entries[0].node,
			Node::Roll(Roll {
				count,
				sides: "6",
				modifier: None,
			}),
			"{input:?}"
		);
	}

	let tree = parse("2 d 6 explode 6 >= 5").unwrap();
	assert!(matches!(
		&tree.entries[0].node,
		Node::Hits { roll: Roll { count: Some("2"), sides: "6", modifier: Some((RollMod::Explode, "6")) }, .. }
	));
}

#[test]
fn sums_keep_operand_order() {
	let tree = parse("1 - 2 + 3").unwrap();
	assert_eq!(
		tree.entries[0].node,
		Node::Sum(
			Box::new(Node::Int("1")),
			vec![(AddOp::Sub, Node::Int("2")), (AddOp::Add, Node::Int("3"))]
		)
	);
}

#[test]
fn products_bind_tighter_than_sums() {
	let tree = parse("d20+2*3/4").unwrap();
	assert_eq!(
		tree.entries[0].node,
		Node::Sum(
			Box::new(Node::Roll(Roll {
				count: None,
				sides: "20",
				modifier: None,
			})),
			vec![(
				AddOp::Add,
				Node::Product(
					Box::new(Node::Int("2")),
					vec![(MulOp::Mul, Node::Int("3")), (MulOp::Div, Node::Int("4"))]
				)
			)]
		)
	);
}

#[test]
fn powers_are_listed() {
	let tree = parse("2^3^4").unwrap();
	assert_eq!(
		tree.entries[0].node,
		Node::Power(vec![Node::Int("2"), Node::Int("3"), Node::Int("4")])
	);
}

#[test]
fn negation_and_grouping() {
	let tree = parse("-(1 + 2.5)").unwrap();
	assert_eq!(
		tree.entries[0].node,
		Node::Neg(Box::new(Node::Sum(
			Box::new(Node::Int("1")),
			vec![(AddOp::Add, Node::Decimal("2.5".to_owned()))]
		)))
	);
}

#[test]
fn hit_checks() {
	for (input, symbol) in [
		("3d6 >= 5", ">="),
		("3d6>=5", ">="),
		("3d6 ≥ 5", "≥"),
		("3d6 != 5", "!="),
		("3d6 ≠ 5", "≠"),
		("3d6 == 5", "=="),
		("3d6 = 5", "="),
		("3d6 < 5", "<"),
	] {
		let tree = parse(input).unwrap();
		match &tree.entries[0].node {
			Node::Hits { roll, cmp, threshold } => {
				assert_eq!(roll.count, Some("3"));
				assert_eq!(*cmp, symbol);
				assert_eq!(*threshold, "5");
			}
			node => panic!("unexpected node for {input}: {node:?}"),
		}
	}
}

#[test]
fn hit_checks_on_modified_dice() {
	let tree = parse("4d6 highest 2 > 4").unwrap();
	assert!(matches!(
		&tree.entries[0].node,
		Node::Hits { roll: Roll { modifier: Some((RollMod::Highest, "2")), .. }, cmp: ">", threshold: "4" }
	));
}

#[test]
fn nb_checks() {
	let tree = parse("nb hard 4").unwrap();
	assert_eq!(
		tree.entries[0].node,
		Node::Nb {
			difficulty: Difficulty::Hard,
			count: "4",
		}
	);
	assert_eq!(Difficulty::Easy.threshold(), 4);
	assert_eq!(Difficulty::Normal.threshold(), 5);
	assert_eq!(Difficulty::Hard.threshold(), 6);
}

#[test]
fn lists_and_comments() {
	let tree = parse("attack: d20 + 5 # longsword, damage: 2d6, d4 # extra").unwrap();
	assert_eq!(tree.entries.len(), 3);

	assert_eq!(tree.entries[0].pre_comment.as_deref(), Some("attack"));
	assert_eq!(tree.entries[0].post_comment.as_deref(), Some(" longsword"));
	assert_eq!(tree.entries[1].pre_comment.as_deref(), Some(" damage"));
	assert_eq!(tree.entries[1].post_comment, None);
	assert_eq!(tree.entries[2].pre_comment, None);
	assert_eq!(tree.entries[2].post_comment.as_deref(), Some(" extra"));
}

#[test]
fn unexpected_token() {
	let err = parse("d20 + + 12").unwrap_err();
	assert_eq!(err.excerpt, "+");
	assert!(err.context.contains('^'));
	assert!(!err.message.is_empty());
}

#[test]
fn misspelled_modifier() {
	let err = parse("4d6 highets 3").unwrap_err();
	assert!(err.span.start >= 4);
	assert!(err.context.starts_with("4d6 highets 3\n"));
	assert!(err.context.ends_with("^\n"));
}

#[test]
fn invalid_inputs() {
	for input in ["", "d", "0d6", "d0", "3d6 >=", "nb impossible 3", "(d20", "d20)", "2 ^", "roll d20"] {
		assert!(parse(input).is_err(), "{input:?} should fail to parse");
	}
	assert_eq!(parse("").unwrap_err().excerpt, "end of input");
}

#[test]
fn context_window_is_bounded() {
	let input = format!("{}+{}", "1".repeat(30), "2".repeat(30));
	let context = context_window(&input, 30, 20);
	assert_eq!(context, format!("{}+{}\n{}^\n", "1".repeat(20), "2".repeat(19), " ".repeat(20)));
}

#[test]
fn context_window_stays_on_one_line() {
	assert_eq!(context_window("d20\n+ x\n2", 6, 20), "+ x\n  ^\n");
}

#[test]
fn context_window_counts_characters() {
	assert_eq!(context_window("3d6 ≥ x", 8, 20), "3d6 ≥ x\n      ^\n");
}
