use crate::{
	build::{build, Error},
	dice::{
		hits::{Condition, Hits},
		Dice, Error as DiceError,
	},
	expr::{CalcError, Expr, Op},
	num::Number,
	parse::parse,
};

#[test]
fn constants_fold_completely() {
	let expr = build_str("2+3");
	assert_eq!(expr, Expr::Num(Number::Int(5)));
	assert!(expr.is_deterministic());

	assert_eq!(build_str("-5 * (3 + 1) - -4 / 2"), Expr::Num(Number::Float(-18.0)));
	assert_eq!(build_str("2^10"), Expr::Num(Number::Int(1024)));
	assert_eq!(build_str("6 / 4").to_string(), "1.5");
	assert_eq!(build_str("1^99999999999"), Expr::Num(Number::Int(1)));
	assert_eq!(build_str("10000000000000000 / 1").to_string(), "1e+16");
}

#[test]
fn identity_residual_folds_away() {
	assert_eq!(build_str("1d6+0"), Expr::Dice(Dice::new(1, 6)));
	assert_eq!(build_str("1d6*1"), Expr::Dice(Dice::new(1, 6)));
}

#[test]
fn residual_goes_last() {
	let expr = build_str("2 + d20 + 3");
	assert_eq!(expr.to_string(), "1d20 + 5");
	assert!(expr.is_random());

	assert_eq!(build_str("d20 - 1").to_string(), "1d20 + -1");
	assert_eq!(build_str("3 * 4d6 * 2").to_string(), "4d6 * 6");
}

#[test]
fn subtraction_and_division_of_dice() {
	assert_eq!(build_str("d20 - d4").to_string(), "1d20 + (-1 * 1d4)");
	assert_eq!(build_str("-d6").to_string(), "-1 * 1d6");
	assert_eq!(build_str("2d6 / 2").to_string(), "2d6 * 0.5");
	assert_eq!(build_str("10 / d4").to_string(), "(1d4 ^ -1) * 10");
}

#[test]
fn powers() {
	let expr = build_str("d6^2");
	match &expr {
		Expr::Math(math) => {
			assert_eq!(math.op(), Op::Power);
			assert_eq!(math.operands(), &[Expr::Dice(Dice::new(1, 6)), Expr::Num(Number::Int(2))]);
		}
		_ => panic!("expected a power, got {expr:?}"),
	}

	assert!(matches!(build(parse("2^3^4").unwrap()), Err(Error::PowerArity(3))));
	assert!(matches!(build(parse("d6^2^3").unwrap()), Err(Error::PowerArity(3))));
}

#[test]
fn dice_modifiers() {
	assert_eq!(
		build_str("4d6 highest 3"),
		Expr::Dice(Dice::builder().count(4).sides(6).keep_high(3).build())
	);
	assert_eq!(
		build_str("2d10 explode 10"),
		Expr::Dice(Dice::builder().count(2).sides(10).explode(10).build())
	);
	assert_eq!(
		build_str("4d6 reroll 1"),
		Expr::Dice(Dice::builder().count(4).sides(6).reroll_lowest(1).build())
	);
}

#[test]
fn invalid_dice() {
	assert!(matches!(
		build(parse("2d6 explode 1").unwrap()),
		Err(Error::Dice(DiceError::InfiniteRolls(..)))
	));
	assert!(matches!(
		build(parse("2d6 reroll 3").unwrap()),
		Err(Error::Dice(DiceError::TooManyRerolls(..)))
	));
}

#[test]
fn invalid_constants() {
	assert!(matches!(build(parse("1/0").unwrap()), Err(Error::Calc(CalcError::Division))));
	assert!(matches!(
		build(parse("99999999999999999999").unwrap()),
		Err(Error::InvalidNumber(..))
	));
	assert!(matches!(build(parse("d99999999999").unwrap()), Err(Error::InvalidNumber(..))));
}

#[test]
fn hit_checks() {
	assert_eq!(
		build_str("3d6 >= 5"),
		Expr::Hits(Hits::new(Dice::new(3, 6), Condition::Gte(5)))
	);
	assert_eq!(
		build_str("3d6 ≠ 2"),
		Expr::Hits(Hits::new(Dice::new(3, 6), Condition::Ne(2)))
	);
	assert_eq!(build_str("nb easy 3"), Expr::Hits(Hits::nb(3, 4)));
	assert_eq!(build_str("nb normal 3"), Expr::Hits(Hits::nb(3, 5)));
	assert_eq!(build_str("nb hard 3"), Expr::Hits(Hits::nb(3, 6)));
}

#[test]
fn lists_and_comments() {
	assert_eq!(
		build_str("d6,d8"),
		Expr::Concat(vec![Expr::Dice(Dice::new(1, 6)), Expr::Dice(Dice::new(1, 8))])
	);

	assert_eq!(
		build_str("attack : d20 #  sword "),
		Expr::Commented {
			expr: Box::new(Expr::Dice(Dice::new(1, 20))),
			pre: Some("attack".to_owned()),
			post: Some("sword".to_owned()),
		}
	);

	// Blank comments are dropped
	assert_eq!(build_str(" : d20 #"), Expr::Dice(Dice::new(1, 20)));
}

#[test]
fn notation_round_trips() {
	for input in [
		"d20+12",
		"4d6 highest 3",
		"2d10 explode 10",
		"3d6 >= 5",
		"d6,d8,d10",
		"(2d6 + 3) * 2",
		"d20 - 1",
		"2d6 ^ 2",
		"attack: d20 + 5 # longsword",
	] {
		let notation = build_str(input).to_string();
		assert_eq!(build_str(&notation).to_string(), notation, "{input:?} didn't round trip");
		assert_eq!(build_str(&input.replace(' ', "")).to_string(), notation);
	}
}

fn build_str(input: &str) -> Expr {
	build(parse(input).unwrap()).unwrap()
}
