use crate::{
	dice::{
		hits::{Condition, Hits},
		roller::{FastRand as FastRandRoller, Iter as IterRoller, Val as ValRoller},
		Dice,
	},
	expr::{BuildError, CalcError, Describe, EvalError, Evaled, Expr, MathOp, Op},
	num::{Number, Value},
};

#[test]
fn basic_addition() {
	let expr = math(Op::Sum, vec![num(42), num(69)]);
	let result = expr.eval(&mut FastRandRoller::default()).unwrap().calc();
	assert_eq!(result.unwrap(), Value::Num(Number::Int(111)));
}

#[test]
fn basic_multiplication() {
	let expr = math(Op::Product, vec![num(42), num(69)]);
	let result = expr.eval(&mut FastRandRoller::default()).unwrap().calc();
	assert_eq!(result.unwrap(), Value::Num(Number::Int(2898)));
}

#[test]
fn basic_power() {
	let expr = math(Op::Power, vec![num(2), num(10)]);
	let result = expr.eval(&mut FastRandRoller::default()).unwrap().calc();
	assert_eq!(result.unwrap(), Value::Num(Number::Int(1024)));
}

#[test]
fn power_needs_two_operands() {
	assert!(matches!(
		MathOp::new(Op::Power, vec![num(2), num(3), num(4)]),
		Err(BuildError::PowerArity(3))
	));
	assert!(matches!(MathOp::new(Op::Power, vec![num(2)]), Err(BuildError::PowerArity(1))));
	assert!(MathOp::new(Op::Sum, vec![num(2), num(3), num(4)]).is_ok());
}

#[test]
fn dividing_dice_promotes() {
	let expr = math(Op::Power, vec![Expr::Dice(Dice::new(1, 4)), num(-1)]);
	let result = expr.eval(&mut ValRoller(4)).unwrap().calc();
	assert_eq!(result.unwrap(), Value::Num(Number::Float(0.25)));
}

#[test]
fn basic_dice_math() {
	let expr = math(Op::Sum, vec![Expr::Dice(Dice::new(4, 6)), num(8)]);
	let evaled = expr.eval(&mut FastRandRoller::default()).unwrap();

	let dice_total = match &evaled {
		Evaled::Math { operands, .. } => match &operands[0] {
			Evaled::Dice(rolled) => i64::try_from(rolled.total().unwrap()).unwrap(),
			_ => panic!("expected dice"),
		},
		_ => panic!("expected math"),
	};

	let total = evaled.calc().unwrap();
	assert_eq!(total, Value::Num(Number::Int(dice_total + 8)));
}

#[test]
fn hits_are_worth_their_count() {
	let expr = math(
		Op::Product,
		vec![Expr::Hits(Hits::new(Dice::new(3, 6), Condition::Gte(5))), num(10)],
	);
	let evaled = expr.eval(&mut IterRoller::new([5, 2, 6])).unwrap();
	assert_eq!(evaled.calc().unwrap(), Value::Num(Number::Int(20)));
	assert_eq!(evaled.to_string(), "(**5** ~~2~~ **6** => **2 hits**) * 10");
}

#[test]
fn eval_overflow() {
	let expr = math(Op::Sum, vec![num(i64::MAX), Expr::Dice(Dice::new(1, 6))]);
	let result = expr.eval(&mut ValRoller(1)).unwrap().calc();
	assert!(matches!(result, Err(CalcError::Overflow)));
	assert!(result.unwrap_err().to_string().contains("overflow"));
}

#[test]
fn eval_division_by_zero() {
	let expr = math(Op::Power, vec![Expr::Dice(Dice::new(1, 6)), num(-1)]);
	let result = expr.eval(&mut ValRoller(0)).unwrap().calc();
	assert!(matches!(result, Err(CalcError::Division)));
}

#[test]
fn eval_dice_error() {
	let expr = Expr::Dice(Dice::builder().count(2).sides(6).reroll_lowest(3).build());
	assert!(matches!(expr.eval(&mut ValRoller(3)), Err(EvalError::Dice(..))));
}

#[test]
fn concat_is_evaluated_in_order() {
	let expr = Expr::Concat(vec![Expr::Dice(Dice::new(1, 6)), Expr::Dice(Dice::new(1, 8))]);
	let evaled = expr.eval(&mut IterRoller::new([2, 7])).unwrap();

	assert_eq!(
		evaled.calc().unwrap(),
		Value::List(vec![Value::Num(Number::Int(2)), Value::Num(Number::Int(7))])
	);
	assert_eq!(evaled.to_string(), "(**2**),  (**7**)");
	assert_eq!(expr.to_string(), "1d6,  1d8");
}

#[test]
fn lists_cant_be_used_in_math() {
	let expr = math(Op::Sum, vec![Expr::Concat(vec![num(1), num(2)]), num(3)]);
	let result = expr.eval(&mut FastRandRoller::default()).unwrap().calc();
	assert!(matches!(result, Err(CalcError::NotANumber)));
}

#[test]
fn nested_operations_are_grouped() {
	let expr = math(
		Op::Sum,
		vec![
			math(Op::Product, vec![Expr::Dice(Dice::new(2, 6)), num(3)]),
			math(Op::Sum, vec![Expr::Dice(Dice::new(1, 4)), num(1)]),
		],
	);
	assert_eq!(expr.to_string(), "(2d6 * 3) + 1d4 + 1");

	let evaled = expr.eval(&mut ValRoller(2)).unwrap();
	assert_eq!(evaled.to_string(), "((2 + 2 => **4**) * 3) + (**2**) + 1");
	assert_eq!(evaled.calc().unwrap(), Value::Num(Number::Int(15)));
}

#[test]
fn powers_of_operations_are_grouped() {
	let expr = math(
		Op::Power,
		vec![math(Op::Sum, vec![Expr::Dice(Dice::new(1, 6)), num(1)]), num(2)],
	);
	assert_eq!(expr.to_string(), "(1d6 + 1) ^ 2");
}

#[test]
fn comments_wrap_notation_and_trace() {
	let expr = Expr::Commented {
		expr: Box::new(math(Op::Sum, vec![Expr::Dice(Dice::new(1, 20)), num(5)])),
		pre: Some("attack".to_owned()),
		post: Some("longsword".to_owned()),
	};
	assert_eq!(expr.to_string(), "attack : 1d20 + 5 # longsword");

	let evaled = expr.eval(&mut ValRoller(11)).unwrap();
	assert_eq!(evaled.describe(None), "attack : (**11**) + 5 # longsword");
	assert_eq!(evaled.calc().unwrap(), Value::Num(Number::Int(16)));
}

#[test]
fn evaluation_leaves_expression_untouched() {
	let expr = Expr::Dice(Dice::new(1, 6));
	let before = expr.clone();
	let mut rng = IterRoller::new([1, 6]);

	let first = expr.eval(&mut rng).unwrap().into_owned();
	let second = expr.eval(&mut rng).unwrap();

	assert_eq!(expr, before);
	assert_eq!(first.to_string(), "(**1**)");
	assert_eq!(second.to_string(), "(**6**)");
	assert_ne!(first, second);
}

#[test]
fn determinism() {
	assert!(num(4).is_deterministic());
	assert!(math(Op::Sum, vec![num(1), num(2)]).is_deterministic());
	assert!(Expr::Dice(Dice::new(1, 6)).is_random());
	assert!(Expr::Hits(Hits::nb(3, 4)).is_random());
	assert!(math(Op::Sum, vec![num(1), Expr::Dice(Dice::new(1, 6))]).is_random());
	assert!(Expr::Concat(vec![num(1), Expr::Dice(Dice::new(1, 6))]).is_random());
}

fn num(x: i64) -> Expr {
	Expr::Num(Number::Int(x))
}

fn math(op: Op, operands: Vec<Expr>) -> Expr {
	Expr::Math(MathOp::new(op, operands).unwrap())
}
