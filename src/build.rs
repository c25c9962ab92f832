//! Conversion of a [`ParseTree`] into an [`Expr`], folding constant arithmetic along the way.
//!
//! Sums and products keep their random operands in the order they were written, with every constant operand combined
//! into a single residual number placed at the end (and left out entirely when it wouldn't change the result).
//! Subtraction becomes a sum with an operand multiplied by -1, and division becomes a product with an operand raised
//! to the power of -1.

#![cfg(feature = "parse")]

#[cfg(feature = "logging")]
use log::trace;

pub use crate::expr::BuildError as Error;
use crate::{
	dice::{
		hits::{Condition, Hits},
		Dice,
	},
	expr::{Expr, MathOp, Op},
	num::Number,
	parse::{AddOp, Entry, MulOp, Node, ParseTree, Roll, RollMod},
};

/// Builds an expression from a full parse tree. A tree with more than one entry becomes an [`Expr::Concat`], and
/// entries with comments become [`Expr::Commented`].
///
/// # Errors
/// If a number can't be represented, dice are invalid (too many dice, exploding on 1, rerolling more dice than are
/// rolled), a power doesn't have exactly two operands, or folding a constant part of the expression fails (such as
/// `1 / 0`), an error variant is returned.
///
/// # Examples
/// ```
/// use rollspec::{build::build, expr::Expr, parse::parse, Dice};
///
/// assert_eq!(build(parse("2 + 3")?)?, Expr::Num(5.into()));
/// assert_eq!(build(parse("1d6 + 0")?)?, Expr::Dice(Dice::new(1, 6)));
/// assert!(build(parse("2^3^4")?).is_err());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn build(tree: ParseTree<'_>) -> Result<Expr, Error> {
	let mut exprs = tree.entries.into_iter().map(build_entry).collect::<Result<Vec<_>, _>>()?;

	Ok(if exprs.len() == 1 {
		exprs.swap_remove(0)
	} else {
		Expr::Concat(exprs)
	})
}

/// Builds a single entry, wrapping it with its comments if it has any.
fn build_entry(entry: Entry<'_>) -> Result<Expr, Error> {
	let expr = build_node(entry.node)?;
	let pre = trim_comment(entry.pre_comment);
	let post = trim_comment(entry.post_comment);

	Ok(if pre.is_none() && post.is_none() {
		expr
	} else {
		Expr::Commented {
			expr: Box::new(expr),
			pre,
			post,
		}
	})
}

/// Trims a comment, treating blank comments as missing.
fn trim_comment(comment: Option<String>) -> Option<String> {
	comment
		.map(|comment| comment.trim().to_owned())
		.filter(|comment| !comment.is_empty())
}

/// Builds an expression from a single parse tree node.
pub fn build_node(node: Node<'_>) -> Result<Expr, Error> {
	Ok(match node {
		Node::Int(digits) => Expr::Num(Number::Int(
			digits.parse().map_err(|_err| Error::InvalidNumber(digits.to_owned()))?,
		)),
		Node::Decimal(digits) => match digits.parse::<f64>() {
			Ok(val) if val.is_finite() => Expr::Num(Number::Float(val)),
			_ => return Err(Error::InvalidNumber(digits)),
		},

		Node::Roll(roll) => Expr::Dice(build_dice(&roll)?),
		Node::Hits { roll, cmp, threshold } => {
			let cond = Condition::from_symbol_and_val(cmp, parse_u32(threshold)?)?;
			Expr::Hits(Hits::new(build_dice(&roll)?, cond))
		}
		Node::Nb { difficulty, count } => {
			let hits = Hits::nb(parse_u32(count)?, difficulty.threshold());
			hits.dice.validate()?;
			Expr::Hits(hits)
		}

		Node::Neg(node) => negate(build_node(*node)?)?,
		Node::Power(nodes) => {
			let operands = nodes.into_iter().map(build_node).collect::<Result<Vec<_>, _>>()?;
			power(operands)?
		}

		Node::Product(first, rest) => {
			let mut factors = Vec::with_capacity(rest.len() + 1);
			factors.push(build_node(*first)?);
			for (op, node) in rest {
				let factor = build_node(node)?;
				factors.push(match op {
					MulOp::Mul => factor,
					MulOp::Div => reciprocal(factor)?,
				});
			}
			fold(Op::Product, factors)?
		}

		Node::Sum(first, rest) => {
			let mut terms = Vec::with_capacity(rest.len() + 1);
			terms.push(build_node(*first)?);
			for (op, node) in rest {
				let term = build_node(node)?;
				terms.push(match op {
					AddOp::Add => term,
					AddOp::Sub => negate(term)?,
				});
			}
			fold(Op::Sum, terms)?
		}
	})
}

/// Builds and validates dice from a parsed roll.
fn build_dice(roll: &Roll<'_>) -> Result<Dice, Error> {
	let count = roll.count.map_or(Ok(1), parse_u32)?;
	let mut builder = Dice::builder().count(count).sides(parse_u32(roll.sides)?);

	if let Some((modifier, arg)) = roll.modifier {
		let arg = parse_u32(arg)?;
		builder = match modifier {
			RollMod::Explode => builder.explode(arg),
			RollMod::Highest => builder.keep_high(arg),
			RollMod::Lowest => builder.keep_low(arg),
			RollMod::Reroll => builder.reroll_lowest(arg),
		};
	}

	let dice = builder.build();
	dice.validate()?;
	Ok(dice)
}

/// Parses a count, number of sides, or threshold.
fn parse_u32(digits: &str) -> Result<u32, Error> {
	digits.parse().map_err(|_err| Error::InvalidNumber(digits.to_owned()))
}

/// Negates an expression: numbers are negated directly, anything else is multiplied by -1.
fn negate(expr: Expr) -> Result<Expr, Error> {
	Ok(match expr {
		Expr::Num(x) => Expr::Num(x.checked_neg()?),
		expr => Expr::Math(MathOp::new(Op::Product, vec![Expr::Num(Number::Int(-1)), expr])?),
	})
}

/// Inverts an expression: numbers are divided into 1 directly, anything else is raised to the power of -1.
fn reciprocal(expr: Expr) -> Result<Expr, Error> {
	Ok(match expr {
		Expr::Num(x) => Expr::Num(Number::ONE.checked_div(x)?),
		expr => Expr::Math(MathOp::new(Op::Power, vec![expr, Expr::Num(Number::Int(-1))])?),
	})
}

/// Raises the first operand to the power of the second, computing it right away if both are numbers.
fn power(operands: Vec<Expr>) -> Result<Expr, Error> {
	if let [Expr::Num(base), Expr::Num(exp)] = operands.as_slice() {
		return Ok(Expr::Num(base.checked_pow(*exp)?));
	}
	Ok(Expr::Math(MathOp::new(Op::Power, operands)?))
}

/// Combines the operands of a sum or product, folding all of the constant ones into a single residual.
/// The residual is appended after the random operands unless it's the identity of the operation, and an operation
/// left with a single operand collapses into it.
fn fold(op: Op, operands: Vec<Expr>) -> Result<Expr, Error> {
	let identity = match op {
		Op::Sum => Number::ZERO,
		Op::Product => Number::ONE,
		Op::Power => return power(operands),
	};

	let mut residual = identity;
	let mut random = Vec::with_capacity(operands.len());
	for operand in operands {
		match operand {
			Expr::Num(x) => {
				residual = match op {
					Op::Product => residual.checked_mul(x)?,
					_ => residual.checked_add(x)?,
				};
			}
			operand => random.push(operand),
		}
	}

	#[cfg(feature = "logging")]
	trace!(
		"folded constants of {op} into {residual}, leaving {} random operand(s)",
		random.len()
	);

	if random.is_empty() {
		return Ok(Expr::Num(residual));
	}
	if residual != identity {
		random.push(Expr::Num(residual));
	}

	Ok(if random.len() == 1 {
		random.swap_remove(0)
	} else {
		Expr::Math(MathOp::new(op, random)?)
	})
}
