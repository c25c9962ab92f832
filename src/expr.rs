//! AST-like data structures for evaluating full dice expressions and working with their results.
//!
//! An [`Expr`] is built once and never changes. Evaluating it with [`Expr::eval()`] rolls any dice it contains and
//! produces a separate [`Evaled`] tree holding the outcome of every node, which can then be totalled with
//! [`Evaled::calc()`] and traced with [`Describe::describe()`].

use std::{borrow::Cow, fmt};

use crate::{
	dice::{
		hits::{Hits, HitsRolled},
		Dice, Error as DiceError, Roller, Rolled,
	},
	num::{Number, Value},
};

/// Separator between the independent entries of a comma-separated expression
pub const CONCAT_SEPARATOR: &str = ",  ";

/// Arithmetic operation applied to an ordered list of operands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "Subtraction and division are expressed through these")]
pub enum Op {
	/// Sum of all operands. Subtraction is a sum with a negated operand.
	Sum,

	/// Product of all operands. Division is a product with an operand raised to the power of -1.
	Product,

	/// First operand raised to the power of the second
	Power,
}

impl Op {
	/// Gets the symbol that represents the operation.
	#[must_use]
	pub const fn symbol(self) -> char {
		match self {
			Self::Sum => '+',
			Self::Product => '*',
			Self::Power => '^',
		}
	}
}

impl fmt::Display for Op {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.symbol())
	}
}

/// An arithmetic operation along with its operands. Construction is checked, so a power always has exactly two.
#[derive(Debug, Clone, PartialEq)]
pub struct MathOp {
	/// Operation to apply
	op: Op,

	/// Operands, in the order they were written
	operands: Vec<Expr>,
}

impl MathOp {
	/// Creates a new operation over a list of operands.
	///
	/// # Errors
	/// If the operation is [`Op::Power`] and there aren't exactly two operands, an error variant is returned.
	///
	/// # Examples
	/// ```
	/// use rollspec::{expr::{BuildError, Expr, MathOp, Op}, Dice};
	///
	/// let dice = Expr::Dice(Dice::new(1, 6));
	/// assert!(MathOp::new(Op::Power, vec![dice.clone(), Expr::Num(2.into())]).is_ok());
	/// assert!(matches!(MathOp::new(Op::Power, vec![dice]), Err(BuildError::PowerArity(1))));
	/// ```
	pub fn new(op: Op, operands: Vec<Expr>) -> Result<Self, BuildError> {
		if op == Op::Power && operands.len() != 2 {
			return Err(BuildError::PowerArity(operands.len()));
		}
		Ok(Self { op, operands })
	}

	/// Gets the operation.
	#[must_use]
	#[inline]
	pub const fn op(&self) -> Op {
		self.op
	}

	/// Gets the operands.
	#[must_use]
	#[inline]
	pub fn operands(&self) -> &[Expr] {
		&self.operands
	}
}

/// Individual elements of a full dice expression
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Expr {
	/// Standalone number
	Num(Number),

	/// Dice roll, optionally with a modifier (exploding, keep highest/lowest, reroll lowest)
	Dice(Dice),

	/// Number of rolled dice that pass a condition
	Hits(Hits),

	/// Arithmetic on a list of operands
	Math(MathOp),

	/// Independent expressions, evaluated separately (written separated by commas)
	Concat(Vec<Self>),

	/// Expression with display-only comments before and/or after it
	Commented {
		/// Expression being commented on
		expr: Box<Self>,

		/// Comment written before the expression (`pre: expr`)
		pre: Option<String>,

		/// Comment written after the expression (`expr # post`)
		post: Option<String>,
	},
}

impl Expr {
	/// Evaluates the expression. For most types of expressions, this will directly result in a 1:1 equivalent
	/// [`Evaled`], with the notable exception of [`Expr::Dice`] and [`Expr::Hits`]. For those, the dice they contain
	/// are rolled, resulting in an [`Evaled::Dice`] or [`Evaled::Hits`] with the rolled set of dice.
	///
	/// Evaluation never modifies the expression, so it can be evaluated any number of times, each time producing a
	/// new independent result.
	///
	/// # Errors
	/// If an error occurs during dice rolling, an error variant will be returned.
	///
	/// # Examples
	/// ```
	/// use rollspec::{dice::roller::Max as MaxRoller, expr::{Expr, MathOp, Op}, num::Value, Dice};
	///
	/// let expr = Expr::Math(MathOp::new(Op::Sum, vec![Expr::Dice(Dice::new(2, 6)), Expr::Num(3.into())])?);
	/// let evaled = expr.eval(&mut MaxRoller)?;
	/// assert_eq!(evaled.calc()?, Value::Num(15.into()));
	/// assert_eq!(evaled.to_string(), "(6 + 6 => **12**) + 3");
	/// # Ok::<(), Box<dyn std::error::Error>>(())
	/// ```
	pub fn eval(&self, rng: &mut impl Roller) -> Result<Evaled<'_>, EvalError> {
		Ok(match self {
			Self::Num(x) => Evaled::Num(*x),
			Self::Dice(dice) => Evaled::Dice(rng.roll(dice, true).map_err(|err| EvalError::Dice(self.clone(), err))?),
			Self::Hits(hits) => Evaled::Hits(hits.roll(rng).map_err(|err| EvalError::Dice(self.clone(), err))?),

			Self::Math(math) => Evaled::Math {
				op: math.op,
				operands: math
					.operands
					.iter()
					.map(|operand| operand.eval(&mut *rng))
					.collect::<Result<_, _>>()?,
			},

			Self::Concat(exprs) => Evaled::Concat(exprs.iter().map(|expr| expr.eval(&mut *rng)).collect::<Result<_, _>>()?),

			Self::Commented { expr, pre, post } => Evaled::Commented {
				evaled: Box::new(expr.eval(rng)?),
				pre: pre.as_deref().map(Cow::Borrowed),
				post: post.as_deref().map(Cow::Borrowed),
			},
		})
	}

	/// Checks whether the expression is deterministic (will always yield the same value with every evaluation).
	/// A [`Self::Num`] will always return `true`, dice and hit checks always return `false`, and all other
	/// expressions forward the check to their children.
	#[must_use]
	pub fn is_deterministic(&self) -> bool {
		match self {
			Self::Num(..) => true,
			Self::Dice(..) | Self::Hits(..) => false,
			Self::Math(math) => math.operands.iter().all(Self::is_deterministic),
			Self::Concat(exprs) => exprs.iter().all(Self::is_deterministic),
			Self::Commented { expr, .. } => expr.is_deterministic(),
		}
	}

	/// Checks whether the expression involves any randomness. This is the direct inverse of
	/// [`Self::is_deterministic()`].
	#[must_use]
	#[inline]
	pub fn is_random(&self) -> bool {
		!self.is_deterministic()
	}
}

impl fmt::Display for Expr {
	/// Formats the expression in dice notation, independent of any evaluation.
	/// Nested operations are grouped with parentheses whenever their operation differs from the one containing them.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Num(x) => write!(f, "{x}"),
			Self::Dice(dice) => write!(f, "{dice}"),
			Self::Hits(hits) => write!(f, "{hits}"),
			Self::Math(math) => write!(f, "{}", describe_math(math.op, &math.operands, ToString::to_string)),
			Self::Concat(exprs) => write!(
				f,
				"{}",
				exprs
					.iter()
					.map(ToString::to_string)
					.collect::<Vec<_>>()
					.join(CONCAT_SEPARATOR)
			),
			Self::Commented { expr, pre, post } => {
				write!(f, "{}", comment_wrap(expr.to_string(), pre.as_deref(), post.as_deref()))
			}
		}
	}
}

impl From<Number> for Expr {
	fn from(num: Number) -> Self {
		Self::Num(num)
	}
}

impl From<Dice> for Expr {
	fn from(dice: Dice) -> Self {
		Self::Dice(dice)
	}
}

impl From<Hits> for Expr {
	fn from(hits: Hits) -> Self {
		Self::Hits(hits)
	}
}

impl From<MathOp> for Expr {
	fn from(math: MathOp) -> Self {
		Self::Math(math)
	}
}

/// Individual elements of an evaluated dice expression
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Evaled<'a> {
	/// Standalone number
	Num(Number),

	/// Rolled dice
	Dice(Rolled<'a>),

	/// Rolled hit-counting check
	Hits(HitsRolled<'a>),

	/// Arithmetic on a list of evaluated operands
	Math {
		/// Operation to apply
		op: Op,

		/// Evaluated operands
		operands: Vec<Self>,
	},

	/// Independently evaluated expressions
	Concat(Vec<Self>),

	/// Evaluated expression with display-only comments
	Commented {
		/// Evaluated expression being commented on
		evaled: Box<Self>,

		/// Comment written before the expression
		pre: Option<Cow<'a, str>>,

		/// Comment written after the expression
		post: Option<Cow<'a, str>>,
	},
}

impl Evaled<'_> {
	/// Calculates the final result of the evaluated expression and all of its children (if any).
	/// Dice are worth the total of their kept rolls and hit checks are worth their number of hits.
	/// Only [`Self::Concat`] results in a [`Value::List`].
	///
	/// # Errors
	/// If there is an integer overflow, division by zero, a result that isn't a real number, or an error calculating
	/// the total of a set of dice rolls, an error variant will be returned.
	pub fn calc(&self) -> Result<Value, CalcError> {
		Ok(match self {
			Self::Num(x) => Value::Num(*x),
			Self::Dice(rolled) => {
				let total = rolled.total().map_err(CalcError::Dice)?;
				Value::Num(Number::Int(i64::try_from(total).map_err(|_err| CalcError::Overflow)?))
			}
			Self::Hits(hits) => Value::Num(Number::Int(hits.count().into())),

			Self::Math { op, operands } => {
				let vals = operands
					.iter()
					.map(|operand| operand.calc()?.into_num())
					.collect::<Result<Vec<_>, _>>()?;

				Value::Num(match op {
					Op::Sum => vals.into_iter().try_fold(Number::ZERO, Number::checked_add)?,
					Op::Product => vals.into_iter().try_fold(Number::ONE, Number::checked_mul)?,
					Op::Power => match vals.as_slice() {
						[base, exp] => base.checked_pow(*exp)?,
						_ => return Err(CalcError::PowerArity(vals.len())),
					},
				})
			}

			Self::Concat(evaled) => Value::List(evaled.iter().map(Self::calc).collect::<Result<_, _>>()?),
			Self::Commented { evaled, .. } => evaled.calc()?,
		})
	}

	/// Moves all of self's owned data into a new instance and clones any unowned data in order to create a `'static`
	/// instance of self.
	#[must_use]
	pub fn into_owned(self) -> Evaled<'static> {
		match self {
			Self::Num(x) => Evaled::Num(x),
			Self::Dice(rolled) => Evaled::Dice(rolled.into_owned()),
			Self::Hits(hits) => Evaled::Hits(hits.into_owned()),
			Self::Math { op, operands } => Evaled::Math {
				op,
				operands: operands.into_iter().map(Self::into_owned).collect(),
			},
			Self::Concat(evaled) => Evaled::Concat(evaled.into_iter().map(Self::into_owned).collect()),
			Self::Commented { evaled, pre, post } => Evaled::Commented {
				evaled: Box::new(evaled.into_owned()),
				pre: pre.map(|pre| Cow::Owned(pre.into_owned())),
				post: post.map(|post| Cow::Owned(post.into_owned())),
			},
		}
	}
}

impl Describe for Evaled<'_> {
	/// Builds a trace of the evaluated expression, showing every individual roll: dropped rolls are struck through,
	/// rolls that exploded are italicized, and hits are bold.
	fn describe(&self, list_limit: Option<usize>) -> String {
		match self {
			Self::Num(x) => x.to_string(),
			Self::Dice(rolled) => rolled.describe(list_limit),
			Self::Hits(hits) => hits.describe(list_limit),
			Self::Math { op, operands } => describe_math(*op, operands, |operand| operand.describe(list_limit)),
			Self::Concat(evaled) => evaled
				.iter()
				.map(|evaled| evaled.describe(list_limit))
				.collect::<Vec<_>>()
				.join(CONCAT_SEPARATOR),
			Self::Commented { evaled, pre, post } => {
				comment_wrap(evaled.describe(list_limit), pre.as_deref(), post.as_deref())
			}
		}
	}
}

impl fmt::Display for Evaled<'_> {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The output of this implementation is equivalent to [`Self::describe(None)`].
	///
	/// [`Self::describe(None)`]: Self::describe()
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.describe(None))
	}
}

/// Error that can occur while building an [`Expr`]: the expression is well-formed, but one of its parts breaks a rule
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum BuildError {
	/// Raising to a power needs exactly two operands.
	#[error("raising to a power needs exactly two operands, got {0}")]
	PowerArity(usize),

	/// The dice are invalid (such as exploding on 1, or rerolling more dice than are rolled).
	#[error(transparent)]
	Dice(#[from] DiceError),

	/// A number in the expression couldn't be represented.
	#[error("invalid number \"{0}\"")]
	InvalidNumber(String),

	/// Calculating a constant part of the expression failed.
	#[error("unable to calculate a constant part of the expression: {0}")]
	Calc(#[from] CalcError),
}

/// Error that can occur during [`Expr::eval()`]
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum EvalError {
	/// Dice-related error (likely during rolling)
	#[error("dice error while evaluating \"{0}\": {1}")]
	Dice(Expr, #[source] DiceError),
}

/// Error that can occur during [`Evaled::calc()`] or arithmetic on a [`Number`]
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum CalcError {
	/// Dice-related error (likely during totalling)
	#[error("dice error while calculating: {0}")]
	Dice(#[source] DiceError),

	/// Integer overflow (likely during calculation of a sum, product or power)
	#[error("integer overflow")]
	Overflow,

	/// Division by zero (including raising zero to a negative power)
	#[error("division by zero")]
	Division,

	/// The result isn't a real number (such as a fractional power of a negative number)
	#[error("result is not a real number")]
	NotReal,

	/// A list of results was used where a single number was needed.
	#[error("a list of results can't be used in arithmetic")]
	NotANumber,

	/// A power was evaluated without exactly two operands.
	#[error("raising to a power needs exactly two operands, got {0}")]
	PowerArity(usize),
}

/// Trait that offers information about the arithmetic operation of an expression, if it is one
pub trait HasOp {
	/// Gets the operation of this expression, or `None` if it isn't an arithmetic operation.
	fn op(&self) -> Option<Op>;
}

impl HasOp for Expr {
	fn op(&self) -> Option<Op> {
		match self {
			Self::Math(math) => Some(math.op),
			_ => None,
		}
	}
}

impl HasOp for Evaled<'_> {
	fn op(&self) -> Option<Op> {
		match self {
			Self::Math { op, .. } => Some(*op),
			_ => None,
		}
	}
}

/// Trait to allow creation of expanded descriptions with an optional max number of individual listed results where
/// applicable
pub trait Describe {
	/// Builds a detailed expression string with additional information about non-deterministic elements.
	/// Any elements of the expression that can have a different result between multiple evaluations or multiple results
	/// should list all of the specific individual results that occurred (ideally, up to `list_limit` of them).
	#[must_use]
	fn describe(&self, list_limit: Option<usize>) -> String;
}

/// Joins the descriptions of an operation's operands with its symbol, wrapping nested operations in parentheses
/// when they use a different operation than their parent (or are powers of powers).
fn describe_math<T: HasOp>(op: Op, operands: &[T], describe: impl Fn(&T) -> String) -> String {
	operands
		.iter()
		.map(|operand| match operand.op() {
			Some(inner) if inner != op || op == Op::Power => paren_wrap(describe(operand)),
			_ => describe(operand),
		})
		.collect::<Vec<_>>()
		.join(&format!(" {op} "))
}

/// Surrounds text with its comments: `pre : text # post`.
fn comment_wrap(text: String, pre: Option<&str>, post: Option<&str>) -> String {
	let mut wrapped = match pre {
		Some(pre) => format!("{pre} : {text}"),
		None => text,
	};
	if let Some(post) = post {
		wrapped.push_str(" # ");
		wrapped.push_str(post);
	}
	wrapped
}

/// Wraps a string in parentheses.
#[must_use]
fn paren_wrap(mut text: String) -> String {
	text.insert(0, '(');
	text.push(')');
	text
}
