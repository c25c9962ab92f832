//! Facade for going from a dice expression string all the way to its rendered result in one call.
//!
//! [`roll_spec()`] parses, builds, evaluates and formats an expression, returning a [`RollOutcome`]. The lower-level
//! [`Roll`] keeps the two-phase evaluate-then-format contract for callers that need to hold on to an expression.

use std::fmt;
#[cfg(feature = "parse")]
use std::str::FromStr;

#[cfg(feature = "logging")]
use log::debug;

#[cfg(feature = "fastrand")]
use crate::dice::roller::FastRand;
#[cfg(feature = "parse")]
use crate::{build, parse};
use crate::{
	dice::Roller,
	expr::{BuildError, CalcError, Describe, EvalError, Evaled, Expr},
	num::Value,
};

/// Parses, builds, evaluates and formats a dice expression using a fresh randomly-seeded roller.
///
/// # Errors
/// If the expression doesn't match the grammar, breaks a rule while being built, or fails during evaluation, an error
/// variant is returned. Use [`Error::reply()`] to get a message suitable for showing to whoever wrote the expression.
///
/// # Examples
/// ```
/// use rollspec::roll_spec;
///
/// let outcome = roll_spec("4d6 highest 3")?;
/// assert_eq!(outcome.notation, "4d6 highest 3");
/// let total = outcome.value.as_num().unwrap();
/// assert!(total >= 3.into() && total <= 18.into());
/// # Ok::<(), rollspec::roll::Error>(())
/// ```
#[cfg(all(feature = "parse", feature = "fastrand"))]
pub fn roll_spec(spec: &str) -> Result<RollOutcome, Error> {
	roll_spec_using(spec, &mut FastRand::default())
}

/// Parses, builds, evaluates and formats a dice expression, rolling dice with the given roller.
///
/// # Errors
/// If the expression doesn't match the grammar, breaks a rule while being built, or fails during evaluation, an error
/// variant is returned.
///
/// # Examples
/// ```
/// use rollspec::{dice::roller::Iter as IterRoller, num::Value, roll_spec_using};
///
/// let outcome = roll_spec_using("d20+12", &mut IterRoller::new([8]))?;
/// assert_eq!(outcome.notation, "1d20 + 12");
/// assert_eq!(outcome.trace, "(**8**) + 12");
/// assert_eq!(outcome.value, Value::Num(20.into()));
/// assert_eq!(outcome.to_string(), "1d20 + 12   ::   (**8**) + 12   =>   got **20**");
/// # Ok::<(), rollspec::roll::Error>(())
/// ```
#[cfg(feature = "parse")]
pub fn roll_spec_using(spec: &str, rng: &mut impl Roller) -> Result<RollOutcome, Error> {
	let mut roll = Roll::new(spec.parse()?);
	roll.eval(rng)?;
	let outcome = roll.outcome()?;

	#[cfg(feature = "logging")]
	debug!("rolled {spec:?}: {}", outcome.value);

	Ok(outcome)
}

/// Everything produced by rolling an expression
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct RollOutcome {
	/// Expression in dice notation
	pub notation: String,

	/// Trace of every individual roll that was made
	pub trace: String,

	/// Calculated result. Only a list if the expression had multiple comma-separated entries.
	pub value: Value,

	/// Outcome of each comma-separated entry, in the order they were written
	pub entries: Vec<Entry>,
}

impl fmt::Display for RollOutcome {
	/// Writes one result line per entry (see [`Entry`]'s `Display` implementation).
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let lines = self.entries.iter().map(ToString::to_string).collect::<Vec<_>>();
		write!(f, "{}", lines.join("\n"))
	}
}

/// Outcome of a single comma-separated entry of an expression, with its comments separated out
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Entry {
	/// Comment written before the entry
	pub pre_comment: Option<String>,

	/// Comment written after the entry
	pub post_comment: Option<String>,

	/// Entry in dice notation, without its comments
	pub notation: String,

	/// Trace of the entry's rolls, without its comments
	pub trace: String,

	/// Calculated result of the entry
	pub value: Value,
}

impl Entry {
	/// Creates the outcome of an entry from its expression and evaluated counterpart.
	fn new(expr: &Expr, evaled: &Evaled<'_>) -> Result<Self, Error> {
		let (expr, evaled, pre_comment, post_comment) = match (expr, evaled) {
			(Expr::Commented { expr, pre, post }, Evaled::Commented { evaled, .. }) => {
				(&**expr, &**evaled, pre.clone(), post.clone())
			}
			_ => (expr, evaled, None, None),
		};

		Ok(Self {
			pre_comment,
			post_comment,
			notation: expr.to_string(),
			trace: evaled.describe(None),
			value: evaled.calc()?,
		})
	}
}

impl fmt::Display for Entry {
	/// Writes the entry as a single result line: `notation   ::   trace   =>   got **value**`, with the comments
	/// around it.
	///
	/// # Examples
	/// ```
	/// use rollspec::{dice::roller::Val as ValRoller, roll_spec_using};
	///
	/// let outcome = roll_spec_using("attack: d20 + 5 # longsword, 2d6", &mut ValRoller(4))?;
	/// assert_eq!(
	/// 	outcome.to_string(),
	/// 	"attack:   1d20 + 5   ::   (**4**) + 5   =>   got **9**   # longsword\n\
	/// 	 2d6   ::   (4 + 4 => **8**)   =>   got **8**"
	/// );
	/// # Ok::<(), rollspec::roll::Error>(())
	/// ```
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if let Some(pre) = &self.pre_comment {
			write!(f, "{pre}:   ")?;
		}
		write!(f, "{}   ::   {}   =>   got **{}**", self.notation, self.trace, self.value)?;
		if let Some(post) = &self.post_comment {
			write!(f, "   # {post}")?;
		}
		Ok(())
	}
}

/// An expression along with the result of its most recent evaluation, if it has been evaluated
#[derive(Debug, Clone, PartialEq)]
pub struct Roll {
	/// Expression to roll
	expr: Expr,

	/// Result of the most recent evaluation
	evaled: Option<Evaled<'static>>,
}

impl Roll {
	/// Creates a new, not yet evaluated roll of an expression.
	#[must_use]
	pub const fn new(expr: Expr) -> Self {
		Self { expr, evaled: None }
	}

	/// Gets the expression being rolled.
	#[must_use]
	#[inline]
	pub const fn expr(&self) -> &Expr {
		&self.expr
	}

	/// Renders the expression in dice notation. This never depends on evaluation.
	#[must_use]
	pub fn notation(&self) -> String {
		self.expr.to_string()
	}

	/// Evaluates the expression, replacing the result of any previous evaluation.
	///
	/// # Errors
	/// If an error occurs while rolling dice, an error variant is returned and any previous result is kept.
	pub fn eval(&mut self, rng: &mut impl Roller) -> Result<&Evaled<'static>, Error> {
		let evaled = self.expr.eval(rng)?.into_owned();
		Ok(self.evaled.insert(evaled))
	}

	/// Gets the result of the most recent evaluation.
	///
	/// # Errors
	/// If the roll hasn't been evaluated yet, [`Error::NotEvaluated`] is returned.
	pub fn evaled(&self) -> Result<&Evaled<'static>, Error> {
		self.evaled.as_ref().ok_or(Error::NotEvaluated)
	}

	/// Renders a trace of the most recent evaluation.
	///
	/// # Errors
	/// If the roll hasn't been evaluated yet, [`Error::NotEvaluated`] is returned.
	///
	/// # Examples
	/// ```
	/// use rollspec::{dice::roller::Max as MaxRoller, roll::{Error, Roll}};
	///
	/// let mut roll = Roll::new("3d6 >= 5".parse()?);
	/// assert!(matches!(roll.trace(), Err(Error::NotEvaluated)));
	///
	/// roll.eval(&mut MaxRoller)?;
	/// assert_eq!(roll.trace()?, "(**6** **6** **6** => **3 hits**)");
	/// # Ok::<(), Error>(())
	/// ```
	pub fn trace(&self) -> Result<String, Error> {
		Ok(self.evaled()?.describe(None))
	}

	/// Calculates the value of the most recent evaluation.
	///
	/// # Errors
	/// If the roll hasn't been evaluated yet or the calculation fails, an error variant is returned.
	pub fn value(&self) -> Result<Value, Error> {
		Ok(self.evaled()?.calc()?)
	}

	/// Gathers the notation, trace and value of the most recent evaluation, along with the same for each of its
	/// comma-separated entries.
	///
	/// # Errors
	/// If the roll hasn't been evaluated yet or a calculation fails, an error variant is returned.
	pub fn outcome(&self) -> Result<RollOutcome, Error> {
		let evaled = self.evaled()?;

		let entries = match (&self.expr, evaled) {
			(Expr::Concat(exprs), Evaled::Concat(evaled)) => exprs
				.iter()
				.zip(evaled)
				.map(|(expr, evaled)| Entry::new(expr, evaled))
				.collect::<Result<Vec<_>, _>>()?,
			(expr, evaled) => vec![Entry::new(expr, evaled)?],
		};

		Ok(RollOutcome {
			notation: self.notation(),
			trace: evaled.describe(None),
			value: evaled.calc()?,
			entries,
		})
	}
}

#[cfg(feature = "parse")]
impl FromStr for Expr {
	type Err = Error;

	/// Parses and builds an expression.
	///
	/// # Examples
	/// ```
	/// use rollspec::{expr::Expr, Dice};
	///
	/// let expr: Expr = "d20".parse()?;
	/// assert_eq!(expr, Expr::Dice(Dice::new(1, 20)));
	/// assert_eq!(expr.to_string(), "1d20");
	/// # Ok::<(), rollspec::roll::Error>(())
	/// ```
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(build::build(parse::parse(s)?)?)
	}
}

/// Error that can occur anywhere between reading an expression and rendering its result
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// The expression doesn't match the grammar.
	#[cfg(feature = "parse")]
	#[error(transparent)]
	Syntax(#[from] parse::Error),

	/// The expression matches the grammar, but part of it breaks a rule.
	#[error(transparent)]
	Semantic(#[from] BuildError),

	/// A trace or value was requested before the expression was evaluated.
	#[error("the expression hasn't been evaluated yet")]
	NotEvaluated,

	/// Rolling dice failed.
	#[error(transparent)]
	Eval(#[from] EvalError),

	/// Calculating the result failed.
	#[error(transparent)]
	Calc(#[from] CalcError),
}

impl Error {
	/// Checks whether the error was caused by what was written (a syntax or semantic error) rather than something
	/// going wrong while rolling.
	#[must_use]
	pub const fn is_user_error(&self) -> bool {
		match self {
			#[cfg(feature = "parse")]
			Self::Syntax(..) => true,
			Self::Semantic(..) => true,
			Self::NotEvaluated | Self::Eval(..) | Self::Calc(..) => false,
		}
	}

	/// Builds a message for whoever wrote the expression. Syntax errors point at where the problem is, semantic
	/// errors name the rule that was broken, and anything else is reported along with the underlying message.
	///
	/// # Examples
	/// ```
	/// use rollspec::roll_spec;
	///
	/// let err = roll_spec("2d6 explode 1").unwrap_err();
	/// assert!(err.is_user_error());
	/// assert_eq!(
	/// 	err.reply(),
	/// 	"Sorry, I can't roll that: 2d6 explode 1 would result in infinite rolls; dice must explode on at least 2"
	/// );
	/// ```
	#[must_use]
	pub fn reply(&self) -> String {
		match self {
			#[cfg(feature = "parse")]
			Self::Syntax(err) => format!(
				"Sorry, I don't understand! I think the error might be here:\n\n```\n{}\n\n{err}\n```",
				err.context
			),
			Self::Semantic(err) => format!("Sorry, I can't roll that: {err}"),
			err => format!("Something broke \u{1f62d}\u{1f62d}\u{1f62d}\n```{err}```"),
		}
	}
}
