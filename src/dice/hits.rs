//! Hit-counting checks: rolling dice and counting how many kept rolls pass a [`Condition`].

use std::fmt;

use super::{roller::Roller, Dice, DieRoll, Error, Rolled};
use crate::expr::Describe;

/// Test that die values can be checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "Unlikely to change, no logical fallback")]
pub enum Condition {
	/// Checks whether values are equal to its own value. Symbol: `=`
	Eq(u32),

	/// Checks whether values are not equal to its own value. Symbol: `!=`
	Ne(u32),

	/// Checks whether values are greater than its own value. Symbol: `>`
	Gt(u32),

	/// Checks whether values are greater than or equal to its own value. Symbol: `>=`
	Gte(u32),

	/// Checks whether values are less than its own value. Symbol: `<`
	Lt(u32),

	/// Checks whether values are less than or equal to its own value. Symbol: `<=`
	Lte(u32),
}

impl Condition {
	/// Creates a condition from its corresponding symbol and a given value.
	/// The symbols `==`, `≠`, `≥` and `≤` are accepted as alternate spellings.
	///
	/// # Errors
	/// If the symbol doesn't match to a known condition variant, an error variant will be returned.
	///
	/// # Examples
	/// ```
	/// use rollspec::dice::hits::Condition;
	///
	/// assert_eq!(Condition::from_symbol_and_val("≠", 3)?, Condition::Ne(3));
	/// assert_eq!(Condition::from_symbol_and_val(">=", 5)?.to_string(), ">= 5");
	/// # Ok::<(), rollspec::dice::Error>(())
	/// ```
	pub fn from_symbol_and_val(symbol: &str, val: u32) -> Result<Self, Error> {
		Ok(match symbol {
			"=" | "==" => Self::Eq(val),
			"!=" | "≠" => Self::Ne(val),
			">" => Self::Gt(val),
			">=" | "≥" => Self::Gte(val),
			"<" => Self::Lt(val),
			"<=" | "≤" => Self::Lte(val),
			_ => return Err(Error::UnknownCondition(symbol.to_owned())),
		})
	}

	/// Checks a value against the condition.
	#[must_use]
	pub const fn check(&self, val: u32) -> bool {
		match self {
			Self::Eq(expected) => val == *expected,
			Self::Ne(expected) => val != *expected,
			Self::Gt(expected) => val > *expected,
			Self::Gte(expected) => val >= *expected,
			Self::Lt(expected) => val < *expected,
			Self::Lte(expected) => val <= *expected,
		}
	}

	/// Gets the symbol that represents the condition.
	#[must_use]
	pub const fn symbol(&self) -> &'static str {
		match self {
			Self::Eq(..) => "=",
			Self::Ne(..) => "!=",
			Self::Gt(..) => ">",
			Self::Gte(..) => ">=",
			Self::Lt(..) => "<",
			Self::Lte(..) => "<=",
		}
	}

	/// Gets the value the condition checks against.
	#[must_use]
	pub const fn val(&self) -> u32 {
		match self {
			Self::Eq(expected)
			| Self::Ne(expected)
			| Self::Gt(expected)
			| Self::Gte(expected)
			| Self::Lt(expected)
			| Self::Lte(expected) => *expected,
		}
	}
}

impl fmt::Display for Condition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {}", self.symbol(), self.val())
	}
}

/// A set of dice whose kept rolls are checked against a condition, with the result being the number of rolls that
/// pass (hits) rather than their sum
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_structs, reason = "A check is the dice and the condition")]
pub struct Hits {
	/// Dice to roll
	pub dice: Dice,

	/// Condition each kept roll is checked against
	pub cond: Condition,
}

impl Hits {
	/// Creates a new hit-counting check.
	#[must_use]
	pub const fn new(dice: Dice, cond: Condition) -> Self {
		Self { dice, cond }
	}

	/// Creates one of the `nb` shorthand checks: `count` six-sided dice hitting on at least `threshold`.
	#[must_use]
	pub const fn nb(count: u32, threshold: u32) -> Self {
		Self::new(Dice::new(count, 6), Condition::Gte(threshold))
	}

	/// Rolls the dice (applying their modifier) using the given roller.
	///
	/// # Errors
	/// If an error occurs while rolling the dice, an error variant is returned.
	pub fn roll<'h>(&'h self, rng: &mut impl Roller) -> Result<HitsRolled<'h>, Error> {
		Ok(HitsRolled {
			rolled: rng.roll(&self.dice, true)?,
			cond: self.cond,
		})
	}
}

impl fmt::Display for Hits {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "({} {})", self.dice, self.cond)
	}
}

/// Representation of the result from rolling a [`Hits`] check
#[derive(Debug, Clone, PartialEq, Eq)]
#[expect(clippy::exhaustive_structs, reason = "Rolls and the condition are all there is")]
pub struct HitsRolled<'a> {
	/// Dice rolls that were checked
	pub rolled: Rolled<'a>,

	/// Condition the rolls were checked against
	pub cond: Condition,
}

impl HitsRolled<'_> {
	/// Checks whether a roll counts as a hit. Dropped rolls never count, even if their value passes the condition.
	#[must_use]
	pub const fn is_hit(&self, roll: &DieRoll) -> bool {
		roll.is_kept() && self.cond.check(roll.val)
	}

	/// Counts the number of hits.
	///
	/// # Examples
	/// ```
	/// use rollspec::dice::{hits::{Condition, Hits}, roller::Iter as IterRoller, Dice};
	///
	/// // The 6 is dropped by keeping the lowest 2, so only the 5 is a hit
	/// let hits = Hits::new(Dice::builder().count(3).sides(6).keep_low(2).build(), Condition::Gte(5));
	/// let rolled = hits.roll(&mut IterRoller::new([6, 5, 2]))?;
	/// assert_eq!(rolled.count(), 1);
	/// # Ok::<(), rollspec::dice::Error>(())
	/// ```
	#[must_use]
	pub fn count(&self) -> u32 {
		let hits = self.rolled.rolls.iter().filter(|roll| self.is_hit(roll)).count();
		u32::try_from(hits).unwrap_or(u32::MAX)
	}

	/// Moves all of self's owned data into a new instance and clones any unowned data in order to create a `'static`
	/// instance of self.
	#[must_use]
	pub fn into_owned(self) -> HitsRolled<'static> {
		HitsRolled {
			rolled: self.rolled.into_owned(),
			cond: self.cond,
		}
	}
}

impl Describe for HitsRolled<'_> {
	/// Builds a trace of all of the rolled dice, with hits in bold and everything else struck through, followed by the
	/// number of hits.
	///
	/// # Examples
	/// ```
	/// use rollspec::{dice::{hits::{Condition, Hits}, roller::Iter as IterRoller, Dice}, expr::Describe};
	///
	/// let hits = Hits::new(Dice::new(3, 6), Condition::Gte(5));
	/// let rolled = hits.roll(&mut IterRoller::new([6, 2, 5]))?;
	/// assert_eq!(rolled.describe(None), "(**6** ~~2~~ **5** => **2 hits**)");
	/// # Ok::<(), rollspec::dice::Error>(())
	/// ```
	fn describe(&self, list_limit: Option<usize>) -> String {
		let list_limit = list_limit.unwrap_or(usize::MAX);
		let truncated_rolls = self.rolled.rolls.len().saturating_sub(list_limit);

		let mut parts = self
			.rolled
			.rolls
			.iter()
			.take(list_limit)
			.map(|roll| {
				if self.is_hit(roll) {
					format!("**{}**", self.rolled.describe_roll(roll))
				} else {
					format!("~~{}~~", roll.val)
				}
			})
			.collect::<Vec<_>>();
		if truncated_rolls > 0 {
			parts.push(format!("{truncated_rolls} more..."));
		}

		let count = self.count();
		format!(
			"({} => **{count} hit{}**)",
			parts.join(" "),
			if count == 1 { "" } else { "s" }
		)
	}
}

impl fmt::Display for HitsRolled<'_> {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The output is equivalent to calling [`Self::describe(None)`].
	///
	/// [`Self::describe(None)`]: Self::describe()
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.describe(None))
	}
}
