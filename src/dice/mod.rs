//! All functionality for directly creating dice, rolling them, and working with their resulting rolls.
//!
//! This is the home of the dice "primitives". For using as part of a larger expression, see [`Expr::Dice`] and
//! [`Expr::Hits`].
//!
//! [`Expr::Dice`]: crate::expr::Expr::Dice
//! [`Expr::Hits`]: crate::expr::Expr::Hits

pub mod hits;
pub mod modifier;
pub mod roller;

use std::{borrow::Cow, cmp, fmt};

pub use self::{hits::Hits, modifier::Modifier, roller::Roller};
use crate::expr::Describe;

/// Maximum number of explosion rounds performed for exploding dice unless otherwise specified
pub const DEFAULT_EXPLOSIONS_CAP: u32 = 100;

/// Maximum number of dice a single set can roll up front
pub const MAX_DICE: u32 = 1000;

/// Maximum number of rolls a single set can end up with, including dice added by its modifier
pub const MAX_ROLLS: usize = 10_000;

/// A set of one or more rollable dice with a specific number of sides, along with an optional modifier to apply to
/// any resulting rolls from them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_structs, reason = "Dice are fully described by these fields")]
pub struct Dice {
	/// Number of dice to roll
	pub count: u32,

	/// Number of sides for each die
	pub sides: u32,

	/// Modifier to automatically apply to rolls from this set of dice
	pub modifier: Option<Modifier>,
}

impl Dice {
	/// Creates a new set of dice matching this one but without any modifier.
	#[must_use]
	#[inline]
	pub const fn plain(&self) -> Self {
		Self::new(self.count, self.sides)
	}

	/// Creates a new set of dice with a given count and number of sides.
	#[must_use]
	pub const fn new(count: u32, sides: u32) -> Self {
		Self {
			count,
			sides,
			modifier: None,
		}
	}

	/// Creates a new dice builder.
	#[must_use]
	#[inline]
	pub fn builder() -> Builder {
		Builder::default()
	}

	/// Checks that rolling the dice is well-defined: no more than [`MAX_DICE`] dice are rolled, exploding dice must
	/// explode on at least 2 (otherwise every die would explode forever), and rerolling can't replace more dice than
	/// were rolled.
	///
	/// # Errors
	/// If the dice's modifier is invalid for the dice, an error variant is returned.
	///
	/// # Examples
	/// ```
	/// use rollspec::dice::{Dice, Error};
	///
	/// let dice = Dice::builder().count(2).sides(6).explode(1).build();
	/// assert!(matches!(dice.validate(), Err(Error::InfiniteRolls(..))));
	///
	/// let dice = Dice::builder().count(2).sides(6).reroll_lowest(3).build();
	/// assert!(matches!(dice.validate(), Err(Error::TooManyRerolls(..))));
	///
	/// let dice = Dice::new(4_294_967_295, 6);
	/// assert!(matches!(dice.validate(), Err(Error::TooManyDice(..))));
	/// ```
	pub fn validate(&self) -> Result<(), Error> {
		if self.count > MAX_DICE {
			return Err(Error::TooManyDice(self.clone()));
		}

		match self.modifier {
			Some(Modifier::Explode { threshold, .. }) if threshold < 2 => Err(Error::InfiniteRolls(self.clone())),
			Some(Modifier::RerollLowest(count)) if count > self.count => Err(Error::TooManyRerolls(self.clone())),
			_ => Ok(()),
		}
	}
}

impl Default for Dice {
	/// Creates the default dice (1d20).
	#[inline]
	fn default() -> Self {
		Self::new(1, 20)
	}
}

impl fmt::Display for Dice {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}d{}", self.count, self.sides)?;
		if let Some(modifier) = &self.modifier {
			write!(f, " {modifier}")?;
		}
		Ok(())
	}
}

/// Single die produced from rolling [`Dice`] and optionally applying a [`Modifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct DieRoll {
	/// Value that was rolled
	pub val: u32,

	/// Modifier that caused the addition of this die, if any
	pub added_by: Option<Modifier>,

	/// Modifier that caused the drop of this die, if any
	pub dropped_by: Option<Modifier>,
}

impl DieRoll {
	/// Marks this die roll as added by a given modifier, setting [`Self::added_by`].
	///
	/// # Panics
	/// Panics if `Self::added_by` is already [`Some`].
	pub fn add(&mut self, from: Modifier) {
		assert!(
			self.added_by.is_none(),
			"marking a die as added that has already been marked as added by another modifier"
		);
		self.added_by = Some(from);
	}

	/// Marks this die roll as dropped by a given modifier, setting [`Self::dropped_by`].
	///
	/// # Panics
	/// Panics if `Self::dropped_by` is already [`Some`].
	pub fn drop(&mut self, from: Modifier) {
		assert!(
			self.dropped_by.is_none(),
			"marking a die as dropped that has already been marked as dropped by another modifier"
		);
		self.dropped_by = Some(from);
	}

	/// Indicates whether this die roll was part of the original set (not added by a modifier).
	#[must_use]
	#[inline]
	pub const fn is_original(&self) -> bool {
		self.added_by.is_none()
	}

	/// Indicates whether this die roll was added as the result of a modifier being applied.
	/// This is the direct inverse of [`DieRoll::is_original()`].
	#[must_use]
	#[inline]
	pub const fn is_additional(&self) -> bool {
		self.added_by.is_some()
	}

	/// Indicates whether this die roll has been dropped by a modifier.
	#[must_use]
	#[inline]
	pub const fn is_dropped(&self) -> bool {
		self.dropped_by.is_some()
	}

	/// Indicates whether this die roll is being kept (has *not* been dropped by a modifier).
	/// This is the direct inverse of [`DieRoll::is_dropped()`].
	#[must_use]
	#[inline]
	pub const fn is_kept(&self) -> bool {
		self.dropped_by.is_none()
	}

	/// Creates a new die roll with the given value.
	#[must_use]
	pub const fn new(val: u32) -> Self {
		Self {
			val,
			added_by: None,
			dropped_by: None,
		}
	}
}

impl PartialOrd for DieRoll {
	fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for DieRoll {
	fn cmp(&self, other: &Self) -> cmp::Ordering {
		self.val.cmp(&other.val)
	}
}

impl fmt::Display for DieRoll {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The format of a die roll is simply the plain numeric value of the roll.
	/// If the roll was dropped, it is struck through (`~~3~~`).
	///
	/// # Examples
	/// ```
	/// use rollspec::dice::{DieRoll, Modifier};
	///
	/// let mut roll = DieRoll::new(4);
	/// assert_eq!(roll.to_string(), "4");
	///
	/// roll.drop(Modifier::KeepHigh(1));
	/// assert_eq!(roll.to_string(), "~~4~~");
	/// ```
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_dropped() {
			write!(f, "~~{}~~", self.val)
		} else {
			write!(f, "{}", self.val)
		}
	}
}

/// Representation of the result from rolling [`Dice`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[expect(clippy::exhaustive_structs, reason = "Rolls and the dice they came from are all there is")]
pub struct Rolled<'a> {
	/// Each individual die roll that was made, in the order they were rolled
	pub rolls: Vec<DieRoll>,

	/// Dice that were rolled to produce this
	pub dice: Cow<'a, Dice>,
}

impl Rolled<'_> {
	/// Calculates the total of all kept roll values.
	///
	/// # Errors
	/// If there is an integer overflow while summing the die rolls, an error variant is returned.
	///
	/// # Examples
	/// ```
	/// use rollspec::dice::{roller::{FastRand as FastRandRoller, Roller}, Dice};
	///
	/// let dice = Dice::new(4, 8);
	/// let rolled = FastRandRoller::default().roll(&dice, true)?;
	/// let total = rolled.total()?;
	/// assert_eq!(total, rolled.rolls.iter().map(|roll| u64::from(roll.val)).sum());
	/// # Ok::<(), rollspec::dice::Error>(())
	/// ```
	pub fn total(&self) -> Result<u64, Error> {
		let mut sum: u64 = 0;

		// Sum all rolls that haven't been dropped
		for r in self.rolls.iter().filter(|roll| roll.is_kept()) {
			sum = sum
				.checked_add(u64::from(r.val))
				.ok_or_else(|| Error::Overflow(self.clone().into_owned()))?;
		}

		Ok(sum)
	}

	/// Gets the indices of every roll that is being kept.
	#[must_use]
	pub fn kept_indices(&self) -> Vec<usize> {
		self.rolls
			.iter()
			.enumerate()
			.filter(|(_, roll)| roll.is_kept())
			.map(|(idx, _)| idx)
			.collect()
	}

	/// Checks whether a roll triggered an explosion, which is the case when the dice explode and the roll's value
	/// meets their threshold.
	#[must_use]
	pub fn is_explosive(&self, roll: &DieRoll) -> bool {
		matches!(self.dice.modifier, Some(Modifier::Explode { threshold, .. }) if roll.val >= threshold)
	}

	/// Formats a single roll for a trace: dropped rolls are struck through and rolls that exploded are italicized.
	#[must_use]
	pub fn describe_roll(&self, roll: &DieRoll) -> String {
		if roll.is_dropped() {
			roll.to_string()
		} else if self.is_explosive(roll) {
			format!("_{}_", roll.val)
		} else {
			roll.val.to_string()
		}
	}

	/// Moves all of self's owned data into a new instance and clones any unowned data in order to create a `'static`
	/// instance of self.
	#[must_use]
	pub fn into_owned(self) -> Rolled<'static> {
		Rolled {
			rolls: self.rolls,
			dice: Cow::Owned(self.dice.into_owned()),
		}
	}

	/// Creates a new rolled set of dice from a given set of dice and an iterator of values.
	#[must_use]
	pub fn from_dice_and_rolls(dice: &Dice, rolls: impl IntoIterator<Item = u32>) -> Rolled<'_> {
		Rolled {
			rolls: rolls.into_iter().map(DieRoll::new).collect(),
			dice: Cow::Borrowed(dice),
		}
	}
}

impl Describe for Rolled<'_> {
	/// Builds a trace of all of the individual rolled dice (see [`Self::describe_roll()`]) and their total.
	/// A lone kept die is simply shown in bold.
	///
	/// If `list_limit` is specified and there are more rolls than it, the list of rolled dice will be truncated and
	/// appended with "X more..." (where X is the remaining roll count past the max).
	///
	/// # Examples
	/// ```
	/// use std::borrow::Cow;
	/// use rollspec::{dice::{Dice, DieRoll, Modifier, Rolled}, expr::Describe};
	///
	/// let dice = Dice::builder().count(4).sides(6).keep_high(2).build();
	/// let kh_mod = Modifier::KeepHigh(2);
	/// let rolled = Rolled {
	/// 	rolls: vec![
	/// 		DieRoll::new(6),
	/// 		{
	/// 			let mut roll = DieRoll::new(2);
	/// 			roll.drop(kh_mod);
	/// 			roll
	/// 		},
	/// 		DieRoll::new(5),
	/// 		{
	/// 			let mut roll = DieRoll::new(3);
	/// 			roll.drop(kh_mod);
	/// 			roll
	/// 		},
	/// 	],
	/// 	dice: Cow::Borrowed(&dice),
	/// };
	///
	/// assert_eq!(rolled.describe(None), "(6 + ~~2~~ + 5 + ~~3~~ => **11**)");
	/// assert_eq!(rolled.describe(Some(2)), "(6 + ~~2~~ + 2 more... => **11**)");
	/// ```
	fn describe(&self, list_limit: Option<usize>) -> String {
		if let [roll] = self.rolls.as_slice() {
			if roll.is_kept() {
				return format!("(**{}**)", roll.val);
			}
		}

		let list_limit = list_limit.unwrap_or(usize::MAX);
		let truncated_rolls = self.rolls.len().saturating_sub(list_limit);
		let total = self
			.rolls
			.iter()
			.filter(|roll| roll.is_kept())
			.fold(0_u64, |sum, roll| sum.saturating_add(roll.val.into()));

		let mut bits = self
			.rolls
			.iter()
			.take(list_limit)
			.map(|roll| self.describe_roll(roll))
			.collect::<Vec<_>>();
		if truncated_rolls > 0 {
			bits.push(format!("{truncated_rolls} more..."));
		}

		format!("({} => **{total}**)", bits.join(" + "))
	}
}

impl fmt::Display for Rolled<'_> {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The output is equivalent to calling [`Self::describe(None)`].
	///
	/// [`Self::describe(None)`]: Self::describe()
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.describe(None))
	}
}

/// An error resulting from a dice operation
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// There was an integer overflow when performing mathematical operations on roll values.
	/// This normally should not ever happen given the types used for die counts, sides, and totals.
	#[error("integer overflow")]
	Overflow(Rolled<'static>),

	/// Rolling the dice specified would result in infinite rolls.
	///
	/// # Examples
	/// ```
	/// use rollspec::dice::{roller::{FastRand as FastRandRoller, Roller}, Dice, Error};
	///
	/// let dice = Dice::builder().count(4).sides(6).explode(1).build();
	/// assert!(matches!(FastRandRoller::default().roll(&dice, true), Err(Error::InfiniteRolls(..))));
	/// ```
	#[error("{0} would result in infinite rolls; dice must explode on at least 2")]
	InfiniteRolls(Dice),

	/// The dice would reroll more dice than were rolled in the first place.
	#[error("{0} rerolls more dice than it rolls")]
	TooManyRerolls(Dice),

	/// The dice would roll more than [`MAX_DICE`] dice at once.
	#[error("{0} rolls too many dice; at most {max} can be rolled at once", max = MAX_DICE)]
	TooManyDice(Dice),

	/// The provided symbol doesn't match to a known condition.
	///
	/// # Examples
	/// ```
	/// use rollspec::dice::{hits::Condition, Error};
	///
	/// let cond = Condition::from_symbol_and_val("!", 4);
	/// assert!(matches!(cond, Err(Error::UnknownCondition(..))));
	/// ```
	#[error("unknown condition symbol: {0}")]
	UnknownCondition(String),
}

/// Builds [`Dice`] with a fluent interface.
///
/// # Examples
///
/// ## Basic dice
/// ```
/// use rollspec::Dice;
///
/// let dice = Dice::builder().count(2).sides(6).build();
/// assert_eq!(dice, Dice::new(2, 6));
/// ```
///
/// ## Exploding dice
/// ```
/// use rollspec::dice::{Dice, Modifier};
///
/// let dice = Dice::builder().count(2).sides(10).explode(10).explosions_cap(5).build();
/// assert_eq!(
/// 	dice,
/// 	Dice {
/// 		count: 2,
/// 		sides: 10,
/// 		modifier: Some(Modifier::Explode { threshold: 10, cap: 5 }),
/// 	},
/// );
/// assert_eq!(dice.to_string(), "2d10 explode 10");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder(Dice);

impl Builder {
	/// Sets the number of dice to roll.
	#[must_use]
	pub const fn count(mut self, count: u32) -> Self {
		self.0.count = count;
		self
	}

	/// Sets the number of sides per die.
	#[must_use]
	pub const fn sides(mut self, sides: u32) -> Self {
		self.0.sides = sides;
		self
	}

	/// Makes the dice explode on rolls of at least `threshold`, with the default cap on explosion rounds.
	#[must_use]
	pub const fn explode(mut self, threshold: u32) -> Self {
		self.0.modifier = Some(Modifier::Explode {
			threshold,
			cap: DEFAULT_EXPLOSIONS_CAP,
		});
		self
	}

	/// Sets the maximum number of explosion rounds. Has no effect unless the dice explode.
	#[must_use]
	pub const fn explosions_cap(mut self, cap: u32) -> Self {
		if let Some(Modifier::Explode { threshold, .. }) = self.0.modifier {
			self.0.modifier = Some(Modifier::Explode { threshold, cap });
		}
		self
	}

	/// Keeps only the highest `count` dice.
	#[must_use]
	pub const fn keep_high(mut self, count: u32) -> Self {
		self.0.modifier = Some(Modifier::KeepHigh(count));
		self
	}

	/// Keeps only the lowest `count` dice.
	#[must_use]
	pub const fn keep_low(mut self, count: u32) -> Self {
		self.0.modifier = Some(Modifier::KeepLow(count));
		self
	}

	/// Drops the lowest `count` dice and rolls that many replacements.
	#[must_use]
	pub const fn reroll_lowest(mut self, count: u32) -> Self {
		self.0.modifier = Some(Modifier::RerollLowest(count));
		self
	}

	/// Finalizes the dice.
	#[must_use]
	pub fn build(self) -> Dice {
		self.0
	}
}
