//! Dice modifiers: the selection policy applied to a freshly rolled set of dice.

use std::{cmp, fmt};

#[cfg(feature = "logging")]
use log::debug;

use super::{roller::Roller, Error, Rolled, MAX_ROLLS};

/// Routines that can be applied to [`Dice`](super::Dice) to automatically manipulate resulting [`Rolled`] dice sets
/// from them as part of their rolling process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Modifier {
	/// Explodes (keeps original and adds an additional newly-rolled die) dice that roll at least `threshold`.
	/// Newly-added dice can explode again, for at most `cap` rounds and until the set holds
	/// [`MAX_ROLLS`](super::MAX_ROLLS) rolls.
	///
	/// # Examples
	/// ```
	/// use rollspec::dice::{roller::{Iter as IterRoller, Roller}, Dice, Modifier, Rolled};
	///
	/// // Build the 3d6 explode 5 dice set and create a roller that has predetermined values for the dice rolls
	/// let dice = Dice::builder().count(3).sides(6).explode(5).build();
	/// let x_mod = dice.modifier.unwrap();
	/// let premade_rolls = [3, 6, 5, 2, 6, 1];
	/// let mut rng = IterRoller::new(premade_rolls);
	///
	/// // The 6 and 5 each add a die (2 and 6), then that 6 adds a final die (1).
	/// let rolled = rng.roll(&dice, true)?;
	/// let mut expected = Rolled::from_dice_and_rolls(&dice, premade_rolls);
	/// expected.rolls[3].add(x_mod);
	/// expected.rolls[4].add(x_mod);
	/// expected.rolls[5].add(x_mod);
	/// assert_eq!(rolled, expected);
	/// assert_eq!(rolled.total()?, 23);
	/// # Ok::<(), rollspec::dice::Error>(())
	/// ```
	Explode {
		/// Minimum roll value that triggers an additional die
		threshold: u32,

		/// Maximum number of rounds of additional dice
		cap: u32,
	},

	/// Keeps only the highest x dice, dropping the rest. Between equal rolls, the earlier one is kept.
	///
	/// # Examples
	/// ```
	/// use rollspec::dice::{roller::{Iter as IterRoller, Roller}, Dice, Modifier, Rolled};
	///
	/// // Build the 4d6 highest 2 dice set and create a roller that has predetermined values for the dice rolls
	/// let dice = Dice::builder().count(4).sides(6).keep_high(2).build();
	/// let premade_rolls = [3, 6, 1, 3];
	/// let mut rng = IterRoller::new(premade_rolls);
	///
	/// // Roll the dice, but don't have it automatically apply its modifier (passing `false` as the second `roll()`
	/// // param), then explicitly apply it.
	/// let mut rolled = rng.roll(&dice, false)?;
	/// let kh_mod = Modifier::KeepHigh(2);
	/// kh_mod.apply(&mut rolled, &mut rng)?;
	///
	/// // The 6 and the first 3 are kept.
	/// let mut expected = Rolled::from_dice_and_rolls(&dice, premade_rolls);
	/// expected.rolls[2].drop(kh_mod);
	/// expected.rolls[3].drop(kh_mod);
	/// assert_eq!(rolled, expected);
	/// # Ok::<(), rollspec::dice::Error>(())
	/// ```
	KeepHigh(u32),

	/// Keeps only the lowest x dice, dropping the rest. Between equal rolls, the earlier one is kept.
	KeepLow(u32),

	/// Drops the lowest x dice (keeping the highest `count - x`), then rolls x new dice that are all kept.
	///
	/// # Examples
	/// ```
	/// use rollspec::dice::{roller::{Iter as IterRoller, Roller}, Dice, Rolled};
	///
	/// let dice = Dice::builder().count(4).sides(6).reroll_lowest(1).build();
	/// let rr_mod = dice.modifier.unwrap();
	/// let premade_rolls = [4, 1, 5, 2, 6];
	/// let mut rng = IterRoller::new(premade_rolls);
	///
	/// // The 1 is dropped and replaced by a newly rolled 6.
	/// let rolled = rng.roll(&dice, true)?;
	/// let mut expected = Rolled::from_dice_and_rolls(&dice, premade_rolls);
	/// expected.rolls[1].drop(rr_mod);
	/// expected.rolls[4].add(rr_mod);
	/// assert_eq!(rolled, expected);
	/// assert_eq!(rolled.total()?, 17);
	/// # Ok::<(), rollspec::dice::Error>(())
	/// ```
	RerollLowest(u32),
}

impl Modifier {
	/// Applies the modifier to a set of rolls, using a given roller if additional die rolls are needed.
	///
	/// # Errors
	/// If applying the modifier would result in infinite additional die rolls, or would reroll more dice than were
	/// rolled, an error variant is returned.
	pub fn apply(self, rolled: &mut Rolled<'_>, rng: &mut impl Roller) -> Result<(), Error> {
		match self {
			Self::Explode { threshold, cap } => self.apply_explode(rolled, rng, threshold, cap)?,
			Self::KeepHigh(count) => self.apply_keep_high(rolled, count),
			Self::KeepLow(count) => self.apply_keep_low(rolled, count),
			Self::RerollLowest(count) => self.apply_reroll_lowest(rolled, rng, count)?,
		}

		Ok(())
	}

	/// Applies the [`Self::Explode`] variant to a set of rolled dice.
	fn apply_explode(self, rolled: &mut Rolled<'_>, rng: &mut impl Roller, threshold: u32, cap: u32) -> Result<(), Error> {
		// Prevent exploding dice that would result in infinite explosions
		if threshold < 2 {
			return Err(Error::InfiniteRolls((*rolled.dice).clone()));
		}

		// Only the most recently added batch is checked each round
		let mut to_explode = rolled.rolls.iter().filter(|roll| roll.val >= threshold).count();

		for _ in 0..cap {
			// The set never grows past MAX_ROLLS, no matter how many rounds are left
			let batch = to_explode.min(MAX_ROLLS.saturating_sub(rolled.rolls.len()));
			if batch == 0 {
				break;
			}

			let mut explosions = Vec::with_capacity(batch);
			for _ in 0..batch {
				let mut roll = rng.roll_die(rolled.dice.sides);
				roll.add(self);
				explosions.push(roll);
			}

			let skipped = to_explode.saturating_sub(batch);
			to_explode = explosions
				.iter()
				.filter(|roll| roll.val >= threshold)
				.count()
				.saturating_add(skipped);
			rolled.rolls.append(&mut explosions);
		}

		#[cfg(feature = "logging")]
		{
			if to_explode > 0 {
				debug!(
					"explosion limit reached for {} (cap of {cap} rounds, {MAX_ROLLS} rolls); {to_explode} more dice \
					 were not rolled",
					rolled.dice
				);
			}
		}

		Ok(())
	}

	/// Applies the [`Self::KeepHigh`] variant to a set of rolled dice.
	fn apply_keep_high(self, rolled: &mut Rolled<'_>, count: u32) {
		let mut refs = rolled
			.rolls
			.iter_mut()
			.filter(|roll| roll.is_kept())
			.collect::<Vec<_>>();

		// Stable sort, so earlier rolls win ties
		refs.sort_by_key(|roll| cmp::Reverse(roll.val));
		refs.iter_mut().skip(count as usize).for_each(|roll| roll.drop(self));
	}

	/// Applies the [`Self::KeepLow`] variant to a set of rolled dice.
	fn apply_keep_low(self, rolled: &mut Rolled<'_>, count: u32) {
		let mut refs = rolled
			.rolls
			.iter_mut()
			.filter(|roll| roll.is_kept())
			.collect::<Vec<_>>();
		refs.sort();
		refs.iter_mut().skip(count as usize).for_each(|roll| roll.drop(self));
	}

	/// Applies the [`Self::RerollLowest`] variant to a set of rolled dice.
	fn apply_reroll_lowest(self, rolled: &mut Rolled<'_>, rng: &mut impl Roller, count: u32) -> Result<(), Error> {
		let keep = rolled
			.dice
			.count
			.checked_sub(count)
			.ok_or_else(|| Error::TooManyRerolls((*rolled.dice).clone()))?;
		self.apply_keep_high(rolled, keep);

		// Replacements use the sides of the dice being rerolled
		let sides = rolled.dice.sides;
		let mut rerolls = Vec::with_capacity(count as usize);
		for _ in 0..count {
			let mut reroll = rng.roll_die(sides);
			reroll.add(self);
			rerolls.push(reroll);
		}
		rolled.rolls.append(&mut rerolls);

		Ok(())
	}
}

impl fmt::Display for Modifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Explode { threshold, .. } => write!(f, "explode {threshold}"),
			Self::KeepHigh(count) => write!(f, "highest {count}"),
			Self::KeepLow(count) => write!(f, "lowest {count}"),
			Self::RerollLowest(count) => write!(f, "reroll {count}"),
		}
	}
}
