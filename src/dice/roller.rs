//! Abstractions for rolling [`DieRoll`]s using various means.

use std::{borrow::Cow, iter::Peekable};

#[cfg(feature = "fastrand")]
use fastrand::Rng;
#[cfg(feature = "logging")]
use log::debug;

use super::{Dice, DieRoll, Error, Rolled, MAX_DICE};

/// Rolls dice - what else is there to say?
pub trait Roller {
	/// Rolls a single die.
	#[must_use]
	fn roll_die(&mut self, sides: u32) -> DieRoll;

	/// Rolls a set of dice and optionally applies its modifier to the rolls.
	///
	/// # Errors
	/// If the dice would roll more than [`MAX_DICE`] dice, or any errors are encountered while applying the dice's
	/// modifier, an error variant is returned.
	fn roll<'d, 'r>(&mut self, dice: &'d Dice, apply_mods: bool) -> Result<Rolled<'r>, Error>
	where
		'd: 'r,
		Self: Sized,
	{
		if dice.count > MAX_DICE {
			return Err(Error::TooManyDice(dice.clone()));
		}

		// Roll the dice!
		let mut rolls = Vec::with_capacity(dice.count as usize);
		for _ in 0..dice.count {
			rolls.push(self.roll_die(dice.sides));
		}

		let mut rolled = Rolled {
			rolls,
			dice: Cow::Borrowed(dice),
		};

		// Apply the dice's modifier
		if apply_mods {
			if let Some(modifier) = dice.modifier {
				modifier.apply(&mut rolled, self)?;
			}
		}

		#[cfg(feature = "logging")]
		debug!(
			"rolled {dice}: {:?}",
			rolled.rolls.iter().map(ToString::to_string).collect::<Vec<_>>()
		);

		Ok(rolled)
	}
}

/// Generates rolls with random values using [fastrand]. Requires the `fastrand` feature (enabled by default).
///
/// # Examples
///
/// ## Rolling with modifiers
/// ```
/// use rollspec::dice::{roller::{FastRand as FastRandRoller, Roller}, Dice};
///
/// let mut roller = FastRandRoller::default();
///
/// // Rerolled dice are appended after the originals, so there are always 6 rolls with 4 of them kept
/// let dice = Dice::builder().count(4).sides(6).reroll_lowest(2).build();
/// let rolled = roller.roll(&dice, true)?;
/// assert_eq!(rolled.rolls.len(), 6);
/// assert_eq!(rolled.rolls.iter().filter(|roll| roll.is_kept()).count(), 4);
///
/// // Exploding dice never end up with fewer rolls than they started with
/// let dice = Dice::builder().count(3).sides(10).explode(10).build();
/// let rolled = roller.roll(&dice, true)?;
/// assert!(rolled.rolls.len() >= 3);
/// assert!(rolled.rolls.iter().all(|roll| (1..=10).contains(&roll.val)));
/// # Ok::<(), rollspec::dice::Error>(())
/// ```
///
/// ## Seeded rolls for repeatable results
/// ```
/// use rollspec::{dice::roller::FastRand as FastRandRoller, roll_spec_using};
///
/// let first = roll_spec_using("nb hard 8, 4d6 highest 3", &mut FastRandRoller::with_seed(0xd1ce))?;
/// let second = roll_spec_using("nb hard 8, 4d6 highest 3", &mut FastRandRoller::with_seed(0xd1ce))?;
/// assert_eq!(first.trace, second.trace);
/// assert_eq!(first.value, second.value);
/// # Ok::<(), rollspec::roll::Error>(())
/// ```
#[cfg(feature = "fastrand")]
#[derive(Debug, Clone, Default)]
pub struct FastRand(Rng);

#[cfg(feature = "fastrand")]
impl FastRand {
	/// Creates a new fastrand roller that uses the given RNG instance to generate rolls.
	#[must_use]
	#[inline]
	pub const fn new(rng: Rng) -> Self {
		Self(rng)
	}

	/// Creates a new fastrand roller that uses a pre-seeded RNG instance to generate rolls.
	#[must_use]
	#[inline]
	pub fn with_seed(seed: u64) -> Self {
		Self(Rng::with_seed(seed))
	}
}

#[cfg(feature = "fastrand")]
impl Roller for FastRand {
	/// Rolls a single die using the [`fastrand::Rng`] the roller was created with.
	#[inline]
	fn roll_die(&mut self, sides: u32) -> DieRoll {
		if sides > 0 {
			DieRoll::new(self.0.u32(1..=sides))
		} else {
			DieRoll::new(0)
		}
	}
}

/// Generates rolls that always have a specific value.
///
/// # Examples
/// ```
/// use rollspec::dice::{roller::{Roller, Val as ValRoller}, Dice};
///
/// let mut roller = ValRoller(42);
///
/// let dice = Dice::new(4, 6);
/// let rolled = roller.roll(&dice, true)?;
/// assert!(rolled.rolls.iter().all(|roll| roll.val == 42));
/// # Ok::<(), rollspec::dice::Error>(())
/// ```
#[derive(Debug, Default, Clone)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Val(pub u32);

impl Roller for Val {
	/// Rolls a single die, always with one specific value.
	#[inline]
	fn roll_die(&mut self, _sides: u32) -> DieRoll {
		DieRoll::new(self.0)
	}
}

/// Generates rolls that always have their max value.
///
/// # Examples
/// ```
/// use rollspec::dice::{roller::{Max as MaxRoller, Roller}, Dice};
///
/// let mut roller = MaxRoller;
///
/// let dice = Dice::new(2, 20);
/// let rolled = roller.roll(&dice, true)?;
/// assert!(rolled.rolls.iter().all(|roll| roll.val == 20));
/// # Ok::<(), rollspec::dice::Error>(())
/// ```
#[derive(Debug, Default, Clone)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Max;

impl Roller for Max {
	/// Rolls a single die, always with the max value (same as the number of sides).
	#[inline]
	fn roll_die(&mut self, sides: u32) -> DieRoll {
		DieRoll::new(sides)
	}
}

/// Generates rolls from an iterator of values. Mainly useful for testing purposes.
///
/// # Examples
/// ```
/// use rollspec::dice::{roller::{Iter as IterRoller, Roller}, Dice, DieRoll};
///
/// let mut roller = IterRoller::new(vec![1, 2, 3, 4, 10]);
/// let dice = Dice::new(5, 6);
/// assert_eq!(
/// 	roller.roll(&dice, true)?.rolls,
/// 	vec![DieRoll::new(1), DieRoll::new(2), DieRoll::new(3), DieRoll::new(4), DieRoll::new(10)]
/// );
/// # Ok::<(), rollspec::dice::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Iter<I: Iterator<Item = u32>>(Peekable<I>);

impl<I: Iterator<Item = u32>> Iter<I> {
	/// Checks whether the iterator still has values available.
	#[inline]
	pub fn can_roll(&mut self) -> bool {
		self.0.peek().is_some()
	}

	/// Creates a new roller that uses the given iterator to provide roll values.
	#[must_use]
	#[inline]
	pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
		Self(iter.into_iter().peekable())
	}
}

impl<I: Iterator<Item = u32>> Roller for Iter<I> {
	/// Rolls a die with the value from the next iteration.
	///
	/// # Panics
	/// If the iterator has finished, this will panic.
	#[inline]
	#[expect(
		clippy::expect_used,
		reason = "Mostly for testing, otherwise manual checking of can_roll() is expected"
	)]
	fn roll_die(&mut self, _sides: u32) -> DieRoll {
		DieRoll::new(self.0.next().expect("iterator is finished"))
	}
}
