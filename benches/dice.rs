#![feature(test)]

extern crate test;

use std::borrow::Cow;

use test::Bencher;

use rollspec::{
	dice::{
		hits::{Condition, Hits},
		roller::{FastRand, Roller},
		Dice, DieRoll, Rolled,
	},
	expr::Describe,
};

#[bench]
fn roll_4d8(b: &mut Bencher) {
	let dice = Dice::new(4, 8);
	let mut rng = FastRand::default();
	b.iter(|| rng.roll(&dice, true).unwrap());
}

#[bench]
fn roll_8d6_explode_6(b: &mut Bencher) {
	let dice = Dice::builder().count(8).sides(6).explode(6).build();
	let mut rng = FastRand::default();
	b.iter(|| rng.roll(&dice, true).unwrap());
}

#[bench]
fn roll_100d20(b: &mut Bencher) {
	let dice = Dice::new(100, 20);
	let mut rng = FastRand::default();
	b.iter(|| rng.roll(&dice, true).unwrap())
}

#[bench]
fn roll_100d20_highest_10(b: &mut Bencher) {
	let dice = Dice::builder().count(100).sides(20).keep_high(10).build();
	let mut rng = FastRand::default();
	b.iter(|| rng.roll(&dice, true).unwrap())
}

#[bench]
fn roll_and_total_100d20(b: &mut Bencher) {
	let dice = Dice::new(100, 20);
	let mut rng = FastRand::default();
	b.iter(|| rng.roll(&dice, true).unwrap().total().unwrap());
}

#[bench]
fn count_hits_20d6(b: &mut Bencher) {
	let hits = Hits::new(Dice::new(20, 6), Condition::Gte(5));
	let mut rng = FastRand::default();
	b.iter(|| hits.roll(&mut rng).unwrap().count());
}

#[bench]
fn describe_4d8_result(b: &mut Bencher) {
	let dice = Dice::new(4, 8);
	let rolled = Rolled {
		rolls: vec![DieRoll::new(6), DieRoll::new(6), DieRoll::new(6), DieRoll::new(6)],
		dice: Cow::Owned(dice),
	};
	b.iter(|| rolled.describe(None))
}
