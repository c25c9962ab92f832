#![feature(test)]

extern crate test;

use test::Bencher;

use rollspec::{build::build, parse::parse};

#[bench]
fn parse_basic(b: &mut Bencher) {
	b.iter(|| parse("4d8 + 4").unwrap());
}

#[bench]
fn parse_complex(b: &mut Bencher) {
	b.iter(|| parse("4d8 explode 8 + 2d10 highest 1 * (-3d6 - 6 / 2 ^ 4)").unwrap());
}

#[bench]
fn parse_commented_list(b: &mut Bencher) {
	b.iter(|| parse("attack: d20 + 7 # longsword, damage: 1d8 + 4, nb hard 5").unwrap());
}

#[bench]
fn parse_and_build_complex(b: &mut Bencher) {
	b.iter(|| build(parse("4d8 explode 8 + 2d10 highest 1 * (-3d6 - 6 / 2 ^ 4)").unwrap()).unwrap());
}
