//! Grammar for dice expressions, producing a [`ParseTree`] for [`build`](crate::build) to turn into an
//! [`Expr`](crate::Expr).
//!
//! The parse tree keeps tokens as the text they were written as, and keeps sums and products as a first operand
//! followed by a list of (operator, operand) pairs so that operand order survives into the built expression.

#![cfg(feature = "parse")]

use std::ops::Range;

use chumsky::{prelude::*, span::Span as _};
#[cfg(feature = "logging")]
use log::debug;

/// Number of characters shown on either side of a syntax error in its context window
pub const CONTEXT_SPAN: usize = 20;

/// Extra parser state/error types used by every parser in this module
type Extra<'src> = extra::Err<Rich<'src, char>>;

/// Result of parsing a full input: one entry per comma-separated expression
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct ParseTree<'src> {
	/// Entries in the order they were written
	pub entries: Vec<Entry<'src>>,
}

/// Single expression along with the comments around it (`pre: expr # post`)
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Entry<'src> {
	/// Comment written before the expression, if any (untrimmed)
	pub pre_comment: Option<String>,

	/// The expression itself
	pub node: Node<'src>,

	/// Comment written after the expression, if any (untrimmed)
	pub post_comment: Option<String>,
}

/// Node of the parse tree
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Node<'src> {
	/// Integer literal
	Int(&'src str),

	/// Decimal literal
	Decimal(String),

	/// Dice roll (e.g. `4d6`, `d20`, `2d10 explode 10`)
	Roll(Roll<'src>),

	/// Hit-counting check (e.g. `3d6 >= 5`)
	Hits {
		/// Dice to roll
		roll: Roll<'src>,

		/// Comparison symbol, as written
		cmp: &'src str,

		/// Value each roll is compared against
		threshold: &'src str,
	},

	/// One of the `nb` shorthand checks (e.g. `nb hard 4`)
	Nb {
		/// Difficulty of the check
		difficulty: Difficulty,

		/// Number of dice to roll
		count: &'src str,
	},

	/// Negation (`-x`)
	Neg(Box<Self>),

	/// Chain of powers (`a ^ b`); anything other than exactly two operands is rejected when building
	Power(Vec<Self>),

	/// Product of a first operand and any number of multiplied or divided operands
	Product(Box<Self>, Vec<(MulOp, Self)>),

	/// Sum of a first operand and any number of added or subtracted operands
	Sum(Box<Self>, Vec<(AddOp, Self)>),
}

/// Dice roll as written
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Roll<'src> {
	/// Number of dice, if written
	pub count: Option<&'src str>,

	/// Number of sides per die
	pub sides: &'src str,

	/// Modifier keyword and its argument, if written
	pub modifier: Option<(RollMod, &'src str)>,
}

/// Modifier keywords for dice rolls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "Fixed by the grammar")]
pub enum RollMod {
	/// `explode N`
	Explode,

	/// `highest N`
	Highest,

	/// `lowest N`
	Lowest,

	/// `reroll N`
	Reroll,
}

/// Difficulties of the `nb` shorthand checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "Fixed by the grammar")]
pub enum Difficulty {
	/// `nb easy N`: hits on 4+
	Easy,

	/// `nb normal N`: hits on 5+
	Normal,

	/// `nb hard N`: hits on 6
	Hard,
}

impl Difficulty {
	/// Gets the minimum d6 roll that counts as a hit at this difficulty.
	#[must_use]
	pub const fn threshold(self) -> u32 {
		match self {
			Self::Easy => 4,
			Self::Normal => 5,
			Self::Hard => 6,
		}
	}
}

/// Additive operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "Fixed by the grammar")]
pub enum AddOp {
	/// `+`
	Add,

	/// `-`
	Sub,
}

/// Multiplicative operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "Fixed by the grammar")]
pub enum MulOp {
	/// `*`
	Mul,

	/// `/`
	Div,
}

/// Generates a parser for positive integers (no leading zeroes)
fn posint<'src>() -> impl Parser<'src, &'src str, &'src str, Extra<'src>> + Clone {
	text::int::<&'src str, _, _>(10)
		.try_map(|digits: &'src str, span| {
			if digits == "0" {
				Err(Rich::custom(span, "expected a positive integer"))
			} else {
				Ok(digits)
			}
		})
		.labelled("positive integer")
}

/// Generates a parser that specifically handles dice terms like "d20", "4d6 highest 3", "2d10 explode 10", etc.
pub fn roll<'src>() -> impl Parser<'src, &'src str, Roll<'src>, Extra<'src>> + Clone {
	let modifier = choice((
		just("explode").to(RollMod::Explode),
		just("highest").to(RollMod::Highest),
		just("lowest").to(RollMod::Lowest),
		just("reroll").to(RollMod::Reroll),
	))
	.padded()
	.then(posint());

	posint()
		.or_not()
		.then_ignore(one_of("dD").padded())
		.then(posint())
		.then(modifier.or_not())
		.map(|((count, sides), modifier)| Roll {
			count,
			sides,
			modifier,
		})
		.labelled("dice roll")
}

/// Generates a parser for dice rolls that may be followed by a comparison, turning them into hit checks
/// (e.g. "3d6 >= 5", "4d6 highest 3 > 4"), and for the `nb` shorthand checks (e.g. "nb easy 5")
pub fn check<'src>() -> impl Parser<'src, &'src str, Node<'src>, Extra<'src>> + Clone {
	let cmp = choice((
		just(">="),
		just("≥"),
		just("<="),
		just("≤"),
		just("!="),
		just("≠"),
		just("=="),
		just(">"),
		just("<"),
		just("="),
	))
	.padded()
	.labelled("comparison");

	let hits = roll()
		.then(cmp.then(text::int(10)).or_not())
		.map(|(roll, check)| match check {
			Some((cmp, threshold)) => Node::Hits { roll, cmp, threshold },
			None => Node::Roll(roll),
		});

	let nb = just("nb")
		.ignore_then(
			choice((
				just("easy").to(Difficulty::Easy),
				just("normal").to(Difficulty::Normal),
				just("hard").to(Difficulty::Hard),
			))
			.padded(),
		)
		.then(posint())
		.map(|(difficulty, count)| Node::Nb { difficulty, count })
		.labelled("nb check");

	nb.or(hits)
}

/// Generates a parser for integer and decimal numbers
fn number<'src>() -> impl Parser<'src, &'src str, Node<'src>, Extra<'src>> + Clone {
	text::int::<&'src str, _, _>(10)
		.then(just('.').ignore_then(text::digits(10).collect::<String>()).or_not())
		.map(|(whole, frac)| match frac {
			Some(frac) => Node::Decimal(format!("{whole}.{frac}")),
			None => Node::Int(whole),
		})
		.labelled("number")
}

/// Generates a parser that handles full arithmetic expressions including grouping with parentheses, dice rolls, hit
/// checks, etc.
pub fn expr<'src>() -> impl Parser<'src, &'src str, Node<'src>, Extra<'src>> + Clone {
	recursive(|expr| {
		let atom = choice((
			check(),
			number(),
			expr.padded().delimited_by(just('('), just(')')),
		))
		.padded();

		// Parser for an optional negative sign
		let neg = just('-')
			.padded()
			.or_not()
			.then(atom)
			.map(|(minus, node)| match minus {
				Some(..) => Node::Neg(Box::new(node)),
				None => node,
			});

		// Parser for powers, kept as a flat list
		let power = neg
			.separated_by(just('^').padded())
			.at_least(1)
			.collect::<Vec<_>>()
			.map(|operands| match <[Node; 1]>::try_from(operands) {
				Ok([single]) => single,
				Err(operands) => Node::Power(operands),
			});

		// Parser for multiplication and division
		let product = power
			.clone()
			.then(
				choice((just('*').to(MulOp::Mul), just('/').to(MulOp::Div)))
					.padded()
					.then(power)
					.repeated()
					.collect::<Vec<_>>(),
			)
			.map(|(first, rest)| {
				if rest.is_empty() {
					first
				} else {
					Node::Product(Box::new(first), rest)
				}
			});

		// Parser for addition and subtraction
		product
			.clone()
			.then(
				choice((just('+').to(AddOp::Add), just('-').to(AddOp::Sub)))
					.padded()
					.then(product)
					.repeated()
					.collect::<Vec<_>>(),
			)
			.map(|(first, rest)| {
				if rest.is_empty() {
					first
				} else {
					Node::Sum(Box::new(first), rest)
				}
			})
	})
}

/// Parses a full input into a parse tree.
///
/// Entries are separated by commas, and each can have a comment before it (ending with `:`) and a comment after it
/// (starting with `#`). Neither kind of comment can contain a comma, and a comment before an entry can't contain `#`.
///
/// # Errors
/// If the input doesn't match the grammar, an error variant is returned describing where.
///
/// # Examples
/// ```
/// use rollspec::parse::{parse, Node};
///
/// let tree = parse("d20 + 12")?;
/// assert_eq!(tree.entries.len(), 1);
/// assert!(matches!(tree.entries[0].node, Node::Sum(..)));
///
/// let err = parse("d20 + + 12").unwrap_err();
/// assert_eq!(err.excerpt, "+");
/// # Ok::<(), rollspec::parse::Error>(())
/// ```
#[expect(clippy::arithmetic_side_effects, reason = "Offsets never exceed the input length")]
pub fn parse(input: &str) -> Result<ParseTree<'_>, Error> {
	let mut entries = Vec::new();
	let mut offset = 0;

	for segment in input.split(',') {
		match parse_entry(input, segment, offset) {
			Ok(entry) => entries.push(entry),
			Err(err) => {
				#[cfg(feature = "logging")]
				debug!("failed to parse {input:?} at byte {}: {err}", err.span.start);
				return Err(err);
			}
		}
		offset += segment.len() + 1;
	}

	Ok(ParseTree { entries })
}

/// Parses a single comma-separated entry of the input, starting at `offset` bytes into it.
#[expect(clippy::arithmetic_side_effects, reason = "Offsets never exceed the input length")]
fn parse_entry<'src>(input: &'src str, segment: &'src str, offset: usize) -> Result<Entry<'src>, Error> {
	let (body, post_comment) = match segment.split_once('#') {
		Some((body, post)) => (body, Some(post.to_owned())),
		None => (segment, None),
	};
	let (pre_comment, source, offset) = match body.split_once(':') {
		Some((pre, rest)) if !pre.is_empty() => (Some(pre.to_owned()), rest, offset + pre.len() + 1),
		_ => (None, body, offset),
	};

	let node = expr()
		.padded()
		.then_ignore(end())
		.parse(source)
		.into_result()
		.map_err(|errs| match errs.into_iter().next() {
			Some(err) => Error::new(
				input,
				offset + err.span().start()..offset + err.span().end(),
				err.to_string(),
			),
			None => Error::new(input, offset..offset + source.len(), "invalid dice expression"),
		})?;

	Ok(Entry {
		pre_comment,
		node,
		post_comment,
	})
}

/// Error for input that doesn't match the grammar
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("syntax error at \"{excerpt}\": {message}")]
#[non_exhaustive]
pub struct Error {
	/// Description of what was found and what was expected
	pub message: String,

	/// Byte range of the input where the error occurred
	pub span: Range<usize>,

	/// Part of the input where the error occurred, or `end of input`
	pub excerpt: String,

	/// Window of the input around the error, with a caret on the line below pointing at it
	pub context: String,
}

impl Error {
	/// Creates a new error for a span of the input.
	#[must_use]
	pub fn new(input: &str, span: Range<usize>, message: impl Into<String>) -> Self {
		let start = floor_char_boundary(input, span.start);
		let end = floor_char_boundary(input, span.end.max(start));

		let excerpt = match (&input[start..end], input[start..].chars().next()) {
			("", None) => "end of input".to_owned(),
			("", Some(next)) => next.to_string(),
			(excerpt, _) => excerpt.to_owned(),
		};

		Self {
			message: message.into(),
			span: start..end,
			excerpt,
			context: context_window(input, start, CONTEXT_SPAN),
		}
	}
}

/// Builds the text around a position in the input (up to `span` characters on either side, limited to the same
/// line), followed by a line with a caret under the position.
///
/// # Examples
/// ```
/// use rollspec::parse::context_window;
///
/// assert_eq!(context_window("4d6 highets 3", 4, 20), "4d6 highets 3\n    ^\n");
/// ```
#[must_use]
pub fn context_window(input: &str, pos: usize, span: usize) -> String {
	let pos = floor_char_boundary(input, pos);
	let (before, after) = input.split_at(pos);

	let before = before.chars().rev().take(span).collect::<Vec<_>>().into_iter().rev().collect::<String>();
	let before = before.rsplit('\n').next().unwrap_or_default();
	let after = after.chars().take(span).collect::<String>();
	let after = after.split('\n').next().unwrap_or_default();

	format!("{before}{after}\n{}^\n", " ".repeat(before.chars().count()))
}

/// Moves a byte position back to the nearest character boundary, clamped to the input.
fn floor_char_boundary(input: &str, pos: usize) -> usize {
	let mut pos = pos.min(input.len());
	while !input.is_char_boundary(pos) {
		pos = pos.saturating_sub(1);
	}
	pos
}
