//! Numeric values produced by literals and calculations.
//!
//! Integers are kept as integers for as long as every input to an operation is an integer and the operation can't
//! produce a fractional result. Division (and raising to a negative power) always promotes to decimal arithmetic.

use std::fmt;

use crate::expr::CalcError;

/// A single numeric value: either an integer or a decimal
#[derive(Debug, Clone, Copy)]
#[expect(clippy::exhaustive_enums, reason = "A number is either integral or it isn't")]
pub enum Number {
	/// Whole number
	Int(i64),

	/// Decimal number
	Float(f64),
}

impl Number {
	/// Additive identity
	pub const ZERO: Self = Self::Int(0);

	/// Multiplicative identity
	pub const ONE: Self = Self::Int(1);

	/// Gets the value as a decimal, converting integers as needed.
	#[must_use]
	#[expect(clippy::cast_precision_loss, reason = "Matches the promotion semantics of mixed arithmetic")]
	pub fn as_float(self) -> f64 {
		match self {
			Self::Int(x) => x as f64,
			Self::Float(x) => x,
		}
	}

	/// Checks whether the value is an integer variant.
	#[must_use]
	#[inline]
	pub const fn is_int(self) -> bool {
		matches!(self, Self::Int(..))
	}

	/// Negates the value.
	///
	/// # Errors
	/// If negating an integer overflows, an error variant is returned.
	pub fn checked_neg(self) -> Result<Self, CalcError> {
		match self {
			Self::Int(x) => x.checked_neg().map(Self::Int).ok_or(CalcError::Overflow),
			Self::Float(x) => Ok(Self::Float(-x)),
		}
	}

	/// Adds two values together.
	///
	/// # Errors
	/// If adding two integers overflows, an error variant is returned.
	pub fn checked_add(self, rhs: Self) -> Result<Self, CalcError> {
		match (self, rhs) {
			(Self::Int(a), Self::Int(b)) => a.checked_add(b).map(Self::Int).ok_or(CalcError::Overflow),
			(a, b) => finite(a.as_float() + b.as_float()),
		}
	}

	/// Multiplies two values together.
	///
	/// # Errors
	/// If multiplying two integers overflows, an error variant is returned.
	pub fn checked_mul(self, rhs: Self) -> Result<Self, CalcError> {
		match (self, rhs) {
			(Self::Int(a), Self::Int(b)) => a.checked_mul(b).map(Self::Int).ok_or(CalcError::Overflow),
			(a, b) => finite(a.as_float() * b.as_float()),
		}
	}

	/// Divides the value by another. The result is always a decimal.
	///
	/// # Errors
	/// If the divisor is zero, an error variant is returned.
	pub fn checked_div(self, rhs: Self) -> Result<Self, CalcError> {
		if rhs.is_zero() {
			return Err(CalcError::Division);
		}
		finite(self.as_float() / rhs.as_float())
	}

	/// Raises the value to the power of another.
	///
	/// # Errors
	/// If the integer result overflows, zero is raised to a negative power, or the result isn't a real number, an
	/// error variant is returned.
	pub fn checked_pow(self, exp: Self) -> Result<Self, CalcError> {
		if self.is_zero() && exp.as_float() < 0.0 {
			return Err(CalcError::Division);
		}

		match (self, exp) {
			// These bases never overflow, however large the exponent
			(Self::Int(base @ -1..=1), Self::Int(exp)) if exp >= 0 => Ok(Self::Int(match (base, exp) {
				(_, 0) | (1, _) => 1,
				(0, _) => 0,
				_ if exp % 2 == 0 => 1,
				_ => -1,
			})),
			(Self::Int(base), Self::Int(exp)) if exp >= 0 => {
				let exp = u32::try_from(exp).map_err(|_err| CalcError::Overflow)?;
				base.checked_pow(exp).map(Self::Int).ok_or(CalcError::Overflow)
			}
			(base, exp) => finite(base.as_float().powf(exp.as_float())),
		}
	}

	/// Checks whether the value is zero (of either variant).
	#[must_use]
	#[expect(clippy::float_cmp, reason = "Exact comparison against zero is intended")]
	pub fn is_zero(self) -> bool {
		match self {
			Self::Int(x) => x == 0,
			Self::Float(x) => x == 0.0,
		}
	}
}

/// Wraps a decimal result, rejecting values that aren't real numbers.
fn finite(val: f64) -> Result<Number, CalcError> {
	if val.is_nan() {
		Err(CalcError::NotReal)
	} else if val.is_infinite() {
		Err(CalcError::Overflow)
	} else {
		Ok(Number::Float(val))
	}
}

impl PartialEq for Number {
	/// Compares numerically, so `Int(2) == Float(2.0)`.
	#[expect(clippy::float_cmp, reason = "Numeric equality across variants is the intended semantics")]
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Int(a), Self::Int(b)) => a == b,
			(a, b) => a.as_float() == b.as_float(),
		}
	}
}

impl PartialOrd for Number {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		match (self, other) {
			(Self::Int(a), Self::Int(b)) => a.partial_cmp(b),
			(a, b) => a.as_float().partial_cmp(&b.as_float()),
		}
	}
}

impl From<i64> for Number {
	fn from(x: i64) -> Self {
		Self::Int(x)
	}
}

impl From<f64> for Number {
	fn from(x: f64) -> Self {
		Self::Float(x)
	}
}

impl fmt::Display for Number {
	/// Integers are written plainly, and decimals always include a fractional part (`2.0`, `0.5`). Very large and
	/// very small decimals use an exponent with a sign and at least two digits (`1e+16`, `1.5e-05`).
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Int(x) => fmt::Display::fmt(x, f),
			Self::Float(x) => {
				let repr = format!("{x:?}");
				match repr.split_once('e') {
					Some((mantissa, exp)) => {
						let (sign, digits) = exp.strip_prefix('-').map_or(("+", exp), |digits| ("-", digits));
						write!(f, "{mantissa}e{sign}{digits:0>2}")
					}
					None => f.write_str(&repr),
				}
			}
		}
	}
}

/// Final result of a calculation: a single number, or an ordered list of them for comma-separated expressions
#[derive(Debug, Clone, PartialEq)]
#[expect(clippy::exhaustive_enums, reason = "Results are either single or listed")]
pub enum Value {
	/// Single numeric result
	Num(Number),

	/// Ordered results of independent sub-expressions
	List(Vec<Value>),
}

impl Value {
	/// Gets the single number this value holds, if it isn't a list.
	#[must_use]
	pub const fn as_num(&self) -> Option<Number> {
		match self {
			Self::Num(num) => Some(*num),
			Self::List(..) => None,
		}
	}

	/// Gets the number this value holds, failing if it's a list.
	///
	/// # Errors
	/// If the value is a list, an error variant is returned.
	pub fn into_num(self) -> Result<Number, CalcError> {
		match self {
			Self::Num(num) => Ok(num),
			Self::List(..) => Err(CalcError::NotANumber),
		}
	}
}

impl From<Number> for Value {
	fn from(num: Number) -> Self {
		Self::Num(num)
	}
}

impl fmt::Display for Value {
	/// Single values are written as their number, and lists are written like `[3, 12]`.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Num(num) => write!(f, "{num}"),
			Self::List(vals) => write!(
				f,
				"[{}]",
				vals.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
			),
		}
	}
}
