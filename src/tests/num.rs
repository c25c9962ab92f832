use crate::{
	expr::CalcError,
	num::{Number, Value},
};

#[test]
fn integer_arithmetic_stays_integral() {
	let sum = Number::Int(42).checked_add(Number::Int(69)).unwrap();
	assert!(sum.is_int());
	assert_eq!(sum, Number::Int(111));

	let product = Number::Int(-5).checked_mul(Number::Int(4)).unwrap();
	assert!(product.is_int());
	assert_eq!(product, Number::Int(-20));

	let power = Number::Int(2).checked_pow(Number::Int(10)).unwrap();
	assert!(power.is_int());
	assert_eq!(power, Number::Int(1024));
}

#[test]
fn division_always_promotes() {
	let quotient = Number::Int(6).checked_div(Number::Int(2)).unwrap();
	assert!(!quotient.is_int());
	assert_eq!(quotient.to_string(), "3.0");

	let quotient = Number::Int(50).checked_div(Number::Int(4)).unwrap();
	assert_eq!(quotient, Number::Float(12.5));
}

#[test]
fn negative_powers_promote() {
	let power = Number::Int(2).checked_pow(Number::Int(-1)).unwrap();
	assert_eq!(power, Number::Float(0.5));
	assert_eq!(power.to_string(), "0.5");
}

#[test]
fn mixed_arithmetic_promotes() {
	let sum = Number::Int(1).checked_add(Number::Float(0.5)).unwrap();
	assert_eq!(sum, Number::Float(1.5));
	assert_eq!(Number::Float(2.0).to_string(), "2.0");
	assert_eq!(Number::Int(2), Number::Float(2.0));
	assert!(Number::Int(2) < Number::Float(2.5));
}

#[test]
fn small_bases_with_huge_exponents() {
	assert_eq!(Number::Int(1).checked_pow(Number::Int(99_999_999_999)).unwrap(), Number::Int(1));
	assert_eq!(Number::Int(0).checked_pow(Number::Int(99_999_999_999)).unwrap(), Number::Int(0));
	assert_eq!(Number::Int(0).checked_pow(Number::Int(0)).unwrap(), Number::Int(1));
	assert_eq!(Number::Int(-1).checked_pow(Number::Int(99_999_999_999)).unwrap(), Number::Int(-1));
	assert_eq!(Number::Int(-1).checked_pow(Number::Int(99_999_999_998)).unwrap(), Number::Int(1));
	assert!(Number::Int(1).checked_pow(Number::Int(99_999_999_999)).unwrap().is_int());
	assert!(matches!(Number::Int(2).checked_pow(Number::Int(99_999_999_999)), Err(CalcError::Overflow)));
}

#[test]
fn extreme_decimals_use_exponents() {
	assert_eq!(Number::Float(1e16).to_string(), "1e+16");
	assert_eq!(Number::Float(1.5e-5).to_string(), "1.5e-05");
	assert_eq!(Number::Float(-2.5e20).to_string(), "-2.5e+20");
	assert_eq!(Number::Float(1.234_567_890_123_456_8e17).to_string(), "1.2345678901234568e+17");
	assert_eq!(Number::Float(1e-4).to_string(), "0.0001");
	assert_eq!(Number::Float(1e15).to_string(), "1000000000000000.0");
}

#[test]
fn division_by_zero() {
	assert!(matches!(Number::Int(1).checked_div(Number::Int(0)), Err(CalcError::Division)));
	assert!(matches!(Number::Int(1).checked_div(Number::Float(0.0)), Err(CalcError::Division)));
	assert!(matches!(Number::Int(0).checked_pow(Number::Int(-1)), Err(CalcError::Division)));
}

#[test]
fn overflow() {
	assert!(matches!(Number::Int(i64::MAX).checked_add(Number::Int(1)), Err(CalcError::Overflow)));
	assert!(matches!(Number::Int(i64::MAX).checked_mul(Number::Int(2)), Err(CalcError::Overflow)));
	assert!(matches!(Number::Int(i64::MIN).checked_neg(), Err(CalcError::Overflow)));
	assert!(matches!(Number::Int(10).checked_pow(Number::Int(100)), Err(CalcError::Overflow)));
}

#[test]
fn not_real() {
	assert!(matches!(Number::Int(-8).checked_pow(Number::Float(0.5)), Err(CalcError::NotReal)));
}

#[test]
fn value_display() {
	assert_eq!(Value::Num(Number::Int(7)).to_string(), "7");
	assert_eq!(
		Value::List(vec![Value::Num(Number::Int(3)), Value::Num(Number::Float(0.25))]).to_string(),
		"[3, 0.25]"
	);
}

#[test]
fn lists_are_not_numbers() {
	let list = Value::List(vec![Value::Num(Number::Int(3))]);
	assert_eq!(list.as_num(), None);
	assert!(matches!(list.into_num(), Err(CalcError::NotANumber)));
	assert_eq!(Value::Num(Number::Int(3)).into_num().unwrap(), Number::Int(3));
}
