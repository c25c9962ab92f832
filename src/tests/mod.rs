#[cfg(feature = "parse")]
mod build;
mod expr;
mod num;
#[cfg(feature = "parse")]
mod parse;
