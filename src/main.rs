use std::{
	env,
	io::{self, Write},
	process::ExitCode,
};

use ariadne::{Color, Label, Report, ReportKind, Source};
use rollspec::roll::{self, Error};

fn main() -> io::Result<ExitCode> {
	pretty_env_logger::init();

	let args = env::args();
	let input = if args.len() > 1 {
		// Obtain the expression by combining all args passed to the executable, so that it can be left unquoted
		// even with spaces. The first argument is ignored since it is typically the name of the executable itself.
		args.skip(1).collect::<Vec<String>>().join(" ")
	} else {
		let mut lines = io::stdin().lines();

		// If there isn't already input available in stdin, display a prompt for it
		if lines.size_hint().1.is_none() {
			print!("Enter dice expression: ");
			io::stdout().flush()?;
		}

		// Grab the first line available from stdin
		match lines.next() {
			Some(line) => line?,
			None => return Ok(ExitCode::FAILURE),
		}
	};

	log::info!("rolling {input:?}");

	match roll::roll_spec(&input) {
		Ok(outcome) => {
			println!("Notation: {}", outcome.notation);
			println!("Trace: {}", outcome.trace);
			println!("Value: {}", outcome.value);
			println!();
			println!("{outcome}");
			Ok(ExitCode::SUCCESS)
		}
		Err(err) => {
			if let Error::Syntax(syntax) = &err {
				// Report spans are in characters rather than bytes
				let start = input[..syntax.span.start].chars().count();
				let end = start + input[syntax.span.clone()].chars().count().max(1);

				Report::build(ReportKind::Error, start..end)
					.with_message("invalid dice expression")
					.with_label(
						Label::new(start..end)
							.with_message(&syntax.message)
							.with_color(Color::Red),
					)
					.finish()
					.eprint(Source::from(&input))?;
			} else {
				eprintln!("Error: {err}");
			}

			println!("{}", err.reply());
			Ok(ExitCode::FAILURE)
		}
	}
}
