use std::{path::PathBuf, process::ExitCode};

use archi::{
	frontend::{lex::tokenize, pretty::dump_tokens},
	ir::context::TypeContext,
	session::{read_source, Outcome, Response, Session, Status},
};
use bpaf::{construct, long, positional, pure, short, Parser};
use rustyline::{error::ReadlineError, DefaultEditor};
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
enum InputOption {
	Direct(String),
	FilePath(PathBuf),
	Repl,
}

struct Options {
	tokens: bool,
	verbose: bool,
	input: InputOption,
}

fn options() -> Options {
	let tokens = long("tokens").help("Print the token stream before parsing").switch();
	let verbose = short('v').long("verbose").help("Log debug events to stderr").switch();
	let direct = short('c').argument::<String>("SOURCE").help("Read input from argument").map(InputOption::Direct);
	let file = positional::<PathBuf>("FILE").help("Read input from file").map(InputOption::FilePath);
	let repl = pure(InputOption::Repl);
	let input = construct!([direct, file, repl]);
	construct!(Options { tokens, verbose, input }).to_options().run()
}

fn init_logging(verbose: bool) {
	let filter = if verbose {
		EnvFilter::new("debug")
	} else {
		EnvFilter::try_from_env("ARCHI_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
	};
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn run(session: &mut Session, source: &[u8], outer: Option<&TypeContext>, tokens: bool) -> Outcome {
	if tokens {
		print!("{}", dump_tokens(&tokenize(source)));
	}

	let outcome = session.parse(source, outer);
	for response in &outcome.responses {
		match response {
			Response::Failed { .. } => eprintln!("{}", session.render(source, response)),
			_ => println!("{}", session.render(source, response)),
		}
	}
	outcome
}

fn repl(session: &mut Session, tokens: bool) -> ExitCode {
	let mut editor = match DefaultEditor::new() {
		Ok(editor) => editor,
		Err(error) => {
			eprintln!("error: could not start the line editor: {error}");
			return ExitCode::FAILURE;
		}
	};

	let mut context: Option<TypeContext> = None;
	loop {
		let line = match editor.readline("> ") {
			Ok(line) => line,
			Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
			Err(error) => {
				eprintln!("error: {error}");
				return ExitCode::FAILURE;
			}
		};
		if line.trim().is_empty() {
			continue;
		}
		let _ = editor.add_history_entry(line.as_str());

		let outcome = run(session, line.as_bytes(), context.as_ref(), tokens);
		if outcome.status == Status::Exit {
			break;
		}
		context = Some(outcome.context);
	}
	ExitCode::SUCCESS
}

fn main() -> ExitCode {
	let options = options();
	init_logging(options.verbose);

	let mut session = Session::new();
	let source = match options.input {
		InputOption::Direct(source) => source.into_bytes(),
		InputOption::FilePath(path) => match read_source(&path) {
			Ok(source) => source,
			Err(error) => {
				eprintln!("error: {error}");
				return ExitCode::FAILURE;
			}
		},
		InputOption::Repl => return repl(&mut session, options.tokens),
	};

	match run(&mut session, &source, None, options.tokens).status {
		Status::Error => ExitCode::FAILURE,
		Status::Success | Status::Exit => ExitCode::SUCCESS,
	}
}
