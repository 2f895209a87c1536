use std::{
	ffi::OsStr,
	fs,
	path::{Path, PathBuf},
};

use archi::session::{read_source, Outcome, Session};

pub const EXTENSION: &str = "ar";

pub fn programs(directory: impl AsRef<Path>) -> Vec<PathBuf> {
	let mut paths: Vec<PathBuf> = fs::read_dir(directory)
		.unwrap()
		.flatten()
		.map(|x| x.path())
		.filter(|x| x.extension() == Some(OsStr::new(EXTENSION)))
		.collect();
	paths.sort();
	paths
}

pub fn run_program(path: &Path) -> (Session, Vec<u8>, Outcome) {
	let source = read_source(path).unwrap_or_else(|error| panic!("{error}"));
	let mut session = Session::new();
	let outcome = session.parse(&source, None);
	(session, source, outcome)
}

/// Renders every response, one per line.
pub fn transcript(session: &Session, source: &[u8], outcome: &Outcome) -> String {
	outcome.responses.iter().map(|response| session.render(source, response) + "\n").collect()
}
