use archi::session::{Response, Status};

use crate::common::{programs, run_program};

#[test]
fn run_fail_tests() {
	let paths = programs("tests/fail/programs");
	assert!(!paths.is_empty());
	for path in paths {
		let (_, _, outcome) = run_program(&path);
		assert_eq!(outcome.status, Status::Error, "{}", path.display());
		assert!(
			outcome.responses.iter().any(|response| matches!(response, Response::Failed { .. })),
			"{}",
			path.display()
		);
	}
}
