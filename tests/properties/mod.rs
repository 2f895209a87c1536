use archi::{
	frontend::lex::tokenize,
	ir::tokenized::TokenKind,
	session::{Response, Session, Status},
};
use proptest::prelude::*;

prop_compose! {
	fn noise()(s in "[ \\t\\n#a-z0-9.:=+*×()ℝ𝒰\"-]{0,64}") -> String {
		s
	}
}

proptest! {
	#[test]
	fn prop_tokenizing_bytes_ends_in_one_end_of_file(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
		let tokens = tokenize(&bytes);
		prop_assert!(tokens.len() <= bytes.len() + 1);
		prop_assert_eq!(tokens.last().map(|token| token.kind), Some(TokenKind::EndOfFile));
		prop_assert_eq!(tokens.iter().filter(|token| token.kind == TokenKind::EndOfFile).count(), 1);
	}

	#[test]
	fn prop_parsing_never_panics(source in noise()) {
		let mut session = Session::new();
		let outcome = session.parse(&source, None);
		let failures = outcome.responses.iter().filter(|response| matches!(response, Response::Failed { .. })).count();
		if outcome.status == Status::Success {
			prop_assert_eq!(failures, 0);
		}
	}

	#[test]
	fn prop_prefix_sums_evaluate(a in 0u32..10_000, b in 0u32..10_000) {
		let mut session = Session::new();
		let source = format!("#eval + {a} {b}");
		let outcome = session.parse(&source, None);
		prop_assert_eq!(outcome.status, Status::Success);
		let rendered = session.render(&source, &outcome.responses[0]);
		prop_assert_eq!(rendered, (a + b).to_string());
	}
}
