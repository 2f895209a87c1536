use crate::ir::tokenized::TokenKind;

/// A finite-state matcher for one lexical category.
///
/// The matcher is fed one code point at a time, each taken from offset `matched_len()` past the
/// scan position, until it accepts or rejects. It never consumes input itself: only the tokenizer
/// advances the scanner, and only after an accepted match.
pub trait Automaton {
	/// The kind of token produced when this automaton accepts.
	fn kind(&self) -> TokenKind;

	fn reset(&mut self);

	fn transit(&mut self, input: char);

	fn matched_len(&self) -> usize;

	fn accepted(&self) -> bool;

	fn rejected(&self) -> bool;

	/// Runs the automaton to completion, yielding the accepted length.
	fn run(&mut self, lookahead: &dyn Fn(usize) -> char) -> Option<usize> {
		self.reset();
		loop {
			self.transit(lookahead(self.matched_len()));
			if self.accepted() {
				return Some(self.matched_len());
			}
			if self.rejected() {
				return None;
			}
		}
	}
}

fn is_alpha(c: char) -> bool { c.is_ascii_alphabetic() }

fn is_digit(c: char) -> bool { c.is_ascii_digit() }

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum RunState {
	Start,
	Body,
	Accept,
	Reject,
}

/// Maximal runs of ASCII letters.
#[derive(Debug)]
pub struct IdentifierAutomaton {
	state: RunState,
	matched_len: usize,
}

impl IdentifierAutomaton {
	pub fn new() -> Self { Self { state: RunState::Start, matched_len: 0 } }
}

impl Default for IdentifierAutomaton {
	fn default() -> Self { Self::new() }
}

impl Automaton for IdentifierAutomaton {
	fn kind(&self) -> TokenKind { TokenKind::Identifier }

	fn reset(&mut self) { *self = Self::new(); }

	fn transit(&mut self, input: char) {
		use RunState::*;
		self.state = match self.state {
			Start | Body if is_alpha(input) => {
				self.matched_len += 1;
				Body
			}
			Start => Reject,
			Body => Accept,
			Accept | Reject => Reject,
		};
	}

	fn matched_len(&self) -> usize { self.matched_len }

	fn accepted(&self) -> bool { self.state == RunState::Accept }

	fn rejected(&self) -> bool { self.state == RunState::Reject }
}

/// Maximal runs of decimal digits.
#[derive(Debug)]
pub struct IntegerAutomaton {
	state: RunState,
	matched_len: usize,
}

impl IntegerAutomaton {
	pub fn new() -> Self { Self { state: RunState::Start, matched_len: 0 } }
}

impl Default for IntegerAutomaton {
	fn default() -> Self { Self::new() }
}

impl Automaton for IntegerAutomaton {
	fn kind(&self) -> TokenKind { TokenKind::Integer }

	fn reset(&mut self) { *self = Self::new(); }

	fn transit(&mut self, input: char) {
		use RunState::*;
		self.state = match self.state {
			Start | Body if is_digit(input) => {
				self.matched_len += 1;
				Body
			}
			Start => Reject,
			Body => Accept,
			Accept | Reject => Reject,
		};
	}

	fn matched_len(&self) -> usize { self.matched_len }

	fn accepted(&self) -> bool { self.state == RunState::Accept }

	fn rejected(&self) -> bool { self.state == RunState::Reject }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum RealState {
	Start,
	IntegerPart,
	Dot,
	FractionPart,
	Accept,
	Reject,
}

/// `digit+ '.' digit+`, without an exponent.
#[derive(Debug)]
pub struct RealAutomaton {
	state: RealState,
	matched_len: usize,
}

impl RealAutomaton {
	pub fn new() -> Self { Self { state: RealState::Start, matched_len: 0 } }
}

impl Default for RealAutomaton {
	fn default() -> Self { Self::new() }
}

impl Automaton for RealAutomaton {
	fn kind(&self) -> TokenKind { TokenKind::Real }

	fn reset(&mut self) { *self = Self::new(); }

	fn transit(&mut self, input: char) {
		use RealState::*;
		let (state, consumed) = match self.state {
			Start if is_digit(input) => (IntegerPart, true),
			IntegerPart if is_digit(input) => (IntegerPart, true),
			IntegerPart if input == '.' => (Dot, true),
			Dot if is_digit(input) => (FractionPart, true),
			FractionPart if is_digit(input) => (FractionPart, true),
			FractionPart => (Accept, false),
			Start | IntegerPart | Dot | Accept | Reject => (Reject, false),
		};
		self.state = state;
		if consumed {
			self.matched_len += 1;
		}
	}

	fn matched_len(&self) -> usize { self.matched_len }

	fn accepted(&self) -> bool { self.state == RealState::Accept }

	fn rejected(&self) -> bool { self.state == RealState::Reject }
}

/// The automata in priority order. Reals come before integers so that `3.14` is not split at the dot.
pub fn strategies() -> [Box<dyn Automaton>; 3] {
	[Box::new(IdentifierAutomaton::new()), Box::new(RealAutomaton::new()), Box::new(IntegerAutomaton::new())]
}
