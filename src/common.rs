use std::fmt;

use lasso::Spur;

pub type Name = Spur;

/// A line and column, both counted from one in code points.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Position {
	pub line: usize,
	pub column: usize,
}

impl Position {
	pub fn new(line: usize, column: usize) -> Self { Self { line, column } }

	pub fn start() -> Self { Self::new(1, 1) }

	pub fn next_column(self) -> Self { Self::new(self.line, self.column + 1) }
}

impl Default for Position {
	fn default() -> Self { Self::start() }
}

impl fmt::Display for Position {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}:{}", self.line, self.column) }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Span {
	pub begin: Position,
	pub end: Position,
}

impl Span {
	pub fn new(begin: Position, end: Position) -> Self { Self { begin, end } }

	/// A span covering the single code point at `position`.
	pub fn point(position: Position) -> Self { Self::new(position, position.next_column()) }

	pub fn join(self, other: Self) -> Self { Self::new(self.begin.min(other.begin), self.end.max(other.end)) }
}

impl fmt::Display for Span {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "[{}] - [{}]", self.begin, self.end) }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Operator {
	Plus,
	Times,
}

impl Operator {
	pub fn apply(self, left: f64, right: f64) -> f64 {
		match self {
			Self::Plus => left + right,
			Self::Times => left * right,
		}
	}

	pub fn symbol(self) -> &'static str {
		match self {
			Self::Plus => "+",
			Self::Times => "×",
		}
	}
}

impl fmt::Display for Operator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.symbol()) }
}
