use std::fmt;

use crate::common::Span;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TokenKind {
	// Literals.
	Integer,
	Real,
	Identifier,

	Keyword(Keyword),
	Instruction(Instruction),

	// Symbols.
	Colon,
	Hash,
	Plus,
	Minus,
	Ast,
	Times,
	Equiv,
	Equal,
	Slash,
	ParenL,
	ParenR,
	CurlyL,
	CurlyR,
	SquareL,
	SquareR,
	AngleL,
	AngleR,
	Period,
	Quote,
	At,
	LowDash,
	Pipe,

	EndOfFile,
	Unknown,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Keyword {
	// Base types.
	Real,
	Universe,

	Def,
	Using,
	Import,
	Namespace,
	Export,

	// Operator sections.
	PlusTerm,
	TimesTerm,
}

/// Meta-instructions, recognized only as the first token of a line.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Instruction {
	Type,
	Info,
	Eval,
	Exit,
}

impl TokenKind {
	pub fn name(self) -> &'static str {
		use TokenKind::*;
		match self {
			Integer => "INTEGER",
			Real => "REAL",
			Identifier => "IDENTIFIER",
			Keyword(keyword) => keyword.name(),
			Instruction(instruction) => instruction.name(),
			Colon => "COLON",
			Hash => "HASH",
			Plus => "PLUS",
			Minus => "MINUS",
			Ast => "ASTERISK",
			Times => "TIMES",
			Equiv => "EQUIV",
			Equal => "EQUAL",
			Slash => "SLASH",
			ParenL => "LEFT_PAREN",
			ParenR => "RIGHT_PAREN",
			CurlyL => "LEFT_BRACE",
			CurlyR => "RIGHT_BRACE",
			SquareL => "LEFT_BRACKET",
			SquareR => "RIGHT_BRACKET",
			AngleL => "LESS_THAN",
			AngleR => "GREATER_THAN",
			Period => "DOT",
			Quote => "DOUBLE_QUOTE",
			At => "AT",
			LowDash => "UNDERSCORE",
			Pipe => "BAR",
			EndOfFile => "END_OF_FILE",
			Unknown => "UNKNOWN",
		}
	}
}

impl Keyword {
	fn name(self) -> &'static str {
		match self {
			Self::Real => "KEYWORD_REAL",
			Self::Universe => "UNIVERSE",
			Self::Def => "KEYWORD_DEF",
			Self::Using => "KEYWORD_USING",
			Self::Import => "KEYWORD_IMPORT",
			Self::Namespace => "KEYWORD_NAMESPACE",
			Self::Export => "KEYWORD_EXPORT",
			Self::PlusTerm => "KEYWORD_PLUS_TERM",
			Self::TimesTerm => "KEYWORD_TIMES_TERM",
		}
	}
}

impl Instruction {
	fn name(self) -> &'static str {
		match self {
			Self::Type => "INSTR_TYPE",
			Self::Info => "INSTR_INFO",
			Self::Eval => "INSTR_EVAL",
			Self::Exit => "INSTR_EXIT",
		}
	}
}

impl fmt::Display for TokenKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

#[derive(Clone, PartialEq, Debug)]
pub struct Token {
	pub kind: TokenKind,
	pub lexeme: Box<str>,
	pub span: Span,
}

impl Token {
	pub fn new(kind: TokenKind, lexeme: impl Into<Box<str>>, span: Span) -> Self {
		Self { kind, lexeme: lexeme.into(), span }
	}
}

/// The output of one tokenize pass. `kinds` mirrors `tokens` for the grammar, which matches on kinds alone.
pub struct TokenizedSource {
	pub tokens: Box<[Token]>,
	pub kinds: Box<[TokenKind]>,
}

impl TokenizedSource {
	pub fn new(tokens: Vec<Token>) -> Self {
		let kinds = tokens.iter().map(|token| token.kind).collect();
		Self { tokens: tokens.into_boxed_slice(), kinds }
	}

	pub fn len(&self) -> usize { self.tokens.len() }

	pub fn is_empty(&self) -> bool { self.tokens.is_empty() }
}
