use crate::{
	common::{Position, Span},
	frontend::{
		automaton::{strategies, Automaton},
		codec::decode,
	},
	ir::tokenized::{Instruction, Keyword, Token, TokenKind, TokenizedSource},
};

const INSTRUCTIONS: &[(&str, TokenKind)] = &[
	("#type", TokenKind::Instruction(Instruction::Type)),
	("#info", TokenKind::Instruction(Instruction::Info)),
	("#eval", TokenKind::Instruction(Instruction::Eval)),
	("#exit", TokenKind::Instruction(Instruction::Exit)),
];

// Multi-character literals must be tried before the automata and the single-symbol table.
const KEYWORDS: &[(&str, TokenKind)] = &[
	("ℝ", TokenKind::Keyword(Keyword::Real)),
	("def", TokenKind::Keyword(Keyword::Def)),
	("using", TokenKind::Keyword(Keyword::Using)),
	("import", TokenKind::Keyword(Keyword::Import)),
	("namespace", TokenKind::Keyword(Keyword::Namespace)),
	("export", TokenKind::Keyword(Keyword::Export)),
	("(+)", TokenKind::Keyword(Keyword::PlusTerm)),
	("(×)", TokenKind::Keyword(Keyword::TimesTerm)),
];

const SYMBOLS: &[(char, TokenKind)] = &[
	('𝒰', TokenKind::Keyword(Keyword::Universe)),
	(':', TokenKind::Colon),
	('#', TokenKind::Hash),
	('+', TokenKind::Plus),
	('-', TokenKind::Minus),
	('*', TokenKind::Ast),
	('×', TokenKind::Times),
	('≡', TokenKind::Equiv),
	('=', TokenKind::Equal),
	('/', TokenKind::Slash),
	('(', TokenKind::ParenL),
	(')', TokenKind::ParenR),
	('{', TokenKind::CurlyL),
	('}', TokenKind::CurlyR),
	('[', TokenKind::SquareL),
	(']', TokenKind::SquareR),
	('<', TokenKind::AngleL),
	('>', TokenKind::AngleR),
	('.', TokenKind::Period),
	('"', TokenKind::Quote),
	('@', TokenKind::At),
	('_', TokenKind::LowDash),
	('|', TokenKind::Pipe),
];

/// Returned by [`Scanner::peek`] past the end of the source.
const END: char = '\0';

pub struct Scanner {
	source: Box<[char]>,
	index: usize,
	line: usize,
	column: usize,
	at_line_start: bool,
}

impl Scanner {
	pub fn new(source: &[u8]) -> Self {
		Self { source: decode(source), index: 0, line: 1, column: 1, at_line_start: true }
	}

	pub fn is_at_end(&self) -> bool { self.index >= self.source.len() }

	pub fn index(&self) -> usize { self.index }

	pub fn position(&self) -> Position { Position::new(self.line, self.column) }

	/// Whether no code point other than whitespace has been consumed since the last newline.
	pub fn at_line_start(&self) -> bool { self.at_line_start }

	pub fn peek(&self, offset: usize) -> char { self.source.get(self.index + offset).copied().unwrap_or(END) }

	pub fn advance(&mut self) -> Option<char> {
		let c = *self.source.get(self.index)?;
		self.index += 1;
		match c {
			'\n' => {
				self.line += 1;
				self.column = 1;
				self.at_line_start = true;
			}
			' ' | '\t' | '\r' => self.column += 1,
			_ => {
				self.column += 1;
				self.at_line_start = false;
			}
		}
		Some(c)
	}

	pub fn consume(&mut self, len: usize) {
		for _ in 0..len {
			self.advance();
		}
	}

	/// Copies up to `len` code points starting at `start`, clamped to the source.
	pub fn substr(&self, start: usize, len: usize) -> String {
		let start = start.min(self.source.len());
		let end = start.saturating_add(len).min(self.source.len());
		self.source[start..end].iter().collect()
	}

	fn skip_whitespace(&mut self) {
		while let ' ' | '\t' | '\r' | '\n' = self.peek(0) {
			self.advance();
		}
	}

	/// Consumes `literal` if the source continues with it.
	pub fn matches(&mut self, literal: &str) -> bool {
		let len = literal.chars().count();
		if !literal.chars().enumerate().all(|(offset, c)| self.peek(offset) == c) {
			return false;
		}
		// Literals ending in a letter must not be the head of a longer word.
		if literal.ends_with(|c: char| c.is_ascii_alphabetic()) && self.peek(len).is_ascii_alphabetic() {
			return false;
		}
		self.consume(len);
		true
	}

	fn literal(&mut self, table: &[(&'static str, TokenKind)], begin: Position) -> Option<Token> {
		let &(literal, kind) = table.iter().find(|(literal, _)| self.matches(literal))?;
		Some(Token::new(kind, literal, Span::new(begin, self.position())))
	}

	/// Scans one token. At the end of input this yields an end-of-file token without advancing.
	pub fn next_token(&mut self, automata: &mut [Box<dyn Automaton>]) -> Token {
		self.skip_whitespace();
		let begin = self.position();

		if self.is_at_end() {
			return Token::new(TokenKind::EndOfFile, "", Span::point(begin));
		}

		if self.at_line_start {
			if let Some(token) = self.literal(INSTRUCTIONS, begin) {
				return token;
			}
		}

		if let Some(token) = self.literal(KEYWORDS, begin) {
			return token;
		}

		let initial = self.peek(0);
		if let Some(&(symbol, kind)) = SYMBOLS.iter().find(|(symbol, _)| *symbol == initial) {
			self.advance();
			return Token::new(kind, symbol.to_string(), Span::point(begin));
		}

		let start = self.index;
		for automaton in automata.iter_mut() {
			if let Some(len) = automaton.run(&|offset| self.peek(offset)) {
				let lexeme = self.substr(start, len);
				self.consume(len);
				return Token::new(automaton.kind(), lexeme, Span::new(begin, self.position()));
			}
		}

		let lexeme = self.substr(start, 1);
		self.advance();
		Token::new(TokenKind::Unknown, lexeme, Span::point(begin))
	}
}

/// Tokenizes a whole source. The result always ends in exactly one end-of-file token.
pub fn tokenize(source: impl AsRef<[u8]>) -> Vec<Token> {
	let mut scanner = Scanner::new(source.as_ref());
	let mut automata = strategies();
	let mut tokens = Vec::new();
	loop {
		let token = scanner.next_token(&mut automata);
		let is_end = token.kind == TokenKind::EndOfFile;
		tokens.push(token);
		if is_end {
			break;
		}
	}
	tracing::trace!(count = tokens.len(), "tokenized source");
	tokens
}

pub fn lex(source: impl AsRef<[u8]>) -> TokenizedSource { TokenizedSource::new(tokenize(source)) }

#[cfg(test)]
mod tests {
	use super::*;

	fn kinds(source: &str) -> Vec<TokenKind> { tokenize(source).into_iter().map(|token| token.kind).collect() }

	#[test]
	fn empty_source_is_just_end_of_file() {
		assert_eq!(kinds(""), [TokenKind::EndOfFile]);
		assert_eq!(kinds(" \n\t "), [TokenKind::EndOfFile]);
	}

	#[test]
	fn end_of_file_repeats_without_advancing() {
		let mut scanner = Scanner::new(b"x");
		let mut automata = strategies();
		assert_eq!(scanner.next_token(&mut automata).kind, TokenKind::Identifier);
		let index = scanner.index();
		for _ in 0..3 {
			assert_eq!(scanner.next_token(&mut automata).kind, TokenKind::EndOfFile);
			assert_eq!(scanner.index(), index);
		}
	}

	#[test]
	fn reals_are_not_split_at_the_dot() {
		let tokens = tokenize("3.14");
		assert_eq!(tokens.len(), 2);
		assert_eq!(tokens[0].kind, TokenKind::Real);
		assert_eq!(&*tokens[0].lexeme, "3.14");
	}

	#[test]
	fn trailing_dot_falls_back_to_integer() {
		assert_eq!(kinds("3."), [TokenKind::Integer, TokenKind::Period, TokenKind::EndOfFile]);
	}

	#[test]
	fn keywords_win_over_identifiers() {
		assert_eq!(kinds("def"), [TokenKind::Keyword(Keyword::Def), TokenKind::EndOfFile]);
		assert_eq!(kinds("define"), [TokenKind::Identifier, TokenKind::EndOfFile]);
		assert_eq!(
			kinds("def x : ℝ"),
			[
				TokenKind::Keyword(Keyword::Def),
				TokenKind::Identifier,
				TokenKind::Colon,
				TokenKind::Keyword(Keyword::Real),
				TokenKind::EndOfFile
			]
		);
	}

	#[test]
	fn sections_win_over_parentheses() {
		assert_eq!(
			kinds("(+) (×) (+ 1"),
			[
				TokenKind::Keyword(Keyword::PlusTerm),
				TokenKind::Keyword(Keyword::TimesTerm),
				TokenKind::ParenL,
				TokenKind::Plus,
				TokenKind::Integer,
				TokenKind::EndOfFile
			]
		);
	}

	#[test]
	fn instructions_only_start_lines() {
		assert_eq!(kinds("#info"), [TokenKind::Instruction(Instruction::Info), TokenKind::EndOfFile]);
		assert_eq!(kinds("  #eval 1")[0], TokenKind::Instruction(Instruction::Eval));
		assert_eq!(kinds("x #info"), [TokenKind::Identifier, TokenKind::Hash, TokenKind::Identifier, TokenKind::EndOfFile]);
		assert_eq!(kinds("x\n#exit")[1], TokenKind::Instruction(Instruction::Exit));
	}

	#[test]
	fn instructions_are_whole_words() {
		assert_eq!(kinds("#information"), [TokenKind::Hash, TokenKind::Identifier, TokenKind::EndOfFile]);
		assert_eq!(&*tokenize("#evaluate")[1].lexeme, "evaluate");
		assert_eq!(kinds("#eval(1)")[0], TokenKind::Instruction(Instruction::Eval));
	}

	#[test]
	fn unknown_code_points_are_consumed_one_at_a_time() {
		let tokens = tokenize("λ$");
		assert_eq!(tokens[0].kind, TokenKind::Unknown);
		assert_eq!(&*tokens[0].lexeme, "λ");
		assert_eq!(tokens[1].kind, TokenKind::Unknown);
		assert_eq!(tokens[2].kind, TokenKind::EndOfFile);
	}

	#[test]
	fn invalid_utf8_becomes_sentinel_tokens() {
		let tokens = tokenize([b'x', 0xC0, b'y']);
		assert_eq!(tokens.len(), 4);
		assert_eq!(tokens[1].kind, TokenKind::Unknown);
		assert_eq!(&*tokens[1].lexeme, "?");
	}

	#[test]
	fn spans_track_lines_and_columns() {
		let tokens = tokenize("def x\n  + 1.5");
		assert_eq!(tokens[0].span, Span::new(Position::new(1, 1), Position::new(1, 4)));
		assert_eq!(tokens[1].span, Span::new(Position::new(1, 5), Position::new(1, 6)));
		assert_eq!(tokens[2].span, Span::point(Position::new(2, 3)));
		assert_eq!(tokens[3].span, Span::new(Position::new(2, 5), Position::new(2, 8)));
		assert!(tokens.windows(2).all(|pair| pair[0].span.begin <= pair[1].span.begin));
	}

	#[test]
	fn substr_is_clamped() {
		let scanner = Scanner::new(b"abc");
		assert_eq!(scanner.substr(1, 10), "bc");
		assert_eq!(scanner.substr(5, 1), "");
	}
}
