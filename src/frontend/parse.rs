use std::cell::{Cell, RefCell};

use lasso::Rodeo;

use crate::{
	common::{Operator, Span},
	ir::{
		presyntax::{Constant, Declaration, Expression, Identifier, Instruction, Preterm, Type},
		tokenized::{self, Keyword, Token, TokenKind, TokenizedSource},
	},
};

/// Looks `offset` tokens past `cursor`, yielding end-of-file past the end.
pub fn peek(source: &TokenizedSource, cursor: usize, offset: usize) -> TokenKind {
	source.kinds.get(cursor + offset).copied().unwrap_or(TokenKind::EndOfFile)
}

/// Parses a meta-instruction starting at `cursor`.
pub fn instruction(source: &TokenizedSource, cursor: usize, interner: &mut Rodeo) -> Option<(usize, Instruction)> {
	let parser = Parser::new(&source.tokens, cursor, interner);
	let (instruction, len) = presyntax_parse::instruction(line(source, cursor)?, &parser).ok()?;
	Some((cursor + len, instruction))
}

/// Parses a declaration starting at `cursor`.
pub fn declaration(source: &TokenizedSource, cursor: usize, interner: &mut Rodeo) -> Option<(usize, Declaration)> {
	let parser = Parser::new(&source.tokens, cursor, interner);
	let (declaration, len) = presyntax_parse::declaration(line(source, cursor)?, &parser).ok()?;
	Some((cursor + len, declaration))
}

/// Parses the longest term starting at `cursor`.
pub fn term(source: &TokenizedSource, cursor: usize, interner: &mut Rodeo) -> Option<(usize, Expression)> {
	let parser = Parser::new(&source.tokens, cursor, interner);
	let (term, len) = presyntax_parse::term(line(source, cursor)?, &parser).ok()?;
	Some((cursor + len, term))
}

/// The token kinds from `cursor` to the end of its line, without the end-of-file token.
fn line(source: &TokenizedSource, cursor: usize) -> Option<&[TokenKind]> {
	let first = source.tokens.get(cursor).filter(|token| token.kind != TokenKind::EndOfFile)?;
	let len = source.tokens[cursor..]
		.iter()
		.take_while(|token| token.kind != TokenKind::EndOfFile && token.span.begin.line == first.span.begin.line)
		.count();
	Some(&source.kinds[cursor..cursor + len])
}

/// Converts a decimal literal without exponent. Digits are accumulated from the left, and each
/// fractional digit is weighted by a repeatedly divided tenth, so excess precision truncates.
pub fn convert_number(text: &str) -> Option<f64> {
	let (sign, digits) = match text.strip_prefix('-') {
		Some(rest) => (-1.0, rest),
		None => (1.0, text.strip_prefix('+').unwrap_or(text)),
	};
	let (whole, fraction) = match digits.split_once('.') {
		Some((_, "")) => return None,
		Some((whole, fraction)) => (whole, fraction),
		None => (digits, ""),
	};
	if whole.is_empty() || !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
		return None;
	}

	let mut value = 0.0_f64;
	for digit in whole.bytes() {
		value = value * 10.0 + f64::from(digit - b'0');
	}
	let mut weight = 0.1_f64;
	for digit in fraction.bytes() {
		value += f64::from(digit - b'0') * weight;
		weight /= 10.0;
	}
	Some(sign * value)
}

/// How deeply parentheses, prefix operands and arrow codomains may nest before a production fails.
pub const MAX_NESTING: usize = 256;

pub struct Parser<'t, 'i> {
	tokens: &'t [Token],
	offset: usize,
	interner: RefCell<&'i mut Rodeo>,
	depth: Cell<usize>,
}

impl<'t, 'i> Parser<'t, 'i> {
	fn new(tokens: &'t [Token], offset: usize, interner: &'i mut Rodeo) -> Self {
		Self { tokens, offset, interner: RefCell::new(interner), depth: Cell::new(0) }
	}

	fn token(&self, index: usize) -> &Token { &self.tokens[self.offset + index] }

	/// The span from the token at `init` up to, but excluding, the token at `fini`.
	fn span(&self, init: usize, fini: usize) -> Span {
		let begin = self.token(init).span;
		if fini > init {
			begin.join(self.token(fini - 1).span)
		} else {
			Span::point(begin.begin)
		}
	}

	fn identifier(&self, index: usize) -> Identifier {
		let token = self.token(index);
		Identifier { name: self.interner.borrow_mut().get_or_intern(&*token.lexeme), span: token.span }
	}

	fn enter(&self) -> Result<(), &'static str> {
		let depth = self.depth.get();
		if depth >= MAX_NESTING {
			return Err("shallower nesting");
		}
		self.depth.set(depth + 1);
		Ok(())
	}

	fn leave<T>(&self, value: Option<T>) -> Result<T, &'static str> {
		self.depth.set(self.depth.get().saturating_sub(1));
		value.ok_or("nested term")
	}

	fn number(&self, index: usize, negative: bool) -> Option<f64> {
		let value = convert_number(&self.token(index).lexeme)?;
		Some(if negative { -value } else { value })
	}

	fn words(&self, indices: &[usize]) -> Box<str> {
		indices.iter().map(|&index| &*self.token(index).lexeme).collect::<Vec<_>>().join(" ").into()
	}
}

fn binary(operator: Operator, left: Expression, right: Expression) -> Expression {
	let span = left.span.join(right.span);
	Preterm::BinaryInfix { operator, left: left.into(), right: right.into() }.at(span)
}

peg::parser! {
	grammar presyntax_parse(parser: &Parser) for [TokenKind] {
		rule identifier() -> Identifier
			= pos:position!() [TokenKind::Identifier] {parser.identifier(pos)}

		rule operator() -> Operator
			= [TokenKind::Plus] {Operator::Plus}
			/ [TokenKind::Times] {Operator::Times}
			/ [TokenKind::Ast] {Operator::Times}

		rule number() -> Preterm
			= [TokenKind::Minus] pos:position!() [TokenKind::Integer | TokenKind::Real]
				{? parser.number(pos, true).map(|value| Preterm::Constant(Constant::Real(value))).ok_or("number")}
			/ pos:position!() [TokenKind::Integer | TokenKind::Real]
				{? parser.number(pos, false).map(|value| Preterm::Constant(Constant::Real(value))).ok_or("number")}

		rule enter() = position!() {? parser.enter()}

		// Runs `inner` one level deeper, failing once nesting gets too deep.
		rule nested<T>(inner: rule<T>) -> T
			= enter() value:inner()? {? parser.leave(value)}

		rule atom() -> Expression
			= init:position!() [TokenKind::ParenL] term:nested(<expression()>)
				ty:([TokenKind::Colon] ty:nested(<expression()>) {ty})? [TokenKind::ParenR] fini:position!() {
				match ty {
					Some(ty) => Preterm::Annotated { term: term.into(), ty: Type(ty).into() }.at(parser.span(init, fini)),
					None => term,
				}
			}
			/ init:position!() preterm:(
				  number:number() {number}
				/ [TokenKind::Quote] words:(pos:position!() [kind if kind != TokenKind::Quote] {pos})* [TokenKind::Quote]
					{Preterm::Constant(Constant::String(parser.words(&words)))}
				/ [TokenKind::Keyword(Keyword::Real)] {Preterm::RealType}
				/ [TokenKind::Keyword(Keyword::Universe)] {Preterm::Universe}
				/ [TokenKind::Keyword(Keyword::PlusTerm)] {Preterm::Section(Operator::Plus)}
				/ [TokenKind::Keyword(Keyword::TimesTerm)] {Preterm::Section(Operator::Times)}
				/ identifier:identifier() {Preterm::Variable(identifier)}
			) fini:position!() {preterm.at(parser.span(init, fini))}

		// Prefix operators take two operands, each of which may itself be prefixed.
		rule operand() -> Expression
			= init:position!() operator:operator() left:nested(<operand()>) right:nested(<operand()>) fini:position!()
				{Preterm::BinaryPrefix { operator, left: left.into(), right: right.into() }.at(parser.span(init, fini))}
			/ atom()

		rule spine() -> Expression
			= head:operand() arguments:atom()* {
				arguments.into_iter().fold(head, |function, argument| {
					let span = function.span.join(argument.span);
					Preterm::Apply { function: function.into(), argument: argument.into() }.at(span)
				})
			}

		// Arrows bind loosest and associate to the right.
		rule expression() -> Expression
			= domain:sum() codomain:([TokenKind::Minus] [TokenKind::AngleR] codomain:nested(<expression()>) {codomain})? {
				match codomain {
					Some(codomain) => {
						let span = domain.span.join(codomain.span);
						Preterm::Arrow { domain: domain.into(), codomain: codomain.into() }.at(span)
					}
					None => domain,
				}
			}

		rule sum() -> Expression = precedence!{
			left:(@) [TokenKind::Plus] right:@ {binary(Operator::Plus, left, right)}
			--
			left:(@) ([TokenKind::Times] / [TokenKind::Ast]) right:@ {binary(Operator::Times, left, right)}
			--
			spine:spine() {spine}
		}

		rule ty() -> Type = term:expression() {Type(term)}

		rule declaration_body() -> Declaration
			= [TokenKind::Keyword(Keyword::Def)] name:identifier() [TokenKind::Colon] ty:ty() [TokenKind::Equal] value:expression()
				{Declaration::Full { name, ty, value }}
			/ [TokenKind::Keyword(Keyword::Def)] name:identifier() [TokenKind::Colon] ty:ty() {Declaration::Def { name, ty }}
			/ name:identifier() [TokenKind::Colon] ty:ty() [TokenKind::Equal] value:expression() {Declaration::Full { name, ty, value }}
			/ name:identifier() [TokenKind::Equal] value:expression() {Declaration::Assign { name, value }}

		rule instruction_body() -> Instruction
			= [TokenKind::Instruction(tokenized::Instruction::Eval)] term:expression() {Instruction::Evaluate(term)}
			/ [TokenKind::Instruction(tokenized::Instruction::Type)] term:expression() {Instruction::TypeInfer(term)}
			/ [TokenKind::Instruction(tokenized::Instruction::Info)] {Instruction::Info}
			/ [TokenKind::Instruction(tokenized::Instruction::Exit)] {Instruction::Exit}

		// Entry points match a prefix of the line and report how many tokens they used.
		pub rule instruction() -> (Instruction, usize)
			= instruction:instruction_body() len:position!() [_]* {(instruction, len)}

		pub rule declaration() -> (Declaration, usize)
			= declaration:declaration_body() len:position!() [_]* {(declaration, len)}

		pub rule term() -> (Expression, usize)
			= term:expression() len:position!() [_]* {(term, len)}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::frontend::lex::lex;

	fn parse_term(source: &str) -> Option<(usize, Expression)> {
		let mut interner = Rodeo::new();
		term(&lex(source), 0, &mut interner)
	}

	fn shape(expression: &Expression) -> String {
		match &expression.preterm {
			Preterm::Variable(_) => "v".to_owned(),
			Preterm::Constant(Constant::Real(value)) => value.to_string(),
			Preterm::Constant(Constant::String(text)) => format!("{text:?}"),
			Preterm::Apply { function, argument } => format!("({} {})", shape(function), shape(argument)),
			Preterm::Annotated { term, ty } => format!("({} : {})", shape(term), shape(&ty.0)),
			Preterm::BinaryPrefix { operator, left, right } => format!("[{operator} {} {}]", shape(left), shape(right)),
			Preterm::BinaryInfix { operator, left, right } => format!("({} {operator} {})", shape(left), shape(right)),
			Preterm::Section(operator) => format!("({operator})"),
			Preterm::RealType => "ℝ".to_owned(),
			Preterm::Universe => "𝒰".to_owned(),
			Preterm::Arrow { domain, codomain } => format!("({} -> {})", shape(domain), shape(codomain)),
		}
	}

	fn parses_as(source: &str) -> String {
		let (_, expression) = parse_term(source).unwrap_or_else(|| panic!("{source} should parse"));
		shape(&expression)
	}

	#[test]
	fn converts_numbers_by_truncation() {
		assert_eq!(convert_number("42"), Some(42.0));
		assert_eq!(convert_number("-3"), Some(-3.0));
		assert_eq!(convert_number("+2.5"), Some(2.5));
		assert_eq!(convert_number("0.125"), Some(0.125));
		assert_eq!(convert_number("3."), None);
		assert_eq!(convert_number(".5"), None);
		assert_eq!(convert_number("1e3"), None);
		assert_eq!(convert_number(""), None);
	}

	#[test]
	fn prefix_operators_take_two_operands() {
		assert_eq!(parses_as("+ 2 3"), "[+ 2 3]");
		assert_eq!(parses_as("× + 1 2 3"), "[× [+ 1 2] 3]");
		assert_eq!(parses_as("* 2 -1.5"), "[× 2 -1.5]");
	}

	#[test]
	fn infix_operators_respect_precedence() {
		assert_eq!(parses_as("1 + 2 × 3"), "(1 + (2 × 3))");
		assert_eq!(parses_as("1 + 2 + 3"), "((1 + 2) + 3)");
		assert_eq!(parses_as("(1 + 2) * 3"), "((1 + 2) × 3)");
	}

	#[test]
	fn arrows_associate_to_the_right() {
		assert_eq!(parses_as("ℝ -> ℝ -> 𝒰"), "(ℝ -> (ℝ -> 𝒰))");
		assert_eq!(parses_as("(ℝ -> ℝ) -> ℝ"), "((ℝ -> ℝ) -> ℝ)");
	}

	#[test]
	fn application_is_left_associative() {
		assert_eq!(parses_as("(+) 1 2"), "(((+) 1) 2)");
		assert_eq!(parses_as("f x y"), "((v v) v)");
	}

	#[test]
	fn annotations_and_strings() {
		assert_eq!(parses_as("(1 : ℝ)"), "(1 : ℝ)");
		assert_eq!(parses_as("\"hello world\""), "\"hello world\"");
		assert_eq!(parses_as("\"\""), "\"\"");
	}

	#[test]
	fn terms_stop_at_the_end_of_their_line() {
		let source = lex("+ 1 2\n3");
		let mut interner = Rodeo::new();
		let (cursor, _) = term(&source, 0, &mut interner).unwrap();
		assert_eq!(cursor, 3);
		assert_eq!(peek(&source, cursor, 0), TokenKind::Integer);
		assert_eq!(term(&source, cursor, &mut interner).map(|(cursor, _)| cursor), Some(4));
		assert_eq!(peek(&source, cursor, 1), TokenKind::EndOfFile);
		assert_eq!(peek(&source, cursor, 10), TokenKind::EndOfFile);
	}

	#[test]
	fn incomplete_terms_produce_nothing() {
		assert!(parse_term("+ 1").is_none());
		assert!(parse_term("(1 : ℝ").is_none());
		assert!(parse_term(")").is_none());
		assert!(parse_term("").is_none());
	}

	#[test]
	fn failure_leaves_the_cursor_reusable() {
		let source = lex("+ 1\n+ 1 x");
		let mut interner = Rodeo::new();
		assert!(term(&source, 0, &mut interner).is_none());
		let first = term(&source, 2, &mut interner);
		let second = term(&source, 2, &mut interner);
		assert_eq!(first, second);
		assert_eq!(first.map(|(cursor, _)| cursor), Some(5));
	}

	#[test]
	fn nesting_is_bounded() {
		let shallow = format!("{}1{}", "(".repeat(100), ")".repeat(100));
		assert_eq!(parses_as(&shallow), "1");

		let deep = format!("{}1{}", "(".repeat(1000), ")".repeat(1000));
		assert!(parse_term(&deep).is_none());
		let prefixed = format!("{}1", "+ 1 ".repeat(1000));
		assert!(parse_term(&prefixed).is_none());

		// A long arrow chain parses up to the bound and leaves the rest of the line.
		let chain = vec!["ℝ"; 1000].join(" -> ");
		let (cursor, _) = parse_term(&chain).unwrap();
		assert!(cursor > MAX_NESTING && cursor < 2998);
	}

	#[test]
	fn spans_cover_the_whole_term() {
		let (_, expression) = parse_term("  + 1 23").unwrap();
		assert_eq!(expression.span.begin.column, 3);
		assert_eq!(expression.span.end.column, 9);
	}

	#[test]
	fn declarations() {
		let mut interner = Rodeo::new();
		let mut declare = |source: &str| declaration(&lex(source), 0, &mut interner).map(|(_, declaration)| declaration);
		assert!(matches!(declare("def x : ℝ"), Some(Declaration::Def { .. })));
		assert!(matches!(declare("def x : ℝ = 1"), Some(Declaration::Full { .. })));
		assert!(matches!(declare("x : ℝ = 1"), Some(Declaration::Full { .. })));
		assert!(matches!(declare("x = + 1 2"), Some(Declaration::Assign { .. })));
		assert!(declare("x").is_none());
		assert!(declare("def : ℝ").is_none());
		assert!(declare("def x\n: ℝ").is_none());
	}

	#[test]
	fn instructions() {
		let mut interner = Rodeo::new();
		let mut instruct = |source: &str| instruction(&lex(source), 0, &mut interner);
		assert!(matches!(instruct("#eval + 2 3"), Some((4, Instruction::Evaluate(_)))));
		assert!(matches!(instruct("#type ℝ"), Some((2, Instruction::TypeInfer(_)))));
		assert!(matches!(instruct("#info"), Some((1, Instruction::Info))));
		assert!(matches!(instruct("#exit"), Some((1, Instruction::Exit))));
		assert!(instruct("#eval").is_none());
		assert!(instruct("eval 1").is_none());
	}
}
