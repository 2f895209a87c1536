use std::{
	io,
	path::{Path, PathBuf},
};

use lasso::Rodeo;
use thiserror::Error;

use crate::{
	common::{Name, Span},
	frontend::{
		codec::decode,
		elaborate::{ElaborationError, Elaborator, Typed},
		evaluate::Evaluator,
		lex::lex,
		parse::{self, peek},
		pretty::{dump_context, pretty_print},
	},
	ir::{
		context::{extend, merge, Assumption, TypeContext},
		presyntax::Instruction,
		syntax::{Arena, TermId},
		tokenized::{TokenKind, TokenizedSource},
	},
	report::{display_error, format_line_error},
};

#[derive(Debug, Error)]
pub enum SourceError {
	#[error("could not read `{}`: {source}", path.display())]
	Unreadable {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
}

/// Reads a source file as raw bytes. Malformed UTF-8 is left for the tokenizer to replace.
pub fn read_source(path: impl AsRef<Path>) -> Result<Vec<u8>, SourceError> {
	let path = path.as_ref();
	std::fs::read(path).map_err(|source| SourceError::Unreadable { path: path.to_owned(), source })
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Status {
	Success,
	Error,
	Exit,
}

#[derive(Clone, PartialEq, Debug)]
pub enum Response {
	Evaluated { term: TermId, value: TermId },
	Typed { term: TermId, ty: TermId },
	Failed { span: Span, message: String },
	Info(String),
}

#[derive(Clone, Debug)]
pub struct Outcome {
	pub status: Status,
	pub context: TypeContext,
	pub responses: Vec<Response>,
}

/// What a successful instruction asks of the driver.
enum Step {
	Respond(Response),
	Exit,
}

// A production that did not apply: either nothing matched, or the match did not elaborate.
type Attempt<T> = Result<(usize, T), Option<ElaborationError>>;

/// Owns every name and term created while parsing, so that contexts returned from one parse stay
/// meaningful in the next.
#[derive(Debug, Default)]
pub struct Session {
	interner: Rodeo,
	arena: Arena,
}

impl Session {
	pub fn new() -> Self { Self::default() }

	pub fn interner(&self) -> &Rodeo { &self.interner }

	pub fn arena(&self) -> &Arena { &self.arena }

	/// Parses a whole source under `outer`, which is left untouched. Declarations land in a fresh
	/// innermost scope of the returned context.
	pub fn parse(&mut self, source: impl AsRef<[u8]>, outer: Option<&TypeContext>) -> Outcome {
		let tokens = lex(source.as_ref());
		let mut context = extend(Some(&merge(outer, None)), Some(&TypeContext::empty()));
		let (status, responses) = self.parse_all(&tokens, &mut context);
		Outcome { status, context, responses }
	}

	/// Runs the instruction, declaration and term productions over `source` until end of file, skipping a token
	/// whenever none applies. Declarations are appended to the innermost scope of `context`.
	pub fn parse_all(&mut self, source: &TokenizedSource, context: &mut TypeContext) -> (Status, Vec<Response>) {
		let mut responses = Vec::new();
		let mut failed = false;
		// The line on which tokens are currently being skipped, reported only once.
		let mut recovering: Option<usize> = None;
		let mut cursor = 0;

		while peek(source, cursor, 0) != TokenKind::EndOfFile {
			let mut reason = None;

			match self.attempt_instruction(source, cursor, context) {
				Ok((_, Step::Exit)) => {
					tracing::debug!(at = %source.tokens[cursor].span, "exit requested");
					return (Status::Exit, responses);
				}
				Ok((next, Step::Respond(response))) => {
					failed |= matches!(response, Response::Failed { .. });
					responses.push(response);
					cursor = next;
					recovering = None;
					continue;
				}
				Err(error) => reason = reason.or(error),
			}

			match self.attempt_declaration(source, cursor, context) {
				Ok((next, (name, assumption))) => {
					tracing::debug!(name = self.interner.resolve(&name), at = %assumption.span, "declared");
					context.append(name, assumption);
					cursor = next;
					recovering = None;
					continue;
				}
				Err(error) => reason = reason.or(error),
			}

			match self.attempt_term(source, cursor, context) {
				Ok((next, _)) => {
					cursor = next;
					recovering = None;
					continue;
				}
				Err(error) => reason = reason.or(error),
			}

			let token = &source.tokens[cursor];
			tracing::debug!(kind = %token.kind, at = %token.span, "skipping token");
			if recovering != Some(token.span.begin.line) {
				responses.push(match reason {
					Some(error) => Response::Failed {
						span: error.span,
						message: display_error(&error.kind, &self.arena, &self.interner),
					},
					None => Response::Failed {
						span: token.span,
						message: format!("unexpected {} `{}`", token.kind, token.lexeme),
					},
				});
				recovering = Some(token.span.begin.line);
			}
			failed = true;
			cursor += 1;
		}

		(if failed { Status::Error } else { Status::Success }, responses)
	}

	fn attempt_instruction(&mut self, source: &TokenizedSource, cursor: usize, context: &TypeContext) -> Attempt<Step> {
		let (next, instruction) = parse::instruction(source, cursor, &mut self.interner).ok_or(None)?;
		let step = match instruction {
			Instruction::Evaluate(expression) => {
				let typed = Elaborator::new(&mut self.arena, context).synthesize(&expression).map_err(Some)?;
				match Evaluator::new(&mut self.arena).normalize(typed.term) {
					Ok(value) => Step::Respond(Response::Evaluated { term: typed.term, value }),
					Err(error) => {
						tracing::debug!(%error, at = %expression.span, "evaluation failed");
						Step::Respond(Response::Failed { span: expression.span, message: error.to_string() })
					}
				}
			}
			Instruction::TypeInfer(expression) => {
				let typed = Elaborator::new(&mut self.arena, context).synthesize(&expression).map_err(Some)?;
				let ty = Evaluator::new(&mut self.arena).normalize(typed.ty).unwrap_or(typed.ty);
				Step::Respond(Response::Typed { term: typed.term, ty })
			}
			Instruction::Info => Step::Respond(Response::Info(dump_context(context, &self.arena, &self.interner))),
			Instruction::Exit => Step::Exit,
		};
		Ok((next, step))
	}

	fn attempt_declaration(
		&mut self,
		source: &TokenizedSource,
		cursor: usize,
		context: &TypeContext,
	) -> Attempt<(Name, Assumption)> {
		let (next, declaration) = parse::declaration(source, cursor, &mut self.interner).ok_or(None)?;
		let binding = Elaborator::new(&mut self.arena, context).declaration(&declaration).map_err(|error| {
			tracing::debug!(?error, "rejected declaration");
			Some(error)
		})?;
		Ok((next, binding))
	}

	fn attempt_term(&mut self, source: &TokenizedSource, cursor: usize, context: &TypeContext) -> Attempt<Typed> {
		let (next, expression) = parse::term(source, cursor, &mut self.interner).ok_or(None)?;
		let typed = Elaborator::new(&mut self.arena, context).synthesize(&expression).map_err(|error| {
			tracing::debug!(?error, "rejected term");
			Some(error)
		})?;
		Ok((next, typed))
	}

	/// The term production at `cursor`: parses and elaborates a term, or yields nothing.
	pub fn term(&mut self, source: &TokenizedSource, cursor: usize, context: &TypeContext) -> Option<(usize, Typed)> {
		self.attempt_term(source, cursor, context).ok()
	}

	/// The declaration production at `cursor`, yielding the binding it would add.
	pub fn declaration(
		&mut self,
		source: &TokenizedSource,
		cursor: usize,
		context: &TypeContext,
	) -> Option<(usize, (Name, Assumption))> {
		self.attempt_declaration(source, cursor, context).ok()
	}

	/// Renders a response to text. Failures are located in `source`, the bytes they were parsed from.
	pub fn render(&self, source: impl AsRef<[u8]>, response: &Response) -> String {
		match response {
			Response::Evaluated { value, .. } => pretty_print(*value, &self.arena, &self.interner),
			Response::Typed { term, ty } => format!(
				"{} : {}",
				pretty_print(*term, &self.arena, &self.interner),
				pretty_print(*ty, &self.arena, &self.interner)
			),
			Response::Failed { span, message } => {
				let text: String = decode(source.as_ref()).iter().collect();
				format_line_error(&text, *span, message)
			}
			Response::Info(dump) => dump.trim_end().to_owned(),
		}
	}
}
