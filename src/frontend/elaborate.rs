use crate::{
	common::{Name, Span},
	frontend::{conversion::Conversion as _, evaluate::Evaluator},
	ir::{
		context::{Assumption, TypeContext},
		presyntax::{Constant, Declaration, Expression, Preterm, Type},
		syntax::{Arena, Term, TermId},
	},
};

#[derive(Debug, Clone, PartialEq)]
pub struct ElaborationError {
	pub span: Span,
	pub kind: ElaborationErrorKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElaborationErrorKind {
	NotInScope(Name),
	ExpectedReal { found: TermId },
	ExpectedFunction { found: TermId },
	ExpectedType { found: TermId },
	Mismatch { expected: TermId, found: TermId },
}

impl ElaborationErrorKind {
	fn at(self, span: Span) -> ElaborationError { ElaborationError { span, kind: self } }
}

/// An elaborated term together with its synthesized type.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Typed {
	pub term: TermId,
	pub ty: TermId,
}

/// Turns expressions into arena terms, checking them against a context it never modifies.
pub struct Elaborator<'a> {
	arena: &'a mut Arena,
	context: &'a TypeContext,
}

impl<'a> Elaborator<'a> {
	pub fn new(arena: &'a mut Arena, context: &'a TypeContext) -> Self { Self { arena, context } }

	fn evaluator(&mut self) -> Evaluator<'_> { Evaluator::new(self.arena) }

	pub fn synthesize(&mut self, expression: &Expression) -> Result<Typed, ElaborationError> {
		let span = expression.span;
		Ok(match &expression.preterm {
			Preterm::Variable(identifier) => {
				let assumption =
					self.context.lookup(identifier.name).ok_or(ElaborationErrorKind::NotInScope(identifier.name).at(span))?;
				let variable = Term::Variable { name: identifier.name, definition: assumption.definition };
				Typed { term: self.arena.alloc(variable), ty: assumption.ty }
			}

			Preterm::Constant(Constant::Real(value)) => Typed { term: self.arena.real(*value), ty: self.arena.real_type() },
			Preterm::Constant(Constant::String(text)) =>
				Typed { term: self.arena.alloc(Term::Str(text.clone())), ty: self.arena.alloc(Term::StringType) },

			// Type-in-type.
			Preterm::RealType => Typed { term: self.arena.real_type(), ty: self.arena.universe() },
			Preterm::Universe => Typed { term: self.arena.universe(), ty: self.arena.universe() },

			Preterm::Section(operator) =>
				Typed { term: self.arena.alloc(Term::Section(*operator)), ty: self.arena.binary_operator_type() },

			Preterm::Arrow { domain, codomain } => {
				let domain = self.elaborate_type(domain)?;
				let codomain = self.elaborate_type(codomain)?;
				Typed { term: self.arena.arrow(domain, codomain), ty: self.arena.universe() }
			}

			Preterm::BinaryPrefix { operator, left, right } | Preterm::BinaryInfix { operator, left, right } => {
				let left = self.check_real(left)?;
				let right = self.check_real(right)?;
				Typed {
					term: self.arena.alloc(Term::Binary { operator: *operator, left, right }),
					ty: self.arena.real_type(),
				}
			}

			Preterm::Apply { function, argument } => {
				let function = self.synthesize(function)?;
				let function_ty = self.evaluator().normalize(function.ty).unwrap_or(function.ty);
				let Term::Arrow { domain, codomain } = self.arena[function_ty] else {
					return Err(ElaborationErrorKind::ExpectedFunction { found: function.ty }.at(span));
				};
				let argument = self.check(argument, domain)?;
				Typed { term: self.arena.alloc(Term::Apply { function: function.term, argument }), ty: codomain }
			}

			Preterm::Annotated { term, ty } => {
				let ty = self.elaborate_type(&ty.0)?;
				let term = self.check(term, ty)?;
				Typed { term: self.arena.alloc(Term::Annotated { term, ty }), ty }
			}
		})
	}

	/// Elaborates `expression` and requires its type to be convertible to `ty`.
	pub fn check(&mut self, expression: &Expression, ty: TermId) -> Result<TermId, ElaborationError> {
		let typed = self.synthesize(expression)?;
		if self.evaluator().can_convert(typed.ty, ty) {
			Ok(typed.term)
		} else {
			Err(ElaborationErrorKind::Mismatch { expected: ty, found: typed.ty }.at(expression.span))
		}
	}

	/// Elaborates a term that must inhabit the universe.
	pub fn elaborate_type(&mut self, expression: &Expression) -> Result<TermId, ElaborationError> {
		let universe = self.arena.universe();
		self.check(expression, universe).map_err(|error| match error.kind {
			ElaborationErrorKind::Mismatch { found, .. } => ElaborationErrorKind::ExpectedType { found }.at(error.span),
			_ => error,
		})
	}

	fn check_real(&mut self, expression: &Expression) -> Result<TermId, ElaborationError> {
		let real = self.arena.real_type();
		self.check(expression, real).map_err(|error| match error.kind {
			ElaborationErrorKind::Mismatch { found, .. } => ElaborationErrorKind::ExpectedReal { found }.at(error.span),
			_ => error,
		})
	}

	/// Elaborates a declaration into the binding it introduces. Definitions are stored in normal
	/// form when they have one. Either way, the names they mention stay bound to what they meant here.
	pub fn declaration(&mut self, declaration: &Declaration) -> Result<(Name, Assumption), ElaborationError> {
		let name = declaration.name();
		let assumption = match declaration {
			Declaration::Def { ty: Type(ty), .. } => Assumption::new(self.elaborate_type(ty)?),
			Declaration::Full { ty: Type(ty), value, .. } => {
				let ty = self.elaborate_type(ty)?;
				let value = self.check(value, ty)?;
				Assumption::defined(ty, self.evaluator().normalize(value).unwrap_or(value))
			}
			Declaration::Assign { value, .. } => {
				let Typed { term, ty } = self.synthesize(value)?;
				Assumption::defined(ty, self.evaluator().normalize(term).unwrap_or(term))
			}
		};
		Ok((name.name, assumption.at(name.span)))
	}
}
