use std::ops::Index;

use crate::common::{Name, Operator};

/// A handle to a term stored in an [`Arena`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TermId(usize);

// The core syntax: the output of the elaborator and the input and output of the evaluator.
#[derive(Clone, Debug, PartialEq)]
pub enum Term {
	// Variables. A defined variable carries the definition it was bound to when it was elaborated.
	Variable { name: Name, definition: Option<TermId> },

	// Literals.
	Real(f64),
	Str(Box<str>),

	// Types.
	RealType,
	StringType,
	Universe,
	Arrow { domain: TermId, codomain: TermId },

	// Operators.
	Section(Operator),
	Binary { operator: Operator, left: TermId, right: TermId },

	Apply { function: TermId, argument: TermId },
	Annotated { term: TermId, ty: TermId },
}

/// Owns every term built during a session. Terms are never freed individually, so a handle stays
/// valid for as long as the arena does and subterms can be shared freely.
#[derive(Clone, Debug, Default)]
pub struct Arena {
	terms: Vec<Term>,
}

impl Arena {
	pub fn new() -> Self { Self::default() }

	pub fn alloc(&mut self, term: Term) -> TermId {
		let id = TermId(self.terms.len());
		self.terms.push(term);
		id
	}

	pub fn len(&self) -> usize { self.terms.len() }

	pub fn is_empty(&self) -> bool { self.terms.is_empty() }

	pub fn real(&mut self, value: f64) -> TermId { self.alloc(Term::Real(value)) }

	pub fn real_type(&mut self) -> TermId { self.alloc(Term::RealType) }

	pub fn universe(&mut self) -> TermId { self.alloc(Term::Universe) }

	pub fn arrow(&mut self, domain: TermId, codomain: TermId) -> TermId { self.alloc(Term::Arrow { domain, codomain }) }

	/// `ℝ -> ℝ -> ℝ`, the type of an operator section.
	pub fn binary_operator_type(&mut self) -> TermId {
		let (a, b, c) = (self.real_type(), self.real_type(), self.real_type());
		let tail = self.arrow(b, c);
		self.arrow(a, tail)
	}

	pub fn as_real(&self, id: TermId) -> Option<f64> {
		match self[id] {
			Term::Real(value) => Some(value),
			_ => None,
		}
	}
}

impl Index<TermId> for Arena {
	type Output = Term;

	fn index(&self, id: TermId) -> &Self::Output { &self.terms[id.0] }
}
