use thiserror::Error;

use crate::{
	common::Operator,
	ir::syntax::{Arena, Term, TermId},
};

/// How many nested reductions a single normalization may perform before giving up.
pub const MAX_DEPTH: usize = 1024;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum EvaluationError {
	#[error("usage: {operator} ℝ ℝ")]
	NonRealOperand { operator: Operator },
	#[error("only functions can be applied")]
	NotAFunction,
	#[error("term is nested too deeply to evaluate")]
	TooDeep,
}

/// Reduces terms to normal form. Variables already carry the definitions they were bound to, so no
/// context is consulted.
pub struct Evaluator<'a> {
	arena: &'a mut Arena,
	depth: usize,
}

impl<'a> Evaluator<'a> {
	pub fn new(arena: &'a mut Arena) -> Self { Self { arena, depth: 0 } }

	pub fn arena(&self) -> &Arena { self.arena }

	pub fn normalize(&mut self, term: TermId) -> Result<TermId, EvaluationError> {
		if self.depth >= MAX_DEPTH {
			return Err(EvaluationError::TooDeep);
		}
		self.depth += 1;
		let result = self.reduce(term);
		self.depth -= 1;
		result
	}

	fn reduce(&mut self, term: TermId) -> Result<TermId, EvaluationError> {
		match self.arena[term].clone() {
			Term::Real(_)
			| Term::Str(_)
			| Term::RealType
			| Term::StringType
			| Term::Universe
			| Term::Section(_)
			| Term::Variable { definition: None, .. } => Ok(term),

			Term::Variable { definition: Some(definition), .. } => self.normalize(definition),

			Term::Arrow { domain, codomain } => {
				let (domain_nf, codomain_nf) = (self.normalize(domain)?, self.normalize(codomain)?);
				if (domain_nf, codomain_nf) == (domain, codomain) {
					Ok(term)
				} else {
					Ok(self.arena.arrow(domain_nf, codomain_nf))
				}
			}

			Term::Annotated { term, .. } => self.normalize(term),

			Term::Binary { operator, left, right } => {
				let (left, right) = (self.normalize(left)?, self.normalize(right)?);
				self.compute(operator, left, right)
			}

			Term::Apply { function, argument } => {
				let (function_nf, argument_nf) = (self.normalize(function)?, self.normalize(argument)?);
				match self.arena[function_nf] {
					Term::Section(_) | Term::Variable { .. } =>
						Ok(self.arena.alloc(Term::Apply { function: function_nf, argument: argument_nf })),
					Term::Apply { function: head, argument: left } => match self.arena[head] {
						Term::Section(operator) => self.compute(operator, left, argument_nf),
						// A stuck application stays stuck.
						_ => Ok(self.arena.alloc(Term::Apply { function: function_nf, argument: argument_nf })),
					},
					_ => Err(EvaluationError::NotAFunction),
				}
			}
		}
	}

	/// Applies `operator` to two normal forms, which must both be real literals.
	fn compute(&mut self, operator: Operator, left: TermId, right: TermId) -> Result<TermId, EvaluationError> {
		match (self.arena.as_real(left), self.arena.as_real(right)) {
			(Some(left), Some(right)) => Ok(self.arena.real(operator.apply(left, right))),
			_ => Err(EvaluationError::NonRealOperand { operator }),
		}
	}
}

#[cfg(test)]
mod tests {
	use lasso::Rodeo;

	use super::*;

	#[test]
	fn literals_normalize_to_themselves() {
		let mut arena = Arena::new();
		let terms = [
			arena.real(1.5),
			arena.alloc(Term::Str("text".into())),
			arena.real_type(),
			arena.alloc(Term::StringType),
			arena.universe(),
			arena.alloc(Term::Section(Operator::Plus)),
		];
		let len = arena.len();
		let mut evaluator = Evaluator::new(&mut arena);
		for term in terms {
			assert_eq!(evaluator.normalize(term), Ok(term));
		}
		assert_eq!(arena.len(), len);
	}

	#[test]
	fn binary_operators_compute() {
		let mut arena = Arena::new();
		let (two, three) = (arena.real(2.0), arena.real(3.0));
		let sum = arena.alloc(Term::Binary { operator: Operator::Plus, left: two, right: three });
		let product = arena.alloc(Term::Binary { operator: Operator::Times, left: sum, right: three });
		let mut evaluator = Evaluator::new(&mut arena);
		let sum = evaluator.normalize(sum).unwrap();
		let product = evaluator.normalize(product).unwrap();
		assert_eq!(arena.as_real(sum), Some(5.0));
		assert_eq!(arena.as_real(product), Some(15.0));
	}

	#[test]
	fn sections_compute_once_saturated() {
		let mut arena = Arena::new();
		let times = arena.alloc(Term::Section(Operator::Times));
		let (four, half) = (arena.real(4.0), arena.real(0.5));
		let partial = arena.alloc(Term::Apply { function: times, argument: four });
		let total = arena.alloc(Term::Apply { function: partial, argument: half });
		let mut evaluator = Evaluator::new(&mut arena);
		let partial = evaluator.normalize(partial).unwrap();
		let total = evaluator.normalize(total).unwrap();
		assert!(matches!(arena[partial], Term::Apply { .. }));
		assert_eq!(arena.as_real(total), Some(2.0));
	}

	#[test]
	fn variables_unfold_their_definitions() {
		let mut interner = Rodeo::new();
		let mut arena = Arena::new();
		let (x, y) = (interner.get_or_intern("x"), interner.get_or_intern("y"));
		let seven = arena.real(7.0);
		let x = arena.alloc(Term::Variable { name: x, definition: Some(seven) });
		let y = arena.alloc(Term::Variable { name: y, definition: None });

		let mut evaluator = Evaluator::new(&mut arena);
		assert_eq!(evaluator.normalize(x), Ok(seven));
		assert_eq!(evaluator.normalize(y), Ok(y));
	}

	#[test]
	fn neutral_operands_are_rejected() {
		let mut interner = Rodeo::new();
		let mut arena = Arena::new();
		let x = interner.get_or_intern("x");
		let (x, one) = (arena.alloc(Term::Variable { name: x, definition: None }), arena.real(1.0));
		let sum = arena.alloc(Term::Binary { operator: Operator::Plus, left: x, right: one });
		let applied = arena.alloc(Term::Apply { function: one, argument: one });

		let mut evaluator = Evaluator::new(&mut arena);
		assert_eq!(evaluator.normalize(sum), Err(EvaluationError::NonRealOperand { operator: Operator::Plus }));
		assert_eq!(evaluator.normalize(applied), Err(EvaluationError::NotAFunction));
	}

	#[test]
	fn arrows_are_shared_when_already_normal() {
		let mut arena = Arena::new();
		let ty = arena.binary_operator_type();
		let mut evaluator = Evaluator::new(&mut arena);
		assert_eq!(evaluator.normalize(ty), Ok(ty));
	}

	#[test]
	fn deep_terms_fail_instead_of_overflowing() {
		let mut arena = Arena::new();
		let one = arena.real(1.0);
		let deep = (0..MAX_DEPTH).fold(one, |left, _| arena.alloc(Term::Binary { operator: Operator::Plus, left, right: one }));
		let shallow = (0..10).fold(one, |left, _| arena.alloc(Term::Binary { operator: Operator::Plus, left, right: one }));

		let mut evaluator = Evaluator::new(&mut arena);
		assert_eq!(evaluator.normalize(deep), Err(EvaluationError::TooDeep));
		// The depth is restored after a failure.
		let shallow = evaluator.normalize(shallow).unwrap();
		assert_eq!(arena.as_real(shallow), Some(11.0));
	}

	#[test]
	fn error_messages() {
		assert_eq!(EvaluationError::NonRealOperand { operator: Operator::Times }.to_string(), "usage: × ℝ ℝ");
	}
}
