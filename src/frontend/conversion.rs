use crate::{
	frontend::evaluate::Evaluator,
	ir::syntax::{Arena, Term, TermId},
};

pub trait Conversion<T> {
	/// Decides whether two values are judgementally equal.
	fn can_convert(&mut self, left: T, right: T) -> bool;
}

impl Conversion<TermId> for Evaluator<'_> {
	/// Normalizes both sides, then compares them structurally. A side that fails to normalize is
	/// equal to nothing.
	fn can_convert(&mut self, left: TermId, right: TermId) -> bool {
		match (self.normalize(left), self.normalize(right)) {
			(Ok(left), Ok(right)) => same_shape(self.arena(), left, right),
			_ => false,
		}
	}
}

fn same_shape(arena: &Arena, left: TermId, right: TermId) -> bool {
	use Term as T;
	if left == right {
		return true;
	}
	match (&arena[left], &arena[right]) {
		(T::Variable { name: l, .. }, T::Variable { name: r, .. }) => l == r,
		(T::Real(l), T::Real(r)) => l == r,
		(T::Str(l), T::Str(r)) => l == r,
		(T::RealType, T::RealType) | (T::StringType, T::StringType) | (T::Universe, T::Universe) => true,
		(T::Section(l), T::Section(r)) => l == r,
		(T::Arrow { domain: a, codomain: b }, T::Arrow { domain: c, codomain: d })
		| (T::Apply { function: a, argument: b }, T::Apply { function: c, argument: d })
		| (T::Annotated { term: a, ty: b }, T::Annotated { term: c, ty: d }) =>
			same_shape(arena, *a, *c) && same_shape(arena, *b, *d),
		(T::Binary { operator: o, left: a, right: b }, T::Binary { operator: p, left: c, right: d }) =>
			o == p && same_shape(arena, *a, *c) && same_shape(arena, *b, *d),
		_ => false,
	}
}
