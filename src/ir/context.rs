use crate::{
	common::{Name, Span},
	ir::syntax::TermId,
};

/// What a context knows about a name: its type and, for assignments, its value.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Assumption {
	pub ty: TermId,
	pub definition: Option<TermId>,
	pub span: Span,
}

impl Assumption {
	pub fn new(ty: TermId) -> Self { Self { ty, definition: None, span: Span::default() } }

	pub fn defined(ty: TermId, definition: TermId) -> Self { Self { ty, definition: Some(definition), span: Span::default() } }

	pub fn at(self, span: Span) -> Self { Self { span, ..self } }
}

/// One layer of a context. Bindings keep their insertion order; rebinding a name replaces it in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scope {
	bindings: Vec<(Name, Assumption)>,
}

impl Scope {
	pub fn insert(&mut self, name: Name, assumption: Assumption) {
		match self.bindings.iter_mut().find(|(bound, _)| *bound == name) {
			Some((_, slot)) => *slot = assumption,
			None => self.bindings.push((name, assumption)),
		}
	}

	pub fn get(&self, name: Name) -> Option<Assumption> {
		self.bindings.iter().find(|(bound, _)| *bound == name).map(|&(_, assumption)| assumption)
	}

	pub fn bindings(&self) -> impl Iterator<Item = (Name, Assumption)> + '_ { self.bindings.iter().copied() }

	pub fn len(&self) -> usize { self.bindings.len() }

	pub fn is_empty(&self) -> bool { self.bindings.is_empty() }
}

/// The assumptions under which a term is checked, as a stack of scopes ordered outer to inner.
///
/// A context always has at least one scope. Inner bindings shadow outer bindings of the same name
/// without erasing them.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeContext {
	scopes: Vec<Scope>,
}

impl Default for TypeContext {
	fn default() -> Self { Self { scopes: vec![Scope::default()] } }
}

impl TypeContext {
	pub fn empty() -> Self { Self::default() }

	/// Binds `name` in the innermost scope.
	pub fn append(&mut self, name: Name, assumption: Assumption) { self.innermost().insert(name, assumption); }

	/// Flattens every binding of `other` into the innermost scope, in order; `other` wins collisions.
	pub fn append_context(&mut self, other: &Self) {
		let innermost = self.innermost();
		for (name, assumption) in other.bindings() {
			innermost.insert(name, assumption);
		}
	}

	/// Grafts the scopes of `other` inside this context as distinct layers.
	pub fn extend(&mut self, other: &Self) { self.scopes.extend(other.scopes.iter().cloned()); }

	pub fn lookup(&self, name: Name) -> Option<Assumption> { self.scopes.iter().rev().find_map(|scope| scope.get(name)) }

	pub fn scopes(&self) -> &[Scope] { &self.scopes }

	pub fn innermost_scope(&self) -> &Scope {
		// Every constructor leaves at least one scope behind.
		&self.scopes[self.scopes.len() - 1]
	}

	/// Every binding, outer scopes first, each scope in insertion order.
	pub fn bindings(&self) -> impl Iterator<Item = (Name, Assumption)> + '_ {
		self.scopes.iter().flat_map(|scope| scope.bindings())
	}

	fn innermost(&mut self) -> &mut Scope {
		if self.scopes.is_empty() {
			self.scopes.push(Scope::default());
		}
		let last = self.scopes.len() - 1;
		&mut self.scopes[last]
	}
}

/// Merges two optional contexts into a new one: a copy of `a` with every binding of `b` flattened
/// into its innermost scope. A missing side counts as empty.
pub fn merge(a: Option<&TypeContext>, b: Option<&TypeContext>) -> TypeContext {
	match (a, b) {
		(None, None) => TypeContext::empty(),
		(Some(a), None) => a.clone(),
		(None, Some(b)) => b.clone(),
		(Some(a), Some(b)) => {
			let mut result = a.clone();
			result.append_context(b);
			result
		}
	}
}

/// Extends a copy of `a` with the scopes of `b`. A missing side counts as empty.
pub fn extend(a: Option<&TypeContext>, b: Option<&TypeContext>) -> TypeContext {
	match (a, b) {
		(None, None) => TypeContext::empty(),
		(Some(a), None) => a.clone(),
		(None, Some(b)) => b.clone(),
		(Some(a), Some(b)) => {
			let mut result = a.clone();
			result.extend(b);
			result
		}
	}
}
