use std::fmt::Write;

use lasso::Rodeo;

use crate::ir::{
	context::TypeContext,
	syntax::{Arena, Term, TermId},
	tokenized::Token,
};

pub fn pretty_print(term: TermId, arena: &Arena, interner: &Rodeo) -> String {
	let mut s = String::new();
	// Writing to a string never fails.
	let _ = print(term, &mut s, arena, interner);
	s
}

pub fn print(term: TermId, f: &mut impl Write, arena: &Arena, interner: &Rodeo) -> std::fmt::Result {
	match &arena[term] {
		Term::Variable { name, .. } => write!(f, "{}", interner.resolve(name))?,
		Term::Real(value) => write!(f, "{value}")?,
		Term::Str(text) => write!(f, "\"{text}\"")?,
		Term::RealType => write!(f, "ℝ")?,
		Term::StringType => write!(f, "String")?,
		Term::Universe => write!(f, "𝒰")?,
		Term::Arrow { domain, codomain } => {
			print_spine(*domain, f, arena, interner)?;
			write!(f, " -> ")?;
			print(*codomain, f, arena, interner)?;
		}
		Term::Section(operator) => write!(f, "({operator})")?,
		Term::Binary { operator, left, right } => {
			write!(f, "{operator} ")?;
			print_atom(*left, f, arena, interner)?;
			write!(f, " ")?;
			print_atom(*right, f, arena, interner)?;
		}
		Term::Apply { function, argument } => {
			print_spine(*function, f, arena, interner)?;
			write!(f, " ")?;
			print_atom(*argument, f, arena, interner)?;
		}
		Term::Annotated { term, ty } => {
			write!(f, "(")?;
			print(*term, f, arena, interner)?;
			write!(f, " : ")?;
			print(*ty, f, arena, interner)?;
			write!(f, ")")?;
		}
	}
	Ok(())
}

fn print_spine(term: TermId, f: &mut impl Write, arena: &Arena, interner: &Rodeo) -> std::fmt::Result {
	match &arena[term] {
		Term::Apply { .. } => print(term, f, arena, interner),
		_ => print_atom(term, f, arena, interner),
	}
}

fn print_atom(term: TermId, f: &mut impl Write, arena: &Arena, interner: &Rodeo) -> std::fmt::Result {
	match &arena[term] {
		Term::Variable { .. }
		| Term::Real(_)
		| Term::Str(_)
		| Term::RealType
		| Term::StringType
		| Term::Universe
		| Term::Section(_)
		| Term::Annotated { .. } => print(term, f, arena, interner)?,

		Term::Arrow { .. } | Term::Binary { .. } | Term::Apply { .. } => {
			write!(f, "(")?;
			print(term, f, arena, interner)?;
			write!(f, ")")?;
		}
	}
	Ok(())
}

/// One line per token: start position, kind, and quoted lexeme.
pub fn dump_tokens(tokens: &[Token]) -> String {
	let mut s = String::new();
	for token in tokens {
		let _ = writeln!(s, "{:<10}{:<22}'{}'", token.span.begin.to_string(), token.kind.name(), token.lexeme);
	}
	s
}

/// One line per binding, outer scopes first: declaration position, entity kind, and the quoted binding.
pub fn dump_context(context: &TypeContext, arena: &Arena, interner: &Rodeo) -> String {
	let mut s = String::new();
	for (name, assumption) in context.bindings() {
		let kind = if assumption.definition.is_some() { "definition" } else { "assumption" };
		let mut binding = format!("{} : {}", interner.resolve(&name), pretty_print(assumption.ty, arena, interner));
		if let Some(definition) = assumption.definition {
			binding.push_str(" = ");
			binding.push_str(&pretty_print(definition, arena, interner));
		}
		let _ = writeln!(s, "{:<10}{:<12}'{}'", assumption.span.begin.to_string(), kind, binding);
	}
	s
}
