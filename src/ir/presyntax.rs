use crate::common::{Name, Operator, Span};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Identifier {
	pub name: Name,
	pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
	String(Box<str>),
	Real(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
	pub span: Span,
	pub preterm: Preterm,
}

// The raw syntax: the output of the parser and the input of the elaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum Preterm {
	Variable(Identifier),
	Constant(Constant),

	Apply { function: Box<Expression>, argument: Box<Expression> },
	Annotated { term: Box<Expression>, ty: Box<Type> },
	BinaryPrefix { operator: Operator, left: Box<Expression>, right: Box<Expression> },
	BinaryInfix { operator: Operator, left: Box<Expression>, right: Box<Expression> },
	Section(Operator),

	// Base types.
	RealType,
	Universe,
	Arrow { domain: Box<Expression>, codomain: Box<Expression> },
}

impl Preterm {
	pub fn at(self, span: Span) -> Expression { Expression { span, preterm: self } }
}

/// Types are terms that are expected to inhabit the universe.
#[derive(Debug, Clone, PartialEq)]
pub struct Type(pub Expression);

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
	Def { name: Identifier, ty: Type },
	Assign { name: Identifier, value: Expression },
	Full { name: Identifier, ty: Type, value: Expression },
}

impl Declaration {
	pub fn name(&self) -> Identifier {
		match self {
			Self::Def { name, .. } | Self::Assign { name, .. } | Self::Full { name, .. } => *name,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
	Evaluate(Expression),
	TypeInfer(Expression),
	Info,
	Exit,
}
