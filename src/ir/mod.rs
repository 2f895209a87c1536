pub mod context;
pub mod presyntax;
pub mod syntax;
pub mod tokenized;
