pub mod automaton;
pub mod codec;
pub mod conversion;
pub mod elaborate;
pub mod evaluate;
pub mod lex;
pub mod parse;
pub mod pretty;
