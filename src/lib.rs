pub mod common;
pub mod frontend;
pub mod ir;
pub mod report;
pub mod session;
