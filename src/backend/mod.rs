pub mod compiler;
pub mod instruction;
pub mod writer;
