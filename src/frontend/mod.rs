pub mod ast;
pub mod lexer;
pub mod mut_visitor;
pub mod parser;
pub mod resolve;
pub mod scanner;
pub mod tree_printer;
