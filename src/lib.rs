pub mod backend;
pub mod common;
pub mod compiler;
pub mod frontend;
pub mod middle;

pub use frontend::lexer::Lexer;
pub use frontend::parser::Parser;
pub use frontend::scanner::Scanner;

pub use frontend::resolve::NameResolver;
pub use middle::type_system::TypeChecker;
pub use middle::types;

pub use backend::compiler::CodeGenerator;
pub use backend::instruction::TargetCode;
pub use backend::writer::TargetCodeWriter;

pub use common::error_reporter;
pub use compiler::{Compilation, Compiler, Phase};
