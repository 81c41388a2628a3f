use std::fmt;

use log::info;

use crate::{
    backend::{compiler::CodeGenerator, instruction::TargetCode, writer::TargetCodeWriter},
    common::error_reporter::ErrorReporter,
    frontend::{
        ast::Program, lexer::Lexer, parser::Parser, resolve::NameResolver, scanner::Scanner,
    },
    middle::type_system::TypeChecker,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Tokenize,
    Parse,
    Identify,
    TypeCheck,
    GenerateCode,
    Write,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Tokenize => "Tokenising",
            Phase::Parse => "Parsing",
            Phase::Identify => "Identifying",
            Phase::TypeCheck => "Type checking",
            Phase::GenerateCode => "Generating code",
            Phase::Write => "Writing",
        };
        write!(f, "{}", name)
    }
}

/// What a run of the pipeline produced.
#[derive(Debug, Default)]
pub struct Compilation {
    /// Present once parsing has run, even if it reported errors.
    pub program: Option<Program>,
    pub code: Option<TargetCode>,

    /// The phase after which errors stopped the pipeline.
    pub halted_in: Option<Phase>,
}

/// Runs the phases in order against one reporter and stops after the
/// first phase that leaves errors behind.
#[derive(Debug, Default)]
pub struct Compiler {
    reporter: ErrorReporter,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reporter(&self) -> &ErrorReporter {
        &self.reporter
    }

    fn start(&self, phase: Phase) {
        info!("{}...", phase);
    }

    // logs progress, `Err` names the phase that must stop the pipeline
    fn finish(&self, phase: Phase) -> Result<(), Phase> {
        info!("{} errors so far", self.reporter.error_count());
        if self.reporter.has_errors() {
            Err(phase)
        } else {
            Ok(())
        }
    }

    pub fn compile(&mut self, source: &str) -> Compilation {
        let mut compilation = Compilation::default();
        if let Err(phase) = self.run(source, &mut compilation) {
            compilation.halted_in = Some(phase);
        }
        compilation
    }

    fn run(&mut self, source: &str, compilation: &mut Compilation) -> Result<(), Phase> {
        self.start(Phase::Tokenize);
        let tokens = Lexer::new(Scanner::new(source)).get_all_tokens(&mut self.reporter);
        self.finish(Phase::Tokenize)?;

        self.start(Phase::Parse);
        let program = Parser::new(&tokens).parse(&mut self.reporter);
        let program = compilation.program.insert(program);
        self.finish(Phase::Parse)?;

        self.start(Phase::Identify);
        NameResolver::new().resolve(program, &mut self.reporter);
        self.finish(Phase::Identify)?;

        self.start(Phase::TypeCheck);
        TypeChecker::new().check(program, &mut self.reporter);
        self.finish(Phase::TypeCheck)?;

        self.start(Phase::GenerateCode);
        let code = CodeGenerator::new().generate(program, &mut self.reporter);
        self.finish(Phase::GenerateCode)?;

        compilation.code = Some(code);
        Ok(())
    }

    pub fn write(&mut self, code: &TargetCode, writer: &TargetCodeWriter) {
        self.start(Phase::Write);
        writer.write_to_files(code, &mut self.reporter);
        info!("{} errors so far", self.reporter.error_count());
    }
}
