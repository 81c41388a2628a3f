use std::{env, path::Path, process};

use log::{LevelFilter, error};
use simple_logger::SimpleLogger;
use triangle_core::{
    Compiler, TargetCodeWriter, common::io::read_source, error_reporter::print_diagnostics,
};

static USAGE: &str = r#"
usage: triangle SOURCE BINARY LISTING

arguments:
    SOURCE     Triangle program to compile
    BINARY     where to write the TAM object code
    LISTING    where to write the readable instruction listing

example:
    triangle program.tri program.tam program.txt
"#;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let [source_file, binary_file, text_file] = args.as_slice() else {
        eprintln!("{}", USAGE);
        // FreeBSD EX_USAGE (64)
        process::exit(64);
    };

    let source_path = Path::new(source_file);
    if !source_path.exists() {
        let shown = std::path::absolute(source_path)
            .unwrap_or_else(|_| source_path.to_path_buf());
        println!("ERROR: The input file \"{}\" does not exist", shown.display());
        process::exit(1);
    }

    if let Err(e) = SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .env()
        .init()
    {
        eprintln!("could not install logger: {}", e);
    }

    let source = match read_source(source_path) {
        Ok(source) => source,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    println!("Compiling...");
    let mut compiler = Compiler::new();
    let compilation = compiler.compile(&source);

    if let Some(code) = &compilation.code {
        compiler.write(code, &TargetCodeWriter::new(binary_file, text_file));
    }

    let reporter = compiler.reporter();
    print_diagnostics(source_file, reporter, &source);
    println!("{}", reporter.summary());

    if let Some(program) = &compilation.program {
        println!("{}", program);
    }

    println!("Compilation Finished");
}
