//! Command-line front end: parses one file and reports whether it is syntactically valid.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;

use js_syntax::diagnostics::Diagnostics;
use js_syntax::parser::Parser;

#[derive(ClapParser)]
#[command(name = "js-syntax", about = "Parse a JavaScript source file and report syntax errors")]
struct Cli {
    /// Source file to parse.
    file: PathBuf,

    /// Parse as a module (enables import/export declarations).
    #[arg(long, conflicts_with = "script")]
    module: bool,

    /// Parse as a classic script (the default; import/export degrade to identifiers).
    #[arg(long, conflicts_with = "module")]
    script: bool,

    /// Print the parsed syntax tree before reporting pass/fail.
    #[arg(long)]
    dump_ast: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let source = match std::fs::read_to_string(&cli.file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("js-syntax: cannot read {}: {err}", cli.file.display());
            return ExitCode::from(1);
        }
    };

    let mut parser = Parser::new(&source, cli.module);
    let program = parser.parse();

    let file_label = cli.file.display().to_string();
    let mut diagnostics = Diagnostics::new(file_label.clone());
    for error in parser.errors() {
        diagnostics.report(error);
    }

    if diagnostics.count() == 0 {
        if cli.dump_ast {
            print!("{}", program.dump());
        }
        println!("[PASS] {file_label}");
        ExitCode::from(0)
    } else {
        for message in diagnostics.messages() {
            eprintln!("{message}");
        }
        let suffix = if diagnostics.count() == 1 { "" } else { "s" };
        eprintln!("[FAIL] {file_label} ({} error{suffix})", diagnostics.count());
        ExitCode::from(2)
    }
}
