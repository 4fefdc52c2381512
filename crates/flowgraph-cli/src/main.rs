//! The flowgraph CLI.
//!
//! Renders an input source file as either an AST view or a CFG view, written
//! to `<output-prefix><mode>`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use flowgraph_common::logger::TracingLogger;
use flowgraph_common::Logger;
use flowgraph_graph::Mode;

#[derive(Parser)]
#[command(name = "flowgraph", about = "Render a source file's AST or CFG as a graph description")]
struct Cli {
    /// Input source file to analyze.
    #[arg(short = 'i', required = true)]
    input: PathBuf,

    /// Output path prefix; the mode name (AST or EXECUTION) is appended.
    #[arg(short = 'o', default_value = "output/output")]
    output: String,

    /// Visualization mode: AST or EXECUTION (case-insensitive; anything
    /// other than AST selects the CFG view).
    #[arg(short = 'm', default_value = "AST")]
    mode: String,
}

fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    if let Err(message) = run(&cli) {
        eprintln!("error: {message}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let logger = TracingLogger;

    let source = fs::read_to_string(&cli.input)
        .map_err(|e| format!("failed to read '{}': {}", cli.input.display(), e))?;

    // Lexing errors are logged by `tokenize` itself, and are not fatal here:
    // the analysis continues on whatever prefix of the token stream was
    // produced before it halted.
    let (tokens, _lex_error) = flowgraph_lexer::tokenize(&source, &logger);

    let (arena, root, _parse_errors) = flowgraph_parser::parse(tokens, &logger);

    let mode = Mode::from_flag(&cli.mode);
    let graph = flowgraph_graph::emit(&arena, root, &source, mode);

    let output_path = format!("{}{}", cli.output, mode.suffix());
    if let Some(parent) = Path::new(&output_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("failed to create output directory '{}': {}", parent.display(), e))?;
        }
    }
    fs::write(&output_path, graph).map_err(|e| format!("failed to write '{output_path}': {e}"))?;

    logger.info(&format!("wrote {output_path}"));
    Ok(())
}
