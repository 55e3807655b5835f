use std::{
    fs::read_to_string,
    io,
    path::{Path, PathBuf},
    process::ExitCode,
    rc::Rc,
};

use calyx::{
    ast::statements::BlockStmt,
    compiler::compiler::compile,
    errors::errors::Error,
    format_error,
    lexer::{lexer::tokenize, tokens::Token},
    logging,
    parser::parser::parse,
    type_checker::type_checker::type_check,
    vm::{bytecode::assemble, vm::Vm},
};
use clap::{Parser, Subcommand};
use tracing::debug;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Continue past lexical errors instead of stopping after tokenizing.
    #[arg(short, long, global = true)]
    keep_going: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print the token stream of a source file
    Tokens { file: PathBuf },
    /// Print the syntax tree of a source file
    Parse { file: PathBuf },
    /// Type check a source file
    Check { file: PathBuf },
    /// Compile a source file to bytecode and execute it
    Run { file: PathBuf },
    /// Assemble a textual bytecode file and execute it
    Exec { file: PathBuf },
}

/// A source file loaded for one of the subcommands.
struct Source {
    name: String,
    text: String,
}

impl Source {
    fn load(path: &Path) -> Result<Source, String> {
        let text = read_to_string(path)
            .map_err(|err| format!("failed to read {}: {}", path.display(), err))?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Source { name, text })
    }

    fn report(&self, error: &Error) -> String {
        format_error(error, &self.text)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = logging::init("warn") {
        eprintln!("failed to initialise logging: {}", err);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprint!("{}", message);
            if !message.ends_with('\n') {
                eprintln!();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    match &cli.command {
        Command::Tokens { file } => {
            let source = Source::load(file)?;
            let tokens = lex(&source, cli.keep_going)?;

            for token in tokens {
                println!("{}", token);
            }
        }
        Command::Parse { file } => {
            let source = Source::load(file)?;
            let block = parse_source(&source, cli.keep_going)?;

            for statement in block.iter() {
                println!("{}", statement);
            }
        }
        Command::Check { file } => {
            let source = Source::load(file)?;
            check_source(&source, cli.keep_going)?;

            println!("{}: ok", source.name);
        }
        Command::Run { file } => {
            let source = Source::load(file)?;
            let block = check_source(&source, cli.keep_going)?;
            let code = compile(&block).map_err(|err| source.report(&err))?;

            // Runtime positions are bytecode offsets, which do not map onto the text.
            execute(code).map_err(|err| err.to_string())?;
        }
        Command::Exec { file } => {
            let source = Source::load(file)?;
            let code = assemble(&source.text).map_err(|err| source.report(&err))?;

            execute(code).map_err(|err| err.to_string())?;
        }
    }

    Ok(())
}

fn lex(source: &Source, keep_going: bool) -> Result<Vec<Token>, String> {
    let (tokens, errors) = tokenize(source.text.clone(), Some(source.name.clone()));

    if errors.is_empty() {
        return Ok(tokens);
    }

    let report: String = errors.iter().map(|err| source.report(err)).collect();
    if !keep_going {
        return Err(report);
    }

    eprint!("{}", report);
    debug!(errors = errors.len(), "continuing past lexical errors");
    Ok(tokens)
}

fn parse_source(source: &Source, keep_going: bool) -> Result<BlockStmt, String> {
    let tokens = lex(source, keep_going)?;
    let (_, result) = parse(tokens, Rc::new(source.name.clone()));

    result.map_err(|err| source.report(&err))
}

fn check_source(source: &Source, keep_going: bool) -> Result<BlockStmt, String> {
    let block = parse_source(source, keep_going)?;

    match type_check(&block) {
        (_, Some(err)) => Err(source.report(&err)),
        (_, None) => Ok(block),
    }
}

fn execute(code: Vec<u8>) -> Result<(), Error> {
    let stdout = io::stdout();
    let mut vm = Vm::new(code, stdout.lock());
    vm.run()?;

    vm.finish().map(|_| ())
}
