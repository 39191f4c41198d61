// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Command-line driver: compile a pattern and write the generated matcher

use std::{
    fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    process::ExitCode,
    time::Instant,
};

use clap::{Parser, ValueEnum};
use minidfa::{CodegenOptions, Compilation, Compiler, Error, Options, Strategy};

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum StrategyChoice {
    #[default]
    Hopcroft,
    Moore,
}

impl From<StrategyChoice> for Strategy {
    fn from(choice: StrategyChoice) -> Self {
        match choice {
            StrategyChoice::Hopcroft => Strategy::Hopcroft,
            StrategyChoice::Moore => Strategy::Moore,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "minidfa", bin_name = "minidfa", version)]
#[command(about = "Compile a regular expression to a minimal DFA and generate C++ matcher code")]
#[command(after_help = r#"EXAMPLES:
  minidfa '(a|b)*abb'
  minidfa 'a(b|c)*' -o matcher.cpp --strategy moore
  minidfa --iterator 'const char*' -q 'ab*'"#)]
struct Cli {
    /// Regular expression (read from standard input if omitted)
    #[arg(value_name = "PATTERN")]
    pattern: Option<String>,

    /// File for the generated code
    #[arg(short, long, value_name = "PATH", default_value = "out.cpp")]
    output: PathBuf,

    /// Minimization algorithm
    #[arg(long, value_enum, default_value_t = StrategyChoice::default())]
    strategy: StrategyChoice,

    /// Iterator type in the generated signatures
    #[arg(long, value_name = "TYPE", default_value = "std::string::const_iterator")]
    iterator: String,

    /// Don't print the automata
    #[arg(short, long)]
    quiet: bool,
}

// Prompt until a pattern compiles. None at end of input.
fn prompt(compiler: &Compiler) -> io::Result<Option<(Compilation, Instant)>> {
    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("Regular Expression: ");
        io::stdout().flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            return Ok(None);
        }
        let start = Instant::now();
        match compiler.compile(line.trim()) {
            Ok(compilation) => return Ok(Some((compilation, start))),
            Err(e) => eprintln!("error: {e}"),
        }
    }
}

fn write_output(path: &Path, compilation: &Compilation) -> Result<(), Error> {
    fs::write(path, compilation.generate().to_string()).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let compiler = Compiler::with_options(Options {
        strategy: cli.strategy.into(),
        codegen: CodegenOptions::new().iterator_type(&cli.iterator),
    });

    let (compilation, start) = match &cli.pattern {
        Some(pattern) => {
            let start = Instant::now();
            match compiler.compile(pattern) {
                Ok(compilation) => (compilation, start),
                Err(e) => {
                    eprintln!("error: {e}");
                    return ExitCode::FAILURE;
                }
            }
        }
        None => match prompt(&compiler) {
            Ok(Some(result)) => result,
            Ok(None) => return ExitCode::FAILURE,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        },
    };

    if !cli.quiet {
        let alphabet = compilation.alphabet();
        print!("{}", compilation.dfa().dump(alphabet));
        println!();
        print!("{}", compilation.minimal_dfa().dump(alphabet));
    }

    if let Err(e) = write_output(&cli.output, &compilation) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }
    log::info!("wrote {}", cli.output.display());

    println!("\nExecution time: {}", start.elapsed().as_micros());
    ExitCode::SUCCESS
}
