//! Command-line front end: argument parsing, interactive prompt and script runner

use std::{
    io::{BufRead, Write},
    path::PathBuf,
};

use clap::Parser;
use rustyline::{Editor, error::ReadlineError, history::DefaultHistory};
use tracing::info;

use crate::{
    error::{Error, Result},
    sql::engine::{Engine, Session},
};

pub const BANNER: &str = "Welcome to Mini SQL Engine (type 'exit' to quit)";

#[derive(Debug, Parser)]
#[command(name = "minidb", version, about = "A minimal in-memory SQL store")]
pub struct Cli {
    /// Run the statements in this file, one per line, instead of prompting
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Prompt shown before each statement
    #[arg(long, env = "MINIDB_PROMPT", default_value = "sql> ")]
    pub prompt: String,
}

/// What the loop should do with one input line
enum Line<'a> {
    Exit,
    Skip,
    Statement(&'a str),
}

fn classify_line(line: &str) -> Line<'_> {
    let trimmed = line.trim();
    if trimmed.eq_ignore_ascii_case("exit") {
        Line::Exit
    } else if trimmed.is_empty() {
        Line::Skip
    } else {
        Line::Statement(line)
    }
}

/// Runs statements read line by line, writing each result to `out`.
///
/// Stops at end of input or at an `exit` line. Returns the number of
/// statements executed.
pub fn run_script<E, R, W>(session: &mut Session<E>, input: R, out: &mut W) -> Result<usize>
where
    E: Engine + 'static,
    R: BufRead,
    W: Write,
{
    let mut count = 0;
    for line in input.lines() {
        let line = line?;
        match classify_line(&line) {
            Line::Exit => break,
            Line::Skip => continue,
            Line::Statement(sql) => {
                writeln!(out, "{}", session.run(sql))?;
                count += 1;
            }
        }
    }
    Ok(count)
}

/// Interactive prompt with line editing and in-session history
pub fn repl<E: Engine + 'static>(session: &mut Session<E>, prompt: &str) -> Result<()> {
    let mut editor =
        Editor::<(), DefaultHistory>::new().map_err(|e| Error::Internal(e.to_string()))?;
    println!("{}", BANNER);

    loop {
        match editor.readline(prompt) {
            Ok(line) => match classify_line(&line) {
                Line::Exit => break,
                Line::Skip => continue,
                Line::Statement(sql) => {
                    editor
                        .add_history_entry(sql)
                        .map_err(|e| Error::Internal(e.to_string()))?;
                    println!("{}", session.run(sql));
                }
            },
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => return Err(Error::Internal(err.to_string())),
        }
    }
    info!("prompt closed");
    Ok(())
}
