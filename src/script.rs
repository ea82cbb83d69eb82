//! Line-oriented command scripts driving a [`Sheet`].
//!
//! Each line is one command:
//!
//! ```text
//! set A1 10
//! set B1 =A1 * 2
//! get B1
//! print values
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. A failing line is
//! reported and the script carries on with the next one.

use cellgraph_core::{Position, Sheet};
use regex::Regex;
use std::io::{self, BufRead, Write};
use std::sync::OnceLock;

use crate::error::{CliError, Result};

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Set(Position, String),
    Clear(Position),
    Get(Position),
    Text(Position),
    Refs(Position),
    PrintValues,
    PrintTexts,
}

fn command_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?<name>\S+)(?:[ \t]+(?<arg>\S+))?(?:[ \t](?<rest>.*))?$").unwrap()
    })
}

/// Parse one script line. Returns `Ok(None)` for blank lines and comments.
pub fn parse_command(line: &str) -> std::result::Result<Option<Command>, String> {
    let line = line.trim_start();
    if line.trim_end().is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let caps = command_re()
        .captures(line)
        .ok_or_else(|| format!("Malformed command: {}", line.trim_end()))?;
    let name = &caps["name"];
    let arg = caps.name("arg").map(|m| m.as_str());
    let rest = caps.name("rest").map(|m| m.as_str());

    let cell = || -> std::result::Result<Position, String> {
        arg.ok_or_else(|| format!("{} requires a cell reference", name))?
            .parse::<Position>()
    };
    let no_rest = |command: Command| match rest.map(str::trim) {
        Some(extra) if !extra.is_empty() => Err(format!("Unexpected argument: {}", extra)),
        _ => Ok(Some(command)),
    };

    match name {
        "set" => Ok(Some(Command::Set(cell()?, rest.unwrap_or("").to_string()))),
        "clear" => no_rest(Command::Clear(cell()?)),
        "get" => no_rest(Command::Get(cell()?)),
        "text" => no_rest(Command::Text(cell()?)),
        "refs" => no_rest(Command::Refs(cell()?)),
        "print" => match arg {
            Some("values") => no_rest(Command::PrintValues),
            Some("texts") => no_rest(Command::PrintTexts),
            Some(other) => Err(format!("Unknown print target: {}", other)),
            None => Err("print requires 'values' or 'texts'".to_string()),
        },
        other => Err(format!("Unknown command: {}", other)),
    }
}

/// Runs commands against a sheet, counting the lines that failed.
pub struct Runner {
    sheet: Sheet,
    failures: usize,
}

impl Runner {
    pub fn new(sheet: Sheet) -> Self {
        Runner { sheet, failures: 0 }
    }

    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Execute a single line, writing any output to `out`.
    pub fn run_line(&mut self, line_no: usize, line: &str, out: &mut impl Write) -> Result<()> {
        let command = parse_command(line).map_err(|message| CliError::Parse {
            line: line_no,
            message,
        })?;
        let Some(command) = command else {
            return Ok(());
        };

        let sheet_err = |source| CliError::Sheet {
            line: line_no,
            source,
        };

        match command {
            Command::Set(pos, text) => self.sheet.set_cell(pos, &text).map_err(sheet_err)?,
            Command::Clear(pos) => self.sheet.clear_cell(pos).map_err(sheet_err)?,
            Command::Get(pos) => {
                let value = self.sheet.value(pos).map_err(sheet_err)?;
                writeln!(out, "{}", value)?;
            }
            Command::Text(pos) => {
                let text = self.sheet.text(pos).map_err(sheet_err)?;
                writeln!(out, "{}", text)?;
            }
            Command::Refs(pos) => {
                let refs = self.sheet.referenced_cells(pos).map_err(sheet_err)?;
                let names: Vec<String> = refs.iter().map(Position::to_string).collect();
                writeln!(out, "{}", names.join(" "))?;
            }
            Command::PrintValues => self.sheet.print_values(out)?,
            Command::PrintTexts => self.sheet.print_texts(out)?,
        }
        Ok(())
    }

    /// Execute every line of `input`. Command failures go to `err`; only I/O
    /// failures on the streams themselves abort the run.
    pub fn run_script(
        &mut self,
        input: impl BufRead,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> io::Result<()> {
        for (idx, line) in input.lines().enumerate() {
            let line = line?;
            self.run_lines_entry(idx + 1, line.trim_end_matches('\r'), out, err)?;
        }
        out.flush()
    }

    /// Execute commands given one per item, numbered from 1.
    pub fn run_commands(
        &mut self,
        commands: &[String],
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> io::Result<()> {
        for (idx, line) in commands.iter().enumerate() {
            self.run_lines_entry(idx + 1, line, out, err)?;
        }
        out.flush()
    }

    fn run_lines_entry(
        &mut self,
        line_no: usize,
        line: &str,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> io::Result<()> {
        match self.run_line(line_no, line, out) {
            Ok(()) => Ok(()),
            Err(CliError::Io(e)) => Err(e),
            Err(e) => {
                self.failures += 1;
                writeln!(err, "{}", e)
            }
        }
    }
}
