// File: src/errors.rs
//
// Error handling and reporting for the benchmark harness.
// Every failure in the pipeline is fatal, so errors carry enough context
// (the command line, captured output, a hint) to diagnose the environment
// from a single pretty-printed message.

use colored::Colorize;
use std::fmt;
use std::path::Path;

/// Types of errors that can abort a benchmark run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    InvalidConfiguration,
    InvocationFailed,
    UnparsableOutput,
    DegenerateMeasurement,
    Io,
    Render,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::InvalidArgument => write!(f, "Invalid Argument"),
            ErrorKind::InvalidConfiguration => write!(f, "Invalid Configuration"),
            ErrorKind::InvocationFailed => write!(f, "Invocation Failed"),
            ErrorKind::UnparsableOutput => write!(f, "Unparsable Output"),
            ErrorKind::DegenerateMeasurement => write!(f, "Degenerate Measurement"),
            ErrorKind::Io => write!(f, "I/O Error"),
            ErrorKind::Render => write!(f, "Render Error"),
        }
    }
}

/// A structured error with optional process context
#[derive(Debug, Clone)]
pub struct BenchError {
    pub kind: ErrorKind,
    pub message: String,
    pub command: Option<String>,
    pub output: Option<String>,
    pub help: Option<String>,
}

pub type BenchResult<T> = Result<T, BenchError>;

impl BenchError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into(), command: None, output: None, help: None }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Unrecognized command-line argument
    pub fn invalid_argument(arg: &str) -> Self {
        Self::new(ErrorKind::InvalidArgument, format!("Invalid arg '{}'", arg))
    }

    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidConfiguration, message)
    }

    pub fn invocation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvocationFailed, message)
    }

    pub fn unparsable_output(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnparsableOutput, message)
    }

    pub fn degenerate_measurement(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DegenerateMeasurement, message).with_help(
            "the benchmark target reported zero elapsed time; \
             check that it actually ran the workload",
        )
    }

    pub fn io(context: impl Into<String>, err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, format!("{}: {}", context.into(), err))
    }

    pub fn render(path: &Path, err: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Render, format!("Failed to write '{}': {}", path.display(), err))
    }
}

impl fmt::Display for BenchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind_str = format!("{}", self.kind);
        writeln!(f, "{}: {}", kind_str.red().bold(), self.message.bold())?;

        if let Some(ref command) = self.command {
            writeln!(f, "  {} {}", "-->".bright_blue(), command)?;
        }

        if let Some(ref output) = self.output {
            let trimmed = output.trim_end();
            if !trimmed.is_empty() {
                writeln!(f, "   {}", "|".bright_blue())?;
                for line in trimmed.lines() {
                    writeln!(f, "   {} {}", "|".bright_blue(), line)?;
                }
                writeln!(f, "   {}", "|".bright_blue())?;
            }
        }

        if let Some(ref help) = self.help {
            writeln!(
                f,
                "   {} {}",
                "=".bright_yellow(),
                format!("help: {}", help).bright_yellow()
            )?;
        }

        Ok(())
    }
}

impl std::error::Error for BenchError {}
