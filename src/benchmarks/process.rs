// Process invoker - runs the external benchmark target and reads its timing

use crate::benchmarks::TrialInvocation;
use crate::errors::{BenchError, BenchResult};
use std::process::{Command, Stdio};

/// Anything that can produce an elapsed time for one trial invocation.
///
/// The orchestrator only talks to this trait, so tests can swap in a
/// deterministic source instead of spawning processes.
pub trait TimingSource {
    fn measure(&mut self, invocation: &TrialInvocation) -> BenchResult<f64>;
}

/// The external program plus any fixed leading arguments
/// (e.g. `go run ../editor/editor.go`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ProgramCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }

    pub fn from_argv(argv: Vec<String>) -> BenchResult<Self> {
        let mut parts = argv.into_iter();
        match parts.next() {
            Some(program) if !program.trim().is_empty() => Ok(Self::new(program, parts.collect())),
            _ => Err(BenchError::invalid_configuration("program must name an executable")),
        }
    }

    /// Full argument vector for one invocation: fixed args, then
    /// `<size> [<mode> <threads>]`.
    pub fn argv_for(&self, invocation: &TrialInvocation) -> Vec<String> {
        let mut argv = self.args.clone();
        argv.extend(invocation.arguments());
        argv
    }

    pub fn display_for(&self, invocation: &TrialInvocation) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.argv_for(invocation));
        parts.join(" ")
    }
}

impl Default for ProgramCommand {
    fn default() -> Self {
        Self::new("go", vec!["run".to_string(), "../editor/editor.go".to_string()])
    }
}

/// Spawns the external program once per measurement and blocks until it exits.
#[derive(Debug, Clone)]
pub struct ProcessTimingSource {
    command: ProgramCommand,
}

impl ProcessTimingSource {
    pub fn new(command: ProgramCommand) -> Self {
        Self { command }
    }
}

impl TimingSource for ProcessTimingSource {
    fn measure(&mut self, invocation: &TrialInvocation) -> BenchResult<f64> {
        let display = self.command.display_for(invocation);
        let output = Command::new(&self.command.program)
            .args(self.command.argv_for(invocation))
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                BenchError::invocation_failed(format!(
                    "Failed to run '{}': {}",
                    self.command.program, e
                ))
                .with_command(display.clone())
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            let combined =
                if stderr.trim().is_empty() { stdout } else { format!("{}\n{}", stdout, stderr) };
            let status = match output.status.code() {
                Some(code) => format!("status {}", code),
                None => "a signal".to_string(),
            };
            let message = format!("Benchmark target exited with {}", status);
            return Err(BenchError::invocation_failed(message)
                .with_command(display)
                .with_output(combined));
        }

        parse_elapsed(&stdout).map_err(|e| e.with_command(display))
    }
}

/// Parse the target's stdout: one decimal seconds value and a trailing newline.
pub fn parse_elapsed(output: &str) -> BenchResult<f64> {
    let line = output.strip_suffix('\n').unwrap_or(output);
    let line = line.strip_suffix('\r').unwrap_or(line).trim();

    if line.is_empty() {
        return Err(BenchError::unparsable_output("Benchmark target printed no timing value"));
    }

    let value = line.parse::<f64>().map_err(|e| {
        BenchError::unparsable_output(format!("Timing value '{}' is not a number: {}", line, e))
            .with_output(output)
    })?;

    if !value.is_finite() || value < 0.0 {
        return Err(BenchError::unparsable_output(format!(
            "Timing value '{}' is not a non-negative finite number of seconds",
            line
        )));
    }

    Ok(value)
}
