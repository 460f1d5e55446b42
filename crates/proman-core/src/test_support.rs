use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::anyhow;

use crate::command_runner::{CommandOutput, CommandRunner};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub detached: bool,
}

#[derive(Default)]
pub struct RecordingRunner {
    outputs: Mutex<VecDeque<anyhow::Result<CommandOutput>>>,
    spawn_results: Mutex<VecDeque<anyhow::Result<()>>>,
    calls: Mutex<Vec<Call>>,
}

impl RecordingRunner {
    pub fn new(
        outputs: Vec<anyhow::Result<CommandOutput>>,
        spawn_results: Vec<anyhow::Result<()>>,
    ) -> Self {
        Self {
            outputs: Mutex::new(outputs.into()),
            spawn_results: Mutex::new(spawn_results.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn from_outputs(outputs: Vec<anyhow::Result<CommandOutput>>) -> Self {
        Self::new(outputs, Vec::new())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, program: &str, args: &[&str], cwd: Option<&Path>, detached: bool) {
        self.calls.lock().expect("calls lock").push(Call {
            program: program.to_string(),
            args: args.iter().map(|value| (*value).to_string()).collect(),
            cwd: cwd.map(|value| value.to_path_buf()),
            detached,
        });
    }
}

impl CommandRunner for RecordingRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> anyhow::Result<CommandOutput> {
        self.record(program, args, cwd, false);

        self.outputs
            .lock()
            .expect("outputs lock")
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("missing output")))
    }

    fn spawn_detached(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> anyhow::Result<()> {
        self.record(program, args, cwd, true);

        self.spawn_results
            .lock()
            .expect("spawn lock")
            .pop_front()
            .unwrap_or(Ok(()))
    }
}

pub fn output(stdout: &str, stderr: &str, status_code: i32) -> anyhow::Result<CommandOutput> {
    Ok(CommandOutput {
        status_code,
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    })
}
