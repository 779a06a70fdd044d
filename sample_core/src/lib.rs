use std::fmt;

use crate::memory::format_memory;

pub mod compare;
pub mod compile;
pub mod config;
pub mod container;
pub mod error;
pub mod extract;
pub mod judge;
pub mod memory;
pub mod probe;
pub mod problem;
pub mod remote;
pub mod store;

/// Outcome of one sample. `time` and `memory` are `None` when the launch was not measured.
#[derive(Debug, Clone, PartialEq)]
pub struct JudgeResult {
    pub status: JudgeStatus,
    /// seconds
    pub time: Option<f64>,
    /// peak resident set in the platform's `ru_maxrss` unit (KiB on Linux), not bytes
    pub memory: Option<f64>,
    /// stdout, or diagnostics for compile and runtime errors
    pub output: String,
}

impl JudgeResult {
    pub fn unmeasured(status: JudgeStatus, output: String) -> Self {
        Self {
            status,
            time: None,
            memory: None,
            output,
        }
    }

    pub fn passed(&self) -> bool {
        self.status == JudgeStatus::Accepted
    }
}

impl fmt::Display for JudgeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let time = match self.time {
            Some(time) => format!("{}s", time),
            None => "-".into(),
        };
        let memory = match self.memory {
            Some(memory) => format_memory(memory),
            None => "-".into(),
        };
        write!(f, "{}\n{} / {} / {}", self.output, self.status, time, memory)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JudgeStatus {
    Accepted,
    WrongAnswer,
    CompileError,
    RuntimeError,
    TimeLimitExceeded,
    MemoryLimitExceeded,
    OutputLimitExceeded,
}

impl JudgeStatus {
    pub fn name(&self) -> &'static str {
        match self {
            JudgeStatus::Accepted => "Accepted",
            JudgeStatus::WrongAnswer => "Wrong Answer",
            JudgeStatus::CompileError => "Compile Error",
            JudgeStatus::RuntimeError => "Runtime Error",
            JudgeStatus::TimeLimitExceeded => "Time Limit Exceeded",
            JudgeStatus::MemoryLimitExceeded => "Memory Limit Exceeded",
            JudgeStatus::OutputLimitExceeded => "Output Limit Exceeded",
        }
    }
}

impl fmt::Display for JudgeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
