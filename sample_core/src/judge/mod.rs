use std::fmt;

use log::{info, warn};

use crate::{
    compare::{classify, trim_output},
    compile::{Adapter, CompileState},
    container::Execution,
    error::Result,
    probe::{ChildrenUsage, ResourceAccountant, UsageProbe},
    problem::{Problem, Sample, HR},
    JudgeResult, JudgeStatus,
};

/// Progress reported while a session runs.
#[derive(Debug)]
pub enum JudgeEvent<'a> {
    Compiling,
    /// 1-based sample index
    Running(usize),
    Finished(usize, &'a JudgeResult),
}

/// Results of every sample, in sample order.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub results: Vec<JudgeResult>,
}

impl Verdict {
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(JudgeResult::passed)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", HR)?;
        for (i, res) in self.results.iter().enumerate() {
            write!(f, "\nSample {}: {}", i + 1, res.status)?;
        }
        if self.all_passed() {
            write!(f, "\n{}\nAll samples passed!", HR)
        } else {
            write!(f, "\nSome samples failed.")
        }
    }
}

/// Judges one source against one problem.
///
/// Samples run strictly one after another; the accountant's attribution relies on it.
pub struct Session {
    problem: Problem,
    adapter: Adapter,
    accountant: ResourceAccountant,
}

impl Session {
    pub fn new(problem: Problem, adapter: Adapter) -> Result<Self> {
        Self::with_probe(problem, adapter, Box::new(ChildrenUsage))
    }

    pub fn with_probe(problem: Problem, adapter: Adapter, probe: Box<dyn UsageProbe>) -> Result<Self> {
        Ok(Self {
            problem,
            adapter,
            accountant: ResourceAccountant::new(probe)?,
        })
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    pub fn judge(&mut self) -> Result<Verdict> {
        self.judge_with(|_| {})
    }

    pub fn judge_with(&mut self, mut observer: impl FnMut(JudgeEvent)) -> Result<Verdict> {
        let Self {
            problem,
            adapter,
            accountant,
        } = self;

        if *adapter.state() == CompileState::NotAttempted {
            observer(JudgeEvent::Compiling);
            adapter.ensure_compiled()?;
            // compiler time is nobody's
            accountant.resync()?;
        }

        let mut results = Vec::with_capacity(problem.samples.len());
        for (i, sample) in problem.samples.iter().enumerate() {
            observer(JudgeEvent::Running(i + 1));

            let res = match adapter.ensure_compiled()? {
                Some(compile_error) => compile_error,
                None => judge_sample(adapter, accountant, problem, sample)?,
            };
            info!("sample {}: {}", i + 1, res.status);

            observer(JudgeEvent::Finished(i + 1, &res));
            results.push(res);
        }

        Ok(Verdict { results })
    }
}

fn judge_sample(
    adapter: &Adapter,
    accountant: &mut ResourceAccountant,
    problem: &Problem,
    sample: &Sample,
) -> Result<JudgeResult> {
    let deadline = problem.deadline()?;

    let (code, stdout, stderr) = match adapter.run(&sample.input, deadline)? {
        Execution::Exited {
            code,
            stdout,
            stderr,
        } => (code, stdout, stderr),
        Execution::TimedOut => {
            warn!("killed after {:?}", deadline);
            accountant.resync()?;
            return Ok(JudgeResult::unmeasured(
                JudgeStatus::TimeLimitExceeded,
                String::new(),
            ));
        }
    };

    let usage = accountant.measure()?;
    let status = classify(
        usage.peak_memory,
        problem.memory_limit,
        code,
        &stdout,
        &sample.output,
    );
    let output = match status {
        JudgeStatus::MemoryLimitExceeded => String::new(),
        JudgeStatus::RuntimeError => stderr,
        _ => trim_output(&stdout).to_string(),
    };

    Ok(JudgeResult {
        status,
        time: Some(usage.elapsed_time),
        memory: Some(usage.peak_memory),
        output,
    })
}
