use crate::JudgeStatus;

pub enum ComparisionResult {
    Same,
    Different,
    /// different and more than twice as long as the answer
    Overflowed,
}

impl From<ComparisionResult> for JudgeStatus {
    fn from(v: ComparisionResult) -> Self {
        match v {
            ComparisionResult::Same => JudgeStatus::Accepted,
            ComparisionResult::Different => JudgeStatus::WrongAnswer,
            ComparisionResult::Overflowed => JudgeStatus::OutputLimitExceeded,
        }
    }
}

/// Trailing whitespace is never significant, on either side.
pub fn trim_output(output: &str) -> &str {
    output.trim_end()
}

pub fn compare(answer: &str, output: &str) -> ComparisionResult {
    let answer = trim_output(answer);
    let output = trim_output(output);

    if answer == output {
        ComparisionResult::Same
    } else if output.chars().count() > answer.chars().count() * 2 {
        ComparisionResult::Overflowed
    } else {
        ComparisionResult::Different
    }
}

/// Verdict of a finished launch. The first rule that applies wins:
/// memory, exit code, then output.
pub fn classify(
    peak_memory: f64,
    memory_limit: f64,
    exit_code: i32,
    stdout: &str,
    answer: &str,
) -> JudgeStatus {
    if peak_memory > memory_limit {
        JudgeStatus::MemoryLimitExceeded
    } else if exit_code != 0 {
        JudgeStatus::RuntimeError
    } else {
        compare(answer, stdout).into()
    }
}
