use std::{fmt, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    extract::PartialProblem,
    memory::format_memory,
};

pub const HR: &str = "====================";

/// One input paired with the output it is expected to produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct Sample {
    pub input: String,
    pub output: String,
}

impl From<(String, String)> for Sample {
    fn from((input, output): (String, String)) -> Self {
        Self { input, output }
    }
}

impl From<Sample> for (String, String) {
    fn from(v: Sample) -> Self {
        (v.input, v.output)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub title: String,
    pub id: u32,
    /// seconds
    #[serde(rename = "tl")]
    pub time_limit: f64,
    /// bytes
    #[serde(rename = "ml")]
    pub memory_limit: f64,
    pub samples: Vec<Sample>,
}

impl Problem {
    pub fn from_string(content: &str) -> Result<Self> {
        let v: Self = serde_json::from_str(content)?;
        v.check_valid()?;
        Ok(v)
    }

    pub fn to_record(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Limits must be strictly positive and at least one sample must exist.
    pub fn check_valid(&self) -> Result<()> {
        let valid = !self.title.is_empty()
            && self.id > 0
            && self.time_limit > 0.0
            && self.memory_limit > 0.0
            && !self.samples.is_empty();

        if valid {
            self.deadline().map(|_| ())
        } else {
            Err(self.invalid())
        }
    }

    /// How long a single launch may run.
    pub fn deadline(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.time_limit).map_err(|_| self.invalid())
    }

    fn invalid(&self) -> Error {
        Error::Validation(PartialProblem {
            title: Some(self.title.clone()),
            time_limit: Some(self.time_limit),
            memory_limit: Some(self.memory_limit),
            samples: self.samples.clone(),
        })
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {}", self.id, self.title)?;
        write!(
            f,
            "TL: {} / ML: {}",
            self.time_limit,
            format_memory(self.memory_limit)
        )?;

        for (i, sample) in self.samples.iter().enumerate() {
            write!(
                f,
                "\n{}\nSample {}\nInput:\n{}\nOutput:\n{}",
                HR,
                i + 1,
                sample.input,
                sample.output
            )?;
        }

        Ok(())
    }
}

/// `solutions/1000.cpp` is problem 1000: the file name up to its first dot.
pub fn problem_id_of(path: &Path) -> Result<u32> {
    let stem = path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split('.').next())
        .unwrap_or_default();

    match stem.parse::<u32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(Error::Argument(format!(
            "`{}` is not named after a problem id",
            path.display()
        ))),
    }
}
