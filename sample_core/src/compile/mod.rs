use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
    time::Duration,
};

use log::{info, warn};

use crate::{
    config::JudgeConfig,
    container::Execution,
    error::{Error, Result},
    JudgeResult, JudgeStatus,
};

pub mod gpp;
pub mod python;

use self::{gpp::CompilerGPP, python::CompilerPython};

pub trait Compiler {
    fn compile(&self) -> Result<CompileResult>;
    fn run(&self, input: &str, deadline: Duration) -> Result<Execution>;
}

pub trait CompilerDescriptor {
    fn support_sufix() -> Vec<&'static str>;
    fn check_environment(program: &str) -> CompilerEnvironmentStatus;
}

#[derive(Debug)]
pub enum CompilerEnvironmentStatus {
    OK { version: String, path: PathBuf },
    Missing,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CompileResult {
    OK,
    /// compiler diagnostics
    CompileError(String),
}

impl From<CompileResult> for Option<JudgeResult> {
    fn from(v: CompileResult) -> Self {
        match v {
            CompileResult::OK => None,
            CompileResult::CompileError(msg) => {
                Some(JudgeResult::unmeasured(JudgeStatus::CompileError, msg))
            }
        }
    }
}

/// Compilation happens at most once; a failure is remembered and replayed.
#[derive(Debug, Clone, PartialEq)]
pub enum CompileState {
    NotAttempted,
    Succeeded,
    Failed(JudgeResult),
}

enum Toolchain {
    GPP(CompilerGPP),
    Python(CompilerPython),
}

/// The toolchain picked by the source's extension, plus its compile state.
pub struct Adapter {
    toolchain: Toolchain,
    state: CompileState,
}

impl Adapter {
    pub fn for_source(source: &Path, config: &JudgeConfig) -> Result<Self> {
        let extension = source
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();

        let toolchain = match extension {
            _ if CompilerGPP::support_sufix().contains(&extension) => {
                Toolchain::GPP(CompilerGPP::new(source, config)?)
            }
            _ if CompilerPython::support_sufix().contains(&extension) => {
                Toolchain::Python(CompilerPython::new(source, config)?)
            }
            _ => {
                return Err(Error::Argument(format!(
                    "unsupported source `{}`",
                    source.display()
                )))
            }
        };

        Ok(Self {
            toolchain,
            state: CompileState::NotAttempted,
        })
    }

    fn compiler(&self) -> &dyn Compiler {
        match &self.toolchain {
            Toolchain::GPP(compiler) => compiler,
            Toolchain::Python(compiler) => compiler,
        }
    }

    pub fn state(&self) -> &CompileState {
        &self.state
    }

    /// `Some` carries the compile error every sample should report.
    pub fn ensure_compiled(&mut self) -> Result<Option<JudgeResult>> {
        match &self.state {
            CompileState::Succeeded => return Ok(None),
            CompileState::Failed(res) => return Ok(Some(res.clone())),
            CompileState::NotAttempted => {}
        }

        info!("compiling");
        let res: Option<JudgeResult> = self.compiler().compile()?.into();
        self.state = match &res {
            None => CompileState::Succeeded,
            Some(res) => {
                warn!("compile error:\n{}", res.output);
                CompileState::Failed(res.clone())
            }
        };

        Ok(res)
    }

    pub fn run(&self, input: &str, deadline: Duration) -> Result<Execution> {
        if self.state != CompileState::Succeeded {
            return Err(Error::Environment("source is not compiled".into()));
        }
        self.compiler().run(input, deadline)
    }
}

/// Locate `program` on PATH and ask it for its version.
pub(crate) fn probe_environment(program: &str) -> CompilerEnvironmentStatus {
    let path = match which::which(program) {
        Ok(path) => path,
        Err(_) => return CompilerEnvironmentStatus::Missing,
    };

    let version = Command::new(&path)
        .arg("--version")
        .stdin(Stdio::null())
        .output()
        .ok()
        .and_then(|output| {
            // python 2 prints its version to stderr
            let text = if output.stdout.is_empty() {
                output.stderr
            } else {
                output.stdout
            };
            let text = String::from_utf8_lossy(&text).to_string();
            let version = text
                .lines()
                .next()
                .and_then(|line| line.split(' ').last())
                .map(|v| v.to_string());
            version
        })
        .unwrap_or_else(|| "unknown".into());

    CompilerEnvironmentStatus::OK { version, path }
}
