use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
    time::Duration,
};

use log::debug;

use super::{probe_environment, CompileResult, Compiler, CompilerDescriptor, CompilerEnvironmentStatus};
use crate::{
    config::JudgeConfig,
    container::{Cell, Execution},
    error::{Error, Result},
};

/// Compiles the source in memory, which reports syntax errors without writing bytecode.
const SYNTAX_CHECK: &str =
    "import sys; compile(open(sys.argv[1], 'rb').read(), sys.argv[1], 'exec')";

pub struct CompilerPython {
    source: PathBuf,
    compiler_path: PathBuf,
}

impl CompilerPython {
    pub fn new(source: &Path, config: &JudgeConfig) -> Result<Self> {
        match Self::check_environment(&config.python) {
            CompilerEnvironmentStatus::OK { version, path } => {
                debug!("{} {} at {}", config.python, version, path.display());
                Ok(Self {
                    source: source.to_path_buf(),
                    compiler_path: path,
                })
            }
            CompilerEnvironmentStatus::Missing => {
                Err(Error::Environment(format!("missing {}", config.python)))
            }
        }
    }
}

impl CompilerDescriptor for CompilerPython {
    fn support_sufix() -> Vec<&'static str> {
        vec!["py"]
    }

    fn check_environment(program: &str) -> CompilerEnvironmentStatus {
        probe_environment(program)
    }
}

impl Compiler for CompilerPython {
    fn compile(&self) -> Result<CompileResult> {
        let output = Command::new(&self.compiler_path)
            .arg("-c")
            .arg(SYNTAX_CHECK)
            .arg(&self.source)
            .stdin(Stdio::null())
            .output()?;

        if output.status.success() {
            Ok(CompileResult::OK)
        } else {
            Ok(CompileResult::CompileError(
                String::from_utf8_lossy(&output.stderr).to_string(),
            ))
        }
    }

    fn run(&self, input: &str, deadline: Duration) -> Result<Execution> {
        let interpretor = self.compiler_path.to_string_lossy();
        Cell::new_interpretive(&interpretor, vec!["-W".into(), "ignore".into()], &self.source)
            .run(input, deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn python3() -> Option<JudgeConfig> {
        which::which("python3").ok().map(|_| JudgeConfig {
            python: "python3".into(),
            ..JudgeConfig::default()
        })
    }

    #[test]
    fn syntax_error() -> Result<()> {
        let config = match python3() {
            Some(config) => config,
            None => return Ok(()),
        };
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("1000.py");
        std::fs::write(&source, "print(1 +\n")?;

        let compiler = CompilerPython::new(&source, &config)?;
        assert!(matches!(compiler.compile()?, CompileResult::CompileError(msg) if msg.contains("SyntaxError")));
        Ok(())
    }

    #[test]
    fn run_reads_stdin() -> Result<()> {
        let config = match python3() {
            Some(config) => config,
            None => return Ok(()),
        };
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("1000.py");
        std::fs::write(&source, "a, b = map(int, input().split())\nprint(a + b)\n")?;

        let compiler = CompilerPython::new(&source, &config)?;
        assert_eq!(compiler.compile()?, CompileResult::OK);
        let res = compiler.run("1 2\n", Duration::from_secs(5))?;
        assert_eq!(
            res,
            Execution::Exited {
                code: 0,
                stdout: "3\n".into(),
                stderr: "".into(),
            }
        );
        Ok(())
    }
}
