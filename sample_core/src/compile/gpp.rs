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

pub struct CompilerGPP {
    source: PathBuf,
    exec_path: PathBuf,
    standard: String,
    compiler_path: PathBuf,
}

impl CompilerDescriptor for CompilerGPP {
    fn support_sufix() -> Vec<&'static str> {
        vec!["cpp", "cc", "cxx"]
    }

    fn check_environment(program: &str) -> CompilerEnvironmentStatus {
        probe_environment(program)
    }
}

impl Compiler for CompilerGPP {
    fn compile(&self) -> Result<CompileResult> {
        let mut command = Command::new(&self.compiler_path);
        command
            .arg(&self.source)
            .args(["-O2", "-Wall", "-lm", "-static"])
            .arg(format!("-std={}", self.standard))
            .arg("-o")
            .arg(&self.exec_path)
            .stdin(Stdio::null());
        debug!("{:?}", command);

        let output = command.output()?;
        if output.status.success() {
            Ok(CompileResult::OK)
        } else {
            Ok(CompileResult::CompileError(
                String::from_utf8_lossy(&output.stderr).to_string(),
            ))
        }
    }

    fn run(&self, input: &str, deadline: Duration) -> Result<Execution> {
        Cell::new_executable(&self.exec_path).run(input, deadline)
    }
}

impl CompilerGPP {
    pub fn new(source: &Path, config: &JudgeConfig) -> Result<Self> {
        match Self::check_environment(&config.cxx) {
            CompilerEnvironmentStatus::OK { version, path } => {
                debug!("{} {} at {}", config.cxx, version, path.display());
                Ok(Self {
                    source: source.to_path_buf(),
                    exec_path: exec_path_of(source),
                    standard: config.cxx_standard.clone(),
                    compiler_path: path,
                })
            }
            CompilerEnvironmentStatus::Missing => {
                Err(Error::Environment(format!("missing {}", config.cxx)))
            }
        }
    }

    pub fn exec_path(&self) -> &Path {
        &self.exec_path
    }
}

/// `dir/1000.cpp` builds `dir/1000.out`. A bare name gets `./` so it is never looked up on PATH.
fn exec_path_of(source: &Path) -> PathBuf {
    let exec = source.with_extension("out");
    match exec.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => exec,
        _ => Path::new(".").join(exec),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpp_environment() {
        let result = CompilerGPP::check_environment("g++");
        match result {
            CompilerEnvironmentStatus::OK { version: _, path: _ } => {
                assert!(matches!(which::which("g++"), Ok(_)));
            }
            CompilerEnvironmentStatus::Missing => {
                assert!(matches!(which::which("g++"), Err(_)));
            }
        }
    }

    #[test]
    fn artifact_next_to_source() {
        assert_eq!(exec_path_of(Path::new("1000.cpp")), PathBuf::from("./1000.out"));
        assert_eq!(
            exec_path_of(Path::new("solutions/1000.cpp")),
            PathBuf::from("solutions/1000.out")
        );
        assert_eq!(exec_path_of(Path::new("/tmp/1000.cc")), PathBuf::from("/tmp/1000.out"));
    }

    #[test]
    fn gpp_compile_error() -> Result<()> {
        if which::which("g++").is_err() {
            return Ok(());
        }
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("1000.cpp");
        std::fs::write(&source, "#include <iostream>\nint main(){std::cout<<\"hi\"<<std::endl;}asd")?;

        let compiler = CompilerGPP::new(&source, &JudgeConfig::default())?;
        assert!(matches!(compiler.compile()?, CompileResult::CompileError(msg) if !msg.is_empty()));
        assert!(!compiler.exec_path().exists());
        Ok(())
    }

    #[test]
    fn gpp_compile_ok() -> Result<()> {
        if which::which("g++").is_err() {
            return Ok(());
        }
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("1000.cpp");
        std::fs::write(&source, "#include <iostream>\nint main(){std::cout<<\"hi\"<<std::endl;}")?;

        let compiler = CompilerGPP::new(&source, &JudgeConfig::default())?;
        if compiler.compile()? != CompileResult::OK {
            // no static libstdc++ or no c++20 on this machine
            return Ok(());
        }
        let res = compiler.run("", Duration::from_secs(5))?;
        assert!(matches!(res, Execution::Exited { code: 0, ref stdout, .. } if stdout == "hi\n"));
        Ok(())
    }
}
