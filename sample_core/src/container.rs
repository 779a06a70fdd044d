use std::{
    io::{self, Read, Write},
    os::unix::process::{CommandExt, ExitStatusExt},
    path::Path,
    process::{Command, ExitStatus, Stdio},
    thread::{self, JoinHandle},
    time::Duration,
};

use log::debug;
use wait_timeout::ChildExt;

use crate::error::Result;

/// How a single launch of the candidate ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Execution {
    Exited {
        code: i32,
        stdout: String,
        stderr: String,
    },
    /// Killed at the deadline; whatever it printed is discarded.
    TimedOut,
}

/// A command line which is launched once per sample.
#[derive(Debug, Clone)]
pub struct Cell {
    program: String,
    args: Vec<String>,
}

impl Cell {
    pub fn new_executable(path: &Path) -> Self {
        Self {
            program: path.to_string_lossy().to_string(),
            args: Vec::new(),
        }
    }

    pub fn new_interpretive(interpretor: &str, args: Vec<String>, path: &Path) -> Self {
        let mut args = args;
        args.push(path.to_string_lossy().to_string());
        Self {
            program: interpretor.to_string(),
            args,
        }
    }

    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in self.args.iter() {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// Feed `input`, then wait at most `deadline` for the process to finish.
    pub fn run(&self, input: &str, deadline: Duration) -> Result<Execution> {
        debug!("launch `{}` with deadline {:?}", self.command_line(), deadline);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // own group, so a timeout can take down whatever it forked
            .process_group(0)
            .spawn()?;

        let cin = child.stdin.take();
        let input = input.to_string().into_bytes();
        let feeder = thread::spawn(move || -> io::Result<()> {
            if let Some(mut cin) = cin {
                match cin.write_all(&input).and_then(|_| cin.flush()) {
                    // the program is free to exit without reading everything
                    Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {}
                    res => res?,
                }
            }
            Ok(())
        });
        let cout = drain(child.stdout.take());
        let cerr = drain(child.stderr.take());

        let status = match child.wait_timeout(deadline)? {
            Some(status) => status,
            None => {
                // it may have exited right after the deadline
                kill_group(child.id());
                let _ = child.kill();
                child.wait()?;
                // a descendant outside the group may still hold the pipes; leave the workers be
                drop((feeder, cout, cerr));
                debug!("`{}` timed out", self.command_line());
                return Ok(Execution::TimedOut);
            }
        };

        join(feeder)?;
        let stdout = String::from_utf8_lossy(&join(cout)?).to_string();
        let stderr = String::from_utf8_lossy(&join(cerr)?).to_string();

        Ok(Execution::Exited {
            code: exit_code(status),
            stdout,
            stderr,
        })
    }
}

/// Signal deaths are reported shell style, `128 + signal`.
fn exit_code(status: ExitStatus) -> i32 {
    match status.code() {
        Some(code) => code,
        None => 128 + status.signal().unwrap_or(0),
    }
}

fn kill_group(leader: u32) {
    let res = unsafe { libc::kill(-(leader as libc::pid_t), libc::SIGKILL) };
    if res != 0 {
        debug!("kill group {}: {}", leader, io::Error::last_os_error());
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf)?;
        }
        Ok(buf)
    })
}

fn join<T>(handle: JoinHandle<io::Result<T>>) -> io::Result<T> {
    handle
        .join()
        .unwrap_or_else(|_| Err(io::Error::new(io::ErrorKind::Other, "pipe worker panicked")))
}
