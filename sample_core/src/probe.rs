use std::{io, mem};

use log::debug;

use crate::error::Result;

/// Totals over every child process reaped so far.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CumulativeUsage {
    /// user + system, seconds
    pub cpu_time: f64,
    /// high-water mark of resident memory as the platform reports it
    pub peak_memory: f64,
}

/// Usage attributed to a single launch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Usage {
    pub elapsed_time: f64,
    pub peak_memory: f64,
}

pub trait UsageProbe {
    fn cumulative(&self) -> Result<CumulativeUsage>;
}

/// `getrusage(RUSAGE_CHILDREN)` of the current process.
pub struct ChildrenUsage;

impl UsageProbe for ChildrenUsage {
    fn cumulative(&self) -> Result<CumulativeUsage> {
        let mut ru: libc::rusage = unsafe { mem::zeroed() };
        if unsafe { libc::getrusage(libc::RUSAGE_CHILDREN, &mut ru) } != 0 {
            return Err(io::Error::last_os_error().into());
        }

        let seconds = |tv: libc::timeval| tv.tv_sec as f64 + tv.tv_usec as f64 / 1_000_000.0;

        Ok(CumulativeUsage {
            cpu_time: seconds(ru.ru_utime) + seconds(ru.ru_stime),
            // kilobytes on Linux, compared against the byte limit unscaled
            peak_memory: ru.ru_maxrss as f64,
        })
    }
}

/// Turns cumulative children usage into per-launch usage.
///
/// The OS only reports totals, so the cost of one launch is the difference between
/// two snapshots. This holds only while launches never overlap: every launch must be
/// reaped and measured before the next one starts. Peak memory cannot be split this
/// way and is the high-water mark of all launches so far.
pub struct ResourceAccountant {
    probe: Box<dyn UsageProbe>,
    before_time: f64,
}

impl ResourceAccountant {
    pub fn new(probe: Box<dyn UsageProbe>) -> Result<Self> {
        let before_time = probe.cumulative()?.cpu_time;
        Ok(Self { probe, before_time })
    }

    pub fn measure(&mut self) -> Result<Usage> {
        let now = self.probe.cumulative()?;
        let usage = Usage {
            elapsed_time: now.cpu_time - self.before_time,
            peak_memory: now.peak_memory,
        };
        self.before_time = now.cpu_time;

        debug!("measured {:?}", usage);
        Ok(usage)
    }

    /// Move the snapshot forward without attributing the difference to anyone.
    pub fn resync(&mut self) -> Result<()> {
        self.before_time = self.probe.cumulative()?.cpu_time;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, collections::VecDeque};

    struct ScriptedUsage(RefCell<VecDeque<CumulativeUsage>>);

    impl UsageProbe for ScriptedUsage {
        fn cumulative(&self) -> Result<CumulativeUsage> {
            Ok(self.0.borrow_mut().pop_front().unwrap())
        }
    }

    fn usage(cpu_time: f64, peak_memory: f64) -> CumulativeUsage {
        CumulativeUsage {
            cpu_time,
            peak_memory,
        }
    }

    #[test]
    fn delta_between_launches() -> Result<()> {
        let script = vec![
            usage(0.5, 1000.0),
            usage(0.75, 2000.0),
            usage(2.0, 2000.0),
            usage(2.5, 4000.0),
        ];
        let probe = ScriptedUsage(RefCell::new(script.into()));
        let mut accountant = ResourceAccountant::new(Box::new(probe))?;

        assert_eq!(accountant.measure()?, Usage { elapsed_time: 0.25, peak_memory: 2000.0 });
        assert_eq!(accountant.measure()?, Usage { elapsed_time: 1.25, peak_memory: 2000.0 });
        assert_eq!(accountant.measure()?, Usage { elapsed_time: 0.5, peak_memory: 4000.0 });
        Ok(())
    }

    #[test]
    fn resync_skips_aborted_launch() -> Result<()> {
        let script = vec![usage(0.0, 0.0), usage(3.0, 10.0), usage(3.5, 10.0)];
        let probe = ScriptedUsage(RefCell::new(script.into()));
        let mut accountant = ResourceAccountant::new(Box::new(probe))?;

        accountant.resync()?;
        assert_eq!(accountant.measure()?.elapsed_time, 0.5);
        Ok(())
    }

    #[test]
    fn children_usage_grows() -> Result<()> {
        let mut accountant = ResourceAccountant::new(Box::new(ChildrenUsage))?;
        std::process::Command::new("sh")
            .arg("-c")
            .arg("i=0; while [ $i -lt 20000 ]; do i=$((i+1)); done")
            .status()?;

        let usage = accountant.measure()?;
        assert!(usage.elapsed_time >= 0.0);
        assert!(usage.peak_memory > 0.0);
        Ok(())
    }
}
