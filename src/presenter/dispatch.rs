use std::thread;

use anyhow::{anyhow, Context, Result};
use crossbeam_channel::{unbounded, Sender};
use log::{debug, error};

use crate::archive::ReadConcurrency;

pub(super) type Job = Box<dyn FnOnce() + Send + 'static>;

/// Where background page loads run
pub(super) enum Dispatch {
    /// One thread per load, for handles that can be read concurrently
    Parallel,

    /// A single reader thread consuming loads in submission order
    /// The thread exits once the sender is dropped
    Serial { jobs: Sender<Job> },
}

impl Dispatch {
    pub fn for_concurrency(concurrency: ReadConcurrency, force_serial: bool) -> Self {
        if concurrency == ReadConcurrency::Shared && !force_serial {
            return Self::Parallel;
        }

        Self::serial_or_stopped(Self::spawn_serial())
    }

    /// Without a reader thread, loads are refused rather than run concurrently
    pub(super) fn serial_or_stopped(spawned: Result<Self>) -> Self {
        spawned.unwrap_or_else(|err| {
            error!("Pages cannot be loaded: {err:#}");
            let (jobs, _) = unbounded();
            Self::Serial { jobs }
        })
    }

    fn spawn_serial() -> Result<Self> {
        let (jobs, queue) = unbounded::<Job>();

        thread::Builder::new()
            .name("page-reader".to_owned())
            .spawn(move || {
                for job in queue {
                    job();
                }

                debug!("Page reader thread stopped");
            })
            .context("Failed to spawn page reader thread")?;

        Ok(Self::Serial { jobs })
    }

    pub fn is_serial(&self) -> bool {
        matches!(self, Self::Serial { .. })
    }

    pub fn run(&self, job: Job) -> Result<()> {
        match self {
            Self::Parallel => {
                thread::Builder::new()
                    .name("page-loader".to_owned())
                    .spawn(job)
                    .context("Failed to spawn page loading thread")?;
            }

            Self::Serial { jobs } => {
                jobs.send(job)
                    .map_err(|_| anyhow!("Page reader thread is not running anymore"))?;
            }
        }

        Ok(())
    }
}
