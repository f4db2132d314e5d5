use std::{
    io::Write,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use anyhow::Context;
use signal_hook::consts::{SIGINT, SIGTERM};

use crate::{
    fetcher::Fetcher,
    manifest, records,
    registry::HostRegistry,
    types::{OutputRow, PipelineError},
    utils::STORAGE_BASE_URL,
};

pub struct Runner {
    fetcher: Fetcher,
    options: RunnerOptions,
    should_terminate: Arc<AtomicBool>,
}

#[derive(Builder, Debug, Clone)]
#[builder(setter(into))]
pub struct RunnerOptions {
    // table of archive hosts the link matching runs against
    #[builder(default = "self.default_registry()")]
    registry: HostRegistry,
    // root under which the manifest and all wat files live
    #[builder(default = "self.default_storage_base()")]
    storage_base: String,
    // extra fetch attempts per remote object, 0 matches the original
    // fail-on-first-error behavior
    #[builder(default = "0")]
    url_retries: u8,
    // log and move on when a wat file fails, instead of aborting the run
    #[builder(default = "false")]
    skip_failed_files: bool,
    // stop after this many wat files, mostly useful for trial runs
    #[builder(default)]
    max_files: Option<usize>,
}

impl RunnerOptions {
    pub fn default_builder() -> RunnerOptionsBuilder {
        RunnerOptionsBuilder::default()
    }
}

impl RunnerOptionsBuilder {
    fn default_registry(&self) -> HostRegistry {
        HostRegistry::builtin()
    }
    fn default_storage_base(&self) -> String {
        STORAGE_BASE_URL.into()
    }
}

impl Runner {
    pub fn new(options: RunnerOptions) -> anyhow::Result<Self> {
        let fetcher = Fetcher::new(options.url_retries)?;

        let should_terminate = Arc::new(AtomicBool::new(false));
        signal_hook::flag::register(SIGTERM, Arc::clone(&should_terminate))?;
        signal_hook::flag::register(SIGINT, Arc::clone(&should_terminate))?;

        Ok(Runner {
            fetcher,
            options,
            should_terminate,
        })
    }

    /// Runs the whole pipeline for one snapshot: header first, then one csv
    /// row per matched archive link, in manifest order, then record order
    /// within a file, then link order within a record.
    pub fn run<W: Write>(&self, snapshot_id: &str, sink: W) -> anyhow::Result<()> {
        let mut out = csv::WriterBuilder::new().has_headers(false).from_writer(sink);
        out.write_record(OutputRow::COLUMNS)
            .context("could not write csv header")?;

        let mut processed = 0usize;
        for wat_url in manifest::wat_paths(&self.fetcher, &self.options.storage_base, snapshot_id)?
        {
            let wat_url = wat_url?;

            if self.should_terminate.load(Ordering::Relaxed) {
                warn!("termination requested, stopping before {}", wat_url);
                break;
            }
            if let Some(max) = self.options.max_files {
                if processed >= max {
                    info!("stopping after {} wat files", processed);
                    break;
                }
            }

            info!("processing wat {}", wat_url);
            let res = records::process_wat(
                &self.fetcher,
                &self.options.registry,
                &wat_url,
                |row| {
                    out.serialize(row).context("could not write csv row")?;
                    Ok(())
                },
            );

            match res {
                Ok(()) => {}
                Err(e) if self.options.skip_failed_files && is_recoverable(&e) => {
                    error!("skipping wat {}: {:#}", wat_url, e);
                }
                Err(e) => return Err(e),
            }

            // rows from a finished file survive a later fatal failure
            out.flush().context("could not flush csv output")?;
            processed += 1;
        }

        out.flush().context("could not flush csv output")?;
        Ok(())
    }
}

// only remote-side failures are skippable; sink errors always abort
fn is_recoverable(e: &anyhow::Error) -> bool {
    matches!(
        e.downcast_ref::<PipelineError>(),
        Some(PipelineError::Transfer(_) | PipelineError::Parse(_))
    )
}
