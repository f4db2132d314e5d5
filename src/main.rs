use std::{
    fs::{File, OpenOptions},
    io::Write,
};

use anyhow::Context;
use clap::Parser;
use log::info;

use watlinks::{
    runner::{Runner, RunnerOptions},
    utils::LOG_FILE,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Extract links to web archives from a crawl snapshot", long_about = None)]
struct Args {
    /// Snapshot identifier, e.g. CC-MAIN-2018-43
    snapshot_id: String,
}

fn main() -> anyhow::Result<()> {
    init_logging().context(format!("could not open log file {}", LOG_FILE))?;

    let args = Args::parse();

    let csv_path = format!("{}.csv", args.snapshot_id);
    let out = File::create(&csv_path)
        .context(format!("could not create output file {}", csv_path))?;

    info!("writing csv file {}", csv_path);

    let options = RunnerOptions::default_builder().build()?;
    let runner = Runner::new(options)?;
    runner.run(&args.snapshot_id, out)?;

    Ok(())
}

fn init_logging() -> anyhow::Result<()> {
    let log_file = OpenOptions::new().create(true).append(true).open(LOG_FILE)?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {:<8} {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();

    Ok(())
}
