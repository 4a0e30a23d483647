use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use cellprobe::check::{self, CheckResult, Outcome};
use cellprobe::{cli, logging, Args, Settings};
use cellprobe_adapters::hbase::HBaseRestStore;
use cellprobe_types::Status;

fn main() -> ExitCode {
    // Usage errors are UNKNOWN for the supervisor, not clap's default of 2.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            // --help and --version already went to stdout.
            if err.use_stderr() {
                let summary = cli::parse_error_summary(&err);
                println!("{}", CheckResult::new(Status::Unknown, summary).render());
            }
            return ExitCode::from(Status::Unknown.code());
        }
    };

    logging::init(args.verbose);

    let outcome = run(args).unwrap_or_else(|err| {
        tracing::error!("{:#}", err);
        Outcome::Check(CheckResult::new(Status::Unknown, format!("{:#}", err)))
    });

    println!("{}", outcome.render());
    ExitCode::from(outcome.status().code())
}

fn run(args: Args) -> Result<Outcome> {
    let settings = Settings::load(args.config.as_deref()).context("failed to load config")?;
    let request = args.into_request(&settings)?;

    // One check per process: a single-threaded runtime is all it needs.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let store = HBaseRestStore::new().user_agent(concat!("cellprobe/", env!("CARGO_PKG_VERSION")));
    Ok(rt.block_on(check::run(&store, &request)))
}
