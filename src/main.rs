use clap::CommandFactory;
use colored::*;
use env_logger::{Builder, Env, Target};
use log::info;
use rfseek::output::{MatchPrinter, summary_line};
use rfseek::progress::ProgressReporter;
use rfseek::{Cli, Commands, FileConfig, Parser, Result as RfseekResult, RfseekError, Searcher};
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_logging(&cli) {
        eprintln!("{}", format!("Error: {e}").red());
        return ExitCode::FAILURE;
    }

    let start_time = Instant::now();
    info!("Application started with command: {:?}", cli.command);

    let code = match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format!("Error: {e}").red());
            ExitCode::FAILURE
        }
    };

    info!(
        "Application finished. Total elapsed time: {:.2?}",
        start_time.elapsed()
    );
    code
}

fn run(cli: &Cli) -> RfseekResult<()> {
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(*shell, &mut cmd, "rfseek", &mut std::io::stdout());
        return Ok(());
    }

    let file_config = if cli.no_config {
        FileConfig::default()
    } else {
        FileConfig::load()?
    };

    let Some(request) = cli.search_request(&file_config)? else {
        return Ok(());
    };
    let config = &request.config;

    if !config.color {
        colored::control::set_override(false);
    }

    let searcher = Searcher::new(config, request.mode, &request.pattern)?;

    let total = if config.progress {
        let total = searcher.count_files()?;
        if total == 0 {
            println!("{}", "No files found to search".yellow());
            return Ok(());
        }
        Some(total)
    } else {
        None
    };

    let progress = ProgressReporter::new(total);
    let printer = MatchPrinter::new(config.color).with_progress(progress.bar().clone());

    let report = match searcher.search(&(&printer, &progress)) {
        Ok(report) => report,
        Err(e) => {
            progress.abandon();
            return Err(e);
        }
    };

    progress.finish(&report);
    println!("{}", summary_line(&report));
    Ok(())
}

fn setup_logging(cli: &Cli) -> RfseekResult<()> {
    let default_level = if cli.verbose { "info" } else { "warn" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_level));

    builder
        .format(|buf, record| {
            use std::io::Write;
            let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
            let module = record.module_path().unwrap_or("unknown");
            writeln!(buf, "{stamp} [{}] [{module}] {}", record.level(), record.args())
        })
        .target(log_target(cli.log.as_deref())?);

    builder
        .try_init()
        .map_err(|e| RfseekError::Other(e.to_string()))
}

/// Stderr, or a freshly truncated file whose parent directories are created.
fn log_target(log_path: Option<&Path>) -> RfseekResult<Target> {
    let Some(log_path) = log_path else {
        return Ok(Target::Stderr);
    };
    if let Some(parent_dir) = log_path.parent()
        && !parent_dir.as_os_str().is_empty()
        && !parent_dir.exists()
    {
        fs::create_dir_all(parent_dir)?;
    }
    let log_file = fs::File::create(log_path)?;
    Ok(Target::Pipe(Box::new(log_file)))
}
