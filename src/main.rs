//! podguard CLI entry point
//!
//! Validates pod descriptors against registry, security and resource policy.

use podguard::cli::args::{Args, CheckOpts, Command, RuleFilterOpts, STDIN_HINT};
use podguard::cli::output::{format_rule_table, get_formatter};
use podguard::config::ConfigFile;
use podguard::data::snapshot::{load_snapshots, read_snapshot};
use podguard::engine::result::{compare_to_baseline, load_baseline, save_baseline};
use podguard::version::get_build_info;
use podguard::{validate_snapshot, ComplianceValidator, PodguardError, ValidatorConfig};

use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and friends are reported through the error path too
            let code = if e.use_stderr() { 3 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    init_tracing(args.global.verbose);

    let result = match args.command() {
        Command::Version => {
            println!("{}", get_build_info());
            Ok(ExitCode::SUCCESS)
        }
        Command::Rules(filter) => print_rules(&args, &filter),
        Command::Check(opts) => run_checks(&args, &opts),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(3)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(args: &Args, filter: &RuleFilterOpts) -> Result<ValidatorConfig, PodguardError> {
    let file = ConfigFile::load_optional(args.global.config.as_deref())?;
    Ok(ValidatorConfig::resolve(file, filter))
}

fn print_rules(args: &Args, filter: &RuleFilterOpts) -> Result<ExitCode, PodguardError> {
    let validator = ComplianceValidator::new(&load_config(args, filter)?)?;
    println!(
        "{}",
        format_rule_table(&validator.rules(), validator.allowed_registries())
    );
    Ok(ExitCode::SUCCESS)
}

fn run_checks(args: &Args, opts: &CheckOpts) -> Result<ExitCode, PodguardError> {
    let config = load_config(args, &opts.filter)?;

    let snapshot = if opts.reads_stdin() {
        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            eprintln!("{}", STDIN_HINT);
        }
        info!("reading snapshot from stdin");
        read_snapshot(stdin.lock())?
    } else {
        load_snapshots(&opts.files)?
    };

    let report = validate_snapshot(&config, &snapshot)?;

    let comparison = opts
        .baseline
        .as_deref()
        .map(|path| load_baseline(path).map(|baseline| compare_to_baseline(&report, &baseline)))
        .transpose()?;

    if let Some(cmp) = &comparison {
        if cmp.has_regressions() {
            warn!(
                regressions = cmp.regressions.len(),
                new_failures = cmp.new_failures.len(),
                "findings regressed since baseline"
            );
        } else {
            info!(resolved = cmp.resolved.len(), "no regressions since baseline");
        }
    }

    let formatter = get_formatter(opts.format, args.color_enabled(), args.global.verbose, opts.quiet);
    println!("{}", formatter.format(&report, comparison.as_ref())?);

    if let Some(path) = &opts.save_baseline {
        save_baseline(&report, path)?;
        info!(path = %path.display(), "baseline saved");
    }

    Ok(ExitCode::from(report.summary().exit_code()))
}
