//! timeframe - natural-language date range CLI
//!
//! Main entry point for the timeframe command-line tool.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::filter::LevelFilter;

use timeframe::cli::{self, Cli, Commands, OutputFormat};
use timeframe::config::Config;
use timeframe::logging::{LogConfig, init_logging};
use timeframe::{
    DateDialect, EnglishDateParser, Resolver, TimeframeError, format_failure_json,
    format_resolution, format_resolve_error, repl,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red().bold());
            if let Some(hint) = e
                .downcast_ref::<TimeframeError>()
                .filter(|err| err.is_recoverable())
                .and_then(TimeframeError::suggestion)
            {
                eprintln!("{} {hint}", "Hint:".cyan());
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let log_colors = !cli.no_color && io::stderr().is_terminal();
    let logging = init_logging(&LogConfig::from_flags(cli.quiet, cli.verbose, log_colors));

    let config = load_config(cli)?;
    if config.output.quiet && !cli.quiet && cli.verbose == 0 {
        logging.set_level(LevelFilter::ERROR);
    }
    if !config.output.colors || cli.no_color {
        colored::control::set_override(false);
    }
    debug!(?config, "Effective configuration");

    let format = output_format(cli, &config)?;
    let dialect = cli
        .dialect
        .map_or(config.parser.dialect, DateDialect::from);
    let resolver = Resolver::with_fallback(EnglishDateParser::new(dialect));
    debug!(dialect = %resolver.fallback().dialect(), "Resolver ready");

    match &cli.command {
        Commands::Resolve(args) => Ok(cmd_resolve(&resolver, &args.joined(), format)),
        Commands::Batch(args) => cmd_batch(&resolver, args, format),
        Commands::Repl => {
            repl::run(resolver, format)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config(args) => cmd_config(cli, args, &config),
        Commands::Completions(args) => {
            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "timeframe", &mut io::stdout());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let initializing = matches!(&cli.command, Commands::Config(args) if args.init);
    match &cli.config {
        // `config --init --config new.toml` creates the file it names.
        Some(path) if initializing && !path.exists() => Ok(Config::default()),
        Some(path) => Config::load_explicit(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(Config::load()),
    }
}

fn output_format(cli: &Cli, config: &Config) -> Result<OutputFormat> {
    if let Some(format) = cli.format {
        return Ok(format);
    }
    config
        .output
        .format
        .parse()
        .map_err(|e: String| TimeframeError::invalid_argument(e).into())
}

fn cmd_resolve(
    resolver: &Resolver<EnglishDateParser>,
    expression: &str,
    format: OutputFormat,
) -> ExitCode {
    match resolver.resolve_detailed(expression) {
        Ok(resolution) => {
            info!(rule = %resolution.rule, range = %resolution.range, "Resolved expression");
            println!("{}", format_resolution(&resolution, format));
            ExitCode::SUCCESS
        }
        Err(e) => {
            if matches!(format, OutputFormat::Json | OutputFormat::JsonPretty) {
                println!("{}", format_failure_json(expression, &e));
            }
            eprintln!("{}", format_resolve_error(&e));
            ExitCode::FAILURE
        }
    }
}

fn cmd_batch(
    resolver: &Resolver<EnglishDateParser>,
    args: &cli::BatchArgs,
    format: OutputFormat,
) -> Result<ExitCode> {
    let reader: Box<dyn BufRead> = match args.input.as_deref() {
        Some(path) if path != Path::new("-") => {
            let file = std::fs::File::open(path)
                .map_err(|e| TimeframeError::path_error("open", path, e))?;
            Box::new(BufReader::new(file))
        }
        _ => Box::new(BufReader::new(io::stdin())),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut failures = 0usize;
    let mut total = 0usize;

    for line in reader.lines() {
        let line = line.context("Failed to read input line")?;
        let expression = line.trim();
        if expression.is_empty() {
            continue;
        }
        total += 1;

        match resolver.resolve_detailed(expression) {
            Ok(resolution) => {
                let rendered = match format {
                    // One line per expression keeps the output pairable with the input.
                    OutputFormat::Text => format!("{expression}: {}", resolution.range),
                    OutputFormat::JsonPretty => format_resolution(&resolution, OutputFormat::Json),
                    other => format_resolution(&resolution, other),
                };
                writeln!(out, "{rendered}")?;
            }
            Err(e) => {
                failures += 1;
                match format {
                    OutputFormat::Json | OutputFormat::JsonPretty => {
                        writeln!(out, "{}", format_failure_json(expression, &e))?;
                    }
                    _ => eprintln!("{expression}: {e}"),
                }
                if args.fail_fast {
                    break;
                }
            }
        }
    }

    info!(total, failures, "Batch complete");
    Ok(if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn cmd_config(cli: &Cli, args: &cli::ConfigArgs, config: &Config) -> Result<ExitCode> {
    if args.init {
        let path = match &cli.config {
            Some(path) => path.clone(),
            None => Config::user_config_path()
                .context("Could not determine config directory")?,
        };
        if path.exists() && !args.force {
            anyhow::bail!(
                "Config file already exists at {}. Use --force to overwrite.",
                path.display()
            );
        }
        Config::default().save_to(&path)?;
        println!("Wrote default config to {}", path.display().to_string().green());
        return Ok(ExitCode::SUCCESS);
    }

    // Showing is the default action, with or without --show.
    debug!(show = args.show, "Showing configuration");
    println!("{}", "Current Configuration".bold().cyan());
    match cli.config.clone().or_else(Config::user_config_path) {
        Some(path) => println!("  Config file: {}", path.display()),
        None => println!("  Config file: (unavailable)"),
    }
    println!();
    print!("{}", toml::to_string_pretty(config)?);
    Ok(ExitCode::SUCCESS)
}
