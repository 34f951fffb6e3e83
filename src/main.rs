mod cli;

use mediatab::{config, probe};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use mediatab_source::StreamKind;
use std::io::Read;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "mediatab=trace,mediatab_source=trace".to_string()
        } else {
            "mediatab=warn,mediatab_source=warn".to_string()
        }
    });

    // Logs go to stderr so report output on stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info {
            file,
            stream,
            section,
            json,
            buffered,
        } => info_file(
            &file,
            cli.config.as_deref(),
            stream,
            section.as_deref(),
            json,
            buffered,
        ),
        Commands::Get {
            file,
            key,
            kind,
            stream,
        } => get_field(&file, cli.config.as_deref(), &key, kind, stream),
        Commands::Structure { report, json } => {
            structure_file(&report, cli.config.as_deref(), json)
        }
        Commands::CheckTools => check_tools(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("mediatab {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn info_file(
    file: &Path,
    config_path: Option<&Path>,
    stream: usize,
    section: Option<&str>,
    json: bool,
    buffered: bool,
) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let config = config::load_config_or_default(config_path)?;
    let prober = probe::Prober::from_config(&config)?;
    tracing::debug!("Using {} backend", prober.backend_name());

    let info = prober.info(file, stream, buffered)?;
    print_info(&info, section, json)
}

fn get_field(
    file: &Path,
    config_path: Option<&Path>,
    key: &str,
    kind: StreamKind,
    stream: usize,
) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let config = config::load_config_or_default(config_path)?;
    let prober = probe::Prober::from_config(&config)?;

    let value = prober.get(file, key, kind, stream)?;
    println!("{}", value);
    Ok(())
}

fn structure_file(report: &Path, config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let text = if report == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read report from stdin")?;
        text
    } else {
        std::fs::read_to_string(report)
            .with_context(|| format!("Failed to read report: {:?}", report))?
    };

    let info = probe::structure_report(&text, &config.report)?;
    print_info(&info, None, json)
}

fn print_info(info: &mediatab_report::Info, section: Option<&str>, json: bool) -> Result<()> {
    match section {
        Some(name) => {
            let section = info
                .section(name)
                .with_context(|| format!("No section named {:?} in report", name))?;
            if json {
                println!("{}", serde_json::to_string_pretty(section)?);
            } else {
                print!("{}", probe::format_section(section));
            }
        }
        None => {
            if json {
                println!("{}", serde_json::to_string_pretty(info)?);
            } else {
                print!("{}", probe::format_info(info));
            }
        }
    }

    Ok(())
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    println!("Checking MediaInfo engine...\n");

    let config = config::load_config_or_default(config_path)?;
    let tools = probe::check_tools(config.source.tool_path.as_deref());
    let mut any_ok = false;

    for tool in &tools {
        let status = if tool.available {
            any_ok = true;
            "✓"
        } else {
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if any_ok {
        println!("MediaInfo is available!");
    } else {
        println!("MediaInfo is missing. Install the mediainfo package to analyze files.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            print_config_summary(&config);
        }
        None => {
            println!("No config file specified, using defaults");
            print_config_summary(&config::Config::default());
        }
    }

    Ok(())
}

fn print_config_summary(config: &config::Config) {
    println!("  Backend: {:?}", config.source.backend);
    match &config.source.tool_path {
        Some(path) => println!("  Tool path: {}", path.display()),
        None => println!("  Tool path: (PATH lookup)"),
    }
    println!("  Chunk size: {} bytes", config.source.chunk_size);
    println!("  Orphan lines: {:?}", config.report.orphan_lines);
    println!("  Delimiter: {:?}", config.report.delimiter);
}
