//! Print the fields of one or more saves as `<label> : <value>` lines
//!
//! Output of each file directly follows the previous one. Files that can't be
//! read are reported on stderr as `failed: <path>` and skipped. When a save
//! runs out of data part way through, the fields decoded so far are still
//! printed.
//!
//! ```text
//! WorldX : 1
//! WorldY : 2
//! WorldXa : 3
//! WorldYa : 4
//! WorldZa : 5
//! x offset : 0.5
//! ...
//! Inventory Type : Sword
//! InvExplored : 1
//! InvCount : 0
//! ```

use clap::Parser;
use savedump::{DecoderBuilder, Endian, FieldRecord, InventoryPolicy, PlayerLayout, Reporter};
use std::error;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "savedump")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Save files to decode
    #[arg(value_name = "FILE")]
    paths: Vec<PathBuf>,

    /// Layout of the player detail block (minimal or extended)
    #[arg(long, default_value = "extended", value_parser = parse_layout)]
    layout: PlayerLayout,

    /// Decode every inventory item instead of only the first
    #[arg(long)]
    all_items: bool,

    /// Byte order of the position float block (little or big)
    #[arg(long, default_value = "little", value_parser = parse_endian)]
    position_endian: Endian,

    /// Byte order of values in the player table (little or big)
    #[arg(long, default_value = "big", value_parser = parse_endian)]
    table_value_endian: Endian,

    /// Prefix each line with the byte offset of the field
    #[arg(long)]
    offsets: bool,

    /// Print the fields of each file as a JSON array
    #[cfg(feature = "json")]
    #[arg(long, conflicts_with = "offsets")]
    json: bool,

    /// Exit with a failure status if any file fails to load or decode
    #[arg(long)]
    strict: bool,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_layout(s: &str) -> Result<PlayerLayout, String> {
    s.parse().map_err(|e: savedump::ParseOptionError| e.to_string())
}

fn parse_endian(s: &str) -> Result<Endian, String> {
    s.parse().map_err(|e: savedump::ParseOptionError| e.to_string())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.paths.is_empty() {
        eprintln!("no input files specified");
        return ExitCode::from(1);
    }

    match run(&cli) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failures) if cli.strict => {
            debug!(failures, "strict mode and some files failed");
            ExitCode::from(1)
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
    }
}

/// Decode every file, returning how many failed
fn run(cli: &Cli) -> Result<usize, Box<dyn error::Error>> {
    let policy = if cli.all_items {
        InventoryPolicy::All
    } else {
        InventoryPolicy::FirstOnly
    };

    let decoder = DecoderBuilder::new()
        .player_layout(cli.layout)
        .position_endian(cli.position_endian)
        .table_value_endian(cli.table_value_endian)
        .inventory_policy(policy)
        .build();

    let stdout = io::stdout();
    let mut reporter = Reporter::new(BufWriter::new(stdout.lock())).with_offsets(cli.offsets);
    let mut failures = 0;

    for path in &cli.paths {
        let data = match savedump::load_file(path) {
            Ok(data) => data,
            Err(e) => {
                debug!(error = %e, "load failed");
                reporter.inner().flush()?;
                eprintln!("failed: {}", path.display());
                failures += 1;
                continue;
            }
        };

        let (records, error) = match decoder.decode(&data) {
            Ok(records) => (records, None),
            Err(e) => {
                let message = e.to_string();
                (e.into_records(), Some(message))
            }
        };

        write_records(cli, &mut reporter, &records)?;

        if let Some(message) = error {
            reporter.inner().flush()?;
            eprintln!("failed: {} ({})", path.display(), message);
            failures += 1;
        }
    }

    reporter.inner().flush()?;
    Ok(failures)
}

#[cfg(feature = "json")]
fn write_records<W: Write>(
    cli: &Cli,
    reporter: &mut Reporter<W>,
    records: &[FieldRecord],
) -> Result<(), Box<dyn error::Error>> {
    if cli.json {
        let out = reporter.inner();
        serde_json::to_writer(&mut *out, records)?;
        out.write_all(b"\n")?;
    } else {
        reporter.write_records(records)?;
    }
    Ok(())
}

#[cfg(not(feature = "json"))]
fn write_records<W: Write>(
    _cli: &Cli,
    reporter: &mut Reporter<W>,
    records: &[FieldRecord],
) -> Result<(), Box<dyn error::Error>> {
    reporter.write_records(records)?;
    Ok(())
}
