use clap::Parser;
use tracing_subscriber::EnvFilter;
use xliffmerge_cli::{ExistingStrategy, MergeCommand, run_merge_command};

/// Merge gettext PO translations into an XLIFF 1.2 document.
///
/// The amended document is written to stdout; redirect it to save it.
#[derive(Parser, Debug)]
#[command(name = "po2xliff", author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging on stderr
    #[arg(short, long)]
    debug: bool,

    /// The XLIFF document to add targets to
    #[arg(short = 'x', long = "xml", value_name = "FILE")]
    xml: String,

    /// The PO catalog holding the translations
    #[arg(short, long, value_name = "FILE")]
    po: String,

    /// Replace the built-in special-case table with a JSON or TOML map
    #[arg(long, value_name = "FILE", conflicts_with = "no_special_cases")]
    special_cases: Option<String>,

    /// Disable the special-case fallback entirely
    #[arg(long)]
    no_special_cases: bool,

    /// What to do with units that already have a target
    #[arg(long, value_enum, default_value_t = ExistingStrategy::Overwrite)]
    existing: ExistingStrategy,

    /// Print merge statistics as JSON on stderr
    #[arg(long)]
    stats: bool,
}

fn init_logging(debug: bool) {
    let default = if debug {
        "warn,xliffmerge=debug,xliffmerge_cli=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    let command = MergeCommand {
        xliff: args.xml,
        po: args.po,
        special_cases: args.special_cases,
        no_special_cases: args.no_special_cases,
        existing: args.existing,
        stats: args.stats,
    };

    match run_merge_command(command) {
        Ok(xml) => print!("{}", xml),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
