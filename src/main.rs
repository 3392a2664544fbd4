use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::exit;
use structopt::StructOpt;
use tracing::{error, info, Level};
use PkgInflate::{FixedDistanceCodes, GzDecoder, InflateConfig, InflateError};

#[derive(StructOpt, Debug)]
#[structopt(name = "pkg-inflate", about = "Decompress a gzip-wrapped package tarball")]
struct Cli {
    /// The .tgz / .gz file to decompress
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Where to write the decompressed bytes (stdout if omitted)
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,

    /// History window in bytes, 1..=32768
    #[structopt(long = "window-size", default_value = "32768")]
    window_size: usize,

    /// Read fixed-block distance symbols as 5 raw bits
    #[structopt(long = "legacy-fixed-distances")]
    legacy_fixed_distances: bool,

    #[structopt(short, long)]
    verbose: bool,
}

fn run(args: &Cli) -> Result<u64, InflateError> {
    let mut config = InflateConfig::default().with_window_size(args.window_size);
    if args.legacy_fixed_distances {
        config = config.with_fixed_distances(FixedDistanceCodes::RawBits);
    }

    let input = BufReader::new(File::open(&args.input)?);
    let mut decoder = GzDecoder::new(input, config)?;
    let header = decoder.header();
    info!(
        filename = header.filename.as_deref().unwrap_or("-"),
        mtime = header.modification_time,
        os = header.operating_system,
        "gzip header"
    );

    let written = match &args.output {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            let n = decoder.decompress_to(&mut out)?;
            out.flush()?;
            n
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            let n = decoder.decompress_to(&mut out)?;
            out.flush()?;
            n
        }
    };
    Ok(written)
}

fn main() {
    let args = Cli::from_args();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(written) => info!(input = %args.input.display(), bytes = written, "decompressed"),
        Err(e) => {
            error!(input = %args.input.display(), "{}", e);
            exit(1);
        }
    }
}
