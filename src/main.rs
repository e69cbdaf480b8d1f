//! anchormark - print the anchor-source text of heading lines

use std::io::{self, BufWriter, Read, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use anchormark::{resolve_anchor_source_bytes, Flavor, ReferenceMap};

#[derive(Parser)]
#[command(name = "anchormark")]
#[command(version, about = "Print the anchor-source text of heading lines", long_about = None)]
#[command(after_help = "EXAMPLES:
    anchormark headings.txt               One heading per line, cmark rules
    echo '*Hi* there' | anchormark -f gfm  Read from stdin, GitHub rules")]
struct Cli {
    /// Input file with one raw heading text per line (stdin if omitted or `-`)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Renderer whose rules apply
    #[arg(short, long, default_value = "cmark")]
    flavor: Flavor,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Returns the number of lines that failed to resolve.
fn run(cli: &Cli) -> io::Result<usize> {
    let input = match cli.input.as_deref() {
        None | Some("-") => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            buf
        }
        Some(path) => std::fs::read(path)?,
    };

    let profile = cli.flavor.profile();
    let refs = ReferenceMap::new();
    let mut out = BufWriter::new(io::stdout().lock());
    let mut failures = 0;

    let input = input.strip_suffix(b"\n").unwrap_or(input.as_slice());
    if input.is_empty() {
        return Ok(0);
    }

    for (index, line) in input.split(|&b| b == b'\n').enumerate() {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        match resolve_anchor_source_bytes(line, &profile, &refs) {
            Ok(text) => writeln!(out, "{text}")?,
            Err(e) => {
                failures += 1;
                eprintln!("line {}: {e}", index + 1);
            }
        }
    }
    out.flush()?;
    Ok(failures)
}
