//! `pep740` command line converter
//!
//! Reads a PEP 740 attestation or a Sigstore bundle from a file (or stdin),
//! converts it to the other format and writes the JSON result.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pep740_convert::{
    decode_attestation_with_options, decode_bundle_with_options, encode_attestation,
    encode_bundle, from_bundle, to_bundle_with_options, ConvertOptions,
};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "pep740",
    version,
    about = "Convert between PEP 740 attestations and Sigstore bundles"
)]
struct Cli {
    /// Log each conversion step
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a PEP 740 attestation into a Sigstore bundle
    ToBundle(ToBundleArgs),
    /// Convert a Sigstore bundle into a PEP 740 attestation
    FromBundle(ConvertArgs),
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Input file, or `-` for stdin
    input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Accept bundles whose log entries carry no inclusion proof
    #[arg(long, env = "PEP740_ALLOW_MISSING_INCLUSION_PROOF")]
    allow_missing_inclusion_proof: bool,
}

#[derive(Args, Debug)]
struct ToBundleArgs {
    #[command(flatten)]
    convert: ConvertArgs,

    /// Fail on transparency entries that are not JSON objects
    #[arg(long, env = "PEP740_STRICT_ENTRIES")]
    strict_entries: bool,
}

impl ConvertArgs {
    fn options(&self) -> ConvertOptions {
        ConvertOptions::new().with_require_inclusion_proof(!self.allow_missing_inclusion_proof)
    }
}

impl ToBundleArgs {
    fn options(&self) -> ConvertOptions {
        self.convert
            .options()
            .with_strict_transparency_entries(self.strict_entries)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // a subscriber may already be installed when running under tests
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::ToBundle(args) => {
            let options = args.options();
            let data = read_input(&args.convert.input)?;
            let attestation = decode_attestation_with_options(&data, &options)
                .context("failed to decode attestation")?;
            let bundle = to_bundle_with_options(&attestation, &options)
                .context("failed to convert attestation to bundle")?;
            write_output(args.convert.output.as_deref(), &encode_bundle(&bundle)?)
        }
        Command::FromBundle(args) => {
            let options = args.options();
            let data = read_input(&args.input)?;
            let bundle =
                decode_bundle_with_options(&data, &options).context("failed to decode bundle")?;
            let attestation =
                from_bundle(&bundle).context("failed to convert bundle to attestation")?;
            write_output(args.output.as_deref(), &encode_attestation(&attestation)?)
        }
    }
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut data = Vec::new();
        io::stdin()
            .read_to_end(&mut data)
            .context("failed to read stdin")?;
        return Ok(data);
    }
    fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write_output(path: Option<&Path>, json: &[u8]) -> Result<()> {
    let mut data = json.to_vec();
    data.push(b'\n');

    match path {
        Some(path) => {
            fs::write(path, &data)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::debug!(path = %path.display(), bytes = data.len(), "wrote output");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&data).context("failed to write stdout")?;
            stdout.flush().context("failed to write stdout")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pep740_convert::{decode_attestation, decode_bundle};

    const ATTESTATION: &str = include_str!("../../pep740-convert/testdata/pypi.attestation.json");

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_to_bundle() {
        let cli = parse(&[
            "pep740",
            "to-bundle",
            "in.json",
            "-o",
            "out.json",
            "--strict-entries",
        ]);
        assert!(!cli.verbose);
        match cli.command {
            Command::ToBundle(args) => {
                assert_eq!(args.convert.input, PathBuf::from("in.json"));
                assert_eq!(args.convert.output, Some(PathBuf::from("out.json")));
                let options = args.options();
                assert!(options.strict_transparency_entries);
                assert!(options.validation.require_inclusion_proof);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_from_bundle() {
        let cli = parse(&[
            "pep740",
            "from-bundle",
            "-",
            "--allow-missing-inclusion-proof",
            "-v",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Command::FromBundle(args) => {
                assert_eq!(args.input, PathBuf::from("-"));
                assert!(args.output.is_none());
                assert!(!args.options().validation.require_inclusion_proof);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(Cli::try_parse_from(["pep740", "verify", "x"]).is_err());
        assert!(Cli::try_parse_from(["pep740", "to-bundle"]).is_err());
        assert!(Cli::try_parse_from(["pep740", "from-bundle", "x", "--strict-entries"]).is_err());
    }

    #[test]
    fn test_convert_files() {
        let dir = tempfile::tempdir().unwrap();
        let attestation_path = dir.path().join("pypi.attestation.json");
        let bundle_path = dir.path().join("pypi.sigstore.json");
        let restored_path = dir.path().join("restored.attestation.json");
        fs::write(&attestation_path, ATTESTATION).unwrap();

        run(parse(&[
            "pep740",
            "to-bundle",
            attestation_path.to_str().unwrap(),
            "-o",
            bundle_path.to_str().unwrap(),
        ]))
        .unwrap();
        let bundle = decode_bundle(&fs::read(&bundle_path).unwrap()).unwrap();
        assert_eq!(bundle.tlog_entries().len(), 1);

        run(parse(&[
            "pep740",
            "from-bundle",
            bundle_path.to_str().unwrap(),
            "--output",
            restored_path.to_str().unwrap(),
        ]))
        .unwrap();
        let restored = fs::read_to_string(&restored_path).unwrap();
        assert_eq!(
            decode_attestation(restored.as_bytes()).unwrap(),
            decode_attestation(ATTESTATION.as_bytes()).unwrap()
        );
        assert_eq!(restored, ATTESTATION);
    }

    #[test]
    fn test_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = run(parse(&["pep740", "to-bundle", missing.to_str().unwrap()])).unwrap_err();
        assert!(format!("{err:#}").starts_with("failed to read"));
    }

    #[test]
    fn test_conversion_error_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.json");
        fs::write(&input, r#"{"version": 2}"#).unwrap();

        let err = run(parse(&["pep740", "to-bundle", input.to_str().unwrap()])).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.starts_with("failed to convert attestation to bundle"));
        assert!(message.contains("unsupported attestation version: 2"));
    }
}
