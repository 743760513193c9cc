use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vsyc::{
    EvalContext, FsLoader, Interpreter, Parent, DEFAULT_MAX_CALL_DEPTH, SOURCE_EXTENSION,
};

/// Run a vsyc script.
#[derive(Parser, Debug)]
#[command(name = "vsyc", version, about)]
struct Cli {
    /// Script to run (must end in `.vscc`)
    file: PathBuf,

    /// Directory `@usingfile` names resolve against [default: the script's directory]
    #[arg(long)]
    root: Option<PathBuf>,

    /// Maximum depth of nested calls and imports
    #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_call_depth: usize,

    /// Print the token table instead of running the script
    #[arg(long)]
    tokens: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Log to stderr. `RUST_LOG` wins over `-v` when set.
fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        })
    });
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .init();
}

fn check_extension(path: &Path) -> Result<()> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext == SOURCE_EXTENSION => Ok(()),
        _ => bail!(
            "{} is not a .{} file",
            path.display(),
            SOURCE_EXTENSION
        ),
    }
}

fn dump_tokens(source: &str) {
    for (idx, node) in vsyc::tokenize(source).iter().enumerate() {
        let parent = match node.parent {
            Parent::TopLevel => "-".to_string(),
            Parent::Node(p) => p.to_string(),
        };
        println!("{:>5}  {:<8} {:>6}  {:?}", idx, node.kind, parent, node.value);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    check_extension(&cli.file)?;
    if !cli.file.is_file() {
        bail!("{} does not exist", cli.file.display());
    }

    let name = cli
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .context("script path has no file name")?
        .to_string();
    let root = match &cli.root {
        Some(root) => root.clone(),
        None => cli
            .file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    let loader = FsLoader::new(root);
    debug!(script = %name, root = %loader.root().display(), "resolved paths");

    if cli.tokens {
        let source = std::fs::read_to_string(&cli.file)
            .with_context(|| format!("failed to read {}", cli.file.display()))?;
        dump_tokens(&source);
        return Ok(());
    }

    let ctx = EvalContext::with_max_call_depth(cli.max_call_depth).echo(true);
    let mut interp = Interpreter::new(loader).with_context(ctx);
    interp
        .run_file(&name)
        .with_context(|| format!("failed to run {}", cli.file.display()))?;

    let failed = interp.diagnostics().len();
    if failed > 0 {
        info!(failed, "some statements were skipped");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        let cli = Cli::parse_from(["vsyc", "-vv", "--max-call-depth", "8", "main.vscc"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.max_call_depth, 8);
        assert_eq!(cli.file, PathBuf::from("main.vscc"));
        assert!(!cli.tokens);
    }

    #[test]
    fn test_extension_gate() {
        assert!(check_extension(Path::new("dir/main.vscc")).is_ok());
        assert!(check_extension(Path::new("main.txt")).is_err());
        assert!(check_extension(Path::new("main")).is_err());
    }
}
