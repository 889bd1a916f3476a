//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;

/// Quiesce - move files and directories once they stop being written
#[derive(Debug, Parser)]
#[command(name = "quiesce")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to watch for write activity
    #[arg(long)]
    pub src: Option<PathBuf>,

    /// Directory settled entries are moved into
    #[arg(long)]
    pub dst: Option<PathBuf>,

    /// Seconds without writes before an entry is moved (default: 120)
    #[arg(long)]
    pub wait: Option<u64>,

    /// Log every received event and timer reset
    #[arg(short, long)]
    pub verbose: bool,

    /// TOML file with src, dst, wait and verbose keys; flags take precedence
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "quiesce", "--src", "/in", "--dst", "/out", "--wait", "30", "-v",
        ])
        .unwrap();

        assert_eq!(cli.src, Some(PathBuf::from("/in")));
        assert_eq!(cli.dst, Some(PathBuf::from("/out")));
        assert_eq!(cli.wait, Some(30));
        assert!(cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_rejects_non_numeric_wait() {
        assert!(Cli::try_parse_from(["quiesce", "--wait", "soon"]).is_err());
    }
}
