//! CLI argument parsing.

use clap::Parser;

/// Covenant - extract structured contract data from filed documents.
#[derive(Debug, Parser)]
#[command(name = "covenant")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Number of concurrent extraction workers
    #[arg(long, default_value_t = 5)]
    pub workers: usize,

    /// Records per bulk insert to the structured store
    #[arg(long, default_value_t = 100)]
    pub batch_size: usize,

    /// Reprocess all documents, including those already ingested
    #[arg(long)]
    pub reprocess_all: bool,

    /// Object prefix to enumerate (overrides COVENANT_PREFIX)
    #[arg(long)]
    pub prefix: Option<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["covenant"]);
        assert_eq!(cli.workers, 5);
        assert_eq!(cli.batch_size, 100);
        assert!(!cli.reprocess_all);
        assert!(cli.prefix.is_none());
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::parse_from([
            "covenant",
            "--workers",
            "10",
            "--batch-size",
            "50",
            "--reprocess-all",
            "--prefix",
            "2020/",
        ]);
        assert_eq!(cli.workers, 10);
        assert_eq!(cli.batch_size, 50);
        assert!(cli.reprocess_all);
        assert_eq!(cli.prefix.as_deref(), Some("2020/"));
    }
}
