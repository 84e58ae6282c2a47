use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "insights-api")]
#[command(about = "Engagement insights and coaching questions for team chat members", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve,
    /// Create or upgrade the database schema
    InitDb,
    /// Import channels, users, and messages from a chat export directory
    ImportSlack {
        #[arg(long)]
        path: PathBuf,
    },
    /// Check connectivity to the store and third-party services
    Probe {
        #[arg(long)]
        export_path: Option<PathBuf>,
        /// Write the built-in dummy dataset here when no export is used
        #[arg(long)]
        dummy_out: Option<PathBuf>,
    },
    /// Print per-user engagement metrics computed from a chat export
    DeriveMetrics {
        #[arg(long)]
        path: PathBuf,
    },
    /// Generate questions or an insight for one member and print it
    #[command(group(
        ArgGroup::new("source")
            .args(["metrics", "export"])
            .required(true)
            .multiple(false)
    ))]
    Analyze {
        #[arg(long)]
        user_id: String,
        /// JSON file holding the member's engagement metrics
        #[arg(long)]
        metrics: Option<PathBuf>,
        /// Chat export directory; the member's metrics are derived from it
        #[arg(long)]
        export: Option<PathBuf>,
        /// underperforming, overperforming, silent_quitting, custom, or insights;
        /// classified automatically when omitted
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long)]
        custom_request: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "insights-api",
            "analyze",
            "--user-id",
            "U123456",
            "--metrics",
            "metrics.json",
            "--type",
            "custom",
            "--custom-request",
            "workload check",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze {
                user_id,
                kind,
                custom_request,
                ..
            } => {
                assert_eq!(user_id, "U123456");
                assert_eq!(kind.as_deref(), Some("custom"));
                assert_eq!(custom_request.as_deref(), Some("workload check"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_analyze_needs_exactly_one_metrics_source() {
        let base = ["insights-api", "analyze", "--user-id", "U1"];
        assert!(Cli::try_parse_from(base).is_err());

        let both = [&base[..], &["--metrics", "m.json", "--export", "export/"][..]].concat();
        assert!(Cli::try_parse_from(both).is_err());

        let export = [&base[..], &["--export", "export/"][..]].concat();
        match Cli::try_parse_from(export).unwrap().command {
            Commands::Analyze {
                metrics, export, ..
            } => {
                assert!(metrics.is_none());
                assert_eq!(export, Some(PathBuf::from("export/")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_import_requires_path() {
        assert!(Cli::try_parse_from(["insights-api", "import-slack"]).is_err());
    }

    #[test]
    fn test_probe_options_are_optional() {
        let cli = Cli::try_parse_from(["insights-api", "probe"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Probe {
                export_path: None,
                dummy_out: None
            }
        ));
    }
}
