use capsule_core::collection::{SortKey, StatusFilter};
use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "capsule", about = "Browse and mine the time capsule ledger")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Ledger service base URL. Overrides config and CAPSULE_API_BASE_URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List capsules with search, status filter and ordering.
    Capsules(CapsulesArgs),
    /// Show ledger statistics and blocks.
    Chain(ChainArgs),
    /// Seal a new capsule.
    Create(CreateArgs),
    /// Mine pending capsules into a new block.
    Mine,
    /// Show network status.
    Status,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CapsulesArgs {
    /// Case-insensitive match against sender or message.
    #[arg(long, default_value = "")]
    pub search: String,

    /// all | unlocked | locked
    #[arg(long, default_value = "all")]
    pub status: StatusFilter,

    /// newest | oldest | unlock-date
    #[arg(long, default_value = "newest")]
    pub sort: SortKey,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ChainArgs {
    /// Only show the last N blocks.
    #[arg(long)]
    pub last: Option<usize>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CreateArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub message: String,

    /// RFC 3339, `YYYY-MM-DDTHH:MM` (UTC) or `YYYY-MM-DD`.
    #[arg(long)]
    pub unlock_date: String,

    /// Keep the message hidden even after it unlocks.
    #[arg(long)]
    pub private: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parses_capsules_filters() {
        let args = Args::try_parse_from([
            "capsule", "capsules", "--search", "ada", "--status", "locked", "--sort", "unlock-date",
        ])
        .unwrap();
        match args.command {
            Commands::Capsules(c) => {
                assert_eq!(c.search, "ada");
                assert_eq!(c.status, StatusFilter::Locked);
                assert_eq!(c.sort, SortKey::UnlockDate);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "capsule", "status", "--format", "json", "--base-url", "http://ledger:5000",
        ])
        .unwrap();
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.base_url.as_deref(), Some("http://ledger:5000"));
    }

    #[test]
    fn test_rejects_unknown_sort() {
        assert!(Args::try_parse_from(["capsule", "capsules", "--sort", "random"]).is_err());
    }
}
