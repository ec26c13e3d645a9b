use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "card-gallery",
    version,
    about = "Search cards and render cached thumbnails",
    long_about = None
)]
pub struct CliArgs {
    /// Search query, e.g. `t:goblin c:r`.
    #[arg(value_name = "QUERY")]
    pub query: Option<String>,

    /// Result page to show.
    #[arg(short, long, default_value_t = 1)]
    pub page: u32,

    /// Only keep cards with this name (repeatable). Walks every result page.
    #[arg(long = "only", value_name = "NAME")]
    pub only: Vec<String>,

    /// Also load the large image and text of the card at this index.
    #[arg(long, value_name = "INDEX")]
    pub detail: Option<usize>,

    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Image cache directory.
    #[arg(long, value_name = "PATH", env = "CARD_GALLERY_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Maximum concurrent image jobs.
    #[arg(long)]
    pub max_workers: Option<usize>,

    /// Thumbnail width in pixels.
    #[arg(long)]
    pub thumb_width: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_and_filters() {
        let args = CliArgs::parse_from([
            "card-gallery",
            "--only",
            "Opt",
            "--only",
            "Ponder",
            "--page",
            "3",
            "t:instant",
        ]);
        assert_eq!(args.query.as_deref(), Some("t:instant"));
        assert_eq!(args.only, vec!["Opt".to_string(), "Ponder".to_string()]);
        assert_eq!(args.page, 3);
        assert!(args.detail.is_none());
    }

    #[test]
    fn test_defaults() {
        let args = CliArgs::parse_from(["card-gallery"]);
        assert!(args.query.is_none());
        assert_eq!(args.page, 1);
        assert!(args.only.is_empty());
    }
}
