use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use extractor_core::ResultTab;

#[derive(Parser, Debug)]
#[command(
    name = "extractor",
    version,
    about = "Upload a product PDF and review the extracted allergens and nutrition"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Base URL of the extraction service")]
    pub base_url: Option<String>,
    #[arg(long, global = true, help = "RON configuration file")]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, help = "Also write logs to this file")]
    pub log_file: Option<PathBuf>,
    #[arg(short, long, global = true, help = "Log at debug level")]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit a document and render the extracted data.
    Extract(ExtractArgs),
    /// Check that the extraction service is up.
    Health,
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Document to submit.
    pub path: PathBuf,
    #[arg(long, help = "Declared content type (guessed from the extension when omitted)")]
    pub content_type: Option<String>,
    #[arg(long, value_enum, default_value_t = TabArg::Overview)]
    pub tab: TabArg,
    #[arg(long, help = "Print the raw result as JSON")]
    pub json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TabArg {
    Overview,
    Allergens,
    Nutrition,
    Raw,
}

impl From<TabArg> for ResultTab {
    fn from(tab: TabArg) -> Self {
        match tab {
            TabArg::Overview => ResultTab::Overview,
            TabArg::Allergens => ResultTab::Allergens,
            TabArg::Nutrition => ResultTab::Nutrition,
            TabArg::Raw => ResultTab::Raw,
        }
    }
}
