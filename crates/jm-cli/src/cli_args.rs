use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "junit-merger")]
#[command(about = "Merges sharded JUnit XML reports and coverage dumps")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    /// Merges multiple JUnit xml files into one
    Log(LogArgs),
    /// Merges multiple coverage dumps into one report
    Coverage(CoverageArgs),
}

#[derive(Debug, Args)]
pub(crate) struct LogArgs {
    /// The directory containing JUnit xml files
    pub(crate) directory: String,
    /// The file where to write the merged result
    pub(crate) file: String,
}

#[derive(Debug, Args)]
pub(crate) struct CoverageArgs {
    /// The directory containing coverage dumps
    pub(crate) directory: String,
    /// The file where to write the merged result. Default: standard output
    pub(crate) file: Option<String>,
    /// The directory where to write the coverage report in HTML format
    #[arg(long = "html")]
    pub(crate) html: Option<String>,
    #[arg(long = "lowUpperBound", default_value_t = 50)]
    pub(crate) low_upper_bound: u32,
    #[arg(long = "highLowerBound", default_value_t = 90)]
    pub(crate) high_lower_bound: u32,
    /// Export cobertura instead of clover
    #[arg(long = "cobertura")]
    pub(crate) cobertura: bool,
    /// Also print a plain-text summary to standard output
    #[arg(long = "text")]
    pub(crate) text: bool,
}
