use clap::{Parser, Subcommand};

/// Call audit reporting: turns uploaded audit workbooks into team and RM statistics.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with the directories and report defaults.
    /// See the manual for the accepted keys.
    #[clap(short, long, global = true, value_parser)]
    pub config: Option<String>,

    /// (directory, default uploads) Where uploaded workbooks are stored.
    /// Overrides the value from the --config file.
    #[clap(long, global = true, value_parser)]
    pub uploads_dir: Option<String>,

    /// (directory, default reports) Where reports and the status log are written.
    /// Overrides the value from the --config file.
    #[clap(long, global = true, value_parser)]
    pub reports_dir: Option<String>,

    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, global = true, takes_value = false)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Stores a workbook (.xlsx, .xls or .xlsm) in the uploads directory and prints its stored name.
    Upload {
        #[clap(value_parser)]
        file: String,
    },
    /// Generates a report from an uploaded workbook.
    Report(ReportArgs),
    /// Appends one scoring form (a JSON object) to the status log.
    SaveStatus {
        /// (file path or '-') The JSON payload. Read from the standard input when absent.
        #[clap(short, long, value_parser)]
        payload: Option<String>,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct ReportArgs {
    /// (file path, optional) The workbook to read. When neither this option nor --filename is given,
    /// the most recent upload is used.
    #[clap(short, long, value_parser, conflicts_with = "filename")]
    pub input: Option<String>,

    /// (file name, optional) The stored name of an upload, as printed by the upload command.
    #[clap(short, long, value_parser)]
    pub filename: Option<String>,

    /// (full, team or rm; default full) The report to generate.
    #[clap(short, long, value_parser)]
    pub mode: Option<String>,

    /// (file path or 'stdout') Where the report is written in JSON format.
    /// When absent or empty, a time-stamped file is created in the reports directory.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference report in JSON format. If provided, the generated report must match it.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (default 5) The number of RMs in the top and bottom lists of the rm report.
    #[clap(long, value_parser)]
    pub top: Option<usize>,

    /// (team, rm or duration; repeatable) Columns that must be present in the workbook.
    #[clap(long, value_parser)]
    pub require: Vec<String>,

    /// (default: first worksheet) The name of the worksheet to read.
    #[clap(long, value_parser)]
    pub worksheet: Option<String>,
}
