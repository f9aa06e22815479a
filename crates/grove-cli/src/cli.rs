use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "grove",
    about = "Inspect, compare, and repair hierarchical array store files",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List dataset and attributed-group paths in a file
    List(ListArgs),
    /// Print dataset contents and attributes
    Print(PrintArgs),
    /// Compare the contents of two files
    Compare(CompareArgs),
    /// Check that every dataset in a file can be read
    Check(CheckArgs),
    /// Salvage the readable parts of a file into a new one
    Repair(RepairArgs),
    /// Rewrite files through a fresh container
    Repack(RepackArgs),
    /// Copy selected paths from one file to another
    Copy(CopyArgs),
}

#[derive(Args)]
pub struct ListArgs {
    pub file: PathBuf,
    /// Start the listing below this group.
    #[arg(short, long, default_value = "/")]
    pub root: String,
    /// Fold paths deeper than this many levels below the root.
    #[arg(short = 'd', long)]
    pub max_depth: Option<usize>,
    /// Fold these subtrees regardless of depth (repeatable).
    #[arg(short, long)]
    pub fold: Vec<String>,
    /// List datasets only, skip attributed groups.
    #[arg(short = 'D', long)]
    pub datasets: bool,
    /// Keep only paths matching this pattern.
    #[arg(short, long)]
    pub pattern: Option<String>,
    /// Interpret the pattern as a regex instead of a glob.
    #[arg(long, requires = "pattern")]
    pub regex: bool,
    /// Show kind, size, shape, and attribute count per path.
    #[arg(long, conflicts_with_all = ["max_depth", "fold"])]
    pub info: bool,
}

#[derive(Args)]
pub struct PrintArgs {
    pub file: PathBuf,
    /// Paths to print; everything readable when omitted.
    pub paths: Vec<String>,
    /// Treat the given paths as regex patterns.
    #[arg(long)]
    pub regex: bool,
    /// Print attributes too.
    #[arg(short, long)]
    pub attrs: bool,
    /// Print paths and metadata only, skip element data.
    #[arg(long)]
    pub no_data: bool,
    /// Start below this group when no explicit paths are given.
    #[arg(short, long, default_value = "/")]
    pub root: String,
}

#[derive(Args)]
pub struct CompareArgs {
    pub source: PathBuf,
    pub other: PathBuf,
    /// A path renamed between the files: `-r OLD NEW` (repeatable).
    #[arg(
        short = 'r',
        long = "renamed",
        num_args = 2,
        value_names = ["OLD", "NEW"],
        action = clap::ArgAction::Append,
    )]
    pub renamed: Vec<String>,
    /// Absolute tolerance for float comparison; 0 means bit equality.
    #[arg(short, long, default_value_t = 0.0)]
    pub tolerance: f64,
    /// Compare presence only, skip content.
    #[arg(long)]
    pub shallow: bool,
    /// Compare datasets only, skip attributed groups.
    #[arg(short = 'D', long)]
    pub datasets: bool,
    /// Exclude paths deeper than this many levels from the comparison.
    #[arg(short = 'd', long)]
    pub max_depth: Option<usize>,
    /// Exclude these subtrees from the comparison (repeatable).
    #[arg(short, long)]
    pub fold: Vec<String>,
}

#[derive(Args)]
pub struct CheckArgs {
    pub file: PathBuf,
    /// Only enumerate the tree, do not read dataset contents.
    #[arg(long)]
    pub basic: bool,
}

#[derive(Args)]
pub struct RepairArgs {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Overwrite the destination file if it already exists.
    #[arg(short = 'f', long)]
    pub force: bool,
}

#[derive(Args)]
pub struct RepackArgs {
    /// Files to rewrite in place.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
    /// Recompress at a higher zstd level.
    #[arg(short, long)]
    pub compress: bool,
}

#[derive(Args)]
pub struct CopyArgs {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Paths to copy; groups are copied with their whole subtree.
    #[arg(required = true)]
    pub paths: Vec<String>,
    /// Place copied paths under this destination prefix.
    #[arg(long, default_value = "/")]
    pub to: String,
    /// Skip paths whose destination already exists (default is to fail).
    #[arg(long, conflicts_with = "overwrite")]
    pub skip: bool,
    /// Overwrite destinations that already exist.
    #[arg(long)]
    pub overwrite: bool,
    /// Show what would be copied without writing anything.
    #[arg(long)]
    pub dry_run: bool,
}
