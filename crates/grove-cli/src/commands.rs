use std::path::Path as FsPath;
use std::process::ExitCode;

use anyhow::{bail, Context};
use colored::Colorize;

use grove_copy::{copy, repack, repair, ConflictPolicy, CopySpec};
use grove_diff::{deep_diff, diff, PathSet, RenameMap};
use grove_path::Path;
use grove_store::{FileStore, HierStore, NodeKind, OpenMode};
use grove_walk::{
    attributed_groups, folded, verify, walk, FoldSpec, PathFilter, PatternMode, Unreadable,
    WalkKind,
};

use crate::cli::*;

/// Whether a command found what it was looking for.
///
/// `Findings` is not an error: the command ran to completion but reported
/// differences (compare) or unreadable paths (check), and the process exits 1
/// so scripts can branch on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Clean,
    Findings,
}

impl Outcome {
    fn exit_code(self) -> ExitCode {
        match self {
            Self::Clean => ExitCode::SUCCESS,
            Self::Findings => ExitCode::FAILURE,
        }
    }
}

pub fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    let outcome = match cli.command {
        Command::List(args) => cmd_list(args),
        Command::Print(args) => cmd_print(args),
        Command::Compare(args) => cmd_compare(args),
        Command::Check(args) => cmd_check(args),
        Command::Repair(args) => cmd_repair(args),
        Command::Repack(args) => cmd_repack(args),
        Command::Copy(args) => cmd_copy(args),
    }?;
    Ok(outcome.exit_code())
}

fn open_read(file: &FsPath) -> anyhow::Result<FileStore> {
    FileStore::open(file, OpenMode::Read)
        .with_context(|| format!("cannot open {}", file.display()))
}

fn parse_path(raw: &str) -> anyhow::Result<Path> {
    Ok(Path::parse(raw)?)
}

fn parse_paths(raw: &[String]) -> anyhow::Result<Vec<Path>> {
    raw.iter().map(|r| parse_path(r)).collect()
}

/// Datasets below `root`, plus attributed groups unless `datasets_only`,
/// sorted ascending.
fn collected(store: &dyn HierStore, root: &Path, datasets_only: bool) -> Vec<Path> {
    let mut paths = walk(store, root, WalkKind::Datasets).into_paths();
    if !datasets_only {
        paths.extend(attributed_groups(store, root));
    }
    paths.sort();
    paths
}

fn report_unreadable(items: &[Unreadable]) {
    for item in items {
        eprintln!("{}: {}", item.path.to_string().red().bold(), item.reason);
    }
}

// --- list ---

fn cmd_list(args: ListArgs) -> anyhow::Result<Outcome> {
    let store = open_read(&args.file)?;
    let root = parse_path(&args.root)?;

    let scan = walk(&store, &root, WalkKind::Datasets);
    report_unreadable(scan.unreadable());

    let mut paths = scan.into_paths();
    if !args.datasets {
        paths.extend(attributed_groups(&store, &root));
    }
    paths.sort();

    if let Some(pattern) = &args.pattern {
        let mode = if args.regex {
            PatternMode::Regex
        } else {
            PatternMode::Glob
        };
        let filter = PathFilter::compile(pattern, mode)?;
        paths.retain(|path| filter.is_match(path));
    }

    if args.info {
        print_info(&store, &paths);
        return Ok(Outcome::Clean);
    }

    let spec = FoldSpec {
        max_depth: args.max_depth,
        prefixes: parse_paths(&args.fold)?,
    };
    for line in folded(&paths, &root, &spec) {
        println!("{line}");
    }
    Ok(Outcome::Clean)
}

fn print_info(store: &dyn HierStore, paths: &[Path]) {
    let header = ["path", "kind", "size", "shape", "attrs"].map(String::from);
    let mut rows = vec![header];
    for path in paths {
        let kind = match store.kind_of(path) {
            Ok(Some(kind)) => kind,
            _ => continue,
        };
        let attrs = store.read_attrs(path).map(|a| a.len()).unwrap_or(0);
        let (size, shape) = match kind {
            NodeKind::Dataset => match store.read_dataset(path) {
                Ok(value) => (value.len().to_string(), format_shape(value.shape())),
                Err(_) => ("?".into(), "?".into()),
            },
            NodeKind::Group => ("-".into(), "-".into()),
        };
        rows.push([
            path.to_string(),
            kind.to_string(),
            size,
            shape,
            attrs.to_string(),
        ]);
    }

    let mut widths = [0usize; 5];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }
    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        println!("{}", cells.join("  ").trim_end());
    }
}

fn format_shape(shape: &[usize]) -> String {
    if shape.is_empty() {
        return "scalar".into();
    }
    let dims: Vec<String> = shape.iter().map(ToString::to_string).collect();
    dims.join("x")
}

// --- print ---

fn cmd_print(args: PrintArgs) -> anyhow::Result<Outcome> {
    let store = open_read(&args.file)?;
    let root = parse_path(&args.root)?;

    let targets = if args.paths.is_empty() {
        collected(&store, &root, false)
    } else if args.regex {
        let all = collected(&store, &root, false);
        let mut matched = Vec::new();
        for pattern in &args.paths {
            let filter = PathFilter::compile(pattern, PatternMode::Regex)?;
            for path in &all {
                if filter.is_match(path) {
                    matched.push(path.clone());
                }
            }
        }
        matched.sort();
        matched.dedup();
        if matched.is_empty() {
            bail!("no paths match");
        }
        matched
    } else {
        let paths = parse_paths(&args.paths)?;
        for path in &paths {
            if !store.exists(path)? {
                bail!("{path}: no such path in {}", args.file.display());
            }
        }
        paths
    };

    let with_header = targets.len() > 1;
    for path in &targets {
        print_node(&store, path, &args, with_header)?;
    }
    Ok(Outcome::Clean)
}

fn print_node(
    store: &dyn HierStore,
    path: &Path,
    args: &PrintArgs,
    with_header: bool,
) -> anyhow::Result<()> {
    let kind = store
        .kind_of(path)?
        .ok_or_else(|| anyhow::anyhow!("{path}: no such path"))?;
    let indent = if with_header { "  " } else { "" };
    if with_header {
        println!("{}", path.to_string().cyan().bold());
    }
    if args.attrs || kind == NodeKind::Group {
        for (name, value) in store.read_attrs(path)? {
            println!("{indent}{} : {}", name.yellow(), value);
        }
    }
    if kind == NodeKind::Dataset && !args.no_data {
        let value = store.read_dataset(path)?;
        println!("{indent}{value}");
    }
    Ok(())
}

// --- compare ---

fn cmd_compare(args: CompareArgs) -> anyhow::Result<Outcome> {
    let store_a = open_read(&args.source)?;
    let store_b = open_read(&args.other)?;
    let renames = parse_renames(&args.renamed)?;
    let exclude = FoldSpec {
        max_depth: args.max_depth,
        prefixes: parse_paths(&args.fold)?,
    };

    let (a, bad_a) = compare_set(&store_a, args.datasets, &exclude);
    let (b, bad_b) = compare_set(&store_b, args.datasets, &exclude);
    report_unreadable(&bad_a);
    report_unreadable(&bad_b);

    let result = if args.shallow {
        diff(&a, &b, &renames)?
    } else {
        deep_diff(&store_a, &store_b, &a, &b, &renames, args.tolerance)?
    };

    if result.is_empty() {
        println!("{}", "files match".green().bold());
        return Ok(Outcome::Clean);
    }
    for path in &result.only_in_source {
        println!("{} {}", path.to_string().red().bold(), "->".red());
    }
    for path in &result.only_in_other {
        println!("{} {}", "<-".green(), path.to_string().green().bold());
    }
    for path in &result.unequal_content {
        // unequal_content holds the post-rename form; recover the source
        // name, but only for renames that were actually applied.
        let left = renames
            .source_of(path)
            .filter(|old| a.contains(*old))
            .unwrap_or(path);
        println!(
            "{} {} {}",
            left.to_string().cyan().bold(),
            "!=".cyan(),
            path.to_string().cyan().bold(),
        );
    }
    Ok(Outcome::Findings)
}

fn parse_renames(raw: &[String]) -> anyhow::Result<RenameMap> {
    let mut renames = RenameMap::new();
    for pair in raw.chunks_exact(2) {
        renames.push(parse_path(&pair[0])?, parse_path(&pair[1])?)?;
    }
    Ok(renames)
}

/// Build one side of a comparison: the path set plus any subtrees the scan
/// could not read, so the caller can surface them instead of letting a
/// corrupted region masquerade as a plain presence difference.
fn compare_set(
    store: &dyn HierStore,
    datasets_only: bool,
    exclude: &FoldSpec,
) -> (PathSet, Vec<Unreadable>) {
    let root = Path::root();
    let scan = walk(store, &root, WalkKind::Datasets);
    let unreadable = scan.unreadable().to_vec();
    let mut paths = scan.into_paths();
    if !datasets_only {
        paths.extend(attributed_groups(store, &root));
    }
    let set = paths
        .into_iter()
        .filter(|path| !is_excluded(path, &root, exclude))
        .collect();
    (set, unreadable)
}

fn is_excluded(path: &Path, root: &Path, spec: &FoldSpec) -> bool {
    spec.prefixes.iter().any(|prefix| path.starts_with(prefix))
        || spec
            .max_depth
            .is_some_and(|depth| path.depth() > root.depth() + depth)
}

// --- check ---

fn cmd_check(args: CheckArgs) -> anyhow::Result<Outcome> {
    let store = open_read(&args.file)?;
    let scan = walk(&store, &Path::root(), WalkKind::Datasets);

    let mut bad = scan.unreadable().to_vec();
    if !args.basic {
        bad.extend(verify(&store, scan.paths()).unreadable);
    }

    if bad.is_empty() {
        println!("{}", format!("{}: ok", args.file.display()).green());
        Ok(Outcome::Clean)
    } else {
        report_unreadable(&bad);
        Ok(Outcome::Findings)
    }
}

// --- repair ---

fn cmd_repair(args: RepairArgs) -> anyhow::Result<Outcome> {
    if args.destination.exists() && !args.force {
        bail!(
            "{} exists, pass --force to overwrite",
            args.destination.display()
        );
    }
    let source = open_read(&args.source)?;
    let dest = FileStore::open(&args.destination, OpenMode::Truncate)
        .with_context(|| format!("cannot create {}", args.destination.display()))?;

    let report = repair(&source, &dest)?;
    dest.save()?;

    println!(
        "salvaged {} paths into {}",
        report.salvaged.len().to_string().bold(),
        args.destination.display()
    );
    report_unreadable(&report.dropped);
    Ok(if report.is_complete() {
        Outcome::Clean
    } else {
        Outcome::Findings
    })
}

// --- repack ---

fn cmd_repack(args: RepackArgs) -> anyhow::Result<Outcome> {
    for file in &args.files {
        let report = repack(file, args.compress)
            .with_context(|| format!("cannot repack {}", file.display()))?;
        println!(
            "{}: rewrote {} paths",
            file.display(),
            report.copied.len().to_string().bold()
        );
    }
    Ok(Outcome::Clean)
}

// --- copy ---

fn cmd_copy(args: CopyArgs) -> anyhow::Result<Outcome> {
    let source = open_read(&args.source)?;
    let prefix = parse_path(&args.to)?;

    // Expand group arguments to their subtree so `copy a.grv b.grv /g`
    // behaves like a recursive copy.
    let mut selected = Vec::new();
    for raw in &args.paths {
        let path = parse_path(raw)?;
        match source.kind_of(&path)? {
            Some(NodeKind::Dataset) => selected.push(path),
            Some(NodeKind::Group) => {
                selected.push(path.clone());
                let sub = walk(&source, &path, WalkKind::Datasets);
                report_unreadable(sub.unreadable());
                selected.extend(sub.into_paths());
                selected.extend(attributed_groups(&source, &path));
            }
            None => bail!("{path}: no such path in {}", args.source.display()),
        }
    }

    let spec = if prefix.is_root() {
        CopySpec::mirror(selected)
    } else {
        CopySpec::under_prefix(selected, &prefix)
    };

    if args.dry_run {
        for (dest, src) in spec.iter() {
            println!("{src} {} {dest}", "->".bold());
        }
        return Ok(Outcome::Clean);
    }

    let mode = if args.destination.exists() {
        OpenMode::ReadWrite
    } else {
        OpenMode::Truncate
    };
    let dest = FileStore::open(&args.destination, mode)
        .with_context(|| format!("cannot open {}", args.destination.display()))?;

    let policy = if args.overwrite {
        ConflictPolicy::Overwrite
    } else if args.skip {
        ConflictPolicy::Skip
    } else {
        ConflictPolicy::Fail
    };
    let report = copy(&spec, &source, &dest, policy)?;
    dest.save()?;

    println!(
        "copied {} paths, skipped {}",
        report.copied.len().to_string().bold(),
        report.skipped.len()
    );
    Ok(Outcome::Clean)
}
