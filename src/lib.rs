//! lhcbdata: LHCb dataset handling.
//!
//! A dataset is an ordered list of logical (LFN) and physical (PFN) file
//! references used as the input data of an analysis job. This crate provides
//! the dataset model and the operations run against it: set algebra between
//! datasets, replication of LFNs to a storage element, XML catalog
//! generation, Gaudi job options generation and bookkeeping metadata
//! retrieval.
//!
//! # Modules
//!
//! - [`dataset`]: file references, the [`Dataset`] entity and its JSON form
//! - [`setops`]: difference, union, intersection, containment
//! - [`replicate`]: best-effort replication with a single retry pass
//! - [`catalog`]: replica listing and XML catalogs
//! - [`options`]: Gaudi options in the new and old dialects
//! - [`bookkeeping`]: bookkeeping metadata fetch and merge
//! - [`remote`]: the remote command executor contract
//! - [`config`]: site and datatype configuration
//! - [`error`]: error types

pub mod bookkeeping;
pub mod catalog;
pub mod config;
pub mod dataset;
pub mod error;
pub mod logging;
pub mod options;
pub mod remote;
pub mod replicate;
pub mod setops;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

pub use config::Config;
pub use dataset::{DataFile, Dataset, FileKind, Persistency};
pub use error::LhcbDataError;

use dataset::io_json::{read_dataset_json, to_json_string, write_dataset_json};
use remote::ProcessRemote;

/// The lhcbdata CLI application.
#[derive(Parser)]
#[command(name = "lhcbdata")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// YAML configuration file.
    #[arg(long, global = true, env = "LHCBDATA_CONFIG")]
    config: Option<PathBuf>,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Create a dataset from lfn:/pfn: specifiers.
    Create(CreateArgs),
    /// Show the files of a dataset.
    Info(InfoArgs),
    /// Append files to a dataset.
    Extend(ExtendArgs),
    /// Remove a file from a dataset.
    Remove(RemoveArgs),
    /// Print or write Gaudi job options for a dataset.
    Options(OptionsArgs),
    /// Combine two datasets with a set operation.
    Combine(CombineArgs),
    /// Compare two datasets.
    Compare(CompareArgs),
    /// Print the XML catalog of a dataset.
    Catalog(CatalogArgs),
    /// List the replicas of a dataset's LFNs.
    Replicas(DatasetArg),
    /// Replicate a dataset's LFNs to a storage element.
    Replicate(ReplicateArgs),
    /// Fetch bookkeeping metadata for a dataset's LFNs.
    BkMetadata(BkMetadataArgs),
}

#[derive(clap::Args)]
struct DatasetArg {
    /// Dataset JSON file.
    dataset: PathBuf,
}

#[derive(clap::Args)]
struct CreateArgs {
    /// Files, each prefixed with 'lfn:' or 'pfn:'.
    files: Vec<String>,

    /// Ancestor depth for bookkeeping queries.
    #[arg(long, default_value_t = 0)]
    depth: u32,

    /// Persistency technology ('ROOT' or 'POOL').
    #[arg(long)]
    persistency: Option<String>,

    /// Pre-fetched XML catalog slice to use instead of generating one.
    #[arg(long)]
    catalog_slice: Option<PathBuf>,

    /// Reject physical files (for input-sandbox LFN lists).
    #[arg(long)]
    lfns_only: bool,

    /// Output file (prints JSON to stdout if omitted).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
struct InfoArgs {
    /// Dataset JSON file.
    dataset: PathBuf,

    /// Output format ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

#[derive(clap::Args)]
struct ExtendArgs {
    /// Dataset JSON file, rewritten in place unless --output is given.
    dataset: PathBuf,

    /// Files to append, each prefixed with 'lfn:' or 'pfn:'.
    files: Vec<String>,

    /// Skip files whose name is already in the dataset.
    #[arg(long)]
    unique: bool,

    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
struct RemoveArgs {
    /// Dataset JSON file, rewritten in place unless --output is given.
    dataset: PathBuf,

    /// File to remove, prefixed with 'lfn:' or 'pfn:'.
    file: String,

    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
struct OptionsArgs {
    /// Dataset JSON file.
    dataset: PathBuf,

    /// Override the dataset's persistency technology.
    #[arg(long)]
    persistency: Option<String>,

    /// Write the options to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
struct CombineArgs {
    /// 'difference', 'union', 'intersection' or 'symmetric-difference'.
    operation: String,

    /// Left-hand dataset (its depth is kept).
    a: PathBuf,

    /// Right-hand dataset.
    b: PathBuf,

    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
struct CompareArgs {
    a: PathBuf,
    b: PathBuf,

    /// List the files present on only one side.
    #[arg(long)]
    detail: bool,

    /// Maximum number of files listed per side.
    #[arg(long, default_value_t = 20)]
    max_items: usize,

    /// Output format ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

#[derive(clap::Args)]
struct CatalogArgs {
    /// Dataset JSON file.
    dataset: PathBuf,

    /// Site to generate the catalog for (defaults to the configured local site).
    #[arg(long)]
    site: Option<String>,
}

#[derive(clap::Args)]
struct ReplicateArgs {
    /// Dataset JSON file.
    dataset: PathBuf,

    /// Destination storage element.
    #[arg(long, default_value = "")]
    dest_se: String,

    /// Source storage element.
    #[arg(long, default_value = "")]
    src_se: String,

    /// Local cache used by the replication.
    #[arg(long, default_value = "")]
    cache: String,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

#[derive(clap::Args)]
struct BkMetadataArgs {
    /// Dataset JSON file.
    dataset: PathBuf,

    /// Store the fetched metadata back into the dataset file.
    #[arg(long)]
    save: bool,
}

/// Run the lhcbdata CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), LhcbDataError> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let Some(command) = cli.command else {
        println!("lhcbdata {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("LHCb dataset handling.");
        println!();
        println!("Run 'lhcbdata --help' for usage information.");
        return Ok(());
    };

    let config = Config::load_or_default(cli.config.as_deref())?;

    match command {
        Commands::Create(args) => run_create(args),
        Commands::Info(args) => run_info(args),
        Commands::Extend(args) => run_extend(args),
        Commands::Remove(args) => run_remove(args),
        Commands::Options(args) => run_options(args, &config),
        Commands::Combine(args) => run_combine(args),
        Commands::Compare(args) => run_compare(args),
        Commands::Catalog(args) => run_catalog(args, &config),
        Commands::Replicas(args) => run_replicas(args, &config),
        Commands::Replicate(args) => run_replicate(args, &config),
        Commands::BkMetadata(args) => run_bk_metadata(args, &config),
    }
}

fn run_create(args: CreateArgs) -> Result<(), LhcbDataError> {
    let mut dataset = if args.lfns_only {
        let files = args
            .files
            .iter()
            .map(|spec| dataset::parse_lfn_only(spec.trim()))
            .collect::<Result<Vec<_>, _>>()?;
        Dataset::from_files(files)
    } else {
        Dataset::from_specs(args.files.iter().map(|spec| spec.trim()))?
    };

    dataset.depth = args.depth;
    dataset.persistency = args.persistency.map(Persistency::from);
    dataset.xml_catalogue_slice = args.catalog_slice;

    emit_dataset(&dataset, args.output.as_deref())
}

fn run_info(args: InfoArgs) -> Result<(), LhcbDataError> {
    let dataset = read_dataset_json(&args.dataset)?;

    match args.output.as_str() {
        "json" => {
            let summary = serde_json::json!({
                "files": dataset.len(),
                "lfns": dataset.lfns(),
                "pfns": dataset.pfns(),
                "depth": dataset.depth,
                "persistency": dataset.persistency.as_ref().map(Persistency::as_str),
            });
            print_json(&summary)
        }
        _ => {
            println!(
                "{} file(s): {} LFN(s), {} PFN(s)",
                dataset.len(),
                dataset.lfns().len(),
                dataset.pfns().len()
            );
            println!("depth: {}", dataset.depth);
            if let Some(persistency) = &dataset.persistency {
                println!("persistency: {}", persistency);
            }
            for name in dataset.full_file_names() {
                println!("  {}", name);
            }
            Ok(())
        }
    }
}

fn run_extend(args: ExtendArgs) -> Result<(), LhcbDataError> {
    let mut dataset = read_dataset_json(&args.dataset)?;
    dataset.extend(args.files.iter().map(|spec| spec.trim()), args.unique)?;
    write_dataset_json(args.output.as_deref().unwrap_or(&args.dataset), &dataset)
}

fn run_remove(args: RemoveArgs) -> Result<(), LhcbDataError> {
    let mut dataset = read_dataset_json(&args.dataset)?;
    let file = dataset::parse_data_file(args.file.trim())?;
    dataset.remove_file(&file)?;
    write_dataset_json(args.output.as_deref().unwrap_or(&args.dataset), &dataset)
}

fn run_options(args: OptionsArgs, config: &Config) -> Result<(), LhcbDataError> {
    let dataset = read_dataset_json(&args.dataset)?;
    let matcher = options::DatatypeMatcher::from_config(config)?;
    let persistency = args.persistency.map(Persistency::from);

    match args.output {
        Some(path) => {
            options::write_options(&dataset, &matcher, persistency.as_ref(), &path)?;
        }
        None => {
            let text = options::options_string(&dataset, &matcher, persistency.as_ref());
            if !text.is_empty() {
                println!("{}", text);
            }
        }
    }
    Ok(())
}

fn run_combine(args: CombineArgs) -> Result<(), LhcbDataError> {
    let op: setops::SetOp = args.operation.parse()?;
    let a = read_dataset_json(&args.a)?;
    let b = read_dataset_json(&args.b)?;

    let result = setops::combine(op, &a, &b)?;
    emit_dataset(&result, args.output.as_deref())
}

fn run_compare(args: CompareArgs) -> Result<(), LhcbDataError> {
    let a = read_dataset_json(&args.a)?;
    let b = read_dataset_json(&args.b)?;

    let opts = setops::CompareOptions {
        detail: args.detail,
        max_items: args.max_items,
    };
    let report = setops::compare(&a, &b, &opts);

    match args.output.as_str() {
        "json" => print_json(&report),
        _ => {
            print!("{}", report);
            Ok(())
        }
    }
}

fn run_catalog(args: CatalogArgs, config: &Config) -> Result<(), LhcbDataError> {
    let dataset = read_dataset_json(&args.dataset)?;
    // a catalog slice needs no remote
    let xml = if dataset.catalogue_slice_path().is_some() {
        catalog::get_catalog(&dataset, &NoRemote, config, args.site.as_deref())?
    } else {
        let remote = ProcessRemote::from_command_line(&config.remote_command)?;
        catalog::get_catalog(&dataset, &remote, config, args.site.as_deref())?
    };
    print!("{}", xml);
    Ok(())
}

fn run_replicas(args: DatasetArg, config: &Config) -> Result<(), LhcbDataError> {
    let dataset = read_dataset_json(&args.dataset)?;
    let remote = ProcessRemote::from_command_line(&config.remote_command)?;
    let replicas = catalog::get_replicas(&dataset, &remote)?;
    print_json(&replicas)
}

fn run_replicate(args: ReplicateArgs, config: &Config) -> Result<(), LhcbDataError> {
    let dataset = read_dataset_json(&args.dataset)?;
    let remote = ProcessRemote::from_command_line(&config.remote_command)?;
    let report = replicate::replicate(
        &dataset,
        &remote,
        &args.dest_se,
        &args.src_se,
        &args.cache,
    )?;

    match args.output.as_str() {
        "json" => print_json(&report),
        _ => {
            print!("{}", report);
            Ok(())
        }
    }
}

fn run_bk_metadata(args: BkMetadataArgs, config: &Config) -> Result<(), LhcbDataError> {
    let mut dataset = read_dataset_json(&args.dataset)?;
    let remote = ProcessRemote::from_command_line(&config.remote_command)?;
    let metadata = bookkeeping::bk_metadata(&mut dataset, &remote)?;

    if args.save {
        write_dataset_json(&args.dataset, &dataset)?;
    }
    print_json(&metadata)
}

/// Stand-in executor for operations that must not reach the grid.
struct NoRemote;

impl remote::RemoteCommands for NoRemote {
    fn execute(
        &self,
        request: &remote::RemoteRequest,
    ) -> Result<remote::RemoteResult, LhcbDataError> {
        Err(LhcbDataError::InvalidOperation(format!(
            "no remote command configured for '{}'",
            request.name()
        )))
    }
}

fn emit_dataset(dataset: &Dataset, output: Option<&Path>) -> Result<(), LhcbDataError> {
    match output {
        Some(path) => write_dataset_json(path, dataset),
        None => {
            let json = to_json_string(dataset).map_err(|source| {
                LhcbDataError::DatasetJsonWrite {
                    path: PathBuf::from("<stdout>"),
                    source,
                }
            })?;
            println!("{}", json);
            Ok(())
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), LhcbDataError> {
    let json =
        serde_json::to_string_pretty(value).map_err(|source| LhcbDataError::DatasetJsonWrite {
            path: PathBuf::from("<stdout>"),
            source,
        })?;
    println!("{}", json);
    Ok(())
}
