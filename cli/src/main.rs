use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use rusqlite::{Connection, OpenFlags};
use schema_reader_codegen::CodeTarget;
use schema_reader_core::{CatalogRows, QueryKind, TableConstraints, TableQuery};
use schema_reader_provider::{
    CatalogConnection, CatalogMirror, CatalogSnapshot, ConnectionTarget, ProviderKind,
    ReaderConfig, ReaderError, SchemaReader, reader_for,
};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "schema-reader")]
#[command(about = "Read constraint metadata from database system catalogs")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Read primary, check, unique and foreign-key constraints.
    Read(ReadArgs),
    /// Print or write the packages.config for a code generation target.
    Packages(PackagesArgs),
    /// Manage a SQLite mirror of the Ingres catalogs.
    Mirror(MirrorArgs),
}

#[derive(Debug, Args)]
struct ReadArgs {
    /// SQLite catalog mirror to read from.
    #[arg(long, conflicts_with_all = ["odbc", "config"])]
    db: Option<PathBuf>,
    /// ODBC connection string for a live server.
    #[arg(long, conflicts_with = "config")]
    odbc: Option<String>,
    /// Reader configuration YAML.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Engine identifier (e.g. ingres, Ingres.Client).
    #[arg(long, default_value = "ingres")]
    provider: String,
    /// Only read constraints of this table.
    #[arg(long)]
    table: Option<String>,
    /// Only read constraints owned by this schema.
    #[arg(long)]
    owner: Option<String>,
    /// Read a single kind: primary-keys, check-constraints,
    /// unique-constraints or foreign-keys.
    #[arg(long)]
    kind: Option<QueryKind>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct PackagesArgs {
    /// Code generation target: entity-framework or fluent-nhibernate.
    #[arg(long)]
    target: CodeTarget,
    /// Directory to write packages.config into (default: print to stdout).
    #[arg(long, conflicts_with = "check")]
    output: Option<PathBuf>,
    /// Print the SHA-256 of the document instead of the document.
    #[arg(long)]
    checksum: bool,
    /// Fail unless the file at this path matches the document exactly.
    #[arg(long)]
    check: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct MirrorArgs {
    #[command(subcommand)]
    operation: MirrorOperation,
}

#[derive(Debug, Subcommand)]
enum MirrorOperation {
    /// Create the catalog tables.
    Init(MirrorDbArgs),
    /// Drop the catalog tables.
    Drop(MirrorDbArgs),
    /// Load an exported catalog snapshot (YAML), creating tables if needed.
    Seed(MirrorSeedArgs),
    /// Show table and row status.
    Status(MirrorDbArgs),
}

#[derive(Debug, Args)]
struct MirrorDbArgs {
    /// Database file path.
    #[arg(long)]
    db: PathBuf,
}

#[derive(Debug, Args)]
struct MirrorSeedArgs {
    /// Database file path.
    #[arg(long)]
    db: PathBuf,
    /// Snapshot YAML with `keys`, `constraints` and `ref_constraints`.
    #[arg(long)]
    snapshot: PathBuf,
}

/// What `read` resolved its flags and config into.
struct ReadPlan {
    provider: ProviderKind,
    target: ConnectionTarget,
    queries: Vec<TableQuery>,
    exclude: Vec<String>,
    kind: Option<QueryKind>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ReadOutput {
    Rows(Vec<CatalogRows>),
    Constraints(Vec<TableConstraints>),
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Read(args) => run_read(args),
        Command::Packages(args) => run_packages(args),
        Command::Mirror(args) => run_mirror(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_read(args: ReadArgs) -> Result<(), String> {
    let plan = read_plan(&args)?;
    let reader = reader_for(plan.provider);
    info!(
        "Reading {} catalog ({} queries)",
        plan.provider,
        plan.queries.len()
    );

    let output = match &plan.target {
        ConnectionTarget::Sqlite(path) => {
            let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
                .map_err(|e| format!("Failed to open database '{}': {e}", path.display()))?;
            read_catalog(reader.as_ref(), &conn, &plan)
        }
        ConnectionTarget::Odbc(connection_string) => {
            read_odbc(reader.as_ref(), connection_string, &plan)
        }
    }
    .map_err(|e| format!("Read failed: {e}"))?;

    let rendered = match args.format {
        CliOutputFormat::Json => serde_json::to_string_pretty(&output)
            .map_err(|e| format!("Failed to serialize output: {e}"))?,
        CliOutputFormat::Yaml => serde_yaml::to_string(&output)
            .map_err(|e| format!("Failed to serialize output: {e}"))?,
    };
    println!("{rendered}");
    Ok(())
}

fn read_plan(args: &ReadArgs) -> Result<ReadPlan, String> {
    if let Some(path) = &args.config {
        let config = ReaderConfig::load(path)
            .map_err(|e| format!("Failed to load config '{}': {e}", path.display()))?;
        // Relative mirror paths are resolved against the config file's directory.
        let target = match config.connection.target().map_err(|e| e.to_string())? {
            ConnectionTarget::Sqlite(db) if db.is_relative() => {
                let base = path.parent().unwrap_or_else(|| Path::new("."));
                ConnectionTarget::Sqlite(base.join(db))
            }
            target => target,
        };
        let owner = args.owner.clone().or_else(|| config.owner.clone());
        let queries = match &args.table {
            Some(table) => vec![TableQuery::table(table.as_str()).owned_by(owner)],
            None if args.owner.is_some() => config
                .table_queries()
                .into_iter()
                .map(|q| TableQuery { owner: owner.clone(), ..q })
                .collect(),
            None => config.table_queries(),
        };
        return Ok(ReadPlan {
            provider: config.provider,
            target,
            queries,
            exclude: config.exclude,
            kind: args.kind,
        });
    }

    let target = match (&args.db, &args.odbc) {
        (Some(path), None) => ConnectionTarget::Sqlite(path.clone()),
        (None, Some(cs)) => ConnectionTarget::Odbc(cs.clone()),
        _ => return Err("one of --db, --odbc or --config is required".to_string()),
    };
    let provider = ProviderKind::from_name(&args.provider).map_err(|e| e.to_string())?;
    let query = TableQuery {
        table: args.table.clone(),
        owner: args.owner.clone(),
    };
    Ok(ReadPlan {
        provider,
        target,
        queries: vec![query],
        exclude: Vec::new(),
        kind: args.kind,
    })
}

fn read_catalog(
    reader: &dyn SchemaReader,
    conn: &dyn CatalogConnection,
    plan: &ReadPlan,
) -> Result<ReadOutput, ReaderError> {
    let keep = |table: &str| !plan.exclude.iter().any(|t| t == table);

    if let Some(kind) = plan.kind {
        let mut results = Vec::with_capacity(plan.queries.len());
        for query in &plan.queries {
            let mut rows = reader.read(kind, conn, query)?;
            rows.retain_tables(keep);
            debug!("{:?}: {} {} rows", query.table, rows.len(), kind);
            results.push(rows);
        }
        return Ok(ReadOutput::Rows(results));
    }

    let mut results = Vec::with_capacity(plan.queries.len());
    for query in &plan.queries {
        let mut constraints = reader.read_constraints(conn, query)?;
        constraints.retain_tables(keep);
        debug!("{:?}: {} rows", query.table, constraints.row_count());
        results.push(constraints);
    }
    Ok(ReadOutput::Constraints(results))
}

#[cfg(feature = "odbc")]
fn read_odbc(
    reader: &dyn SchemaReader,
    connection_string: &str,
    plan: &ReadPlan,
) -> Result<ReadOutput, ReaderError> {
    schema_reader_provider::with_odbc_connection(connection_string, |conn| {
        read_catalog(reader, conn, plan)
    })
}

#[cfg(not(feature = "odbc"))]
fn read_odbc(
    _reader: &dyn SchemaReader,
    _connection_string: &str,
    _plan: &ReadPlan,
) -> Result<ReadOutput, ReaderError> {
    Err(ReaderError::InvalidConfig(
        "ODBC support is not compiled in; rebuild with --features odbc".to_string(),
    ))
}

fn run_packages(args: PackagesArgs) -> Result<(), String> {
    let manifest = args.target.manifest();

    if let Some(path) = &args.check {
        manifest
            .verify(path)
            .map_err(|e| format!("Manifest check failed: {e}"))?;
        println!("{} matches {} packages.config", path.display(), args.target);
        return Ok(());
    }

    if let Some(dir) = &args.output {
        let path = manifest
            .save(dir)
            .map_err(|e| format!("Failed to write manifest to '{}': {e}", dir.display()))?;
        println!("Wrote {}", path.display());
        if args.checksum {
            println!("sha256: {}", manifest.checksum());
        }
        return Ok(());
    }

    if args.checksum {
        println!("{}", manifest.checksum());
    } else {
        print!("{}", manifest.render());
    }
    Ok(())
}

fn run_mirror(args: MirrorArgs) -> Result<(), String> {
    match args.operation {
        MirrorOperation::Init(a) => run_mirror_init(a),
        MirrorOperation::Drop(a) => run_mirror_drop(a),
        MirrorOperation::Seed(a) => run_mirror_seed(a),
        MirrorOperation::Status(a) => run_mirror_status(a),
    }
}

fn open_mirror_db(db: &Path) -> Result<Connection, String> {
    Connection::open(db).map_err(|e| format!("Failed to open database '{}': {e}", db.display()))
}

fn run_mirror_init(args: MirrorDbArgs) -> Result<(), String> {
    let conn = open_mirror_db(&args.db)?;
    schema_reader_provider::create_mirror(&conn)
        .map_err(|e| format!("Mirror init failed: {e}"))?;
    println!("Catalog tables created in '{}'.", args.db.display());
    Ok(())
}

fn run_mirror_drop(args: MirrorDbArgs) -> Result<(), String> {
    let conn = open_mirror_db(&args.db)?;
    schema_reader_provider::drop_mirror(&conn)
        .map_err(|e| format!("Mirror drop failed: {e}"))?;
    println!("Catalog tables dropped from '{}'.", args.db.display());
    Ok(())
}

fn run_mirror_seed(args: MirrorSeedArgs) -> Result<(), String> {
    let snapshot = CatalogSnapshot::load(&args.snapshot).map_err(|e| {
        format!(
            "Failed to load snapshot '{}': {e}",
            args.snapshot.display()
        )
    })?;
    let conn = open_mirror_db(&args.db)?;
    let mirror = CatalogMirror::new(&conn);
    mirror
        .create()
        .map_err(|e| format!("Mirror init failed: {e}"))?;
    let report = mirror
        .seed(&snapshot)
        .map_err(|e| format!("Seed failed: {e}"))?;
    println!("Seed complete:");
    println!("  iikeys rows inserted: {}", report.keys);
    println!("  iiconstraints rows inserted: {}", report.constraints);
    println!(
        "  iiref_constraints rows inserted: {}",
        report.ref_constraints
    );
    Ok(())
}

fn run_mirror_status(args: MirrorDbArgs) -> Result<(), String> {
    let conn = open_mirror_db(&args.db)?;
    let status = schema_reader_provider::mirror_status(&conn)
        .map_err(|e| format!("Failed to get mirror status: {e}"))?;
    println!("Mirror Status:");
    println!(
        "  Tables exist: {}",
        if status.tables_exist { "yes" } else { "no" }
    );
    println!("  iikeys rows: {}", status.key_count);
    println!("  iiconstraints rows: {}", status.constraint_count);
    println!("  iiref_constraints rows: {}", status.ref_constraint_count);
    Ok(())
}
