//! vschema: render and rewrite virtual schema push-down queries
//!
//! # Usage
//!
//! ```bash
//! # Render a push-down request for SQL Server
//! vschema render --dialect sqlserver --request query.json -p CONNECTION_NAME=MSSQL
//!
//! # Wrap it for delivery, describing result columns through a live connection
//! vschema rewrite --dialect postgresql --request query.json -p CONNECTION_NAME=PG \
//!     --database-url postgres://localhost/db
//!
//! # Map a native type
//! vschema map-type --dialect oracle --jdbc-type 2 --type-name NUMBER --precision 40
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};
use colored::*;
use tracing_subscriber::EnvFilter;
use vschema::prelude::*;

#[derive(Parser)]
#[command(name = "vschema")]
#[command(version)]
#[command(about = "Dialect SQL generation for virtual schemas", long_about = None)]
#[command(after_help = "EXAMPLES:
    vschema render --dialect exasol --request query.json -p IS_LOCAL=TRUE
    vschema rewrite --dialect bigquery --request query.json --database-url postgres://localhost/db
    vschema dialects --capabilities")]
struct Cli {
    /// Log filter, e.g. `debug` or `vschema=trace`
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Target {
    /// SQL dialect, e.g. EXASOL, POSTGRESQL, SQLSERVER
    #[arg(short, long, env = "SQL_DIALECT")]
    dialect: String,

    /// Adapter property as KEY=VALUE (repeatable)
    #[arg(short = 'p', long = "property")]
    properties: Vec<String>,

    /// TOML file with adapter properties (defaults to <config dir>/vschema/adapter.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the push-down SQL for a request
    Render {
        #[command(flatten)]
        target: Target,

        /// Push-down request as JSON
        #[arg(short, long)]
        request: PathBuf,
    },
    /// Print the statement delivered to the host
    Rewrite {
        #[command(flatten)]
        target: Target,

        /// Push-down request as JSON
        #[arg(short, long)]
        request: PathBuf,

        /// Foreign database, needed for IMPORT column descriptions and materialization
        #[arg(long, env = "VSCHEMA_DATABASE_URL")]
        database_url: Option<String>,

        /// Address of the connection named in CONNECTION_NAME
        #[arg(long)]
        named_address: Option<String>,

        /// User of the connection named in CONNECTION_NAME
        #[arg(long)]
        named_user: Option<String>,

        /// Password of the connection named in CONNECTION_NAME
        #[arg(long, env = "VSCHEMA_NAMED_PASSWORD")]
        named_password: Option<String>,
    },
    /// List the built-in dialects
    Dialects {
        /// Also list each dialect's capabilities
        #[arg(long)]
        capabilities: bool,
    },
    /// Map a native type descriptor to its portable type
    MapType {
        #[command(flatten)]
        target: Target,

        /// JDBC type code, e.g. 12 for VARCHAR
        #[arg(long, allow_hyphen_values = true)]
        jdbc_type: i32,

        /// Native type name
        #[arg(long, default_value = "")]
        type_name: String,

        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        precision: i32,

        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        scale: i32,

        /// Size in bytes, used to tell ASCII from UTF8 columns
        #[arg(long)]
        byte_size: Option<i32>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Render { target, request } => {
            let properties = load_properties(&target)?;
            init_logging(cli.log_level.as_deref(), &properties);
            let rewriter = rewriter(&target, properties.clone())?;
            let request = load_request(&request)?;
            let context = request.render_context(&properties)?;
            let sql = rewriter.push_down_sql(&request.statement, &context)?;
            println!("{}", sql);
        }
        Commands::Rewrite {
            target,
            request,
            database_url,
            named_address,
            named_user,
            named_password,
        } => {
            let properties = load_properties(&target)?;
            init_logging(cli.log_level.as_deref(), &properties);
            let rewriter = rewriter(&target, properties.clone())?;
            let request = load_request(&request)?;
            let context = request.render_context(&properties)?;
            let named = match (named_address, named_user, named_password) {
                (None, None, None) => None,
                (address, user, password) => Some(ConnectionInformation::new(
                    address.unwrap_or_default(),
                    user.unwrap_or_default(),
                    password.unwrap_or_default(),
                )),
            };
            let connection: Box<dyn ForeignConnection> = match database_url {
                Some(url) => Box::new(SqlxForeignConnection::connect(&url).await?),
                None => Box::new(Offline),
            };
            eprintln!("{} {:?}", "Strategy:".dimmed(), rewriter.strategy());
            let sql = rewriter
                .rewrite(&request.statement, &context, connection.as_ref(), named.as_ref())
                .await?;
            println!("{}", sql);
        }
        Commands::Dialects { capabilities } => {
            init_logging(cli.log_level.as_deref(), &AdapterProperties::new());
            list_dialects(capabilities)?;
        }
        Commands::MapType {
            target,
            jdbc_type,
            type_name,
            precision,
            scale,
            byte_size,
        } => {
            let properties = load_properties(&target)?;
            init_logging(cli.log_level.as_deref(), &properties);
            let dialect = DialectRegistry::builtin().get(&target.dialect)?;
            let generator = dialect.generator(&properties)?;
            let descriptor = NativeTypeDescriptor::new(jdbc_type, type_name)
                .with_precision(precision, scale)
                .with_byte_size(byte_size.unwrap_or(precision));
            let data_type = generator.type_mapper().map(&descriptor);
            if data_type.is_supported() {
                println!("{}", data_type.to_string().green());
            } else {
                println!("{}", data_type.to_string().yellow());
            }
        }
    }
    Ok(())
}

/// `--log-level`, else `LOG_LEVEL`, else `RUST_LOG`, else `warn`.
fn init_logging(flag: Option<&str>, properties: &AdapterProperties) {
    let filter = match flag.or(properties.log_level()) {
        Some(level) => EnvFilter::new(level.to_lowercase()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_properties(target: &Target) -> Result<AdapterProperties> {
    let file = match &target.config {
        Some(path) => Some(path.clone()),
        None => AdapterProperties::default_path().filter(|path| path.exists()),
    };
    let base = match file {
        Some(path) => AdapterProperties::load(&path)
            .with_context(|| format!("Failed to read properties from {}", path.display()))?,
        None => AdapterProperties::new(),
    };
    Ok(base.merge(AdapterProperties::from_pairs(&target.properties)?))
}

fn load_request(path: &Path) -> Result<PushdownRequest> {
    PushdownRequest::load(path).with_context(|| format!("Failed to read request {}", path.display()))
}

fn rewriter(target: &Target, properties: AdapterProperties) -> Result<QueryRewriter> {
    let dialect = DialectRegistry::builtin().get(&target.dialect)?;
    if let Some(configured) = properties.get(keys::SQL_DIALECT) {
        if !configured.eq_ignore_ascii_case(dialect.name()) {
            bail!(
                "Property {} is {} but the dialect {} was requested",
                keys::SQL_DIALECT,
                configured,
                dialect
            );
        }
    }
    Ok(QueryRewriter::new(dialect, properties)?)
}

fn list_dialects(capabilities: bool) -> Result<()> {
    let registry = DialectRegistry::builtin();
    for name in registry.names() {
        let dialect = registry.get(name)?;
        let generator = dialect.generator(&AdapterProperties::new())?;
        let descriptor = generator.descriptor();
        println!(
            "{:12} {}",
            name.cyan().bold(),
            format!(
                "limit {:?}, nulls {:?}, null ordering {:?}",
                descriptor.limit_style, descriptor.null_sorting, descriptor.null_ordering
            )
            .dimmed()
        );
        if capabilities {
            for capability in descriptor.capabilities.names() {
                println!("    {}", capability);
            }
        }
    }
    Ok(())
}

/// Stand-in when no `--database-url` was given.
struct Offline;

#[async_trait]
impl ForeignConnection for Offline {
    async fn execute(&self, _sql: &str) -> VsResult<ForeignResult> {
        Err(VsError::foreign(
            "This dialect materializes query results. Use --database-url or set VSCHEMA_DATABASE_URL",
        ))
    }

    async fn describe(&self, _sql: &str) -> VsResult<Vec<NativeTypeDescriptor>> {
        Err(VsError::foreign(
            "IMPORT needs the result columns of the push-down query. Use --database-url or set VSCHEMA_DATABASE_URL",
        ))
    }
}
