mod commands;
mod http;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use spoonfit_stats::TableSchema;
use spoonfit_stats::table::{DEFAULT_GROUP_COLUMN, DEFAULT_ID_COLUMN, DEFAULT_VALUE_COLUMN};
use spoonfit_tiers::DEFAULT_LOCALE;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::DEFAULT_AUDIT_LOG;

#[derive(Parser)]
#[command(name = "spoonfit")]
#[command(author, version, about = "Spoon size lookup from measured diameters")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Tier configuration file (YAML). Defaults to the built-in spoon scale.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Append-only audit log of successful classifications
    #[arg(long, global = true, default_value = DEFAULT_AUDIT_LOG)]
    audit_log: PathBuf,

    /// Do not write the audit log
    #[arg(long, global = true)]
    no_audit: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Column names of the measurement table
#[derive(Args)]
struct SchemaArgs {
    /// Column holding the measurement in millimetres
    #[arg(long, default_value = DEFAULT_VALUE_COLUMN)]
    value_column: String,

    /// Column identifying each record
    #[arg(long, default_value = DEFAULT_ID_COLUMN)]
    id_column: String,

    /// Column holding the group of each record
    #[arg(long, default_value = DEFAULT_GROUP_COLUMN)]
    group_column: String,
}

impl From<SchemaArgs> for TableSchema {
    fn from(args: SchemaArgs) -> Self {
        Self {
            value_column: args.value_column,
            id_column: args.id_column,
            group_column: args.group_column,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every row of a CSV table
    Classify {
        /// Path to the CSV file
        file: PathBuf,

        /// Locale of the printed labels
        #[arg(short, long, default_value = DEFAULT_LOCALE)]
        locale: String,

        #[command(flatten)]
        schema: SchemaArgs,
    },

    /// Classify a single measurement
    Lookup {
        /// Diameter in millimetres
        #[arg(allow_negative_numbers = true)]
        value: f64,

        /// Locale of the printed label
        #[arg(short, long, default_value = DEFAULT_LOCALE)]
        locale: String,
    },

    /// Per-group statistics of a CSV table
    Summarize {
        /// Path to the CSV file
        file: PathBuf,

        /// Column to group by (defaults to the group column)
        #[arg(short, long)]
        group_by: Option<String>,

        /// Write a box plot of the distribution (SVG)
        #[arg(short, long)]
        plot: Option<PathBuf>,

        #[command(flatten)]
        schema: SchemaArgs,
    },

    /// Show the tier configuration
    Tiers,

    /// Start the web form and JSON API
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Allowed CORS origin (default: any)
        #[arg(long)]
        cors_origin: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    let audit_log = (!cli.no_audit).then_some(cli.audit_log.as_path());

    match cli.command {
        Commands::Classify {
            file,
            locale,
            schema,
        } => {
            let schema: TableSchema = schema.into();
            let classifier = commands::build_classifier(config, audit_log)?;
            commands::classify(&file, &locale, &schema, &classifier).await
        }
        Commands::Lookup { value, locale } => {
            let classifier = commands::build_classifier(config, audit_log)?;
            commands::lookup(value, &locale, &classifier).await
        }
        Commands::Summarize {
            file,
            group_by,
            plot,
            schema,
        } => {
            let schema: TableSchema = schema.into();
            let group_by = group_by.unwrap_or_else(|| schema.group_column.clone());
            commands::summarize(&file, &group_by, &schema, plot.as_deref()).await
        }
        Commands::Tiers => {
            let table = commands::load_tiers(config)?;
            commands::tiers(&table).await
        }
        Commands::Serve { port, cors_origin } => {
            let classifier = commands::build_classifier(config, audit_log)?;
            commands::serve(classifier, port, cors_origin).await
        }
    }
}
