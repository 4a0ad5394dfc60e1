//! mssql-typemap CLI - inspect SQL Server type mappings.

mod values;

use clap::{Parser, Subcommand};
use mssql_typemap::dialect::parse_store_type_name;
use mssql_typemap::{
    ClrType, ProviderConfig, ProviderError, StoreTypeFacets, TransientErrorDetector, TypeMapError,
    TypeMappingInfo, TypeMappingSource,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "mssql-typemap")]
#[command(about = "Inspect SQL Server type mappings")]
#[command(version)]
struct Cli {
    /// Path to YAML provider configuration (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "warn")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

/// Lookup arguments shared by `resolve` and `literal`.
#[derive(clap::Args)]
struct LookupArgs {
    /// Host type, e.g. string, int, decimal, byte[]
    #[arg(long)]
    clr: Option<ClrType>,

    /// Store type name, e.g. nvarchar(50)
    #[arg(long)]
    store_type: Option<String>,

    /// Requested size
    #[arg(long, allow_hyphen_values = true)]
    size: Option<i32>,

    /// Requested precision
    #[arg(long)]
    precision: Option<i32>,

    /// Requested scale
    #[arg(long)]
    scale: Option<i32>,

    /// Request ANSI (varchar) rather than Unicode text
    #[arg(long)]
    ansi: bool,

    /// Request fixed-length text or binary
    #[arg(long)]
    fixed_length: bool,

    /// The column is part of a key or index
    #[arg(long)]
    key: bool,

    /// The column is a rowversion concurrency token
    #[arg(long)]
    row_version: bool,
}

impl LookupArgs {
    fn to_info(&self) -> TypeMappingInfo {
        let mut facets = StoreTypeFacets {
            size: self.size,
            precision: self.precision,
            scale: self.scale,
            ..StoreTypeFacets::default()
        };
        if self.ansi {
            facets.unicode = Some(false);
        }
        if self.fixed_length {
            facets.fixed_length = Some(true);
        }

        let mut info = TypeMappingInfo::new(self.clr, self.store_type.as_deref(), facets)
            .with_key_or_index(self.key);
        if self.row_version {
            info = info.with_row_version(true);
        }
        info
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a mapping from a host type and/or store type name
    Resolve {
        #[command(flatten)]
        lookup: LookupArgs,
    },

    /// Render a value as a SQL literal, with its parameter settings
    Literal {
        #[command(flatten)]
        lookup: LookupArgs,

        /// Type of the value when it differs from the mapping (sql_variant)
        #[arg(long)]
        value_type: Option<ClrType>,

        /// Render NULL
        #[arg(long, conflicts_with = "value")]
        null: bool,

        /// Value text
        #[arg(allow_hyphen_values = true, required_unless_present = "null")]
        value: Option<String>,
    },

    /// Parse a store type name into base name and facets
    Parse {
        /// Store type name, e.g. decimal(18,2)
        store_type: String,
    },

    /// Classify a server error number as transient or permanent
    Classify {
        /// Error number
        #[arg(allow_hyphen_values = true)]
        number: i32,
    },

    /// List registered store type names
    StoreTypes,
}

#[derive(Serialize)]
struct LiteralOutput<'a> {
    store_type: &'a str,
    literal: String,
    parameter: Option<mssql_typemap::SqlParameter>,
}

#[derive(Serialize)]
struct ClassifyOutput {
    number: i32,
    category: mssql_typemap::ErrorCategory,
    transient: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

fn run() -> Result<(), TypeMapError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format).map_err(TypeMapError::Config)?;

    let config = match &cli.config {
        Some(path) => {
            let config = ProviderConfig::load(path)?;
            info!("Loaded configuration from {:?}", path);
            config
        }
        None => ProviderConfig::default(),
    };

    match cli.command {
        Commands::Resolve { lookup } => {
            let source = TypeMappingSource::new(&config);
            match source.find_mapping(&lookup.to_info())? {
                Some(mapping) if cli.output_json => {
                    println!("{}", serde_json::to_string_pretty(&*mapping)?);
                }
                Some(mapping) => print_mapping(&mapping),
                None => return Err(not_found(&lookup)),
            }
        }

        Commands::Literal {
            lookup,
            value_type,
            null,
            value,
        } => {
            let source = TypeMappingSource::new(&config);
            let mapping = source
                .find_mapping(&lookup.to_info())?
                .ok_or_else(|| not_found(&lookup))?;

            let value = match (null, value) {
                (true, _) | (false, None) => mssql_typemap::SqlValue::Null(
                    mssql_typemap::core::SqlNullType::String,
                ),
                (false, Some(text)) => {
                    let clr = value_type.unwrap_or(mapping.clr_type());
                    values::parse_value(clr, &text).map_err(|e| {
                        TypeMapError::invalid_value(clr.name(), format!("{:#}", e))
                    })?
                }
            };

            let literal = mapping.generate_sql_literal(&value)?;
            if cli.output_json {
                let parameter = if value.is_null() {
                    None
                } else {
                    Some(mapping.create_parameter("@p0", value)?)
                };
                let output = LiteralOutput {
                    store_type: mapping.store_type(),
                    literal,
                    parameter,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("{}", literal);
            }
        }

        Commands::Parse { store_type } => {
            let parsed = parse_store_type_name(Some(store_type.as_str()))?;
            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&parsed)?);
            } else {
                println!("base:      {}", parsed.base_name.as_deref().unwrap_or("-"));
                println!("unicode:   {}", display_opt(parsed.unicode));
                println!("size:      {}", display_opt(parsed.size));
                println!("precision: {}", display_opt(parsed.precision));
                println!("scale:     {}", display_opt(parsed.scale));
                println!("max:       {}", parsed.is_max);
            }
        }

        Commands::Classify { number } => {
            let detector = TransientErrorDetector::new(&config.retry);
            let category = detector.classify(number);
            let transient = detector.should_retry_on(&ProviderError::new(number, ""));
            if cli.output_json {
                let output = ClassifyOutput {
                    number,
                    category,
                    transient,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!(
                    "{}: {} ({})",
                    number,
                    category,
                    if transient { "transient" } else { "permanent" }
                );
            }
        }

        Commands::StoreTypes => {
            let source = TypeMappingSource::new(&config);
            let names = source.store_type_names();
            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&names)?);
            } else {
                for name in names {
                    println!("{}", name);
                }
            }
        }
    }

    Ok(())
}

fn not_found(lookup: &LookupArgs) -> TypeMapError {
    TypeMapError::Config(format!(
        "no mapping for host type {} and store type {}",
        lookup.clr.map(|c| c.name()).unwrap_or("-"),
        lookup.store_type.as_deref().unwrap_or("-")
    ))
}

fn print_mapping(mapping: &mssql_typemap::RelationalTypeMapping) {
    let facets = mapping.facets();
    println!("store type: {}", mapping.store_type());
    println!("clr type:   {}", mapping.clr_type());
    println!("kind:       {:?}", mapping.kind());
    println!("db type:    {}", display_debug(mapping.db_type()));
    println!("sql type:   {}", display_debug(mapping.sql_db_type()));
    println!("unicode:    {}", display_opt(facets.unicode));
    println!("size:       {}", display_opt(facets.size));
    println!("fixed:      {}", display_opt(facets.fixed_length));
    println!("precision:  {}", display_opt(facets.precision));
    println!("scale:      {}", display_opt(facets.scale));
}

fn display_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn display_debug<T: std::fmt::Debug>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:?}", v))
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        other => return Err(format!("unknown verbosity '{}'", other)),
    };

    // stdout carries command output
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        "json" => subscriber.json().init(),
        "text" => subscriber.init(),
        other => return Err(format!("unknown log format '{}'", other)),
    }

    Ok(())
}
