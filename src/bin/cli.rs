//! influxline CLI
//!
//! Command-line interface for writing points to and querying InfluxDB.

use std::process;

use clap::{Args as ClapArgs, Parser, Subcommand};
use influxline::line::{state, Builder, FieldValue};
use influxline::{create_db, query, Error, ServerInfo};
use tracing_subscriber::{fmt, EnvFilter};

/// influxline CLI
#[derive(Parser, Debug)]
#[command(name = "influxline-cli")]
#[command(about = "CLI for writing line protocol to InfluxDB")]
#[command(version)]
struct Args {
    /// Server address (dotted IPv4)
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(long, default_value = "8086")]
    port: u16,

    /// Database name
    #[arg(short, long, default_value = "")]
    db: String,

    /// Username
    #[arg(short, long, default_value = "")]
    user: String,

    /// Password
    #[arg(short, long, default_value = "")]
    password: String,

    /// Connect/read/write timeout in milliseconds (0 = none)
    #[arg(short, long, default_value = "0")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a single point
    Write(WriteArgs),

    /// Run a query and print the response body
    Query {
        /// InfluxQL query text
        query: String,
    },

    /// Create a database
    CreateDb {
        /// Name of the database to create
        name: String,
    },
}

#[derive(ClapArgs, Debug)]
struct WriteArgs {
    /// Measurement name
    measurement: String,

    /// Tag as key=value (repeatable)
    #[arg(long = "tag", value_parser = parse_pair)]
    tags: Vec<(String, String)>,

    /// Field as key=value (repeatable, at least one).
    /// Values: t/f/true/false, 42i, 1.5, or a string
    #[arg(long = "field", value_parser = parse_pair, required = true)]
    fields: Vec<(String, String)>,

    /// Timestamp; omitted or <= 0 lets the server assign one
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    timestamp: i64,

    /// Fractional digits for float fields
    #[arg(long, default_value = "2")]
    precision: usize,

    /// Send over UDP instead of HTTP
    #[arg(long)]
    udp: bool,
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got {:?}", s))
}

/// Infer a field's type from its command-line text
fn parse_field_value(raw: &str) -> FieldValue<'_> {
    match raw {
        "t" | "true" => return FieldValue::Bool(true),
        "f" | "false" => return FieldValue::Bool(false),
        _ => {}
    }
    if let Some(int) = raw.strip_suffix('i').and_then(|d| d.parse::<i64>().ok()) {
        return FieldValue::Int(int);
    }
    if let Ok(float) = raw.parse::<f64>() {
        if float.is_finite() {
            return FieldValue::Float(float);
        }
    }
    let unquoted = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw);
    FieldValue::from(unquoted)
}

fn build_point(args: &WriteArgs) -> Option<Builder<state::Stamped>> {
    let mut point = Builder::with_precision(args.precision).measurement(&args.measurement);
    for (key, value) in &args.tags {
        point = point.tag(key, value);
    }

    let (first, rest) = args.fields.split_first()?;
    let mut point = point.field(&first.0, parse_field_value(&first.1));
    for (key, value) in rest {
        point = point.field(key, parse_field_value(value));
    }

    Some(point.timestamp(args.timestamp))
}

fn run(args: Args) -> Result<(), Error> {
    let server = ServerInfo::builder()
        .host(&args.host)
        .port(args.port)
        .db(&args.db)
        .user(&args.user)
        .password(&args.password)
        .connect_timeout_ms(args.timeout_ms)
        .read_timeout_ms(args.timeout_ms)
        .write_timeout_ms(args.timeout_ms)
        .build();

    match args.command {
        Commands::Write(write) => {
            let Some(point) = build_point(&write) else {
                eprintln!("error: at least one --field is required");
                process::exit(2);
            };
            tracing::debug!("Line protocol: {}", point.lines());
            if write.udp {
                point.send_udp(&server.host, server.port)?;
            } else {
                point.post_http(&server)?;
            }
            tracing::info!("Point written");
        }
        Commands::Query { query: text } => {
            println!("{}", query(&text, &server)?);
        }
        Commands::CreateDb { name } => {
            create_db(&name, &server)?;
            tracing::info!("Database {} created", name);
        }
    }
    Ok(())
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,influxline=info"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("error ({}): {}", e.code(), e);
        process::exit(1);
    }
}
