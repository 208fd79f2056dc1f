use clap::{Parser, Subcommand};
use deluge_events::{
    config::DispatcherConfig, registry, Dispatcher, Error, Event, InternalResult, KindFilter,
    WireEvent,
};
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every registered event kind
    Kinds {
        /// Print the schemas as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the schema of one event kind
    Describe { kind: String },
    /// Check a wire event, e.g. '["TorrentAdded",["abc123",false]]'
    Validate { wire: String },
    /// Publish JSON-lines wire events and print what a subscriber receives
    Tail {
        /// Only print these kinds (repeatable)
        #[arg(short, long)]
        kind: Vec<String>,

        /// Path to dispatcher config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Input file, stdin when omitted
        file: Option<PathBuf>,
    },
}

fn print_json<T: serde::Serialize>(value: &T) -> InternalResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn kinds(json: bool) -> InternalResult<()> {
    let registry = registry();
    if json {
        let schemas: Vec<_> = registry.all_kinds().collect();
        return print_json(&schemas);
    }
    for schema in registry.all_kinds() {
        let fields: Vec<String> = schema
            .fields
            .iter()
            .map(|field| format!("{}: {}", field.name, field.ty))
            .collect();
        println!("{}({})", schema.kind_name, fields.join(", "));
    }
    Ok(())
}

fn describe(kind: &str) -> InternalResult<()> {
    let schema = registry().lookup(kind)?;
    print_json(schema)
}

fn parse_wire(line: &str) -> InternalResult<Event> {
    let wire: WireEvent = serde_json::from_str(line)?;
    registry().validate_args(wire.kind_name(), wire.args())?;
    Ok(wire.into_event()?)
}

fn validate(wire: &str) -> InternalResult<()> {
    let event = parse_wire(wire)?;
    debug!("Parsed: {:?}", event);
    println!("ok: {}", event.kind_name());
    Ok(())
}

async fn tail(
    kinds: Vec<String>,
    config: Option<PathBuf>,
    file: Option<PathBuf>,
) -> InternalResult<()> {
    let config = match config {
        Some(path) => DispatcherConfig::from_file(path)?,
        None => DispatcherConfig::default(),
    };
    debug!("config: {:?}", config);

    let dispatcher = Dispatcher::new(&config);
    let id = dispatcher.subscribe_fn(KindFilter::names(kinds), "stdout", |event| {
        let line = serde_json::to_string(&event.to_wire())
            .map_err(|e| deluge_events::SubscriberError::Other(Box::new(e)))?;
        println!("{}", line);
        Ok(())
    });

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match file {
        Some(path) => Box::new(BufReader::new(tokio::fs::File::open(path).await?)),
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    let mut lines = reader.lines();
    let (mut published, mut rejected) = (0usize, 0usize);
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_wire(line) {
            Ok(event) => {
                dispatcher.publish(event).await;
                published += 1;
            }
            Err(e) => {
                warn!("Rejected wire event {}: {}", line, e);
                rejected += 1;
            }
        }
    }

    dispatcher.unsubscribe(id).await;
    info!("{} events published, {} rejected", published, rejected);
    Ok(())
}

async fn run(cli: Cli) -> InternalResult<()> {
    match cli.command {
        Command::Kinds { json } => kinds(json),
        Command::Describe { kind } => describe(&kind),
        Command::Validate { wire } => validate(&wire),
        Command::Tail { kind, config, file } => tail(kind, config, file).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        let code = match e {
            Error::Event(_) | Error::Json(_) => 2,
            _ => 1,
        };
        std::process::exit(code);
    }
}
