//! Jaguatirica CLI Client
//!
//! Command-line interface for interacting with Jaguatirica.

use clap::{Parser, Subcommand, ValueEnum};
use jaguatirica::{Client, Response, Result, Value};

/// Jaguatirica CLI
#[derive(Parser, Debug)]
#[command(name = "jaguatirica-cli")]
#[command(about = "CLI for the Jaguatirica key-value store")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "localhost:8345")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get the value bound to a key
    Get {
        key: String,
    },

    /// Bind a value to a key
    Set {
        key: String,

        /// How to interpret the value arguments
        #[arg(short, long, value_enum, default_value_t = Kind::Text)]
        kind: Kind,

        /// The value (several words for a set)
        #[arg(required = true)]
        value: Vec<String>,
    },

    /// Increment an integer
    Incr {
        key: String,
    },

    /// Decrement an integer
    Decr {
        key: String,
    },

    /// Add elements to a set
    Sadd {
        key: String,

        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Union of several sets
    Sunion {
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Intersection of several sets
    Sinter {
        #[arg(required = true)]
        keys: Vec<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Kind {
    Text,
    Int,
    Set,
}

fn main() {
    let args = Args::parse();

    match run(args) {
        Ok(Response::Ok(value)) => println!("OK {}", value),
        Ok(Response::Error(reason)) => {
            println!("ERROR {}", reason);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: Args) -> Result<Response> {
    let mut client = Client::connect(&args.server)?;

    match args.command {
        Commands::Get { key } => client.get(&key),
        Commands::Set { key, kind, value } => client.set(&key, parse_value(kind, value)?),
        Commands::Incr { key } => client.increment(&key),
        Commands::Decr { key } => client.decrement(&key),
        Commands::Sadd { key, values } => client.set_add(&key, &as_strs(&values)),
        Commands::Sunion { keys } => client.set_union(&as_strs(&keys)),
        Commands::Sinter { keys } => client.set_intersection(&as_strs(&keys)),
    }
}

fn parse_value(kind: Kind, words: Vec<String>) -> Result<Value> {
    match kind {
        Kind::Text => Ok(Value::Text(words.join(" "))),
        Kind::Int => {
            let text = words.join("");
            text.parse::<i64>().map(Value::Integer).map_err(|e| {
                jaguatirica::JaguatiricaError::Config(format!("invalid integer {:?}: {}", text, e))
            })
        }
        Kind::Set => Ok(Value::set_of(words)),
    }
}

fn as_strs(items: &[String]) -> Vec<&str> {
    items.iter().map(String::as_str).collect()
}
