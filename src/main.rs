//! FlashJSON command-line client
//!
//! Sends one JSON command to a server and prints the typed reply.

use flashjson::json::reply;
use flashjson::{Connection, ConnectionConfig, JsonError, RespValue, Shape};
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Command-line configuration
struct Config {
    connection: ConnectionConfig,
    /// The command and its arguments, name first
    command: Vec<String>,
}

impl Config {
    /// Parse configuration from command-line arguments
    fn from_args() -> Self {
        let mut connection = ConnectionConfig::default();
        let args: Vec<String> = std::env::args().collect();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--host" | "-h" => {
                    connection.host = required_value(&args, i, "--host").to_string();
                    i += 2;
                }
                "--port" | "-p" => {
                    connection.port = required_value(&args, i, "--port")
                        .parse()
                        .unwrap_or_else(|_| fail("invalid port number"));
                    i += 2;
                }
                "--timeout" | "-t" => {
                    let millis: u64 = required_value(&args, i, "--timeout")
                        .parse()
                        .unwrap_or_else(|_| fail("invalid timeout"));
                    let timeout = Duration::from_millis(millis);
                    connection = connection
                        .with_connect_timeout(timeout)
                        .with_response_timeout(timeout);
                    i += 2;
                }
                "--help" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("flashjson version {}", flashjson::VERSION);
                    std::process::exit(0);
                }
                arg if arg.starts_with('-') && arg.len() > 1 && !is_number(arg) => {
                    eprintln!("Unknown argument: {}", arg);
                    print_help();
                    std::process::exit(1);
                }
                _ => break,
            }
        }

        let command = args[i..].to_vec();
        if command.is_empty() {
            print_help();
            std::process::exit(1);
        }

        Config {
            connection,
            command,
        }
    }
}

fn required_value<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    match args.get(i + 1) {
        Some(value) => value,
        None => fail(&format!("{} requires a value", flag)),
    }
}

fn is_number(arg: &str) -> bool {
    arg.parse::<f64>().is_ok()
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn print_help() {
    println!(
        r#"
FlashJSON - Client for Redis JSON commands

USAGE:
    flashjson [OPTIONS] <COMMAND> [ARGS...]

OPTIONS:
    -h, --host <HOST>       Server host (default: 127.0.0.1)
    -p, --port <PORT>       Server port (default: 6379)
    -t, --timeout <MS>      Connect and response timeout in milliseconds
    -v, --version           Print version information
        --help              Print this help message

EXAMPLES:
    flashjson JSON.SET obj . '{{"name":"Leonard Cohen","loggedOut":true}}'
    flashjson JSON.GET obj INDENT "  " NEWLINE $'\n' .name
    flashjson JSON.TYPE obj .loggedOut
    flashjson JSON.MGET obj1 obj2 .
    flashjson -p 6380 JSON.ARRAPPEND arr . 0

Set RUST_LOG=debug to see the traffic.
"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_args();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut conn = Connection::connect(&config.connection).await?;
    let request = RespValue::command(config.command.iter().map(|s| s.clone().into_bytes()));
    let reply = conn.execute(&request).await?;
    debug!(reply = %reply.kind(), "Received reply");

    let name = &config.command[0];
    let Some(shape) = Shape::for_command(name) else {
        // Not a JSON command; print whatever came back.
        println!("{}", reply);
        return Ok(());
    };

    // MGET: keys sit between the command name and the trailing path.
    let keys: Vec<&str> = match shape {
        Shape::KeyValueList if config.command.len() > 2 => config.command
            [1..config.command.len() - 1]
            .iter()
            .map(String::as_str)
            .collect(),
        _ => Vec::new(),
    };

    match reply::decode(shape, reply, &keys) {
        Ok(decoded) => println!("{}", decoded),
        Err(JsonError::Server(msg)) => {
            println!("(error) {}", msg);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
