//! # AAS Repository CLI
//!
//! Command-line access to an AAS repository server. Connection settings come
//! from `AAS_REPO_*` environment variables; every command logs in first.

use aas_repository_client::{MatchOptions, RepositoryClient};
use aas_repository_model::{
    Identifier, IdentifierType, IdentifiableObject, Key, KeyElements, KeyType,
};
use anyhow::{anyhow, Context, Result};
use std::env;
use std::path::Path;
use tracing_subscriber::EnvFilter;

mod config;

use config::CliConfig;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    let flags: Vec<&str> = args[2..]
        .iter()
        .map(String::as_str)
        .filter(|a| a.starts_with("--"))
        .collect();
    let positional: Vec<&str> = args[2..]
        .iter()
        .map(String::as_str)
        .filter(|a| !a.starts_with("--"))
        .collect();
    let failsafe = flags.contains(&"--failsafe");

    match args[1].as_str() {
        "login" => {
            let client = connect()?;
            println!("{}", client.token().unwrap_or_default());
        }
        "get" => {
            let id = required(&positional, 0, "aas-repo get <id> [IRI|IRDI|Custom]")?;
            let id_type = match positional.get(1) {
                Some(t) => t.parse::<IdentifierType>().map_err(|e| anyhow!(e))?,
                None => IdentifierType::Iri,
            };
            let identifier = Identifier::new(id, id_type);

            let identifiable: Option<IdentifiableObject> =
                connect()?.get_identifiable(&identifier, failsafe)?;
            match identifiable {
                Some(object) => println!("{}", serde_json::to_string_pretty(&object)?),
                None => println!("not found"),
            }
        }
        "add" | "modify" => {
            let command = args[1].as_str();
            let path = required(&positional, 0, &format!("aas-repo {command} <json-file>"))?;
            let object = read_identifiable(Path::new(path))?;

            let client = connect()?;
            let identifier = if command == "add" {
                client.add_identifiable(&object, failsafe)?
            } else {
                client.modify_identifiable(&object, failsafe)?
            };
            print_or_not_found(identifier.map(|i| i.id));
        }
        "query" => {
            let usage = concat!(
                "aas-repo query <value> [key-type] [id-type] ",
                "[--local] [--check-type] [--check-local] [--check-id-type]"
            );
            let value = required(&positional, 0, usage)?;
            let type_ = match positional.get(1) {
                Some(t) => t.parse::<KeyElements>().map_err(|e| anyhow!(e))?,
                None => KeyElements::GlobalReference,
            };
            let id_type = match positional.get(2) {
                Some(t) => t.parse::<KeyType>().map_err(|e| anyhow!(e))?,
                None => KeyType::Iri,
            };
            let key = Key::new(type_, flags.contains(&"--local"), value, id_type);
            let options = MatchOptions {
                check_key_type: flags.contains(&"--check-type"),
                check_key_local: flags.contains(&"--check-local"),
                check_key_id_type: flags.contains(&"--check-id-type"),
            };

            for result in connect()?.query_semantic_id(&key, options)? {
                println!("{}", serde_json::to_string(&result)?);
            }
        }
        "get-file" => {
            let usage = "aas-repo get-file <iri> <save-as>";
            let iri = required(&positional, 0, usage)?;
            let save_as = required(&positional, 1, usage)?;
            print_or_not_found(connect()?.get_file(iri, Path::new(save_as), failsafe)?);
        }
        "add-file" => {
            let path = required(&positional, 0, "aas-repo add-file <path>")?;
            print_or_not_found(connect()?.add_file(Path::new(path), failsafe)?);
        }
        "help" | "--help" | "-h" => {
            print_help();
        }
        cmd => {
            eprintln!("Unknown command: {cmd}");
            print_help();
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Create a client from the environment and log in.
fn connect() -> Result<RepositoryClient> {
    let config = CliConfig::from_env()?;
    let mut client = RepositoryClient::new(&config.client).context("Failed to create client")?;
    client
        .login(&config.password)
        .with_context(|| format!("Failed to log in as {}", config.client.username))?;
    Ok(client)
}

fn required<'a>(positional: &[&'a str], index: usize, usage: &str) -> Result<&'a str> {
    positional
        .get(index)
        .copied()
        .ok_or_else(|| anyhow!("Usage: {usage}"))
}

fn read_identifiable(path: &Path) -> Result<IdentifiableObject> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not an Identifiable", path.display()))
}

fn print_or_not_found(value: Option<String>) {
    match value {
        Some(value) => println!("{value}"),
        None => println!("not found"),
    }
}

fn print_help() {
    println!(
        r#"AAS Repository CLI

USAGE:
    aas-repo <COMMAND> [ARGS] [--failsafe]

COMMANDS:
    login                          Log in and print the session token
    get <id> [id-type]             Fetch an Identifiable (id-type: IRI, IRDI, Custom)
    add <json-file>                Create an Identifiable from a JSON file
    modify <json-file>             Replace an Identifiable from a JSON file
    query <value> [key-type] [id-type]
                                   Find Identifiables by semantic id
                                   (--local, --check-type, --check-local, --check-id-type)
    get-file <iri> <save-as>       Download a file
    add-file <path>                Upload a file and print its new IRI
    help                           Show this help message

ENVIRONMENT:
    AAS_REPO_URL, AAS_REPO_USERNAME, AAS_REPO_PASSWORD, AAS_REPO_TIMEOUT_SECS,
    AAS_REPO_CA_CERT, AAS_REPO_CLIENT_CERT, AAS_REPO_CLIENT_KEY

EXAMPLES:
    aas-repo get "https://FLUIDON.com/AAS_Ram_Z1"
    aas-repo query "BASY-1#02-LPipe1#001" ConceptDescription IRDI --local
"#
    );
}
