use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dash_sign::{Network, SignError, SignRequest, Settings, TransactionSigner};
use serde_json::json;
use std::fs;
use std::io::{self, Read};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Sign Dash transactions", long_about = None)]
struct Opts {
    /// Network override (dash-mainnet, dash-testnet, dash-regtest)
    #[clap(long, global = true)]
    network: Option<Network>,
    /// Skip verification of produced unlocking scripts
    #[clap(long, global = true)]
    no_verify: bool,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, PartialEq, Clone, Debug)]
enum Command {
    /// Sign a JSON request read from a file or stdin
    #[clap(name = "sign", bin_name = "sign")]
    Sign(Sign),
    /// Generate a new private key
    #[clap(name = "new-key", bin_name = "new-key")]
    NewKey,
    /// Print the address of a private key
    #[clap(name = "address", bin_name = "address")]
    Address(AddressCmd),
}

#[derive(Parser, PartialEq, Clone, Debug)]
struct Sign {
    /// Request file path; stdin when omitted
    pub file_path: Option<String>,
}

#[derive(Parser, PartialEq, Clone, Debug)]
struct AddressCmd {
    /// WIF-encoded private key
    pub wif: String,
}

fn read_request(path: Option<&str>) -> Result<SignRequest> {
    let body = match path {
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading {}", path))?,
        None => {
            let mut body = String::new();
            io::stdin().read_to_string(&mut body).context("reading stdin")?;
            body
        }
    };
    serde_json::from_str(&body).context("parsing sign request")
}

fn run(opts: Opts) -> Result<()> {
    let mut settings = Settings::from_env()?;
    if let Some(network) = opts.network {
        settings.network = network;
    }
    if opts.no_verify {
        settings.verify_signatures = false;
    }
    let signer = TransactionSigner::new(settings);

    match opts.command {
        Command::Sign(cmd) => {
            let request = read_request(cmd.file_path.as_deref())?;
            match signer.sign_request(&request) {
                Ok(response) => println!("{}", serde_json::to_string_pretty(&response)?),
                Err(e) => {
                    println!("{}", serde_json::to_string_pretty(&error_body(&e))?);
                    std::process::exit(if e.is_client_error() { 2 } else { 1 });
                }
            }
        }
        Command::NewKey => {
            let wif = signer.generate_private_key();
            let address = signer.public_address(&wif)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "privateKey": wif, "address": address }))?
            );
        }
        Command::Address(cmd) => {
            let address = signer.public_address(&cmd.wif)?;
            println!("{}", serde_json::to_string_pretty(&json!({ "address": address }))?);
        }
    }
    Ok(())
}

fn error_body(e: &SignError) -> serde_json::Value {
    match e {
        SignError::InvalidRequest(fields) => json!({
            "errorKind": e.kind(),
            "errorMessage": "invalid request",
            "modelErrors": fields,
        }),
        _ => json!({
            "errorKind": e.kind(),
            "errorMessage": e.to_string(),
        }),
    }
}

pub fn main() {
    env_logger::init();

    let opts: Opts = match Opts::try_parse() {
        Ok(opts) => opts,
        Err(e) => {
            println!("{e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(opts) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
