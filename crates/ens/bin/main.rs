#[macro_use]
extern crate tracing;

use alloy_provider::ProviderBuilder;
use clap::Parser;
use ens_resolver::{EnsConfig, NameService, RpcClient, namehash};
use eyre::Result;
use serde_json::json;

mod args;

use args::{Ens, EnsSubcommand};

fn main() -> Result<()> {
    subscriber();
    let args = Ens::parse();
    main_args(args)
}

#[tokio::main]
async fn main_args(args: Ens) -> Result<()> {
    // needs no connection
    if let EnsSubcommand::Namehash { name } = &args.cmd {
        let hash = namehash(name);
        return print(args.json, json!({ "name": name, "namehash": hash }), hash);
    }

    let config = EnsConfig::load()?;
    let provider = ProviderBuilder::new().connect(&args.rpc_url).await?;
    debug!(rpc_url = %args.rpc_url, "connected");
    let ens = NameService::with_client(RpcClient::shared(provider), &config);

    match args.cmd {
        EnsSubcommand::Namehash { .. } => unreachable!(),
        EnsSubcommand::CheckNetwork => {
            let registry = ens.check_network().await?;
            print(args.json, json!({ "registry": registry }), registry)?;
        }
        EnsSubcommand::Address { name } => {
            let address = ens.get_address(&name).await?;
            print(args.json, json!({ "name": name, "address": address }), address)?;
        }
        EnsSubcommand::Owner { name } => {
            let owner = ens.get_owner(&name).await?;
            print(args.json, json!({ "name": name, "owner": owner }), owner)?;
        }
        EnsSubcommand::Resolver { name } => {
            let resolver = ens.registry().resolver(&name).await?.address();
            print(args.json, json!({ "name": name, "resolver": resolver }), resolver)?;
        }
        EnsSubcommand::Text { name, key } => {
            let value = ens.get_text(&name, &key).await?;
            print(args.json, json!({ "name": name, "key": key, "value": value }), &value)?;
        }
        EnsSubcommand::Contenthash { name } => {
            let hash = ens.get_content_hash(&name).await?;
            print(args.json, json!({ "name": name, "contenthash": hash }), &hash)?;
        }
        EnsSubcommand::Lookup { address } => {
            let name = ens.lookup_address(address).await?;
            print(args.json, json!({ "address": address, "name": name }), &name)?;
        }
    }
    Ok(())
}

fn print(as_json: bool, value: serde_json::Value, plain: impl std::fmt::Display) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{plain}");
    }
    Ok(())
}

fn subscriber() {
    tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}
