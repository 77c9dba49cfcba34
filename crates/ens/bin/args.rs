use alloy_primitives::Address;
use clap::{Parser, Subcommand};

/// Resolve ENS names from the command line.
#[derive(Debug, Parser)]
#[command(name = "ens", version)]
pub struct Ens {
    /// The RPC endpoint of the node to query.
    #[arg(
        long,
        short,
        global = true,
        env = "ETH_RPC_URL",
        value_name = "URL",
        default_value = "http://localhost:8545"
    )]
    pub rpc_url: String,

    /// Print the result as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub cmd: EnsSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum EnsSubcommand {
    /// Calculate the namehash of a name.
    #[command(visible_alias = "nh")]
    Namehash { name: String },

    /// Check that the node is synced and the network has an ENS registry.
    CheckNetwork,

    /// Get the address a name resolves to.
    #[command(visible_alias = "resolve")]
    Address { name: String },

    /// Get the owner of a name.
    Owner { name: String },

    /// Get the resolver contract of a name.
    Resolver { name: String },

    /// Get a text record of a name.
    Text {
        name: String,
        /// The record key, e.g. `url` or `com.github`.
        key: String,
    },

    /// Get the content hash of a name.
    Contenthash { name: String },

    /// Get the primary name of an address.
    #[command(visible_alias = "reverse")]
    Lookup { address: Address },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Ens::command().debug_assert();
    }

    #[test]
    fn parses_lookup() {
        let args = Ens::parse_from([
            "ens",
            "--rpc-url",
            "http://localhost:8545",
            "lookup",
            "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
        ]);
        match args.cmd {
            EnsSubcommand::Lookup { address } => {
                assert_eq!(address.to_string(), "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045")
            }
            cmd => panic!("unexpected command {cmd:?}"),
        }
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let args = Ens::parse_from(["ens", "text", "vitalik.eth", "url", "--json"]);
        assert!(args.json);
        assert!(matches!(args.cmd, EnsSubcommand::Text { ref key, .. } if key == "url"));
    }
}
