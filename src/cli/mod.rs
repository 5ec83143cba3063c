use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "starknet-wallet-signer")]
#[command(about = "Build, hash and sign Starknet transactions with local, passkey or custodial keys")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub signer: SignerArgs,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an encrypted keystore file
    Init(InitArgs),
    /// Print the configured signer's public key
    PublicKey,
    /// Sign a raw transaction hash
    SignHash(SignHashArgs),
    /// Build, hash and sign a transaction from a JSON details file
    Sign(SignArgs),
    /// Decode a COSE, DER or SEC1 P-256 public key
    #[command(name = "parse-p256-key")]
    ParseP256Key(ParseKeyArgs),
}

/// Signer selection shared by every subcommand
#[derive(Args, Debug, Default, Clone)]
pub struct SignerArgs {
    /// Configuration file path
    #[arg(short, long, global = true, env = "SIGNER_CONFIG")]
    pub config: Option<String>,

    /// Signer backend: "stark" or "privy"
    #[arg(long, global = true, env = "SIGNER_BACKEND")]
    pub signer_backend: Option<String>,

    /// Label recorded in logs and the audit trail
    #[arg(long, global = true, env = "SIGNER_LABEL")]
    pub label: Option<String>,

    /// Keystore backend: "software" or "environment"
    #[arg(long, global = true, env = "SIGNER_KEYSTORE_BACKEND")]
    pub keystore_backend: Option<String>,

    /// Path to encrypted keystore file (for software backend)
    #[arg(long, global = true, env = "SIGNER_KEYSTORE_PATH")]
    pub keystore_path: Option<String>,

    /// Environment variable name for private key (for environment backend)
    #[arg(long, global = true, env = "SIGNER_ENV_VAR")]
    pub env_var: Option<String>,

    /// Passphrase for encrypted keystore (will be prompted securely if needed)
    /// Setting this via environment variable is NOT recommended for security
    #[arg(long, global = true, env = "SIGNER_PASSPHRASE")]
    pub passphrase: Option<String>,

    #[arg(long, global = true, env = "PRIVY_API_URL")]
    pub privy_api_url: Option<String>,

    #[arg(long, global = true, env = "PRIVY_API_KEY", hide_env_values = true)]
    pub privy_api_key: Option<String>,

    #[arg(long, global = true, env = "PRIVY_WALLET_ID")]
    pub privy_wallet_id: Option<String>,

    #[arg(long, global = true, env = "PRIVY_SESSION_TOKEN", hide_env_values = true)]
    pub privy_session_token: Option<String>,

    /// Bound on each custodial round-trip
    #[arg(long, global = true, env = "PRIVY_TIMEOUT_SECS")]
    pub privy_timeout_secs: Option<u64>,

    /// Chain id short string ("SN_MAIN", "SN_SEPOLIA") or hex felt
    #[arg(long, global = true, env = "SIGNER_CHAIN_ID")]
    pub chain_id: Option<String>,

    /// Append a JSON line per signature to this file
    #[arg(long, global = true, env = "SIGNER_AUDIT_LOG")]
    pub audit_log: Option<String>,

    /// Log level
    #[arg(long, global = true, env = "RUST_LOG")]
    pub log_level: Option<String>,
}

#[derive(Args)]
pub struct InitArgs {
    /// Output path for encrypted keystore
    #[arg(short, long)]
    pub output: String,

    /// Private key to encrypt (hex)
    #[arg(long)]
    pub private_key: String,
}

#[derive(Args)]
pub struct SignHashArgs {
    /// Hash to sign (0x hex or decimal)
    #[arg(long)]
    pub hash: String,
}

#[derive(Args)]
pub struct SignArgs {
    /// JSON file with the transaction details ("type": INVOKE, DEPLOY_ACCOUNT or DECLARE)
    #[arg(long)]
    pub tx: String,

    /// Transaction version
    #[arg(long, default_value_t = 3)]
    pub version: u64,
}

#[derive(Args)]
pub struct ParseKeyArgs {
    /// Encoded public key as hex
    #[arg(long)]
    pub hex: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "starknet-wallet-signer",
            "sign",
            "--tx",
            "invoke.json",
            "--chain-id",
            "SN_MAIN",
            "--signer-backend",
            "privy",
        ])
        .unwrap();

        assert_eq!(cli.signer.chain_id.as_deref(), Some("SN_MAIN"));
        assert_eq!(cli.signer.signer_backend.as_deref(), Some("privy"));
        match cli.command {
            Commands::Sign(args) => {
                assert_eq!(args.tx, "invoke.json");
                assert_eq!(args.version, 3);
            }
            _ => panic!("expected sign"),
        }
    }

    #[test]
    fn test_parse_key_command() {
        let cli = Cli::try_parse_from(["starknet-wallet-signer", "parse-p256-key", "--hex", "04ab"])
            .unwrap();
        assert!(matches!(cli.command, Commands::ParseP256Key(ParseKeyArgs { ref hex }) if hex == "04ab"));
    }
}
