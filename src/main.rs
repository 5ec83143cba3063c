use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use tracing::{info, warn};

use starknet_wallet_signer::signer::parse_p256_public_key;
use starknet_wallet_signer::types::{felt_to_hex, parse_felt};
use starknet_wallet_signer::utils::passphrase_or_prompt;
use starknet_wallet_signer::{
    Cli, Commands, Config, InitArgs, Keystore, ParseKeyArgs, SignArgs, SignHashArgs,
    SignableTransaction, SignerAdapter, SignerArgs, TransactionDetails, TransactionSigner,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => init_keystore(args, cli.signer),
        Commands::PublicKey => public_key(cli.signer).await,
        Commands::SignHash(args) => sign_hash(args, cli.signer).await,
        Commands::Sign(args) => sign(args, cli.signer).await,
        Commands::ParseP256Key(args) => parse_key(args, &cli.signer),
    }
}

fn init_logging(level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Load, validate and build the configured signer
async fn load_adapter(args: &SignerArgs) -> Result<(Config, SignerAdapter)> {
    let config = Config::load(args)?;
    init_logging(&config.logging.level)?;

    info!(
        "Starting Starknet Wallet Signer v{}",
        env!("CARGO_PKG_VERSION")
    );

    config.validate()?;

    info!("📊 Configuration loaded:");
    info!("  Signer backend: {}", config.signer.backend);
    info!("  Network: {}", config.network.chain_id);

    let adapter = config.build_adapter().await?;
    Ok((config, adapter))
}

fn init_keystore(args: InitArgs, signer: SignerArgs) -> Result<()> {
    init_logging(signer.log_level.as_deref().unwrap_or("info"))?;

    info!("Creating encrypted keystore at: {}", args.output);

    let passphrase = passphrase_or_prompt(
        signer.passphrase,
        "Enter passphrase for new keystore: ",
        true,
    )?;
    Keystore::create_keystore(&args.output, &args.private_key, passphrase.expose())?;

    info!("✅ Keystore created successfully!");
    warn!("⚠️  Keep your passphrase secure - it cannot be recovered!");

    Ok(())
}

async fn public_key(signer: SignerArgs) -> Result<()> {
    let (_, adapter) = load_adapter(&signer).await?;
    let public_key = adapter.public_key().await?;

    let felts: Vec<String> = public_key.to_felts().iter().map(felt_to_hex).collect();
    let output = json!({
        "scheme": public_key.scheme(),
        "public_key": public_key.to_string(),
        "felts": felts,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn sign_hash(args: SignHashArgs, signer: SignerArgs) -> Result<()> {
    let hash = parse_felt(&args.hash)?;
    let (_, adapter) = load_adapter(&signer).await?;

    let signature = adapter.sign_hash(hash).await?;
    let felts: Vec<String> = signature.to_felts().iter().map(felt_to_hex).collect();
    let output = json!({
        "hash": felt_to_hex(&hash),
        "scheme": signature.scheme(),
        "signature": felts,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn sign(args: SignArgs, signer: SignerArgs) -> Result<()> {
    let raw = std::fs::read_to_string(&args.tx)
        .with_context(|| format!("Failed to read transaction file {}", args.tx))?;
    let details: TransactionDetails = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid transaction details in {}", args.tx))?;

    let (config, adapter) = load_adapter(&signer).await?;
    let transaction = SignableTransaction::new(details, config.chain_id()?, args.version)?;
    info!(
        "Transaction hash for {}: {:#x}",
        transaction.sender_address(),
        transaction.hash()
    );

    let signed = adapter.sign_transaction(&transaction).await?;
    println!("{}", serde_json::to_string_pretty(&signed.to_json())?);
    Ok(())
}

fn parse_key(args: ParseKeyArgs, signer: &SignerArgs) -> Result<()> {
    init_logging(signer.log_level.as_deref().unwrap_or("info"))?;

    let raw = args.hex.trim();
    let raw = raw.strip_prefix("0x").unwrap_or(raw);
    let bytes = hex::decode(raw).context("Public key is not valid hex")?;
    let coordinates = parse_p256_public_key(&bytes)?;

    let felts: Vec<String> = coordinates.to_felts().iter().map(felt_to_hex).collect();
    let output = json!({
        "x": format!("0x{}", hex::encode(coordinates.x())),
        "y": format!("0x{}", hex::encode(coordinates.y())),
        "felts": felts,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
