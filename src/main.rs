use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use ton_wallet_link::config::{load_config, LinkConfig};
use ton_wallet_link::observability::logging;
use ton_wallet_link::wallet::{
    ChannelConnector, Network, TokenRegistry, TransferRequest, WalletLink,
};
use ton_wallet_link::IndexerClient;

#[derive(Parser)]
#[command(name = "ton-wallet-link")]
#[command(about = "TON wallet balances and transfers through a wallet-connect provider", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the indexer base URL.
    #[arg(long)]
    indexer: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List known jetton symbols and their master contracts
    Tokens,
    /// Jetton balance of an account (prints 0 if the lookup fails)
    Balance {
        #[arg(long)]
        account: String,
        /// Coin symbol or jetton master address
        #[arg(long)]
        token: String,
    },
    /// Native balance of an account in nanotons
    NativeBalance {
        #[arg(long)]
        account: String,
    },
    /// Jetton wallet address an owner holds for a token
    JettonWallet {
        #[arg(long)]
        owner: String,
        /// Coin symbol or jetton master address
        #[arg(long)]
        token: String,
    },
    /// Prepare a transfer and hand it to the wallet over stdin/stdout
    Transfer {
        /// Connected wallet address
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Amount in base units (nanotons for TON)
        #[arg(long)]
        amount: String,
        /// Coin symbol; omit for native TON
        #[arg(long)]
        coin: Option<String>,
        /// Text comment forwarded with a jetton transfer
        #[arg(long)]
        comment: Option<String>,
        #[arg(long)]
        testnet: bool,
        /// Print the prepared request without submitting it
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => LinkConfig::default(),
    };
    if let Some(url) = cli.indexer {
        config.indexer.base_url = url;
    }

    if let Err(e) = logging::init(&config.observability) {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }
    tracing::debug!(indexer = %config.indexer.base_url, "Configuration loaded");

    let (connector, mut requests) = ChannelConnector::new(1);
    let connector = Arc::new(connector);

    match cli.command {
        Commands::Tokens => {
            for (symbol, master) in TokenRegistry::with_overrides(&config.tokens).iter() {
                println!("{:<10} {}", symbol, master);
            }
        }
        Commands::Balance { account, token } => {
            let link = WalletLink::new(connector, &config)?;
            let jetton = link.tokens().resolve(&token).unwrap_or(token.as_str()).to_string();
            println!("{}", link.fetch_token_balance(&account, &jetton).await);
        }
        Commands::NativeBalance { account } => {
            let link = WalletLink::new(connector, &config)?;
            println!("{}", link.fetch_native_balance(&account).await?);
        }
        Commands::JettonWallet { owner, token } => {
            let tokens = TokenRegistry::with_overrides(&config.tokens);
            let master = tokens.resolve(&token).unwrap_or(token.as_str());
            let indexer = IndexerClient::new(&config.indexer)?;
            println!("{}", indexer.jetton_wallet_address(master, &owner).await?);
        }
        Commands::Transfer {
            from,
            to,
            amount,
            coin,
            comment,
            testnet,
            dry_run,
        } => {
            let network = if testnet { Network::Testnet } else { Network::Mainnet };
            connector.connect(from, network);
            let link = WalletLink::new(connector, &config)?;

            let mut request = TransferRequest::new(to, amount);
            request.coin = coin;
            request.comment = comment;

            if dry_run {
                let prepared = link.prepare_transaction(&request).await?;
                println!("{}", serde_json::to_string_pretty(&prepared)?);
                return Ok(());
            }

            let wallet = tokio::spawn(async move {
                let mut stdin = BufReader::new(tokio::io::stdin()).lines();
                while let Some(pending) = requests.recv().await {
                    match serde_json::to_string_pretty(pending.request()) {
                        Ok(json) => println!("{}", json),
                        Err(e) => {
                            pending.reject(format!("request not printable: {}", e));
                            continue;
                        }
                    }
                    eprintln!("Paste the signed BOC (empty line rejects):");
                    match stdin.next_line().await {
                        Ok(Some(line)) if !line.trim().is_empty() => pending.approve(line.trim()),
                        Ok(_) => pending.reject("rejected at prompt"),
                        Err(e) => pending.reject(format!("stdin error: {}", e)),
                    }
                }
            });

            let outcome = link.send_transaction(&request).await;
            wallet.abort();
            println!("{}", serde_json::to_string_pretty(&outcome?)?);
        }
    }

    Ok(())
}
