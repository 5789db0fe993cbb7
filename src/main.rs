use anyhow::Result;
use clap::Parser;
use tracing::info;

use routing_quoter::config::Config;
use routing_quoter::{monitoring, QuoteRequest, Quoter, RouterPreference, TradeType};

/// Fetch one quote from the routing API, falling back to the local pool router.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(long)]
    token_in: String,
    #[arg(long, default_value_t = 1)]
    token_in_chain: u64,
    #[arg(long)]
    token_out: String,
    /// Defaults to the input chain
    #[arg(long)]
    token_out_chain: Option<u64>,
    /// Base units of the input token, or of the output token with --exact-output
    #[arg(long)]
    amount: String,
    #[arg(long)]
    exact_output: bool,
    #[arg(long, default_value = "api")]
    preference: RouterPreference,
    #[arg(long)]
    account: Option<String>,
    #[arg(long)]
    force_synthetic: bool,
    #[arg(long)]
    send_portion: bool,
    #[arg(long)]
    gateway_dns: bool,
}

impl From<Cli> for QuoteRequest {
    fn from(cli: Cli) -> Self {
        QuoteRequest {
            account: cli.account,
            token_in_address: cli.token_in,
            token_in_chain_id: cli.token_in_chain,
            token_out_address: cli.token_out,
            token_out_chain_id: cli.token_out_chain.unwrap_or(cli.token_in_chain),
            amount: cli.amount,
            trade_type: if cli.exact_output {
                TradeType::ExactOutput
            } else {
                TradeType::ExactInput
            },
            router_preference: cli.preference,
            force_synthetic_quotes: cli.force_synthetic,
            send_portion_enabled: cli.send_portion,
            gateway_dns_update_enabled: cli.gateway_dns,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load local .env if present (no-op when the environment is already set)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let cfg = Config::from_env()?;
    monitoring::init_tracing(cfg.log_format);
    info!(?cfg, "boot");

    let quoter = Quoter::from_config(&cfg)?;
    let result = quoter.get_quote(&cli.into()).await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
