//! Fraud dashboard - look up a sample transaction (or describe a new one)
//! and ask the scoring API for its fraud probability.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde_json::json;

use fraud_scoring::dashboard::{
    format_probability, minutes_since_midnight, SampleDataset, SampleTransaction, ScoreReport,
    ScoringClient,
};

#[derive(Parser)]
#[command(name = "fraud-dashboard", version, about = "Portail client - détection de fraude bancaire")]
struct Cli {
    /// Base URL of the scoring API
    #[arg(long, env = "FRAUD_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    /// CSV file of sample transactions
    #[arg(long, env = "DASHBOARD_DATA", default_value = "data/bank.csv")]
    data: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score the sample transaction with this Transaction_ID
    Lookup { transaction_id: String },
    /// Score a randomly chosen sample transaction
    Random,
    /// Score a new transaction described on the command line
    Submit(SubmitArgs),
}

#[derive(Args)]
struct SubmitArgs {
    #[arg(long)]
    user_id: i64,
    #[arg(long)]
    amount: f64,
    #[arg(long, default_value_t = 0)]
    account_age: i64,
    #[arg(long, default_value = "Mobile")]
    device: String,
    #[arg(long, default_value = "Online Purchase")]
    transaction_type: String,
    #[arg(long, default_value = "Debit Card")]
    payment_method: String,
    #[arg(long)]
    location: String,
    #[arg(long, default_value_t = 0)]
    previous_frauds: i64,
    #[arg(long, default_value_t = 0)]
    transactions_24h: i64,
    /// Time of day, HH:MM or HH:MM:SS
    #[arg(long)]
    time: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let client = ScoringClient::new(&cli.api_url);

    match cli.command {
        Command::Lookup { transaction_id } => {
            let data = load_data(&cli.data)?;
            match data.find(&transaction_id) {
                Some(sample) => score_sample(&client, sample).await,
                None => println!("Transaction_ID introuvable dans la base."),
            }
        }
        Command::Random => {
            let data = load_data(&cli.data)?;
            let picked = data.random(&mut rand::thread_rng());
            match picked {
                Some(sample) => score_sample(&client, sample).await,
                None => println!("Aucune transaction dans {}", cli.data.display()),
            }
        }
        Command::Submit(args) => {
            let payload = json!({
                "User_ID": args.user_id,
                "Transaction_Amount": args.amount,
                "Transaction_Type": args.transaction_type,
                "Time_of_Transaction": minutes_since_midnight(&args.time)?,
                "Device_Used": args.device,
                "Location": args.location,
                "Previous_Fraudulent_Transactions": args.previous_frauds,
                "Account_Age": args.account_age,
                "Number_of_Transactions_Last_24H": args.transactions_24h,
                "Payment_Method": args.payment_method,
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
            show(client.predict(&payload).await);
        }
    }

    Ok(())
}

fn load_data(path: &Path) -> anyhow::Result<SampleDataset> {
    SampleDataset::load(path).with_context(|| format!("Failed to read {}", path.display()))
}

async fn score_sample(client: &ScoringClient, sample: &SampleTransaction) {
    println!("📊 Informations du client");
    for (label, value) in sample.summary() {
        println!("  {:<28} {}", label, value);
    }

    match sample.payload() {
        Ok(payload) => show(client.predict(&payload).await),
        Err(e) => eprintln!("{}", e),
    }
}

fn show(outcome: Result<ScoreReport, fraud_scoring::dashboard::DashboardError>) {
    match outcome {
        Ok(report) => println!(
            "🤖 La probabilité que ce client soit frauduleux est de {} ({})",
            format_probability(report.probability),
            report.interpretation
        ),
        Err(e) => eprintln!("{}", e),
    }
}
