use clap::Parser;
use miette::{IntoDiagnostic, Result};
use payment_gateway::application::processor::PaymentProcessor;
use payment_gateway::domain::ports::{BankClientBox, PaymentStoreBox};
use payment_gateway::domain::validation::PaymentValidator;
use payment_gateway::infrastructure::bank::HttpBankClient;
use payment_gateway::infrastructure::in_memory::InMemoryPaymentStore;
use payment_gateway::infrastructure::retry::{RetryPolicy, RetryingBankClient};
use payment_gateway::interfaces::csv::payment_reader::PaymentReader;
use payment_gateway::interfaces::csv::response_writer::ResponseWriter;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input payment requests CSV file
    input: PathBuf,

    /// Base URL of the bank authorization service
    #[arg(long)]
    bank_url: String,

    /// Comma-separated allow-list of accepted currency codes
    #[arg(long, default_value = "USD,EUR,GBP", value_delimiter = ',')]
    currencies: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let store: PaymentStoreBox = Box::new(InMemoryPaymentStore::new());
    let transport = HttpBankClient::new(&cli.bank_url).into_diagnostic()?;
    let bank: BankClientBox = Box::new(RetryingBankClient::new(
        Box::new(transport),
        RetryPolicy::default(),
    ));
    let processor = PaymentProcessor::new(store, bank, PaymentValidator::new(cli.currencies));

    let file = File::open(cli.input).into_diagnostic()?;
    let reader = PaymentReader::new(file);

    let stdout = io::stdout();
    let mut writer = ResponseWriter::new(stdout.lock());

    for request in reader.requests() {
        match request {
            Ok(request) => match processor.process(request).await {
                Ok(response) => writer.write_response(&response).into_diagnostic()?,
                Err(e) => eprintln!("Error processing payment: {}", e),
            },
            Err(e) => eprintln!("Error reading payment request: {}", e),
        }
    }

    Ok(())
}
