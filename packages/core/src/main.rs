use clap::Parser;
use dotenvy::dotenv;
use serde_json::Value;

use request_kit::cli::{Cli, HttpVerb};
use request_kit::client::ApiClient;
use request_kit::config::ClientConfig;
use request_kit::error::AppError;
use request_kit::logging::init_logging;

#[tokio::main]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();

    let config = ClientConfig::from_env()
        .map(|config| cli.apply(config))
        .map_err(AppError::Config);

    let dev_mode = config.as_ref().map(|c| c.dev_mode).unwrap_or(cli.dev);
    init_logging(dev_mode);

    let config = config.unwrap_or_else(|err| {
        tracing::error!("{}", err);
        std::process::exit(1);
    });

    let client = ApiClient::new(config);

    match run(&client, &cli).await {
        Ok(data) => match serde_json::to_string_pretty(&data) {
            Ok(text) => println!("{}", text),
            Err(err) => {
                tracing::error!("Could not render response: {}", err);
                std::process::exit(1);
            }
        },
        Err(err) => {
            tracing::error!("{}", err);
            std::process::exit(1);
        }
    }
}

async fn run(client: &ApiClient, cli: &Cli) -> Result<Value, AppError> {
    let payload: Option<Value> = cli
        .data
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .map_err(|err| AppError::Config(format!("--data is not valid JSON: {}", err)))?;

    let endpoint = cli.endpoint.as_str();
    let data: Value = match cli.method {
        HttpVerb::Get => client.get(endpoint).await?,
        HttpVerb::Post => client.post(endpoint, payload.as_ref()).await?,
        HttpVerb::Put => client.put(endpoint, payload.as_ref()).await?,
        HttpVerb::Patch => client.patch(endpoint, payload.as_ref()).await?,
        HttpVerb::Delete => client.delete(endpoint).await?,
    };

    Ok(data)
}
