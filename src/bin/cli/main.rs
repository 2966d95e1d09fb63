use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use product_catalog::{adapters::inbound::http::ProblemDetails, ProductCategory, ProductId};
use reqwest::{multipart, Client, Response, StatusCode};
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "catalog-cli")]
#[command(about = "CLI for interacting with the product catalog server", long_about = None)]
struct Cli {
    /// Server URL
    #[arg(short, long, env = "CATALOG_URL", default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a product
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        price: Decimal,
        #[arg(long)]
        category: ProductCategory,
    },

    /// Show a single product
    Get {
        id: ProductId,
    },

    /// List products
    List {
        #[arg(long)]
        min_price: Option<Decimal>,
        #[arg(long)]
        max_price: Option<Decimal>,
        #[arg(long)]
        active: Option<bool>,
        #[arg(long)]
        category: Option<ProductCategory>,
        #[arg(long, default_value = "1")]
        page: i64,
        #[arg(long, default_value = "10")]
        page_size: i64,
    },

    /// Change fields of a product; omitted fields are left as they are
    Edit {
        id: ProductId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<Decimal>,
        #[arg(long)]
        active: Option<bool>,
        #[arg(long)]
        category: Option<ProductCategory>,
    },

    /// Delete a product
    Delete {
        id: ProductId,
    },

    /// Attach an image file to a product
    Upload {
        id: ProductId,
        /// Image file path
        file: PathBuf,
    },
}

impl Commands {
    async fn run(self, client: &Client, base: &str) -> Result<Response> {
        let request = match self {
            Commands::Create {
                name,
                description,
                price,
                category,
            } => client.post(format!("{base}/products")).json(&json!({
                "name": name,
                "description": description,
                "price": price,
                "category": category,
            })),
            Commands::Get { id } => client
                .get(format!("{base}/products"))
                .query(&[("id", id.to_string())]),
            Commands::List {
                min_price,
                max_price,
                active,
                category,
                page,
                page_size,
            } => {
                let mut query = vec![
                    ("page", page.to_string()),
                    ("pageSize", page_size.to_string()),
                ];
                query.extend(min_price.map(|v| ("minPrice", v.to_string())));
                query.extend(max_price.map(|v| ("maxPrice", v.to_string())));
                query.extend(active.map(|v| ("active", v.to_string())));
                query.extend(category.map(|v| ("category", v.to_string())));
                client.get(format!("{base}/products")).query(&query)
            }
            Commands::Edit {
                id,
                name,
                description,
                price,
                active,
                category,
            } => {
                let mut changes = Map::new();
                changes.extend(name.map(|v| ("name".to_string(), json!(v))));
                changes.extend(description.map(|v| ("description".to_string(), json!(v))));
                changes.extend(price.map(|v| ("price".to_string(), json!(v))));
                changes.extend(active.map(|v| ("active".to_string(), json!(v))));
                changes.extend(category.map(|v| ("category".to_string(), json!(v))));
                client
                    .put(format!("{base}/products/{id}"))
                    .json(&Value::Object(changes))
            }
            Commands::Delete { id } => client.delete(format!("{base}/products/{id}")),
            Commands::Upload { id, file } => {
                let content = tokio::fs::read(&file)
                    .await
                    .with_context(|| format!("Failed to read {}", file.display()))?;
                let file_name = file
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let form = multipart::Form::new()
                    .part("file", multipart::Part::bytes(content).file_name(file_name));
                client
                    .post(format!("{base}/products/{id}/image"))
                    .multipart(form)
            }
        };

        request.send().await.context("Request failed")
    }
}

async fn print_response(response: Response) -> Result<()> {
    let status = response.status();

    if status == StatusCode::NO_CONTENT {
        println!("{status}");
        return Ok(());
    }

    if status.is_success() {
        let body: Value = response.json().await.context("Invalid response body")?;
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    match response.json::<ProblemDetails>().await {
        Ok(problem) => {
            for (field, messages) in problem.errors.iter().flatten() {
                for message in messages {
                    eprintln!("  {field}: {message}");
                }
            }
            bail!("{} ({}): {}", problem.title, problem.status, problem.detail)
        }
        Err(_) => bail!("Request failed with {status}"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let base = cli.url.trim_end_matches('/').to_string();

    let client = Client::new();
    let response = cli.command.run(&client, &base).await?;
    print_response(response).await
}
