use clap::{Parser, Subcommand};
use reqwest::Method;
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "api-smoke")]
#[command(about = "Exercise a running users service and print each response", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:8000")]
    url: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full walkthrough (default)
    All,
    /// Root and health endpoints
    Health,
    /// List users
    List {
        #[arg(long, default_value_t = 0)]
        skip: usize,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long)]
        active_only: bool,
    },
    /// Fetch one user and their profile
    Get { id: u64 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/').to_string();

    println!("Testing users API at {}", base);

    match cli.command.unwrap_or(Commands::All) {
        Commands::All => {
            call(&client, Method::GET, &base, "/", &[], None).await?;
            call(&client, Method::GET, &base, "/health", &[], None).await?;
            call(&client, Method::GET, &base, "/users/", &[("skip", "0"), ("limit", "5")], None).await?;
            call(&client, Method::GET, &base, "/users/1", &[], None).await?;
            call(&client, Method::GET, &base, "/users/1/profile", &[("include_stats", "true")], None).await?;

            let new_user = json!({
                "name": "Alice Johnson",
                "email": "alice@example.com",
                "age": 28
            });
            call(&client, Method::POST, &base, "/users/", &[], Some(new_user)).await?;

            let update = json!({
                "name": "Alice Johnson (Updated)",
                "age": 29
            });
            call(&client, Method::PUT, &base, "/users/3", &[], Some(update)).await?;
            call(&client, Method::GET, &base, "/users/", &[("active_only", "true")], None).await?;
        }
        Commands::Health => {
            call(&client, Method::GET, &base, "/", &[], None).await?;
            call(&client, Method::GET, &base, "/health", &[], None).await?;
        }
        Commands::List { skip, limit, active_only } => {
            let skip = skip.to_string();
            let limit = limit.to_string();
            let active_only = active_only.to_string();
            let params = [
                ("skip", skip.as_str()),
                ("limit", limit.as_str()),
                ("active_only", active_only.as_str()),
            ];
            call(&client, Method::GET, &base, "/users/", &params, None).await?;
        }
        Commands::Get { id } => {
            call(&client, Method::GET, &base, &format!("/users/{}", id), &[], None).await?;
            call(&client, Method::GET, &base, &format!("/users/{}/profile", id), &[("include_stats", "true")], None).await?;
        }
    }

    println!("\n{}", "=".repeat(50));
    println!("API testing complete");
    Ok(())
}

async fn call(
    client: &reqwest::Client,
    method: Method,
    base: &str,
    path: &str,
    params: &[(&str, &str)],
    body: Option<Value>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n{}", "=".repeat(50));
    println!("Testing: {} {}", method, path);
    if !params.is_empty() {
        println!("Query params: {:?}", params);
    }
    if let Some(body) = &body {
        println!("Request body: {}", serde_json::to_string_pretty(body)?);
    }

    let mut request = client.request(method, format!("{}{}", base, path)).query(params);
    if let Some(body) = &body {
        request = request.json(body);
    }

    let res = match request.send().await {
        Ok(res) => res,
        Err(e) if e.is_connect() => {
            eprintln!("Error: could not connect to the API. Is the server running?");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    println!("Status Code: {}", status.as_u16());

    let text = res.text().await?;
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("Response: {}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("Response: {}", text),
    }
    Ok(())
}
