use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use serde_json::{json, Map, Value};

use traefik_config_manager::document::{
    generator, Document, Editor, Entity, Insertion, RenderOptions, ServiceTargets,
};

#[derive(Parser)]
#[command(name = "traefik-cli")]
#[command(about = "Management CLI for the Traefik Config Manager", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add routing for a host
    AddHost {
        hostname: String,
        #[command(flatten)]
        overrides: RemoteOverrides,
    },
    /// Remove routing for a host
    DeleteHost {
        hostname: String,
        #[command(flatten)]
        overrides: RemoteOverrides,
    },
    /// Print the stored configuration
    Config {
        #[command(flatten)]
        overrides: RemoteOverrides,
    },
    /// List service URLs
    Services {
        #[command(flatten)]
        overrides: RemoteOverrides,
    },
    /// Check service health
    Health,
    /// Print the blocks that would be added for a host
    Render {
        hostname: String,
        #[command(flatten)]
        routing: LocalRouting,
    },
    /// Add a host to a local document and print the result
    Insert {
        #[arg(short, long)]
        file: PathBuf,
        hostname: String,
        #[command(flatten)]
        routing: LocalRouting,
    },
    /// Remove a host from a local document and print the result
    Remove {
        #[arg(short, long)]
        file: PathBuf,
        hostname: String,
        #[arg(long)]
        strict: bool,
    },
    /// List service bindings in a local document
    Bindings {
        #[arg(short, long)]
        file: PathBuf,
    },
}

/// Per-call overrides; any flag switches to the `-custom` endpoints.
#[derive(Args, Default)]
struct RemoteOverrides {
    #[arg(long)]
    application_id: Option<String>,
    #[arg(long)]
    api_key: Option<String>,
    #[arg(long)]
    api_domain: Option<String>,
    #[arg(long)]
    backend_service: Option<String>,
    #[arg(long)]
    frontend_service: Option<String>,
    #[arg(long)]
    service_name: Option<String>,
    #[arg(long)]
    service_port: Option<u16>,
    #[arg(long)]
    skip_middlewares: bool,
}

impl RemoteOverrides {
    fn to_json(&self) -> Map<String, Value> {
        let mut body = Map::new();
        let strings = [
            ("applicationId", &self.application_id),
            ("dokployApiKey", &self.api_key),
            ("apiDomain", &self.api_domain),
            ("backendService", &self.backend_service),
            ("frontendService", &self.frontend_service),
            ("serviceName", &self.service_name),
        ];
        for (key, value) in strings {
            if let Some(value) = value {
                body.insert(key.to_string(), json!(value));
            }
        }
        if let Some(port) = self.service_port {
            body.insert("servicePort".to_string(), json!(port));
        }
        if self.skip_middlewares {
            body.insert("skipMiddlewares".to_string(), json!(true));
        }
        body
    }
}

#[derive(Args)]
struct LocalRouting {
    #[arg(long, default_value = "backend")]
    backend_service: String,
    #[arg(long, default_value = "frontend")]
    frontend_service: String,
    /// Route everything to one service instead
    #[arg(long)]
    service_name: Option<String>,
    #[arg(long, default_value_t = generator::DEFAULT_PORT)]
    port: u16,
    #[arg(long)]
    skip_middlewares: bool,
    #[arg(long)]
    strict: bool,
}

impl LocalRouting {
    fn plan(&self) -> (ServiceTargets, RenderOptions) {
        let mut options = RenderOptions {
            skip_middlewares: self.skip_middlewares,
            port: self.port,
            ..RenderOptions::default()
        };
        let targets = match &self.service_name {
            Some(name) => {
                options.separate_frontend_backend = false;
                ServiceTargets::shared(name.as_str())
            }
            None => ServiceTargets::new(self.backend_service.as_str(), self.frontend_service.as_str()),
        };
        (targets, options)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::AddHost { hostname, overrides } => {
            let res = host_request(&client, &cli.url, "add-host", reqwest::Method::POST, &hostname, &overrides)
                .await?;
            print_response(res).await?;
        }
        Commands::DeleteHost { hostname, overrides } => {
            let res = host_request(&client, &cli.url, "delete-host", reqwest::Method::DELETE, &hostname, &overrides)
                .await?;
            print_response(res).await?;
        }
        Commands::Config { overrides } => {
            let res = read_request(&client, &cli.url, "config", &overrides).await?;
            print_response(res).await?;
        }
        Commands::Services { overrides } => {
            let res = read_request(&client, &cli.url, "services", &overrides).await?;
            print_response(res).await?;
        }
        Commands::Health => {
            let res = client.get(format!("{}/api/health", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Render { hostname, routing } => {
            let entity = Entity::new(&hostname)?;
            let (targets, options) = routing.plan();
            let editor = Editor::with_strict_matching(routing.strict);
            print!("{}", generator::render_block_with(&entity, &targets, &options, editor.policy()));
            if !options.separate_frontend_backend {
                print!(
                    "{}",
                    generator::render_service_block_with(&entity, &targets, &options, editor.policy())
                );
            }
        }
        Commands::Insert { file, hostname, routing } => {
            let doc = read_document(&file)?;
            let entity = Entity::new(&hostname)?;
            let (targets, options) = routing.plan();
            let editor = Editor::with_strict_matching(routing.strict);
            match editor.add_host(&doc, &entity, &targets, &options)? {
                Insertion::Inserted(updated) => print!("{}", updated.to_text()),
                Insertion::AlreadyExists => {
                    eprintln!("Host '{}' already exists", hostname);
                    print!("{}", doc.to_text());
                }
            }
        }
        Commands::Remove { file, hostname, strict } => {
            let doc = read_document(&file)?;
            let entity = Entity::new(&hostname)?;
            let editor = Editor::with_strict_matching(strict);
            print!("{}", editor.remove_host(&doc, &entity).to_text());
        }
        Commands::Bindings { file } => {
            let doc = read_document(&file)?;
            let bindings = Editor::default().bindings(&doc);
            println!("{}", serde_json::to_string_pretty(&bindings)?);
        }
    }

    Ok(())
}

fn read_document(path: &Path) -> Result<Document, std::io::Error> {
    let text = std::fs::read_to_string(path)?;
    Ok(Document::from_text(&text))
}

async fn host_request(
    client: &reqwest::Client,
    base: &str,
    endpoint: &str,
    method: reqwest::Method,
    hostname: &str,
    overrides: &RemoteOverrides,
) -> Result<reqwest::Response, reqwest::Error> {
    let mut body = overrides.to_json();
    let path = if body.is_empty() {
        endpoint.to_string()
    } else {
        format!("{endpoint}-custom")
    };
    body.insert("hostname".to_string(), json!(hostname));

    client
        .request(method, format!("{}/api/traefik/{}", base, path))
        .json(&body)
        .send()
        .await
}

async fn read_request(
    client: &reqwest::Client,
    base: &str,
    endpoint: &str,
    overrides: &RemoteOverrides,
) -> Result<reqwest::Response, reqwest::Error> {
    let body = overrides.to_json();
    if body.is_empty() {
        client.get(format!("{}/api/traefik/{}", base, endpoint)).send().await
    } else {
        client
            .post(format!("{}/api/traefik/{}-custom", base, endpoint))
            .json(&body)
            .send()
            .await
    }
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
