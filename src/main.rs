use clap::Parser;
use std::io::Write;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use streakcard::card::{LocaleCatalog, ThemeCatalog};
use streakcard::{
    ClientConfig, CommandRasterizer, Config, CardRenderer, GitHubClient, OutputGenerator,
    RequestParams, StreakPipeline, TokenPool,
};

#[derive(Parser, Debug)]
#[command(name = "streakcard")]
#[command(version = "0.1.0")]
#[command(about = "Render a GitHub contribution streak card as SVG, PNG or JSON")]
struct Args {
    /// URL-encoded request parameters, e.g. "user=octocat&theme=dark"
    #[arg(short, long, default_value = "")]
    query: String,

    /// Extra request parameter as key=value (repeatable)
    #[arg(short, long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<String>,

    /// Print the built-in theme names and exit
    #[arg(long)]
    list_themes: bool,

    /// Print the built-in locale codes and exit
    #[arg(long)]
    list_locales: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("streakcard=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    if args.list_themes {
        println!("{}", ThemeCatalog::builtin().names().join("\n"));
        return Ok(());
    }
    if args.list_locales {
        println!("{}", LocaleCatalog::builtin().codes().join("\n"));
        return Ok(());
    }

    let params = request_params(&args)?;
    let config = Config::from_env()?;

    let tokens = TokenPool::new(config.github_tokens.clone());
    let github = GitHubClient::new(&ClientConfig::from(&config), tokens)?;
    let rasterizer = Arc::new(CommandRasterizer::new(config.rasterize_command.clone()));
    let pipeline = StreakPipeline::new(github, OutputGenerator::new(CardRenderer::new(), rasterizer));

    let response = pipeline.render_request(&params).await;
    tracing::info!("Status {} ({})", response.status, response.content_type);

    if let Some(ref path) = args.output {
        std::fs::write(path, response.body.as_bytes())?;
        tracing::info!("Output written to: {}", path);
    } else {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(response.body.as_bytes())?;
        stdout.flush()?;
    }

    if response.status != 200 {
        std::process::exit(1);
    }
    Ok(())
}

fn request_params(args: &Args) -> anyhow::Result<RequestParams> {
    let mut params = RequestParams::from_query(&args.query);
    for pair in &args.params {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("Expected key=value, got: {}", pair))?;
        params.insert(key.trim(), value);
    }
    Ok(params)
}
