use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use prompt_designer::config::DEFAULT_LANGUAGE;
use prompt_designer::server::DEFAULT_ALLOWED_ORIGIN;
use prompt_designer::{
    GeneratorOptions, Pipeline, PipelineConfig, Provider, ServerConfig, UserRequest,
    build_generator, run_serve,
};

#[derive(Parser)]
#[command(name = "prompt-designer")]
#[command(author, version, about = "Design reusable LLM prompts with a structure, write, review pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the POST /design_prompt endpoint
    Serve {
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Frontend origin allowed to call the API (repeatable)
        #[arg(
            long = "allowed-origin",
            env = "PROMPT_DESIGNER_ALLOWED_ORIGINS",
            value_delimiter = ',',
            default_value = DEFAULT_ALLOWED_ORIGIN
        )]
        allowed_origins: Vec<String>,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Run the pipeline once and print the result
    Design {
        /// What the prompt should do
        #[arg(short, long)]
        request: String,

        /// Print only the final prompt extracted from the review
        #[arg(long, conflicts_with = "json")]
        final_only: bool,

        /// Print the result and trace as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        model: ModelArgs,
    },
}

#[derive(Args)]
struct ModelArgs {
    /// Text generation provider
    #[arg(long, value_enum, default_value_t = Provider::OpenAi)]
    provider: Provider,

    /// Model for all three stages (provider default when omitted)
    #[arg(long)]
    model: Option<String>,

    /// Language the agents write in
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    language: String,

    /// Sampling temperature
    #[arg(long)]
    temperature: Option<f64>,

    /// Timeout per model call in seconds
    #[arg(long, default_value = "120")]
    timeout_secs: u64,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl ModelArgs {
    fn build_pipeline(&self) -> Result<Pipeline> {
        let model = self
            .model
            .as_deref()
            .unwrap_or(self.provider.default_model());
        info!(
            "Provider {:?}, model {}, language {}",
            self.provider, model, self.language
        );

        let generator = build_generator(&GeneratorOptions {
            provider: self.provider,
            temperature: self.temperature,
            timeout: Duration::from_secs(self.timeout_secs),
        })?;

        Ok(Pipeline::new(PipelineConfig::new(model, &self.language), generator))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            allowed_origins,
            model,
        } => {
            setup_logging(model.verbose);
            let pipeline = Arc::new(model.build_pipeline()?);
            let config = ServerConfig {
                host,
                port,
                allowed_origins,
            };
            run_serve(pipeline, &config).await
        }
        Commands::Design {
            request,
            final_only,
            json,
            model,
        } => {
            setup_logging(model.verbose);
            let pipeline = model.build_pipeline()?;
            design_once(&pipeline, request, final_only, json).await
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn design_once(
    pipeline: &Pipeline,
    request: String,
    final_only: bool,
    json: bool,
) -> Result<()> {
    let request = UserRequest::new(request)?;
    let run = pipeline
        .run_traced(&request)
        .await
        .context("Prompt design failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&run)?);
        return Ok(());
    }

    let review = run.result.review();
    if final_only {
        println!("{}", review.final_prompt());
        return Ok(());
    }

    println!("Structure");
    println!("=========");
    println!("{}", run.result.structure());
    println!();
    println!("Draft Prompt");
    println!("============");
    println!("{}", run.result.draft_prompt());
    println!();
    println!("Review ({:?})", review.verdict());
    println!("======");
    println!("{}", review);

    info!("Trace {} finished in {}ms", run.trace.trace_id, run.trace.elapsed_ms);
    Ok(())
}
