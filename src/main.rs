use clap::Parser;
use colored::*;
use std::process;
use std::sync::Arc;

use gemchat::api::{default_model_index, discover_models, fallback_models, GeminiClient, ModelApi};
use gemchat::cli::Args;
use gemchat::config::{Config, FileConfig};
use gemchat::session::SessionRegistry;
use gemchat::ui::{
    display_error, display_key_status, display_message, display_models, display_turn_error,
    MarkdownRenderer, Repl,
};

fn init_logger(verbose: bool) {
    let default_filter = if verbose { "warn,gemchat=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn print_usage() {
    eprintln!("{}", "Usage: gemchat [OPTIONS] [PROMPT]...".red());
    eprintln!(
        "{}",
        "  PROMPT must contain text; run without it to start the interactive chat.".dimmed()
    );
    eprintln!(
        "{}",
        "  -m, --model <MODEL>           Gemini model to use".dimmed()
    );
    eprintln!(
        "{}",
        "      --list-models             List available models and exit".dimmed()
    );
    eprintln!("{}", "  -h, --help                    Show all options".dimmed());
}

fn build_client(config: &Config) -> gemchat::error::Result<Option<Arc<dyn ModelApi>>> {
    match &config.api_key {
        Some(api_key) => {
            let client =
                GeminiClient::with_base_url(api_key, &config.api_endpoint, config.request_timeout)?;
            Ok(Some(Arc::new(client)))
        }
        None => Ok(None),
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if !args.prompt.is_empty() && args.one_shot_prompt().is_none() {
        print_usage();
        process::exit(1);
    }

    if args.config_init {
        let Some(path) = FileConfig::global_config_dir().map(|dir| dir.join("gemchat.yaml")) else {
            display_error("Could not determine home directory");
            process::exit(1);
        };
        match FileConfig::write_example(&path) {
            Ok(()) => {
                println!("{}", format!("Wrote {}", path.display()).green());
                return;
            }
            Err(e) => {
                display_error(&e.to_string());
                process::exit(1);
            }
        }
    }

    let config = match Config::from_env_and_args(&args) {
        Ok(config) => config,
        Err(e) => {
            display_error(&e.to_string());
            process::exit(1);
        }
    };

    init_logger(config.verbose);
    log::debug!("Using endpoint {}", config.api_endpoint);

    let client = match build_client(&config) {
        Ok(client) => client,
        Err(e) => {
            display_error(&e.to_string());
            process::exit(1);
        }
    };

    let models = match &client {
        Some(client) => discover_models(client.as_ref()).await,
        None => fallback_models(),
    };

    if args.list_models {
        let selected = &models[default_model_index(&models)];
        display_models(&models, selected);
        return;
    }

    let mut registry = SessionRegistry::new(client);
    let session_id = registry.start();
    let Some(session) = registry.get_mut(&session_id) else {
        display_error("Failed to start session");
        process::exit(1);
    };

    if let Some(prompt) = args.one_shot_prompt() {
        let renderer = MarkdownRenderer::new();
        let outcome = session.manager.submit(prompt, &config.generation).await;
        registry.end(&session_id);
        match outcome {
            Ok(reply) => display_message(&renderer, &reply),
            Err(e) => {
                display_turn_error(&e);
                process::exit(1);
            }
        }
        return;
    }

    display_key_status(session.manager.is_configured());
    let mut repl = Repl::new(session, config.generation.clone(), models);
    let result = repl.run().await;
    registry.end(&session_id);

    if let Err(e) = result {
        display_error(&e.to_string());
        process::exit(1);
    }
}
