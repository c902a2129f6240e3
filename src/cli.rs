use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "gemchat")]
#[command(about = "Terminal chat assistant powered by the Google Gemini API", long_about = None)]
pub struct Args {
    #[arg(short = 'm', long = "model", help = "Gemini model to use")]
    pub model: Option<String>,

    #[arg(
        short = 't',
        long = "temperature",
        help = "Sampling temperature between 0.0 and 2.0"
    )]
    pub temperature: Option<f32>,

    #[arg(
        long = "max-output-tokens",
        help = "Maximum number of tokens in a reply (100-8192)"
    )]
    pub max_output_tokens: Option<u32>,

    #[arg(
        long = "api-endpoint",
        help = "Custom API base URL (e.g., http://localhost:8080/v1beta)"
    )]
    pub api_endpoint: Option<String>,

    #[arg(long = "list-models", help = "List available models and exit")]
    pub list_models: bool,

    #[arg(short = 'v', long = "verbose", help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        long = "config-init",
        help = "Write an example config file to ~/.config/gemchat/gemchat.yaml"
    )]
    pub config_init: bool,

    #[arg(help = "Send a single message and exit instead of starting the chat")]
    pub prompt: Vec<String>,
}

impl Args {
    /// The one-shot message, or `None` when no prompt words were given or
    /// they are all blank.
    pub fn one_shot_prompt(&self) -> Option<String> {
        let prompt = self.prompt.join(" ");
        let prompt = prompt.trim();
        if prompt.is_empty() {
            None
        } else {
            Some(prompt.to_string())
        }
    }
}
