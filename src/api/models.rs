use serde::{Deserialize, Serialize};

/// Who produced a turn, in the provider's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Model,
}

impl Speaker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::User => "user",
            Speaker::Model => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderTurn {
    pub speaker: Speaker,
    pub text: String,
}

/// Everything the remote API needs to continue a chat by one turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub history: Vec<ProviderTurn>,
    pub message: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub role: Speaker,
    pub parts: Vec<Part>,
}

impl From<&ProviderTurn> for Content {
    fn from(turn: &ProviderTurn) -> Self {
        Content {
            role: turn.speaker,
            parts: vec![Part {
                text: turn.text.clone(),
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireGenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    pub contents: Vec<Content>,
    pub generation_config: WireGenerationConfig,
}

impl From<&ChatRequest> for RequestBody {
    fn from(request: &ChatRequest) -> Self {
        let mut contents: Vec<Content> = request.history.iter().map(Content::from).collect();
        contents.push(Content {
            role: Speaker::User,
            parts: vec![Part {
                text: request.message.clone(),
            }],
        });

        RequestBody {
            contents,
            generation_config: WireGenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_output_tokens,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    pub fn supports(&self, method: &str) -> bool {
        self.supported_generation_methods.iter().any(|m| m == method)
    }

    /// Model id without the `models/` resource prefix.
    pub fn id(&self) -> &str {
        self.name.strip_prefix("models/").unwrap_or(&self.name)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListModelsResponse {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}
