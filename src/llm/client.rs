use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::models::Usage;

/// A function the model is forced to call, with its JSON schema.
#[derive(Debug, Clone)]
pub struct FunctionSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: serde_json::Value,
}

/// Parsed function-call arguments plus the invocation's token usage.
#[derive(Debug, Clone)]
pub struct FunctionCall {
    pub arguments: serde_json::Value,
    pub usage: Usage,
}

/// Which deployment to route a completion through, chosen by transcript size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelProfile {
    Standard4k,
    Long16k,
}

impl ModelProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelProfile::Standard4k => "4k",
            ModelProfile::Long16k => "16k",
        }
    }
}

/// Rough token estimate; the transcript is plain prose so chars/4 is close
/// enough to pick a context window.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

pub fn select_model_profile(text: &str, long_context_threshold_tokens: usize) -> ModelProfile {
    if estimate_tokens(text) >= long_context_threshold_tokens {
        ModelProfile::Long16k
    } else {
        ModelProfile::Standard4k
    }
}

/// A classification/extraction capability: send a transcript with a fixed
/// output schema, get back arguments matching that schema plus usage.
#[allow(async_fn_in_trait)]
pub trait ChatCapability {
    async fn call_function(
        &self,
        system: &str,
        user: &str,
        function: &FunctionSpec,
        profile: ModelProfile,
    ) -> PipelineResult<FunctionCall>;
}

/// Configuration for the Azure OpenAI function-calling client
#[derive(Debug, Clone)]
pub struct AzureOpenAiConfig {
    /// API key (from AZURE_OPENAI_API_KEY env var)
    pub api_key: String,
    /// Resource base URL, e.g. "https://my-resource.openai.azure.com"
    pub api_base: String,
    /// API version query parameter
    pub api_version: String,
    /// Deployment used for short transcripts
    pub deployment_4k: String,
    /// Deployment used for long transcripts
    pub deployment_16k: String,
    /// Temperature (0-1, lower = more deterministic)
    pub temperature: f64,
}

impl AzureOpenAiConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("AZURE_OPENAI_API_KEY")
            .context("AZURE_OPENAI_API_KEY environment variable not set")?;
        let api_base = std::env::var("AZURE_OPENAI_API_BASE")
            .context("AZURE_OPENAI_API_BASE environment variable not set")?;
        let deployment_4k = std::env::var("AZURE_OPENAI_DEPLOYMENT_4K")
            .context("AZURE_OPENAI_DEPLOYMENT_4K environment variable not set")?;
        let deployment_16k =
            std::env::var("AZURE_OPENAI_DEPLOYMENT_16K").unwrap_or_else(|_| deployment_4k.clone());
        let api_version = std::env::var("AZURE_OPENAI_API_VERSION")
            .unwrap_or_else(|_| "2023-07-01-preview".to_string());

        Ok(Self {
            api_key,
            api_base,
            api_version,
            deployment_4k,
            deployment_16k,
            temperature: 0.1,
        })
    }

    fn deployment(&self, profile: ModelProfile) -> &str {
        match profile {
            ModelProfile::Standard4k => &self.deployment_4k,
            ModelProfile::Long16k => &self.deployment_16k,
        }
    }
}

/// Azure OpenAI chat-completions client using forced function calls for
/// structured output.
pub struct AzureOpenAiClient {
    client: Client,
    config: AzureOpenAiConfig,
}

impl AzureOpenAiClient {
    pub fn new(config: AzureOpenAiConfig, timeout: Duration) -> PipelineResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PipelineError::transport("openai", e))?;
        Ok(Self { client, config })
    }
}

impl ChatCapability for AzureOpenAiClient {
    async fn call_function(
        &self,
        system: &str,
        user: &str,
        function: &FunctionSpec,
        profile: ModelProfile,
    ) -> PipelineResult<FunctionCall> {
        let url = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.config.api_base.trim_end_matches('/'),
            self.config.deployment(profile),
            self.config.api_version
        );

        let request = ChatCompletionRequest {
            messages: vec![
                Message {
                    role: "system",
                    content: system.to_string(),
                },
                Message {
                    role: "user",
                    content: user.to_string(),
                },
            ],
            functions: vec![FunctionPayload {
                name: function.name,
                description: function.description,
                parameters: function.parameters.clone(),
            }],
            function_call: FunctionChoice {
                name: function.name,
            },
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.config.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::transport("openai", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::ExternalService {
                service: "openai",
                status: status.as_u16(),
                detail: body,
            });
        }

        let completion: ChatCompletionResponse =
            response
                .json()
                .await
                .map_err(|e| PipelineError::ExternalService {
                    service: "openai",
                    status: status.as_u16(),
                    detail: format!("unparsable response body: {e}"),
                })?;

        let call = completion
            .choices
            .first()
            .and_then(|c| c.message.function_call.as_ref())
            .ok_or_else(|| PipelineError::Extraction {
                stage: function.name,
                detail: "completion contains no function call".to_string(),
            })?;

        let arguments: serde_json::Value =
            serde_json::from_str(&call.arguments).map_err(|e| PipelineError::Extraction {
                stage: function.name,
                detail: format!("function arguments are not valid JSON: {e}"),
            })?;

        Ok(FunctionCall {
            arguments,
            usage: Usage {
                prompt_tokens: completion.usage.prompt_tokens,
                completion_tokens: completion.usage.completion_tokens,
                total_tokens: completion.usage.total_tokens,
            },
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    messages: Vec<Message>,
    functions: Vec<FunctionPayload>,
    function_call: FunctionChoice,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct FunctionPayload {
    name: &'static str,
    description: &'static str,
    parameters: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct FunctionChoice {
    name: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: UsagePayload,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    function_call: Option<FunctionCallPayload>,
}

#[derive(Debug, Deserialize)]
struct FunctionCallPayload {
    #[allow(dead_code)]
    #[serde(default)]
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct UsagePayload {
    prompt_tokens: u64,
    completion_tokens: u64,
    total_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_tokens_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn test_profile_selection_threshold() {
        let short = "a".repeat(40); // ~10 tokens
        let long = "a".repeat(400); // ~100 tokens

        assert_eq!(select_model_profile(&short, 50), ModelProfile::Standard4k);
        assert_eq!(select_model_profile(&long, 50), ModelProfile::Long16k);
    }

    #[test]
    fn test_parse_completion_response() {
        let json = r#"{
            "choices": [{
                "message": {
                    "function_call": {
                        "name": "speaker_classifier",
                        "arguments": "{\"speaker_0\": \"salesperson: \", \"speaker_1\": \"customer: \"}"
                    }
                }
            }],
            "usage": {"prompt_tokens": 120, "completion_tokens": 14, "total_tokens": 134}
        }"#;

        let completion: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(completion.usage.total_tokens, 134);
        let call = completion.choices[0].message.function_call.as_ref().unwrap();
        assert!(call.arguments.contains("speaker_0"));
    }
}
