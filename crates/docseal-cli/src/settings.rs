//! Stamping and pipeline settings, from flags with environment fallbacks.

use clap::Args;
use docseal_core::pipeline::DEFAULT_PAGE_LIMIT;
use docseal_core::stamper::{DEFAULT_AGENT_VERSION, DEFAULT_MODEL, DEFAULT_PROMPT_TEMPLATE};
use docseal_core::{PipelineConfig, StamperConfig};

/// Flags shared by commands that run the notarization pipeline.
#[derive(Args, Debug, Clone)]
pub struct StampArgs {
    /// Generation model identifier recorded in the metadata
    #[arg(long, env = "DOCSEAL_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,
    /// Agent version recorded in the metadata
    #[arg(long, env = "DOCSEAL_AGENT_VERSION", default_value = DEFAULT_AGENT_VERSION)]
    pub agent_version: String,
    /// File whose contents replace the built-in prompt template
    #[arg(long)]
    pub prompt: Option<String>,
    /// Never call the generator; always use the stub metadata
    #[arg(long, env = "DOCSEAL_NO_GENERATOR")]
    pub no_generator: bool,
    /// Maximum number of pages to extract
    #[arg(long, env = "DOCSEAL_PAGE_LIMIT", default_value_t = DEFAULT_PAGE_LIMIT)]
    pub page_limit: u32,
}

impl StampArgs {
    /// Builds the stamper configuration.
    pub fn stamper_config(&self) -> Result<StamperConfig, Box<dyn std::error::Error>> {
        let prompt_template = match &self.prompt {
            Some(path) => std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read prompt {}: {}", path, e))?,
            None => DEFAULT_PROMPT_TEMPLATE.to_string(),
        };
        Ok(StamperConfig {
            model: self.model.clone(),
            agent_version: self.agent_version.clone(),
            prompt_template,
            generation_enabled: !self.no_generator,
        })
    }

    /// Builds the pipeline configuration.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            page_limit: self.page_limit,
        }
    }
}
