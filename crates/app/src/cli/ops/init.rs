use clap::Args;
use url::Url;

use crate::state::{AppConfig, AppState, DEFAULT_API_URL};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Client API URL to store as the default remote
    #[arg(long, default_value = DEFAULT_API_URL)]
    pub api_url: Url,

    /// Default log level
    #[arg(long, default_value = "warn")]
    pub log_level: tracing::Level,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] crate::state::StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            api_url: self.api_url.clone(),
            log_level: self.log_level.to_string().to_lowercase(),
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        Ok(format!(
            "Initialized peershare directory at: {}\n\
             - Config: {}\n\
             - API URL: {}\n\
             - Log level: {}",
            state.app_dir.display(),
            state.config_path.display(),
            state.config.api_url,
            state.config.log_level,
        ))
    }
}
