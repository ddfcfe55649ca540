use clap::{Args, Subcommand};

use common::api::NormalizedError;
use common::peer_config::{ConfigSynchronizer, PeerConfig};

use crate::cli::op::Op;

crate::command_enum! {
    (Show, Show),
    (Set, Set),
}

pub type ConfigCommand = Command;

/// View or change the peer node's configuration
#[derive(Args, Debug, Clone)]
pub struct Config {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[async_trait::async_trait]
impl Op for Config {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

fn render(config: &PeerConfig) -> String {
    let or_unset = |value: &str| {
        if value.is_empty() {
            "(unset)".to_string()
        } else {
            value.to_string()
        }
    };
    format!(
        "tracker url:     {}\n\
         peer port:       {}\n\
         shared folder:   {}\n\
         download folder: {}\n\
         tunnel token:    {}",
        or_unset(&config.tracker_url),
        or_unset(&config.peer_port),
        or_unset(&config.shared_folder_path),
        or_unset(&config.download_folder_path),
        if config.tunnel_token_configured {
            "configured"
        } else {
            "not configured"
        },
    )
}

#[derive(Args, Debug, Clone)]
pub struct Show;

#[derive(Debug, thiserror::Error)]
pub enum ShowError {
    #[error("failed to load config: {0}")]
    Load(#[from] NormalizedError),
}

#[async_trait::async_trait]
impl Op for Show {
    type Error = ShowError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = ConfigSynchronizer::new(ctx.client.clone()).load().await?;
        Ok(render(&config))
    }
}

/// Change some fields; everything else is written back as loaded
#[derive(Args, Debug, Clone)]
pub struct Set {
    #[arg(long)]
    pub tracker_url: Option<String>,

    /// Peer listening port, sent to the backend as given
    #[arg(long)]
    pub port: Option<String>,

    #[arg(long)]
    pub shared_folder: Option<String>,

    #[arg(long)]
    pub download_folder: Option<String>,

    /// Tunnel (ngrok) auth token
    #[arg(long)]
    pub tunnel_token: Option<String>,
}

impl Set {
    fn is_empty(&self) -> bool {
        self.tracker_url.is_none()
            && self.port.is_none()
            && self.shared_folder.is_none()
            && self.download_folder.is_none()
            && self.tunnel_token.is_none()
    }

    fn apply(&self, config: &mut PeerConfig) {
        if let Some(url) = &self.tracker_url {
            config.tracker_url = url.clone();
        }
        if let Some(port) = &self.port {
            config.peer_port = port.clone();
        }
        if let Some(folder) = &self.shared_folder {
            config.shared_folder_path = folder.clone();
        }
        if let Some(folder) = &self.download_folder {
            config.download_folder_path = folder.clone();
        }
        if let Some(token) = &self.tunnel_token {
            config.tunnel_token = Some(token.clone());
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SetError {
    #[error("nothing to change, pass at least one field")]
    NothingToSet,
    #[error("failed to load config: {0}")]
    Load(NormalizedError),
    #[error("{0}")]
    Save(NormalizedError),
}

#[async_trait::async_trait]
impl Op for Set {
    type Error = SetError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        if self.is_empty() {
            return Err(SetError::NothingToSet);
        }

        let sync = ConfigSynchronizer::new(ctx.client.clone());
        let mut config = sync.load().await.map_err(SetError::Load)?;
        self.apply(&mut config);

        let outcome = sync.save(&config).await.map_err(SetError::Save)?;
        Ok(outcome.to_string())
    }
}
