use clap::Args;

use common::search::{DownloadError, SearchDownloadCoordinator};

/// Search, then start downloading the one result whose hash matches
#[derive(Args, Debug, Clone)]
pub struct Download {
    /// Search terms used to find the file
    pub query: String,

    /// Hash (or unique hash prefix) of the file to download
    #[arg(long)]
    pub hash: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadOpError {
    #[error("no result for '{0}' matches hash {1}")]
    NotFound(String, String),
    #[error("hash prefix {0} matches {1} files, use more characters")]
    Ambiguous(String, usize),
    #[error("download failed to start: {}", describe_download(.0))]
    Download(#[from] DownloadError),
}

fn describe_download(err: &DownloadError) -> String {
    match err {
        DownloadError::Failed(e) => super::describe(e),
        other => other.to_string(),
    }
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Download {
    type Error = DownloadOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let coordinator = SearchDownloadCoordinator::new(ctx.client.clone());
        let prefix = self.hash.to_lowercase();

        let mut matches = coordinator
            .search(&self.query)
            .await
            .into_iter()
            .filter(|file| file.file_hash.to_lowercase().starts_with(&prefix))
            .collect::<Vec<_>>();

        let file = match matches.len() {
            0 => {
                return Err(DownloadOpError::NotFound(
                    self.query.clone(),
                    self.hash.clone(),
                ))
            }
            1 => matches.remove(0),
            n => return Err(DownloadOpError::Ambiguous(self.hash.clone(), n)),
        };

        let started = coordinator.initiate_download(&file).await?;
        Ok(format!(
            "{}: {} ({})",
            started.status,
            started.file_name,
            super::search::format_bytes(file.file_size_bytes)
        ))
    }
}
