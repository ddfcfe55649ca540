use clap::Args;

use common::search::{FileRecord, SearchDownloadCoordinator};

#[derive(Args, Debug, Clone)]
pub struct Search {
    /// Search terms, e.g. 'invoice' or 'notes'
    pub query: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {}

#[async_trait::async_trait]
impl crate::cli::op::Op for Search {
    type Error = SearchError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let coordinator = SearchDownloadCoordinator::new(ctx.client.clone());
        let results = coordinator.search(&self.query).await;

        if results.is_empty() {
            return Ok("No files found.".to_string());
        }
        Ok(results.iter().map(summarize).collect::<Vec<_>>().join("\n"))
    }
}

pub(crate) fn summarize(file: &FileRecord) -> String {
    let short_hash: String = file.file_hash.chars().take(12).collect();
    format!(
        "{}... {} ({}, {} peers)",
        short_hash,
        file.file_name,
        format_bytes(file.file_size_bytes),
        file.peers.len()
    )
}

/// Human-readable size in base-1024 units, at most two decimals
pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}
