use clap::Args;

use common::session::{SessionManager, SessionState};

#[derive(Args, Debug, Clone)]
pub struct Status;

#[derive(Debug, thiserror::Error)]
pub enum StatusError {}

#[async_trait::async_trait]
impl crate::cli::op::Op for Status {
    type Error = StatusError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut session = SessionManager::new(ctx.client.clone());
        let state = session.bootstrap().await;

        if state != SessionState::Authenticated {
            return Ok(format!(
                "Not signed in ({}). Run 'peershare login' to start your peer.",
                ctx.client.base_url()
            ));
        }

        let mut lines = vec![format!("Signed in ({})", ctx.client.base_url())];
        if let Some(profile) = session.profile() {
            let fields = [
                ("username", profile.username.clone()),
                ("user id", profile.user_id.map(|id| id.to_string())),
                ("peer port", profile.peer_port.clone()),
                ("shared folder", profile.shared_folder.clone()),
                ("local ip", profile.local_ip.clone()),
            ];
            for (label, value) in fields {
                if let Some(value) = value {
                    lines.push(format!("  {:<14} {}", format!("{}:", label), value));
                }
            }
        }
        Ok(lines.join("\n"))
    }
}
