use clap::Args;

use common::api::NormalizedError;
use common::session::SessionManager;

#[derive(Args, Debug, Clone)]
pub struct Login {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub password: String,
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("{}", super::describe(.0))]
    Api(#[from] NormalizedError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Login {
    type Error = LoginError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut session = SessionManager::new(ctx.client.clone());
        session.login(&self.username, &self.password).await?;
        Ok(format!("Logged in as {}", self.username))
    }
}
