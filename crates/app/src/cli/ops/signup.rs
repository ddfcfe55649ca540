use clap::Args;

use common::api::NormalizedError;
use common::session::SessionManager;

#[derive(Args, Debug, Clone)]
pub struct Signup {
    /// At least 3 characters
    #[arg(long)]
    pub username: String,

    /// At least 8 characters
    #[arg(long)]
    pub password: String,

    #[arg(long, default_value = "")]
    pub email: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SignupError {
    #[error("{}", super::describe(.0))]
    Api(#[from] NormalizedError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Signup {
    type Error = SignupError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut session = SessionManager::new(ctx.client.clone());
        session
            .signup(&self.username, &self.password, &self.email)
            .await?;
        Ok(format!("Signed up and logged in as {}", self.username))
    }
}
