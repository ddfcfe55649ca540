pub mod config;
pub mod download;
pub mod init;
pub mod login;
pub mod logout;
pub mod search;
pub mod signup;
pub mod status;

pub use config::Config;
pub use download::Download;
pub use init::Init;
pub use login::Login;
pub use logout::Logout;
pub use search::Search;
pub use signup::Signup;
pub use status::Status;

use common::api::NormalizedError;

/// Render a backend failure for the terminal, listing every field issue
/// of a validation error
pub(crate) fn describe(err: &NormalizedError) -> String {
    if err.field_errors.len() <= 1 {
        return err.message.clone();
    }
    let mut lines = vec![err.message.clone()];
    lines.extend(
        err.field_errors
            .iter()
            .map(|e| format!("  {}: {}", e.field, e.message)),
    );
    lines.join("\n")
}
