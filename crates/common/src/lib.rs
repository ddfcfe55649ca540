/**
 * Transport to the local client API.
 *  - Typed requests for every endpoint
 *  - Classification of failed calls into one
 *    error shape
 */
pub mod api;
/**
 * Read and write the peer node's configuration
 *  as whole snapshots.
 */
pub mod peer_config;
/**
 * Search the tracker index and initiate
 *  downloads, one at a time.
 */
pub mod search;
/**
 * Sign in, sign up, sign out, and the startup
 *  status check.
 */
pub mod session;

pub mod prelude {
    pub use crate::api::{ApiClient, ErrorKind, FieldError, NormalizedError};
    pub use crate::peer_config::{ConfigSynchronizer, PeerConfig, SaveOutcome};
    pub use crate::search::{
        DownloadError, DownloadStarted, FileRecord, PeerEndpoint, SearchDownloadCoordinator,
    };
    pub use crate::session::{Profile, Session, SessionManager, SessionState};
}
