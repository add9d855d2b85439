//! Remote Repository Client
//!
//! Read-only access to the hosting platform's REST surface: repository
//! metadata, paginated branch listing, branch comparison and commit lookup.
//! Credentials are owned per scan and rotated on rate-limit exhaustion.

pub mod client;
pub mod credentials;
pub mod error;
pub mod target;
pub mod types;

pub use client::{ClientConfig, RemoteClient, BRANCH_PAGE_SIZE, DEFAULT_API_URL};
pub use credentials::{fallback_tokens_from_env, CredentialSet};
pub use error::{RemoteError, RemoteResult};
pub use target::RepositoryTarget;
pub use types::{ApiResponse, BranchRef, CommitInfo, Comparison, RepositoryInfo};
