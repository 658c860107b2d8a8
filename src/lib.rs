pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod telemetry;

pub use adapters::changelog::ChangeLogSink;
pub use adapters::store::{CreateOutcome, Reader, SearchOpts, Writer};
pub use adapters::wrapper::Wrapper;
pub use config::{CallOptions, RepositoryConfig};
pub use domain::auth_token::{AuthToken, AuthTokenRow};
pub use error::{RepoError, Result};
pub use services::auth_token_repository::Repository;
