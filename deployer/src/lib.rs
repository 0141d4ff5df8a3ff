#[macro_use]
extern crate log;

mod artifact;
mod deployer;
mod helpers;
mod manager;
mod manifest;
mod repository;

pub mod config;
pub mod metadata;
pub mod transfer;
pub mod transform;

pub use artifact::{Artifact, ArtifactHandler, ArtifactMetadata, MetadataScope};
pub use deployer::deployment_handle;
pub use deployer::ArtifactDeployer;
pub use deployer::DeploymentError;
pub use deployer::DeploymentHandle;
pub use deployer::DeploymentLogs;
pub use deployer::LogStream;
pub use deployer::ProgressListener;
pub use manager::{DeploymentManager, ManagerError};
pub use manifest::Manifest;
pub use repository::{Repository, RepositoryLayout};
