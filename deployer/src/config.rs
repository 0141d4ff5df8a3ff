use std::{collections::HashMap, error, fmt, path::PathBuf, sync::Arc};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::Deserialize;

use crate::{
    metadata::TransportMetadataPublisher,
    transfer::{FileTransport, HttpTransport, HttpTransportSettings, Transport, TransportManager},
    transform::NoOpTransformer,
    ArtifactDeployer, DeploymentManager, Repository, RepositoryLayout,
};

#[derive(Debug)]
pub enum ConfigurationError {
    MissingConfigurationValue(String),
    Other(Box<dyn error::Error + Send + Sync>),
}

impl From<figment::Error> for ConfigurationError {
    fn from(error: figment::Error) -> Self {
        match error.kind {
            figment::error::Kind::MissingField(cow) => {
                Self::MissingConfigurationValue(cow.to_string())
            }
            _ => Self::Other(Box::new(error)),
        }
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::MissingConfigurationValue(key) => {
                write!(f, "Missing configuration value '{}'", key)
            }
            ConfigurationError::Other(e) => write!(f, "{}", e),
        }
    }
}

impl error::Error for ConfigurationError {}

const LOCAL_REPOSITORY: &str = "local_repository";
const LOCAL_REPOSITORY_ID: &str = "local";
const REPOSITORIES: &str = "repositories";
const TRANSPORT: &str = "transport";

const ENV_PREFIX: &str = "ARTIFACT_DEPLOYER_";

#[derive(Deserialize)]
struct RepositoryConfig {
    url: String,
    #[serde(default)]
    layout: RepositoryLayout,
}

/// Reads `$ARTIFACT_DEPLOYER_CONFIG` (default `./deployer.toml`) and
/// `ARTIFACT_DEPLOYER_*` environment variables, with `__` separating nested keys.
pub fn figment() -> Figment {
    Figment::from(Toml::file(Env::var_or("ARTIFACT_DEPLOYER_CONFIG", "./deployer.toml")))
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["CONFIG"]).split("__"))
}

fn figment_default_values() -> Figment {
    Figment::from(Serialized::defaults(serde_json::json!({
        LOCAL_REPOSITORY: "./repository",
        REPOSITORIES: {},
        TRANSPORT: {
            "timeout_seconds": 60
        }
    })))
}

pub fn manager(figment: &Figment) -> Result<DeploymentManager, ConfigurationError> {
    let figment = figment.clone().join(figment_default_values());

    let local_path: PathBuf = figment.extract_inner(LOCAL_REPOSITORY)?;
    let local_repository = Repository::local(LOCAL_REPOSITORY_ID, local_path);

    let mut result = DeploymentManager::new(deployer(&figment)?, local_repository);
    for repository in remote_repositories(&figment)? {
        info!("Registering repository {} at {}", repository.id, repository.url);
        result.register_repository(repository);
    }
    Ok(result)
}

fn deployer(figment: &Figment) -> Result<ArtifactDeployer, ConfigurationError> {
    let transport: Arc<dyn Transport + Send + Sync> = Arc::new(transport_manager(figment)?);
    Ok(ArtifactDeployer::new(
        Box::new(NoOpTransformer),
        Box::new(TransportMetadataPublisher::new(transport.clone())),
        Box::new(transport),
    ))
}

fn transport_manager(figment: &Figment) -> Result<TransportManager, ConfigurationError> {
    let settings: HttpTransportSettings = figment.extract_inner(TRANSPORT)?;
    let http = HttpTransport::new(settings).map_err(|e| ConfigurationError::Other(e.into()))?;

    let mut manager = TransportManager::new();
    manager.register_transport(http);
    manager.register_transport(FileTransport);
    Ok(manager)
}

fn remote_repositories(figment: &Figment) -> Result<Vec<Repository>, ConfigurationError> {
    let configured: HashMap<String, RepositoryConfig> = figment.extract_inner(REPOSITORIES)?;
    Ok(configured
        .into_iter()
        .map(|(id, config)| Repository::new(id, config.url, config.layout))
        .collect())
}
