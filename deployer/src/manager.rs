use std::{collections::HashMap, error, fmt, path::Path};

use crate::{
    deployer::{deployment_handle, DeploymentHandle},
    ArtifactDeployer, DeploymentError, DeploymentLogs, Manifest, Repository,
};

/// Deploys manifests to a set of known remote repositories.
pub struct DeploymentManager {
    deployer: ArtifactDeployer,
    local_repository: Repository,
    repositories: HashMap<String, Repository>,
}

impl DeploymentManager {
    pub fn new(deployer: ArtifactDeployer, local_repository: Repository) -> DeploymentManager {
        DeploymentManager {
            deployer,
            local_repository,
            repositories: HashMap::new(),
        }
    }

    pub fn register_repository(&mut self, repository: Repository) {
        self.repositories.insert(repository.id.clone(), repository);
    }

    pub fn local_repository(&self) -> &Repository {
        &self.local_repository
    }

    /// Deploys `source` as described by `manifest` and returns the logs written
    /// during the deployment.
    pub fn deploy(&self, manifest: &str, source: &Path) -> Result<DeploymentLogs, ManagerError> {
        let manifest = self.parse_manifest(manifest)?;
        let remote = self.remote_repository(&manifest)?;
        let mut artifact = manifest.artifact();
        let (handle, logs) = deployment_handle();

        let result = self.deployer.deploy(
            source,
            &mut artifact,
            remote,
            &self.local_repository,
            handle.clone(),
        );
        finish(handle, logs, result)
    }

    /// Deploys `basedir/<final_name>.<extension>` using the manifest's `final_name`.
    pub fn deploy_from_basedir(
        &self,
        manifest: &str,
        basedir: &Path,
    ) -> Result<DeploymentLogs, ManagerError> {
        let manifest = self.parse_manifest(manifest)?;
        let remote = self.remote_repository(&manifest)?;
        let final_name = manifest
            .final_name
            .clone()
            .ok_or(ManagerError::MissingFinalName)?;
        let mut artifact = manifest.artifact();
        let (handle, logs) = deployment_handle();

        #[allow(deprecated)]
        let result = self.deployer.deploy_from_basedir(
            basedir,
            &final_name,
            &mut artifact,
            remote,
            &self.local_repository,
            handle.clone(),
        );
        finish(handle, logs, result)
    }

    fn parse_manifest(&self, manifest: &str) -> Result<Manifest, ManagerError> {
        toml::from_str(manifest).map_err(|e| {
            error!("Could not parse deployment manifest: {}", e);
            ManagerError::CouldNotParseManifest
        })
    }

    fn remote_repository(&self, manifest: &Manifest) -> Result<&Repository, ManagerError> {
        self.repositories
            .get(&manifest.repository)
            .ok_or_else(|| ManagerError::UnknownRepository(manifest.repository.clone()))
    }
}

fn finish(
    mut handle: DeploymentHandle,
    logs: DeploymentLogs,
    result: Result<(), DeploymentError>,
) -> Result<DeploymentLogs, ManagerError> {
    match result {
        Ok(()) => {
            writeln!(handle.info(), "Deployment succeeded").ok();
            Ok(logs)
        }
        Err(error) => {
            writeln!(handle.error(), "Deployment failed: {}", error).ok();
            Err(ManagerError::DeploymentFailed { error, logs })
        }
    }
}

#[derive(Debug)]
pub enum ManagerError {
    CouldNotParseManifest,
    UnknownRepository(String),
    MissingFinalName,
    DeploymentFailed {
        error: DeploymentError,
        logs: DeploymentLogs,
    },
}

impl fmt::Display for ManagerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManagerError::CouldNotParseManifest => f.write_str("Could not parse manifest"),
            ManagerError::UnknownRepository(id) => write!(f, "Unknown repository '{}'", id),
            ManagerError::MissingFinalName => f.write_str("Manifest has no final_name"),
            ManagerError::DeploymentFailed { error, .. } => write!(f, "{}", error),
        }
    }
}

impl error::Error for ManagerError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            ManagerError::DeploymentFailed { error, .. } => Some(error),
            _ => None,
        }
    }
}
