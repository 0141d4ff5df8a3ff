use std::{
    error, fmt, io,
    path::{Path, PathBuf},
};

pub(crate) mod handle;
mod listener;

pub use handle::deployment_handle;
pub use handle::LogStream;
pub use handle::{DeploymentHandle, DeploymentLogs};
pub use listener::ProgressListener;

use crate::{
    helpers::copy_file,
    metadata::{MetadataError, MetadataPublisher},
    transfer::{TransferError, Transport},
    transform::{TransformationError, Transformer},
    Artifact, Repository,
};

/// Artifact type whose file is shunted through the transformer.
const DESCRIPTOR_TYPE: &str = "pom";

#[derive(Debug)]
pub enum DeploymentError {
    Transformation(TransformationError),
    Transfer(TransferError),
    Io(io::Error),
    Metadata(MetadataError),
}

impl fmt::Display for DeploymentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentError::Transformation(e) => write!(f, "{}", e),
            DeploymentError::Transfer(e) => write!(f, "Error deploying artifact: {}", e),
            DeploymentError::Io(e) => write!(f, "Error deploying artifact: {}", e),
            DeploymentError::Metadata(e) => {
                write!(f, "Error installing artifact's metadata: {}", e)
            }
        }
    }
}

impl error::Error for DeploymentError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            DeploymentError::Transformation(e) => Some(e),
            DeploymentError::Transfer(e) => Some(e),
            DeploymentError::Io(e) => Some(e),
            DeploymentError::Metadata(e) => Some(e),
        }
    }
}

impl From<TransferError> for DeploymentError {
    fn from(error: TransferError) -> Self {
        DeploymentError::Transfer(error)
    }
}

impl From<io::Error> for DeploymentError {
    fn from(error: io::Error) -> Self {
        DeploymentError::Io(error)
    }
}

impl From<MetadataError> for DeploymentError {
    fn from(error: MetadataError) -> Self {
        DeploymentError::Metadata(error)
    }
}

/// Sends a built artifact and its metadata to a remote repository.
pub struct ArtifactDeployer {
    transformer: Box<dyn Transformer + Send + Sync>,
    metadata_publisher: Box<dyn MetadataPublisher + Send + Sync>,
    transport: Box<dyn Transport + Send + Sync>,
}

impl ArtifactDeployer {
    pub fn new(
        transformer: Box<dyn Transformer + Send + Sync>,
        metadata_publisher: Box<dyn MetadataPublisher + Send + Sync>,
        transport: Box<dyn Transport + Send + Sync>,
    ) -> ArtifactDeployer {
        ArtifactDeployer {
            transformer,
            metadata_publisher,
            transport,
        }
    }

    /// Deploys `source` as the file of `artifact` to `remote`, then publishes
    /// the artifact's metadata in order.
    ///
    /// For `pom` artifacts `artifact.file` temporarily points at `source` while
    /// the transformer runs, and the file it is left pointing at is what gets
    /// uploaded. The previous value is restored once the transformer succeeds.
    /// If the transformer fails, `artifact.file` keeps pointing at `source`.
    pub fn deploy(
        &self,
        source: &Path,
        artifact: &mut Artifact,
        remote: &Repository,
        local: &Repository,
        handle: DeploymentHandle,
    ) -> Result<(), DeploymentError> {
        info!("Deploying {} to {}", artifact, remote.id);
        let mut source = source.to_owned();

        let shunted_file = if artifact.type_ == DESCRIPTOR_TYPE {
            Some(artifact.file.replace(source.clone()))
        } else {
            None
        };

        self.transformer
            .transform_for_deployment(artifact, remote, local)
            .inspect_err(|e| error!("Transformation of {} failed: {}", artifact, e))
            .map_err(DeploymentError::Transformation)?;

        if let Some(previous_file) = shunted_file {
            if let Some(transformed) = artifact.file.take() {
                source = transformed;
            }
            artifact.file = previous_file;
        }

        let artifact_file: PathBuf = local.basedir().join(local.path_of(artifact));
        if artifact_file != source {
            debug!("Staging {:?} at {:?}", source, artifact_file);
            copy_file(&source, &artifact_file)?;
        } else {
            debug!("{:?} is already in the local repository", source);
        }

        let listener = ProgressListener::new(handle);
        self.transport
            .put_artifact(&source, artifact, remote, &listener)
            .inspect_err(|e| error!("Upload of {} failed: {}", artifact, e))?;

        for metadata in artifact.metadata() {
            self.metadata_publisher
                .deploy(metadata, local, remote)
                .inspect_err(|e| error!("Publishing metadata {} failed: {}", metadata.key, e))?;
        }
        Ok(())
    }

    /// Deploys `basedir/final_name.<extension>`.
    #[deprecated(note = "use `deploy` with the artifact's file instead")]
    pub fn deploy_from_basedir(
        &self,
        basedir: &Path,
        final_name: &str,
        artifact: &mut Artifact,
        remote: &Repository,
        local: &Repository,
        handle: DeploymentHandle,
    ) -> Result<(), DeploymentError> {
        let source = basedir.join(format!("{}.{}", final_name, artifact.handler.extension));
        self.deploy(&source, artifact, remote, local, handle)
    }
}
