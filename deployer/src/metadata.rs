use std::{error, fmt, path::PathBuf};

#[cfg(test)]
use mockall::automock;

use crate::{
    transfer::{LoggingListener, TransferError, Transport},
    ArtifactMetadata, Repository,
};

#[derive(Debug)]
pub enum MetadataError {
    MissingLocalCopy(PathBuf),
    Transfer(TransferError),
}

impl fmt::Display for MetadataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataError::MissingLocalCopy(path) => {
                write!(f, "Staged metadata file {:?} does not exist", path)
            }
            MetadataError::Transfer(e) => write!(f, "Error while deploying metadata: {}", e),
        }
    }
}

impl error::Error for MetadataError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            MetadataError::Transfer(e) => Some(e),
            MetadataError::MissingLocalCopy(_) => None,
        }
    }
}

#[cfg_attr(test, automock)]
pub trait MetadataPublisher {
    fn deploy(
        &self,
        metadata: &ArtifactMetadata,
        local: &Repository,
        remote: &Repository,
    ) -> Result<(), MetadataError>;
}

/// Publishes the copy of each metadata file staged in the local repository.
/// The staged copy is expected at `local.path_of_local_metadata(metadata, remote)`
/// and is not created here; a missing copy fails with `MissingLocalCopy`.
/// Transfer progress is reported through the `log` facade.
pub struct TransportMetadataPublisher<T> {
    transport: T,
}

impl<T: Transport> TransportMetadataPublisher<T> {
    pub fn new(transport: T) -> Self {
        TransportMetadataPublisher { transport }
    }
}

impl<T: Transport> MetadataPublisher for TransportMetadataPublisher<T> {
    fn deploy(
        &self,
        metadata: &ArtifactMetadata,
        local: &Repository,
        remote: &Repository,
    ) -> Result<(), MetadataError> {
        let staged = local
            .basedir()
            .join(local.path_of_local_metadata(metadata, remote));
        if !staged.is_file() {
            return Err(MetadataError::MissingLocalCopy(staged));
        }

        info!("Deploying metadata {} to {}", metadata.key, remote.id);
        self.transport
            .put_metadata(&staged, metadata, remote, &LoggingListener)
            .map_err(MetadataError::Transfer)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{transfer::MockTransport, Artifact, MetadataScope};

    fn staged_repository(name: &str) -> (Repository, Repository, ArtifactMetadata) {
        let root = std::env::temp_dir().join(name);
        std::fs::remove_dir_all(&root).ok();
        let local = Repository::local("local", &root);
        let remote = Repository::new("central", "https://repo.example.com", Default::default());
        let artifact = Artifact::new("org.example", "lib", "1.0", "jar");
        let metadata = ArtifactMetadata::new("lib", MetadataScope::Artifact, &artifact);
        (local, remote, metadata)
    }

    #[test]
    fn test_publishes_staged_copy() {
        let (local, remote, metadata) = staged_repository("artifact_deployer_metadata_staged");
        let staged = local
            .basedir()
            .join("org/example/lib/maven-metadata-central.xml");
        crate::helpers::write_file(&staged, b"<metadata/>").unwrap();

        let mut transport = MockTransport::new();
        let expected = staged.clone();
        transport
            .expect_put_metadata()
            .times(1)
            .withf(move |source, metadata, remote, _| {
                source == expected.as_path() && metadata.key == "lib" && remote.id == "central"
            })
            .returning(|_, _, _, _| Ok(()));

        let publisher = TransportMetadataPublisher::new(transport);
        publisher.deploy(&metadata, &local, &remote).unwrap();
    }

    #[test]
    fn test_missing_staged_copy() {
        let (local, remote, metadata) = staged_repository("artifact_deployer_metadata_missing");
        let mut transport = MockTransport::new();
        transport.expect_put_metadata().never();

        let publisher = TransportMetadataPublisher::new(transport);
        let result = publisher.deploy(&metadata, &local, &remote);
        assert!(matches!(result, Err(MetadataError::MissingLocalCopy(_))));
    }
}
