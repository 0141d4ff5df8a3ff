use std::path::Path;

use super::{put_with_events, RegisterTransport, TransferError, TransferListener, Transport};
use crate::{helpers::write_file, Artifact, ArtifactMetadata, Repository};

/// Deploys into a `file://` repository on this machine.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileTransport;

impl FileTransport {
    fn put_resource(
        &self,
        source: &Path,
        destination: &str,
        repository: &Repository,
        listener: &dyn TransferListener,
    ) -> Result<(), TransferError> {
        let target = repository.basedir().join(destination);
        listener.debug(&format!("Copying {:?} to {:?}", source, target));
        put_with_events(source, destination, repository, listener, |content| {
            write_file(&target, content)?;
            Ok(())
        })
    }
}

impl Transport for FileTransport {
    fn put_artifact(
        &self,
        source: &Path,
        artifact: &Artifact,
        repository: &Repository,
        listener: &dyn TransferListener,
    ) -> Result<(), TransferError> {
        self.put_resource(source, &repository.path_of(artifact), repository, listener)
    }

    fn put_metadata(
        &self,
        source: &Path,
        metadata: &ArtifactMetadata,
        repository: &Repository,
        listener: &dyn TransferListener,
    ) -> Result<(), TransferError> {
        self.put_resource(
            source,
            &repository.path_of_remote_metadata(metadata),
            repository,
            listener,
        )
    }
}

impl RegisterTransport for FileTransport {
    fn protocols() -> &'static [&'static str] {
        &["file"]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::transfer::testhelpers::RecordingListener;

    #[test]
    fn test_put_artifact_copies_into_repository() {
        let root = std::env::temp_dir().join("artifact_deployer_file_transport");
        std::fs::remove_dir_all(&root).ok();
        let source = std::env::temp_dir().join("artifact_deployer_file_transport.war");
        std::fs::write(&source, b"war bytes").unwrap();

        let repository = Repository::local("staging", &root);
        let artifact = Artifact::new("org.example", "site", "2.0", "war");
        let listener = RecordingListener::default();

        FileTransport
            .put_artifact(&source, &artifact, &repository, &listener)
            .unwrap();

        let target = root.join("org/example/site/2.0/site-2.0.war");
        assert_eq!(std::fs::read(target).unwrap(), b"war bytes");
        assert_eq!(listener.names().len(), 4);
    }
}
