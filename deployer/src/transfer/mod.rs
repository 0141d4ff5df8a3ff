use std::{collections::HashMap, error, fmt, io, path::Path, sync::Arc};

#[cfg(test)]
use mockall::automock;

use crate::{Artifact, ArtifactMetadata, Repository};

mod file;
mod http;

pub use file::FileTransport;
pub use http::{HttpTransport, HttpTransportSettings};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestType {
    Get,
    Put,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resource {
    pub name: String,
    pub content_length: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct TransferEvent {
    pub request_type: RequestType,
    pub repository_url: String,
    pub resource: Resource,
    pub error: Option<String>,
}

impl TransferEvent {
    pub fn put(repository: &Repository, name: &str, content_length: Option<u64>) -> Self {
        TransferEvent {
            request_type: RequestType::Put,
            repository_url: repository.url.clone(),
            resource: Resource {
                name: name.to_owned(),
                content_length,
            },
            error: None,
        }
    }

    pub fn with_error(&self, error: impl fmt::Display) -> Self {
        TransferEvent {
            error: Some(error.to_string()),
            ..self.clone()
        }
    }
}

pub trait TransferListener {
    fn transfer_initiated(&self, event: &TransferEvent);
    fn transfer_started(&self, event: &TransferEvent);
    fn transfer_progress(&self, event: &TransferEvent, buffer: &[u8]);
    fn transfer_completed(&self, event: &TransferEvent);
    fn transfer_error(&self, event: &TransferEvent);
    fn debug(&self, message: &str);
}

/// Reports transfers through the `log` facade only.
pub struct LoggingListener;

impl TransferListener for LoggingListener {
    fn transfer_initiated(&self, event: &TransferEvent) {
        info!("Uploading: {}/{}", event.repository_url, event.resource.name);
    }

    fn transfer_started(&self, _event: &TransferEvent) {}

    fn transfer_progress(&self, _event: &TransferEvent, _buffer: &[u8]) {}

    fn transfer_completed(&self, event: &TransferEvent) {
        info!("Uploaded: {}/{}", event.repository_url, event.resource.name);
    }

    fn transfer_error(&self, event: &TransferEvent) {
        error!(
            "Transfer of {} failed: {}",
            event.resource.name,
            event.error.as_deref().unwrap_or("unknown error")
        );
    }

    fn debug(&self, message: &str) {
        debug!("{}", message);
    }
}

#[derive(Debug)]
pub enum TransferError {
    TransferFailed(String),
    UnsupportedProtocol(String),
    Io(io::Error),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::TransferFailed(message) => f.write_str(message),
            TransferError::UnsupportedProtocol(protocol) => {
                write!(f, "Unsupported protocol: '{}'", protocol)
            }
            TransferError::Io(e) => write!(f, "{}", e),
        }
    }
}

impl error::Error for TransferError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            TransferError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TransferError {
    fn from(error: io::Error) -> Self {
        TransferError::Io(error)
    }
}

/// Moves files into a repository.
#[cfg_attr(test, automock)]
pub trait Transport {
    fn put_artifact(
        &self,
        source: &Path,
        artifact: &Artifact,
        repository: &Repository,
        listener: &dyn TransferListener,
    ) -> Result<(), TransferError>;

    fn put_metadata(
        &self,
        source: &Path,
        metadata: &ArtifactMetadata,
        repository: &Repository,
        listener: &dyn TransferListener,
    ) -> Result<(), TransferError>;
}

impl Transport for Arc<dyn Transport + Send + Sync> {
    fn put_artifact(
        &self,
        source: &Path,
        artifact: &Artifact,
        repository: &Repository,
        listener: &dyn TransferListener,
    ) -> Result<(), TransferError> {
        self.as_ref().put_artifact(source, artifact, repository, listener)
    }

    fn put_metadata(
        &self,
        source: &Path,
        metadata: &ArtifactMetadata,
        repository: &Repository,
        listener: &dyn TransferListener,
    ) -> Result<(), TransferError> {
        self.as_ref().put_metadata(source, metadata, repository, listener)
    }
}

pub trait RegisterTransport: Transport {
    fn protocols() -> &'static [&'static str];
}

/// Dispatches each transfer to the transport registered for the
/// repository's URL scheme.
#[derive(Default)]
pub struct TransportManager {
    transports: HashMap<String, Arc<dyn Transport + Send + Sync>>,
}

impl TransportManager {
    pub fn new() -> TransportManager {
        TransportManager::default()
    }

    pub fn register_transport<T: RegisterTransport + Send + Sync + 'static>(
        &mut self,
        transport: T,
    ) {
        let transport: Arc<dyn Transport + Send + Sync> = Arc::new(transport);
        for protocol in T::protocols() {
            self.transports.insert((*protocol).to_owned(), transport.clone());
        }
    }

    pub fn register_transport_for(
        &mut self,
        protocol: impl Into<String>,
        transport: Arc<dyn Transport + Send + Sync>,
    ) {
        self.transports.insert(protocol.into(), transport);
    }

    fn transport_for(
        &self,
        repository: &Repository,
    ) -> Result<&(dyn Transport + Send + Sync), TransferError> {
        self.transports
            .get(repository.protocol())
            .map(|t| t.as_ref())
            .ok_or_else(|| TransferError::UnsupportedProtocol(repository.protocol().to_owned()))
    }
}

impl Transport for TransportManager {
    fn put_artifact(
        &self,
        source: &Path,
        artifact: &Artifact,
        repository: &Repository,
        listener: &dyn TransferListener,
    ) -> Result<(), TransferError> {
        self.transport_for(repository)?
            .put_artifact(source, artifact, repository, listener)
    }

    fn put_metadata(
        &self,
        source: &Path,
        metadata: &ArtifactMetadata,
        repository: &Repository,
        listener: &dyn TransferListener,
    ) -> Result<(), TransferError> {
        self.transport_for(repository)?
            .put_metadata(source, metadata, repository, listener)
    }
}

/// Reads `source` and reports the usual event sequence around `upload`.
pub(crate) fn put_with_events(
    source: &Path,
    destination: &str,
    repository: &Repository,
    listener: &dyn TransferListener,
    upload: impl FnOnce(&[u8]) -> Result<(), TransferError>,
) -> Result<(), TransferError> {
    let content = std::fs::read(source)?;
    let event = TransferEvent::put(repository, destination, Some(content.len() as u64));

    listener.transfer_initiated(&event);
    listener.transfer_started(&event);
    listener.transfer_progress(&event, &content);

    match upload(&content) {
        Ok(()) => {
            listener.transfer_completed(&event);
            Ok(())
        }
        Err(e) => {
            listener.transfer_error(&event.with_error(&e));
            Err(e)
        }
    }
}


#[cfg(test)]
mod test {
    use super::testhelpers::RecordingListener;
    use super::*;
    use crate::RepositoryLayout;

    #[test]
    fn test_manager_dispatches_by_protocol() {
        let mut https = MockTransport::new();
        https.expect_put_artifact().times(1).returning(|_, _, _, _| Ok(()));

        let mut manager = TransportManager::new();
        manager.register_transport_for("https", Arc::new(https));

        let repository =
            Repository::new("central", "https://repo.example.com", RepositoryLayout::Default);
        let artifact = Artifact::new("org.example", "lib", "1.0", "jar");
        let result = manager.put_artifact(
            Path::new("lib.jar"),
            &artifact,
            &repository,
            &RecordingListener::default(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_manager_rejects_unknown_protocol() {
        let manager = TransportManager::new();
        let repository =
            Repository::new("internal", "scp://repo.example.com/maven", RepositoryLayout::Default);
        let artifact = Artifact::new("org.example", "lib", "1.0", "jar");

        let result = manager.put_artifact(
            Path::new("lib.jar"),
            &artifact,
            &repository,
            &RecordingListener::default(),
        );
        match result {
            Err(TransferError::UnsupportedProtocol(protocol)) => assert_eq!(protocol, "scp"),
            other => panic!("Unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_put_with_events_reports_error() {
        let source = std::env::temp_dir().join("artifact_deployer_put_with_events.bin");
        std::fs::write(&source, b"content").unwrap();
        let repository =
            Repository::new("central", "https://repo.example.com", RepositoryLayout::Default);
        let listener = RecordingListener::default();

        let result = put_with_events(&source, "a/b.jar", &repository, &listener, |_| {
            Err(TransferError::TransferFailed("boom".to_owned()))
        });

        assert!(result.is_err());
        assert_eq!(
            listener.names(),
            ["initiated a/b.jar", "started a/b.jar", "progress a/b.jar", "error a/b.jar"]
        );
    }

    #[test]
    fn test_put_with_events_missing_source() {
        let repository =
            Repository::new("central", "https://repo.example.com", RepositoryLayout::Default);
        let listener = RecordingListener::default();
        let result = put_with_events(
            Path::new("/nonexistent/artifact_deployer/lib.jar"),
            "a/b.jar",
            &repository,
            &listener,
            |_| Ok(()),
        );
        assert!(matches!(result, Err(TransferError::Io(_))));
        assert!(listener.names().is_empty());
    }
}
