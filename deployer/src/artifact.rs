use std::{fmt, path::PathBuf};

use serde::Deserialize;

/// How files of a given artifact type are named on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactHandler {
    pub extension: String,
    pub classifier: Option<String>,
    pub packaging: String,
}

impl ArtifactHandler {
    /// Returns the handler registered for `type_`. Unknown types use the type
    /// name as both extension and packaging.
    pub fn for_type(type_: &str) -> ArtifactHandler {
        let (extension, classifier) = match type_ {
            "maven-plugin" | "ejb" => ("jar", None),
            "ejb-client" => ("jar", Some("client")),
            "test-jar" => ("jar", Some("tests")),
            "java-source" => ("jar", Some("sources")),
            "javadoc" => ("jar", Some("javadoc")),
            other => (other, None),
        };
        let packaging = match type_ {
            "ejb-client" => "ejb",
            "test-jar" | "java-source" | "javadoc" => "jar",
            other => other,
        };
        ArtifactHandler {
            extension: extension.to_owned(),
            classifier: classifier.map(str::to_owned),
            packaging: packaging.to_owned(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataScope {
    Group,
    Artifact,
    Version,
}

/// Repository information published next to an artifact, such as a version index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactMetadata {
    pub key: String,
    pub scope: MetadataScope,
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    filename: String,
}

pub const DEFAULT_METADATA_FILENAME: &str = "maven-metadata.xml";

impl ArtifactMetadata {
    pub fn new(key: impl Into<String>, scope: MetadataScope, artifact: &Artifact) -> Self {
        ArtifactMetadata {
            key: key.into(),
            scope,
            group_id: artifact.group_id.clone(),
            artifact_id: artifact.artifact_id.clone(),
            version: artifact.version.clone(),
            filename: DEFAULT_METADATA_FILENAME.to_owned(),
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn remote_filename(&self) -> &str {
        &self.filename
    }

    /// Name of the staged copy in a local repository. The repository id keeps
    /// copies fetched from different remotes apart.
    pub fn local_filename(&self, repository_id: &str) -> String {
        match self.filename.rsplit_once('.') {
            Some((stem, extension)) => format!("{}-{}.{}", stem, repository_id, extension),
            None => format!("{}-{}", self.filename, repository_id),
        }
    }
}

/// A build output identified by its coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub classifier: Option<String>,
    pub type_: String,
    pub handler: ArtifactHandler,
    pub file: Option<PathBuf>,
    metadata: Vec<ArtifactMetadata>,
}

impl Artifact {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
        type_: impl Into<String>,
    ) -> Self {
        let type_ = type_.into();
        let handler = ArtifactHandler::for_type(&type_);
        Artifact {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            classifier: handler.classifier.clone(),
            type_,
            handler,
            file: None,
            metadata: Vec::new(),
        }
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn add_metadata(&mut self, metadata: ArtifactMetadata) {
        self.metadata.push(metadata);
    }

    /// Metadata in the order it was added.
    pub fn metadata(&self) -> &[ArtifactMetadata] {
        &self.metadata
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.type_)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{}", classifier)?;
        }
        write!(f, ":{}", self.version)
    }
}
