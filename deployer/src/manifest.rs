use serde::Deserialize;

use crate::{Artifact, ArtifactMetadata, MetadataScope};

#[derive(Debug, Deserialize)]
pub struct Manifest {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(rename = "type", default = "default_type")]
    pub type_: String,
    pub classifier: Option<String>,
    /// Id of the remote repository to deploy to.
    pub repository: String,
    pub final_name: Option<String>,
    /// Metadata published after the artifact. Each entry must already have a
    /// staged copy in the local repository, at
    /// `Repository::path_of_local_metadata`, or the deployment fails.
    #[serde(default)]
    pub metadata: Vec<MetadataManifest>,
}

#[derive(Debug, Deserialize)]
pub struct MetadataManifest {
    pub key: String,
    pub scope: MetadataScope,
    pub filename: Option<String>,
}

fn default_type() -> String {
    "jar".to_owned()
}

impl Manifest {
    pub fn artifact(&self) -> Artifact {
        let mut artifact = Artifact::new(
            &self.group_id,
            &self.artifact_id,
            &self.version,
            &self.type_,
        );
        if let Some(classifier) = &self.classifier {
            artifact = artifact.with_classifier(classifier);
        }
        for entry in &self.metadata {
            let mut metadata = ArtifactMetadata::new(&entry.key, entry.scope, &artifact);
            if let Some(filename) = &entry.filename {
                metadata = metadata.with_filename(filename);
            }
            artifact.add_metadata(metadata);
        }
        artifact
    }
}
