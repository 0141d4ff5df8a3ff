use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Artifact, ArtifactMetadata, MetadataScope};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryLayout {
    #[default]
    Default,
    Legacy,
}

impl RepositoryLayout {
    fn artifact_path(&self, artifact: &Artifact) -> String {
        let file_name = artifact_file_name(artifact);
        match self {
            RepositoryLayout::Default => format!(
                "{}/{}/{}/{}",
                artifact.group_id.replace('.', "/"),
                artifact.artifact_id,
                artifact.version,
                file_name
            ),
            RepositoryLayout::Legacy => format!(
                "{}/{}s/{}",
                artifact.group_id, artifact.handler.packaging, file_name
            ),
        }
    }

    fn metadata_path(&self, metadata: &ArtifactMetadata, file_name: &str) -> String {
        match self {
            RepositoryLayout::Default => {
                let mut path = metadata.group_id.replace('.', "/");
                if metadata.scope != MetadataScope::Group {
                    path.push('/');
                    path.push_str(&metadata.artifact_id);
                }
                if metadata.scope == MetadataScope::Version {
                    path.push('/');
                    path.push_str(&metadata.version);
                }
                format!("{}/{}", path, file_name)
            }
            RepositoryLayout::Legacy => format!("{}/poms/{}", metadata.group_id, file_name),
        }
    }
}

fn artifact_file_name(artifact: &Artifact) -> String {
    let mut file_name = format!("{}-{}", artifact.artifact_id, artifact.version);
    if let Some(classifier) = &artifact.classifier {
        file_name.push('-');
        file_name.push_str(classifier);
    }
    file_name.push('.');
    file_name.push_str(&artifact.handler.extension);
    file_name
}

/// A local or remote artifact repository.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Repository {
    pub id: String,
    pub url: String,
    pub layout: RepositoryLayout,
    basedir: PathBuf,
}

impl Repository {
    pub fn new(id: impl Into<String>, url: impl Into<String>, layout: RepositoryLayout) -> Self {
        let url = url.into();
        let url = url.trim_end_matches('/').to_owned();
        let basedir = basedir_of(&url);
        Repository {
            id: id.into(),
            url,
            layout,
            basedir,
        }
    }

    /// A repository rooted at a directory on this machine.
    pub fn local(id: impl Into<String>, basedir: impl AsRef<Path>) -> Self {
        let basedir = basedir.as_ref().to_owned();
        Repository {
            id: id.into(),
            url: format!("file://{}", basedir.display()),
            layout: RepositoryLayout::Default,
            basedir,
        }
    }

    pub fn protocol(&self) -> &str {
        match self.url.split_once("://") {
            Some((protocol, _)) => protocol,
            None => "",
        }
    }

    pub fn basedir(&self) -> &Path {
        &self.basedir
    }

    pub fn path_of(&self, artifact: &Artifact) -> String {
        self.layout.artifact_path(artifact)
    }

    pub fn path_of_remote_metadata(&self, metadata: &ArtifactMetadata) -> String {
        self.layout
            .metadata_path(metadata, metadata.remote_filename())
    }

    /// Path of the staged copy of `metadata` that belongs to `remote`.
    pub fn path_of_local_metadata(
        &self,
        metadata: &ArtifactMetadata,
        remote: &Repository,
    ) -> String {
        self.layout
            .metadata_path(metadata, &metadata.local_filename(&remote.id))
    }
}

fn basedir_of(url: &str) -> PathBuf {
    if let Some(path) = url.strip_prefix("file://") {
        return PathBuf::from(path);
    }
    match reqwest::Url::parse(url) {
        Ok(parsed) => PathBuf::from(parsed.path()),
        Err(_) => PathBuf::from(url),
    }
}
