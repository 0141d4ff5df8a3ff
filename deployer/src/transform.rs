use std::{error, fmt};

#[cfg(test)]
use mockall::automock;

use crate::{Artifact, Repository};

#[derive(Debug)]
pub struct TransformationError {
    message: String,
    source: Option<anyhow::Error>,
}

impl TransformationError {
    pub fn new(message: impl Into<String>) -> Self {
        TransformationError {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(message: impl Into<String>, source: anyhow::Error) -> Self {
        TransformationError {
            message: message.into(),
            source: Some(source),
        }
    }
}

impl fmt::Display for TransformationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl error::Error for TransformationError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| &**e as &(dyn error::Error + 'static))
    }
}

/// Prepares an artifact before it is sent to `remote`. Implementations may
/// point `artifact.file` at a rewritten copy.
#[cfg_attr(test, automock)]
pub trait Transformer {
    fn transform_for_deployment(
        &self,
        artifact: &mut Artifact,
        remote: &Repository,
        local: &Repository,
    ) -> Result<(), TransformationError>;
}

pub struct NoOpTransformer;

impl Transformer for NoOpTransformer {
    fn transform_for_deployment(
        &self,
        _artifact: &mut Artifact,
        _remote: &Repository,
        _local: &Repository,
    ) -> Result<(), TransformationError> {
        Ok(())
    }
}

/// Runs transformers in registration order and stops at the first failure.
#[derive(Default)]
pub struct TransformationManager {
    transformations: Vec<Box<dyn Transformer + Send + Sync>>,
}

impl TransformationManager {
    pub fn new() -> TransformationManager {
        TransformationManager::default()
    }

    pub fn add_transformation<T: Transformer + Send + Sync + 'static>(
        &mut self,
        transformation: T,
    ) {
        self.transformations.push(Box::new(transformation));
    }
}

impl Transformer for TransformationManager {
    fn transform_for_deployment(
        &self,
        artifact: &mut Artifact,
        remote: &Repository,
        local: &Repository,
    ) -> Result<(), TransformationError> {
        for transformation in &self.transformations {
            transformation.transform_for_deployment(artifact, remote, local)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use mockall::Sequence;
    use std::path::Path;

    use super::*;

    fn repositories() -> (Repository, Repository) {
        (
            Repository::new("central", "https://repo.example.com", Default::default()),
            Repository::local("local", "/tmp/repository"),
        )
    }

    #[test]
    fn test_manager_runs_in_order() {
        let mut sequence = Sequence::new();
        let mut first = MockTransformer::new();
        first
            .expect_transform_for_deployment()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|artifact, _, _| {
                artifact.file = Some("first.pom".into());
                Ok(())
            });
        let mut second = MockTransformer::new();
        second
            .expect_transform_for_deployment()
            .times(1)
            .in_sequence(&mut sequence)
            .withf(|artifact, _, _| artifact.file.as_deref() == Some(Path::new("first.pom")))
            .returning(|_, _, _| Ok(()));

        let mut manager = TransformationManager::new();
        manager.add_transformation(first);
        manager.add_transformation(second);

        let (remote, local) = repositories();
        let mut artifact = Artifact::new("org.example", "lib", "1.0", "pom");
        manager
            .transform_for_deployment(&mut artifact, &remote, &local)
            .unwrap();
    }

    #[test]
    fn test_manager_stops_at_first_failure() {
        let mut failing = MockTransformer::new();
        failing
            .expect_transform_for_deployment()
            .returning(|_, _, _| Err(TransformationError::new("Could not rewrite descriptor")));
        let mut never = MockTransformer::new();
        never.expect_transform_for_deployment().never();

        let mut manager = TransformationManager::new();
        manager.add_transformation(failing);
        manager.add_transformation(never);

        let (remote, local) = repositories();
        let mut artifact = Artifact::new("org.example", "lib", "1.0", "pom");
        let error = manager
            .transform_for_deployment(&mut artifact, &remote, &local)
            .unwrap_err();
        assert_eq!(error.to_string(), "Could not rewrite descriptor");
    }
}
