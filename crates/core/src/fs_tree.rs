//! Abstract file-tree nodes produced by language backends, and the writer
//! that persists them.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::WriteError;

/// A node in the generated output tree: a file with text contents, or a
/// directory of child nodes. Paths are relative to the parent node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsEntity {
    /// A file to be written.
    File {
        /// Path relative to the enclosing directory.
        path: PathBuf,
        /// Full text contents.
        content: String,
    },
    /// A directory of child entities.
    Directory {
        /// Path relative to the enclosing directory.
        path: PathBuf,
        /// Child files and directories.
        children: Vec<FsEntity>,
    },
}

impl FsEntity {
    /// A file node.
    pub fn file(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        FsEntity::File {
            path: path.into(),
            content: content.into(),
        }
    }

    /// A directory node.
    pub fn directory(path: impl Into<PathBuf>, children: Vec<FsEntity>) -> Self {
        FsEntity::Directory {
            path: path.into(),
            children,
        }
    }
}

/// Persist a generated tree under `base`, creating directories as needed.
pub fn write(base: &Path, entity: &FsEntity) -> Result<(), WriteError> {
    match entity {
        FsEntity::File { path, content } => {
            let full = base.join(path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).map_err(|err| WriteError {
                    path: parent.to_path_buf(),
                    reason: err.to_string(),
                })?;
            }
            fs::write(&full, content).map_err(|err| WriteError {
                path: full.clone(),
                reason: err.to_string(),
            })
        }
        FsEntity::Directory { path, children } => {
            let full = base.join(path);
            fs::create_dir_all(&full).map_err(|err| WriteError {
                path: full.clone(),
                reason: err.to_string(),
            })?;
            for child in children {
                write(&full, child)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_write_nested_tree() {
        let dir = tempfile::tempdir().unwrap();
        let tree = FsEntity::directory(
            "out",
            vec![
                FsEntity::file("README.txt", "hello"),
                FsEntity::directory("definitions", vec![FsEntity::file("Pet.ts", "export type Pet = {};\n")]),
            ],
        );
        write(dir.path(), &tree).unwrap();

        let pet = dir.path().join("out/definitions/Pet.ts");
        assert_eq!(fs::read_to_string(pet).unwrap(), "export type Pet = {};\n");
        assert_eq!(
            fs::read_to_string(dir.path().join("out/README.txt")).unwrap(),
            "hello"
        );
    }
}
