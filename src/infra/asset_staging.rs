//! Content fingerprinting and staging of directory assets.

use std::{
    fs,
    path::{Path, PathBuf},
};

use sha2::{Digest, Sha256};

use crate::{domain::asset::FileAsset, infra::error::AppError};

/// Hashes every file under `dir` (relative path + contents) in sorted order.
pub fn fingerprint(dir: &Path) -> Result<FileAsset, AppError> {
    if !dir.is_dir() {
        return Err(AppError::AssetMissing {
            path: dir.to_path_buf(),
        });
    }

    let files = list_files(dir)?;
    if files.is_empty() {
        return Err(AppError::AssetEmpty {
            path: dir.to_path_buf(),
        });
    }

    let mut hasher = Sha256::new();
    for relative in &files {
        let path = dir.join(relative);
        let contents = fs::read(&path).map_err(|source| AppError::AssetRead { path, source })?;

        hasher.update(portable(relative).as_bytes());
        hasher.update([0u8]);
        hasher.update((contents.len() as u64).to_le_bytes());
        hasher.update(&contents);
    }

    let hash = format!("{:x}", hasher.finalize());
    tracing::debug!(dir = %dir.display(), files = files.len(), hash = %hash, "fingerprinted asset");

    Ok(FileAsset::directory(hash, dir))
}

/// Copies the asset into `<out_dir>/asset.<hash>`.
///
/// The copy is assembled in a temporary directory next to the target and only
/// renamed into place once its own fingerprint matches `asset.hash`. An existing
/// target is kept when its contents match and replaced otherwise.
pub fn stage(asset: &FileAsset, out_dir: &Path) -> Result<PathBuf, AppError> {
    let target = out_dir.join(asset.staged_name());
    if target.is_dir() {
        if matches!(fingerprint(&target), Ok(existing) if existing.hash == asset.hash) {
            tracing::debug!(path = %target.display(), "reusing staged asset");
            return Ok(target);
        }

        tracing::warn!(path = %target.display(), "replacing stale staged asset");
        fs::remove_dir_all(&target).map_err(|source| AppError::AssemblyWrite {
            path: target.clone(),
            source,
        })?;
    }

    let staging = tempfile::Builder::new()
        .prefix(".staging.")
        .tempdir_in(out_dir)
        .map_err(|source| AppError::AssemblyWrite {
            path: out_dir.to_path_buf(),
            source,
        })?;
    copy_tree(&asset.source_dir, staging.path())?;

    let staged = fingerprint(staging.path())?;
    if staged.hash != asset.hash {
        return Err(AppError::AssetChanged {
            path: asset.source_dir.clone(),
            expected: asset.hash.clone(),
            actual: staged.hash,
        });
    }

    fs::rename(staging.path(), &target).map_err(|source| AppError::AssemblyWrite {
        path: target.clone(),
        source,
    })?;

    Ok(target)
}

fn copy_tree(source_dir: &Path, destination_dir: &Path) -> Result<(), AppError> {
    for relative in list_files(source_dir)? {
        let destination = destination_dir.join(&relative);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|source| AppError::AssemblyWrite {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::copy(source_dir.join(&relative), &destination).map_err(|source| {
            AppError::AssemblyWrite {
                path: destination.clone(),
                source,
            }
        })?;
    }

    Ok(())
}

/// Relative paths of all regular files under `root`, sorted.
pub fn list_files(root: &Path) -> Result<Vec<PathBuf>, AppError> {
    let mut files = Vec::new();
    collect(root, Path::new(""), &mut files)?;
    files.sort();
    Ok(files)
}

fn collect(root: &Path, relative: &Path, files: &mut Vec<PathBuf>) -> Result<(), AppError> {
    let dir = root.join(relative);
    let entries = fs::read_dir(&dir).map_err(|source| AppError::AssetRead {
        path: dir.clone(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| AppError::AssetRead {
            path: dir.clone(),
            source,
        })?;
        let child = relative.join(entry.file_name());
        let path = entry.path();

        if path.is_dir() {
            collect(root, &child, files)?;
        } else if path.is_file() {
            files.push(child);
        }
    }

    Ok(())
}

fn portable(relative: &Path) -> String {
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::web_fixture;

    #[test]
    fn identical_content_yields_identical_hash() {
        let first = web_fixture();
        let second = web_fixture();

        let a = fingerprint(first.path()).expect("fingerprint should succeed");
        let b = fingerprint(second.path()).expect("fingerprint should succeed");

        assert_eq!(a.hash, b.hash);
        assert_eq!(a.hash.len(), 64);
    }

    #[test]
    fn changed_content_changes_hash() {
        let site = web_fixture();
        let before = fingerprint(site.path()).expect("fingerprint should succeed");

        fs::write(site.path().join("index.html"), "<h1>changed</h1>").expect("fixture write");
        let after = fingerprint(site.path()).expect("fingerprint should succeed");

        assert_ne!(before.hash, after.hash);
    }

    #[test]
    fn renamed_file_changes_hash() {
        let site = web_fixture();
        let before = fingerprint(site.path()).expect("fingerprint should succeed");

        fs::rename(
            site.path().join("css").join("site.css"),
            site.path().join("css").join("main.css"),
        )
        .expect("fixture rename");
        let after = fingerprint(site.path()).expect("fingerprint should succeed");

        assert_ne!(before.hash, after.hash);
    }

    #[test]
    fn missing_and_empty_directories_are_rejected() {
        let empty = tempfile::tempdir().expect("temp dir should be created");

        assert!(matches!(
            fingerprint(&empty.path().join("nope")),
            Err(AppError::AssetMissing { .. })
        ));
        assert!(matches!(
            fingerprint(empty.path()),
            Err(AppError::AssetEmpty { .. })
        ));
    }

    #[test]
    fn partial_staged_copy_is_replaced() {
        let site = web_fixture();
        let out = tempfile::tempdir().expect("temp dir should be created");
        let asset = fingerprint(site.path()).expect("fingerprint should succeed");

        let partial = out.path().join(asset.staged_name()).join("css");
        fs::create_dir_all(&partial).expect("partial dir should be created");
        fs::write(partial.join("site.css"), "body {}").expect("partial file write");

        let staged = stage(&asset, out.path()).expect("stage should succeed");

        assert!(staged.join("index.html").is_file());
        assert_eq!(
            fingerprint(&staged).expect("staged fingerprint").hash,
            asset.hash
        );
    }

    #[test]
    fn source_changed_after_fingerprint_fails_and_leaves_no_target() {
        let site = web_fixture();
        let out = tempfile::tempdir().expect("temp dir should be created");
        let asset = fingerprint(site.path()).expect("fingerprint should succeed");

        fs::write(site.path().join("index.html"), "<h1>edited</h1>").expect("fixture write");

        assert!(matches!(
            stage(&asset, out.path()),
            Err(AppError::AssetChanged { .. })
        ));
        assert!(!out.path().join(asset.staged_name()).exists());
        assert_eq!(
            fs::read_dir(out.path()).expect("out dir should list").count(),
            0
        );
    }

    #[test]
    fn stage_copies_tree_verbatim_and_is_idempotent() {
        let site = web_fixture();
        let out = tempfile::tempdir().expect("temp dir should be created");
        let asset = fingerprint(site.path()).expect("fingerprint should succeed");

        let staged = stage(&asset, out.path()).expect("stage should succeed");
        let again = stage(&asset, out.path()).expect("second stage should succeed");

        assert_eq!(staged, again);
        assert_eq!(staged, out.path().join(asset.staged_name()));
        assert_eq!(
            list_files(&staged).expect("staged files should list"),
            list_files(site.path()).expect("source files should list")
        );
        assert_eq!(
            fs::read_to_string(staged.join("index.html")).expect("index should be staged"),
            fs::read_to_string(site.path().join("index.html")).expect("index should exist")
        );
        assert_eq!(
            fingerprint(&staged).expect("staged fingerprint").hash,
            asset.hash
        );
    }
}
