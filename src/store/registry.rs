//! Install, uninstall, list and lookup operations over the extension store

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::StorePaths;
use crate::domain::{ExtensionName, InstalledExtension};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("source file not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("source path is a directory, not a file: {0}")]
    SourceIsDirectory(PathBuf),

    #[error("extension '{0}' not found")]
    NotFound(String),

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl RegistryError {
    fn io(action: &str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            context: format!("failed to {} {}", action, path.display()),
            source,
        }
    }
}

/// The extension registry: owns the store location and every operation
/// over its contents.
///
/// The registry performs at most one filesystem operation per process run
/// and holds no state beyond the resolved paths, so a dispatch decision is
/// always made against the store's current contents.
pub struct Registry {
    paths: StorePaths,
}

impl Registry {
    pub fn new(paths: StorePaths) -> Self {
        Self { paths }
    }

    /// Returns the store directory
    pub fn store_dir(&self) -> &Path {
        self.paths.extensions_dir()
    }

    /// Installs an executable file into the store under `name`.
    ///
    /// Copies the full byte content of `source`, writes it via a temp file
    /// and rename, and sets 0755 permissions regardless of the source
    /// file's own mode. An existing entry of the same name is overwritten.
    /// Returns the path of the installed entry.
    pub fn install(
        &self,
        source: &Path,
        name: &ExtensionName,
    ) -> Result<PathBuf, RegistryError> {
        let store_dir = self.paths.extensions_dir();
        fs::create_dir_all(store_dir)
            .map_err(|e| RegistryError::io("create extensions directory", store_dir, e))?;

        let source_meta = fs::metadata(source)
            .map_err(|_| RegistryError::SourceNotFound(source.to_path_buf()))?;
        if source_meta.is_dir() {
            return Err(RegistryError::SourceIsDirectory(source.to_path_buf()));
        }

        let bytes =
            fs::read(source).map_err(|e| RegistryError::io("read source file", source, e))?;

        let target = self.paths.entry_path(name);
        // Temp name stays inside the store and cannot collide with a valid
        // entry path for `name`.
        let temp = store_dir.join(format!(".{}.tmp", name));

        write_executable(&temp, &bytes)
            .map_err(|e| RegistryError::io("write extension", &temp, e))?;
        fs::rename(&temp, &target)
            .map_err(|e| RegistryError::io("install extension at", &target, e))?;

        Ok(target)
    }

    /// Removes the extension installed under `name`
    pub fn uninstall(&self, name: &ExtensionName) -> Result<(), RegistryError> {
        let target = self.paths.entry_path(name);

        match fs::remove_file(&target) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(RegistryError::NotFound(name.to_string()))
            }
            Err(e) => Err(RegistryError::io("remove extension", &target, e)),
        }
    }

    /// Lists installed extensions, sorted by name.
    ///
    /// Entries that are not regular executable files are skipped. A store
    /// directory that does not exist yet yields an empty list.
    pub fn list(&self) -> Result<Vec<InstalledExtension>, RegistryError> {
        let store_dir = self.paths.extensions_dir();
        if !store_dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(store_dir)
            .map_err(|e| RegistryError::io("read extensions directory", store_dir, e))?;

        let mut extensions = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !is_executable_file(&path) {
                continue;
            }

            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Ok(meta) = entry.metadata() else {
                continue;
            };

            extensions.push(InstalledExtension {
                name: name.to_string(),
                path: path.clone(),
                size: meta.len(),
                modified: meta.modified().ok().map(DateTime::<Utc>::from),
            });
        }

        extensions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(extensions)
    }

    /// Returns true when `name` is installed: a regular file in the store
    /// with at least one execute bit set.
    ///
    /// Never fails; invalid names and stat failures are "not an extension".
    pub fn is_extension(&self, name: &str) -> bool {
        let Ok(name) = ExtensionName::new(name) else {
            return false;
        };

        is_executable_file(&self.paths.entry_path(&name))
    }

    /// Resolves the entry path for an installed extension
    pub fn find(&self, name: &ExtensionName) -> Result<PathBuf, RegistryError> {
        let path = self.paths.entry_path(name);
        if path.exists() {
            Ok(path)
        } else {
            Err(RegistryError::NotFound(name.to_string()))
        }
    }
}

/// Writes `bytes` to `path` with owner rwx, group/other rx permissions
fn write_executable(path: &Path, bytes: &[u8]) -> io::Result<()> {
    fs::write(path, bytes)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    }

    Ok(())
}

/// Checks whether `path` is a regular file with an execute bit set
fn is_executable_file(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(meta) = fs::metadata(path) {
            return meta.is_file() && meta.permissions().mode() & 0o111 != 0;
        }
    }

    #[cfg(windows)]
    {
        if path.is_file() {
            return matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("exe") | Some("bat") | Some("cmd")
            );
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn registry_in(dir: &TempDir) -> Registry {
        Registry::new(StorePaths::under(dir.path()))
    }

    fn name(s: &str) -> ExtensionName {
        ExtensionName::new(s).unwrap()
    }

    fn write_source(dir: &TempDir, file: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(file);
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn install_creates_store_lazily() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);
        let source = write_source(&dir, "tool", b"#!/bin/sh\n");

        assert!(!registry.store_dir().exists());
        registry.install(&source, &name("tool")).unwrap();
        assert!(registry.store_dir().is_dir());
    }

    #[test]
    fn install_then_is_extension() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);
        let source = write_source(&dir, "tool", b"#!/bin/sh\n");

        registry.install(&source, &name("tool")).unwrap();

        assert!(registry.is_extension("tool"));
        assert!(!registry.is_extension("other"));
    }

    #[test]
    fn install_copies_bytes_exactly() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);
        let bytes = b"#!/bin/sh\necho hello\n";
        let source = write_source(&dir, "tool", bytes);

        let installed = registry.install(&source, &name("tool")).unwrap();

        assert_eq!(fs::read(&installed).unwrap(), bytes);
    }

    #[cfg(unix)]
    #[test]
    fn install_sets_execute_bits_regardless_of_source_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);
        let source = write_source(&dir, "tool", b"#!/bin/sh\n");
        // Source is deliberately non-executable.
        fs::set_permissions(&source, fs::Permissions::from_mode(0o600)).unwrap();

        let installed = registry.install(&source, &name("tool")).unwrap();
        let mode = fs::metadata(&installed).unwrap().permissions().mode();

        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn install_overwrites_existing_entry() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);
        let first = write_source(&dir, "v1", b"first");
        let second = write_source(&dir, "v2", b"second");

        registry.install(&first, &name("tool")).unwrap();
        let installed = registry.install(&second, &name("tool")).unwrap();

        assert_eq!(fs::read(&installed).unwrap(), b"second");

        let listed = registry.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "tool");
    }

    #[test]
    fn install_missing_source_fails() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);
        let missing = dir.path().join("nope");

        let err = registry.install(&missing, &name("tool")).unwrap_err();
        assert!(matches!(err, RegistryError::SourceNotFound(_)));
    }

    #[test]
    fn install_directory_source_fails() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);
        let subdir = dir.path().join("sub");
        fs::create_dir(&subdir).unwrap();

        let err = registry.install(&subdir, &name("tool")).unwrap_err();
        assert!(matches!(err, RegistryError::SourceIsDirectory(_)));
    }

    #[test]
    fn uninstall_removes_entry() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);
        let source = write_source(&dir, "tool", b"#!/bin/sh\n");

        registry.install(&source, &name("tool")).unwrap();
        registry.uninstall(&name("tool")).unwrap();

        assert!(!registry.is_extension("tool"));
        assert!(registry.list().unwrap().is_empty());
    }

    #[test]
    fn uninstall_missing_entry_fails_and_store_is_unchanged() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);
        let source = write_source(&dir, "tool", b"#!/bin/sh\n");
        registry.install(&source, &name("tool")).unwrap();

        let err = registry.uninstall(&name("other")).unwrap_err();

        assert!(matches!(err, RegistryError::NotFound(_)));
        assert_eq!(registry.list().unwrap().len(), 1);
    }

    #[test]
    fn list_on_missing_store_is_empty() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);

        assert!(registry.list().unwrap().is_empty());
    }

    #[test]
    fn list_is_sorted_by_name() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);
        let source = write_source(&dir, "tool", b"#!/bin/sh\n");

        registry.install(&source, &name("zeta")).unwrap();
        registry.install(&source, &name("alpha")).unwrap();
        registry.install(&source, &name("mid")).unwrap();

        let names: Vec<_> = registry.list().unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn list_reports_entry_size() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);
        let bytes = b"#!/bin/sh\necho hi\n";
        let source = write_source(&dir, "tool", bytes);

        registry.install(&source, &name("tool")).unwrap();

        let listed = registry.list().unwrap();
        assert_eq!(listed[0].size, bytes.len() as u64);
    }

    #[cfg(unix)]
    #[test]
    fn non_executable_entries_are_invisible() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);
        fs::create_dir_all(registry.store_dir()).unwrap();

        use std::os::unix::fs::PermissionsExt;
        let entry = registry.store_dir().join("plain");
        fs::write(&entry, b"not a program").unwrap();
        fs::set_permissions(&entry, fs::Permissions::from_mode(0o644)).unwrap();

        assert!(!registry.is_extension("plain"));
        assert!(registry.list().unwrap().is_empty());
    }

    #[test]
    fn directory_entries_are_invisible() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);
        fs::create_dir_all(registry.store_dir().join("subdir")).unwrap();

        assert!(!registry.is_extension("subdir"));
        assert!(registry.list().unwrap().is_empty());
    }

    #[test]
    fn is_extension_rejects_invalid_names() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);

        assert!(!registry.is_extension(""));
        assert!(!registry.is_extension("../escape"));
        assert!(!registry.is_extension(".."));
    }

    #[test]
    fn find_resolves_installed_entry() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);
        let source = write_source(&dir, "tool", b"#!/bin/sh\n");

        let installed = registry.install(&source, &name("tool")).unwrap();
        let found = registry.find(&name("tool")).unwrap();

        assert_eq!(found, installed);
    }

    #[test]
    fn find_missing_entry_fails() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);

        let err = registry.find(&name("tool")).unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
    }
}
