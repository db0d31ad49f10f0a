use crate::cache::{CachedFile, WorkDirectoryInfo};
use ignore::WalkBuilder;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

pub mod folders;
pub mod selection;
pub mod tree;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    pub relative_path: String,
    pub absolute_path: PathBuf,
    pub last_modified: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn should_skip_dir(name: &str) -> bool {
    matches!(
        name,
        ".git" | "node_modules" | "target" | "__pycache__" | ".venv" | "venv"
    )
}

fn modified_millis(metadata: &fs::Metadata) -> u64 {
    metadata
        .modified()
        .ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .map(|duration| duration.as_millis() as u64)
        .unwrap_or(0)
}

fn relative_path(root_name: &str, path: &Path, root: &Path) -> String {
    let rest = path.strip_prefix(root).unwrap_or(path);
    let mut out = root_name.to_string();
    for component in rest.components() {
        out.push('/');
        out.push_str(&component.as_os_str().to_string_lossy());
    }
    out
}

pub fn scan_directory(root: &Path) -> Result<Vec<PickedFile>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    let root_name = root
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| root.to_string_lossy().to_string());

    fs::read_dir(root).map_err(|source| ScanError::Read {
        path: root.to_path_buf(),
        source,
    })?;

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .require_git(false)
        .filter_entry(|entry| !should_skip_dir(&entry.file_name().to_string_lossy()))
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|file_type| file_type.is_file()) {
            continue;
        }
        let last_modified = entry.metadata().map(|metadata| modified_millis(&metadata)).unwrap_or(0);
        let path = entry.into_path();
        files.push(PickedFile {
            relative_path: relative_path(&root_name, &path, root),
            last_modified,
            absolute_path: path,
        });
    }

    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(files)
}

pub fn work_directory_info(files: &[PickedFile]) -> Option<WorkDirectoryInfo> {
    let first = files.first()?;
    let name = first
        .relative_path
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string();
    Some(WorkDirectoryInfo {
        name,
        files: files
            .iter()
            .map(|file| CachedFile {
                path: file.relative_path.clone(),
                last_modified: file.last_modified,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_prefixes_paths_with_directory_name_and_skips_vcs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path().join("demo");
        fs::create_dir_all(root.join("src/nested")).expect("mkdir");
        fs::create_dir_all(root.join(".git")).expect("mkdir");
        fs::write(root.join("README.md"), "# demo").expect("write");
        fs::write(root.join("src/main.py"), "print(1)").expect("write");
        fs::write(root.join("src/nested/util.py"), "").expect("write");
        fs::write(root.join(".git/HEAD"), "ref").expect("write");

        let files = scan_directory(&root).expect("scan should succeed");
        let paths: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();

        assert_eq!(
            paths,
            vec!["demo/README.md", "demo/src/main.py", "demo/src/nested/util.py"]
        );
        assert!(files.iter().all(|f| f.last_modified > 0));
    }

    #[test]
    fn scan_honors_gitignore_and_build_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path().join("demo");
        fs::create_dir_all(root.join("__pycache__")).expect("mkdir");
        fs::create_dir_all(root.join("dist")).expect("mkdir");
        fs::write(root.join(".gitignore"), "dist/\n*.log\n").expect("write");
        fs::write(root.join("app.py"), "print(1)").expect("write");
        fs::write(root.join("debug.log"), "noise").expect("write");
        fs::write(root.join("dist/bundle.js"), "x").expect("write");
        fs::write(root.join("__pycache__/app.pyc"), "x").expect("write");

        let files = scan_directory(&root).expect("scan should succeed");
        let paths: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();

        assert_eq!(paths, vec!["demo/.gitignore", "demo/app.py"]);
    }

    #[cfg(unix)]
    #[test]
    fn scan_skips_symlinked_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path().join("demo");
        let outside = dir.path().join("outside");
        fs::create_dir_all(&root).expect("mkdir");
        fs::create_dir_all(&outside).expect("mkdir");
        fs::write(outside.join("secret.txt"), "x").expect("write");
        fs::write(root.join("main.rs"), "fn main() {}").expect("write");
        std::os::unix::fs::symlink(&outside, root.join("linked")).expect("symlink");

        let files = scan_directory(&root).expect("scan should succeed");
        let paths: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();

        assert_eq!(paths, vec!["demo/main.rs"]);
    }

    #[test]
    fn scan_rejects_plain_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("single.txt");
        fs::write(&file, "x").expect("write");

        let error = scan_directory(&file).expect_err("file is not a directory");
        assert!(matches!(error, ScanError::NotADirectory(_)));
    }

    #[test]
    fn work_directory_info_takes_name_from_first_component() {
        let files = vec![PickedFile {
            relative_path: "demo/app.js".to_string(),
            absolute_path: PathBuf::from("/tmp/demo/app.js"),
            last_modified: 42,
        }];
        let info = work_directory_info(&files).expect("non-empty pick");

        assert_eq!(info.name, "demo");
        assert_eq!(info.files[0].path, "demo/app.js");
        assert_eq!(info.files[0].last_modified, 42);
        assert!(work_directory_info(&[]).is_none());
    }
}
