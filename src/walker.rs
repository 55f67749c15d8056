use ignore::WalkBuilder;
use std::io;
use std::path::PathBuf;

use crate::loader::has_ini_extension;

/// Expand targets into INI file paths.
///
/// Directories are walked recursively for `*.ini` files, respecting
/// gitignore and skipping hidden entries. Anything else is passed through
/// unchanged so the loader can report a missing file or a wrong extension.
pub fn walk_paths(paths: &[PathBuf]) -> impl Iterator<Item = io::Result<PathBuf>> {
    let mut all_files = vec![];

    for path in paths {
        if !path.is_dir() {
            all_files.push(Ok(path.clone()));
            continue;
        }

        let walker = WalkBuilder::new(path)
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .sort_by_file_path(|a, b| a.cmp(b))
            .build();

        for entry in walker {
            match entry {
                Ok(entry) => {
                    let is_file = entry.file_type().is_some_and(|ft| ft.is_file());
                    if is_file && has_ini_extension(entry.path()) {
                        all_files.push(Ok(entry.into_path()));
                    }
                }
                Err(e) => {
                    all_files.push(Err(io::Error::other(e.to_string())));
                }
            }
        }
    }

    all_files.into_iter()
}
