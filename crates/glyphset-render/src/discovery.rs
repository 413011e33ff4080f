//! Recursive directory discovery for font sources.
//!
//! [`WalkDir`] walks a tree breadth-first and yields entries lazily.
//! [`find_font_files`] and [`find_directories`] collect its output into
//! sorted lists so catalogs enumerate sources in a stable order.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{RenderError, RenderResult};

/// Outline font file extensions (lower case).
pub const FONT_EXTENSIONS: &[&str] = &["ttf", "otf"];

/// Options for recursive directory walking.
#[derive(Debug, Clone)]
pub struct WalkDirOptions {
    /// Maximum depth to descend (None for unlimited).
    pub max_depth: Option<usize>,
    /// Whether to yield directories.
    pub include_dirs: bool,
    /// Whether to yield files.
    pub include_files: bool,
    /// Whether to skip entries starting with '.'.
    pub skip_hidden: bool,
}

impl Default for WalkDirOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            include_dirs: true,
            include_files: true,
            skip_hidden: true,
        }
    }
}

impl WalkDirOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum depth to descend.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Only include files (exclude directories).
    pub fn files_only(mut self) -> Self {
        self.include_files = true;
        self.include_dirs = false;
        self
    }

    /// Only include directories (exclude files).
    pub fn dirs_only(mut self) -> Self {
        self.include_files = false;
        self.include_dirs = true;
        self
    }
}

/// A single entry produced by [`WalkDir`].
#[derive(Debug, Clone)]
pub struct WalkEntry {
    path: PathBuf,
    is_dir: bool,
    is_symlink: bool,
}

impl WalkEntry {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }

    fn is_hidden(&self) -> bool {
        self.path
            .file_name()
            .is_some_and(|n| n.to_string_lossy().starts_with('.'))
    }
}

/// A breadth-first recursive directory iterator.
pub struct WalkDir {
    queue: VecDeque<(PathBuf, usize)>,
    current: Option<(fs::ReadDir, PathBuf, usize)>,
    options: WalkDirOptions,
}

impl WalkDir {
    /// Creates a new recursive directory walker with options.
    pub fn with_options(path: impl AsRef<Path>, options: WalkDirOptions) -> RenderResult<Self> {
        let root = path.as_ref().to_path_buf();
        let metadata = fs::metadata(&root).map_err(|e| RenderError::io(e, &root))?;
        if !metadata.is_dir() {
            return Err(RenderError::io(
                std::io::Error::new(std::io::ErrorKind::NotADirectory, "not a directory"),
                root,
            ));
        }

        let mut queue = VecDeque::new();
        queue.push_back((root, 1));
        Ok(Self {
            queue,
            current: None,
            options,
        })
    }

    fn should_include(&self, entry: &WalkEntry) -> bool {
        if entry.is_dir && !self.options.include_dirs {
            return false;
        }
        if !entry.is_dir && !self.options.include_files {
            return false;
        }
        !(self.options.skip_hidden && entry.is_hidden())
    }

    fn should_descend(&self, entry: &WalkEntry, depth: usize) -> bool {
        if let Some(max_depth) = self.options.max_depth
            && depth >= max_depth
        {
            return false;
        }
        // Linked directories are listed but never entered.
        if !entry.is_dir || entry.is_symlink {
            return false;
        }
        !(self.options.skip_hidden && entry.is_hidden())
    }
}

impl Iterator for WalkDir {
    type Item = RenderResult<WalkEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((ref mut read_dir, ref dir_path, depth)) = self.current {
                match read_dir.next() {
                    Some(Ok(fs_entry)) => {
                        let path = fs_entry.path();
                        let file_type = match fs_entry.file_type() {
                            Ok(ft) => ft,
                            Err(e) => return Some(Err(RenderError::io(e, path))),
                        };
                        let is_symlink = file_type.is_symlink();
                        // Resolve symlinks so a linked directory still reports as one.
                        let is_dir = if is_symlink {
                            fs::metadata(&path).map(|m| m.is_dir()).unwrap_or(false)
                        } else {
                            file_type.is_dir()
                        };
                        let entry = WalkEntry {
                            path,
                            is_dir,
                            is_symlink,
                        };

                        if self.should_descend(&entry, depth) {
                            self.queue.push_back((entry.path.clone(), depth + 1));
                        }
                        if self.should_include(&entry) {
                            return Some(Ok(entry));
                        }
                        continue;
                    }
                    Some(Err(e)) => {
                        return Some(Err(RenderError::io(e, dir_path)));
                    }
                    None => {
                        self.current = None;
                    }
                }
            }

            let (dir, depth) = self.queue.pop_front()?;
            match fs::read_dir(&dir) {
                Ok(read_dir) => self.current = Some((read_dir, dir, depth)),
                Err(e) => return Some(Err(RenderError::io(e, dir))),
            }
        }
    }
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.contains(&e.to_ascii_lowercase().as_str()))
}

/// Recursively collect files under `root` whose extension (case-insensitive)
/// is in `extensions`, sorted by path.
///
/// Unreadable subdirectories are skipped with a warning.
pub fn find_font_files(root: impl AsRef<Path>, extensions: &[&str]) -> RenderResult<Vec<PathBuf>> {
    let walker = WalkDir::with_options(root, WalkDirOptions::new().files_only())?;
    let mut files = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) if has_extension(entry.path(), extensions) => files.push(entry.into_path()),
            Ok(_) => {}
            Err(e) => tracing::warn!(target: "glyphset_render::discovery", "{}", e),
        }
    }
    files.sort();
    Ok(files)
}

/// Collect `root` and every directory below it, sorted by path.
pub fn find_directories(root: impl AsRef<Path>) -> RenderResult<Vec<PathBuf>> {
    let root = root.as_ref();
    let walker = WalkDir::with_options(root, WalkDirOptions::new().dirs_only())?;
    let mut dirs = vec![root.to_path_buf()];
    for entry in walker {
        match entry {
            Ok(entry) => dirs.push(entry.into_path()),
            Err(e) => tracing::warn!(target: "glyphset_render::discovery", "{}", e),
        }
    }
    dirs.sort();
    Ok(dirs)
}
