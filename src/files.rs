use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tga", "tiff", "tif", "webp", "ico", "pnm", "pbm",
    "pgm", "ppm", "pam", "dds", "hdr", "exr", "ff", "qoi",
];

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// The images living next to the opened file, in name order, and which one is
/// showing.
#[derive(Debug, Clone)]
pub struct Siblings {
    files: Vec<PathBuf>,
    current: usize,
}

impl Siblings {
    /// Scan the directory containing `path`. The opened file is always part of
    /// the list, even with an extension we would not pick up ourselves.
    pub fn scan(path: &Path) -> Result<Self> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let opened = dir.join(path.file_name().unwrap_or(path.as_os_str()));

        let mut files = Vec::new();
        for entry in fs::read_dir(&dir)?.filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && is_image_file(&p) {
                files.push(p);
            }
        }
        if !files.contains(&opened) {
            files.push(opened.clone());
        }
        files.sort();

        let current = files.iter().position(|p| *p == opened).unwrap_or(0);
        log::info!("Found {} images in {}", files.len(), dir.display());
        Ok(Self::from_list(files, current))
    }

    pub fn from_list(files: Vec<PathBuf>, current: usize) -> Self {
        let current = current.min(files.len().saturating_sub(1));
        Self { files, current }
    }

    pub fn count(&self) -> usize {
        self.files.len()
    }

    pub fn index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&Path> {
        self.files.get(self.current).map(PathBuf::as_path)
    }

    /// Move one step. Stepping past either end does nothing.
    pub fn step(&mut self, dir: Direction) -> Option<&Path> {
        let idx = match dir {
            Direction::Previous => self.current.checked_sub(1)?,
            Direction::Next => self.current + 1,
        };
        if idx >= self.files.len() {
            return None;
        }
        self.current = idx;
        self.current()
    }
}
