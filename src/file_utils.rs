use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::subtitle_processor::{SubtitleFormat, Timecode};

// @module: File and directory utilities

// @const: Media container suffixes picked up in folder mode
const VIDEO_EXTENSIONS: [&str; 14] = [
    "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v",
    "mpg", "mpeg", "ogv", "ts", "mts", "m2ts",
];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: Output directory next to the media file, named after its stem
    // @example: /videos/Movie.mkv -> /videos/Movie
    pub fn output_dir_for<P: AsRef<Path>>(media_file: P) -> PathBuf {
        let media_file = media_file.as_ref();
        let stem = media_file.file_stem().unwrap_or_default().to_string_lossy();

        // Without an extension the stem is the file itself
        if media_file.extension().is_none() {
            return media_file.with_file_name(format!("{}_segments", stem));
        }
        media_file.with_file_name(&*stem)
    }

    // @generates: Artifact base path for one segment, without extension
    // @example: ("/out", "Movie", 0:00:09.70) -> "/out/Movie -- 0_00_09-70"
    pub fn segment_base_path<P: AsRef<Path>>(output_dir: P, base_name: &str, start: Timecode) -> PathBuf {
        output_dir
            .as_ref()
            .join(format!("{} -- {}", base_name, start.to_file_stem()))
    }

    /// Append an extension to a base path that may itself contain dots
    pub fn with_suffix<P: AsRef<Path>>(base: P, extension: &str) -> PathBuf {
        let mut name = base.as_ref().as_os_str().to_owned();
        name.push(".");
        name.push(extension);
        PathBuf::from(name)
    }

    /// Find files with a specific extension in a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let normalized_ext = extension.trim_start_matches('.');

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(normalized_ext) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        Ok(result)
    }

    /// Find all video files below a directory, sorted by path
    pub fn find_video_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut videos = Vec::new();
        for ext in VIDEO_EXTENSIONS {
            videos.extend(Self::find_files(dir.as_ref(), ext)?);
        }
        videos.sort();
        videos.dedup();
        Ok(videos)
    }

    /// Find a subtitle file sitting next to a video with the same stem.
    ///
    /// Formats are tried in the order `.ass`, `.ssa`, `.vtt`, `.srt`.
    pub fn find_subtitle_for<P: AsRef<Path>>(video_file: P) -> Option<PathBuf> {
        let video_file = video_file.as_ref();
        SubtitleFormat::EXTENSIONS
            .iter()
            .map(|ext| video_file.with_extension(ext))
            .find(|candidate| Self::file_exists(candidate))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Write a file only if it is missing (or `force` is set).
    ///
    /// Returns whether the file was written.
    pub fn write_if_missing<P: AsRef<Path>>(path: P, content: &str, force: bool) -> Result<bool> {
        if !force && Self::file_exists(&path) {
            return Ok(false);
        }
        Self::write_to_file(path, content)?;
        Ok(true)
    }

    /// Remove a file if it exists
    pub fn remove_if_exists<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if path.exists() {
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove file: {:?}", path))?;
        }
        Ok(())
    }
}
