use anyhow::{Result, Context, anyhow};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::deck::{DeckRow, DeckWriter};
use crate::file_utils::FileManager;
use crate::media::MediaExtractor;
use crate::subtitle_processor::{self, DialogueRecord};

// @module: Application controller for segment extraction

/// Counters reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Dialogue records parsed from the primary track
    pub segments: usize,
    /// Text files written this run
    pub texts_written: usize,
    /// Audio clips produced this run
    pub audio_extracted: usize,
    /// Frames produced this run
    pub frames_extracted: usize,
    /// Artifacts left alone because they already existed
    pub cached: usize,
    /// Media extraction failures
    pub failures: usize,
    /// Segments that received a translation
    pub aligned: usize,
}

/// Main application controller: subtitles in, segment artifacts and deck out
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: ffmpeg runner
    extractor: MediaExtractor,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Invalid configuration")?;
        let extractor = MediaExtractor::new(config.media.clone());
        Ok(Self { config, extractor })
    }

    /// Extract every dialogue segment of `subtitle_file` from `media_file`.
    ///
    /// Artifacts go to a directory named after the media file. When
    /// `translation_file` is given, each segment is paired with the
    /// closest-starting cue of that track.
    pub async fn run(
        &self,
        subtitle_file: &Path,
        media_file: &Path,
        translation_file: Option<&Path>,
        force_overwrite: bool,
    ) -> Result<RunSummary> {
        let start_time = std::time::Instant::now();

        if !media_file.exists() {
            return Err(anyhow!("Media file does not exist: {:?}", media_file));
        }

        let records = subtitle_processor::parse_subtitle_file(subtitle_file, self.config.padding_ms)
            .with_context(|| format!("Failed to parse subtitle file: {:?}", subtitle_file))?;

        let translations = match translation_file {
            Some(path) => subtitle_processor::parse_subtitle_file(path, self.config.padding_ms)
                .with_context(|| format!("Failed to parse translation file: {:?}", path))?,
            None => Vec::new(),
        };

        let output_dir = FileManager::output_dir_for(media_file);
        FileManager::ensure_dir(&output_dir)?;

        let base_name = media_file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "segments".to_string());

        info!("Extracting {} segments from {:?}", records.len(), media_file);

        let progress_bar = ProgressBar::new(records.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} segments ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));

        let mut summary = RunSummary {
            segments: records.len(),
            ..Default::default()
        };
        let mut deck = DeckWriter::new();

        for record in &records {
            progress_bar.set_message(record.start.to_string());

            let translation = subtitle_processor::find_closest_ms(
                &translations,
                record.start.as_millis(),
                self.config.max_diff_ms,
            );
            if translation.is_some() {
                summary.aligned += 1;
            }

            let row = self
                .process_segment(record, media_file, &output_dir, &base_name, force_overwrite, &mut summary)
                .await?;
            deck.push(DeckRow {
                translation: translation.map(|t| t.text.clone()),
                ..row
            });

            progress_bar.inc(1);
        }

        progress_bar.finish_and_clear();

        let manifest = DeckWriter::manifest_path(&output_dir, &base_name);
        deck.write_to(&manifest)?;

        if summary.failures > 0 {
            warn!("{} media extraction(s) failed, see errors above", summary.failures);
        }
        info!(
            "Done extracting {} segments in {} ({} cached). Deck: {:?}",
            summary.segments,
            Self::format_duration(start_time.elapsed()),
            summary.cached,
            manifest
        );

        Ok(summary)
    }

    // Write the text, audio and frame for one segment and return its deck row
    async fn process_segment(
        &self,
        record: &DialogueRecord,
        media_file: &Path,
        output_dir: &Path,
        base_name: &str,
        force_overwrite: bool,
        summary: &mut RunSummary,
    ) -> Result<DeckRow> {
        let base = FileManager::segment_base_path(output_dir, base_name, record.start);
        debug!("Segment {}", record);

        let text_path = FileManager::with_suffix(&base, "txt");
        if FileManager::write_if_missing(&text_path, &record.text, force_overwrite)? {
            summary.texts_written += 1;
        } else {
            summary.cached += 1;
        }

        let wav_path = FileManager::with_suffix(&base, "wav");
        let mp3_path = FileManager::with_suffix(&base, "mp3");
        let audio_present = FileManager::file_exists(&wav_path) || FileManager::file_exists(&mp3_path);
        if audio_present && !force_overwrite {
            summary.cached += 1;
        } else {
            // ffmpeg runs with -n, so stale outputs must go first
            FileManager::remove_if_exists(&wav_path)?;
            FileManager::remove_if_exists(&mp3_path)?;
            match self.extractor.extract_audio(media_file, record, &base).await {
                Ok(()) => summary.audio_extracted += 1,
                Err(e) => {
                    error!("Audio extraction failed for {}: {}", record.start, e);
                    summary.failures += 1;
                }
            }
        }

        let jpg_path = FileManager::with_suffix(&base, "jpg");
        if self.config.media.extract_frames {
            if FileManager::file_exists(&jpg_path) && !force_overwrite {
                summary.cached += 1;
            } else {
                FileManager::remove_if_exists(&jpg_path)?;
                match self.extractor.extract_frame(media_file, record, &base).await {
                    Ok(()) => summary.frames_extracted += 1,
                    Err(e) => {
                        error!("Frame extraction failed for {}: {}", record.start, e);
                        summary.failures += 1;
                    }
                }
            }
        }

        Ok(DeckRow {
            text: record.text.clone(),
            translation: None,
            audio: Self::file_name_if_exists(&mp3_path),
            image: Self::file_name_if_exists(&jpg_path),
        })
    }

    fn file_name_if_exists(path: &Path) -> Option<String> {
        if !FileManager::file_exists(path) {
            return None;
        }
        path.file_name().map(|name| name.to_string_lossy().into_owned())
    }

    /// Format a duration for the end-of-run message
    pub fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }

    /// Run every video in a directory that has a subtitle file next to it
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        self.extractor
            .check_available()
            .await
            .context("ffmpeg is required for folder mode")?;

        let video_files = FileManager::find_video_files(&input_dir)?;
        if video_files.is_empty() {
            warn!("No video files found in {:?}", input_dir);
            return Ok(());
        }

        let folder_pb = ProgressBar::new(video_files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Processing files");

        let mut success_count = 0;
        let mut error_count = 0;
        let mut skip_count = 0;

        for video_file in &video_files {
            let Some(subtitle_file) = FileManager::find_subtitle_for(video_file) else {
                debug!("No subtitle next to {:?}, skipping", video_file);
                skip_count += 1;
                folder_pb.inc(1);
                continue;
            };

            match self.run(&subtitle_file, video_file, None, force_overwrite).await {
                Ok(_) => success_count += 1,
                Err(e) => {
                    error!("Error processing {:?}: {:#}", video_file, e);
                    error_count += 1;
                }
            }
            folder_pb.inc(1);
        }

        folder_pb.finish_and_clear();

        info!(
            "Processed {} files in {}: {} succeeded, {} failed, {} without subtitles",
            video_files.len(),
            Self::format_duration(start_time.elapsed()),
            success_count,
            error_count,
            skip_count
        );

        Ok(())
    }
}
