/*!
 * Audio and frame extraction through the external ffmpeg binary.
 *
 * Every call spawns one ffmpeg process with `-n` so existing outputs are
 * never overwritten, and bounds it with the configured timeout.
 */

use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use log::{debug, error};
use tokio::process::Command;

use crate::app_config::MediaConfig;
use crate::errors::MediaError;
use crate::file_utils::FileManager;
use crate::subtitle_processor::DialogueRecord;

/// Runs ffmpeg to cut audio and still frames for dialogue segments
#[derive(Debug, Clone)]
pub struct MediaExtractor {
    config: MediaConfig,
}

impl MediaExtractor {
    /// Create an extractor with the given media settings
    pub fn new(config: MediaConfig) -> Self {
        Self { config }
    }

    /// Check that the configured ffmpeg binary can be started
    pub async fn check_available(&self) -> Result<(), MediaError> {
        self.run(vec!["-version".into()]).await.map(|_| ())
    }

    /// Arguments for cutting a segment's audio into a mono wav.
    ///
    /// Seeking happens before `-i` so the decode starts at the segment.
    pub fn cut_audio_args(&self, media: &Path, record: &DialogueRecord, wav_out: &Path) -> Vec<OsString> {
        vec![
            "-n".into(),
            "-vn".into(),
            "-ss".into(),
            record.start.to_string().into(),
            "-i".into(),
            media.into(),
            "-t".into(),
            record.duration.to_string().into(),
            "-ar".into(),
            self.config.sample_rate.to_string().into(),
            "-ac".into(),
            self.config.channels.to_string().into(),
            wav_out.into(),
        ]
    }

    /// Arguments for encoding the temporary wav to mp3
    pub fn encode_audio_args(&self, wav_in: &Path, mp3_out: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-n".into(),
            "-i".into(),
            wav_in.into(),
            "-aq".into(),
            self.config.audio_quality.to_string().into(),
        ];
        if self.config.normalize_audio {
            // EBU R128 loudness normalization
            args.push("-af".into());
            args.push("loudnorm".into());
        }
        args.push(mp3_out.into());
        args
    }

    /// Arguments for grabbing the frame at the segment start
    pub fn frame_args(&self, media: &Path, record: &DialogueRecord, image_out: &Path) -> Vec<OsString> {
        vec![
            "-n".into(),
            "-ss".into(),
            record.start.to_string().into(),
            "-i".into(),
            media.into(),
            "-frames:v".into(),
            "1".into(),
            "-q:v".into(),
            "2".into(),
            image_out.into(),
        ]
    }

    /// Extract a segment's audio to `<base>.mp3`.
    ///
    /// The segment is cut to a temporary wav first so that loudness
    /// normalization only sees the segment, then the wav is removed.
    pub async fn extract_audio(&self, media: &Path, record: &DialogueRecord, base: &Path) -> Result<(), MediaError> {
        let wav = FileManager::with_suffix(base, "wav");
        let mp3 = FileManager::with_suffix(base, "mp3");

        let result = match self.run(self.cut_audio_args(media, record, &wav)).await {
            Ok(_) => self.run(self.encode_audio_args(&wav, &mp3)).await.map(|_| ()),
            Err(e) => Err(e),
        };

        if let Err(e) = FileManager::remove_if_exists(&wav) {
            error!("Failed to remove temporary audio {:?}: {}", wav, e);
        }
        result
    }

    /// Extract the frame at a segment's start to `<base>.jpg`
    pub async fn extract_frame(&self, media: &Path, record: &DialogueRecord, base: &Path) -> Result<(), MediaError> {
        let jpg = FileManager::with_suffix(base, "jpg");
        self.run(self.frame_args(media, record, &jpg)).await.map(|_| ())
    }

    async fn run(&self, args: Vec<OsString>) -> Result<String, MediaError> {
        debug!("Running {} {:?}", self.config.ffmpeg_path, args);

        let ffmpeg_future = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .kill_on_drop(true)
            .output();

        let timeout_secs = self.config.timeout_secs;
        let output = match tokio::time::timeout(Duration::from_secs(timeout_secs), ffmpeg_future).await {
            Ok(result) => result.map_err(|e| {
                MediaError::ToolNotFound(format!("{}: {}", self.config.ffmpeg_path, e))
            })?,
            Err(_) => return Err(MediaError::Timeout(timeout_secs)),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let filtered = filter_ffmpeg_stderr(&stderr);
            error!("ffmpeg failed: {}", filtered);
            return Err(MediaError::ProcessFailed(filtered));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Filter ffmpeg stderr to only show meaningful error lines, stripping the
/// version banner, build configuration, and stream metadata noise.
pub fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let noise_prefixes = [
        "ffmpeg version",
        "built with",
        "configuration:",
        "lib",
        "Input #",
        "Metadata:",
        "Duration:",
        "Chapter",
        "Stream #",
        "title",
        "BPS",
        "DURATION",
        "NUMBER_OF",
        "_STATISTICS",
        "encoder",
        "Output #",
        "Stream mapping:",
        "Press [q]",
        "size=",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !noise_prefixes.iter().any(|p| line.starts_with(p)))
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
