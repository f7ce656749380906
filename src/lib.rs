/*!
 * # subdeck - subtitle-driven flashcard material extractor
 *
 * A Rust library that turns a subtitle file and its video into
 * per-line audio clips, frames and a flashcard deck.
 *
 * ## Features
 *
 * - Parse ASS/SSA, WebVTT and SubRip subtitles into one record shape
 * - Pad every cue symmetrically before cutting audio
 * - Remove duplicate cues and ruby (furigana) markup
 * - Pair each line with the closest line of a translation track
 * - Cut and loudness-normalize audio and grab frames through ffmpeg
 * - Write a tab-separated deck manifest
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `subtitle_processor`: Subtitle parsing core:
 *   - `subtitle_processor::timecode`: Timecode conversion
 *   - `subtitle_processor::ass`: ASS/SSA parser
 *   - `subtitle_processor::vtt`: WebVTT/SubRip parser
 *   - `subtitle_processor::aligner`: Nearest-start matching between tracks
 * - `app_config`: Configuration management
 * - `media`: ffmpeg audio and frame extraction
 * - `deck`: Deck manifest rows and writer
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod deck;
pub mod errors;
pub mod file_utils;
pub mod media;
pub mod subtitle_processor;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, MediaError, SubtitleError};
pub use subtitle_processor::{DialogueRecord, SubtitleFormat, Timecode, find_closest, parse_subtitle_file};
