/*!
 * Tab-separated deck manifest for flashcard import.
 *
 * One row per dialogue segment with the columns:
 * text, translation, sound reference, image reference.
 */

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;
use log::debug;

use crate::file_utils::FileManager;

/// One flashcard row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeckRow {
    /// Dialogue text
    pub text: String,

    /// Aligned text from a secondary track
    pub translation: Option<String>,

    /// Audio file name relative to the deck's media folder
    pub audio: Option<String>,

    /// Image file name relative to the deck's media folder
    pub image: Option<String>,
}

impl DeckRow {
    /// Create a row with only the dialogue text
    pub fn new(text: impl Into<String>) -> Self {
        DeckRow {
            text: text.into(),
            ..Default::default()
        }
    }
}

impl fmt::Display for DeckRow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sound = self
            .audio
            .as_deref()
            .map(|file| format!("[sound:{}]", escape_field(file)))
            .unwrap_or_default();
        let image = self
            .image
            .as_deref()
            .map(|file| format!("<img src=\"{}\">", escape_field(file)))
            .unwrap_or_default();

        write!(
            f,
            "{}\t{}\t{}\t{}",
            escape_field(&self.text),
            escape_field(self.translation.as_deref().unwrap_or("")),
            sound,
            image
        )
    }
}

/// Make a value safe for a single tab-separated field.
///
/// Tabs become spaces, carriage returns are dropped and line feeds become
/// `<br>` so a row never spans more than one line.
pub fn escape_field(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\t' => escaped.push(' '),
            '\r' => {}
            '\n' => escaped.push_str("<br>"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Accumulates deck rows during a run and writes them once at the end
#[derive(Debug, Default)]
pub struct DeckWriter {
    rows: Vec<DeckRow>,
}

impl DeckWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: DeckRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render all rows, one per line
    pub fn render(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            out.push_str(&row.to_string());
            out.push('\n');
        }
        out
    }

    /// Manifest path for a media base name: `<dir>/<base>.tsv`
    pub fn manifest_path<P: AsRef<Path>>(output_dir: P, base_name: &str) -> PathBuf {
        output_dir.as_ref().join(format!("{}.tsv", base_name))
    }

    /// Write the manifest, replacing any previous one
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        FileManager::write_to_file(&path, &self.render())?;
        debug!("Wrote {} deck rows to {:?}", self.rows.len(), path.as_ref());
        Ok(())
    }
}
