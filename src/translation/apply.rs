/*!
 * Write-back of translated cue text.
 *
 * Translations are keyed by cue position and may arrive in any order. Every
 * replacement goes through `Document::replace_text`, which rejects a changed
 * line count.
 */

use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::SubtitleError;
use crate::subtitle::Document;

/// Translated lines of one cue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedCue {
    pub position: usize,
    pub lines: Vec<String>,
}

/// All translated cues of a document for one target language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedCues {
    pub language: String,
    pub cues: Vec<TranslatedCue>,
}

/// Produce a new document with the translated lines written back
pub fn apply_translation(document: &Document, translation: &TranslatedCues) -> Result<Document, SubtitleError> {
    let mut translated = document.clone();
    let mut covered = vec![false; document.cues.len()];

    for cue in &translation.cues {
        translated.replace_text(cue.position, cue.lines.clone())?;
        covered[cue.position] = true;
    }

    let missing = covered.iter().filter(|done| !**done).count();
    if missing > 0 {
        warn!(
            "{} of {} cue(s) have no {} translation and keep their source text",
            missing,
            document.cues.len(),
            translation.language
        );
    } else {
        debug!("Applied {} translation to {} cue(s)", translation.language, document.cues.len());
    }

    Ok(translated)
}

/// `<stem>.<language>.<extension>` for the translated copy of `name`
pub fn output_file_name(name: &str, language: &str) -> String {
    let path = Path::new(name);
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();

    match path.extension() {
        Some(extension) => format!("{}.{}.{}", stem, language, extension.to_string_lossy()),
        None => format!("{}.{}", stem, language),
    }
}
