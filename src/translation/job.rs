/*!
 * Export of the translatable payload of a document.
 *
 * A `TranslationJob` is what the external translation step consumes: one entry
 * per cue with its position, index, timing label and source lines, plus the
 * target languages and the maximum line width to instruct the model with.
 */

use serde::{Deserialize, Serialize};

use crate::subtitle::{Dialect, Document};

/// Source text of one cue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCue {
    /// Position of the cue in the document, used for write-back
    pub position: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// `start --> end` in the document's own grammar
    pub timestamp: String,
    pub lines: Vec<String>,
}

/// Everything the translation step needs for one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationJob {
    pub name: String,
    pub dialect: Dialect,
    pub targets: Vec<String>,
    pub line_width: usize,
    pub cues: Vec<JobCue>,
}

impl TranslationJob {
    pub fn from_document(name: &str, document: &Document, targets: &[String], line_width: usize) -> Self {
        let cues = document
            .cues
            .iter()
            .enumerate()
            .map(|(position, cue)| JobCue {
                position,
                index: cue.index,
                timestamp: cue.timing_label(document.dialect),
                lines: cue.text_lines.clone(),
            })
            .collect();

        TranslationJob {
            name: name.to_string(),
            dialect: document.dialect,
            targets: targets.to_vec(),
            line_width,
            cues,
        }
    }

    /// Number of source lines to translate per target language
    pub fn line_count(&self) -> usize {
        self.cues.iter().map(|cue| cue.lines.len()).sum()
    }
}
