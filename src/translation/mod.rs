/*!
 * Boundary between the subtitle core and the external translation step.
 *
 * - `job`: what gets sent out (source lines per cue, targets, line width)
 * - `apply`: what comes back (translated lines per cue position)
 */

pub mod apply;
pub mod job;

pub use apply::{apply_translation, output_file_name, TranslatedCue, TranslatedCues};
pub use job::{JobCue, TranslationJob};
