/*!
 * Integration tests for the subtitle processing workflow
 */

use anyhow::Result;

use subtrans::file_utils::FileManager;
use subtrans::subtitle::{self, Dialect};
use subtrans::translation::{apply_translation, TranslatedCue, TranslatedCues, TranslationJob};
use subtrans::SubtitleError;
use crate::common;

/// Answer a translation job by transforming every line, as a translator would
fn translate_job(job: &TranslationJob, language: &str) -> TranslatedCues {
    TranslatedCues {
        language: language.to_string(),
        cues: job
            .cues
            .iter()
            .rev()
            .map(|cue| TranslatedCue { position: cue.position, lines: common::shout(&cue.lines) })
            .collect(),
    }
}

/// Test the full flow for each format: read, export, translate, apply, write, re-read
#[test]
fn test_subtitleWorkflow_withEachFormat_shouldPreserveStructure() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;

    for (name, sample, dialect) in [
        ("film.srt", common::SAMPLE_SRT, Dialect::Srt),
        ("film.vtt", common::SAMPLE_VTT, Dialect::Vtt),
        ("film.ass", common::SAMPLE_ASS, Dialect::Ass),
    ] {
        let source_path = common::create_test_file(temp_dir.path(), name, sample)?;

        // 1. Read and parse the source file
        let content = FileManager::read_subtitle(&source_path)?;
        let document = subtitle::parse_with_hint(Some(name), &content)?;
        assert_eq!(document.dialect, dialect);

        // 2. Export the job through JSON, as the external translator sees it
        let job = TranslationJob::from_document(name, &document, &["fr".to_string()], 42);
        let job_json = serde_json::to_string(&job)?;
        let received: TranslationJob = serde_json::from_str(&job_json)?;

        // 3. Translate and send the result back through JSON
        let result_json = serde_json::to_string(&translate_job(&received, "fr"))?;
        let translation: TranslatedCues = serde_json::from_str(&result_json)?;

        // 4. Apply and write the translated copy
        let translated = apply_translation(&document, &translation)?;
        let output_path = FileManager::generate_output_path(&source_path, None, &translation.language);
        FileManager::write_to_file(&output_path, &subtitle::serialize(&translated))?;
        assert_eq!(output_path.file_name().unwrap().to_string_lossy(), format!("film.fr.{}", dialect.extension()));

        // 5. Re-read the output and compare against the source
        let output = FileManager::read_subtitle(&output_path)?;
        let reparsed = subtitle::parse_with_hint(Some(output_path.to_string_lossy().as_ref()), &output)?;

        assert_eq!(reparsed.dialect, dialect);
        assert_eq!(reparsed.preamble, document.preamble);
        assert_eq!(reparsed.trailer, document.trailer);
        assert_eq!(reparsed.cues.len(), document.cues.len());
        for (source, result) in document.cues.iter().zip(&reparsed.cues) {
            assert_eq!(result.start, source.start);
            assert_eq!(result.end, source.end);
            assert_eq!(result.text_lines, common::shout(&source.text_lines));
            assert_eq!(result.annotations, source.annotations);
        }
    }
    Ok(())
}

/// Test that a translator returning fewer lines is refused and nothing is written
#[test]
fn test_subtitleWorkflow_withLineCountChange_shouldRejectTranslation() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    let source_path = common::create_test_subtitle(temp_dir.path(), "film.srt")?;
    let document = subtitle::parse_with_hint(None, &FileManager::read_subtitle(&source_path)?)?;

    let job = TranslationJob::from_document("film.srt", &document, &["fr".to_string()], 42);
    let mut translation = translate_job(&job, "fr");
    for cue in &mut translation.cues {
        let merged = cue.lines.join(" ");
        cue.lines = vec![merged];
    }

    let err = apply_translation(&document, &translation).unwrap_err();
    assert_eq!(err, SubtitleError::LineCountMismatch { cue: 1, expected: 2, actual: 1 });
    Ok(())
}

/// Test round-trip checks over a directory of mixed files
#[test]
fn test_roundTrip_withDirectoryOfFiles_shouldAllBeLossless() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "one.srt", &common::SAMPLE_SRT.replace('\n', "\r\n"))?;
    common::create_test_file(temp_dir.path(), "two.vtt", common::SAMPLE_VTT)?;
    common::create_test_file(temp_dir.path(), "three.ssa", common::SAMPLE_ASS)?;

    for path in FileManager::find_subtitle_files(temp_dir.path())? {
        let content = FileManager::read_subtitle(&path)?;
        let report = subtitle::round_trip(Some(path.to_string_lossy().as_ref()), &content)?;
        assert!(report.is_lossless(), "{:?} should round-trip", path);
        assert!(report.textually_equal, "{:?} should match after normalization", path);
    }
    Ok(())
}
