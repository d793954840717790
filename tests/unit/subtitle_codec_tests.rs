/*!
 * Tests for the per-dialect parsers and serializers
 */

use rand::distr::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use subtrans::subtitle::model::AssEvent;
use subtrans::subtitle::{self, ass, srt, vtt, Annotations, Dialect, Document, ParseIssue, Timestamp};
use subtrans::SubtitleError;
use crate::common;

/// Random replacement lines of one to four alphanumeric words
fn random_lines(rng: &mut StdRng, count: usize) -> Vec<String> {
    (0..count)
        .map(|_| {
            let words = rng.random_range(1..=4);
            (0..words)
                .map(|_| {
                    let len = rng.random_range(1..=9);
                    (&mut *rng).sample_iter(Alphanumeric).take(len).map(char::from).collect::<String>()
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

/// The parts of an ASS event that text replacement must not touch
fn ass_frame(event: &AssEvent) -> (String, String, Vec<String>, Vec<String>, Vec<String>) {
    let fields = event.fields.iter().map(|field| format!("{:?}", field)).collect();
    let tags = event
        .layout
        .lines
        .iter()
        .flat_map(|line| line.tags.iter().map(|anchor| anchor.tag.clone()))
        .collect();
    (event.key.clone(), event.spacing.clone(), fields, event.leading.clone(), tags)
}

/// Assert that `after` differs from `before` only in cue text
fn assert_text_only_change(before: &Document, after: &Document, expected_text: &[Vec<String>]) {
    assert_eq!(before.dialect, after.dialect);
    assert_eq!(before.preamble, after.preamble);
    assert_eq!(before.trailer, after.trailer);
    assert_eq!(before.cues.len(), after.cues.len());

    for ((old, new), text) in before.cues.iter().zip(&after.cues).zip(expected_text) {
        assert_eq!(old.index, new.index);
        assert_eq!(old.start, new.start);
        assert_eq!(old.end, new.end);
        assert_eq!(&new.text_lines, text);

        match (&old.annotations, &new.annotations) {
            (Annotations::Ass(old_event), Annotations::Ass(new_event)) => {
                assert_eq!(ass_frame(old_event), ass_frame(new_event));
                assert_eq!(old_event.layout.breaks, new_event.layout.breaks);
            }
            (old_annotations, new_annotations) => assert_eq!(old_annotations, new_annotations),
        }
    }
}

/// Test that replacing text and re-parsing changes nothing but the text, for every dialect
#[test]
fn test_textReplacement_withRandomLines_shouldOnlyChangeText() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for sample in [common::SAMPLE_SRT, common::SAMPLE_VTT, common::SAMPLE_ASS] {
        let document = subtitle::parse_with_hint(None, sample).unwrap();

        for _ in 0..25 {
            let replacements: Vec<Vec<String>> = document
                .cues
                .iter()
                .map(|cue| random_lines(&mut rng, cue.text_lines.len()))
                .collect();

            let translated = document.with_text(replacements.clone()).unwrap();
            let output = subtitle::serialize(&translated);
            let reparsed = subtitle::parse(document.dialect, &output).unwrap();

            assert_text_only_change(&document, &reparsed, &replacements);
        }
    }
}

/// Test that the samples survive an unmodified round trip byte for byte
#[test]
fn test_roundTrip_withSamples_shouldReproduceInput() {
    let spaced_ass = common::SAMPLE_ASS.replace("Text\nDialogue", "Text\n\nDialogue");
    assert_ne!(spaced_ass, common::SAMPLE_ASS);

    for (name, sample) in [
        ("a.srt", common::SAMPLE_SRT),
        ("a.vtt", common::SAMPLE_VTT),
        ("a.ass", common::SAMPLE_ASS),
        ("spaced.ass", spaced_ass.as_str()),
    ] {
        let report = subtitle::round_trip(Some(name), sample).unwrap();
        assert!(report.is_lossless(), "{} should round-trip", name);
        assert!(report.textually_equal, "{} should be textually equal", name);
        assert!(report.issues.is_empty());

        let document = subtitle::parse_with_hint(Some(name), sample).unwrap();
        assert_eq!(subtitle::serialize(&document), sample);
    }
}

/// SRT scenario: a single one-line cue reproduces the input exactly
#[test]
fn test_srt_withSingleLineCue_shouldReproduceInput() {
    let input = "1\n00:00:01,000 --> 00:00:03,000\nHello world\n";
    let document = srt::parse(input).unwrap();

    assert_eq!(document.cues.len(), 1);
    assert_eq!(document.cues[0].index, Some(1));
    assert_eq!(document.cues[0].start.as_millis(), 1_000);
    assert_eq!(document.cues[0].end.as_millis(), 3_000);
    assert_eq!(document.cues[0].text_lines, vec!["Hello world"]);
    assert_eq!(srt::serialize(&document), input);
}

/// Test index, timing and two text lines
#[test]
fn test_srt_withTwoLineCue_shouldDecodeAndReencode() {
    let input = "1\n00:00:01,000 --> 00:00:03,500\nHello\nworld\n";
    let document = srt::parse(input).unwrap();

    let cue = &document.cues[0];
    assert_eq!(cue.index, Some(1));
    assert_eq!(cue.start, Timestamp::from_millis(1_000));
    assert_eq!(cue.end, Timestamp::from_millis(3_500));
    assert_eq!(cue.text_lines, vec!["Hello", "world"]);
    assert_eq!(srt::serialize(&document), input);
}

/// Test that a dot separator in SRT input is canonicalized to a comma
#[test]
fn test_srt_withDotSeparator_shouldCanonicalizeToComma() {
    let document = srt::parse("1\n00:00:01.000 --> 00:00:02.000\nHi\n").unwrap();
    assert_eq!(srt::serialize(&document), "1\n00:00:01,000 --> 00:00:02,000\nHi\n");
}

/// Test that an empty SRT input gives an empty document
#[test]
fn test_srt_withEmptyInput_shouldGiveEmptyDocument() {
    let document = srt::parse("\n\n").unwrap();
    assert!(document.cues.is_empty());
    assert_eq!(srt::serialize(&document), "");
}

/// Test that a trailing index with no timing is rejected
#[test]
fn test_srt_withDanglingIndex_shouldFailTruncated() {
    let input = "1\n00:00:01,000 --> 00:00:02,000\nHi\n\n2\n";
    assert_eq!(srt::parse(input).unwrap_err(), SubtitleError::TruncatedCue { line: 5 });
}

/// VTT scenario: cue settings survive text replacement
#[test]
fn test_vtt_withAlignSetting_shouldKeepItAfterReplacement() {
    let document = vtt::parse("WEBVTT\n\n00:00:01.000 --> 00:00:03.000 align:start\nHi").unwrap();
    let translated = document.with_text(vec![vec!["Bonjour".to_string()]]).unwrap();

    assert_eq!(
        vtt::serialize(&translated),
        "WEBVTT\n\n00:00:01.000 --> 00:00:03.000 align:start\nBonjour\n"
    );
}

/// Test that a VTT document serialized as SRT gets SRT defaults
#[test]
fn test_srt_withVttDocument_shouldRenderDefaults() {
    let mut document = vtt::parse(common::SAMPLE_VTT).unwrap();
    document.dialect = Dialect::Srt;

    let output = subtitle::serialize(&document);
    assert!(output.starts_with("1\n00:00:01,000 --> 00:00:03,000\nHi\n\n2\n00:00:04,500"));
    assert!(!output.contains("align:start"));
}

/// ASS scenario: a leading override tag stays in front of the first line
#[test]
fn test_ass_withLeadingTag_shouldReinsertBeforeTranslation() {
    let document = ass::parse(common::SAMPLE_ASS).unwrap();
    assert_eq!(document.cues[0].text_lines, vec!["Hello", "world"]);
    assert_eq!(document.cues[1].text_lines, vec!["Well, this works"]);

    let translated = document
        .with_text(vec![
            vec!["Bonjour".to_string(), "monde".to_string()],
            vec!["Eh bien, ça marche".to_string()],
        ])
        .unwrap();
    let output = ass::serialize(&translated);

    assert!(output.contains("Dialogue: 0,0:00:01.00,0:00:03.00,Default,,0,0,0,,{\\an8}Bonjour\\Nmonde\n"));
    assert!(output.contains("Comment: 0,0:00:03.00,0:00:04.00,Default,,0,0,0,,timing check\n"));
    assert!(output.contains("Dialogue: 0,0:00:04.00,0:00:06.50,Default,Bob,0,0,0,,Eh {\\i1}bien, {\\i0}ça marche\n"));
}

/// Test that ASS timing keeps only centiseconds
#[test]
fn test_ass_withMillisecondTiming_shouldTruncateToCentiseconds() {
    let mut document = ass::parse(common::SAMPLE_ASS).unwrap();
    document.cues[0].end = Timestamp::from_millis(3_019);

    let output = ass::serialize(&document);
    assert!(output.contains("Dialogue: 0,0:00:01.00,0:00:03.01,Default"));
}

/// Test that parse diagnostics are reported rather than silently dropped
#[test]
fn test_parseIssues_withRecoverableProblems_shouldBeReported() {
    let document = vtt::parse("00:01.000 --> 00:02.000\nHi\n\n00:99.000 --> 00:03.000\nBad\n").unwrap();

    assert_eq!(document.cues.len(), 1);
    assert_eq!(document.issues[0], ParseIssue::MissingHeader);
    assert!(matches!(
        &document.issues[1],
        ParseIssue::SkippedCue { line: 4, error: SubtitleError::MalformedTimestamp { dialect: Dialect::Vtt, .. } }
    ));
    assert_eq!(document.issues[1].to_string().split(':').next(), Some("line 4"));
}
