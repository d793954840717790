/*!
 * Language utilities for target language tags.
 *
 * Target languages are BCP-47-style tags (`fr`, `zh-TW`, `pt-BR`) whose
 * primary subtag is an ISO 639-1 (2-letter) or ISO 639-2 (3-letter) code.
 */

use anyhow::{anyhow, Result};
use isolang::Language;

/// Targets offered by default
pub const SUPPORTED_TARGETS: &[&str] = &[
    "zh-TW", "zh-CN", "en", "ja", "ko", "fr", "de", "es", "pt", "it", "ru", "ar", "he",
];

/// Map an ISO 639-2/B code to its ISO 639-2/T counterpart
fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    match code {
        "fre" => Some("fra"),
        "ger" => Some("deu"),
        "dut" => Some("nld"),
        "gre" => Some("ell"),
        "chi" => Some("zho"),
        "cze" => Some("ces"),
        "ice" => Some("isl"),
        "alb" => Some("sqi"),
        "arm" => Some("hye"),
        "baq" => Some("eus"),
        "bur" => Some("mya"),
        "per" => Some("fas"),
        "geo" => Some("kat"),
        "may" => Some("msa"),
        "mac" => Some("mkd"),
        "rum" => Some("ron"),
        "slo" => Some("slk"),
        "wel" => Some("cym"),
        _ => None,
    }
}

/// Resolve the primary subtag of a tag to a language
fn primary_language(tag: &str) -> Option<Language> {
    let primary = tag.trim().split(['-', '_']).next()?.to_lowercase();

    match primary.len() {
        2 => Language::from_639_1(&primary),
        3 => Language::from_639_3(part2b_to_part2t(&primary).unwrap_or(&primary)),
        _ => None,
    }
}

/// Validate a BCP-47-style language tag
pub fn validate_language_tag(tag: &str) -> Result<()> {
    if primary_language(tag).is_none() {
        return Err(anyhow!("Invalid language tag: {}", tag));
    }

    // Subtags after the primary one: script, region or variant
    let valid_subtags = tag
        .trim()
        .split(['-', '_'])
        .skip(1)
        .all(|subtag| (2..=8).contains(&subtag.len()) && subtag.chars().all(|c| c.is_ascii_alphanumeric()));

    if !valid_subtags {
        return Err(anyhow!("Invalid language tag: {}", tag));
    }

    Ok(())
}

/// Get the language name from a tag, ignoring region and script subtags
pub fn get_language_name(tag: &str) -> Result<String> {
    let lang = primary_language(tag)
        .ok_or_else(|| anyhow!("Failed to get language from tag: {}", tag))?;

    Ok(lang.to_name().to_string())
}
