//! Heuristic localization risk scanner.
//!
//! [`RiskScanner::scan`] compares a source string with its translation for a
//! target locale and reports warnings. Checks always run in the same order and
//! never short-circuit:
//!
//! 1. UI expansion, when the locale profile sets a maximum expansion ratio
//! 2. Culturally sensitive terms from the locale profile
//! 3. Locale specific formatting patterns from the locale profile
//! 4. String concatenation in the source (every locale)
//! 5. Right-to-left layout (`ar*` locales)
//! 6. CJK font fallback (`zh*`, `ja*`, `ko*` locales)

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::entry::{RiskKind, RiskWarning};

/// Sources shorter than this never raise an expansion warning
const MIN_EXPANSION_SOURCE_LEN: usize = 5;

/// `"text" + name` or `name + "text"`, with single or double quotes
static CONCATENATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:"[^"]*"|'[^']*')\s*\+\s*[A-Za-z_$][\w$]*|[A-Za-z_$][\w$]*\s*\+\s*(?:"[^"]*"|'[^']*')"#,
    )
    .expect("concatenation pattern is valid")
});

static DEFAULT_SCANNER: LazyLock<RiskScanner> = LazyLock::new(RiskScanner::default);

/// A pattern that flags a locale specific formatting concern
#[derive(Debug, Clone)]
pub struct FormattingCheck {
    pattern: Regex,
    message: String,
}

impl FormattingCheck {
    pub fn new(pattern: &str, message: &str) -> Result<Self, regex::Error> {
        Ok(FormattingCheck {
            pattern: Regex::new(pattern)?,
            message: message.to_string(),
        })
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Locale specific rules. Every part is optional.
#[derive(Debug, Clone, Default)]
pub struct LocaleProfile {
    pub max_expansion_ratio: Option<f64>,
    /// Lowercase substrings, reported in this order
    pub sensitive_terms: Vec<String>,
    pub formatting_checks: Vec<FormattingCheck>,
}

impl LocaleProfile {
    pub fn with_max_expansion_ratio(mut self, ratio: f64) -> Self {
        self.max_expansion_ratio = Some(ratio);
        self
    }

    pub fn with_sensitive_terms(mut self, terms: &[&str]) -> Self {
        self.sensitive_terms = terms.iter().map(|t| t.to_lowercase()).collect();
        self
    }

    pub fn with_formatting_check(mut self, check: FormattingCheck) -> Self {
        self.formatting_checks.push(check);
        self
    }
}

/// Scans translated pairs against per-locale profiles
#[derive(Debug, Clone)]
pub struct RiskScanner {
    profiles: HashMap<String, LocaleProfile>,
}

impl RiskScanner {
    /// A scanner with no locale profiles; only the unconditional checks run
    pub fn empty() -> Self {
        RiskScanner {
            profiles: HashMap::new(),
        }
    }

    /// Add or replace the profile for a locale code
    pub fn with_profile(mut self, code: &str, profile: LocaleProfile) -> Self {
        self.profiles.insert(code.to_lowercase(), profile);
        self
    }

    pub fn profile(&self, code: &str) -> Option<&LocaleProfile> {
        self.profiles.get(&code.to_lowercase())
    }

    pub fn scan(&self, original: &str, translated: &str, language_code: &str) -> Vec<RiskWarning> {
        let mut risks = Vec::new();
        if original.is_empty() || translated.is_empty() {
            return risks;
        }

        if let Some(profile) = self.profile(language_code) {
            if let Some(limit) = profile.max_expansion_ratio {
                if let Some(warning) = check_expansion(original, translated, limit, language_code)
                {
                    risks.push(warning);
                }
            }

            if !profile.sensitive_terms.is_empty() {
                let haystack = format!("{}{}", original, translated).to_lowercase();
                let matched: Vec<&str> = profile
                    .sensitive_terms
                    .iter()
                    .filter(|term| haystack.contains(term.as_str()))
                    .map(String::as_str)
                    .collect();
                if !matched.is_empty() {
                    risks.push(RiskWarning::new(
                        RiskKind::Cultural,
                        format!(
                            "[CULTURAL_ERROR] Potentially sensitive terms for {}: {}. Review with a native reviewer.",
                            language_code,
                            matched.join(", ")
                        ),
                    ));
                }
            }

            for check in &profile.formatting_checks {
                if check.pattern.is_match(original) || check.pattern.is_match(translated) {
                    risks.push(RiskWarning::new(
                        RiskKind::Formatting,
                        format!("[FORMATTING_ERROR] {}", check.message),
                    ));
                }
            }
        }

        if CONCATENATION.is_match(original) {
            risks.push(RiskWarning::new(
                RiskKind::Formatting,
                "[FORMATTING_ERROR] Source looks like string concatenation; use ICU MessageFormat placeholders so translators can reorder the sentence.",
            ));
        }

        let code = language_code.to_lowercase();
        if code.starts_with("ar") {
            risks.push(RiskWarning::new(
                RiskKind::Rtl,
                "[RTL_ALERT] UI needs Right-to-Left flipping.",
            ));
        }
        if ["zh", "ja", "ko"].iter().any(|prefix| code.starts_with(prefix)) {
            risks.push(RiskWarning::new(
                RiskKind::CjkFont,
                "[CJK_FONT_ALERT] Requires separate Fallback Font with full CJK glyph coverage.",
            ));
        }

        risks
    }
}

impl Default for RiskScanner {
    /// Scanner loaded with the built-in profiles for the supported languages
    fn default() -> Self {
        builtin_profiles()
            .into_iter()
            .fold(RiskScanner::empty(), |scanner, (code, profile)| {
                scanner.with_profile(code, profile)
            })
    }
}

/// Scan with the built-in profiles
pub fn scan(original: &str, translated: &str, language_code: &str) -> Vec<RiskWarning> {
    DEFAULT_SCANNER.scan(original, translated, language_code)
}

fn check_expansion(
    original: &str,
    translated: &str,
    limit: f64,
    language_code: &str,
) -> Option<RiskWarning> {
    let source_len = original.chars().count();
    if source_len <= MIN_EXPANSION_SOURCE_LEN {
        return None;
    }
    let target_len = translated.chars().count();
    let ratio = target_len as f64 / source_len as f64;
    if ratio <= limit {
        return None;
    }

    let growth = ((ratio - 1.0) * 100.0).round() as i64;
    let allowed = ((limit - 1.0) * 100.0).round() as i64;
    let over = ((ratio - limit) * 100.0).round() as i64;
    Some(RiskWarning::new(
        RiskKind::UiExpansion,
        format!(
            "[UI_EXPANSION_RISK] Text is {}% longer ({} vs {} chars), {}% over the {}% limit for {}; check UI clipping.",
            growth, target_len, source_len, over, allowed, language_code
        ),
    ))
}

fn check(pattern: &str, message: &str) -> FormattingCheck {
    FormattingCheck::new(pattern, message).expect("built-in formatting pattern is valid")
}

fn builtin_profiles() -> Vec<(&'static str, LocaleProfile)> {
    const SLASH_DATE: &str = r"\b\d{1,2}/\d{1,2}/\d{2,4}\b";
    const DECIMAL_POINT: &str = r"\b\d+\.\d+\b";
    const DOLLAR_AMOUNT: &str = r"\$\s?\d";
    const TWELVE_HOUR: &str = r"(?i)\b\d{1,2}(:\d{2})?\s?(am|pm)\b";

    let date_order = "Date in slash notation; day/month order differs for this locale, use a locale-aware date formatter.";
    let decimal_comma = "Decimal point in a number; this locale uses a decimal comma, use locale-aware number formatting.";
    let currency = "Hard-coded dollar amount; currency symbol and placement must be localized.";
    let clock = "12-hour time notation; this locale expects a 24-hour clock.";

    vec![
        (
            "en-GB",
            LocaleProfile::default()
                .with_max_expansion_ratio(1.1)
                .with_formatting_check(check(SLASH_DATE, date_order))
                .with_formatting_check(check(
                    r"(?i)\b(color|center|favorite|organize)\w*",
                    "US spelling detected; British English expects colour/centre/favourite/organise.",
                )),
        ),
        (
            "de-DE",
            LocaleProfile::default()
                .with_max_expansion_ratio(1.35)
                .with_sensitive_terms(&["swastika", "führer", "endlösung"])
                .with_formatting_check(check(DECIMAL_POINT, decimal_comma))
                .with_formatting_check(check(SLASH_DATE, date_order))
                .with_formatting_check(check(TWELVE_HOUR, clock)),
        ),
        (
            "fr-FR",
            LocaleProfile::default()
                .with_max_expansion_ratio(1.3)
                .with_formatting_check(check(DECIMAL_POINT, decimal_comma))
                .with_formatting_check(check(DOLLAR_AMOUNT, currency))
                .with_formatting_check(check(
                    r"\w[!?:;]",
                    "French typography requires a (narrow) non-breaking space before ! ? : ;",
                )),
        ),
        (
            "es-ES",
            LocaleProfile::default()
                .with_max_expansion_ratio(1.3)
                .with_formatting_check(check(DECIMAL_POINT, decimal_comma))
                .with_formatting_check(check(
                    r"^[^¿]*\w\?",
                    "Spanish questions need an opening ¿ mark.",
                )),
        ),
        (
            "es-419",
            LocaleProfile::default()
                .with_max_expansion_ratio(1.3)
                .with_formatting_check(check(SLASH_DATE, date_order)),
        ),
        (
            "pt-BR",
            LocaleProfile::default()
                .with_max_expansion_ratio(1.3)
                .with_formatting_check(check(DECIMAL_POINT, decimal_comma))
                .with_formatting_check(check(DOLLAR_AMOUNT, currency)),
        ),
        (
            "pt-PT",
            LocaleProfile::default()
                .with_max_expansion_ratio(1.3)
                .with_formatting_check(check(DECIMAL_POINT, decimal_comma)),
        ),
        (
            "ru-RU",
            LocaleProfile::default()
                .with_max_expansion_ratio(1.35)
                .with_formatting_check(check(DECIMAL_POINT, decimal_comma))
                .with_formatting_check(check(
                    r"\b\d+\s+\w+s\b",
                    "Count followed by a plural noun; Russian needs one/few/many plural forms.",
                )),
        ),
        (
            "pl-PL",
            LocaleProfile::default()
                .with_max_expansion_ratio(1.35)
                .with_formatting_check(check(DECIMAL_POINT, decimal_comma))
                .with_formatting_check(check(
                    r"\b\d+\s+\w+s\b",
                    "Count followed by a plural noun; Polish needs one/few/many plural forms.",
                )),
        ),
        (
            "tr-TR",
            LocaleProfile::default()
                .with_max_expansion_ratio(1.3)
                .with_formatting_check(check(
                    r"[iIıİ]",
                    "Text contains i/I; Turkish dotted and dotless i break naive case conversion.",
                )),
        ),
        (
            "it-IT",
            LocaleProfile::default()
                .with_max_expansion_ratio(1.3)
                .with_formatting_check(check(DECIMAL_POINT, decimal_comma)),
        ),
        (
            "vi-VN",
            LocaleProfile::default()
                .with_max_expansion_ratio(1.3)
                .with_formatting_check(check(DECIMAL_POINT, decimal_comma)),
        ),
        (
            "zh-CN",
            LocaleProfile::default()
                .with_sensitive_terms(&["taiwan", "tibet", "tiananmen"])
                .with_formatting_check(check(
                    r"\w[,.!?]",
                    "Half-width punctuation; Chinese text expects full-width punctuation (，。！？).",
                )),
        ),
        (
            "zh-TW",
            LocaleProfile::default()
                .with_sensitive_terms(&["taiwan province", "china taiwan"])
                .with_formatting_check(check(
                    r"[\u{4E00}-\u{9FFF}][,.!?]",
                    "Half-width punctuation after Han characters; use full-width punctuation.",
                )),
        ),
        (
            "ja-JP",
            LocaleProfile::default()
                .with_sensitive_terms(&["rising sun", "swastika"])
                .with_formatting_check(check(
                    r"\b(Mr|Mrs|Ms|Dr)\.",
                    "Western honorific; Japanese uses suffix honorifics (-san, -sama).",
                ))
                .with_formatting_check(check(TWELVE_HOUR, clock)),
        ),
        (
            "ko-KR",
            LocaleProfile::default()
                .with_sensitive_terms(&["sea of japan", "takeshima", "rising sun"])
                .with_formatting_check(check(
                    r"\b(Mr|Mrs|Ms|Dr)\.",
                    "Western honorific; Korean uses suffix honorifics (-nim, -ssi).",
                )),
        ),
        (
            "ar-SA",
            LocaleProfile::default()
                .with_max_expansion_ratio(1.25)
                .with_sensitive_terms(&["pork", "alcohol", "wine", "beer", "gambling", "casino"])
                .with_formatting_check(check(
                    r"[\u{0660}-\u{0669}]",
                    "Eastern Arabic digits present; confirm the numeral system expected by the UI.",
                ))
                .with_formatting_check(check(
                    r"[←→]",
                    "Directional arrow glyph; arrows must be mirrored in RTL layouts.",
                )),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(risks: &[RiskWarning]) -> Vec<RiskKind> {
        risks.iter().map(|r| r.kind).collect()
    }

    fn expansion_scanner(ratio: f64) -> RiskScanner {
        RiskScanner::empty()
            .with_profile("xx-XX", LocaleProfile::default().with_max_expansion_ratio(ratio))
    }

    #[test]
    fn test_empty_strings_yield_nothing() {
        assert!(scan("", "مرحبا", "ar-SA").is_empty());
        assert!(scan("Hello", "", "ar-SA").is_empty());
    }

    #[test]
    fn test_expansion_boundary() {
        let scanner = expansion_scanner(1.3);
        let risks = scanner.scan("abcdef", "abcdefgh", "xx-XX");
        assert_eq!(kinds(&risks), vec![RiskKind::UiExpansion]);
        assert!(risks[0].message.contains("33% longer"));
        assert!(risks[0].message.contains("3% over"));

        assert!(scanner.scan("abcdef", "abcdefg", "xx-XX").is_empty());
    }

    #[test]
    fn test_expansion_ignores_short_sources() {
        let scanner = expansion_scanner(1.3);
        assert!(scanner.scan("abcde", "abcdefghijklmnop", "xx-XX").is_empty());
    }

    #[test]
    fn test_expansion_counts_characters_not_bytes() {
        let scanner = expansion_scanner(1.3);
        assert!(scanner.scan("abcdef", "äöüßéè", "xx-XX").is_empty());
    }

    #[test]
    fn test_sensitive_terms_case_insensitive_union() {
        let scanner = RiskScanner::empty().with_profile(
            "xx-XX",
            LocaleProfile::default().with_sensitive_terms(&["beer", "casino"]),
        );
        let risks = scanner.scan("Visit the CASINO", "Trink ein Beer", "xx-XX");
        assert_eq!(kinds(&risks), vec![RiskKind::Cultural]);
        assert!(risks[0].message.contains("beer, casino"));

        // only in the translation
        let risks = scanner.scan("Visit", "Casino", "xx-XX");
        assert!(risks[0].message.contains("casino"));
        assert!(!risks[0].message.contains("beer"));
    }

    #[test]
    fn test_sensitive_term_across_boundary_of_concatenation() {
        let scanner = RiskScanner::empty()
            .with_profile("xx-XX", LocaleProfile::default().with_sensitive_terms(&["be"]));
        assert_eq!(scanner.scan("ab", "ec", "xx-XX").len(), 1);
    }

    #[test]
    fn test_formatting_checks_each_emit_once() {
        let scanner = RiskScanner::empty().with_profile(
            "xx-XX",
            LocaleProfile::default()
                .with_formatting_check(FormattingCheck::new(r"\d", "digits").unwrap())
                .with_formatting_check(FormattingCheck::new(r"!", "bang").unwrap()),
        );
        let risks = scanner.scan("Level 3", "Stufe 3!", "xx-XX");
        assert_eq!(
            risks.iter().map(|r| r.message.as_str()).collect::<Vec<_>>(),
            vec!["[FORMATTING_ERROR] digits", "[FORMATTING_ERROR] bang"]
        );
    }

    #[test]
    fn test_concatenation_smell_for_any_locale() {
        let risks = scan("\"Hello \" + name", "Hallo", "xx-XX");
        assert_eq!(kinds(&risks), vec![RiskKind::Formatting]);
        assert!(risks[0].message.contains("ICU"));

        assert_eq!(scan("count + ' items'", "x", "en-US").len(), 1);
        assert!(scan("one + two", "x", "en-US").is_empty());
    }

    #[test]
    fn test_rtl_alert_for_arabic_prefix() {
        let risks = RiskScanner::empty().scan("Hello", "مرحبا", "ar-EG");
        assert_eq!(kinds(&risks), vec![RiskKind::Rtl]);
    }

    #[test]
    fn test_cjk_alert_for_cjk_prefixes() {
        let scanner = RiskScanner::empty();
        for code in ["zh-CN", "zh-TW", "ja-JP", "ko-KR", "ja"] {
            assert_eq!(kinds(&scanner.scan("Hi", "x", code)), vec![RiskKind::CjkFont], "{code}");
        }
        assert!(scanner.scan("Hi", "x", "de-DE").is_empty());
    }

    #[test]
    fn test_check_order_is_fixed() {
        let scanner = RiskScanner::empty().with_profile(
            "ar-XX",
            LocaleProfile::default()
                .with_max_expansion_ratio(1.0)
                .with_sensitive_terms(&["wine"])
                .with_formatting_check(FormattingCheck::new("wine", "fmt").unwrap()),
        );
        let risks = scanner.scan("\"wine \" + glass", "\"wine \" + glass and more", "ar-XX");
        assert_eq!(
            kinds(&risks),
            vec![
                RiskKind::UiExpansion,
                RiskKind::Cultural,
                RiskKind::Formatting,
                RiskKind::Formatting,
                RiskKind::Rtl
            ]
        );
    }

    #[test]
    fn test_unprofiled_locale_only_gets_unconditional_checks() {
        let risks = scan("Short", "A much much longer translation", "en-US");
        assert!(risks.is_empty());
    }

    #[test]
    fn test_builtin_profiles_cover_catalog_except_source_language() {
        let scanner = RiskScanner::default();
        for option in crate::languages::TARGET_LANGUAGES {
            if option.code == "en-US" {
                assert!(scanner.profile(option.code).is_none());
            } else {
                assert!(scanner.profile(option.code).is_some(), "{}", option.code);
            }
        }
    }

    #[test]
    fn test_builtin_german_expansion() {
        let risks = scan("Settings", "Einstellungen", "de-DE");
        assert_eq!(kinds(&risks), vec![RiskKind::UiExpansion]);
    }

    #[test]
    fn test_builtin_arabic_cultural_and_rtl() {
        let risks = scan("Buy wine", "اشتر", "ar-SA");
        assert_eq!(kinds(&risks), vec![RiskKind::Cultural, RiskKind::Rtl]);
    }

    #[test]
    fn test_profile_lookup_is_case_insensitive() {
        assert!(RiskScanner::default().profile("DE-de").is_some());
    }
}
