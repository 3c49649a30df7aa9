//! Supported target languages and resolution of a language selection.

use icu_locale::Locale;
use serde::Serialize;

use crate::error::SelectionError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageOption {
    pub label: String,
    pub code: String,
}

impl LanguageOption {
    pub fn new(label: &str, code: &str) -> Self {
        LanguageOption {
            label: label.to_string(),
            code: code.to_string(),
        }
    }
}

/// Static catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogLanguage {
    pub label: &'static str,
    pub code: &'static str,
}

impl From<&CatalogLanguage> for LanguageOption {
    fn from(language: &CatalogLanguage) -> Self {
        LanguageOption::new(language.label, language.code)
    }
}

pub const TARGET_LANGUAGES: &[CatalogLanguage] = &[
    CatalogLanguage { label: "English (US)", code: "en-US" },
    CatalogLanguage { label: "English (UK)", code: "en-GB" },
    CatalogLanguage { label: "Deutsch", code: "de-DE" },
    CatalogLanguage { label: "Français", code: "fr-FR" },
    CatalogLanguage { label: "Español (España)", code: "es-ES" },
    CatalogLanguage { label: "Español (LatAm)", code: "es-419" },
    CatalogLanguage { label: "Português (Brasil)", code: "pt-BR" },
    CatalogLanguage { label: "Português (Portugal)", code: "pt-PT" },
    CatalogLanguage { label: "Русский", code: "ru-RU" },
    CatalogLanguage { label: "Polski", code: "pl-PL" },
    CatalogLanguage { label: "Türkçe", code: "tr-TR" },
    CatalogLanguage { label: "Italiano", code: "it-IT" },
    CatalogLanguage { label: "Tiếng Việt", code: "vi-VN" },
    CatalogLanguage { label: "中文 (简体)", code: "zh-CN" },
    CatalogLanguage { label: "中文 (繁体)", code: "zh-TW" },
    CatalogLanguage { label: "日本語", code: "ja-JP" },
    CatalogLanguage { label: "한국어", code: "ko-KR" },
    CatalogLanguage { label: "العربية", code: "ar-SA" },
];

/// Look up a catalog language by code, ignoring case
pub fn find_language(code: &str) -> Option<&'static CatalogLanguage> {
    TARGET_LANGUAGES
        .iter()
        .find(|language| language.code.eq_ignore_ascii_case(code))
}

/// Which target languages a run should cover
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageSelection {
    Single(String),
    Custom(Vec<String>),
    All,
}

impl LanguageSelection {
    /// Build a selection from command-line style input: `all` wins, one code is
    /// `Single`, several are `Custom`.
    pub fn from_codes(codes: &[String], all: bool) -> Self {
        match (all, codes) {
            (true, _) => LanguageSelection::All,
            (false, [code]) => LanguageSelection::Single(code.clone()),
            _ => LanguageSelection::Custom(codes.to_vec()),
        }
    }

    /// Resolve to concrete languages in processing order.
    ///
    /// Codes outside the catalog are accepted when they are well-formed
    /// BCP-47 tags and keep their code as label.
    pub fn resolve(&self) -> Result<Vec<LanguageOption>, SelectionError> {
        let resolved = match self {
            LanguageSelection::All => TARGET_LANGUAGES.iter().map(LanguageOption::from).collect(),
            LanguageSelection::Single(code) => vec![resolve_code(code)?],
            LanguageSelection::Custom(codes) => {
                let mut languages: Vec<LanguageOption> = Vec::with_capacity(codes.len());
                for code in codes {
                    let language = resolve_code(code)?;
                    if !languages.iter().any(|l| l.code == language.code) {
                        languages.push(language);
                    }
                }
                languages
            }
        };

        if resolved.is_empty() {
            return Err(SelectionError::NoTargetLanguage);
        }
        Ok(resolved)
    }
}

fn resolve_code(code: &str) -> Result<LanguageOption, SelectionError> {
    let code = code.trim();
    if let Some(language) = find_language(code) {
        return Ok(language.into());
    }
    if code.is_empty() {
        return Err(SelectionError::NoTargetLanguage);
    }
    code.parse::<Locale>()
        .map(|locale| {
            let canonical = locale.to_string();
            LanguageOption::new(&canonical, &canonical)
        })
        .map_err(|_| SelectionError::InvalidLanguage(code.to_string()))
}
