use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::Language;

const EN_TABLE: &str = include_str!("../locales/en.json");
const FR_TABLE: &str = include_str!("../locales/fr.json");

/// Locale-keyed string lookup over the embedded translation tables, loaded
/// once at construction.
pub struct Translator {
    language: Language,
    en: Value,
    fr: Value,
}

impl Translator {
    pub fn new(language: Language) -> Result<Self> {
        let en = serde_json::from_str(EN_TABLE)
            .map_err(|e| Error::Config(format!("invalid en locale table: {e}")))?;
        let fr = serde_json::from_str(FR_TABLE)
            .map_err(|e| Error::Config(format!("invalid fr locale table: {e}")))?;
        Ok(Translator { language, en, fr })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Look up a dot-separated key and substitute `{placeholder}` markers.
    /// Missing keys fall back to the key itself with a warning, never an error.
    pub fn translate(&self, key: &str, replacements: &[(&str, &str)]) -> String {
        let table = match self.language {
            Language::En => &self.en,
            Language::Fr => &self.fr,
        };

        let mut node = table;
        for part in key.split('.') {
            match node.get(part) {
                Some(child) => node = child,
                None => {
                    log::warn!(
                        "translation key {key:?} not found for language {:?}",
                        self.language.code()
                    );
                    return key.to_string();
                }
            }
        }

        let Some(template) = node.as_str() else {
            log::warn!("translation key {key:?} is not a string leaf");
            return key.to_string();
        };

        let mut out = template.to_string();
        for (name, value) in replacements {
            out = out.replace(&format!("{{{name}}}"), value);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_in_both_languages() {
        let mut tr = Translator::new(Language::En).unwrap();
        assert_eq!(tr.translate("csv.report.sector", &[]), "Sector");
        tr.set_language(Language::Fr);
        assert_eq!(tr.translate("csv.report.sector", &[]), "Secteur");
    }

    #[test]
    fn test_missing_key_returns_key() {
        let tr = Translator::new(Language::En).unwrap();
        assert_eq!(tr.translate("no.such.key", &[]), "no.such.key");
    }

    #[test]
    fn test_placeholder_substitution() {
        let tr = Translator::new(Language::En).unwrap();
        let name = tr.translate("csv.detailed.filename", &[("sectorName", "Technology")]);
        assert_eq!(name, "sector-analysis-Technology.csv");
    }
}
