//! Localization tokens and display-name resolution.
//!
//! Each language is assembled from up to three token files which are merged in
//! a fixed order, later files overriding earlier ones. English is the fallback
//! for every other language and must be present.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use tracing::debug;

use crate::data::DataFileLoader;
use crate::error::{ErrorKind, IResult};
use crate::game_types::Language;

use super::classify::hero_short_name;
use super::keys;

/// Token sources in merge order.
pub const TOKEN_SOURCES: &[&str] = &["citadel_gc", "citadel_heroes", "citadel_main"];

pub type LocalizationTable = HashMap<String, String>;

#[derive(Deserialize)]
struct TokenFile {
    lang: TokenFileLang,
}

#[derive(Deserialize)]
struct TokenFileLang {
    #[serde(rename = "Tokens")]
    tokens: HashMap<String, String>,
}

pub fn localization_path(source: &str, language: Language) -> String {
    format!("{}/{source}_{language}.json", keys::LOCALIZATION_DIR)
}

/// The token key that holds a hero's display name: `hero_astro` for class name `hero_astro`.
pub fn hero_token_key(class_name: &str) -> String {
    format!("{}{}", keys::HERO_PREFIX, hero_short_name(class_name))
}

/// Items are localized under their class name.
pub fn item_token_key(class_name: &str) -> &str {
    class_name
}

/// One way of producing a display name. Every strategy is total over its
/// inputs but may miss; the resolver walks them in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStrategy {
    /// The token in the requested language.
    Requested,
    /// The token in English.
    English,
    /// The class name itself.
    ClassName,
}

pub const NAME_STRATEGIES: &[NameStrategy] = &[
    NameStrategy::Requested,
    NameStrategy::English,
    NameStrategy::ClassName,
];

/// Merged token tables for every language that had at least one file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Localization {
    tables: BTreeMap<Language, LocalizationTable>,
}

/// Copies `tokens` over `table`. Merging the same tokens again changes nothing.
pub fn merge_into(
    table: &mut LocalizationTable,
    tokens: impl IntoIterator<Item = (String, String)>,
) {
    table.extend(tokens);
}

fn load_language(
    loader: &dyn DataFileLoader,
    language: Language,
) -> IResult<Option<LocalizationTable>> {
    let mut table: Option<LocalizationTable> = None;
    for source in TOKEN_SOURCES {
        let path = localization_path(source, language);
        let data = match loader.get(&path) {
            Ok(data) => data,
            Err(ErrorKind::DatafileNotFound { .. }) => {
                debug!("no localization file at {path}");
                continue;
            }
            Err(err) => return Err(err),
        };
        let file: TokenFile = serde_json::from_slice(&data)?;
        merge_into(table.get_or_insert_with(Default::default), file.lang.tokens);
    }
    Ok(table)
}

impl Localization {
    /// Loads every known language. Fails if no English token file was found.
    pub fn load(loader: &dyn DataFileLoader) -> IResult<Localization> {
        let mut tables = BTreeMap::new();
        for language in Language::ALL {
            if let Some(table) = load_language(loader, *language)? {
                debug!("loaded {} tokens for {language}", table.len());
                tables.insert(*language, table);
            }
        }
        Localization::from_tables(tables)
    }

    pub fn from_tables(tables: BTreeMap<Language, LocalizationTable>) -> IResult<Localization> {
        if !tables.contains_key(&Language::English) {
            return Err(ErrorKind::MissingBaseLocalization);
        }
        Ok(Localization { tables })
    }

    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.tables.keys().copied()
    }

    pub fn table(&self, language: Language) -> Option<&LocalizationTable> {
        self.tables.get(&language)
    }

    /// A non-blank token, if the language has one.
    pub fn token(&self, language: Language, key: &str) -> Option<&str> {
        self.tables
            .get(&language)?
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    fn apply<'a>(
        &'a self,
        strategy: NameStrategy,
        token_key: &str,
        class_name: &'a str,
        language: Language,
    ) -> Option<&'a str> {
        match strategy {
            NameStrategy::Requested => self.token(language, token_key),
            NameStrategy::English => self.token(Language::English, token_key),
            NameStrategy::ClassName => Some(class_name),
        }
    }

    /// Resolves a display name, falling back to English and then to the class name.
    pub fn resolve_name(&self, token_key: &str, class_name: &str, language: Language) -> String {
        NAME_STRATEGIES
            .iter()
            .find_map(|strategy| self.apply(*strategy, token_key, class_name, language))
            .unwrap_or(class_name)
            .to_string()
    }

    pub fn hero_name(&self, class_name: &str, language: Language) -> String {
        self.resolve_name(&hero_token_key(class_name), class_name, language)
    }

    pub fn item_name(&self, class_name: &str, language: Language) -> String {
        self.resolve_name(item_token_key(class_name), class_name, language)
    }
}

#[cfg(test)]
mod test {
    use std::borrow::Cow;

    use serde_json::json;

    use super::*;
    use crate::data::DataFileWithCallback;

    fn token_file(tokens: serde_json::Value) -> Result<Cow<'static, [u8]>, ErrorKind> {
        Ok(Cow::Owned(
            serde_json::to_vec(&json!({"lang": {"Language": "x", "Tokens": tokens}})).unwrap(),
        ))
    }

    fn table(pairs: &[(&str, &str)]) -> LocalizationTable {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn later_sources_override_earlier_ones() {
        let loader = DataFileWithCallback::new(|path: &str| match path {
            "localization/citadel_gc_english.json" => {
                token_file(json!({"hero_astro": "Old", "upgrade_a": "A"}))
            }
            "localization/citadel_main_english.json" => token_file(json!({"hero_astro": "Astro"})),
            "localization/citadel_heroes_german.json" => token_file(json!({"upgrade_a": "Ä"})),
            other => Err(ErrorKind::DatafileNotFound { path: other.to_string() }),
        });

        let localization = Localization::load(&loader).unwrap();
        assert_eq!(localization.token(Language::English, "hero_astro"), Some("Astro"));
        assert_eq!(localization.token(Language::English, "upgrade_a"), Some("A"));
        assert_eq!(localization.token(Language::German, "upgrade_a"), Some("Ä"));
        assert_eq!(
            localization.languages().collect::<Vec<_>>(),
            vec![Language::English, Language::German]
        );
    }

    #[test]
    fn missing_english_is_fatal() {
        let loader = DataFileWithCallback::new(|path: &str| match path {
            "localization/citadel_gc_french.json" => token_file(json!({})),
            other => Err(ErrorKind::DatafileNotFound { path: other.to_string() }),
        });
        assert!(matches!(
            Localization::load(&loader),
            Err(ErrorKind::MissingBaseLocalization)
        ));
    }

    #[test]
    fn merging_twice_is_idempotent() {
        let mut once = LocalizationTable::new();
        merge_into(&mut once, table(&[("a", "1"), ("b", "2")]));
        let mut twice = once.clone();
        merge_into(&mut twice, table(&[("a", "1"), ("b", "2")]));
        assert_eq!(once, twice);
    }

    #[test]
    fn names_fall_back_to_english_then_class_name() {
        let localization = Localization::from_tables(BTreeMap::from([
            (Language::English, table(&[("hero_astro", "Astro"), ("upgrade_blank", "  ")])),
            (Language::German, table(&[("hero_astro", ""), ("upgrade_a", "Ä")])),
        ]))
        .unwrap();

        assert_eq!(localization.hero_name("hero_astro", Language::German), "Astro");
        assert_eq!(localization.hero_name("hero_astro", Language::Japanese), "Astro");
        assert_eq!(localization.item_name("upgrade_a", Language::German), "Ä");
        assert_eq!(localization.item_name("upgrade_a", Language::English), "upgrade_a");
        assert_eq!(localization.item_name("upgrade_blank", Language::English), "upgrade_blank");
    }

    #[test]
    fn hero_token_keys_use_the_short_name() {
        assert_eq!(hero_token_key("hero_astro"), "hero_astro");
        assert_eq!(hero_token_key("astro"), "hero_astro");
        assert_eq!(item_token_key("upgrade_a"), "upgrade_a");
    }
}
