// SPDX-License-Identifier: MPL-2.0
use crate::config::Config;
use fluent_bundle::{FluentArgs, FluentBundle, FluentResource};
use rust_embed::RustEmbed;
use std::collections::HashMap;
use unic_langid::LanguageIdentifier;

#[derive(RustEmbed)]
#[folder = "assets/i18n/"]
struct Asset;

const DEFAULT_LOCALE: &str = "en-US";

pub struct I18n {
    bundles: HashMap<LanguageIdentifier, FluentBundle<FluentResource>>,
    pub available_locales: Vec<LanguageIdentifier>,
    current_locale: LanguageIdentifier,
}

impl std::fmt::Debug for I18n {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("I18n")
            .field("available_locales", &self.available_locales)
            .field("current_locale", &self.current_locale)
            .finish_non_exhaustive()
    }
}

impl Default for I18n {
    fn default() -> Self {
        Self::new(None, &Config::default())
    }
}

impl I18n {
    /// Loads every embedded `.ftl` file and picks the active locale.
    ///
    /// Locale priority: explicit request, then `[general] language`, then the
    /// OS locale, then `en-US`.
    pub fn new(requested: Option<String>, config: &Config) -> Self {
        let mut bundles = HashMap::new();
        let mut available_locales = Vec::new();

        for file in Asset::iter() {
            let filename = file.as_ref();
            let Some(locale_str) = filename.strip_suffix(".ftl") else {
                continue;
            };
            let Ok(locale) = locale_str.parse::<LanguageIdentifier>() else {
                continue;
            };
            let Some(content) = Asset::get(filename) else {
                continue;
            };
            let source = String::from_utf8_lossy(content.data.as_ref()).to_string();
            let res = match FluentResource::try_new(source) {
                Ok(res) => res,
                Err((res, errors)) => {
                    log::warn!("{} has {} syntax errors", filename, errors.len());
                    res
                }
            };
            let mut bundle = FluentBundle::new(vec![locale.clone()]);
            // Isolation marks end up as visible glyphs in rasterized text.
            bundle.set_use_isolating(false);
            if bundle.add_resource(res).is_err() {
                log::warn!("{} redefines existing messages", filename);
            }
            bundles.insert(locale.clone(), bundle);
            available_locales.push(locale);
        }
        available_locales.sort_by_key(ToString::to_string);

        let default_locale: LanguageIdentifier = DEFAULT_LOCALE.parse().unwrap_or_default();
        let current_locale =
            resolve_locale(requested, config, &available_locales).unwrap_or(default_locale);

        Self {
            bundles,
            available_locales,
            current_locale,
        }
    }

    pub fn set_locale(&mut self, locale: LanguageIdentifier) {
        if self.bundles.contains_key(&locale) {
            self.current_locale = locale;
        }
    }

    #[must_use]
    pub fn current_locale(&self) -> &LanguageIdentifier {
        &self.current_locale
    }

    pub fn tr(&self, key: &str) -> String {
        self.format(key, None)
    }

    /// Translates `key`, substituting `{ $name }` placeables from `args`.
    pub fn tr_with_args(&self, key: &str, args: &[(String, String)]) -> String {
        let mut fluent_args = FluentArgs::new();
        for (name, value) in args {
            fluent_args.set(name.clone(), value.clone());
        }
        self.format(key, Some(&fluent_args))
    }

    fn format(&self, key: &str, args: Option<&FluentArgs>) -> String {
        if let Some(bundle) = self.bundles.get(&self.current_locale) {
            if let Some(msg) = bundle.get_message(key) {
                if let Some(pattern) = msg.value() {
                    let mut errors = vec![];
                    let value = bundle.format_pattern(pattern, args, &mut errors);
                    if errors.is_empty() {
                        return value.to_string();
                    }
                }
            }
        }
        format!("MISSING: {}", key)
    }
}

fn resolve_locale(
    requested: Option<String>,
    config: &Config,
    available: &[LanguageIdentifier],
) -> Option<LanguageIdentifier> {
    let pick = |raw: &str| {
        raw.parse::<LanguageIdentifier>()
            .ok()
            .filter(|lang| available.contains(lang))
    };

    if let Some(lang) = requested.as_deref().and_then(pick) {
        return Some(lang);
    }

    if let Some(lang) = config.general.language.as_deref().and_then(pick) {
        return Some(lang);
    }

    sys_locale::get_locale().as_deref().and_then(pick)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locales() -> Vec<LanguageIdentifier> {
        vec!["en-US".parse().unwrap(), "zh-CN".parse().unwrap()]
    }

    #[test]
    fn requested_locale_wins() {
        let config = Config::default();
        let lang = resolve_locale(Some("zh-CN".to_string()), &config, &locales());
        assert_eq!(lang, Some("zh-CN".parse().unwrap()));
    }

    #[test]
    fn config_locale_used_when_nothing_requested() {
        let mut config = Config::default();
        config.general.language = Some("zh-CN".to_string());
        let lang = resolve_locale(None, &config, &locales());
        assert_eq!(lang, Some("zh-CN".parse().unwrap()));
    }

    #[test]
    fn unavailable_locale_is_skipped() {
        let mut config = Config::default();
        config.general.language = Some("en-US".to_string());
        let lang = resolve_locale(Some("fr".to_string()), &config, &locales());
        assert_eq!(lang, Some("en-US".parse().unwrap()));
    }

    #[test]
    fn embedded_locales_are_loaded() {
        let i18n = I18n::new(Some("en-US".to_string()), &Config::default());
        assert!(i18n.available_locales.contains(&"zh-CN".parse().unwrap()));
        assert_eq!(i18n.tr("filter-invert"), "Invert");
    }

    #[test]
    fn chinese_filter_names_match_catalog() {
        let i18n = I18n::new(Some("zh-CN".to_string()), &Config::default());
        assert_eq!(i18n.tr("filter-none"), "原图");
        assert_eq!(i18n.tr("filter-warm"), "暖色调");
    }

    #[test]
    fn args_are_substituted() {
        let i18n = I18n::new(Some("en-US".to_string()), &Config::default());
        let text = i18n.tr_with_args(
            "notification-export-success",
            &[("path".to_string(), "/tmp/a.jpg".to_string())],
        );
        assert!(text.contains("/tmp/a.jpg"));
    }

    #[test]
    fn missing_key_is_marked() {
        let i18n = I18n::default();
        assert_eq!(i18n.tr("does-not-exist"), "MISSING: does-not-exist");
    }
}
