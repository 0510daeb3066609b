//! Message resolution with language and package fallback.

use super::table::TranslationTable;

/// Package namespace tried when a reference's own package has no entry.
const PLUGINS_PREFIX: &str = "plugins.";

/// Injected page context.
///
/// Carries what a rendered page would otherwise provide implicitly (its
/// `lang` attribute, the active theme package) as plain configuration, so
/// resolution stays a pure function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    /// Language of the page being rendered.
    pub language: String,

    /// Package assumed when a reference carries no `package@` part
    /// (typically the active theme package).
    pub default_package: String,
}

impl Default for PageContext {
    fn default() -> Self {
        Self { language: "en".to_string(), default_package: "app".to_string() }
    }
}

/// A message reference split into owning package and message id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MessageRef<'a> {
    /// Owning package name.
    package: &'a str,
    /// Message id within the package.
    id: &'a str,
}

/// Split `message_ref` on `@`.
///
/// Only a reference with exactly one separator names its package; anything
/// else is a bare message id under the default package.
fn split_ref<'a>(message_ref: &'a str, default_package: &'a str) -> MessageRef<'a> {
    let parts: Vec<&str> = message_ref.split('@').collect();
    match *parts.as_slice() {
        [package, id] => MessageRef { package, id },
        _ => MessageRef { package: default_package, id: message_ref },
    }
}

/// Ordered lookup candidates for a reference.
///
/// The package itself, its `plugins.`-qualified form, then both again under
/// the fallback language. Each pair appears at most once, so the chain is
/// finite and its order auditable.
fn candidates(package: &str, language: &str, fallback: &str) -> Vec<(String, String)> {
    let widened = (!package.starts_with(PLUGINS_PREFIX))
        .then(|| format!("{PLUGINS_PREFIX}{package}"));

    let mut list = vec![(package.to_string(), language.to_string())];
    if let Some(widened) = &widened {
        list.push((widened.clone(), language.to_string()));
    }
    if language != fallback {
        list.push((package.to_string(), fallback.to_string()));
        if let Some(widened) = widened {
            list.push((widened, fallback.to_string()));
        }
    }
    list
}

/// Fill `:name` placeholders with argument values.
///
/// Each key replaces only the first occurrence of its placeholder. Callers
/// rely on the single replacement; it is not a bug to fix.
fn render(template: &str, args: &[(&str, &str)]) -> String {
    let mut rendered = template.to_string();
    for (name, value) in args {
        rendered = rendered.replacen(&format!(":{name}"), value, 1);
    }
    rendered
}

/// Resolves message references against an immutable [`TranslationTable`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translator {
    /// Catalog snapshot owned by this translator.
    table: TranslationTable,
    /// Context defaults for language and package.
    context: PageContext,
}

impl Translator {
    /// Create a translator over a loaded catalog.
    #[must_use]
    pub fn new(table: TranslationTable, context: PageContext) -> Self {
        Self { table, context }
    }

    /// The catalog this translator resolves against.
    #[must_use]
    pub fn table(&self) -> &TranslationTable {
        &self.table
    }

    /// Resolve `message_ref` to a rendered string.
    ///
    /// `language` overrides the context language; an unsupported language
    /// falls back to the first configured one before any lookup. A reference
    /// that cannot be resolved in any candidate namespace comes back as a
    /// visible `package@id` marker — this function always returns a string
    /// and never fails.
    ///
    /// # Arguments
    /// * `message_ref` - `"id"` or `"package@id"`
    /// * `args` - `(name, value)` pairs filling `:name` placeholders, in order
    /// * `language` - requested language, or `None` for the context language
    #[must_use]
    pub fn translate(
        &self,
        message_ref: &str,
        args: &[(&str, &str)],
        language: Option<&str>,
    ) -> String {
        // 言語リストが空なら翻訳は不可能
        let Some(fallback) = self.table.fallback_language() else {
            return message_ref.to_string();
        };

        let requested = language.unwrap_or(&self.context.language);
        let language = if self.table.is_supported(requested) { requested } else { fallback };

        let reference = split_ref(message_ref, &self.context.default_package);
        let chain = candidates(reference.package, language, fallback);
        for (package, lang) in &chain {
            if let Some(template) = self.table.template(lang, package, reference.id) {
                return render(template, args);
            }
        }

        // All candidates missed: return the reference as a visible marker,
        // qualified the same way the last lookup was.
        let package = chain.last().map_or(reference.package, |(package, _)| package.as_str());
        tracing::warn!(package, id = reference.id, language, "Translation not found");
        format!("{package}@{}", reference.id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    /// テスト用のカタログ: en がフォールバック言語
    fn sample_table() -> TranslationTable {
        serde_json::from_str(
            r#"{
                "langs": ["en", "ru"],
                "translations": {
                    "en": {
                        "app": {
                            "greeting": "Hello :name",
                            "farewell": "Goodbye",
                            "twice": ":name and :name"
                        },
                        "plugins.widget": { "title": "Widget" }
                    },
                    "ru": {
                        "app": { "greeting": "Привет :name" }
                    }
                }
            }"#,
        )
        .unwrap()
    }

    fn translator() -> Translator {
        Translator::new(sample_table(), PageContext::default())
    }

    #[googletest::test]
    fn resolves_stored_template_verbatim() {
        let translator = translator();

        expect_that!(translator.translate("app@farewell", &[], Some("en")), eq("Goodbye"));
    }

    #[googletest::test]
    fn substitutes_placeholder() {
        let translator = translator();

        let rendered = translator.translate("app@greeting", &[("name", "Bob")], Some("en"));

        expect_that!(rendered, eq("Hello Bob"));
    }

    #[googletest::test]
    fn substitutes_first_occurrence_only() {
        let translator = translator();

        let rendered = translator.translate("app@twice", &[("name", "Bob")], Some("en"));

        expect_that!(rendered, eq("Bob and :name"));
    }

    #[googletest::test]
    fn missing_args_leave_placeholders() {
        let translator = translator();

        expect_that!(translator.translate("app@greeting", &[], Some("en")), eq("Hello :name"));
    }

    #[googletest::test]
    fn falls_back_to_first_language_for_missing_translation() {
        let translator = translator();

        // farewell is only present under "en"
        let rendered = translator.translate("app@farewell", &[], Some("ru"));

        expect_that!(rendered, eq("Goodbye"));
    }

    #[googletest::test]
    fn unsupported_language_uses_fallback_before_lookup() {
        let translator = translator();

        let rendered = translator.translate("app@greeting", &[("name", "Bob")], Some("de"));

        expect_that!(rendered, eq("Hello Bob"));
    }

    #[googletest::test]
    fn supported_language_wins_over_fallback() {
        let translator = translator();

        let rendered = translator.translate("app@greeting", &[("name", "Боб")], Some("ru"));

        expect_that!(rendered, eq("Привет Боб"));
    }

    #[googletest::test]
    fn widens_package_to_plugins_namespace() {
        let translator = translator();

        // "widget" has no direct entry; "plugins.widget" does.
        expect_that!(translator.translate("widget@title", &[], Some("en")), eq("Widget"));
    }

    #[googletest::test]
    fn unresolvable_reference_returns_widened_marker() {
        let translator = translator();

        let rendered = translator.translate("nowhere@nothing", &[], Some("en"));

        expect_that!(rendered, eq("plugins.nowhere@nothing"));
    }

    #[googletest::test]
    fn unresolvable_plugins_reference_is_not_widened_twice() {
        let translator = translator();

        let rendered = translator.translate("plugins.nowhere@nothing", &[], Some("en"));

        expect_that!(rendered, eq("plugins.nowhere@nothing"));
    }

    #[googletest::test]
    fn empty_language_list_returns_reference_unchanged() {
        let translator = Translator::new(TranslationTable::default(), PageContext::default());

        expect_that!(translator.translate("app@greeting", &[], Some("en")), eq("app@greeting"));
        expect_that!(translator.translate("greeting", &[], None), eq("greeting"));
    }

    #[googletest::test]
    fn default_package_comes_from_context() {
        let translator = translator();

        expect_that!(translator.translate("farewell", &[], Some("en")), eq("Goodbye"));
    }

    #[googletest::test]
    fn context_language_used_when_none_given() {
        let context = PageContext { language: "ru".to_string(), ..PageContext::default() };
        let translator = Translator::new(sample_table(), context);

        let rendered = translator.translate("app@greeting", &[("name", "Боб")], None);

        expect_that!(rendered, eq("Привет Боб"));
    }

    #[googletest::test]
    fn reference_with_multiple_separators_is_a_bare_id() {
        let translator = translator();

        // Not a valid package@id split, so it resolves (and fails) under the
        // default package.
        let rendered = translator.translate("a@b@c", &[], Some("en"));

        expect_that!(rendered, eq("plugins.app@a@b@c"));
    }

    #[googletest::test]
    fn translate_is_idempotent() {
        let translator = translator();

        let first = translator.translate("app@greeting", &[("name", "Bob")], Some("ru"));
        let second = translator.translate("app@greeting", &[("name", "Bob")], Some("ru"));

        expect_that!(first, eq(&second));
    }

    #[rstest]
    #[case("app", "en", "en", vec![("app", "en"), ("plugins.app", "en")])]
    #[case("app", "ru", "en", vec![
        ("app", "ru"),
        ("plugins.app", "ru"),
        ("app", "en"),
        ("plugins.app", "en"),
    ])]
    #[case("plugins.app", "ru", "en", vec![("plugins.app", "ru"), ("plugins.app", "en")])]
    fn candidate_chain_order(
        #[case] package: &str,
        #[case] language: &str,
        #[case] fallback: &str,
        #[case] expected: Vec<(&str, &str)>,
    ) {
        let chain = candidates(package, language, fallback);

        let expected: Vec<(String, String)> = expected
            .into_iter()
            .map(|(package, lang)| (package.to_string(), lang.to_string()))
            .collect();
        assert_that!(chain, eq(&expected));
    }

    #[rstest]
    #[case("pkg@id", "pkg", "id")]
    #[case("id.only", "app", "id.only")]
    #[case("a@b@c", "app", "a@b@c")]
    #[case("", "app", "")]
    fn split_ref_cases(#[case] reference: &str, #[case] package: &str, #[case] id: &str) {
        let result = split_ref(reference, "app");

        assert_that!(result.package, eq(package));
        assert_that!(result.id, eq(id));
    }

    #[googletest::test]
    fn render_args_apply_in_order() {
        expect_that!(render(":a :ab", &[("a", "1"), ("ab", "2")]), eq("1 2"));

        // ":a" happily consumes the prefix of ":ab"; argument order is the
        // caller's contract.
        expect_that!(render(":ab", &[("a", "1")]), eq("1b"));
    }
}
