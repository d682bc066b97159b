use std::collections::HashMap;
use std::sync::Arc;

/// Source of message templates per locale.
pub trait MessageSource: Send + Sync {
    fn template(&self, locale: &str, key: &str) -> Option<&str>;
}

const ENGLISH: &[(&str, &str)] = &[
    ("recipe.create.success", "Recipe created successfully"),
    ("recipe.get.success", "Recipe retrieved successfully"),
    ("recipe.update.success", "Recipe updated successfully"),
    ("recipe.delete.success", "Recipe deleted successfully"),
    ("recipe.search.success", "Recipes found"),
    ("recipe.search.empty", "No recipes found"),
    ("error.validation.failed", "Validation failed"),
    (
        "error.invalid.parameter",
        "Invalid value for parameter '{0}', expected {1}",
    ),
    ("error.invalid.query", "Invalid query parameters"),
    ("error.request.malformed", "Malformed request body"),
    ("error.recipe.not.found", "Recipe not found with UUID: {0}"),
    ("error.method.unsupported", "Unsupported method: {0}"),
    ("error.internal", "An internal server error occurred"),
];

/// In-process catalogs keyed by locale.
#[derive(Debug, Clone, Default)]
pub struct BundledMessages {
    catalogs: HashMap<String, HashMap<String, String>>,
}

impl BundledMessages {
    pub fn english() -> Self {
        Self::default().with_catalog("en", ENGLISH.iter().copied())
    }

    pub fn with_catalog<K, V>(
        mut self,
        locale: &str,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let catalog = self.catalogs.entry(locale.to_ascii_lowercase()).or_default();
        catalog.extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }
}

impl MessageSource for BundledMessages {
    fn template(&self, locale: &str, key: &str) -> Option<&str> {
        self.catalogs
            .get(locale)
            .and_then(|c| c.get(key))
            .map(String::as_str)
    }
}

/// Resolves message keys to user-facing text.
///
/// Lookup order: requested locale, default locale, then the key itself.
#[derive(Clone)]
pub struct Translator {
    source: Arc<dyn MessageSource>,
    default_locale: String,
}

impl Translator {
    pub fn new(source: Arc<dyn MessageSource>, default_locale: impl Into<String>) -> Self {
        Self {
            source,
            default_locale: default_locale.into().to_ascii_lowercase(),
        }
    }

    pub fn english() -> Self {
        Self::new(Arc::new(BundledMessages::english()), "en")
    }

    pub fn process(&self, locale: Option<&str>, key: &str, args: &[String]) -> String {
        let template = locale
            .and_then(|l| self.source.template(l, key))
            .or_else(|| self.source.template(&self.default_locale, key))
            .filter(|t| !t.trim().is_empty());
        match template {
            Some(t) => format_template(t, args),
            None => key.to_string(),
        }
    }
}

/// Replaces `{n}` placeholders in one pass; argument text is never rescanned.
fn format_template(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let placeholder = tail[1..].find('}').and_then(|end| {
            let arg = tail[1..=end].parse::<usize>().ok().and_then(|idx| args.get(idx))?;
            Some((arg, end + 2))
        });
        match placeholder {
            Some((arg, len)) => {
                out.push_str(arg);
                rest = &tail[len..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
