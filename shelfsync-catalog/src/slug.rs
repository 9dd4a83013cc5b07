//! Slug generation for categories and products.
//!
//! Display names are transliterated from Cyrillic to Latin, lowercased, and
//! reduced to `[a-z0-9]` runs joined by single hyphens. Collisions within one
//! entity type are resolved by appending `-2`, `-3`, … in processing order.

use std::collections::HashMap;

use thiserror::Error;

use crate::types::RowErrorKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlugError {
    #[error("cannot derive a slug from {0:?}")]
    InvalidSlugSource(String),
}

impl From<SlugError> for RowErrorKind {
    fn from(err: SlugError) -> Self {
        match err {
            SlugError::InvalidSlugSource(source) => RowErrorKind::InvalidSlugSource(source),
        }
    }
}

/// Latin replacement for a lowercase Cyrillic letter.
///
/// `ъ` and `ь` have no Latin counterpart and map to the empty string.
fn transliterate_char(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' | 'ё' => "e",
        'ж' => "zh",
        'з' => "z",
        'и' | 'й' => "i",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "c",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(latin)
}

/// Lowercase `s` and replace Cyrillic letters with their Latin spelling.
///
/// Characters outside the table are kept as-is.
///
/// ```
/// use shelfsync_catalog::slug::transliterate;
///
/// assert_eq!(transliterate("Щебень"), "scheben");
/// assert_eq!(transliterate("Профнастил C8"), "profnastil c8");
/// ```
pub fn transliterate(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars().flat_map(char::to_lowercase) {
        match transliterate_char(c) {
            Some(latin) => out.push_str(latin),
            None => out.push(c),
        }
    }
    out
}

/// Build a URL-safe slug from a display name.
///
/// Returns an empty string when nothing slug-worthy remains.
///
/// ```
/// use shelfsync_catalog::slug::slugify;
///
/// assert_eq!(slugify("Арматура 12мм A500C"), "armatura-12mm-a500c");
/// assert_eq!(slugify("  --Hello,   World!-- "), "hello-world");
/// assert_eq!(slugify("!!!"), "");
/// ```
pub fn slugify(s: &str) -> String {
    let latin = transliterate(s);
    let mut result = String::with_capacity(latin.len());
    let mut last_was_separator = false;

    for c in latin.chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_separator = false;
        } else if !last_was_separator && !result.is_empty() {
            result.push('-');
            last_was_separator = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

/// Like [`slugify`], but an empty result is an error.
pub fn base_slug(source: &str) -> Result<String, SlugError> {
    let slug = slugify(source);
    if slug.is_empty() {
        return Err(SlugError::InvalidSlugSource(source.to_string()));
    }
    Ok(slug)
}

/// Whether `s` has the shape `[a-z0-9]+(-[a-z0-9]+)*`.
pub fn is_valid_slug(s: &str) -> bool {
    !s.is_empty()
        && s.split('-').all(|part| {
            !part.is_empty()
                && part
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        })
}

/// Whether `candidate` is `base` or `base-N` for some N >= 2.
fn is_suffixed_form(candidate: &str, base: &str) -> bool {
    if candidate == base {
        return true;
    }
    candidate
        .strip_prefix(base)
        .and_then(|rest| rest.strip_prefix('-'))
        .and_then(|n| n.parse::<u32>().ok())
        .is_some_and(|n| n >= 2)
}

/// Slugs already taken within one entity type, mapped to the stable identity
/// (category name or SKU) that holds them.
///
/// Every persisted slug and every historical redirect source is reserved, so
/// an old URL never starts pointing at a different entity.
#[derive(Debug, Default, Clone)]
pub struct SlugRegistry {
    owners: HashMap<String, String>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `slug` for `owner`. An existing reservation is kept.
    pub fn reserve(&mut self, slug: impl Into<String>, owner: impl Into<String>) {
        self.owners.entry(slug.into()).or_insert_with(|| owner.into());
    }

    pub fn owner_of(&self, slug: &str) -> Option<&str> {
        self.owners.get(slug).map(String::as_str)
    }

    /// Whether `owner` may use `slug`: it is free or already theirs.
    pub fn is_available(&self, slug: &str, owner: &str) -> bool {
        self.owner_of(slug).is_none_or(|o| o == owner)
    }

    /// Pick the first available slug in `base`, `base-2`, `base-3`, … for
    /// `owner` and reserve it.
    ///
    /// If `previous` is already one of those forms and still belongs to the
    /// owner, it is kept so that a suffixed slug does not drift.
    pub fn assign(&mut self, base: &str, owner: &str, previous: Option<&str>) -> String {
        if let Some(prev) = previous.filter(|p| is_suffixed_form(p, base)) {
            if self.is_available(prev, owner) {
                self.owners.insert(prev.to_string(), owner.to_string());
                return prev.to_string();
            }
        }

        let mut candidate = base.to_string();
        let mut suffix = 2u32;
        while !self.is_available(&candidate, owner) {
            candidate = format!("{base}-{suffix}");
            suffix += 1;
        }
        self.owners.insert(candidate.clone(), owner.to_string());
        candidate
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// The outcome of slug resolution for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugAssignment {
    pub slug: String,
    /// True when the entity had a persisted slug and this one differs.
    pub changed: bool,
}

/// Resolve the final slug for one entity.
///
/// `source` is the display name or explicit slug override, `owner` the
/// entity's stable identity, and `previous` its persisted slug, if any.
pub fn resolve_slug(
    source: &str,
    owner: &str,
    previous: Option<&str>,
    registry: &mut SlugRegistry,
) -> Result<SlugAssignment, SlugError> {
    let base = base_slug(source)?;
    let slug = registry.assign(&base, owner, previous);
    let changed = previous.is_some_and(|p| p != slug);
    Ok(SlugAssignment { slug, changed })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffixed_form_detection() {
        assert!(is_suffixed_form("foo", "foo"));
        assert!(is_suffixed_form("foo-2", "foo"));
        assert!(is_suffixed_form("foo-17", "foo"));
        assert!(!is_suffixed_form("foo-1", "foo"));
        assert!(!is_suffixed_form("foo-bar", "foo"));
        assert!(!is_suffixed_form("foobar", "foo"));
    }

    #[test]
    fn every_cyrillic_letter_maps() {
        for c in "абвгдеёжзийклмнопрстуфхцчшщъыьэюя".chars() {
            assert!(transliterate_char(c).is_some(), "missing mapping for {c}");
        }
    }
}
