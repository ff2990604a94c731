// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Utilities for deriving file stems and component identifiers from node
//! names.
//!
//! Design tools allow slash-nested names such as `Arrows/Left`. Stems produced
//! here are lowercase, free of combining diacritics and trimmed, which makes
//! them usable both as file names and as the deduplication key for the index.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::error::Error;

/// Prefix applied to component identifiers when none is configured.
pub const DEFAULT_PREFIX: &str = "Icon";

/// Selects which part of a slash-nested name contributes to the stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default,)]
pub enum NamePolicy
{
    /// Only the last `/` segment is meaningful.
    #[default]
    Leaf,
    /// Every segment is kept and joined with `_`.
    Path,
}

/// Converts raw node names into stems and exported identifiers.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct NameNormalizer
{
    policy: NamePolicy,
    prefix: String,
}

impl Default for NameNormalizer
{
    fn default() -> Self
    {
        Self::new(NamePolicy::Leaf, DEFAULT_PREFIX,)
    }
}

impl NameNormalizer
{
    /// Creates a normalizer with the given policy and identifier prefix.
    pub fn new<P,>(policy: NamePolicy, prefix: P,) -> Self
    where
        P: Into<String,>,
    {
        Self {
            policy, prefix: prefix.into(),
        }
    }

    /// Returns the configured name policy.
    pub fn policy(&self,) -> NamePolicy
    {
        self.policy
    }

    /// Derives the normalized file stem for a node name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidName`] when nothing remains after trimming.
    ///
    /// # Examples
    ///
    /// ```
    /// use figma_icons::NameNormalizer;
    ///
    /// let names = NameNormalizer::default();
    /// assert_eq!(names.normalize_stem("Navigation/Flèche",).unwrap(), "fleche");
    /// ```
    pub fn normalize_stem(&self, name: &str,) -> Result<String, Error,>
    {
        let stem = match self.policy {
            NamePolicy::Leaf => {
                let leaf = name.rsplit('/',).next().unwrap_or(name,);
                fold(leaf,).replace('/', "_",).trim().to_owned()
            }
            NamePolicy::Path => name
                .split('/',)
                .map(|segment| fold(segment,).trim().to_owned(),)
                .filter(|segment| !segment.is_empty(),)
                .collect::<Vec<_,>>()
                .join("_",),
        };

        if stem.is_empty() {
            return Err(Error::invalid_name(name,),);
        }

        Ok(stem,)
    }

    /// Converts a stem into a PascalCase identifier carrying the prefix.
    ///
    /// Every character that is not alphanumeric acts as a segment delimiter
    /// and is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidName`] when the stem has no alphanumeric
    /// characters.
    ///
    /// # Examples
    ///
    /// ```
    /// use figma_icons::NameNormalizer;
    ///
    /// let names = NameNormalizer::default();
    /// assert_eq!(names.to_component_identifier("arrow-left_2",).unwrap(), "IconArrowLeft2");
    /// ```
    pub fn to_component_identifier(&self, stem: &str,) -> Result<String, Error,>
    {
        let mut identifier = String::with_capacity(self.prefix.len() + stem.len(),);
        identifier.push_str(&self.prefix,);

        let mut body = false;
        for segment in stem.split(|candidate: char| !candidate.is_alphanumeric(),) {
            let mut characters = segment.chars();
            if let Some(first,) = characters.next() {
                identifier.extend(first.to_uppercase(),);
                identifier.push_str(characters.as_str(),);
                body = true;
            }
        }

        if !body {
            return Err(Error::invalid_name(stem,),);
        }

        Ok(identifier,)
    }
}

/// Lowercases the input and strips combining marks after canonical
/// decomposition.
fn fold(segment: &str,) -> String
{
    segment.to_lowercase().nfd().filter(|candidate| !is_combining_mark(*candidate,),).collect()
}

#[cfg(test)]
mod tests
{
    use proptest::prelude::*;

    use super::{NameNormalizer, NamePolicy};
    use crate::error::Error;

    proptest! {
        #[test]
        fn stem_is_idempotent(input in "[A-Za-z0-9 éèàüñçÅ/_-]{1,32}") {
            let names = NameNormalizer::default();
            if let Ok(stem) = names.normalize_stem(&input) {
                prop_assert_eq!(names.normalize_stem(&stem).unwrap(), stem);
            }
        }

        #[test]
        fn path_stem_is_idempotent(input in "[A-Za-z0-9 éèàüñç/_-]{1,32}") {
            let names = NameNormalizer::new(NamePolicy::Path, "Icon");
            if let Ok(stem) = names.normalize_stem(&input) {
                prop_assert_eq!(names.normalize_stem(&stem).unwrap(), stem);
            }
        }

        #[test]
        fn leading_segments_do_not_affect_leaf_stem(
            first in "[A-Za-z ]{1,12}",
            second in "[A-Za-z ]{1,12}",
            leaf in "[A-Za-z][A-Za-z0-9 -]{0,12}",
        ) {
            let names = NameNormalizer::default();
            let left = names.normalize_stem(&format!("{first}/{leaf}")).unwrap();
            let right = names.normalize_stem(&format!("{second}/{leaf}")).unwrap();
            prop_assert_eq!(left, right);
        }

        #[test]
        fn identifier_starts_with_prefix_and_uppercase(stem in "[a-z][a-z0-9_ -]{0,24}") {
            let names = NameNormalizer::default();
            let identifier = names.to_component_identifier(&stem).unwrap();
            prop_assert!(identifier.starts_with("Icon"));
            let next = identifier["Icon".len()..].chars().next().unwrap();
            prop_assert!(next.is_uppercase());
        }
    }

    #[test]
    fn leaf_policy_keeps_last_segment()
    {
        let names = NameNormalizer::default();
        assert_eq!(names.normalize_stem("Arrow/Left",).unwrap(), "left");
        assert_eq!(names.normalize_stem("  Solo  ",).unwrap(), "solo");
    }

    #[test]
    fn path_policy_joins_segments()
    {
        let names = NameNormalizer::new(NamePolicy::Path, "Icon",);
        assert_eq!(names.normalize_stem("Arrow/Left",).unwrap(), "arrow_left");
        assert_eq!(names.normalize_stem(" Arrow / Right ",).unwrap(), "arrow_right");
    }

    #[test]
    fn accents_collapse_to_ascii()
    {
        let names = NameNormalizer::default();
        assert_eq!(names.normalize_stem("Café",).unwrap(), "cafe");
        assert_eq!(names.normalize_stem("Ça/Éclair",).unwrap(), "eclair");
        assert_eq!(names.normalize_stem("CAFE\u{301}",).unwrap(), "cafe");
    }

    #[test]
    fn empty_names_are_rejected()
    {
        let names = NameNormalizer::default();
        for input in ["", "   ", "Folder/", "Folder/   "] {
            let error = names.normalize_stem(input,).expect_err("expected invalid name",);
            assert!(matches!(error, Error::InvalidName { .. }), "{input:?}");
        }
    }

    #[test]
    fn identifier_handles_mixed_delimiters()
    {
        let names = NameNormalizer::default();
        assert_eq!(names.to_component_identifier("arrow_left",).unwrap(), "IconArrowLeft");
        assert_eq!(names.to_component_identifier("chevron-down",).unwrap(), "IconChevronDown");
        assert_eq!(names.to_component_identifier("check circle",).unwrap(), "IconCheckCircle");
        assert_eq!(names.to_component_identifier("x",).unwrap(), "IconX");
    }

    #[test]
    fn identifier_for_digit_leading_stem_stays_valid()
    {
        let names = NameNormalizer::default();
        assert_eq!(names.to_component_identifier("3d-box",).unwrap(), "Icon3dBox");
    }

    #[test]
    fn identifier_uses_custom_prefix()
    {
        let names = NameNormalizer::new(NamePolicy::Leaf, "Glyph",);
        assert_eq!(names.to_component_identifier("home",).unwrap(), "GlyphHome");
    }

    #[test]
    fn identifier_rejects_stems_without_letters()
    {
        let names = NameNormalizer::default();
        let error = names.to_component_identifier("--__",).expect_err("expected invalid name",);
        assert!(matches!(error, Error::InvalidName { .. }));
    }
}
