//! Frustration-signal keyword matching (case-insensitive substring containment).

use anyhow::{bail, Result};

/// Ordered, lowercased, duplicate-free keyword list.
/// Matching is substring-based, so "frustrat" also hits "frustration".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    /// Normalize to lowercase and drop duplicates, keeping first-seen order.
    /// Fails on an empty list or a blank keyword (a blank keyword would match everything).
    pub fn new<I, S>(iter: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut keywords: Vec<String> = Vec::new();
        for raw in iter {
            let kw = raw.as_ref().to_lowercase();
            if kw.trim().is_empty() {
                bail!("keywords must not be blank");
            }
            if !keywords.contains(&kw) {
                keywords.push(kw);
            }
        }
        if keywords.is_empty() {
            bail!("at least one keyword is required");
        }
        Ok(Self { keywords })
    }

    pub fn as_slice(&self) -> &[String] {
        &self.keywords
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// True iff some keyword occurs in `text`, ignoring case.
    pub fn matches(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let hay = text.to_lowercase();
        self.keywords.iter().any(|kw| hay.contains(kw.as_str()))
    }
}

/// Free-function form of [`KeywordSet::matches`].
#[inline]
pub fn matches(text: &str, keywords: &KeywordSet) -> bool {
    keywords.matches(text)
}
