//! Page titles and the namespaces they live in.

use super::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Runs of whitespace and underscores, both of which MediaWiki treats as a single space.
static TITLE_SEPARATORS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\s_]+").expect("title separator pattern is valid")
});

/// The namespaces a crawl needs to tell apart.
///
/// Everything not listed here is treated as article space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Main,
    Category,
    File,
    Template,
    Project,
    User,
    Help,
}

impl Namespace {
    /// MediaWiki's numeric id for article space.
    pub const MAIN_ID: i64 = 0;
    /// MediaWiki's numeric id for the category namespace.
    pub const CATEGORY_ID: i64 = 14;

    /// Resolves the namespace from a title's prefix.
    pub fn of(title: &str) -> Self {
        let Some((prefix, rest)) = title.split_once(':') else {
            return Self::Main;
        };
        if rest.is_empty() {
            return Self::Main;
        }
        match prefix {
            "Category" => Self::Category,
            "File" | "Image" => Self::File,
            "Template" => Self::Template,
            "Wikipedia" | "Project" => Self::Project,
            "User" => Self::User,
            "Help" => Self::Help,
            _ => Self::Main,
        }
    }

    /// Whether titles in this namespace are excluded from the article set.
    pub fn is_reserved(&self) -> bool {
        !matches!(self, Self::Main)
    }
}

/// A normalized MediaWiki page title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PageTitle(String);

impl PageTitle {
    /// Normalizes and validates a title.
    ///
    /// Underscores and whitespace runs collapse to one space, and surrounding
    /// whitespace is dropped, so `"Politics_of_Canada"` and
    /// `"Politics of  Canada"` are the same title.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let raw = raw.as_ref();
        let normalized = TITLE_SEPARATORS.replace_all(raw.trim(), " ");
        let normalized = normalized.trim();

        if normalized.is_empty() {
            return Err(ValidationError::EmptyField("title"));
        }
        if let Some(bad) = normalized.chars().find(|c| "#<>[]|{}".contains(*c)) {
            return Err(ValidationError::InvalidTitle {
                title: raw.to_string(),
                reason: format!("contains forbidden character '{}'", bad),
            });
        }

        Ok(Self(normalized.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn namespace(&self) -> Namespace {
        Namespace::of(&self.0)
    }

    pub fn is_category(&self) -> bool {
        self.namespace() == Namespace::Category
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PageTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PageTitle {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageTitle> for String {
    fn from(title: PageTitle) -> Self {
        title.0
    }
}

/// A title known to be in the category namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryName(PageTitle);

impl CategoryName {
    const PREFIX: &'static str = "Category:";

    /// Parses a category from user input, adding the `Category:` prefix when absent.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyField("category"));
        }
        let title = if Namespace::of(trimmed) == Namespace::Category {
            PageTitle::new(trimmed)?
        } else {
            PageTitle::new(format!("{}{}", Self::PREFIX, trimmed))?
        };
        Self::try_from(title)
    }

    /// Wraps a title the API listed under namespace id 14.
    ///
    /// Wikis in other languages use their own prefix (`Catégorie:`, `Kategorie:`),
    /// so the namespace id is trusted instead of the title text.
    pub fn from_namespace_id(title: PageTitle, ns: i64) -> Result<Self, ValidationError> {
        if ns == Namespace::CATEGORY_ID {
            Ok(Self(title))
        } else {
            Err(ValidationError::NotACategory(title.into_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<PageTitle> for CategoryName {
    type Error = ValidationError;

    fn try_from(title: PageTitle) -> Result<Self, Self::Error> {
        if title.is_category() {
            Ok(Self(title))
        } else {
            Err(ValidationError::NotACategory(title.into_string()))
        }
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
