//! Article addressing for wikipath
//!
//! Turns user input (article URLs or bare titles) into [`ArticleRef`]s and
//! derives the API endpoint of the wiki they live on.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use crate::core::error::{Error, Result};

const WIKIPEDIA_DOMAIN: &str = ".wikipedia.org";
const WIKI_DIR: &str = "wiki/";
const API_SCRIPT: &str = "/w/api.php";

/// Characters escaped when rendering an article URL
const TITLE_ESCAPES: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// One article on one language edition of Wikipedia
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRef {
    language: String,
    title: String,
}

impl ArticleRef {
    /// Parse an article URL such as `https://en.wikipedia.org/wiki/Disc_jockey`.
    ///
    /// The scheme may be `https://`, `http://` or missing altogether.
    pub fn parse(url: &str) -> Result<Self> {
        let invalid = || Error::InvalidUrl(url.to_string());
        let trimmed = url.trim();

        let rest = if let Some(rest) = trimmed.strip_prefix("https://") {
            rest
        } else if let Some(rest) = trimmed.strip_prefix("http://") {
            rest
        } else if trimmed.contains("://") {
            return Err(invalid());
        } else {
            trimmed
        };

        let (host, path) = rest.split_once('/').ok_or_else(invalid)?;
        let host = host.to_ascii_lowercase();
        let language = host.strip_suffix(WIKIPEDIA_DOMAIN).ok_or_else(invalid)?;
        if !is_language_label(language) {
            return Err(invalid());
        }

        let raw_title = path.strip_prefix(WIKI_DIR).ok_or_else(invalid)?;
        let raw_title = raw_title.split(['#', '?']).next().unwrap_or_default();
        let title = normalize_title(raw_title).ok_or_else(invalid)?;

        Ok(Self {
            language: language.to_string(),
            title,
        })
    }

    /// Address an article by language label and title
    pub fn from_title(language: &str, title: &str) -> Result<Self> {
        let language = language.trim().to_ascii_lowercase();
        if !is_language_label(&language) {
            return Err(Error::InvalidInput(format!(
                "\"{}\" is not a Wikipedia language label",
                language
            )));
        }

        let title = normalize_title(title)
            .ok_or_else(|| Error::InvalidInput(format!("invalid article title \"{}\"", title)))?;

        Ok(Self { language, title })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Title in API form (underscores instead of spaces)
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn host(&self) -> String {
        format!("{}{}", self.language, WIKIPEDIA_DOMAIN)
    }

    /// `https://<lang>.wikipedia.org`
    pub fn base_url(&self) -> String {
        format!("https://{}", self.host())
    }

    /// `https://<lang>.wikipedia.org/w/api.php`
    pub fn api_url(&self) -> String {
        format!("{}{}", self.base_url(), API_SCRIPT)
    }

    /// URL of another article on the same wiki
    pub fn article_url(&self, title: &str) -> String {
        format!(
            "{}/{}{}",
            self.base_url(),
            WIKI_DIR,
            utf8_percent_encode(&title.replace(' ', "_"), TITLE_ESCAPES)
        )
    }

    /// URL of this article
    pub fn url(&self) -> String {
        self.article_url(&self.title)
    }

    pub fn same_wiki(&self, other: &ArticleRef) -> bool {
        self.language == other.language
    }
}

/// Resolve a source/target pair given as URLs or bare titles.
///
/// Bare titles are looked up on `default_language`. Both articles must live
/// on the same wiki.
pub fn resolve_pair(
    source: &str,
    target: &str,
    default_language: &str,
) -> Result<(ArticleRef, ArticleRef)> {
    let source = resolve_one(source, default_language)?;
    let target = resolve_one(target, default_language)?;

    if !source.same_wiki(&target) {
        return Err(Error::InvalidInput(format!(
            "\"{}\" and \"{}\" belong to different wikis ({} vs {})",
            source.title, target.title, source.language, target.language
        )));
    }

    Ok((source, target))
}

fn resolve_one(input: &str, default_language: &str) -> Result<ArticleRef> {
    if looks_like_url(input) {
        ArticleRef::parse(input)
    } else {
        ArticleRef::from_title(default_language, input)
    }
}

fn looks_like_url(input: &str) -> bool {
    input.contains("://") || input.contains(WIKIPEDIA_DOMAIN)
}

fn is_language_label(label: &str) -> bool {
    label.len() >= 2
        && label
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Percent-decode, use underscores for spaces, trim and uppercase the first
/// letter as MediaWiki does; `None` if nothing is left
fn normalize_title(raw: &str) -> Option<String> {
    let decoded = percent_decode_str(raw).decode_utf8().ok()?;
    let title = decoded.trim().replace(' ', "_");
    let title = title.trim_matches('_');

    let mut chars = title.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_urls() {
        let article = ArticleRef::parse("https://en.wikipedia.org/wiki/Funk").unwrap();
        assert_eq!(article.language(), "en");
        assert_eq!(article.title(), "Funk");
        assert_eq!(article.api_url(), "https://en.wikipedia.org/w/api.php");

        let article = ArticleRef::parse("http://fi.wikipedia.org/wiki/Fankki").unwrap();
        assert_eq!(article.language(), "fi");
        assert_eq!(article.api_url(), "https://fi.wikipedia.org/w/api.php");

        let article = ArticleRef::parse("de.wikipedia.org/wiki/Das_Funk").unwrap();
        assert_eq!(article.language(), "de");
        assert_eq!(article.title(), "Das_Funk");
        assert_eq!(article.base_url(), "https://de.wikipedia.org");
    }

    #[test]
    fn test_invalid_urls() {
        for url in [
            "htps://en.wikipedia.org/wiki/Funk",
            "en.wikpedia.org/wiki/Funk",
            "e.wikipedia.org/wiki/Funk",
            "en.wikipedia.org/wik/Funk",
            "en.wikipedia.org/wiki/",
            "ftp://en.wikipedia.org/wiki/Funk",
            "en.wikipedia.org",
        ] {
            assert!(
                matches!(ArticleRef::parse(url), Err(Error::InvalidUrl(_))),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn test_title_normalization() {
        let article =
            ArticleRef::parse("https://en.wikipedia.org/wiki/Disc%20jockey#History").unwrap();
        assert_eq!(article.title(), "Disc_jockey");

        let article = ArticleRef::parse("https://en.wikipedia.org/wiki/Funk?action=view").unwrap();
        assert_eq!(article.title(), "Funk");

        let article = ArticleRef::parse("https://fi.wikipedia.org/wiki/H%C3%A4me").unwrap();
        assert_eq!(article.title(), "Häme");
    }

    #[test]
    fn test_first_letter_capitalized() {
        let article = ArticleRef::parse("https://en.wikipedia.org/wiki/disc_jockey").unwrap();
        assert_eq!(article.title(), "Disc_jockey");

        let article = ArticleRef::from_title("fi", "äänilevy").unwrap();
        assert_eq!(article.title(), "Äänilevy");

        // Only the first letter changes
        let article = ArticleRef::from_title("en", "iPhone").unwrap();
        assert_eq!(article.title(), "IPhone");
        assert_eq!(
            ArticleRef::from_title("en", "funk").unwrap(),
            ArticleRef::parse("en.wikipedia.org/wiki/Funk").unwrap()
        );
    }

    #[test]
    fn test_article_url() {
        let article = ArticleRef::from_title("en", "Disc jockey").unwrap();
        assert_eq!(article.title(), "Disc_jockey");
        assert_eq!(article.url(), "https://en.wikipedia.org/wiki/Disc_jockey");
        assert_eq!(
            article.article_url("What?"),
            "https://en.wikipedia.org/wiki/What%3F"
        );
    }

    #[test]
    fn test_from_title_rejects_bad_input() {
        assert!(matches!(
            ArticleRef::from_title("en", "   "),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            ArticleRef::from_title("x", "Funk"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_resolve_pair() {
        let (source, target) =
            resolve_pair("https://en.wikipedia.org/wiki/Funk", "Disc jockey", "en").unwrap();
        assert_eq!(source.title(), "Funk");
        assert_eq!(target.title(), "Disc_jockey");
        assert!(source.same_wiki(&target));

        let err = resolve_pair(
            "https://en.wikipedia.org/wiki/Funk",
            "https://fi.wikipedia.org/wiki/Fankki",
            "en",
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
