//! Markdown rendering for legal pages.

use comrak::{Options, markdown_to_html};

use techfix_core::{LegalPage, LegalSlug};

/// Shown when a legal page has no content yet.
pub const EMPTY_LEGAL_CONTENT: &str = "No content defined yet.";

/// Render markdown to HTML with GitHub Flavored Markdown support.
///
/// Raw HTML in the source is dropped.
#[must_use]
pub fn render_markdown(content: &str) -> String {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.render.r#unsafe = false;

    markdown_to_html(content, &options)
}

/// A legal page ready for its template.
#[derive(Debug, Clone)]
pub struct LegalPageView {
    pub slug: LegalSlug,
    pub title: String,
    pub subtitle: &'static str,
    pub content_html: String,
    /// e.g. "March 4, 2025"
    pub last_updated: Option<String>,
}

impl LegalPageView {
    /// Render `page`, or the empty placeholder for `slug` when it is missing.
    #[must_use]
    pub fn new(slug: LegalSlug, page: Option<LegalPage>) -> Self {
        let page = page.unwrap_or_else(|| LegalPage::placeholder(slug));
        let title = if page.title.trim().is_empty() {
            slug.default_title().to_owned()
        } else {
            page.title
        };
        let source = if page.content.trim().is_empty() {
            EMPTY_LEGAL_CONTENT
        } else {
            page.content.as_str()
        };

        Self {
            slug,
            title,
            subtitle: slug.subtitle(),
            content_html: render_markdown(source),
            last_updated: page
                .last_updated
                .map(|ts| ts.format("%B %-d, %Y").to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn test_render_markdown_headings_and_lists() {
        let html = render_markdown("## Data\n\n- one\n- two\n");
        assert!(html.contains("<h2>Data</h2>"));
        assert!(html.contains("<li>one</li>"));
    }

    #[test]
    fn test_raw_html_is_not_passed_through() {
        let html = render_markdown("<script>alert(1)</script>\n\nText");
        assert!(!html.contains("<script>"));
        assert!(html.contains("Text"));
    }

    #[test]
    fn test_missing_page_renders_placeholder() {
        let view = LegalPageView::new(LegalSlug::TermsOfService, None);
        assert_eq!(view.title, "Terms of Service");
        assert!(view.content_html.contains(EMPTY_LEGAL_CONTENT));
        assert!(view.last_updated.is_none());
    }

    #[test]
    fn test_last_updated_formatting() {
        let page = LegalPage {
            last_updated: Utc.with_ymd_and_hms(2025, 3, 4, 12, 0, 0).single(),
            content: "Hello".into(),
            ..LegalPage::placeholder(LegalSlug::PrivacyPolicy)
        };
        let view = LegalPageView::new(LegalSlug::PrivacyPolicy, Some(page));
        assert_eq!(view.last_updated.as_deref(), Some("March 4, 2025"));
    }
}
