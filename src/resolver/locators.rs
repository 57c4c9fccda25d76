//! Locator strategy tables.
//!
//! The site is not markup-stable, so each extraction target carries an
//! ordered list of structural queries. Earlier entries are the current
//! layout; later entries are layouts the site has shipped before. The
//! first query with at least one match wins.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

pub const LATEST_IMAGE_QUERIES: &[&str] = &[
    "div.alt-container > a:nth-of-type(2) > img[src]",
    "div.alt-container > img[src]",
];

pub const ARCHIVE_IMAGE_QUERIES: &[&str] = &[
    "div.comic > p#cg_img > a[href] > img[src]",
    "div.comic > p#cg_img > img[src]",
];

pub const LATEST_TIMESTAMP_QUERIES: &[&str] = &[
    "div.alt-container > p",
    "div.alt-container > p:nth-of-type(2)",
];

/// Navigation link on the archive index pointing at the oldest page.
pub const ARCHIVE_LAST_LINK_QUERY: &str = "a#cg_back";

/// Date node on an archived page.
pub const ARCHIVE_TIMESTAMP_QUERY: &str = "div.comic > p.date";

pub static LATEST_IMAGE: Lazy<Vec<Selector>> = Lazy::new(|| compile(LATEST_IMAGE_QUERIES));
pub static ARCHIVE_IMAGE: Lazy<Vec<Selector>> = Lazy::new(|| compile(ARCHIVE_IMAGE_QUERIES));
pub static LATEST_TIMESTAMP: Lazy<Vec<Selector>> = Lazy::new(|| compile(LATEST_TIMESTAMP_QUERIES));
pub static ARCHIVE_LAST_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(ARCHIVE_LAST_LINK_QUERY).unwrap());
pub static ARCHIVE_TIMESTAMP: Lazy<Selector> =
    Lazy::new(|| Selector::parse(ARCHIVE_TIMESTAMP_QUERY).unwrap());

fn compile(queries: &[&str]) -> Vec<Selector> {
    queries.iter().map(|q| Selector::parse(q).unwrap()).collect()
}

/// First query producing one or more matches wins; its first match is used.
pub fn first_match<'a>(document: &'a Html, strategies: &[Selector]) -> Option<ElementRef<'a>> {
    strategies
        .iter()
        .find_map(|selector| document.select(selector).next())
}

/// Like [`first_match`], but a candidate is only accepted when its text
/// content is non-empty. Used for the latest-page timestamp, where the
/// current layout sometimes emits an empty paragraph in the date slot.
pub fn first_match_with_text<'a>(
    document: &'a Html,
    strategies: &[Selector],
) -> Option<ElementRef<'a>> {
    strategies.iter().find_map(|selector| {
        document
            .select(selector)
            .next()
            .filter(|element| !element.text().collect::<String>().is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_match_respects_strategy_order() {
        let document = Html::parse_document(
            "<div class='comic'><p id='cg_img'>\
             <a href='/reader'><img src='linked.png'></a>\
             <img src='plain.png'>\
             </p></div>",
        );
        let element = first_match(&document, &ARCHIVE_IMAGE).unwrap();
        assert_eq!(element.value().attr("src"), Some("linked.png"));
    }

    #[test]
    fn first_match_falls_through_to_later_strategies() {
        let document = Html::parse_document(
            "<div class='comic'><p id='cg_img'><img src='plain.png'></p></div>",
        );
        let element = first_match(&document, &ARCHIVE_IMAGE).unwrap();
        assert_eq!(element.value().attr("src"), Some("plain.png"));
    }

    #[test]
    fn first_match_exhausted_signals_none() {
        let document = Html::parse_document("<div class='unrelated'></div>");
        assert!(first_match(&document, &ARCHIVE_IMAGE).is_none());
    }

    #[test]
    fn text_variant_rejects_empty_candidates() {
        let document = Html::parse_document(
            "<div class='alt-container'><p></p><p>March 1, 2004</p></div>",
        );
        let element = first_match_with_text(&document, &LATEST_TIMESTAMP).unwrap();
        assert_eq!(element.text().collect::<String>(), "March 1, 2004");
    }

    #[test]
    fn text_variant_exhausted_signals_none() {
        let document =
            Html::parse_document("<div class='alt-container'><p></p><p></p></div>");
        assert!(first_match_with_text(&document, &LATEST_TIMESTAMP).is_none());
    }
}
