use log::{debug, warn};
use select::{
    document::Document,
    node::Node,
    predicate::{Name, Predicate},
};
use url::Url;

const TABLE_SUFFIX: &str = ".csv";
const PREFERRED_TEXT: [&str; 2] = ["download", "csv"];

/// An anchor on a listing page that points at a tabular file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateLink {
    pub href: String,
    pub text: String,
}

impl CandidateLink {
    fn from_html(anchor: &Node) -> Option<Self> {
        let href = anchor.attr("href")?;

        Some(CandidateLink {
            href: href.to_owned(),
            text: anchor.text().trim().to_owned(),
        })
    }

    fn is_labeled_download(&self) -> bool {
        let text = self.text.to_lowercase();
        PREFERRED_TEXT.iter().any(|needle| text.contains(needle))
    }
}

/// Every anchor whose `href` ends in `.csv`, in document order.
pub fn candidate_links(source: &str) -> Vec<CandidateLink> {
    let document = Document::from(source);
    let anchors = Name("a").and(|node: &Node| {
        node.attr("href")
            .map_or(false, |href| href.ends_with(TABLE_SUFFIX))
    });

    document
        .find(anchors)
        .filter_map(|anchor| CandidateLink::from_html(&anchor))
        .collect()
}

/// Picks the download link of a listing page and makes it absolute.
///
/// Links whose text mentions "download" or "csv" come first, then the rest,
/// each group in document order; the first one that forms a valid URL wins.
/// Listing pages label the affordance inconsistently (icon-only anchors,
/// descriptive text), so any other csv link labeled "download" will be
/// picked over the real one.
pub fn resolve(source: &str, base: &Url) -> Option<Url> {
    let candidates = candidate_links(source);
    for candidate in &candidates {
        debug!("found potential csv link: {}", candidate.href);
    }

    let (labeled, unlabeled): (Vec<_>, Vec<_>) = candidates
        .iter()
        .partition(|candidate| candidate.is_labeled_download());

    labeled.into_iter().chain(unlabeled).find_map(|candidate| {
        let url = absolutize(&candidate.href, base);
        if url.is_none() {
            warn!("ignoring unusable csv link {:?} on {}", candidate.href, base);
        }
        url
    })
}

/// Hrefs carrying a scheme are kept as is; anything else is taken relative to
/// `base`, which names a directory even without a trailing slash.
fn absolutize(href: &str, base: &Url) -> Option<Url> {
    if let Ok(url) = Url::parse(href) {
        return Some(url);
    }

    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(href).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://x.edu/term-1/classes/csci").unwrap()
    }

    #[test]
    fn no_csv_anchor_resolves_to_nothing() {
        let html = r#"<html><body>
            <a href="/files/a.pdf">Download PDF</a>
            <a href="/files/a.CSV">upper case suffix</a>
            <a>no href at all</a>
        </body></html>"#;

        assert_eq!(resolve(html, &base()), None);
        assert_eq!(resolve("", &base()), None);
    }

    #[test]
    fn text_match_wins_over_position() {
        let html = r#"
            <a href="/files/a.csv"><img src="icon.png"></a>
            <a href="/files/b.csv">schedule</a>
            <a href="/files/c.csv"> Click to DOWNLOAD </a>
            <a href="/files/d.csv">export</a>
        "#;

        let url = resolve(html, &base()).unwrap();
        assert_eq!(url.as_str(), "https://x.edu/files/c.csv");
    }

    #[test]
    fn csv_in_text_also_counts() {
        let html = r#"
            <a href="first.csv">icon</a>
            <a href="second.csv">Export as CSV</a>
        "#;

        let url = resolve(html, &base()).unwrap();
        assert_eq!(url.as_str(), "https://x.edu/term-1/classes/csci/second.csv");
    }

    #[test]
    fn first_anchor_breaks_ties() {
        let html = r#"
            <a href="one.csv">icon</a>
            <a href="two.csv">other</a>
        "#;

        let url = resolve(html, &base()).unwrap();
        assert_eq!(url.as_str(), "https://x.edu/term-1/classes/csci/one.csv");
    }

    #[test]
    fn first_labeled_anchor_among_several_labeled() {
        let html = r#"
            <a href="a.csv">Download</a>
            <a href="b.csv">Download CSV</a>
        "#;

        let url = resolve(html, &base()).unwrap();
        assert_eq!(url.as_str(), "https://x.edu/term-1/classes/csci/a.csv");
    }

    #[test]
    fn malformed_preferred_link_falls_back_to_the_next() {
        let html = r#"
            <a href="http://[::1.csv">Download</a>
            <a href="good.csv">icon</a>
        "#;

        let url = resolve(html, &base()).unwrap();
        assert_eq!(url.as_str(), "https://x.edu/term-1/classes/csci/good.csv");
    }

    #[test]
    fn malformed_links_only_resolve_to_nothing() {
        let html = r#"<a href="http://[::1.csv">Download</a>"#;

        assert_eq!(resolve(html, &base()), None);
    }

    #[test]
    fn absolute_href_is_kept() {
        let html = r#"<a href="https://cdn.example.org/exports/csci.csv">file</a>"#;

        let url = resolve(html, &base()).unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.org/exports/csci.csv");
    }

    #[test]
    fn listing_page_scenario() {
        let html = r#"
            <a href="/files/a.csv">icon</a>
            <a href="download.csv">Download CSV</a>
        "#;

        let url = resolve(html, &base()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://x.edu/term-1/classes/csci/download.csv"
        );
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("x.edu"));
    }

    #[test]
    fn unrelated_download_link_is_a_false_positive() {
        // the real export is icon-only, so a labeled syllabus link takes priority
        let html = r#"
            <a href="csci_classes.csv"><img src="csv.png"></a>
            <a href="/docs/syllabi.csv">Download syllabi</a>
        "#;

        let url = resolve(html, &base()).unwrap();
        assert_eq!(url.as_str(), "https://x.edu/docs/syllabi.csv");
    }

    #[test]
    fn candidates_keep_document_order_and_trimmed_text() {
        let html = r#"<a href="b.csv">  B  </a><a href="x.txt">x</a><a href="a.csv">A</a>"#;

        assert_eq!(
            candidate_links(html),
            vec![
                CandidateLink {
                    href: "b.csv".to_owned(),
                    text: "B".to_owned()
                },
                CandidateLink {
                    href: "a.csv".to_owned(),
                    text: "A".to_owned()
                },
            ]
        );
    }
}
