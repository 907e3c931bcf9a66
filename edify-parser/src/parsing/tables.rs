//! Locating headings and captioned tables
//!
//! Workspaces are `<h2>` headings whose first `<a>` carries both the display name (its text)
//! and the identity anchor (its `name`). A workspace's tables are the captioned tables that
//! follow its heading up to the next heading of the same level.

use crate::dom::NodeRef;

/// Heading level of top level sections and workspaces.
pub const SECTION_HEADING: &str = "h2";

/// Display name of a workspace heading: the text of its first link, or of the whole heading.
pub fn heading_name(heading: NodeRef<'_>) -> String {
    match heading.find("a") {
        Some(anchor) => anchor.trimmed_text(),
        None => heading.trimmed_text(),
    }
}

/// Identity anchor of a workspace heading.
pub fn heading_anchor<'a>(heading: NodeRef<'a>) -> Option<&'a str> {
    heading.find("a").and_then(|anchor| anchor.attr("name"))
}

/// The table, between `heading` and the next heading of the same level, whose caption starts
/// with `prefix`.
pub fn find_workspace_table<'a>(heading: NodeRef<'a>, prefix: &str) -> Option<NodeRef<'a>> {
    let level = heading.name()?;
    heading
        .next_siblings()
        .take_while(|node| !node.is(level))
        .filter(|node| node.is_element())
        .find_map(|node| {
            std::iter::once(node)
                .chain(node.descendants())
                .find(|caption| caption.is("caption") && caption.trimmed_text().starts_with(prefix))
        })
        .and_then(|caption| caption.find_parent("table"))
}

/// The first table anywhere under `root` whose caption satisfies `matches`.
pub fn find_captioned_table<'a>(
    root: NodeRef<'a>,
    matches: impl Fn(&str) -> bool,
) -> Option<NodeRef<'a>> {
    root.find_all("caption")
        .find(|caption| matches(caption.trimmed_text().as_str()))
        .and_then(|caption| caption.find_parent("table"))
}

/// Rows that hold at least one data cell.
pub fn data_rows<'a>(table: NodeRef<'a>) -> impl Iterator<Item = NodeRef<'a>> + 'a {
    table
        .find_all("tr")
        .filter(|row| row.find("td").is_some())
}

/// `name` of the anchor inside, or wrapped around, the first `<strong>` of a cell.
pub fn strong_anchor(cell: NodeRef<'_>) -> Option<String> {
    let strong = cell.find("strong")?;
    strong
        .find_all("a")
        .find_map(|anchor| anchor.attr("name"))
        .or_else(|| strong.find_parent("a").and_then(|anchor| anchor.attr("name")))
        .map(str::to_string)
}

/// Trimmed text of the first `<strong>` of a cell.
pub fn strong_text(cell: NodeRef<'_>) -> String {
    cell.find("strong")
        .map(|strong| strong.trimmed_text())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    const WORKSPACES: &str = r##"
        <h2><a name="ws1">Main</a></h2>
        <p>intro</p>
        <table><caption>Steps</caption><tr><td>a</td></tr></table>
        <center><table><caption>Local Objects (2)</caption><tr><td>b</td></tr></table></center>
        <h2><a name="ws2">Other</a></h2>
        <table><caption>Entry Parameters</caption><tr><td>c</td></tr></table>
    "##;

    #[test]
    fn test_heading_identity() {
        let doc = Document::parse(WORKSPACES);
        let heading = doc.root().find("h2").unwrap();
        assert_eq!(heading_name(heading), "Main");
        assert_eq!(heading_anchor(heading), Some("ws1"));
    }

    #[test]
    fn test_workspace_table_by_caption_prefix() {
        let doc = Document::parse(WORKSPACES);
        let heading = doc.root().find("h2").unwrap();
        let steps = find_workspace_table(heading, "Steps").unwrap();
        assert_eq!(steps.find("td").unwrap().trimmed_text(), "a");
        let objects = find_workspace_table(heading, "Local Objects").unwrap();
        assert_eq!(objects.find("td").unwrap().trimmed_text(), "b");
    }

    #[test]
    fn test_workspace_table_stops_at_next_heading() {
        let doc = Document::parse(WORKSPACES);
        let heading = doc.root().find("h2").unwrap();
        assert!(find_workspace_table(heading, "Entry Parameters").is_none());
    }

    #[test]
    fn test_data_rows_skip_header_rows() {
        let doc = Document::parse(
            "<table><tr><th>Name</th></tr><tr><td>x</td></tr><tr><td>y</td></tr></table>",
        );
        let table = doc.root().find("table").unwrap();
        assert_eq!(data_rows(table).count(), 2);
    }

    #[test]
    fn test_strong_anchor_inside_and_around() {
        let doc = Document::parse(
            r#"<table><tr><td><strong><a name="in">X</a></strong></td>
               <td><a name="out"><strong>Y</strong></a></td></tr></table>"#,
        );
        let cells: Vec<_> = doc.root().find_all("td").collect();
        assert_eq!(strong_anchor(cells[0]).as_deref(), Some("in"));
        assert_eq!(strong_anchor(cells[1]).as_deref(), Some("out"));
        assert_eq!(strong_text(cells[1]), "Y");
    }
}
