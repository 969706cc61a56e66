//! Comprehensive tests for domx-html
//!
//! Parsing edge cases and parse/serialize agreement.

use domx_html::{DomTree, HtmlParser, outer_html, parse};

#[test]
fn test_parse_minimal_html() {
    let doc = parse("").unwrap();
    assert!(doc.body().is_some(), "Even empty HTML gets a body");
}

#[test]
fn test_parse_text_only() {
    let doc = parse("Hello World").unwrap();
    let body = doc.body().unwrap();
    assert_eq!(doc.tree().text_content(body), "Hello World");
}

#[test]
fn test_parse_malformed_html() {
    let html = r#"
        <div>
            <p>Unclosed paragraph
            <span>Unclosed span
        </div>
        <p>Another paragraph without closing
    "#;

    let doc = parse(html).unwrap();
    assert_eq!(doc.query_selector_all("p").unwrap().len(), 2);
}

#[test]
fn test_parse_doctype_and_comment() {
    let doc = parse("<!DOCTYPE html><!-- c --><html><body></body></html>").unwrap();
    let markup = outer_html(doc.tree(), doc.tree().root());
    assert!(markup.starts_with("<!DOCTYPE html><!-- c -->"), "{markup}");
}

#[test]
fn test_parse_nested_structure() {
    let html = r#"
        <div id="container">
            <h1>Welcome</h1>
            <p class="intro">This is a test.</p>
            <ul>
                <li>Item 1</li>
                <li>Item 2</li>
                <li>Item 3</li>
            </ul>
        </div>
    "#;

    let doc = parse(html).unwrap();
    assert_eq!(doc.query_selector_all("#container ul > li").unwrap().len(), 3);
    assert!(doc.get_element_by_id("container").is_some());
}

#[test]
fn test_fragment_round_trips_through_serializer() {
    let markup = r#"<ul class="menu"><li data-id="1">One &amp; only</li><li><img src="a.png"></li></ul>"#;
    let mut tree = DomTree::new();
    let nodes = HtmlParser::new().parse_fragment(&mut tree, markup).unwrap();

    assert_eq!(nodes.len(), 1);
    assert_eq!(outer_html(&tree, nodes[0]), markup);
}

#[test]
fn test_fragment_text_only_has_no_element() {
    let mut tree = DomTree::new();
    let nodes = HtmlParser::new().parse_fragment(&mut tree, "just text").unwrap();

    assert_eq!(nodes.len(), 1);
    assert!(tree.get(nodes[0]).unwrap().is_text());
}

#[test]
fn test_fragment_parses_into_existing_document() {
    let mut doc = parse("<body><main></main></body>").unwrap();
    let before = doc.tree().len();
    let nodes = HtmlParser::new()
        .parse_fragment(doc.tree_mut(), "<section><p>hi</p></section>")
        .unwrap();

    assert_eq!(doc.tree().len(), before + 3);
    // Fragment nodes are detached until inserted.
    assert!(doc.query_selector_all("section").unwrap().is_empty());
    assert_eq!(doc.tree().text_content(nodes[0]), "hi");
}

#[test]
fn test_whitespace_text_survives_round_trip() {
    let markup = "<p><b>a</b> <i>b</i>\n</p>";
    let doc = parse(markup).unwrap();
    let p = doc.query_selector("p").unwrap().unwrap();

    assert_eq!(doc.tree().text_content(p), "a b\n");
    assert_eq!(outer_html(doc.tree(), p), markup);

    let mut tree = DomTree::new();
    let nodes = HtmlParser::new().parse_fragment(&mut tree, markup).unwrap();
    assert_eq!(outer_html(&tree, nodes[0]), markup);
}

#[test]
fn test_dropping_whitespace_is_opt_in() {
    let doc = HtmlParser::dropping_whitespace()
        .parse("<p><b>a</b> <i>b</i></p>")
        .unwrap();
    let p = doc.query_selector("p").unwrap().unwrap();
    assert_eq!(doc.tree().text_content(p), "ab");
}
