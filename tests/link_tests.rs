use anchormark::{resolve_anchor_source, ParserProfile, ReferenceMap};

fn resolve(input: &str) -> String {
    resolve_with(input, &ReferenceMap::new())
}

fn resolve_with(input: &str, refs: &ReferenceMap) -> String {
    resolve_anchor_source(input, &ParserProfile::default(), refs).unwrap()
}

fn refs() -> ReferenceMap {
    let mut refs = ReferenceMap::new();
    refs.insert("foo", "/foo", None);
    refs.insert("Bar Baz", "/bar", Some("title".to_string()));
    refs.insert("ΑΓΩ", "/greek", None);
    refs
}

// Inline links

#[test]
fn inline_link_unwraps_to_text() {
    assert_eq!(resolve("[bar](/url)"), "bar");
    assert_eq!(resolve("See [the docs](https://docs.rs \"Docs\") now"), "See the docs now");
    assert_eq!(resolve("[link](</my uri>)"), "link");
    assert_eq!(resolve("[link](   /uri\n  'title'  )"), "link");
    assert_eq!(resolve("[empty]()"), "empty");
}

#[test]
fn destinations_with_parentheses() {
    assert_eq!(resolve("[link](foo(and(bar)))"), "link");
    assert_eq!(resolve("[link](foo\\(and\\(bar\\))"), "link");
    assert_eq!(resolve("[link](foo(and(bar))"), "[link](foo(and(bar))");
}

#[test]
fn invalid_inline_links_stay_literal() {
    assert_eq!(resolve("[link](/my uri)"), "[link](/my uri)");
    // `<foo\nbar>` is still a valid raw HTML tag
    assert_eq!(resolve("[link](<foo\nbar>)"), "[link]()");
    assert_eq!(resolve("[link] (/uri)"), "[link] (/uri)");
    assert_eq!(resolve("[link](/url \"title)"), "[link](/url \"title)");
}

#[test]
fn images_keep_alt_text() {
    assert_eq!(resolve("![foo](/url)"), "foo");
    assert_eq!(resolve("![foo *bar*](train.jpg)"), "foo bar");
    assert_eq!(resolve("![foo ![bar](/b)](/f)"), "foo bar");
    assert_eq!(resolve("!not an image"), "!not an image");
}

// Nesting and precedence

#[test]
fn no_links_inside_links() {
    assert_eq!(resolve("[foo [bar](/uri)](/uri)"), "[foo bar](/uri)");
    assert_eq!(resolve("[foo *[bar [baz](/uri)](/uri)*](/uri)"), "[foo [bar baz](/uri)](/uri)");
    assert_eq!(resolve("[![moon](moon.jpg)](/uri)"), "moon");
}

#[test]
fn emphasis_inside_and_around_links() {
    assert_eq!(resolve("*foo [bar](/url)*"), "foo bar");
    assert_eq!(resolve("[link *foo **bar** `#`*](/uri)"), "link foo bar #");
    assert_eq!(resolve("*[foo*](/uri)"), "*foo*");
    assert_eq!(resolve("[foo *bar](baz*)"), "foo *bar");
}

#[test]
fn brackets_lose_to_code_and_html() {
    assert_eq!(resolve("[foo`](/uri)`"), "[foo](/uri)");
    assert_eq!(resolve("[foo<bar attr=\"](baz)\">"), "[foo");
    assert_eq!(resolve("[foo<https://example.com/?search=](uri)>"), "[foohttps://example.com/?search=](uri)");
}

#[test]
fn unbalanced_brackets() {
    assert_eq!(resolve("]["), "][");
    assert_eq!(resolve("[[]]"), "[[]]");
    assert_eq!(resolve("[a]b]"), "[a]b]");
    assert_eq!(resolve("[[a](b)"), "[a");
}

// Reference links

#[test]
fn full_reference() {
    let refs = refs();
    assert_eq!(resolve_with("[text][foo]", &refs), "text");
    assert_eq!(resolve_with("[text][BAR  baz]", &refs), "text");
    assert_eq!(resolve_with("[text][αγω]", &refs), "text");
    assert_eq!(resolve_with("[text][nope]", &refs), "[text][nope]");
}

#[test]
fn collapsed_and_shortcut_reference() {
    let refs = refs();
    assert_eq!(resolve_with("[foo][]", &refs), "foo");
    assert_eq!(resolve_with("[Foo]", &refs), "Foo");
    assert_eq!(resolve_with("[*foo*]", &refs), "[foo]");
    assert_eq!(resolve_with("![foo]", &refs), "foo");
    assert_eq!(resolve_with("[bar\n baz]", &refs), "bar\nbaz");
}

#[test]
fn inline_form_takes_precedence() {
    let refs = refs();
    assert_eq!(resolve_with("[foo](/inline)", &refs), "foo");
    assert_eq!(resolve_with("[foo](not a link)", &refs), "foo(not a link)");
}

#[test]
fn references_need_a_map() {
    assert_eq!(resolve("[foo]"), "[foo]");
    assert_eq!(resolve("[foo][]"), "[foo][]");
}

#[test]
fn label_length_cap() {
    let mut refs = ReferenceMap::new();
    let long = "x".repeat(20);
    refs.insert(&long, "/long", None);
    let input = format!("[{long}]");

    assert_eq!(resolve_with(&input, &refs), long);
    let capped = ParserProfile::default().with_max_label_length(10);
    // The heading text is longer than the cap too, so look at the scan only
    let tree = anchormark::scan(&input, &capped, &refs).unwrap();
    assert!(tree.ignore_ranges().is_empty());
}

// Autolinks

#[test]
fn autolinks_keep_address() {
    assert_eq!(resolve("<https://example.com>"), "https://example.com");
    assert_eq!(resolve("mail <foo@bar.example.com>"), "mail foo@bar.example.com");
    assert_eq!(resolve("<https://foo.bar/baz bim>"), "<https://foo.bar/baz bim>");
    assert_eq!(resolve("<foo.bar>"), "<foo.bar>");
    assert_eq!(resolve("[a <https://x.y> b](/u)"), "a https://x.y b");
}
