use anchormark::{resolve_anchor_source, Flavor, ParserProfile, ReferenceMap};

fn resolve(flavor: Flavor, input: &str) -> String {
    resolve_anchor_source(input, &flavor.profile(), &ReferenceMap::new()).unwrap()
}

#[test]
fn flavor_names_parse() {
    for flavor in Flavor::ALL {
        assert_eq!(flavor.name().parse::<Flavor>(), Ok(flavor));
        assert_eq!(flavor.to_string().to_uppercase().parse::<Flavor>(), Ok(flavor));
    }
    assert_eq!("gfm".parse::<Flavor>(), Ok(Flavor::GitHub));
    assert_eq!("CommonMark".parse::<Flavor>(), Ok(Flavor::Cmark));
    assert_eq!("glfm".parse::<Flavor>(), Ok(Flavor::GitLab));

    let err = "markdown.pl".parse::<Flavor>().unwrap_err();
    assert_eq!(err.to_string(), "unknown flavor `markdown.pl`");
}

#[test]
fn presets() {
    assert_eq!(Flavor::Cmark.profile(), ParserProfile::default());

    let github = Flavor::GitHub.profile();
    assert!(github.is_disallowed_tag(b"script"));
    assert!(!github.smart && !github.strict);
    assert_eq!(github, Flavor::Commonmarker.profile());

    assert!(Flavor::GitLab.profile().is_disallowed_tag(b"TITLE"));
    assert!(Flavor::GitLab.profile().strict);
    assert!(!Flavor::Goldmark.profile().is_disallowed_tag(b"title"));
    assert!(Flavor::Redcarpet.profile().smart);

    for flavor in Flavor::ALL {
        assert_eq!(flavor.profile().max_label_length, 999, "{flavor}");
    }
}

#[test]
fn same_inline_grammar_everywhere() {
    let input = "**Bold** and *em* with [link](/x) and `code`";
    for flavor in Flavor::ALL {
        assert_eq!(resolve(flavor, input), "Bold and em with link and code", "{flavor}");
    }
}

#[test]
fn disallowed_tags_differ_by_flavor() {
    let input = "<title>Page</title>";
    assert_eq!(resolve(Flavor::Cmark, input), "Page");
    assert_eq!(resolve(Flavor::Goldmark, input), "Page");
    assert_eq!(resolve(Flavor::Redcarpet, input), "Page");
    assert_eq!(resolve(Flavor::GitHub, input), input);
    assert_eq!(resolve(Flavor::GitLab, input), input);
    assert_eq!(resolve(Flavor::Commonmarker, input), input);
}

#[test]
fn smart_punctuation_differs_by_flavor() {
    let input = "It's 'quoted' -- ok...";
    assert_eq!(resolve(Flavor::Redcarpet, input), "It’s ‘quoted’ – ok…");
    for flavor in [Flavor::Cmark, Flavor::GitHub, Flavor::GitLab, Flavor::Commonmarker, Flavor::Goldmark] {
        assert_eq!(resolve(flavor, input), input, "{flavor}");
    }
}

#[test]
fn profiles_are_shareable_across_threads() {
    let profile = Flavor::GitHub.profile();
    let refs = ReferenceMap::new();
    let headings = ["*one*", "[two](/2)", "`three`", "<b>four</b>"];

    let results: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = headings
            .iter()
            .map(|h| scope.spawn(|| resolve_anchor_source(h, &profile, &refs).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(results, ["one", "two", "three", "four"]);
}
