use crate::{rename_html, Diagnostics, RenameError, RenameMap};

fn html_with(map: &RenameMap, source: &str) -> (String, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let renamed = rename_html(map, source, &mut diagnostics).unwrap();
    (renamed, diagnostics)
}

fn html(map: &RenameMap, source: &str) -> String {
    let (renamed, diagnostics) = html_with(map, source);
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    renamed
}

fn map(pairs: &[(&str, &str)]) -> RenameMap {
    pairs.iter().copied().collect()
}

#[test]
fn test_empty_map_is_identity() {
    let sources = [
        "<dom-module id=\"x-foo\"><template><div on-tap=\"handle\" title=\"[[title]]\">{{value}}</div></template></dom-module>",
        "<link rel=\"import\" href=\"polymer.html\">\n<polymer-element name=\"x-bar\" attributes=\"a b\"><template><span>{{a.b}}</span></template></polymer-element>\n",
        "<!DOCTYPE html><html><head><title>t</title></head><body><p>plain</p></body></html>",
    ];
    for source in sources {
        assert_eq!(html(&RenameMap::new(), source), source);
    }
}

#[test]
fn test_untouched_markup_keeps_its_spelling() {
    let renames = map(&[("other", "o")]);
    for source in [
        "<dom-module id=\"x\"><template><p title=\"{{ f(a,b) }}\">{{ value }} [[x  +  y]] {{f(a,b)}}</p></template></dom-module>",
        "<dom-module id=\"x\"><script>Polymer({is: 'x', f: function(){ return this.value; }});</script></dom-module>",
        "<!--\n@license\n-->\n<link rel=\"import\" href=\"polymer.html\">\n<dom-module id=\"x\"><template>{{value}}</template></dom-module>\n",
    ] {
        assert_eq!(html(&renames, source), source);
        assert_eq!(html(&RenameMap::new(), source), source);
    }
}

#[test]
fn test_text_without_directives_is_unchanged() {
    let renames = map(&[("value", "v"), ("plain", "p")]);
    let source = "<dom-module id=\"x\"><template><p>plain value text</p></template></dom-module>";
    assert_eq!(html(&renames, source), source);
}

#[test]
fn test_directives_in_text_and_attributes() {
    let renames = map(&[("value", "v"), ("longName", "rb"), ("a", "renamedA")]);
    assert_eq!(
        html(
            &renames,
            "<dom-module id=\"x\"><template><p title=\"Hi {{value}}\">{{exp.longName.a}} and {{longNameChanged}}</p></template></dom-module>",
        ),
        "<dom-module id=\"x\"><template><p title=\"Hi {{v}}\">{{exp.rb.renamedA}} and {{rbChanged}}</p></template></dom-module>"
    );
}

#[test]
fn test_event_attributes_use_whole_string_lookup() {
    let source = "<dom-module id=\"x\"><template><button on-tap=\"a.b\"></button></template></dom-module>";
    assert_eq!(
        html(&map(&[("a.b", "x")]), source),
        "<dom-module id=\"x\"><template><button on-tap=\"x\"></button></template></dom-module>"
    );
    assert_eq!(html(&map(&[("a", "x")]), source), source);
}

#[test]
fn test_two_way_binding_keeps_event_name() {
    let renames = map(&[("value", "v"), ("input", "i")]);
    assert_eq!(
        html(
            &renames,
            "<dom-module id=\"x\"><template><input value=\"{{value::input}}\"></template></dom-module>",
        ),
        "<dom-module id=\"x\"><template><input value=\"{{v::input}}\"></template></dom-module>"
    );
    assert_eq!(
        html(
            &renames,
            "<polymer-element name=\"x-el\"><template><input value=\"{{value::input}}\"></template></polymer-element>",
        ),
        "<polymer-element name=\"x-el\"><template><input value=\"{{v::input}}\"></template></polymer-element>"
    );
}

#[test]
fn test_modern_generation() {
    let renames = map(&[("firstName", "lastName"), ("value", "v")]);
    assert_eq!(
        html(
            &renames,
            "<dom-module name=\"x-foo\"><template><span>[[value]]</span></template></dom-module><x-foo first-name=\"{{value}}\" on-first-name=\"x\"></x-foo>",
        ),
        "<dom-module name=\"x-foo\"><template><span>[[v]]</span></template></dom-module><x-foo last-name=\"{{value}}\" on-first-name=\"x\"></x-foo>"
    );
}

#[test]
fn test_legacy_generation() {
    let renames = map(&[("firstName", "lastName"), ("value", "v")]);
    assert_eq!(
        html(
            &renames,
            "<polymer-element name=\"x-foo\" attributes=\"firstName other\"><template><span title=\"{{value}}\">[[value]]</span></template></polymer-element><x-foo first-name=\"x\"></x-foo>",
        ),
        "<polymer-element name=\"x-foo\" attributes=\"lastName other\"><template><span title=\"{{v}}\">[[value]]</span></template></polymer-element><x-foo first-name=\"x\"></x-foo>"
    );
}

#[test]
fn test_published_attributes_untouched_without_renames() {
    let source = "<polymer-element name=\"x-foo\" attributes=\"one  two\" title=\"{{value}}\"></polymer-element>";
    assert_eq!(html(&map(&[("value", "v")]), source), source);
}

#[test]
fn test_markup_outside_containers_is_unchanged() {
    let renames = map(&[("value", "v")]);
    let source = "<div title=\"{{value}}\">{{value}}</div><dom-module id=\"x\"><template>{{value}}</template></dom-module>";
    assert_eq!(
        html(&renames, source),
        "<div title=\"{{value}}\">{{value}}</div><dom-module id=\"x\"><template>{{v}}</template></dom-module>"
    );
}

#[test]
fn test_inline_script_renames_properties() {
    let renames = map(&[("symbolA", "b"), ("symbolB", "c")]);
    assert_eq!(
        html(
            &renames,
            "<dom-module id=\"x\"><script>Polymer({is: 'x', properties: {p: {observer: 'symbolA'}}, f: function() { var symbolB = this.symbolB; }});</script></dom-module>",
        ),
        "<dom-module id=\"x\"><script>Polymer({is: \"x\",properties: { p: { observer: \"b\" } },f: function() {var symbolB = this.c;}});</script></dom-module>"
    );
}

#[test]
fn test_style_text_is_left_alone() {
    let renames = map(&[("value", "v")]);
    assert_eq!(
        html(
            &renames,
            "<dom-module id=\"x\"><style title=\"{{value}}\">{{value}}</style></dom-module>",
        ),
        "<dom-module id=\"x\"><style title=\"{{v}}\">{{value}}</style></dom-module>"
    );
}

#[test]
fn test_broken_directive_is_reported() {
    let renames = map(&[("value", "v")]);
    let (renamed, diagnostics) = html_with(
        &renames,
        "<dom-module id=\"x\"><template><p>{{a +* b}} {{value}}</p></template></dom-module>",
    );
    assert_eq!(
        renamed,
        "<dom-module id=\"x\"><template><p>{{a +* b}} {{v}}</p></template></dom-module>"
    );
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics.iter().next().unwrap().source, "a +* b");
}

#[test]
fn test_broken_script_fails_the_document() {
    let mut diagnostics = Diagnostics::new();
    let result = rename_html(
        &RenameMap::new(),
        "<dom-module id=\"x\"><script>var = ;</script></dom-module>",
        &mut diagnostics,
    );
    assert!(matches!(result, Err(RenameError::Parse(_))));
}

#[test]
fn test_full_document_keeps_wrappers() {
    let renames = map(&[("value", "v")]);
    assert_eq!(
        html(
            &renames,
            "<!DOCTYPE html><html><head></head><body><dom-module id=\"x\"><template>{{value}}</template></dom-module></body></html>",
        ),
        "<!DOCTYPE html><html><head></head><body><dom-module id=\"x\"><template>{{v}}</template></dom-module></body></html>"
    );
}
