use playground_core::{expand, expand_candidate, suggest};
use playground_lang::{CURSOR_PLACEHOLDER, Language};
use pretty_assertions::assert_eq;

#[test]
fn test_bang_expands_to_boilerplate() {
    let expansion = expand("!", 1, Language::Markup).unwrap();
    let text = expansion.apply("!");

    assert!(text.starts_with("<!DOCTYPE html>"));
    assert!(!text.contains(CURSOR_PLACEHOLDER));
    let (before, after) = text.split_at(
        text.char_indices()
            .nth(expansion.cursor)
            .map(|(index, _)| index)
            .unwrap(),
    );
    assert!(before.ends_with("<body>\n  "));
    assert!(after.starts_with("\n</body>"));
}

#[test]
fn test_snippet_inside_line() {
    let text = "btn.ae";
    let expansion = expand(text, 6, Language::Script).unwrap();
    assert_eq!(
        expansion.apply(text),
        "btn.addEventListener('', (e) => {\n  \n});"
    );
    assert_eq!(expansion.cursor, "btn.addEventListener('".len());
}

#[test]
fn test_expansion_leaves_text_after_cursor() {
    let text = "<main>div</main>";
    let expansion = expand(text, 9, Language::Markup).unwrap();
    assert_eq!(expansion.apply(text), "<main><div></div></main>");
    assert_eq!(expansion.cursor, 11);
}

#[test]
fn test_snippet_without_placeholder_puts_cursor_at_end() {
    let text = ".box {\n  flex-center";
    let cursor = text.chars().count();
    let expansion = expand(text, cursor, Language::Style).unwrap();
    let expanded = expansion.apply(text);
    assert!(expanded.ends_with("align-items: center;"));
    assert_eq!(expansion.cursor, expanded.chars().count());
}

#[test]
fn test_candidate_resolution_per_language() {
    let markup = expand_candidate("scr", 3, Language::Markup, "script");
    assert_eq!(markup.apply("scr"), "<script></script>");
    assert_eq!(markup.cursor, 8);

    let style = expand_candidate("  bor", 5, Language::Style, "border-radius");
    assert_eq!(style.apply("  bor"), "  border-radius: ;");
    assert_eq!(style.cursor, 17);

    let script = expand_candidate("JS", 2, Language::Script, "JSON.parse");
    assert_eq!(script.apply("JS"), "JSON.parse");
    assert_eq!(script.cursor, 10);
}

#[test]
fn test_multibyte_prefix_offsets() {
    let text = "<p>日本</p>div";
    let cursor = text.chars().count();
    let expansion = expand(text, cursor, Language::Markup).unwrap();
    assert_eq!(expansion.apply(text), "<p>日本</p><div></div>");
    assert_eq!(expansion.cursor, 14);
}

#[test]
fn test_con_suggestions() {
    let candidates = suggest("let x = con", 11, Language::Script);
    assert_eq!(candidates, vec!["console.log", "const"]);
    assert!(
        candidates
            .iter()
            .all(|c| c.to_lowercase().starts_with("con"))
    );
}

#[test]
fn test_suggestions_are_case_insensitive() {
    assert_eq!(suggest("json", 4, Language::Script), vec!["JSON.parse"]);
    assert_eq!(suggest("BOR", 3, Language::Style), vec!["border", "border-radius"]);
}
