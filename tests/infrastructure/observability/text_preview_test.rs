use vaani::infrastructure::observability::preview_text;

#[test]
fn given_short_text_when_previewing_then_returns_unchanged() {
    assert_eq!(preview_text("  TOTAL 42 "), "TOTAL 42");
}

#[test]
fn given_blank_text_when_previewing_then_marks_empty() {
    assert_eq!(preview_text("   "), "[EMPTY]");
}

#[test]
fn given_long_text_when_previewing_then_truncates_with_count() {
    let text = "न".repeat(150);

    let preview = preview_text(&text);

    assert!(preview.starts_with(&"न".repeat(100)));
    assert!(preview.ends_with("(150 chars total)"));
}

#[test]
fn given_text_at_limit_when_previewing_then_keeps_every_char() {
    let text = "a".repeat(100);

    assert_eq!(preview_text(&text), text);
}
