use super::*;

#[test]
fn map_button_covers_dom_values() {
    assert_eq!(map_button(0), CanvasButton::Primary);
    assert_eq!(map_button(1), CanvasButton::Middle);
    assert_eq!(map_button(2), CanvasButton::Secondary);
}

#[test]
fn map_button_falls_back_to_primary() {
    assert_eq!(map_button(4), CanvasButton::Primary);
    assert_eq!(map_button(-1), CanvasButton::Primary);
}

#[test]
fn map_modifiers_preserves_flags() {
    let mods = map_modifiers(true, false, true, false);
    assert!(mods.shift);
    assert!(!mods.ctrl);
    assert!(mods.alt);
    assert!(!mods.meta);
}

#[test]
fn drawing_keys_are_prevented_while_drawing() {
    let none = map_modifiers(false, false, false, false);
    assert!(should_prevent_default_key("Enter", none, true));
    assert!(should_prevent_default_key("Escape", none, true));
}

#[test]
fn undo_redo_chords_are_prevented_while_drawing() {
    let ctrl = map_modifiers(false, true, false, false);
    let cmd_shift = map_modifiers(true, false, false, true);
    assert!(should_prevent_default_key("z", ctrl, true));
    assert!(should_prevent_default_key("y", ctrl, true));
    assert!(should_prevent_default_key("Z", cmd_shift, true));
}

#[test]
fn keys_pass_through_when_not_drawing() {
    let ctrl = map_modifiers(false, true, false, false);
    let none = map_modifiers(false, false, false, false);
    assert!(!should_prevent_default_key("z", ctrl, false));
    assert!(!should_prevent_default_key("Escape", none, false));
}

#[test]
fn ordinary_keys_pass_through() {
    let none = map_modifiers(false, false, false, false);
    assert!(!should_prevent_default_key("z", none, true));
    assert!(!should_prevent_default_key("Tab", none, true));
    assert!(!should_prevent_default_key("Backspace", none, true));
}
