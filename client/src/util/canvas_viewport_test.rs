use super::*;

#[test]
fn image_source_trims_url() {
    assert_eq!(image_source("  /plans/level-1.png "), Some("/plans/level-1.png"));
}

#[test]
fn blank_image_source_is_none() {
    assert_eq!(image_source(""), None);
    assert_eq!(image_source("   "), None);
}

#[test]
fn viewer_role_follows_read_only_flag() {
    assert_eq!(viewer_role(true), ViewerRole::ReadOnly);
    assert_eq!(viewer_role(false), ViewerRole::Interactive);
}

#[test]
fn loaded_image_is_measured() {
    assert!(should_measure(true, 2400, 1800));
}

#[test]
fn pending_image_is_not_measured_with_previous_size() {
    // A new source is loading; the element still reports the old 800x600.
    assert!(!should_measure(false, 800, 600));
}

#[test]
fn broken_image_is_not_measured() {
    assert!(!should_measure(true, 0, 0));
    assert!(!should_measure(true, 800, 0));
}
