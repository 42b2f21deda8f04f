//! Source hygiene for the canvas engine and its Leptos host.
//!
//! Each rule is a literal pattern with a zero budget over production sources;
//! `*_test.rs` modules are skipped. A failure lists the offending files.

use std::fs;
use std::path::{Path, PathBuf};

struct Rule {
    pattern: &'static str,
    hint: &'static str,
}

const fn rule(pattern: &'static str, hint: &'static str) -> Rule {
    Rule { pattern, hint }
}

/// Rules for the engine crate, where a panic takes down the wasm module.
const ENGINE_RULES: &[Rule] = &[
    rule(".unwrap()", "propagate with `?` or match"),
    rule(".expect(", "propagate with `?` or match"),
    rule("panic!(", "return a CanvasError"),
    rule("unreachable!(", "make the state unrepresentable"),
    rule("todo!(", "finish the stub"),
    rule("unimplemented!(", "finish the stub"),
    rule("let _ =", "inspect or log the error"),
    rule(".ok()", "inspect or log the error"),
    rule("println!(", "use log::debug!"),
    rule("dbg!(", "use log::debug!"),
    rule("#[allow(dead_code)]", "delete the dead code"),
];

/// Rules for the host crate, which owns browser callbacks.
const HOST_RULES: &[Rule] = &[
    rule(".forget()", "keep the Closure alive in a slot released by on_cleanup"),
    rule(".unwrap()", "propagate or warn!"),
    rule(".expect(", "propagate or warn!"),
];

fn crate_src(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(relative)
}

fn collect_sources(dir: &Path, out: &mut Vec<(String, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|entry| entry.path()) {
        if path.is_dir() {
            collect_sources(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs") {
            let name = path.to_string_lossy().to_string();
            if name.ends_with("_test.rs") {
                continue;
            }
            if let Ok(content) = fs::read_to_string(&path) {
                out.push((name, content));
            }
        }
    }
}

/// Offending `path:line` locations for each rule, keyed by pattern.
fn violations(dir: &Path, rules: &[Rule]) -> Vec<String> {
    let mut files = Vec::new();
    collect_sources(dir, &mut files);
    assert!(!files.is_empty(), "no sources found under {}", dir.display());

    let mut found = Vec::new();
    for rule in rules {
        for (path, content) in &files {
            for (idx, line) in content.lines().enumerate() {
                // `println!(` also matches `eprintln!(`, both are banned.
                if line.contains(rule.pattern) {
                    found.push(format!("  {path}:{}: `{}` ({})", idx + 1, rule.pattern, rule.hint));
                }
            }
        }
    }
    found
}

#[test]
fn engine_sources_stay_clean() {
    let found = violations(&crate_src("src"), ENGINE_RULES);
    assert!(found.is_empty(), "engine hygiene violations:\n{}", found.join("\n"));
}

#[test]
fn host_sources_release_their_callbacks() {
    let found = violations(&crate_src("../client/src"), HOST_RULES);
    assert!(found.is_empty(), "host hygiene violations:\n{}", found.join("\n"));
}
