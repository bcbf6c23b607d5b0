//! Source hygiene for the canvas crate.
//!
//! Scans production files under `src/` (sibling `*_test.rs` files excluded)
//! for patterns that either crash a browser tab or drop an error on the floor.
//! Every rule has a budget of zero; the drawing session logs and swallows
//! surface errors explicitly instead.

use std::fs;
use std::path::{Path, PathBuf};

struct Rule {
    pattern: &'static str,
    budget: usize,
    why: &'static str,
}

const RULES: &[Rule] = &[
    Rule { pattern: ".unwrap()", budget: 0, why: "panics inside the wasm module" },
    Rule { pattern: ".expect(", budget: 0, why: "panics inside the wasm module" },
    Rule { pattern: "panic!(", budget: 0, why: "panics inside the wasm module" },
    Rule { pattern: "unreachable!(", budget: 0, why: "panics inside the wasm module" },
    Rule { pattern: "todo!(", budget: 0, why: "unfinished code path" },
    Rule { pattern: "unimplemented!(", budget: 0, why: "unfinished code path" },
    Rule { pattern: "let _ =", budget: 0, why: "discards a result without logging it" },
    Rule { pattern: ".ok()", budget: 0, why: "discards an error without logging it" },
    Rule { pattern: "#[allow(dead_code)]", budget: 0, why: "hides unused code" },
    Rule { pattern: "println!(", budget: 0, why: "use the log facade" },
    Rule { pattern: "eprintln!(", budget: 0, why: "use the log facade" },
];

fn production_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            production_files(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs")
            && !path.to_string_lossy().ends_with("_test.rs")
        {
            out.push(path);
        }
    }
}

fn violations(rule: &Rule, files: &[(PathBuf, String)]) -> Vec<String> {
    files
        .iter()
        .flat_map(|(path, content)| {
            content
                .lines()
                .enumerate()
                .filter(|(_, line)| !line.trim_start().starts_with("//") && line.contains(rule.pattern))
                .map(move |(n, line)| format!("  {}:{}: {}", path.display(), n + 1, line.trim()))
        })
        .collect()
}

#[test]
fn production_sources_stay_within_budgets() {
    let mut paths = Vec::new();
    production_files(Path::new("src"), &mut paths);
    assert!(!paths.is_empty(), "no sources found; run from the crate root");

    let files: Vec<(PathBuf, String)> = paths
        .into_iter()
        .filter_map(|p| fs::read_to_string(&p).map(|c| (p, c)).ok())
        .collect();

    let mut report = Vec::new();
    for rule in RULES {
        let hits = violations(rule, &files);
        if hits.len() > rule.budget {
            report.push(format!(
                "`{}` found {} time(s), budget {} ({}):\n{}",
                rule.pattern,
                hits.len(),
                rule.budget,
                rule.why,
                hits.join("\n")
            ));
        }
    }
    assert!(report.is_empty(), "hygiene violations:\n{}", report.join("\n\n"));
}
