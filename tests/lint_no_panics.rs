//! Lint: library and shell code must not panic on bad input.
//!
//! Scans every `.rs` file under `src/` for `.unwrap()` and `.expect(` calls
//! outside test code. Scanning of a file stops at the first inline
//! `#[cfg(test)] mod name {` block, since test modules sit at the bottom of
//! each file. A `#[cfg(test)] mod name;` declaration does not stop the scan.
//! Files that are test-only as a whole are listed in `TEST_ONLY_FILES`.

use std::fs;
use std::path::Path;

/// Modules compiled only under `#[cfg(test)]`.
const TEST_ONLY_FILES: &[&str] = &["simulator.rs"];

/// True for `mod name {`, the start of an inline module body.
fn opens_inline_module(line: &str) -> bool {
    let line = line.strip_prefix("pub ").unwrap_or(line);
    line.starts_with("mod ") && line.trim_end().ends_with('{')
}

/// True when the `#[cfg(test)]` at `lines[i]` gates an inline module, either
/// on the same line or on the next non-empty one.
fn starts_test_module(lines: &[&str], i: usize) -> bool {
    let rest = lines[i].trim().trim_start_matches("#[cfg(test)]").trim();
    if !rest.is_empty() {
        return opens_inline_module(rest);
    }
    lines[i + 1..]
        .iter()
        .map(|l| l.trim())
        .find(|l| !l.is_empty())
        .is_some_and(opens_inline_module)
}

/// Scan non-test source for panicking calls.
fn find_panicking_calls(source: &str) -> Vec<(usize, String)> {
    let mut violations = Vec::new();
    let lines: Vec<&str> = source.lines().collect();

    for (line_num_0, line) in lines.iter().enumerate() {
        let trimmed = line.trim();

        if trimmed.starts_with("#[cfg(test)]") && starts_test_module(&lines, line_num_0) {
            break;
        }
        // Skip comments
        if trimmed.starts_with("//") {
            continue;
        }

        if line.contains(".unwrap()") || line.contains(".expect(") {
            violations.push((line_num_0 + 1, trimmed.to_string()));
        }
    }

    violations
}

#[test]
fn no_unwrap_or_expect_outside_tests() {
    let src_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
    let mut all_violations = Vec::new();

    visit_source_files(&src_dir, &mut all_violations);

    if !all_violations.is_empty() {
        let mut msg = String::from(
            "Found unwrap()/expect() in non-test code.\n\
             Propagate the error with `?` or fall back to a default instead.\n\n",
        );
        for (file, line_num, line) in &all_violations {
            msg.push_str(&format!("  {}:{}: {}\n", file, line_num, line));
        }
        panic!("{}", msg);
    }
}

fn visit_source_files(dir: &Path, violations: &mut Vec<(String, usize, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            visit_source_files(&path, violations);
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.ends_with(".rs") || TEST_ONLY_FILES.contains(&name) {
            continue;
        }
        let Ok(source) = fs::read_to_string(&path) else {
            continue;
        };
        let display_path = path.display().to_string();
        for (line_num, line) in find_panicking_calls(&source) {
            violations.push((display_path.clone(), line_num, line));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_unwrap() {
        let source = "let x = parse(s).unwrap();";
        assert_eq!(find_panicking_calls(source).len(), 1);
    }

    #[test]
    fn detects_expect() {
        let source = r#"let x = parse(s).expect("valid");"#;
        assert_eq!(find_panicking_calls(source).len(), 1);
    }

    #[test]
    fn allows_fallbacks() {
        let source = "let x = a.unwrap_or(0);\nlet y = b.unwrap_or_default();\nlet z = c.unwrap_or_else(f);";
        assert!(find_panicking_calls(source).is_empty());
    }

    #[test]
    fn ignores_comments() {
        let source = "// value.unwrap() is fine here";
        assert!(find_panicking_calls(source).is_empty());
    }

    #[test]
    fn stops_at_test_module() {
        let source = "fn f() {}\n#[cfg(test)]\nmod tests {\n    fn g() { x.unwrap(); }\n}";
        assert!(find_panicking_calls(source).is_empty());
    }

    #[test]
    fn stops_at_test_module_on_one_line() {
        let source = "fn f() {}\n#[cfg(test)] mod proptests {\n    fn g() { x.unwrap(); }\n}";
        assert!(find_panicking_calls(source).is_empty());
    }

    #[test]
    fn test_only_module_declaration_keeps_scanning() {
        let source = "#[cfg(test)]\nmod simulator;\n\nfn f() { x.unwrap(); }";
        let found = find_panicking_calls(source);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, 4);
    }

    #[test]
    fn test_only_module_declaration_on_one_line_keeps_scanning() {
        let source = "#[cfg(test)] mod simulator;\nfn f() { x.expect(\"set\"); }";
        assert_eq!(find_panicking_calls(source).len(), 1);
    }

    #[test]
    fn test_only_helper_function_keeps_scanning() {
        let source = "#[cfg(test)]\nfn helper() {}\nfn f() { x.unwrap(); }";
        assert_eq!(find_panicking_calls(source).len(), 1);
    }

    #[test]
    fn engine_module_is_scanned_past_its_test_only_declarations() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("src/economy/mod.rs");
        let source = fs::read_to_string(path).unwrap();
        let injected = source.replacen(
            "pub struct Engine {",
            "fn injected() { None::<u8>.unwrap(); }\npub struct Engine {",
            1,
        );
        assert_ne!(injected, source);
        assert_eq!(find_panicking_calls(&injected).len(), 1);
    }

    #[test]
    fn reports_line_numbers() {
        let source = "fn f() {}\nlet x = y.unwrap();";
        assert_eq!(find_panicking_calls(source)[0].0, 2);
    }
}
