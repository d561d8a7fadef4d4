use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use mlstr::{Block, FormatArg};

const FIXTURE_SUFFIX: &str = ".test.txt";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Substitute `args` into the body.
    #[default]
    Format,
    /// Join `items` with the body as separator.
    Join,
    /// Concatenate each of `items` onto the body in turn.
    Concat,
    /// Split the body on the first of `items`.
    Split,
}

#[derive(Debug, Deserialize)]
pub struct TestConfig {
    /// Human-readable test description.
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub operation: Operation,

    /// Arguments for `format`.
    #[serde(default)]
    pub args: Vec<toml::Value>,

    /// Operands for `join`, `concat` and `split`.
    #[serde(default)]
    pub items: Vec<String>,

    /// Expected exact output.
    #[serde(default)]
    pub expect_output: Option<String>,

    /// Expected error — the error's Display string must contain this substring.
    #[serde(default)]
    pub expect_error: Option<String>,

    /// Expected row count of the result.
    #[serde(default)]
    pub expect_height: Option<usize>,
}

fn toml_arg_to_format_arg(val: &toml::Value) -> FormatArg {
    match val {
        toml::Value::Integer(n) => FormatArg::Int(*n),
        toml::Value::Float(f) => FormatArg::Float(*f),
        toml::Value::Boolean(b) => FormatArg::Bool(*b),
        toml::Value::String(s) => FormatArg::Str(s.clone()),
        toml::Value::Table(table) => match table.get("block") {
            Some(toml::Value::String(s)) => FormatArg::Block(Block::new(s.as_str())),
            _ => FormatArg::Str(val.to_string()),
        },
        other => FormatArg::Str(other.to_string()),
    }
}

/// Split a `.test.txt` file into its TOML config and body text.
///
/// The layout is `---\n<toml>\n---\n<body>\n`; the final newline ends the
/// file, not the block.
fn parse_test_file(content: &str) -> Result<(TestConfig, &str), String> {
    let rest = content
        .strip_prefix("---\n")
        .ok_or("missing opening --- frontmatter delimiter")?;
    let (toml_str, body) = rest
        .split_once("\n---\n")
        .ok_or("missing closing --- frontmatter delimiter")?;
    let body = body.strip_suffix('\n').unwrap_or(body);

    let config: TestConfig =
        toml::from_str(toml_str).map_err(|e| format!("TOML parse error: {}", e))?;

    Ok((config, body))
}

/// Apply the fixture's operation to its body.
fn execute(config: &TestConfig, body: &str) -> Result<Block, mlstr::Error> {
    let block = Block::new(body);
    match config.operation {
        Operation::Format => {
            let args: Vec<FormatArg> = config.args.iter().map(toml_arg_to_format_arg).collect();
            block.format(&args)
        }
        Operation::Join => Ok(block.join(&config.items)),
        Operation::Concat => Ok(config
            .items
            .iter()
            .fold(block, |acc, item| acc + item)),
        Operation::Split => {
            let sep = config.items.first().map(String::as_str).unwrap_or("\n");
            let rows = block.split(sep)?;
            Ok(Block::new(rows.join("\n")))
        }
    }
}

pub enum TestOutcome {
    Pass,
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
}

fn run_single_test(path: &Path) -> TestResult {
    // 1. Read file
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            return TestResult {
                path: path.to_path_buf(),
                description: None,
                outcome: TestOutcome::Fail(format!("cannot read file: {}", e)),
            };
        }
    };

    // 2. Parse frontmatter
    let (config, body) = match parse_test_file(&content) {
        Ok(pair) => pair,
        Err(e) => {
            return TestResult {
                path: path.to_path_buf(),
                description: None,
                outcome: TestOutcome::Fail(format!("frontmatter error: {}", e)),
            };
        }
    };

    let description = config.description.clone();
    tracing::debug!(path = %path.display(), operation = ?config.operation, "running fixture");

    // 3. Execute and check error/output expectations
    let result = execute(&config, body);
    let outcome = match (&config.expect_error, &config.expect_output, &result) {
        (Some(expected_err), _, Err(err)) => {
            let err_str = err.to_string();
            if err_str.contains(expected_err.as_str()) {
                None
            } else {
                Some(format!(
                    "expected error containing \"{}\", got: {}",
                    expected_err, err_str
                ))
            }
        }
        (Some(expected_err), _, Ok(_)) => Some(format!(
            "expected error containing \"{}\", but the operation succeeded",
            expected_err
        )),
        (None, _, Err(err)) => Some(format!("unexpected error: {}", err)),
        (None, Some(expected_output), Ok(block)) => {
            if block.text() == expected_output {
                None
            } else {
                Some(format!(
                    "output mismatch\n  expected: {:?}\n  actual:   {:?}",
                    expected_output,
                    block.text()
                ))
            }
        }
        (None, None, Ok(_)) => None,
    };

    if let Some(reason) = outcome {
        return TestResult {
            path: path.to_path_buf(),
            description,
            outcome: TestOutcome::Fail(reason),
        };
    }

    // 4. Check height expectation
    if let (Some(expected), Ok(block)) = (config.expect_height, &result) {
        if block.height() != expected {
            return TestResult {
                path: path.to_path_buf(),
                description,
                outcome: TestOutcome::Fail(format!(
                    "expected height {}, got {}",
                    expected,
                    block.height()
                )),
            };
        }
    }

    TestResult {
        path: path.to_path_buf(),
        description,
        outcome: TestOutcome::Pass,
    }
}

/// Discover fixture files grouped by category (subfolder relative to root).
/// Files directly in `root` get category "" (uncategorized).
fn discover_categorized(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    collect_tests(root, root, &mut categories);
    for files in categories.values_mut() {
        files.sort();
    }
    categories
}

fn collect_tests(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_tests(&path, root, out);
        } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.ends_with(FIXTURE_SUFFIX) {
                let category = path
                    .parent()
                    .and_then(|p| p.strip_prefix(root).ok())
                    .map(|p| p.to_string_lossy().replace('\\', "/"))
                    .unwrap_or_default();
                out.entry(category).or_default().push(path);
            }
        }
    }
}

fn paint(s: &str, code: &str, no_color: bool) -> String {
    if no_color {
        s.to_string()
    } else {
        format!("\x1b[{}m{}\x1b[0m", code, s)
    }
}

fn label_for(result: &TestResult) -> &str {
    result.description.as_deref().unwrap_or_else(|| {
        result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .and_then(|s| s.strip_suffix(FIXTURE_SUFFIX))
            .unwrap_or("?")
    })
}

fn print_failures(failures: &[TestResult]) {
    eprintln!();
    eprintln!("failures:");
    for f in failures {
        eprintln!();
        eprintln!("  --- {} ---", f.path.display());
        if let TestOutcome::Fail(reason) = &f.outcome {
            for line in reason.lines() {
                eprintln!("  {}", line);
            }
        }
    }
}

/// Run all fixtures under `path` (or a single file).
/// If `categories` is non-empty, only run tests in those categories.
/// Returns exit code: 0 = all pass, 1 = any failure.
pub fn run_tests(path: &Path, no_color: bool, categories: &[String]) -> i32 {
    let run_categories: BTreeMap<String, Vec<PathBuf>> = if path.is_file() {
        // Single file mode — ignore categories
        BTreeMap::from([(String::new(), vec![path.to_path_buf()])])
    } else {
        let all_categories = discover_categorized(path);
        if all_categories.is_empty() {
            eprintln!("no {} files found in {}", FIXTURE_SUFFIX, path.display());
            return 1;
        }
        if categories.is_empty() {
            all_categories
        } else {
            filter_categories(all_categories, categories)
        }
    };

    if run_categories.is_empty() {
        eprintln!("no matching categories found");
        return 1;
    }

    let mut passed = 0usize;
    let mut failures: Vec<TestResult> = Vec::new();

    for (cat, files) in &run_categories {
        if !path.is_file() {
            let header = if cat.is_empty() { "(root)" } else { cat.as_str() };
            eprintln!();
            eprintln!("{}", paint(header, "1", no_color));
        }

        for file in files {
            let result = run_single_test(file);
            match &result.outcome {
                TestOutcome::Pass => {
                    passed += 1;
                    eprintln!("  {}  {}", paint("PASS", "32", no_color), label_for(&result));
                }
                TestOutcome::Fail(_) => {
                    eprintln!("  {}  {}", paint("FAIL", "31", no_color), label_for(&result));
                    failures.push(result);
                }
            }
        }
    }

    if !failures.is_empty() {
        print_failures(&failures);
    }

    eprintln!();
    let failed = failures.len();
    if failed == 0 {
        eprintln!(
            "test result: {}. {} passed, 0 failed",
            paint("ok", "32", no_color),
            passed
        );
        0
    } else {
        eprintln!(
            "test result: {}. {} passed, {} failed (of {})",
            paint("FAILED", "31", no_color),
            passed,
            failed,
            passed + failed
        );
        1
    }
}

fn filter_categories(
    all_categories: BTreeMap<String, Vec<PathBuf>>,
    requested: &[String],
) -> BTreeMap<String, Vec<PathBuf>> {
    let mut filtered = BTreeMap::new();
    for requested in requested {
        let req = requested.trim_matches('/');
        let mut found = false;
        for (cat, files) in &all_categories {
            if cat == req || cat.starts_with(&format!("{}/", req)) {
                filtered.insert(cat.clone(), files.clone());
                found = true;
            }
        }
        if !found {
            eprintln!(
                "warning: category '{}' not found (available: {})",
                req,
                all_categories
                    .keys()
                    .map(|k| if k.is_empty() { "(root)" } else { k.as_str() })
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }
    filtered
}
