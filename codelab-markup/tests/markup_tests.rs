use codelab_markup::{
    build_preview_document, evaluate, extract_markup, grade_source, load_test_cases,
    parse_test_cases, MarkupError, TestCase, TestSummary,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;

fn get_fixture_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("fixtures");
    path.push(filename);
    path
}

fn read_fixture(filename: &str) -> String {
    fs::read_to_string(get_fixture_path(filename)).unwrap()
}

fn homepage_tests() -> Vec<TestCase> {
    load_test_cases(&get_fixture_path("homepage-tests.yaml")).unwrap()
}

// Fixture files
#[test]
fn test_homepage_solution_passes() {
    let results = grade_source(&read_fixture("homepage-solution.jsx"), &homepage_tests());
    let summary = TestSummary::of(&results);
    assert!(summary.all_passed(), "results: {:?}", results);
    assert_eq!(summary.total, 4);
}

#[test]
fn test_homepage_starter_fails_every_case() {
    let results = grade_source(&read_fixture("homepage-starter.jsx"), &homepage_tests());
    assert_eq!(TestSummary::of(&results).passed, 0);
    assert_eq!(results[0].message, "header not found");
    assert_eq!(results[3].message, "h1 not found");
}

#[test]
fn test_starter_comment_is_removed() {
    assert_eq!(extract_markup(&read_fixture("homepage-starter.jsx")), "<div>\n      \n    </div>");
}

#[test]
fn test_guarded_render_uses_parenthesized_return() {
    assert_eq!(extract_markup(&read_fixture("guarded-render.jsx")), "<p>Hi</p>");
}

#[test]
fn test_invalid_test_file_is_an_error() {
    let result = load_test_cases(&get_fixture_path("invalid-tests.yaml"));
    assert!(matches!(result, Err(MarkupError::YamlError(_))));
}

#[test]
fn test_missing_test_file_is_an_error() {
    let result = load_test_cases(&get_fixture_path("does-not-exist.yaml"));
    assert!(matches!(result, Err(MarkupError::Io { .. })));
}

// Extraction properties
#[test]
fn test_well_formed_return_yields_trimmed_inner_markup() {
    let inners = [
        "<p>x</p>",
        "\n    <ul>\n      <li>a</li>\n    </ul>\n  ",
        "  <Fragment><b>y</b></Fragment>  ",
    ];
    let expected = ["<p>x</p>", "<ul>\n      <li>a</li>\n    </ul>", "<b>y</b>"];
    for (inner, want) in inners.iter().zip(expected) {
        let source = format!("function C() {{\n  return ({});\n}}", inner);
        assert_eq!(extract_markup(&source), want);
    }
}

#[test]
fn test_source_without_return_is_cleaned_verbatim() {
    let sources = [
        "<section><h2>Hi</h2></section>",
        "  const x = 1;\n",
        "<div>{/* gone */}<span>kept</span></div>\n",
    ];
    let expected = [
        "<section><h2>Hi</h2></section>",
        "const x = 1;",
        "<div><span>kept</span></div>",
    ];
    for (source, want) in sources.iter().zip(expected) {
        assert_eq!(extract_markup(source), want);
    }
}

// Evaluation properties
#[test]
fn test_evaluation_is_repeatable() {
    let markup = "<div><header></header><h1>Hello</h1></div>";
    let cases = homepage_tests();
    assert_eq!(evaluate(markup, &cases), evaluate(markup, &cases));
}

#[test]
fn test_welcome_scenario_passes() {
    let cases = vec![TestCase::dom_exists("header"), TestCase::dom_text("h1", "Welcome")];
    let results = evaluate("<div><header></header><h1>Welcome</h1></div>", &cases);
    assert!(results.iter().all(|r| r.passed));
}

#[test]
fn test_hello_scenario_fails_both() {
    let cases = vec![TestCase::dom_exists("header"), TestCase::dom_text("h1", "Welcome")];
    let results = evaluate("<div><h1>Hello</h1></div>", &cases);
    assert_eq!(results[0].message, "header not found");
    assert!(!results[0].passed);
    assert_eq!(results[1].message, "h1 text must be \"Welcome\"");
    assert!(!results[1].passed);
}

#[test]
fn test_yaml_with_unsupported_cases() {
    let yaml = "- type: unit\n  file: a.test.js\n- type: dom\n  selector: p\n  exists: true\n";
    let cases = parse_test_cases(yaml).unwrap();
    let results = evaluate("<p>x</p>", &cases);
    assert!(!results[0].passed);
    assert_eq!(results[0].message, "unsupported test type");
    assert!(results[1].passed);
}

// Preview
#[test]
fn test_preview_wraps_extracted_markup() {
    let markup = extract_markup(&read_fixture("homepage-solution.jsx"));
    let doc = build_preview_document(&markup);
    assert!(doc.contains(&markup));
    assert!(doc.contains("<title>Live Preview</title>"));
}
