//! Error reporting and recovery tests for the robolang parser, plus a
//! property test that generated well-formed programs always parse cleanly.

use proptest::prelude::*;
use robolang_parser::parse_source;
use robolang_types::{ErrorCode, ParseErrors, MAX_ERRORS};

fn errors(source: &str) -> ParseErrors {
    let result = parse_source("test.robo", source);
    assert_eq!(
        result.program.is_some(),
        !result.errors.has_errors(),
        "program must be present exactly when there are no errors"
    );
    result.errors
}

fn codes(source: &str) -> Vec<ErrorCode> {
    errors(source).iter().map(|e| e.code).collect()
}

// ─────────────────────────────────────────────────────────────────────
// Braces
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_unclosed_brace() {
    let errs = errors("2{ R R");
    assert_eq!(errs.total_errors, 1);
    let e = &errs.errors[0];
    assert_eq!(e.code, ErrorCode::UNCLOSED_BRACE);
    assert_eq!((e.span.start_line, e.span.start_col), (1, 2));
    assert_eq!(e.source_line, "2{ R R");
    assert!(e.suggestion.is_some());
}

#[test]
fn test_nested_unclosed_braces_report_innermost_first() {
    let errs = errors("2{ 3{ R");
    assert_eq!(
        errs.iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ErrorCode::UNCLOSED_BRACE, ErrorCode::UNCLOSED_BRACE]
    );
    let cols: Vec<_> = errs.iter().map(|e| e.span.start_col).collect();
    assert_eq!(cols, vec![5, 2]);
}

#[test]
fn test_unmatched_close_brace() {
    let errs = errors("R } L");
    assert_eq!(errs.total_errors, 1);
    assert_eq!(errs.errors[0].code, ErrorCode::UNMATCHED_CLOSE_BRACE);
    assert_eq!(errs.errors[0].span.start_col, 3);
}

#[test]
fn test_lone_open_brace() {
    assert_eq!(codes("{"), vec![ErrorCode::UNCLOSED_BRACE]);
}

// ─────────────────────────────────────────────────────────────────────
// Keywords
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_se_missing_condition() {
    assert_eq!(codes("se { A }"), vec![ErrorCode::MISSING_CONDITION]);
}

#[test]
fn test_enquanto_missing_condition_at_eof() {
    let errs = errors("A enquanto");
    assert_eq!(errs.errors[0].code, ErrorCode::MISSING_CONDITION);
    assert!(errs.errors[0].message.contains("end of file"));
}

#[test]
fn test_se_missing_block() {
    assert_eq!(codes("se sensor A"), vec![ErrorCode::MISSING_BLOCK]);
}

#[test]
fn test_senao_missing_block() {
    assert_eq!(codes("se sensor { A } senao B"), vec![ErrorCode::MISSING_BLOCK]);
}

#[test]
fn test_senao_without_se() {
    assert_eq!(codes("A senao { B }"), vec![ErrorCode::ELSE_WITHOUT_IF]);
}

#[test]
fn test_senao_after_loop_is_rejected() {
    assert_eq!(
        codes("enquanto x { A } senao { B }"),
        vec![ErrorCode::ELSE_WITHOUT_IF]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Repeats and invalid input
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_integer_without_block() {
    let errs = errors("3 R");
    assert_eq!(errs.total_errors, 1);
    assert_eq!(errs.errors[0].code, ErrorCode::MISSING_BLOCK);
    assert!(errs.errors[0].message.contains("repeat count 3"));
}

#[test]
fn test_integer_at_end_of_block() {
    assert_eq!(codes("2{ R 3 }"), vec![ErrorCode::MISSING_BLOCK]);
}

#[test]
fn test_oversized_repeat_count() {
    let errs = errors("99999999999{ R }");
    assert_eq!(errs.errors[0].code, ErrorCode::INVALID_TOKEN);
    assert!(errs.errors[0].message.contains("too large"));
}

#[test]
fn test_invalid_character() {
    let errs = errors("R ; L");
    assert_eq!(errs.total_errors, 1);
    assert_eq!(errs.errors[0].code, ErrorCode::INVALID_TOKEN);
    assert_eq!(errs.errors[0].message, "unexpected character ';'");
}

// ─────────────────────────────────────────────────────────────────────
// Recovery
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_multiple_independent_errors() {
    assert_eq!(
        codes("R ; se { L } } 4 F"),
        vec![
            ErrorCode::INVALID_TOKEN,
            ErrorCode::MISSING_CONDITION,
            ErrorCode::UNMATCHED_CLOSE_BRACE,
            ErrorCode::MISSING_BLOCK,
        ]
    );
}

#[test]
fn test_error_cap() {
    let errs = errors(&"} ".repeat(50));
    assert_eq!(errs.errors.len(), MAX_ERRORS);
    assert!(errs.total_errors >= MAX_ERRORS);
    assert!(errs.to_string().lines().count() <= MAX_ERRORS + 1);
}

#[test]
fn test_error_cap_with_missing_conditions() {
    let errs = errors(&"se {} ".repeat(50));
    assert!(errs.iter().all(|e| e.code == ErrorCode::MISSING_CONDITION));
    assert_eq!(errs.errors.len(), MAX_ERRORS);
    assert!(errs.total_errors >= MAX_ERRORS);
}

#[test]
fn test_invalid_run_resumes_at_next_statement() {
    // the whole run of ';' is skipped after the first report
    let errs = errors(";;;; R ;;;;");
    assert_eq!(errs.total_errors, 2);
}

#[test]
fn test_deeply_unclosed_blocks_are_counted_not_overflowed() {
    let errs = errors(&"{".repeat(20_000));
    assert_eq!(errs.errors.len(), MAX_ERRORS);
    assert_eq!(errs.total_errors, 20_000);
    assert!(errs.iter().all(|e| e.code == ErrorCode::UNCLOSED_BRACE));
}

#[test]
fn test_errors_render_with_position_and_code() {
    let errs = errors("R\n2{ R");
    assert_eq!(errs.to_string(), "2:2: E101 unclosed '{'");
}

// ─────────────────────────────────────────────────────────────────────
// Properties
// ─────────────────────────────────────────────────────────────────────

fn program_strategy() -> impl Strategy<Value = String> {
    let leaf = prop::sample::select(vec!["R", "L", "F", "A", "B"]).prop_map(String::from);
    let stmt = leaf.prop_recursive(4, 32, 4, |inner| {
        let body = prop::collection::vec(inner, 0..4).prop_map(|v| v.join(" "));
        prop_oneof![
            (0u32..5, body.clone()).prop_map(|(n, b)| format!("{n}{{ {b} }}")),
            (body.clone(), prop::option::of(body.clone())).prop_map(|(t, e)| match e {
                Some(e) => format!("se sensor {{ {t} }} senao {{ {e} }}"),
                None => format!("se sensor {{ {t} }}"),
            }),
            body.clone().prop_map(|b| format!("enquanto livre {{ {b} }}")),
            body.prop_map(|b| format!("{{ {b} }}")),
        ]
    });
    prop::collection::vec(stmt, 0..6).prop_map(|v| v.join(" "))
}

proptest! {
    #[test]
    fn well_formed_programs_parse_cleanly(source in program_strategy()) {
        let result = parse_source("prop.robo", &source);
        prop_assert!(!result.errors.has_errors(), "{}: {}", source, result.errors);
        prop_assert!(result.program.is_some());
    }

    #[test]
    fn dropping_the_last_close_brace_is_an_error(source in program_strategy()) {
        if let Some(idx) = source.rfind('}') {
            let mut broken = source.clone();
            broken.remove(idx);
            let result = parse_source("prop.robo", &broken);
            prop_assert!(result.errors.has_errors(), "{}", broken);
            prop_assert!(result.program.is_none());
        }
    }
}
