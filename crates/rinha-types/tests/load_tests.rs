//! Integration tests for the JSON AST loader.

use pretty_assertions::assert_eq;
use rinha_types::ast::{BinaryOp, Term};
use rinha_types::{parse_file, LoadError, Location};

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

fn loc_json(start: usize, end: usize) -> String {
    format!(r#"{{ "start": {start}, "end": {end}, "filename": "test.rinha" }}"#)
}

fn document(expression: &str) -> String {
    format!(
        r#"{{ "name": "test.rinha", "expression": {expression}, "location": {} }}"#,
        loc_json(0, 0)
    )
}

// ══════════════════════════════════════════════════════════════════════════════
// Term shapes
// ══════════════════════════════════════════════════════════════════════════════

const FIB: &str = r#"{
  "name": "fib.rinha",
  "expression": {
    "kind": "Let",
    "name": { "text": "fib", "location": { "start": 4, "end": 7, "filename": "fib.rinha" } },
    "value": {
      "kind": "Function",
      "parameters": [
        { "text": "n", "location": { "start": 14, "end": 15, "filename": "fib.rinha" } }
      ],
      "value": {
        "kind": "If",
        "condition": {
          "kind": "Binary",
          "lhs": { "kind": "Var", "text": "n", "location": { "start": 27, "end": 28, "filename": "fib.rinha" } },
          "op": "Lt",
          "rhs": { "kind": "Int", "value": 2, "location": { "start": 31, "end": 32, "filename": "fib.rinha" } },
          "location": { "start": 27, "end": 32, "filename": "fib.rinha" }
        },
        "then": { "kind": "Var", "text": "n", "location": { "start": 40, "end": 41, "filename": "fib.rinha" } },
        "otherwise": {
          "kind": "Binary",
          "lhs": {
            "kind": "Call",
            "callee": { "kind": "Var", "text": "fib", "location": { "start": 55, "end": 58, "filename": "fib.rinha" } },
            "arguments": [
              {
                "kind": "Binary",
                "lhs": { "kind": "Var", "text": "n", "location": { "start": 59, "end": 60, "filename": "fib.rinha" } },
                "op": "Sub",
                "rhs": { "kind": "Int", "value": 1, "location": { "start": 63, "end": 64, "filename": "fib.rinha" } },
                "location": { "start": 59, "end": 64, "filename": "fib.rinha" }
              }
            ],
            "location": { "start": 55, "end": 65, "filename": "fib.rinha" }
          },
          "op": "Add",
          "rhs": {
            "kind": "Call",
            "callee": { "kind": "Var", "text": "fib", "location": { "start": 68, "end": 71, "filename": "fib.rinha" } },
            "arguments": [
              {
                "kind": "Binary",
                "lhs": { "kind": "Var", "text": "n", "location": { "start": 72, "end": 73, "filename": "fib.rinha" } },
                "op": "Sub",
                "rhs": { "kind": "Int", "value": 2, "location": { "start": 76, "end": 77, "filename": "fib.rinha" } },
                "location": { "start": 72, "end": 77, "filename": "fib.rinha" }
              }
            ],
            "location": { "start": 68, "end": 78, "filename": "fib.rinha" }
          },
          "location": { "start": 55, "end": 78, "filename": "fib.rinha" }
        },
        "location": { "start": 23, "end": 84, "filename": "fib.rinha" }
      },
      "location": { "start": 10, "end": 86, "filename": "fib.rinha" }
    },
    "next": {
      "kind": "Print",
      "value": {
        "kind": "Call",
        "callee": { "kind": "Var", "text": "fib", "location": { "start": 95, "end": 98, "filename": "fib.rinha" } },
        "arguments": [
          { "kind": "Int", "value": 10, "location": { "start": 99, "end": 101, "filename": "fib.rinha" } }
        ],
        "location": { "start": 95, "end": 102, "filename": "fib.rinha" }
      },
      "location": { "start": 89, "end": 103, "filename": "fib.rinha" }
    },
    "location": { "start": 0, "end": 103, "filename": "fib.rinha" }
  },
  "location": { "start": 0, "end": 103, "filename": "fib.rinha" }
}"#;

#[test]
fn fib_document_loads() {
    let file = parse_file(FIB).expect("fib document should load");
    assert_eq!(file.name, "fib.rinha");

    let Term::Let(let_) = &file.expression else {
        panic!("expected Let at the root, got {}", file.expression.kind_name());
    };
    assert_eq!(let_.name.text, "fib");
    assert_eq!(let_.name.location, Location::new(4, 7, "fib.rinha"));

    let Term::Function(function) = let_.value.as_ref() else {
        panic!("expected Function as the bound value");
    };
    assert_eq!(function.arity(), 1);
    assert_eq!(function.parameters[0].text, "n");

    let Term::If(if_) = function.value.as_ref() else {
        panic!("expected If as the function body");
    };
    let Term::Binary(condition) = if_.condition.as_ref() else {
        panic!("expected Binary condition");
    };
    assert_eq!(condition.op, BinaryOp::Lt);

    assert!(matches!(let_.next.as_ref(), Term::Print(_)));
}

#[test]
fn every_binary_operator_parses() {
    let ops = [
        ("Add", BinaryOp::Add),
        ("Sub", BinaryOp::Sub),
        ("Mul", BinaryOp::Mul),
        ("Div", BinaryOp::Div),
        ("Rem", BinaryOp::Rem),
        ("Eq", BinaryOp::Eq),
        ("Neq", BinaryOp::Neq),
        ("Lt", BinaryOp::Lt),
        ("Gt", BinaryOp::Gt),
        ("Lte", BinaryOp::Lte),
        ("Gte", BinaryOp::Gte),
        ("And", BinaryOp::And),
        ("Or", BinaryOp::Or),
    ];
    for (wire, expected) in ops {
        let expression = format!(
            r#"{{ "kind": "Binary",
                 "lhs": {{ "kind": "Int", "value": 1, "location": {l} }},
                 "op": "{wire}",
                 "rhs": {{ "kind": "Int", "value": 2, "location": {l} }},
                 "location": {l} }}"#,
            l = loc_json(0, 5)
        );
        let file = parse_file(&document(&expression)).expect("binary should load");
        match file.expression {
            Term::Binary(binary) => assert_eq!(binary.op, expected, "operator {wire}"),
            other => panic!("expected Binary, got {}", other.kind_name()),
        }
    }
}

#[test]
fn tuple_and_projections_load() {
    let expression = format!(
        r#"{{ "kind": "Second",
             "value": {{ "kind": "Tuple",
                        "first": {{ "kind": "Str", "value": "a", "location": {l} }},
                        "second": {{ "kind": "Bool", "value": false, "location": {l} }},
                        "location": {l} }},
             "location": {l} }}"#,
        l = loc_json(0, 20)
    );
    let file = parse_file(&document(&expression)).unwrap();
    let Term::Second(projection) = file.expression else {
        panic!("expected Second");
    };
    let Term::Tuple(tuple) = *projection.value else {
        panic!("expected Tuple");
    };
    assert!(matches!(*tuple.first, Term::Str(ref s) if s.value == "a"));
    assert!(matches!(*tuple.second, Term::Bool(ref b) if !b.value));
}

#[test]
fn error_kind_loads_as_malformed() {
    let expression = format!(
        r#"{{ "kind": "Error",
             "message": "unexpected token",
             "full_text": "let = 1",
             "location": {} }}"#,
        loc_json(0, 7)
    );
    let file = parse_file(&document(&expression)).unwrap();
    match file.expression {
        Term::Malformed(malformed) => {
            assert_eq!(malformed.message, "unexpected token");
            assert_eq!(malformed.full_text, "let = 1");
            assert_eq!(malformed.location, Location::new(0, 7, "test.rinha"));
        }
        other => panic!("expected Malformed, got {}", other.kind_name()),
    }
}

#[test]
fn negative_and_large_integers_load() {
    let expression = format!(
        r#"{{ "kind": "Int", "value": -9007199254740993, "location": {} }}"#,
        loc_json(0, 17)
    );
    let file = parse_file(&document(&expression)).unwrap();
    match file.expression {
        Term::Int(int) => assert_eq!(int.value, -9_007_199_254_740_993),
        other => panic!("expected an integer, got {other:?}"),
    }
}

#[test]
fn unknown_fields_are_ignored() {
    let expression = format!(
        r#"{{ "kind": "Bool", "value": true, "comment": "extra", "location": {} }}"#,
        loc_json(0, 4)
    );
    assert!(parse_file(&document(&expression)).is_ok());
}

// ══════════════════════════════════════════════════════════════════════════════
// Failures
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn unknown_kind_is_rejected() {
    let expression = format!(r#"{{ "kind": "While", "location": {} }}"#, loc_json(0, 1));
    let err = parse_file(&document(&expression)).unwrap_err();
    assert!(matches!(err, LoadError::Json(_)));
    assert!(err.to_string().starts_with("invalid AST document"));
}

#[test]
fn missing_location_is_rejected() {
    let err = parse_file(&document(r#"{ "kind": "Int", "value": 1 }"#)).unwrap_err();
    assert!(matches!(err, LoadError::Json(_)));
}

#[test]
fn unknown_operator_is_rejected() {
    let expression = format!(
        r#"{{ "kind": "Binary",
             "lhs": {{ "kind": "Int", "value": 1, "location": {l} }},
             "op": "Pow",
             "rhs": {{ "kind": "Int", "value": 2, "location": {l} }},
             "location": {l} }}"#,
        l = loc_json(0, 5)
    );
    assert!(parse_file(&document(&expression)).is_err());
}

// ══════════════════════════════════════════════════════════════════════════════
// Deep documents
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn deeply_nested_let_chain_loads() {
    const DEPTH: usize = 5_000;
    let l = loc_json(0, 1);
    let mut json = String::new();
    for i in 0..DEPTH {
        json.push_str(&format!(
            r#"{{ "kind": "Let", "name": {{ "text": "x{i}", "location": {l} }},
                 "value": {{ "kind": "Int", "value": {i}, "location": {l} }},
                 "next": "#
        ));
    }
    let leaf = format!(r#"{{ "kind": "Var", "text": "x0", "location": {l} }}"#);
    json.push_str(&leaf);
    for _ in 0..DEPTH {
        json.push_str(&format!(r#", "location": {l} }}"#));
    }

    let file = parse_file(&document(&json)).expect("deep document should load");

    let mut depth = 0;
    let mut term = &file.expression;
    while let Term::Let(let_) = term {
        depth += 1;
        term = let_.next.as_ref();
    }
    assert_eq!(depth, DEPTH);
    assert!(matches!(term, Term::Var(var) if var.text == "x0"));

    // Drop the tree on a large stack as well.
    stacker::grow(64 * 1024 * 1024, move || drop(file));
}
