use super::compiler::{GeneratorCompiler, GENERATOR_FN};
use crate::config::SandboxSettings;
use crate::domain::{error_sentinel, MirageError};
use serde_json::json;

fn compiler() -> GeneratorCompiler {
    GeneratorCompiler::new(&SandboxSettings::default())
}

#[test]
fn test_wrap_builds_function_shell() {
    let wrapped = GeneratorCompiler::wrap("let data = #{};\nreturn data;");

    let expected = format!(
        "fn {}() {{\n    import \"random\" as random;\n    import \"time\" as time;\n    import \"uuid\" as uuid;\n    import \"fake\" as fake;\n    let data = #{{}};\n    return data;\n}}\n",
        GENERATOR_FN
    );
    assert_eq!(wrapped, expected);
}

#[test]
fn test_compile_and_invoke_literal_map() {
    let generator = compiler()
        .compile("let data = #{ x: 1 };\nreturn data;")
        .unwrap();

    for _ in 0..3 {
        let value = generator.invoke().unwrap();
        assert_eq!(serde_json::Value::Object(value), json!({ "x": 1 }));
    }
    assert!(generator.source().starts_with("fn dynamic_generator() {"));
}

#[test]
fn test_nested_values_convert_to_json() {
    let generator = compiler()
        .compile(
            "let data = #{ name: \"Ada\", tags: [\"a\", \"b\"], price: 9.5, meta: #{ ok: true, note: () } };\nreturn data;",
        )
        .unwrap();

    let value = serde_json::Value::Object(generator.invoke().unwrap());
    assert_eq!(value["name"], "Ada");
    assert_eq!(value["tags"], json!(["a", "b"]));
    assert_eq!(value["price"], 9.5);
    assert_eq!(value["meta"]["ok"], true);
    assert!(value["meta"]["note"].is_null());
}

#[test]
fn test_helper_modules_are_available() {
    let fragment = r#"
let data = #{
    id: uuid::v4(),
    age: random::int(18, 65),
    score: random::float(0.0, 1.0),
    active: random::bool(),
    tier: random::choice(["gold", "silver"]),
    code: "usr_" + random::digits(4),
    name: fake::name(),
    email: fake::email(),
    created: time::days_from_now(-3),
    seen: time::recent(7)
};
return data;"#;

    let generator = compiler().compile(fragment).unwrap();
    let first = generator.invoke().unwrap();
    let second = generator.invoke().unwrap();

    let age = first["age"].as_i64().unwrap();
    assert!((18..=65).contains(&age));
    let score = first["score"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&score));
    assert!(first["active"].is_boolean());
    assert!(["gold", "silver"].contains(&first["tier"].as_str().unwrap()));
    assert_eq!(first["code"].as_str().unwrap().len(), 8);
    assert!(first["email"].as_str().unwrap().contains('@'));
    assert_eq!(first["created"].as_str().unwrap().len(), 10);

    // every call builds a fresh object
    assert_ne!(first["id"], second["id"]);
}

#[test]
fn test_syntax_error_is_rejected() {
    let err = compiler()
        .compile("let data = #{ x: 1 ;\nreturn data;")
        .unwrap_err();
    assert!(matches!(err, MirageError::Compilation(_)));
    assert!(err.to_string().starts_with("Syntax Error: "));
}

#[test]
fn test_error_sentinel_never_compiles() {
    let sentinel = error_sentinel("Network error: connection refused");
    let err = compiler().compile(&sentinel).unwrap_err();

    match err {
        MirageError::Compilation(message) => assert!(message.contains("connection refused")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_empty_fragment_is_rejected() {
    for fragment in ["", "   \n\n", "// nothing here\n// still nothing"] {
        let err = compiler().compile(fragment).unwrap_err();
        assert!(matches!(err, MirageError::Compilation(_)), "{:?}", fragment);
    }
}

#[test]
fn test_block_comment_only_fragment_is_rejected() {
    for fragment in [
        "/* nothing here */",
        "/*\n  let data = #{ x: 1 };\n  return data;\n*/",
        "/* outer /* inner */ still comment */\n// and a line comment",
    ] {
        let err = compiler().compile(fragment).unwrap_err();
        assert!(matches!(err, MirageError::Compilation(_)), "{:?}", fragment);
    }
}

#[test]
fn test_code_after_block_comment_compiles() {
    let generator = compiler()
        .compile("// see /* below\n/* header */ let data = #{ note: \"/* kept */\" };\nreturn data;")
        .unwrap();
    let value = generator.invoke().unwrap();
    assert_eq!(value["note"], "/* kept */");
}

#[test]
fn test_overflowing_float_range_is_runtime_error() {
    let generator = compiler()
        .compile("let data = #{ v: random::float(-1e308, 1e308) };\nreturn data;")
        .unwrap();

    let err = generator.invoke().unwrap_err();
    assert!(matches!(err, MirageError::GeneratorRuntime(_)));
    assert!(err.to_string().contains("random::float"));
}

#[test]
fn test_non_map_result_is_runtime_error() {
    let generator = compiler().compile("return 42;").unwrap();
    let err = generator.invoke().unwrap_err();
    assert!(matches!(err, MirageError::GeneratorRuntime(_)));
}

#[test]
fn test_host_function_error_is_runtime_error() {
    let generator = compiler()
        .compile("let data = #{ n: random::int(10, 1) };\nreturn data;")
        .unwrap();

    let err = generator.invoke().unwrap_err();
    assert!(err.to_string().starts_with("Runtime Error: "));
    assert!(err.to_string().contains("random::int"));
}

#[test]
fn test_infinite_loop_is_bounded() {
    let limits = SandboxSettings {
        max_operations: 10_000,
        ..SandboxSettings::default()
    };
    let generator = GeneratorCompiler::new(&limits)
        .compile("let i = 0;\nloop { i += 1; }\nreturn #{ i: i };")
        .unwrap();

    let err = generator.invoke().unwrap_err();
    assert!(matches!(err, MirageError::GeneratorRuntime(_)));
}

#[test]
fn test_eval_is_unavailable() {
    let outcome = compiler()
        .compile("let data = eval(\"#{ x: 1 }\");\nreturn data;")
        .and_then(|generator| generator.invoke());
    assert!(outcome.is_err());
}

#[test]
fn test_unknown_module_is_unavailable() {
    let outcome = compiler()
        .compile("let data = #{ out: os::system(\"ls\") };\nreturn data;")
        .and_then(|generator| generator.invoke());
    assert!(outcome.is_err());
}

#[test]
fn test_top_level_statements_are_discarded() {
    // closes the shell early and tries to run code at load time
    let fragment = "return #{ x: 1 };\n}\nthrow \"escaped\";\nfn trailing() {";

    let generator = compiler().compile(fragment).unwrap();
    let value = generator.invoke().unwrap();
    assert_eq!(serde_json::Value::Object(value), json!({ "x": 1 }));
}

#[test]
fn test_generator_debug_shows_source() {
    let generator = compiler().compile("return #{};").unwrap();
    let debug = format!("{:?}", generator);
    assert!(debug.contains("CompiledGenerator"));
    assert!(debug.contains(GENERATOR_FN));
}
