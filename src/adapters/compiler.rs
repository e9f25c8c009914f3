use rhai::module_resolvers::StaticModuleResolver;
use rhai::{Dynamic, Engine, Scope, AST};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::adapters::script_api;
use crate::config::SandboxSettings;
use crate::domain::MirageError;

/// Name of the function every generator is compiled into
pub const GENERATOR_FN: &str = "dynamic_generator";

const INDENT: &str = "    ";

/// Compiles sanitized model output into callable generators.
///
/// All generators share one restricted engine: helper modules are only
/// reachable through the imports of the function shell, `eval` is disabled
/// and the sandbox limits bound every invocation.
pub struct GeneratorCompiler {
    engine: Arc<Engine>,
}

impl GeneratorCompiler {
    pub fn new(limits: &SandboxSettings) -> Self {
        let mut engine = Engine::new();

        engine.set_max_operations(limits.max_operations);
        engine.set_max_call_levels(limits.max_call_levels);
        engine.set_max_expr_depths(limits.max_expr_depth, limits.max_expr_depth);
        engine.set_max_string_size(limits.max_string_size);
        engine.set_max_array_size(limits.max_array_size);
        engine.set_max_map_size(limits.max_map_size);
        engine.disable_symbol("eval");

        engine.on_print(|text| debug!(target: "mirage::script", "{}", text));
        engine.on_debug(|text, _source, pos| {
            debug!(target: "mirage::script", "{:?} {}", pos, text)
        });

        let mut resolver = StaticModuleResolver::new();
        for (path, module) in script_api::modules() {
            resolver.insert(path, module);
        }
        engine.set_module_resolver(resolver);

        Self {
            engine: Arc::new(engine),
        }
    }

    /// Wraps a code fragment in the zero-argument function shell
    pub fn wrap(fragment: &str) -> String {
        let mut source = format!("fn {}() {{\n", GENERATOR_FN);
        for (path, _) in script_api::modules() {
            source.push_str(&format!("{}import \"{}\" as {};\n", INDENT, path, path));
        }
        for line in fragment.lines() {
            source.push_str(INDENT);
            source.push_str(line);
            source.push('\n');
        }
        source.push_str("}\n");
        source
    }

    pub fn compile(&self, fragment: &str) -> Result<CompiledGenerator, MirageError> {
        let source = Self::wrap(fragment);

        info!("--- COMPILING GENERATOR ---\n{}---------------------------", source);

        let result = self.compile_source(fragment, &source);
        if let Err(e) = &result {
            error!("COMPILATION ERROR: {}", e);
        }
        result
    }

    fn compile_source(&self, fragment: &str, source: &str) -> Result<CompiledGenerator, MirageError> {
        if !has_statements(fragment) {
            let note = fragment.lines().map(str::trim).find(|l| !l.is_empty());
            return Err(MirageError::Compilation(match note {
                Some(comment) => format!("generator body has no statements ({})", comment),
                None => "generator body is empty".to_string(),
            }));
        }

        let ast = self
            .engine
            .compile(source)
            .map_err(|e| MirageError::Compilation(e.to_string()))?;

        let defined = ast
            .iter_functions()
            .any(|f| f.name == GENERATOR_FN && f.params.is_empty());
        if !defined {
            return Err(MirageError::Compilation(format!(
                "{}() is not defined by the generated code",
                GENERATOR_FN
            )));
        }

        Ok(CompiledGenerator {
            engine: self.engine.clone(),
            // Top-level statements smuggled past the shell never run
            ast: ast.clone_functions_only(),
            source: source.to_string(),
        })
    }
}

/// True when the fragment holds anything besides whitespace and comments
fn has_statements(fragment: &str) -> bool {
    strip_block_comments(fragment)
        .lines()
        .map(str::trim)
        .any(|line| !line.is_empty() && !line.starts_with("//"))
}

/// Removes `/* ... */` comments, nested ones included, outside string literals
fn strip_block_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut depth = 0usize;
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if depth > 0 {
            match (c, chars.peek()) {
                ('/', Some('*')) => {
                    chars.next();
                    depth += 1;
                }
                ('*', Some('/')) => {
                    chars.next();
                    depth -= 1;
                }
                // keep line structure so `//` detection still sees line starts
                ('\n', _) => out.push('\n'),
                _ => {}
            }
            continue;
        }

        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('/', Some('*')) => {
                chars.next();
                depth = 1;
            }
            // line comments are copied through untouched
            ('/', Some('/')) => {
                out.push(c);
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    out.push(next);
                    chars.next();
                }
            }
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            _ => out.push(c),
        }
    }

    out
}

/// A compiled, zero-argument generator of mock objects
pub struct CompiledGenerator {
    engine: Arc<Engine>,
    ast: AST,
    source: String,
}

impl CompiledGenerator {
    /// Runs the generator and returns the object it produced
    pub fn invoke(&self) -> Result<Map<String, Value>, MirageError> {
        let mut scope = Scope::new();
        let result = self
            .engine
            .call_fn::<Dynamic>(&mut scope, &self.ast, GENERATOR_FN, ())
            .map_err(|e| MirageError::GeneratorRuntime(e.to_string()))?;

        if !result.is_map() {
            return Err(MirageError::GeneratorRuntime(format!(
                "generator returned {}, expected an object map",
                result.type_name()
            )));
        }

        match serde_json::to_value(&result) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(MirageError::GeneratorRuntime(format!(
                "generator produced non-object JSON: {}",
                other
            ))),
            Err(e) => Err(MirageError::GeneratorRuntime(e.to_string())),
        }
    }

    /// The wrapped source this generator was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl std::fmt::Debug for CompiledGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledGenerator")
            .field("source", &self.source)
            .finish()
    }
}
