//! Dynamic-scope evaluation on top of a rhai [`Engine`].
//!
//! The engine itself has no side effects; everything a script can do comes
//! from the capability modules registered on it. Name resolution for free
//! identifiers goes script locals -> binding table -> ambient environment,
//! and an unresolved name is a hard error, not a silent unit.

use std::sync::{Arc, RwLock};

use rhai::{AST, Dynamic, Engine, Module, Scope};

use super::Pending;
use super::scope::{Ambient, Bindings, resolve};
use crate::editor::Position;
use crate::error::Error;

/// Script function definitions accumulated across evaluations, shared with
/// native callbacks (`source`) that also compile code.
#[derive(Clone)]
pub struct Library {
    ast: Arc<RwLock<AST>>,
}

impl Library {
    pub fn new() -> Self {
        Self {
            ast: Arc::new(RwLock::new(AST::empty())),
        }
    }

    /// Merge the function definitions of `ast` into the library. Top-level
    /// statements are dropped so a later invocation does not re-run them.
    pub fn absorb(&self, ast: &AST) {
        if let Ok(mut lib) = self.ast.write() {
            let merged = std::mem::replace(&mut *lib, AST::empty());
            *lib = merged.merge(&ast.clone_functions_only());
        }
    }

    pub fn snapshot(&self) -> AST {
        self.ast
            .read()
            .map(|lib| lib.clone())
            .unwrap_or_else(|_| AST::empty())
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}

/// The evaluator: a rhai engine whose variable resolver implements the
/// two-tier dynamic environment.
pub struct ScriptEngine {
    engine: Engine,
    bindings: Bindings,
    lib: Library,
}

impl ScriptEngine {
    pub fn new(bindings: Bindings, ambient: Ambient) -> Self {
        let mut engine = Engine::new();

        // Safety limits
        engine.set_max_expr_depths(64, 64);
        engine.set_max_operations(1_000_000);

        register_types(&mut engine);

        {
            let bindings = bindings.clone();
            engine.on_var(move |name, _index, context| {
                // Script locals shadow the dynamic environment.
                if context.scope().contains(name) {
                    return Ok(None);
                }
                Ok(resolve(&bindings, &ambient, name))
            });
        }

        Self {
            engine,
            bindings,
            lib: Library::new(),
        }
    }

    /// Install a capability module whose functions become globally callable.
    pub fn register_module(&mut self, module: Module) {
        self.engine.register_global_module(module.into());
    }

    pub fn library(&self) -> Library {
        self.lib.clone()
    }

    pub fn bindings(&self) -> Bindings {
        self.bindings.clone()
    }

    /// Evaluate a script and return its final value.
    ///
    /// A script whose trimmed text begins with `#{` is compiled as a value
    /// expression, so a bare map literal evaluates to a map instead of
    /// tripping over statement parsing. Function definitions from every
    /// successful evaluation stay invocable afterwards.
    pub fn eval(&self, script: &str) -> Result<Dynamic, Error> {
        let ast = if script.trim_start().starts_with("#{") {
            self.engine.compile_expression(script)?
        } else {
            self.engine.compile(script)?
        };
        let mut scope = Scope::new();
        let result = self
            .engine
            .eval_ast_with_scope::<Dynamic>(&mut scope, &ast)?;
        self.lib.absorb(&ast);
        Ok(result)
    }

    /// Invoke a previously defined script function under the same name
    /// resolution rule as [`Self::eval`].
    pub fn invoke(&self, fn_name: &str) -> Result<Dynamic, Error> {
        let ast = self.lib.snapshot();
        let mut scope = Scope::new();
        self.engine
            .call_fn::<Dynamic>(&mut scope, &ast, fn_name, ())
            .map_err(Error::from)
    }
}

fn register_types(engine: &mut Engine) {
    engine
        .register_type_with_name::<Position>("Position")
        .register_fn("pos", |line: i64, ch: i64| {
            Position::new(line.max(0) as usize, ch.max(0) as usize)
        })
        .register_get("line", |p: &mut Position| p.line as i64)
        .register_get("ch", |p: &mut Position| p.ch as i64)
        .register_fn("==", |a: Position, b: Position| a == b)
        .register_fn("!=", |a: Position, b: Position| a != b)
        .register_fn("to_string", |p: &mut Position| p.to_string());
    engine.register_type_with_name::<Pending>("Pending");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(bindings: &Bindings, ambient: Ambient) -> ScriptEngine {
        ScriptEngine::new(bindings.clone(), ambient)
    }

    #[test]
    fn bindings_resolve_like_locals() {
        let bindings = Bindings::new();
        bindings.set("x", Dynamic::from(1_i64));
        let engine = engine_with(&bindings, Ambient::new());
        let result = engine.eval("x + 1").unwrap();
        assert_eq!(result.as_int().unwrap(), 2);
    }

    #[test]
    fn ambient_is_the_fallback_tier() {
        let ambient = Ambient::new().with("y", Dynamic::from(40_i64));
        let engine = engine_with(&Bindings::new(), ambient);
        assert_eq!(engine.eval("y + 2").unwrap().as_int().unwrap(), 42);
    }

    #[test]
    fn unresolved_names_raise_unbound_name() {
        let engine = engine_with(&Bindings::new(), Ambient::new());
        match engine.eval("z") {
            Err(Error::UnboundName(name)) => assert_eq!(name, "z"),
            other => panic!("expected UnboundName, got {other:?}"),
        }
    }

    #[test]
    fn script_locals_shadow_the_binding_table() {
        let bindings = Bindings::new();
        bindings.set("x", Dynamic::from(100_i64));
        let engine = engine_with(&bindings, Ambient::new());
        assert_eq!(engine.eval("let x = 1; x").unwrap().as_int().unwrap(), 1);
    }

    #[test]
    fn map_literal_heuristic_yields_a_map() {
        let engine = engine_with(&Bindings::new(), Ambient::new());
        let result = engine.eval("#{a: 1}").unwrap();
        let map = result.try_cast::<rhai::Map>().expect("expected a map");
        assert_eq!(map.get("a").unwrap().as_int().unwrap(), 1);
    }

    #[test]
    fn block_scripts_return_their_final_value() {
        let engine = engine_with(&Bindings::new(), Ambient::new());
        assert_eq!(engine.eval("{ let a = 1; a }").unwrap().as_int().unwrap(), 1);
    }

    #[test]
    fn defined_functions_stay_invocable() {
        let bindings = Bindings::new();
        bindings.set("x", Dynamic::from(5_i64));
        let engine = engine_with(&bindings, Ambient::new());
        engine.eval("fn double_x() { x * 2 }").unwrap();
        assert_eq!(engine.invoke("double_x").unwrap().as_int().unwrap(), 10);
    }

    #[test]
    fn invocation_sees_the_current_binding_not_the_defining_one() {
        let bindings = Bindings::new();
        bindings.set("x", Dynamic::from(5_i64));
        let engine = engine_with(&bindings, Ambient::new());
        engine.eval("fn double_x() { x * 2 }").unwrap();
        bindings.set("x", Dynamic::from(7_i64));
        assert_eq!(engine.invoke("double_x").unwrap().as_int().unwrap(), 14);
    }

    #[test]
    fn unbound_name_inside_a_function_body_classifies() {
        let engine = engine_with(&Bindings::new(), Ambient::new());
        engine.eval("fn broken() { missing + 1 }").unwrap();
        assert!(matches!(
            engine.invoke("broken"),
            Err(Error::UnboundName(name)) if name == "missing"
        ));
    }

    #[test]
    fn parse_errors_are_evaluation_errors() {
        let engine = engine_with(&Bindings::new(), Ambient::new());
        assert!(matches!(engine.eval("let ="), Err(Error::Evaluation(_))));
    }
}
