use std::collections::HashMap;
use std::f64::consts;
use num_complex::Complex64 as C64;
use crate::atom::Atom;
use crate::builtins;
use crate::error::SemanticResult;
use crate::expression::Expression;
use crate::{serr, serr_fmt};

/// Head symbols dispatched by the evaluator rather than looked up as
/// procedures. None of them may be rebound with `define`.
pub const SPECIAL_FORMS: &[&str] = &[
    "begin",
    "define",
    "lambda",
    "list",
    "apply",
    "map",
    "set-property",
    "get-property",
    "discrete-plot",
    "continuous-plot",
];

/// Preloaded constants, also protected from `define`.
pub const CONSTANTS: &[&str] = &["pi", "e", "I"];

/// Names in the default procedure table.
pub const PROCEDURES: &[&str] = &[
    "+", "-", "*", "/",
    "sqrt", "^", "ln", "sin", "cos", "tan",
    "real", "imag", "mag", "arg", "conj",
    "=", "!=", "<", "<=", ">", ">=",
    "list", "first", "rest", "length", "append", "join", "range",
    "make-point", "make-line", "make-text",
];

pub type Procedure = fn(&[Expression]) -> SemanticResult<Expression>;

#[derive(Clone)]
pub enum EnvEntry {
    Proc(Procedure),
    Exp(Expression),
}

/// Symbol table mapping names to built-in procedures or bound expressions.
/// Lambda application clones the whole table and shadows the parameters in
/// the clone, so writes inside a call never escape to the caller.
#[derive(Clone)]
pub struct Environment {
    data: HashMap<String, EnvEntry>,
}

macro_rules! add_proc(
    ( $env:ident, $name:literal, $proc:path ) => {
        $env.insert($name.to_string(), EnvEntry::Proc($proc));
    }
);

macro_rules! add_const(
    ( $env:ident, $name:literal, $exp:expr ) => {
        $env.insert($name.to_string(), EnvEntry::Exp($exp));
    }
);

impl Default for Environment {
    fn default() -> Environment {
        let mut env: HashMap<String, EnvEntry> = HashMap::new();
        // constants
        add_const!(env, "pi", Expression::number(consts::PI));
        add_const!(env, "e", Expression::number(consts::E));
        add_const!(env, "I", Expression::complex(C64::new(0.0, 1.0)));
        // arithmetic
        add_proc!(env, "+", builtins::add);
        add_proc!(env, "-", builtins::subneg);
        add_proc!(env, "*", builtins::mul);
        add_proc!(env, "/", builtins::div);
        add_proc!(env, "sqrt", builtins::sqrt);
        add_proc!(env, "^", builtins::pow);
        add_proc!(env, "ln", builtins::ln);
        add_proc!(env, "sin", builtins::sin);
        add_proc!(env, "cos", builtins::cos);
        add_proc!(env, "tan", builtins::tan);
        // complex projections
        add_proc!(env, "real", builtins::real);
        add_proc!(env, "imag", builtins::imag);
        add_proc!(env, "mag", builtins::mag);
        add_proc!(env, "arg", builtins::arg);
        add_proc!(env, "conj", builtins::conj);
        // comparisons
        add_proc!(env, "=", builtins::eq);
        add_proc!(env, "!=", builtins::neq);
        add_proc!(env, "<", builtins::lt);
        add_proc!(env, "<=", builtins::leq);
        add_proc!(env, ">", builtins::gt);
        add_proc!(env, ">=", builtins::geq);
        // lists
        add_proc!(env, "list", builtins::list);
        add_proc!(env, "first", builtins::first);
        add_proc!(env, "rest", builtins::rest);
        add_proc!(env, "length", builtins::length);
        add_proc!(env, "append", builtins::append);
        add_proc!(env, "join", builtins::join);
        add_proc!(env, "range", builtins::range);
        // plot primitives
        add_proc!(env, "make-point", builtins::make_point);
        add_proc!(env, "make-line", builtins::make_line);
        add_proc!(env, "make-text", builtins::make_text);
        return Environment { data: env };
    }
}

impl Environment {
    /// True when the name is a special form or a preloaded constant.
    pub fn is_reserved(name: &str) -> bool {
        return SPECIAL_FORMS.contains(&name) || CONSTANTS.contains(&name);
    }

    pub fn is_known(&self, sym: &Atom) -> bool {
        return match sym.symbol_text() {
            Some(name) => self.data.contains_key(name),
            None => false,
        };
    }

    pub fn is_proc(&self, sym: &Atom) -> bool {
        return match sym.symbol_text() {
            Some(name) => matches!(self.data.get(name), Some(EnvEntry::Proc(_))),
            None => false,
        };
    }

    pub fn get_proc(&self, sym: &Atom) -> SemanticResult<Procedure> {
        return match sym.symbol_text().and_then(|name| self.data.get(name)) {
            Some(EnvEntry::Proc(p)) => Ok(*p),
            _ => Err(serr!("symbol does not name a procedure")),
        };
    }

    pub fn is_exp(&self, sym: &Atom) -> bool {
        return match sym.symbol_text() {
            Some(name) => matches!(self.data.get(name), Some(EnvEntry::Exp(_))),
            None => false,
        };
    }

    pub fn get_exp(&self, sym: &Atom) -> SemanticResult<Expression> {
        return match sym.symbol_text().and_then(|name| self.data.get(name)) {
            Some(EnvEntry::Exp(exp)) => Ok(exp.clone()),
            _ => Err(serr_fmt!("unknown symbol {}", sym.as_string())),
        };
    }

    /// Bind or rebind in this scope. Reservation checks belong to the
    /// caller; `define` refuses reserved names before calling this.
    pub fn add_exp(&mut self, sym: &Atom, exp: Expression) -> SemanticResult<()> {
        return match sym.symbol_text() {
            Some(name) => {
                self.data.insert(name.to_string(), EnvEntry::Exp(exp));
                Ok(())
            },
            None => Err(serr!("attempt to bind to a non-symbol")),
        };
    }

    /// Unconditional rebind used by lambda application: a parameter may
    /// legally alias a built-in inside the body.
    pub fn shadow(&mut self, sym: &Atom, exp: Expression) {
        if let Some(name) = sym.symbol_text() {
            self.data.insert(name.to_string(), EnvEntry::Exp(exp));
        }
    }

    /// Restore the default procedure table and constants.
    pub fn reset(&mut self) {
        *self = Environment::default();
    }
}
