use crate::atom::Atom;
use crate::environment::{
    Environment,
    Procedure,
    CONSTANTS,
    SPECIAL_FORMS,
};
use crate::error::SemanticResult;
use crate::expression::Expression;
use crate::interrupt;
use crate::{serr, serr_fmt};

impl Expression {
    /// Evaluate this node against `env`. Special forms dispatch on the head
    /// symbol before their children are evaluated; everything else is
    /// evaluated left-to-right and applied.
    pub fn eval(&self, env: &mut Environment) -> SemanticResult<Expression> {
        if interrupt::is_set() {
            return Err(serr!("interpreter kernel interrupted"));
        }
        // (list ...) precedes the empty-tail rule so that (list) is the
        // empty list rather than a lookup of `list`
        if self.head.symbol_text() == Some("list") {
            return self.handle_list(env);
        }
        if self.tail.is_empty() {
            return handle_lookup(&self.head, env);
        }
        return match self.head.symbol_text() {
            Some("begin") => self.handle_begin(env),
            Some("define") => self.handle_define(env),
            Some("lambda") => self.handle_lambda(),
            Some("apply") => self.handle_apply(env),
            Some("map") => self.handle_map(env),
            Some("set-property") => self.handle_set_property(env),
            Some("get-property") => self.handle_get_property(env),
            Some("discrete-plot") => self.handle_discrete_plot(env),
            Some("continuous-plot") => self.handle_continuous_plot(env),
            _ => {
                let results: Vec<Expression> = self.tail.iter()
                    .map(|e| e.eval(env))
                    .collect::<SemanticResult<Vec<Expression>>>()?;
                apply_operator(&self.head, &results, env)
            },
        };
    }

    fn handle_list(&self, env: &mut Environment) -> SemanticResult<Expression> {
        let items: Vec<Expression> = self.tail.iter()
            .map(|e| e.eval(env))
            .collect::<SemanticResult<Vec<Expression>>>()?;
        return Ok(Expression::list(items));
    }

    fn handle_begin(&self, env: &mut Environment) -> SemanticResult<Expression> {
        let mut result = Expression::default();
        for e in self.tail.iter() {
            result = e.eval(env)?;
        }
        return Ok(result);
    }

    fn handle_define(&self, env: &mut Environment) -> SemanticResult<Expression> {
        if self.tail.len() != 2 {
            return Err(serr!("invalid number of arguments to define"));
        }
        let sym: &Atom = self.tail[0].head();
        let name: &str = sym.symbol_text()
            .ok_or_else(|| serr!("first argument to define not a symbol"))?;
        if SPECIAL_FORMS.contains(&name) {
            return Err(serr!("attempt to redefine a special form"));
        }
        if CONSTANTS.contains(&name) {
            return Err(serr!("attempt to redefine a reserved symbol"));
        }
        if env.is_proc(sym) {
            return Err(serr!("attempt to redefine a built-in procedure"));
        }
        let result: Expression = self.tail[1].eval(env)?;
        env.add_exp(sym, result.clone())?;
        return Ok(result);
    }

    /// Capture the argument template and the unevaluated body. The body is
    /// not touched until application.
    fn handle_lambda(&self) -> SemanticResult<Expression> {
        if self.tail.len() != 2 {
            return Err(serr!("invalid number of arguments to lambda"));
        }
        let template: &Expression = &self.tail[0];
        let params_ok: bool = template.head().is_symbol()
            && template.tail().iter()
                .all(|p| p.head().is_symbol() && p.tail().is_empty());
        if !params_ok {
            return Err(serr!("lambda parameters must be symbols"));
        }
        return Ok(Expression::lambda(template.clone(), self.tail[1].clone()));
    }

    fn handle_apply(&self, env: &mut Environment) -> SemanticResult<Expression> {
        if self.tail.len() != 2 {
            return Err(serr!("invalid number of arguments to apply"));
        }
        let op: &Atom = self.tail[0].head();
        let op_is_lambda: bool
            = env.is_exp(op) && env.get_exp(op)?.is_lambda();
        if !op_is_lambda
            && !(env.is_proc(op) && self.tail[0].tail().is_empty())
        {
            return Err(serr!("first argument to apply not a procedure"));
        }
        let arguments: Expression = self.tail[1].eval(env)?;
        if !arguments.is_list() {
            return Err(serr!("second argument to apply not a list"));
        }
        return apply_operator(op, arguments.tail(), env);
    }

    fn handle_map(&self, env: &mut Environment) -> SemanticResult<Expression> {
        if self.tail.len() != 2 {
            return Err(serr!("invalid number of arguments to map"));
        }
        let op: &Atom = self.tail[0].head();
        let op_is_lambda: bool
            = env.is_exp(op) && env.get_exp(op)?.is_lambda();
        if !op_is_lambda
            && !(env.is_proc(op) && self.tail[0].tail().is_empty())
        {
            return Err(serr!("first argument to map not a procedure"));
        }
        let items: Expression = self.tail[1].eval(env)?;
        if !items.is_list() {
            return Err(serr!("second argument to map not a list"));
        }
        let results: Vec<Expression> = items.tail().iter()
            .map(|e| apply_operator(op, std::slice::from_ref(e), env))
            .collect::<SemanticResult<Vec<Expression>>>()?;
        return Ok(Expression::list(results));
    }

    fn handle_set_property(&self, env: &mut Environment)
        -> SemanticResult<Expression>
    {
        if self.tail.len() != 3 {
            return Err(serr!("invalid number of arguments for set-property"));
        }
        if !self.tail[0].is_string_literal() {
            return Err(serr!("first argument to set-property not a string"));
        }
        let mut target: Expression = self.tail[2].eval(env)?;
        let value: Expression = self.tail[1].eval(env)?;
        target.set_property(self.tail[0].head().as_string(), value);
        return Ok(target);
    }

    fn handle_get_property(&self, env: &mut Environment)
        -> SemanticResult<Expression>
    {
        if self.tail.len() != 2 {
            return Err(serr!("invalid number of arguments for get-property"));
        }
        if !self.tail[0].is_string_literal() {
            return Err(serr!("first argument to get-property not a string"));
        }
        let target: Expression = self.tail[1].eval(env)?;
        return Ok(target.property_or_empty(&self.tail[0].head().as_string()));
    }
}

/// Terminal nodes: scalars return themselves, symbols resolve through the
/// environment.
fn handle_lookup(head: &Atom, env: &Environment) -> SemanticResult<Expression> {
    return match head {
        Atom::Symbol(_) => env.get_exp(head),
        Atom::Number(_) | Atom::Complex(_) | Atom::String(_)
            => Ok(Expression::from(head.clone())),
        Atom::None => Err(serr!("invalid terminal expression")),
    };
}

/// Apply an operator symbol to already-evaluated arguments: a bound lambda
/// takes precedence, otherwise the symbol must name a built-in procedure.
pub fn apply_operator(
    op: &Atom,
    args: &[Expression],
    env: &Environment,
) -> SemanticResult<Expression> {
    if env.is_exp(op) {
        let bound: Expression = env.get_exp(op)?;
        if bound.is_lambda() {
            return apply_lambda(&bound, args, env);
        }
    }
    if !op.is_symbol() {
        return Err(serr!("head of expression is not a symbol"));
    }
    let proc: Procedure = env.get_proc(op)?;
    return proc(args);
}

/// Lambda application: clone the calling environment, shadow each parameter
/// with its argument, evaluate the body in the clone. Bindings made inside
/// the body never reach the caller.
pub fn apply_lambda(
    lambda: &Expression,
    args: &[Expression],
    env: &Environment,
) -> SemanticResult<Expression> {
    let template: &Expression = &lambda.tail()[0];
    let body: &Expression = &lambda.tail()[1];
    let nparams: usize = 1 + template.tail().len();
    if args.len() != nparams {
        return Err(serr_fmt!(
            "expected {} arguments in call to procedure but got {}",
            nparams, args.len()));
    }
    let mut inner: Environment = env.clone();
    inner.shadow(template.head(), args[0].clone());
    for (p, a) in template.tail().iter().zip(args[1..].iter()) {
        inner.shadow(p.head(), a.clone());
    }
    return body.eval(&mut inner);
}

#[cfg(test)]
mod tests {
    use num_complex::Complex64 as C64;
    use crate::expression::quoted;
    use crate::parse::parse_expression;
    use super::*;

    fn run(src: &str, env: &mut Environment) -> SemanticResult<Expression> {
        return parse_expression(src).unwrap().eval(env);
    }

    fn eval_one(src: &str) -> SemanticResult<Expression> {
        let mut env = Environment::default();
        return run(src, &mut env);
    }

    #[test]
    fn arithmetic_program() {
        assert_eq!(eval_one("(+ 1 2 3)").unwrap(), Expression::number(6.0));
        assert_eq!(
            eval_one("(- (* 2 3) (/ 4 2))").unwrap(),
            Expression::number(4.0),
        );
    }

    #[test]
    fn begin_threads_definitions_and_returns_the_last_form() {
        let out = eval_one("(begin (define a 3) (define b (+ 1 a)) b)");
        assert_eq!(out.unwrap(), Expression::number(4.0));
    }

    #[test]
    fn constants_resolve() {
        assert_eq!(
            eval_one("I").unwrap(),
            Expression::complex(C64::new(0.0, 1.0)),
        );
        assert_eq!(
            eval_one("pi").unwrap(),
            Expression::number(std::f64::consts::PI),
        );
    }

    #[test]
    fn complex_promotion_through_operators() {
        assert_eq!(
            eval_one("(+ 1 2 I)").unwrap(),
            Expression::complex(C64::new(3.0, 1.0)),
        );
        assert_eq!(
            eval_one("(sqrt -4)").unwrap(),
            Expression::complex(C64::new(0.0, 2.0)),
        );
    }

    #[test]
    fn scalars_and_strings_evaluate_to_themselves() {
        assert_eq!(eval_one("42").unwrap(), Expression::number(42.0));
        assert_eq!(
            eval_one("\"hi there\"").unwrap(),
            Expression::string_literal("hi there"),
        );
    }

    #[test]
    fn unknown_symbols_fail_lookup() {
        let err = eval_one("nope").unwrap_err();
        assert_eq!(err.reason(), "unknown symbol nope");
    }

    #[test]
    fn list_form_is_total() {
        let out = eval_one("(list)").unwrap();
        assert!(out.is_list());
        assert!(out.tail().is_empty());
        assert_eq!(
            eval_one("(length (list))").unwrap(),
            Expression::number(0.0),
        );
        assert_eq!(
            eval_one("(list (+ 1 1) 3)").unwrap(),
            Expression::list(vec![
                Expression::number(2.0),
                Expression::number(3.0),
            ]),
        );
    }

    #[test]
    fn lambdas_capture_template_and_body_unevaluated() {
        let out = eval_one("(lambda (x y) (undefined-proc x y))").unwrap();
        assert!(out.is_lambda());
        assert_eq!(out.tail()[0].head().as_symbol(), "x");
        assert_eq!(out.tail()[0].tail()[0].head().as_symbol(), "y");
    }

    #[test]
    fn lambda_application_shadows_lexically() {
        let mut env = Environment::default();
        let out = run(
            "(begin (define x 1) (define f (lambda (x) x)) (f 2))",
            &mut env,
        );
        assert_eq!(out.unwrap(), Expression::number(2.0));
        // the binding in the caller's scope is untouched
        assert_eq!(
            env.get_exp(&Atom::symbol("x")).unwrap(),
            Expression::number(1.0),
        );
    }

    #[test]
    fn lambda_parameters_may_alias_builtins() {
        let out = eval_one(
            "(begin (define f (lambda (first) (+ first 1))) (f 2))");
        assert_eq!(out.unwrap(), Expression::number(3.0));
    }

    #[test]
    fn defines_inside_a_lambda_body_do_not_escape() {
        let mut env = Environment::default();
        let out = run(
            "(begin (define f (lambda (x) (begin (define y x) y))) (f 5))",
            &mut env,
        );
        assert_eq!(out.unwrap(), Expression::number(5.0));
        assert!(!env.is_exp(&Atom::symbol("y")));
    }

    #[test]
    fn lambda_arity_is_checked() {
        let err = eval_one(
            "(begin (define f (lambda (x y) (+ x y))) (f 1))").unwrap_err();
        assert_eq!(
            err.reason(),
            "expected 2 arguments in call to procedure but got 1",
        );
    }

    #[test]
    fn define_refuses_reserved_names() {
        assert!(eval_one("(define define 3)").is_err());
        assert!(eval_one("(define begin 3)").is_err());
        assert!(eval_one("(define + 3)").is_err());
        assert!(eval_one("(define pi 3)").is_err());
        assert!(eval_one("(define I 3)").is_err());
        assert!(eval_one("(define list 3)").is_err());
    }

    #[test]
    fn define_returns_the_bound_value_and_allows_rebinding() {
        let mut env = Environment::default();
        assert_eq!(
            run("(define a 1)", &mut env).unwrap(),
            Expression::number(1.0),
        );
        assert_eq!(
            run("(begin (define a 2) a)", &mut env).unwrap(),
            Expression::number(2.0),
        );
    }

    #[test]
    fn earlier_defines_survive_a_failing_begin() {
        let mut env = Environment::default();
        let out = run("(begin (define a 3) (first (list)))", &mut env);
        assert!(out.is_err());
        assert_eq!(
            env.get_exp(&Atom::symbol("a")).unwrap(),
            Expression::number(3.0),
        );
    }

    #[test]
    fn apply_spreads_a_list_of_arguments() {
        assert_eq!(
            eval_one("(apply + (list 1 2 3))").unwrap(),
            Expression::number(6.0),
        );
        let err = eval_one("(apply + 3)").unwrap_err();
        assert_eq!(err.reason(), "second argument to apply not a list");
        let err = eval_one("(apply nope (list 1))").unwrap_err();
        assert_eq!(err.reason(), "first argument to apply not a procedure");
    }

    #[test]
    fn map_applies_elementwise() {
        let out = eval_one(
            "(begin (define sq (lambda (x) (* x x))) (map sq (list 1 2 3)))");
        assert_eq!(
            out.unwrap(),
            Expression::list(vec![
                Expression::number(1.0),
                Expression::number(4.0),
                Expression::number(9.0),
            ]),
        );
        assert_eq!(
            eval_one("(map - (list 1 2))").unwrap(),
            Expression::list(vec![
                Expression::number(-1.0),
                Expression::number(-2.0),
            ]),
        );
        let err = eval_one("(map + 3)").unwrap_err();
        assert_eq!(err.reason(), "second argument to map not a list");
    }

    #[test]
    fn properties_round_trip_through_set_and_get() {
        assert_eq!(
            eval_one("(get-property \"key\" (set-property \"key\" 42 (list 1 2)))")
                .unwrap(),
            Expression::number(42.0),
        );
        // unset keys yield the unset expression
        assert!(eval_one("(get-property \"nope\" (list 1 2))")
            .unwrap()
            .is_empty());
        // latest write wins
        assert_eq!(
            eval_one(
                "(get-property \"k\" \
                 (set-property \"k\" 2 (set-property \"k\" 1 (list))))")
                .unwrap(),
            Expression::number(2.0),
        );
        assert!(eval_one("(set-property 1 2 (list))").is_err());
    }

    #[test]
    fn set_property_does_not_mutate_the_bound_target() {
        let mut env = Environment::default();
        run("(define l (list 1))", &mut env).unwrap();
        run("(set-property \"k\" 9 l)", &mut env).unwrap();
        let l = env.get_exp(&Atom::symbol("l")).unwrap();
        assert!(l.property(&quoted("k")).is_none());
    }

    #[test]
    fn non_symbol_heads_are_rejected() {
        let err = eval_one("(1 2)").unwrap_err();
        assert_eq!(err.reason(), "head of expression is not a symbol");
        let err = eval_one("(\"f\" 2)").unwrap_err();
        assert_eq!(err.reason(), "head of expression is not a symbol");
    }

    #[test]
    fn bound_non_procedures_cannot_be_applied() {
        let err = eval_one("(begin (define x 3) (x 1))").unwrap_err();
        assert_eq!(err.reason(), "symbol does not name a procedure");
    }
}
