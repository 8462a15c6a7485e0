use std::io::Read;
use crate::environment::Environment;
use crate::error::SemanticResult;
use crate::expression::Expression;
use crate::parse::parse_expression;

/// Ties the parser, environment, and evaluator together: one long-lived
/// environment, one stored program. `parse_stream` replaces the program,
/// `evaluate` runs it.
#[derive(Default)]
pub struct Interpreter {
    env: Environment,
    ast: Expression,
}

impl Interpreter {
    /// Read a complete expression from `stream`. The stored program is
    /// replaced only on success.
    pub fn parse_stream<R: Read>(&mut self, mut stream: R) -> bool {
        let mut source = String::new();
        if stream.read_to_string(&mut source).is_err() {
            return false;
        }
        return match parse_expression(&source) {
            Ok(exp) => {
                self.ast = exp;
                true
            },
            Err(_) => false,
        };
    }

    /// Evaluate the stored program against the environment. Bindings made
    /// before a failure persist.
    pub fn evaluate(&mut self) -> SemanticResult<Expression> {
        let ast: Expression = self.ast.clone();
        return ast.eval(&mut self.env);
    }

    /// Restore the default environment.
    pub fn reset(&mut self) {
        self.env.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_eval(interp: &mut Interpreter, src: &str)
        -> SemanticResult<Expression>
    {
        assert!(interp.parse_stream(src.as_bytes()), "parse failed: {}", src);
        return interp.evaluate();
    }

    #[test]
    fn parse_failures_report_false_and_keep_the_old_program() {
        let mut interp = Interpreter::default();
        assert!(interp.parse_stream("(+ 1 2)".as_bytes()));
        assert!(!interp.parse_stream("(+ 1".as_bytes()));
        assert!(!interp.parse_stream("()".as_bytes()));
        // the previous program still evaluates
        assert_eq!(interp.evaluate().unwrap(), Expression::number(3.0));
    }

    #[test]
    fn environment_persists_across_programs() {
        let mut interp = Interpreter::default();
        parse_eval(&mut interp, "(define sq (lambda (x) (* x x)))").unwrap();
        assert_eq!(
            parse_eval(&mut interp, "(sq 7)").unwrap(),
            Expression::number(49.0),
        );
    }

    #[test]
    fn bindings_before_a_failure_survive_it() {
        let mut interp = Interpreter::default();
        let out = parse_eval(
            &mut interp, "(begin (define a 3) (ln -1))");
        assert!(out.is_err());
        assert_eq!(
            parse_eval(&mut interp, "a").unwrap(),
            Expression::number(3.0),
        );
    }

    #[test]
    fn reset_clears_user_bindings() {
        let mut interp = Interpreter::default();
        parse_eval(&mut interp, "(define a 3)").unwrap();
        interp.reset();
        assert!(parse_eval(&mut interp, "a").is_err());
    }

    #[test]
    fn printed_results_reparse() {
        let mut interp = Interpreter::default();
        for src in [
            "(+ 1 2 3)",
            "(list 1 4 9)",
            "(list (list 1) 2 \"three\")",
            "(first (list \"a\"))",
        ] {
            let printed: String
                = format!("{}", parse_eval(&mut interp, src).unwrap());
            assert!(
                interp.parse_stream(printed.as_bytes()),
                "printed form does not reparse: {}", printed,
            );
        }
    }
}
