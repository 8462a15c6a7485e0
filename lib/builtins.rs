use num_complex::Complex64 as C64;
use num_traits::{
    One,
    Zero,
};
use crate::atom::Atom;
use crate::error::SemanticResult;
use crate::expression::{
    quoted,
    Expression,
};
use crate::{serr, serr_fmt};

/*
 * argument plumbing
 */

fn arity(name: &str, args: &[Expression], n: usize) -> SemanticResult<()> {
    return if args.len() == n {
        Ok(())
    } else {
        Err(serr_fmt!(
            "{}: expected {} args but got {}", name, n, args.len()))
    };
}

fn number_of(name: &str, exp: &Expression) -> SemanticResult<f64> {
    return match exp.head() {
        Atom::Number(x) if exp.tail().is_empty() => Ok(*x),
        _ => Err(serr_fmt!("{}: argument not a number", name)),
    };
}

fn complex_of(name: &str, exp: &Expression) -> SemanticResult<C64> {
    return match exp.head() {
        Atom::Number(x) if exp.tail().is_empty() => Ok(C64::new(*x, 0.0)),
        Atom::Complex(z) if exp.tail().is_empty() => Ok(*z),
        _ => Err(serr_fmt!("{}: argument not a number", name)),
    };
}

fn list_of<'a>(name: &str, exp: &'a Expression)
    -> SemanticResult<&'a [Expression]>
{
    return if exp.is_list() {
        Ok(exp.tail())
    } else {
        Err(serr_fmt!("{}: argument not a list", name))
    };
}

fn boolean(b: bool) -> Expression {
    return Expression::symbol(if b { "True" } else { "False" });
}

/*
 * arithmetic
 */

pub fn add(args: &[Expression]) -> SemanticResult<Expression> {
    return if args.iter().any(|a| a.head().is_complex()) {
        let mut acc: C64 = C64::zero();
        for a in args.iter() {
            acc += complex_of("add", a)?;
        }
        Ok(Expression::complex(acc))
    } else {
        let mut acc: f64 = 0.0;
        for a in args.iter() {
            acc += number_of("add", a)?;
        }
        Ok(Expression::number(acc))
    };
}

pub fn mul(args: &[Expression]) -> SemanticResult<Expression> {
    return if args.iter().any(|a| a.head().is_complex()) {
        let mut acc: C64 = C64::one();
        for a in args.iter() {
            acc *= complex_of("mul", a)?;
        }
        Ok(Expression::complex(acc))
    } else {
        let mut acc: f64 = 1.0;
        for a in args.iter() {
            acc *= number_of("mul", a)?;
        }
        Ok(Expression::number(acc))
    };
}

pub fn subneg(args: &[Expression]) -> SemanticResult<Expression> {
    return match args {
        [x] => match x.head() {
            Atom::Number(v) => Ok(Expression::number(-v)),
            Atom::Complex(z) => Ok(Expression::complex(-z)),
            _ => Err(serr!("subneg: argument not a number")),
        },
        [l, r] => {
            if l.head().is_complex() || r.head().is_complex() {
                let lc: C64 = complex_of("subneg", l)?;
                let rc: C64 = complex_of("subneg", r)?;
                Ok(Expression::complex(lc - rc))
            } else {
                let ln: f64 = number_of("subneg", l)?;
                let rn: f64 = number_of("subneg", r)?;
                Ok(Expression::number(ln - rn))
            }
        },
        _ => Err(serr_fmt!(
            "subneg: expected 1 or 2 args but got {}", args.len())),
    };
}

pub fn div(args: &[Expression]) -> SemanticResult<Expression> {
    return match args {
        [x] => match x.head() {
            Atom::Number(v) => Ok(Expression::number(1.0 / v)),
            Atom::Complex(z) => Ok(Expression::complex(C64::one() / z)),
            _ => Err(serr!("div: argument not a number")),
        },
        [l, r] => {
            if l.head().is_complex() || r.head().is_complex() {
                let lc: C64 = complex_of("div", l)?;
                let rc: C64 = complex_of("div", r)?;
                Ok(Expression::complex(lc / rc))
            } else {
                let ln: f64 = number_of("div", l)?;
                let rn: f64 = number_of("div", r)?;
                Ok(Expression::number(ln / rn))
            }
        },
        _ => Err(serr_fmt!(
            "div: expected 1 or 2 args but got {}", args.len())),
    };
}

pub fn sqrt(args: &[Expression]) -> SemanticResult<Expression> {
    arity("sqrt", args, 1)?;
    return match args[0].head() {
        Atom::Number(x) if *x >= 0.0 => Ok(Expression::number(x.sqrt())),
        Atom::Number(x) => Ok(Expression::complex(C64::new(*x, 0.0).sqrt())),
        Atom::Complex(z) => Ok(Expression::complex(z.sqrt())),
        _ => Err(serr!("sqrt: argument not a number")),
    };
}

pub fn pow(args: &[Expression]) -> SemanticResult<Expression> {
    arity("pow", args, 2)?;
    if args[0].head().is_complex() || args[1].head().is_complex() {
        let b: C64 = complex_of("pow", &args[0])?;
        let e: C64 = complex_of("pow", &args[1])?;
        return Ok(Expression::complex(b.powc(e)));
    }
    let b: f64 = number_of("pow", &args[0])?;
    let e: f64 = number_of("pow", &args[1])?;
    let r: f64 = b.powf(e);
    // a real base with a fractional exponent can leave the real line
    return if r.is_nan() && !b.is_nan() && !e.is_nan() {
        Ok(Expression::complex(C64::new(b, 0.0).powc(C64::new(e, 0.0))))
    } else {
        Ok(Expression::number(r))
    };
}

pub fn ln(args: &[Expression]) -> SemanticResult<Expression> {
    arity("ln", args, 1)?;
    let x: f64 = number_of("ln", &args[0])?;
    return if x > 0.0 {
        Ok(Expression::number(x.ln()))
    } else {
        Err(serr!("ln: argument must be a positive real number"))
    };
}

pub fn sin(args: &[Expression]) -> SemanticResult<Expression> {
    arity("sin", args, 1)?;
    return Ok(Expression::number(number_of("sin", &args[0])?.sin()));
}

pub fn cos(args: &[Expression]) -> SemanticResult<Expression> {
    arity("cos", args, 1)?;
    return Ok(Expression::number(number_of("cos", &args[0])?.cos()));
}

pub fn tan(args: &[Expression]) -> SemanticResult<Expression> {
    arity("tan", args, 1)?;
    return Ok(Expression::number(number_of("tan", &args[0])?.tan()));
}

/*
 * complex projections (reals are accepted as complex)
 */

pub fn real(args: &[Expression]) -> SemanticResult<Expression> {
    arity("real", args, 1)?;
    return Ok(Expression::number(complex_of("real", &args[0])?.re));
}

pub fn imag(args: &[Expression]) -> SemanticResult<Expression> {
    arity("imag", args, 1)?;
    return Ok(Expression::number(complex_of("imag", &args[0])?.im));
}

pub fn mag(args: &[Expression]) -> SemanticResult<Expression> {
    arity("mag", args, 1)?;
    return Ok(Expression::number(complex_of("mag", &args[0])?.norm()));
}

pub fn arg(args: &[Expression]) -> SemanticResult<Expression> {
    arity("arg", args, 1)?;
    return Ok(Expression::number(complex_of("arg", &args[0])?.arg()));
}

pub fn conj(args: &[Expression]) -> SemanticResult<Expression> {
    arity("conj", args, 1)?;
    return Ok(Expression::complex(complex_of("conj", &args[0])?.conj()));
}

/*
 * comparisons; results are the symbols True / False
 */

pub fn eq(args: &[Expression]) -> SemanticResult<Expression> {
    arity("eq", args, 2)?;
    return Ok(boolean(args[0] == args[1]));
}

pub fn neq(args: &[Expression]) -> SemanticResult<Expression> {
    arity("neq", args, 2)?;
    return Ok(boolean(args[0] != args[1]));
}

pub fn lt(args: &[Expression]) -> SemanticResult<Expression> {
    arity("lt", args, 2)?;
    return Ok(boolean(
        number_of("lt", &args[0])? < number_of("lt", &args[1])?));
}

pub fn leq(args: &[Expression]) -> SemanticResult<Expression> {
    arity("leq", args, 2)?;
    return Ok(boolean(
        number_of("leq", &args[0])? <= number_of("leq", &args[1])?));
}

pub fn gt(args: &[Expression]) -> SemanticResult<Expression> {
    arity("gt", args, 2)?;
    return Ok(boolean(
        number_of("gt", &args[0])? > number_of("gt", &args[1])?));
}

pub fn geq(args: &[Expression]) -> SemanticResult<Expression> {
    arity("geq", args, 2)?;
    return Ok(boolean(
        number_of("geq", &args[0])? >= number_of("geq", &args[1])?));
}

/*
 * lists
 */

pub fn list(args: &[Expression]) -> SemanticResult<Expression> {
    return Ok(Expression::list(args.to_vec()));
}

pub fn first(args: &[Expression]) -> SemanticResult<Expression> {
    arity("first", args, 1)?;
    let items: &[Expression] = list_of("first", &args[0])?;
    return items.first()
        .cloned()
        .ok_or_else(|| serr!("first: argument is an empty list"));
}

pub fn rest(args: &[Expression]) -> SemanticResult<Expression> {
    arity("rest", args, 1)?;
    let items: &[Expression] = list_of("rest", &args[0])?;
    return if items.is_empty() {
        Err(serr!("rest: argument is an empty list"))
    } else {
        Ok(Expression::list(items[1..].to_vec()))
    };
}

pub fn length(args: &[Expression]) -> SemanticResult<Expression> {
    arity("length", args, 1)?;
    let items: &[Expression] = list_of("length", &args[0])?;
    return Ok(Expression::number(items.len() as f64));
}

pub fn append(args: &[Expression]) -> SemanticResult<Expression> {
    arity("append", args, 2)?;
    let mut items: Vec<Expression> = list_of("append", &args[0])?.to_vec();
    items.push(args[1].clone());
    return Ok(Expression::list(items));
}

pub fn join(args: &[Expression]) -> SemanticResult<Expression> {
    arity("join", args, 2)?;
    let mut items: Vec<Expression> = list_of("join", &args[0])?.to_vec();
    items.extend(list_of("join", &args[1])?.iter().cloned());
    return Ok(Expression::list(items));
}

pub fn range(args: &[Expression]) -> SemanticResult<Expression> {
    arity("range", args, 3)?;
    let begin: f64 = number_of("range", &args[0])?;
    let end: f64 = number_of("range", &args[1])?;
    let step: f64 = number_of("range", &args[2])?;
    if step <= 0.0 {
        return Err(serr!("range: negative or zero step"));
    }
    if begin > end {
        return Err(serr!("range: begin greater than end"));
    }
    let mut items: Vec<Expression> = Vec::new();
    let mut k: usize = 0;
    loop {
        let x: f64 = begin + (k as f64) * step;
        if x > end { break; }
        items.push(Expression::number(x));
        k += 1;
    }
    return Ok(Expression::list(items));
}

/*
 * plot primitives; the renderer reads these through their quoted
 * property keys
 */

pub fn make_point(args: &[Expression]) -> SemanticResult<Expression> {
    arity("make-point", args, 2)?;
    let x: f64 = number_of("make-point", &args[0])?;
    let y: f64 = number_of("make-point", &args[1])?;
    return Ok(
        Expression::list(vec![Expression::number(x), Expression::number(y)])
        .with_property(quoted("object-name"), Expression::string_literal("point"))
        .with_property(quoted("size"), Expression::number(0.0))
    );
}

pub fn make_line(args: &[Expression]) -> SemanticResult<Expression> {
    arity("make-line", args, 2)?;
    if !args[0].is_list() || !args[1].is_list() {
        return Err(serr!("make-line: argument not a point"));
    }
    return Ok(
        Expression::list(vec![args[0].clone(), args[1].clone()])
        .with_property(quoted("object-name"), Expression::string_literal("line"))
        .with_property(quoted("thickness"), Expression::number(1.0))
    );
}

pub fn make_text(args: &[Expression]) -> SemanticResult<Expression> {
    arity("make-text", args, 1)?;
    if !args[0].is_string_literal() {
        return Err(serr!("make-text: argument not a string"));
    }
    let origin: Expression = make_point(
        &[Expression::number(0.0), Expression::number(0.0)])?;
    return Ok(
        args[0].clone()
        .with_property(quoted("object-name"), Expression::string_literal("text"))
        .with_property(quoted("position"), origin)
        .with_property(quoted("text-scale"), Expression::number(1.0))
        .with_property(quoted("text-rotation"), Expression::number(0.0))
    );
}
