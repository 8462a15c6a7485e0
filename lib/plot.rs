use itertools::Itertools;
use crate::atom::Atom;
use crate::builtins;
use crate::environment::Environment;
use crate::error::SemanticResult;
use crate::eval::apply_lambda;
use crate::expression::{
    quoted,
    Expression,
};
use crate::{serr, serr_fmt};

/// Sampling intervals across the abscissa bounds of a continuous plot.
const SAMPLE_INTERVALS: usize = 50;

/// Label layout offsets, in data coordinates.
const TITLE_SHIFT: f64 = 3.0;
const ORDINATE_LABEL_SHIFT: f64 = 3.0;
const BOUND_LABEL_SHIFT_Y: f64 = 2.0;
const BOUND_LABEL_SHIFT_X: f64 = 2.0;

fn point(x: f64, y: f64) -> SemanticResult<Expression> {
    return builtins::make_point(
        &[Expression::number(x), Expression::number(y)]);
}

fn line(a: Expression, b: Expression) -> SemanticResult<Expression> {
    return builtins::make_line(&[a, b]);
}

/// A text primitive positioned at (x, y).
fn label(text: &str, x: f64, y: f64) -> SemanticResult<Expression> {
    let mut item: Expression
        = builtins::make_text(&[Expression::string_literal(text)])?;
    item.set_property(quoted("position"), point(x, y)?);
    return Ok(item);
}

fn point_coords(exp: &Expression) -> SemanticResult<(f64, f64)> {
    if exp.is_list() && exp.tail().len() == 2 {
        if let (Atom::Number(x), Atom::Number(y))
            = (exp.tail()[0].head(), exp.tail()[1].head())
        {
            return Ok((*x, *y));
        }
    }
    return Err(serr!("data point must be a list of two numbers"));
}

/// The four edge lines of the bounding box.
fn bounding_box(
    xmin: f64,
    xmax: f64,
    ymin: f64,
    ymax: f64,
) -> SemanticResult<Vec<Expression>> {
    let top_left: Expression = point(xmin, ymax)?;
    let top_right: Expression = point(xmax, ymax)?;
    let bot_left: Expression = point(xmin, ymin)?;
    let bot_right: Expression = point(xmax, ymin)?;
    return Ok(vec![
        line(top_left.clone(), bot_left.clone())?,
        line(top_right.clone(), bot_right.clone())?,
        line(top_left, top_right)?,
        line(bot_left, bot_right)?,
    ]);
}

/// Stringified bounds placed just outside the box: abscissa bounds under
/// the bottom edge, ordinate bounds left of the left edge.
fn bound_labels(
    xmin: f64,
    xmax: f64,
    ymin: f64,
    ymax: f64,
) -> SemanticResult<Vec<Expression>> {
    return Ok(vec![
        label(&format!("{}", xmin), xmin, ymin - BOUND_LABEL_SHIFT_Y)?,
        label(&format!("{}", xmax), xmax, ymin - BOUND_LABEL_SHIFT_Y)?,
        label(&format!("{}", ymin), xmin - BOUND_LABEL_SHIFT_X, ymin)?,
        label(&format!("{}", ymax), xmin - BOUND_LABEL_SHIFT_X, ymax)?,
    ]);
}

/// Axis lines for whichever zero line falls strictly inside the box.
fn axis_lines(
    xmin: f64,
    xmax: f64,
    ymin: f64,
    ymax: f64,
) -> SemanticResult<Vec<Expression>> {
    let mut axes: Vec<Expression> = Vec::new();
    if ymin < 0.0 && 0.0 < ymax {
        axes.push(line(point(xmin, 0.0)?, point(xmax, 0.0)?)?);
    }
    if xmin < 0.0 && 0.0 < xmax {
        axes.push(line(point(0.0, ymin)?, point(0.0, ymax)?)?);
    }
    return Ok(axes);
}

fn option_pair(name: &str, opt: &Expression)
    -> SemanticResult<(String, Expression)>
{
    if opt.is_list() && opt.tail().len() == 2 {
        return Ok((opt.tail()[0].head().as_string(), opt.tail()[1].clone()));
    }
    return Err(serr_fmt!("{}: options must be key-value pairs", name));
}

impl Expression {
    pub(crate) fn handle_discrete_plot(&self, env: &mut Environment)
        -> SemanticResult<Expression>
    {
        if self.tail().len() != 2 {
            return Err(serr!("invalid number of arguments for discrete-plot"));
        }
        let data: Expression = self.tail()[0].eval(env)?;
        let options: Expression = self.tail()[1].eval(env)?;
        if !data.is_list() || !options.is_list() {
            return Err(serr!("an argument to discrete-plot is not a list"));
        }
        let coords: Vec<(f64, f64)> = data.tail().iter()
            .map(point_coords)
            .collect::<SemanticResult<Vec<(f64, f64)>>>()?;
        let (xmin, xmax): (f64, f64) = coords.iter()
            .map(|c| c.0)
            .minmax()
            .into_option()
            .ok_or_else(
                || serr!("discrete-plot requires at least one data point"))?;
        let (ymin, ymax): (f64, f64) = coords.iter()
            .map(|c| c.1)
            .minmax()
            .into_option()
            .ok_or_else(
                || serr!("discrete-plot requires at least one data point"))?;

        let mut result: Vec<Expression>
            = bounding_box(xmin, xmax, ymin, ymax)?;
        result.extend(bound_labels(xmin, xmax, ymin, ymax)?);
        for opt in options.tail().iter() {
            let (_key, value) = option_pair("discrete-plot", opt)?;
            result.push(value);
        }
        // stems drop to the abscissa when it lies inside the box, else to
        // the bottom edge
        let stem_y: f64 = ymin.max(0.0);
        for (x, y) in coords.iter() {
            let p: Expression = point(*x, *y)?;
            result.push(p.clone());
            result.push(line(p, point(*x, stem_y)?)?);
        }
        result.extend(axis_lines(xmin, xmax, ymin, ymax)?);

        let mut dp = Expression::plot("DP", result);
        dp.set_property(
            "numpoints", Expression::number(coords.len() as f64));
        dp.set_property(
            "numoptions", Expression::number(options.tail().len() as f64));
        return Ok(dp);
    }

    pub(crate) fn handle_continuous_plot(&self, env: &mut Environment)
        -> SemanticResult<Expression>
    {
        if self.tail().len() != 2 && self.tail().len() != 3 {
            return Err(serr!(
                "invalid number of arguments for continuous-plot"));
        }
        let func: Expression = self.tail()[0].eval(env)?;
        if !func.is_lambda() {
            return Err(serr!("first argument to continuous-plot not a lambda"));
        }
        let bounds: Expression = self.tail()[1].eval(env)?;
        if !bounds.is_list() {
            return Err(serr!("second argument to continuous-plot not a list"));
        }
        let options: Expression = if self.tail().len() == 3 {
            let opts: Expression = self.tail()[2].eval(env)?;
            if !opts.is_list() {
                return Err(serr!(
                    "third argument to continuous-plot not a list"));
            }
            opts
        } else {
            Expression::list(Vec::new())
        };

        let edges: SemanticResult<Vec<f64>> = bounds.tail().iter()
            .map(|b| match b.head() {
                Atom::Number(x) => Ok(*x),
                _ => Err(serr!(
                    "continuous-plot bounds must be a list of two numbers")),
            })
            .collect();
        let edges: Vec<f64> = edges?;
        if edges.len() != 2 {
            return Err(serr!(
                "continuous-plot bounds must be a list of two numbers"));
        }
        let lo: f64 = edges[0].min(edges[1]);
        let hi: f64 = edges[0].max(edges[1]);

        let step: f64 = (hi - lo) / SAMPLE_INTERVALS as f64;
        let mut samples: Vec<(f64, f64)>
            = Vec::with_capacity(SAMPLE_INTERVALS + 1);
        for k in 0..=SAMPLE_INTERVALS {
            let x: f64 = lo + k as f64 * step;
            let y_exp: Expression
                = apply_lambda(&func, &[Expression::number(x)], env)?;
            let y: f64 = match y_exp.head() {
                Atom::Number(v) if y_exp.tail().is_empty() => *v,
                _ => {
                    return Err(serr!(
                        "continuous-plot function must produce a number"));
                },
            };
            samples.push((x, y));
        }
        let (ymin, ymax): (f64, f64) = samples.iter()
            .map(|s| s.1)
            .minmax()
            .into_option()
            .ok_or_else(|| serr!("continuous-plot sampled no points"))?;

        let mut result: Vec<Expression> = bounding_box(lo, hi, ymin, ymax)?;
        result.extend(bound_labels(lo, hi, ymin, ymax)?);
        result.extend(axis_lines(lo, hi, ymin, ymax)?);
        for ((x0, y0), (x1, y1)) in samples.iter().tuple_windows() {
            result.push(line(point(*x0, *y0)?, point(*x1, *y1)?)?);
        }

        let xmid: f64 = (lo + hi) / 2.0;
        let ymid: f64 = (ymin + ymax) / 2.0;
        for opt in options.tail().iter() {
            let (key, value) = option_pair("continuous-plot", opt)?;
            let position: Option<(f64, f64)> = match key.as_str() {
                k if k == quoted("title")
                    => Some((xmid, ymax + TITLE_SHIFT)),
                k if k == quoted("abscissa-label")
                    => Some((xmid, ymin - TITLE_SHIFT)),
                k if k == quoted("ordinate-label")
                    => Some((lo - ORDINATE_LABEL_SHIFT, ymid)),
                _ => None,
            };
            match position {
                Some((x, y)) if value.is_string_literal() => {
                    let mut item: Expression
                        = builtins::make_text(&[value])?;
                    item.set_property(quoted("position"), point(x, y)?);
                    result.push(item);
                },
                _ => { result.push(value); },
            }
        }

        let mut cp = Expression::plot("CP", result);
        cp.set_property(
            "numpoints", Expression::number(samples.len() as f64));
        cp.set_property(
            "numoptions", Expression::number(options.tail().len() as f64));
        return Ok(cp);
    }
}
