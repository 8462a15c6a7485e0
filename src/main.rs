#![allow(clippy::needless_return)]

use std::fs;
use std::process;
use clap::{
    App,
    Arg,
};
use plotscript::interpreter::Interpreter;
use plotscript::repl::run_repl;

/// Evaluated before any user input.
static STARTUP_PROGRAM: &str = include_str!("../startup.pls");

static VERSION: &str = "0.1.0";

fn error(err_str: &str) {
    eprintln!("Error: {}", err_str);
}

fn eval_source(interp: &mut Interpreter, source: &str) -> i32 {
    if !interp.parse_stream(source.as_bytes()) {
        error("Invalid Program. Could not parse.");
        return 1;
    }
    return match interp.evaluate() {
        Ok(exp) => {
            println!("{}", exp);
            0
        },
        Err(e) => {
            eprintln!("{}", e);
            1
        },
    };
}

fn main() {
    let matches = App::new("plotscript")
        .version(VERSION)
        .about("Interpreter for the plotscript expression language")
        .arg(Arg::with_name("FILE")
             .help("Program file to evaluate")
             .conflicts_with("expr"))
        .arg(Arg::with_name("expr")
             .short("e")
             .value_name("EXPR")
             .takes_value(true)
             .help("Evaluate a single expression and exit"))
        .get_matches();

    let mut interp = Interpreter::default();
    if !interp.parse_stream(STARTUP_PROGRAM.as_bytes()) {
        error("Invalid Startup Program. Could not parse.");
        process::exit(1);
    }
    if let Err(e) = interp.evaluate() {
        eprintln!("Start-up failed");
        eprintln!("{}", e);
        process::exit(1);
    }

    let code: i32 = if let Some(expr) = matches.value_of("expr") {
        eval_source(&mut interp, expr)
    } else if let Some(path) = matches.value_of("FILE") {
        match fs::read_to_string(path) {
            Ok(source) => eval_source(&mut interp, &source),
            Err(_) => {
                error("Could not open file for reading.");
                1
            },
        }
    } else {
        run_repl(interp);
        0
    };
    process::exit(code);
}
