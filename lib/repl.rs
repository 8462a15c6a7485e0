use std::borrow::Cow;
use std::str::FromStr;
use std::sync::Arc;
use std::thread;
use nu_ansi_term::{
    Color,
    Style,
};
use phf::phf_map;
use reedline::{
    self as reed,
};
use crate::environment::{
    CONSTANTS,
    PROCEDURES,
    SPECIAL_FORMS,
};
use crate::expression::Expression;
use crate::interpreter::Interpreter;
use crate::interrupt;
use crate::queue::MessageQueue;

/// What the evaluator thread hands back for every request: the result and
/// an error string, empty on success.
pub type ReplOutput = (Expression, String);

pub const PARSE_FAILURE: &str = "Invalid Expression. Could not parse.";

static HELP_TEXT: phf::Map<&'static str, &'static str> = phf_map! {
/*
 * special forms
 */
    "begin"
        => "Evaluate each form in order; the last value is the result.",
    "define"
        => "Bind a symbol to the value of an expression.",
    "lambda"
        => "Construct an anonymous procedure from a parameter list and a body.",
    "list"
        => "Collect the values of zero or more forms into a list.",
    "apply"
        => "Call a procedure with arguments taken from a list.",
    "map"
        => "Call a procedure on each element of a list.",
    "set-property"
        => "Attach a keyed property to a copy of a value.",
    "get-property"
        => "Read a keyed property off a value.",
    "discrete-plot"
        => "Build drawable primitives for a stem plot of data points.",
    "continuous-plot"
        => "Sample a procedure over bounds and build drawable primitives.",
/*
 * built-in procedures
 */
    "+" => "Sum zero or more numbers.",
    "-" => "Negate one number or subtract two.",
    "*" => "Multiply zero or more numbers.",
    "/" => "Reciprocal of one number or quotient of two.",
    "sqrt" => "Square root; negative reals produce a complex result.",
    "^" => "Exponentiation; leaves the real line only when it must.",
    "ln" => "Natural logarithm of a positive real.",
    "sin" => "Sine of a real number.",
    "cos" => "Cosine of a real number.",
    "tan" => "Tangent of a real number.",
    "real" => "Real part of a number.",
    "imag" => "Imaginary part of a number.",
    "mag" => "Magnitude of a number.",
    "arg" => "Argument (phase angle) of a number.",
    "conj" => "Complex conjugate of a number.",
    "=" => "Equality comparison; True or False.",
    "!=" => "Inequality comparison; True or False.",
    "<" => "Less-than comparison of two reals.",
    "<=" => "At-most comparison of two reals.",
    ">" => "Greater-than comparison of two reals.",
    ">=" => "At-least comparison of two reals.",
    "first" => "First element of a non-empty list.",
    "rest" => "Everything after the first element of a non-empty list.",
    "length" => "Number of elements in a list.",
    "append" => "Copy a list with one more value at the end.",
    "join" => "Concatenate two lists.",
    "range" => "Numbers from start to end in positive steps.",
    "make-point" => "Two numbers as a drawable point.",
    "make-line" => "Two points as a drawable line.",
    "make-text" => "A string as a drawable text item.",
/*
 * constants
 */
    "pi" => "The circle constant.",
    "e" => "Euler's number.",
    "I" => "The imaginary unit.",
};

/// Evaluator side of the REPL: pop request lines, parse and evaluate,
/// push (result, error) pairs. An empty line is the shutdown sentinel.
pub fn run_worker(
    mut interp: Interpreter,
    input: &MessageQueue<String>,
    output: &MessageQueue<ReplOutput>,
) {
    loop {
        let line: String = input.wait_and_pop();
        if line.is_empty() {
            break;
        }
        if line.trim() == "%reset" {
            interp.reset();
            output.push((Expression::default(), String::new()));
            continue;
        }
        interrupt::clear();
        let entry: ReplOutput = if !interp.parse_stream(line.as_bytes()) {
            (Expression::default(), PARSE_FAILURE.to_string())
        } else {
            match interp.evaluate() {
                Ok(exp) => (exp, String::new()),
                Err(e) => (Expression::default(), e.to_string()),
            }
        };
        output.push(entry);
    }
}

/// Reader side of the REPL: one reedline editor on the calling thread, one
/// evaluator on a worker thread, two queues between them.
pub fn run_repl(interp: Interpreter) {
    let input: Arc<MessageQueue<String>> = Arc::new(MessageQueue::new());
    let output: Arc<MessageQueue<ReplOutput>> = Arc::new(MessageQueue::new());
    let worker = {
        let input = Arc::clone(&input);
        let output = Arc::clone(&output);
        thread::spawn(move || run_worker(interp, &input, &output))
    };

    let mut line_editor = reed::Reedline::create()
        .with_highlighter(Box::new(PsHighlighter::new()));
    let prompt = PsPrompt { };
    loop {
        match line_editor.read_line(&prompt) {
            Ok(reed::Signal::Success(line)) => {
                let trimmed: &str = line.trim();
                if trimmed.is_empty() {
                    input.push(String::new());
                    break;
                }
                if let Some(topic) = trimmed.strip_prefix("%help") {
                    print_help(topic.trim());
                    continue;
                }
                input.push(line);
                let (result, error): ReplOutput = output.wait_and_pop();
                if error.is_empty() {
                    println!("{}", result);
                } else {
                    eprintln!("{}", error);
                }
            },
            Ok(reed::Signal::CtrlD) => {
                input.push(String::new());
                break;
            },
            Ok(reed::Signal::CtrlC) => {
                continue;
            },
            Err(e) => {
                eprintln!("Error: {}", e);
                input.push(String::new());
                break;
            },
        }
    }
    let _ = worker.join();
}

fn print_help(topic: &str) {
    if topic.is_empty() {
        let mut entries: Vec<(&str, &str)> = HELP_TEXT.entries()
            .map(|(name, text)| (*name, *text))
            .collect();
        entries.sort_unstable();
        for (name, text) in entries {
            println!("{:16}{}", name, text);
        }
    } else {
        match HELP_TEXT.get(topic) {
            Some(text) => { println!("{}", text); },
            None => { println!("no help for '{}'", topic); },
        }
    }
}

pub struct PsPrompt { }

impl reed::Prompt for PsPrompt {
    fn render_prompt_left(&self) -> Cow<str> { Cow::from("") }

    fn render_prompt_right(&self) -> Cow<str> { Cow::from("") }

    fn render_prompt_indicator(&self, _prompt_mode: reed::PromptEditMode)
        -> Cow<str>
    {
        return Cow::from("plotscript> ");
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<str> {
        return Cow::from("... ");
    }

    fn render_prompt_history_search_indicator(
        &self,
        _history_search: reed::PromptHistorySearch,
    ) -> Cow<str>
    {
        return Cow::from("history: ");
    }
}

pub struct PsHighlighter { }

impl PsHighlighter {
    pub fn new() -> Self { Self { } }
}

impl Default for PsHighlighter {
    fn default() -> Self { Self::new() }
}

fn hi_special() -> Style { Style::new().fg(Color::LightMagenta) }

fn hi_builtin() -> Style { Style::new().fg(Color::LightCyan) }

fn hi_const() -> Style { Style::new().fg(Color::White).bold() }

fn hi_number() -> Style { Style::new().fg(Color::LightBlue) }

fn hi_string() -> Style { Style::new().fg(Color::LightYellow) }

fn hi_comment() -> Style { Style::new().fg(Color::White).dimmed() }

fn hi_invalid() -> Style {
    return Style::new().fg(Color::White).on(Color::LightRed).bold();
}

fn hi_paren(level: usize) -> Style {
    const WHEEL: [Color; 4] = [
        Color::White,
        Color::LightYellow,
        Color::LightGreen,
        Color::LightBlue,
    ];
    return Style::new().fg(WHEEL[level % WHEEL.len()]).bold();
}

fn word_style(word: &str) -> Style {
    return if SPECIAL_FORMS.contains(&word) {
        hi_special()
    } else if PROCEDURES.contains(&word) {
        hi_builtin()
    } else if CONSTANTS.contains(&word) {
        hi_const()
    } else if f64::from_str(word).is_ok() {
        hi_number()
    } else {
        Style::default()
    };
}

enum HiState {
    Normal,
    InComment,
    InString,
}

fn flush_word(buffer: &mut Vec<(Style, String)>, term: &mut String) {
    if !term.is_empty() {
        buffer.push((word_style(term), std::mem::take(term)));
    }
}

impl reed::Highlighter for PsHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> reed::StyledText {
        let mut buffer: Vec<(Style, String)> = Vec::new();
        let mut state = HiState::Normal;
        let mut term: String = String::new();
        let mut depth: usize = 0;
        for x in line.chars() {
            match state {
                HiState::Normal => match x {
                    ';' => {
                        flush_word(&mut buffer, &mut term);
                        term.push(x);
                        state = HiState::InComment;
                    },
                    '"' => {
                        flush_word(&mut buffer, &mut term);
                        term.push(x);
                        state = HiState::InString;
                    },
                    '(' => {
                        flush_word(&mut buffer, &mut term);
                        buffer.push((hi_paren(depth), x.to_string()));
                        depth += 1;
                    },
                    ')' => {
                        flush_word(&mut buffer, &mut term);
                        let style: Style = if depth == 0 {
                            hi_invalid()
                        } else {
                            depth -= 1;
                            hi_paren(depth)
                        };
                        buffer.push((style, x.to_string()));
                    },
                    c if c.is_whitespace() => {
                        flush_word(&mut buffer, &mut term);
                        buffer.push((Style::default(), x.to_string()));
                    },
                    _ => { term.push(x); },
                },
                HiState::InComment => { term.push(x); },
                HiState::InString => {
                    term.push(x);
                    if x == '"' {
                        buffer.push((hi_string(), std::mem::take(&mut term)));
                        state = HiState::Normal;
                    }
                },
            }
        }
        match state {
            HiState::Normal => { flush_word(&mut buffer, &mut term); },
            HiState::InComment => { buffer.push((hi_comment(), term)); },
            HiState::InString => { buffer.push((hi_string(), term)); },
        }
        return reed::StyledText { buffer };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_worker()
        -> (Arc<MessageQueue<String>>, Arc<MessageQueue<ReplOutput>>,
            thread::JoinHandle<()>)
    {
        let input: Arc<MessageQueue<String>> = Arc::new(MessageQueue::new());
        let output: Arc<MessageQueue<ReplOutput>>
            = Arc::new(MessageQueue::new());
        let worker = {
            let input = Arc::clone(&input);
            let output = Arc::clone(&output);
            thread::spawn(move || {
                run_worker(Interpreter::default(), &input, &output)
            })
        };
        return (input, output, worker);
    }

    #[test]
    fn worker_round_trips_results_and_errors_in_order() {
        let (input, output, worker) = start_worker();
        input.push("(+ 1 2)".to_string());
        input.push("(+ 1".to_string());
        input.push("(first (list))".to_string());

        let (result, error) = output.wait_and_pop();
        assert_eq!(format!("{}", result), "3");
        assert!(error.is_empty());

        let (result, error) = output.wait_and_pop();
        assert!(result.is_empty());
        assert_eq!(error, PARSE_FAILURE);

        let (_, error) = output.wait_and_pop();
        assert_eq!(error, "Error: first: argument is an empty list");

        input.push(String::new());
        worker.join().unwrap();
    }

    #[test]
    fn worker_keeps_its_environment_between_requests() {
        let (input, output, worker) = start_worker();
        input.push("(define a 7)".to_string());
        output.wait_and_pop();
        input.push("(* a a)".to_string());
        let (result, error) = output.wait_and_pop();
        assert!(error.is_empty());
        assert_eq!(format!("{}", result), "49");
        input.push(String::new());
        worker.join().unwrap();
    }

    #[test]
    fn percent_reset_clears_definitions() {
        let (input, output, worker) = start_worker();
        input.push("(define a 7)".to_string());
        output.wait_and_pop();
        input.push("%reset".to_string());
        let (result, error) = output.wait_and_pop();
        assert!(result.is_empty());
        assert!(error.is_empty());
        input.push("a".to_string());
        let (_, error) = output.wait_and_pop();
        assert_eq!(error, "Error: unknown symbol a");
        input.push(String::new());
        worker.join().unwrap();
    }

    #[test]
    fn sentinel_terminates_the_worker() {
        let (input, _output, worker) = start_worker();
        input.push(String::new());
        worker.join().unwrap();
    }
}
