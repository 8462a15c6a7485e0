use std::mem;
use std::str::FromStr;
use crate::atom::Atom;
use crate::error::{
    ParseError,
    ParseResult,
};
use crate::expression::Expression;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Open,
    Close,
    /// Double-quoted run, stored including its quotes.
    Str(String),
    /// Maximal run of non-whitespace, non-paren, non-quote bytes.
    Bare(String),
}

enum TokenState {
    Normal,
    InComment,
    InString,
}

pub fn tokenize(input: &str) -> ParseResult<Vec<Token>> {
    let mut state = TokenState::Normal;
    let mut ret: Vec<Token> = Vec::new();
    let mut term: String = String::new();
    for x in input.chars() {
        match state {
            TokenState::Normal => match x {
                ';' => {
                    if !term.is_empty() {
                        ret.push(Token::Bare(mem::take(&mut term)));
                    }
                    state = TokenState::InComment;
                },
                '"' => {
                    if !term.is_empty() {
                        ret.push(Token::Bare(mem::take(&mut term)));
                    }
                    term.push(x);
                    state = TokenState::InString;
                },
                '(' => {
                    if !term.is_empty() {
                        ret.push(Token::Bare(mem::take(&mut term)));
                    }
                    ret.push(Token::Open);
                },
                ')' => {
                    if !term.is_empty() {
                        ret.push(Token::Bare(mem::take(&mut term)));
                    }
                    ret.push(Token::Close);
                },
                c if c.is_whitespace() => {
                    if !term.is_empty() {
                        ret.push(Token::Bare(mem::take(&mut term)));
                    }
                },
                _ => {
                    term.push(x);
                },
            },
            TokenState::InComment => {
                if x == '\n' {
                    state = TokenState::Normal;
                }
            },
            TokenState::InString => {
                term.push(x);
                if x == '"' {
                    ret.push(Token::Str(mem::take(&mut term)));
                    state = TokenState::Normal;
                }
            },
        }
    }
    return match state {
        TokenState::InString => Err(ParseError::UnterminatedString),
        _ => {
            if !term.is_empty() {
                ret.push(Token::Bare(term));
            }
            Ok(ret)
        },
    };
}

/// Parse one complete expression from source text. Anything left over after
/// the first top-level form is an error.
pub fn parse_expression(input: &str) -> ParseResult<Expression> {
    let tokens: Vec<Token> = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ParseError::EmptyInput);
    }
    let (exp, rest): (Expression, &[Token]) = parse_single(&tokens)?;
    if !rest.is_empty() {
        return Err(ParseError::TrailingInput);
    }
    return Ok(exp);
}

fn parse_single(tokens: &[Token]) -> ParseResult<(Expression, &[Token])> {
    let (token, rest)
        = tokens.split_first()
        .ok_or(ParseError::MissingClose)?;
    return match token {
        Token::Open => read_compound(rest),
        Token::Close => Err(ParseError::UnexpectedClose),
        Token::Str(s) | Token::Bare(s)
            => Ok((Expression::from(parse_atom(s)?), rest)),
    };
}

/// Everything after an opening paren: an atom operator followed by operand
/// forms, up to the matching close.
fn read_compound(tokens: &[Token]) -> ParseResult<(Expression, &[Token])> {
    let (token, mut xs)
        = tokens.split_first()
        .ok_or(ParseError::MissingClose)?;
    let head: Atom = match token {
        Token::Close => { return Err(ParseError::EmptyForm); },
        Token::Open => { return Err(ParseError::CompoundHead); },
        Token::Str(s) | Token::Bare(s) => parse_atom(s)?,
    };
    let mut tail: Vec<Expression> = Vec::new();
    loop {
        let (next, rest)
            = xs.split_first()
            .ok_or(ParseError::MissingClose)?;
        if *next == Token::Close {
            return Ok((Expression::compound(head, tail), rest));
        }
        let (exp, rest_new): (Expression, &[Token]) = parse_single(xs)?;
        tail.push(exp);
        xs = rest_new;
    }
}

/// Atom classification: a token that parses entirely as a double is a
/// number, a leading quote marks a string, any other token not starting
/// with a digit is a symbol.
pub fn parse_atom(token: &str) -> ParseResult<Atom> {
    if let Ok(x) = f64::from_str(token) {
        return Ok(Atom::Number(x));
    }
    if token.starts_with('"') {
        return Ok(Atom::String(token.to_string()));
    }
    return match token.chars().next() {
        Some(c) if !c.is_ascii_digit() => Ok(Atom::symbol(token)),
        _ => Err(ParseError::BadAtom(token.to_string())),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizer_splits_parens_and_bare_runs() {
        let tokens = tokenize("(+ 1\ttwo)").unwrap();
        assert_eq!(tokens, vec![
            Token::Open,
            Token::Bare("+".into()),
            Token::Bare("1".into()),
            Token::Bare("two".into()),
            Token::Close,
        ]);
    }

    #[test]
    fn tokenizer_keeps_string_quotes_and_contents() {
        let tokens = tokenize("(\"a (b) ; c\")").unwrap();
        assert_eq!(tokens, vec![
            Token::Open,
            Token::Str("\"a (b) ; c\"".into()),
            Token::Close,
        ]);
    }

    #[test]
    fn tokenizer_drops_comments_to_end_of_line() {
        let tokens = tokenize("1 ; the rest (is ignored\n2").unwrap();
        assert_eq!(
            tokens,
            vec![Token::Bare("1".into()), Token::Bare("2".into())],
        );
    }

    #[test]
    fn tokenizer_rejects_open_string() {
        assert_eq!(tokenize("(\"oops"), Err(ParseError::UnterminatedString));
    }

    #[test]
    fn atoms_classify_by_shape() {
        assert_eq!(parse_atom("-12.5e-1"), Ok(Atom::Number(-1.25)));
        assert_eq!(parse_atom("begin"), Ok(Atom::symbol("begin")));
        assert_eq!(
            parse_atom("\"begin\""),
            Ok(Atom::String("\"begin\"".into())),
        );
        assert_eq!(
            parse_atom("1abc"),
            Err(ParseError::BadAtom("1abc".into())),
        );
    }

    #[test]
    fn parses_nested_forms() {
        let exp = parse_expression("(begin (define x 1) (+ x 2))").unwrap();
        assert_eq!(exp.head().as_symbol(), "begin");
        assert_eq!(exp.tail().len(), 2);
        assert_eq!(exp.tail()[1].head().as_symbol(), "+");
        assert_eq!(exp.tail()[1].tail()[1], Expression::number(2.0));
    }

    #[test]
    fn single_atom_is_a_valid_program() {
        assert_eq!(parse_expression("42"), Ok(Expression::number(42.0)));
    }

    #[test]
    fn structural_failures() {
        assert_eq!(parse_expression("()"), Err(ParseError::EmptyForm));
        assert_eq!(parse_expression("(+ 1 2"), Err(ParseError::MissingClose));
        assert_eq!(parse_expression(")"), Err(ParseError::UnexpectedClose));
        assert_eq!(parse_expression("(+ 1) 2"), Err(ParseError::TrailingInput));
        assert_eq!(parse_expression("((+ 1) 2)"), Err(ParseError::CompoundHead));
        assert_eq!(parse_expression("  ; just a comment\n"), Err(ParseError::EmptyInput));
    }
}
