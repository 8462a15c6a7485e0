use std::collections::HashMap;
use std::fmt;
use num_complex::Complex64 as C64;
use crate::atom::Atom;

/// Structural tag of an expression node. `None` marks both the unset
/// expression and interior call nodes produced by the parser; the other
/// tags mark evaluated shapes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExpKind {
    #[default]
    None,
    Singleton,
    List,
    Lambda,
    Plot,
}

/// Tree node of the language: a head atom, ordered children, and a
/// string-keyed property map. Properties do not participate in equality.
#[derive(Clone, Debug, Default)]
pub struct Expression {
    pub(crate) head: Atom,
    pub(crate) tail: Vec<Expression>,
    pub(crate) properties: HashMap<String, Expression>,
    pub(crate) kind: ExpKind,
}

/// Wrap `text` in the double quotes used by string storage and property
/// keys.
pub fn quoted(text: &str) -> String { format!("\"{}\"", text) }

impl From<Atom> for Expression {
    fn from(head: Atom) -> Self {
        return Expression {
            head,
            tail: Vec::new(),
            properties: HashMap::new(),
            kind: ExpKind::Singleton,
        };
    }
}

impl Expression {
    pub fn number(x: f64) -> Self { Self::from(Atom::Number(x)) }

    pub fn complex(z: C64) -> Self { Self::from(Atom::Complex(z)) }

    pub fn symbol(s: &str) -> Self { Self::from(Atom::symbol(s)) }

    pub fn string_literal(text: &str) -> Self {
        return Self::from(Atom::string_literal(text));
    }

    pub fn list(items: Vec<Expression>) -> Self {
        return Expression {
            head: Atom::None,
            tail: items,
            properties: HashMap::new(),
            kind: ExpKind::List,
        };
    }

    /// Callable closure value: the argument template followed by the
    /// unevaluated body.
    pub fn lambda(template: Expression, body: Expression) -> Self {
        return Expression {
            head: Atom::None,
            tail: vec![template, body],
            properties: HashMap::new(),
            kind: ExpKind::Lambda,
        };
    }

    /// Plot value: drawable primitives in the tail, the discrete/continuous
    /// tag under the (unquoted, language-invisible) `type` key.
    pub fn plot(type_tag: &str, data: Vec<Expression>) -> Self {
        let mut properties: HashMap<String, Expression> = HashMap::new();
        properties.insert("type".to_string(), Expression::symbol(type_tag));
        return Expression {
            head: Atom::None,
            tail: data,
            properties,
            kind: ExpKind::Plot,
        };
    }

    /// Interior node of a parsed compound form: operator atom plus
    /// operand children.
    pub(crate) fn compound(head: Atom, tail: Vec<Expression>) -> Self {
        return Expression {
            head,
            tail,
            properties: HashMap::new(),
            kind: ExpKind::None,
        };
    }

    pub fn head(&self) -> &Atom { &self.head }

    pub fn tail(&self) -> &[Expression] { &self.tail }

    pub fn kind(&self) -> ExpKind { self.kind }

    /// True only for the fully unset expression.
    pub fn is_empty(&self) -> bool {
        return self.kind == ExpKind::None
            && self.head.is_none()
            && self.tail.is_empty();
    }

    pub fn is_singleton(&self) -> bool { self.kind == ExpKind::Singleton }

    pub fn is_list(&self) -> bool { self.kind == ExpKind::List }

    pub fn is_lambda(&self) -> bool { self.kind == ExpKind::Lambda }

    pub fn is_plot(&self) -> bool { self.kind == ExpKind::Plot }

    /// A bare string literal, e.g. a property key position.
    pub fn is_string_literal(&self) -> bool {
        return self.head.is_string() && self.tail.is_empty();
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: Expression) {
        self.properties.insert(key.into(), value);
    }

    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: Expression,
    ) -> Self {
        self.set_property(key, value);
        return self;
    }

    pub fn property(&self, key: &str) -> Option<&Expression> {
        return self.properties.get(key);
    }

    /// Property lookup in the language's terms: the stored value, or the
    /// unset expression when the key is absent.
    pub fn property_or_empty(&self, key: &str) -> Expression {
        return self.properties.get(key).cloned().unwrap_or_default();
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Expression) -> bool {
        return self.head == other.head
            && self.tail.len() == other.tail.len()
            && self.tail.iter().zip(other.tail.iter()).all(|(l, r)| l == r);
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "NONE");
        }
        return match self.kind {
            ExpKind::List | ExpKind::Lambda | ExpKind::Plot => {
                write!(f, "(")?;
                for (k, e) in self.tail.iter().enumerate() {
                    if k > 0 { write!(f, " ")?; }
                    write!(f, "{}", e)?;
                }
                write!(f, ")")
            },
            _ => {
                if self.tail.is_empty() {
                    write!(f, "{}", self.head)
                } else {
                    write!(f, "({}", self.head)?;
                    for e in self.tail.iter() {
                        write!(f, " {}", e)?;
                    }
                    write!(f, ")")
                }
            },
        };
    }
}
