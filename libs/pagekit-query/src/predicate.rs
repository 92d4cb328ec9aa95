//! Backend-neutral predicate tree produced by filter expression converters.

use std::fmt;

use crate::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Gt,
    Ge,
    Lt,
    Le,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "eq"),
            CompareOp::Gt => write!(f, "gt"),
            CompareOp::Ge => write!(f, "ge"),
            CompareOp::Lt => write!(f, "lt"),
            CompareOp::Le => write!(f, "le"),
        }
    }
}

/// One piece of a parsed like-pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LikeToken {
    Literal(String),
    /// `*`: any run of characters, possibly empty.
    AnyChars,
    /// `?`: exactly one character.
    AnyChar,
}

/// Wildcard pattern in neutral form; each backend renders its own syntax.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LikePattern {
    tokens: Vec<LikeToken>,
}

impl LikePattern {
    /// Split a raw search term on the `*` and `?` wildcard markers.
    #[must_use]
    pub fn parse(term: &str) -> Self {
        let mut tokens = Vec::new();
        let mut literal = String::new();

        for ch in term.chars() {
            let wildcard = match ch {
                '*' => LikeToken::AnyChars,
                '?' => LikeToken::AnyChar,
                c => {
                    literal.push(c);
                    continue;
                }
            };
            if !literal.is_empty() {
                tokens.push(LikeToken::Literal(std::mem::take(&mut literal)));
            }
            tokens.push(wildcard);
        }
        if !literal.is_empty() {
            tokens.push(LikeToken::Literal(literal));
        }

        Self { tokens }
    }

    #[must_use]
    pub fn tokens(&self) -> &[LikeToken] {
        &self.tokens
    }
}

impl fmt::Display for LikePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            match token {
                LikeToken::Literal(s) => write!(f, "{s}")?,
                LikeToken::AnyChars => write!(f, "*")?,
                LikeToken::AnyChar => write!(f, "?")?,
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    Compare {
        field: String,
        op: CompareOp,
        value: Value,
    },
    Like {
        field: String,
        pattern: LikePattern,
        negated: bool,
    },
    /// Conjunction of two or more predicates.
    And(Vec<Predicate>),
}

impl Predicate {
    pub fn compare(field: impl Into<String>, op: CompareOp, value: Value) -> Self {
        Predicate::Compare {
            field: field.into(),
            op,
            value,
        }
    }

    pub fn like(field: impl Into<String>, pattern: LikePattern) -> Self {
        Predicate::Like {
            field: field.into(),
            pattern,
            negated: false,
        }
    }

    pub fn not_like(field: impl Into<String>, pattern: LikePattern) -> Self {
        Predicate::Like {
            field: field.into(),
            pattern,
            negated: true,
        }
    }

    /// AND of `parts`; a single part is returned as is.
    #[must_use]
    pub fn all(mut parts: Vec<Predicate>) -> Self {
        if parts.len() == 1 {
            return parts.remove(0);
        }
        Predicate::And(parts)
    }
}
