use indexmap::IndexSet;
use std::collections::HashSet;
use std::hash::BuildHasher;
use thiserror::Error;

/// Exact-string membership test used during evaluation.
pub trait AllowList {
    fn allows(&self, license: &str) -> bool;
}

impl<S: BuildHasher> AllowList for HashSet<String, S> {
    fn allows(&self, license: &str) -> bool {
        self.contains(license)
    }
}

impl<S: BuildHasher> AllowList for IndexSet<String, S> {
    fn allows(&self, license: &str) -> bool {
        self.contains(license)
    }
}

impl AllowList for [String] {
    fn allows(&self, license: &str) -> bool {
        self.iter().any(|allowed| allowed == license)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpressionError {
    #[error("empty license expression")]
    Empty,
    #[error("unexpected end of license expression")]
    UnexpectedEnd,
    #[error("unexpected '{token}' at offset {offset}")]
    UnexpectedToken { token: String, offset: usize },
    #[error("license expression nested deeper than {} levels", MAX_NESTING)]
    TooDeep,
    #[error("license expression longer than {} tokens", MAX_TOKENS)]
    TooLong,
}

/// Parenthesis nesting accepted by the parser.
pub const MAX_NESTING: usize = 64;
/// Tokens accepted by the parser; bounds the depth of operator chains.
pub const MAX_TOKENS: usize = 1024;

/// A parsed expression node borrowing from the declaration it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression<'a> {
    /// Exact text of this node, parentheses included
    pub source: &'a str,
    pub kind: ExprKind<'a>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprKind<'a> {
    License,
    With { license: &'a str, exception: &'a str },
    And(Box<Expression<'a>>, Box<Expression<'a>>),
    Or(Box<Expression<'a>>, Box<Expression<'a>>),
    /// A parenthesized sub-expression
    Group(Box<Expression<'a>>),
}

impl<'a> Expression<'a> {
    pub fn parse(input: &'a str) -> Result<Self, ExpressionError> {
        let tokens = tokenize(input);
        if tokens.is_empty() {
            return Err(ExpressionError::Empty);
        }
        if tokens.len() > MAX_TOKENS {
            return Err(ExpressionError::TooLong);
        }

        let mut parser = Parser {
            input,
            tokens,
            pos: 0,
            nesting: 0,
        };
        let expr = parser.parse_or()?;

        match parser.peek() {
            None => Ok(expr),
            Some(token) => Err(parser.unexpected(token)),
        }
    }

    /// Whether this expression is satisfied by `allowed`.
    ///
    /// The node's exact source text is checked first. Only `AND`/`OR` nodes
    /// are decomposed, short-circuiting left to right; an identifier or a
    /// `WITH` pairing, parenthesized or not, must be allowed as written.
    pub fn satisfied_by<A: AllowList + ?Sized>(&self, allowed: &A) -> bool {
        if allowed.allows(self.source) {
            return true;
        }

        match &self.kind {
            ExprKind::Group(inner) if inner.is_composite() => inner.satisfied_by(allowed),
            ExprKind::And(left, right) => left.satisfied_by(allowed) && right.satisfied_by(allowed),
            ExprKind::Or(left, right) => left.satisfied_by(allowed) || right.satisfied_by(allowed),
            ExprKind::Group(_) | ExprKind::License | ExprKind::With { .. } => false,
        }
    }

    /// True for `AND`/`OR` nodes, including ones wrapped in parentheses.
    fn is_composite(&self) -> bool {
        match &self.kind {
            ExprKind::And(..) | ExprKind::Or(..) => true,
            ExprKind::Group(inner) => inner.is_composite(),
            ExprKind::License | ExprKind::With { .. } => false,
        }
    }
}

/// Decide whether a single SPDX-style declaration is allowed.
///
/// A declaration is a bare identifier (`MIT`) or a composite built from
/// `AND`, `OR` and `WITH`, e.g. `(MIT OR (Apache-2.0 AND ISC))`. `WITH` binds
/// tightest, then `AND`, then `OR`. Declarations that don't parse, including
/// ones nested too deeply, are only accepted on an exact match.
pub fn satisfied<A: AllowList + ?Sized>(expr: &str, allowed: &A) -> bool {
    if allowed.allows(expr) {
        return true;
    }

    match Expression::parse(expr) {
        Ok(tree) => tree.satisfied_by(allowed),
        Err(_) => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Open(usize),
    Close(usize),
    Word(usize, usize),
}

impl Token {
    fn start(self) -> usize {
        match self {
            Token::Open(at) | Token::Close(at) => at,
            Token::Word(start, _) => start,
        }
    }

    fn end(self) -> usize {
        match self {
            Token::Open(at) | Token::Close(at) => at + 1,
            Token::Word(_, end) => end,
        }
    }
}

fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word_start: Option<usize> = None;

    for (i, c) in input.char_indices() {
        if c == '(' || c == ')' || c.is_whitespace() {
            if let Some(start) = word_start.take() {
                tokens.push(Token::Word(start, i));
            }
            match c {
                '(' => tokens.push(Token::Open(i)),
                ')' => tokens.push(Token::Close(i)),
                _ => {}
            }
        } else if word_start.is_none() {
            word_start = Some(i);
        }
    }
    if let Some(start) = word_start {
        tokens.push(Token::Word(start, input.len()));
    }

    tokens
}

const AND: &str = "AND";
const OR: &str = "OR";
const WITH: &str = "WITH";

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    /// Open parentheses enclosing the current position
    nesting: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Result<Token, ExpressionError> {
        let token = self.peek().ok_or(ExpressionError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(token)
    }

    fn text(&self, token: Token) -> &'a str {
        &self.input[token.start()..token.end()]
    }

    fn peek_operator(&self, op: &str) -> bool {
        matches!(self.peek(), Some(token @ Token::Word(..)) if self.text(token) == op)
    }

    fn unexpected(&self, token: Token) -> ExpressionError {
        ExpressionError::UnexpectedToken {
            token: self.text(token).to_string(),
            offset: token.start(),
        }
    }

    fn span(&self, start: usize, end: usize) -> &'a str {
        &self.input[start..end]
    }

    fn parse_or(&mut self) -> Result<Expression<'a>, ExpressionError> {
        let mut left = self.parse_and()?;
        while self.peek_operator(OR) {
            self.pos += 1;
            let right = self.parse_and()?;
            left = self.binary(left, right, ExprKind::Or);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expression<'a>, ExpressionError> {
        let mut left = self.parse_primary()?;
        while self.peek_operator(AND) {
            self.pos += 1;
            let right = self.parse_primary()?;
            left = self.binary(left, right, ExprKind::And);
        }
        Ok(left)
    }

    fn binary(
        &self,
        left: Expression<'a>,
        right: Expression<'a>,
        make: fn(Box<Expression<'a>>, Box<Expression<'a>>) -> ExprKind<'a>,
    ) -> Expression<'a> {
        let start = offset_in(self.input, left.source);
        let end = offset_in(self.input, right.source) + right.source.len();
        Expression {
            source: self.span(start, end),
            kind: make(Box::new(left), Box::new(right)),
        }
    }

    fn parse_primary(&mut self) -> Result<Expression<'a>, ExpressionError> {
        let token = self.next()?;
        match token {
            Token::Open(open) => {
                self.nesting += 1;
                if self.nesting > MAX_NESTING {
                    return Err(ExpressionError::TooDeep);
                }
                let inner = self.parse_or()?;
                self.nesting -= 1;
                match self.next()? {
                    Token::Close(close) => Ok(Expression {
                        source: self.span(open, close + 1),
                        kind: ExprKind::Group(Box::new(inner)),
                    }),
                    other => Err(self.unexpected(other)),
                }
            }
            Token::Close(_) => Err(self.unexpected(token)),
            Token::Word(start, _) => {
                let license = self.text(token);
                if is_operator(license) {
                    return Err(self.unexpected(token));
                }
                if !self.peek_operator(WITH) {
                    return Ok(Expression {
                        source: license,
                        kind: ExprKind::License,
                    });
                }

                // WITH only pairs two plain identifiers
                self.pos += 1;
                let exception_token = self.next()?;
                let exception = match exception_token {
                    Token::Word(..) if !is_operator(self.text(exception_token)) => {
                        self.text(exception_token)
                    }
                    other => return Err(self.unexpected(other)),
                };
                Ok(Expression {
                    source: self.span(start, exception_token.end()),
                    kind: ExprKind::With { license, exception },
                })
            }
        }
    }
}

fn is_operator(word: &str) -> bool {
    matches!(word, AND | OR | WITH)
}

/// Byte offset of `part`, which must be a subslice of `whole`.
fn offset_in(whole: &str, part: &str) -> usize {
    part.as_ptr() as usize - whole.as_ptr() as usize
}
