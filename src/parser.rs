// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Parser for regular expressions
//!
//! The grammar (lowest precedence first):
//! ```text
//! expression := term ('|' term)*
//! term       := factor factor*
//! factor     := atom ('*')*
//! atom       := letter | '(' expression ')'
//! ```
//! where letter is an ASCII letter. Parentheses only affect precedence and
//! don't appear in the syntax tree.
//!
//! Every letter is registered in the [Alphabet] as it's parsed.
//!
//! Groups can be nested at most [MAX_NESTING] levels deep. Everything else
//! about the syntax tree is unbounded, so the functions on [Ast] walk it
//! with explicit stacks.
//!

use std::fmt::Display;

use crate::{
    alphabet::Alphabet,
    errors::{SyntaxError, SyntaxErrorKind},
};

///
/// Syntax tree
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    /// A single symbol
    Literal(char),
    /// Left followed by right
    Concat(Box<Ast>, Box<Ast>),
    /// Left or right
    Alternate(Box<Ast>, Box<Ast>),
    /// Zero or more repetitions
    Star(Box<Ast>),
}

///
/// Maximal depth of nested groups
///
pub const MAX_NESTING: usize = 256;

impl Ast {
    /// Number of nodes in the tree
    pub fn size(&self) -> usize {
        let mut stack = vec![self];
        let mut size = 0;
        while let Some(node) = stack.pop() {
            size += 1;
            match node {
                Ast::Literal(_) => {}
                Ast::Concat(l, r) | Ast::Alternate(l, r) => stack.extend([&**r, &**l]),
                Ast::Star(r) => stack.push(r),
            }
        }
        size
    }

    // move the subtrees out of self, leaving literals in their place
    fn take_children(&mut self, acc: &mut Vec<Ast>) {
        let mut take = |b: &mut Box<Ast>| {
            if !matches!(**b, Ast::Literal(_)) {
                acc.push(std::mem::replace(&mut **b, Ast::Literal('a')));
            }
        };
        match self {
            Ast::Literal(_) => {}
            Ast::Concat(l, r) | Ast::Alternate(l, r) => {
                take(l);
                take(r);
            }
            Ast::Star(r) => take(r),
        }
    }
}

// The default drop recurses once per level.
impl Drop for Ast {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.take_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.take_children(&mut pending);
        }
    }
}

// Binary nodes are fully parenthesized so the output parses back
// to an equivalent tree.
impl Display for Ast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        enum Piece<'a> {
            Node(&'a Ast),
            Text(&'static str),
        }

        let mut stack = vec![Piece::Node(self)];
        while let Some(piece) = stack.pop() {
            match piece {
                Piece::Text(s) => f.write_str(s)?,
                Piece::Node(Ast::Literal(c)) => write!(f, "{c}")?,
                Piece::Node(Ast::Concat(l, r)) => stack.extend([
                    Piece::Text(")"),
                    Piece::Node(r),
                    Piece::Node(l),
                    Piece::Text("("),
                ]),
                Piece::Node(Ast::Alternate(l, r)) => stack.extend([
                    Piece::Text(")"),
                    Piece::Node(r),
                    Piece::Text("|"),
                    Piece::Node(l),
                    Piece::Text("("),
                ]),
                Piece::Node(Ast::Star(r)) => stack.extend([Piece::Text("*"), Piece::Node(r)]),
            }
        }
        Ok(())
    }
}

fn is_literal(c: char) -> bool {
    c.is_ascii_alphabetic()
}

struct Parser<'a> {
    input: Vec<char>,
    pos: usize,
    depth: usize,
    alphabet: &'a mut Alphabet,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn error(&self, kind: SyntaxErrorKind, context: &str) -> SyntaxError {
        SyntaxError::new(kind, self.pos, context)
    }

    // error for the current lookahead
    fn unexpected(&self, context: &str) -> SyntaxError {
        match self.peek() {
            None => self.error(SyntaxErrorKind::UnexpectedEnd, context),
            Some(c) => self.error(SyntaxErrorKind::UnexpectedSymbol(c), context),
        }
    }

    fn expression(&mut self) -> Result<Ast, SyntaxError> {
        let mut left = self.term()?;
        while self.peek() == Some('|') {
            self.bump();
            let right = self.term()?;
            left = Ast::Alternate(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn term(&mut self) -> Result<Ast, SyntaxError> {
        let mut left = self.factor()?;
        loop {
            match self.peek() {
                Some(c) if c == '(' || is_literal(c) => {
                    let right = self.factor()?;
                    left = Ast::Concat(Box::new(left), Box::new(right));
                }
                None | Some('|') | Some(')') => return Ok(left),
                Some(_) => return Err(self.unexpected("in term: expected a letter, '(', '|' or ')'")),
            }
        }
    }

    fn factor(&mut self) -> Result<Ast, SyntaxError> {
        let mut atom = self.atom()?;
        while self.peek() == Some('*') {
            self.bump();
            atom = Ast::Star(Box::new(atom));
        }
        Ok(atom)
    }

    fn atom(&mut self) -> Result<Ast, SyntaxError> {
        match self.peek() {
            Some(c) if is_literal(c) => {
                self.bump();
                self.alphabet.register(c);
                Ok(Ast::Literal(c))
            }
            Some('(') => {
                if self.depth == MAX_NESTING {
                    return Err(self.error(
                        SyntaxErrorKind::NestingTooDeep,
                        &format!("(more than {MAX_NESTING} levels)"),
                    ));
                }
                let open = self.pos;
                self.bump();
                self.depth += 1;
                let inner = self.expression()?;
                self.depth -= 1;
                match self.peek() {
                    Some(')') => {
                        self.bump();
                        Ok(inner)
                    }
                    _ => Err(self.error(
                        SyntaxErrorKind::UnmatchedParen,
                        &format!("opened at position {open}"),
                    )),
                }
            }
            _ => Err(self.unexpected("in atom: expected a letter or '('")),
        }
    }
}

///
/// Parse a pattern and register its letters in alphabet
///
/// # Errors
///
/// Return a [SyntaxError] on the first violated rule. The alphabet may
/// contain the letters seen before the error.
///
/// # Example
///
/// ```
/// use minidfa::{alphabet::Alphabet, parser::{parse, Ast}};
///
/// let mut alphabet = Alphabet::new();
/// let ast = parse("ba*", &mut alphabet).unwrap();
/// assert_eq!(ast.to_string(), "(ba*)");
/// assert_eq!(alphabet.index_of('a'), Some(2));
/// ```
pub fn parse(pattern: &str, alphabet: &mut Alphabet) -> Result<Ast, SyntaxError> {
    let mut parser = Parser {
        input: pattern.chars().collect(),
        pos: 0,
        depth: 0,
        alphabet,
    };
    let ast = parser.expression()?;
    match parser.peek() {
        None => Ok(ast),
        Some(c) => Err(parser.error(
            SyntaxErrorKind::TrailingInput(c),
            "after a complete expression",
        )),
    }
}
