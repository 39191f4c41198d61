// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! The NFA, the DFA, and the minimal DFA must accept the same strings.
//! They're checked against each other and against a direct matcher on
//! the syntax tree, for all strings up to a fixed length.
//!

use std::collections::BTreeSet;

use minidfa::{
    alphabet::Alphabet,
    parser::{parse, Ast},
    Compilation, Compiler, Options, Strategy,
};
use quickcheck::{Arbitrary, Gen, QuickCheck};

const MAX_LEN: usize = 6;

// all positions where a match of ast starting at start can end
fn match_ends(ast: &Ast, input: &[char], start: usize) -> BTreeSet<usize> {
    match ast {
        Ast::Literal(c) => {
            let mut result = BTreeSet::new();
            if input.get(start) == Some(c) {
                result.insert(start + 1);
            }
            result
        }
        Ast::Concat(l, r) => match_ends(l, input, start)
            .into_iter()
            .flat_map(|mid| match_ends(r, input, mid))
            .collect(),
        Ast::Alternate(l, r) => {
            let mut result = match_ends(l, input, start);
            result.extend(match_ends(r, input, start));
            result
        }
        Ast::Star(r) => {
            let mut result = BTreeSet::new();
            let mut pending = vec![start];
            while let Some(p) = pending.pop() {
                if result.insert(p) {
                    pending.extend(match_ends(r, input, p));
                }
            }
            result
        }
    }
}

fn reference_match(ast: &Ast, input: &str) -> bool {
    let chars: Vec<char> = input.chars().collect();
    match_ends(ast, &chars, 0).contains(&chars.len())
}

// all strings over the alphabet of length at most max_len
fn all_strings(alphabet: &Alphabet, max_len: usize) -> Vec<String> {
    let symbols: Vec<char> = alphabet.symbols().map(|(_, c)| c).collect();
    let mut result = vec![String::new()];
    let mut layer = vec![String::new()];
    for _ in 0..max_len {
        layer = layer
            .iter()
            .flat_map(|s| symbols.iter().map(move |c| format!("{s}{c}")))
            .collect();
        result.extend(layer.iter().cloned());
    }
    result
}

// first disagreement between the stages, if any
fn check_stages(c: &Compilation, max_len: usize) -> Result<(), String> {
    for input in all_strings(c.alphabet(), max_len) {
        let symbols = c.alphabet().encode(&input).unwrap();
        let expected = reference_match(c.ast(), &input);
        let results = [
            ("nfa", c.nfa().accepts(&symbols)),
            ("dfa", c.dfa().accepts(&symbols)),
            ("minimal dfa", c.minimal_dfa().accepts(&symbols)),
        ];
        for (stage, result) in results {
            if result != expected {
                return Err(format!(
                    "{}: {stage} gives {result} on {input:?}",
                    c.ast()
                ));
            }
        }
    }
    Ok(())
}

fn compile_with(pattern: &str, strategy: Strategy) -> Compilation {
    let compiler = Compiler::with_options(Options {
        strategy,
        ..Options::default()
    });
    compiler.compile(pattern).unwrap()
}

const PATTERNS: &[&str] = &[
    "a",
    "ab",
    "a|b",
    "a*",
    "(a|b)*abb",
    "a**",
    "(a*)*",
    "(a*|b*)*",
    "(a|b)*a(a|b)(a|b)",
    "a(b|c)*d",
    "(ab|ba)*",
    "((a|b)(a|b))*",
    "a*b*c*",
    "(a|ab)(c|bcd)",
    "(aa|aaa)*",
];

#[test]
fn stages_agree() {
    for pattern in PATTERNS {
        let c = compile_with(pattern, Strategy::Hopcroft);
        if let Err(msg) = check_stages(&c, MAX_LEN) {
            panic!("{msg}");
        }
    }
}

#[test]
fn strategies_agree() {
    for pattern in PATTERNS {
        let hopcroft = compile_with(pattern, Strategy::Hopcroft);
        let moore = compile_with(pattern, Strategy::Moore);
        assert_eq!(
            hopcroft.minimal_dfa(),
            moore.minimal_dfa(),
            "pattern {pattern}"
        );
    }
}

#[test]
fn minimization_is_idempotent() {
    for pattern in PATTERNS {
        let c = compile_with(pattern, Strategy::Hopcroft);
        let minimal = c.minimal_dfa();
        assert_eq!(&minimal.minimized(Strategy::Hopcroft), minimal, "pattern {pattern}");
        assert_eq!(&minimal.minimized(Strategy::Moore), minimal, "pattern {pattern}");
        assert!(minimal.num_states() <= c.dfa().num_states());
    }
}

#[test]
fn equivalent_patterns_have_identical_minimal_dfas() {
    let pairs = [
        ("(a|b)*", "(a*b*)*"),
        ("a**", "a*"),
        ("(a*)*", "a*"),
        ("aa*", "a*a"),
        ("(ab)*a", "a(ba)*"),
    ];
    for (p1, p2) in pairs {
        let c1 = compile_with(p1, Strategy::Hopcroft);
        let c2 = compile_with(p2, Strategy::Moore);
        assert_eq!(c1.alphabet(), c2.alphabet(), "{p1} vs {p2}");
        assert_eq!(c1.minimal_dfa(), c2.minimal_dfa(), "{p1} vs {p2}");
    }
}

#[test]
fn star_accepts_empty() {
    for pattern in ["a*", "(ab)*", "(a|bc)*", "(a*b)*"] {
        assert!(compile_with(pattern, Strategy::Hopcroft).matches(""));
    }
}

#[test]
fn alphabet_is_deterministic() {
    for pattern in PATTERNS {
        let mut a1 = Alphabet::new();
        let mut a2 = Alphabet::new();
        parse(pattern, &mut a1).unwrap();
        parse(pattern, &mut a2).unwrap();
        assert_eq!(a1, a2);
        let first_seen: Vec<char> = pattern.chars().filter(|c| c.is_ascii_alphabetic()).fold(
            Vec::new(),
            |mut v, c| {
                if !v.contains(&c) {
                    v.push(c);
                }
                v
            },
        );
        let registered: Vec<char> = a1.symbols().map(|(_, c)| c).collect();
        assert_eq!(registered, first_seen);
    }
}

// random patterns over { a, b, c }
#[derive(Clone, Debug)]
struct Pattern(String);

fn random_pattern(g: &mut Gen, depth: usize) -> String {
    let choice = if depth == 0 { 0 } else { u8::arbitrary(g) % 4 };
    match choice {
        0 => g.choose(&["a", "b", "c"]).unwrap().to_string(),
        1 => format!("{}{}", random_pattern(g, depth - 1), random_pattern(g, depth - 1)),
        2 => format!("({}|{})", random_pattern(g, depth - 1), random_pattern(g, depth - 1)),
        _ => format!("({})*", random_pattern(g, depth - 1)),
    }
}

impl Arbitrary for Pattern {
    fn arbitrary(g: &mut Gen) -> Self {
        let depth = usize::arbitrary(g) % 5;
        Pattern(random_pattern(g, depth))
    }
}

fn random_patterns_agree(p: Pattern) -> bool {
    let hopcroft = compile_with(&p.0, Strategy::Hopcroft);
    let moore = compile_with(&p.0, Strategy::Moore);
    match check_stages(&hopcroft, 5) {
        Ok(()) => hopcroft.minimal_dfa() == moore.minimal_dfa(),
        Err(msg) => {
            println!("{msg}");
            false
        }
    }
}

#[test]
fn random_patterns() {
    QuickCheck::new()
        .tests(200)
        .quickcheck(random_patterns_agree as fn(Pattern) -> bool);
}
