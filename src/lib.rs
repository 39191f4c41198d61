// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Compile regular expressions to minimal deterministic automata
//!
//! # Overview
//!
//! This crate compiles a small regular-expression language (ASCII letters,
//! concatenation, alternation `|`, Kleene star `*`, and parentheses) into
//! a minimal deterministic finite-state automaton, then generates C++ source
//! for a family of mutually recursive matcher routines, one per state.
//!
//! The pipeline:
//! 1. [parser] builds a syntax tree and registers letters in an [Alphabet](alphabet::Alphabet).
//! 2. [nfa] folds the tree into a nondeterministic automaton (Thompson construction).
//! 3. [determinizer] converts the NFA to a DFA by subset construction.
//! 4. [automata] minimizes the DFA by partition refinement and numbers its states canonically.
//! 5. [codegen] renders the minimal DFA as source code.
//!
//! [Compiler] runs all the stages and returns a [Compilation] that gives access
//! to every intermediate result.
//!
//! ```
//! use minidfa::{Compiler, Options, Strategy};
//!
//! let compiler = Compiler::with_options(Options {
//!     strategy: Strategy::Moore,
//!     ..Options::default()
//! });
//! let compilation = compiler.compile("a(b|c)*").unwrap();
//! assert!(compilation.matches("abcb"));
//! let code = compilation.generate().to_string();
//! assert!(code.contains("case 'b': return State_2(it, end);"));
//! ```
//!

#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

pub mod alphabet;
pub mod automata;
pub mod codegen;
pub mod determinizer;
pub mod errors;
pub mod nfa;
pub mod parser;

mod bfs_queues;
mod compiler;
mod fast_sets;
mod minimizer;
mod partitions;

pub use automata::Strategy;
pub use codegen::{CodegenOptions, GeneratedCode};
pub use compiler::{Compilation, Compiler, Options};
pub use errors::{Error, SyntaxError, SyntaxErrorKind};
