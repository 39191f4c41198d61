// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Compilation pipeline
//!
//! A [Compiler] turns a pattern into a [Compilation] that holds the result
//! of every stage: alphabet, syntax tree, NFA, DFA from the subset
//! construction, and minimal DFA. Code is generated on demand from the
//! minimal DFA.
//!
//! Each compilation owns its alphabet, so independent compilations don't
//! share any state.
//!

use crate::{
    alphabet::Alphabet,
    automata::{Dfa, Strategy},
    codegen::{generate, CodegenOptions, GeneratedCode},
    determinizer::determinize,
    errors::Error,
    nfa::{Fragment, Nfa},
    parser::{parse, Ast},
};

///
/// Compiler configuration
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Minimization algorithm
    pub strategy: Strategy,
    /// Options for [Compilation::generate]
    pub codegen: CodegenOptions,
}

///
/// Pattern compiler
///
/// # Example
///
/// ```
/// use minidfa::Compiler;
///
/// let compilation = Compiler::new().compile("(a|b)*abb").unwrap();
/// assert_eq!(compilation.minimal_dfa().num_states(), 4);
/// assert!(compilation.matches("babb"));
/// assert!(!compilation.matches("abba"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: Options,
}

///
/// Result of compiling one pattern
///
#[derive(Debug, Clone)]
pub struct Compilation {
    alphabet: Alphabet,
    ast: Ast,
    nfa: Nfa,
    dfa: Dfa,
    minimal_dfa: Dfa,
    codegen: CodegenOptions,
}

impl Compiler {
    /// Compiler with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiler with the given options
    pub fn with_options(options: Options) -> Self {
        Compiler { options }
    }

    /// Options of this compiler
    pub fn options(&self) -> &Options {
        &self.options
    }

    ///
    /// Compile a pattern
    ///
    /// # Errors
    ///
    /// Return [Error::Syntax] if the pattern is malformed.
    ///
    pub fn compile(&self, pattern: &str) -> Result<Compilation, Error> {
        let mut alphabet = Alphabet::new();
        let ast = parse(pattern, &mut alphabet)?;
        log::debug!("parsed {ast}, alphabet {alphabet}");

        let nfa = Fragment::from_ast(&ast, &|c: char| alphabet.index(c)).finalize();
        log::debug!("NFA: {} states", nfa.num_states());
        log::trace!("NFA\n{nfa}");

        let dfa = determinize(&nfa, alphabet.len());
        log::trace!("DFA\n{dfa}");

        let minimal_dfa = dfa.minimized(self.options.strategy);
        log::trace!("minimal DFA\n{minimal_dfa}");

        Ok(Compilation {
            alphabet,
            ast,
            nfa,
            dfa,
            minimal_dfa,
            codegen: self.options.codegen.clone(),
        })
    }
}

impl Compilation {
    /// Symbols of the pattern, in order of first occurrence
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Syntax tree
    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// NFA built from the syntax tree
    pub fn nfa(&self) -> &Nfa {
        &self.nfa
    }

    /// DFA produced by the subset construction
    pub fn dfa(&self) -> &Dfa {
        &self.dfa
    }

    /// Minimal DFA, numbered canonically
    pub fn minimal_dfa(&self) -> &Dfa {
        &self.minimal_dfa
    }

    /// Generate code for the minimal DFA with the compiler's options
    pub fn generate(&self) -> GeneratedCode {
        self.generate_with(&self.codegen)
    }

    /// Generate code for the minimal DFA with other options
    pub fn generate_with(&self, options: &CodegenOptions) -> GeneratedCode {
        generate(&self.minimal_dfa, &self.alphabet, options)
    }

    /// Check whether input matches the pattern
    pub fn matches(&self, input: &str) -> bool {
        self.minimal_dfa.matches(&self.alphabet, input)
    }
}
