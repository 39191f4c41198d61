// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! C++ code generation for a deterministic automaton
//!
//! Every state becomes a boolean routine that reads one character from an
//! iterator range. It calls the routine of the successor state on a
//! matching character, rejects on any other character, and returns the
//! state's accepting flag at the end of the input.
//!
//! Routines are numbered from 1 in the automaton's state order. The output
//! has two parts: forward declarations for all routines, then their definitions.
//!

use std::fmt::Display;

use crate::{
    alphabet::Alphabet,
    automata::{Dfa, State},
};

///
/// Options for code generation
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenOptions {
    pub(crate) iterator_type: String,
    pub(crate) routine_prefix: String,
    pub(crate) indent: String,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        CodegenOptions {
            iterator_type: "std::string::const_iterator".to_string(),
            routine_prefix: "State_".to_string(),
            indent: "\t".to_string(),
        }
    }
}

impl CodegenOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the type of the iterator parameters
    pub fn iterator_type(mut self, value: impl Into<String>) -> Self {
        self.iterator_type = value.into();
        self
    }

    /// Set the prefix of routine names
    pub fn routine_prefix(mut self, value: impl Into<String>) -> Self {
        self.routine_prefix = value.into();
        self
    }

    /// Set the indentation unit
    pub fn indent(mut self, value: impl Into<String>) -> Self {
        self.indent = value.into();
        self
    }
}

///
/// Generated source: declarations and definitions
///
/// The Display implementation prints the full file: declarations, a blank
/// line, then definitions.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCode {
    declarations: String,
    definitions: String,
}

impl GeneratedCode {
    /// One declaration per line
    pub fn declarations(&self) -> &str {
        &self.declarations
    }

    /// Routine definitions, separated by blank lines
    pub fn definitions(&self) -> &str {
        &self.definitions
    }
}

impl Display for GeneratedCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n{}", self.declarations, self.definitions)
    }
}

struct Emitter<'a> {
    dfa: &'a Dfa,
    alphabet: &'a Alphabet,
    options: &'a CodegenOptions,
    output: String,
}

impl Emitter<'_> {
    fn routine_name(&self, s: &State) -> String {
        format!("{}{}", self.options.routine_prefix, s.id() + 1)
    }

    fn signature(&self, s: &State) -> String {
        let iter = &self.options.iterator_type;
        format!("bool {}({iter} it, {iter} end)", self.routine_name(s))
    }

    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.output.push_str(&self.options.indent);
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn emit_declarations(&mut self) {
        let dfa = self.dfa;
        for s in dfa.states() {
            let decl = format!("{};", self.signature(s));
            self.line(0, &decl);
        }
    }

    fn emit_routine(&mut self, s: &State) {
        let signature = self.signature(s);
        self.line(0, &signature);
        self.line(0, "{");
        self.line(1, "if (it != end)");
        self.line(1, "{");
        self.line(2, "switch (*it++)");
        self.line(2, "{");
        let dfa = self.dfa;
        for (symbol, next) in dfa.edges(s) {
            let case = format!(
                "case '{}': return {}(it, end);",
                self.alphabet.symbol(symbol),
                self.routine_name(next)
            );
            self.line(2, &case);
        }
        self.line(2, "default: return false;");
        self.line(2, "}");
        self.line(1, "}");
        self.line(1, "else");
        self.line(2, if s.is_accepting() { "return true;" } else { "return false;" });
        self.line(0, "}");
    }

    fn emit_definitions(&mut self) {
        let dfa = self.dfa;
        for (i, s) in dfa.states().enumerate() {
            if i > 0 {
                self.output.push('\n');
            }
            self.emit_routine(s);
        }
    }

    fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}

///
/// Generate matcher routines for dfa
/// - alphabet must be the alphabet dfa was built with
///
pub fn generate(dfa: &Dfa, alphabet: &Alphabet, options: &CodegenOptions) -> GeneratedCode {
    let mut emitter = Emitter {
        dfa,
        alphabet,
        options,
        output: String::new(),
    };
    emitter.emit_declarations();
    let declarations = emitter.take_output();
    emitter.emit_definitions();
    let definitions = emitter.take_output();
    log::debug!(
        "generated {} routines ({} bytes)",
        dfa.num_states(),
        declarations.len() + definitions.len()
    );
    GeneratedCode {
        declarations,
        definitions,
    }
}
