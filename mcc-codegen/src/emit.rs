//! Assembly listing emission
//!
//! Renders a validated instruction stream as text. Labels are flush left,
//! everything else is indented. An optional data section lists the global
//! words and string constants the program refers to by label.

use crate::asm::{AsmInst, ShapeError};
use mcc_common::CompilerError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmitError {
    #[error("instruction {index} ({text}): {source}")]
    InvalidInstruction {
        index: usize,
        text: String,
        source: ShapeError,
    },

    #[error("duplicate label '{0}'")]
    DuplicateLabel(String),
}

impl From<EmitError> for CompilerError {
    fn from(err: EmitError) -> Self {
        CompilerError::InternalError {
            message: format!("invalid assembly listing: {}", err),
        }
    }
}

/// One entry of the data section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataItem {
    /// A zero-initialised word
    Word { label: String },
    /// A NUL-terminated string constant
    Str { label: String, value: String },
}

impl DataItem {
    pub fn label(&self) -> &str {
        match self {
            DataItem::Word { label } | DataItem::Str { label, .. } => label,
        }
    }
}

impl fmt::Display for DataItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataItem::Word { label } => write!(f, "{}: .word 0", label),
            DataItem::Str { label, value } => write!(f, "{}: .asciiz {:?}", label, value),
        }
    }
}

/// A complete compiled program
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub data: Vec<DataItem>,
    pub text: Vec<AsmInst>,
}

#[derive(Debug, Clone)]
pub struct EmitOptions {
    /// Emit `.data`/`.text` sections instead of bare instructions
    pub data_section: bool,
    /// Indentation for non-label lines
    pub indent: usize,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            data_section: true,
            indent: 4,
        }
    }
}

/// Text and data labels share one namespace, so `labels` arrives seeded
/// with the data section's labels.
fn render<'a>(
    instructions: &'a [AsmInst],
    labels: &mut HashSet<&'a str>,
    indent: usize,
    out: &mut String,
) -> Result<(), EmitError> {
    let pad = " ".repeat(indent);

    for (index, inst) in instructions.iter().enumerate() {
        inst.validate().map_err(|source| EmitError::InvalidInstruction {
            index,
            text: inst.to_string(),
            source,
        })?;

        match inst {
            AsmInst::Label(label) => {
                if !labels.insert(label.as_str()) {
                    return Err(EmitError::DuplicateLabel(label.clone()));
                }
                out.push_str(&inst.to_string());
            }
            AsmInst::Blank => {}
            _ => {
                out.push_str(&pad);
                out.push_str(&inst.to_string());
            }
        }
        out.push('\n');
    }

    Ok(())
}

/// Validate and render a bare instruction stream
pub fn emit_instructions(instructions: &[AsmInst]) -> Result<String, EmitError> {
    let mut out = String::new();
    render(instructions, &mut HashSet::new(), EmitOptions::default().indent, &mut out)?;
    Ok(out)
}

/// Validate and render a complete program
pub fn emit_program(listing: &Listing, options: &EmitOptions) -> Result<String, EmitError> {
    let mut out = String::new();
    let mut labels = HashSet::new();
    for item in &listing.data {
        if !labels.insert(item.label()) {
            return Err(EmitError::DuplicateLabel(item.label().to_string()));
        }
    }

    if options.data_section {
        out.push_str(".data\n");
        let pad = " ".repeat(options.indent);
        for item in &listing.data {
            out.push_str(&pad);
            out.push_str(&item.to_string());
            out.push('\n');
        }
        out.push_str(".text\n");
    }

    render(&listing.text, &mut labels, options.indent, &mut out)?;
    Ok(out)
}
