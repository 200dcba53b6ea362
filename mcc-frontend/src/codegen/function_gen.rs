//! Function and whole-program assembly
//!
//! The body is generated first so the prologue knows how many temporaries
//! it has to save.

use super::{location, CodeGenerator, CodegenError, Frame, FunctionContext, LabelGenerator};
use crate::ast::{FunctionDefinition, Program};
use mcc_codegen::{AsmInst, Reg};
use log::{debug, warn};

impl<'a> CodeGenerator<'a> {
    /// Lower one function definition into a complete labelled routine
    pub fn generate_function(&mut self, function: &FunctionDefinition) -> Result<Vec<AsmInst>, CodegenError> {
        self.mark_generated(function.symbol, &function.name, &function.span)?;
        
        let entry = self.symbol(function.symbol, &function.span)?.as_function().ok_or_else(|| {
            CodegenError::invariant(
                format!("'{}' is not bound to a function", function.name),
                &location(&function.span),
            )
        })?;
        if !entry.is_defined() {
            return Err(CodegenError::invariant(
                format!("function '{}' has a body but was never defined", function.name),
                &location(&function.span),
            ));
        }
        
        self.temps.reset();
        self.current_function = Some(FunctionContext {
            name: function.name.clone(),
            return_type: entry.return_type.clone(),
        });
        
        let body = self.generate_block(&function.body);
        self.current_function = None;
        let body = body?;
        
        let frame = Frame::new(
            entry.local_slot_count(),
            self.temps.int_count(),
            self.temps.float_count(),
        );
        debug!(
            "function {}: {} locals, {} int temps, {} float temps",
            function.name, frame.local_slots, frame.int_temps, frame.float_temps
        );
        
        let return_label = LabelGenerator::function_return(&function.name);
        let mut code = vec![AsmInst::Label(LabelGenerator::function(&function.name))];
        code.extend(frame.gen_prologue());
        code.extend(body.code);
        code.push(AsmInst::J(return_label.clone()));
        code.push(AsmInst::Label(return_label));
        code.extend(frame.gen_epilogue());
        Ok(code)
    }
    
    /// Lower a whole program: the entry stub followed by every function
    pub fn generate_program(&mut self, program: &Program) -> Result<Vec<AsmInst>, CodegenError> {
        if self.symbols.function_by_name("main").is_none() {
            warn!("program has no 'main' function");
        }
        
        let mut code = vec![
            AsmInst::Move(Reg::Fp, Reg::Sp),
            AsmInst::Call(LabelGenerator::function("main")),
            AsmInst::Halt,
            AsmInst::Blank,
        ];
        
        for function in &program.functions {
            code.extend(self.generate_function(function)?);
            code.push(AsmInst::Blank);
        }
        
        debug!("generated {} instructions for {} functions", code.len(), program.functions.len());
        Ok(code)
    }
}
