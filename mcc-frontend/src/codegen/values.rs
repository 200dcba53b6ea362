//! Value helpers shared by expression and statement lowering
//!
//! Address materialisation, lval-to-rval loads, and int/float conversions.

use super::{location, register_class, CodeGenerator, CodeObject, CodegenError};
use mcc_codegen::{AsmInst, Reg, RegClass};
use mcc_common::{SourceSpan, Storage, Symbol, SymbolId, Type};

impl<'a> CodeGenerator<'a> {
    /// Put the address of a variable or string constant into a fresh temporary
    pub fn variable_address(
        &mut self,
        symbol: SymbolId,
        span: &SourceSpan,
    ) -> Result<(Vec<AsmInst>, Reg), CodegenError> {
        let entry = self.symbol(symbol, span)?;
        let dest = self.temps.fresh_int();

        let inst = match entry {
            Symbol::Variable(var) => match &var.storage {
                Storage::Local { offset } => AsmInst::AddI(dest, Reg::Fp, *offset),
                Storage::Global { label } => AsmInst::La(dest, label.clone()),
            },
            Symbol::StringConstant(s) => AsmInst::La(dest, s.label.clone()),
            Symbol::Function(f) => {
                return Err(CodegenError::invariant(
                    format!("function '{}' used as a variable", f.name),
                    &location(span),
                ));
            }
        };

        Ok((vec![inst], dest))
    }

    /// Address held by an lval, materialising it for plain variables
    pub fn lval_address(&mut self, co: &mut CodeObject, span: &SourceSpan) -> Result<Reg, CodegenError> {
        if !co.lval {
            return Err(CodegenError::invariant("expected an lval", &location(span)));
        }

        if let Some(symbol) = co.variable {
            let (code, addr) = self.variable_address(symbol, span)?;
            co.code.extend(code);
            return Ok(addr);
        }

        co.temp.ok_or_else(|| {
            CodegenError::invariant("lval has no storage location", &location(span))
        })
    }

    /// Turn an lval into an rval by loading from its address
    pub fn rvalify(&mut self, mut co: CodeObject, span: &SourceSpan) -> Result<CodeObject, CodegenError> {
        if !co.lval {
            return Ok(co);
        }

        let class = register_class(&co.ty).ok_or_else(|| {
            CodegenError::type_shape(format!("cannot load a value of type {}", co.ty), &location(span))
        })?;

        let addr = self.lval_address(&mut co, span)?;
        let dest = self.temps.fresh(class);
        co.code.push(match class {
            RegClass::Int => AsmInst::Lw(dest, addr, 0),
            RegClass::Float => AsmInst::Flw(dest, addr, 0),
        });

        Ok(CodeObject::rval(co.code, dest, co.ty))
    }

    /// Result register of an rval
    pub fn value_reg(&self, co: &CodeObject, span: &SourceSpan) -> Result<Reg, CodegenError> {
        co.temp.ok_or_else(|| {
            CodegenError::invariant(
                format!("expression of type {} produces no value", co.ty),
                &location(span),
            )
        })
    }

    /// int -> float conversion of an rval
    pub fn widen(&mut self, co: CodeObject, span: &SourceSpan) -> Result<CodeObject, CodegenError> {
        let src = self.value_reg(&co, span)?;
        let dest = self.temps.fresh_float();
        let mut code = co.code;
        code.push(AsmInst::IntToFloat(dest, src));
        Ok(CodeObject::rval(code, dest, Type::Float))
    }

    /// float -> int conversion of an rval
    pub fn narrow(&mut self, co: CodeObject, span: &SourceSpan) -> Result<CodeObject, CodegenError> {
        let src = self.value_reg(&co, span)?;
        let dest = self.temps.fresh_int();
        let mut code = co.code;
        code.push(AsmInst::FloatToInt(dest, src));
        Ok(CodeObject::rval(code, dest, Type::Int))
    }

    /// Convert an rval to `target`.
    ///
    /// Same type is a no-op. INT and FLOAT convert into each other. Values of
    /// integer class (INT, PTR, INFER) are re-typed without instructions.
    pub fn coerce(&mut self, co: CodeObject, target: &Type, span: &SourceSpan) -> Result<CodeObject, CodegenError> {
        if &co.ty == target {
            return Ok(co);
        }

        let from = co.ty.clone();
        match (&from, target) {
            (Type::Int, Type::Float) => self.widen(co, span),
            (Type::Float, Type::Int) => self.narrow(co, span),
            (from, to) if from.is_integer_class() && to.is_integer_class() => Ok(CodeObject {
                ty: target.clone(),
                ..co
            }),
            (from, to) => Err(CodegenError::type_shape(
                format!("cannot convert {} to {}", from, to),
                &location(span),
            )),
        }
    }
}
