//! Activation record layout and function prologue/epilogue
//!
//! The stack grows downward and `sp` always points at the next free word.
//! A frame holds, from the frame pointer down:
//! 1. Saved caller frame pointer (`0(fp)`)
//! 2. Local variables
//! 3. Every integer temporary the body uses, then every float temporary
//!
//! Above the frame pointer the caller has left the return address at
//! `4(fp)`, the return value slot at `8(fp)` and the arguments.

use mcc_codegen::{AsmInst, Reg};
use mcc_common::WORD_SIZE;

#[derive(Debug, Clone)]
pub struct Frame {
    /// Number of local variable words
    pub local_slots: u32,
    /// Integer temporaries t1..=tN used by the body
    pub int_temps: u32,
    /// Float temporaries f1..=fN used by the body
    pub float_temps: u32,
}

impl Frame {
    pub fn new(local_slots: u32, int_temps: u32, float_temps: u32) -> Self {
        Self {
            local_slots,
            int_temps,
            float_temps,
        }
    }

    /// Bytes the prologue moves the stack pointer by
    pub fn size(&self) -> i32 {
        WORD_SIZE * (1 + self.local_slots + self.int_temps + self.float_temps) as i32
    }

    /// Save the old frame pointer, set up the new frame and save temporaries
    pub fn gen_prologue(&self) -> Vec<AsmInst> {
        let mut insts = vec![
            AsmInst::Sw(Reg::Fp, Reg::Sp, 0),
            AsmInst::Move(Reg::Fp, Reg::Sp),
            AsmInst::AddI(Reg::Sp, Reg::Sp, -WORD_SIZE),
        ];

        if self.local_slots > 0 {
            insts.push(AsmInst::AddI(Reg::Sp, Reg::Sp, -WORD_SIZE * self.local_slots as i32));
        }

        for n in 1..=self.int_temps {
            insts.push(AsmInst::Sw(Reg::Int(n), Reg::Sp, 0));
            insts.push(AsmInst::AddI(Reg::Sp, Reg::Sp, -WORD_SIZE));
        }

        for n in 1..=self.float_temps {
            insts.push(AsmInst::Fsw(Reg::Float(n), Reg::Sp, 0));
            insts.push(AsmInst::AddI(Reg::Sp, Reg::Sp, -WORD_SIZE));
        }

        insts
    }

    /// Restore temporaries in reverse order, tear down the frame and return
    pub fn gen_epilogue(&self) -> Vec<AsmInst> {
        let mut insts = Vec::new();

        for n in (1..=self.float_temps).rev() {
            insts.push(AsmInst::AddI(Reg::Sp, Reg::Sp, WORD_SIZE));
            insts.push(AsmInst::Flw(Reg::Float(n), Reg::Sp, 0));
        }

        for n in (1..=self.int_temps).rev() {
            insts.push(AsmInst::AddI(Reg::Sp, Reg::Sp, WORD_SIZE));
            insts.push(AsmInst::Lw(Reg::Int(n), Reg::Sp, 0));
        }

        insts.push(AsmInst::Move(Reg::Sp, Reg::Fp));
        insts.push(AsmInst::Lw(Reg::Fp, Reg::Fp, 0));
        insts.push(AsmInst::Ret);
        insts
    }
}
