use super::*;
use crate::ast::{
    ArithOp, Expression, ExpressionKind, FunctionDefinition, Program, RelOp, Statement, StatementKind, UnaryOp,
};
use mcc_codegen::AsmInst;
use mcc_common::SourceSpan;
use pretty_assertions::assert_eq;

fn t(n: u32) -> Reg {
    Reg::Int(n)
}

fn f(n: u32) -> Reg {
    Reg::Float(n)
}

fn global(table: &mut SymbolTable, name: &str, ty: Type) -> Expression {
    let id = table.add_variable(name, ty.clone()).unwrap();
    Expression::variable(name, id, ty)
}

fn assign(target: Expression, value: Expression) -> Statement {
    Statement::new(StatementKind::Assign { target, value })
}

fn print(value: Expression) -> Statement {
    Statement::new(StatementKind::Print(value))
}

/// Declare and define a parameterless function with an empty local scope
fn define(table: &mut SymbolTable, name: &str, return_type: Type) -> SymbolId {
    let id = table.define_function(name, return_type, Vec::new()).unwrap();
    table.push_function_scope(name);
    table.pop_scope();
    id
}

fn function(name: &str, symbol: SymbolId, return_type: Type, body: Vec<Statement>) -> FunctionDefinition {
    FunctionDefinition {
        name: name.to_string(),
        symbol,
        return_type,
        parameters: Vec::new(),
        body,
        span: SourceSpan::dummy(),
    }
}

fn sp_adjustment(code: &[AsmInst]) -> i32 {
    code.iter()
        .map(|inst| match inst {
            AsmInst::AddI(Reg::Sp, Reg::Sp, imm) => *imm,
            _ => 0,
        })
        .sum()
}

fn labels(code: &[AsmInst]) -> Vec<String> {
    code.iter()
        .filter_map(|inst| match inst {
            AsmInst::Label(name) => Some(name.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_assign_int_sum_to_global() {
    let mut table = SymbolTable::new();
    let x = global(&mut table, "x", Type::Int);
    let sum = Expression::binary(ArithOp::Add, Expression::int(2), Expression::int(3)).unwrap();

    let mut gen = CodeGenerator::new(&table);
    let co = gen.generate_statement(&assign(x, sum)).unwrap();

    assert_eq!(
        co.code,
        vec![
            AsmInst::Li(t(1), 2),
            AsmInst::Li(t(2), 3),
            AsmInst::Add(t(3), t(1), t(2)),
            AsmInst::La(t(4), "x".to_string()),
            AsmInst::Sw(t(3), t(4), 0),
        ]
    );
    assert_eq!(co.ty, Type::Int);
}

#[test]
fn test_assign_int_to_float_widens_before_store() {
    let mut table = SymbolTable::new();
    let y = global(&mut table, "y", Type::Float);
    let z = global(&mut table, "z", Type::Int);

    let mut gen = CodeGenerator::new(&table);
    let co = gen.generate_statement(&assign(y, z)).unwrap();

    assert_eq!(
        co.code,
        vec![
            AsmInst::La(t(1), "z".to_string()),
            AsmInst::Lw(t(2), t(1), 0),
            AsmInst::La(t(3), "y".to_string()),
            AsmInst::IntToFloat(f(1), t(2)),
            AsmInst::Fsw(f(1), t(3), 0),
        ]
    );
    assert_eq!(co.ty, Type::Float);
}

#[test]
fn test_assign_to_local_uses_frame_offset() {
    let mut table = SymbolTable::new();
    table.define_function("g", Type::Void, Vec::new()).unwrap();
    table.push_function_scope("g");
    let id = table.add_variable("x", Type::Int).unwrap();
    table.pop_scope();

    let mut gen = CodeGenerator::new(&table);
    let x = Expression::variable("x", id, Type::Int);
    let co = gen.generate_statement(&assign(x.clone(), Expression::int(1))).unwrap();
    assert_eq!(
        co.code,
        vec![
            AsmInst::Li(t(1), 1),
            AsmInst::AddI(t(2), Reg::Fp, -4),
            AsmInst::Sw(t(1), t(2), 0),
        ]
    );

    let read = gen.generate_statement(&Statement::new(StatementKind::Read(x))).unwrap();
    assert_eq!(read.code, vec![AsmInst::GetI(t(3)), AsmInst::Sw(t(3), Reg::Fp, -4)]);
}

#[test]
fn test_store_through_pointer() {
    let mut table = SymbolTable::new();
    let p = global(&mut table, "p", Type::pointer_to(Type::Int));
    let target = Expression::deref(p).unwrap();

    let mut gen = CodeGenerator::new(&table);
    let co = gen.generate_statement(&assign(target, Expression::int(5))).unwrap();
    assert_eq!(
        co.code,
        vec![
            AsmInst::Li(t(1), 5),
            AsmInst::La(t(2), "p".to_string()),
            AsmInst::Lw(t(3), t(2), 0),
            AsmInst::Sw(t(1), t(3), 0),
        ]
    );
}

#[test]
fn test_coercion_round_trip() {
    let table = SymbolTable::new();
    let mut gen = CodeGenerator::new(&table);
    let span = SourceSpan::dummy();

    let value = gen.generate_rvalue(&Expression::int(7)).unwrap();
    let widened = gen.coerce(value, &Type::Float, &span).unwrap();
    assert_eq!(widened.ty, Type::Float);
    let back = gen.coerce(widened, &Type::Int, &span).unwrap();
    assert_eq!(back.ty, Type::Int);
    assert_eq!(
        back.code,
        vec![
            AsmInst::Li(t(1), 7),
            AsmInst::IntToFloat(f(1), t(1)),
            AsmInst::FloatToInt(t(2), f(1)),
        ]
    );

    // Same type is a no-op
    let same = gen.coerce(back.clone(), &Type::Int, &span).unwrap();
    assert_eq!(same, back);
}

#[test]
fn test_lval_becomes_rval_once() {
    let mut table = SymbolTable::new();
    let p = global(&mut table, "p", Type::pointer_to(Type::Float));
    let element = Expression::deref(p).unwrap();

    let mut gen = CodeGenerator::new(&table);
    let co = gen.generate_expression(&element).unwrap();
    assert!(co.lval);
    assert!(!co.is_variable());

    let value = gen.rvalify(co, &SourceSpan::dummy()).unwrap();
    assert!(!value.lval);
    assert_eq!(value.temp, Some(f(1)));
    assert_eq!(value.code.last(), Some(&AsmInst::Flw(f(1), t(2), 0)));

    // Loading an rval again changes nothing
    let again = gen.rvalify(value.clone(), &SourceSpan::dummy()).unwrap();
    assert_eq!(again, value);
}

#[test]
fn test_if_else_labels() {
    let mut table = SymbolTable::new();
    let a = global(&mut table, "a", Type::Int);
    let b = global(&mut table, "b", Type::Int);
    let condition = Expression::compare(RelOp::Less, a.clone(), b.clone()).unwrap();
    let stmt = Statement::new(StatementKind::If {
        condition,
        then_branch: vec![print(a)],
        else_branch: Some(vec![print(b)]),
    });

    let mut gen = CodeGenerator::new(&table);
    let co = gen.generate_statement(&stmt).unwrap();
    assert_eq!(
        co.code,
        vec![
            AsmInst::La(t(1), "a".to_string()),
            AsmInst::Lw(t(2), t(1), 0),
            AsmInst::La(t(3), "b".to_string()),
            AsmInst::Lw(t(4), t(3), 0),
            AsmInst::Bge(t(2), t(4), "else.1".to_string()),
            AsmInst::La(t(5), "a".to_string()),
            AsmInst::Lw(t(6), t(5), 0),
            AsmInst::PutI(t(6)),
            AsmInst::J("out.1".to_string()),
            AsmInst::Label("else.1".to_string()),
            AsmInst::La(t(7), "b".to_string()),
            AsmInst::Lw(t(8), t(7), 0),
            AsmInst::PutI(t(8)),
            AsmInst::Label("out.1".to_string()),
        ]
    );
}

#[test]
fn test_float_condition_branches_on_flag() {
    let mut table = SymbolTable::new();
    let x = global(&mut table, "x", Type::Float);
    let y = global(&mut table, "y", Type::Float);
    let condition = Expression::compare(RelOp::Greater, x.clone(), y).unwrap();
    let stmt = Statement::new(StatementKind::If {
        condition,
        then_branch: vec![print(x)],
        else_branch: None,
    });

    let mut gen = CodeGenerator::new(&table);
    let co = gen.generate_statement(&stmt).unwrap();
    assert_eq!(
        co.code,
        vec![
            AsmInst::La(t(1), "x".to_string()),
            AsmInst::Flw(f(1), t(1), 0),
            AsmInst::La(t(2), "y".to_string()),
            AsmInst::Flw(f(2), t(2), 0),
            AsmInst::Flt(t(3), f(2), f(1)),
            AsmInst::Beq(t(3), Reg::Zero, "out.1".to_string()),
            AsmInst::La(t(4), "x".to_string()),
            AsmInst::Flw(f(3), t(4), 0),
            AsmInst::PutF(f(3)),
            AsmInst::Label("out.1".to_string()),
        ]
    );
}

#[test]
fn test_while_loop_closes() {
    let mut table = SymbolTable::new();
    let i = global(&mut table, "i", Type::Int);
    let condition = Expression::compare(RelOp::Less, i.clone(), Expression::int(10)).unwrap();
    let step = Expression::binary(ArithOp::Add, i.clone(), Expression::int(1)).unwrap();
    let stmt = Statement::new(StatementKind::While {
        condition,
        body: vec![assign(i, step)],
    });

    let mut gen = CodeGenerator::new(&table);
    let co = gen.generate_statement(&stmt).unwrap();

    assert_eq!(co.code.first(), Some(&AsmInst::Label("loop.1".to_string())));
    assert_eq!(
        &co.code[co.code.len() - 2..],
        &[AsmInst::J("loop.1".to_string()), AsmInst::Label("out.1".to_string())]
    );
    assert!(co.code.contains(&AsmInst::Bge(t(2), t(3), "out.1".to_string())));
    assert_eq!(labels(&co.code), vec!["loop.1", "out.1"]);
}

#[test]
fn test_labels_unique_across_statements() {
    let mut table = SymbolTable::new();
    let a = global(&mut table, "a", Type::Int);
    let cond = || Expression::compare(RelOp::Equal, a.clone(), Expression::int(0)).unwrap();

    let mut gen = CodeGenerator::new(&table);
    let stmts = vec![
        Statement::new(StatementKind::If {
            condition: cond(),
            then_branch: vec![],
            else_branch: Some(vec![]),
        }),
        Statement::new(StatementKind::While { condition: cond(), body: vec![] }),
        Statement::new(StatementKind::If {
            condition: cond(),
            then_branch: vec![],
            else_branch: None,
        }),
    ];
    let co = gen.generate_block(&stmts).unwrap();

    assert_eq!(labels(&co.code), vec!["else.1", "out.1", "loop.1", "out.2", "out.3"]);
}

#[test]
fn test_function_frame() {
    let mut table = SymbolTable::new();
    let main = define(&mut table, "main", Type::Int);
    let body = vec![Statement::new(StatementKind::Return(Some(Expression::int(0))))];

    let mut gen = CodeGenerator::new(&table);
    let code = gen.generate_function(&function("main", main, Type::Int, body)).unwrap();

    assert_eq!(
        code,
        vec![
            AsmInst::Label("func.main".to_string()),
            AsmInst::Sw(Reg::Fp, Reg::Sp, 0),
            AsmInst::Move(Reg::Fp, Reg::Sp),
            AsmInst::AddI(Reg::Sp, Reg::Sp, -4),
            AsmInst::Sw(t(1), Reg::Sp, 0),
            AsmInst::AddI(Reg::Sp, Reg::Sp, -4),
            AsmInst::Li(t(1), 0),
            AsmInst::Sw(t(1), Reg::Fp, 8),
            AsmInst::J("ret.main".to_string()),
            AsmInst::J("ret.main".to_string()),
            AsmInst::Label("ret.main".to_string()),
            AsmInst::AddI(Reg::Sp, Reg::Sp, 4),
            AsmInst::Lw(t(1), Reg::Sp, 0),
            AsmInst::Move(Reg::Sp, Reg::Fp),
            AsmInst::Lw(Reg::Fp, Reg::Fp, 0),
            AsmInst::Ret,
        ]
    );
}

#[test]
fn test_float_return_converts_and_uses_fsw() {
    let mut table = SymbolTable::new();
    let half = define(&mut table, "half", Type::Float);
    let body = vec![Statement::new(StatementKind::Return(Some(Expression::int(1))))];

    let mut gen = CodeGenerator::new(&table);
    let code = gen.generate_function(&function("half", half, Type::Float, body)).unwrap();

    assert!(code.contains(&AsmInst::IntToFloat(f(1), t(1))));
    assert!(code.contains(&AsmInst::Fsw(f(1), Reg::Fp, 8)));
    // Both register files are saved by the prologue
    assert!(code.contains(&AsmInst::Fsw(f(1), Reg::Sp, 0)));
    assert!(code.contains(&AsmInst::Sw(t(1), Reg::Sp, 0)));
}

#[test]
fn test_call_sequence_balances_stack() {
    let mut table = SymbolTable::new();
    let add = table
        .define_function("add", Type::Int, vec![Type::Int, Type::Float])
        .unwrap();
    table.push_function_scope("add");
    table
        .add_parameters(&[("a".to_string(), Type::Int), ("b".to_string(), Type::Float)])
        .unwrap();
    table.pop_scope();

    let call = Expression::call("add", add, Type::Int, vec![Expression::int(1), Expression::int(2)]);
    let mut gen = CodeGenerator::new(&table);
    let co = gen.generate_expression(&call).unwrap();

    assert_eq!(
        co.code,
        vec![
            AsmInst::Li(t(1), 1),
            AsmInst::Sw(t(1), Reg::Sp, 0),
            AsmInst::AddI(Reg::Sp, Reg::Sp, -4),
            AsmInst::Li(t(2), 2),
            AsmInst::IntToFloat(f(1), t(2)),
            AsmInst::Fsw(f(1), Reg::Sp, 0),
            AsmInst::AddI(Reg::Sp, Reg::Sp, -4),
            AsmInst::AddI(Reg::Sp, Reg::Sp, -4),
            AsmInst::Sw(Reg::Ra, Reg::Sp, 0),
            AsmInst::AddI(Reg::Sp, Reg::Sp, -4),
            AsmInst::Call("func.add".to_string()),
            AsmInst::AddI(Reg::Sp, Reg::Sp, 4),
            AsmInst::Lw(Reg::Ra, Reg::Sp, 0),
            AsmInst::AddI(Reg::Sp, Reg::Sp, 4),
            AsmInst::Lw(t(3), Reg::Sp, 0),
            AsmInst::AddI(Reg::Sp, Reg::Sp, 8),
        ]
    );
    assert_eq!(sp_adjustment(&co.code), 0);
    assert_eq!(co.temp, Some(t(3)));
}

#[test]
fn test_void_call_without_arguments() {
    let mut table = SymbolTable::new();
    let tick = define(&mut table, "tick", Type::Void);

    let mut gen = CodeGenerator::new(&table);
    let call = Statement::new(StatementKind::Call(Expression::call("tick", tick, Type::Void, vec![])));
    let co = gen.generate_statement(&call).unwrap();

    assert_eq!(sp_adjustment(&co.code), 0);
    assert_eq!(co.code.last(), Some(&AsmInst::Lw(t(1), Reg::Sp, 0)));
}

#[test]
fn test_program_layout_and_temp_reset() {
    let mut table = SymbolTable::new();
    let first = define(&mut table, "first", Type::Void);
    let main = define(&mut table, "main", Type::Void);

    let program = Program {
        functions: vec![
            function("first", first, Type::Void, vec![print(Expression::int(1))]),
            function("main", main, Type::Void, vec![print(Expression::int(2))]),
        ],
    };

    let mut gen = CodeGenerator::new(&table);
    let code = gen.generate_program(&program).unwrap();

    assert_eq!(
        &code[..4],
        &[
            AsmInst::Move(Reg::Fp, Reg::Sp),
            AsmInst::Call("func.main".to_string()),
            AsmInst::Halt,
            AsmInst::Blank,
        ]
    );
    assert_eq!(code.last(), Some(&AsmInst::Blank));

    // Each function starts counting temporaries from 1 again
    assert!(code.contains(&AsmInst::Li(t(1), 1)));
    assert!(code.contains(&AsmInst::Li(t(1), 2)));
    assert!(!code.iter().any(|inst| inst.to_string().contains("t2")));
    assert_eq!(
        labels(&code),
        vec!["func.first", "ret.first", "func.main", "ret.main"]
    );
}

#[test]
fn test_duplicate_function_body_rejected() {
    let mut table = SymbolTable::new();
    let main = define(&mut table, "main", Type::Void);
    let def = function("main", main, Type::Void, vec![]);

    let mut gen = CodeGenerator::new(&table);
    gen.generate_function(&def).unwrap();
    let err = gen.generate_function(&def).unwrap_err();
    assert!(matches!(err, CodegenError::Redefinition { ref name, .. } if name == "main"));
}

#[test]
fn test_value_returned_from_void_function() {
    let mut table = SymbolTable::new();
    let g = define(&mut table, "g", Type::Void);
    let body = vec![Statement::new(StatementKind::Return(Some(Expression::int(1))))];

    let mut gen = CodeGenerator::new(&table);
    let err = gen.generate_function(&function("g", g, Type::Void, body)).unwrap_err();
    assert!(matches!(err, CodegenError::TypeShape { .. }));
    assert!(gen.current_function.is_none());
}

#[test]
fn test_read_into_pointer_rejected() {
    let mut table = SymbolTable::new();
    let p = global(&mut table, "p", Type::pointer_to(Type::Int));

    let mut gen = CodeGenerator::new(&table);
    let err = gen.generate_statement(&Statement::new(StatementKind::Read(p))).unwrap_err();
    assert!(matches!(err, CodegenError::TypeShape { .. }));
}

#[test]
fn test_condition_must_be_comparison() {
    let table = SymbolTable::new();
    let stmt = Statement::new(StatementKind::While {
        condition: Expression::int(1),
        body: vec![],
    });

    let mut gen = CodeGenerator::new(&table);
    let err = gen.generate_statement(&stmt).unwrap_err();
    assert!(matches!(err, CodegenError::InvariantViolation { .. }));
}

#[test]
fn test_return_outside_function() {
    let table = SymbolTable::new();
    let mut gen = CodeGenerator::new(&table);
    let err = gen
        .generate_statement(&Statement::new(StatementKind::Return(None)))
        .unwrap_err();
    assert!(matches!(err, CodegenError::InvariantViolation { .. }));
}

#[test]
fn test_print_string_constant() {
    let mut table = SymbolTable::new();
    let id = table.add_string("greeting", "hi").unwrap();
    let s = Expression::variable("greeting", id, Type::Str);

    let mut gen = CodeGenerator::new(&table);
    let co = gen.generate_statement(&print(s)).unwrap();
    assert_eq!(
        co.code,
        vec![AsmInst::La(t(1), "greeting".to_string()), AsmInst::PutS(t(1))]
    );

    assert_eq!(
        data_items(&table),
        vec![DataItem::Str {
            label: "greeting".to_string(),
            value: "hi".to_string(),
        }]
    );
}

#[test]
fn test_mixed_addition_widens_once_in_either_order() {
    let table = SymbolTable::new();

    let mut gen = CodeGenerator::new(&table);
    let int_first = Expression::binary(ArithOp::Add, Expression::int(2), Expression::float(3.0)).unwrap();
    let co = gen.generate_expression(&int_first).unwrap();
    assert_eq!(
        co.code,
        vec![
            AsmInst::Li(t(1), 2),
            AsmInst::FImm(f(1), 3.0),
            AsmInst::IntToFloat(f(2), t(1)),
            AsmInst::FAdd(f(3), f(2), f(1)),
        ]
    );
    assert_eq!(co.ty, Type::Float);

    let mut gen = CodeGenerator::new(&table);
    let float_first = Expression::binary(ArithOp::Add, Expression::float(3.0), Expression::int(2)).unwrap();
    let co = gen.generate_expression(&float_first).unwrap();
    assert_eq!(
        co.code,
        vec![
            AsmInst::FImm(f(1), 3.0),
            AsmInst::Li(t(1), 2),
            AsmInst::IntToFloat(f(2), t(1)),
            AsmInst::FAdd(f(3), f(1), f(2)),
        ]
    );
    assert_eq!(co.ty, Type::Float);
}

#[test]
fn test_negation_follows_operand_type() {
    let mut table = SymbolTable::new();
    let x = global(&mut table, "x", Type::Int);
    let p = global(&mut table, "p", Type::pointer_to(Type::Int));

    let mut gen = CodeGenerator::new(&table);
    let co = gen.generate_expression(&Expression::negate(x).unwrap()).unwrap();
    assert_eq!(
        co.code,
        vec![
            AsmInst::La(t(1), "x".to_string()),
            AsmInst::Lw(t(2), t(1), 0),
            AsmInst::Neg(t(3), t(2)),
        ]
    );
    assert_eq!(co.ty, Type::Int);

    let co = gen.generate_expression(&Expression::negate(Expression::float(1.5)).unwrap()).unwrap();
    assert_eq!(co.code, vec![AsmInst::FImm(f(1), 1.5), AsmInst::FNeg(f(2), f(1))]);
    assert_eq!(co.ty, Type::Float);

    let pointer_ty = p.expr_type.clone();
    let negated_pointer = Expression::new(
        ExpressionKind::Unary {
            op: UnaryOp::Negate,
            operand: Box::new(p),
        },
        pointer_ty,
    );
    let err = gen.generate_expression(&negated_pointer).unwrap_err();
    assert!(matches!(err, CodegenError::TypeShape { .. }));
}

#[test]
fn test_casts() {
    let mut table = SymbolTable::new();
    let p = global(&mut table, "p", Type::pointer_to(Type::Int));

    let mut gen = CodeGenerator::new(&table);
    let same = gen.generate_expression(&Expression::cast(Type::Int, Expression::int(1)).unwrap()).unwrap();
    assert_eq!(same.code, vec![AsmInst::Li(t(1), 1)]);
    assert_eq!(same.temp, Some(t(1)));
    assert_eq!(same.ty, Type::Int);

    let widened = gen.generate_expression(&Expression::cast(Type::Float, Expression::int(2)).unwrap()).unwrap();
    assert_eq!(widened.code, vec![AsmInst::Li(t(2), 2), AsmInst::IntToFloat(f(1), t(2))]);
    assert_eq!(widened.ty, Type::Float);

    // INT and PTR share the integer registers, so only the type changes
    let int_ptr = Type::pointer_to(Type::Int);
    let to_pointer = gen.generate_expression(&Expression::cast(int_ptr.clone(), Expression::int(8)).unwrap()).unwrap();
    assert_eq!(to_pointer.code, vec![AsmInst::Li(t(3), 8)]);
    assert_eq!(to_pointer.temp, Some(t(3)));
    assert_eq!(to_pointer.ty, int_ptr);

    let to_int = gen.generate_expression(&Expression::cast(Type::Int, p.clone()).unwrap()).unwrap();
    assert_eq!(
        to_int.code,
        vec![AsmInst::La(t(4), "p".to_string()), AsmInst::Lw(t(5), t(4), 0)]
    );
    assert_eq!(to_int.temp, Some(t(5)));
    assert_eq!(to_int.ty, Type::Int);

    let to_string = Expression::new(
        ExpressionKind::Cast {
            target: Type::Str,
            operand: Box::new(Expression::int(1)),
        },
        Type::Str,
    );
    let err = gen.generate_expression(&to_string).unwrap_err();
    assert!(matches!(err, CodegenError::TypeShape { .. }));
}

#[test]
fn test_address_of_variable_skips_the_load() {
    let mut table = SymbolTable::new();
    let x = global(&mut table, "x", Type::Int);
    table.define_function("g", Type::Void, Vec::new()).unwrap();
    table.push_function_scope("g");
    let local_id = table.add_variable("y", Type::Float).unwrap();
    table.pop_scope();
    let y = Expression::variable("y", local_id, Type::Float);

    let mut gen = CodeGenerator::new(&table);
    let co = gen.generate_expression(&Expression::address_of(x).unwrap()).unwrap();
    assert_eq!(co.code, vec![AsmInst::La(t(1), "x".to_string())]);
    assert!(!co.lval);
    assert_eq!(co.temp, Some(t(1)));
    assert_eq!(co.ty, Type::pointer_to(Type::Int));

    let co = gen.generate_expression(&Expression::address_of(y).unwrap()).unwrap();
    assert_eq!(co.code, vec![AsmInst::AddI(t(2), Reg::Fp, -4)]);
    assert_eq!(co.ty, Type::pointer_to(Type::Float));
}

#[test]
fn test_address_of_deref_reuses_pointer_temp() {
    let mut table = SymbolTable::new();
    let p = global(&mut table, "p", Type::pointer_to(Type::Int));
    let expr = Expression::address_of(Expression::deref(p).unwrap()).unwrap();

    let mut gen = CodeGenerator::new(&table);
    let co = gen.generate_expression(&expr).unwrap();
    assert_eq!(
        co.code,
        vec![AsmInst::La(t(1), "p".to_string()), AsmInst::Lw(t(2), t(1), 0)]
    );
    assert!(!co.lval);
    assert_eq!(co.temp, Some(t(2)));
    assert_eq!(co.ty, Type::pointer_to(Type::Int));
}

#[test]
fn test_two_dimensional_index() {
    let mut table = SymbolTable::new();
    let a = global(&mut table, "a", Type::pointer_to(Type::Int));
    let i = global(&mut table, "i", Type::Int);
    let j = global(&mut table, "j", Type::Int);
    let element = Expression::index2(a, i, j).unwrap();

    let mut gen = CodeGenerator::new(&table);
    let co = gen.generate_rvalue(&element).unwrap();
    assert_eq!(
        co.code,
        vec![
            AsmInst::La(t(1), "a".to_string()),
            AsmInst::Lw(t(2), t(1), 0),
            AsmInst::La(t(3), "i".to_string()),
            AsmInst::Lw(t(4), t(3), 0),
            AsmInst::Li(t(5), 4),
            AsmInst::Mul(t(6), t(4), t(5)),
            AsmInst::Add(t(7), t(2), t(6)),
            AsmInst::La(t(8), "j".to_string()),
            AsmInst::Lw(t(9), t(8), 0),
            AsmInst::Li(t(10), 4),
            AsmInst::Mul(t(11), t(9), t(10)),
            AsmInst::Add(t(12), t(7), t(11)),
            AsmInst::Lw(t(13), t(12), 0),
        ]
    );
    assert_eq!(co.ty, Type::Int);
}

#[test]
fn test_malloc_and_free() {
    let mut table = SymbolTable::new();
    let p = global(&mut table, "p", Type::pointer_to(Type::Int));

    let mut gen = CodeGenerator::new(&table);
    let block = gen.generate_expression(&Expression::malloc(Expression::int(40)).unwrap()).unwrap();
    assert_eq!(block.code, vec![AsmInst::Li(t(1), 40), AsmInst::Malloc(t(2), t(1))]);
    assert_eq!(block.temp, Some(t(2)));
    assert_eq!(block.ty, Type::Infer);

    let freed = gen.generate_expression(&Expression::free(p).unwrap()).unwrap();
    assert_eq!(
        freed.code,
        vec![
            AsmInst::La(t(3), "p".to_string()),
            AsmInst::Lw(t(4), t(3), 0),
            AsmInst::Free(t(4)),
        ]
    );
    assert_eq!(freed.temp, None);
    assert_eq!(freed.ty, Type::Void);
}

#[test]
fn test_return_keeps_stored_value() {
    let table = SymbolTable::new();
    let mut gen = CodeGenerator::new(&table);
    gen.current_function = Some(FunctionContext {
        name: "main".to_string(),
        return_type: Type::Float,
    });

    let co = gen
        .generate_statement(&Statement::new(StatementKind::Return(Some(Expression::int(3)))))
        .unwrap();
    assert_eq!(
        co.code,
        vec![
            AsmInst::Li(t(1), 3),
            AsmInst::IntToFloat(f(1), t(1)),
            AsmInst::Fsw(f(1), Reg::Fp, 8),
            AsmInst::J("ret.main".to_string()),
        ]
    );
    assert_eq!(co.temp, Some(f(1)));
    assert_eq!(co.ty, Type::Float);

    let bare = gen.generate_statement(&Statement::new(StatementKind::Return(None))).unwrap();
    assert_eq!(bare.code, vec![AsmInst::J("ret.main".to_string())]);
    assert_eq!(bare.temp, None);
}
