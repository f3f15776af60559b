//! FILENAME: parser/src/converter.rs
//! PURPOSE: Shunting-yard conversion from infix components to postfix.
//! CONTEXT: Fourth stage of the pipeline. Operands and function calls pass
//! straight through to the output queue; operators and parentheses are
//! staged on an operator stack and flushed by precedence. All four
//! operators are left-associative, so equal precedence pops before
//! pushing.

use crate::ast::{Argument, Component};
use crate::token::Operator;

/// Converts an argument built by the infix builder into its postfix form.
/// A range argument carries no sub-expression to convert; an expression
/// argument is itself an infix component sequence and is converted
/// recursively so the evaluator never has to special-case argument shape.
fn convert_argument(arg: &Argument) -> Argument {
    match arg {
        Argument::Range(r) => Argument::Range(r.clone()),
        Argument::Expression(infix) => Argument::Expression(to_postfix(infix)),
    }
}

pub fn to_postfix(components: &[Component]) -> Vec<Component> {
    let mut output = Vec::with_capacity(components.len());
    let mut ops: Vec<Component> = Vec::new();

    for component in components {
        match component {
            Component::Number(_) | Component::CellRef(_) => {
                output.push(component.clone());
            }
            Component::FunctionCall { func, args } => {
                output.push(Component::FunctionCall {
                    func: *func,
                    args: args.iter().map(convert_argument).collect(),
                });
            }
            Component::Operator(op) => {
                while let Some(Component::Operator(top)) = ops.last() {
                    if top.precedence() >= op.precedence() {
                        output.push(ops.pop().unwrap());
                    } else {
                        break;
                    }
                }
                ops.push(component.clone());
            }
            Component::LParen => ops.push(component.clone()),
            Component::RParen => {
                while let Some(top) = ops.last() {
                    if matches!(top, Component::LParen) {
                        break;
                    }
                    output.push(ops.pop().unwrap());
                }
                ops.pop(); // discard the matching LParen
            }
        }
    }

    while let Some(op) = ops.pop() {
        output.push(op);
    }

    output
}
