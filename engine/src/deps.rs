//! FILENAME: engine/src/deps.rs
//! PURPOSE: Walks a compiled postfix component sequence and collects the
//! set of coordinates it reads.
//! CONTEXT: Feeds `DependencyGraph::set_dependencies`/`has_cycle` on every
//! edit. A range contributes every coordinate in its
//! rectangle; a nested function call's arguments are walked recursively.

use parser::{Argument, Component, Coordinates};
use std::collections::HashSet;

/// The set of coordinates a compiled formula reads, flattening cell
/// references, ranges, and nested function-call arguments.
pub fn extract(postfix: &[Component]) -> HashSet<Coordinates> {
    let mut out = HashSet::new();
    walk(postfix, &mut out);
    out
}

fn walk(components: &[Component], out: &mut HashSet<Coordinates>) {
    for component in components {
        match component {
            Component::CellRef(c) => {
                out.insert(*c);
            }
            Component::FunctionCall { args, .. } => {
                for arg in args {
                    match arg {
                        Argument::Range(r) => out.extend(r.coords()),
                        Argument::Expression(e) => walk(e, out),
                    }
                }
            }
            Component::Number(_) | Component::Operator(_) | Component::LParen | Component::RParen => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deps(formula: &str) -> HashSet<Coordinates> {
        extract(&parser::compile(formula).unwrap())
    }

    #[test]
    fn collects_direct_cell_refs() {
        let d = deps("A1+B1");
        assert_eq!(d.len(), 2);
        assert!(d.contains(&Coordinates::new(0, 0).unwrap()));
        assert!(d.contains(&Coordinates::new(0, 1).unwrap()));
    }

    #[test]
    fn collects_range_coordinates() {
        let d = deps("SUMA(A1:A3)");
        assert_eq!(d.len(), 3);
    }

    #[test]
    fn collects_through_nested_function_and_argument_expressions() {
        let d = deps("MAX(B1:B3;10;SUMA(C1+D1))");
        assert!(d.contains(&Coordinates::new(0, 2).unwrap())); // C1
        assert!(d.contains(&Coordinates::new(0, 3).unwrap())); // D1
        assert_eq!(d.len(), 5); // B1,B2,B3,C1,D1
    }

    #[test]
    fn no_deps_for_a_literal_formula() {
        assert!(deps("1+2").is_empty());
    }
}
