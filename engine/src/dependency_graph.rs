//! FILENAME: engine/src/dependency_graph.rs
//! PURPOSE: Reverse-dependency index over cell coordinates, cycle
//! pre-check on proposed edits, and cascading recalculation order.
//! CONTEXT: Keeps both directions (precedents and dependents) so
//! `set_dependencies` can retract a cell's old edges in one pass and
//! `dependents_of`/cascading can walk forward from a changed cell without
//! scanning every other cell's precedent set.

use parser::Coordinates;
use std::collections::{HashMap, HashSet, VecDeque};

#[derive(Debug, Default, Clone)]
pub struct DependencyGraph {
    /// cell -> the cells it directly reads (its precedents).
    precedents: HashMap<Coordinates, HashSet<Coordinates>>,
    /// cell -> the cells whose formulas directly read it (its dependents).
    dependents: HashMap<Coordinates, HashSet<Coordinates>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces `cell`'s dependency set. Removes every prior entry that
    /// lists `cell` as a dependent before installing the new edges, so a
    /// re-edit never leaves a stale dependent behind.
    pub fn set_dependencies(&mut self, cell: Coordinates, deps: HashSet<Coordinates>) {
        self.clear_dependencies(cell);
        if !deps.is_empty() {
            for &dep in &deps {
                self.dependents.entry(dep).or_default().insert(cell);
            }
            self.precedents.insert(cell, deps);
        }
    }

    fn clear_dependencies(&mut self, cell: Coordinates) {
        if let Some(old) = self.precedents.remove(&cell) {
            for dep in old {
                if let Some(set) = self.dependents.get_mut(&dep) {
                    set.remove(&cell);
                    if set.is_empty() {
                        self.dependents.remove(&dep);
                    }
                }
            }
        }
    }

    /// The cells whose formula directly reads `cell`.
    pub fn dependents_of(&self, cell: Coordinates) -> HashSet<Coordinates> {
        self.dependents.get(&cell).cloned().unwrap_or_default()
    }

    /// Would installing `proposed_deps` as `start`'s dependency set
    /// introduce a cycle? Builds a transient copy of the precedent map
    /// augmented with the proposed edit and DFS's forward reachability
    /// from `start`; if `start` is reachable from itself, the edit is
    /// rejected. The live graph is never touched, so a rejected edit
    /// leaves it bit-identical.
    pub fn has_cycle(&self, start: Coordinates, proposed_deps: &HashSet<Coordinates>) -> bool {
        let mut precedents = self.precedents.clone();
        if proposed_deps.is_empty() {
            precedents.remove(&start);
        } else {
            precedents.insert(start, proposed_deps.clone());
        }

        let mut stack: Vec<Coordinates> = precedents
            .get(&start)
            .into_iter()
            .flatten()
            .copied()
            .collect();
        let mut visited = HashSet::new();
        while let Some(node) = stack.pop() {
            if node == start {
                return true;
            }
            if !visited.insert(node) {
                continue;
            }
            if let Some(next) = precedents.get(&node) {
                stack.extend(next.iter().copied());
            }
        }
        false
    }

    /// Topological recalculation order over the transitive dependents of
    /// `start`: BFS to collect the affected subset, then Kahn's algorithm
    /// restricted to that subset, so every cell is recomputed exactly once
    /// and only after every in-subset precedent it has. The spec's minimum
    /// requirement is a DFS visiting each dependent;
    /// this is a strictly stronger guarantee and still satisfies it.
    pub fn recalc_order(&self, start: Coordinates) -> Vec<Coordinates> {
        let mut affected = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(start);
        while let Some(node) = queue.pop_front() {
            for &dep in self.dependents.get(&node).into_iter().flatten() {
                if affected.insert(dep) {
                    queue.push_back(dep);
                }
            }
        }

        if affected.is_empty() {
            return Vec::new();
        }

        let mut in_degree: HashMap<Coordinates, usize> =
            affected.iter().map(|&c| (c, 0)).collect();
        for &node in &affected {
            if let Some(precs) = self.precedents.get(&node) {
                for p in precs {
                    if affected.contains(p) {
                        *in_degree.get_mut(&node).unwrap() += 1;
                    }
                }
            }
        }

        let mut ready: VecDeque<Coordinates> = in_degree
            .iter()
            .filter(|&(_, &deg)| deg == 0)
            .map(|(&c, _)| c)
            .collect();
        let mut order = Vec::with_capacity(affected.len());

        while let Some(node) = ready.pop_front() {
            order.push(node);
            for &dep in self.dependents.get(&node).into_iter().flatten() {
                if !affected.contains(&dep) {
                    continue;
                }
                let deg = in_degree.get_mut(&dep).unwrap();
                *deg -= 1;
                if *deg == 0 {
                    ready.push_back(dep);
                }
            }
        }

        order
    }
}
