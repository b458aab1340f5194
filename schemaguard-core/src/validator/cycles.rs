//! Circular dependency detection.
//!
//! Entities form a directed graph with an edge from each entity to every
//! entity it references through a foreign key. Each strongly connected
//! component of two or more entities is reported once as a cycle group: every
//! member lies on some cycle with every other member, though not necessarily
//! on one shared cycle. Self-references (hierarchies such as sub-tasks) are
//! not treated as cycles.

use std::collections::HashMap;

use crate::models::EntityDescriptor;

use super::models::{IssueKind, Severity, ValidationIssue};

/// Tarjan's strongly connected components over catalog positions.
struct ComponentFinder<'a> {
    adjacency: &'a [Vec<usize>],
    index: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    next_index: usize,
    components: Vec<Vec<usize>>,
}

impl<'a> ComponentFinder<'a> {
    fn new(adjacency: &'a [Vec<usize>]) -> Self {
        let nodes = adjacency.len();
        Self {
            adjacency,
            index: vec![None; nodes],
            lowlink: vec![0; nodes],
            on_stack: vec![false; nodes],
            stack: Vec::new(),
            next_index: 0,
            components: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Vec<usize>> {
        for node in 0..self.adjacency.len() {
            if self.index[node].is_none() {
                self.strong_connect(node);
            }
        }
        self.components
    }

    fn visit(&mut self, node: usize) {
        self.index[node] = Some(self.next_index);
        self.lowlink[node] = self.next_index;
        self.next_index = self.next_index.saturating_add(1);
        self.stack.push(node);
        self.on_stack[node] = true;
    }

    /// Iterative depth-first search; each frame is a node and the position
    /// of the next outgoing edge to explore.
    fn strong_connect(&mut self, root: usize) {
        let adjacency = self.adjacency;
        self.visit(root);
        let mut frames: Vec<(usize, usize)> = vec![(root, 0)];

        while let Some(frame) = frames.last_mut() {
            let (node, edge) = *frame;

            if let Some(&next) = adjacency[node].get(edge) {
                frame.1 = edge.saturating_add(1);
                match self.index[next] {
                    None => {
                        self.visit(next);
                        frames.push((next, 0));
                    }
                    Some(next_index) if self.on_stack[next] => {
                        self.lowlink[node] = self.lowlink[node].min(next_index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            frames.pop();
            if let Some(&(parent, _)) = frames.last() {
                self.lowlink[parent] = self.lowlink[parent].min(self.lowlink[node]);
            }

            if self.index[node] == Some(self.lowlink[node]) {
                let mut component = Vec::new();
                while let Some(member) = self.stack.pop() {
                    self.on_stack[member] = false;
                    component.push(member);
                    if member == node {
                        break;
                    }
                }
                self.components.push(component);
            }
        }
    }
}

fn adjacency(catalog: &[EntityDescriptor]) -> Vec<Vec<usize>> {
    let mut positions: HashMap<&str, usize> = HashMap::with_capacity(catalog.len());
    for (position, entity) in catalog.iter().enumerate() {
        positions.entry(entity.table_name.as_str()).or_insert(position);
    }

    catalog
        .iter()
        .enumerate()
        .map(|(position, entity)| {
            let mut targets: Vec<usize> = entity
                .foreign_keys
                .iter()
                .filter_map(|fk| positions.get(fk.referenced_entity.as_str()).copied())
                .filter(|target| *target != position)
                .collect();
            targets.sort_unstable();
            targets.dedup();
            targets
        })
        .collect()
}

/// Finds reference cycle groups, each listed in catalog order, ordered by their
/// first member's catalog position.
pub(crate) fn find_dependency_cycles(catalog: &[EntityDescriptor]) -> Vec<Vec<&str>> {
    let graph = adjacency(catalog);
    let mut components: Vec<Vec<usize>> = ComponentFinder::new(&graph)
        .run()
        .into_iter()
        .filter(|component| component.len() > 1)
        .collect();
    for component in &mut components {
        component.sort_unstable();
    }
    components.sort();

    components
        .into_iter()
        .map(|component| {
            component
                .into_iter()
                .map(|position| catalog[position].table_name.as_str())
                .collect()
        })
        .collect()
}

/// Builds the issue for one cycle group, attributed to `entity_name`.
pub(crate) fn cycle_issue(cycle: &[&str], entity_name: &str) -> ValidationIssue {
    ValidationIssue::new(
        IssueKind::CircularDependency,
        Severity::Warning,
        entity_name,
        format!(
            "Entities [{}] form a circular foreign key dependency group",
            cycle.join(", ")
        ),
    )
    .with_suggestion(
        "Make one reference nullable or move it into a separate link entity to break the cycle",
    )
}

/// Reports every cycle group once, attributed to its first participant.
pub(crate) fn check_circular_dependencies(catalog: &[EntityDescriptor]) -> Vec<ValidationIssue> {
    find_dependency_cycles(catalog)
        .iter()
        .filter_map(|cycle| cycle.first().map(|first| cycle_issue(cycle, first)))
        .collect()
}
