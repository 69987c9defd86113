//! Diagnostic string rendering of a handler subtree.

use std::collections::HashSet;

use super::arena::{CompositeKind, HandlerArena, NodeBody, NodeId};

/// Renders the subtree under `entry` as an indented outline. Loop cycles are
/// annotated instead of followed.
pub(crate) fn render(arena: &HandlerArena, entry: NodeId) -> String {
  let mut out = String::new();
  render_node(arena, entry, 0, &mut out);
  out
}

fn render_node(arena: &HandlerArena, id: NodeId, depth: usize, out: &mut String) {
  let node = arena.node(id);
  let indent = "  ".repeat(depth);
  match &node.body {
    NodeBody::Step(_) => {
      out.push_str(&format!("{indent}step \"{}\"\n", node.name));
    }
    NodeBody::Composite { kind, first, .. } => {
      let label = match kind {
        CompositeKind::Chain => "chain",
        CompositeKind::Loop => "loop",
      };
      out.push_str(&format!("{indent}{label} \"{}\" {{\n", node.name));
      render_members(arena, *first, depth + 1, out);
      out.push_str(&format!("{indent}}}\n"));
    }
  }
}

fn render_members(arena: &HandlerArena, first: NodeId, depth: usize, out: &mut String) {
  let mut visited = HashSet::new();
  let mut current = Some(first);
  while let Some(id) = current {
    if !visited.insert(id) {
      let indent = "  ".repeat(depth);
      out.push_str(&format!(
        "{indent}(cycles back to \"{}\")\n",
        arena.node(id).name
      ));
      break;
    }
    render_node(arena, id, depth, out);
    current = arena.node(id).next;
  }
}
