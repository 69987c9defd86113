//! Arena of handler nodes and the traversal protocol over them.
//!
//! Nodes are addressed by index; `next`/`prev` are indices too, so the cyclic
//! wiring a loop composite needs is a plain index assignment and the arena
//! owns every node exactly once.

use std::sync::Arc;

use tracing::{instrument, trace};

use crate::types::Carrier;

use super::{ChainError, ProcessingStep};

/// Index of a node in a [`HandlerArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum CompositeKind {
  Chain,
  Loop,
}

pub(crate) enum NodeBody {
  Step(Arc<dyn ProcessingStep>),
  Composite {
    kind: CompositeKind,
    first: NodeId,
    last: NodeId,
  },
}

pub(crate) struct HandlerNode {
  pub(crate) name: String,
  pub(crate) body: NodeBody,
  pub(crate) next: Option<NodeId>,
  pub(crate) prev: Option<NodeId>,
  /// Set once a composite claims this node; a composite exclusively owns its
  /// members' link fields.
  owned: bool,
}

/// Arena of handler nodes plus the wiring and traversal over them.
#[derive(Default)]
pub struct HandlerArena {
  nodes: Vec<HandlerNode>,
}

impl HandlerArena {
  pub fn new() -> Self {
    Self { nodes: Vec::new() }
  }

  /// Adds a leaf node named after the step's type.
  pub fn add_step<S: ProcessingStep + 'static>(&mut self, step: S) -> NodeId {
    self.add_named_step(short_type_name::<S>(), Arc::new(step))
  }

  /// Adds a leaf node with an explicit name.
  pub fn add_named_step(&mut self, name: impl Into<String>, step: Arc<dyn ProcessingStep>) -> NodeId {
    self.push(HandlerNode {
      name: name.into(),
      body: NodeBody::Step(step),
      next: None,
      prev: None,
      owned: false,
    })
  }

  /// Adds a closure-backed leaf node.
  pub fn add_fn<F>(&mut self, name: impl Into<String>, f: F) -> NodeId
  where
    F: Fn(&mut Carrier) -> Result<bool, ChainError> + Send + Sync + 'static,
  {
    self.add_named_step(name, Arc::new(super::FnStep::new(f)))
  }

  /// Builds a linear chain composite over `members`, wiring
  /// `members[i].next = members[i+1]` and the reverse `prev` links.
  pub fn chain(&mut self, name: impl Into<String>, members: &[NodeId]) -> Result<NodeId, ChainError> {
    let name = name.into();
    self.claim_members(&name, members)?;
    for pair in members.windows(2) {
      self.nodes[pair[0].0].next = Some(pair[1]);
      self.nodes[pair[1].0].prev = Some(pair[0]);
    }
    let first = members[0];
    let last = members[members.len() - 1];
    Ok(self.push(HandlerNode {
      name,
      body: NodeBody::Composite {
        kind: CompositeKind::Chain,
        first,
        last,
      },
      next: None,
      prev: None,
      owned: false,
    }))
  }

  /// Builds a loop composite: `start` runs once, then `body` and `end` cycle
  /// (`end.next` points back at `body[0]`) until some node signals fully
  /// handled. Termination is the caller's responsibility, typically via a
  /// criterion step in `end`.
  ///
  /// `prev` links stay linear so the cancellation walk-back terminates.
  pub fn loop_chain(
    &mut self,
    name: impl Into<String>,
    start: NodeId,
    body: &[NodeId],
    end: NodeId,
  ) -> Result<NodeId, ChainError> {
    let name = name.into();
    if body.is_empty() {
      return Err(ChainError::Config(format!(
        "loop '{name}' requires at least one body node"
      )));
    }
    let mut members = Vec::with_capacity(body.len() + 2);
    members.push(start);
    members.extend_from_slice(body);
    members.push(end);
    self.claim_members(&name, &members)?;

    for pair in members.windows(2) {
      self.nodes[pair[0].0].next = Some(pair[1]);
      self.nodes[pair[1].0].prev = Some(pair[0]);
    }
    // close the cycle: after the termination check, back to the body
    self.nodes[end.0].next = Some(body[0]);

    Ok(self.push(HandlerNode {
      name,
      body: NodeBody::Composite {
        kind: CompositeKind::Loop,
        first: start,
        last: end,
      },
      next: None,
      prev: None,
      owned: false,
    }))
  }

  /// Traverses the chain starting at `entry`.
  ///
  /// Cancellation is checked once per node entry. A cancelled carrier runs no
  /// further steps; the interrupt call-backs of the nodes before the
  /// cancellation point fire instead and the request counts as handled.
  #[instrument(level = "trace", skip(self, carrier))]
  pub fn handle(&self, entry: NodeId, carrier: &mut Carrier) -> Result<bool, ChainError> {
    let mut current = Some(entry);
    while let Some(id) = current {
      if carrier.is_cancelled() {
        trace!(node = %self.nodes[id.0].name, "cancelled, walking back");
        self.walk_back(id, carrier);
        return Ok(true);
      }
      let node = &self.nodes[id.0];
      let handled = match &node.body {
        NodeBody::Step(step) => {
          trace!(node = %node.name, "entering step");
          step.process(carrier)?
        }
        NodeBody::Composite { first, .. } => self.handle(*first, carrier)?,
      };
      if handled {
        return Ok(true);
      }
      current = node.next;
    }
    Ok(false)
  }

  pub fn node_name(&self, id: NodeId) -> &str {
    &self.nodes[id.0].name
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Diagnostic rendering of the subtree under `entry`.
  pub fn render(&self, entry: NodeId) -> String {
    super::printer::render(self, entry)
  }

  pub(crate) fn node(&self, id: NodeId) -> &HandlerNode {
    &self.nodes[id.0]
  }

  fn push(&mut self, node: HandlerNode) -> NodeId {
    self.nodes.push(node);
    NodeId(self.nodes.len() - 1)
  }

  fn claim_members(&mut self, composite: &str, members: &[NodeId]) -> Result<(), ChainError> {
    if members.is_empty() {
      return Err(ChainError::Config(format!(
        "composite '{composite}' requires at least one member"
      )));
    }
    for id in members {
      match self.nodes.get_mut(id.0) {
        None => {
          return Err(ChainError::Config(format!(
            "composite '{composite}' references a node outside this arena"
          )));
        }
        Some(node) if node.owned => {
          return Err(ChainError::Config(format!(
            "node '{}' is already a member of a composite",
            node.name
          )));
        }
        Some(node) => node.owned = true,
      }
    }
    Ok(())
  }

  /// Interrupt call-backs for every node strictly before `from`, walking the
  /// `prev` links toward the start of the enclosing composite.
  fn walk_back(&self, from: NodeId, carrier: &mut Carrier) {
    let mut current = self.nodes[from.0].prev;
    while let Some(id) = current {
      self.interrupt(id, carrier);
      current = self.nodes[id.0].prev;
    }
  }

  /// Interrupt for one node; a composite notifies its members in reverse.
  fn interrupt(&self, id: NodeId, carrier: &mut Carrier) {
    match &self.nodes[id.0].body {
      NodeBody::Step(step) => step.on_interrupt(carrier),
      NodeBody::Composite { last, .. } => {
        let mut current = Some(*last);
        while let Some(member) = current {
          self.interrupt(member, carrier);
          current = self.nodes[member.0].prev;
        }
      }
    }
  }
}

/// Assembled, runnable handler: an arena plus its entry node.
pub struct HandlerChain {
  arena: HandlerArena,
  entry: NodeId,
}

impl HandlerChain {
  pub fn new(arena: HandlerArena, entry: NodeId) -> Result<Self, ChainError> {
    if entry.0 >= arena.len() {
      return Err(ChainError::Config(
        "entry node is not part of the arena".to_string(),
      ));
    }
    Ok(Self { arena, entry })
  }

  pub fn handle(&self, carrier: &mut Carrier) -> Result<bool, ChainError> {
    self.arena.handle(self.entry, carrier)
  }

  pub fn render(&self) -> String {
    self.arena.render(self.entry)
  }

  pub fn arena(&self) -> &HandlerArena {
    &self.arena
  }

  pub fn entry(&self) -> NodeId {
    self.entry
  }
}

fn short_type_name<T>() -> String {
  let full = std::any::type_name::<T>();
  full.rsplit("::").next().unwrap_or(full).to_string()
}
