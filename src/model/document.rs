//! The ordered segment model of a CMakeLists file.

use serde::Serialize;

use crate::error::{CmakeError, Result};
use crate::grammar::{InstallFlag, MacroKind};
use crate::parser::scanner::Scanner;
use crate::parser::span::Span;

use super::node::MacroNode;

/// Where a parsed node came from.
#[derive(Debug, Clone)]
struct Origin {
    /// Exact source bytes of the invocation, name through closing paren.
    text: String,
    /// The node as parsed, to detect later changes.
    parsed: MacroNode,
    span: Span,
}

/// A recognized macro together with its source text, if it was parsed.
#[derive(Debug, Clone)]
pub struct Invocation {
    node: MacroNode,
    origin: Option<Origin>,
}

impl Invocation {
    /// A node created by a mutation; always rendered canonically.
    pub fn new(node: MacroNode) -> Self {
        Self { node, origin: None }
    }

    pub(crate) fn parsed(node: MacroNode, text: &str, span: Span) -> Self {
        Self {
            origin: Some(Origin {
                text: text.to_string(),
                parsed: node.clone(),
                span,
            }),
            node,
        }
    }

    pub fn node(&self) -> &MacroNode {
        &self.node
    }

    pub fn node_mut(&mut self) -> &mut MacroNode {
        &mut self.node
    }

    /// The original text, as long as the node still equals what was parsed.
    pub fn original_text(&self) -> Option<&str> {
        self.origin
            .as_ref()
            .filter(|o| o.parsed == self.node)
            .map(|o| o.text.as_str())
    }

    /// Source span, for parsed nodes.
    pub fn span(&self) -> Option<Span> {
        self.origin.as_ref().map(|o| o.span)
    }

    /// Whether this invocation renders differently from its source.
    pub fn is_modified(&self) -> bool {
        self.original_text().is_none()
    }
}

/// One piece of a document.
#[derive(Debug, Clone)]
pub enum Segment {
    /// Text the grammar does not recognize, kept byte-for-byte.
    Opaque(String),
    Macro(Invocation),
}

impl Segment {
    pub fn as_invocation(&self) -> Option<&Invocation> {
        match self {
            Segment::Macro(inv) => Some(inv),
            Segment::Opaque(_) => None,
        }
    }
}

/// Outline entry used for reports.
#[derive(Debug, Clone, Serialize)]
pub struct NodeSummary<'a> {
    pub command: &'static str,
    pub name: &'a str,
    pub span: Option<Span>,
    pub modified: bool,
    pub node: &'a MacroNode,
}

/// An ordered sequence of segments.
#[derive(Debug, Clone, Default)]
pub struct Document {
    segments: Vec<Segment>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn invocations(&self) -> impl Iterator<Item = &Invocation> {
        self.segments.iter().filter_map(Segment::as_invocation)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &MacroNode> {
        self.invocations().map(Invocation::node)
    }

    pub fn nodes_of(&self, kind: MacroKind) -> impl Iterator<Item = &MacroNode> {
        self.nodes().filter(move |n| n.kind() == kind)
    }

    pub fn summaries(&self) -> Vec<NodeSummary<'_>> {
        self.invocations()
            .map(|inv| NodeSummary {
                command: inv.node().kind().command(),
                name: inv.node().name(),
                span: inv.span(),
                modified: inv.is_modified(),
                node: inv.node(),
            })
            .collect()
    }

    fn position(&self, kind: MacroKind, name: &str) -> Option<usize> {
        self.segments.iter().position(|s| match s {
            Segment::Macro(inv) => inv.node.kind() == kind && inv.node.matches_name(name),
            Segment::Opaque(_) => false,
        })
    }

    fn node_at_mut(&mut self, index: usize) -> Option<&mut MacroNode> {
        match self.segments.get_mut(index) {
            Some(Segment::Macro(inv)) => Some(&mut inv.node),
            _ => None,
        }
    }

    /// First node of `kind` whose name matches.
    pub fn find_by_name(&self, kind: MacroKind, name: &str) -> Option<&MacroNode> {
        self.nodes_of(kind).find(|n| n.matches_name(name))
    }

    pub fn find_by_name_mut(&mut self, kind: MacroKind, name: &str) -> Option<&mut MacroNode> {
        let index = self.position(kind, name)?;
        self.node_at_mut(index)
    }

    /// Return the node for (`kind`, `name`), creating it from `defaults` if
    /// there is none.
    pub fn ensure_target<F>(&mut self, kind: MacroKind, name: &str, defaults: F) -> &mut MacroNode
    where
        F: FnOnce() -> MacroNode,
    {
        let index = match self.position(kind, name) {
            Some(index) => index,
            None => self.insert_node(defaults()),
        };
        match &mut self.segments[index] {
            Segment::Macro(inv) => &mut inv.node,
            Segment::Opaque(_) => unreachable!("index points at a macro segment"),
        }
    }

    pub fn has_flag(&self, flag: InstallFlag) -> bool {
        self.nodes_of(MacroKind::InstallFlag(flag)).next().is_some()
    }

    /// Append the flag macro unless one exists. Returns whether it was added.
    pub fn ensure_flag(&mut self, flag: InstallFlag) -> bool {
        if self.has_flag(flag) {
            return false;
        }
        self.push_node(MacroNode::InstallFlag(flag));
        true
    }

    /// Name declared by the first `elements_subdir()`.
    pub fn module_name(&self) -> Option<&str> {
        self.nodes_of(MacroKind::Subdir).next().map(MacroNode::name)
    }

    /// Like [`Document::module_name`], failing for documents that are not
    /// an Elements module.
    pub fn require_module(&self, operation: &str) -> Result<String> {
        self.module_name()
            .map(str::to_string)
            .ok_or_else(|| CmakeError::MissingContext {
                operation: operation.to_string(),
            })
    }

    /// Forget original text so every recognized macro renders canonically.
    pub fn canonicalize(&mut self) {
        for segment in &mut self.segments {
            if let Segment::Macro(inv) = segment {
                inv.origin = None;
            }
        }
    }

    /// Insert a new node after the last top-level node of the same kind (on
    /// the line following it), or at the end of the document. Nodes inside
    /// `if`, `foreach` and similar blocks are never used as anchors.
    fn insert_node(&mut self, node: MacroNode) -> usize {
        let Some(after) = self.last_top_level(node.kind()) else {
            return self.push_node(node);
        };

        let new = Segment::Macro(Invocation::new(node));
        let split = match self.segments.get(after + 1) {
            Some(Segment::Opaque(text)) => Scanner::new(text).line_end(0).map(|at| {
                let (line_end, rest) = text.split_at(at);
                (line_end.to_string(), rest.to_string())
            }),
            _ => None,
        };
        match split {
            Some((line_end, rest)) => {
                self.segments.splice(
                    after + 1..after + 2,
                    [
                        Segment::Opaque(line_end),
                        new,
                        Segment::Opaque(format!("\n{rest}")),
                    ],
                );
            }
            None => {
                self.segments.splice(
                    after + 1..after + 1,
                    [Segment::Opaque("\n".to_string()), new],
                );
            }
        }
        after + 2
    }

    fn last_top_level(&self, kind: MacroKind) -> Option<usize> {
        let mut depth = 0;
        let mut last = None;
        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Opaque(text) => depth = Scanner::new(text).block_depth(depth),
                Segment::Macro(inv) if depth == 0 && inv.node.kind() == kind => last = Some(index),
                Segment::Macro(_) => {}
            }
        }
        last
    }

    /// Append a node as the last line of the document.
    fn push_node(&mut self, node: MacroNode) -> usize {
        let needs_newline = match self.segments.last() {
            None => false,
            Some(Segment::Opaque(text)) => !text.ends_with('\n'),
            Some(Segment::Macro(_)) => true,
        };
        if needs_newline {
            self.push_opaque("\n");
        }
        self.segments.push(Segment::Macro(Invocation::new(node)));
        let index = self.segments.len() - 1;
        self.push_opaque("\n");
        index
    }

    fn push_opaque(&mut self, text: &str) {
        match self.segments.last_mut() {
            Some(Segment::Opaque(existing)) => existing.push_str(text),
            _ => self.segments.push(Segment::Opaque(text.to_string())),
        }
    }
}
