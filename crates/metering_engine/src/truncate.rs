use ego_tree::{NodeId, NodeRef};
use metering_core::TruncatePlan;
use scraper::{Html, Node, Selector};
use thiserror::Error;

pub const DEFAULT_CONTAINER_SELECTOR: &str = ".entry-content";
pub const DEFAULT_GATE_CLASS: &str = "content-gate";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TruncateError {
    #[error("no element matches content container selector {0:?}")]
    MissingContainer(String),
    #[error("invalid content container selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TruncateStrategy {
    /// Everything after the `<!--more-->` marker was cut.
    MoreTag,
    /// Elements past the visible paragraph budget were removed.
    Paragraphs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncation {
    pub html: String,
    pub strategy: TruncateStrategy,
    /// Elements detached from the page, not counting their descendants.
    pub removed: usize,
}

pub trait ContentTruncator {
    fn truncate(&self, html: &str, plan: &TruncatePlan) -> Result<Truncation, TruncateError>;
}

/// Cuts a full HTML document down to its free preview.
///
/// Works on the first element matching `container_selector`. The paragraph
/// cut only looks at its immediate children; the more-tag cut finds the
/// marker at any depth. Elements carrying `gate_class` are never removed and
/// do not count as paragraphs.
#[derive(Debug, Clone)]
pub struct HtmlTruncator {
    container_selector: String,
    gate_class: String,
}

impl Default for HtmlTruncator {
    fn default() -> Self {
        Self::new(DEFAULT_CONTAINER_SELECTOR, DEFAULT_GATE_CLASS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChildKind {
    Gate,
    Element,
    MoreMarker,
    Other,
}

impl HtmlTruncator {
    pub fn new(container_selector: impl Into<String>, gate_class: impl Into<String>) -> Self {
        Self {
            container_selector: container_selector.into(),
            gate_class: gate_class.into(),
        }
    }

    fn classify(&self, node: NodeRef<'_, Node>) -> ChildKind {
        match node.value() {
            Node::Element(element) if element.classes().any(|c| c == self.gate_class) => {
                ChildKind::Gate
            }
            Node::Element(_) => ChildKind::Element,
            Node::Comment(comment) if comment.trim() == "more" => ChildKind::MoreMarker,
            _ => ChildKind::Other,
        }
    }

    /// First `<!--more-->` comment anywhere inside the container.
    fn find_more_marker(&self, doc: &Html, container: NodeId) -> Option<NodeId> {
        doc.tree
            .get(container)?
            .descendants()
            .find(|node| self.classify(*node) == ChildKind::MoreMarker)
            .map(|node| node.id())
    }

    /// The marker and everything after it in document order, up to the end of
    /// the container: its following siblings, then the following siblings of
    /// each enclosing element. Gates are left out.
    fn nodes_from(
        &self,
        doc: &Html,
        container: NodeId,
        marker: NodeId,
    ) -> Vec<(NodeId, ChildKind)> {
        let mut doomed = vec![(marker, ChildKind::MoreMarker)];
        let mut cursor = doc.tree.get(marker);
        while let Some(node) = cursor {
            if node.id() == container {
                break;
            }
            doomed.extend(
                node.next_siblings()
                    .map(|sibling| (sibling.id(), self.classify(sibling)))
                    .filter(|(_, kind)| *kind != ChildKind::Gate),
            );
            cursor = node.parent();
        }
        doomed
    }
}

impl ContentTruncator for HtmlTruncator {
    fn truncate(&self, html: &str, plan: &TruncatePlan) -> Result<Truncation, TruncateError> {
        let selector =
            Selector::parse(&self.container_selector).map_err(|e| TruncateError::InvalidSelector {
                selector: self.container_selector.clone(),
                reason: e.to_string(),
            })?;
        let mut doc = Html::parse_document(html);
        let container = doc
            .select(&selector)
            .next()
            .map(|element| element.id())
            .ok_or_else(|| TruncateError::MissingContainer(self.container_selector.clone()))?;

        let children: Vec<(NodeId, ChildKind)> = doc
            .tree
            .get(container)
            .map(|node| {
                node.children()
                    .map(|child| (child.id(), self.classify(child)))
                    .collect()
            })
            .unwrap_or_default();

        let marker = if plan.use_more_tag {
            self.find_more_marker(&doc, container)
        } else {
            None
        };

        let (strategy, doomed, gates) = match marker {
            Some(marker) => {
                let doomed = self.nodes_from(&doc, container, marker);
                let gates: Vec<NodeId> = children
                    .iter()
                    .filter(|(_, kind)| *kind == ChildKind::Gate)
                    .map(|(id, _)| *id)
                    .collect();
                (TruncateStrategy::MoreTag, doomed, gates)
            }
            None => {
                let doomed: Vec<_> = children
                    .iter()
                    .filter(|(_, kind)| *kind == ChildKind::Element)
                    .skip(plan.visible_paragraphs)
                    .copied()
                    .collect();
                (TruncateStrategy::Paragraphs, doomed, Vec::new())
            }
        };

        let removed = doomed
            .iter()
            .filter(|(_, kind)| *kind == ChildKind::Element)
            .count();
        for (id, _) in doomed {
            if let Some(mut node) = doc.tree.get_mut(id) {
                node.detach();
            }
        }
        // The gate moves to the end of what is left.
        for id in gates {
            if let Some(mut gate) = doc.tree.get_mut(id) {
                gate.detach();
            }
            if let Some(mut parent) = doc.tree.get_mut(container) {
                parent.append_id(id);
            }
        }

        Ok(Truncation {
            html: doc.html(),
            strategy,
            removed,
        })
    }
}
