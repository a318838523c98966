use markup5ever_rcdom::{Handle, NodeData};
use std::cell::RefCell;
use std::convert::Infallible;
use tendril::StrTendril;

use crate::parse::tag_name;

/// The MarkupVisitor trait is the traversal mechanism for parsed HTML trees.
///
/// Rules:
/// 1. Traversal is pre-order over `Handle` children, document order.
/// 2. Implementers override `visit_*` methods to add behavior.
/// 3. Implementers call the matching `walk_*` function to continue into
///    children; returning without it prunes the subtree.
/// 4. An error stops the traversal and is returned unchanged.
///
/// Nodes are mutated through the `RefCell`s inside the tree, so the visitor
/// only ever needs shared handles.
pub trait MarkupVisitor {
    type Error;

    fn visit_node(&mut self, node: &Handle) -> Result<(), Self::Error> {
        walk_node(self, node)
    }

    fn visit_element(&mut self, element: &Handle) -> Result<(), Self::Error> {
        walk_element(self, element)
    }

    fn visit_text(&mut self, _contents: &RefCell<StrTendril>) -> Result<(), Self::Error> {
        // Leaf node
        Ok(())
    }

    fn visit_children(&mut self, node: &Handle) -> Result<(), Self::Error> {
        walk_children(self, node)
    }
}

pub fn walk_node<V: MarkupVisitor + ?Sized>(visitor: &mut V, node: &Handle) -> Result<(), V::Error> {
    match &node.data {
        NodeData::Document => visitor.visit_children(node),
        NodeData::Element { .. } => visitor.visit_element(node),
        NodeData::Text { contents } => visitor.visit_text(contents),
        // Comments, doctypes and processing instructions are never renamed.
        _ => Ok(()),
    }
}

pub fn walk_element<V: MarkupVisitor + ?Sized>(
    visitor: &mut V,
    element: &Handle,
) -> Result<(), V::Error> {
    visitor.visit_children(element)
}

pub fn walk_children<V: MarkupVisitor + ?Sized>(
    visitor: &mut V,
    node: &Handle,
) -> Result<(), V::Error> {
    // Snapshot so a visitor may borrow the child list itself.
    let children: Vec<Handle> = node.children.borrow().clone();
    for child in &children {
        visitor.visit_node(child)?;
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// ELEMENT SEARCH
// ═══════════════════════════════════════════════════════════════════════════════

struct ElementCollector<P> {
    predicate: P,
    outermost_only: bool,
    found: Vec<Handle>,
}

impl<P: Fn(&str) -> bool> MarkupVisitor for ElementCollector<P> {
    type Error = Infallible;

    fn visit_element(&mut self, element: &Handle) -> Result<(), Infallible> {
        if tag_name(element).map_or(false, |tag| (self.predicate)(tag)) {
            self.found.push(element.clone());
            if self.outermost_only {
                return Ok(());
            }
        }
        walk_element(self, element)
    }
}

/// Elements under `root` whose tag satisfies `predicate`, in document order.
/// With `outermost_only`, matches nested inside another match are skipped.
pub fn find_elements<P>(root: &Handle, outermost_only: bool, predicate: P) -> Vec<Handle>
where
    P: Fn(&str) -> bool,
{
    let mut collector = ElementCollector {
        predicate,
        outermost_only,
        found: Vec::new(),
    };
    match collector.visit_node(root) {
        Ok(()) => collector.found,
        Err(never) => match never {},
    }
}
