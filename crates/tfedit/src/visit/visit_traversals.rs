use super::{Visit, VisitMut};
use hcl_edit::expr::{Expression, Traversal, TraversalOperator};
use hcl_edit::structure::Body;
use hcl_edit::{visit as hcl_visit, visit_mut as hcl_visit_mut};

/// Recursively visit all [Traversal]s, including the ones inside string templates
///
/// A standalone variable is presented as a traversal without operators.
pub(crate) trait VisitTraversals {
    fn visit_traversals(&self, visitor: &mut dyn Visit<Traversal>);
}

/// Recursively visit all [Traversal]s mutably, including the ones inside string templates
///
/// A standalone variable is presented as a traversal without operators. If the visitor adds
/// operators to it, the variable is replaced by the resulting traversal.
pub(crate) trait VisitTraversalsMut {
    fn visit_traversals_mut(&mut self, visitor: &mut dyn VisitMut<Traversal>);
}

impl VisitTraversals for Body {
    fn visit_traversals(&self, visitor: &mut dyn Visit<Traversal>) {
        hcl_visit::Visit::visit_body(&mut Traversals { visitor }, self);
    }
}

impl VisitTraversals for Expression {
    fn visit_traversals(&self, visitor: &mut dyn Visit<Traversal>) {
        hcl_visit::Visit::visit_expr(&mut Traversals { visitor }, self);
    }
}

impl VisitTraversalsMut for Body {
    fn visit_traversals_mut(&mut self, visitor: &mut dyn VisitMut<Traversal>) {
        hcl_visit_mut::VisitMut::visit_body_mut(&mut TraversalsMut { visitor }, self);
    }
}

impl VisitTraversalsMut for Expression {
    fn visit_traversals_mut(&mut self, visitor: &mut dyn VisitMut<Traversal>) {
        hcl_visit_mut::VisitMut::visit_expr_mut(&mut TraversalsMut { visitor }, self);
    }
}

struct Traversals<'v> {
    visitor: &'v mut dyn Visit<Traversal>,
}

impl hcl_visit::Visit for Traversals<'_> {
    fn visit_expr(&mut self, node: &Expression) {
        if let Expression::Variable(variable) = node {
            let traversal = Traversal::new(Expression::Variable(variable.clone()), Vec::new());
            self.visitor.visit(&traversal);
            return;
        }

        hcl_visit::visit_expr(self, node);
    }

    fn visit_traversal(&mut self, node: &Traversal) {
        self.visitor.visit(node);

        // the root variable is part of this traversal and must not be reported on its own
        if !matches!(node.expr, Expression::Variable(_)) {
            self.visit_expr(&node.expr);
        }

        for operator in &node.operators {
            if let TraversalOperator::Index(expr) = operator.value() {
                self.visit_expr(expr);
            }
        }
    }
}

struct TraversalsMut<'v> {
    visitor: &'v mut dyn VisitMut<Traversal>,
}

impl hcl_visit_mut::VisitMut for TraversalsMut<'_> {
    fn visit_expr_mut(&mut self, node: &mut Expression) {
        if let Expression::Variable(variable) = node {
            let mut traversal =
                Traversal::new(Expression::Variable(variable.clone()), Vec::new());
            self.visitor.visit_mut(&mut traversal);

            *node = if traversal.operators.is_empty() {
                traversal.expr
            } else {
                Expression::Traversal(Box::new(traversal))
            };
            return;
        }

        hcl_visit_mut::visit_expr_mut(self, node);
    }

    fn visit_traversal_mut(&mut self, node: &mut Traversal) {
        self.visitor.visit_mut(node);

        if !matches!(node.expr, Expression::Variable(_)) {
            self.visit_expr_mut(&mut node.expr);
        }

        for operator in node.operators.iter_mut() {
            if let TraversalOperator::Index(expr) = operator.value_mut() {
                self.visit_expr_mut(expr);
            }
        }
    }
}
