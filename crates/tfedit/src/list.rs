//! splitting literal lists into their elements
use hcl_edit::expr::Expression;
use hcl_edit::Decorate;

/// Returns the elements of a literal `[ ... ]` list with surrounding whitespace and comments removed
///
/// Anything else (a variable, a function call returning a list, a `for` expression) cannot be
/// split without evaluating it and yields `None`. An empty list yields an empty vector.
pub fn split_list(expr: &Expression) -> Option<Vec<Expression>> {
    let Expression::Array(array) = expr else {
        return None;
    };

    let elements = array
        .iter()
        .cloned()
        .map(|mut element| {
            *element.decor_mut() = Default::default();
            element
        })
        .collect();

    Some(elements)
}
