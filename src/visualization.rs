use crate::tree::{AvlTree, Keyed, Node};

/// Renderers for the shape of an [`AvlTree`]
#[derive(Debug)]
pub struct TreeVisualization;

impl TreeVisualization {
    /// Sideways text diagram: right subtree above, left subtree below, one
    /// level of indentation per depth. Each line shows the key, the cached
    /// height and the balance factor.
    #[must_use]
    pub fn render_text<R: Keyed>(tree: &AvlTree<R>) -> String {
        let mut out = String::new();
        match tree.root() {
            Some(root) => render_sideways(root, 0, &mut out),
            None => out.push_str("(empty)\n"),
        }
        out
    }

    /// Generate a DOT graph of the tree
    #[must_use]
    pub fn generate_dot<R: Keyed>(tree: &AvlTree<R>) -> String {
        let mut dot = String::from("digraph avl {\n");
        dot.push_str("  node [shape=circle, style=filled, fillcolor=lightblue];\n");

        let mut stack: Vec<&Node<R>> = tree.root().into_iter().collect();
        while let Some(node) = stack.pop() {
            let key = escape(node.record.key());
            dot.push_str(&format!(
                "  \"{key}\" [label=\"{key}\\nh={} bf={}\"];\n",
                node.height,
                node.balance_factor()
            ));

            for (side, child) in [("L", node.left.as_deref()), ("R", node.right.as_deref())] {
                if let Some(child) = child {
                    let child_key = escape(child.record.key());
                    dot.push_str(&format!("  \"{key}\" -> \"{child_key}\" [label=\"{side}\"];\n"));
                    stack.push(child);
                }
            }
        }

        dot.push_str("}\n");
        dot
    }
}

/// Append `node` and its subtrees at `depth`
fn render_sideways<R: Keyed>(node: &Node<R>, depth: usize, out: &mut String) {
    #[allow(clippy::arithmetic_side_effects)]
    let below = depth + 1;
    if let Some(right) = node.right.as_deref() {
        render_sideways(right, below, out);
    }
    out.push_str(&"    ".repeat(depth));
    out.push_str(&format!(
        "{} (h={}, bf={})\n",
        node.record.key(),
        node.height,
        node.balance_factor()
    ));
    if let Some(left) = node.left.as_deref() {
        render_sideways(left, below, out);
    }
}

/// Escape a key for use inside a quoted DOT identifier
fn escape(key: &str) -> String {
    key.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> AvlTree<String> {
        ["A", "B", "C"].into_iter().map(String::from).collect()
    }

    #[test]
    fn test_render_text() {
        let text = TreeVisualization::render_text(&tree());
        assert_eq!(text, "    C (h=1, bf=0)\nB (h=2, bf=0)\n    A (h=1, bf=0)\n");
        assert_eq!(TreeVisualization::render_text(&AvlTree::<String>::new()), "(empty)\n");
    }

    #[test]
    fn test_generate_dot() {
        let dot = TreeVisualization::generate_dot(&tree());
        assert!(dot.starts_with("digraph avl {\n"));
        assert!(dot.contains("  \"B\" -> \"A\" [label=\"L\"];\n"));
        assert!(dot.contains("  \"B\" -> \"C\" [label=\"R\"];\n"));
        assert!(dot.contains("  \"C\" [label=\"C\\nh=1 bf=0\"];\n"));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn test_dot_escapes_quotes() {
        let tree: AvlTree<String> = std::iter::once("a\"b".to_string()).collect();
        assert!(TreeVisualization::generate_dot(&tree).contains("\"a\\\"b\""));
    }
}
