use rand::Rng;

use super::*;

/// Generator for rectangular grid graphs, optionally with randomly removed streets.
///
/// Node `(r, c)` is labelled `r * cols + c`. Horizontal and vertical neighbors are connected;
/// every edge is dropped independently with probability `drop_prob`, which yields graphs that
/// resemble small road networks (degrees mostly 2 to 4, long separators avoided).
#[derive(Debug, Clone, Copy)]
pub struct Grid {
    rows: NumNodes,
    cols: NumNodes,
    drop_prob: f64,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            rows: 1,
            cols: 1,
            drop_prob: 0.0,
        }
    }
}

impl Grid {
    /// Creates a 1x1 grid without dropped edges
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of rows
    pub fn set_rows(&mut self, rows: NumNodes) {
        self.rows = rows;
    }

    /// Sets the number of rows
    pub fn rows(mut self, rows: NumNodes) -> Self {
        self.set_rows(rows);
        self
    }

    /// Sets the number of columns
    pub fn set_cols(&mut self, cols: NumNodes) {
        self.cols = cols;
    }

    /// Sets the number of columns
    pub fn cols(mut self, cols: NumNodes) -> Self {
        self.set_cols(cols);
        self
    }

    /// Sets the probability with which a grid edge is left out.
    /// ** Panics if `p` is not in `[0, 1]` **
    pub fn set_drop_prob(&mut self, p: f64) {
        assert!((0.0..=1.0).contains(&p));
        self.drop_prob = p;
    }

    /// Sets the probability with which a grid edge is left out.
    /// ** Panics if `p` is not in `[0, 1]` **
    pub fn drop_prob(mut self, p: f64) -> Self {
        self.set_drop_prob(p);
        self
    }

    /// Label of the node in row `r` and column `c`
    pub fn node_at(&self, r: NumNodes, c: NumNodes) -> Node {
        r * self.cols + c
    }

    /// Generates the grid. All `rows * cols` nodes are present even if isolated.
    pub fn generate<R, G>(&self, rng: &mut R) -> G
    where
        R: Rng,
        G: GraphEdgeEditing<Label = Node>,
    {
        let mut graph = G::new();
        graph.add_nodes(0..self.rows * self.cols);

        for r in 0..self.rows {
            for c in 0..self.cols {
                let u = self.node_at(r, c);
                if c + 1 < self.cols && !rng.random_bool(self.drop_prob) {
                    graph.try_add_edge(u, self.node_at(r, c + 1));
                }
                if r + 1 < self.rows && !rng.random_bool(self.drop_prob) {
                    graph.try_add_edge(u, self.node_at(r + 1, c));
                }
            }
        }

        graph
    }
}
