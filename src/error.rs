//! Error types for separator computation and nested dissection trees

use std::fmt::Debug;

use thiserror::Error;

use crate::tree::TreeNodeId;

/// Coarse classification of a [`DissectionError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input handed to a constructor or operation
    Argument,
    /// A precondition the algorithm relies on was broken while it ran
    State,
}

/// Errors that can occur while cutting, separating or dissecting graphs
#[derive(Error, Debug)]
pub enum DissectionError {
    /// Source and target of a flow computation coincide
    #[error("source and target must be distinct nodes")]
    IdenticalTerminals,

    /// Imbalance tolerance outside of `[0, 1]`
    #[error("epsilon must lie in [0, 1], got {0}")]
    InvalidEpsilon(f64),

    /// Node that is not part of the graph
    #[error("node {0} is not part of the graph")]
    UnknownNode(String),

    /// Edge whose endpoints coincide
    #[error("self loop at node {0} is not supported")]
    SelfLoop(String),

    /// Tree insertion where neither endpoint is known to the tree
    #[error("neither endpoint of edge {0} is part of the tree")]
    NoKnownEndpoint(String),

    /// Node that is not incident to the given edge
    #[error("node {node} is not an endpoint of edge {edge}")]
    NotAnEndpoint {
        /// Offending node
        node: String,
        /// Edge it was checked against
        edge: String,
    },

    /// Graph that is too small for a random source/target pair
    #[error("graph needs at least two nodes to be separated, got {nodes}")]
    GraphTooSmall {
        /// Number of nodes of the graph
        nodes: usize,
    },

    /// Zero flow cutter runs requested
    #[error("number of flow cutter runs must be positive")]
    InvalidRuns,

    /// Handle that does not point to a live tree node
    #[error("tree node {0} does not exist")]
    UnknownTreeNode(TreeNodeId),

    /// Unit of flow pushed against the current state of an edge
    #[error("edge {edge} cannot carry flow towards node {node}")]
    FlowConflict {
        /// Node the flow was pushed towards
        node: String,
        /// Edge the flow was pushed over
        edge: String,
    },

    /// Separator computation ended without any cut
    #[error("no cut found by any flow cutter run")]
    NoCutFound,

    /// Non-empty cut without a node left to pierce
    #[error("no piercing node found although the cut is non-empty")]
    NoPiercingNode,

    /// Non-root tree node without parent or separation side
    #[error("tree node {0} has no parent or separation side")]
    MissingParent(TreeNodeId),
}

impl DissectionError {
    /// Returns whether the error stems from bad input or from a broken invariant
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IdenticalTerminals
            | Self::InvalidEpsilon(_)
            | Self::UnknownNode(_)
            | Self::SelfLoop(_)
            | Self::NoKnownEndpoint(_)
            | Self::NotAnEndpoint { .. }
            | Self::GraphTooSmall { .. }
            | Self::InvalidRuns
            | Self::UnknownTreeNode(_) => ErrorKind::Argument,
            Self::FlowConflict { .. }
            | Self::NoCutFound
            | Self::NoPiercingNode
            | Self::MissingParent(_) => ErrorKind::State,
        }
    }

    /// Shorthand for `self.kind() == ErrorKind::Argument`
    pub fn is_argument_error(&self) -> bool {
        self.kind() == ErrorKind::Argument
    }
}

/// Renders a node or edge for an error message
pub(crate) fn describe<T: Debug>(value: T) -> String {
    format!("{value:?}")
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, DissectionError>;

/// Returns an error unless `epsilon` lies in `[0, 1]`
pub(crate) fn check_epsilon(epsilon: f64) -> Result<()> {
    if (0.0..=1.0).contains(&epsilon) {
        Ok(())
    } else {
        Err(DissectionError::InvalidEpsilon(epsilon))
    }
}
