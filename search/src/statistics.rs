//! Search statistics (spec §4.5 "Outputs": "search statistics (nodes
//! generated / evaluated / expanded / pruned / dead-end)").

/// Running counters updated over the course of one search.
#[derive(Debug, Default, Clone, Copy)]
pub struct SearchStatistics {
    pub nodes_generated: u64,
    pub nodes_evaluated: u64,
    pub nodes_expanded: u64,
    pub nodes_pruned: u64,
    pub nodes_deadend: u64,
}
