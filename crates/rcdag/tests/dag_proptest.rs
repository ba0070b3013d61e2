use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use proptest::sample::Index;
use rcdag::{EngineConfig, MapSource, RefCountDag};
use rcdag_store::{InMemoryNodeStore, NodeStore};
use rcdag_types::{Node, NodeId};

fn id(i: usize) -> NodeId {
    NodeId::from_bytes(format!("node-{i}").as_bytes())
}

/// Random DAG over `0..n`: node `i` only points at higher-numbered nodes, so
/// the graph is acyclic. Child lists may repeat an id.
fn arb_dag() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1usize..14).prop_flat_map(|n| {
        proptest::collection::vec(proptest::collection::vec(any::<Index>(), 0..4), n).prop_map(
            move |raw| {
                raw.into_iter()
                    .enumerate()
                    .map(|(i, picks)| {
                        let above = n - i - 1;
                        if above == 0 {
                            Vec::new()
                        } else {
                            picks.iter().map(|p| i + 1 + p.index(above)).collect()
                        }
                    })
                    .collect()
            },
        )
    })
}

fn arb_dag_and_roots() -> impl Strategy<Value = (Vec<Vec<usize>>, Vec<usize>)> {
    arb_dag().prop_flat_map(|edges| {
        let n = edges.len();
        let roots = proptest::collection::vec(0..n, 1..6);
        (Just(edges), roots)
    })
}

fn source(edges: &[Vec<usize>]) -> MapSource {
    edges
        .iter()
        .enumerate()
        .map(|(i, children)| Node::new(id(i), children.iter().map(|&c| id(c)).collect::<Vec<_>>()))
        .collect()
}

fn stored(dag: &RefCountDag<InMemoryNodeStore>) -> BTreeSet<NodeId> {
    dag.store().all().unwrap().map(|n| n.id()).collect()
}

fn snapshot(dag: &RefCountDag<InMemoryNodeStore>) -> (BTreeMap<NodeId, u64>, BTreeSet<NodeId>) {
    (dag.ref_counts(), stored(dag))
}

/// Expected count: direct root links plus edges from tracked parents.
fn expected_counts(edges: &[Vec<usize>], roots: &[usize]) -> BTreeMap<NodeId, u64> {
    let mut reachable = BTreeSet::new();
    let mut stack: Vec<usize> = roots.to_vec();
    while let Some(i) = stack.pop() {
        if reachable.insert(i) {
            stack.extend(edges[i].iter().copied());
        }
    }
    let mut counts: BTreeMap<NodeId, u64> = BTreeMap::new();
    for &r in roots {
        *counts.entry(id(r)).or_default() += 1;
    }
    for &p in &reachable {
        for &c in &edges[p] {
            *counts.entry(id(c)).or_default() += 1;
        }
    }
    counts
}

proptest! {
    #[test]
    fn prop_counts_match_edge_model((edges, roots) in arb_dag_and_roots()) {
        let src = source(&edges);
        let mut dag = RefCountDag::new(InMemoryNodeStore::new());
        for &r in &roots {
            dag.link(id(r), &src).unwrap();
            prop_assert!(dag.verify().is_ok());
        }
        prop_assert_eq!(dag.ref_counts(), expected_counts(&edges, &roots));
        let counted: BTreeSet<NodeId> = dag.ref_counts().into_keys().collect();
        prop_assert_eq!(counted, stored(&dag));
    }

    #[test]
    fn prop_unlinking_every_root_empties_store((edges, roots) in arb_dag_and_roots()) {
        let src = source(&edges);
        let mut dag = RefCountDag::new(InMemoryNodeStore::new());
        for &r in &roots {
            dag.link(id(r), &src).unwrap();
        }
        for (k, &r) in roots.iter().enumerate().rev() {
            dag.unlink(id(r)).unwrap();
            prop_assert!(dag.verify().is_ok());
            prop_assert_eq!(dag.ref_counts(), expected_counts(&edges, &roots[..k]));
        }
        prop_assert!(dag.is_empty());
        prop_assert!(dag.store().is_empty().unwrap());
    }

    #[test]
    fn prop_round_trip_restores_state(
        (edges, roots) in arb_dag_and_roots(),
        pick in any::<Index>(),
        times in 1usize..4,
    ) {
        let src = source(&edges);
        let mut dag = RefCountDag::new(InMemoryNodeStore::new());
        for &r in &roots {
            dag.link(id(r), &src).unwrap();
        }
        let before = snapshot(&dag);

        let extra = id(pick.index(edges.len()));
        for _ in 0..times {
            dag.link(extra, &src).unwrap();
        }
        for _ in 0..times {
            dag.unlink(extra).unwrap();
        }
        prop_assert_eq!(snapshot(&dag), before);
    }

    #[test]
    fn prop_order_and_traversal_independent(
        (edges, roots, shuffled) in arb_dag_and_roots().prop_flat_map(|(edges, roots)| {
            let shuffled = Just(roots.clone()).prop_shuffle();
            (Just(edges), Just(roots), shuffled)
        })
    ) {
        let src = source(&edges);
        let mut bfs = RefCountDag::new(InMemoryNodeStore::new());
        let mut dfs = RefCountDag::with_config(InMemoryNodeStore::new(), EngineConfig::depth_first());
        for &r in &roots {
            bfs.link(id(r), &src).unwrap();
        }
        for &r in &shuffled {
            dfs.link(id(r), &src).unwrap();
        }
        prop_assert_eq!(snapshot(&bfs), snapshot(&dfs));
    }

    #[test]
    fn prop_tree_is_conserved(parents in proptest::collection::vec(any::<Index>(), 0..20)) {
        // Node i + 1 hangs under some node in 0..=i, giving a tree rooted at 0.
        let n = parents.len() + 1;
        let mut edges = vec![Vec::new(); n];
        for (i, p) in parents.iter().enumerate() {
            edges[p.index(i + 1)].push(i + 1);
        }
        let src = source(&edges);
        let mut dag = RefCountDag::new(InMemoryNodeStore::new());

        let stats = dag.link(id(0), &src).unwrap();
        prop_assert_eq!(stats.added, n);
        prop_assert_eq!(dag.store().len().unwrap(), n);
        prop_assert!(dag.ref_counts().values().all(|&c| c == 1));

        let stats = dag.unlink(id(0)).unwrap();
        prop_assert_eq!(stats.removed, n);
        prop_assert!(dag.store().is_empty().unwrap());
    }
}
