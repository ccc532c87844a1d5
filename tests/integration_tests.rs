// Integration tests for the single_diamond crate: full runs over larger networks,
// run-to-run determinism and the invariants that must hold at every round.

#[cfg(test)]
mod integration_tests {
    use proptest::prelude::*;
    use single_diamond::network::io::{
        read_edge_list, read_gene_list, resolve_seeds, EdgeListOptions,
    };
    use single_diamond::network::Graph;
    use single_diamond::propagation::{
        write_gene_list, write_results_table, DiamondExpander, ExpanderState, ModuleReport,
        TerminationReason, MAX_ADDITIONS, SIGNIFICANCE_THRESHOLD,
    };
    use std::collections::HashSet;

    /// Deterministic pseudo-random network: sparse background over `n` nodes plus a
    /// dense block on the first `block` nodes.
    fn planted_network(n: u32, block: u32, seed: u64) -> Graph<u32> {
        let mut state = seed;
        let mut next = move || {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 33) as u32
        };

        let mut edges: HashSet<(u32, u32)> = HashSet::new();
        for _ in 0..(n * 2) {
            let a = next() % n;
            let b = next() % n;
            if a != b {
                edges.insert((a.min(b), a.max(b)));
            }
        }
        for i in 0..block {
            for j in (i + 1)..block {
                if next() % 10 < 7 {
                    edges.insert((i, j));
                }
            }
        }

        let mut edges: Vec<(u32, u32)> = edges.into_iter().collect();
        edges.sort();
        Graph::new(0..n, edges).unwrap()
    }

    fn report_csv(report: &ModuleReport<u32>) -> Vec<u8> {
        let mut buf = Vec::new();
        write_results_table(report, &mut buf).unwrap();
        buf
    }

    #[test]
    fn test_size_cap_on_large_clique() {
        // 130-clique inside 1130 nodes: every round is highly significant.
        let mut edges = Vec::new();
        for i in 0..130u32 {
            for j in (i + 1)..130 {
                edges.push((i, j));
            }
        }
        let graph = Graph::new(0u32..1130, edges).unwrap();

        let report = DiamondExpander::new(&graph, 0u32..5).unwrap().run().unwrap();

        assert_eq!(report.reason(), TerminationReason::SizeCapReached);
        assert_eq!(report.len(), MAX_ADDITIONS);
        assert_eq!(report.module_size(), 5 + MAX_ADDITIONS);
        assert_eq!(report.added_genes(), (5u32..105).collect::<Vec<_>>());
        for (i, addition) in report.additions().iter().enumerate() {
            assert_eq!(addition.round, i + 1);
            assert!(addition.p_value <= SIGNIFICANCE_THRESHOLD);
        }
    }

    #[test]
    fn test_runs_are_reproducible() {
        let graph = planted_network(400, 25, 7);
        let seeds = vec![0u32, 3, 6, 9, 12];

        let first = DiamondExpander::new(&graph, seeds.clone()).unwrap().run().unwrap();
        let second = DiamondExpander::new(&graph, seeds.clone()).unwrap().run().unwrap();
        let sequential = DiamondExpander::new(&graph, seeds)
            .unwrap()
            .with_parallel_scoring(false)
            .run()
            .unwrap();

        assert!(!first.is_empty());
        assert_eq!(first, second);
        assert_eq!(first, sequential);
        assert_eq!(report_csv(&first), report_csv(&second));
    }

    #[test]
    fn test_string_network_end_to_end() {
        let network = "\
3702.AT1G01010 3702.AT1G01020 999
3702.AT1G01010 3702.AT1G01030 999
3702.AT1G01020 3702.AT1G01030 999
3702.AT1G01030 3702.AT1G01040 400
";
        let graph = read_edge_list(network.as_bytes(), &EdgeListOptions::default()).unwrap();
        let genes =
            read_gene_list("3702.AT1G01010.1,3702.AT1G01020\n3702.AT9G99999".as_bytes()).unwrap();

        let seeds = resolve_seeds(&graph, &genes);
        assert_eq!(seeds.matched, vec!["3702.AT1G01010", "3702.AT1G01020"]);
        assert_eq!(seeds.unresolved, vec!["3702.AT9G99999"]);

        let report = DiamondExpander::new(&graph, seeds.matched).unwrap().run().unwrap();

        // In a 4-node network nothing reaches significance.
        assert_eq!(report.reason(), TerminationReason::NotSignificant);

        let mut genes_out = Vec::new();
        write_gene_list(&report, &mut genes_out).unwrap();
        assert_eq!(
            String::from_utf8(genes_out).unwrap(),
            "3702.AT1G01010\n3702.AT1G01020\n"
        );
    }

    fn arb_planted() -> impl Strategy<Value = (Graph<u32>, Vec<u32>)> {
        (
            prop::collection::vec((0u32..80, 0u32..80), 0..120),
            prop::collection::vec(any::<bool>(), 45),
            prop::collection::btree_set(0u32..10, 1..5),
        )
            .prop_map(|(background, block, seeds)| {
                let mut edges: HashSet<(u32, u32)> = background
                    .into_iter()
                    .filter(|(a, b)| a != b)
                    .map(|(a, b)| (a.min(b), a.max(b)))
                    .collect();
                let mut k = 0;
                for i in 0..10u32 {
                    for j in (i + 1)..10 {
                        if block[k] {
                            edges.insert((i, j));
                        }
                        k += 1;
                    }
                }
                let graph = Graph::new(0u32..80, edges).unwrap();
                (graph, seeds.into_iter().collect())
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_round_invariants((graph, seeds) in arb_planted()) {
            let mut expander = DiamondExpander::new(&graph, seeds.clone()).unwrap();
            let seed_set: HashSet<u32> = seeds.iter().copied().collect();
            let mut previous_size = expander.module_size();

            loop {
                let state = expander.step().unwrap();

                // Pool counts equal a from-scratch recount.
                for (node, count) in expander.pool().candidates().unwrap() {
                    prop_assert!(!expander.is_member(node));
                    let recount = graph
                        .neighbors(node)
                        .iter()
                        .filter(|&&u| expander.is_member(u))
                        .count();
                    prop_assert_eq!(count, recount);
                }

                let size = expander.module_size();
                prop_assert!(size == previous_size || size == previous_size + 1);
                previous_size = size;

                if let ExpanderState::Finished(_) = state {
                    break;
                }
                prop_assert_eq!(state, ExpanderState::Running);
            }

            let report = expander.report().unwrap();
            prop_assert!(report.len() <= MAX_ADDITIONS);

            let mut seen = HashSet::new();
            for (i, addition) in report.additions().iter().enumerate() {
                prop_assert_eq!(addition.round, i + 1);
                prop_assert_eq!(addition.module_size_at_addition, seeds.len() + i);
                prop_assert!(addition.p_value <= SIGNIFICANCE_THRESHOLD);
                prop_assert!(!seed_set.contains(&addition.node));
                prop_assert!(seen.insert(addition.node));
            }

            let again = DiamondExpander::new(&graph, seeds).unwrap().run().unwrap();
            prop_assert_eq!(report, again);
        }
    }
}
