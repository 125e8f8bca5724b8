// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use mindgraph::layout::node_at;
use mindgraph::model::{NodeColor, NodeId, Point};
use mindgraph::ops::{add_node, delete_node};

mod fixtures;

// Benchmark identity (keep stable):
// - Group names in this file: `graph.add_child`, `graph.delete_subtree`, `graph.query`
// - Case IDs come from `fixtures::Case::id` and must not be renamed.
fn benches_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph.add_child");
    for case in fixtures::Case::ALL {
        let (template, map_id, _) = fixtures::workspace(case);
        group.throughput(Throughput::Elements(1));
        group.bench_function(case.id(), |b| {
            b.iter_batched(
                || template.clone(),
                |mut ws| {
                    let node_id = add_node(
                        &mut ws,
                        &map_id,
                        &NodeId::root(),
                        black_box("bench child"),
                        NodeColor::Teal,
                        1_000_000,
                    )
                    .expect("add node");
                    black_box(node_id)
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();

    let mut group = c.benchmark_group("graph.delete_subtree");
    for case in fixtures::Case::ALL {
        let (template, map_id, ids) = fixtures::workspace(case);
        let target = ids[1].clone();
        group.bench_function(case.id(), |b| {
            b.iter_batched(
                || template.clone(),
                |mut ws| {
                    let removed =
                        delete_node(&mut ws, &map_id, black_box(&target)).expect("delete node");
                    black_box(removed.len())
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();

    let mut group = c.benchmark_group("graph.query");
    for case in fixtures::Case::ALL {
        let (ws, map_id, ids) = fixtures::workspace(case);
        let map = ws.map(&map_id).expect("map").clone();
        let hit_point = map
            .node(&ids[ids.len() - 1])
            .map(|node| node.center())
            .unwrap_or(Point::new(0.0, 0.0));

        group.bench_function(format!("descendants_{}", case.id()), |b| {
            b.iter(|| black_box(map.descendants(black_box(&NodeId::root())).len()))
        });
        group.bench_function(format!("node_at_{}", case.id()), |b| {
            b.iter(|| black_box(node_at(&map, black_box(hit_point))))
        });
        group.bench_function(format!("checksum_{}", case.id()), |b| {
            b.iter(|| black_box(fixtures::checksum_map(&map)))
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = fixtures::criterion();
    targets = benches_graph
}
criterion_main!(benches);
