// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use std::time::Duration;

use criterion::Criterion;

use mindgraph::model::{MapId, MindMap, NodeColor, NodeId, Workspace};
use mindgraph::ops::{add_node, create_map};

fn env_usize(name: &str, default: usize) -> usize {
    std::env::var(name).ok().and_then(|raw| raw.trim().parse::<usize>().ok()).unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name).ok().and_then(|raw| raw.trim().parse::<u64>().ok()).unwrap_or(default)
}

pub fn criterion() -> Criterion {
    let sample_size = env_usize("BENCH_SAMPLE_SIZE", 60).clamp(10, 200);
    let warmup_secs = env_u64("BENCH_WARMUP_SECS", 3).clamp(1, 60);
    let measurement_secs = env_u64("BENCH_MEASUREMENT_SECS", 5).clamp(1, 120);

    Criterion::default()
        .sample_size(sample_size)
        .warm_up_time(Duration::from_secs(warmup_secs))
        .measurement_time(Duration::from_secs(measurement_secs))
}

#[derive(Debug, Clone, Copy)]
pub enum Case {
    Small,
    Wide,
    Deep,
    Large,
}

impl Case {
    pub const ALL: [Case; 4] = [Case::Small, Case::Wide, Case::Deep, Case::Large];

    /// Stable case id used in benchmark names.
    pub fn id(self) -> &'static str {
        match self {
            Case::Small => "small",
            Case::Wide => "wide",
            Case::Deep => "deep",
            Case::Large => "large",
        }
    }

    /// `(node count, children per node)`. A fanout of one builds a chain.
    fn params(self) -> (usize, usize) {
        match self {
            Case::Small => (16, 3),
            Case::Wide => (200, 200),
            Case::Deep => (200, 1),
            Case::Large => (1_000, 4),
        }
    }
}

/// A workspace holding one active map shaped by `case`. Node `i` hangs below node
/// `(i - 1) / fanout`, so ids and positions are identical on every run.
pub fn workspace(case: Case) -> (Workspace, MapId, Vec<NodeId>) {
    let (count, fanout) = case.params();
    let mut ws = Workspace::new();
    let map_id = create_map(&mut ws, format!("bench {}", case.id()).as_str(), 1).expect("map");

    let mut ids = vec![NodeId::root()];
    for index in 1..count {
        let parent = ids[(index - 1) / fanout].clone();
        let node_id = add_node(
            &mut ws,
            &map_id,
            &parent,
            &format!("node {index:04}"),
            NodeColor::from_index(index),
            index as u64,
        )
        .expect("add node");
        ids.push(node_id);
    }
    (ws, map_id, ids)
}

pub fn checksum_map(map: &MindMap) -> u64 {
    let mut acc = map.nodes().len() as u64;
    acc = acc.wrapping_mul(131).wrapping_add(map.edges().len() as u64);
    for node in map.nodes().values() {
        acc = acc.wrapping_mul(131).wrapping_add(node.position().x.to_bits());
        acc = acc.wrapping_mul(131).wrapping_add(node.position().y.to_bits());
        acc = acc.wrapping_mul(131).wrapping_add(node.text().len() as u64);
    }
    acc
}
