// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tourgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use tourgraph::assembler::{
    build_save_request, decode_tour, EncodedOverlays, FetchedTour, NodeRecord, TourMeta,
};
use tourgraph::history::{ActionHistory, HistoryAction, HistoryEntry};
use tourgraph::model::{
    IdGenerator, IdMap, NodeId, NodeSeed, NodeStore, Overlay, OverlayKind, ServerNodeId,
    SphericalCoord, StyleMap,
};

fn env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn config() -> Criterion {
    let sample_size = env_usize("BENCH_SAMPLE_SIZE", 60).clamp(10, 200);
    let warmup_secs = env_u64("BENCH_WARMUP_SECS", 3).clamp(1, 60);
    let measurement_secs = env_u64("BENCH_MEASUREMENT_SECS", 5).clamp(1, 120);

    Criterion::default()
        .sample_size(sample_size)
        .warm_up_time(Duration::from_secs(warmup_secs))
        .measurement_time(Duration::from_secs(measurement_secs))
}

/// A store of `nodes` nodes, each with `per_node` overlays of every kind linking to the next node.
fn tour_fixture(nodes: usize, per_node: usize) -> NodeStore {
    let mut ids = IdGenerator::new("bench");
    let node_ids: Vec<NodeId> = (0..nodes)
        .map(|_| NodeId::from(ids.next_temp_node_id()))
        .collect();

    let mut store = NodeStore::new();
    store.create_nodes(node_ids.iter().enumerate().map(|(idx, id)| {
        NodeSeed::new(
            id.clone(),
            format!("Scene {idx}"),
            format!("scenes/{idx}.jpg"),
        )
    }));

    for (idx, node_id) in node_ids.iter().enumerate() {
        let next = node_ids[(idx + 1) % node_ids.len()].clone();
        for k in 0..per_node {
            let yaw = (k as f64) * 0.1;
            let marker = Overlay::marker(
                ids.next_overlay_id(),
                SphericalCoord::new(yaw, 0.05),
                StyleMap::new().with("icon", "arrow"),
            )
            .with_link_target(Some(next.clone()));
            let _ = store.add_overlay_to_node(node_id, OverlayKind::Marker, marker);

            let points = vec![
                SphericalCoord::new(yaw, 0.1),
                SphericalCoord::new(yaw + 0.05, 0.1),
                SphericalCoord::new(yaw + 0.05, -0.1),
                SphericalCoord::new(yaw, -0.1),
            ];
            if let Ok(polygon) = Overlay::polygon(
                ids.next_overlay_id(),
                points,
                StyleMap::new().with("color", "#00ffaa").with("opacity", 0.3),
            ) {
                let _ = store.add_overlay_to_node(node_id, OverlayKind::Polygon, polygon);
            }

            let text = Overlay::text(
                ids.next_overlay_id(),
                SphericalCoord::new(yaw, -0.2),
                format!("label {k}"),
                StyleMap::new(),
            )
            .with_rotation(15.0);
            let _ = store.add_overlay_to_node(node_id, OverlayKind::Text, text);
        }
        let _ = store.add_link(node_id, &next, SphericalCoord::new(0.0, 0.0));
    }
    store
}

/// The fetched form of `store` with sequential server ids, as a backend would return it.
fn fetched_fixture(store: &NodeStore) -> FetchedTour {
    let mut id_map = IdMap::new();
    for (idx, node) in store.nodes().iter().enumerate() {
        if let Some(temp_id) = node.id().as_temp() {
            let _ = id_map.insert(temp_id.clone(), ServerNodeId::new(idx as u64 + 1));
        }
    }

    let nodes = store
        .nodes()
        .iter()
        .enumerate()
        .map(|(idx, node)| {
            let mut encoded = EncodedOverlays::from_node(node).expect("encode overlays");
            encoded.map_targets(|target| id_map.resolve(target));
            NodeRecord {
                id: idx as u64 + 1,
                name: node.name().to_owned(),
                caption: String::new(),
                scene_path: node.scene_ref().to_owned(),
                thumbnail_path: None,
                start_node: idx == 0,
                markers: encoded.markers,
                polygons: encoded.polygons,
                texts: encoded.texts,
                links: encoded.links,
            }
        })
        .collect();

    FetchedTour {
        tour_id: 1,
        title: "Bench".to_owned(),
        description: String::new(),
        nodes,
    }
}

fn checksum_store(store: &NodeStore) -> u64 {
    let mut acc = store.len() as u64;
    for kind in OverlayKind::ALL {
        acc = acc.wrapping_mul(131).wrapping_add(store.overlay_count(kind) as u64);
    }
    acc.wrapping_mul(131).wrapping_add(store.dangling_references().len() as u64)
}

// Benchmark identity (keep stable):
// - Groups in this file: `store.overlays`, `store.history`, `store.save_request`, `store.decode`
// - Case IDs (the string after the `/`) must remain stable across refactors so
//   results stay comparable over time (e.g. `small`, `large`).
fn benches_store(c: &mut Criterion) {
    let cases = [("small", 4, 8), ("large", 40, 25)];

    let mut group = c.benchmark_group("store.overlays");
    for (case_id, nodes, per_node) in cases {
        group.throughput(Throughput::Elements((nodes * per_node * 3) as u64));
        group.bench_function(case_id, |b| {
            b.iter(|| {
                let store = tour_fixture(black_box(nodes), black_box(per_node));
                black_box(checksum_store(&store))
            })
        });
    }
    group.finish();

    let mut group = c.benchmark_group("store.history");
    group.bench_function("push_pop_bounded", |b| {
        b.iter_batched_ref(
            || {
                let mut ids = IdGenerator::new("bench");
                let node_id = NodeId::from(ids.next_temp_node_id());
                let element_ids: Vec<_> = (0..200).map(|_| ids.next_overlay_id()).collect();
                (node_id, element_ids)
            },
            |(node_id, element_ids)| {
                let mut history = ActionHistory::with_capacity(50);
                for (ts, element_id) in element_ids.iter().enumerate() {
                    history.push(HistoryEntry::new(
                        node_id.clone(),
                        ts as u64,
                        HistoryAction::Add {
                            kind: OverlayKind::Marker,
                            element_id: element_id.clone(),
                        },
                    ));
                }
                let mut popped = 0u64;
                while history.pop().is_some() {
                    popped += 1;
                }
                black_box(popped)
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();

    let mut group = c.benchmark_group("store.save_request");
    for (case_id, nodes, per_node) in cases {
        let store = tour_fixture(nodes, per_node);
        let meta = TourMeta::new("Bench");
        group.bench_function(case_id, |b| {
            b.iter(|| {
                let request = build_save_request(black_box(&meta), black_box(&store))
                    .expect("save request");
                black_box(
                    request
                        .nodes
                        .iter()
                        .map(|node| node.markers.len() + node.texts.len())
                        .sum::<usize>(),
                )
            })
        });
    }
    group.finish();

    let mut group = c.benchmark_group("store.decode");
    for (case_id, nodes, per_node) in cases {
        let fetched = fetched_fixture(&tour_fixture(nodes, per_node));
        group.bench_function(case_id, |b| {
            b.iter_batched(
                || fetched.clone(),
                |fetched| {
                    let loaded = decode_tour(black_box(fetched));
                    black_box(checksum_store(&loaded.store) + loaded.skipped.len() as u64)
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = config();
    targets = benches_store
}
criterion_main!(benches);
