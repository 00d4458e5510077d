//! Benchmarks for selection and data-source propagation.
//!
//! Run with: `cargo bench --package formsync-harness --bench selection_sync_bench`
//!
//! # Performance Baselines
//!
//! These benchmarks establish baselines for:
//! - Observable-to-control flag sync (one O(n) scan per selection change)
//! - Control-to-observable flag sync (one user toggle)
//! - Wholesale data-source rebinds on list mutation

use std::hint::black_box;
use std::rc::Rc;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use formsync::{BindOptions, BindingKind, Endpoint, ReactiveList, Surface, bind};
use formsync_harness::ListControl;

const SIZES: [usize; 3] = [16, 256, 4096];

fn bound_list(
    len: usize,
    kind: BindingKind,
) -> (ReactiveList<u32>, Rc<ListControl<u32>>, formsync::Binding) {
    let items: Vec<u32> = (0..len as u32).collect();
    let list = ReactiveList::from(items.clone());
    let control = Rc::new(ListControl::new(items));
    let binding = bind(
        Endpoint::list(&list),
        Surface::collection(control.clone()),
        kind,
        BindOptions::default(),
    )
    .expect("bench fixture binds");
    (list, control, binding)
}

// ============================================================================
// Flag Sync
// ============================================================================

fn bench_select_to_flags(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection_sync/select_to_flags");
    for len in SIZES {
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            let (list, _control, _binding) = bound_list(len, BindingKind::SelectedItems);
            let target = (len / 2) as u32;
            b.iter(|| {
                list.selected().select(black_box(target));
                list.selected().deselect(black_box(&target));
            });
        });
    }
    group.finish();
}

fn bench_toggle_to_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection_sync/toggle_to_selection");
    for len in SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            let (list, control, _binding) = bound_list(len, BindingKind::SelectedItems);
            let index = len - 1;
            b.iter(|| {
                control.user_toggle(black_box(index), true);
                control.user_toggle(black_box(index), false);
            });
            black_box(list.selected().len());
        });
    }
    group.finish();
}

// ============================================================================
// Data Source
// ============================================================================

fn bench_checked_items_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection_sync/checked_items_push");
    for len in SIZES {
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            let (list, control, _binding) = bound_list(len, BindingKind::CheckedItems);
            list.selected().select(0);
            b.iter(|| {
                list.push(black_box(u32::MAX));
                list.remove_at(black_box(len)).ok();
            });
            black_box(control.flags());
        });
    }
    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
    benches,
    bench_select_to_flags,
    bench_toggle_to_selection,
    bench_checked_items_push,
);

criterion_main!(benches);
