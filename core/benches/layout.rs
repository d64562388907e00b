use bracket_core::{
    BracketLocator, BracketView, CellBounds, DefaultBracketModel, EliminationLocator, GridPosition,
    LayoutConfig, PositionTable, RecordingCanvas, RoutingMode,
};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

const DEPTH: usize = 10;

fn shape() -> Vec<usize> {
    (0..=DEPTH).map(|c| 1usize << (DEPTH - c)).collect()
}

fn table_build(c: &mut Criterion) {
    let config = LayoutConfig::default();
    let shape = shape();
    c.bench_function("position_table_build_depth_10", |b| {
        b.iter(|| {
            let table =
                PositionTable::build(&EliminationLocator, black_box(&config), &shape).expect("table");
            black_box(table.position(DEPTH, 0).expect("root"));
        });
    });
}

fn per_cell_lookup(c: &mut Criterion) {
    let config = LayoutConfig::default();
    let shape = shape();
    c.bench_function("per_cell_locate_depth_10", |b| {
        b.iter(|| {
            for (column, &rows) in shape.iter().enumerate() {
                for row in 0..rows {
                    black_box(EliminationLocator.locate(column, row, black_box(&config)).expect("locate"));
                }
            }
        });
    });
}

fn full_paint(c: &mut Criterion) {
    let entries: Vec<usize> = (0..1usize << DEPTH).collect();
    let model = DefaultBracketModel::from_entries(entries).expect("model");
    let noop = |_: &mut RecordingCanvas<u8>, _: Option<&usize>, _: GridPosition, _: CellBounds, _: bool| {};
    for mode in RoutingMode::ALL {
        let config = LayoutConfig::default().with_routing_mode(mode);
        let view = BracketView::new(config, 0u8);
        c.bench_function(&format!("paint_depth_10_{mode}"), |b| {
            b.iter(|| {
                let mut canvas = RecordingCanvas::new();
                black_box(view.paint(&model, &mut canvas, &noop).expect("paint"));
            });
        });
    }
}

criterion_group!(benches, table_build, per_cell_lookup, full_paint);
criterion_main!(benches);
