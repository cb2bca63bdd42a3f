use criterion::{Criterion, criterion_group, criterion_main};
use gridfield::{
    kind::KindRegistry,
    layout::{FieldSpec, Layout},
    structure::Message,
};

fn gen_message(rows: usize, columns: usize) -> Message {
    let points = rows * columns;
    // Deterministic but non-trivial pattern
    let values = (0..points).map(|i| (i * 31 % 997) as f64).collect();

    Message::new()
        .with_long("Nj", rows as i64)
        .with_long("Ni", columns as i64)
        .with_long("numberOfPoints", points as i64)
        .with_doubles("codedValues", values)
}

fn gen_layout(message: &Message) -> Layout {
    let specs = vec![
        FieldSpec::new("values", "data_apply_boustrophedonic")
            .with_arg("codedValues")
            .with_arg("Nj")
            .with_arg("Ni")
            .with_arg("numberOfPoints"),
    ];
    Layout::compile(KindRegistry::builtin(), &specs, message).unwrap()
}

fn bench_transcode(c: &mut Criterion) {
    for &side in &[16usize, 128, 512] {
        let mut message = gen_message(side, side);
        let layout = gen_layout(&message);
        let node = layout.get("values").unwrap();
        let mut logical = vec![0.0; side * side];

        c.bench_function(&format!("unpack_{}x{}", side, side), |b| {
            b.iter(|| node.unpack_double(&message, &mut logical).unwrap())
        });

        c.bench_function(&format!("pack_{}x{}", side, side), |b| {
            b.iter(|| node.pack_double(&mut message, &logical).unwrap())
        });
    }
}

criterion_group!(benches, bench_transcode);
criterion_main!(benches);
