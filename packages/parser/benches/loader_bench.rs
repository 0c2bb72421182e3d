use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cnx_parser::{load, serialize};

fn module_source(sections: usize) -> String {
    let mut source = String::from(r#"<document xmlns="http://cnx.rice.edu/cnxml"><content>"#);
    for i in 0..sections {
        source.push_str(&format!(
            r#"<section id="s{i}">
                <title>Section {i}</title>
                <para id="p{i}">Some <emphasis effect="italics">text</emphasis> with H<sub>2</sub>O.</para>
                <exercise>
                    <problem><para>What is {i} + 1?</para></problem>
                    <solution><para>{i} + 1</para></solution>
                </exercise>
                <note type="warning"><list><item>a</item><item>b</item></list></note>
            </section>"#
        ));
    }
    source.push_str("</content></document>");
    source
}

fn load_small_module(c: &mut Criterion) {
    let source = module_source(5);

    c.bench_function("load_small_module", |b| b.iter(|| load(black_box(&source))));
}

fn load_large_module(c: &mut Criterion) {
    let source = module_source(200);

    c.bench_function("load_large_module", |b| b.iter(|| load(black_box(&source))));
}

fn serialize_large_module(c: &mut Criterion) {
    let tree = load(&module_source(200)).unwrap();

    c.bench_function("serialize_large_module", |b| {
        b.iter(|| serialize(black_box(&tree)))
    });
}

criterion_group!(benches, load_small_module, load_large_module, serialize_large_module);
criterion_main!(benches);
