use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use morph_core::paradigm::{Paradigm, Rule};
use morph_core::{Analyzer, BundleBuilder, DictionaryBundle, Settings};

fn bench_bundle() -> DictionaryBundle {
    let mut b = BundleBuilder::new("ru");
    let infn = b.tag("INFN,perf,intr");
    let grnd = b.tag("GRND,perf,intr,refl");
    let infn_tr = b.tag("INFN,impf,tran");
    let grnd_tr = b.tag("GRND,impf,tran,refl");
    let nom = b.tag("NOUN,masc,sing,nom");
    let gen = b.tag("NOUN,masc,sing,gen");
    let dat = b.tag("NOUN,masc,sing,dat");
    let ins = b.tag("NOUN,masc,sing,ablt");

    let reflexive = b.paradigm(Paradigm::new(
        vec![Rule::new("", "иться", infn), Rule::new("", "ившись", grnd)],
        0,
    ));
    let transitive = b.paradigm(Paradigm::new(
        vec![Rule::new("", "ить", infn_tr), Rule::new("", "ившись", grnd_tr)],
        0,
    ));
    let noun = b.paradigm(Paradigm::new(
        vec![
            Rule::new("", "", nom),
            Rule::new("", "а", gen),
            Rule::new("", "у", dat),
            Rule::new("", "ом", ins),
        ],
        0,
    ));

    for stem in ["свар", "слом", "гор", "луч", "мир", "тиш", "зал", "вал", "дел"] {
        b.lexeme(stem, reflexive);
    }
    for stem in ["коп", "дав", "мол", "лов"] {
        b.lexeme(stem, transitive);
    }
    for stem in ["кот", "дом", "стол", "слон", "город", "мост", "лес", "сад"] {
        b.lexeme(stem, noun);
    }
    b.build().expect("bench bundle")
}

static INPUTS: &[(&str, &str)] = &[
    ("known", "кота"),
    ("known_upper", "ГОРОДОМ"),
    ("predicted", "гуглившись"),
    ("unknown", "бжзщх"),
];

fn bench_parse(c: &mut Criterion) {
    let bundle = bench_bundle();
    let mut settings = Settings::default();
    settings.cache.capacity = 0;
    let analyzer = Analyzer::with_settings(&bundle, settings).expect("analyzer");
    let mut group = c.benchmark_group("parse/uncached");
    for &(label, word) in INPUTS {
        group.bench_with_input(BenchmarkId::new(label, word.len()), &word, |b, &word| {
            b.iter(|| analyzer.parse(word));
        });
    }
    group.finish();
}

fn bench_parse_cached(c: &mut Criterion) {
    let analyzer = Analyzer::from_bundle(&bench_bundle()).expect("analyzer");
    let mut group = c.benchmark_group("parse/cached");
    for &(label, word) in INPUTS {
        group.bench_with_input(BenchmarkId::new(label, word.len()), &word, |b, &word| {
            b.iter(|| analyzer.parse(word));
        });
    }
    group.finish();
}

fn bench_load(c: &mut Criterion) {
    let bundle = bench_bundle();
    c.bench_function("load/from_bundle", |b| {
        b.iter(|| Analyzer::from_bundle(&bundle).expect("analyzer"));
    });
}

criterion_group!(benches, bench_parse, bench_parse_cached, bench_load);
criterion_main!(benches);
