//! Benchmarks for the in-memory parts of a clone: reference renaming and the
//! definition and registry rewrites. Filesystem phases are left out.

use std::path::Path;

use catalog_clone::definition::EntityDefinition;
use catalog_clone::ident::{IdMap, SequentialIds};
use catalog_clone::kind::CATALOG;
use catalog_clone::names::NameRewriter;
use catalog_clone::registry::{ConfigurationRegistry, DumpInfoRegistry};
use catalog_clone::rewrite::rewrite_definition;
use catalog_clone::xml::XmlDocument;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use uuid::Uuid;

const DEFINITION: &str = include_str!("../tests/testdata/config/Catalogs/Предметы.xml");
const CONFIGURATION: &str = include_str!("../tests/testdata/config/Configuration.xml");
const DUMP_INFO: &str = include_str!("../tests/testdata/config/ConfigDumpInfo.xml");

fn names() -> NameRewriter {
    NameRewriter::new(&CATALOG, "Предметы", "УТО_Тест").unwrap()
}

/// Benchmarks for renaming references in single values.
fn bench_name_rewrite(c: &mut Criterion) {
    let mut group = c.benchmark_group("name_rewrite");
    let names = names();

    group.bench_function("qualified", |b| {
        b.iter(|| names.rewrite(black_box("CatalogRef.Предметы")))
    });

    group.bench_function("similar_name", |b| {
        b.iter(|| names.rewrite(black_box("CatalogRef.ПредметыАрхив")))
    });

    group.bench_function("module_text", |b| {
        let text = "Найденный = Справочники.Предметы.НайтиПоКоду(Код);\n".repeat(100);
        b.iter(|| names.rewrite(black_box(&text)))
    });

    group.finish();
}

/// Benchmarks for the document rewrites, excluding parsing.
fn bench_document_rewrite(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_rewrite");
    let names = names();

    group.bench_function("definition", |b| {
        b.iter_batched(
            || {
                let doc = XmlDocument::parse(Path::new("Предметы.xml"), DEFINITION).unwrap();
                EntityDefinition::from_document(doc, &CATALOG).unwrap()
            },
            |mut definition| {
                let mut ids = SequentialIds::starting_at(1);
                rewrite_definition(&mut definition, &names, &mut IdMap::new(), &mut ids).unwrap()
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("configuration_registry", |b| {
        b.iter_batched(
            || {
                let doc =
                    XmlDocument::parse(Path::new("Configuration.xml"), CONFIGURATION).unwrap();
                ConfigurationRegistry::from_document(doc).unwrap()
            },
            |mut registry| registry.update(&CATALOG, black_box("УТО_Тест")).unwrap(),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("dump_info_registry", |b| {
        b.iter_batched(
            || {
                let doc = XmlDocument::parse(Path::new("ConfigDumpInfo.xml"), DUMP_INFO).unwrap();
                DumpInfoRegistry::from_document(doc).unwrap()
            },
            |mut registry| {
                let mut ids = SequentialIds::starting_at(1);
                registry
                    .update(&CATALOG, &names, Uuid::from_u128(1), &mut IdMap::new(), &mut ids)
                    .unwrap()
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_name_rewrite, bench_document_rewrite);
criterion_main!(benches);
