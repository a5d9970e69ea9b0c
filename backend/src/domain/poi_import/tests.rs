//! Unit coverage for import orchestration.

use std::path::Path;
use std::sync::Arc;

use mockall::Sequence;
use rstest::{fixture, rstest};

use super::PoiImportService;
use crate::domain::ports::{
    CategoryLookup, CsvPoiRow, ImportError, ImportStatus, MockCategoryRepository,
    MockPoiRepository, MockPoiSource, PoiImportCommand, PoiRepositoryError, PoiSourceError,
    RawPoi, UpsertOutcome, WriteScope, XmlPoiElement,
};
use crate::domain::{Category, CategoryId, CategoryName, ExternalId, ImportFormat};

type Service = PoiImportService<MockPoiSource, MockCategoryRepository, MockPoiRepository>;

fn make_service(
    source: MockPoiSource,
    categories: MockCategoryRepository,
    pois: MockPoiRepository,
) -> Service {
    PoiImportService::new(Arc::new(source), Arc::new(categories), Arc::new(pois))
}

fn category(id: i32, name: &str) -> Category {
    Category::new(
        CategoryId::new(id),
        CategoryName::new(name).expect("valid category"),
    )
}

fn xml(pid: &str, category: Option<&str>, ratings: Option<&str>) -> RawPoi {
    RawPoi::Xml(XmlPoiElement {
        pid: Some(pid.to_owned()),
        pname: Some(format!("poi {pid}")),
        pcategory: category.map(str::to_owned),
        pratings: ratings.map(str::to_owned),
    })
}

fn csv(poi_id: &str, category: &str) -> RawPoi {
    RawPoi::Csv(CsvPoiRow {
        poi_id: Some(poi_id.to_owned()),
        poi_name: Some(format!("row {poi_id}")),
        poi_category: Some(category.to_owned()),
        poi_ratings: Some("{4.0,5.0}".to_owned()),
    })
}

/// Category store that already knows `park` and creates anything else.
#[fixture]
fn categories() -> MockCategoryRepository {
    let mut repo = MockCategoryRepository::new();
    repo.expect_list_all()
        .returning(|| Ok(vec![category(1, "park")]));
    repo.expect_get_or_create().returning(|name| {
        Ok(CategoryLookup {
            category: Category::new(CategoryId::new(2), name.clone()),
            created: true,
        })
    });
    repo
}

fn source_returning(elements: Vec<RawPoi>) -> MockPoiSource {
    let mut source = MockPoiSource::new();
    source
        .expect_load()
        .times(1)
        .return_once(move |_, _| Ok(elements));
    source
}

#[rstest]
#[tokio::test]
async fn unsupported_extensions_touch_nothing() {
    let mut source = MockPoiSource::new();
    source.expect_load().times(0);
    let mut categories = MockCategoryRepository::new();
    categories.expect_list_all().times(0);
    let mut pois = MockPoiRepository::new();
    pois.expect_upsert().times(0);
    pois.expect_bulk_insert().times(0);

    let service = make_service(source, categories, pois);
    let outcome = service
        .import(Path::new("data/pois.txt"))
        .await
        .expect("unsupported is not an error");

    assert_eq!(outcome.status, ImportStatus::Unsupported);
    assert_eq!(outcome.format, None);
    assert_eq!(outcome.records_written, 0);
}

#[rstest]
#[tokio::test]
async fn xml_elements_are_upserted_in_order(categories: MockCategoryRepository) {
    let source = source_returning(vec![
        xml("1", Some("park"), Some("4,5")),
        xml("2", Some("museum"), None),
    ]);
    let mut seq = Sequence::new();
    let mut pois = MockPoiRepository::new();
    pois.expect_upsert()
        .withf(|record| record.external_id() == ExternalId::new(1))
        .times(1)
        .in_sequence(&mut seq)
        .return_once(|_| Ok(UpsertOutcome::Updated));
    pois.expect_upsert()
        .withf(|record| {
            record.external_id() == ExternalId::new(2) && record.avg_rating().value() == 0.0
        })
        .times(1)
        .in_sequence(&mut seq)
        .return_once(|_| Ok(UpsertOutcome::Created));
    pois.expect_bulk_insert().times(0);

    let service = make_service(source, categories, pois);
    let outcome = service
        .import(Path::new("pois.xml"))
        .await
        .expect("import succeeds");

    assert_eq!(outcome.status, ImportStatus::Imported);
    assert_eq!(outcome.format, Some(ImportFormat::Xml));
    assert_eq!(outcome.records_read, 2);
    assert_eq!(outcome.records_written, 2);
    assert_eq!(outcome.created, 1);
    assert_eq!(outcome.updated, 1);
    assert_eq!(outcome.categories_created, 1);
}

#[rstest]
#[tokio::test]
async fn csv_rows_go_through_one_bulk_insert(categories: MockCategoryRepository) {
    let source = source_returning(vec![csv("5", "park"), csv("5", "park"), csv("6", "bar")]);
    let mut pois = MockPoiRepository::new();
    pois.expect_upsert().times(0);
    pois.expect_bulk_insert()
        .withf(|records| records.len() == 3)
        .times(1)
        .return_once(|records| Ok(records.len() as u64));

    let service = make_service(source, categories, pois);
    let outcome = service
        .import(Path::new("pois.csv"))
        .await
        .expect("import succeeds");

    assert_eq!(outcome.created, 3);
    assert_eq!(outcome.updated, 0);
    assert_eq!(outcome.records_written, 3);
}

#[rstest]
#[tokio::test]
async fn empty_csv_skips_the_bulk_insert(categories: MockCategoryRepository) {
    let source = source_returning(Vec::new());
    let mut pois = MockPoiRepository::new();
    pois.expect_bulk_insert().times(0);

    let service = make_service(source, categories, pois);
    let outcome = service
        .import(Path::new("empty.csv"))
        .await
        .expect("empty file imports");

    assert_eq!(outcome.status, ImportStatus::Imported);
    assert_eq!(outcome.records_read, 0);
}

#[rstest]
#[tokio::test]
async fn structural_failures_abort_before_any_write() {
    let mut source = MockPoiSource::new();
    source
        .expect_load()
        .withf(|_, format| *format == ImportFormat::Json)
        .return_once(|_, _| Err(PoiSourceError::decode("expected an array")));
    let mut pois = MockPoiRepository::new();
    pois.expect_upsert().times(0);

    let service = make_service(source, MockCategoryRepository::new(), pois);
    let err = service
        .import(Path::new("broken.json"))
        .await
        .expect_err("decode failure");

    assert_eq!(
        err,
        ImportError::StructuralParse {
            format: ImportFormat::Json,
            message: "expected an array".to_owned(),
        }
    );
}

#[rstest]
#[tokio::test]
async fn read_failures_name_the_path() {
    let mut source = MockPoiSource::new();
    source
        .expect_load()
        .return_once(|_, _| Err(PoiSourceError::read("no such file")));

    let service = make_service(
        source,
        MockCategoryRepository::new(),
        MockPoiRepository::new(),
    );
    let err = service
        .import(Path::new("missing.xml"))
        .await
        .expect_err("read failure");

    assert!(matches!(err, ImportError::Read { ref path, .. } if path == Path::new("missing.xml")));
    assert_eq!(err.records_written(), 0);
}

#[rstest]
#[tokio::test]
async fn malformed_ratings_stop_the_import_after_earlier_writes(
    categories: MockCategoryRepository,
) {
    let source = source_returning(vec![
        xml("1", Some("park"), Some("3")),
        xml("2", Some("park"), Some("3,x")),
        xml("3", Some("park"), None),
    ]);
    let mut pois = MockPoiRepository::new();
    pois.expect_upsert()
        .times(1)
        .return_once(|_| Ok(UpsertOutcome::Created));

    let service = make_service(source, categories, pois);
    let err = service
        .import(Path::new("pois.xml"))
        .await
        .expect_err("second record fails");

    assert!(matches!(
        err,
        ImportError::FieldExtraction {
            record: 2,
            records_written: 1,
            ..
        }
    ));
}

#[rstest]
#[tokio::test]
async fn missing_category_is_a_field_extraction_failure(categories: MockCategoryRepository) {
    let source = source_returning(vec![xml("1", None, None)]);
    let mut pois = MockPoiRepository::new();
    pois.expect_upsert().times(0);

    let service = make_service(source, categories, pois);
    let err = service
        .import(Path::new("pois.xml"))
        .await
        .expect_err("no category");

    assert_eq!(err.kind(), "field_extraction");
}

#[rstest]
#[tokio::test]
async fn non_numeric_external_ids_are_persistence_failures(categories: MockCategoryRepository) {
    let source = source_returning(vec![xml("abc", Some("park"), None)]);
    let mut pois = MockPoiRepository::new();
    pois.expect_upsert().times(0);

    let service = make_service(source, categories, pois);
    let err = service
        .import(Path::new("pois.xml"))
        .await
        .expect_err("bad external id");

    assert!(matches!(
        err,
        ImportError::Persistence {
            scope: WriteScope::Record(1),
            records_written: 0,
            ..
        }
    ));
}

#[rstest]
#[tokio::test]
async fn upsert_conflicts_report_the_failing_record(categories: MockCategoryRepository) {
    let source = source_returning(vec![xml("1", Some("park"), None), xml("2", Some("park"), None)]);
    let mut seq = Sequence::new();
    let mut pois = MockPoiRepository::new();
    pois.expect_upsert()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(|_| Ok(UpsertOutcome::Created));
    pois.expect_upsert()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(|_| Err(PoiRepositoryError::conflict("2 rows share external id 2")));

    let service = make_service(source, categories, pois);
    let err = service
        .import(Path::new("pois.json"))
        .await
        .expect_err("conflict");

    assert_eq!(
        err,
        ImportError::Persistence {
            scope: WriteScope::Record(2),
            message: "poi persistence conflict: 2 rows share external id 2".to_owned(),
            records_written: 1,
        }
    );
}

#[rstest]
#[tokio::test]
async fn bulk_failures_fail_the_whole_batch(categories: MockCategoryRepository) {
    let source = source_returning(vec![csv("1", "park"), csv("2", "park")]);
    let mut pois = MockPoiRepository::new();
    pois.expect_bulk_insert()
        .times(1)
        .return_once(|_| Err(PoiRepositoryError::query("value too long")));

    let service = make_service(source, categories, pois);
    let err = service
        .import(Path::new("pois.csv"))
        .await
        .expect_err("batch failure");

    assert!(matches!(
        err,
        ImportError::Persistence {
            scope: WriteScope::Batch { size: 2 },
            records_written: 0,
            ..
        }
    ));
}
