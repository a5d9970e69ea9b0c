//! End-to-end import of the fixture files into the in-memory store.

use std::path::PathBuf;
use std::sync::Arc;

use poi_backend::domain::ports::{
    ImportStatus, PoiImportCommand, PoiSearchQuery, PoiSearchRequest,
};
use poi_backend::domain::{ImportFormat, PoiImportService, PoiListing, PoiSearchService};
use poi_backend::outbound::memory::InMemoryPoiStore;
use poi_backend::outbound::poi_source::FilePoiSource;
use rstest::{fixture, rstest};

type Importer = PoiImportService<FilePoiSource, InMemoryPoiStore, InMemoryPoiStore>;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[fixture]
fn store() -> Arc<InMemoryPoiStore> {
    Arc::new(InMemoryPoiStore::new())
}

fn importer(store: &Arc<InMemoryPoiStore>) -> Importer {
    PoiImportService::new(Arc::new(FilePoiSource), store.clone(), store.clone())
}

fn first(store: &InMemoryPoiStore) -> PoiListing {
    store
        .listings()
        .into_iter()
        .next()
        .expect("store holds at least one POI")
}

#[rstest]
#[case("pois_test.xml", ImportFormat::Xml, 3, 2, "Дзіцячы сад №34", "kindergarten", 2.2)]
#[case(
    "pois_test.json",
    ImportFormat::Json,
    3,
    2,
    "unser Laden, Familie Lackinger",
    "convenience-store",
    2.0
)]
#[case("pois_test.csv", ImportFormat::Csv, 8, 3, "ちぬまん", "restaurant", 4.0)]
#[tokio::test]
async fn imports_every_fixture_record(
    store: Arc<InMemoryPoiStore>,
    #[case] file: &str,
    #[case] format: ImportFormat,
    #[case] pois: u64,
    #[case] categories: u64,
    #[case] first_name: &str,
    #[case] first_category: &str,
    #[case] first_rating: f64,
) {
    let outcome = importer(&store)
        .import(&fixture_path(file))
        .await
        .expect("fixture imports");

    assert_eq!(outcome.status, ImportStatus::Imported);
    assert_eq!(outcome.format, Some(format));
    assert_eq!(outcome.records_read, pois);
    assert_eq!(outcome.records_written, pois);
    assert_eq!(outcome.categories_created, categories);
    assert_eq!(store.poi_count(), usize::try_from(pois).expect("small count"));
    assert_eq!(
        store.category_count(),
        usize::try_from(categories).expect("small count")
    );

    let poi = first(&store);
    assert_eq!(poi.name, first_name);
    assert_eq!(poi.category.name().as_ref(), first_category);
    assert_eq!(poi.avg_rating, first_rating);
}

#[rstest]
#[case("pois_test.xml")]
#[case("pois_test.json")]
#[tokio::test]
async fn reimporting_keyed_formats_is_idempotent(store: Arc<InMemoryPoiStore>, #[case] file: &str) {
    let path = fixture_path(file);
    importer(&store).import(&path).await.expect("first import");
    let before = store.listings();

    let outcome = importer(&store).import(&path).await.expect("second import");

    assert_eq!(outcome.created, 0);
    assert_eq!(outcome.updated, 3);
    assert_eq!(outcome.categories_created, 0);
    assert_eq!(store.listings(), before);
}

#[rstest]
#[tokio::test]
async fn reimporting_csv_appends_duplicates(store: Arc<InMemoryPoiStore>) {
    let path = fixture_path("pois_test.csv");
    importer(&store).import(&path).await.expect("first import");

    let outcome = importer(&store).import(&path).await.expect("second import");

    assert_eq!(outcome.created, 8);
    assert_eq!(outcome.categories_created, 0);
    assert_eq!(store.poi_count(), 16);
    assert_eq!(store.category_count(), 3);
}

#[rstest]
#[tokio::test]
async fn unsupported_extension_writes_nothing(store: Arc<InMemoryPoiStore>) {
    let outcome = importer(&store)
        .import(&fixture_path("pois_test.txt"))
        .await
        .expect("unsupported is not an error");

    assert_eq!(outcome.status, ImportStatus::Unsupported);
    assert_eq!(outcome.records_written, 0);
    assert_eq!(store.poi_count(), 0);
    assert_eq!(store.category_count(), 0);
}

#[rstest]
#[tokio::test]
async fn shared_categories_are_reused_across_formats(store: Arc<InMemoryPoiStore>) {
    importer(&store)
        .import(&fixture_path("pois_test.xml"))
        .await
        .expect("xml imports");

    let outcome = importer(&store)
        .import(&fixture_path("pois_test.csv"))
        .await
        .expect("csv imports");

    // "cafe" already exists from the XML file.
    assert_eq!(outcome.categories_created, 2);
    assert_eq!(store.category_count(), 4);
}

#[rstest]
#[tokio::test]
async fn imported_pois_are_searchable_by_category(store: Arc<InMemoryPoiStore>) {
    importer(&store)
        .import(&fixture_path("pois_test.csv"))
        .await
        .expect("csv imports");
    let search = PoiSearchService::new(store.clone());

    let response = search
        .search(PoiSearchRequest {
            filter: Some("restaurant".to_owned()),
            ..PoiSearchRequest::default()
        })
        .await
        .expect("search succeeds");

    assert_eq!(response.categories, ["bar", "cafe", "restaurant"]);
    assert_eq!(response.selected_filter.as_deref(), Some("restaurant"));
    let page = response.page.expect("filter yields a page");
    assert_eq!(page.count(), 4);
    assert!(
        page.items()
            .iter()
            .all(|poi| poi.category.name().as_ref() == "restaurant")
    );
}

#[rstest]
#[tokio::test]
async fn case_mismatched_filter_finds_nothing(store: Arc<InMemoryPoiStore>) {
    importer(&store)
        .import(&fixture_path("pois_test.csv"))
        .await
        .expect("csv imports");
    let search = PoiSearchService::new(store.clone());

    let response = search
        .search(PoiSearchRequest {
            filter: Some("Restaurant".to_owned()),
            ..PoiSearchRequest::default()
        })
        .await
        .expect("search succeeds");

    let page = response.page.expect("filter yields a page");
    assert!(page.items().is_empty());
    assert_eq!(page.number(), 1);
}

#[rstest]
#[tokio::test]
async fn id_search_returns_the_single_matching_poi(store: Arc<InMemoryPoiStore>) {
    importer(&store)
        .import(&fixture_path("pois_test.csv"))
        .await
        .expect("csv imports");
    let expected = first(&store);
    let search = PoiSearchService::new(store.clone());

    let response = search
        .search(PoiSearchRequest {
            id_search: Some(expected.id.get().to_string()),
            ..PoiSearchRequest::default()
        })
        .await
        .expect("search succeeds");

    let page = response.page.expect("id search yields a page");
    assert_eq!(page.count(), 1);
    assert_eq!(page.into_items(), [expected]);
}

#[rstest]
#[tokio::test]
async fn external_id_search_returns_the_single_matching_poi(store: Arc<InMemoryPoiStore>) {
    importer(&store)
        .import(&fixture_path("pois_test.csv"))
        .await
        .expect("csv imports");
    let search = PoiSearchService::new(store.clone());

    let response = search
        .search(PoiSearchRequest {
            external_id_search: Some("1287381".to_owned()),
            ..PoiSearchRequest::default()
        })
        .await
        .expect("search succeeds");

    let page = response.page.expect("external id search yields a page");
    assert_eq!(page.count(), 1);
    let items = page.into_items();
    assert_eq!(items.len(), 1);
    let poi = items.first().expect("one listing");
    assert_eq!(poi.name, "Sushi Zanmai");
    assert_eq!(poi.external_id.get(), 1_287_381);
}

#[rstest]
#[case(Some("999999"), None)]
#[case(None, Some("42"))]
#[tokio::test]
async fn unmatched_id_searches_yield_one_empty_page(
    store: Arc<InMemoryPoiStore>,
    #[case] id_search: Option<&str>,
    #[case] external_id_search: Option<&str>,
) {
    importer(&store)
        .import(&fixture_path("pois_test.csv"))
        .await
        .expect("csv imports");
    let search = PoiSearchService::new(store.clone());

    let response = search
        .search(PoiSearchRequest {
            id_search: id_search.map(str::to_owned),
            external_id_search: external_id_search.map(str::to_owned),
            ..PoiSearchRequest::default()
        })
        .await
        .expect("search succeeds");

    let page = response.page.expect("id search yields a page");
    assert_eq!(page.count(), 0);
    assert_eq!(page.number(), 1);
    assert_eq!(page.num_pages(), 1);
    assert!(page.items().is_empty());
}
