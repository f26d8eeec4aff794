//! Integration tests for holdmap-portfolio.
//!
//! These tests run disclosure-shaped data through value parsing,
//! aggregation, metrics and party analysis.

use std::collections::{BTreeMap, HashMap};

use approx::assert_relative_eq;
use holdmap_portfolio::features::{feature_names, portfolio_feature_vector};
use holdmap_portfolio::prelude::*;

// =============================================================================
// TEST FIXTURES
// =============================================================================

/// A small product universe with sectors.
fn create_products() -> HashMap<ProductId, ProductRecord> {
    [
        ProductRecord::builder(1, "Apple Inc").sector("Technology").industry("Hardware").build(),
        ProductRecord::builder(2, "Microsoft Corp").sector("Technology").industry("Software").build(),
        ProductRecord::builder(3, "Exxon Mobil").sector("Energy").industry("Oil & Gas").build(),
        ProductRecord::builder(4, "Pfizer Inc").sector("Healthcare").industry("Pharma").build(),
        ProductRecord::builder(5, "Example Growth Fund").product_type("Fund").build(),
        ProductRecord::builder(6, "Example Growth Fund - Class A")
            .product_type("Fund")
            .sector("Financials")
            .build(),
    ]
    .into_iter()
    .map(|p| (p.id, p))
    .collect()
}

/// Three-dimensional product vectors.
fn create_embeddings() -> EmbeddingIndex {
    HashMap::from([
        (ProductId(1), vec![1.0, 0.0, 0.0]),
        (ProductId(2), vec![0.8, 0.2, 0.0]),
        (ProductId(3), vec![0.0, 1.0, 0.0]),
        (ProductId(4), vec![0.0, 0.0, 1.0]),
        (ProductId(5), vec![0.5, 0.5, 0.5]),
        (ProductId(6), vec![0.2, 0.2, 0.6]),
    ])
}

fn holding(holder: u64, product: u64, name: &str, value: &str) -> AssetHolding {
    AssetHolding::new(HolderId(holder), ProductId(product), name, value)
}

/// Holdings for three holders.
fn create_disclosures() -> BTreeMap<HolderId, Vec<AssetHolding>> {
    BTreeMap::from([
        (
            HolderId(1),
            vec![
                holding(1, 1, "Apple Inc", "$100,001 - $250,000"),
                holding(1, 2, "Microsoft Corp", "$50,001 - $100,000"),
                holding(1, 3, "Exxon Mobil", "$1,001 - $15,000"),
            ],
        ),
        (
            HolderId(2),
            vec![
                holding(2, 5, "Example Growth Fund", "None"),
                holding(2, 6, "Example Growth Fund - Class A", "$15,001 - $50,000"),
                holding(2, 4, "Pfizer Inc", "$15,001 - $50,000"),
            ],
        ),
        (HolderId(3), vec![holding(3, 3, "Exxon Mobil", "$0")]),
    ])
}

// =============================================================================
// VALUE PARSING
// =============================================================================

#[test]
fn test_disclosure_value_formats() {
    let cases = [
        ("$1,001 - $15,000", Some(8000.5)),
        ("$15,001 - $50,000", Some(32500.5)),
        ("Over $1,000,000", Some(1_500_000.0)),
        ("None (or less than $1,001)", Some(500.0)),
        ("Value Unascertainable", Some(50_000.0)),
        ("$75,000", Some(75_000.0)),
        ("75000", Some(75_000.0)),
        ("N/A", None),
        ("", None),
    ];
    for (text, expected) in cases {
        assert_eq!(parse_asset_value(text).as_f64(), expected, "{text:?}");
    }
}

// =============================================================================
// AGGREGATION
// =============================================================================

#[test]
fn test_container_fund_is_excluded() {
    let disclosures = create_disclosures();
    let embeddings = create_embeddings();
    let portfolio = aggregate_portfolio(
        HolderId(2),
        &disclosures[&HolderId(2)],
        &embeddings,
        EmbeddingMethod::Hybrid,
        &AggregationConfig::sequential(),
    )
    .unwrap();

    assert_eq!(portfolio.asset_count, 2);
    assert_eq!(portfolio.metadata.parents_skipped, 1);
    assert_eq!(portfolio.metadata.defaulted_values, 0);
    // class A and Pfizer carry equal value
    assert_relative_eq!(portfolio.vector[0], 0.1);
    assert_relative_eq!(portfolio.vector[2], 0.8, epsilon = 1e-12);
    assert_relative_eq!(portfolio.total_value, 65001.0);
}

#[test]
fn test_unresolved_without_relative_is_defaulted() {
    let holdings = vec![
        holding(1, 1, "Apple Inc", "Spouse owned, amount withheld"),
        holding(1, 3, "Exxon Mobil", "$25,000"),
    ];
    let portfolio = aggregate_portfolio(
        HolderId(1),
        &holdings,
        &create_embeddings(),
        EmbeddingMethod::Cooccurrence,
        &AggregationConfig::sequential(),
    )
    .unwrap();

    assert_eq!(portfolio.metadata.defaulted_values, 1);
    assert_eq!(portfolio.method, "cooccurrence_weighted");
    assert_relative_eq!(portfolio.vector[0], 0.5);
    assert_relative_eq!(portfolio.vector[1], 0.5);
}

#[test]
fn test_batch_aggregation_reports_failures() {
    let run = aggregate_portfolios(
        &create_disclosures(),
        &create_embeddings(),
        EmbeddingMethod::Hybrid,
        &AggregationConfig::default(),
    );

    assert_eq!(run.processed, 2);
    assert_eq!(run.skipped, 1);
    assert_eq!(
        run.failures,
        vec![AggregationFailure::NoResolvableValues { holder: HolderId(3) }]
    );
    let ids: Vec<HolderId> = run.embeddings.iter().map(|e| e.holder_id).collect();
    assert_eq!(ids, vec![HolderId(1), HolderId(2)]);
}

#[test]
fn test_embedding_rows_feed_aggregation() {
    let rows: Vec<ProductEmbedding> = create_embeddings()
        .into_iter()
        .map(|(product_id, vector)| ProductEmbedding {
            product_id,
            method: EmbeddingMethod::FrequencyText,
            vector,
            feature_list: Vec::new(),
        })
        .collect();
    let index = embedding_index(&rows, EmbeddingMethod::FrequencyText);
    assert_eq!(index.len(), 6);
    assert!(embedding_index(&rows, EmbeddingMethod::Hybrid).is_empty());
}

// =============================================================================
// METRICS AND PARTY PATTERNS
// =============================================================================

#[test]
fn test_metrics_from_holdings() {
    let products = create_products();
    let disclosures = create_disclosures();
    let exposure = SectorExposure::by_asset_count(&disclosures[&HolderId(1)], &products);
    let metrics = DiversificationMetrics::from_exposure(HolderId(1), &exposure, RiskScheme::Concentration);

    assert_eq!(metrics.total_assets, 3);
    assert_eq!(metrics.dominant_sector.as_deref(), Some("Technology"));
    assert_relative_eq!(metrics.concentration_ratio, 2.0 / 3.0, epsilon = 1e-12);
    assert_relative_eq!(metrics.hhi, 5.0 / 9.0, epsilon = 1e-12);
    assert_eq!(metrics.risk_profile, RiskProfile::Concentrated);

    let strategy = DiversificationMetrics::from_exposure(HolderId(1), &exposure, RiskScheme::Strategy);
    assert_eq!(strategy.risk_profile, RiskProfile::Aggressive);
}

#[test]
fn test_feature_vector_for_holder() {
    let products = create_products();
    let disclosures = create_disclosures();
    let exposure = SectorExposure::by_asset_count(&disclosures[&HolderId(2)], &products);
    let metrics = DiversificationMetrics::from_exposure(HolderId(2), &exposure, RiskScheme::Concentration);

    let sectors: Vec<String> = ["Energy", "Financials", "Healthcare", "Technology", "Unknown"]
        .iter()
        .map(|s| (*s).to_string())
        .collect();
    let features = portfolio_feature_vector(&metrics, &sectors, metrics.total_assets);
    assert_eq!(features.len(), feature_names(&sectors).len());
    assert_relative_eq!(features[1], 1.0 / 3.0, epsilon = 1e-12);
    assert_relative_eq!(features[4], 1.0 / 3.0, epsilon = 1e-12);
}

#[test]
fn test_party_patterns() {
    let products = create_products();
    let disclosures = create_disclosures();
    let profiles: Vec<HolderProfile> = [(1u64, "Democratic"), (2, "Republican"), (3, "Democratic")]
        .into_iter()
        .map(|(id, party)| {
            let exposure = SectorExposure::by_asset_count(&disclosures[&HolderId(id)], &products);
            let metrics = DiversificationMetrics::from_exposure(HolderId(id), &exposure, RiskScheme::Concentration);
            HolderProfile::new(format!("Holder {id}"), party, metrics)
        })
        .collect();

    let patterns = analyze_party_patterns(&profiles);
    let dem = &patterns["Democratic"];
    assert_eq!(dem.holder_count, 2);
    assert_relative_eq!(dem.avg_asset_count, 2.0);
    assert_eq!(dem.top_sectors[0], ("Energy".to_string(), 2));
    assert_eq!(dem.top_sectors[1], ("Technology".to_string(), 1));
    assert_eq!(patterns["Republican"].risk_distribution.values().sum::<usize>(), 1);
}
