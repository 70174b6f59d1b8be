//! Integration tests for request composition

use energy_analyst::llm::prompts::{self, SYSTEM_INSTRUCTION};
use energy_analyst::{compose, compose_named, ingest, AnalysisError, AnalysisFocus, Table};

fn table() -> Table {
    ingest(
        b"Date,Site,Usage,Cost\n2024-02,North,1100,220\n2024-01,North,1200,240\n2024-01,South,900,200\n",
        "portfolio.csv",
    )
    .unwrap()
}

#[test]
fn test_compose_is_deterministic() {
    let table = table();
    for focus in AnalysisFocus::ALL {
        let first = compose(&table, focus, 50).unwrap();
        let second = compose(&table, focus, 50).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_compose_uses_fixed_system_instruction() {
    let payload = compose(&table(), AnalysisFocus::Procurement, 50).unwrap();
    assert_eq!(payload.system(), SYSTEM_INSTRUCTION);
}

#[test]
fn test_each_focus_uses_its_own_template() {
    let table = table();
    let users: Vec<String> = AnalysisFocus::ALL
        .iter()
        .map(|f| compose(&table, *f, 50).unwrap().user().to_string())
        .collect();
    for (i, a) in users.iter().enumerate() {
        for b in users.iter().skip(i + 1) {
            assert_ne!(a, b);
        }
    }

    let payload = compose(&table, AnalysisFocus::DemandResponse, 50).unwrap();
    let data = table.to_csv().unwrap();
    assert_eq!(
        payload.user(),
        prompts::render(AnalysisFocus::DemandResponse, &data)
    );
}

#[test]
fn test_compose_embeds_only_sampled_rows() {
    let table = table();
    let payload = compose(&table, AnalysisFocus::AssetManagement, 1).unwrap();
    assert!(payload.user().contains("Data:\n"));
    // Ingest sorts by date; the stable sort keeps North ahead of South in January
    assert!(payload.user().ends_with("Date,Site,Usage,Cost\n2024-01,North,1200,240\n"));
    assert!(!payload.user().contains("South"));
}

#[test]
fn test_compose_named_accepts_labels_and_slugs() {
    let table = table();
    let by_slug = compose_named(&table, "next-best-actions", 50).unwrap();
    let by_label = compose_named(&table, "Next Best Actions", 50).unwrap();
    assert_eq!(by_slug, by_label);
}

#[test]
fn test_compose_named_unknown_focus() {
    let err = compose_named(&table(), "Weather Forecasting", 50).unwrap_err();
    assert_eq!(
        err,
        AnalysisError::UnknownFocus("Weather Forecasting".to_string())
    );
}

#[test]
fn test_compose_empty_table() {
    let table = ingest(b"Date,Usage\n", "empty.csv").unwrap();
    let payload = compose(&table, AnalysisFocus::Procurement, 50).unwrap();
    assert!(payload.user().ends_with("Data:\nDate,Usage\n"));
}
