//! Loading exports from disk through to rendered figures and reports.

use std::fs;

use alstream_core::{
    aggregate, clusters, ensure_report_file, update_sections, ColumnNames, FoldId, LearnerId,
    MalformedTableError, PngRenderer, ReportSection, ResultTable, SeriesKey, TradeoffPlotter,
    FigureSettings, DEFAULT_REPORT_TEMPLATE,
};
use tempfile::TempDir;

const SEMICOLON_EXPORT: &str = "\
;learner id;fold id;Rel Number of Label Acquisitions;classifications correct (percent);evaluation time (cpu seconds)
0;0;0;0.05;58.1;0.4
1;0;0;0.09;60.2;0.8
2;0;1;0.04;57.3;0.4
3;0;1;0.10;59.9;0.9
4;1;0;0.30;66.0;0.5
5;1;0;0.52;64.4;1.1
6;1;1;0.31;65.0;0.5
7;1;1;0.49;67.7;1.0
";

#[test]
fn aggregates_semicolon_export_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("results.csv");
    fs::write(&path, SEMICOLON_EXPORT).unwrap();

    let table = ResultTable::load(&path, b';').unwrap();
    assert_eq!(table.len(), 8);

    let series = aggregate(&table, &ColumnNames::default()).unwrap();
    assert_eq!(series.len(), 4);

    let key = SeriesKey {
        learner: LearnerId::new("1"),
        fold: FoldId::new("0"),
    };
    assert_eq!(series[&key].acquisitions, 0.52);
    assert_eq!(series[&key].accuracy, 64.4);
    assert_eq!(table.cell(series[&key].row, "evaluation time (cpu seconds)"), Some("1.1"));
}

#[test]
fn custom_column_names_are_honoured() {
    let text = "\
idx,strategy,run,labels,acc
0,a,1,3,80
1,a,1,9,82
";
    let table = ResultTable::from_reader(text.as_bytes(), b',').unwrap();
    let columns = ColumnNames {
        learner: "strategy".to_string(),
        fold: "run".to_string(),
        acquisitions: "labels".to_string(),
        accuracy: "acc".to_string(),
    };
    let series = aggregate(&table, &columns).unwrap();
    assert_eq!(series.values().next().unwrap().acquisitions, 9.0);

    let err = aggregate(&table, &ColumnNames::default()).unwrap_err();
    assert!(matches!(err, MalformedTableError::MissingColumn { .. }));
}

#[test]
fn missing_file_is_reported_with_its_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.csv");
    let err = ResultTable::load(&path, b',').unwrap_err();
    assert!(matches!(err, MalformedTableError::Io { .. }));
    assert!(err.to_string().contains("absent.csv"));
}

#[test]
fn renders_figure_and_embeds_it_in_report() {
    let dir = TempDir::new().unwrap();
    let table = ResultTable::from_reader(SEMICOLON_EXPORT.as_bytes(), b';').unwrap();
    let series = aggregate(&table, &ColumnNames::default()).unwrap();
    let clusters = clusters(&series);

    let figure_path = dir.path().join("figures/tradeoff.png");
    let mut renderer = PngRenderer::new(FigureSettings::default()).writing_to(&figure_path);
    let rendered = TradeoffPlotter::default().plot(&clusters, &mut renderer).unwrap();
    assert_eq!(fs::read(&figure_path).unwrap(), rendered.png);

    let report = dir.path().join("report.md");
    ensure_report_file(&report, DEFAULT_REPORT_TEMPLATE).unwrap();
    update_sections(
        &report,
        &[ReportSection::new("tradeoff", format!("![tradeoff]({})", rendered.data_url()))],
    )
    .unwrap();

    let content = fs::read_to_string(&report).unwrap();
    assert!(content.contains("![tradeoff](data:image/png;base64,"));
    assert!(content.contains("<!-- SECTION:folds start -->"));
}
