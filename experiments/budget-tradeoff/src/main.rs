use std::{
    collections::BTreeMap,
    fmt::Write,
    path::{Path, PathBuf},
};

use alstream_core::{
    aggregate, clusters, ensure_report_file, init_tracing, load_or_init, update_sections,
    Figure, FoldSeries, PngRenderer, RenderedFigure, Renderer, ReportSection, ResultTable,
    SeriesKey, TradeoffArgs, TradeoffPlotter, TradeoffSettings, DEFAULT_REPORT_TEMPLATE,
};
use anyhow::{anyhow, Context, Result};
use tracing::info;

const DEFAULT_CONFIG_PATH: &str = "alstream/tradeoff.json";

fn main() -> Result<()> {
    init_tracing();

    let args = match TradeoffArgs::parse_from_env() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!("{}", usage());
            std::process::exit(2);
        }
    };

    if args.help_requested() {
        println!("{}", usage());
        return Ok(());
    }

    let results_path = args
        .results()
        .ok_or_else(|| anyhow!("missing required argument -f <results.csv>"))?;
    let config_path = args
        .config()
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let settings: TradeoffSettings = load_or_init(&config_path, TradeoffSettings::default)?;

    let delimiter = u8::try_from(settings.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| anyhow!("delimiter {:?} is not a single ASCII character", settings.delimiter))?;

    let table = ResultTable::load(results_path, delimiter)
        .with_context(|| format!("failed to load results from {}", results_path.display()))?;
    let series = aggregate(&table, &settings.columns)
        .with_context(|| format!("failed to aggregate {}", results_path.display()))?;
    let clusters = clusters(&series);

    info!(
        rows = table.len(),
        folds = series.len(),
        learners = clusters.len(),
        "aggregated final fold states"
    );

    let output = args
        .output()
        .cloned()
        .unwrap_or_else(|| results_path.with_extension("png"));
    let mut renderer = PngRenderer::new(settings.figure.clone()).writing_to(&output);
    let plotter = TradeoffPlotter::default().with_title(format!(
        "Accuracy vs. labelling cost ({})",
        file_label(results_path)
    ));
    let figure = plotter.figure(&clusters);
    let rendered = renderer.render(&figure)?;

    println!(
        "plotted {} folds of {} learners to {}",
        series.len(),
        clusters.len(),
        output.display()
    );
    for line in legend(&figure) {
        println!("  {line}");
    }

    if let Some(report) = args.report() {
        write_report(report, results_path, &settings, &series, &figure, &rendered)?;
        println!("updated report {}", report.display());
    }

    Ok(())
}

fn usage() -> String {
    format!(
        "Usage: alstream-tradeoff -f <results.csv> [-o <figure.png>] [-c <config.json>] [-r <report.md>] [-h]\n\
         \n\
         -f  exported result table (header row, index in the first column)\n\
         -o  figure path (default: results path with a .png extension)\n\
         -c  column and figure settings (default {})\n\
         -r  Markdown report to update with the figure and final fold states",
        DEFAULT_CONFIG_PATH
    )
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// One line per learner naming the colour its markers were drawn in.
fn legend(figure: &Figure) -> Vec<String> {
    figure
        .series
        .iter()
        .map(|series| {
            format!(
                "learner {}: {} ({} folds)",
                series.learner,
                series.color.to_hex(),
                series.points.len()
            )
        })
        .collect()
}

fn write_report(
    report_path: &Path,
    results_path: &Path,
    settings: &TradeoffSettings,
    series: &BTreeMap<SeriesKey, FoldSeries>,
    figure: &Figure,
    rendered: &RenderedFigure,
) -> Result<()> {
    ensure_report_file(report_path, DEFAULT_REPORT_TEMPLATE)?;

    let sections = [
        ReportSection::new(
            "configuration",
            render_configuration_section(results_path, settings),
        ),
        ReportSection::new("tradeoff", render_tradeoff_section(figure, rendered)),
        ReportSection::new("folds", render_folds_section(series, figure)),
    ];

    update_sections(report_path, &sections)
}

fn render_configuration_section(results_path: &Path, settings: &TradeoffSettings) -> String {
    format!(
        "- Result file: `{}`\n- Learner column: `{}`\n- Fold column: `{}`\n- Labelling cost column: `{}`\n- Accuracy column: `{}`\n",
        results_path.display(),
        settings.columns.learner,
        settings.columns.fold,
        settings.columns.acquisitions,
        settings.columns.accuracy
    )
}

fn render_tradeoff_section(figure: &Figure, rendered: &RenderedFigure) -> String {
    let mut output = String::new();
    let _ = writeln!(&mut output, "**{}**", figure.title);
    let _ = writeln!(&mut output);
    let _ = writeln!(&mut output, "![{}]({})", figure.title, rendered.data_url());
    let _ = writeln!(&mut output);
    let _ = writeln!(&mut output, "x: {}, y: {}", figure.x_label, figure.y_label);
    let _ = writeln!(&mut output);
    for line in legend(figure) {
        let _ = writeln!(&mut output, "- {line}");
    }
    output
}

fn render_folds_section(series: &BTreeMap<SeriesKey, FoldSeries>, figure: &Figure) -> String {
    if series.is_empty() {
        return "No result rows found.".to_string();
    }

    let mut output = String::new();
    let _ = writeln!(
        &mut output,
        "| Learner | Colour | Fold | Rel. label acquisitions | Accuracy (%) | Source row |"
    );
    let _ = writeln!(&mut output, "| --- | --- | --- | --- | --- | --- |");

    for fold in series.values() {
        let color = figure
            .series
            .iter()
            .find(|series| series.learner == fold.learner)
            .map(|series| series.color.to_hex())
            .unwrap_or_default();
        let _ = writeln!(
            &mut output,
            "| {} | {} | {} | {:.4} | {:.2} | {} |",
            fold.learner, color, fold.fold, fold.acquisitions, fold.accuracy, fold.row
        );
    }

    output
}
