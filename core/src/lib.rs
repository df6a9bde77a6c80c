pub mod command;
pub mod config;
pub mod error;
pub mod experiment;
pub mod learner;
pub mod logging;
pub mod plot;
pub mod report;
pub mod resolve;
pub mod results;
pub mod visualization;

pub use command::{compose, EngineCommand};
pub use config::{load_if_present, load_or_init, EngineSettings, TradeoffSettings};
pub use error::{ComposeError, ConfigError, MalformedTableError, NotImplementedError, ResolveError};
pub use experiment::{LaunchArgs, TradeoffArgs};
pub use learner::{BaseLearnerChoice, Budget, LearnerChoice, TaskMapping};
pub use logging::init_tracing;
pub use plot::{learner_colors, Color, Figure, FigureSettings, Renderer, Series, TradeoffPlotter};
pub use report::{ensure_report_file, update_sections, ReportSection, DEFAULT_REPORT_TEMPLATE};
pub use resolve::{resolve, ExperimentConfig};
pub use results::{aggregate, clusters, ColumnNames, FoldId, FoldSeries, LearnerId, ResultTable, SeriesKey, TradeoffPoint};
pub use visualization::{encode_rgb_png, png_data_url, PngRenderer, RenderedFigure};
