//! Budget/accuracy tradeoff figures.
//!
//! [`TradeoffPlotter`] turns learner clusters into a [`Figure`] and hands it
//! to a [`Renderer`]. Each fold's final point is drawn on its own; folds are
//! never averaged so the spread between repetitions stays visible.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::results::{LearnerId, TradeoffPoint};

/// RGB colour with channels in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Fully saturated colour at `hue` turns around the colour wheel.
    pub fn from_hue(hue: f32) -> Self {
        let h = hue.rem_euclid(1.0) * 6.0;
        let sector = h.floor();
        let f = h - sector;
        let (r, g, b) = match sector as u8 {
            0 => (1.0, f, 0.0),
            1 => (1.0 - f, 1.0, 0.0),
            2 => (0.0, 1.0, f),
            3 => (0.0, 1.0 - f, 1.0),
            4 => (f, 0.0, 1.0),
            _ => (1.0, 0.0, 1.0 - f),
        };
        Self { r, g, b }
    }

    /// `#rrggbb` form, as used in legends.
    pub fn to_hex(&self) -> String {
        let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }
}

/// Points of one learner, drawn in one colour.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub learner: LearnerId,
    pub color: Color,
    pub points: Vec<TradeoffPoint>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Figure {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

/// Data range covered by a figure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Figure {
    /// Range of all points, widened so a single point or a flat series still
    /// spans a non-empty area.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut points = self.series.iter().flat_map(|series| series.points.iter());
        let first = points.next()?;
        let mut bounds = Bounds {
            x_min: first.x,
            x_max: first.x,
            y_min: first.y,
            y_max: first.y,
        };
        for point in points {
            bounds.x_min = bounds.x_min.min(point.x);
            bounds.x_max = bounds.x_max.max(point.x);
            bounds.y_min = bounds.y_min.min(point.y);
            bounds.y_max = bounds.y_max.max(point.y);
        }
        widen(&mut bounds.x_min, &mut bounds.x_max);
        widen(&mut bounds.y_min, &mut bounds.y_max);
        Some(bounds)
    }
}

fn widen(min: &mut f64, max: &mut f64) {
    let span = *max - *min;
    let pad = if span > 0.0 { span * 0.05 } else { 0.5 };
    *min -= pad;
    *max += pad;
}

/// Output backend for figures.
pub trait Renderer {
    type Output;

    fn render(&mut self, figure: &Figure) -> Result<Self::Output>;
}

/// Raster size and marker size of rendered figures.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FigureSettings {
    pub width: u32,
    pub height: u32,
    pub marker_radius: u32,
}

impl Default for FigureSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            marker_radius: 4,
        }
    }
}

/// Assign each distinct learner a colour by its position in the sorted id
/// list, normalised against the last position so the ids span the whole
/// wheel. A lone id sits at hue 0.
pub fn learner_colors<'a, I>(ids: I) -> BTreeMap<LearnerId, Color>
where
    I: IntoIterator<Item = &'a LearnerId>,
{
    let mut unique: Vec<&LearnerId> = ids.into_iter().collect();
    unique.sort();
    unique.dedup();

    let last = unique.len().saturating_sub(1);
    unique
        .into_iter()
        .enumerate()
        .map(|(position, id)| {
            let hue = if last == 0 {
                0.0
            } else {
                position as f32 / last as f32
            };
            (id.clone(), Color::from_hue(hue))
        })
        .collect()
}

#[derive(Clone, Debug)]
pub struct TradeoffPlotter {
    title: String,
    x_label: String,
    y_label: String,
}

impl Default for TradeoffPlotter {
    fn default() -> Self {
        Self {
            title: "Accuracy vs. labelling cost".to_string(),
            x_label: "relative number of label acquisitions".to_string(),
            y_label: "classifications correct (%)".to_string(),
        }
    }
}

impl TradeoffPlotter {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn figure(&self, clusters: &BTreeMap<LearnerId, Vec<TradeoffPoint>>) -> Figure {
        let colors = learner_colors(clusters.keys());
        let series = clusters
            .iter()
            .map(|(learner, points)| Series {
                learner: learner.clone(),
                color: colors[learner],
                points: points.clone(),
            })
            .collect();

        Figure {
            title: self.title.clone(),
            x_label: self.x_label.clone(),
            y_label: self.y_label.clone(),
            series,
        }
    }

    pub fn plot<R: Renderer + ?Sized>(
        &self,
        clusters: &BTreeMap<LearnerId, Vec<TradeoffPoint>>,
        renderer: &mut R,
    ) -> Result<R::Output> {
        let figure = self.figure(clusters);
        debug!(
            series = figure.series.len(),
            points = figure.series.iter().map(|s| s.points.len()).sum::<usize>(),
            "rendering tradeoff figure"
        );
        renderer.render(&figure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        figures: Vec<Figure>,
    }

    impl Renderer for Recorder {
        type Output = usize;

        fn render(&mut self, figure: &Figure) -> Result<usize> {
            self.figures.push(figure.clone());
            Ok(self.figures.len())
        }
    }

    fn clusters(ids: &[&str]) -> BTreeMap<LearnerId, Vec<TradeoffPoint>> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| {
                (
                    LearnerId::new(*id),
                    vec![
                        TradeoffPoint { x: 0.1 * i as f64, y: 50.0 },
                        TradeoffPoint { x: 0.1 * i as f64 + 0.05, y: 52.0 },
                    ],
                )
            })
            .collect()
    }

    #[test]
    fn one_series_per_learner_without_averaging() {
        let mut recorder = Recorder::default();
        TradeoffPlotter::default()
            .plot(&clusters(&["0", "1", "2"]), &mut recorder)
            .unwrap();
        let figure = &recorder.figures[0];
        assert_eq!(figure.series.len(), 3);
        assert!(figure.series.iter().all(|series| series.points.len() == 2));
    }

    #[test]
    fn colors_are_deterministic_across_calls() {
        let plotter = TradeoffPlotter::default();
        let data = clusters(&["3", "1", "7", "12"]);
        let mut recorder = Recorder::default();
        plotter.plot(&data, &mut recorder).unwrap();
        plotter.plot(&data, &mut recorder).unwrap();

        let colors = |figure: &Figure| -> Vec<(String, Color)> {
            figure
                .series
                .iter()
                .map(|series| (series.learner.to_string(), series.color))
                .collect()
        };
        assert_eq!(colors(&recorder.figures[0]), colors(&recorder.figures[1]));
    }

    #[test]
    fn colors_follow_sorted_position_on_the_wheel() {
        let ids = [
            LearnerId::new("2"),
            LearnerId::new("0"),
            LearnerId::new("2"),
            LearnerId::new("1"),
        ];
        let colors = learner_colors(ids.iter());
        assert_eq!(colors.len(), 3);
        assert_eq!(colors[&LearnerId::new("0")], Color::from_hue(0.0));
        assert_eq!(colors[&LearnerId::new("1")], Color::from_hue(0.5));
        assert_eq!(colors[&LearnerId::new("2")], Color::from_hue(1.0));
    }

    #[test]
    fn last_id_is_normalised_to_the_end_of_the_wheel() {
        let ids: Vec<_> = ["0", "1", "2", "3"].into_iter().map(LearnerId::new).collect();
        let colors = learner_colors(ids.iter());
        assert_eq!(colors[&LearnerId::new("3")], Color { r: 1.0, g: 0.0, b: 0.0 });
        assert_eq!(colors[&LearnerId::new("1")], Color::from_hue(1.0 / 3.0));
        assert_eq!(colors[&LearnerId::new("2")], Color::from_hue(2.0 / 3.0));
    }

    #[test]
    fn single_learner_sits_at_hue_zero() {
        let ids = [LearnerId::new("7")];
        let colors = learner_colors(ids.iter());
        assert_eq!(colors[&LearnerId::new("7")], Color::from_hue(0.0));
    }

    #[test]
    fn hex_form_rounds_channels() {
        assert_eq!(Color::from_hue(0.0).to_hex(), "#ff0000");
        assert_eq!(Color::from_hue(0.5).to_hex(), "#00ffff");
    }

    #[test]
    fn hue_wheel_wraps() {
        assert_eq!(Color::from_hue(0.0), Color { r: 1.0, g: 0.0, b: 0.0 });
        assert_eq!(Color::from_hue(1.0), Color::from_hue(0.0));
        let cyan = Color::from_hue(0.5);
        assert_eq!((cyan.r, cyan.g, cyan.b), (0.0, 1.0, 1.0));
    }

    #[test]
    fn bounds_widen_degenerate_ranges() {
        let figure = TradeoffPlotter::default().figure(&BTreeMap::from([(
            LearnerId::new("0"),
            vec![TradeoffPoint { x: 0.2, y: 60.0 }],
        )]));
        let bounds = figure.bounds().unwrap();
        assert!(bounds.x_min < 0.2 && bounds.x_max > 0.2);
        assert!(bounds.y_min < 60.0 && bounds.y_max > 60.0);
    }
}
