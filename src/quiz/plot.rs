//! The Q10 hazard chart and the places it can be sent.

use crate::error::{Result, ResultExt as _, StatsError};
use crate::quiz::hazard::NelsonAalen;
use crate::quiz::queries::HazardSample;
use crate::theme;
use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotBounds, VLine};
use log::info;
use polars::prelude::*;
use std::path::PathBuf;

pub const AGGREGATE_LABEL: &str = "All Badgers";
pub const X_LABEL: &str = "Runs";
pub const Y_LABEL: &str = "Hazard rate";

#[derive(Debug, Clone, PartialEq)]
pub struct HazardCurve {
    pub label: String,
    /// `[runs, hazard]` pairs in ascending runs
    pub points: Vec<[f64; 2]>,
}

impl HazardCurve {
    pub fn fit(label: &str, runs: &[f64], out: &[bool], bandwidth: f64) -> Result<Self> {
        let naf = NelsonAalen::fit(label, runs, out)?;
        Ok(Self {
            label: naf.label().to_owned(),
            points: naf.smoothed_hazard(bandwidth)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HazardChart {
    pub curves: Vec<HazardCurve>,
    pub x_range: [f64; 2],
    pub y_range: [f64; 2],
    pub reference_runs: Option<f64>,
}

impl Default for HazardChart {
    fn default() -> Self {
        Self {
            curves: Vec::new(),
            x_range: [0.0, 75.0],
            y_range: [0.0, 0.15],
            reference_runs: Some(50.0),
        }
    }
}

impl HazardChart {
    /// The all-players curve, overlaid with `player`'s own when given.
    pub fn build(sample: &HazardSample, player: Option<&str>, bandwidth: f64) -> Result<Self> {
        let mut curves = vec![HazardCurve::fit(
            AGGREGATE_LABEL,
            &sample.runs,
            &sample.out,
            bandwidth,
        )?];
        if let Some(player) = player {
            let (runs, out) = sample.for_player(player);
            curves.push(HazardCurve::fit(player, &runs, &out, bandwidth)?);
        }
        Ok(Self {
            curves,
            ..Self::default()
        })
    }

    pub fn labels(&self) -> Vec<&str> {
        self.curves.iter().map(|c| c.label.as_str()).collect()
    }

    /// Long-format table of every plotted point: label, runs, hazard.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let points = self.curves.iter().flat_map(|c| {
            c.points
                .iter()
                .map(move |[runs, hazard]| (c.label.as_str(), *runs, *hazard))
        });
        let (mut labels, mut runs, mut hazard) = (Vec::new(), Vec::new(), Vec::new());
        for (label, x, y) in points {
            labels.push(label);
            runs.push(x);
            hazard.push(y);
        }
        Ok(df!(
            "label" => labels,
            "runs" => runs,
            "hazard" => hazard
        )?)
    }
}

/// Somewhere a finished chart goes.
pub trait ChartSink {
    fn show(&mut self, chart: &HazardChart) -> Result<()>;
}

/// Records charts instead of displaying them.
impl ChartSink for Vec<HazardChart> {
    fn show(&mut self, chart: &HazardChart) -> Result<()> {
        self.push(chart.clone());
        Ok(())
    }
}

/// Sends each chart to every sink in turn.
impl ChartSink for Vec<Box<dyn ChartSink>> {
    fn show(&mut self, chart: &HazardChart) -> Result<()> {
        for sink in self.iter_mut() {
            sink.show(chart)?;
        }
        Ok(())
    }
}

/// Writes the plotted points as CSV, overwriting on each chart.
pub struct CsvExport {
    pub path: PathBuf,
}

impl ChartSink for CsvExport {
    fn show(&mut self, chart: &HazardChart) -> Result<()> {
        let mut df = chart.to_frame()?;
        let file = std::fs::File::create(&self.path)
            .with_context(|| format!("Failed to create {}", self.path.display()))?;
        CsvWriter::new(file)
            .include_header(true)
            .finish(&mut df)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        info!("Wrote hazard curves to {}", self.path.display());
        Ok(())
    }
}

/// Opens a native window and blocks until it is closed.
#[derive(Default)]
pub struct PlotWindow;

impl ChartSink for PlotWindow {
    fn show(&mut self, chart: &HazardChart) -> Result<()> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([800.0, 560.0])
                .with_min_inner_size([400.0, 300.0]),
            ..Default::default()
        };
        let app = HazardPlotApp {
            chart: chart.clone(),
        };
        eframe::run_native(
            "Badger hazard",
            options,
            Box::new(move |cc| {
                theme::apply_chart_theme(&cc.egui_ctx);
                Ok(Box::new(app))
            }),
        )
        .map_err(|e| StatsError::Other(format!("Plot window failed: {e}")))
    }
}

struct HazardPlotApp {
    chart: HazardChart,
}

impl eframe::App for HazardPlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            theme::chart_frame(ui).show(ui, |ui| render_chart(ui, &self.chart));
        });
    }
}

fn render_chart(ui: &mut egui::Ui, chart: &HazardChart) {
    let [x_min, x_max] = chart.x_range;
    let [y_min, y_max] = chart.y_range;

    Plot::new("hazard_plot")
        .legend(Legend::default())
        .x_axis_label(X_LABEL)
        .y_axis_label(Y_LABEL)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max([x_min, y_min], [x_max, y_max]));
            for (i, curve) in chart.curves.iter().enumerate() {
                plot_ui.line(
                    Line::new(curve.label.as_str(), curve.points.clone())
                        .color(theme::curve_color(i))
                        .width(theme::CURVE_WIDTH),
                );
            }
            if let Some(x) = chart.reference_runs {
                plot_ui.vline(VLine::new("", x).color(theme::REFERENCE_COLOR));
            }
        });
}
