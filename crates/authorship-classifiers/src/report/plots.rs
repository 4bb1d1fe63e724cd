use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use itertools_num::linspace;
use log::info;
use plotly::common::{DashType, Line, Mode, TextPosition};
use plotly::layout::{Axis, Layout};
use plotly::{Bar, Plot, Scatter};
use serde::{Deserialize, Serialize};

use crate::metrics::{RocCurve, Scores, METRICS};

/// Evaluation results of one trained classifier, as plotted and as written
/// to `scores.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedModel {
    /// `<classifier>_<vectorizer>`.
    pub name: String,
    pub scores: Scores,
    pub roc: RocCurve,
    /// Per-batch training losses; `None` for classical models.
    #[serde(default)]
    pub losses: Option<Vec<f32>>,
}

/// One bar per model for a single metric, labelled with the value to three
/// decimals.
pub fn plot_bars(models: &[EvaluatedModel], metric: &str) -> Result<Plot> {
    let names: Vec<String> = models.iter().map(|m| m.name.clone()).collect();
    let values = models
        .iter()
        .map(|m| {
            m.scores
                .get(metric)
                .with_context(|| format!("Unknown metric: {}", metric))
        })
        .collect::<Result<Vec<f64>>>()?;
    let labels: Vec<String> = values.iter().map(|v| format!("{:.3}", v)).collect();

    let bars = Bar::new(names, values)
        .text_array(labels)
        .text_position(TextPosition::Outside)
        .name(metric);

    let mut plot = Plot::new();
    plot.add_trace(bars);
    plot.set_layout(
        Layout::new()
            .title(format!("{} by classifier", metric).as_str())
            .x_axis(Axis::new().title("Classifier"))
            .y_axis(Axis::new().title(metric)),
    );
    Ok(plot)
}

/// Training losses of every gradient-trained model on a shared `[0, 1]` axis,
/// so runs with different batch counts can be compared.
pub fn plot_loss_graphs(models: &[EvaluatedModel]) -> Plot {
    let mut plot = Plot::new();
    for model in models {
        let Some(losses) = model.losses.as_ref().filter(|l| !l.is_empty()) else {
            continue;
        };
        let x: Vec<f64> = linspace(0.0, 1.0, losses.len()).collect();
        plot.add_trace(
            Scatter::new(x, losses.clone())
                .mode(Mode::Lines)
                .name(&model.name),
        );
    }
    plot.set_layout(
        Layout::new()
            .title("Training loss")
            .x_axis(Axis::new().title("Training progress"))
            .y_axis(Axis::new().title("Loss")),
    );
    plot
}

pub fn plot_rocs(models: &[EvaluatedModel]) -> Plot {
    let mut plot = Plot::new();
    for model in models {
        plot.add_trace(
            Scatter::new(model.roc.fpr.clone(), model.roc.tpr.clone())
                .mode(Mode::Lines)
                .name(format!("{} (AUC {:.3})", model.name, model.scores.auc).as_str()),
        );
    }
    plot.add_trace(
        Scatter::new(vec![0.0, 1.0], vec![0.0, 1.0])
            .mode(Mode::Lines)
            .name("Chance")
            .line(Line::new().color("grey").dash(DashType::Dash)),
    );
    plot.set_layout(
        Layout::new()
            .title("ROC curves")
            .x_axis(Axis::new().title("False positive rate"))
            .y_axis(Axis::new().title("True positive rate")),
    );
    plot
}

fn write_plot(plot: &Plot, path: &Path) -> Result<()> {
    fs::write(path, plot.to_html())
        .with_context(|| format!("Failed to write plot to {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Write `<metric>.html` for every metric, `train_loss.html` and
/// `roc_curves.html` into `out_dir`.
pub fn plot_all(models: &[EvaluatedModel], out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    for metric in METRICS {
        let plot = plot_bars(models, metric)?;
        write_plot(&plot, &out_dir.join(format!("{}.html", metric)))?;
    }
    write_plot(&plot_loss_graphs(models), &out_dir.join("train_loss.html"))?;
    write_plot(&plot_rocs(models), &out_dir.join("roc_curves.html"))?;
    Ok(())
}
