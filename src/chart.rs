//! Rendering dashboard views to image files

use crate::dashboard::{
    RatingDifferential, TurnsVsRating, Views, WinnerFrequency, RATING_DIFF_RANGE,
};
use crate::error::{ExplorerError, Result};
use crate::model::{TimeControl, Winner};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

const CHART_SIZE: (u32, u32) = (1280, 720);

/// Output image format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Svg,
    Png,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
        }
    }

    pub fn from_str(s: &str) -> Option<ImageFormat> {
        match s.to_lowercase().as_str() {
            "svg" => Some(ImageFormat::Svg),
            "png" => Some(ImageFormat::Png),
            _ => None,
        }
    }
}

fn chart_err<E: std::fmt::Display>(e: E) -> ExplorerError {
    ExplorerError::Chart(e.to_string())
}

fn time_control_color(tc: TimeControl) -> RGBColor {
    match tc {
        TimeControl::Bullet => RGBColor(239, 85, 59),
        TimeControl::Blitz => RGBColor(99, 110, 250),
        TimeControl::Rapid => RGBColor(0, 204, 150),
        TimeControl::Classic => RGBColor(171, 99, 250),
    }
}

/// Render every view into `out_dir`, returning the written paths
pub fn render_views(views: &Views, out_dir: &Path, format: ImageFormat) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)?;

    let targets = [
        ("turns_vs_rating", Chart::TurnsVsRating(&views.turns_vs_rating)),
        ("rating_difference", Chart::RatingDifferential(&views.rating_differential)),
        ("winner_frequency", Chart::WinnerFrequency(&views.winner_frequency)),
    ];

    let mut written = Vec::with_capacity(targets.len());
    for (name, chart) in targets {
        let path = out_dir.join(format!("{}.{}", name, format.extension()));
        match format {
            ImageFormat::Svg => {
                let root = SVGBackend::new(&path, CHART_SIZE).into_drawing_area();
                chart.draw(&root)?;
                root.present().map_err(chart_err)?;
            }
            ImageFormat::Png => {
                let root = BitMapBackend::new(&path, CHART_SIZE).into_drawing_area();
                chart.draw(&root)?;
                root.present().map_err(chart_err)?;
            }
        }
        log::info!("Chart saved to {}", path.display());
        written.push(path);
    }

    Ok(written)
}

enum Chart<'a> {
    TurnsVsRating(&'a TurnsVsRating),
    RatingDifferential(&'a RatingDifferential),
    WinnerFrequency(&'a WinnerFrequency),
}

impl Chart<'_> {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        root.fill(&WHITE).map_err(chart_err)?;
        match self {
            Chart::TurnsVsRating(view) => draw_scatter(root, view),
            Chart::RatingDifferential(view) => draw_histogram(root, view),
            Chart::WinnerFrequency(view) => draw_winners(root, view),
        }
    }
}

fn draw_scatter<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    view: &TurnsVsRating,
) -> Result<()> {
    let (min_rating, max_rating) = view
        .points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.avg_rating), hi.max(p.avg_rating))
        });
    let (min_rating, max_rating) = if min_rating <= max_rating {
        (min_rating - 50.0, max_rating + 50.0)
    } else {
        (0.0, 3000.0)
    };
    let max_turns = view.points.iter().map(|p| p.turns).max().unwrap_or(0) + 10;

    let mut chart = ChartBuilder::on(root)
        .caption("Chess Game Total Turns vs. Average Player Rating", ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(min_rating..max_rating, 0u32..max_turns)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc("Average Player Rating")
        .y_desc("Total Turns")
        .draw()
        .map_err(chart_err)?;

    for tc in TimeControl::ALL {
        let color = time_control_color(tc);
        let points = view.points.iter().filter(|p| p.time_control == tc);
        chart
            .draw_series(points.map(|p| Circle::new((p.avg_rating, p.turns), 2, color.mix(0.75).filled())))
            .map_err(chart_err)?
            .label(tc.as_str())
            .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(chart_err)?;

    Ok(())
}

fn draw_histogram<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    view: &RatingDifferential,
) -> Result<()> {
    let hist = &view.histogram;
    let caption = if view.rated_only {
        "Rating Differential Between Players (rated games)"
    } else {
        "Rating Differential Between Players"
    };
    let (axis_lo, axis_hi) = RATING_DIFF_RANGE;
    let max_count = hist.max_count() as u32 + 1;

    let mut chart = ChartBuilder::on(root)
        .caption(caption, ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(axis_lo..axis_hi, 0u32..max_count)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Rating difference (white - black)")
        .y_desc("Count")
        .draw()
        .map_err(chart_err)?;

    // Bins are clipped to the visible axis
    let bars = hist.counts.iter().enumerate().filter_map(|(idx, &count)| {
        let (lo, hi) = hist.bin_edges(idx);
        let (lo, hi) = (lo.max(axis_lo), hi.min(axis_hi));
        (count > 0 && lo < hi)
            .then(|| Rectangle::new([(lo, 0), (hi, count as u32)], BLUE.mix(0.8).filled()))
    });
    chart.draw_series(bars).map_err(chart_err)?;

    Ok(())
}

fn draw_winners<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    view: &WinnerFrequency,
) -> Result<()> {
    let max_count = view.counts.iter().map(|(_, c)| *c).max().unwrap_or(0) as u32 + 1;

    let mut chart = ChartBuilder::on(root)
        .caption("Winning Color", ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..3u32).into_segmented(), 0u32..max_count)
        .map_err(chart_err)?;

    let label = |v: &SegmentValue<u32>| match v {
        SegmentValue::CenterOf(i) => Winner::ALL
            .get(*i as usize)
            .map(|w| w.to_string())
            .unwrap_or_default(),
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Winner")
        .y_desc("Count")
        .x_label_formatter(&label)
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(BLUE.mix(0.8).filled())
                .margin(20)
                .data(
                    view.counts
                        .iter()
                        .enumerate()
                        .map(|(i, (_, count))| (i as u32, *count as u32)),
                ),
        )
        .map_err(chart_err)?;

    Ok(())
}
