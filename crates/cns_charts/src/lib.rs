//! Rendering of already-computed sentiment data: a label-distribution pie
//! chart, a word-frequency cloud and a mood index line chart. No sentiment
//! is ever recomputed here.

use anyhow::{anyhow, Context, Result};
use charts::{Chart, LineSeriesView, MarkerType, ScaleLinear};
use cns_sentiment::SentimentLabel;
use itertools::Itertools;
use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt::Write;
use std::fs;
use std::path::Path;

/// Pastel palette for the pie slices, assigned per slice in wedge order.
const WEDGE_COLORS: [&str; 3] = ["#77DD77", "#AEC6CF", "#FFB347"];

/// matplotlib's tab10 palette, cycled over the word cloud entries.
const WORD_COLORS: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Filler words that would otherwise dominate any news word cloud.
const STOPWORDS: [&str; 22] = [
    "the", "and", "for", "with", "that", "this", "from", "are", "was", "has", "have", "its",
    "but", "not", "will", "after", "amid", "over", "into", "about", "says", "than",
];

/// One slice of the sentiment distribution. Labels absent from the batch
/// produce no wedge.
#[derive(Debug, Clone, PartialEq)]
pub struct Wedge {
    pub label: SentimentLabel,
    pub count: usize,
    pub percent: f64,
}

/// Counts label occurrences into wedges, iterating labels in the fixed
/// Positive/Neutral/Negative order so the output is deterministic.
pub fn sentiment_distribution(labels: &[SentimentLabel]) -> Vec<Wedge> {
    let total = labels.len();
    SentimentLabel::ALL
        .iter()
        .filter_map(|&label| {
            let count = labels.iter().filter(|&&it| it == label).count();
            if count == 0 {
                return None;
            }
            Some(Wedge {
                label,
                count,
                percent: count as f64 * 100.0 / total as f64,
            })
        })
        .collect()
}

/// Renders the wedges as an SVG pie chart at `path`.
pub fn render_distribution_chart(wedges: &[Wedge], path: &Path) -> Result<()> {
    let (width, height) = (700.0, 740.0);
    let (cx, cy, radius) = (350.0, 390.0, 280.0);

    let mut svg = String::new();
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = width,
        h = height,
    )?;
    writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
    writeln!(
        svg,
        r#"<text x="{}" y="40" text-anchor="middle" font-family="sans-serif" font-size="26" font-weight="bold">Sentiment Distribution</text>"#,
        cx,
    )?;

    let total: usize = wedges.iter().map(|it| it.count).sum();
    let point = |angle: f64| (cx + radius * angle.cos(), cy + radius * angle.sin());

    // 12 o'clock start, like the original chart's startangle
    let mut start = -FRAC_PI_2;
    for (index, wedge) in wedges.iter().enumerate() {
        let fraction = wedge.count as f64 / total as f64;
        let end = start + fraction * TAU;
        let color = WEDGE_COLORS[index % WEDGE_COLORS.len()];

        if wedges.len() == 1 {
            // a single wedge is a full circle, the arc path degenerates
            writeln!(
                svg,
                r#"<circle cx="{}" cy="{}" r="{}" fill="{}" stroke="white" stroke-width="2"/>"#,
                cx, cy, radius, color,
            )?;
        } else {
            let (x0, y0) = point(start);
            let (x1, y1) = point(end);
            let large_arc = if fraction > 0.5 { 1 } else { 0 };
            writeln!(
                svg,
                r#"<path d="M {cx} {cy} L {x0:.3} {y0:.3} A {r} {r} 0 {large} 1 {x1:.3} {y1:.3} Z" fill="{color}" stroke="white" stroke-width="2"/>"#,
                cx = cx,
                cy = cy,
                x0 = x0,
                y0 = y0,
                r = radius,
                large = large_arc,
                x1 = x1,
                y1 = y1,
                color = color,
            )?;
        }

        let mid = start + fraction * TAU / 2.0;
        let (tx, ty) = (cx + radius * 0.6 * mid.cos(), cy + radius * 0.6 * mid.sin());
        writeln!(
            svg,
            r#"<text x="{:.3}" y="{:.3}" text-anchor="middle" font-family="sans-serif" font-size="18">{} {:.1}%</text>"#,
            tx, ty, wedge.label, wedge.percent,
        )?;

        start = end;
    }

    writeln!(svg, "</svg>")?;

    fs::write(path, svg)
        .with_context(|| format!("Failed to write the distribution chart to {}", path.display()))
}

/// Word frequencies over the whitespace-joined batch: lowercased
/// alphanumeric tokens, short and stop words dropped, the `max_words` most
/// frequent kept (ties broken alphabetically for deterministic output).
pub fn word_frequencies(texts: &[String], max_words: usize) -> Vec<(String, usize)> {
    let combined = texts.join(" ");

    let mut counts: HashMap<String, usize> = HashMap::new();
    for token in combined.split(|c: char| !c.is_alphanumeric()) {
        let word = token.to_lowercase();
        if word.chars().count() <= 2 || STOPWORDS.contains(&word.as_str()) {
            continue;
        }
        *counts.entry(word).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .take(max_words)
        .collect()
}

/// Renders a frequency-scaled word cloud as SVG at `path`.
/// An empty frequency list yields a valid blank image rather than an error.
pub fn render_wordcloud(frequencies: &[(String, usize)], path: &Path) -> Result<()> {
    let (width, height) = (800.0, 400.0);

    let mut svg = String::new();
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = width,
        h = height,
    )?;
    writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#)?;

    let max_count = frequencies.iter().map(|(_, count)| *count).max();
    if let Some(max_count) = max_count {
        let mut x = 10.0;
        let mut y = 50.0;
        for (index, (word, count)) in frequencies.iter().enumerate() {
            let weight = *count as f64 / max_count as f64;
            let font_size = 12.0 + 34.0 * weight;
            let estimated_width = word.chars().count() as f64 * font_size * 0.62 + 14.0;

            if x + estimated_width > width - 10.0 {
                x = 10.0;
                y += 50.0;
            }
            if y > height - 10.0 {
                log::debug!("Word cloud ran out of canvas after {} words", index);
                break;
            }

            // tokens are alphanumeric, no xml escaping needed
            writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="{:.1}" fill="{}">{}</text>"#,
                x,
                y,
                font_size,
                WORD_COLORS[index % WORD_COLORS.len()],
                word,
            )?;

            x += estimated_width;
        }
    }

    writeln!(svg, "</svg>")?;

    fs::write(path, svg)
        .with_context(|| format!("Failed to write the word cloud to {}", path.display()))
}

/// Renders the mood index as a two-point line chart over a `[-1, 1]` axis,
/// mirroring the original tool's `[0, score]` line display.
pub fn render_mood_chart(score: f64, path: &Path) -> Result<()> {
    let width = 800;
    let height = 500;
    let (top, right, bottom, left) = (90, 40, 60, 70);

    let x = ScaleLinear::new()
        .set_domain(vec![0.0, 1.0])
        .set_range(vec![0, width - left - right]);

    let y = ScaleLinear::new()
        .set_domain(vec![-1.0, 1.0])
        .set_range(vec![height - top - bottom, 0]);

    let data = vec![(0.0, 0.0), (1.0, score as f32)];

    let view = LineSeriesView::new()
        .set_x_scale(&x)
        .set_y_scale(&y)
        .set_marker_type(MarkerType::Circle)
        .load_data(&data)
        .map_err(|err| anyhow!("{}", err))?;

    Chart::new()
        .set_width(width)
        .set_height(height)
        .set_margins(top, right, bottom, left)
        .add_title(format!("Crypto Market Mood Index ({:.3})", score))
        .add_view(&view)
        .add_axis_bottom(&x)
        .add_axis_left(&y)
        .add_left_axis_label("Mood index")
        .save(path)
        .map_err(|err| anyhow!("{}", err))?;

    Ok(())
}
