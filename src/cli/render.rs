//! Plain text and JSON output of the primitives. Text output is tab separated so it can be piped
//! into other tools.

use std::io::Write;

use ansi_term::{Colour, Style};
use anyhow::Result;
use serde::Serialize;

use crate::{
    layout::{
        period_bar::BarColumn,
        primitives::{ColourRef, Histogram, Labelled, TimelineSegment},
        timeline::TimelineRow,
    },
    log::entry::SessionEnd,
    utils::{percentage::Percentage, time::date_to_label},
};

use super::views::{DayView, PeakChart, PeakView, StatusView};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const CHART_WIDTH: f64 = 40.;

pub fn json(out: &mut impl Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

pub fn timeline_rows(out: &mut impl Write, rows: &[TimelineRow]) -> Result<()> {
    for row in rows {
        writeln!(out, "{}", date_to_label(row.date))?;
        segments(out, &row.segments)?;
    }
    Ok(())
}

pub fn segments(out: &mut impl Write, segments: &[TimelineSegment]) -> Result<()> {
    for segment in segments {
        writeln!(
            out,
            "\t{}\twidth {}\tmargin {}",
            segment.colour.as_str(),
            segment.width,
            segment.margin
        )?;
    }
    Ok(())
}

/// Legend style: one `name (share)` per group.
pub fn labelled_segments(
    out: &mut impl Write,
    segments: &[Labelled<TimelineSegment>],
) -> Result<()> {
    for Labelled { label, segment } in segments {
        writeln!(out, "\t{label} ({})\t{}", segment.width, segment.colour.as_str())?;
    }
    Ok(())
}

pub fn day(out: &mut impl Write, view: &DayView) -> Result<()> {
    if view.entries.is_empty() {
        writeln!(out, "Nothing recorded on {}", date_to_label(view.row.date))?;
        return Ok(());
    }
    timeline_rows(out, std::slice::from_ref(&view.row))?;
    writeln!(out)?;
    for entry in &view.entries {
        let start = entry.start().with_timezone(&chrono::Local).format("%H:%M");
        let (end, duration) = match entry.end() {
            SessionEnd::Open => ("-".to_string(), "-".to_string()),
            SessionEnd::Closed(end) => (
                end.with_timezone(&chrono::Local).format("%H:%M").to_string(),
                format!("{:.2} h", entry.duration().unwrap_or_default()),
            ),
        };
        writeln!(
            out,
            "{start}\t{end}\t{}\t{}\t{duration}\t{}",
            entry.sector, entry.project, entry.note
        )?;
    }
    Ok(())
}

pub fn bar_columns(out: &mut impl Write, columns: &[BarColumn]) -> Result<()> {
    for column in columns {
        writeln!(out, "{}", date_to_label(column.date))?;
        for Labelled { label, segment } in &column.segments {
            writeln!(
                out,
                "\t{label}\t{}\theight {}\tposition {}",
                segment.colour.as_str(),
                segment.height,
                segment.position
            )?;
        }
    }
    Ok(())
}

pub fn peaks(out: &mut impl Write, view: &PeakView) -> Result<()> {
    let styles = BucketStyles {
        plain: style_of(&view.colour),
        highlight: style_of(&view.accent).bold(),
    };
    match &view.chart {
        PeakChart::Hours(histogram) => {
            histogram_rows(out, histogram, &styles, |i| format!("{i:02}"))
        }
        PeakChart::Days(histogram) => {
            histogram_rows(out, histogram, &styles, |i| WEEKDAYS[i].to_string())
        }
    }
}

struct BucketStyles {
    plain: Style,
    highlight: Style,
}

/// Terminal style for a `#rgb` or `#rrggbb` colour. Anything else prints unstyled.
fn style_of(colour: &ColourRef) -> Style {
    let Some(hex) = colour.as_str().strip_prefix('#') else {
        return Style::new();
    };
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Style::new();
    }
    let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();
    let rgb = match hex.len() {
        3 => hex
            .chars()
            .map(|c| channel(&c.to_string()).map(|v| v * 17))
            .collect::<Option<Vec<_>>>(),
        6 => (0..3)
            .map(|i| channel(&hex[i * 2..i * 2 + 2]))
            .collect::<Option<Vec<_>>>(),
        _ => None,
    };
    match rgb.as_deref() {
        Some(&[r, g, b]) => Colour::RGB(r, g, b).normal(),
        _ => Style::new(),
    }
}

fn histogram_rows<const N: usize>(
    out: &mut impl Write,
    histogram: &Histogram<N>,
    styles: &BucketStyles,
    label: impl Fn(usize) -> String,
) -> Result<()> {
    for (index, value) in histogram.values.iter().enumerate() {
        let style = if histogram.highlight == Some(index) {
            styles.highlight
        } else {
            styles.plain
        };
        writeln!(
            out,
            "{}\t{}\t{}",
            label(index),
            style.paint(bar(*value)),
            value
        )?;
    }
    Ok(())
}

fn bar(value: Percentage) -> String {
    "#".repeat((*value / 100. * CHART_WIDTH).round() as usize)
}

pub fn status(out: &mut impl Write, status: &StatusView) -> Result<()> {
    if status.in_progress {
        writeln!(out, "In progress\t{}", status.elapsed)?;
    } else {
        writeln!(out, "Idle\t{}", status.elapsed)?;
    }
    Ok(())
}
