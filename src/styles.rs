//! Cell formatting and merge-state helpers for the sheet writer.

use crate::config::RowStyle;
use crate::utils::{RangeBounds, parse_range_bounds};
use serde::Serialize;
use umya_spreadsheet::structs::EnumTrait;
use umya_spreadsheet::{Fill, Font, PatternValues, Style, Worksheet};

/// The parts of a cell style the writer controls, read back from a workbook.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RowStyleSnapshot {
    pub font_name: Option<String>,
    pub font_size: Option<f64>,
    pub pattern_type: Option<String>,
    pub foreground_color: Option<String>,
}

impl RowStyleSnapshot {
    /// Whether the observed style carries the configured font and fill.
    pub fn matches(&self, row_style: &RowStyle) -> bool {
        let expected_argb = argb(&row_style.fill_color);
        self.font_name.as_deref() == Some(row_style.font_name.as_str())
            && self.font_size == Some(row_style.font_size)
            && self
                .pattern_type
                .as_deref()
                .is_some_and(|p| p.eq_ignore_ascii_case("solid"))
            && self
                .foreground_color
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(&expected_argb))
    }
}

pub fn snapshot_from_style(style: &Style) -> RowStyleSnapshot {
    let (font_name, font_size) = style.get_font().map(font_parts).unwrap_or_default();
    let (pattern_type, foreground_color) = style.get_fill().map(fill_parts).unwrap_or_default();
    RowStyleSnapshot {
        font_name,
        font_size,
        pattern_type,
        foreground_color,
    }
}

fn font_parts(font: &Font) -> (Option<String>, Option<f64>) {
    (
        Some(font.get_name().to_string()).filter(|s| !s.is_empty()),
        Some(*font.get_size()).filter(|s| *s > 0.0),
    )
}

fn fill_parts(fill: &Fill) -> (Option<String>, Option<String>) {
    let Some(pattern) = fill.get_pattern_fill() else {
        return (None, None);
    };
    let kind = pattern.get_pattern_type().get_value_string();
    let fg = pattern
        .get_foreground_color()
        .map(|c| c.get_argb().to_string())
        .filter(|s| !s.is_empty());
    let kind = if kind.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(kind.to_string())
    };
    (kind, fg)
}

/// Stamp the fixed font and solid fill onto a cell style.
pub fn apply_row_style(style: &mut Style, row_style: &RowStyle) {
    let font = style.get_font_mut();
    font.set_name(row_style.font_name.clone());
    font.set_size(row_style.font_size);

    let color = argb(&row_style.fill_color);
    let pattern = style.get_fill_mut().get_pattern_fill_mut();
    pattern.set_pattern_type(PatternValues::Solid);
    pattern.get_foreground_color_mut().set_argb(color.clone());
    pattern.get_background_color_mut().set_argb(color);
}

/// `RRGGBB` gains an opaque alpha channel; anything else is passed through.
pub fn argb(hex: &str) -> String {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() == 6 {
        format!("FF{}", hex.to_ascii_uppercase())
    } else {
        hex.to_ascii_uppercase()
    }
}

/// Merge region covering a cell, as written in the sheet (e.g. `A15:C15`).
pub fn merge_region_at(sheet: &Worksheet, col: u32, row: u32) -> Option<String> {
    sheet
        .get_merge_cells()
        .iter()
        .map(|range| range.get_range())
        .find(|range| region_bounds(range).is_some_and(|b| b.contains(col, row)))
}

/// Whether a cell belongs to any merge region. Never fails.
pub fn is_merged(sheet: &Worksheet, col: u32, row: u32) -> bool {
    merge_region_at(sheet, col, row).is_some()
}

/// Drop every merge region touching `row`, returning the removed ranges.
pub fn unmerge_row(sheet: &mut Worksheet, row: u32) -> Vec<String> {
    let removed: Vec<String> = sheet
        .get_merge_cells()
        .iter()
        .map(|range| range.get_range())
        .filter(|range| region_bounds(range).is_some_and(|b| b.touches_row(row)))
        .collect();
    if !removed.is_empty() {
        sheet
            .get_merge_cells_mut()
            .retain(|range| !removed.contains(&range.get_range()));
    }
    removed
}

fn region_bounds(range: &str) -> Option<RangeBounds> {
    parse_range_bounds(range).ok()
}
