use crate::app::rendering::raster::{fill_rect, rect_outline};
use crate::app::{InfoPanel, LoopMetricsSnapshot, SceneWorld};

use super::font::{draw_text, text_width_px, GLYPH_ADVANCE, LINE_ADVANCE, TEXT_SCALE};

const OVERLAY_PADDING: i32 = 6 * TEXT_SCALE;
const OVERLAY_PANEL_INSET_X: i32 = 4 * TEXT_SCALE;
const OVERLAY_PANEL_INSET_Y: i32 = 3 * TEXT_SCALE;
const OVERLAY_TEXT_PRIMARY_COLOR: [u8; 4] = [244, 248, 252, 255];
const OVERLAY_TEXT_DIM_COLOR: [u8; 4] = [176, 198, 220, 255];
const OVERLAY_PANEL_BG_COLOR: [u8; 4] = [10, 12, 16, 255];
const OVERLAY_PANEL_BORDER_COLOR: [u8; 4] = [92, 106, 126, 255];
const INFO_TITLE_COLOR: [u8; 4] = [250, 214, 96, 255];
const INFO_PANEL_MAX_LINES: usize = 6;
const PERF_SECTION_LABEL: &str = "Perf";
const SCENE_SECTION_LABEL: &str = "Scene";

#[derive(Debug, Clone, Copy)]
pub(crate) struct OverlayData {
    pub metrics: LoopMetricsSnapshot,
    pub render_fps_cap: Option<u32>,
    pub slow_frame_delay_ms: u64,
}

/// Draws the debug HUD (when enabled) and the artwork info panel.
pub(crate) fn draw_overlay(
    frame: &mut [u8],
    width: u32,
    height: u32,
    world: &SceneWorld,
    data: Option<&OverlayData>,
) {
    if width == 0 || height == 0 {
        return;
    }

    if let Some(data) = data {
        let lines = build_hud_lines(data, world.hud_lines());
        draw_hud_panel(frame, width, height, &lines);
    }
    if let Some(panel) = world.info_panel() {
        draw_info_panel(frame, width, height, panel);
    }
}

fn build_hud_lines(data: &OverlayData, scene_lines: &[String]) -> Vec<String> {
    let mut lines = vec![
        PERF_SECTION_LABEL.to_string(),
        format_fps_line(
            data.metrics.fps,
            data.render_fps_cap,
            data.slow_frame_delay_ms,
        ),
        format!("TPS: {:.1}", data.metrics.tps),
        format!(
            "Frame: {:.2} ms (worst {:.1})",
            data.metrics.frame_time_ms, data.metrics.worst_frame_ms
        ),
        format!("Sim: {:.2} ms", data.metrics.sim_time_ms),
        format!("Clamped: {}", data.metrics.clamped_frames),
    ];
    if !scene_lines.is_empty() {
        lines.push(String::new());
        lines.push(SCENE_SECTION_LABEL.to_string());
        lines.extend(scene_lines.iter().cloned());
    }
    lines
}

fn hud_line_color(line: &str) -> [u8; 4] {
    if matches!(line, PERF_SECTION_LABEL | SCENE_SECTION_LABEL) {
        OVERLAY_TEXT_DIM_COLOR
    } else {
        OVERLAY_TEXT_PRIMARY_COLOR
    }
}

fn format_fps_line(current_fps: f32, cap: Option<u32>, slow_frame_delay_ms: u64) -> String {
    let cap_text = match cap {
        Some(value) => value.to_string(),
        None => "inf".to_string(),
    };
    format!(
        "[{:.0} / {}] dbg+{}ms",
        current_fps, cap_text, slow_frame_delay_ms
    )
}

fn draw_hud_panel(frame: &mut [u8], width: u32, height: u32, lines: &[String]) {
    let panel_width = lines
        .iter()
        .map(|line| text_width_px(line))
        .max()
        .unwrap_or(0)
        + OVERLAY_PANEL_INSET_X * 2;
    let panel_height = lines.len() as i32 * LINE_ADVANCE + OVERLAY_PANEL_INSET_Y * 2;
    let panel_left = OVERLAY_PADDING - OVERLAY_PANEL_INSET_X;
    let panel_top = OVERLAY_PADDING - OVERLAY_PANEL_INSET_Y;
    draw_panel(frame, width, height, panel_left, panel_top, panel_width, panel_height);

    let mut y = OVERLAY_PADDING;
    for line in lines {
        draw_text(frame, width, OVERLAY_PADDING, y, line, hud_line_color(line));
        y += LINE_ADVANCE;
    }
}

fn draw_info_panel(frame: &mut [u8], width: u32, height: u32, panel: &InfoPanel) {
    let text_width = width as i32 - (OVERLAY_PADDING + OVERLAY_PANEL_INSET_X) * 2;
    let max_chars = (text_width / GLYPH_ADVANCE).max(1) as usize;
    let mut body = wrap_words(&panel.description, max_chars);
    body.truncate(INFO_PANEL_MAX_LINES);

    let line_count = body.len() as i32 + 1;
    let panel_height = line_count * LINE_ADVANCE + OVERLAY_PANEL_INSET_Y * 2;
    let panel_left = OVERLAY_PADDING;
    let panel_top = height as i32 - OVERLAY_PADDING - panel_height;
    let panel_width = width as i32 - OVERLAY_PADDING * 2;
    draw_panel(frame, width, height, panel_left, panel_top, panel_width, panel_height);

    let text_left = panel_left + OVERLAY_PANEL_INSET_X;
    let mut y = panel_top + OVERLAY_PANEL_INSET_Y;
    draw_text(frame, width, text_left, y, &panel.title, INFO_TITLE_COLOR);
    for line in &body {
        y += LINE_ADVANCE;
        draw_text(frame, width, text_left, y, line, OVERLAY_TEXT_PRIMARY_COLOR);
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_panel(
    frame: &mut [u8],
    width: u32,
    height: u32,
    left: i32,
    top: i32,
    panel_width: i32,
    panel_height: i32,
) {
    fill_rect(
        frame,
        width,
        height,
        left,
        top,
        panel_width,
        panel_height,
        OVERLAY_PANEL_BG_COLOR,
    );
    rect_outline(
        frame,
        width,
        height,
        left,
        top,
        panel_width,
        panel_height,
        OVERLAY_PANEL_BORDER_COLOR,
    );
}

/// Greedy word wrap. Words longer than a line are hard-split.
fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();
        while chars.len() > max_chars {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = chars.split_off(max_chars);
            lines.push(chars.into_iter().collect());
            chars = rest;
        }
        let word_len = chars.len();
        if word_len == 0 {
            continue;
        }
        let needed = if current_len == 0 {
            word_len
        } else {
            current_len + 1 + word_len
        };
        if needed > max_chars {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(chars);
        current_len += word_len;
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines
}
