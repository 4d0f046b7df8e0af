//! Terminal rendering

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use dwell_core::{EngineStats, ProgressWheel};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::feedback::DemoFeedback;
use crate::scene::{Button, Scene};
use crate::simulator::cell_of;

const HELP: &str =
    "arrows: move  space: tracking  h: hidden  d: locked  +/-: hover time  esc: quit";
const BAR_WIDTH: usize = 20;

/// Engine and loop figures shown in the status lines
#[derive(Debug, Clone)]
pub struct Hud {
    pub size: (u16, u16),
    pub hover_time_ms: f64,
    pub fps: Option<f64>,
    pub tracking: bool,
    pub mirrored: bool,
    pub stats: EngineStats,
}

pub fn render<W: Write>(
    out: &mut W,
    scene: &Scene,
    feedback: &DemoFeedback,
    hud: &Hud,
) -> io::Result<()> {
    let (cols, rows) = hud.size;
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    queue!(
        out,
        SetForegroundColor(Color::Cyan),
        Print(fit("dwell-demo  ", cols)),
        ResetColor,
        Print(fit(HELP, cols.saturating_sub(12))),
    )?;

    for button in scene.buttons() {
        if scene.is_hidden(&button.id) {
            continue;
        }
        let color = if feedback.highlighted() == Some(&button.id) {
            Color::Yellow
        } else if scene.is_live(&button.id) {
            Color::White
        } else {
            Color::DarkGrey
        };
        draw_button(out, button, color)?;
    }

    if let Some(frame) = feedback.frame() {
        let (col, row) = cell_of(frame.point());
        let wheel = ProgressWheel::for_frame(frame);
        queue!(
            out,
            MoveTo(col, row),
            SetForegroundColor(Color::Magenta),
            Print(wheel_glyph(&wheel)),
            ResetColor,
        )?;
    }

    let progress = feedback.frame().map(|f| f.progress).unwrap_or(0.0);
    let status = format!(
        "{} {:>3.0}%  {}",
        progress_bar(progress, BAR_WIDTH),
        progress * 100.0,
        feedback.status().unwrap_or(""),
    );
    queue!(out, MoveTo(0, rows.saturating_sub(2)), Print(fit(&status, cols)))?;

    let fps = hud
        .fps
        .map(|fps| format!("{:.0}", fps))
        .unwrap_or_else(|| "--".to_string());
    let info = format!(
        "hover {:.0}ms  fps {}  tracking {}{}  activations {}  ticks {}",
        hud.hover_time_ms,
        fps,
        if hud.tracking { "on" } else { "off" },
        if hud.mirrored { "  mirrored" } else { "" },
        hud.stats.activations,
        hud.stats.ticks,
    );
    queue!(
        out,
        MoveTo(0, rows.saturating_sub(1)),
        SetForegroundColor(Color::DarkGrey),
        Print(fit(&info, cols)),
        ResetColor,
    )?;

    out.flush()
}

fn draw_button<W: Write>(out: &mut W, button: &Button, color: Color) -> io::Result<()> {
    let cells = button.cells;
    let inner = usize::from(cells.cols.saturating_sub(2));
    let label = format!("{} ({})", button.label, button.clicks());

    queue!(out, SetForegroundColor(color))?;
    for offset in 0..cells.rows {
        let line = if offset == 0 {
            format!("┌{}┐", "─".repeat(inner))
        } else if offset + 1 == cells.rows {
            format!("└{}┘", "─".repeat(inner))
        } else if offset == cells.rows / 2 {
            format!("│{}│", pad_center(&label, inner))
        } else {
            format!("│{}│", " ".repeat(inner))
        };
        queue!(out, MoveTo(cells.col, cells.row + offset), Print(line))?;
    }
    queue!(out, ResetColor)
}

/// Glyph for the progress ring: empty, quarter, half, three quarters, full
pub fn wheel_glyph(wheel: &ProgressWheel) -> char {
    const GLYPHS: [char; 5] = ['+', '◔', '◑', '◕', '●'];
    if !wheel.visible {
        return GLYPHS[0];
    }
    let quarter = (wheel.rotation_deg / 90.0).ceil().clamp(1.0, 4.0) as usize;
    GLYPHS[quarter]
}

pub fn progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

/// Center `text` in `width` columns, truncating if needed
pub fn pad_center(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    let used = UnicodeWidthStr::width(text.as_str());
    let left = (width - used) / 2;
    let right = width - used - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

fn fit(text: &str, cols: u16) -> String {
    truncate(text, usize::from(cols))
}

fn truncate(text: &str, width: usize) -> String {
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dwell_core::{FeedbackFrame, Point};

    fn wheel(progress: f64) -> ProgressWheel {
        ProgressWheel::for_frame(&FeedbackFrame::new(Point::new(50.0, 50.0), progress))
    }

    #[test]
    fn test_wheel_glyph_quarters() {
        assert_eq!(wheel_glyph(&wheel(0.0)), '+');
        assert_eq!(wheel_glyph(&wheel(0.1)), '◔');
        assert_eq!(wheel_glyph(&wheel(0.5)), '◑');
        assert_eq!(wheel_glyph(&wheel(0.7)), '◕');
        assert_eq!(wheel_glyph(&wheel(1.0)), '●');
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.0, 4), "[....]");
        assert_eq!(progress_bar(0.5, 4), "[##..]");
        assert_eq!(progress_bar(1.5, 4), "[####]");
    }

    #[test]
    fn test_pad_center() {
        assert_eq!(pad_center("ab", 6), "  ab  ");
        assert_eq!(pad_center("abc", 6), " abc  ");
        assert_eq!(pad_center("abcdefgh", 4), "abcd");
    }

    #[test]
    fn test_pad_center_wide_chars() {
        // Each CJK character occupies two columns
        assert_eq!(pad_center("按钮", 6), " 按钮 ");
        assert_eq!(pad_center("按钮", 3), "按 ");
    }

    #[test]
    fn test_render_draws_visible_buttons() {
        let scene = Scene::new();
        let feedback = DemoFeedback::default();
        let hud = Hud {
            size: (80, 24),
            hover_time_ms: 1500.0,
            fps: None,
            tracking: true,
            mirrored: false,
            stats: EngineStats::default(),
        };

        let mut out = Vec::new();
        render(&mut out, &scene, &feedback, &hud).unwrap();
        let text = String::from_utf8_lossy(&out);

        assert!(text.contains("Button 1 (0)"));
        assert!(text.contains("Locked (0)"));
        assert!(!text.contains("Hidden (0)"));
        assert!(text.contains("hover 1500ms"));
    }
}
