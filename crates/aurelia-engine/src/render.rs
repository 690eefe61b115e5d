//! Terminal render sink.
//!
//! Prints a status block whenever the cycle, phase, or status message
//! changes, and keeps a single live line updated in place (carriage
//! return, no newline) with the countdown, body length, and position.
//! Write failures are logged and otherwise ignored; rendering must never
//! take the simulation down.

use std::io::Write;

use aurelia_core::runner::RenderSink;
use aurelia_core::tick::TickSummary;
use aurelia_types::Phase;
use tracing::warn;

/// Render sink writing human-readable frames to a writer.
///
/// Generic over the writer so tests can render into a buffer; the engine
/// uses [`TerminalRenderer::stdout`].
#[derive(Debug)]
pub struct TerminalRenderer<W: Write + Send> {
    /// Destination for rendered frames.
    out: W,

    /// The (cycle, phase, status) of the last printed block, used to
    /// detect when a fresh block is needed.
    last_block: Option<(i64, Phase, String)>,
}

impl TerminalRenderer<std::io::Stdout> {
    /// Renderer writing to standard output.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    /// Renderer writing to the given writer.
    pub const fn new(out: W) -> Self {
        Self {
            out,
            last_block: None,
        }
    }

    /// Render one frame, propagating write errors to the caller.
    fn render(&mut self, summary: &TickSummary) -> std::io::Result<()> {
        let block_key = (summary.cycle, summary.phase, summary.status.clone());
        if self.last_block.as_ref() != Some(&block_key) {
            if self.last_block.is_some() {
                // Terminate the in-place line from the previous block.
                writeln!(self.out)?;
            }
            writeln!(
                self.out,
                "stage: {}  |  cycle: {}",
                summary.phase.label(),
                summary.cycle
            )?;
            writeln!(self.out, "status: {}", summary.status)?;
            self.last_block = Some(block_key);
        }

        let position = if summary.visible {
            format!("({:.0}, {:.0})", summary.x, summary.y)
        } else {
            "anchored".to_owned()
        };
        write!(
            self.out,
            "\rnext growth in: {}  |  length: {:.2} cm  |  {}    ",
            format_duration(summary.remaining_in_phase),
            summary.body_length_cm,
            position
        )?;
        self.out.flush()
    }

    /// Consume the renderer and return the writer (test helper).
    #[cfg(test)]
    fn into_writer(self) -> W {
        self.out
    }
}

impl<W: Write + Send> RenderSink for TerminalRenderer<W> {
    fn on_tick(&mut self, summary: &TickSummary) {
        if let Err(err) = self.render(summary) {
            warn!(error = %err, "render write failed");
        }
    }
}

/// Format a second count as `Nd Nh Nm Ns`.
///
/// Units left of the most significant non-zero unit are dropped; seconds
/// are always shown. `90061` renders as `1d 1h 1m 1s`, `61` as `1m 1s`,
/// `59` as `59s`.
pub fn format_duration(seconds: u64) -> String {
    let days = seconds.checked_div(86_400).unwrap_or(0);
    let hours = seconds
        .checked_rem(86_400)
        .unwrap_or(0)
        .checked_div(3600)
        .unwrap_or(0);
    let minutes = seconds
        .checked_rem(3600)
        .unwrap_or(0)
        .checked_div(60)
        .unwrap_or(0);
    let secs = seconds.checked_rem(60).unwrap_or(0);

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 || days > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 || hours > 0 || days > 0 {
        parts.push(format!("{minutes}m"));
    }
    parts.push(format!("{secs}s"));

    parts.join(" ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn seconds_only() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(59), "59s");
    }

    #[test]
    fn minutes_pull_in_seconds() {
        assert_eq!(format_duration(60), "1m 0s");
        assert_eq!(format_duration(61), "1m 1s");
    }

    #[test]
    fn hours_pull_in_minutes_and_seconds() {
        assert_eq!(format_duration(3600), "1h 0m 0s");
        assert_eq!(format_duration(3661), "1h 1m 1s");
    }

    #[test]
    fn days_pull_in_everything() {
        assert_eq!(format_duration(86_400), "1d 0h 0m 0s");
        assert_eq!(format_duration(90_061), "1d 1h 1m 1s");
        // 3 days, the polyp duration.
        assert_eq!(format_duration(259_200), "3d 0h 0m 0s");
    }

    fn summary(cycle: i64, phase: Phase, status: &str) -> TickSummary {
        TickSummary {
            tick: 1,
            cycle,
            phase,
            seconds_in_cycle: 0,
            remaining_in_phase: 61,
            elapsed_in_phase: 0,
            body_length_cm: 1.234,
            status: status.to_owned(),
            visible: phase.is_free_swimming(),
            x: 100.4,
            y: 50.6,
        }
    }

    #[test]
    fn block_is_printed_once_per_change() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        let frame = summary(1, Phase::Medusa, "Happy");
        renderer.on_tick(&frame);
        renderer.on_tick(&frame);

        let output = String::from_utf8(renderer.into_writer()).unwrap();
        assert_eq!(output.matches("stage: medusa").count(), 1);
        assert_eq!(output.matches("status: Happy").count(), 1);
        // The live line appears once per tick.
        assert_eq!(output.matches("next growth in: 1m 1s").count(), 2);
    }

    #[test]
    fn phase_change_prints_a_new_block() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.on_tick(&summary(1, Phase::Ephyra, "Growing."));
        renderer.on_tick(&summary(1, Phase::Medusa, "Happy"));

        let output = String::from_utf8(renderer.into_writer()).unwrap();
        assert!(output.contains("stage: ephyra"));
        assert!(output.contains("stage: medusa"));
    }

    #[test]
    fn invisible_phase_renders_as_anchored() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.on_tick(&summary(1, Phase::Polyp, "Currently a polyp."));

        let output = String::from_utf8(renderer.into_writer()).unwrap();
        assert!(output.contains("anchored"));
        assert!(!output.contains("(100, 51)"));
    }

    #[test]
    fn visible_phase_renders_the_position() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.on_tick(&summary(1, Phase::Medusa, "Happy"));

        let output = String::from_utf8(renderer.into_writer()).unwrap();
        assert!(output.contains("(100, 51)"));
    }
}
