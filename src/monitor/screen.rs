// ABOUTME: Draw targets for the live rollout view.
// ABOUTME: TerminalScreen redraws in place with crossterm; PlainScreen prints changed frames.

use super::render::Frame;
use crossterm::cursor::{Hide, MoveToPreviousLine, Show};
use crossterm::terminal::{self, Clear, ClearType, DisableLineWrap, EnableLineWrap};
use crossterm::{ExecutableCommand, QueueableCommand};
use std::io::{self, Write};

/// Where frames are drawn.
pub trait Screen {
    fn draw(&mut self, frame: &Frame) -> io::Result<()>;

    /// Print a final line after the last frame.
    fn finish(&mut self, line: &str) -> io::Result<()>;
}

/// Redraws each frame over the previous one.
///
/// Hides the cursor and disables line wrapping while alive; both are
/// restored on drop, whichever way the monitor exits.
///
/// Frames taller than the terminal are clipped to fit: the cursor cannot
/// move above the top row, so an overflowing frame could not be erased.
pub struct TerminalScreen<W: Write> {
    out: W,
    drawn: u16,
    rows: Option<u16>,
}

impl<W: Write> TerminalScreen<W> {
    pub fn new(mut out: W) -> io::Result<Self> {
        out.execute(Hide)?;
        out.execute(DisableLineWrap)?;
        Ok(Self {
            out,
            drawn: 0,
            rows: None,
        })
    }

    /// Use a fixed height instead of querying the terminal on every draw.
    pub fn with_rows(mut self, rows: u16) -> Self {
        self.rows = Some(rows);
        self
    }

    fn height(&self) -> Option<u16> {
        self.rows.or_else(|| terminal::size().ok().map(|(_, rows)| rows))
    }

    fn erase_previous(&mut self) -> io::Result<()> {
        if self.drawn > 0 {
            self.out.queue(MoveToPreviousLine(self.drawn))?;
            self.out.queue(Clear(ClearType::FromCursorDown))?;
        }
        Ok(())
    }
}

impl<W: Write> Screen for TerminalScreen<W> {
    fn draw(&mut self, frame: &Frame) -> io::Result<()> {
        self.erase_previous()?;
        let lines: Vec<&str> = frame.lines().collect();
        // one row stays free for the cursor after the last newline
        let limit = self
            .height()
            .map(|rows| usize::from(rows.saturating_sub(1)).max(1));
        let mut drawn: u16 = 0;
        for line in clip(&lines, limit) {
            writeln!(self.out, "{line}")?;
            drawn = drawn.saturating_add(1);
        }
        self.drawn = drawn;
        self.out.flush()
    }

    fn finish(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{line}")?;
        self.drawn = 0;
        self.out.flush()
    }
}

/// Keep at most `limit` lines. The last line is the elapsed-time footer
/// and always survives; body lines past the limit are dropped.
fn clip<'a>(lines: &[&'a str], limit: Option<usize>) -> Vec<&'a str> {
    match limit {
        Some(limit) if lines.len() > limit => {
            let mut kept = lines[..limit.saturating_sub(1)].to_vec();
            kept.extend(lines.last());
            kept
        }
        _ => lines.to_vec(),
    }
}

impl<W: Write> Drop for TerminalScreen<W> {
    fn drop(&mut self) {
        let _ = self.out.execute(Show);
        let _ = self.out.execute(EnableLineWrap);
    }
}

/// Appends a frame only when its body differs from the last one drawn.
///
/// Used when stdout is not a terminal, so logs stay readable.
pub struct PlainScreen<W: Write> {
    out: W,
    last: Option<Vec<String>>,
}

impl<W: Write> PlainScreen<W> {
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Screen for PlainScreen<W> {
    fn draw(&mut self, frame: &Frame) -> io::Result<()> {
        if self.last.as_deref() == Some(frame.body()) {
            return Ok(());
        }
        for line in frame.body() {
            writeln!(self.out, "{line}")?;
        }
        self.last = Some(frame.body().to_vec());
        self.out.flush()
    }

    fn finish(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(lines: &[&str], footer: &str) -> Frame {
        let mut frame = Frame::new();
        for line in lines {
            frame.push(*line);
        }
        frame.set_footer(footer.to_string());
        frame
    }

    #[test]
    fn plain_screen_skips_unchanged_bodies() {
        let mut screen = PlainScreen::new(Vec::new());
        screen.draw(&frame(&["a"], "Elapsed: 00:00:01")).unwrap();
        screen.draw(&frame(&["a"], "Elapsed: 00:00:02")).unwrap();
        screen.draw(&frame(&["b"], "Elapsed: 00:00:03")).unwrap();
        screen.finish("done").unwrap();
        let text = String::from_utf8(screen.into_inner()).unwrap();
        assert_eq!(text, "a\nb\ndone\n");
    }

    #[test]
    fn terminal_screen_restores_cursor_on_drop() {
        let mut buffer = Vec::new();
        {
            let mut screen = TerminalScreen::new(&mut buffer).unwrap().with_rows(24);
            screen.draw(&frame(&["a", "b"], "footer")).unwrap();
            screen.draw(&frame(&["c"], "footer")).unwrap();
        }
        let text = String::from_utf8_lossy(&buffer);
        // hide then show the cursor
        assert!(text.contains("\u{1b}[?25l"));
        assert!(text.contains("\u{1b}[?25h"));
        // second draw moves up over the three lines of the first
        assert!(text.contains("\u{1b}[3F"));
    }

    #[test]
    fn tall_frames_are_clipped_to_the_terminal() {
        let mut buffer = Vec::new();
        {
            let mut screen = TerminalScreen::new(&mut buffer).unwrap().with_rows(4);
            screen
                .draw(&frame(&["app1", "app2", "app3", "app4", "app5"], "Elapsed"))
                .unwrap();
            screen.draw(&frame(&["app1"], "Elapsed")).unwrap();
        }
        let text = String::from_utf8_lossy(&buffer);
        assert!(text.contains("app1\napp2\nElapsed\n"));
        assert!(!text.contains("app3"));
        // the second draw moves up over exactly the three lines drawn
        assert!(text.contains("\u{1b}[3F"));
    }

    #[test]
    fn clip_keeps_footer() {
        let lines = ["a", "b", "c", "footer"];
        assert_eq!(clip(&lines, Some(2)), ["a", "footer"]);
        assert_eq!(clip(&lines, Some(1)), ["footer"]);
        assert_eq!(clip(&lines, Some(10)), lines);
        assert_eq!(clip(&lines, None), lines);
    }
}
