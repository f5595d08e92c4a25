//! Host-side collaborators wired into the core by the runner.

use std::collections::VecDeque;
use std::io::{self, Write};

use chip8_core::{
    disassemble_word, Display, DisplayEncoding, Framebuffer, Input, TraceEvent, TraceSink,
    DISPLAY_HEIGHT, DISPLAY_WIDTH, KEY_COUNT,
};

const LIT: char = '#';
const UNLIT: char = '.';
const HOME: &str = "\x1b[H";

/// Renders a framebuffer as one text line per display row.
#[must_use]
pub fn render_frame(framebuffer: &Framebuffer) -> String {
    let mut text = String::with_capacity((DISPLAY_WIDTH + 1) * DISPLAY_HEIGHT);
    for y in 0..DISPLAY_HEIGHT {
        text.extend((0..DISPLAY_WIDTH).map(|x| {
            if framebuffer.pixel(x, y) {
                LIT
            } else {
                UNLIT
            }
        }));
        text.push('\n');
    }
    text
}

/// Text display that keeps the latest frame and optionally repaints a terminal.
pub struct TerminalDisplay<W> {
    out: W,
    live: bool,
    frames: u64,
    last: Framebuffer,
    error: Option<io::Error>,
}

impl<W: Write> TerminalDisplay<W> {
    /// Creates a display writing to `out`; frames are only written when `live`.
    pub fn new(out: W, live: bool) -> Self {
        Self {
            out,
            live,
            frames: 0,
            last: Framebuffer::default(),
            error: None,
        }
    }

    /// Number of frames received.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Most recent frame.
    #[must_use]
    pub const fn last_frame(&self) -> &Framebuffer {
        &self.last
    }

    /// Writes the most recent frame, returning any error deferred from a live repaint.
    ///
    /// # Errors
    ///
    /// Returns the first write error.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        self.out.write_all(render_frame(&self.last).as_bytes())?;
        self.out.flush()?;
        Ok(self.out)
    }

    fn repaint(&mut self) -> io::Result<()> {
        write!(self.out, "{HOME}{}", render_frame(&self.last))?;
        self.out.flush()
    }
}

impl<W: Write> Display for TerminalDisplay<W> {
    fn draw(&mut self, framebuffer: &Framebuffer, encoding: DisplayEncoding) {
        let DisplayEncoding::MonochromePacked = encoding;
        self.frames += 1;
        self.last.clone_from(framebuffer);
        if !self.live || self.error.is_some() {
            return;
        }
        if let Err(error) = self.repaint() {
            log::warn!("terminal repaint failed: {error}");
            self.error = Some(error);
        }
    }
}

/// Keypad driven by a fixed script.
///
/// Queued presses are handed out one per `FX0A`; held keys stay down for the
/// whole run.
#[derive(Debug, Clone, Default)]
pub struct ScriptedKeys {
    held: [bool; KEY_COUNT as usize],
    presses: VecDeque<u8>,
}

impl ScriptedKeys {
    /// Creates a keypad from held keys and queued presses.
    #[must_use]
    pub fn new(held: &[u8], presses: &[u8]) -> Self {
        let mut keys = Self {
            presses: presses.iter().copied().collect(),
            ..Self::default()
        };
        for &key in held {
            if let Some(slot) = keys.held.get_mut(usize::from(key)) {
                *slot = true;
            }
        }
        keys
    }

    /// Presses not yet consumed.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.presses.len()
    }
}

impl Input for ScriptedKeys {
    fn is_pressed(&self, key: u8) -> bool {
        self.held.get(usize::from(key)).copied().unwrap_or(false)
    }

    fn wait_for_key(&mut self) -> Option<u8> {
        let key = self.presses.pop_front();
        if let Some(key) = key {
            log::debug!("delivering scripted key {key:X}");
        }
        key
    }
}

/// Trace sink forwarding events to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTrace;

impl TraceSink for LogTrace {
    fn on_event(&mut self, event: TraceEvent) {
        match event {
            TraceEvent::InstructionStart { pc, word } => {
                log::trace!("{}", disassemble_word(pc, word));
            }
            TraceEvent::FaultRaised { cause, pc } => log::trace!("fault {cause} at {pc:#05X}"),
            other => log::trace!("{other:?}"),
        }
    }
}
