use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{poll, read, Event, KeyCode, KeyModifiers},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, size, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::io::{self, stdout, Write};
use std::time::Duration;

/// A single cell in the back buffer.
#[derive(Clone, Copy, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: None,
            bold: false,
        }
    }
}

/// Raw-mode alternate-screen terminal with a cell back buffer.
///
/// Enters raw mode and the alternate screen on construction; `Drop` restores
/// the terminal even when the caller bails with `?`.
pub struct Terminal {
    width: u16,
    height: u16,
    buffer: Vec<Cell>,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let (width, height) = size()?;
        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, Hide)?;

        Ok(Self {
            width,
            height,
            buffer: vec![Cell::default(); width as usize * height as usize],
        })
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Adopt a new terminal size, discarding the back buffer contents.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.buffer = vec![Cell::default(); width as usize * height as usize];
    }

    /// Blank the back buffer (not the screen).
    pub fn clear(&mut self) {
        self.buffer.fill(Cell::default());
    }

    /// Clear the actual screen.
    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(stdout(), Clear(ClearType::All))
    }

    /// Set a cell; out-of-range coordinates are ignored.
    pub fn set(&mut self, x: i32, y: i32, ch: char, fg: Option<Color>, bold: bool) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize * self.width as usize + x as usize] = Cell { ch, fg, bold };
        }
    }

    /// Flush the back buffer to the screen in one write batch.
    pub fn present(&self) -> io::Result<()> {
        let mut out = stdout();
        for y in 0..self.height {
            queue!(out, MoveTo(0, y))?;
            let row_start = y as usize * self.width as usize;
            for cell in &self.buffer[row_start..row_start + self.width as usize] {
                if cell.bold {
                    queue!(out, SetAttribute(Attribute::Bold))?;
                }
                match cell.fg {
                    Some(color) => {
                        queue!(out, SetForegroundColor(color), Print(cell.ch), ResetColor)?
                    }
                    None => queue!(out, Print(cell.ch))?,
                }
                if cell.bold {
                    queue!(out, SetAttribute(Attribute::Reset))?;
                }
            }
        }
        out.flush()
    }

    /// Non-blocking key poll.
    pub fn check_key(&self) -> io::Result<Option<(KeyCode, KeyModifiers)>> {
        if poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = read()? {
                return Ok(Some((key_event.code, key_event.modifiers)));
            }
        }
        Ok(None)
    }

    pub fn sleep(&self, seconds: f32) {
        std::thread::sleep(Duration::from_secs_f32(seconds));
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = execute!(stdout(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}
