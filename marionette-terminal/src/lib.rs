//! Terminal front end: keyboard polling, frame pacing and the ASCII renderer
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::{debug, info};
use marionette_core::{Config, Input, Key, KeyboardState, Scene};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Rows reserved for the status line
const STATUS_ROWS: u16 = 1;

/// Longest silence between auto-repeats of a held key, initial delay included
const REPEAT_GAP: Duration = Duration::from_millis(600);

/// Main application struct for the terminal puppet viewer
pub struct TerminalApp {
    scene: Scene,
    renderer: AsciiRenderer,
    keys: KeyboardState,
    /// The terminal reports key releases
    release_events: bool,
    target_fps: u32,
    running: bool,
    last_frame: Instant,
    fps_window: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: &Config) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let rows = height.saturating_sub(STATUS_ROWS);
        let target_fps = config.terminal.fps.max(1);

        Ok(Self {
            scene: Scene::new(config, width as u32, cell_aspect_height(rows)),
            renderer: AsciiRenderer::new(width as usize, rows as usize),
            keys: KeyboardState::with_release_timeout(release_timeout_frames(target_fps)),
            release_events: false,
            target_fps,
            running: true,
            last_frame: Instant::now(),
            fps_window: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        if matches!(terminal::supports_keyboard_enhancement(), Ok(true)) {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.keys = KeyboardState::new();
            self.release_events = true;
        }
        info!(
            "Key releases {}",
            if self.release_events { "reported" } else { "inferred from repeat gaps" }
        );

        let result = self.main_loop();

        // Cleanup
        if self.release_events {
            execute!(stdout(), PopKeyboardEnhancementFlags)?;
        }
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_secs_f64(1.0 / self.target_fps as f64);
        info!("Running at {} fps", self.target_fps);
        self.last_frame = Instant::now();

        while self.running {
            let frame_start = Instant::now();
            let dt = (frame_start - self.last_frame).as_secs_f32();
            self.last_frame = frame_start;

            // Handle input
            self.poll_input()?;
            if !self.running {
                break;
            }

            // Update
            self.update(dt);

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.fps_window).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.fps_window).as_secs_f32();
                self.frame_count = 0;
                self.fps_window = now;
            }
        }

        Ok(())
    }

    /// Drain pending terminal events into this frame's key state
    fn poll_input(&mut self) -> io::Result<()> {
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key_event) => {
                    if !apply_key_event(&mut self.keys, key_event) {
                        self.running = false;
                    }
                }
                Event::Resize(width, height) => self.resize(width, height)?,
                _ => {}
            }
        }
        Ok(())
    }

    fn resize(&mut self, width: u16, height: u16) -> io::Result<()> {
        let rows = height.saturating_sub(STATUS_ROWS);
        debug!("Terminal resized to {}x{}", width, height);
        self.renderer.resize(width as usize, rows as usize);
        self.scene.set_viewport(width as u32, cell_aspect_height(rows));
        execute!(stdout(), terminal::Clear(ClearType::All))
    }

    fn update(&mut self, dt: f32) {
        let keys: &dyn Input = &self.keys;
        self.scene.handle_input(dt, keys);
        self.scene.update(dt);
        self.keys.end_frame();
    }

    fn render(&mut self) -> io::Result<()> {
        self.scene.render(&mut self.renderer);

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, STATUS_ROWS))?;

        self.renderer.present(&mut stdout)?;

        // Draw UI overlay
        let light = self.scene.light();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Marionette | {} | light {:?} {:.1} | {:?} | FPS: {:.1} | 1-5/R=Mode 0=Power Tab=Light V=Proj C=Cull F=Wire Arrows/+-=Camera IJKLOP=Move light Q=Quit",
                self.scene.mode(),
                light.kind,
                light.power,
                self.scene.camera().mode,
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Feed one key event into the key state. Returns false on a quit key.
///
/// Repeats only keep a key held, so they never count as a fresh press.
fn apply_key_event(keys: &mut KeyboardState, event: KeyEvent) -> bool {
    let KeyEvent { code, kind, .. } = event;
    if kind == KeyEventKind::Press && matches!(code, KeyCode::Char('q') | KeyCode::Esc) {
        return false;
    }
    if let Some(key) = map_key(code) {
        match kind {
            KeyEventKind::Release => keys.release(key),
            KeyEventKind::Press | KeyEventKind::Repeat => keys.press(key),
        }
    }
    true
}

/// Frames a key stays held after its last report when releases are not reported
fn release_timeout_frames(fps: u32) -> u32 {
    (REPEAT_GAP.as_millis() as u32 * fps).div_ceil(1000)
}

/// Terminal cells are about twice as tall as they are wide
fn cell_aspect_height(rows: u16) -> u32 {
    rows.max(1) as u32 * 2
}

/// Translate a terminal key code into a scene key
pub fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(c) => Some(Key::char(c)),
        KeyCode::Tab => Some(Key::Tab),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use marionette_core::{AnimationController, AnimationMode};

    #[test]
    fn test_map_key() {
        assert_eq!(map_key(KeyCode::Char('A')), Some(Key::Char('a')));
        assert_eq!(map_key(KeyCode::Tab), Some(Key::Tab));
        assert_eq!(map_key(KeyCode::Up), Some(Key::Up));
        assert_eq!(map_key(KeyCode::F(1)), None);
    }

    fn key_event(c: char, kind: KeyEventKind) -> KeyEvent {
        KeyEvent::new_with_kind(KeyCode::Char(c), KeyModifiers::NONE, kind)
    }

    #[test]
    fn test_held_key_with_gapped_repeats_switches_mode_once() {
        let mut scene = Scene::new(&Config::default(), 80, 40);
        let mut keys = KeyboardState::with_release_timeout(release_timeout_frames(30));
        let mut switches = 0;
        for frame in 0..12 {
            if frame % 3 == 0 {
                assert!(apply_key_event(&mut keys, key_event('4', KeyEventKind::Press)));
            }
            if keys.is_key_pressed(Key::char('4')) {
                switches += 1;
            }
            let input: &dyn Input = &keys;
            scene.handle_input(0.05, input);
            scene.update(0.05);
            keys.end_frame();
        }
        assert_eq!(switches, 1);

        // The somersault ran uninterrupted from the first press
        let mut reference = AnimationController::new(AnimationMode::Somersault);
        for _ in 0..12 {
            reference.update(0.05);
        }
        assert_eq!(scene.mode(), AnimationMode::Somersault);
        assert_eq!(scene.params(), reference.params());
    }

    #[test]
    fn test_repeat_events_do_not_repress() {
        let mut keys = KeyboardState::new();
        apply_key_event(&mut keys, key_event('1', KeyEventKind::Press));
        assert!(keys.is_key_pressed(Key::char('1')));
        keys.end_frame();

        apply_key_event(&mut keys, key_event('1', KeyEventKind::Repeat));
        assert!(!keys.is_key_pressed(Key::char('1')));
        keys.end_frame();

        apply_key_event(&mut keys, key_event('1', KeyEventKind::Release));
        keys.end_frame();
        apply_key_event(&mut keys, key_event('1', KeyEventKind::Press));
        assert!(keys.is_key_pressed(Key::char('1')));
    }

    #[test]
    fn test_quit_keys() {
        let mut keys = KeyboardState::new();
        assert!(!apply_key_event(&mut keys, key_event('q', KeyEventKind::Press)));
        assert!(apply_key_event(&mut keys, key_event('q', KeyEventKind::Release)));
    }

    #[test]
    fn test_release_timeout_covers_repeat_delay() {
        assert_eq!(release_timeout_frames(30), 18);
        assert_eq!(release_timeout_frames(1), 1);
    }

    #[test]
    fn test_cell_aspect_height() {
        assert_eq!(cell_aspect_height(20), 40);
        assert_eq!(cell_aspect_height(0), 2);
    }
}
