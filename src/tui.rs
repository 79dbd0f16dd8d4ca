// Interactive keyboard forwarder TUI
// Every key press is encoded and written to the gadget; mouse drags draw
// labeled boxes; ESC twice exits.

use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseButton, MouseEvent, MouseEventKind,
    },
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{prelude::*, widgets::*};

use keypipe_gadget::{GadgetKeyboard, Keystroke};

/// Application state
struct App {
    /// Device path shown in the status panel
    device_label: String,
    /// Keystrokes forwarded so far
    forwarded: u64,
    /// Display name of the last key press
    last_key: String,
    /// Consecutive Esc presses; the second one exits
    esc_count: u8,
    /// Last reported mouse position
    mouse_pos: (u16, u16),
    /// Currently held button / wheel direction
    buttons: String,
    /// Drag origin while a button is held
    drag_start: Option<(u16, u16)>,
    /// Current drag position
    drag_pos: Option<(u16, u16)>,
    /// Committed boxes with the digit of the button that drew them
    boxes: Vec<(Rect, char)>,
    /// Digit of the most recently held button
    last_button: char,
}

impl App {
    fn new(device_label: String) -> Self {
        Self {
            device_label,
            forwarded: 0,
            last_key: String::new(),
            esc_count: 0,
            mouse_pos: (0, 0),
            buttons: String::new(),
            drag_start: None,
            drag_pos: None,
            boxes: Vec::new(),
            last_button: '*',
        }
    }
}

/// Run the TUI - called via 'keypipe tui' or with no subcommand
pub fn run(session: GadgetKeyboard, device_label: String) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = App::new(device_label);
    let tick_rate = Duration::from_millis(100);
    let mut result: Result<()> = Ok(());

    loop {
        terminal.draw(|f| ui(f, &app))?;

        if !event::poll(tick_rate)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let ctrl_held = key.modifiers.contains(KeyModifiers::CONTROL);

                // Forward first; the local bindings below see the key too
                if let Some(stroke) = keystroke_for(key.code) {
                    if let Err(e) = session.send_keystroke(stroke, ctrl_held) {
                        result = Err(e.into());
                        break;
                    }
                    app.forwarded += 1;
                }
                app.last_key = key_label(key.code, ctrl_held);

                match key.code {
                    KeyCode::Esc => {
                        app.esc_count += 1;
                        if app.esc_count > 1 {
                            break;
                        }
                    }
                    // Repaint; leaves the escape count alone
                    KeyCode::Char('l') | KeyCode::Char('L') if ctrl_held => {
                        terminal.clear()?;
                    }
                    _ => {
                        app.esc_count = 0;
                        if !ctrl_held
                            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
                        {
                            app.boxes.clear();
                        }
                    }
                }
            }
            Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
            Event::Resize(_, _) => terminal.clear()?,
            _ => {}
        }
    }

    // Cleanup
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    stdout().execute(DisableMouseCapture)?;

    session.close()?;
    result
}

/// Keystroke for a terminal key, if it has one.
///
/// Function and navigation keys beyond the arrows have no boot-report form
/// here and are skipped rather than forwarded.
fn keystroke_for(code: KeyCode) -> Option<Keystroke> {
    match code {
        KeyCode::Char(ch) => Some(Keystroke::Char(ch)),
        KeyCode::Enter => Some(Keystroke::Enter),
        KeyCode::Backspace => Some(Keystroke::Backspace),
        KeyCode::Tab => Some(Keystroke::Tab),
        KeyCode::Esc => Some(Keystroke::Esc),
        KeyCode::Up => Some(Keystroke::Up),
        KeyCode::Down => Some(Keystroke::Down),
        KeyCode::Left => Some(Keystroke::Left),
        KeyCode::Right => Some(Keystroke::Right),
        _ => None,
    }
}

/// Display name for the status panel
fn key_label(code: KeyCode, ctrl_held: bool) -> String {
    let name = match code {
        KeyCode::Char(ch) => ch.to_string(),
        other => format!("{other:?}"),
    };
    if ctrl_held {
        format!("Ctrl+{name}")
    } else {
        name
    }
}

/// Track mouse position, held buttons and drag rectangles.
///
/// A press anchors the drag origin; releasing commits the dragged
/// rectangle as a box labeled with the button's digit.
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    app.mouse_pos = (mouse.column, mouse.row);
    app.buttons.clear();
    match mouse.kind {
        MouseEventKind::Down(button) | MouseEventKind::Drag(button) => {
            app.last_button = button_digit(button);
            app.buttons.push_str(button_name(button));
            if app.drag_start.is_none() {
                app.drag_start = Some((mouse.column, mouse.row));
            }
            app.drag_pos = Some((mouse.column, mouse.row));
        }
        MouseEventKind::Up(_) => {
            if let (Some(start), Some(end)) = (app.drag_start, app.drag_pos) {
                app.boxes.push((rect_between(start, end), app.last_button));
            }
            app.drag_start = None;
            app.drag_pos = None;
        }
        MouseEventKind::ScrollUp => app.buttons.push_str("WheelUp"),
        MouseEventKind::ScrollDown => app.buttons.push_str("WheelDown"),
        _ => {}
    }
}

fn button_digit(button: MouseButton) -> char {
    match button {
        MouseButton::Left => '1',
        MouseButton::Right => '2',
        MouseButton::Middle => '3',
    }
}

fn button_name(button: MouseButton) -> &'static str {
    match button {
        MouseButton::Left => "Button1",
        MouseButton::Right => "Button2",
        MouseButton::Middle => "Button3",
    }
}

/// Smallest Rect covering both corners, inclusive
fn rect_between(a: (u16, u16), b: (u16, u16)) -> Rect {
    let x = a.0.min(b.0);
    let y = a.1.min(b.1);
    Rect::new(x, y, a.0.max(b.0) - x + 1, a.1.max(b.1) - y + 1)
}

fn ui(f: &mut Frame, app: &App) {
    // Status panel renders last so it stays on top
    for (area, label) in &app.boxes {
        let area = area.intersection(f.area());
        if area.is_empty() {
            continue;
        }
        f.render_widget(box_widget(*label, area), area);
    }

    if let (Some(start), Some(end)) = (app.drag_start, app.drag_pos) {
        let area = rect_between(start, end).intersection(f.area());
        if !area.is_empty() {
            f.render_widget(
                Block::default()
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Green)),
                area,
            );
        }
    }

    let panel_lines = vec![
        Line::from("Press ESC twice to exit, C to clear."),
        Line::from(format!("Device: {}", app.device_label)),
        Line::from(format!("Mouse: {}, {}", app.mouse_pos.0, app.mouse_pos.1)),
        Line::from(format!("Buttons: {}", app.buttons)),
        Line::from(format!("Keys: {}  Sent: {}", app.last_key, app.forwarded)),
    ];
    let panel = Paragraph::new(panel_lines)
        .style(Style::default().fg(Color::White).bg(Color::Red))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(panel, Rect::new(1, 1, 44, 7).intersection(f.area()));
}

/// Digit-filled box in the label's color, like the drag that drew it
fn box_widget(label: char, area: Rect) -> Paragraph<'static> {
    let inner_w = area.width.saturating_sub(2) as usize;
    let inner_h = area.height.saturating_sub(2) as usize;
    let fill: Vec<Line> = (0..inner_h)
        .map(|_| Line::from(label.to_string().repeat(inner_w)))
        .collect();
    Paragraph::new(fill)
        .style(Style::default().fg(Color::Black).bg(box_color(label)))
        .block(Block::default().borders(Borders::ALL))
}

fn box_color(label: char) -> Color {
    match label {
        '1' => Color::Blue,
        '2' => Color::Magenta,
        '3' => Color::Cyan,
        _ => Color::DarkGray,
    }
}
