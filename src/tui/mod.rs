// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Interactive terminal front-end for a [`Board`].

use std::error::Error;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::board::{Board, BoardError};
use crate::model::{MapId, Point};
use crate::store::StorageBackend;

mod canvas;

use canvas::{MapCanvas, Viewport, CELL_HEIGHT, CELL_WIDTH};

const TOAST_TTL: Duration = Duration::from_secs(2);

/// Runs the interactive terminal UI until the user quits. Exports default to `export_dir`.
pub fn run<B: StorageBackend>(
    board: Board<B>,
    export_dir: PathBuf,
) -> Result<(), Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(board, export_dir);

    while !app.should_quit {
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
    }

    Ok(())
}

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prompt {
    AddChild,
    EditText,
    NewMap,
    RenameMap,
    Import,
    Export,
    GridSize,
}

impl Prompt {
    fn label(self) -> &'static str {
        match self {
            Self::AddChild => "New child",
            Self::EditText => "Node text",
            Self::NewMap => "New map name",
            Self::RenameMap => "Map name",
            Self::Import => "Import file",
            Self::Export => "Export to directory",
            Self::GridSize => "Grid size",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Normal,
    Prompt { kind: Prompt, input: String },
    ConfirmDeleteMap(MapId),
}

struct App<B> {
    board: Board<B>,
    viewport: Viewport,
    mode: Mode,
    toast: Option<Toast>,
    should_quit: bool,
    canvas_area: Rect,
    export_dir: PathBuf,
}

impl<B: StorageBackend> App<B> {
    fn new(board: Board<B>, export_dir: PathBuf) -> Self {
        Self {
            board,
            viewport: Viewport::default(),
            mode: Mode::Normal,
            toast: None,
            should_quit: false,
            canvas_area: Rect::default(),
            export_dir,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match std::mem::replace(&mut self.mode, Mode::Normal) {
            Mode::Normal => self.handle_normal_key(key),
            Mode::Prompt { kind, mut input } => match key.code {
                KeyCode::Esc => {}
                KeyCode::Enter => self.submit(kind, &input),
                KeyCode::Backspace => {
                    input.pop();
                    self.mode = Mode::Prompt { kind, input };
                }
                KeyCode::Char(ch) => {
                    input.push(ch);
                    self.mode = Mode::Prompt { kind, input };
                }
                _ => self.mode = Mode::Prompt { kind, input },
            },
            Mode::ConfirmDeleteMap(map_id) => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => match self.board.delete_map(&map_id) {
                    Ok(()) => self.set_toast("Map deleted"),
                    Err(err) => self.set_toast(format!("Delete failed: {err}")),
                },
                _ => self.set_toast("Kept map"),
            },
        }

        // Prompts swallow mouse events, so a drag still in progress ends here.
        if self.mode != Mode::Normal {
            self.board.pointer_up();
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => self.board.select_node(None),
            KeyCode::Char('a') => {
                if self.board.selected().is_some() {
                    self.open_prompt(Prompt::AddChild, String::new());
                } else {
                    self.set_toast("Select a node first");
                }
            }
            KeyCode::Char('r') => {
                let text = self.selected_text();
                match text {
                    Some(text) => self.open_prompt(Prompt::EditText, text),
                    None => self.set_toast("Select a node first"),
                }
            }
            KeyCode::Char('c') => match self.board.cycle_selected_color() {
                Ok(color) => self.set_toast(format!("Color: {color}")),
                Err(err) => self.set_toast(err.to_string()),
            },
            KeyCode::Char('d') | KeyCode::Delete => match self.board.delete_selected() {
                Ok(removed) => self.set_toast(format!("Deleted {} node(s)", removed.len())),
                Err(err) => self.set_toast(err.to_string()),
            },
            KeyCode::Left | KeyCode::Char('h') => self.nudge(-1.0, 0.0),
            KeyCode::Right | KeyCode::Char('l') => self.nudge(1.0, 0.0),
            KeyCode::Up | KeyCode::Char('k') => self.nudge(0.0, -1.0),
            KeyCode::Down | KeyCode::Char('j') => self.nudge(0.0, 1.0),
            KeyCode::Char('H') => self.viewport.pan(-4, 0),
            KeyCode::Char('L') => self.viewport.pan(4, 0),
            KeyCode::Char('K') => self.viewport.pan(0, -2),
            KeyCode::Char('J') => self.viewport.pan(0, 2),
            KeyCode::Char('0') => self.center_on_focus(),
            KeyCode::Tab | KeyCode::Char(']') => {
                self.board.cycle_map(1);
            }
            KeyCode::BackTab | KeyCode::Char('[') => {
                self.board.cycle_map(-1);
            }
            KeyCode::Char('n') => self.open_prompt(Prompt::NewMap, String::new()),
            KeyCode::Char('R') => match self.board.active_map() {
                Some(map) => {
                    let name = map.name().to_owned();
                    self.open_prompt(Prompt::RenameMap, name);
                }
                None => self.set_toast("No mind map is open"),
            },
            KeyCode::Char('X') => match self.board.active_map() {
                Some(map) => self.mode = Mode::ConfirmDeleteMap(map.map_id().clone()),
                None => self.set_toast("No mind map is open"),
            },
            KeyCode::Char('g') => {
                let snap = self.board.toggle_snap_to_grid();
                self.set_toast(if snap { "Snap to grid on" } else { "Snap to grid off" });
            }
            KeyCode::Char('G') => {
                let size = self.board.settings().grid_size().to_string();
                self.open_prompt(Prompt::GridSize, size);
            }
            KeyCode::Char('e') => {
                let dir = self.export_dir.display().to_string();
                self.open_prompt(Prompt::Export, dir);
            }
            KeyCode::Char('i') => self.open_prompt(Prompt::Import, String::new()),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.mode != Mode::Normal {
            return;
        }
        let pointer = self
            .viewport
            .screen_to_map(self.canvas_area, mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(pointer) = pointer {
                    self.board.pointer_down(pointer);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => match pointer {
                Some(pointer) => {
                    self.board.pointer_move(pointer);
                }
                // Leaving the canvas ends the gesture.
                None => {
                    self.board.pointer_up();
                }
            },
            MouseEventKind::Up(MouseButton::Left) => {
                self.board.pointer_up();
            }
            _ => {}
        }
    }

    fn open_prompt(&mut self, kind: Prompt, input: String) {
        self.mode = Mode::Prompt { kind, input };
    }

    fn submit(&mut self, kind: Prompt, input: &str) {
        match kind {
            Prompt::AddChild => match self.board.add_child_to_selected(input) {
                Ok(_) => self.set_toast("Node added"),
                Err(err) => self.set_toast(err.to_string()),
            },
            Prompt::EditText => match self.board.rename_selected(input) {
                Ok(()) => self.set_toast("Node updated"),
                Err(err) => self.set_toast(err.to_string()),
            },
            Prompt::NewMap => match self.board.create_map(input) {
                Ok(_) => {
                    self.viewport = Viewport::default();
                    self.set_toast(format!("Created map {}", input.trim()));
                }
                Err(err) => self.set_toast(err.to_string()),
            },
            Prompt::RenameMap => {
                let result = match self.board.active_map() {
                    Some(map) => {
                        let map_id = map.map_id().clone();
                        self.board
                            .rename_map(&map_id, input)
                            .map_err(|err| err.to_string())
                    }
                    None => Err("No mind map is open".to_owned()),
                };
                match result {
                    Ok(()) => self.set_toast("Map renamed"),
                    Err(err) => self.set_toast(err),
                }
            }
            Prompt::Import => match self.board.import_path(Path::new(input.trim())) {
                Ok(map_id) => {
                    let name = self
                        .board
                        .workspace()
                        .map(&map_id)
                        .map(|map| map.name().to_owned())
                        .unwrap_or_default();
                    self.set_toast(format!("Imported {name}"));
                }
                Err(err) => self.set_toast(err.to_string()),
            },
            Prompt::Export => {
                let input = input.trim();
                let dir = if input.is_empty() {
                    self.export_dir.clone()
                } else {
                    PathBuf::from(input)
                };
                let result = match self.board.workspace().active_map_id() {
                    Some(map_id) => self.board.export_map_to_dir(map_id, &dir),
                    None => Err(BoardError::NoActiveMap),
                };
                match result {
                    Ok(path) => {
                        self.export_dir = dir;
                        self.set_toast(format!("Exported {}", path.display()));
                    }
                    Err(err) => self.set_toast(err.to_string()),
                }
            }
            Prompt::GridSize => match input.trim().parse::<u32>() {
                Ok(size) => {
                    let size = self.board.set_grid_size(size);
                    self.set_toast(format!("Grid size {size}"));
                }
                Err(_) => self.set_toast("Grid size must be a whole number"),
            },
        }
    }

    fn selected_text(&self) -> Option<String> {
        let selected = self.board.selected()?;
        self.board
            .active_map()?
            .node(selected)
            .map(|node| node.text().to_owned())
    }

    fn nudge(&mut self, columns: f64, rows: f64) {
        let (step_x, step_y) = match self.board.settings().active_grid() {
            Some(grid) => (grid, grid),
            None => (CELL_WIDTH, CELL_HEIGHT),
        };
        match self
            .board
            .nudge_selected(Point::new(columns * step_x, rows * step_y))
        {
            Ok(position) => {
                if self
                    .viewport
                    .map_to_screen(self.canvas_area, position)
                    .is_none()
                {
                    self.viewport.center_on(self.canvas_area, position);
                }
            }
            Err(err) => self.set_toast(err.to_string()),
        }
    }

    /// Centers the selected node, or the root when nothing is selected.
    fn center_on_focus(&mut self) {
        let Some(map) = self.board.active_map() else {
            return;
        };
        let node = self
            .board
            .selected()
            .and_then(|node_id| map.node(node_id))
            .or_else(|| map.root());
        if let Some(center) = node.map(|node| node.center()) {
            self.viewport.center_on(self.canvas_area, center);
        }
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn expire_toast(&mut self) {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= Instant::now())
        {
            self.toast = None;
        }
    }
}

fn draw<B: StorageBackend>(frame: &mut Frame<'_>, app: &mut App<B>) {
    app.expire_toast();
    let area = frame.size();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    frame.render_widget(Paragraph::new(tabs_line(&app.board)), layout[0]);

    let title = match app.board.active_map() {
        Some(map) => format!(" {} ", map.name()),
        None => " Mindgraph ".to_owned(),
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let canvas_area = block.inner(layout[1]);
    frame.render_widget(block, layout[1]);
    app.canvas_area = canvas_area;

    match app.board.active_map() {
        Some(map) => frame.render_widget(
            MapCanvas::new(map, app.board.selected(), app.viewport),
            canvas_area,
        ),
        None => frame.render_widget(
            Paragraph::new("No mind map yet. Press n to create one.").wrap(Wrap { trim: true }),
            canvas_area,
        ),
    }

    frame.render_widget(Paragraph::new(status_line(app)), layout[2]);
    frame.render_widget(Paragraph::new(footer_line(&app.mode)), layout[3]);
}

fn tabs_line<B: StorageBackend>(board: &Board<B>) -> Line<'static> {
    let active = board.workspace().active_map_id();
    let mut spans = Vec::new();
    for (index, map) in board.workspace().maps().iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw(" │ "));
        }
        let label = format!(" {} ", map.name());
        if Some(map.map_id()) == active {
            spans.push(Span::styled(
                label,
                Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw(label));
        }
    }
    Line::from(spans)
}

fn status_line<B: StorageBackend>(app: &App<B>) -> Line<'static> {
    if let Some(toast) = &app.toast {
        return Line::from(Span::styled(
            toast.message.clone(),
            Style::default().fg(Color::Yellow),
        ));
    }

    let settings = app.board.settings();
    let nodes = app.board.active_map().map_or(0, |map| map.nodes().len());
    let mut spans = vec![Span::raw(format!(
        "{nodes} nodes · snap {} · grid {}",
        if settings.snap_to_grid() { "on" } else { "off" },
        settings.grid_size()
    ))];
    if let Some(text) = app.selected_text() {
        spans.push(Span::raw(format!(" · selected: {text}")));
    }
    if !app.board.last_save_ok() {
        spans.push(Span::styled(
            " · unsaved",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(spans)
}

fn footer_line(mode: &Mode) -> Line<'static> {
    match mode {
        Mode::Normal => Line::from(Span::styled(
            "a add  r edit  c color  d delete  hjkl move  HJKL pan  0 center  tab map  n new  \
             R rename  X drop map  g snap  G grid  e export  i import  q quit",
            Style::default().fg(Color::DarkGray),
        )),
        Mode::Prompt { kind, input } => Line::from(vec![
            Span::styled(
                format!("{}: ", kind.label()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("{input}█")),
            Span::styled("  enter ok  esc cancel", Style::default().fg(Color::DarkGray)),
        ]),
        Mode::ConfirmDeleteMap(_) => Line::from(Span::styled(
            "Delete this map and all its nodes? y/n",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
    }
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen);
}

#[cfg(test)]
mod tests;
