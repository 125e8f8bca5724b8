// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{backend::TestBackend, layout::Rect, Terminal};
use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::canvas::{clip_segment, Viewport, CELL_HEIGHT, CELL_WIDTH};
use super::{draw, App, Mode};
use crate::board::Board;
use crate::model::{NodeId, Point};
use crate::store::{load_workspace, MemoryBackend, Storage};

const WIDTH: u16 = 100;
const HEIGHT: u16 = 30;

fn fixed_clock() -> u64 {
    1_000
}

struct Harness {
    app: App<MemoryBackend>,
    terminal: Terminal<TestBackend>,
    dir: TempDir,
}

impl Harness {
    fn press(&mut self, code: KeyCode) {
        self.app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.press(KeyCode::Char(ch));
        }
    }

    fn mouse(&mut self, kind: MouseEventKind, column: u16, row: u16) {
        self.app.handle_mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        });
    }

    fn render(&mut self) -> Vec<String> {
        let app = &mut self.app;
        self.terminal
            .draw(|frame| draw(frame, app))
            .expect("draw");
        let buffer = self.terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer.get(x, y).symbol().to_owned())
                    .collect::<String>()
            })
            .collect()
    }

    fn symbol_at(&self, x: u16, y: u16) -> String {
        self.terminal.backend().buffer().get(x, y).symbol().to_owned()
    }

    fn toast(&self) -> Option<&str> {
        self.app.toast.as_ref().map(|toast| toast.message.as_str())
    }
}

#[fixture]
fn harness() -> Harness {
    let dir = tempfile::tempdir().expect("tempdir");
    let board = Board::open(Storage::new(MemoryBackend::new()), fixed_clock);
    let mut harness = Harness {
        app: App::new(board, dir.path().to_path_buf()),
        terminal: Terminal::new(TestBackend::new(WIDTH, HEIGHT)).expect("terminal"),
        dir,
    };
    harness.render();
    harness
}

#[test]
fn viewport_maps_cells_to_map_points_and_back() {
    let area = Rect::new(1, 2, 98, 25);
    let viewport = Viewport::default();

    assert_eq!(viewport.screen_to_map(area, 0, 0), None);
    assert_eq!(viewport.screen_to_map(area, 99, 10), None);
    assert_eq!(
        viewport.screen_to_map(area, 41, 17),
        Some(Point::new(40.0 * CELL_WIDTH, 15.0 * CELL_HEIGHT))
    );
    assert_eq!(viewport.map_to_screen(area, Point::new(400.0, 300.0)), Some((41, 17)));
    assert_eq!(viewport.map_to_screen(area, Point::new(-5.0, 0.0)), None);
}

#[test]
fn viewport_pans_and_centers() {
    let area = Rect::new(0, 0, 80, 20);
    let mut viewport = Viewport::new(Point::new(100.0, 100.0));
    viewport.pan(-4, 2);
    assert_eq!(viewport.origin(), Point::new(60.0, 140.0));

    viewport.center_on(area, Point::new(500.0, 325.0));
    assert_eq!(viewport.origin(), Point::new(100.0, 125.0));
    assert_eq!(viewport.map_to_screen(area, Point::new(500.0, 325.0)), Some((40, 10)));
}

#[rstest]
#[case::inside((1, 1), (8, 3), Some(((1, 1), (8, 3))))]
#[case::far_right((2, 2), (1_000_000_000, 2), Some(((2, 2), (9, 2))))]
#[case::through_corner((-3, -3), (3, 3), Some(((0, 0), (3, 3))))]
#[case::left_of_area((-5, -5), (-1, 20), None)]
#[case::below_area((0, 7), (9, 7), None)]
fn segments_are_clipped_to_the_canvas(
    #[case] from: (i64, i64),
    #[case] to: (i64, i64),
    #[case] expected: Option<((i64, i64), (i64, i64))>,
) {
    assert_eq!(clip_segment(Rect::new(3, 3, 10, 5), from, to), expected);
}

#[test]
fn viewport_clamps_far_points() {
    let viewport = Viewport::default();
    let (column, row) = viewport.map_to_cell(Point::new(1e300, -1e300));
    assert!(column > 1_000_000 && row < -1_000_000);
    assert_eq!(viewport.map_to_screen(Rect::new(0, 0, 80, 24), Point::new(1e300, 0.0)), None);
}

#[rstest]
fn fresh_board_draws_the_selected_root(mut harness: Harness) {
    let lines = harness.render();

    assert!(lines[0].contains("My Mind Map"));
    // Root at (400, 300) lands at canvas cell (40, 15); the canvas starts at (1, 2).
    assert_eq!(harness.symbol_at(41, 17), "╔");
    assert_eq!(harness.symbol_at(60, 19), "╝");
    assert!(lines[18].contains("Central Idea"));
    assert!(lines[28].contains("1 nodes · snap off · grid 20 · selected: Central Idea"));
    assert!(lines[29].contains("a add"));
}

#[rstest]
fn adding_a_child_draws_it_with_a_connecting_edge(mut harness: Harness) {
    harness.press(KeyCode::Char('a'));
    harness.type_text("Idea A");
    assert!(harness.render()[29].contains("New child: Idea A█"));
    harness.press(KeyCode::Enter);

    assert_eq!(harness.app.mode, Mode::Normal);
    assert_eq!(harness.toast(), Some("Node added"));
    let lines = harness.render();
    assert!(lines[18].contains("Idea A"));
    // Root box is no longer selected; the new child at (650, 300) is.
    assert_eq!(harness.symbol_at(41, 17), "┌");
    assert_eq!(harness.symbol_at(66, 17), "╔");
    assert_eq!(harness.symbol_at(62, 18), "─");
}

#[rstest]
fn far_away_nodes_render_as_clipped_edges(mut harness: Harness) {
    let map_id = harness
        .app
        .board
        .import_str(
            r#"{
                "id": "far",
                "name": "Far",
                "nodes": [
                    {"id": "root", "text": "Hub", "x": 400, "y": 300},
                    {"id": "a", "text": "A", "x": 1e12, "y": 300, "parentId": "root"},
                    {"id": "b", "text": "B", "x": 1e300, "y": 300, "parentId": "root"},
                    {"id": "c", "text": "C", "x": -1e300, "y": 300, "parentId": "root"}
                ]
            }"#,
        )
        .expect("import");
    assert_eq!(harness.app.board.workspace().active_map_id(), Some(&map_id));

    let lines = harness.render();
    assert_eq!(harness.symbol_at(41, 17), "┌");
    assert!(lines[18].contains("Hub"));
    // Edges run from the root's center row to both canvas edges.
    for column in [1, 10, 70, 98] {
        assert_eq!(harness.symbol_at(column, 18), "─");
    }
}

#[rstest]
fn blank_child_text_is_rejected_with_a_toast(mut harness: Harness) {
    harness.press(KeyCode::Char('a'));
    harness.type_text("   ");
    harness.press(KeyCode::Enter);

    assert_eq!(
        harness.toast(),
        Some("validation failed: node text must not be empty")
    );
    assert_eq!(
        harness.app.board.active_map().map(|map| map.nodes().len()),
        Some(1)
    );
}

#[rstest]
fn escape_cancels_a_prompt(mut harness: Harness) {
    harness.press(KeyCode::Char('r'));
    assert!(matches!(harness.app.mode, Mode::Prompt { .. }));
    harness.press(KeyCode::Backspace);
    harness.press(KeyCode::Esc);

    assert_eq!(harness.app.mode, Mode::Normal);
    let map = harness.app.board.active_map().expect("map");
    assert_eq!(map.root().map(|root| root.text()), Some("Central Idea"));
}

#[rstest]
fn editing_prefills_the_current_text(mut harness: Harness) {
    harness.press(KeyCode::Char('r'));
    for _ in 0.."Idea".len() {
        harness.press(KeyCode::Backspace);
    }
    harness.type_text("Topic");
    harness.press(KeyCode::Enter);

    let map = harness.app.board.active_map().expect("map");
    assert_eq!(map.root().map(|root| root.text()), Some("Central Topic"));
}

#[rstest]
fn dragging_moves_the_node_and_persists_on_release(mut harness: Harness) {
    // Grab the root 9 columns and 1 row into its box.
    harness.mouse(MouseEventKind::Down(MouseButton::Left), 50, 18);
    harness.mouse(MouseEventKind::Drag(MouseButton::Left), 70, 25);

    let root = |harness: &Harness| {
        harness
            .app
            .board
            .active_map()
            .and_then(|map| map.root())
            .map(|root| root.position())
    };
    assert_eq!(root(&harness), Some(Point::new(600.0, 440.0)));

    harness.mouse(MouseEventKind::Up(MouseButton::Left), 70, 25);
    let stored = load_workspace(harness.app.board.storage(), 0);
    let stored_root = stored.active_map().and_then(|map| map.root()).expect("root");
    assert_eq!(stored_root.position(), Point::new(600.0, 440.0));
}

#[rstest]
fn leaving_the_canvas_ends_the_drag(mut harness: Harness) {
    harness.mouse(MouseEventKind::Down(MouseButton::Left), 50, 18);
    harness.mouse(MouseEventKind::Drag(MouseButton::Left), 0, 0);
    harness.mouse(MouseEventKind::Drag(MouseButton::Left), 70, 25);

    let map = harness.app.board.active_map().expect("map");
    assert_eq!(map.root().map(|root| root.position()), Some(Point::new(400.0, 300.0)));
    assert!(!harness.app.board.workspace().interaction().is_dragging());
}

#[rstest]
#[case::add_child('a')]
#[case::delete_map('X')]
fn opening_a_prompt_ends_the_drag(mut harness: Harness, #[case] key: char) {
    harness.mouse(MouseEventKind::Down(MouseButton::Left), 50, 18);
    harness.press(KeyCode::Char(key));
    assert_ne!(harness.app.mode, Mode::Normal);
    // The release lands while the prompt is open and is ignored.
    harness.mouse(MouseEventKind::Up(MouseButton::Left), 50, 18);
    harness.press(KeyCode::Esc);
    harness.mouse(MouseEventKind::Drag(MouseButton::Left), 70, 25);

    let map = harness.app.board.active_map().expect("map");
    assert_eq!(map.root().map(|root| root.position()), Some(Point::new(400.0, 300.0)));
    assert!(!harness.app.board.workspace().interaction().is_dragging());
}

#[rstest]
fn clicking_the_background_clears_the_selection(mut harness: Harness) {
    harness.mouse(MouseEventKind::Down(MouseButton::Left), 5, 5);
    harness.mouse(MouseEventKind::Up(MouseButton::Left), 5, 5);
    assert_eq!(harness.app.board.selected(), None);

    harness.press(KeyCode::Char('a'));
    assert_eq!(harness.app.mode, Mode::Normal);
    assert_eq!(harness.toast(), Some("Select a node first"));
}

#[rstest]
fn arrow_keys_nudge_by_a_cell_or_a_grid_step(mut harness: Harness) {
    harness.press(KeyCode::Right);
    harness.press(KeyCode::Char('j'));
    let position = |harness: &Harness| {
        harness
            .app
            .board
            .active_map()
            .and_then(|map| map.root())
            .map(|root| root.position())
    };
    assert_eq!(position(&harness), Some(Point::new(410.0, 320.0)));

    harness.press(KeyCode::Char('g'));
    harness.press(KeyCode::Left);
    assert_eq!(position(&harness), Some(Point::new(400.0, 320.0)));
}

#[rstest]
fn deleting_the_root_reports_an_error(mut harness: Harness) {
    harness.press(KeyCode::Char('d'));
    let toast = harness.toast().expect("toast").to_owned();
    assert!(toast.contains("root node cannot be deleted"));
}

#[rstest]
fn maps_can_be_created_cycled_and_deleted(mut harness: Harness) {
    harness.press(KeyCode::Char('n'));
    harness.type_text("Second");
    harness.press(KeyCode::Enter);
    let lines = harness.render();
    assert!(lines[0].contains("My Mind Map"));
    assert!(lines[0].contains("Second"));
    assert_eq!(
        harness.app.board.active_map().map(|map| map.name()),
        Some("Second")
    );

    harness.press(KeyCode::Tab);
    assert_eq!(
        harness.app.board.active_map().map(|map| map.name()),
        Some("My Mind Map")
    );

    harness.press(KeyCode::Char('X'));
    harness.press(KeyCode::Char('n'));
    assert_eq!(harness.toast(), Some("Kept map"));
    assert_eq!(harness.app.board.workspace().maps().len(), 2);

    harness.press(KeyCode::Char('X'));
    assert!(harness.render()[29].contains("y/n"));
    harness.press(KeyCode::Char('y'));
    assert_eq!(harness.app.board.workspace().maps().len(), 1);
    assert_eq!(
        harness.app.board.active_map().map(|map| map.name()),
        Some("Second")
    );
}

#[rstest]
fn deleting_the_last_map_shows_the_empty_state(mut harness: Harness) {
    harness.press(KeyCode::Char('X'));
    harness.press(KeyCode::Char('y'));
    let lines = harness.render();
    assert!(lines.iter().any(|line| line.contains("Press n to create one")));
    assert!(lines[28].contains("0 nodes"));
}

#[rstest]
fn grid_settings_are_edited_through_keys(mut harness: Harness) {
    harness.press(KeyCode::Char('g'));
    assert_eq!(harness.toast(), Some("Snap to grid on"));

    harness.press(KeyCode::Char('G'));
    harness.press(KeyCode::Backspace);
    harness.press(KeyCode::Backspace);
    harness.type_text("40");
    harness.press(KeyCode::Enter);
    assert_eq!(harness.app.board.settings().grid_size(), 40);

    harness.press(KeyCode::Char('G'));
    harness.type_text("x");
    harness.press(KeyCode::Enter);
    assert_eq!(harness.toast(), Some("Grid size must be a whole number"));
    assert_eq!(harness.app.board.settings().grid_size(), 40);
}

#[rstest]
fn export_then_import_through_prompts(mut harness: Harness) {
    harness.press(KeyCode::Char('e'));
    harness.press(KeyCode::Enter);
    let path = harness.dir.path().join("my_mind_map_mindmap.json");
    assert!(path.is_file());

    let doc = harness.dir.path().join("plans.json");
    std::fs::write(
        &doc,
        r#"{"id":"77","name":"Plans","nodes":[{"id":"root","text":"Hub","x":0,"y":0}]}"#,
    )
    .expect("write");
    harness.press(KeyCode::Char('i'));
    harness.type_text(&doc.display().to_string());
    harness.press(KeyCode::Enter);

    assert_eq!(harness.toast(), Some("Imported Plans"));
    assert_eq!(harness.app.board.workspace().maps().len(), 2);
    let map = harness.app.board.active_map().expect("map");
    assert_eq!(map.root().map(|root| root.text()), Some("Hub"));
    assert_eq!(harness.app.board.selected(), None);
}

#[rstest]
fn failed_import_keeps_the_workspace(mut harness: Harness) {
    let before = harness.app.board.workspace().clone();
    harness.press(KeyCode::Char('i'));
    harness.type_text("/definitely/missing.json");
    harness.press(KeyCode::Enter);

    assert!(harness.toast().is_some_and(|toast| toast.starts_with("cannot read")));
    assert_eq!(harness.app.board.workspace(), &before);
}

#[rstest]
fn centering_brings_the_selection_into_view(mut harness: Harness) {
    harness.press(KeyCode::Char('L'));
    harness.press(KeyCode::Char('L'));
    assert_eq!(harness.app.viewport.origin(), Point::new(80.0, 0.0));

    harness.press(KeyCode::Char('0'));
    let root = harness
        .app
        .board
        .active_map()
        .and_then(|map| map.node(&NodeId::root()))
        .map(|root| root.center())
        .expect("root");
    let area = harness.app.canvas_area;
    assert_eq!(
        harness.app.viewport.map_to_screen(area, root),
        Some((area.x + area.width / 2, area.y + area.height / 2))
    );
}

#[rstest]
fn quit_keys_stop_the_loop(mut harness: Harness) {
    harness.press(KeyCode::Char('q'));
    assert!(harness.app.should_quit);

    harness.app.should_quit = false;
    harness
        .app
        .handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(harness.app.should_quit);
}
