use bracket_geometry::prelude::Rect;
use bracket_terminal::prelude::*;

use crate::encounter::dice::Roller;
use crate::encounter::log::{EventLog, LogEntry, LogSource};
use crate::encounter::{EncounterState, Room, RunMode};
use crate::session::Session;

type Color = (u8, u8, u8);

const HEADER_ROWS: i32 = 3;
const GAME_PANEL_WIDTH: i32 = 52;
const TOP_PANEL_HEIGHT: i32 = 24;

struct Layout {
    game: Rect,
    controls: Rect,
    log: Rect,
}

impl Layout {
    fn for_console(width: i32, height: i32) -> Self {
        let top = HEADER_ROWS;
        let game = Rect::with_size(0, top, GAME_PANEL_WIDTH, TOP_PANEL_HEIGHT);
        let controls = Rect::with_size(
            GAME_PANEL_WIDTH + 1,
            top,
            width - GAME_PANEL_WIDTH - 2,
            TOP_PANEL_HEIGHT,
        );
        let log_top = top + TOP_PANEL_HEIGHT + 1;
        let log = Rect::with_size(0, log_top, width - 1, height - log_top - 1);
        Self {
            game,
            controls,
            log,
        }
    }
}

pub fn status_label(running: bool, loading: bool, room: Room) -> &'static str {
    if loading {
        "THINKING..."
    } else if running {
        "ACTIVE"
    } else if room == Room::Complete {
        "COMPLETED"
    } else {
        "IDLE"
    }
}

pub fn source_color(source: LogSource) -> Color {
    match source {
        LogSource::Bot => LIGHT_GREEN,
        LogSource::System => LIGHT_BLUE,
        LogSource::Model => MAGENTA,
        LogSource::Error => RED,
    }
}

/// Cuts `text` to at most `width` characters, marking the cut with `~`.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(width - 1).collect();
    cut.push('~');
    cut
}

pub fn format_entry(entry: &LogEntry) -> String {
    format!(
        "{} [{}] {}",
        entry.timestamp,
        entry.source.as_str(),
        entry.message
    )
}

fn health_color(current: i32, max: i32) -> Color {
    if max <= 0 || current * 100 <= max * 30 {
        ORANGE
    } else if current * 100 <= max * 60 {
        YELLOW
    } else {
        GREEN
    }
}

pub fn draw<R: Roller>(ctx: &mut BTerm, session: &Session<R>, frame: u64) {
    let (width, height) = ctx.get_char_size();
    let layout = Layout::for_console(width as i32, height as i32);

    ctx.print_color_centered(
        1,
        RGB::named(RED),
        RGB::named(BLACK),
        "Theatre of Blood Bot",
    );

    draw_game_screen(ctx, &layout.game, session, frame);
    draw_control_panel(ctx, &layout.controls, session);
    draw_log(ctx, &layout.log, session.log());
}

fn draw_game_screen<R: Roller>(ctx: &mut BTerm, area: &Rect, session: &Session<R>, frame: u64) {
    ctx.draw_box(
        area.x1,
        area.y1,
        area.width(),
        area.height(),
        RGB::named(GRAY),
        RGB::named(BLACK),
    );
    let inner_x = area.x1 + 2;
    let inner_w = area.width() - 4;

    if session.mode() == RunMode::PluginBridge {
        let mid = area.y1 + area.height() / 2;
        ctx.print_color(
            inner_x,
            mid - 1,
            RGB::named(YELLOW),
            RGB::named(BLACK),
            "Plugin bridge mode",
        );
        ctx.print_color(
            inner_x,
            mid,
            RGB::named(GRAY),
            RGB::named(BLACK),
            truncate(
                "Waiting for game state from an external plugin...",
                inner_w as usize,
            ),
        );
        return;
    }

    let state = session.state();
    match state.current_room {
        Room::Idle => {
            ctx.print_color(
                inner_x,
                area.y1 + 2,
                RGB::named(WHITE),
                RGB::named(BLACK),
                "Press S to begin a Theatre of Blood run.",
            );
        }
        Room::Complete => {
            ctx.print_color(
                inner_x,
                area.y1 + 2,
                RGB::named(GOLD),
                RGB::named(BLACK),
                "Theatre Complete!",
            );
        }
        _ => draw_boss(ctx, inner_x, area.y1 + 2, inner_w, state),
    }
    draw_player(ctx, inner_x, area.y2 - 6, inner_w, state);

    if session.is_running() {
        let glyph = ['|', '/', '-', '\\'][(frame / 8 % 4) as usize];
        ctx.set(
            area.x2 - 2,
            area.y1 + 1,
            RGB::named(LIGHT_GREEN),
            RGB::named(BLACK),
            to_cp437(glyph),
        );
    }
}

fn draw_boss(ctx: &mut BTerm, x: i32, y: i32, width: i32, state: &EncounterState) {
    let boss = &state.boss;
    ctx.print_color(
        x,
        y,
        RGB::named(RED),
        RGB::named(BLACK),
        truncate(boss.name.as_str(), width as usize),
    );
    ctx.draw_bar_horizontal(
        x,
        y + 1,
        width,
        boss.health,
        boss.max_health,
        RGB::named(RED),
        RGB::named(DARK_GRAY),
    );
    ctx.print_color(
        x,
        y + 2,
        RGB::named(WHITE),
        RGB::named(BLACK),
        format!(
            "{}/{} ({}%)",
            boss.health,
            boss.max_health,
            boss.percent()
        ),
    );
}

fn draw_player(ctx: &mut BTerm, x: i32, y: i32, width: i32, state: &EncounterState) {
    let player = &state.player;
    let label_w = 12;
    let bar_w = width - label_w;

    ctx.print_color(
        x,
        y,
        RGB::named(health_color(player.health, player.max_health)),
        RGB::named(BLACK),
        format!("HP {:>3}/{:<3}", player.health, player.max_health),
    );
    ctx.draw_bar_horizontal(
        x + label_w,
        y,
        bar_w,
        player.health,
        player.max_health,
        RGB::named(GREEN),
        RGB::named(DARK_GRAY),
    );

    ctx.print_color(
        x,
        y + 2,
        RGB::named(CYAN),
        RGB::named(BLACK),
        format!("PR {:>3}/{:<3}", player.prayer, player.max_prayer),
    );
    ctx.draw_bar_horizontal(
        x + label_w,
        y + 2,
        bar_w,
        player.prayer,
        player.max_prayer,
        RGB::named(CYAN),
        RGB::named(DARK_GRAY),
    );

    ctx.print_color(
        x,
        y + 4,
        RGB::named(WHITE),
        RGB::named(BLACK),
        format!("Gear: {}", player.current_gear),
    );
}

fn draw_control_panel<R: Roller>(ctx: &mut BTerm, area: &Rect, session: &Session<R>) {
    ctx.draw_box(
        area.x1,
        area.y1,
        area.width(),
        area.height(),
        RGB::named(GRAY),
        RGB::named(BLACK),
    );
    let x = area.x1 + 2;
    let width = (area.width() - 4) as usize;
    let state = session.state();
    let status = status_label(session.is_running(), session.is_loading(), state.current_room);
    let status_color = match status {
        "ACTIVE" => LIGHT_GREEN,
        "THINKING..." => YELLOW,
        "COMPLETED" => GOLD,
        _ => GRAY,
    };

    ctx.print_color(x, area.y1 + 1, RGB::named(WHITE), RGB::named(BLACK), "Control Panel");
    ctx.print_color(x, area.y1 + 3, RGB::named(GRAY), RGB::named(BLACK), "STATUS");
    ctx.print_color(x, area.y1 + 4, RGB::named(status_color), RGB::named(BLACK), status);
    ctx.print_color(x, area.y1 + 6, RGB::named(GRAY), RGB::named(BLACK), "ROOM");
    ctx.print_color(
        x,
        area.y1 + 7,
        RGB::named(WHITE),
        RGB::named(BLACK),
        truncate(state.current_room.as_str(), width),
    );
    ctx.print_color(x, area.y1 + 9, RGB::named(GRAY), RGB::named(BLACK), "MODE");
    ctx.print_color(
        x,
        area.y1 + 10,
        RGB::named(WHITE),
        RGB::named(BLACK),
        truncate(session.mode().as_str(), width),
    );

    let start_label = if matches!(state.current_room, Room::Idle | Room::Complete) {
        "[S] Start run"
    } else {
        "[S] Resume"
    };
    let keys = [start_label, "[X] Stop", "[M] Toggle mode", "[Q] Quit"];
    for (row, key) in keys.iter().enumerate() {
        ctx.print_color(
            x,
            area.y2 - 5 + row as i32,
            RGB::named(LIGHT_BLUE),
            RGB::named(BLACK),
            *key,
        );
    }
}

pub fn draw_log(ctx: &mut BTerm, area: &Rect, log: &EventLog) {
    ctx.draw_box(
        area.x1,
        area.y1,
        area.width(),
        area.height(),
        RGB::named(DARK_GRAY),
        RGB::named(BLACK),
    );
    ctx.print_color(
        area.x1 + 2,
        area.y1 + 1,
        RGB::named(WHITE),
        RGB::named(BLACK),
        "Event Log",
    );

    let rows = (area.height() - 3).max(0) as usize;
    let width = (area.width() - 3).max(0) as usize;
    for (row, entry) in log.tail(rows).iter().enumerate() {
        ctx.print_color(
            area.x1 + 2,
            area.y1 + 2 + row as i32,
            RGB::named(source_color(entry.source)),
            RGB::named(BLACK),
            truncate(&format_entry(entry), width),
        );
    }
}
