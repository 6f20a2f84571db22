//! Terminal-free runner: starts a simulation run immediately and streams the
//! event log to stdout until the run completes or wipes.

use std::io::{self, Write};
use std::time::Instant;

use crate::agent::{DecisionReply, DecisionWorker};
use crate::encounter::Room;
use crate::encounter::dice::Roller;
use crate::encounter::resolver::TickStatus;
use crate::render::format_entry;
use crate::session::Session;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u32,
    pub furthest_room: Room,
    pub status: Option<TickStatus>,
}

pub fn run<R: Roller>(session: &mut Session<R>, worker: &DecisionWorker) -> anyhow::Result<RunSummary> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with_output(session, worker, &mut out)
}

pub fn run_with_output<R: Roller, W: Write>(
    session: &mut Session<R>,
    worker: &DecisionWorker,
    out: &mut W,
) -> anyhow::Result<RunSummary> {
    let mut printed = 0;
    print_new_entries(session, out, &mut printed)?;

    if !session.state().current_room.is_fight() {
        // Starting from idle clears the log.
        printed = 0;
    }
    session.start(Instant::now());
    print_new_entries(session, out, &mut printed)?;

    let mut summary = RunSummary {
        ticks: 0,
        furthest_room: session.state().current_room,
        status: None,
    };

    while session.is_running() {
        if let Some(due) = session.next_tick_at() {
            let now = Instant::now();
            if due > now {
                std::thread::sleep(due - now);
            }
        }
        let Some(request) = session.poll_due(Instant::now()) else {
            continue;
        };
        print_new_entries(session, out, &mut printed)?;

        let id = request.id;
        let reply = match worker.submit(request).and_then(|()| worker.wait_reply()) {
            Ok(reply) => reply,
            Err(err) => {
                tracing::error!("decision worker unavailable: {err}");
                DecisionReply::fallback(id, err.to_string())
            }
        };

        let status = session.apply_decision(reply, Instant::now());
        print_new_entries(session, out, &mut printed)?;
        summary.ticks += 1;
        if let Some(status) = status {
            summary.status = Some(status);
            match status {
                TickStatus::RoomCleared(room) => summary.furthest_room = room,
                TickStatus::Complete => summary.furthest_room = Room::Complete,
                TickStatus::Continue | TickStatus::Wiped => {}
            }
        }
    }

    out.flush()?;
    tracing::info!(
        ticks = summary.ticks,
        furthest = %summary.furthest_room,
        "headless run finished"
    );
    Ok(summary)
}

fn print_new_entries<R: Roller, W: Write>(
    session: &Session<R>,
    out: &mut W,
    printed: &mut usize,
) -> io::Result<()> {
    let entries = session.log().entries();
    if entries.len() < *printed {
        *printed = 0;
    }
    for entry in &entries[*printed..] {
        writeln!(out, "{}", format_entry(entry))?;
    }
    *printed = entries.len();
    Ok(())
}
