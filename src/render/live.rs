use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::pet::Mood;
use crate::storage::Store;

/// Granularity at which the loop notices a shutdown request.
const POLL_SLICE: Duration = Duration::from_millis(200);

/// Render the persisted pet until `shutdown` is set, then say goodbye.
pub fn run_loop<W: Write>(
    out: &mut W,
    store: &Store,
    poll_interval: Duration,
    frame_delay: Duration,
    shutdown: Arc<AtomicBool>,
) -> std::io::Result<()> {
    tracing::info!(
        state = %store.state_path().display(),
        poll_ms = poll_interval.as_millis() as u64,
        "pet loop started"
    );

    while !shutdown.load(Ordering::SeqCst) {
        let mood = match store.load() {
            Ok(Some(state)) => state.mood,
            Ok(None) => Mood::Neutral,
            Err(e) => {
                tracing::warn!(error = %e, "could not read pet state");
                Mood::Neutral
            }
        };
        super::render_once(out, mood, frame_delay)?;

        let slices = (poll_interval.as_millis() / POLL_SLICE.as_millis()).max(1);
        for _ in 0..slices {
            if shutdown.load(Ordering::SeqCst) {
                break;
            }
            thread::sleep(POLL_SLICE.min(poll_interval));
        }
    }

    super::play(out, super::EXIT_FRAMES, frame_delay.min(Duration::from_millis(250)))?;
    tracing::info!("pet loop stopped");
    Ok(())
}
