//! Newline-delimited JSON event source

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::GatewayResult;
use crate::events::GatewayEvent;

/// Parse one event per line and forward it to the dispatcher.
///
/// Blank lines are skipped; malformed lines are logged and skipped. Stops at
/// end of input or when the dispatcher goes away. Returns the number of
/// events forwarded.
pub async fn forward_lines<R>(reader: R, events: mpsc::Sender<GatewayEvent>) -> GatewayResult<u64>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut forwarded = 0;
    let mut line_no = 0u64;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event = match serde_json::from_str::<GatewayEvent>(line) {
            Ok(event) => event,
            Err(e) => {
                warn!(line = line_no, error = %e, "Skipping malformed event");
                continue;
            }
        };

        if events.send(event).await.is_err() {
            debug!("Dispatcher closed, stopping event source");
            break;
        }
        forwarded += 1;
    }

    Ok(forwarded)
}
