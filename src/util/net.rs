//! Listener binding with port fallback

use std::io::ErrorKind;
use std::net::{IpAddr, SocketAddr};

use tokio::net::TcpListener;
use tracing::{info, warn};

/// Errors from the bind loop
#[derive(Debug, thiserror::Error)]
pub enum BindError {
    #[error("No free port in {first}..={last}")]
    Exhausted { first: u16, last: u16 },

    #[error("Failed to bind: {0}")]
    Io(#[from] std::io::Error),
}

/// Bind a TCP listener, walking up from `port` when the port is taken.
///
/// Ports that are in use are skipped with a warning, up to `max_attempts`
/// tries in total; any other bind error aborts immediately. Returns the
/// listener together with the address it actually bound.
pub async fn bind_with_fallback(
    host: IpAddr,
    port: u16,
    max_attempts: u16,
) -> Result<(TcpListener, SocketAddr), BindError> {
    let mut candidate = port;
    for _ in 0..max_attempts {
        let addr = SocketAddr::new(host, candidate);
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                let bound = listener.local_addr()?;
                if candidate != port {
                    info!(requested = port, bound = bound.port(), "Bound to fallback port");
                }
                return Ok((listener, bound));
            }
            Err(e) if e.kind() == ErrorKind::AddrInUse => {
                warn!(port = candidate, "Port is busy, trying the next one");
                candidate = candidate.checked_add(1).ok_or(BindError::Exhausted {
                    first: port,
                    last: candidate,
                })?;
            }
            Err(e) => return Err(BindError::Io(e)),
        }
    }

    Err(BindError::Exhausted {
        first: port,
        last: candidate.saturating_sub(1),
    })
}
