//! Listening endpoint and the connections it hands out.
//!
//! One endpoint lives for the whole process and serves many sequential
//! connections. Targets are either a Unix domain socket path or a TCP
//! socket address.

use crate::error::{IngestError, Result};
use log::{debug, info, warn};
use std::convert::Infallible;
use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::str::FromStr;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};
use tokio::net::{TcpListener, TcpStream, UnixListener, UnixStream};

/// Where the endpoint listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindTarget {
    Unix(PathBuf),
    Tcp(SocketAddr),
}

impl FromStr for BindTarget {
    type Err = Infallible;

    /// Anything that parses as a socket address is TCP, everything else
    /// is a filesystem path.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.parse::<SocketAddr>() {
            Ok(addr) => BindTarget::Tcp(addr),
            Err(_) => BindTarget::Unix(PathBuf::from(s)),
        })
    }
}

impl fmt::Display for BindTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindTarget::Unix(path) => write!(f, "unix:{}", path.display()),
            BindTarget::Tcp(addr) => write!(f, "tcp:{}", addr),
        }
    }
}

#[derive(Debug)]
enum Listener {
    Unix(UnixListener),
    Tcp(TcpListener),
}

/// A bound listener. Dropping a Unix endpoint removes its socket file.
#[derive(Debug)]
pub struct Endpoint {
    listener: Listener,
    target: BindTarget,
}

impl Endpoint {
    /// Claims the target. Fails if it is already in use or not accessible;
    /// an existing file at a Unix path is left alone.
    pub async fn bind(target: &BindTarget) -> Result<Self> {
        let bind_error = |source: io::Error| IngestError::Bind {
            target: target.to_string(),
            source,
        };

        let (listener, target) = match target {
            BindTarget::Unix(path) => {
                let listener = UnixListener::bind(path).map_err(bind_error)?;
                (Listener::Unix(listener), target.clone())
            }
            BindTarget::Tcp(addr) => {
                let listener = TcpListener::bind(addr).await.map_err(bind_error)?;
                let local = listener.local_addr().map_err(bind_error)?;
                (Listener::Tcp(listener), BindTarget::Tcp(local))
            }
        };

        info!("Listening on {}", target);
        Ok(Endpoint { listener, target })
    }

    /// Waits for the next peer.
    pub async fn accept(&self) -> Result<Connection> {
        let connection = match &self.listener {
            Listener::Unix(listener) => {
                let (stream, _) = listener.accept().await.map_err(IngestError::Accept)?;
                Connection {
                    stream: Stream::Unix(stream),
                    peer: "unix peer".to_string(),
                }
            }
            Listener::Tcp(listener) => {
                let (stream, addr) = listener.accept().await.map_err(IngestError::Accept)?;
                Connection {
                    stream: Stream::Tcp(stream),
                    peer: addr.to_string(),
                }
            }
        };

        debug!("Accepted connection from {}", connection.peer);
        Ok(connection)
    }

    /// The bound target, with the real port filled in for `tcp:...:0`.
    pub fn local_target(&self) -> &BindTarget {
        &self.target
    }

    pub fn socket_path(&self) -> Option<&Path> {
        match &self.target {
            BindTarget::Unix(path) => Some(path),
            BindTarget::Tcp(_) => None,
        }
    }
}

impl Drop for Endpoint {
    fn drop(&mut self) {
        if let Some(path) = self.socket_path() {
            match std::fs::remove_file(path) {
                Ok(()) => debug!("Removed socket file {}", path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to remove socket file {}: {}", path.display(), e),
            }
        }
    }
}

#[derive(Debug)]
enum Stream {
    Unix(UnixStream),
    Tcp(TcpStream),
}

/// One accepted peer. Closed when dropped.
#[derive(Debug)]
pub struct Connection {
    stream: Stream,
    peer: String,
}

impl Connection {
    pub fn peer(&self) -> &str {
        &self.peer
    }
}

impl AsyncRead for Connection {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match &mut self.get_mut().stream {
            Stream::Unix(stream) => Pin::new(stream).poll_read(cx, buf),
            Stream::Tcp(stream) => Pin::new(stream).poll_read(cx, buf),
        }
    }
}
