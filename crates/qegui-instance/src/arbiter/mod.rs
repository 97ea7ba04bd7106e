//! Decide whether this process owns the instance channel or hands off to
//! the process that does.
//!
//! Ownership comes from a successful bind, not a lock file. A socket left
//! behind by a crashed owner is removed before binding, but only after a
//! second connect attempt confirms nobody answers on it.


use std::path::{Path, PathBuf};
use std::time::Duration;

use qegui_common::{new_correlation_id, ChannelError};
use qegui_config::schema::InstanceSettings;
use qegui_config::StartupParams;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::channel::ChannelName;
use crate::codec;

#[cfg(unix)]
use tokio::io::{AsyncReadExt, AsyncWriteExt};
#[cfg(unix)]
use tokio::net::{UnixListener, UnixStream};

/// Largest payload the owner will read from one connection.
const MAX_PAYLOAD_BYTES: u64 = 1 << 20;

#[derive(Debug, Clone)]
pub struct ArbiterConfig {
    /// Directory holding the channel endpoint.
    pub dir: PathBuf,
    pub connect_timeout: Duration,
    pub handoff_timeout: Duration,
}

impl ArbiterConfig {
    pub fn from_settings(settings: &InstanceSettings) -> Self {
        Self {
            dir: settings
                .channel_dir
                .clone()
                .unwrap_or_else(qegui_config::paths::runtime_dir),
            connect_timeout: Duration::from_millis(u64::from(settings.connect_timeout_ms)),
            handoff_timeout: Duration::from_millis(u64::from(settings.handoff_timeout_ms)),
        }
    }
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self::from_settings(&InstanceSettings::default())
    }
}

/// Outcome of arbitration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// This process listens for other instances.
    Owner,
    /// Another process owns the channel; hand off and exit.
    Client,
    /// No channel could be set up; run alone.
    Standalone,
}

enum State {
    #[cfg(unix)]
    Owner {
        listener: UnixListener,
        path: PathBuf,
    },
    #[cfg(unix)]
    Client { stream: UnixStream },
    Standalone,
}

pub struct InstanceArbiter {
    name: ChannelName,
    config: ArbiterConfig,
    state: State,
}

impl InstanceArbiter {
    /// Connect to an existing owner, or become the owner.
    pub async fn probe(name: ChannelName, config: ArbiterConfig) -> Self {
        let state = probe_state(&name, &config).await;
        let arbiter = Self {
            name,
            config,
            state,
        };
        info!(channel = %arbiter.name, role = ?arbiter.role(), "Instance arbitration complete");
        arbiter
    }

    pub fn role(&self) -> Role {
        match self.state {
            #[cfg(unix)]
            State::Owner { .. } => Role::Owner,
            #[cfg(unix)]
            State::Client { .. } => Role::Client,
            State::Standalone => Role::Standalone,
        }
    }

    pub fn channel(&self) -> &ChannelName {
        &self.name
    }

    /// Send `params` to the owning instance.
    ///
    /// `Ok(false)` when this process is not a client. `Ok(true)` once the
    /// payload is written and the stream shut down; the caller should exit.
    pub async fn handball(&mut self, params: &StartupParams) -> Result<bool, ChannelError> {
        match &mut self.state {
            #[cfg(unix)]
            State::Client { stream } => {
                let payload = codec::encode(params)?;
                let write = async {
                    stream.write_all(&payload).await?;
                    stream.flush().await?;
                    stream.shutdown().await
                };
                match tokio::time::timeout(self.config.handoff_timeout, write).await {
                    Ok(Ok(())) => {
                        info!(
                            channel = %self.name,
                            bytes = payload.len(),
                            "Startup parameters handed to running instance"
                        );
                        Ok(true)
                    }
                    Ok(Err(e)) => Err(ChannelError::Write(e)),
                    Err(_) => Err(ChannelError::WriteTimeout(
                        self.config.handoff_timeout.as_millis() as u64,
                    )),
                }
            }
            _ => Ok(false),
        }
    }

    /// As owner, start accepting handed-off parameters on the current
    /// runtime. Each payload that decodes is sent to `sender`.
    ///
    /// `None` unless this process is the owner.
    pub fn listen(self, sender: mpsc::Sender<StartupParams>) -> Option<OwnerHandle> {
        match self.state {
            #[cfg(unix)]
            State::Owner { listener, path } => {
                let timeout = self.config.handoff_timeout;
                let task = tokio::spawn(accept_loop(listener, sender, timeout));
                info!(channel = %self.name, path = %path.display(), "Listening for other instances");
                Some(OwnerHandle { task, path })
            }
            _ => None,
        }
    }
}

/// Keeps the owner's accept loop alive. Dropping it stops the loop and
/// removes the endpoint.
pub struct OwnerHandle {
    task: JoinHandle<()>,
    path: PathBuf,
}

impl OwnerHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for OwnerHandle {
    fn drop(&mut self) {
        self.task.abort();
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "Failed to remove instance channel");
            }
        }
    }
}

#[cfg(unix)]
async fn probe_state(name: &ChannelName, config: &ArbiterConfig) -> State {
    let path = name.socket_path(&config.dir);

    if let Some(stream) = connect(&path, config.connect_timeout).await {
        return State::Client { stream };
    }

    if let Err(e) = std::fs::create_dir_all(&config.dir) {
        warn!(dir = %config.dir.display(), error = %e, "Cannot create channel directory, running standalone");
        return State::Standalone;
    }

    match UnixListener::bind(&path) {
        Ok(listener) => return State::Owner { listener, path },
        Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
            debug!(path = %path.display(), "Channel endpoint exists, probing again");
        }
        Err(e) => return standalone(name, e),
    }

    // Another process may have bound between our connect and bind.
    if let Some(stream) = connect(&path, config.connect_timeout).await {
        return State::Client { stream };
    }

    info!(path = %path.display(), "Removing stale instance channel");
    if let Err(e) = std::fs::remove_file(&path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            return standalone(name, e);
        }
    }

    match UnixListener::bind(&path) {
        Ok(listener) => State::Owner { listener, path },
        Err(e) => standalone(name, e),
    }
}

#[cfg(not(unix))]
async fn probe_state(name: &ChannelName, _config: &ArbiterConfig) -> State {
    let err = ChannelError::NotSupported(std::env::consts::OS.to_string());
    warn!(channel = %name, error = %err, "Running standalone");
    State::Standalone
}

#[cfg(unix)]
fn standalone(name: &ChannelName, source: std::io::Error) -> State {
    let err = ChannelError::Bind {
        name: name.to_string(),
        source,
    };
    warn!(error = %err, "Running standalone");
    State::Standalone
}

#[cfg(unix)]
async fn connect(path: &Path, timeout: Duration) -> Option<UnixStream> {
    match tokio::time::timeout(timeout, UnixStream::connect(path)).await {
        Ok(Ok(stream)) => Some(stream),
        Ok(Err(e)) => {
            debug!(path = %path.display(), error = %e, "No running instance");
            None
        }
        Err(_) => {
            debug!(path = %path.display(), "Running instance did not answer in time");
            None
        }
    }
}

#[cfg(unix)]
async fn accept_loop(
    listener: UnixListener,
    sender: mpsc::Sender<StartupParams>,
    timeout: Duration,
) {
    loop {
        match listener.accept().await {
            Ok((stream, _addr)) => {
                let sender = sender.clone();
                tokio::spawn(async move {
                    receive_params(stream, sender, timeout).await;
                });
            }
            Err(e) => {
                warn!(error = %e, "Instance channel accept error");
            }
        }
    }
}

#[cfg(unix)]
async fn receive_params(stream: UnixStream, sender: mpsc::Sender<StartupParams>, timeout: Duration) {
    let cid = new_correlation_id();
    let mut payload = Vec::new();
    let mut limited = stream.take(MAX_PAYLOAD_BYTES);

    match tokio::time::timeout(timeout, limited.read_to_end(&mut payload)).await {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => {
            warn!(cid = %cid, error = %e, "Failed reading handed-off parameters");
            return;
        }
        Err(_) => {
            warn!(cid = %cid, "Timed out reading handed-off parameters");
            return;
        }
    }

    // A sibling that probed but did not hand off closes without writing.
    if payload.is_empty() {
        debug!(cid = %cid, "Instance connection closed without parameters");
        return;
    }

    match codec::decode(&payload) {
        Ok(params) => {
            info!(
                cid = %cid,
                files = params.filenames.len(),
                restore = params.restore,
                "Received startup parameters from another instance"
            );
            if sender.send(params).await.is_err() {
                debug!(cid = %cid, "Event loop gone, dropping parameters");
            }
        }
        Err(e) => {
            warn!(cid = %cid, bytes = payload.len(), error = %e, "Discarding startup parameters");
        }
    }
}
