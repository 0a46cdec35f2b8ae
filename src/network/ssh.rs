// file: src/network/ssh.rs
// version: 1.0.0
// guid: e1f2a3b4-c5d6-7890-1234-567890efabcd

//! SSH client for remote deployment operations

use super::remote::{
    CancelToken, Connect, ExecutionResult, ProgressFn, RemoteHost, TransferUnit,
};
use crate::config::{AuthConfig, TargetHost};
use crate::error::DeployError;
use crate::Result;
use ssh2::{
    Channel, CheckResult, HostKeyType, KnownHostFileKind, KnownHostKeyFormat, PtyModeOpcode,
    PtyModes, Session,
};
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const COPY_CHUNK_SIZE: usize = 32 * 1024;

/// SSH client for remote operations on one target host
pub struct SshClient {
    session: Option<Session>,
    host: String,
    run_timeout: Option<Duration>,
    cancel: CancelToken,
}

impl SshClient {
    /// Connect and authenticate to the target host.
    ///
    /// Host identity follows a trust-on-first-use policy: unseen host keys
    /// are accepted and appended to `~/.ssh/known_hosts`, while a key that
    /// contradicts a remembered one aborts the connection. This is a
    /// low-security default suited to throwaway deployment targets.
    pub fn connect(target: &TargetHost, cancel: CancelToken) -> Result<Self> {
        info!(
            "Connecting to {}@{}:{}",
            target.username, target.host, target.port
        );

        let addr = (target.host.as_str(), target.port)
            .to_socket_addrs()
            .map_err(|e| {
                DeployError::connectivity(format!("Failed to resolve {}: {}", target.host, e))
            })?
            .next()
            .ok_or_else(|| {
                DeployError::connectivity(format!("No address found for {}", target.host))
            })?;

        let timeout = Duration::from_secs(target.connect_timeout_secs);
        let tcp = TcpStream::connect_timeout(&addr, timeout).map_err(|e| {
            DeployError::connectivity(format!("Failed to connect to {}: {}", target.host, e))
        })?;

        let mut session = Session::new().map_err(|e| {
            DeployError::connectivity(format!("Failed to create SSH session: {}", e))
        })?;

        session.set_tcp_stream(tcp);
        session.set_timeout(timeout.as_millis() as u32);
        session
            .handshake()
            .map_err(|e| DeployError::connectivity(format!("SSH handshake failed: {}", e)))?;

        verify_host_key(&session, &target.host, target.port)?;

        match &target.auth {
            AuthConfig::Password { password } => {
                session
                    .userauth_password(&target.username, password)
                    .map_err(|e| {
                        DeployError::authentication(format!(
                            "Password rejected for {}: {}",
                            target.username, e
                        ))
                    })?;
            }
            AuthConfig::Key {
                key_file,
                passphrase,
            } => {
                let expanded = shellexpand::tilde(&key_file.to_string_lossy()).into_owned();
                session
                    .userauth_pubkey_file(
                        &target.username,
                        None,
                        Path::new(&expanded),
                        passphrase.as_deref(),
                    )
                    .map_err(|e| {
                        DeployError::authentication(format!(
                            "Key authentication failed for {}: {}",
                            target.username, e
                        ))
                    })?;
            }
        }

        if !session.authenticated() {
            return Err(DeployError::authentication(
                "Credentials rejected by server".to_string(),
            ));
        }

        // Connect timeout no longer applies; the run timeout is enforced
        // per-read in run_script.
        session.set_timeout(0);

        info!("SSH connection established to {}", target.host);
        Ok(Self {
            session: Some(session),
            host: target.host.clone(),
            run_timeout: target.run_timeout_secs.map(Duration::from_secs),
            cancel,
        })
    }

    fn session(&self) -> Result<&Session> {
        self.session
            .as_ref()
            .ok_or_else(|| DeployError::connectivity("No active SSH session".to_string()))
    }

    /// Disconnect the session. Idempotent; also invoked from `Drop`.
    pub fn disconnect(&mut self) {
        if let Some(session) = self.session.take() {
            let _ = session.disconnect(None, "deployment finished", None);
            info!("SSH session to {} closed", self.host);
        }
    }
}

impl RemoteHost for SshClient {
    fn upload(&mut self, unit: &TransferUnit<'_>) -> Result<()> {
        let file_name = unit.local_path.display().to_string();
        info!("Uploading {} to {}:{}", file_name, self.host, unit.remote_path);

        // Local checks before touching the network
        let metadata = std::fs::metadata(&unit.local_path).map_err(|e| {
            DeployError::transfer(&file_name, format!("local file not readable: {}", e))
        })?;
        let total = metadata.len();

        let mut local = File::open(&unit.local_path)
            .map_err(|e| DeployError::transfer(&file_name, format!("failed to open: {}", e)))?;

        let session = self.session()?;
        let mut remote = session
            .scp_send(Path::new(&unit.remote_path), 0o644, total, None)
            .map_err(|e| {
                DeployError::transfer(&file_name, format!("failed to open SCP channel: {}", e))
            })?;

        copy_with_progress(&mut local, &mut remote, total, unit.progress, &self.cancel).map_err(
            |e| match e {
                DeployError::Cancelled => DeployError::Cancelled,
                other => DeployError::transfer(&file_name, other.to_string()),
            },
        )?;

        remote
            .send_eof()
            .map_err(|e| DeployError::transfer(&file_name, format!("failed to send EOF: {}", e)))?;
        remote.wait_eof().map_err(|e| {
            DeployError::transfer(&file_name, format!("failed to wait for EOF: {}", e))
        })?;
        remote
            .close()
            .map_err(|e| DeployError::transfer(&file_name, format!("failed to close: {}", e)))?;
        remote.wait_close().map_err(|e| {
            DeployError::transfer(&file_name, format!("failed to wait for close: {}", e))
        })?;

        info!("Upload completed ({} bytes)", total);
        Ok(())
    }

    fn set_executable(&mut self, remote_path: &str) -> Result<()> {
        debug!("Marking {} executable", remote_path);

        let session = self.session()?;
        let mut channel = session.channel_session().map_err(|e| {
            DeployError::transfer(remote_path, format!("failed to open channel: {}", e))
        })?;

        channel
            .exec(&format!("chmod +x {}", shell_quote(remote_path)))
            .map_err(|e| DeployError::transfer(remote_path, format!("chmod failed: {}", e)))?;
        channel.wait_close().map_err(|e| {
            DeployError::transfer(remote_path, format!("failed to close channel: {}", e))
        })?;

        let exit_status = channel.exit_status().map_err(|e| {
            DeployError::transfer(remote_path, format!("failed to get exit status: {}", e))
        })?;

        if exit_status != 0 {
            return Err(DeployError::transfer(
                remote_path,
                format!("chmod exited with {}", exit_status),
            ));
        }

        Ok(())
    }

    fn run_script(
        &mut self,
        remote_path: &str,
        stdin_payload: &str,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<ExecutionResult> {
        let run_timeout = self.run_timeout;
        let session = self.session()?;

        if let Some(timeout) = run_timeout {
            // Caps any single blocking read; the wall-clock deadline in
            // pump_output caps the run as a whole, so the effective bound is
            // the deadline plus at most one read's budget.
            session.set_timeout(timeout.as_millis().min(u32::MAX as u128) as u32);
        }

        let mut channel = session.channel_session().map_err(|e| {
            DeployError::connectivity(format!("Failed to open exec channel: {}", e))
        })?;

        // A PTY merges stderr into the stream and makes the script's
        // line-buffered prompts resolve as they would interactively. The
        // server-side line discipline defaults to echoing stdin back, which
        // would put the wallet secret into the output stream, so echo is
        // switched off in the terminal modes.
        let mut pty_modes = PtyModes::new();
        pty_modes.set_boolean(PtyModeOpcode::ECHO, false);
        channel
            .request_pty("xterm", Some(pty_modes), None)
            .map_err(|e| DeployError::connectivity(format!("Failed to request PTY: {}", e)))?;

        let command = format!("bash {}", shell_quote(remote_path));
        info!("Executing remote install: {}", command);
        channel
            .exec(&command)
            .map_err(|e| DeployError::connectivity(format!("Failed to execute script: {}", e)))?;

        channel.write_all(stdin_payload.as_bytes()).map_err(|e| {
            DeployError::connectivity(format!("Failed to write script input: {}", e))
        })?;
        channel
            .send_eof()
            .map_err(|e| DeployError::connectivity(format!("Failed to send EOF: {}", e)))?;

        let mut stream = ScriptStream::new(channel);
        let output = pump_output(&mut stream, &self.cancel, run_timeout, on_line)?;

        let exit_code = stream.finish()?;
        debug!("Remote script exited with {}", exit_code);

        Ok(ExecutionResult { exit_code, output })
    }

    fn close(&mut self) {
        self.disconnect();
    }
}

impl Drop for SshClient {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Connector producing real SSH sessions
pub struct SshConnector {
    cancel: CancelToken,
}

impl SshConnector {
    pub fn new(cancel: CancelToken) -> Self {
        Self { cancel }
    }
}

impl Connect for SshConnector {
    type Host = SshClient;

    fn connect(&self, target: &TargetHost) -> Result<SshClient> {
        SshClient::connect(target, self.cancel.clone())
    }
}

/// Lazy, finite stream of output lines from a remote channel.
///
/// Yields lines as they arrive (no buffering of the whole run), renders
/// non-UTF-8 bytes lossily instead of aborting, and terminates when the
/// remote process closes its output. Not restartable.
pub struct ScriptStream<R: Read> {
    reader: BufReader<R>,
    buf: Vec<u8>,
}

impl<R: Read> ScriptStream<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
            buf: Vec::new(),
        }
    }
}

impl<R: Read> Iterator for ScriptStream<R> {
    type Item = std::io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                let text = String::from_utf8_lossy(&self.buf);
                Some(Ok(text.trim_end_matches(&['\r', '\n'][..]).to_string()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

impl ScriptStream<Channel> {
    /// Close the channel and return the remote exit status
    pub fn finish(self) -> Result<i32> {
        let mut channel = self.reader.into_inner();
        channel
            .wait_close()
            .map_err(|e| DeployError::connectivity(format!("Failed to close channel: {}", e)))?;
        channel
            .exit_status()
            .map_err(|e| DeployError::connectivity(format!("Failed to get exit status: {}", e)))
    }
}

/// Drain a script's output stream line by line, honoring cancellation and
/// an optional wall-clock deadline on the run. Returns the accumulated
/// output text.
fn pump_output<R: Read>(
    stream: &mut ScriptStream<R>,
    cancel: &CancelToken,
    run_timeout: Option<Duration>,
    on_line: &mut dyn FnMut(&str),
) -> Result<String> {
    let deadline = run_timeout.map(|t| Instant::now() + t);
    let timed_out = || {
        DeployError::Timeout(format!(
            "install run exceeded {}s",
            run_timeout.unwrap_or_default().as_secs()
        ))
    };

    let mut output = String::new();
    while let Some(line) = stream.next() {
        cancel.check()?;
        if deadline.is_some_and(|d| Instant::now() > d) {
            return Err(timed_out());
        }

        let line = line.map_err(|e| {
            if deadline.is_some_and(|d| Instant::now() > d) {
                timed_out()
            } else {
                DeployError::connectivity(format!("Output stream interrupted: {}", e))
            }
        })?;

        on_line(&line);
        output.push_str(&line);
        output.push('\n');
    }

    Ok(output)
}

/// Single-quote a path for interpolation into a remote shell command
fn shell_quote(path: &str) -> String {
    format!("'{}'", path.replace('\'', r"'\''"))
}

/// Copy `reader` into `writer` in chunks, reporting progress and honoring
/// cancellation between chunks. The callback always receives a final call
/// with `sent == total` once the copy is complete.
fn copy_with_progress<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    total: u64,
    progress: Option<ProgressFn<'_>>,
    cancel: &CancelToken,
) -> Result<u64> {
    let mut buf = [0u8; COPY_CHUNK_SIZE];
    let mut sent: u64 = 0;

    loop {
        cancel.check()?;
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        writer.write_all(&buf[..n])?;
        sent += n as u64;
        if let Some(cb) = progress {
            cb(sent, total);
        }
    }

    if let Some(cb) = progress {
        cb(sent, total);
    }
    Ok(sent)
}

/// Trust-on-first-use host identity check against `~/.ssh/known_hosts`
fn verify_host_key(session: &Session, host: &str, port: u16) -> Result<()> {
    let (key, key_type) = session.host_key().ok_or_else(|| {
        DeployError::connectivity("Server did not present a host key".to_string())
    })?;

    let mut known_hosts = session
        .known_hosts()
        .map_err(|e| DeployError::connectivity(format!("Failed to init known hosts: {}", e)))?;

    let path = known_hosts_path();
    if let Some(path) = &path {
        if path.exists() {
            known_hosts
                .read_file(path, KnownHostFileKind::OpenSSH)
                .map_err(|e| {
                    DeployError::connectivity(format!(
                        "Failed to read {}: {}",
                        path.display(),
                        e
                    ))
                })?;
        }
    }

    match known_hosts.check_port(host, port, key) {
        CheckResult::Match => Ok(()),
        CheckResult::Mismatch => Err(DeployError::connectivity(format!(
            "Host key for {} does not match the remembered key; refusing to connect",
            host
        ))),
        CheckResult::NotFound | CheckResult::Failure => {
            let entry = if port == 22 {
                host.to_string()
            } else {
                format!("[{}]:{}", host, port)
            };
            known_hosts
                .add(&entry, key, "vps-deploy-agent", host_key_format(key_type))
                .map_err(|e| {
                    DeployError::connectivity(format!("Failed to remember host key: {}", e))
                })?;

            if let Some(path) = &path {
                if let Some(dir) = path.parent() {
                    let _ = std::fs::create_dir_all(dir);
                }
                if let Err(e) = known_hosts.write_file(path, KnownHostFileKind::OpenSSH) {
                    warn!("Could not persist host key to {}: {}", path.display(), e);
                }
            }

            info!("Trusting new host key for {} (first use)", host);
            Ok(())
        }
    }
}

fn known_hosts_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ssh").join("known_hosts"))
}

fn host_key_format(key_type: HostKeyType) -> KnownHostKeyFormat {
    match key_type {
        HostKeyType::Rsa => KnownHostKeyFormat::SshRsa,
        HostKeyType::Dss => KnownHostKeyFormat::SshDss,
        HostKeyType::Ecdsa256 => KnownHostKeyFormat::Ecdsa256,
        HostKeyType::Ecdsa384 => KnownHostKeyFormat::Ecdsa384,
        HostKeyType::Ecdsa521 => KnownHostKeyFormat::Ecdsa521,
        HostKeyType::Ed25519 => KnownHostKeyFormat::Ed25519,
        _ => KnownHostKeyFormat::Unknown,
    }
}
