use std::ffi::OsStr;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::process::{Command, Output};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

pub struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawn a lightweight HTTP server answering every request with `status`.
///
/// Returns `None` when the environment forbids binding a local listener.
///
/// # Errors
///
/// Returns an error if the listener cannot be configured.
pub fn spawn_http_server_or_skip(
    status: u16,
) -> Result<Option<(String, ServerHandle)>, String> {
    let listener = match TcpListener::bind("127.0.0.1:0") {
        Ok(listener) => listener,
        Err(_) => return Ok(None),
    };
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    thread::spawn(move || handle_client(stream, status));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(_) => break,
            }
        }
    });

    Ok(Some((
        format!("http://{}", addr),
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
        },
    )))
}

fn handle_client(mut stream: TcpStream, status: u16) {
    let mut buffer = [0u8; 1024];
    if stream.read(&mut buffer).is_err() {
        return;
    }
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        _ => "Status",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: 2\r\nConnection: close\r\n\r\nOK",
        status, reason
    );
    if stream.write_all(response.as_bytes()).is_err() {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

/// Reserve a local port that no one is listening on.
///
/// Returns `None` when the environment forbids binding a probe listener.
///
/// # Errors
///
/// Returns an error if the probe listener address cannot be read.
pub fn closed_port_url() -> Result<Option<String>, String> {
    let listener = match TcpListener::bind("127.0.0.1:0") {
        Ok(listener) => listener,
        Err(_) => return Ok(None),
    };
    let addr = listener
        .local_addr()
        .map_err(|err| format!("probe addr failed: {}", err))?;
    drop(listener);
    Ok(Some(format!("http://{}/", addr)))
}

/// Run the `gust` binary and capture output.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_gust<I, S>(args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = gust_bin()?;
    Command::new(bin)
        .args(args)
        .env("RUST_LOG", "error")
        .output()
        .map_err(|err| format!("run gust failed: {}", err))
}

fn gust_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_gust").map_or_else(
        || Err("CARGO_BIN_EXE_gust missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}

/// Find the report line starting with `label` and return its numeric field.
///
/// # Errors
///
/// Returns an error when the line is missing or not numeric.
pub fn report_count(stdout: &str, label: &str) -> Result<u64, String> {
    let line = stdout
        .lines()
        .find(|line| line.starts_with(label))
        .ok_or_else(|| format!("missing report line '{}' in:\n{}", label, stdout))?;
    let tail = line
        .get(label.len()..)
        .ok_or_else(|| format!("malformed report line: {}", line))?;
    let number = tail
        .split_whitespace()
        .next()
        .ok_or_else(|| format!("no value on report line: {}", line))?;
    number
        .parse()
        .map_err(|err| format!("bad value '{}' on line '{}': {}", number, line, err))
}
