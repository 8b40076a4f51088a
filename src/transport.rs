//! One-shot TCP sessions with a bulb.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use serde_json::Value;

use crate::errors::Error;
use crate::history::{MessageHistory, MessageType};
use crate::ids::{IdGenerator, RandomIds};
use crate::message::{self, Command, Param};
use crate::runtime::{self, AsyncTcpStream, Mutex, TcpStream};

type Result<T> = std::result::Result<T, Error>;

/// Default read buffer size; bulb responses are a few hundred bytes at most.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 4096;

/// Minimum read buffer size.
pub const MIN_READ_BUFFER_SIZE: usize = 256;

/// Maximum read buffer size.
pub const MAX_READ_BUFFER_SIZE: usize = 64 * 1024;

/// Timeouts and buffer sizing for each session.
///
/// A `None` timeout waits forever, which lets an unresponsive bulb stall the
/// caller indefinitely.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Limit on establishing the TCP connection.
    pub connect_timeout: Option<Duration>,
    /// Limit on writing the command, and separately on reading the response.
    pub io_timeout: Option<Duration>,
    /// Upper bound on the bytes read for one response.
    pub read_buffer_size: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TransportConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new() -> Self {
        Self {
            connect_timeout: Some(Self::DEFAULT_TIMEOUT),
            io_timeout: Some(Self::DEFAULT_TIMEOUT),
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_io_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.io_timeout = timeout;
        self
    }

    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.clamp(MIN_READ_BUFFER_SIZE, MAX_READ_BUFFER_SIZE);
        self
    }
}

/// Sends commands to a single bulb, one TCP connection per command.
///
/// Nothing is shared between invocations except the identifier source and
/// the diagnostic history, so a `Transport` can be used from several tasks at
/// once. Concurrent invocations against the same bulb are not ordered.
///
/// # Example
///
/// ```
/// use yeelight_rs::Transport;
///
/// let transport = Transport::new("192.168.1.50", Transport::DEFAULT_PORT);
/// assert_eq!(transport.addr(), "192.168.1.50:55443");
///
/// let v6 = Transport::new("fe80::1", 55443);
/// assert_eq!(v6.addr(), "[fe80::1]:55443");
/// ```
#[derive(Debug, Clone)]
pub struct Transport {
    addr: String,
    config: TransportConfig,
    ids: Arc<dyn IdGenerator>,
    history: Arc<Mutex<MessageHistory>>,
}

impl Transport {
    pub const DEFAULT_PORT: u16 = 55443;

    pub fn new(host: &str, port: u16) -> Self {
        let addr = match host.parse::<IpAddr>() {
            Ok(ip) => SocketAddr::new(ip, port).to_string(),
            Err(_) => format!("{host}:{port}"),
        };
        Transport {
            addr,
            config: TransportConfig::new(),
            ids: Arc::new(RandomIds),
            history: Arc::new(Mutex::new(MessageHistory::new())),
        }
    }

    pub fn with_config(mut self, config: TransportConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the identifier source, e.g. with
    /// [`SequentialIds`](crate::SequentialIds) for predictable ids.
    pub fn with_id_generator<G: IdGenerator + 'static>(mut self, ids: G) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    pub async fn history(&self) -> MessageHistory {
        self.history.lock().await.clone()
    }

    pub async fn clear_history(&self) {
        self.history.lock().await.clear();
    }

    /// Send `method` with `params` and wait for the matching result.
    ///
    /// Opens a fresh connection, writes the command, reads one response and
    /// closes the connection again whether or not any step failed. Failures
    /// are returned as is; nothing is retried.
    pub async fn invoke(&self, method: &str, params: Vec<Param>) -> Result<Vec<Value>> {
        let command = Command::new(self.ids.next_id(), method, params);
        let request = command.encode();

        debug!("sending to {}: {}", self.addr, request.trim_end());
        self.history
            .lock()
            .await
            .record(MessageType::Send, command.id(), method, &request);

        let outcome = match self.exchange(request.as_bytes()).await {
            Ok(raw) => {
                let text = String::from_utf8_lossy(&raw);
                debug!("received from {}: {}", self.addr, text.trim_end());
                self.history
                    .lock()
                    .await
                    .record(MessageType::Receive, command.id(), method, &text);
                message::decode(&raw, &command)
            }
            Err(e) => Err(e),
        };

        if let Err(e) = &outcome {
            warn!("{} to {} failed: {}", command, self.addr, e);
            self.history.lock().await.record_error(&e.to_string());
        }
        outcome
    }

    /// Connect, write `request`, read one frame. The stream is dropped, and
    /// therefore closed, on every path out of this function.
    async fn exchange(&self, request: &[u8]) -> Result<Vec<u8>> {
        let mut stream = runtime::maybe_timeout(
            self.config.connect_timeout,
            TcpStream::connect(&self.addr),
        )
        .await
        .map_err(|e| Error::connect(&self.addr, e.into()))?
        .map_err(|e| Error::connect(&self.addr, e))?;

        runtime::maybe_timeout(self.config.io_timeout, stream.write_all(request))
            .await
            .map_err(|e| Error::Write(e.into()))?
            .map_err(Error::Write)?;

        let response = runtime::maybe_timeout(
            self.config.io_timeout,
            read_frame(&mut stream, self.config.read_buffer_size),
        )
        .await
        .map_err(|e| Error::Read(e.into()))?
        .map_err(Error::Read)?;

        Ok(response)
    }
}

/// Read until a line feed, a complete JSON value, EOF, or a full buffer.
async fn read_frame(stream: &mut TcpStream, capacity: usize) -> std::io::Result<Vec<u8>> {
    let mut buffer = vec![0u8; capacity];
    let mut filled = 0;

    while filled < buffer.len() {
        let n = stream.read(&mut buffer[filled..]).await?;
        if n == 0 {
            break;
        }
        let complete =
            buffer[filled..filled + n].contains(&b'\n') || holds_json_value(&buffer[..filled + n]);
        filled += n;
        if complete {
            break;
        }
    }

    if filled == 0 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "connection closed before a response arrived",
        ));
    }
    buffer.truncate(filled);
    Ok(buffer)
}

/// Whether `bytes` starts with a whole JSON value, for replies sent without
/// a line terminator.
fn holds_json_value(bytes: &[u8]) -> bool {
    matches!(
        serde_json::Deserializer::from_slice(bytes)
            .into_iter::<Value>()
            .next(),
        Some(Ok(_))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use serde_json::json;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Accepts one connection, reads the command line and answers with
    /// whatever `reply` builds from it. Resolves to the received line.
    async fn fake_bulb<F>(reply: F) -> (SocketAddr, JoinHandle<String>)
    where
        F: FnOnce(&Value) -> Option<String> + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let (read_half, mut write_half) = socket.into_split();
            let mut line = String::new();
            BufReader::new(read_half).read_line(&mut line).await.unwrap();
            let request: Value = serde_json::from_str(line.trim_end()).unwrap();
            match reply(&request) {
                Some(response) => write_half.write_all(response.as_bytes()).await.unwrap(),
                // Hold the connection open without answering
                None => tokio::time::sleep(Duration::from_secs(10)).await,
            }
            line
        });
        (addr, handle)
    }

    fn transport(addr: SocketAddr, first_id: u16) -> Transport {
        Transport::new(&addr.ip().to_string(), addr.port())
            .with_id_generator(SequentialIds::starting_at(first_id))
            .with_config(
                TransportConfig::new()
                    .with_connect_timeout(Some(Duration::from_millis(500)))
                    .with_io_timeout(Some(Duration::from_millis(300))),
            )
    }

    #[tokio::test]
    async fn test_invoke_returns_result() {
        let (addr, bulb) = fake_bulb(|req| {
            Some(format!("{{\"id\":{},\"result\":[\"ok\"]}}\r\n", req["id"]))
        })
        .await;

        let transport = transport(addr, 12345);
        let params = vec![Param::from("on"), Param::from("sudden"), Param::from(30)];
        let result = transport.invoke("set_power", params).await.unwrap();
        assert_eq!(result, vec![json!("ok")]);

        let line = bulb.await.unwrap();
        assert_eq!(
            line,
            "{\"id\":12345,\"method\":\"set_power\",\"params\":[\"on\", \"sudden\", 30]}\r\n"
        );
    }

    #[tokio::test]
    async fn test_get_prop_result_is_positional() {
        let (addr, _bulb) = fake_bulb(|req| {
            Some(format!("{{\"id\":{},\"result\":[\"on\",\"100\"]}}\r\n", req["id"]))
        })
        .await;

        let names = ["power", "bright"];
        let params = names.iter().map(|n| Param::from(*n)).collect();
        let result = transport(addr, 7).invoke("get_prop", params).await.unwrap();

        let zipped: Vec<(&str, &Value)> = names.iter().copied().zip(result.iter()).collect();
        assert_eq!(zipped, vec![("power", &json!("on")), ("bright", &json!("100"))]);
    }

    #[tokio::test]
    async fn test_invoke_mismatched_id() {
        let (addr, _bulb) = fake_bulb(|_| Some("{\"id\":1,\"result\":[\"ok\"]}\r\n".into())).await;

        let err = transport(addr, 12345)
            .invoke("toggle", Vec::new())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            Error::Mismatch {
                expected: 12345,
                received: 1
            }
        );
    }

    #[tokio::test]
    async fn test_invoke_device_error() {
        let (addr, _bulb) = fake_bulb(|req| {
            Some(format!(
                "{{\"id\":{},\"error\":{{\"code\":1,\"message\":\"general error\"}}}}\r\n",
                req["id"]
            ))
        })
        .await;

        let transport = transport(addr, 12345);
        let params = vec![Param::from("on"), Param::from("sudden"), Param::from(30)];
        let err = transport.invoke("set_power", params).await.unwrap_err();

        match &err {
            Error::Protocol {
                code,
                message,
                command,
            } => {
                assert_eq!(*code, 1);
                assert_eq!(message, "general error");
                assert!(command.contains("set_power"));
                assert!(command.contains("12345"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let history = transport.history().await;
        assert_eq!(history.summary().send_count, 1);
        assert_eq!(history.summary().receive_count, 1);
        assert!(history.last_error().unwrap().contains("general error"));
    }

    #[tokio::test]
    async fn test_invoke_times_out_on_silent_bulb() {
        let (addr, _bulb) = fake_bulb(|_| None).await;

        let err = transport(addr, 1)
            .invoke("get_prop", vec![Param::from("power")])
            .await
            .unwrap_err();
        match err {
            Error::Read(e) => assert_eq!(e.kind(), std::io::ErrorKind::TimedOut),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invoke_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = transport(addr, 1)
            .invoke("toggle", Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Connect { .. }));
    }

    #[tokio::test]
    async fn test_invoke_peer_closes_without_reply() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut line = String::new();
            BufReader::new(socket).read_line(&mut line).await.unwrap();
        });

        let err = transport(addr, 1)
            .invoke("toggle", Vec::new())
            .await
            .unwrap_err();
        match err {
            Error::Read(e) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invoke_accepts_unterminated_reply() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let (read_half, mut write_half) = socket.into_split();
            let mut line = String::new();
            BufReader::new(read_half).read_line(&mut line).await.unwrap();
            let request: Value = serde_json::from_str(line.trim_end()).unwrap();
            let reply = format!("{{\"id\":{},\"result\":[\"ok\"]}}", request["id"]);
            write_half.write_all(reply.as_bytes()).await.unwrap();
            // Keep the socket open so only the JSON itself can end the read
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        let result = transport(addr, 42).invoke("toggle", Vec::new()).await;
        assert_eq!(result, Ok(vec![json!("ok")]));
    }

    #[test]
    fn test_holds_json_value() {
        assert!(holds_json_value(br#"{"id":1,"result":["ok"]}"#));
        assert!(holds_json_value(b"{\"id\":1,\"result\":[]}\r\n{\"id\""));
        assert!(!holds_json_value(br#"{"id":1,"result":["o"#));
        assert!(!holds_json_value(b""));
    }

    #[tokio::test]
    async fn test_clear_history() {
        let (addr, _bulb) = fake_bulb(|req| {
            Some(format!("{{\"id\":{},\"result\":[\"ok\"]}}\r\n", req["id"]))
        })
        .await;

        let transport = transport(addr, 3);
        transport.invoke("toggle", Vec::new()).await.unwrap();
        assert_eq!(transport.history().await.len(), 2);

        transport.clear_history().await;
        let history = transport.history().await;
        assert!(history.is_empty());
        assert_eq!(history.last_error(), None);
    }

    #[test]
    fn test_read_buffer_size_is_clamped() {
        let config = TransportConfig::new().with_read_buffer_size(1);
        assert_eq!(config.read_buffer_size, MIN_READ_BUFFER_SIZE);
        let config = TransportConfig::new().with_read_buffer_size(usize::MAX);
        assert_eq!(config.read_buffer_size, MAX_READ_BUFFER_SIZE);
    }
}
