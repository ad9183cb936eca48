//! Remote collector sink speaking GELF 1.1 over UDP.
//!
//! # Responsibilities
//! - Encode records as GELF JSON documents
//! - Split large payloads into GELF chunks
//! - Push datagrams to the configured collector
//!
//! # Design Decisions
//! - Nothing is resolved or bound at construction; a bad address shows up
//!   only as lost records
//! - Payloads are sent uncompressed
//! - On any socket error the cached socket is dropped and rebuilt on the
//!   next record
//! - A failed resolve is not retried for [`RESOLVE_BACKOFF`]; records in
//!   that window are dropped without touching DNS

use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use rand::Rng;
use serde_json::{json, Value};

use crate::engine::level::Level;
use crate::engine::record::LogRecord;
use crate::sinks::Sink;

/// Largest datagram sent, chunk header included.
pub const CHUNK_SIZE: usize = 1420;
/// GELF limit on the number of chunks per message.
pub const MAX_CHUNKS: usize = 128;

/// Wait after a failed resolve before trying again.
pub const RESOLVE_BACKOFF: Duration = Duration::from_secs(30);

const CHUNK_MAGIC: [u8; 2] = [0x1e, 0x0f];
const CHUNK_HEADER_LEN: usize = 12;

/// Pushes records to a GELF collector.
pub struct GelfSink {
    address: String,
    host: String,
    backoff: Duration,
    link: Mutex<Link>,
    resolves: AtomicUsize,
}

enum Link {
    Idle,
    Ready(UdpSocket, SocketAddr),
    Failed(Instant),
}

impl GelfSink {
    pub fn new(server: &str, port: u16) -> Self {
        Self::with_backoff(server, port, RESOLVE_BACKOFF)
    }

    pub fn with_backoff(server: &str, port: u16, backoff: Duration) -> Self {
        Self {
            address: format!("{}:{}", server, port),
            host: local_host_name(),
            backoff,
            link: Mutex::new(Link::Idle),
            resolves: AtomicUsize::new(0),
        }
    }

    /// `host:port` of the collector.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Number of times the collector address has been resolved.
    pub fn resolve_count(&self) -> usize {
        self.resolves.load(Ordering::Relaxed)
    }

    /// GELF document for `record`.
    pub fn document(&self, record: &LogRecord) -> Value {
        let short_message = record.message.lines().next().unwrap_or_default();
        let mut doc = json!({
            "version": "1.1",
            "host": self.host,
            "short_message": short_message,
            "timestamp": record.timestamp.timestamp_millis() as f64 / 1000.0,
            "level": syslog_severity(record.level),
            "_level": record.level.tag(),
            "_target": record.target,
        });
        if short_message.len() != record.message.len() {
            doc["full_message"] = Value::from(record.message.as_str());
        }
        if let Some(log_id) = &record.log_id {
            doc["_log_id"] = Value::from(log_id.as_str());
        }
        if let Some(env) = record.environment {
            doc["_env"] = Value::from(env.as_str());
        }
        doc
    }

    fn send(&self, payload: &[u8]) -> io::Result<()> {
        let Some(datagrams) = chunk(payload, rand::thread_rng().gen()) else {
            // Over the chunk limit; GELF servers would discard it anyway.
            return Ok(());
        };

        let mut link = self.link.lock().unwrap_or_else(|e| e.into_inner());
        match *link {
            Link::Failed(at) if at.elapsed() < self.backoff => return Ok(()),
            Link::Ready(..) => {}
            _ => match self.connect() {
                Ok((socket, peer)) => *link = Link::Ready(socket, peer),
                Err(err) => {
                    *link = Link::Failed(Instant::now());
                    return Err(err);
                }
            },
        }
        let Link::Ready(socket, peer) = &*link else {
            return Ok(());
        };

        let sent = datagrams
            .iter()
            .try_for_each(|datagram| socket.send_to(datagram, peer).map(|_| ()));
        if sent.is_err() {
            *link = Link::Idle;
        }
        sent
    }

    fn connect(&self) -> io::Result<(UdpSocket, SocketAddr)> {
        self.resolves.fetch_add(1, Ordering::Relaxed);
        let peer = self
            .address
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "collector address did not resolve"))?;
        let bind = if peer.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        Ok((UdpSocket::bind(bind)?, peer))
    }
}

impl Sink for GelfSink {
    fn deliver(&self, record: &LogRecord) {
        if let Ok(payload) = serde_json::to_vec(&self.document(record)) {
            let _ = self.send(&payload);
        }
    }
}

/// Syslog severity used as the GELF `level`.
pub fn syslog_severity(level: Level) -> u8 {
    match level {
        Level::Debug => 7,
        Level::Info => 6,
        Level::Warn => 4,
        Level::Error => 3,
        Level::Fatal => 2,
    }
}

/// Split `payload` into datagrams.
///
/// Payloads that fit in one datagram are sent as is. Returns `None` when
/// the payload needs more than [`MAX_CHUNKS`] chunks.
pub fn chunk(payload: &[u8], message_id: [u8; 8]) -> Option<Vec<Vec<u8>>> {
    if payload.len() <= CHUNK_SIZE {
        return Some(vec![payload.to_vec()]);
    }

    let body = CHUNK_SIZE - CHUNK_HEADER_LEN;
    let count = payload.len().div_ceil(body);
    if count > MAX_CHUNKS {
        return None;
    }

    let datagrams = payload
        .chunks(body)
        .enumerate()
        .map(|(seq, part)| {
            let mut datagram = Vec::with_capacity(CHUNK_HEADER_LEN + part.len());
            datagram.extend_from_slice(&CHUNK_MAGIC);
            datagram.extend_from_slice(&message_id);
            datagram.push(seq as u8);
            datagram.push(count as u8);
            datagram.extend_from_slice(part);
            datagram
        })
        .collect();
    Some(datagrams)
}

fn local_host_name() -> String {
    std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .unwrap_or_else(|_| "localhost".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Environment, LogId};

    #[test]
    fn test_document_fields() {
        let sink = GelfSink::new("127.0.0.1", 12201);
        let id = LogId::generate();
        let mut record = LogRecord::new(Level::Error, "boom\nstack line");
        record.log_id = Some(id.clone());
        record.environment = Some(Environment::Prod);

        let doc = sink.document(&record);
        assert_eq!(doc["version"], "1.1");
        assert_eq!(doc["short_message"], "boom");
        assert_eq!(doc["full_message"], "boom\nstack line");
        assert_eq!(doc["level"], 3);
        assert_eq!(doc["_level"], "Erro");
        assert_eq!(doc["_log_id"], id.as_str());
        assert_eq!(doc["_env"], "prod");
    }

    #[test]
    fn test_single_line_has_no_full_message() {
        let sink = GelfSink::new("127.0.0.1", 12201);
        let doc = sink.document(&LogRecord::new(Level::Info, "hello"));
        assert!(doc.get("full_message").is_none());
        assert!(doc.get("_log_id").is_none());
    }

    #[test]
    fn test_small_payload_is_not_chunked() {
        let datagrams = chunk(b"{}", [0; 8]).unwrap();
        assert_eq!(datagrams, vec![b"{}".to_vec()]);
    }

    #[test]
    fn test_chunk_headers() {
        let payload = vec![b'x'; CHUNK_SIZE * 2];
        let id = [1, 2, 3, 4, 5, 6, 7, 8];
        let datagrams = chunk(&payload, id).unwrap();

        assert_eq!(datagrams.len(), 3);
        for (seq, datagram) in datagrams.iter().enumerate() {
            assert!(datagram.len() <= CHUNK_SIZE);
            assert_eq!(&datagram[..2], &CHUNK_MAGIC);
            assert_eq!(&datagram[2..10], &id);
            assert_eq!(datagram[10] as usize, seq);
            assert_eq!(datagram[11], 3);
        }
        let body: usize = datagrams.iter().map(|d| d.len() - CHUNK_HEADER_LEN).sum();
        assert_eq!(body, payload.len());
    }

    #[test]
    fn test_oversized_payload_is_dropped() {
        let payload = vec![b'x'; (CHUNK_SIZE - CHUNK_HEADER_LEN) * MAX_CHUNKS + 1];
        assert!(chunk(&payload, [0; 8]).is_none());
    }

    #[test]
    fn test_delivers_to_collector() {
        let collector = UdpSocket::bind("127.0.0.1:0").unwrap();
        collector
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let port = collector.local_addr().unwrap().port();

        let sink = GelfSink::new("127.0.0.1", port);
        sink.deliver(&LogRecord::new(Level::Warn, "over the wire"));

        let mut buf = [0u8; CHUNK_SIZE];
        let (len, _) = collector.recv_from(&mut buf).unwrap();
        let doc: Value = serde_json::from_slice(&buf[..len]).unwrap();
        assert_eq!(doc["short_message"], "over the wire");
        assert_eq!(doc["level"], 4);
    }

    #[test]
    fn test_unresolvable_collector_is_silent() {
        let sink = GelfSink::new("collector.invalid", 12201);
        sink.deliver(&LogRecord::new(Level::Info, "lost"));
        assert_eq!(sink.address(), "collector.invalid:12201");
    }

    #[test]
    fn test_failed_resolve_is_not_repeated_per_record() {
        let sink = GelfSink::new("collector.invalid", 12201);
        sink.deliver(&LogRecord::new(Level::Info, "first"));
        sink.deliver(&LogRecord::new(Level::Error, "second"));
        assert_eq!(sink.resolve_count(), 1);
    }

    #[test]
    fn test_resolve_retried_after_backoff() {
        let sink = GelfSink::with_backoff("collector.invalid", 12201, Duration::ZERO);
        sink.deliver(&LogRecord::new(Level::Info, "first"));
        sink.deliver(&LogRecord::new(Level::Info, "second"));
        assert_eq!(sink.resolve_count(), 2);
    }

    #[test]
    fn test_resolved_collector_resolves_once() {
        let collector = UdpSocket::bind("127.0.0.1:0").unwrap();
        let port = collector.local_addr().unwrap().port();

        let sink = GelfSink::new("127.0.0.1", port);
        for _ in 0..3 {
            sink.deliver(&LogRecord::new(Level::Info, "steady"));
        }
        assert_eq!(sink.resolve_count(), 1);
    }
}
