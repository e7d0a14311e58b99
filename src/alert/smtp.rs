//! SMTP transport
//!
//! Speaks just enough SMTP to hand one message to a relay: EHLO, STARTTLS
//! whenever the server offers it, `AUTH PLAIN`, MAIL FROM, RCPT TO, DATA and
//! QUIT. Credentials only travel over TLS, or in the clear to a loopback
//! relay.

use super::{EmailConfig, Envelope, MailTransport};
use crate::core::{LoggerError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, RootCertStore, StreamOwned};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{IpAddr, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// When the session must be encrypted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Upgrade with STARTTLS when the server advertises it
    #[default]
    Opportunistic,
    /// Give up unless the server advertises STARTTLS
    Required,
}

/// Delivers alerts to an SMTP relay over TCP
///
/// # Example
///
/// ```no_run
/// use tracelog::alert::{EmailConfig, SmtpTransport};
///
/// let config =
///     EmailConfig::new("smtp.example.com", 587, "alerts@example.com", "pw", ["ops@example.com"]);
/// let transport = SmtpTransport::from_config(&config);
/// ```
#[derive(Debug, Clone)]
pub struct SmtpTransport {
    host: String,
    port: u16,
    address: String,
    credentials: Option<(String, String)>,
    hello_name: String,
    timeout: Duration,
    tls: TlsMode,
}

impl SmtpTransport {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port,
            address: format!("{}:{}", host, port),
            credentials: None,
            hello_name: "localhost".to_string(),
            timeout: DEFAULT_TIMEOUT,
            tls: TlsMode::default(),
        }
    }

    /// Transport for the server and account in `config`
    pub fn from_config(config: &EmailConfig) -> Self {
        let transport = Self::new(&config.host, config.port);
        if config.username.is_empty() {
            transport
        } else {
            transport.with_credentials(&config.username, &config.password)
        }
    }

    #[must_use]
    pub fn with_credentials(mut self, username: &str, password: &str) -> Self {
        self.credentials = Some((username.to_string(), password.to_string()));
        self
    }

    /// Connect, read and write timeout. Default: 10 seconds
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_hello_name(mut self, name: impl Into<String>) -> Self {
        self.hello_name = name.into();
        self
    }

    #[must_use]
    pub fn with_tls(mut self, mode: TlsMode) -> Self {
        self.tls = mode;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Try every resolved address in turn, each bounded by the timeout
    fn connect(&self) -> Result<Session> {
        let failed = |e: io::Error| {
            LoggerError::io_operation("connecting to mail server", self.address.clone(), e)
        };

        let mut last_error = io::Error::new(io::ErrorKind::NotFound, "no address resolved");
        for addr in (self.host.as_str(), self.port).to_socket_addrs().map_err(failed)? {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => {
                    stream.set_write_timeout(Some(self.timeout))?;
                    stream.set_read_timeout(Some(self.timeout))?;
                    stream.set_nodelay(true)?;
                    return Ok(Session::new(Connection::Plain(stream)));
                }
                Err(err) => last_error = err,
            }
        }
        Err(failed(last_error))
    }
}

impl MailTransport for SmtpTransport {
    fn send(&self, envelope: &Envelope<'_>) -> Result<()> {
        let mut session = self.connect()?;
        session.expect(&[220])?;

        let ehlo = format!("EHLO {}", self.hello_name);
        let mut hello = session.command(&ehlo, &[250])?;
        if hello.advertises("STARTTLS") {
            session.command("STARTTLS", &[220])?;
            session = session.start_tls(&self.host)?;
            hello = session.command(&ehlo, &[250])?;
        } else if self.tls == TlsMode::Required {
            return Err(LoggerError::smtp(
                0,
                format!("{} does not offer STARTTLS", self.address),
            ));
        }

        if let Some((username, password)) = &self.credentials {
            if !session.is_encrypted() && !is_loopback(&self.host) {
                return Err(LoggerError::InsecureAuth {
                    host: self.host.clone(),
                });
            }
            if !hello.advertises("AUTH") {
                return Err(LoggerError::smtp(0, "server does not support AUTH"));
            }
            let token = STANDARD.encode(format!("\0{}\0{}", username, password));
            session.command(&format!("AUTH PLAIN {}", token), &[235])?;
        }

        session.command(&format!("MAIL FROM:<{}>", envelope.from), &[250])?;
        for recipient in envelope.to {
            session.command(&format!("RCPT TO:<{}>", recipient), &[250, 251])?;
        }
        session.command("DATA", &[354])?;
        session.data(envelope.body)?;

        // The message is accepted at this point.
        let _ = session.command("QUIT", &[221]);
        Ok(())
    }
}

/// Relays on this machine may receive credentials without TLS
fn is_loopback(host: &str) -> bool {
    let host = host.trim_start_matches('[').trim_end_matches(']');
    host.eq_ignore_ascii_case("localhost")
        || host.parse::<IpAddr>().is_ok_and(|ip| ip.is_loopback())
}

fn tls_config() -> Result<Arc<ClientConfig>> {
    let roots = RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()?
        .with_root_certificates(roots)
        .with_no_client_auth();
    Ok(Arc::new(config))
}

struct Reply {
    code: u16,
    lines: Vec<String>,
}

impl Reply {
    fn advertises(&self, keyword: &str) -> bool {
        self.lines
            .iter()
            .any(|line| line.to_uppercase().starts_with(keyword))
    }
}

enum Connection {
    Plain(TcpStream),
    Tls(Box<StreamOwned<ClientConnection, TcpStream>>),
}

impl Read for Connection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Connection::Plain(stream) => stream.read(buf),
            Connection::Tls(stream) => stream.read(buf),
        }
    }
}

impl Write for Connection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Connection::Plain(stream) => stream.write(buf),
            Connection::Tls(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Connection::Plain(stream) => stream.flush(),
            Connection::Tls(stream) => stream.flush(),
        }
    }
}

struct Session {
    stream: BufReader<Connection>,
}

impl Session {
    fn new(connection: Connection) -> Self {
        Self {
            stream: BufReader::new(connection),
        }
    }

    fn is_encrypted(&self) -> bool {
        matches!(self.stream.get_ref(), Connection::Tls(_))
    }

    /// Complete the TLS handshake on the connection after `STARTTLS`
    fn start_tls(self, host: &str) -> Result<Session> {
        // Anything already buffered arrived in the clear
        if !self.stream.buffer().is_empty() {
            return Err(LoggerError::smtp(0, "unexpected data after STARTTLS"));
        }
        let tcp = match self.stream.into_inner() {
            Connection::Plain(tcp) => tcp,
            encrypted @ Connection::Tls(_) => return Ok(Session::new(encrypted)),
        };

        let name = ServerName::try_from(host)
            .map_err(|e| LoggerError::config("SmtpTransport", format!("{}: '{}'", e, host)))?
            .to_owned();
        let mut tls = StreamOwned::new(ClientConnection::new(tls_config()?, name)?, tcp);
        while tls.conn.is_handshaking() {
            tls.conn
                .complete_io(&mut tls.sock)
                .map_err(|e| LoggerError::io_operation("negotiating TLS", host.to_string(), e))?;
        }
        Ok(Session::new(Connection::Tls(Box::new(tls))))
    }

    fn read_reply(&mut self) -> Result<Reply> {
        let mut lines = Vec::new();
        loop {
            let mut raw = String::new();
            if self.stream.read_line(&mut raw)? == 0 {
                return Err(LoggerError::smtp(0, "connection closed by server"));
            }
            let raw = raw.trim_end_matches(['\r', '\n']);
            let code = raw
                .get(0..3)
                .and_then(|digits| digits.parse::<u16>().ok())
                .ok_or_else(|| LoggerError::smtp(0, format!("malformed reply '{}'", raw)))?;
            let more = raw.as_bytes().get(3) == Some(&b'-');
            lines.push(raw.get(4..).unwrap_or("").to_string());

            if !more {
                return Ok(Reply { code, lines });
            }
        }
    }

    fn expect(&mut self, accepted: &[u16]) -> Result<Reply> {
        let reply = self.read_reply()?;
        if accepted.contains(&reply.code) {
            Ok(reply)
        } else {
            Err(LoggerError::smtp(reply.code, reply.lines.join(" ")))
        }
    }

    fn send_raw(&mut self, payload: &[u8]) -> Result<()> {
        let connection = self.stream.get_mut();
        connection.write_all(payload)?;
        connection.flush()?;
        Ok(())
    }

    fn command(&mut self, line: &str, accepted: &[u16]) -> Result<Reply> {
        self.send_raw(format!("{}\r\n", line).as_bytes())?;
        self.expect(accepted)
    }

    /// Send the message body with CRLF line endings and dot-stuffing
    fn data(&mut self, body: &str) -> Result<()> {
        let mut payload = String::with_capacity(body.len() + 16);
        for line in body.lines() {
            if line.starts_with('.') {
                payload.push('.');
            }
            payload.push_str(line);
            payload.push_str("\r\n");
        }
        payload.push_str(".\r\n");

        self.send_raw(payload.as_bytes())?;
        self.expect(&[250])?;
        Ok(())
    }
}
