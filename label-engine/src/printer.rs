//! Printer transport
//!
//! Raw TCP printing to thermal label printers. Most Zebra-class printers
//! accept raw command text on port 9100.

use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{info, instrument, warn};

use crate::error::{LabelError, LabelResult};

/// Default raw-printing port.
pub const RAW_PORT: u16 = 9100;

/// Trait for printer transports
#[allow(async_fn_in_trait)]
pub trait Printer {
    /// Send raw command data to the printer
    async fn print(&self, data: &[u8]) -> LabelResult<()>;

    /// Check if the printer is online/reachable
    async fn is_online(&self) -> bool;
}

/// Network printer (TCP port 9100)
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    host: String,
    port: u16,
    timeout: Duration,
}

impl NetworkPrinter {
    /// Create a printer for `host`, defaulting the port to 9100.
    pub fn new(host: impl Into<String>, port: Option<u16>) -> Self {
        Self {
            host: host.into(),
            port: port.unwrap_or(RAW_PORT),
            timeout: Duration::from_secs(5),
        }
    }

    /// Set connection timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Printer for NetworkPrinter {
    #[instrument(skip(data), fields(endpoint = %self.endpoint(), data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> LabelResult<()> {
        info!("Connecting to printer");

        let endpoint = self.endpoint();
        let mut stream = tokio::time::timeout(self.timeout, TcpStream::connect(&endpoint))
            .await
            .map_err(|_| LabelError::Timeout(format!("Connection timeout: {}", endpoint)))?
            .map_err(|e| LabelError::Connection(format!("{}: {}", endpoint, e)))?;

        info!("Connected, sending {} bytes", data.len());

        stream
            .write_all(data)
            .await
            .map_err(|e| LabelError::Connection(format!("Write failed: {}", e)))?;
        stream
            .flush()
            .await
            .map_err(|e| LabelError::Connection(format!("Flush failed: {}", e)))?;
        stream
            .shutdown()
            .await
            .map_err(|e| LabelError::Connection(format!("Shutdown failed: {}", e)))?;

        info!("Print job sent successfully");
        Ok(())
    }

    #[instrument(fields(endpoint = %self.endpoint()))]
    async fn is_online(&self) -> bool {
        let check_timeout = Duration::from_millis(500);

        match tokio::time::timeout(check_timeout, TcpStream::connect(self.endpoint())).await {
            Ok(Ok(_)) => {
                info!("Printer online");
                true
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Printer offline");
                false
            }
            Err(_) => {
                warn!("Printer check timeout");
                false
            }
        }
    }
}
