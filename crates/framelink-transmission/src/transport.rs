use std::io;

use tokio::io::AsyncWrite;
use tokio::net::TcpStream;
use tokio_serial::SerialPortBuilderExt;

/// Byte sink a [`crate::LineFrameSender`] writes to. Boxed so applications
/// can pick the transport at startup without changing pipeline types.
pub type BoxedTransport = Box<dyn AsyncWrite + Send + Unpin>;

/// Opens a serial device in the 8N1 configuration the receivers expect.
pub fn open_serial(path: &str, baud_rate: u32) -> tokio_serial::Result<BoxedTransport> {
    let stream = tokio_serial::new(path, baud_rate).open_native_async()?;
    Ok(Box::new(stream))
}

pub async fn connect_tcp(address: &str) -> io::Result<BoxedTransport> {
    let socket = TcpStream::connect(address).await?;
    Ok(Box::new(socket))
}
