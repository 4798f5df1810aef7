use std::io;

use clap::Parser;

use framelink_transmission::{transport, BoxedTransport};

/// Transport selection shared by the streamer binaries. Frame geometry,
/// pixel format and compression quality are compile-time constants in each
/// binary, matching the build-time configuration of the original sketches.
#[derive(Parser, Debug)]
pub struct TransportArgs {
    /// Serial device to stream to (e.g. /dev/ttyUSB0)
    #[arg(long)]
    pub serial: Option<String>,

    /// Baud rate for the serial device
    #[arg(long, default_value_t = 230400)]
    pub baud: u32,

    /// TCP address to stream to instead of a serial device
    #[arg(long, conflicts_with = "serial")]
    pub tcp: Option<String>,
}

/// Opens the requested transport. With no device given the stream goes to
/// stdout; logs stay on stderr either way.
pub async fn open_transport(args: &TransportArgs) -> io::Result<BoxedTransport> {
    if let Some(path) = &args.serial {
        return transport::open_serial(path, args.baud)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err));
    }

    if let Some(address) = &args.tcp {
        return transport::connect_tcp(address).await;
    }

    Ok(Box::new(tokio::io::stdout()))
}
