pub mod sender;
pub mod transport;

pub use sender::LineFrameSender;
pub use transport::BoxedTransport;
