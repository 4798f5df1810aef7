pub mod frame_drop;
pub mod time;
