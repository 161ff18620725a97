pub mod domain;
pub mod frame_capture_writer;
