pub mod frame_writer;
pub mod output_directory;
pub mod write_error;
