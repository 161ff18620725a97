pub mod app_data_output_directory;
pub mod fixed_output_directory;
pub mod frame_file_writer;
