pub mod capture_report;
pub mod constants;
pub mod point_cloud_frame;
pub mod point_stride;
