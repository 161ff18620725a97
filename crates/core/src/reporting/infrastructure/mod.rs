pub mod channel_report_observer;
pub mod fan_out_report_observer;
pub mod log_report_observer;
pub mod transcript_report_observer;
