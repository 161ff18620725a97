pub mod report_observer;
pub mod reporter;
