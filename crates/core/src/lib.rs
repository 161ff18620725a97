pub mod capture;
pub mod encoding;
pub mod reporting;
pub mod sensor;
pub mod shared;
pub mod storage;
