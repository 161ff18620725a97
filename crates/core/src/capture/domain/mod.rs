pub mod capture_gate;
pub mod capture_session;
pub mod frame_listener;
