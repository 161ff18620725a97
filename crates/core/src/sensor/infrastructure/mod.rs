pub mod synthetic_depth_sensor;
