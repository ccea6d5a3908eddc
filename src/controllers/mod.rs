pub mod analysis_controller;
pub mod system_controller;
