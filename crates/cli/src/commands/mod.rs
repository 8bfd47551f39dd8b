pub mod config_cmd;
pub mod doctor;
pub mod run;
pub mod status;
pub mod ui;
