//! Core pipeline components
pub mod command_planner;
pub mod controller;
pub mod drive_command;
pub mod event;
pub mod orientation;
pub mod pose;
pub mod pose_debounce;
pub mod state;
