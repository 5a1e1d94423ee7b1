//! Core domain types and logic.

pub mod bar;
pub mod series;
pub mod timeframe;
pub mod window;
pub mod indicator;
pub mod kpi;
pub mod portfolio;
pub mod chart;
pub mod instruments;
pub mod info_table;
pub mod error;
