pub mod app_reducer;
pub mod console_reducer;
