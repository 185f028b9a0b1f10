pub mod console_view_model;
