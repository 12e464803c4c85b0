pub mod widget_state;
